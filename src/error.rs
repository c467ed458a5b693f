use thiserror::Error;

/// Error kinds surfaced by the art engine.
///
/// All of these are fatal for the generation call that raised them; the
/// engine never retries. Recoverable conditions (degenerate value ranges,
/// unknown species labels, empty background segments) are handled inline
/// with fixed fallbacks and never reach this enum.
#[derive(Debug, Error)]
pub enum ArtError {
    #[error("dataset contains no usable records")]
    EmptyDataset,

    #[error("missing required column '{0}'")]
    MissingColumn(String),

    #[error("cannot plan a grid for zero records")]
    InvalidGrid,

    #[error("row {row}: invalid value '{value}' for column '{column}'")]
    BadValue {
        row: usize,
        column: String,
        value: String,
    },
}
