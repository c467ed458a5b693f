// Library exports for iris-art

pub mod background;
pub mod canvas;
pub mod config;
pub mod csv_reader;
pub mod error;
pub mod grid;
pub mod normalize;
pub mod palette;
pub mod record;
pub mod runtime;
pub mod shape;
pub mod stats;

pub use config::ArtConfig;
pub use error::ArtError;
pub use record::IrisRecord;
pub use runtime::render_art;

use clap::ValueEnum;

/// How records map to canvas positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum RenderMode {
    /// One polygon per record, positioned by its normalized sepal fields.
    #[default]
    Scatter,
    /// One exact grid cell per record, shapes centered in their cells.
    Grid,
}
