use serde::Deserialize;

/// Required columns, in schema order. The engine fails fast when any of
/// these is absent from the input.
pub const REQUIRED_COLUMNS: [&str; 5] = [
    "sepal_length",
    "sepal_width",
    "petal_length",
    "petal_width",
    "species",
];

/// One Iris measurement row: four numeric fields plus a species label.
/// Immutable once ingested.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IrisRecord {
    pub sepal_length: f64,
    pub sepal_width: f64,
    pub petal_length: f64,
    pub petal_width: f64,
    pub species: String,
}

impl IrisRecord {
    /// All four numeric fields must be finite and the species label
    /// non-empty for the record to be usable.
    pub fn is_valid(&self) -> bool {
        self.sepal_length.is_finite()
            && self.sepal_width.is_finite()
            && self.petal_length.is_finite()
            && self.petal_width.is_finite()
            && !self.species.is_empty()
    }
}

/// Pin the iteration order before any layout or rendering: stable sort by
/// species, then the four numeric fields. Input files with identical
/// contents but shuffled rows produce the same image.
pub fn sort_records(records: &mut [IrisRecord]) {
    records.sort_by(|a, b| {
        a.species
            .cmp(&b.species)
            .then_with(|| a.sepal_length.total_cmp(&b.sepal_length))
            .then_with(|| a.sepal_width.total_cmp(&b.sepal_width))
            .then_with(|| a.petal_length.total_cmp(&b.petal_length))
            .then_with(|| a.petal_width.total_cmp(&b.petal_width))
    });
}
