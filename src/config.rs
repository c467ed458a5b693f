use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::palette::{Rgb, DEFAULT_PALETTE};

/// Static engine configuration: canvas geometry, palettes and the value
/// ranges every visual attribute is normalized into.
///
/// Immutable for the lifetime of a renderer; concurrent generation calls
/// can share one instance freely. All fields default to the classic Iris
/// setup, so `{}` is a valid config document.
#[derive(Debug, Clone, Deserialize)]
pub struct ArtConfig {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default = "default_background")]
    pub background: Rgb,
    #[serde(default = "default_palettes")]
    pub palettes: BTreeMap<String, Vec<Rgb>>,
    #[serde(default = "default_margin")]
    pub shape_margin: f64,
    #[serde(default = "default_size_min")]
    pub size_min: f64,
    #[serde(default = "default_size_max")]
    pub size_max: f64,
    #[serde(default = "default_sides_min")]
    pub sides_min: u32,
    #[serde(default = "default_sides_max")]
    pub sides_max: u32,
    #[serde(default = "default_opacity_min")]
    pub opacity_min: f64,
    #[serde(default = "default_opacity_max")]
    pub opacity_max: f64,
}

fn default_width() -> u32 {
    1920
}
fn default_height() -> u32 {
    1080
}
fn default_background() -> Rgb {
    Rgb(10, 15, 25)
}
fn default_margin() -> f64 {
    150.0
}
fn default_size_min() -> f64 {
    40.0
}
fn default_size_max() -> f64 {
    180.0
}
fn default_sides_min() -> u32 {
    5
}
fn default_sides_max() -> u32 {
    12
}
fn default_opacity_min() -> f64 {
    180.0
}
fn default_opacity_max() -> f64 {
    240.0
}

fn default_palettes() -> BTreeMap<String, Vec<Rgb>> {
    let mut palettes = BTreeMap::new();
    palettes.insert(
        "Iris-setosa".to_string(),
        vec![Rgb(255, 99, 132), Rgb(255, 140, 105), Rgb(255, 179, 71)],
    );
    palettes.insert(
        "Iris-versicolor".to_string(),
        vec![Rgb(54, 162, 235), Rgb(75, 192, 192), Rgb(102, 187, 255)],
    );
    palettes.insert(
        "Iris-virginica".to_string(),
        vec![Rgb(153, 102, 255), Rgb(186, 85, 211), Rgb(147, 51, 234)],
    );
    palettes
}

impl Default for ArtConfig {
    fn default() -> Self {
        ArtConfig {
            width: default_width(),
            height: default_height(),
            background: default_background(),
            palettes: default_palettes(),
            shape_margin: default_margin(),
            size_min: default_size_min(),
            size_max: default_size_max(),
            sides_min: default_sides_min(),
            sides_max: default_sides_max(),
            opacity_min: default_opacity_min(),
            opacity_max: default_opacity_max(),
        }
    }
}

impl ArtConfig {
    /// Load a JSON config file; absent fields keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: ArtConfig = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Exact-match palette lookup; unknown labels fall back to the default
    /// gray palette. Never an error.
    pub fn resolve_palette(&self, species: &str) -> &[Rgb] {
        self.palettes
            .get(species)
            .map(|p| p.as_slice())
            .unwrap_or(&DEFAULT_PALETTE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ArtConfig::default();
        assert_eq!(config.width, 1920);
        assert_eq!(config.height, 1080);
        assert_eq!(config.background, Rgb(10, 15, 25));
        assert_eq!(config.palettes.len(), 3);
        assert_eq!(config.sides_min, 5);
    }

    #[test]
    fn test_empty_document_is_all_defaults() {
        let config: ArtConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.width, 1920);
        assert_eq!(config.opacity_max, 240.0);
    }

    #[test]
    fn test_partial_override() {
        let config: ArtConfig =
            serde_json::from_str(r#"{"width": 800, "background": [0, 0, 0]}"#).unwrap();
        assert_eq!(config.width, 800);
        assert_eq!(config.height, 1080);
        assert_eq!(config.background, Rgb(0, 0, 0));
    }

    #[test]
    fn test_unknown_species_falls_back_to_gray() {
        let config = ArtConfig::default();
        let palette = config.resolve_palette("Iris-imaginaria");
        assert_eq!(palette, &DEFAULT_PALETTE);
    }

    #[test]
    fn test_known_species_palette() {
        let config = ArtConfig::default();
        let palette = config.resolve_palette("Iris-setosa");
        assert_eq!(palette[0], Rgb(255, 99, 132));
        assert_eq!(palette.len(), 3);
    }
}
