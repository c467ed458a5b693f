//! Per-record shape parameters.
//!
//! Field-to-attribute mapping:
//!   sepal_length -> x position      sepal_width -> y position
//!   petal_length -> size            petal_width -> side count, opacity
//!   petal_length / sepal_length -> rotation
//!
//! Everything is a pure function of the record, the batch stats and the
//! static config, so identical input produces bit-identical parameters
//! across runs and platforms.

use crate::config::ArtConfig;
use crate::grid::CellRect;
use crate::normalize::normalize_to;
use crate::palette::{color_index, pick_color, Rgb};
use crate::record::IrisRecord;
use crate::stats::DatasetStats;

/// Additive brighten applied to the base color for the center accent dot.
pub const ACCENT_BRIGHTEN: u8 = 70;

/// Halo radius relative to the main shape.
pub const HALO_SCALE: f64 = 1.3;

/// Halo opacity relative to the main shape.
pub const HALO_OPACITY: f64 = 0.3;

/// Accent dot radius relative to the main shape.
pub const ACCENT_SCALE: f64 = 0.2;

/// Drawable parameters for one record. Ephemeral: computed, drawn,
/// discarded.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeParams {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub sides: u32,
    pub rotation_deg: f64,
    pub color: Rgb,
    pub opacity: u8,
}

impl ShapeParams {
    /// Scatter placement: the record's normalized sepal fields position it
    /// anywhere inside the canvas margins.
    pub fn for_record(record: &IrisRecord, stats: &DatasetStats, config: &ArtConfig) -> Self {
        let x = normalize_to(
            record.sepal_length,
            stats.sepal_length.min,
            stats.sepal_length.max,
            config.shape_margin,
            config.width as f64 - config.shape_margin,
        );
        let y = normalize_to(
            record.sepal_width,
            stats.sepal_width.min,
            stats.sepal_width.max,
            config.shape_margin,
            config.height as f64 - config.shape_margin,
        );
        let size = normalize_to(
            record.petal_length,
            stats.petal_length.min,
            stats.petal_length.max,
            config.size_min,
            config.size_max,
        );
        Self::with_placement(record, stats, config, x, y, size)
    }

    /// Grid placement: centered in a cell, size normalized into a range
    /// that always fits the cell.
    pub fn for_cell(
        record: &IrisRecord,
        cell: &CellRect,
        stats: &DatasetStats,
        config: &ArtConfig,
    ) -> Self {
        let (x, y) = cell.center();
        let fit = cell.width().min(cell.height()) as f64;
        let size = normalize_to(
            record.petal_length,
            stats.petal_length.min,
            stats.petal_length.max,
            fit * 0.2,
            fit * 0.45,
        );
        Self::with_placement(record, stats, config, x, y, size)
    }

    fn with_placement(
        record: &IrisRecord,
        stats: &DatasetStats,
        config: &ArtConfig,
        x: f64,
        y: f64,
        size: f64,
    ) -> Self {
        // A polygon needs at least 3 sides whatever the config says.
        let sides_min = config.sides_min.max(3);
        let sides_max = config.sides_max.max(sides_min);
        let sides = normalize_to(
            record.petal_width,
            stats.petal_width.min,
            stats.petal_width.max,
            sides_min as f64,
            sides_max as f64,
        ) as u32;
        let sides = sides.clamp(sides_min, sides_max).max(3);

        // Ratio of petal to sepal length, wrapped into [0, 360).
        let ratio = if record.sepal_length > 0.0 {
            record.petal_length / record.sepal_length
        } else {
            0.0
        };
        let rotation_deg = (ratio * 360.0).rem_euclid(360.0);

        let opacity = normalize_to(
            record.petal_width,
            stats.petal_width.min,
            stats.petal_width.max,
            config.opacity_min,
            config.opacity_max,
        )
        .round()
        .clamp(0.0, 255.0) as u8;

        let palette = config.resolve_palette(&record.species);
        let color = pick_color(palette, color_index(record, stats, palette.len()));

        ShapeParams {
            x,
            y,
            size,
            sides,
            rotation_deg,
            color,
            opacity,
        }
    }

    /// Vertex `k` of `sides` sits at `(360 / sides) * k + rotation` degrees
    /// on a circle of the given radius around the center.
    pub fn vertices_scaled(&self, radius_scale: f64) -> Vec<(i32, i32)> {
        let radius = self.size * radius_scale;
        let step = 360.0 / self.sides as f64;
        (0..self.sides)
            .map(|k| {
                let angle = (step * k as f64 + self.rotation_deg).to_radians();
                (
                    (self.x + radius * angle.cos()).round() as i32,
                    (self.y + radius * angle.sin()).round() as i32,
                )
            })
            .collect()
    }

    /// Main polygon outline.
    pub fn vertices(&self) -> Vec<(i32, i32)> {
        self.vertices_scaled(1.0)
    }

    /// Halo polygon: larger and fainter, drawn beneath the main shape.
    pub fn halo_vertices(&self) -> Vec<(i32, i32)> {
        self.vertices_scaled(HALO_SCALE)
    }

    pub fn halo_alpha(&self) -> f64 {
        self.opacity as f64 / 255.0 * HALO_OPACITY
    }

    pub fn alpha(&self) -> f64 {
        self.opacity as f64 / 255.0
    }

    /// Center accent: a small dot in a brightened version of the base
    /// color.
    pub fn accent_radius(&self) -> i32 {
        ((self.size * ACCENT_SCALE).round() as i32).max(1)
    }

    pub fn accent_color(&self) -> Rgb {
        self.color.brighten(ACCENT_BRIGHTEN)
    }
}
