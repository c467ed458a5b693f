//! Background gradient and species halo planning.
//!
//! The canvas splits into horizontal bands by equal-count quantiles of
//! sepal length, and each band into vertical segments by quantiles of
//! petal length. Each band x segment cell gets the band's blended species
//! color scaled by how crowded the segment is. On top of the bands, each
//! species present gets three concentric translucent ellipses centered at
//! its mean position. Plans are pure data; the canvas executes them.

use std::collections::BTreeMap;

use crate::config::ArtConfig;
use crate::normalize::{normalize_to, scale};
use crate::palette::{blend, Rgb, DEFAULT_PALETTE};
use crate::record::IrisRecord;
use crate::stats::{bin_index, quantile_edges, DatasetStats};

pub const BANDS: usize = 5;
pub const SEGMENTS: usize = 8;

const INTENSITY_MIN: f64 = 0.3;
const INTENSITY_MAX: f64 = 0.7;
/// Neutral fill for segments with no records; never zero, a black gap
/// would read as missing data.
const EMPTY_INTENSITY: f64 = 0.4;

const HALO_RINGS: usize = 3;
const HALO_BASE_ALPHA: f64 = 0.18;
const HALO_ALPHA_STEP: f64 = 0.05;
const HALO_RADIUS_MIN: f64 = 120.0;
const HALO_RADIUS_MAX: f64 = 320.0;
/// Vertical squash of the halo ellipses.
const HALO_ASPECT: f64 = 0.75;

/// One opaque gradient cell, already intensity-scaled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientCell {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
    pub color: Rgb,
}

/// One translucent halo ring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HaloRing {
    pub cx: i32,
    pub cy: i32,
    pub rx: i32,
    pub ry: i32,
    pub color: Rgb,
    pub alpha: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundPlan {
    pub cells: Vec<GradientCell>,
    pub halos: Vec<HaloRing>,
}

/// Build the full background plan for one batch.
pub fn plan_background(
    records: &[IrisRecord],
    stats: &DatasetStats,
    config: &ArtConfig,
) -> BackgroundPlan {
    BackgroundPlan {
        cells: plan_gradient(records, config),
        halos: plan_halos(records, stats, config),
    }
}

fn plan_gradient(records: &[IrisRecord], config: &ArtConfig) -> Vec<GradientCell> {
    let sepal: Vec<f64> = records.iter().map(|r| r.sepal_length).collect();
    let petal: Vec<f64> = records.iter().map(|r| r.petal_length).collect();
    let band_edges = quantile_edges(&sepal, BANDS);
    let segment_edges = quantile_edges(&petal, SEGMENTS);

    let mut cells = Vec::with_capacity(BANDS * SEGMENTS);
    for band in 0..BANDS {
        let members: Vec<&IrisRecord> = records
            .iter()
            .filter(|r| bin_index(r.sepal_length, &band_edges) == band)
            .collect();
        let band_color = band_blend(&members, config);
        let band_avg = members.len() as f64 / SEGMENTS as f64;

        let mut counts = [0usize; SEGMENTS];
        for r in &members {
            counts[bin_index(r.petal_length, &segment_edges)] += 1;
        }

        let (y0, y1) = strip(band, BANDS, config.height);
        for (segment, &count) in counts.iter().enumerate() {
            let intensity = if count == 0 || band_avg == 0.0 {
                EMPTY_INTENSITY
            } else {
                // Segment crowding relative to the band average, mapped
                // into the intensity window.
                let t = (count as f64 / (2.0 * band_avg)).clamp(0.0, 1.0);
                scale(t, INTENSITY_MIN, INTENSITY_MAX)
            };
            let (x0, x1) = strip(segment, SEGMENTS, config.width);
            cells.push(GradientCell {
                x0,
                y0,
                x1,
                y1,
                color: band_color.scaled(intensity, intensity, intensity),
            });
        }
    }
    cells
}

/// Blend of the first palette color of every species in the group,
/// weighted by each species' fractional representation.
fn band_blend(members: &[&IrisRecord], config: &ArtConfig) -> Rgb {
    if members.is_empty() {
        return config.background;
    }
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for r in members {
        *counts.entry(r.species.as_str()).or_insert(0) += 1;
    }
    let total = members.len() as f64;
    let weighted: Vec<(Rgb, f64)> = counts
        .iter()
        .map(|(species, &count)| (base_color(config, species), count as f64 / total))
        .collect();
    blend(&weighted)
}

fn plan_halos(records: &[IrisRecord], stats: &DatasetStats, config: &ArtConfig) -> Vec<HaloRing> {
    // BTreeMap keeps species iteration deterministic.
    let mut groups: BTreeMap<&str, Vec<&IrisRecord>> = BTreeMap::new();
    for r in records {
        groups.entry(r.species.as_str()).or_default().push(r);
    }

    let mut halos = Vec::new();
    for (species, members) in &groups {
        let n = members.len() as f64;
        let mean_sl = members.iter().map(|r| r.sepal_length).sum::<f64>() / n;
        let mean_sw = members.iter().map(|r| r.sepal_width).sum::<f64>() / n;
        let cx = normalize_to(
            mean_sl,
            stats.sepal_length.min,
            stats.sepal_length.max,
            0.0,
            config.width as f64,
        )
        .round() as i32;
        let cy = normalize_to(
            mean_sw,
            stats.sepal_width.min,
            stats.sepal_width.max,
            0.0,
            config.height as f64,
        )
        .round() as i32;

        // Spread of petal length relative to its observed range sets the
        // halo footprint.
        let range = stats.petal_length.max - stats.petal_length.min;
        let spread = if range > 0.0 {
            let mean_pl = members.iter().map(|r| r.petal_length).sum::<f64>() / n;
            let var = members
                .iter()
                .map(|r| (r.petal_length - mean_pl) * (r.petal_length - mean_pl))
                .sum::<f64>()
                / n;
            (var.sqrt() / range).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let radius = scale(spread, HALO_RADIUS_MIN, HALO_RADIUS_MAX);

        let color = base_color(config, species);
        for ring in 0..HALO_RINGS {
            let rx = radius * (1.0 + 0.4 * ring as f64);
            halos.push(HaloRing {
                cx,
                cy,
                rx: rx.round() as i32,
                ry: (rx * HALO_ASPECT).round() as i32,
                color,
                alpha: HALO_BASE_ALPHA - ring as f64 * HALO_ALPHA_STEP,
            });
        }
    }
    halos
}

/// First palette color for a species; a configured-but-empty palette list
/// falls back to gray like an unknown label would.
fn base_color(config: &ArtConfig, species: &str) -> Rgb {
    config
        .resolve_palette(species)
        .first()
        .copied()
        .unwrap_or(DEFAULT_PALETTE[0])
}

/// Evenly divided strip boundaries with the far edge snapped to the canvas
/// dimension, same policy as the grid planner.
fn strip(index: usize, count: usize, extent: u32) -> (i32, i32) {
    let lo = (index as f64 * extent as f64 / count as f64).round() as i32;
    let hi = if index == count - 1 {
        extent as i32
    } else {
        ((index + 1) as f64 * extent as f64 / count as f64).round() as i32
    };
    (lo, hi)
}
