//! Pipeline orchestration: records in, PNG bytes out.
//!
//! Layer order is fixed: background gradient cells first, species halos
//! second, per-record shapes last, so shapes are never obscured by
//! background elements. The whole pipeline is synchronous and runs to
//! completion for one batch before returning.

use anyhow::Result;

use crate::background::plan_background;
use crate::canvas::Canvas;
use crate::config::ArtConfig;
use crate::error::ArtError;
use crate::grid::GridPlan;
use crate::normalize::normalize;
use crate::palette::{color_index, pick_color, Rgb};
use crate::record::{sort_records, IrisRecord};
use crate::shape::ShapeParams;
use crate::stats::DatasetStats;
use crate::RenderMode;

/// Stroke width of the full-opacity outline around each main polygon.
const OUTLINE_WIDTH: u32 = 2;

/// Render one batch to PNG bytes.
///
/// Sorts the records into canonical order, aggregates stats, draws
/// background and shapes, and encodes. Fails with `EmptyDataset` for a
/// zero-record batch; two calls with the same records and config return
/// byte-identical PNGs.
pub fn render_art(
    mut records: Vec<IrisRecord>,
    config: &ArtConfig,
    mode: RenderMode,
) -> Result<Vec<u8>> {
    if records.is_empty() {
        return Err(ArtError::EmptyDataset.into());
    }
    sort_records(&mut records);
    let stats = DatasetStats::aggregate(&records)?;

    let mut canvas = Canvas::new(config.width, config.height, config.background)?;

    let background = plan_background(&records, &stats, config);
    for cell in &background.cells {
        canvas.fill_rect(cell.x0, cell.y0, cell.x1, cell.y1, cell.color)?;
    }
    for halo in &background.halos {
        canvas.fill_ellipse((halo.cx, halo.cy), halo.rx, halo.ry, halo.color, halo.alpha)?;
    }

    match mode {
        RenderMode::Scatter => {
            for record in &records {
                let params = ShapeParams::for_record(record, &stats, config);
                draw_shape(&mut canvas, &params)?;
            }
        }
        RenderMode::Grid => {
            let plan = GridPlan::compute(records.len(), config.width, config.height)?;
            for (index, record) in records.iter().enumerate() {
                let cell = plan.cell_rect(index);
                canvas.fill_rect(
                    cell.x0,
                    cell.y0,
                    cell.x1,
                    cell.y1,
                    cell_fill(record, &stats, config),
                )?;
                let params = ShapeParams::for_cell(record, &cell, &stats, config);
                draw_shape(&mut canvas, &params)?;
            }
        }
    }

    canvas.into_png()
}

/// Halo beneath, main polygon, full-opacity outline, brightened accent dot.
fn draw_shape(canvas: &mut Canvas, params: &ShapeParams) -> Result<()> {
    canvas.fill_polygon(&params.halo_vertices(), params.color, params.halo_alpha())?;
    canvas.fill_polygon(&params.vertices(), params.color, params.alpha())?;
    canvas.stroke_polygon(&params.vertices(), params.color, OUTLINE_WIDTH)?;
    canvas.fill_circle(
        (params.x.round() as i32, params.y.round() as i32),
        params.accent_radius(),
        params.accent_color(),
        params.alpha(),
    )?;
    Ok(())
}

/// Grid-mode cell backdrop: the record's palette color with each channel
/// scaled by a normalized field, so cells shade from muted to full within
/// one species.
fn cell_fill(record: &IrisRecord, stats: &DatasetStats, config: &ArtConfig) -> Rgb {
    let palette = config.resolve_palette(&record.species);
    let base = pick_color(palette, color_index(record, stats, palette.len()));
    let shade = |v: f64, min: f64, max: f64| 0.5 + 0.5 * normalize(v, min, max).clamp(0.0, 1.0);
    base.scaled(
        shade(record.sepal_length, stats.sepal_length.min, stats.sepal_length.max),
        shade(record.sepal_width, stats.sepal_width.min, stats.sepal_width.max),
        shade(record.petal_length, stats.petal_length.min, stats.petal_length.max),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(sl: f64, sw: f64, pl: f64, pw: f64, species: &str) -> IrisRecord {
        IrisRecord {
            sepal_length: sl,
            sepal_width: sw,
            petal_length: pl,
            petal_width: pw,
            species: species.to_string(),
        }
    }

    fn batch(n: usize) -> Vec<IrisRecord> {
        (0..n)
            .map(|i| {
                let species = match i % 3 {
                    0 => "Iris-setosa",
                    1 => "Iris-versicolor",
                    _ => "Iris-virginica",
                };
                rec(
                    4.3 + 0.02 * i as f64,
                    2.0 + 0.01 * i as f64,
                    1.0 + 0.03 * i as f64,
                    0.1 + 0.015 * i as f64,
                    species,
                )
            })
            .collect()
    }

    fn small_config() -> ArtConfig {
        ArtConfig {
            width: 192,
            height: 108,
            shape_margin: 15.0,
            size_min: 4.0,
            size_max: 18.0,
            ..ArtConfig::default()
        }
    }

    #[test]
    fn test_empty_dataset_fails() {
        let err = render_art(Vec::new(), &ArtConfig::default(), RenderMode::Scatter).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ArtError>(),
            Some(ArtError::EmptyDataset)
        ));
    }

    #[test]
    fn test_scatter_render_is_deterministic() {
        let config = small_config();
        let a = render_art(batch(30), &config, RenderMode::Scatter).unwrap();
        let b = render_art(batch(30), &config, RenderMode::Scatter).unwrap();
        assert_eq!(a, b);
        assert_eq!(&a[0..8], &[137, 80, 78, 71, 13, 10, 26, 10]);
    }

    #[test]
    fn test_grid_render_is_deterministic() {
        let config = small_config();
        let a = render_art(batch(30), &config, RenderMode::Grid).unwrap();
        let b = render_art(batch(30), &config, RenderMode::Grid).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_row_order_does_not_matter() {
        let config = small_config();
        let records = batch(12);
        let mut shuffled = records.clone();
        shuffled.reverse();
        let a = render_art(records, &config, RenderMode::Scatter).unwrap();
        let b = render_art(shuffled, &config, RenderMode::Scatter).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_modes_differ() {
        let config = small_config();
        let a = render_art(batch(12), &config, RenderMode::Scatter).unwrap();
        let b = render_art(batch(12), &config, RenderMode::Grid).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_single_record_renders() {
        let config = small_config();
        let records = vec![rec(5.1, 3.5, 1.4, 0.2, "Iris-setosa")];
        let png = render_art(records, &config, RenderMode::Grid).unwrap();
        assert_eq!(&png[0..8], &[137, 80, 78, 71, 13, 10, 26, 10]);
    }

    #[test]
    fn test_empty_configured_palette_renders_with_fallback() {
        let mut config = small_config();
        config.palettes.insert("Iris-setosa".to_string(), Vec::new());
        let records = vec![
            rec(5.1, 3.5, 1.4, 0.2, "Iris-setosa"),
            rec(4.9, 3.0, 1.5, 0.3, "Iris-setosa"),
        ];
        let png = render_art(records, &config, RenderMode::Scatter).unwrap();
        assert_eq!(&png[0..8], &[137, 80, 78, 71, 13, 10, 26, 10]);
    }

    #[test]
    fn test_unknown_species_renders_with_fallback() {
        let config = small_config();
        let records = vec![
            rec(5.1, 3.5, 1.4, 0.2, "Iris-mysteriosa"),
            rec(6.0, 3.0, 4.0, 1.5, "Iris-mysteriosa"),
        ];
        assert!(render_art(records, &config, RenderMode::Scatter).is_ok());
    }
}
