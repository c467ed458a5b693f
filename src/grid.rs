//! Exact grid layout planning.
//!
//! The grid must cover the canvas exactly: one cell per record, no leftover
//! cells and no overlap. That constrains the factorization to exact
//! divisors of the record count, trading aspect-ratio fidelity for exact
//! coverage. A square-root heuristic would leave remainder cells.

use crate::error::ArtError;

/// An integer cell rectangle, half-open on neither edge: `x0..x1`, `y0..y1`
/// in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRect {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl CellRect {
    pub fn width(&self) -> i32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> i32 {
        self.y1 - self.y0
    }

    pub fn center(&self) -> (f64, f64) {
        (
            (self.x0 + self.x1) as f64 / 2.0,
            (self.y0 + self.y1) as f64 / 2.0,
        )
    }
}

/// Column/row factorization of a record count against a canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridPlan {
    pub cols: usize,
    pub rows: usize,
    width: u32,
    height: u32,
}

impl GridPlan {
    /// Enumerate all divisor pairs `(cols, rows)` with `cols * rows == n`
    /// in ascending `cols` and keep the pair whose `cols / rows` is
    /// closest to the canvas aspect ratio. Strict improvement is required,
    /// so ties keep the first (lowest-cols) pair found.
    pub fn compute(n: usize, width: u32, height: u32) -> Result<Self, ArtError> {
        if n == 0 {
            return Err(ArtError::InvalidGrid);
        }

        let target = width as f64 / height as f64;
        let mut best = (n, 1);
        let mut best_diff = f64::INFINITY;

        for cols in 1..=n {
            if n % cols != 0 {
                continue;
            }
            let rows = n / cols;
            let diff = (cols as f64 / rows as f64 - target).abs();
            if diff < best_diff {
                best_diff = diff;
                best = (cols, rows);
            }
        }

        Ok(GridPlan {
            cols: best.0,
            rows: best.1,
            width,
            height,
        })
    }

    pub fn cell_count(&self) -> usize {
        self.cols * self.rows
    }

    /// Cell rectangle for a 0-based row-major index.
    ///
    /// Boundaries divide the canvas evenly and round to the nearest pixel;
    /// the last column's right edge and the last row's bottom edge snap to
    /// the exact canvas dimensions so rounding can never leave a gap or an
    /// overhang at the far edges.
    pub fn cell_rect(&self, index: usize) -> CellRect {
        let col = index % self.cols;
        let row = index / self.cols;

        let x0 = (col as f64 * self.width as f64 / self.cols as f64).round() as i32;
        let mut x1 = ((col + 1) as f64 * self.width as f64 / self.cols as f64).round() as i32;
        let y0 = (row as f64 * self.height as f64 / self.rows as f64).round() as i32;
        let mut y1 = ((row + 1) as f64 * self.height as f64 / self.rows as f64).round() as i32;

        if col == self.cols - 1 {
            x1 = self.width as i32;
        }
        if row == self.rows - 1 {
            y1 = self.height as i32;
        }

        CellRect { x0, y0, x1, y1 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_records_is_an_error() {
        let err = GridPlan::compute(0, 1920, 1080).unwrap_err();
        assert!(matches!(err, ArtError::InvalidGrid));
    }

    #[test]
    fn test_single_record() {
        let plan = GridPlan::compute(1, 1920, 1080).unwrap();
        assert_eq!((plan.cols, plan.rows), (1, 1));
        let cell = plan.cell_rect(0);
        assert_eq!(cell, CellRect { x0: 0, y0: 0, x1: 1920, y1: 1080 });
    }

    #[test]
    fn test_iris_150_on_hd_canvas() {
        // 150 factors as 15x10 (ratio 1.5), the divisor pair closest to
        // 1920/1080 = 1.778. Never an inexact pair like 14x11.
        let plan = GridPlan::compute(150, 1920, 1080).unwrap();
        assert_eq!((plan.cols, plan.rows), (15, 10));
        assert_eq!(plan.cell_count(), 150);
    }

    #[test]
    fn test_prime_count_degrades_to_strip() {
        let plan = GridPlan::compute(7, 1920, 1080).unwrap();
        assert_eq!(plan.cols * plan.rows, 7);
        // Only 1x7 and 7x1 exist; 1x7 (ratio 0.143, diff 1.64) beats
        // 7x1 (ratio 7.0, diff 5.22) against 1.778.
        assert_eq!((plan.cols, plan.rows), (1, 7));
    }

    #[test]
    fn test_exact_tiling_no_gaps_no_overlap() {
        for &(n, w, h) in &[(150usize, 1920u32, 1080u32), (12, 1000, 700), (30, 801, 601)] {
            let plan = GridPlan::compute(n, w, h).unwrap();
            let mut area = 0i64;
            for i in 0..plan.cell_count() {
                let cell = plan.cell_rect(i);
                assert!(cell.width() > 0 && cell.height() > 0);
                area += cell.width() as i64 * cell.height() as i64;

                // Adjacent cells must share edges exactly.
                let col = i % plan.cols;
                let row = i / plan.cols;
                if col + 1 < plan.cols {
                    assert_eq!(cell.x1, plan.cell_rect(i + 1).x0);
                }
                if row + 1 < plan.rows {
                    assert_eq!(cell.y1, plan.cell_rect(i + plan.cols).y0);
                }
            }
            assert_eq!(area, w as i64 * h as i64, "tiling must cover {}x{} exactly", w, h);
        }
    }

    #[test]
    fn test_far_edges_snap_to_canvas() {
        let plan = GridPlan::compute(30, 801, 601).unwrap();
        let last = plan.cell_count() - 1;
        assert_eq!(plan.cell_rect(last).x1, 801);
        assert_eq!(plan.cell_rect(last).y1, 601);
    }

    #[test]
    fn test_row_major_indexing() {
        let plan = GridPlan::compute(6, 300, 200).unwrap();
        assert_eq!((plan.cols, plan.rows), (3, 2));
        assert_eq!(plan.cell_rect(0).x0, 0);
        assert_eq!(plan.cell_rect(3).y0, 100);
        assert_eq!(plan.cell_rect(4).x0, 100);
    }
}
