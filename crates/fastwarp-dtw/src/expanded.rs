//! Projection of a low-resolution warp path onto a full-resolution window.

use crate::paa::Paa;
use crate::path::WarpPath;
use crate::series::TimeSeries;
use crate::value::Value;
use crate::window::SearchWindow;

impl SearchWindow {
    /// Build the full-resolution window implied by a warp path computed
    /// between two PAA-shrunk series, widened by `radius`.
    ///
    /// Every low-resolution cell `(wi, wj)` stands for a block of
    /// `aggregate_size(wi) x aggregate_size(wj)` full-resolution cells. The
    /// bottom and top rows of each block are marked (column ranges fill in the
    /// interior). On a diagonal move of the low-resolution path the two hinge
    /// cells between consecutive blocks are also marked, so blocks never touch
    /// only at a corner:
    ///
    /// ```text
    ///   |_|_|x|x|        |_|_|x|x|
    ///   |_|_|x|x|   ->   |_|X|x|x|
    ///   |x|x|_|_|        |x|x|X|_|
    ///   |x|x|_|_|        |x|x|_|_|
    /// ```
    #[must_use]
    pub fn expanded_resolution<T: Value>(
        series_i: &TimeSeries<T>,
        series_j: &TimeSeries<T>,
        shrunk_i: &Paa<T>,
        shrunk_j: &Paa<T>,
        shrunk_path: &WarpPath,
        radius: usize,
    ) -> Self {
        debug_assert_eq!(shrunk_i.original_len(), series_i.len());
        debug_assert_eq!(shrunk_j.original_len(), series_j.len());

        let mut window = Self::new(series_i.len(), series_j.len());
        let mut current_i = shrunk_path.min_i().unwrap_or(0);
        let mut current_j = shrunk_path.min_j().unwrap_or(0);
        let mut last: Option<(usize, usize)> = None;

        for cell in shrunk_path {
            let (wi, wj) = (cell.i, cell.j);
            let block_i = shrunk_i.aggregate_size(wi);
            let block_j = shrunk_j.aggregate_size(wj);

            let mut moved_i = false;
            let mut moved_j = false;
            if let Some((last_i, last_j)) = last {
                if wj > last_j {
                    current_j += shrunk_j.aggregate_size(last_j);
                    moved_j = true;
                }
                if wi > last_i {
                    current_i += shrunk_i.aggregate_size(last_i);
                    moved_i = true;
                }
            }

            if moved_i && moved_j {
                window.mark_visited(current_i - 1, current_j);
                window.mark_visited(current_i, current_j - 1);
            }

            for x in 0..block_i {
                window.mark_visited(current_i + x, current_j);
                window.mark_visited(current_i + x, current_j + block_j - 1);
            }

            last = Some((wi, wj));
        }

        window.expand(radius);
        window
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::Cell;

    fn ramp(n: usize) -> TimeSeries<f64> {
        TimeSeries::from_values((0..n).map(|i| i as f64).collect()).unwrap()
    }

    fn diagonal_path(n: usize) -> WarpPath {
        WarpPath::from_cells((0..n).map(|k| Cell::new(k, k)).collect()).unwrap()
    }

    #[test]
    fn diagonal_projection_without_radius() {
        let a = ramp(4);
        let b = ramp(4);
        let sa = Paa::new(&a, 2).unwrap();
        let sb = Paa::new(&b, 2).unwrap();
        let w = SearchWindow::expanded_resolution(&a, &b, &sa, &sb, &diagonal_path(2), 0);
        // two 2x2 blocks plus hinge cells (1,2) and (2,1)
        assert_eq!(w.column_range(0), Some(0..=1));
        assert_eq!(w.column_range(1), Some(0..=2));
        assert_eq!(w.column_range(2), Some(1..=3));
        assert_eq!(w.column_range(3), Some(2..=3));
        assert_eq!(w.size(), 10);
    }

    #[test]
    fn projection_covers_corners() {
        let a = ramp(7);
        let b = ramp(5);
        let sa = Paa::new(&a, 3).unwrap();
        let sb = Paa::new(&b, 2).unwrap();
        let path = WarpPath::from_cells(vec![
            Cell::new(0, 0),
            Cell::new(1, 0),
            Cell::new(2, 1),
        ])
        .unwrap();
        let w = SearchWindow::expanded_resolution(&a, &b, &sa, &sb, &path, 0);
        assert!(w.contains(0, 0));
        assert!(w.contains(6, 4));
        for i in 0..7 {
            assert!(w.column_range(i).is_some(), "column {i} empty");
        }
    }

    #[test]
    fn radius_widens_projection() {
        let a = ramp(8);
        let b = ramp(8);
        let sa = Paa::new(&a, 4).unwrap();
        let sb = Paa::new(&b, 4).unwrap();
        let narrow = SearchWindow::expanded_resolution(&a, &b, &sa, &sb, &diagonal_path(4), 0);
        let wide = SearchWindow::expanded_resolution(&a, &b, &sa, &sb, &diagonal_path(4), 1);
        assert!(wide.size() > narrow.size());
        for cell in &narrow {
            assert!(wide.contains(cell.i, cell.j));
        }
    }
}
