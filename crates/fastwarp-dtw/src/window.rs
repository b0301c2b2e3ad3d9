//! Search windows: the subset of cost-matrix cells a solver may evaluate.
//!
//! A window stores, per column, one inclusive row range. Ranges only ever
//! widen. Every constructor guarantees that column 0 covers row 0 and the last
//! column covers the last row, so a complete warp path fits inside.

use std::ops::RangeInclusive;

use tracing::trace;

use crate::error::DtwError;
use crate::path::Cell;

/// Per-column row ranges over an `size_i x size_j` cost matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchWindow {
    ranges: Vec<Option<(usize, usize)>>,
    size_j: usize,
    size: usize,
    revision: u64,
}

/// The eight unit moves applied by one expansion pass, as `(di, dj)`.
const NEIGHBOURS: [(isize, isize); 8] = [
    (-1, 1),
    (0, 1),
    (1, 1),
    (-1, 0),
    (1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

impl SearchWindow {
    /// Create an empty window over a `size_i x size_j` matrix.
    #[must_use]
    pub fn new(size_i: usize, size_j: usize) -> Self {
        Self {
            ranges: vec![None; size_i],
            size_j,
            size: 0,
            revision: 0,
        }
    }

    /// Window covering every cell of the matrix.
    #[must_use]
    pub fn full(size_i: usize, size_j: usize) -> Self {
        let mut window = Self::new(size_i, size_j);
        if size_j > 0 {
            for i in 0..size_i {
                window.mark_visited(i, 0);
                window.mark_visited(i, size_j - 1);
            }
        }
        window
    }

    /// Window following the straight diagonal from `(0, 0)` to the far corner,
    /// widened by `radius`.
    ///
    /// When the column series is the longer one each column maps to the single
    /// row `round(i / ratio)`; otherwise each column covers the run of rows that
    /// projects onto it.
    #[must_use]
    pub fn linear(size_i: usize, size_j: usize, radius: usize) -> Self {
        let mut window = Self::new(size_i, size_j);
        if size_i == 0 || size_j == 0 {
            return window;
        }
        let ratio = size_i as f64 / size_j as f64;
        for i in 0..size_i {
            if size_i >= size_j {
                let j = ((i as f64 / ratio).round() as usize).min(size_j - 1);
                window.mark_visited(i, j);
            } else {
                let min_j = (i as f64 / ratio).round() as usize;
                let max_j = (((i + 1) as f64 / ratio).round() as usize).saturating_sub(1);
                window.mark_visited(i, min_j.min(size_j - 1));
                window.mark_visited(i, max_j.min(size_j - 1));
            }
        }
        window.expand(radius);
        window
    }

    /// Number of columns (length of the first series).
    #[must_use]
    pub fn size_i(&self) -> usize {
        self.ranges.len()
    }

    /// Number of rows (length of the second series).
    #[must_use]
    pub fn size_j(&self) -> usize {
        self.size_j
    }

    /// Index of the last column.
    #[must_use]
    pub fn max_i(&self) -> usize {
        self.ranges.len().saturating_sub(1)
    }

    /// Index of the last row.
    #[must_use]
    pub fn max_j(&self) -> usize {
        self.size_j.saturating_sub(1)
    }

    /// Number of cells inside the window.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Counter bumped by every mutation; used by [`WindowCursor`].
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Lowest row in column `i`, or `None` if the column is empty or out of range.
    #[must_use]
    pub fn min_j_for(&self, i: usize) -> Option<usize> {
        self.ranges.get(i).copied().flatten().map(|(lo, _)| lo)
    }

    /// Highest row in column `i`, or `None` if the column is empty or out of range.
    #[must_use]
    pub fn max_j_for(&self, i: usize) -> Option<usize> {
        self.ranges.get(i).copied().flatten().map(|(_, hi)| hi)
    }

    /// Inclusive row range of column `i`.
    #[must_use]
    pub fn column_range(&self, i: usize) -> Option<RangeInclusive<usize>> {
        self.ranges.get(i).copied().flatten().map(|(lo, hi)| lo..=hi)
    }

    /// Return true if `(i, j)` is inside the window.
    #[must_use]
    pub fn contains(&self, i: usize, j: usize) -> bool {
        self.column_range(i).is_some_and(|r| r.contains(&j))
    }

    /// Widen column `col` so that it includes `row`.
    ///
    /// # Panics
    ///
    /// Panics if `col` is not a column of the matrix.
    pub fn mark_visited(&mut self, col: usize, row: usize) {
        debug_assert!(row < self.size_j, "row {row} outside matrix of {} rows", self.size_j);
        let range = &mut self.ranges[col];
        match range {
            None => {
                *range = Some((row, row));
                self.size += 1;
            }
            Some((lo, _)) if row < *lo => {
                self.size += *lo - row;
                *lo = row;
            }
            Some((_, hi)) if row > *hi => {
                self.size += row - *hi;
                *hi = row;
            }
            Some(_) => return,
        }
        self.revision += 1;
    }

    /// Widen the window by `radius` cells in every direction.
    ///
    /// Runs one pass of radius 1 followed by one pass of radius `radius - 1`.
    /// Each pass works from a snapshot of the cells present before it started.
    /// Moves that would leave the matrix are pulled back along their own
    /// direction until they land on the boundary.
    pub fn expand(&mut self, radius: usize) {
        if radius > 0 {
            self.expand_pass(1);
            self.expand_pass(radius - 1);
        }
    }

    fn expand_pass(&mut self, radius: usize) {
        if radius == 0 || self.size == 0 {
            return;
        }
        let before = self.size;
        let frontier: Vec<Cell> = self.iter().collect();
        let max_i = self.max_i() as isize;
        let max_j = self.max_j() as isize;
        let r = radius as isize;

        for cell in frontier {
            let (ci, cj) = (cell.i as isize, cell.j as isize);
            for (di, dj) in NEIGHBOURS {
                let blocked = (di < 0 && ci == 0)
                    || (di > 0 && ci == max_i)
                    || (dj < 0 && cj == 0)
                    || (dj > 0 && cj == max_j);
                if blocked {
                    continue;
                }
                let ti = ci + di * r;
                let tj = cj + dj * r;
                let over_i = match di {
                    -1 => -ti,
                    1 => ti - max_i,
                    _ => 0,
                };
                let over_j = match dj {
                    -1 => -tj,
                    1 => tj - max_j,
                    _ => 0,
                };
                let past_edge = over_i.max(over_j).max(0);
                self.mark_visited((ti - di * past_edge) as usize, (tj - dj * past_edge) as usize);
            }
        }
        trace!(radius, before, after = self.size, "window expansion pass");
    }

    /// Iterate over the cells column by column, rows increasing within a column.
    ///
    /// The iterator borrows the window, so the window cannot change while it is live.
    #[must_use]
    pub fn iter(&self) -> WindowIter<'_> {
        WindowIter {
            window: self,
            next: self.first_cell(),
            remaining: self.size,
        }
    }

    /// Create a detached cursor that reports [`DtwError::ConcurrentModification`]
    /// if the window changes between calls.
    #[must_use]
    pub fn cursor(&self) -> WindowCursor {
        WindowCursor {
            next: self.first_cell(),
            expected_revision: self.revision,
        }
    }

    fn first_cell(&self) -> Option<Cell> {
        self.next_column_start(0)
    }

    fn next_column_start(&self, from: usize) -> Option<Cell> {
        self.ranges
            .iter()
            .enumerate()
            .skip(from)
            .find_map(|(i, range)| range.map(|(lo, _)| Cell::new(i, lo)))
    }

    fn successor(&self, cell: Cell) -> Option<Cell> {
        match self.max_j_for(cell.i) {
            Some(hi) if cell.j < hi => Some(Cell::new(cell.i, cell.j + 1)),
            _ => self.next_column_start(cell.i + 1),
        }
    }
}

impl<'a> IntoIterator for &'a SearchWindow {
    type Item = Cell;
    type IntoIter = WindowIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Column-major iterator over the cells of a [`SearchWindow`].
#[derive(Debug, Clone)]
pub struct WindowIter<'a> {
    window: &'a SearchWindow,
    next: Option<Cell>,
    remaining: usize,
}

impl Iterator for WindowIter<'_> {
    type Item = Cell;

    fn next(&mut self) -> Option<Cell> {
        let cell = self.next?;
        self.next = self.window.successor(cell);
        self.remaining -= 1;
        Some(cell)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for WindowIter<'_> {}

/// A finite, non-restartable walk over a window that does not hold a borrow.
///
/// Records the window revision at creation and fails if it has changed.
#[derive(Debug, Clone)]
pub struct WindowCursor {
    next: Option<Cell>,
    expected_revision: u64,
}

impl WindowCursor {
    /// Return true if another cell is available.
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    /// Return the next cell of `window`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::ConcurrentModification`] | `window` changed since the cursor was created |
    /// | [`DtwError::NoSuchElement`] | every cell has already been returned |
    pub fn advance(&mut self, window: &SearchWindow) -> Result<Cell, DtwError> {
        if window.revision != self.expected_revision {
            return Err(DtwError::ConcurrentModification {
                expected: self.expected_revision,
                actual: window.revision,
            });
        }
        let cell = self.next.ok_or(DtwError::NoSuchElement)?;
        self.next = window.successor(cell);
        Ok(cell)
    }
}
