//! Warp path and alignment result types.

use std::fmt;

use crate::error::DtwError;

/// A cell of the alignment matrix: column `i` indexes the first series,
/// row `j` indexes the second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    /// Column, i.e. index in the first time series.
    pub i: usize,
    /// Row, i.e. index in the second time series.
    pub j: usize,
}

impl Cell {
    /// Create a cell at column `i`, row `j`.
    #[must_use]
    pub const fn new(i: usize, j: usize) -> Self {
        Self { i, j }
    }
}

impl From<(usize, usize)> for Cell {
    fn from((i, j): (usize, usize)) -> Self {
        Self { i, j }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.i, self.j)
    }
}

/// An ordered, monotone sequence of cells from `(0, 0)` to `(n-1, m-1)`.
///
/// Consecutive cells never decrease in either coordinate and advance by at
/// most one step on each axis.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WarpPath(Vec<Cell>);

impl WarpPath {
    /// Create a path from cells already known to be monotone.
    pub(crate) fn new(cells: Vec<Cell>) -> Self {
        debug_assert!(Self::first_violation(&cells).is_none());
        Self(cells)
    }

    /// Create a path from caller-supplied cells.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::InvalidPath`] | A step decreases an index, skips an index, or repeats a cell |
    pub fn from_cells(cells: Vec<Cell>) -> Result<Self, DtwError> {
        match Self::first_violation(&cells) {
            Some(index) => Err(DtwError::InvalidPath { index }),
            None => Ok(Self(cells)),
        }
    }

    fn first_violation(cells: &[Cell]) -> Option<usize> {
        cells
            .windows(2)
            .position(|pair| {
                let (a, b) = (pair[0], pair[1]);
                let di = b.i.checked_sub(a.i);
                let dj = b.j.checked_sub(a.j);
                !matches!((di, dj), (Some(di), Some(dj)) if di <= 1 && dj <= 1 && di + dj > 0)
            })
            .map(|p| p + 1)
    }

    /// Return cell `index` of the path.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::IndexOutOfRange`] | `index >= len()` |
    pub fn get(&self, index: usize) -> Result<Cell, DtwError> {
        self.0.get(index).copied().ok_or(DtwError::IndexOutOfRange {
            index,
            len: self.0.len(),
        })
    }

    /// Return the cells as a slice.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.0
    }

    /// Iterate over the cells in path order.
    pub fn iter(&self) -> std::slice::Iter<'_, Cell> {
        self.0.iter()
    }

    /// Return the number of cells in the path.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Return true if the path contains no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Smallest column index on the path.
    #[must_use]
    pub fn min_i(&self) -> Option<usize> {
        self.0.first().map(|c| c.i)
    }

    /// Smallest row index on the path.
    #[must_use]
    pub fn min_j(&self) -> Option<usize> {
        self.0.first().map(|c| c.j)
    }

    /// Largest column index on the path.
    #[must_use]
    pub fn max_i(&self) -> Option<usize> {
        self.0.last().map(|c| c.i)
    }

    /// Largest row index on the path.
    #[must_use]
    pub fn max_j(&self) -> Option<usize> {
        self.0.last().map(|c| c.j)
    }

    /// Return every row matched to column `i`, in increasing order.
    #[must_use]
    pub fn matching_indexes_for_i(&self, i: usize) -> Vec<usize> {
        let start = self.0.partition_point(|c| c.i < i);
        self.0[start..]
            .iter()
            .take_while(|c| c.i == i)
            .map(|c| c.j)
            .collect()
    }

    /// Return every column matched to row `j`, in increasing order.
    #[must_use]
    pub fn matching_indexes_for_j(&self, j: usize) -> Vec<usize> {
        let start = self.0.partition_point(|c| c.j < j);
        self.0[start..]
            .iter()
            .take_while(|c| c.j == j)
            .map(|c| c.i)
            .collect()
    }

    /// Swap the roles of the two series in place.
    pub fn invert(&mut self) {
        for cell in &mut self.0 {
            std::mem::swap(&mut cell.i, &mut cell.j);
        }
    }

    /// Return a copy with the roles of the two series swapped.
    #[must_use]
    pub fn inverted_copy(&self) -> Self {
        let mut copy = self.clone();
        copy.invert();
        copy
    }
}

impl<'a> IntoIterator for &'a WarpPath {
    type Item = &'a Cell;
    type IntoIter = std::slice::Iter<'a, Cell>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for WarpPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (k, cell) in self.0.iter().enumerate() {
            if k > 0 {
                f.write_str(",")?;
            }
            write!(f, "{cell}")?;
        }
        f.write_str("]")
    }
}

/// Minimum alignment cost paired with the warp path that achieves it.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeWarpInfo<T> {
    distance: T,
    path: WarpPath,
}

impl<T: Copy> TimeWarpInfo<T> {
    pub(crate) fn new(distance: T, path: WarpPath) -> Self {
        Self { distance, path }
    }

    /// Return the accumulated cost along the path.
    #[must_use]
    pub fn distance(&self) -> T {
        self.distance
    }

    /// Return the warp path.
    #[must_use]
    pub fn path(&self) -> &WarpPath {
        &self.path
    }

    /// Consume and return `(distance, path)`.
    #[must_use]
    pub fn into_parts(self) -> (T, WarpPath) {
        (self.distance, self.path)
    }
}
