//! Cost-matrix storage strategies for the DTW recurrence.
//!
//! Cells outside the associated window read as `T::infinity()`, which is
//! what the recurrence expects for unreachable predecessors.

use crate::value::Value;
use crate::window::SearchWindow;

/// Storage of accumulated costs indexed by `(column, row)`.
pub trait CostMatrix<T> {
    /// Store the accumulated cost of `(col, row)`. The cell must lie inside
    /// the matrix's window.
    fn put(&mut self, col: usize, row: usize, value: T);

    /// Read the accumulated cost of `(col, row)`, or infinity if the cell is
    /// not stored.
    fn get(&self, col: usize, row: usize) -> T;
}

/// Dense `size_i x size_j` table, used by the unwindowed solver.
#[derive(Debug, Clone)]
pub(crate) struct DenseMatrix<T> {
    size_j: usize,
    cells: Vec<T>,
}

impl<T: Value> DenseMatrix<T> {
    pub(crate) fn new(size_i: usize, size_j: usize) -> Self {
        Self {
            size_j,
            cells: vec![T::infinity(); size_i * size_j],
        }
    }
}

impl<T: Value> CostMatrix<T> for DenseMatrix<T> {
    #[inline]
    fn put(&mut self, col: usize, row: usize, value: T) {
        self.cells[col * self.size_j + row] = value;
    }

    #[inline]
    fn get(&self, col: usize, row: usize) -> T {
        if row >= self.size_j {
            return T::infinity();
        }
        self.cells
            .get(col * self.size_j + row)
            .copied()
            .unwrap_or_else(T::infinity)
    }
}

/// Stores every cell of a window in one flat buffer.
///
/// Column `i` occupies `size(i)` consecutive slots starting at a precomputed
/// offset, so `(i, j)` maps to `offset[i] + j - min_j(i)`.
#[derive(Debug, Clone)]
pub struct MemoryResidentMatrix<'w, T> {
    window: &'w SearchWindow,
    offsets: Vec<usize>,
    cells: Vec<T>,
}

impl<'w, T: Value> MemoryResidentMatrix<'w, T> {
    /// Allocate storage for every cell of `window`.
    #[must_use]
    pub fn new(window: &'w SearchWindow) -> Self {
        let mut offsets = Vec::with_capacity(window.size_i());
        let mut next = 0;
        for i in 0..window.size_i() {
            offsets.push(next);
            if let Some(range) = window.column_range(i) {
                next += range.end() - range.start() + 1;
            }
        }
        debug_assert_eq!(next, window.size());
        Self {
            window,
            offsets,
            cells: vec![T::infinity(); window.size()],
        }
    }

    fn index(&self, col: usize, row: usize) -> Option<usize> {
        let range = self.window.column_range(col)?;
        range
            .contains(&row)
            .then(|| self.offsets[col] + row - range.start())
    }
}

impl<T: Value> CostMatrix<T> for MemoryResidentMatrix<'_, T> {
    #[inline]
    fn put(&mut self, col: usize, row: usize, value: T) {
        let index = self.index(col, row);
        debug_assert!(index.is_some(), "cell ({col},{row}) outside window");
        if let Some(index) = index {
            self.cells[index] = value;
        }
    }

    #[inline]
    fn get(&self, col: usize, row: usize) -> T {
        self.index(col, row)
            .map_or_else(T::infinity, |index| self.cells[index])
    }
}

/// Keeps only the current and previous columns of a window.
///
/// Writes must arrive in the window's iteration order: a `put` to a later
/// column advances the matrix, discarding everything before the new
/// previous column. Enough for cost-only solving in `O(column height)` space.
#[derive(Debug, Clone)]
pub struct PartialWindowMatrix<'w, T> {
    window: &'w SearchWindow,
    current_col: Option<usize>,
    current: Vec<T>,
    previous: Vec<T>,
    current_min: usize,
    previous_min: usize,
    has_previous: bool,
}

impl<'w, T: Value> PartialWindowMatrix<'w, T> {
    /// Create an empty two-column store for `window`.
    #[must_use]
    pub fn new(window: &'w SearchWindow) -> Self {
        Self {
            window,
            current_col: None,
            current: Vec::new(),
            previous: Vec::new(),
            current_min: 0,
            previous_min: 0,
            has_previous: false,
        }
    }

    /// Return the column currently being filled.
    #[must_use]
    pub fn current_column(&self) -> Option<usize> {
        self.current_col
    }

    fn advance_to(&mut self, col: usize) {
        debug_assert!(
            self.current_col.is_none_or(|current| col > current),
            "columns must be written in increasing order"
        );
        self.has_previous = self.current_col.is_some_and(|current| current + 1 == col);
        std::mem::swap(&mut self.previous, &mut self.current);
        self.previous_min = self.current_min;

        let (lo, hi) = self
            .window
            .column_range(col)
            .map_or((0, 0), |r| (*r.start(), *r.end()));
        self.current.clear();
        self.current.resize(hi - lo + 1, T::infinity());
        self.current_min = lo;
        self.current_col = Some(col);
    }

    fn lookup(column: &[T], min: usize, row: usize) -> T {
        row.checked_sub(min)
            .and_then(|k| column.get(k))
            .copied()
            .unwrap_or_else(T::infinity)
    }
}

impl<T: Value> CostMatrix<T> for PartialWindowMatrix<'_, T> {
    #[inline]
    fn put(&mut self, col: usize, row: usize, value: T) {
        debug_assert!(self.window.contains(col, row), "cell ({col},{row}) outside window");
        if self.current_col != Some(col) {
            self.advance_to(col);
        }
        if let Some(slot) = row
            .checked_sub(self.current_min)
            .and_then(|k| self.current.get_mut(k))
        {
            *slot = value;
        }
    }

    #[inline]
    fn get(&self, col: usize, row: usize) -> T {
        match self.current_col {
            Some(current) if current == col => Self::lookup(&self.current, self.current_min, row),
            Some(current) if self.has_previous && current == col + 1 => {
                Self::lookup(&self.previous, self.previous_min, row)
            }
            _ => T::infinity(),
        }
    }
}
