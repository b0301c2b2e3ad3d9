//! Exact and windowed DTW solvers.
//!
//! All solvers share the recurrence
//!
//! ```text
//! C(0,0) = d(0,0)
//! C(i,0) = d(i,0) + C(i-1,0)
//! C(0,j) = d(0,j) + C(0,j-1)
//! C(i,j) = d(i,j) + min(C(i-1,j), C(i-1,j-1), C(i,j-1))
//! ```
//!
//! where column `i` indexes the first series and row `j` the second.

use tracing::instrument;

use crate::cost::{CostMatrix, DenseMatrix, MemoryResidentMatrix, PartialWindowMatrix};
use crate::distance::{DistanceFunction, Euclidean};
use crate::error::DtwError;
use crate::path::{Cell, TimeWarpInfo, WarpPath};
use crate::series::TimeSeries;
use crate::value::Value;
use crate::window::SearchWindow;

/// Immutable DTW solver configured with a point distance. Thread-safe and cheap to copy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Dtw<D = Euclidean> {
    distance: D,
}

impl<D> Dtw<D> {
    /// Create a solver using `distance` between points.
    #[must_use]
    pub fn new(distance: D) -> Self {
        Self { distance }
    }

    /// Return the point distance function.
    #[must_use]
    pub fn distance_function(&self) -> &D {
        &self.distance
    }

    /// Compute the exact minimum alignment cost and its warp path.
    ///
    /// Fills the full `n x m` cost matrix, then backtracks from `(n-1, m-1)`.
    /// Runs in O(n * m) time and space.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::EmptySeries`] | Either series has no points |
    /// | [`DtwError::DimensionMismatch`] | The series have different dimensions |
    #[instrument(skip_all, fields(n = a.len(), m = b.len()))]
    pub fn warp_info<T>(
        &self,
        a: &TimeSeries<T>,
        b: &TimeSeries<T>,
    ) -> Result<TimeWarpInfo<T>, DtwError>
    where
        T: Value,
        D: DistanceFunction<T>,
    {
        a.ensure_alignable(b)?;
        let (n, m) = (a.len(), b.len());
        let mut matrix = DenseMatrix::new(n, m);
        for i in 0..n {
            for j in 0..m {
                let local = self.distance.distance(a.values(i), b.values(j));
                let cost = accumulate(&matrix, i, j, local);
                matrix.put(i, j, cost);
            }
        }
        let cost = matrix.get(n - 1, m - 1);
        Ok(TimeWarpInfo::new(cost, backtrack(&matrix, n - 1, m - 1)))
    }

    /// Compute the exact minimum alignment cost without the warp path.
    ///
    /// Keeps only two columns alive. The longer series is put on the column
    /// axis so the columns have the length of the shorter one: O(n * m) time,
    /// O(min(n, m)) space.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::EmptySeries`] | Either series has no points |
    /// | [`DtwError::DimensionMismatch`] | The series have different dimensions |
    #[instrument(skip_all, fields(n = a.len(), m = b.len()))]
    pub fn warp_distance<T>(&self, a: &TimeSeries<T>, b: &TimeSeries<T>) -> Result<T, DtwError>
    where
        T: Value,
        D: DistanceFunction<T>,
    {
        a.ensure_alignable(b)?;
        let (long, short) = if a.len() >= b.len() { (a, b) } else { (b, a) };
        let m = short.len();

        let mut prev = vec![T::infinity(); m];
        let mut curr = vec![T::infinity(); m];

        curr[0] = self.distance.distance(long.values(0), short.values(0));
        for j in 1..m {
            curr[j] = curr[j - 1] + self.distance.distance(long.values(0), short.values(j));
        }

        for i in 1..long.len() {
            std::mem::swap(&mut prev, &mut curr);
            curr[0] = prev[0] + self.distance.distance(long.values(i), short.values(0));
            for j in 1..m {
                let best = prev[j].min(prev[j - 1].min(curr[j - 1]));
                curr[j] = best + self.distance.distance(long.values(i), short.values(j));
            }
        }

        Ok(curr[m - 1])
    }

    /// Compute the minimum alignment cost and warp path restricted to `window`.
    ///
    /// Only window cells are evaluated, in the window's column-major order,
    /// and stored in a [`MemoryResidentMatrix`]. Cells outside the window
    /// count as unreachable.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::EmptySeries`] | Either series has no points |
    /// | [`DtwError::DimensionMismatch`] | The series have different dimensions |
    /// | [`DtwError::WindowShapeMismatch`] | `window` was not built for these lengths |
    #[instrument(skip_all, fields(n = a.len(), m = b.len(), cells = window.size()))]
    pub fn warp_info_in_window<T>(
        &self,
        a: &TimeSeries<T>,
        b: &TimeSeries<T>,
        window: &SearchWindow,
    ) -> Result<TimeWarpInfo<T>, DtwError>
    where
        T: Value,
        D: DistanceFunction<T>,
    {
        a.ensure_alignable(b)?;
        ensure_window_shape(a, b, window)?;
        let mut matrix = MemoryResidentMatrix::new(window);
        self.fill_window(a, b, window, &mut matrix);
        let (max_i, max_j) = (a.len() - 1, b.len() - 1);
        let cost = matrix.get(max_i, max_j);
        Ok(TimeWarpInfo::new(cost, backtrack(&matrix, max_i, max_j)))
    }

    /// Compute the minimum alignment cost restricted to `window`, without the path.
    ///
    /// Uses a [`PartialWindowMatrix`], so memory is bounded by the two tallest
    /// adjacent window columns.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::EmptySeries`] | Either series has no points |
    /// | [`DtwError::DimensionMismatch`] | The series have different dimensions |
    /// | [`DtwError::WindowShapeMismatch`] | `window` was not built for these lengths |
    #[instrument(skip_all, fields(n = a.len(), m = b.len(), cells = window.size()))]
    pub fn warp_distance_in_window<T>(
        &self,
        a: &TimeSeries<T>,
        b: &TimeSeries<T>,
        window: &SearchWindow,
    ) -> Result<T, DtwError>
    where
        T: Value,
        D: DistanceFunction<T>,
    {
        a.ensure_alignable(b)?;
        ensure_window_shape(a, b, window)?;
        let mut matrix = PartialWindowMatrix::new(window);
        self.fill_window(a, b, window, &mut matrix);
        Ok(matrix.get(a.len() - 1, b.len() - 1))
    }

    /// Sum the point distances along an existing warp path.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::DimensionMismatch`] | The series have different dimensions |
    /// | [`DtwError::IndexOutOfRange`] | A path cell lies outside either series |
    pub fn path_cost<T>(
        &self,
        path: &WarpPath,
        a: &TimeSeries<T>,
        b: &TimeSeries<T>,
    ) -> Result<T, DtwError>
    where
        T: Value,
        D: DistanceFunction<T>,
    {
        if a.dimension() != b.dimension() {
            return Err(DtwError::DimensionMismatch {
                expected: a.dimension(),
                actual: b.dimension(),
            });
        }
        path.iter().try_fold(T::zero(), |total, cell| -> Result<T, DtwError> {
            let pa = a.point(cell.i)?;
            let pb = b.point(cell.j)?;
            Ok(total + self.distance.distance(pa.as_slice(), pb.as_slice()))
        })
    }

    /// Run the recurrence over every window cell in iteration order.
    ///
    /// Column-major order with increasing rows emits all three predecessors
    /// of a cell before the cell itself.
    pub(crate) fn fill_window<T, M>(
        &self,
        a: &TimeSeries<T>,
        b: &TimeSeries<T>,
        window: &SearchWindow,
        matrix: &mut M,
    ) where
        T: Value,
        D: DistanceFunction<T>,
        M: CostMatrix<T>,
    {
        for cell in window {
            let local = self.distance.distance(a.values(cell.i), b.values(cell.j));
            let cost = accumulate(matrix, cell.i, cell.j, local);
            matrix.put(cell.i, cell.j, cost);
        }
    }
}

fn ensure_window_shape<T: Value>(
    a: &TimeSeries<T>,
    b: &TimeSeries<T>,
    window: &SearchWindow,
) -> Result<(), DtwError> {
    if window.size_i() != a.len() || window.size_j() != b.len() {
        return Err(DtwError::WindowShapeMismatch {
            window_i: window.size_i(),
            window_j: window.size_j(),
            series_i: a.len(),
            series_j: b.len(),
        });
    }
    Ok(())
}

/// Accumulated cost of `(i, j)` given its local distance.
#[inline]
fn accumulate<T: Value, M: CostMatrix<T>>(matrix: &M, i: usize, j: usize, local: T) -> T {
    match (i, j) {
        (0, 0) => local,
        (0, _) => local + matrix.get(0, j - 1),
        (_, 0) => local + matrix.get(i - 1, 0),
        _ => {
            let best = matrix
                .get(i - 1, j)
                .min(matrix.get(i - 1, j - 1).min(matrix.get(i, j - 1)));
            local + best
        }
    }
}

/// Walk back from `(max_i, max_j)` to `(0, 0)` along minimum-cost predecessors.
///
/// Tie-break order: diagonal if it is no worse than both others; else the
/// column predecessor `(i-1, j)` if strictly best; else the row predecessor
/// `(i, j-1)` if strictly best; else, on a column/row tie, step the row when
/// `i <= j` and the column otherwise, which pulls the path toward `i == j`.
pub(crate) fn backtrack<T: Value, M: CostMatrix<T>>(
    matrix: &M,
    max_i: usize,
    max_j: usize,
) -> WarpPath {
    let mut cells = Vec::with_capacity(max_i + max_j + 1);
    let (mut i, mut j) = (max_i, max_j);
    cells.push(Cell::new(i, j));

    while i > 0 || j > 0 {
        let diag = if i > 0 && j > 0 {
            matrix.get(i - 1, j - 1)
        } else {
            T::infinity()
        };
        let column = if i > 0 {
            matrix.get(i - 1, j)
        } else {
            T::infinity()
        };
        let row = if j > 0 {
            matrix.get(i, j - 1)
        } else {
            T::infinity()
        };

        if i > 0 && j > 0 && diag <= column && diag <= row {
            i -= 1;
            j -= 1;
        } else if column < diag && column < row {
            i -= 1;
        } else if row < diag && row < column {
            j -= 1;
        } else if i <= j {
            j -= 1;
        } else {
            i -= 1;
        }
        cells.push(Cell::new(i, j));
    }

    cells.reverse();
    WarpPath::new(cells)
}
