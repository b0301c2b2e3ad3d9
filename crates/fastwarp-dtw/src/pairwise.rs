//! Symmetric matrix of pairwise alignment costs.

use crate::value::Value;

/// Pairwise alignment costs stored as a lower-triangular flat vector.
///
/// For `n` series, stores `n*(n-1)/2` costs. Access is symmetric:
/// `get(i, j) == get(j, i)`, and the diagonal reads as zero.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix<T> {
    n: usize,
    data: Vec<T>,
}

impl<T: Value> DistanceMatrix<T> {
    /// `data` holds `n*(n-1)/2` costs laid out as `data[row*(row-1)/2 + col]`
    /// with `row > col`.
    pub(crate) fn from_raw(n: usize, data: Vec<T>) -> Self {
        debug_assert_eq!(data.len(), n * n.saturating_sub(1) / 2);
        Self { n, data }
    }

    /// Return the number of series in the matrix.
    #[must_use]
    pub fn len(&self) -> usize {
        self.n
    }

    /// Return true if the matrix covers no series.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Return the cost between series `i` and series `j`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= n` or `j >= n`.
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> T {
        assert!(i < self.n, "row index {i} out of bounds for matrix of size {}", self.n);
        assert!(j < self.n, "column index {j} out of bounds for matrix of size {}", self.n);
        if i == j {
            return T::zero();
        }
        let (row, col) = if i > j { (i, j) } else { (j, i) };
        self.data[row * (row - 1) / 2 + col]
    }

    /// Iterate over all unique pairs `(i, j, cost)` with `i > j`.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, T)> + '_ {
        (1..self.n).flat_map(move |i| (0..i).map(move |j| (i, j, self.data[i * (i - 1) / 2 + j])))
    }

    /// Return the costs from series `i` to every series, itself included.
    #[must_use]
    pub fn row(&self, i: usize) -> Vec<T> {
        (0..self.n).map(|j| self.get(i, j)).collect()
    }

    /// Return the index of the series closest to `i`, excluding `i` itself.
    ///
    /// Ties resolve to the lowest index. `None` when the matrix has fewer than
    /// two series.
    #[must_use]
    pub fn nearest(&self, i: usize) -> Option<(usize, T)> {
        (0..self.n)
            .filter(|&j| j != i)
            .map(|j| (j, self.get(i, j)))
            .fold(None, |best, (j, d)| match best {
                Some((_, bd)) if bd <= d => best,
                _ => Some((j, d)),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_matrix() -> DistanceMatrix<f64> {
        // Layout: (1,0), (2,0), (2,1), (3,0), (3,1), (3,2)
        DistanceMatrix::from_raw(4, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0])
    }

    #[test]
    fn diagonal_is_zero() {
        let m = make_matrix();
        for i in 0..4 {
            assert_eq!(m.get(i, i), 0.0);
        }
    }

    #[test]
    fn symmetric_access() {
        let m = make_matrix();
        for i in 0..4 {
            for j in 0..4 {
                assert_eq!(m.get(i, j), m.get(j, i));
            }
        }
        assert_eq!(m.get(3, 1), 5.0);
        assert_eq!(m.get(1, 2), 3.0);
    }

    #[test]
    fn iter_yields_lower_triangle() {
        let m = make_matrix();
        let pairs: Vec<_> = m.iter().collect();
        assert_eq!(pairs.len(), 6);
        assert_eq!(pairs[0], (1, 0, 1.0));
        assert_eq!(pairs[5], (3, 2, 6.0));
    }

    #[test]
    fn row_costs() {
        assert_eq!(make_matrix().row(0), vec![0.0, 1.0, 2.0, 4.0]);
    }

    #[test]
    fn nearest_neighbour() {
        let m = make_matrix();
        assert_eq!(m.nearest(0), Some((1, 1.0)));
        assert_eq!(m.nearest(3), Some((0, 4.0)));
        let single = DistanceMatrix::<f64>::from_raw(1, Vec::new());
        assert_eq!(single.nearest(0), None);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn get_out_of_bounds_panics() {
        let _ = make_matrix().get(4, 0);
    }
}
