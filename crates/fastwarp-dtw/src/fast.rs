//! Multiresolution FastDTW approximation.
//!
//! Both series are halved with PAA until one of them is no longer than
//! `radius + 2`, solved exactly there, and the resulting path is projected
//! back up one level at a time. At each level the projected path, widened by
//! `radius`, is the only region the windowed solver evaluates.

use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::distance::{DistanceFunction, Euclidean};
use crate::dtw::Dtw;
use crate::error::DtwError;
use crate::paa::Paa;
use crate::pairwise::DistanceMatrix;
use crate::path::{TimeWarpInfo, WarpPath};
use crate::series::TimeSeries;
use crate::value::Value;
use crate::window::SearchWindow;

/// Search radius used when none is configured.
pub const DEFAULT_RADIUS: usize = 1;

/// Ratio between the lengths of consecutive resolution levels.
const RESOLUTION_FACTOR: usize = 2;

/// FastDTW configuration. Thread-safe and cheap to copy.
///
/// # Defaults
///
/// | Parameter | Default |
/// |-----------|---------|
/// | `radius`  | [`DEFAULT_RADIUS`] (1) |
///
/// The same radius applies at every resolution level. Larger radii trade
/// speed for accuracy; once `radius + 2` reaches the shorter series' length
/// the result is exact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FastDtw<D = Euclidean> {
    radius: usize,
    dtw: Dtw<D>,
}

impl<D> FastDtw<D> {
    /// Create a FastDTW aligner using `distance` between points and the default radius.
    #[must_use]
    pub fn new(distance: D) -> Self {
        Self {
            radius: DEFAULT_RADIUS,
            dtw: Dtw::new(distance),
        }
    }

    /// Set the search radius. Negative values are clamped to 0.
    #[must_use]
    pub fn with_radius(mut self, radius: isize) -> Self {
        self.radius = radius.max(0).unsigned_abs();
        self
    }

    /// Return the search radius.
    #[must_use]
    pub fn radius(&self) -> usize {
        self.radius
    }

    /// Return the length at or below which a series is solved exactly.
    #[must_use]
    pub fn min_series_len(&self) -> usize {
        self.radius + 2
    }

    /// Return the underlying exact/windowed solver.
    #[must_use]
    pub fn dtw(&self) -> &Dtw<D> {
        &self.dtw
    }

    /// Approximate the minimum alignment cost and warp path.
    ///
    /// Runs in O(n) time and space when the optimal path stays within
    /// `radius` of the projected path at every level.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::EmptySeries`] | Either series has no points |
    /// | [`DtwError::DimensionMismatch`] | The series have different dimensions |
    #[instrument(skip_all, fields(n = a.len(), m = b.len(), radius = self.radius))]
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
        self.solve(a, b, 0)
    }

    /// Approximate the minimum alignment cost only.
    ///
    /// Lower levels still need their paths, but the finest level is solved
    /// with a two-column store instead of a full window matrix.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::EmptySeries`] | Either series has no points |
    /// | [`DtwError::DimensionMismatch`] | The series have different dimensions |
    #[instrument(skip_all, fields(n = a.len(), m = b.len(), radius = self.radius))]
    pub fn warp_distance<T>(&self, a: &TimeSeries<T>, b: &TimeSeries<T>) -> Result<T, DtwError>
    where
        T: Value,
        D: DistanceFunction<T>,
    {
        a.ensure_alignable(b)?;
        if self.is_base_case(a, b) {
            return self.dtw.warp_distance(a, b);
        }
        let window = self.refine_window(a, b, 0)?;
        self.dtw.warp_distance_in_window(a, b, &window)
    }

    /// Approximate warp path only.
    ///
    /// # Errors
    ///
    /// Same as [`warp_info`][Self::warp_info].
    pub fn warp_path<T>(&self, a: &TimeSeries<T>, b: &TimeSeries<T>) -> Result<WarpPath, DtwError>
    where
        T: Value,
        D: DistanceFunction<T>,
    {
        self.warp_info(a, b).map(|info| info.into_parts().1)
    }

    /// Compute approximate pairwise costs for a collection of series.
    ///
    /// Returns a symmetric [`DistanceMatrix`] over all unique pairs.
    /// Pairs are aligned in parallel with rayon; each alignment owns its windows
    /// and matrices.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::EmptySeries`] | Any series has no points |
    /// | [`DtwError::DimensionMismatch`] | The series do not all share one dimension |
    #[instrument(skip_all, fields(n = series.len(), radius = self.radius))]
    pub fn pairwise<T>(&self, series: &[TimeSeries<T>]) -> Result<DistanceMatrix<T>, DtwError>
    where
        T: Value,
        D: DistanceFunction<T>,
    {
        let n = series.len();
        let total_pairs = n * n.saturating_sub(1) / 2;

        // Compute lower triangle in parallel
        let distances = (0..total_pairs)
            .into_par_iter()
            .map(|flat_idx| {
                // flat_idx = i*(i-1)/2 + j with i > j
                let i = ((1.0 + (1.0 + 8.0 * flat_idx as f64).sqrt()) / 2.0).floor() as usize;
                let j = flat_idx - i * (i - 1) / 2;
                self.warp_distance(&series[i], &series[j])
            })
            .collect::<Result<Vec<T>, DtwError>>()?;

        Ok(DistanceMatrix::from_raw(n, distances))
    }

    fn is_base_case<T: Value>(&self, a: &TimeSeries<T>, b: &TimeSeries<T>) -> bool {
        a.len().min(b.len()) <= self.min_series_len()
    }

    fn solve<T>(
        &self,
        a: &TimeSeries<T>,
        b: &TimeSeries<T>,
        depth: usize,
    ) -> Result<TimeWarpInfo<T>, DtwError>
    where
        T: Value,
        D: DistanceFunction<T>,
    {
        if self.is_base_case(a, b) {
            debug!(depth, n = a.len(), m = b.len(), "exact DTW at coarsest level");
            return self.dtw.warp_info(a, b);
        }
        let window = self.refine_window(a, b, depth)?;
        self.dtw.warp_info_in_window(a, b, &window)
    }

    /// Solve one level down and project its path onto this level's window.
    fn refine_window<T>(
        &self,
        a: &TimeSeries<T>,
        b: &TimeSeries<T>,
        depth: usize,
    ) -> Result<SearchWindow, DtwError>
    where
        T: Value,
        D: DistanceFunction<T>,
    {
        let shrunk_a = Paa::new(a, a.len() / RESOLUTION_FACTOR)?;
        let shrunk_b = Paa::new(b, b.len() / RESOLUTION_FACTOR)?;
        let coarse = self.solve(shrunk_a.as_series(), shrunk_b.as_series(), depth + 1)?;
        let window = SearchWindow::expanded_resolution(
            a,
            b,
            &shrunk_a,
            &shrunk_b,
            coarse.path(),
            self.radius,
        );
        debug!(
            depth,
            n = a.len(),
            m = b.len(),
            cells = window.size(),
            "projected window"
        );
        Ok(window)
    }
}

/// Approximate alignment of `a` and `b` with the given radius and distance.
///
/// Shorthand for `FastDtw::new(distance).with_radius(radius).warp_info(a, b)`.
///
/// # Errors
///
/// See [`FastDtw::warp_info`].
pub fn warp_info_between<T, D>(
    a: &TimeSeries<T>,
    b: &TimeSeries<T>,
    radius: isize,
    distance: D,
) -> Result<TimeWarpInfo<T>, DtwError>
where
    T: Value,
    D: DistanceFunction<T>,
{
    FastDtw::new(distance).with_radius(radius).warp_info(a, b)
}

/// Approximate alignment cost of `a` and `b` with the given radius and distance.
///
/// Shorthand for `FastDtw::new(distance).with_radius(radius).warp_distance(a, b)`.
///
/// # Errors
///
/// See [`FastDtw::warp_distance`].
pub fn warp_distance_between<T, D>(
    a: &TimeSeries<T>,
    b: &TimeSeries<T>,
    radius: isize,
    distance: D,
) -> Result<T, DtwError>
where
    T: Value,
    D: DistanceFunction<T>,
{
    FastDtw::new(distance).with_radius(radius).warp_distance(a, b)
}
