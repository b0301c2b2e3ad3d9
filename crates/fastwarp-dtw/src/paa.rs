//! Piecewise Aggregate Approximation: block-averaged downsampling.

use tracing::trace;

use crate::error::DtwError;
use crate::series::{TimeSeries, TimeSeriesPoint};
use crate::value::Value;

/// A shrunk copy of a time series where each point is the mean of a
/// contiguous block of source points.
///
/// Block `k` covers source indices
/// `round(n/s * k) .. round(n/s * (k+1))` for source length `n` and shrunk
/// size `s`, so the blocks partition the source without gaps or overlap.
#[derive(Debug, Clone, PartialEq)]
pub struct Paa<T> {
    series: TimeSeries<T>,
    aggregate_sizes: Vec<usize>,
    original_len: usize,
}

impl<T: Value> Paa<T> {
    /// Shrink `source` to `shrunk_size` points.
    ///
    /// Each output point's time and values are the arithmetic means over its block.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::InvalidShrunkSize`] | `shrunk_size` is zero or greater than `source.len()` |
    pub fn new(source: &TimeSeries<T>, shrunk_size: usize) -> Result<Self, DtwError> {
        let original_len = source.len();
        if shrunk_size == 0 || shrunk_size > original_len {
            return Err(DtwError::InvalidShrunkSize {
                requested: shrunk_size,
                original: original_len,
            });
        }

        let mut series = TimeSeries::new(source.dimension())?;
        series.set_labels(source.labels().to_vec())?;
        let mut aggregate_sizes = Vec::with_capacity(shrunk_size);

        let ratio = original_len as f64 / shrunk_size as f64;
        // one pass over the source, each block draws the next `count` rows
        let mut rows = source.iter();
        let mut from = 0;
        for k in 0..shrunk_size {
            let to = if k + 1 == shrunk_size {
                original_len
            } else {
                ((ratio * (k + 1) as f64).round() as usize).min(original_len)
            };
            let count = to - from;

            let mut time_sum = T::zero();
            let mut sums = vec![T::zero(); source.dimension()];
            for (time, values) in rows.by_ref().take(count) {
                time_sum = time_sum + time;
                for (sum, &v) in sums.iter_mut().zip(values) {
                    *sum = *sum + v;
                }
            }
            let n = T::from_count(count);
            let means = sums.into_iter().map(|s| s / n).collect();
            series.add_last(time_sum / n, TimeSeriesPoint::new(means))?;
            aggregate_sizes.push(count);
            from = to;
        }

        trace!(original_len, shrunk_size, "PAA built");
        Ok(Self {
            series,
            aggregate_sizes,
            original_len,
        })
    }

    /// Return how many source points were averaged into output point `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    #[must_use]
    pub fn aggregate_size(&self, index: usize) -> usize {
        self.aggregate_sizes[index]
    }

    /// Return all block sizes in output order.
    #[must_use]
    pub fn aggregate_sizes(&self) -> &[usize] {
        &self.aggregate_sizes
    }

    /// Return the length of the source series.
    #[must_use]
    pub fn original_len(&self) -> usize {
        self.original_len
    }

    /// Return the number of output points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// Return true if there are no output points. Never true for a constructed PAA.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Borrow the shrunk series.
    #[must_use]
    pub fn as_series(&self) -> &TimeSeries<T> {
        &self.series
    }

    /// Consume and return the shrunk series.
    #[must_use]
    pub fn into_series(self) -> TimeSeries<T> {
        self.series
    }
}

impl<T> AsRef<TimeSeries<T>> for Paa<T> {
    fn as_ref(&self) -> &TimeSeries<T> {
        &self.series
    }
}
