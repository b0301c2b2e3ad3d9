//! Timestamped multi-dimensional time series with validation guarantees.

use std::collections::VecDeque;
use std::ops::Index;

use crate::error::DtwError;
use crate::value::Value;

/// An immutable measurement vector. Its length is the point's dimensionality.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeriesPoint<T>(Box<[T]>);

impl<T: Value> TimeSeriesPoint<T> {
    /// Create a point from its measurement values.
    #[must_use]
    pub fn new(values: Vec<T>) -> Self {
        Self(values.into_boxed_slice())
    }

    /// Return the measurement values as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.0
    }

    /// Return the number of measurement values.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.0.len()
    }
}

impl<T: Value> From<Vec<T>> for TimeSeriesPoint<T> {
    fn from(values: Vec<T>) -> Self {
        Self::new(values)
    }
}

impl<T> AsRef<[T]> for TimeSeriesPoint<T> {
    fn as_ref(&self) -> &[T] {
        &self.0
    }
}

impl<T> Index<usize> for TimeSeriesPoint<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

/// Owned, validated time series of fixed-dimension points.
///
/// Times are strictly increasing and every point has exactly
/// [`dimension`][Self::dimension] values, all finite. Built incrementally with
/// [`add_last`][Self::add_last] / [`add_first`][Self::add_first].
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries<T> {
    dimension: usize,
    labels: Vec<String>,
    times: VecDeque<T>,
    points: VecDeque<TimeSeriesPoint<T>>,
}

impl<T: Value> TimeSeries<T> {
    /// Create an empty series whose points will have `dimension` values.
    ///
    /// Labels default to `["Time", "c1", .., "cD"]`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::ZeroDimension`] | `dimension` is zero |
    pub fn new(dimension: usize) -> Result<Self, DtwError> {
        if dimension == 0 {
            return Err(DtwError::ZeroDimension);
        }
        let labels = std::iter::once("Time".to_owned())
            .chain((1..=dimension).map(|d| format!("c{d}")))
            .collect();
        Ok(Self {
            dimension,
            labels,
            times: VecDeque::new(),
            points: VecDeque::new(),
        })
    }

    /// Build a one-dimensional series from raw values, timestamped `0, 1, 2, ..`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::EmptySeries`] | `values` is empty |
    /// | [`DtwError::NonFiniteValue`] | Any value is NaN or infinite |
    pub fn from_values(values: Vec<T>) -> Result<Self, DtwError> {
        Self::from_rows(1, values.into_iter().map(|v| vec![v]))
    }

    /// Build a series of `dimension`-valued rows, timestamped `0, 1, 2, ..`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::ZeroDimension`] | `dimension` is zero |
    /// | [`DtwError::EmptySeries`] | `rows` is empty |
    /// | [`DtwError::DimensionMismatch`] | A row does not have `dimension` values |
    /// | [`DtwError::NonFiniteValue`] | Any value is NaN or infinite |
    pub fn from_rows<I>(dimension: usize, rows: I) -> Result<Self, DtwError>
    where
        I: IntoIterator<Item = Vec<T>>,
    {
        let mut series = Self::new(dimension)?;
        for (index, row) in rows.into_iter().enumerate() {
            series.add_last(T::from_count(index), TimeSeriesPoint::new(row))?;
        }
        if series.is_empty() {
            return Err(DtwError::EmptySeries);
        }
        Ok(series)
    }

    /// Append a point after the current last point.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::DimensionMismatch`] | `point` does not have [`dimension`][Self::dimension] values |
    /// | [`DtwError::NonIncreasingTime`] | `time` is not greater than the current last time |
    /// | [`DtwError::NonFiniteValue`] | `time` or a value is NaN or infinite |
    pub fn add_last(&mut self, time: T, point: TimeSeriesPoint<T>) -> Result<(), DtwError> {
        let index = self.len();
        self.validate(index, time, &point)?;
        if self.times.back().is_some_and(|&last| time <= last) {
            return Err(DtwError::NonIncreasingTime { index });
        }
        self.times.push_back(time);
        self.points.push_back(point);
        Ok(())
    }

    /// Insert a point before the current first point. Amortized O(1), like
    /// [`add_last`][Self::add_last].
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::DimensionMismatch`] | `point` does not have [`dimension`][Self::dimension] values |
    /// | [`DtwError::NonIncreasingTime`] | `time` is not less than the current first time |
    /// | [`DtwError::NonFiniteValue`] | `time` or a value is NaN or infinite |
    pub fn add_first(&mut self, time: T, point: TimeSeriesPoint<T>) -> Result<(), DtwError> {
        self.validate(0, time, &point)?;
        if self.times.front().is_some_and(|&first| time >= first) {
            return Err(DtwError::NonIncreasingTime { index: 0 });
        }
        self.times.push_front(time);
        self.points.push_front(point);
        Ok(())
    }

    fn validate(&self, index: usize, time: T, point: &TimeSeriesPoint<T>) -> Result<(), DtwError> {
        if point.dimension() != self.dimension {
            return Err(DtwError::DimensionMismatch {
                expected: self.dimension,
                actual: point.dimension(),
            });
        }
        if !time.is_finite() || point.as_slice().iter().any(|v| !v.is_finite()) {
            return Err(DtwError::NonFiniteValue { index });
        }
        Ok(())
    }

    /// Remove every point, keeping dimension and labels.
    pub fn clear(&mut self) {
        self.times.clear();
        self.points.clear();
    }

    /// Return the number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Return true if the series has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Return the number of values in every point.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Return the `D + 1` labels: the time axis followed by one per dimension.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Replace the labels.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::DimensionMismatch`] | `labels.len()` is not `dimension + 1` |
    pub fn set_labels(&mut self, labels: Vec<String>) -> Result<(), DtwError> {
        if labels.len() != self.dimension + 1 {
            return Err(DtwError::DimensionMismatch {
                expected: self.dimension + 1,
                actual: labels.len(),
            });
        }
        self.labels = labels;
        Ok(())
    }

    /// Return the time of point `index`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::IndexOutOfRange`] | `index >= len()` |
    pub fn time(&self, index: usize) -> Result<T, DtwError> {
        self.times.get(index).copied().ok_or(DtwError::IndexOutOfRange {
            index,
            len: self.len(),
        })
    }

    /// Return point `index`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::IndexOutOfRange`] | `index >= len()` |
    pub fn point(&self, index: usize) -> Result<&TimeSeriesPoint<T>, DtwError> {
        self.points.get(index).ok_or(DtwError::IndexOutOfRange {
            index,
            len: self.len(),
        })
    }

    /// Return value `dim` of point `index`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::IndexOutOfRange`] | `index >= len()` or `dim >= dimension()` |
    pub fn measurement(&self, index: usize, dim: usize) -> Result<T, DtwError> {
        self.point(index)?
            .as_slice()
            .get(dim)
            .copied()
            .ok_or(DtwError::IndexOutOfRange {
                index: dim,
                len: self.dimension,
            })
    }

    /// Iterate over `(time, values)` pairs in time order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (T, &[T])> + '_ {
        self.times
            .iter()
            .zip(&self.points)
            .map(|(&t, p)| (t, p.as_slice()))
    }

    /// Values of point `index` without bounds reporting. For DP inner loops.
    pub(crate) fn values(&self, index: usize) -> &[T] {
        self.points[index].as_slice()
    }

    /// Check the preconditions every alignment entry point shares.
    pub(crate) fn ensure_alignable(&self, other: &Self) -> Result<(), DtwError> {
        if self.is_empty() || other.is_empty() {
            return Err(DtwError::EmptySeries);
        }
        if self.dimension != other.dimension {
            return Err(DtwError::DimensionMismatch {
                expected: self.dimension,
                actual: other.dimension,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(values: &[f64]) -> TimeSeriesPoint<f64> {
        TimeSeriesPoint::new(values.to_vec())
    }

    #[test]
    fn rejects_zero_dimension() {
        assert_eq!(TimeSeries::<f64>::new(0), Err(DtwError::ZeroDimension));
    }

    #[test]
    fn default_labels() {
        let ts = TimeSeries::<f64>::new(2).unwrap();
        assert_eq!(ts.labels(), &["Time", "c1", "c2"]);
    }

    #[test]
    fn add_last_appends_in_order() {
        let mut ts = TimeSeries::new(2).unwrap();
        ts.add_last(0.0, point(&[1.0, 2.0])).unwrap();
        ts.add_last(1.5, point(&[3.0, 4.0])).unwrap();
        assert_eq!(ts.len(), 2);
        assert_eq!(ts.time(1).unwrap(), 1.5);
        assert_eq!(ts.measurement(1, 0).unwrap(), 3.0);
    }

    #[test]
    fn add_last_rejects_dimension_mismatch() {
        let mut ts = TimeSeries::new(2).unwrap();
        let result = ts.add_last(0.0, point(&[1.0]));
        assert_eq!(
            result,
            Err(DtwError::DimensionMismatch {
                expected: 2,
                actual: 1
            })
        );
        assert!(ts.is_empty());
    }

    #[test]
    fn add_last_rejects_equal_time() {
        let mut ts = TimeSeries::new(1).unwrap();
        ts.add_last(1.0, point(&[0.0])).unwrap();
        let result = ts.add_last(1.0, point(&[0.0]));
        assert_eq!(result, Err(DtwError::NonIncreasingTime { index: 1 }));
    }

    #[test]
    fn add_first_prepends() {
        let mut ts = TimeSeries::new(1).unwrap();
        ts.add_last(5.0, point(&[50.0])).unwrap();
        ts.add_first(2.0, point(&[20.0])).unwrap();
        assert_eq!(ts.time(0).unwrap(), 2.0);
        assert_eq!(ts.measurement(0, 0).unwrap(), 20.0);
        assert_eq!(ts.measurement(1, 0).unwrap(), 50.0);
    }

    #[test]
    fn building_backwards_matches_building_forwards() {
        let n = 100_000;
        let mut backwards = TimeSeries::new(1).unwrap();
        for k in (0..n).rev() {
            backwards.add_first(k as f64, point(&[(k * 3) as f64])).unwrap();
        }
        let forwards =
            TimeSeries::from_values((0..n).map(|k| (k * 3) as f64).collect()).unwrap();
        assert_eq!(backwards.len(), n);
        assert_eq!(backwards, forwards);
    }

    #[test]
    fn add_first_rejects_later_time() {
        let mut ts = TimeSeries::new(1).unwrap();
        ts.add_last(5.0, point(&[0.0])).unwrap();
        let result = ts.add_first(6.0, point(&[0.0]));
        assert_eq!(result, Err(DtwError::NonIncreasingTime { index: 0 }));
    }

    #[test]
    fn rejects_nan_value() {
        let mut ts = TimeSeries::new(2).unwrap();
        ts.add_last(0.0, point(&[0.0, 0.0])).unwrap();
        let result = ts.add_last(1.0, point(&[f64::NAN, 0.0]));
        assert_eq!(result, Err(DtwError::NonFiniteValue { index: 1 }));
    }

    #[test]
    fn from_values_rejects_empty() {
        assert_eq!(
            TimeSeries::<f64>::from_values(vec![]),
            Err(DtwError::EmptySeries)
        );
    }

    #[test]
    fn from_values_timestamps_by_index() {
        let ts = TimeSeries::from_values(vec![4.0, 5.0, 6.0]).unwrap();
        let times: Vec<f64> = ts.iter().map(|(t, _)| t).collect();
        assert_eq!(times, vec![0.0, 1.0, 2.0]);
        assert_eq!(ts.dimension(), 1);
    }

    #[test]
    fn from_rows_checks_row_width() {
        let result = TimeSeries::from_rows(2, vec![vec![0.0, 1.0], vec![2.0]]);
        assert!(matches!(result, Err(DtwError::DimensionMismatch { .. })));
    }

    #[test]
    fn out_of_range_accessors() {
        let ts = TimeSeries::from_values(vec![1.0, 2.0]).unwrap();
        assert_eq!(
            ts.time(2),
            Err(DtwError::IndexOutOfRange { index: 2, len: 2 })
        );
        assert_eq!(
            ts.measurement(0, 1),
            Err(DtwError::IndexOutOfRange { index: 1, len: 1 })
        );
    }

    #[test]
    fn set_labels_requires_dimension_plus_one() {
        let mut ts = TimeSeries::<f64>::new(1).unwrap();
        assert!(ts.set_labels(vec!["t".into()]).is_err());
        ts.set_labels(vec!["t".into(), "x".into()]).unwrap();
        assert_eq!(ts.labels(), &["t", "x"]);
    }

    #[test]
    fn clear_keeps_dimension() {
        let mut ts = TimeSeries::from_rows(3, vec![vec![1.0, 2.0, 3.0]]).unwrap();
        ts.clear();
        assert!(ts.is_empty());
        assert_eq!(ts.dimension(), 3);
        ts.add_last(0.0, point(&[1.0, 1.0, 1.0])).unwrap();
    }
}
