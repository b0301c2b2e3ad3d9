//! Error types for time series construction, windowing and alignment.

/// Errors from building time series and running DTW alignments.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DtwError {
    /// Returned when an alignment is requested on a series with no points.
    #[error("time series must be non-empty")]
    EmptySeries,

    /// Returned when a time series is configured with zero dimensions.
    #[error("time series must have at least one dimension")]
    ZeroDimension,

    /// Returned when two measurement vectors (or two series) disagree on dimensionality.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Dimensionality required by the receiver.
        expected: usize,
        /// Dimensionality actually supplied.
        actual: usize,
    },

    /// Returned when a point would break the strictly increasing time order.
    #[error("time at index {index} is not strictly increasing")]
    NonIncreasingTime {
        /// Position the offending point would have occupied.
        index: usize,
    },

    /// Returned when a time or measurement is NaN or infinite.
    #[error("time series contains non-finite value at index {index}")]
    NonFiniteValue {
        /// Position of the point holding the non-finite value.
        index: usize,
    },

    /// Returned when PAA is asked for a size outside `(0, original]`.
    #[error("PAA size {requested} out of range for series of length {original}")]
    InvalidShrunkSize {
        /// The requested number of output points.
        requested: usize,
        /// Length of the source series.
        original: usize,
    },

    /// Returned when a search window was built for different series lengths.
    #[error("window covers a {window_i}x{window_j} matrix, series are {series_i}x{series_j}")]
    WindowShapeMismatch {
        /// Number of columns the window covers.
        window_i: usize,
        /// Number of rows the window covers.
        window_j: usize,
        /// Length of the column series.
        series_i: usize,
        /// Length of the row series.
        series_j: usize,
    },

    /// Returned when indexing past the end of a path or series.
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// The number of elements available.
        len: usize,
    },

    /// Returned when a window cursor is advanced after its last cell.
    #[error("no more cells in search window")]
    NoSuchElement,

    /// Returned when a window cursor is advanced after the window was mutated.
    #[error("search window modified during iteration (expected revision {expected}, found {actual})")]
    ConcurrentModification {
        /// Revision recorded when the cursor was created.
        expected: u64,
        /// Revision of the window at the time of the call.
        actual: u64,
    },

    /// Returned when a warp path is not monotone and contiguous.
    #[error("warp path is not monotonic at step {index}")]
    InvalidPath {
        /// Position of the first offending step.
        index: usize,
    },

    /// Returned when a metric name does not match any built-in distance.
    #[error("unknown distance metric: {name}")]
    UnknownMetric {
        /// The unrecognized name.
        name: String,
    },

    /// Returned when template matching is run against an empty template set.
    #[error("template set contains no templates")]
    EmptyTemplateSet,
}
