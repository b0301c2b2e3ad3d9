//! FastDTW: linear-time approximate Dynamic Time Warping.
//!
//! Pure math library with zero I/O. Aligns two multi-dimensional time series
//! and returns the minimum cumulative cost with the warp path achieving it.
//!
//! - [`Dtw`] solves exactly over the full cost matrix, or over any
//!   caller-supplied [`SearchWindow`].
//! - [`FastDtw`] approximates the optimum by solving coarse PAA-shrunk
//!   copies of the series and refining the path one resolution at a time.
//! - [`TemplateMatcher`] classifies a query against labelled templates.
//!
//! ```
//! use fastwarp_dtw::{Cell, Euclidean, FastDtw, TimeSeries};
//!
//! let a = TimeSeries::from_values(vec![0.0, 1.0, 2.0, 3.0, 2.0, 1.0])?;
//! let b = TimeSeries::from_values(vec![0.0, 0.0, 1.0, 2.0, 3.0, 2.0, 1.0])?;
//! let info = FastDtw::new(Euclidean).with_radius(1).warp_info(&a, &b)?;
//! assert_eq!(info.path().get(0)?, Cell::new(0, 0));
//! assert_eq!(info.path().get(info.path().len() - 1)?, Cell::new(5, 6));
//! # Ok::<(), fastwarp_dtw::DtwError>(())
//! ```

mod cost;
mod distance;
mod dtw;
mod error;
mod expanded;
mod fast;
mod paa;
mod pairwise;
mod path;
mod series;
mod templates;
mod value;
mod window;

pub use cost::{CostMatrix, MemoryResidentMatrix, PartialWindowMatrix};
pub use distance::{Binary, DistanceFunction, Euclidean, Manhattan, Metric};
pub use dtw::Dtw;
pub use error::DtwError;
pub use fast::{DEFAULT_RADIUS, FastDtw, warp_distance_between, warp_info_between};
pub use paa::Paa;
pub use pairwise::DistanceMatrix;
pub use path::{Cell, TimeWarpInfo, WarpPath};
pub use series::{TimeSeries, TimeSeriesPoint};
pub use templates::{ClassScore, MatchMode, TemplateMatcher, TemplateSet};
pub use value::Value;
pub use window::{SearchWindow, WindowCursor, WindowIter};
