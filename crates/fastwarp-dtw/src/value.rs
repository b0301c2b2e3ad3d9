//! Numeric element trait shared by every series, matrix and distance.

use std::fmt::Debug;

use num_traits::{Float, NumCast};

/// A floating-point type usable as a time or measurement value.
///
/// Blanket-implemented for every type meeting the bounds, so `f32` and `f64`
/// both work out of the box.
pub trait Value: Float + NumCast + Default + Debug + Send + Sync + 'static {
    /// Convert a count into this type.
    ///
    /// Counts in this crate are series lengths, which every float type can
    /// represent (possibly rounded), so the conversion never fails for `f32`/`f64`.
    fn from_count(count: usize) -> Self {
        <Self as NumCast>::from(count).unwrap_or_else(Self::max_value)
    }
}

impl<T: Float + NumCast + Default + Debug + Send + Sync + 'static> Value for T {}
