//! Point-to-point distance metrics.

use std::fmt;
use std::str::FromStr;

use crate::error::DtwError;
use crate::value::Value;

/// A pure, symmetric distance between two equal-length measurement vectors,
/// with `distance(x, x) == 0`.
///
/// The DTW solvers are generic over this trait so the metric inlines into
/// the inner loop.
pub trait DistanceFunction<T: Value>: Send + Sync {
    /// Distance between `a` and `b`. Callers guarantee equal lengths.
    fn distance(&self, a: &[T], b: &[T]) -> T;

    /// Distance between `a` and `b`, validating their lengths first.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::DimensionMismatch`] | `a.len() != b.len()` |
    fn checked_distance(&self, a: &[T], b: &[T]) -> Result<T, DtwError> {
        if a.len() != b.len() {
            return Err(DtwError::DimensionMismatch {
                expected: a.len(),
                actual: b.len(),
            });
        }
        Ok(self.distance(a, b))
    }
}

/// Square root of the summed squared differences.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Euclidean;

impl<T: Value> DistanceFunction<T> for Euclidean {
    #[inline]
    fn distance(&self, a: &[T], b: &[T]) -> T {
        debug_assert_eq!(a.len(), b.len());
        a.iter()
            .zip(b)
            .fold(T::zero(), |acc, (&x, &y)| {
                let d = x - y;
                acc + d * d
            })
            .sqrt()
    }
}

/// Summed absolute differences.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Manhattan;

impl<T: Value> DistanceFunction<T> for Manhattan {
    #[inline]
    fn distance(&self, a: &[T], b: &[T]) -> T {
        debug_assert_eq!(a.len(), b.len());
        a.iter()
            .zip(b)
            .fold(T::zero(), |acc, (&x, &y)| acc + (x - y).abs())
    }
}

/// `0` if the vectors are equal, `1` otherwise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Binary;

impl<T: Value> DistanceFunction<T> for Binary {
    #[inline]
    fn distance(&self, a: &[T], b: &[T]) -> T {
        debug_assert_eq!(a.len(), b.len());
        if a == b { T::zero() } else { T::one() }
    }
}

/// Run-time selectable metric, for choosing a distance by name.
///
/// Parses from `"euclidean"`, `"manhattan"` or `"binary"` (case-insensitive,
/// an optional `"Distance"` suffix is accepted).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Metric {
    /// See [`Euclidean`].
    #[default]
    Euclidean,
    /// See [`Manhattan`].
    Manhattan,
    /// See [`Binary`].
    Binary,
}

impl<T: Value> DistanceFunction<T> for Metric {
    #[inline]
    fn distance(&self, a: &[T], b: &[T]) -> T {
        match self {
            Self::Euclidean => Euclidean.distance(a, b),
            Self::Manhattan => Manhattan.distance(a, b),
            Self::Binary => Binary.distance(a, b),
        }
    }
}

impl FromStr for Metric {
    type Err = DtwError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        match lower.strip_suffix("distance").unwrap_or(&lower) {
            "euclidean" => Ok(Self::Euclidean),
            "manhattan" => Ok(Self::Manhattan),
            "binary" => Ok(Self::Binary),
            _ => Err(DtwError::UnknownMetric { name: s.to_owned() }),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Euclidean => "euclidean",
            Self::Manhattan => "manhattan",
            Self::Binary => "binary",
        };
        f.write_str(name)
    }
}
