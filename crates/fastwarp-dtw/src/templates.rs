//! Nearest-template classification of a query series.
//!
//! A [`TemplateSet`] holds recorded example series, each labelled with a
//! class name. [`TemplateMatcher`] aligns a query against every template with
//! FastDTW and reports per template, per class, or only the best class.

use std::collections::BTreeMap;

use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::distance::{DistanceFunction, Euclidean};
use crate::error::DtwError;
use crate::fast::FastDtw;
use crate::series::TimeSeries;
use crate::value::Value;

/// Labelled templates sharing one dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateSet<T> {
    templates: Vec<(String, TimeSeries<T>)>,
}

impl<T> Default for TemplateSet<T> {
    fn default() -> Self {
        Self {
            templates: Vec::new(),
        }
    }
}

impl<T: Value> TemplateSet<T> {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a template under `class`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::EmptySeries`] | `series` has no points |
    /// | [`DtwError::DimensionMismatch`] | `series` differs in dimension from earlier templates |
    pub fn insert(&mut self, class: impl Into<String>, series: TimeSeries<T>) -> Result<(), DtwError> {
        if series.is_empty() {
            return Err(DtwError::EmptySeries);
        }
        if let Some(expected) = self.dimension()
            && series.dimension() != expected
        {
            return Err(DtwError::DimensionMismatch {
                expected,
                actual: series.dimension(),
            });
        }
        self.templates.push((class.into(), series));
        Ok(())
    }

    /// Return the number of templates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Return true if no template has been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Return the shared dimension, or `None` while the set is empty.
    #[must_use]
    pub fn dimension(&self) -> Option<usize> {
        self.templates.first().map(|(_, s)| s.dimension())
    }

    /// Return the distinct class names, sorted.
    #[must_use]
    pub fn classes(&self) -> Vec<&str> {
        let mut classes: Vec<&str> = self.templates.iter().map(|(c, _)| c.as_str()).collect();
        classes.sort_unstable();
        classes.dedup();
        classes
    }

    /// Iterate over `(class, template)` pairs in insertion order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, &TimeSeries<T>)> + '_ {
        self.templates.iter().map(|(c, s)| (c.as_str(), s))
    }
}

/// How [`TemplateMatcher::match_query`] reports its distances.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum MatchMode {
    /// One score per template, in insertion order.
    PerTemplate,
    /// Mean distance per class, classes sorted by name.
    #[default]
    ClassAverage,
    /// The class with the lowest mean distance. Ties go to the first name.
    BestClass,
}

/// Alignment cost of a query against a template or class.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassScore<T> {
    /// Class name.
    pub class: String,
    /// FastDTW cost (or mean cost, for class modes).
    pub distance: T,
}

/// Matches query series against a [`TemplateSet`].
///
/// # Defaults
///
/// | Parameter | Default |
/// |-----------|---------|
/// | `fast`    | `FastDtw::new(Euclidean)` |
/// | `mode`    | [`MatchMode::ClassAverage`] |
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TemplateMatcher<D = Euclidean> {
    fast: FastDtw<D>,
    mode: MatchMode,
}

impl<D> TemplateMatcher<D> {
    /// Create a matcher aligning with `fast`.
    #[must_use]
    pub fn new(fast: FastDtw<D>) -> Self {
        Self {
            fast,
            mode: MatchMode::default(),
        }
    }

    /// Set the reporting mode.
    #[must_use]
    pub fn with_mode(mut self, mode: MatchMode) -> Self {
        self.mode = mode;
        self
    }

    /// Return the reporting mode.
    #[must_use]
    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// Return the FastDTW configuration used for each alignment.
    #[must_use]
    pub fn fast_dtw(&self) -> &FastDtw<D> {
        &self.fast
    }

    /// Align `query` against every template in `set`.
    ///
    /// The query is the first series of each alignment. Templates are
    /// aligned in parallel.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::EmptyTemplateSet`] | `set` is empty |
    /// | [`DtwError::EmptySeries`] | `query` has no points |
    /// | [`DtwError::DimensionMismatch`] | `query` differs in dimension from the templates |
    #[instrument(skip_all, fields(templates = set.len(), query_len = query.len(), mode = ?self.mode))]
    pub fn match_query<T>(
        &self,
        set: &TemplateSet<T>,
        query: &TimeSeries<T>,
    ) -> Result<Vec<ClassScore<T>>, DtwError>
    where
        T: Value,
        D: DistanceFunction<T>,
    {
        if set.is_empty() {
            return Err(DtwError::EmptyTemplateSet);
        }

        let scores = set
            .templates
            .par_iter()
            .map(|(class, template)| {
                self.fast.warp_distance(query, template).map(|distance| ClassScore {
                    class: class.clone(),
                    distance,
                })
            })
            .collect::<Result<Vec<_>, DtwError>>()?;

        let result = match self.mode {
            MatchMode::PerTemplate => scores,
            MatchMode::ClassAverage => class_means(scores),
            MatchMode::BestClass => best_class(class_means(scores)).into_iter().collect(),
        };
        debug!(reported = result.len(), "matched query");
        Ok(result)
    }
}

fn class_means<T: Value>(scores: Vec<ClassScore<T>>) -> Vec<ClassScore<T>> {
    let mut sums: BTreeMap<String, (T, usize)> = BTreeMap::new();
    for score in scores {
        let entry = sums.entry(score.class).or_insert((T::zero(), 0));
        entry.0 = entry.0 + score.distance;
        entry.1 += 1;
    }
    sums.into_iter()
        .map(|(class, (sum, count))| ClassScore {
            class,
            distance: sum / T::from_count(count),
        })
        .collect()
}

fn best_class<T: Value>(means: Vec<ClassScore<T>>) -> Option<ClassScore<T>> {
    means.into_iter().fold(None, |best, score| match best {
        Some(b) if b.distance <= score.distance => Some(b),
        _ => Some(score),
    })
}
