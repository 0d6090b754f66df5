/// Predicate types produced by the filter compiler.
use indexmap::IndexMap;

/// One predicate per base field name. Iteration order is the order in which
/// fields first appeared in the query string, so compilation is deterministic
/// for a given request.
pub type PredicateMap = IndexMap<String, Predicate>;

/// A constraint a property field must satisfy.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Exact, case-sensitive string equality.
    Eq(String),
    /// Bounded numeric range. Absent bounds are unconstrained.
    Range(RangeBounds),
}

/// Numeric bounds for a [`Predicate::Range`]. A `NaN` bound is legal here and
/// compiles to a never-matching store constraint, never an error.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RangeBounds {
    pub gt: Option<f64>,
    pub gte: Option<f64>,
    pub lt: Option<f64>,
    pub lte: Option<f64>,
}

impl RangeBounds {
    /// Closed range `min <= x <= max`.
    pub fn closed(min: f64, max: f64) -> Self {
        Self {
            gte: Some(min),
            lte: Some(max),
            ..Self::default()
        }
    }

    /// True if any present bound is `NaN` and the range can match nothing.
    pub fn has_nan_bound(&self) -> bool {
        [self.gt, self.gte, self.lt, self.lte]
            .into_iter()
            .flatten()
            .any(f64::is_nan)
    }
}
