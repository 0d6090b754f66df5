//! Filter compiler: ordered query parameters in, predicate mapping out.
//!
//! Pure and infallible by contract. Malformed input never produces an error,
//! only a more permissive (or empty-matching) predicate; strict validation
//! belongs at the HTTP boundary, not here.

use super::types::{Predicate, PredicateMap, RangeBounds};

/// Compile raw `(key, value)` query pairs into a predicate mapping.
///
/// Per pair, in precedence order:
/// 1. A value shaped like `min-max` where both halves parse as numbers
///    becomes a closed range on `key`.
/// 2. A key ending in `_gte`, `_lte`, `_gt`, or `_lt` becomes a single-bound
///    range on the stripped base field. The value is coerced with
///    `f64::from_str`; coercion failure forwards `NaN`, which the SQL builder
///    turns into a never-matching clause.
/// 3. Anything else is exact string equality.
///
/// A later pair for the same base field replaces the earlier predicate
/// (last-applied-wins), so identical inputs always compile identically.
pub fn compile(params: &[(String, String)]) -> PredicateMap {
    let mut predicates = PredicateMap::new();
    for (key, value) in params {
        let (field, predicate) = compile_param(key, value);
        predicates.insert(field, predicate);
    }
    predicates
}

fn compile_param(key: &str, value: &str) -> (String, Predicate) {
    if let Some(bounds) = parse_hyphen_range(value) {
        return (key.to_string(), Predicate::Range(bounds));
    }

    if let Some((base, bounds)) = parse_suffix_operator(key, value) {
        return (base, Predicate::Range(bounds));
    }

    (key.to_string(), Predicate::Eq(value.to_string()))
}

/// `price_gte=100` → (`price`, `>= 100`). The longer suffixes are tried
/// first so `_gte`/`_lte` are never mistaken for their strict variants.
fn parse_suffix_operator(key: &str, value: &str) -> Option<(String, RangeBounds)> {
    let mut bounds = RangeBounds::default();
    let base = if let Some(base) = key.strip_suffix("_gte") {
        bounds.gte = Some(coerce_number(value));
        base
    } else if let Some(base) = key.strip_suffix("_lte") {
        bounds.lte = Some(coerce_number(value));
        base
    } else if let Some(base) = key.strip_suffix("_gt") {
        bounds.gt = Some(coerce_number(value));
        base
    } else if let Some(base) = key.strip_suffix("_lt") {
        bounds.lt = Some(coerce_number(value));
        base
    } else {
        return None;
    };
    Some((base.to_string(), bounds))
}

/// `"100-500"` → closed range. The split is on the first hyphen only; if
/// either half fails to parse as a number (hyphenated words, empty halves,
/// negative-number-looking values), the pair falls through to equality.
fn parse_hyphen_range(value: &str) -> Option<RangeBounds> {
    let (lo, hi) = value.split_once('-')?;
    let min = lo.trim().parse::<f64>().ok()?;
    let max = hi.trim().parse::<f64>().ok()?;
    Some(RangeBounds::closed(min, max))
}

/// Numeric coercion for operator-suffixed values. Never fails: unparseable
/// input becomes `NaN` and is forwarded as an (unsatisfiable) bound.
fn coerce_number(value: &str) -> f64 {
    value.trim().parse::<f64>().unwrap_or(f64::NAN)
}
