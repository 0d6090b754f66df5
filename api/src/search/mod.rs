//! Query-filter compiler, SQL builder, and cached search orchestration.

mod builder;
mod compiler;
mod service;
mod types;

pub use builder::{build_where, SqlValue};
pub use compiler::compile;
pub use service::{PropertyStore, SearchService};
pub use types::{Predicate, PredicateMap, RangeBounds};

/// Split a raw query string into decoded `(key, value)` pairs, preserving
/// wire order. Ordering matters twice: last-applied-wins in the compiler and
/// the order-sensitive cache key.
pub fn parse_query_pairs(raw: &str) -> Vec<(String, String)> {
    raw.split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode_component(key), decode_component(value))
        })
        .collect()
}

fn decode_component(raw: &str) -> String {
    let plus_decoded = raw.replace('+', " ");
    match urlencoding::decode(&plus_decoded) {
        Ok(decoded) => decoded.into_owned(),
        // Undecodable bytes are kept literally; the filter compiler tolerates
        // any string.
        Err(_) => plus_decoded,
    }
}

#[cfg(test)]
mod tests;
