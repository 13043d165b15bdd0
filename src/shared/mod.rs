pub(crate) mod fuzzy;
pub mod geo;

pub use geo::*;

use std::cmp::Ordering;

pub trait Identifiable {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
    fn normalized_name(&self) -> &str;
}

/// Ranks `haystack` against `needle` using the tiered scheme described in
/// SPEC_FULL.md §4.1: exact, case-insensitive exact, prefix, substring,
/// word-prefix, then a Levenshtein-based fallback. Single-threaded, per the
/// no-internal-parallelism contract of §5.
pub fn search<'a, T>(needle: &str, haystack: &'a [T]) -> Vec<&'a T>
where
    T: Identifiable,
{
    let normalized_needle = needle.to_lowercase();
    let mut results: Vec<(&T, f64)> = haystack
        .iter()
        .filter_map(|hay| {
            score(&normalized_needle, hay.normalized_name()).map(|score| (hay, score))
        })
        .collect();

    results.sort_by(|(_, a), (_, b)| b.partial_cmp(a).unwrap_or(Ordering::Equal));
    results.into_iter().map(|(entity, _)| entity).collect()
}

/// Tiered match score against a single (already-normalized) haystack entry,
/// or `None` if nothing above the fallback floor matches.
fn score(normalized_needle: &str, normalized_hay: &str) -> Option<f64> {
    if normalized_needle == normalized_hay {
        return Some(1.0);
    }
    if normalized_needle.eq_ignore_ascii_case(normalized_hay) {
        return Some(0.95);
    }
    let length_ratio = || {
        let shorter = normalized_needle.chars().count().min(normalized_hay.chars().count());
        let longer = normalized_needle.chars().count().max(normalized_hay.chars().count()).max(1);
        shorter as f64 / longer as f64
    };
    if normalized_hay.starts_with(normalized_needle) {
        return Some(0.85 * length_ratio());
    }
    if normalized_hay.contains(normalized_needle) {
        return Some(0.7 * length_ratio());
    }
    if normalized_hay
        .split_whitespace()
        .any(|token| token.starts_with(normalized_needle))
    {
        return Some(0.6);
    }
    let fallback = fuzzy::score(normalized_needle, normalized_hay);
    if fallback > 0.1 { Some(fallback) } else { None }
}
