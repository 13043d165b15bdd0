//! Walking Connection Service: arbiter of whether a geographically close
//! pair of stations on different lines deserves a walking edge, per
//! SPEC_FULL.md §4.4.

use crate::{repository::Repository, underground};
use std::sync::Arc;

/// Hard-coded "same physical train" exclusions (rule 6). Direction-
/// symmetric; consulted by normalized name.
const SAME_PHYSICAL_TRAIN: &[(&str, &str)] = &[
    ("clapham junction", "london waterloo"),
    ("woking", "london waterloo"),
    ("guildford", "london waterloo"),
    ("basingstoke", "london waterloo"),
    ("surbiton", "london waterloo"),
    ("wimbledon", "london waterloo"),
];

fn fold(name: &str) -> String {
    name.trim().to_lowercase()
}

fn is_same_physical_train(a: &str, b: &str) -> bool {
    let (a, b) = (fold(a), fold(b));
    SAME_PHYSICAL_TRAIN
        .iter()
        .any(|(x, y)| (a == *x && b == *y) || (a == *y && b == *x))
}

/// London terminal set, per SPEC_FULL.md §4.3 (resolved GLOSSARY "twelve
/// named termini").
pub const LONDON_TERMINALS: &[&str] = &[
    "london waterloo",
    "london victoria",
    "london paddington",
    "london liverpool street",
    "london king's cross",
    "london st pancras international",
    "london euston",
    "london bridge",
    "london charing cross",
    "london cannon street",
    "london fenchurch street",
    "london marylebone",
];

pub fn is_london_terminal(name: &str) -> bool {
    LONDON_TERMINALS.contains(&fold(name).as_str())
}

pub fn is_non_terminal_london(name: &str) -> bool {
    let folded = fold(name);
    folded.starts_with("london ") && !LONDON_TERMINALS.contains(&folded.as_str())
}

/// Admits a walking edge between `a` and `b` iff all six rules of
/// SPEC_FULL.md §4.4 hold.
pub fn admits_walking_edge(
    repo: &Repository,
    underground: &underground::UndergroundSystems,
    a: &str,
    b: &str,
    max_distance_m: f64,
) -> bool {
    // Rule 1: neither is non-terminal London; nor are both London terminals.
    if is_non_terminal_london(a) || is_non_terminal_london(b) {
        return false;
    }
    if is_london_terminal(a) && is_london_terminal(b) {
        return false;
    }

    // Rule 2: distance known and within bound.
    let (Some(coord_a), Some(coord_b)) = (
        repo.station(a).and_then(|s| s.coordinate),
        repo.station(b).and_then(|s| s.coordinate),
    ) else {
        return false;
    };
    if coord_a.haversine_distance(&coord_b).as_meters() > max_distance_m {
        return false;
    }

    // Rule 3: no shared line.
    if !repo.common_lines(a, b).is_empty() {
        return false;
    }

    // Rule 4: no declared direct connection with zero walking distance.
    let has_zero_distance_direct = repo.direct_connections.iter().any(|c| {
        let same_pair = (c.from_station.as_ref() == a && c.to_station.as_ref() == b)
            || (c.from_station.as_ref() == b && c.to_station.as_ref() == a);
        same_pair && c.walking_distance_m.unwrap_or(0) == 0
    });
    if has_zero_distance_direct {
        return false;
    }

    // Rule 5: no through-service linking their lines without requiring a
    // change, declared at any third-party station.
    let lines_a: Vec<Arc<str>> = repo.station(a).map(|s| s.lines.clone()).unwrap_or_default();
    let lines_b: Vec<Arc<str>> = repo.station(b).map(|s| s.lines.clone()).unwrap_or_default();
    let has_through_service = repo.line_interchanges.iter().any(|li| {
        !li.requires_change
            && ((lines_a.iter().any(|l| l.as_ref() == li.from_line.as_ref())
                && lines_b.iter().any(|l| l.as_ref() == li.to_line.as_ref()))
                || (lines_a.iter().any(|l| l.as_ref() == li.to_line.as_ref())
                    && lines_b.iter().any(|l| l.as_ref() == li.from_line.as_ref())))
    });
    if has_through_service {
        return false;
    }

    // Rule 6: hard-coded same-physical-train exclusion.
    if is_same_physical_train(a, b) {
        return false;
    }

    true
}

pub fn walking_distance_m(repo: &Repository, a: &str, b: &str) -> Option<u32> {
    let a_coord = repo.station(a)?.coordinate?;
    let b_coord = repo.station(b)?.coordinate?;
    Some(a_coord.haversine_distance(&b_coord).as_meters().round() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn london_terminal_classification() {
        assert!(is_london_terminal("London Waterloo"));
        assert!(!is_london_terminal("London Blackfriars"));
        assert!(is_non_terminal_london("London Blackfriars"));
        assert!(!is_non_terminal_london("London Waterloo"));
    }

    #[test]
    fn same_physical_train_is_symmetric() {
        assert!(is_same_physical_train("Clapham Junction", "London Waterloo"));
        assert!(is_same_physical_train("London Waterloo", "Clapham Junction"));
        assert!(!is_same_physical_train("Fleet", "London Waterloo"));
    }
}
