//! Station Name Normalizer: canonicalises user-supplied station names
//! across case, London-prefix, and parenthetical variants, per
//! SPEC_FULL.md §4.5.

use crate::repository::Repository;
use std::{collections::HashMap, sync::Arc};

fn strip_main_suffix(name: &str) -> &str {
    name.trim()
        .strip_suffix("(Main)")
        .map(str::trim_end)
        .unwrap_or(name)
}

fn with_london_prefix_removed(name: &str) -> Option<&str> {
    name.strip_prefix("London ")
}

fn with_london_prefix_added(name: &str) -> String {
    format!("London {name}")
}

/// Normalizes candidate station names against a repository's known names,
/// trying exact -> case-insensitive -> prefix-removed -> prefix-added ->
/// `(Main)`-stripped -> alias, in that order.
#[derive(Debug, Clone, Default)]
pub struct StationNameNormalizer {
    aliases: HashMap<Arc<str>, Arc<str>>,
}

impl StationNameNormalizer {
    pub fn new() -> Self {
        let mut aliases = HashMap::new();
        for (a, b) in [
            ("Guildford", "Guildford (Surrey)"),
            ("St Pancras", "London St Pancras International"),
            ("Kings Cross", "London King's Cross"),
            ("Glasgow Central", "St Enoch"),
        ] {
            aliases.insert(a.to_lowercase().into(), b.into());
            aliases.insert(b.to_lowercase().into(), a.into());
        }
        Self { aliases }
    }

    /// Resolves `candidate` to a canonical name known to `repo`, or returns
    /// `candidate` unchanged if nothing matches (callers validate
    /// separately, per SPEC_FULL.md §4.5).
    pub fn resolve<'a>(&self, repo: &Repository, candidate: &'a str) -> Arc<str> {
        let trimmed = candidate.trim();

        if repo.station(trimmed).is_some() {
            return trimmed.into();
        }

        if let Some(hit) = repo
            .stations()
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(trimmed))
        {
            return hit.name.clone();
        }

        if let Some(stripped) = with_london_prefix_removed(trimmed) {
            if let Some(hit) = repo.station(stripped) {
                return hit.name.clone();
            }
        }

        let with_prefix = with_london_prefix_added(trimmed);
        if let Some(hit) = repo.station(&with_prefix) {
            return hit.name.clone();
        }

        let stripped_main = strip_main_suffix(trimmed);
        if stripped_main != trimmed {
            if let Some(hit) = repo.station(stripped_main) {
                return hit.name.clone();
            }
        }

        if let Some(alias) = self.aliases.get(trimmed.to_lowercase().as_str()) {
            if let Some(hit) = repo.station(alias) {
                return hit.name.clone();
            }
        }

        trimmed.into()
    }

    /// Folds punctuation and common suffixes to decide whether two names
    /// refer to the same station.
    pub fn are_equivalent(&self, a: &str, b: &str) -> bool {
        fold(a) == fold(b)
    }
}

fn fold(name: &str) -> String {
    strip_main_suffix(name)
        .to_lowercase()
        .replace(['\'', '.', ','], "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equivalence_folds_punctuation_and_main_suffix() {
        let normalizer = StationNameNormalizer::new();
        assert!(normalizer.are_equivalent("King's Cross", "Kings Cross"));
        assert!(normalizer.are_equivalent("Farnborough (Main)", "Farnborough"));
        assert!(!normalizer.are_equivalent("Farnborough (Main)", "Farnborough North"));
    }
}
