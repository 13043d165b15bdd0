use std::path::PathBuf;
use thiserror::Error;

/// Failure loading a single dataset file. Always soft: the repository logs
/// the occurrence and continues with whatever other files parsed, per
/// SPEC_FULL.md §4.1/§7 ("fails softly... only that file's contribution is
/// lost").
#[derive(Error, Debug)]
pub enum DatasetLoadError {
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Reasons a constructed [`crate::route::Route`] failed `validate_route`.
/// Surfaced as a list rather than a single error, per SPEC_FULL.md §7.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteValidationReason {
    #[error("route has no segments")]
    Empty,
    #[error("segment {0} does not chain to segment {1}")]
    BrokenChain(usize, usize),
    #[error("changes_required does not equal max(0, segments - 1)")]
    ChangesMismatch,
    #[error("segment totals do not sum to the route total")]
    TotalsMismatch,
}

/// Programmer-error taxonomy: conditions that should never arise from user
/// input and indicate a bug in the calling code, per SPEC_FULL.md §7 ("it
/// does raise for programmer errors"). Never used to signal "no route" or
/// "unknown station" -- those are `Option`/`Vec` results, not errors.
#[derive(Error, Debug)]
pub enum RailError {
    #[error("cannot convert a path shorter than two stations into a route")]
    PathTooShort,

    #[error("route failed validation: {0:?}")]
    InvalidRoute(Vec<RouteValidationReason>),

    #[error("dataset root {0} does not exist or is not a directory")]
    InvalidDatasetRoot(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
