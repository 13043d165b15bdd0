use albion_transit::route::RouteService;
use tokio::sync::RwLock;

/// Wraps the whole [`RouteService`] in one lock; every handler takes the
/// write half, serialising callers exactly as the core's single-threaded
/// contract demands (SPEC_FULL.md §5/§9.12) rather than attempting any
/// internal parallelism inside the core itself.
pub struct AppState {
    pub service: RwLock<RouteService>,
}
