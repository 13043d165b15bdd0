mod route;
mod search;

pub use route::{destinations, reload, route, routes};
pub use search::search;
