mod route;
mod station;

pub use route::RouteDto;
pub use station::StationDto;
