//! A multi-modal UK rail journey planner core: stations, lines, underground
//! systems and walking transfers, routed without any external APIs.

pub mod config;
pub mod error;
pub mod graph;
pub mod normalizer;
pub mod pathfinder;
pub mod prelude;
pub mod repository;
pub mod route;
pub mod shared;
pub mod underground;
pub mod walking;
