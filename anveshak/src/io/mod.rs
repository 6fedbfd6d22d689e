//! Scenario files.

pub mod scenario;

pub use scenario::{Scenario, WorldConfig};
