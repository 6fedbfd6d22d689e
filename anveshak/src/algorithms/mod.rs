//! Core algorithms.
//!
//! - [`planning`]: A* search over open grid cells
//! - [`localization`]: Monte Carlo Localization on a known grid

pub mod localization;
pub mod planning;
