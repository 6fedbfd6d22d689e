//! Frontier-based exploration.
//!
//! The agent starts with a blank belief grid and repeats one cycle per
//! tick until nothing reachable is left unknown:
//!
//! ```text
//!   ┌──────────┐    ┌──────────┐    ┌────────────┐
//!   │ Scanning │───►│ Planning │───►│ Traversing │──┐
//!   └──────────┘    └────┬─────┘    └────────────┘  │
//!        ▲               │ no frontiers             │
//!        │               ▼                          │
//!        │          ┌────────┐                      │
//!        │          │  Done  │                      │
//!        │          └────────┘                      │
//!        └──────────────────────────────────────────┘
//! ```
//!
//! - [`frontier`]: frontier detection and target ordering
//! - [`explorer`]: the state machine driving scan, plan, and traverse

pub mod explorer;
pub mod frontier;

pub use explorer::{
    ExplorationConfig, ExplorationState, ExplorationStats, ExplorationStep, Explorer, PlanOutcome,
};
pub use frontier::{FrontierSelector, detect_frontiers};
