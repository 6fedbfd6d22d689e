//! Error types for anveshak

use thiserror::Error;

use crate::algorithms::localization::LocalizationError;
use crate::algorithms::planning::PlanningError;
use crate::grid::GridError;

/// Errors from loading scenarios and configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(String),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Anveshak error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("Grid error: {0}")]
    Grid(#[from] GridError),

    #[error("Planning error: {0}")]
    Planning(#[from] PlanningError),

    #[error("Localization error: {0}")]
    Localization(#[from] LocalizationError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, Error>;
