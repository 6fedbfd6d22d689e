//! Sensor model for the particle filter update step.
//!
//! Compares the agent's real range reading with a particle's simulated one
//! and returns one of three likelihoods:
//!
//! | real      | simulated | likelihood           |
//! |-----------|-----------|----------------------|
//! | d         | d         | `match_likelihood`   |
//! | miss      | miss      | `match_likelihood`   |
//! | d1        | d2 ≠ d1   | `partial_likelihood` |
//! | hit       | miss      | `miss_likelihood`    |
//! | miss      | hit       | `miss_likelihood`    |

use serde::{Deserialize, Serialize};

/// Configuration for the sensor model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorModelConfig {
    /// Both readings agree.
    #[serde(default = "default_match")]
    pub match_likelihood: f64,

    /// Both sensors hit something, at different ranges.
    #[serde(default = "default_partial")]
    pub partial_likelihood: f64,

    /// Exactly one sensor hit something.
    #[serde(default = "default_miss")]
    pub miss_likelihood: f64,

    /// Distances closer than this count as equal (world units).
    #[serde(default = "default_tolerance")]
    pub range_tolerance: f32,
}

fn default_match() -> f64 {
    1.0
}

fn default_partial() -> f64 {
    0.5
}

fn default_miss() -> f64 {
    0.15
}

fn default_tolerance() -> f32 {
    1e-3
}

impl Default for SensorModelConfig {
    fn default() -> Self {
        Self {
            match_likelihood: default_match(),
            partial_likelihood: default_partial(),
            miss_likelihood: default_miss(),
            range_tolerance: default_tolerance(),
        }
    }
}

/// Three-tier range likelihood.
#[derive(Debug, Clone, Copy, Default)]
pub struct SensorModel {
    config: SensorModelConfig,
}

impl SensorModel {
    pub fn new(config: SensorModelConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SensorModelConfig {
        &self.config
    }

    /// Likelihood of `simulated` given the `real` reading. `None` is a miss.
    pub fn likelihood(&self, real: Option<f32>, simulated: Option<f32>) -> f64 {
        match (real, simulated) {
            (None, None) => self.config.match_likelihood,
            (Some(a), Some(b)) if (a - b).abs() <= self.config.range_tolerance => {
                self.config.match_likelihood
            }
            (Some(_), Some(_)) => self.config.partial_likelihood,
            _ => self.config.miss_likelihood,
        }
    }
}
