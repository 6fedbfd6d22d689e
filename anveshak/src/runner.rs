//! Step loop driving an engine to completion.
//!
//! One tick is one exploration cycle or one localization step. The loop
//! stops when the engine reports a terminal state, when the step limit is
//! reached, or when the [`CancellationToken`] is cancelled. The optional
//! delay between ticks is pacing only.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::algorithms::localization::Localizer;
use crate::error::Result;
use crate::events::SimulationObserver;
use crate::exploration::{ExplorationState, Explorer};
use crate::sensors::RangeSensor;

/// Runner configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Maximum ticks before giving up (0 = unlimited).
    #[serde(default = "default_max_steps")]
    pub max_steps: u64,

    /// Pause between ticks in milliseconds.
    #[serde(default)]
    pub step_delay_ms: u64,
}

fn default_max_steps() -> u64 {
    10_000
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            max_steps: default_max_steps(),
            step_delay_ms: 0,
        }
    }
}

/// Shared stop flag.
///
/// Clones share the same flag; cancelling any clone stops the runner
/// before its next tick.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Result of a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    Finished,
}

/// Anything the runner can tick.
pub trait SimulationEngine {
    /// Name of this engine for logging.
    fn name(&self) -> &'static str;

    /// Advance by exactly one step.
    fn tick(&mut self, observer: &mut dyn SimulationObserver) -> Result<TickOutcome>;
}

impl<S: RangeSensor> SimulationEngine for Explorer<S> {
    fn name(&self) -> &'static str {
        "explorer"
    }

    fn tick(&mut self, observer: &mut dyn SimulationObserver) -> Result<TickOutcome> {
        let step = self.step(observer)?;
        Ok(if step.state == ExplorationState::Done {
            TickOutcome::Finished
        } else {
            TickOutcome::Continue
        })
    }
}

impl<S: RangeSensor> SimulationEngine for Localizer<S> {
    fn name(&self) -> &'static str {
        "localizer"
    }

    fn tick(&mut self, observer: &mut dyn SimulationObserver) -> Result<TickOutcome> {
        let step = self.step(observer)?;
        Ok(if step.converged.is_some() {
            TickOutcome::Finished
        } else {
            TickOutcome::Continue
        })
    }
}

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Finished,
    Cancelled,
    StepLimit,
}

/// Summary of a completed run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    pub outcome: RunOutcome,
    pub steps: u64,
    pub elapsed: Duration,
}

/// Explicit tick loop.
#[derive(Debug, Clone, Default)]
pub struct Runner {
    config: RunnerConfig,
    token: CancellationToken,
}

impl Runner {
    pub fn new(config: RunnerConfig) -> Self {
        Self {
            config,
            token: CancellationToken::new(),
        }
    }

    /// Use an externally owned cancellation token.
    pub fn with_token(mut self, token: CancellationToken) -> Self {
        self.token = token;
        self
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Tick `engine` until it finishes, the step limit is hit, or the
    /// token is cancelled. Engine errors end the run and propagate.
    pub fn run(
        &self,
        engine: &mut dyn SimulationEngine,
        observer: &mut dyn SimulationObserver,
    ) -> Result<RunSummary> {
        let start = Instant::now();
        let delay = Duration::from_millis(self.config.step_delay_ms);
        let mut steps = 0u64;

        log::info!("Running {} (max {} steps)", engine.name(), self.config.max_steps);

        let outcome = loop {
            if self.token.is_cancelled() {
                log::info!("{} cancelled after {} steps", engine.name(), steps);
                break RunOutcome::Cancelled;
            }
            if self.config.max_steps > 0 && steps >= self.config.max_steps {
                log::warn!("{} hit the step limit ({})", engine.name(), steps);
                break RunOutcome::StepLimit;
            }

            let tick = engine.tick(observer)?;
            steps += 1;

            if tick == TickOutcome::Finished {
                break RunOutcome::Finished;
            }
            if !delay.is_zero() {
                thread::sleep(delay);
            }
        };

        Ok(RunSummary {
            outcome,
            steps,
            elapsed: start.elapsed(),
        })
    }
}
