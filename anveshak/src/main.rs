//! Anveshak - run exploration or localization on a scenario
//!
//! # Usage
//!
//! ```bash
//! # Map an unknown room
//! cargo run --release -- explore scenarios/open_room.yaml
//!
//! # Localize in a known corridor with a fixed seed
//! cargo run --release -- localize scenarios/l_corridor.yaml --seed 7
//!
//! # More detail
//! RUST_LOG=debug cargo run --release -- explore scenarios/open_room.yaml --range 3
//! ```

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use anveshak::{
    CancellationToken, Completion, Explorer, Localizer, RecordingObserver, RunOutcome, Runner,
    Scenario,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Explore an unknown world until no frontiers remain
    Explore {
        /// Scenario YAML file
        scenario: PathBuf,

        /// Stop after this many steps (0 = unlimited)
        #[arg(long)]
        max_steps: Option<u64>,

        /// Pause between steps, in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,

        /// Sensor range in world units
        #[arg(long)]
        range: Option<f32>,
    },

    /// Localize the agent on a known map
    Localize {
        /// Scenario YAML file
        scenario: PathBuf,

        /// Random seed (0 = from the OS)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Stop after this many steps (0 = unlimited)
        #[arg(long)]
        max_steps: Option<u64>,

        /// Pause between steps, in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] {} - {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();

    let args = Args::parse();

    let token = CancellationToken::new();
    let handler_token = token.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        log::info!("Received shutdown signal");
        handler_token.cancel();
    }) {
        log::warn!("Could not install Ctrl-C handler: {}", e);
    }

    let result = match args.command {
        Command::Explore {
            scenario,
            max_steps,
            delay_ms,
            range,
        } => run_explore(&scenario, max_steps, delay_ms, range, token),
        Command::Localize {
            scenario,
            seed,
            max_steps,
            delay_ms,
        } => run_localize(&scenario, seed, max_steps, delay_ms, token),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_scenario(
    path: &Path,
    max_steps: Option<u64>,
    delay_ms: Option<u64>,
) -> anveshak::Result<Scenario> {
    let mut scenario = Scenario::load(path)?;
    if let Some(max_steps) = max_steps {
        scenario.config.runner.max_steps = max_steps;
    }
    if let Some(delay_ms) = delay_ms {
        scenario.config.runner.step_delay_ms = delay_ms;
    }
    if scenario.name.is_empty() {
        scenario.name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
    }
    Ok(scenario)
}

fn run_explore(
    path: &Path,
    max_steps: Option<u64>,
    delay_ms: Option<u64>,
    range: Option<f32>,
    token: CancellationToken,
) -> anveshak::Result<()> {
    let mut scenario = load_scenario(path, max_steps, delay_ms)?;
    if let Some(range) = range {
        scenario.config.exploration.max_range = range;
        scenario.config.validate()?;
    }

    let (world, start) = scenario.build_world()?;
    log::info!(
        "Exploring '{}': {}x{} world, start {}",
        scenario.name,
        world.width(),
        world.height(),
        start
    );

    let mut explorer = Explorer::simulated(Arc::new(world), start, scenario.config.exploration)?;
    let mut observer = RecordingObserver::new();
    let runner = Runner::new(scenario.config.runner).with_token(token);
    let summary = runner.run(&mut explorer, &mut observer)?;

    let stats = explorer.stats();
    log::info!(
        "{:?} after {} steps in {:.2?}",
        summary.outcome,
        summary.steps,
        summary.elapsed
    );
    log::info!(
        "  Coverage: {:.1}% ({} cells revealed, {} travelled, {} scans)",
        explorer.coverage() * 100.0,
        stats.cells_revealed,
        stats.cells_travelled,
        stats.scans
    );
    if stats.failed_plans > 0 {
        log::warn!("  {} frontier plans failed", stats.failed_plans);
    }
    if observer.completions.contains(&Completion::MappingComplete) {
        log::info!("  Mapping complete");
    }
    Ok(())
}

fn run_localize(
    path: &Path,
    seed: Option<u64>,
    max_steps: Option<u64>,
    delay_ms: Option<u64>,
    token: CancellationToken,
) -> anveshak::Result<()> {
    let mut scenario = load_scenario(path, max_steps, delay_ms)?;
    if let Some(seed) = seed {
        scenario.config.localization.seed = seed;
    }

    let (world, start) = scenario.build_world()?;
    log::info!(
        "Localizing '{}': {}x{} world, agent at {}",
        scenario.name,
        world.width(),
        world.height(),
        start
    );

    let mut localizer = Localizer::simulated(Arc::new(world), start, scenario.config.localization)?;
    log::info!("  {} particles", localizer.population());

    let mut observer = RecordingObserver::new();
    let runner = Runner::new(scenario.config.runner).with_token(token);
    let summary = runner.run(&mut localizer, &mut observer)?;

    log::info!(
        "{:?} after {} steps in {:.2?}",
        summary.outcome,
        summary.steps,
        summary.elapsed
    );
    match (summary.outcome, localizer.estimate()) {
        (RunOutcome::Finished, Some(estimate)) => {
            let verdict = if estimate.cell == localizer.agent() {
                "correct"
            } else {
                "wrong"
            };
            log::info!(
                "  Localized at {} (agent at {}, {})",
                estimate.cell,
                localizer.agent(),
                verdict
            );
        }
        (_, Some(estimate)) => {
            log::info!(
                "  Best estimate {} with {:.1}% of particles (agent at {})",
                estimate.cell,
                estimate.fraction * 100.0,
                localizer.agent()
            );
        }
        (_, None) => log::warn!("  No particles left"),
    }
    Ok(())
}
