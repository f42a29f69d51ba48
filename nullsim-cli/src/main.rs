//! nullsim CLI: weighted coupon-collector null distributions.
//!
//! Commands:
//! - `run`: simulate a null distribution from a TOML config or inline flags
//! - `realize`: draw a single realization (optionally with its draw trace)
//! - `expect`: closed-form expected excess draws for uniform weights

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};

use nullsim_core::{HashMarks, NoProgress, Realizer, TrialProgress, Weights};
use nullsim_runner::{
    expected_excess_uniform, run_simulation, save_artifacts, SimConfig, SimulationResult,
    WeightSource,
};

#[derive(Parser)]
#[command(
    name = "nullsim",
    about = "nullsim: Monte Carlo null distributions for weighted unique-draw counts"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a null distribution and save result.json + samples.csv.
    Run {
        /// Path to a TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Weights file, one weight per line (instead of --config).
        #[arg(long)]
        weights: Option<PathBuf>,

        /// Distinct items to collect. Required with --weights, overrides the config value.
        #[arg(long)]
        target: Option<usize>,

        /// Number of trials. Required with --weights, overrides the config value.
        #[arg(long)]
        trials: Option<usize>,

        /// RNG seed. Overrides the config value.
        #[arg(long)]
        seed: Option<u64>,

        /// Use a single RNG stream instead of the parallel driver.
        #[arg(long, default_value_t = false)]
        sequential: bool,

        /// Suppress progress markers.
        #[arg(long, default_value_t = false)]
        quiet: bool,

        /// Output directory for artifacts.
        #[arg(long, default_value = "results")]
        output_dir: PathBuf,
    },
    /// Draw one realization of the excess-draws statistic.
    Realize {
        /// Weights file, one weight per line.
        #[arg(long)]
        weights: PathBuf,

        /// Distinct items to collect.
        #[arg(long)]
        target: usize,

        /// RNG seed. Defaults to OS entropy.
        #[arg(long)]
        seed: Option<u64>,

        /// Print the full draw buffer and refill round count.
        #[arg(long, default_value_t = false)]
        trace: bool,
    },
    /// Expected excess draws for uniform weights.
    Expect {
        /// Population size M.
        #[arg(long)]
        population: usize,

        /// Distinct items to collect.
        #[arg(long)]
        target: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            weights,
            target,
            trials,
            seed,
            sequential,
            quiet,
            output_dir,
        } => run_cmd(
            config, weights, target, trials, seed, sequential, quiet, output_dir,
        ),
        Commands::Realize {
            weights,
            target,
            seed,
            trace,
        } => realize_cmd(&weights, target, seed, trace),
        Commands::Expect { population, target } => expect_cmd(population, target),
    }
}

#[allow(clippy::too_many_arguments)]
fn run_cmd(
    config_path: Option<PathBuf>,
    weights_path: Option<PathBuf>,
    target: Option<usize>,
    trials: Option<usize>,
    seed: Option<u64>,
    sequential: bool,
    quiet: bool,
    output_dir: PathBuf,
) -> Result<()> {
    if config_path.is_some() && weights_path.is_some() {
        bail!("--config and --weights are mutually exclusive");
    }

    let mut config = match (config_path, weights_path) {
        (Some(path), None) => SimConfig::from_file(&path)
            .with_context(|| format!("loading config {}", path.display()))?,
        (None, Some(path)) => {
            let (Some(target), Some(trials)) = (target, trials) else {
                bail!("--weights requires --target and --trials");
            };
            SimConfig::new(target, trials, WeightSource::File(path))
        }
        _ => bail!("one of --config or --weights is required"),
    };

    apply_overrides(&mut config, target, trials, seed, sequential, quiet);
    config.validate()?;

    let marks;
    let progress: &dyn TrialProgress = if config.simulation.progress {
        marks = HashMarks::stderr();
        &marks
    } else {
        &NoProgress
    };

    let result = run_simulation(&config, progress)?;
    print_summary(&result);

    let run_dir = save_artifacts(&result, &output_dir)?;
    println!("Artifacts saved to: {}", run_dir.display());

    Ok(())
}

/// Command-line flags win over values loaded from a config file.
fn apply_overrides(
    config: &mut SimConfig,
    target: Option<usize>,
    trials: Option<usize>,
    seed: Option<u64>,
    sequential: bool,
    quiet: bool,
) {
    let sim = &mut config.simulation;
    if let Some(target) = target {
        sim.target = target;
    }
    if let Some(trials) = trials {
        sim.trials = trials;
    }
    if let Some(seed) = seed {
        sim.seed = seed;
    }
    if sequential {
        sim.parallel = false;
    }
    if quiet {
        sim.progress = false;
    }
}

fn realize_cmd(weights_path: &Path, target: usize, seed: Option<u64>, trace: bool) -> Result<()> {
    let weights = Weights::from_file(weights_path)
        .with_context(|| format!("loading weights {}", weights_path.display()))?;
    let realizer = Realizer::new(target, &weights)?;
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    if trace {
        let realization = realizer.realize_traced(&mut rng)?;
        println!("{}", serde_json::to_string_pretty(&realization)?);
    } else {
        println!("{}", realizer.realize(&mut rng)?);
    }
    Ok(())
}

fn expect_cmd(population: usize, target: usize) -> Result<()> {
    let Some(expected) = expected_excess_uniform(population, target) else {
        bail!("target must be between 1 and population ({population})");
    };
    println!("{expected:.6}");
    Ok(())
}

fn print_summary(result: &SimulationResult) {
    let s = &result.summary;
    println!("=== Null distribution ===");
    println!("Run ID:       {}", result.run_id);
    println!(
        "Population:   {} ({} with positive weight)",
        result.population, result.support
    );
    println!("Target (m):   {}", result.target);
    println!("Trials (n):   {}", result.trials);
    println!(
        "Driver:       {} (seed {})",
        if result.parallel { "parallel" } else { "sequential" },
        result.seed
    );
    println!("Mean:         {:.4} (± {:.4} s.e.)", s.mean, s.std_error());
    println!("Std dev:      {:.4}", s.std_dev);
    println!("Median:       {:.1}", s.median);
    println!("5%-95%:       {:.1} to {:.1}", s.p05, s.p95);
    println!("Min / Max:    {} / {}", s.min, s.max);
    if let Some(expected) = result.uniform_expectation {
        println!("Uniform E[X]: {expected:.4}");
    }
    println!("Duration:     {:.2}s", result.duration_secs);
}
