//! Viscous wave field sweep
//!
//! Evaluates the fundamental solution (or pressure) of the viscous acoustic
//! wave equation on a radius or time × radius grid and writes the values as
//! JSON for plotting.
//!
//! Usage:
//!   cargo run --release --bin sweep-field -- --config configs/lxe.json --output field.json
//!   cargo run --release --bin sweep-field -- --dry-run
//!   cargo run --release --bin sweep-field -- --help

use clap::{Parser, ValueEnum};
use math_audio_viscous_wave::{
    CancellationToken, FieldResult, Kernel, Progress, QuadratureRule, SubintervalPolicy,
    SweepConfig, TimeConfig, WaveError, create_output_json, default_config, parallel,
    print_sweep_summary,
};
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

#[derive(Parser, Debug)]
#[command(
    name = "sweep-field",
    about = "Evaluate the viscous wave fundamental solution on a radius/time grid"
)]
struct Args {
    /// Sweep configuration (JSON); defaults to a unit medium
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output JSON file
    #[arg(short, long, default_value = "field.json")]
    output: PathBuf,

    /// Write the default configuration to this path and exit
    #[arg(long)]
    write_default_config: Option<PathBuf>,

    /// Override the relative truncation tolerance δ
    #[arg(long)]
    delta: Option<f64>,

    /// Override the number of samples per oscillation period
    #[arg(long)]
    samples_per_period: Option<f64>,

    /// Override how the subinterval count is derived
    #[arg(long, value_enum)]
    subintervals: Option<CliSubintervals>,

    /// Override the integrated quantity
    #[arg(long, value_enum)]
    kernel: Option<CliKernel>,

    /// Override the quadrature evaluation order
    #[arg(long, value_enum)]
    rule: Option<CliRule>,

    /// Number of threads (default: all cores)
    #[arg(long)]
    threads: Option<usize>,

    /// Evaluate grid points one after the other
    #[arg(long)]
    sequential: bool,

    /// Stop the sweep after this many seconds
    #[arg(long)]
    max_seconds: Option<f64>,

    /// Print the plan summary and exit without integrating
    #[arg(long)]
    dry_run: bool,

    /// Report progress after every grid point
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliKernel {
    Fundamental,
    Pressure,
}

impl From<CliKernel> for Kernel {
    fn from(k: CliKernel) -> Self {
        match k {
            CliKernel::Fundamental => Kernel::Fundamental,
            CliKernel::Pressure => Kernel::Pressure,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliRule {
    Shared,
    Independent,
}

impl From<CliRule> for QuadratureRule {
    fn from(r: CliRule) -> Self {
        match r {
            CliRule::Shared => QuadratureRule::Shared,
            CliRule::Independent => QuadratureRule::Independent,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliSubintervals {
    Literal,
    FromCutoff,
}

impl From<CliSubintervals> for SubintervalPolicy {
    fn from(s: CliSubintervals) -> Self {
        match s {
            CliSubintervals::Literal => SubintervalPolicy::Literal,
            CliSubintervals::FromCutoff => SubintervalPolicy::FromCutoff,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args = Args::parse();

    if let Some(path) = &args.write_default_config {
        default_config().to_file(path)?;
        println!("Default configuration written to: {}", path.display());
        return Ok(());
    }

    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()?;
        println!("Using {} threads (user-specified)\n", threads);
    }

    // Load configuration
    let mut config = if let Some(config_path) = &args.config {
        println!("Loading configuration from: {}", config_path.display());
        SweepConfig::from_file(config_path)?
    } else {
        println!("No configuration file specified, using default unit medium");
        default_config()
    };
    apply_overrides(&mut config, &args);

    let token = CancellationToken::new();
    let sampler = config.to_sampler()?.cancellation(token.clone());

    let radii = config.radius.values();
    let times = config.time.values();
    let summary = sampler.summarize(&times, &radii)?;
    print_sweep_summary(&config, &summary);

    if args.dry_run {
        return Ok(());
    }
    if config.parallel && parallel::is_parallel_available() {
        println!("\nRunning on {} threads", parallel::worker_count());
    }

    if let Some(limit) = args.max_seconds {
        token.cancel_after(Duration::try_from_secs_f64(limit)?);
    }

    let start = Instant::now();
    let total = summary.points;
    let last_report = AtomicUsize::new(0);
    let report_every = if args.verbose { 1 } else { (total / 20).max(1) };
    let progress = |p: Progress| {
        let elapsed = start.elapsed().as_secs_f64();
        let previous = last_report.load(Ordering::Relaxed);
        if p.completed == p.total || p.completed >= previous + report_every {
            last_report.store(p.completed, Ordering::Relaxed);
            let rate = p.completed as f64 / elapsed.max(1e-9);
            let remaining = (p.total - p.completed) as f64 / rate;
            println!(
                "  [{}/{}] {:.1}% ({:.1}s elapsed, ~{:.1}s remaining)",
                p.completed,
                p.total,
                100.0 * p.fraction(),
                elapsed,
                remaining
            );
        }
    };

    let result = match config.time {
        TimeConfig::Single { t } => sampler
            .sample_radial(&radii, t, Some(&progress))
            .map(FieldResult::Radial),
        TimeConfig::Grid { .. } => sampler
            .sample_field(&times, &radii, Some(&progress))
            .map(FieldResult::Field),
    };
    let result = match result {
        Ok(result) => result,
        Err(e @ WaveError::Cancelled { .. }) => {
            eprintln!("Sweep stopped after {:.1}s: {}", start.elapsed().as_secs_f64(), e);
            return Err(e.into());
        }
        Err(e) => return Err(e.into()),
    };
    let elapsed = start.elapsed().as_secs_f64();

    let non_finite = result.non_finite_count();
    if non_finite > 0 {
        log::warn!("{} non-finite values in output", non_finite);
    }

    let output_data = create_output_json(&config, &summary, &result, elapsed);
    println!("\nSaving results to: {}", args.output.display());
    fs::write(&args.output, serde_json::to_string_pretty(&output_data)?)?;
    println!("Done in {:.2}s!", elapsed);

    Ok(())
}

fn apply_overrides(config: &mut SweepConfig, args: &Args) {
    if let Some(delta) = args.delta {
        config.tolerances.relative_error = delta;
    }
    if let Some(n_p) = args.samples_per_period {
        config.tolerances.samples_per_period = n_p;
    }
    if let Some(policy) = args.subintervals {
        config.tolerances.subinterval_policy = policy.into();
    }
    if let Some(kernel) = args.kernel {
        config.kernel = kernel.into();
    }
    if let Some(rule) = args.rule {
        config.rule = rule.into();
    }
    if args.sequential {
        config.parallel = false;
    }
}
