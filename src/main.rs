use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context;
use chrono::Local;
use clap::{Args, Parser, Subcommand};

use downforce::aero::{drag_from_downforce_or_lift, SampleRange};
use downforce::config::{AeroConfig, CONFIG_FILE};
use downforce::external::{CommandSimulator, LapTimeFormat, TemplateConfigStore, TemplateLayout};
use downforce::optimiser::{BoundaryPolicy, RangeOptimiser};
use downforce::record::{ResultTable, SearchInterval};
use downforce::runner::SimulationRunner;
use downforce::session::{sweep_pass_name, SearchSession, SessionKind, SessionStatus};

/// Find the downforce level with the fastest simulated lap.
#[derive(Debug, Parser)]
#[command(name = "downforce", version, about)]
struct Cli {
    /// Configuration file (defaults to ./downforce.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Log debug detail
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Append logs to downforce.log in the configured logs directory
    #[arg(long, global = true)]
    log_file: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Iteratively narrow the lift range around the fastest lap
    Optimise(OptimiseArgs),
    /// Simulate one evenly spaced sweep over a range
    Sweep(SweepArgs),
    /// Print the drag coefficient the polar gives for a coefficient
    Drag(DragArgs),
}

#[derive(Debug, Args)]
struct OptimiseArgs {
    /// Session name (defaults to OPTIMISE_<timestamp>)
    #[arg(long)]
    session: Option<String>,
    /// Number of narrowing passes
    #[arg(long)]
    iterations: Option<usize>,
    /// Samples per pass
    #[arg(long)]
    samples: Option<usize>,
    /// Starting lift range
    #[arg(long, num_args = 2, value_names = ["START", "END"], allow_hyphen_values = true)]
    range: Option<Vec<f64>>,
    /// Vehicle template file name
    #[arg(long)]
    template: Option<String>,
    /// Keep searching past a boundary sample instead of stopping
    #[arg(long)]
    extend: bool,
    /// Save every pass as pass_<i>.csv in the session
    #[arg(long)]
    save_passes: bool,
}

#[derive(Debug, Args)]
struct SweepArgs {
    /// Lift range to sweep
    #[arg(long, num_args = 2, value_names = ["START", "END"], allow_hyphen_values = true)]
    lift: Option<Vec<f64>>,
    /// Downforce range to sweep
    #[arg(long, num_args = 2, value_names = ["START", "END"], allow_hyphen_values = true)]
    downforce: Option<Vec<f64>>,
    /// Number of samples
    #[arg(long)]
    samples: Option<usize>,
    /// Session name (defaults to RANGE_<timestamp>)
    #[arg(long)]
    session: Option<String>,
    /// Vehicle template file name
    #[arg(long)]
    template: Option<String>,
    /// Name of the saved table (defaults to sweep_<timestamp>)
    #[arg(long, conflicts_with = "no_save")]
    pass: Option<String>,
    /// Do not save the table to the session
    #[arg(long)]
    no_save: bool,
}

#[derive(Debug, Args)]
struct DragArgs {
    /// Lift coefficient
    #[arg(long, allow_hyphen_values = true)]
    lift: Option<f64>,
    /// Downforce coefficient
    #[arg(long, allow_hyphen_values = true)]
    downforce: Option<f64>,
}

fn main() {
    if let Err(error) = run() {
        eprintln!("downforce error: {error:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.clone().unwrap_or_else(|| PathBuf::from(CONFIG_FILE));
    let config = AeroConfig::load_from(&config_path)
        .with_context(|| format!("failed to load configuration from {}", config_path.display()))?;
    let log_dir = cli.log_file.then_some(config.paths.logs_dir.as_path());
    init_tracing(cli.quiet, cli.verbose, log_dir)?;

    match cli.command {
        Command::Optimise(args) => optimise(&config, args),
        Command::Sweep(args) => sweep(&config, args),
        Command::Drag(args) => {
            let drag = drag_from_downforce_or_lift(args.downforce, args.lift, &config.polar)?;
            println!("{drag}");
            Ok(())
        }
    }
}

fn init_tracing(quiet: bool, verbose: bool, log_dir: Option<&Path>) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("DOWNFORCE_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let result = if let Some(dir) = log_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("cannot create log directory {}", dir.display()))?;
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(dir.join("downforce.log"))
            .context("cannot open log file")?;
        builder.with_ansi(false).with_writer(Mutex::new(file)).try_init()
    } else {
        builder.with_writer(std::io::stderr).try_init()
    };

    result.map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))
}

fn range_arg(values: Option<Vec<f64>>) -> Option<[f64; 2]> {
    values.and_then(|v| <[f64; 2]>::try_from(v).ok())
}

fn start_runner<'a>(
    config: &AeroConfig,
    simulator: &'a mut CommandSimulator,
    template: Option<String>,
) -> SimulationRunner<TemplateConfigStore, &'a mut CommandSimulator> {
    let layout = TemplateLayout {
        description_column: config.vehicle.description_column.clone(),
        value_column: config.vehicle.value_column.clone(),
        drag_row: config.vehicle.drag_row.clone(),
        lift_row: config.vehicle.lift_row.clone(),
    };
    let vehicle = TemplateConfigStore::new(&config.paths.templates_dir, simulator.vehicle_file())
        .with_layout(layout);
    let format = LapTimeFormat::new(config.simulator.header_rows, &config.simulator.time_column)
        .sigfigs(config.search.sigfigs);
    let template = template.unwrap_or_else(|| config.vehicle.template.clone());
    SimulationRunner::new(vehicle, simulator, template).with_format(format)
}

fn optimise(config: &AeroConfig, args: OptimiseArgs) -> anyhow::Result<()> {
    let search = &config.search;
    let iterations = args.iterations.unwrap_or(search.iterations);
    let samples = args.samples.unwrap_or(search.samples);
    let range = range_arg(args.range).unwrap_or(search.starting_range);
    let boundary = if args.extend {
        BoundaryPolicy::Extend
    } else {
        search.boundary
    };

    let name = args
        .session
        .unwrap_or_else(|| SessionKind::Optimise.default_name());
    let mut session = SearchSession::open(&config.paths.results_dir, &name, SessionKind::Optimise)?;
    let mut simulator =
        CommandSimulator::start(&config.paths.simulator_dir, config.simulator.clone())?;
    let mut runner = start_runner(config, &mut simulator, args.template);

    let optimum = RangeOptimiser::new(config.polar)
        .sigfigs(search.sigfigs)
        .boundary(boundary)
        .persist_passes(args.save_passes)
        .optimise(
            &mut runner,
            &mut session,
            iterations,
            SearchInterval::from(range),
            samples,
        )
        .with_context(|| format!("optimisation in session '{name}' failed"))?;

    for (i, pass) in optimum.passes().iter().enumerate() {
        println!(
            "pass {i}: {} -> best #{} ({})",
            pass.interval, pass.best_index, pass.best
        );
    }
    println!("optimum: {}", optimum.best());
    Ok(())
}

fn sweep(config: &AeroConfig, args: SweepArgs) -> anyhow::Result<()> {
    let range = SampleRange::from_options(range_arg(args.lift), range_arg(args.downforce))?;
    let samples = args.samples.unwrap_or(config.search.samples);

    let name = args.session.unwrap_or_else(|| SessionKind::Range.default_name());
    let mut session = SearchSession::open(&config.paths.results_dir, &name, SessionKind::Range)?;
    let mut simulator =
        CommandSimulator::start(&config.paths.simulator_dir, config.simulator.clone())?;
    let mut runner = start_runner(config, &mut simulator, args.template);

    let optimiser = RangeOptimiser::new(config.polar).sigfigs(config.search.sigfigs);
    let pass = (!args.no_save).then(|| {
        let base = args.pass.unwrap_or_else(|| sweep_pass_name(Local::now()));
        session.fresh_pass_name(&base)
    });
    let outcome = optimiser.simulate_range(&mut runner, &session, range, samples, pass.as_deref());
    let table = finish_sweep(&mut session, outcome)
        .with_context(|| format!("sweep in session '{name}' failed"))?;

    if let Some(pass) = pass {
        tracing::info!(table = %session.table_path(&pass).display(), "sweep saved");
    }
    print!("{}", table.to_csv());
    Ok(())
}

/// Record the sweep outcome in the manifest. A failed sweep is reported over a
/// failed manifest write.
fn finish_sweep(
    session: &mut SearchSession,
    outcome: downforce::Result<ResultTable>,
) -> anyhow::Result<ResultTable> {
    let (status, best) = match &outcome {
        Ok(table) => (SessionStatus::Success, table.best().copied()),
        Err(_) => (SessionStatus::Failed, None),
    };
    match (session.complete(status, best), outcome) {
        (Ok(()), outcome) => Ok(outcome?),
        (Err(error), Ok(_)) => Err(error).context("could not update session manifest"),
        (Err(error), Err(sweep)) => {
            tracing::warn!(%error, "could not update session manifest");
            Err(sweep.into())
        }
    }
}
