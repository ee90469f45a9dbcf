//! u-separation - Mineral Separation Circuit Optimizer
//!
//! Runs a batch of adaptive GA searches for the best circuit of `n`
//! separation units and writes the winner to a report file.
//!
//! # Usage
//!
//! ```bash
//! u-separation --units 10 --runs 20 --seed 42
//! RUST_LOG=u_separation=debug u-separation --config settings.json --output-dir out
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use u_separation::{
    error::{CircuitError, Result},
    ga::BatchRunner,
    report::CircuitReport,
    settings::RunSettings,
};

/// Mineral separation circuit optimizer
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON settings file; command-line options override its values
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory for the circuit report [default: <exe dir>/../data]
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Separation units per circuit
    #[arg(short = 'n', long)]
    units: Option<usize>,

    /// Circuits per generation
    #[arg(short, long)]
    population: Option<usize>,

    /// Maximum generations per run
    #[arg(short, long)]
    generations: Option<usize>,

    /// Unchanged generations that stop a run (0 disables)
    #[arg(short, long)]
    threshold: Option<usize>,

    /// Independent runs
    #[arg(short, long)]
    runs: Option<usize>,

    /// Base random seed
    #[arg(short, long)]
    seed: Option<u64>,

    /// Adaptive crossover scale for above-average pairs
    #[arg(long)]
    k1: Option<f64>,

    /// Adaptive mutation scale for above-average children
    #[arg(long)]
    k2: Option<f64>,

    /// Crossover probability for below-average pairs
    #[arg(long)]
    k3: Option<f64>,

    /// Mutation probability for below-average children
    #[arg(long)]
    k4: Option<f64>,

    /// Income per kg of mineral in the concentrate
    #[arg(long)]
    mineral_price: Option<f64>,

    /// Charge per kg of waste in the concentrate
    #[arg(long)]
    waste_cost: Option<f64>,

    /// Mineral feed rate (kg/s)
    #[arg(long)]
    feed_mineral: Option<f64>,

    /// Waste feed rate (kg/s)
    #[arg(long)]
    feed_waste: Option<f64>,

    /// Steady-state tolerance of the flow simulation
    #[arg(long)]
    tolerance: Option<f64>,

    /// Iteration cap of the flow simulation
    #[arg(long)]
    max_iterations: Option<usize>,

    /// Run everything on the calling thread
    #[arg(long)]
    sequential: bool,
}

impl Args {
    fn settings(&self) -> Result<RunSettings> {
        let mut s = match &self.config {
            Some(path) => RunSettings::from_json_file(path)?,
            None => RunSettings::default(),
        };

        let ga = &mut s.ga;
        set(&mut ga.num_units, self.units);
        set(&mut ga.population_size, self.population);
        set(&mut ga.max_generations, self.generations);
        set(&mut ga.stagnation_limit, self.threshold);
        set(&mut ga.rates.k1, self.k1);
        set(&mut ga.rates.k2, self.k2);
        set(&mut ga.rates.k3, self.k3);
        set(&mut ga.rates.k4, self.k4);
        if self.seed.is_some() {
            ga.seed = self.seed;
        }
        if self.sequential {
            ga.parallel = false;
        }

        set(&mut s.economics.mineral_price, self.mineral_price);
        set(&mut s.economics.waste_cost, self.waste_cost);
        set(&mut s.feed.mineral, self.feed_mineral);
        set(&mut s.feed.waste, self.feed_waste);
        set(&mut s.simulator.tolerance, self.tolerance);
        set(&mut s.simulator.max_iterations, self.max_iterations);
        set(&mut s.runs, self.runs);

        s.validate()?;
        Ok(s)
    }

    fn output_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.output_dir {
            return Ok(dir.clone());
        }
        let exe = std::env::current_exe().map_err(|source| CircuitError::Io {
            path: PathBuf::from("<current executable>"),
            source,
        })?;
        let exe_dir = exe.parent().map(PathBuf::from).unwrap_or_default();
        Ok(exe_dir.join("..").join("data"))
    }
}

fn set<T>(slot: &mut T, value: Option<T>) {
    if let Some(v) = value {
        *slot = v;
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = args.settings()?;
    let evaluator = settings.evaluator();
    info!(
        units = settings.ga.num_units,
        population = settings.ga.population_size,
        runs = settings.runs,
        "starting optimization"
    );

    let batch = BatchRunner::run(&evaluator, &settings.ga, settings.runs)?;
    for (i, run) in batch.runs.iter().enumerate() {
        println!(
            "run {i}: performance {:.4} after {} generations: {}",
            run.best_performance,
            run.generations,
            join(&run.best)
        );
    }

    let best = batch.best();
    let evaluation = evaluator.evaluate_detailed(&best.best)?;
    let report = CircuitReport::new(best.best.clone(), best.best_generation, evaluation);
    let path = report.write_to(&args.output_dir()?)?;

    println!(
        "After {} runs the best performance is {:.4}",
        batch.runs.len(),
        best.best_performance
    );
    println!("Best circuit: {}", join(&best.best));
    println!("Report: {}", path.display());

    Ok(())
}

fn join(encoding: &[usize]) -> String {
    encoding
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}
