// Profiling Runner - Scenario runner with timing instrumentation
//
// Usage:
//   cargo run --bin profiling_runner --release scenarios/classic.yaml

use std::env;
use std::path::Path;
use std::time::{Duration, Instant};

use bn_rust::{ButtonNetwork, Experiment, ScenarioFile, SimConfig};

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <scenario.yaml>", args[0]);
        eprintln!("\nExample:");
        eprintln!("  {} scenarios/classic.yaml", args[0]);
        std::process::exit(1);
    }

    let path = Path::new(&args[1]);

    println!("\n╔════════════════════════════════════════════════════════╗");
    println!("║  PROFILING RUNNER                                      ║");
    println!("╚════════════════════════════════════════════════════════╝\n");

    let total_start = Instant::now();

    // Time: loading and parsing YAML
    let load_start = Instant::now();
    println!("Loading scenario from: {}", path.display());

    let scenario = ScenarioFile::load(path).unwrap_or_else(|e| {
        eprintln!("Failed to load {}: {}", path.display(), e);
        std::process::exit(1);
    });
    let config = scenario.experiment_config().unwrap_or_else(|e| {
        eprintln!("Invalid scenario {}: {}", path.display(), e);
        std::process::exit(1);
    });

    let load_time = load_start.elapsed();
    println!("  ✓ Scenario loaded: {:?}", load_time);

    // Time: one sequential run per node count, split into steps
    println!("\nSingle-run step timings:");
    let mut single_run_time = Duration::ZERO;
    for &n in &config.n_values {
        let sim = SimConfig {
            n,
            speed: config.speed,
            steps: config.steps,
            seed: config.seed,
        };
        let mut network = ButtonNetwork::new(sim).unwrap_or_else(|e| {
            eprintln!("{}", e);
            std::process::exit(1);
        });

        let run_start = Instant::now();
        let mut slowest = Duration::ZERO;
        for _ in 0..config.steps {
            let step_start = Instant::now();
            network.run_step();
            slowest = slowest.max(step_start.elapsed());
        }
        let run_time = run_start.elapsed();
        single_run_time += run_time;

        let per_step = if config.steps > 0 {
            run_time / config.steps as u32
        } else {
            Duration::ZERO
        };
        println!(
            "  n={:<8} total {:>10.2?}  avg/step {:>10.2?}  slowest step {:>10.2?}  threads {}",
            n,
            run_time,
            per_step,
            slowest,
            network.thread_count()
        );
    }

    // Time: the full parallel experiment
    let experiment_start = Instant::now();
    let experiment = Experiment::new(config).unwrap_or_else(|e| {
        eprintln!("{}", e);
        std::process::exit(1);
    });
    let runs = experiment.config().total_runs();
    let result = experiment.run().unwrap_or_else(|e| {
        eprintln!("Experiment failed: {}", e);
        std::process::exit(1);
    });
    let experiment_time = experiment_start.elapsed();

    // Time: aggregation
    let aggregate_start = Instant::now();
    let averaged = result.averaged();
    let aggregate_time = aggregate_start.elapsed();

    let total_time = total_start.elapsed();

    println!("\n╔════════════════════════════════════════════════════════╗");
    println!("║  TIMING BREAKDOWN                                      ║");
    println!("╚════════════════════════════════════════════════════════╝\n");

    let pct = |d: Duration| d.as_secs_f64() / total_time.as_secs_f64().max(f64::EPSILON) * 100.0;

    println!("  Load scenario:      {:>12.2?} ({:>5.1}%)", load_time, pct(load_time));
    println!("  Single runs:        {:>12.2?} ({:>5.1}%)", single_run_time, pct(single_run_time));
    println!("  Experiment:         {:>12.2?} ({:>5.1}%)", experiment_time, pct(experiment_time));
    println!("  Aggregation:        {:>12.2?} ({:>5.1}%)", aggregate_time, pct(aggregate_time));
    println!("  Total:              {:>12.2?}", total_time);
    println!();
    println!(
        "  Throughput: {:.1} runs/s ({} runs, {} series)",
        runs as f64 / experiment_time.as_secs_f64().max(f64::EPSILON),
        runs,
        averaged.len()
    );
    println!();
}
