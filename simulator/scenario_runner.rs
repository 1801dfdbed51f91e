// Scenario Runner - Load and execute experiment YAML files
//
// Usage:
//   cargo run --release --bin scenario_runner scenarios/classic.yaml
//   cargo run --release --bin scenario_runner scenarios/  (runs all .yaml files in directory)
//   cargo run --release --bin scenario_runner scenarios/classic.yaml --seed 0x1234... --threads 8

use std::env;
use std::path::Path;

use bn_rust::bn_interface::{format_seed_hex, parse_seed_hex};
use bn_rust::bn_scenario::scenario_files;
use bn_rust::{Experiment, ScenarioError, ScenarioFile, Seed};
use log::{error, info};
use simple_logger::SimpleLogger;

struct Overrides {
    seed: Option<Seed>,
    threads: Option<usize>,
}

fn main() {
    let _ = SimpleLogger::new().with_level(log::LevelFilter::Info).init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <scenario.yaml | directory/> [--seed SEED_HEX] [--threads N]", args[0]);
        eprintln!("\nExamples:");
        eprintln!("  {} scenarios/classic.yaml", args[0]);
        eprintln!("  {} scenarios/", args[0]);
        eprintln!("  {} scenarios/classic.yaml --seed 0x2a --threads 4", args[0]);
        std::process::exit(1);
    }

    let overrides = match parse_overrides(&args[2..]) {
        Ok(o) => o,
        Err(msg) => {
            eprintln!("{}", msg);
            std::process::exit(1);
        }
    };

    let files = match scenario_files(&args[1]) {
        Ok(files) => files,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    if files.is_empty() {
        eprintln!("No scenario files found in {}", args[1]);
        std::process::exit(1);
    }

    let mut failures = 0;
    for file in &files {
        if let Err(e) = run_scenario(file, &overrides) {
            error!("{}: {}", file.display(), e);
            failures += 1;
        }
    }

    if failures > 0 {
        eprintln!("\n✗ {} of {} scenarios failed", failures, files.len());
        std::process::exit(1);
    }
}

fn parse_overrides(args: &[String]) -> Result<Overrides, String> {
    let mut overrides = Overrides {
        seed: None,
        threads: None,
    };

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--seed" => {
                let value = args.get(i + 1).ok_or("--seed needs a value")?;
                overrides.seed = Some(parse_seed_hex(value).map_err(|e| e.to_string())?);
                i += 2;
            }
            "--threads" => {
                let value = args.get(i + 1).ok_or("--threads needs a value")?;
                let threads = value
                    .parse::<usize>()
                    .map_err(|e| format!("Invalid thread count {}: {}", value, e))?;
                overrides.threads = Some(threads);
                i += 2;
            }
            other => return Err(format!("Unknown argument: {}", other)),
        }
    }

    Ok(overrides)
}

fn run_scenario(path: &Path, overrides: &Overrides) -> Result<(), ScenarioError> {
    println!("\n╔════════════════════════════════════════════════════════╗");
    println!("║  Loading: {:<44} ║", path.display());
    println!("╚════════════════════════════════════════════════════════╝\n");

    let scenario = ScenarioFile::load(path)?;

    println!("Scenario: {}", scenario.display_name());
    if let Some(desc) = &scenario.meta.description {
        println!("Description: {}", desc);
    }
    if let Some(hypothesis) = &scenario.meta.hypothesis {
        println!("Hypothesis: {}", hypothesis);
    }
    println!();

    let mut config = scenario.experiment_config()?;
    if overrides.seed.is_some() {
        config.seed = overrides.seed;
    }
    if overrides.threads.is_some() {
        config.threads = overrides.threads;
    }

    println!("Configuration:");
    println!("  Node counts: {:?}", config.n_values);
    println!("  Speed: {}", config.speed);
    println!("  Steps: {}", config.steps);
    println!("  Repetitions: {}", config.repetitions);
    if let Some(seed) = &config.seed {
        println!("  Seed: {}", format_seed_hex(seed));
    }
    println!("\nStarting experiment...\n");

    let result = Experiment::new(config)?.run()?;
    result.print_summary();

    if let Some(csv) = &scenario.output.csv {
        result.write_csv(csv).map_err(|source| ScenarioError::Io {
            path: csv.clone(),
            source,
        })?;
        info!("Wrote per-run series to {}", csv.display());
    }
    if let Some(csv) = &scenario.output.averaged_csv {
        result
            .write_averaged_csv(csv)
            .map_err(|source| ScenarioError::Io {
                path: csv.clone(),
                source,
            })?;
        info!("Wrote averaged series to {}", csv.display());
    }

    println!("✓ Scenario complete! Replay with --seed {}\n", format_seed_hex(&result.seed_used));
    Ok(())
}
