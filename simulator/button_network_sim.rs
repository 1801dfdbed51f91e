//! Button Network Simulation
//!
//! Run with: cargo run --release --bin button_network_sim
//!
//! Ties threads between random buttons for 30 steps at 5% of the buttons per
//! step, for 100, 1,000 and 10,000 buttons, 25 times each. The largest
//! cluster stays small until about half a thread per button, then jumps to
//! cover most of the floor.

use bn_rust::{Experiment, ExperimentConfig};
use log::info;
use simple_logger::SimpleLogger;

fn main() {
    SimpleLogger::new()
        .with_level(log::LevelFilter::Info)
        .init()
        .unwrap();

    println!("╔════════════════════════════════════════════════════════╗");
    println!("║        Button Network Simulator                        ║");
    println!("╚════════════════════════════════════════════════════════╝\n");

    let config = ExperimentConfig {
        n_values: vec![100, 1000, 10000],
        speed: 0.05,
        steps: 30,
        repetitions: 25,
        seed: None, // Will be auto-generated
        threads: None,
    };

    info!("Configuration:");
    info!("  Node counts: {:?}", config.n_values);
    info!("  Speed: {}", config.speed);
    info!("  Steps: {}", config.steps);
    info!("  Repetitions: {}", config.repetitions);

    let experiment = Experiment::new(config).unwrap();
    let result = experiment.run().unwrap();

    result.print_summary();

    // Largest cluster over threads per button, one column per node count
    println!("Mean largest cluster by step:");
    let averaged = result.averaged();
    print!("{:>6} {:>10}", "step", "threads/n");
    for n in averaged.keys() {
        print!(" {:>10}", format!("n={}", n));
    }
    println!();

    let steps = averaged.values().map(|p| p.len()).max().unwrap_or(0);
    for step in 0..steps {
        let ratio = averaged
            .values()
            .find_map(|points| points.get(step))
            .map(|p| p.mean_ratio)
            .unwrap_or(0.0);
        print!("{:>6} {:>10.2}", step, ratio);
        for points in averaged.values() {
            match points.get(step) {
                Some(p) => print!(" {:>10.4}", p.mean_fraction),
                None => print!(" {:>10}", "-"),
            }
        }
        println!();
    }

    if let Err(e) = result.write_csv("button_network.csv") {
        eprintln!("Error writing CSV: {}", e);
    } else {
        info!("Series written to button_network.csv");
    }

    info!("✓ Simulation complete!");
}
