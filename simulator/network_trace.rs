//! Trace a single button network run
//!
//! Run with:
//!   cargo run --example network_trace -- [n] [speed] [steps] [--csv events.csv] [--verbose]
//!
//! Uses a fixed seed so repeated invocations print the same trace.

mod sinks;

use std::env;

use bn_rust::bn_interface::format_seed_hex;
use bn_rust::{ButtonNetwork, EventSink, SimConfig};
use log::info;
use simple_logger::SimpleLogger;
use sinks::{ConsoleEventSink, CsvEventSink};

fn main() {
    SimpleLogger::new()
        .with_level(log::LevelFilter::Info)
        .init()
        .unwrap();

    let args: Vec<String> = env::args().skip(1).collect();
    let mut positional = Vec::new();
    let mut csv_path = None;
    let mut verbose = false;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--csv" => {
                csv_path = args.get(i + 1).cloned();
                i += 2;
            }
            "--verbose" => {
                verbose = true;
                i += 1;
            }
            other => {
                positional.push(other.to_string());
                i += 1;
            }
        }
    }

    let defaults = SimConfig::default();
    let config = SimConfig {
        n: positional
            .first()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.n),
        speed: positional
            .get(1)
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.speed),
        steps: positional
            .get(2)
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.steps),
        seed: Some([42u8; 32]),
    };

    let sink: Box<dyn EventSink + Send> = match &csv_path {
        Some(path) => match CsvEventSink::new(path) {
            Ok(sink) => Box::new(sink),
            Err(e) => {
                eprintln!("Failed to create {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => Box::new(ConsoleEventSink::new(verbose)),
    };

    info!(
        "Tracing n={} speed={} steps={}",
        config.n, config.speed, config.steps
    );

    let mut network = match ButtonNetwork::new_with_sink(config, sink) {
        Ok(network) => network,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    network.run();
    let report = network.report();

    println!("\n=== Run Report ===");
    println!("Seed: {}", format_seed_hex(&network.seed_used()));
    println!("Steps: {}", report.steps_taken);
    println!(
        "Threads: {} ({} distinct, {} redundant)",
        report.threads, report.distinct_threads, report.redundant_threads
    );
    println!("Clusters: {}", report.clusters);
    println!(
        "Largest cluster: {} ({:.1}% of buttons)",
        report.largest_cluster,
        report.max_cluster_fraction * 100.0
    );
    println!("Threads per button: {:.3}", report.threads_to_node_ratio);

    if let Some(path) = csv_path {
        info!("Events exported to: {}", path);
    }
}
