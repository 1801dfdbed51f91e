//! # bn_rust - Button Network
//!
//! Simulates the "button network": N buttons on the floor, and at every step
//! threads are tied between random pairs of them. Each step records the
//! number of threads per button and the share of buttons that hang together
//! in the largest cluster. Sweeping N shows the phase transition from loose
//! buttons to one giant cluster.
//!
//! ## Core Components
//!
//! - **ButtonNetwork**: a single run; ties threads and records the series
//! - **ClusterForest**: union-find that keeps the cluster partition and the
//!   largest cluster size current on every thread
//! - **ThreadLedger**: every thread tied so far, duplicates included
//! - **MetricsLog**: the per-step `(threads/button, largest cluster)` series
//! - **Experiment**: sweeps node counts with repetitions, in parallel
//!
//! ```no_run
//! use bn_rust::{Experiment, ExperimentConfig};
//!
//! let experiment = Experiment::new(ExperimentConfig {
//!     seed: Some([42u8; 32]),
//!     ..Default::default()
//! })
//! .unwrap();
//! let result = experiment.run().unwrap();
//! result.print_summary();
//! result.write_csv("button_network.csv").unwrap();
//! ```
//!
//! ## Simulation binaries
//!
//! See `simulator/` for the scenario runner, which loads YAML experiment
//! definitions from `scenarios/`.

pub mod bn_interface;
pub mod bn_metrics;
pub mod bn_simulator;

pub mod bn_clusters;
pub mod bn_threads;

pub mod bn_experiment;
pub mod bn_scenario;

// Re-export commonly used types
pub use bn_interface::{ConfigError, Event, EventSink, LogSink, NoOpSink, NodeId, Seed, Step};
pub use bn_metrics::{MetricsLog, MetricsSample};
pub use bn_simulator::{ButtonNetwork, RunReport, SimConfig};
pub use bn_experiment::{
    AggregatePoint, ArrangedRow, Experiment, ExperimentConfig, ExperimentError, ExperimentResult,
    RunRecord, GIANT_CLUSTER_THRESHOLD,
};
pub use bn_scenario::{ScenarioError, ScenarioFile};
