//! Parameter sweeps over the button network.
//!
//! An experiment runs every node count in its sweep `repetitions` times.
//! Runs share nothing, so they execute in parallel on a rayon pool. Each
//! run's seed is derived from the experiment's master seed in sweep order
//! before any work is scheduled, which keeps seeded experiments identical
//! whatever the thread count.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::{Duration, Instant};

use hashbrown::HashSet;
use indexmap::IndexMap;
use log::info;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;
use thiserror::Error;

use crate::bn_interface::{
    format_seed_hex, ConfigError, EventSink, LogSink, NoOpSink, Seed, Step,
};
use crate::bn_metrics::MetricsLog;
use crate::bn_simulator::{ButtonNetwork, RunReport, SimConfig};

/// Share of buttons the largest cluster must reach to count as a giant cluster
pub const GIANT_CLUSTER_THRESHOLD: f64 = 0.5;

#[derive(Debug, Error)]
pub enum ExperimentError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Configuration for a sweep
#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentConfig {
    /// Node counts to sweep, in report order
    pub n_values: Vec<usize>,

    pub speed: f64,

    pub steps: usize,

    /// Independent runs per node count
    pub repetitions: usize,

    /// Master seed (None = generate random)
    pub seed: Option<Seed>,

    /// Worker threads (None = rayon default)
    pub threads: Option<usize>,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            n_values: vec![100, 1000, 10000],
            speed: 0.05,
            steps: 30,
            repetitions: 25,
            seed: None,
            threads: None,
        }
    }
}

impl ExperimentConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n_values.is_empty() {
            return Err(ConfigError::EmptySweep);
        }
        if self.repetitions == 0 {
            return Err(ConfigError::NoRepetitions);
        }
        let mut seen = HashSet::with_capacity(self.n_values.len());
        for &n in &self.n_values {
            self.sim_config(n, None).validate()?;
            // runs are identified by (n, repetition)
            if !seen.insert(n) {
                return Err(ConfigError::DuplicateNodeCount(n));
            }
        }
        if self.threads == Some(0) {
            return Err(ConfigError::InvalidThreads(0));
        }
        Ok(())
    }

    fn sim_config(&self, n: usize, seed: Option<Seed>) -> SimConfig {
        SimConfig {
            n,
            speed: self.speed,
            steps: self.steps,
            seed,
        }
    }

    /// Total number of runs the sweep performs
    pub fn total_runs(&self) -> usize {
        self.n_values.len() * self.repetitions
    }

    /// Get or generate seed
    pub fn resolve_seed(&self) -> Seed {
        self.seed.unwrap_or_else(|| {
            let mut seed = [0u8; 32];
            rand::thread_rng().fill_bytes(&mut seed);
            seed
        })
    }
}

#[derive(Debug, Clone)]
struct RunTask {
    n: usize,
    repetition: usize,
    seed: Seed,
}

/// Output of one run, tagged with its place in the sweep
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub n: usize,
    pub repetition: usize,
    pub seed: Seed,
    pub metrics: MetricsLog,
    pub report: RunReport,
}

/// One row of the long-form result table
#[derive(Debug, Clone, PartialEq)]
pub struct ArrangedRow {
    pub n: usize,
    pub repetition: usize,
    pub step: Step,
    pub threads_to_node_ratio: f64,
    pub max_cluster_fraction: f64,
}

/// Mean and spread of one step across repetitions
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatePoint {
    pub step: Step,
    pub runs: usize,
    pub mean_ratio: f64,
    pub mean_fraction: f64,
    pub std_fraction: f64,
    pub min_fraction: f64,
    pub max_fraction: f64,
}

/// A configured sweep, ready to run
pub struct Experiment {
    config: ExperimentConfig,
}

impl Experiment {
    pub fn new(config: ExperimentConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    // seeds are drawn in sweep order so scheduling cannot change them
    fn plan(&self, master_seed: Seed) -> Vec<RunTask> {
        let mut rng = StdRng::from_seed(master_seed);
        let mut tasks = Vec::with_capacity(self.config.total_runs());

        for &n in &self.config.n_values {
            for repetition in 0..self.config.repetitions {
                let mut seed = [0u8; 32];
                rng.fill_bytes(&mut seed);
                tasks.push(RunTask {
                    n,
                    repetition,
                    seed,
                });
            }
        }

        tasks
    }

    fn run_task(&self, task: RunTask) -> Result<RunRecord, ConfigError> {
        let config = self.config.sim_config(task.n, Some(task.seed));
        let sink: Box<dyn EventSink + Send> = if log::log_enabled!(log::Level::Trace) {
            Box::new(LogSink)
        } else {
            Box::new(NoOpSink)
        };
        let mut network = ButtonNetwork::new_with_sink(config, sink)?;
        network.run();
        let report = network.report();

        Ok(RunRecord {
            n: task.n,
            repetition: task.repetition,
            seed: task.seed,
            metrics: network.finish(),
            report,
        })
    }

    pub fn run(&self) -> Result<ExperimentResult, ExperimentError> {
        let seed = self.config.resolve_seed();
        let tasks = self.plan(seed);

        info!(
            "Starting experiment: n={:?} speed={} steps={} repetitions={} ({} runs)",
            self.config.n_values,
            self.config.speed,
            self.config.steps,
            self.config.repetitions,
            tasks.len()
        );
        info!("Master seed: {}", format_seed_hex(&seed));

        let mut builder = rayon::ThreadPoolBuilder::new();
        if let Some(threads) = self.config.threads {
            builder = builder.num_threads(threads);
        }
        let pool = builder.build()?;

        let start = Instant::now();
        let records: Result<Vec<RunRecord>, ConfigError> = pool.install(|| {
            tasks
                .into_par_iter()
                .map(|task| self.run_task(task))
                .collect()
        });
        let records = records?;
        let elapsed = start.elapsed();

        info!(
            "Experiment finished: {} runs on {} threads in {:?}",
            records.len(),
            pool.current_num_threads(),
            elapsed
        );

        Ok(ExperimentResult {
            config: self.config.clone(),
            seed_used: seed,
            records,
            elapsed,
        })
    }
}

/// Everything a sweep produced
#[derive(Debug, Clone)]
pub struct ExperimentResult {
    pub config: ExperimentConfig,

    /// Master seed the run seeds were derived from
    pub seed_used: Seed,

    /// Runs ordered by sweep position, then repetition
    pub records: Vec<RunRecord>,

    pub elapsed: Duration,
}

impl ExperimentResult {
    pub fn runs_for(&self, n: usize) -> impl Iterator<Item = &RunRecord> {
        self.records.iter().filter(move |r| r.n == n)
    }

    /// Long-form table: one row per run and step
    pub fn arranged(&self) -> Vec<ArrangedRow> {
        let mut rows = Vec::with_capacity(self.records.len() * self.config.steps);
        for record in &self.records {
            for (step, sample) in record.metrics.iter().enumerate() {
                rows.push(ArrangedRow {
                    n: record.n,
                    repetition: record.repetition,
                    step,
                    threads_to_node_ratio: sample.threads_to_node_ratio,
                    max_cluster_fraction: sample.max_cluster_fraction,
                });
            }
        }
        rows
    }

    /// Per-step statistics across repetitions, keyed by node count in sweep order
    pub fn averaged(&self) -> IndexMap<usize, Vec<AggregatePoint>> {
        let mut grouped: IndexMap<usize, Vec<&MetricsLog>> = IndexMap::new();
        for &n in &self.config.n_values {
            grouped.entry(n).or_default();
        }
        for record in &self.records {
            grouped.entry(record.n).or_default().push(&record.metrics);
        }

        grouped
            .into_iter()
            .map(|(n, logs)| (n, Self::aggregate(&logs)))
            .collect()
    }

    fn aggregate(logs: &[&MetricsLog]) -> Vec<AggregatePoint> {
        let steps = logs.iter().map(|log| log.len()).max().unwrap_or(0);
        let mut points = Vec::with_capacity(steps);

        for step in 0..steps {
            let samples: Vec<_> = logs.iter().filter_map(|log| log.get(step)).collect();
            let runs = samples.len();
            let count = runs as f64;

            let mean_ratio = samples.iter().map(|s| s.threads_to_node_ratio).sum::<f64>() / count;
            let mean_fraction =
                samples.iter().map(|s| s.max_cluster_fraction).sum::<f64>() / count;
            // sample standard deviation; a single run has no spread
            let std_fraction = if runs > 1 {
                let var = samples
                    .iter()
                    .map(|s| (s.max_cluster_fraction - mean_fraction).powi(2))
                    .sum::<f64>()
                    / (count - 1.0);
                var.sqrt()
            } else {
                0.0
            };
            let min_fraction = samples
                .iter()
                .map(|s| s.max_cluster_fraction)
                .fold(f64::INFINITY, f64::min);
            let max_fraction = samples
                .iter()
                .map(|s| s.max_cluster_fraction)
                .fold(f64::NEG_INFINITY, f64::max);

            points.push(AggregatePoint {
                step,
                runs,
                mean_ratio,
                mean_fraction,
                std_fraction,
                min_fraction,
                max_fraction,
            });
        }

        points
    }

    /// Mean step at which runs of size `n` first reached `threshold`.
    ///
    /// Runs that never reach it are left out; None if no run did.
    pub fn mean_crossing_step(&self, n: usize, threshold: f64) -> Option<f64> {
        let crossings: Vec<Step> = self
            .runs_for(n)
            .filter_map(|r| r.metrics.crossing_step(threshold))
            .collect();
        if crossings.is_empty() {
            None
        } else {
            Some(crossings.iter().sum::<Step>() as f64 / crossings.len() as f64)
        }
    }

    /// Write the long-form table as CSV
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        writeln!(writer, "n,repetition,step,threads_to_button,largest_cluster")?;
        for row in self.arranged() {
            writeln!(
                writer,
                "{},{},{},{},{}",
                row.n, row.repetition, row.step, row.threads_to_node_ratio, row.max_cluster_fraction
            )?;
        }
        writer.flush()
    }

    /// Write the per-step means as CSV
    pub fn write_averaged_csv<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        writeln!(
            writer,
            "n,step,runs,threads_to_button,largest_cluster_mean,largest_cluster_std,largest_cluster_min,largest_cluster_max"
        )?;
        for (n, points) in self.averaged() {
            for p in points {
                writeln!(
                    writer,
                    "{},{},{},{},{},{},{},{}",
                    n,
                    p.step,
                    p.runs,
                    p.mean_ratio,
                    p.mean_fraction,
                    p.std_fraction,
                    p.min_fraction,
                    p.max_fraction
                )?;
            }
        }
        writer.flush()
    }

    /// Print a summary of the experiment results
    pub fn print_summary(&self) {
        println!("\n╔════════════════════════════════════════════════════════╗");
        println!("║        Button Network Experiment Results               ║");
        println!("╚════════════════════════════════════════════════════════╝\n");

        println!("Configuration:");
        println!("  Seed: {}", format_seed_hex(&self.seed_used));
        println!("  Node counts: {:?}", self.config.n_values);
        println!(
            "  Speed: {} ({} steps, {} repetitions)",
            self.config.speed, self.config.steps, self.config.repetitions
        );
        println!("  Runs: {} in {:.2?}\n", self.records.len(), self.elapsed);

        println!(
            "{:>8} {:>10} {:>12} {:>10} {:>14} {:>12}",
            "n", "threads/n", "largest", "std", "giant at step", "redundant"
        );
        println!("{}", "-".repeat(72));

        for (n, points) in self.averaged() {
            let Some(last) = points.last() else {
                println!("{:>8} {:>10}", n, "-");
                continue;
            };
            let giant = self
                .mean_crossing_step(n, GIANT_CLUSTER_THRESHOLD)
                .map(|s| format!("{:.1}", s))
                .unwrap_or_else(|| "never".to_string());
            let runs: Vec<&RunRecord> = self.runs_for(n).collect();
            let redundant = runs
                .iter()
                .map(|r| r.report.redundant_threads as f64)
                .sum::<f64>()
                / runs.len().max(1) as f64;

            println!(
                "{:>8} {:>10.3} {:>12.4} {:>10.4} {:>14} {:>12.1}",
                n, last.mean_ratio, last.mean_fraction, last.std_fraction, giant, redundant
            );
        }
        println!();
    }
}
