//! The button network simulation.
//!
//! N buttons lie on the floor with no threads between them. Every step ties
//! `floor(n * speed)` threads between uniformly chosen pairs of distinct
//! buttons and then records two numbers: threads per button, and the share
//! of buttons in the largest connected cluster.
//!
//! ```
//! use bn_rust::bn_simulator::{ButtonNetwork, SimConfig};
//!
//! let config = SimConfig {
//!     n: 100,
//!     speed: 0.05,
//!     steps: 30,
//!     seed: Some([7u8; 32]),
//! };
//! let mut network = ButtonNetwork::new(config).unwrap();
//! let log = network.run();
//! assert_eq!(log.len(), 30);
//! ```

use hashbrown::HashMap;
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

use crate::bn_clusters::{ClusterForest, Merge};
use crate::bn_interface::{
    ConfigError, Event, EventSink, NoOpSink, NodeId, Seed, Step, ThreadCount,
};
use crate::bn_metrics::{MetricsLog, MetricsSample};
use crate::bn_threads::ThreadLedger;

/// Configuration of a single run
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    /// Number of buttons
    pub n: usize,

    /// Fraction of `n` threads tied per step
    pub speed: f64,

    /// Number of steps `run()` performs
    pub steps: usize,

    /// Random seed (None = generate random)
    pub seed: Option<Seed>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            n: 100,
            speed: 0.05,
            steps: 30,
            seed: None,
        }
    }
}

impl SimConfig {
    /// Build a configuration from signed inputs, as read from scenario files
    pub fn try_new(n: i64, speed: f64, steps: i64) -> Result<Self, ConfigError> {
        if n < 2 {
            return Err(ConfigError::TooFewButtons(n));
        }
        if steps < 0 {
            return Err(ConfigError::NegativeSteps(steps));
        }

        let config = Self {
            n: usize::try_from(n).map_err(|_| ConfigError::TooFewButtons(n))?,
            speed,
            steps: usize::try_from(steps).map_err(|_| ConfigError::NegativeSteps(steps))?,
            seed: None,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n < 2 {
            return Err(ConfigError::TooFewButtons(self.n as i64));
        }
        if !self.speed.is_finite() || self.speed < 0.0 {
            return Err(ConfigError::InvalidSpeed(self.speed));
        }
        Ok(())
    }

    /// Threads tied per step, `floor(n * speed)`
    pub fn threads_per_step(&self) -> usize {
        (self.n as f64 * self.speed).floor() as usize
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

/// Final numbers of a run, beyond the per-step series
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub steps_taken: Step,
    pub threads: ThreadCount,
    pub distinct_threads: usize,
    pub redundant_threads: ThreadCount,
    pub clusters: usize,
    pub largest_cluster: usize,
    pub threads_to_node_ratio: f64,
    pub max_cluster_fraction: f64,
}

/// One simulation run: buttons, threads, clusters and the recorded series.
///
/// Not meant to be shared between callers; distinct instances are fully
/// independent and can run on separate threads.
pub struct ButtonNetwork {
    config: SimConfig,
    rng: StdRng,
    seed_used: Seed,
    threads_per_step: usize,

    forest: ClusterForest,
    threads: ThreadLedger,
    metrics: MetricsLog,
    steps_taken: Step,

    sink: Box<dyn EventSink + Send>,
}

impl ButtonNetwork {
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        Self::new_with_sink(config, Box::new(NoOpSink))
    }

    pub fn new_with_sink(
        config: SimConfig,
        sink: Box<dyn EventSink + Send>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let seed = config.resolve_seed();
        let threads_per_step = config.threads_per_step();

        Ok(Self {
            rng: StdRng::from_seed(seed),
            seed_used: seed,
            threads_per_step,
            forest: ClusterForest::new(config.n),
            threads: ThreadLedger::new(),
            metrics: MetricsLog::with_capacity(config.steps),
            steps_taken: 0,
            sink,
            config,
        })
    }

    /// Tie this step's threads and record one sample
    pub fn run_step(&mut self) -> MetricsSample {
        let step = self.steps_taken;

        for _ in 0..self.threads_per_step {
            let (a, b) = self.draw_pair();
            self.threads.tie(a, b);

            let merge = self.forest.union(a, b);
            self.sink.log(
                step,
                Event::ThreadTied {
                    a,
                    b,
                    merged: merge != Merge::AlreadyConnected,
                },
            );
            if let Merge::Joined { root, size } = merge {
                self.sink.log(step, Event::ClustersMerged { root, size });
            }
        }

        let sample = MetricsSample {
            threads_to_node_ratio: self.threads_to_node_ratio(),
            max_cluster_fraction: self.max_cluster_fraction(),
        };
        self.metrics.push(sample);
        self.steps_taken += 1;

        self.sink.log(
            step,
            Event::StepCompleted {
                threads: self.threads.count(),
                largest_cluster: self.forest.largest(),
            },
        );
        debug!(
            "n={} step {}: threads/button {:.3}, largest cluster {:.3}",
            self.config.n, step, sample.threads_to_node_ratio, sample.max_cluster_fraction
        );

        sample
    }

    /// Step until `steps` steps have been taken, then return the full series
    pub fn run(&mut self) -> &MetricsLog {
        while self.steps_taken < self.config.steps {
            self.run_step();
        }
        &self.metrics
    }

    /// Hand the recorded series to the caller
    pub fn finish(self) -> MetricsLog {
        self.metrics
    }

    // uniform over unordered distinct pairs; a self-pair is redrawn
    fn draw_pair(&mut self) -> (NodeId, NodeId) {
        let n = self.config.n;
        let a = self.rng.gen_range(0..n);
        let mut b = self.rng.gen_range(0..n);
        while b == a {
            b = self.rng.gen_range(0..n);
        }
        (a, b)
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn seed_used(&self) -> Seed {
        self.seed_used
    }

    pub fn steps_taken(&self) -> Step {
        self.steps_taken
    }

    pub fn metrics(&self) -> &MetricsLog {
        &self.metrics
    }

    pub fn thread_count(&self) -> ThreadCount {
        self.threads.count()
    }

    pub fn distinct_thread_count(&self) -> usize {
        self.threads.distinct_count()
    }

    pub fn redundant_thread_count(&self) -> ThreadCount {
        self.threads.redundant_count()
    }

    pub fn threads(&self) -> &ThreadLedger {
        &self.threads
    }

    pub fn largest_cluster_size(&self) -> usize {
        self.forest.largest()
    }

    pub fn max_cluster_fraction(&self) -> f64 {
        self.forest.largest() as f64 / self.config.n as f64
    }

    pub fn threads_to_node_ratio(&self) -> f64 {
        self.threads.count() as f64 / self.config.n as f64
    }

    pub fn cluster_count(&self) -> usize {
        self.forest.cluster_count()
    }

    /// Root identifying the cluster of `node`
    pub fn cluster_of(&self, node: NodeId) -> NodeId {
        self.forest.root_of(node)
    }

    pub fn same_cluster(&self, a: NodeId, b: NodeId) -> bool {
        self.forest.connected(a, b)
    }

    pub fn cluster_sizes(&self) -> HashMap<NodeId, usize> {
        self.forest.sizes()
    }

    pub fn report(&self) -> RunReport {
        RunReport {
            steps_taken: self.steps_taken,
            threads: self.threads.count(),
            distinct_threads: self.threads.distinct_count(),
            redundant_threads: self.threads.redundant_count(),
            clusters: self.forest.cluster_count(),
            largest_cluster: self.forest.largest(),
            threads_to_node_ratio: self.threads_to_node_ratio(),
            max_cluster_fraction: self.max_cluster_fraction(),
        }
    }
}
