//! YAML scenario files describing an experiment.
//!
//! ```yaml
//! meta:
//!   name: classic
//! experiment:
//!   n: [100, 1000, 10000]
//!   speed: 0.05
//!   steps: 30
//!   repetitions: 25
//!   seed: "0x2a"
//! output:
//!   csv: results.csv
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::bn_experiment::{ExperimentConfig, ExperimentError};
use crate::bn_interface::{parse_seed_hex, ConfigError};
use crate::bn_simulator::SimConfig;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse scenario: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Experiment(#[from] ExperimentError),
}

/// Scenario file format
#[derive(Debug, Deserialize)]
pub struct ScenarioFile {
    /// Scenario metadata
    #[serde(default)]
    pub meta: ScenarioMeta,

    pub experiment: ExperimentSection,

    #[serde(default)]
    pub output: OutputSection,
}

#[derive(Debug, Default, Deserialize)]
pub struct ScenarioMeta {
    pub name: Option<String>,
    pub description: Option<String>,
    pub hypothesis: Option<String>,
}

/// A single node count or a list of them
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NodeCounts {
    One(i64),
    Many(Vec<i64>),
}

// signed so that negative values reach validation instead of failing the parse
#[derive(Debug, Deserialize)]
pub struct ExperimentSection {
    pub n: NodeCounts,
    pub speed: f64,
    pub steps: i64,

    #[serde(default = "default_repetitions")]
    pub repetitions: i64,

    /// Hex master seed
    #[serde(default)]
    pub seed: Option<String>,

    #[serde(default)]
    pub threads: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct OutputSection {
    /// Long-form table, one row per run and step
    pub csv: Option<PathBuf>,

    /// Per-step means across repetitions
    pub averaged_csv: Option<PathBuf>,
}

fn default_repetitions() -> i64 {
    1
}

impl ScenarioFile {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ScenarioError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ScenarioError> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn display_name(&self) -> &str {
        self.meta.name.as_deref().unwrap_or("unnamed scenario")
    }

    /// Validate the experiment section and turn it into a configuration
    pub fn experiment_config(&self) -> Result<ExperimentConfig, ConfigError> {
        let section = &self.experiment;

        let counts = match &section.n {
            NodeCounts::One(n) => vec![*n],
            NodeCounts::Many(ns) => ns.clone(),
        };
        if counts.is_empty() {
            return Err(ConfigError::EmptySweep);
        }

        let mut n_values = Vec::with_capacity(counts.len());
        let mut steps = 0;
        for n in counts {
            let sim = SimConfig::try_new(n, section.speed, section.steps)?;
            steps = sim.steps;
            n_values.push(sim.n);
        }

        if section.repetitions < 1 {
            return Err(ConfigError::NoRepetitions);
        }

        let threads = match section.threads {
            Some(t) if t < 1 => return Err(ConfigError::InvalidThreads(t)),
            Some(t) => Some(usize::try_from(t).map_err(|_| ConfigError::InvalidThreads(t))?),
            None => None,
        };

        let seed = match &section.seed {
            Some(hex) => Some(parse_seed_hex(hex)?),
            None => None,
        };

        let config = ExperimentConfig {
            n_values,
            speed: section.speed,
            steps,
            repetitions: section.repetitions as usize,
            seed,
            threads,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Scenario files to run for `path`: the file itself, or every
/// `.yaml`/`.yml` file in a directory, sorted by name
pub fn scenario_files<P: AsRef<Path>>(path: P) -> Result<Vec<PathBuf>, ScenarioError> {
    let path = path.as_ref();
    if !path.is_dir() {
        return Ok(vec![path.to_path_buf()]);
    }

    let entries = fs::read_dir(path).map_err(|source| ScenarioError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| ScenarioError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file = entry.path();
        let is_yaml = file
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext == "yaml" || ext == "yml")
            .unwrap_or(false);
        if is_yaml {
            files.push(file);
        }
    }
    files.sort();

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLASSIC: &str = r#"
meta:
  name: classic
  description: three sizes
experiment:
  n: [100, 1000, 10000]
  speed: 0.05
  steps: 30
  repetitions: 25
  seed: "0x2a"
  threads: 4
output:
  csv: rows.csv
"#;

    #[test]
    fn test_parse_classic_scenario() {
        let scenario = ScenarioFile::from_yaml(CLASSIC).unwrap();
        assert_eq!(scenario.display_name(), "classic");
        assert_eq!(scenario.output.csv, Some(PathBuf::from("rows.csv")));
        assert_eq!(scenario.output.averaged_csv, None);

        let config = scenario.experiment_config().unwrap();
        assert_eq!(config.n_values, vec![100, 1000, 10000]);
        assert_eq!(config.steps, 30);
        assert_eq!(config.repetitions, 25);
        assert_eq!(config.threads, Some(4));
        assert_eq!(config.seed.map(|s| s[0]), Some(0x2a));
    }

    #[test]
    fn test_single_node_count_and_defaults() {
        let scenario = ScenarioFile::from_yaml(
            "experiment:\n  n: 500\n  speed: 0.1\n  steps: 5\n",
        )
        .unwrap();
        assert_eq!(scenario.display_name(), "unnamed scenario");

        let config = scenario.experiment_config().unwrap();
        assert_eq!(config.n_values, vec![500]);
        assert_eq!(config.repetitions, 1);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_negative_values_are_invalid_configuration() {
        let negative_steps = ScenarioFile::from_yaml(
            "experiment:\n  n: 10\n  speed: 0.1\n  steps: -3\n",
        )
        .unwrap();
        assert_eq!(
            negative_steps.experiment_config(),
            Err(ConfigError::NegativeSteps(-3))
        );

        let one_button = ScenarioFile::from_yaml(
            "experiment:\n  n: [10, 1]\n  speed: 0.1\n  steps: 3\n",
        )
        .unwrap();
        assert_eq!(
            one_button.experiment_config(),
            Err(ConfigError::TooFewButtons(1))
        );

        let no_runs = ScenarioFile::from_yaml(
            "experiment:\n  n: 10\n  speed: 0.1\n  steps: 3\n  repetitions: 0\n",
        )
        .unwrap();
        assert_eq!(no_runs.experiment_config(), Err(ConfigError::NoRepetitions));

        let empty = ScenarioFile::from_yaml(
            "experiment:\n  n: []\n  speed: 0.1\n  steps: 3\n",
        )
        .unwrap();
        assert_eq!(empty.experiment_config(), Err(ConfigError::EmptySweep));
    }

    #[test]
    fn test_sweep_errors_reach_validation() {
        let negative_threads = ScenarioFile::from_yaml(
            "experiment:\n  n: 10\n  speed: 0.1\n  steps: 3\n  threads: -1\n",
        )
        .unwrap();
        assert_eq!(
            negative_threads.experiment_config(),
            Err(ConfigError::InvalidThreads(-1))
        );

        let repeated = ScenarioFile::from_yaml(
            "experiment:\n  n: [100, 100]\n  speed: 0.1\n  steps: 3\n",
        )
        .unwrap();
        assert_eq!(
            repeated.experiment_config(),
            Err(ConfigError::DuplicateNodeCount(100))
        );
    }

    #[test]
    fn test_malformed_yaml_is_parse_error() {
        let result = ScenarioFile::from_yaml("experiment: [not, a, map]");
        assert!(matches!(result, Err(ScenarioError::Parse(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = ScenarioFile::load("/definitely/not/here.yaml");
        assert!(matches!(result, Err(ScenarioError::Io { .. })));
    }

    #[test]
    fn test_scenario_files_lists_yaml_sorted() {
        let dir = std::env::temp_dir().join(format!("bn_rust_scenarios_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("b.yaml"), CLASSIC).unwrap();
        fs::write(dir.join("a.yml"), CLASSIC).unwrap();
        fs::write(dir.join("notes.txt"), "ignored").unwrap();

        let files = scenario_files(&dir).unwrap();
        let names: Vec<_> = files
            .iter()
            .filter_map(|f| f.file_name().and_then(|n| n.to_str()))
            .collect();
        assert_eq!(names, vec!["a.yml", "b.yaml"]);

        let single = scenario_files(dir.join("b.yaml")).unwrap();
        assert_eq!(single.len(), 1);

        let _ = fs::remove_dir_all(dir);
    }
}
