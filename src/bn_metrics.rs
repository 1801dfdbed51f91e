use crate::bn_interface::Step;

/// One recorded step of a run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricsSample {
    /// Threads tied so far divided by the number of buttons
    pub threads_to_node_ratio: f64,

    /// Largest cluster size divided by the number of buttons
    pub max_cluster_fraction: f64,
}

/// Append-only series of samples, one per simulation step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricsLog {
    samples: Vec<MetricsSample>,
}

impl MetricsLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(steps: usize) -> Self {
        Self {
            samples: Vec::with_capacity(steps),
        }
    }

    pub fn push(&mut self, sample: MetricsSample) {
        self.samples.push(sample);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Sample recorded at `step` (0 based)
    pub fn get(&self, step: Step) -> Option<&MetricsSample> {
        self.samples.get(step)
    }

    pub fn last(&self) -> Option<&MetricsSample> {
        self.samples.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MetricsSample> {
        self.samples.iter()
    }

    pub fn samples(&self) -> &[MetricsSample] {
        &self.samples
    }

    pub fn into_vec(self) -> Vec<MetricsSample> {
        self.samples
    }

    /// First step whose largest cluster covers at least `threshold` of the buttons
    pub fn crossing_step(&self, threshold: f64) -> Option<Step> {
        self.samples
            .iter()
            .position(|s| s.max_cluster_fraction >= threshold)
    }
}

impl<'a> IntoIterator for &'a MetricsLog {
    type Item = &'a MetricsSample;
    type IntoIter = std::slice::Iter<'a, MetricsSample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(ratio: f64, fraction: f64) -> MetricsSample {
        MetricsSample {
            threads_to_node_ratio: ratio,
            max_cluster_fraction: fraction,
        }
    }

    #[test]
    fn test_log_appends_in_order() {
        let mut log = MetricsLog::with_capacity(3);
        assert!(log.is_empty());
        log.push(sample(0.1, 0.02));
        log.push(sample(0.2, 0.05));

        assert_eq!(log.len(), 2);
        assert_eq!(log.get(0), Some(&sample(0.1, 0.02)));
        assert_eq!(log.last(), Some(&sample(0.2, 0.05)));
        assert_eq!(log.get(2), None);
        assert_eq!((&log).into_iter().count(), 2);
    }

    #[test]
    fn test_crossing_step() {
        let mut log = MetricsLog::new();
        for fraction in [0.01, 0.1, 0.4, 0.55, 0.9] {
            log.push(sample(0.0, fraction));
        }

        assert_eq!(log.crossing_step(0.5), Some(3));
        assert_eq!(log.crossing_step(0.01), Some(0));
        assert_eq!(log.crossing_step(0.95), None);
    }
}
