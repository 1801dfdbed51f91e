use thiserror::Error;

// buttons are dense indices into the fixed universe {0, ..., n-1}
pub type NodeId = usize;
pub type ThreadCount = u64;
pub type Step = usize;

pub type Seed = [u8; 32];

/// Errors raised while validating a simulation or experiment configuration.
///
/// Every variant is an invalid configuration: it is reported when the run
/// (or experiment) is created and nothing has been simulated yet.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Fewer than two buttons leaves no pair to tie
    #[error("invalid configuration: need at least 2 buttons, got n = {0}")]
    TooFewButtons(i64),

    /// Speed is negative, NaN or infinite
    #[error("invalid configuration: speed must be finite and non-negative, got {0}")]
    InvalidSpeed(f64),

    #[error("invalid configuration: steps must be non-negative, got {0}")]
    NegativeSteps(i64),

    /// Experiment sweeps no node counts
    #[error("invalid configuration: experiment has no node counts to sweep")]
    EmptySweep,

    #[error("invalid configuration: experiment needs at least one repetition")]
    NoRepetitions,

    /// The same node count appears twice in a sweep
    #[error("invalid configuration: node count {0} is listed more than once")]
    DuplicateNodeCount(usize),

    #[error("invalid configuration: worker threads must be at least 1, got {0}")]
    InvalidThreads(i64),

    /// Seed string is not valid hex
    #[error("invalid configuration: bad seed {0:?}")]
    InvalidSeed(String),
}

/// Observable happenings inside one simulation run
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A thread was tied between two buttons
    ThreadTied {
        a: NodeId,
        b: NodeId,
        /// false when both buttons already hung together
        merged: bool,
    },
    /// Two clusters were joined into one
    ClustersMerged { root: NodeId, size: usize },
    /// A step finished and its sample was recorded
    StepCompleted {
        threads: ThreadCount,
        largest_cluster: usize,
    },
}

/// Trait for consuming events from a simulation run
pub trait EventSink {
    fn log(&mut self, step: Step, event: Event);
}

/// No-op event sink (zero overhead)
pub struct NoOpSink;

impl EventSink for NoOpSink {
    #[inline(always)]
    fn log(&mut self, _step: Step, _event: Event) {}
}

/// Forwards events to the `log` facade at trace level
pub struct LogSink;

impl EventSink for LogSink {
    fn log(&mut self, step: Step, event: Event) {
        match event {
            Event::ThreadTied { a, b, merged } => {
                log::trace!("step {} tie {} <-> {} merged:{}", step, a, b, merged)
            }
            Event::ClustersMerged { root, size } => {
                log::trace!("step {} merge root:{} size:{}", step, root, size)
            }
            Event::StepCompleted {
                threads,
                largest_cluster,
            } => log::trace!(
                "step {} done threads:{} largest:{}",
                step,
                threads,
                largest_cluster
            ),
        }
    }
}

/// Parse a hex seed (optionally `0x` prefixed) into a 32 byte seed.
///
/// Digits are left-aligned: a short string leaves the tail zeroed, and an
/// odd trailing digit is the high nibble of its byte (`0x2a3` = `2a 30 ..`).
pub fn parse_seed_hex(hex: &str) -> Result<Seed, ConfigError> {
    let trimmed = hex.trim();
    let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    if digits.is_empty() || digits.len() > 64 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ConfigError::InvalidSeed(hex.to_string()));
    }

    let mut seed = [0u8; 32];
    for (i, digit) in digits.bytes().enumerate() {
        // checked above
        let nibble = (digit as char).to_digit(16).unwrap_or(0) as u8;
        if i % 2 == 0 {
            seed[i / 2] = nibble << 4;
        } else {
            seed[i / 2] |= nibble;
        }
    }

    Ok(seed)
}

/// Render a seed as a `0x` prefixed hex string
pub fn format_seed_hex(seed: &Seed) -> String {
    let mut out = String::with_capacity(66);
    out.push_str("0x");
    for byte in seed {
        out.push_str(&format!("{:02x}", byte));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_seed_hex_short() {
        let seed = parse_seed_hex("0x2a").unwrap();
        assert_eq!(seed[0], 0x2a);
        assert!(seed[1..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_seed_hex_roundtrip() {
        let mut seed = [0u8; 32];
        for (i, b) in seed.iter_mut().enumerate() {
            *b = (i * 7) as u8;
        }
        let text = format_seed_hex(&seed);
        assert_eq!(text.len(), 66);
        assert_eq!(parse_seed_hex(&text).unwrap(), seed);
    }

    #[test]
    fn test_parse_seed_hex_rejects_garbage() {
        assert!(matches!(
            parse_seed_hex("0xzz"),
            Err(ConfigError::InvalidSeed(_))
        ));
        assert!(parse_seed_hex("").is_err());
        assert!(parse_seed_hex(&"1".repeat(65)).is_err());
        assert!(parse_seed_hex("0x+1").is_err());
        assert!(parse_seed_hex("0x-1").is_err());
        assert!(parse_seed_hex("0x2a 3").is_err());
    }

    #[test]
    fn test_parse_seed_hex_odd_digit_is_high_nibble() {
        let seed = parse_seed_hex("0x2a3").unwrap();
        assert_eq!(seed[0], 0x2a);
        assert_eq!(seed[1], 0x30);
        assert!(seed[2..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_sinks_accept_every_event() {
        let events = [
            Event::ThreadTied {
                a: 0,
                b: 1,
                merged: true,
            },
            Event::ClustersMerged { root: 0, size: 2 },
            Event::StepCompleted {
                threads: 1,
                largest_cluster: 2,
            },
        ];
        for event in events {
            LogSink.log(0, event.clone());
            NoOpSink.log(0, event);
        }
    }

    #[test]
    fn test_config_error_message() {
        let err = ConfigError::TooFewButtons(1);
        assert!(err.to_string().contains("at least 2 buttons"));
    }
}
