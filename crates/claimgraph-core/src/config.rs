//! SRWR tuning parameters and propagation configuration.

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::time::Duration;

use crate::error::{Error, Result};

/// Coefficients of the signed random walk with restart.
///
/// The core assumes these are already inside [`ParamRanges`]; validation is
/// the job of whoever collects them (panel, CLI, environment).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SrwrParams {
    /// Restart probability: share of belief reset to the initial importance each step.
    pub c: f64,
    /// Certainty that a supporter of a supporter is a supporter.
    pub theta: f64,
    /// Certainty that a supporter of a refuter is a refuter.
    pub mu: f64,
    /// Certainty that a refuter of a refuter is a supporter.
    pub beta: f64,
    /// Certainty that a refuter of a supporter is a refuter.
    pub gamma: f64,
    /// L1 threshold on the change of `(rP, rN)` between iterations.
    pub epsilon: f64,
    /// Iteration cap; reaching it counts as non-convergence.
    #[serde(rename = "maxIterations")]
    pub max_iterations: usize,
}

impl Default for SrwrParams {
    fn default() -> Self {
        Self {
            c: 0.5,
            theta: 0.8,
            mu: 0.8,
            beta: 0.8,
            gamma: 0.8,
            epsilon: 0.01,
            max_iterations: 50,
        }
    }
}

impl SrwrParams {
    /// Same parameters with every coefficient clamped into its documented range.
    pub fn clamped(self) -> Self {
        let r = ParamRanges::default();
        Self {
            c: r.clamp_probability(self.c),
            theta: r.clamp_probability(self.theta),
            mu: r.clamp_probability(self.mu),
            beta: r.clamp_probability(self.beta),
            gamma: r.clamp_probability(self.gamma),
            epsilon: r.clamp_epsilon(self.epsilon),
            max_iterations: self.max_iterations.max(1),
        }
    }
}

/// Ranges the parameter panel exposes for each coefficient.
#[derive(Debug, Clone)]
pub struct ParamRanges {
    /// Range shared by `c`, `theta`, `mu`, `beta` and `gamma`.
    pub probability: RangeInclusive<f64>,
    pub epsilon: RangeInclusive<f64>,
    /// Lower bound of the playback delay, in seconds.
    pub min_delay_secs: f64,
}

impl Default for ParamRanges {
    fn default() -> Self {
        Self {
            probability: 0.0..=1.0,
            epsilon: 0.001..=1.0,
            min_delay_secs: 0.0,
        }
    }
}

impl ParamRanges {
    pub fn clamp_probability(&self, value: f64) -> f64 {
        value.clamp(*self.probability.start(), *self.probability.end())
    }

    pub fn clamp_epsilon(&self, value: f64) -> f64 {
        value.clamp(*self.epsilon.start(), *self.epsilon.end())
    }

    pub fn clamp_delay(&self, secs: f64) -> f64 {
        secs.max(self.min_delay_secs)
    }
}

/// Top-level configuration for a propagation run and its playback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropagationConfig {
    pub params: SrwrParams,
    /// Pause between trajectory frames during playback.
    #[serde(rename = "playbackDelay")]
    pub playback_delay: Duration,
}

impl Default for PropagationConfig {
    fn default() -> Self {
        Self {
            params: SrwrParams::default(),
            playback_delay: Duration::ZERO,
        }
    }
}

impl PropagationConfig {
    /// Create configuration from `CLAIMGRAPH_*` environment variables and defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Missing keys fall back to the defaults, present keys must parse.
    /// Parsed values are clamped to [`ParamRanges`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = SrwrParams::default();
        let ranges = ParamRanges::default();

        let read = |key: &str, default: f64| -> Result<f64> {
            match lookup(key) {
                Some(raw) => raw
                    .trim()
                    .parse::<f64>()
                    .map_err(|e| Error::Config(format!("{}={:?}: {}", key, raw, e)))
                    .and_then(|v| {
                        if v.is_nan() {
                            Err(Error::Config(format!("{} is not a number", key)))
                        } else {
                            Ok(v)
                        }
                    }),
                None => Ok(default),
            }
        };

        let max_iterations = match lookup("CLAIMGRAPH_MAX_ITERATIONS") {
            Some(raw) => raw.trim().parse::<usize>().map_err(|e| {
                Error::Config(format!("CLAIMGRAPH_MAX_ITERATIONS={:?}: {}", raw, e))
            })?,
            None => defaults.max_iterations,
        };

        let params = SrwrParams {
            c: read("CLAIMGRAPH_C", defaults.c)?,
            theta: read("CLAIMGRAPH_THETA", defaults.theta)?,
            mu: read("CLAIMGRAPH_MU", defaults.mu)?,
            beta: read("CLAIMGRAPH_BETA", defaults.beta)?,
            gamma: read("CLAIMGRAPH_GAMMA", defaults.gamma)?,
            epsilon: read("CLAIMGRAPH_EPSILON", defaults.epsilon)?,
            max_iterations,
        }
        .clamped();

        let delay_secs = ranges.clamp_delay(read("CLAIMGRAPH_DELAY_SECS", 0.0)?);
        let playback_delay = Duration::try_from_secs_f64(delay_secs)
            .map_err(|e| Error::Config(format!("CLAIMGRAPH_DELAY_SECS={}: {}", delay_secs, e)))?;

        tracing::debug!("Loaded propagation config: {:?}", params);

        Ok(Self {
            params,
            playback_delay,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = PropagationConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.params, SrwrParams::default());
        assert_eq!(config.playback_delay, Duration::ZERO);
    }

    #[test]
    fn test_values_are_read_and_clamped() {
        let config = PropagationConfig::from_lookup(lookup(&[
            ("CLAIMGRAPH_C", "0.25"),
            ("CLAIMGRAPH_BETA", "1.7"),
            ("CLAIMGRAPH_EPSILON", "0"),
            ("CLAIMGRAPH_DELAY_SECS", "0.5"),
        ]))
        .unwrap();
        assert_eq!(config.params.c, 0.25);
        assert_eq!(config.params.beta, 1.0);
        assert_eq!(config.params.epsilon, 0.001);
        assert_eq!(config.playback_delay, Duration::from_millis(500));
    }

    #[test]
    fn test_negative_delay_clamps_to_zero() {
        let config =
            PropagationConfig::from_lookup(lookup(&[("CLAIMGRAPH_DELAY_SECS", "-3")])).unwrap();
        assert_eq!(config.playback_delay, Duration::ZERO);
    }

    #[test]
    fn test_unrepresentable_delay_is_config_error() {
        for raw in ["inf", "1e300"] {
            let err = PropagationConfig::from_lookup(lookup(&[("CLAIMGRAPH_DELAY_SECS", raw)]))
                .unwrap_err();
            assert!(matches!(err, Error::Config(_)));
        }
    }

    #[test]
    fn test_unparsable_value_is_config_error() {
        let err = PropagationConfig::from_lookup(lookup(&[("CLAIMGRAPH_THETA", "high")]))
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_clamped_keeps_in_range_values() {
        let params = SrwrParams {
            c: 0.3,
            theta: 1.0,
            mu: 0.0,
            beta: 0.5,
            gamma: 0.9,
            epsilon: 0.01,
            max_iterations: 50,
        };
        assert_eq!(params.clamped(), params);
    }
}
