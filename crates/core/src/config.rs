//! Relay configuration.
//!
//! Sources in priority order: TOML file, then environment variables, then
//! built-in defaults. Defaults preserve the original protocol constants
//! (2.0 s command latency, 1.0 s telemetry period, unbounded queue).

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::queue::OverflowPolicy;

/// Default simulated transit latency for uplink commands, in seconds.
pub const DEFAULT_COMMAND_LATENCY_SECS: f64 = 2.0;

/// Default telemetry publish period, in seconds.
pub const DEFAULT_TELEMETRY_PERIOD_SECS: f64 = 1.0;

/// Environment variable names.
pub mod env_vars {
    pub const COMMAND_LATENCY: &str = "CUBELINK_COMMAND_LATENCY";
    pub const TELEMETRY_PERIOD: &str = "CUBELINK_TELEMETRY_PERIOD";
    pub const QUEUE_CAPACITY: &str = "CUBELINK_QUEUE_CAPACITY";
}

fn default_command_latency() -> f64 {
    DEFAULT_COMMAND_LATENCY_SECS
}

fn default_telemetry_period() -> f64 {
    DEFAULT_TELEMETRY_PERIOD_SECS
}

/// Tunables for one relay session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Simulated transit delay applied to every dequeued command, seconds.
    pub command_latency_secs: f64,
    /// Telemetry publish period, seconds.
    pub telemetry_period_secs: f64,
    /// Command queue capacity; 0 keeps the queue unbounded.
    pub queue_capacity: usize,
    /// Overflow policy for a bounded queue.
    pub overflow_policy: OverflowPolicy,
    /// When true, commands that changed nothing are acked as IGNORED
    /// instead of OK.
    pub strict_acks: bool,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            command_latency_secs: default_command_latency(),
            telemetry_period_secs: default_telemetry_period(),
            queue_capacity: 0,
            overflow_policy: OverflowPolicy::default(),
            strict_acks: false,
        }
    }
}

impl RelayConfig {
    /// Parse from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Load from a TOML file, falling back to defaults when the file is
    /// absent, then apply environment overrides.
    pub fn load(path: Option<&std::path::Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                let content = std::fs::read_to_string(path)
                    .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
                tracing::info!(category = "config", path = %path.display(), "loading relay config");
                Self::from_toml(&content)?
            }
            None => {
                tracing::info!(category = "config", "using built-in relay defaults");
                Self::default()
            }
        };
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Apply `CUBELINK_*` environment overrides.
    pub fn apply_env(&mut self) {
        if let Some(latency) = read_env_f64(env_vars::COMMAND_LATENCY) {
            self.command_latency_secs = latency;
        }
        if let Some(period) = read_env_f64(env_vars::TELEMETRY_PERIOD) {
            self.telemetry_period_secs = period;
        }
        if let Ok(raw) = std::env::var(env_vars::QUEUE_CAPACITY) {
            match raw.parse::<usize>() {
                Ok(capacity) => self.queue_capacity = capacity,
                Err(_) => tracing::warn!(
                    category = "config",
                    value = %raw,
                    "ignoring unparseable queue capacity override"
                ),
            }
        }
    }

    /// Reject configurations the relay cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.command_latency_secs < 0.0 {
            return Err(Error::Config(format!(
                "command_latency_secs must be >= 0, got {}",
                self.command_latency_secs
            )));
        }
        if self.telemetry_period_secs <= 0.0 {
            return Err(Error::Config(format!(
                "telemetry_period_secs must be > 0, got {}",
                self.telemetry_period_secs
            )));
        }
        Ok(())
    }

    /// Command latency as a [`Duration`].
    pub fn command_latency(&self) -> Duration {
        Duration::from_secs_f64(self.command_latency_secs.max(0.0))
    }

    /// Telemetry period as a [`Duration`].
    pub fn telemetry_period(&self) -> Duration {
        Duration::from_secs_f64(self.telemetry_period_secs.max(0.0))
    }
}

fn read_env_f64(name: &str) -> Option<f64> {
    let raw = std::env::var(name).ok()?;
    match raw.parse::<f64>() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(category = "config", var = name, value = %raw, "ignoring unparseable override");
            None
        }
    }
}
