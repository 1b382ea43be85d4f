//! System-wide traffic settings carried in every chip's table block.

use tracing::debug;

use crate::{ConfigError, Error, Result};

/// Injection rate occupies the low 10 bits of its word.
pub const INJECTION_RATE_LIMIT: u32 = 1 << 10;

/// Consumption delay occupies the top 6 bits of the injection word.
pub const CONSUMPTION_DELAY_LIMIT: u32 = 1 << 6;

/// Router timeout has a whole word.
pub const ROUTER_TIMEOUT_LIMIT: u32 = 1 << 16;

/// Sample period has a whole word.
pub const SAMPLE_PERIOD_LIMIT: u32 = 1 << 16;

/// Settings that must be identical on every active chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TableConfig {
    /// Cycles between injected packets
    pub injection_rate: u32,
    /// Cycles a chip takes to consume a packet addressed to it
    pub consumption_delay: u32,
    /// Cycles a router waits on a blocked link before dropping
    pub router_timeout: u32,
    /// Cycles between statistics samples
    pub sample_period: u32,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            injection_rate: 16,
            consumption_delay: 10,
            router_timeout: 50,
            sample_period: 60000,
        }
    }
}

impl TableConfig {
    /// All-zero settings, as carried by chips outside a board.
    pub const ZERO: Self = Self {
        injection_rate: 0,
        consumption_delay: 0,
        router_timeout: 0,
        sample_period: 0,
    };

    /// Create config from environment variables over the defaults.
    ///
    /// Reads `HEXMESH_INJECTION_RATE`, `HEXMESH_CONSUMPTION_DELAY`,
    /// `HEXMESH_ROUTER_TIMEOUT` and `HEXMESH_SAMPLE_PERIOD`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let read = |name: &'static str, default: u32| -> Result<u32> {
            match lookup(name) {
                Some(raw) => {
                    debug!(name, value = %raw, "config override");
                    raw.trim().parse().map_err(|_| {
                        Error::from(ConfigError::InvalidValue { name, value: raw.clone() })
                    })
                }
                None => Ok(default),
            }
        };

        Ok(Self {
            injection_rate: read("HEXMESH_INJECTION_RATE", defaults.injection_rate)?,
            consumption_delay: read("HEXMESH_CONSUMPTION_DELAY", defaults.consumption_delay)?,
            router_timeout: read("HEXMESH_ROUTER_TIMEOUT", defaults.router_timeout)?,
            sample_period: read("HEXMESH_SAMPLE_PERIOD", defaults.sample_period)?,
        })
    }

    /// Check every field fits its bit-width.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("injection_rate", self.injection_rate, INJECTION_RATE_LIMIT),
            ("consumption_delay", self.consumption_delay, CONSUMPTION_DELAY_LIMIT),
            ("router_timeout", self.router_timeout, ROUTER_TIMEOUT_LIMIT),
            ("sample_period", self.sample_period, SAMPLE_PERIOD_LIMIT),
        ];
        for (field, value, limit) in fields {
            if value >= limit {
                return Err(Error::FieldOverflow {
                    field,
                    node: None,
                    value: value.into(),
                    limit: limit.into(),
                });
            }
        }
        Ok(())
    }

    /// The packed `consumption_delay << 10 | injection_rate` word.
    ///
    /// Only meaningful once [`validate`](Self::validate) has passed.
    pub fn rate_word(&self) -> u16 {
        ((self.consumption_delay << 10) | self.injection_rate) as u16
    }
}
