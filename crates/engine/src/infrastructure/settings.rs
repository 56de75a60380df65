//! Engine configuration loading.
//!
//! Layering, lowest to highest precedence:
//!
//! 1. [`EngineConfig::default`]
//! 2. optional TOML file (`vessel.toml`, or the path in `VESSEL_CONFIG`)
//! 3. environment variables prefixed `VESSEL`, nested with `__`
//!    (e.g. `VESSEL_TICK_RATE_HZ=30`, `VESSEL_CONTAINMENT__DEBUG__INFO=true`)

use serde::{Deserialize, Serialize};
use vessel_domain::{ContainmentSettings, DomainError};

use crate::adapters::ActorTemplate;
use crate::infrastructure::error::EngineError;
use crate::simulation::Topology;

pub const DEFAULT_CONFIG_FILE: &str = "vessel.toml";
pub const CONFIG_PATH_VAR: &str = "VESSEL_CONFIG";
const ENV_PREFIX: &str = "VESSEL";

/// Everything the runner needs to start a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Simulation steps per second.
    pub tick_rate_hz: u32,
    /// Stop after this many steps; run until interrupted when absent.
    pub max_ticks: Option<u64>,
    pub topology: Topology,
    pub containment: ContainmentSettings,
    /// Demo population spawned at session start.
    pub population: Vec<ActorTemplate>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: 60,
            max_ticks: None,
            topology: Topology::Standalone,
            containment: ContainmentSettings::default(),
            population: Vec::new(),
        }
    }
}

impl EngineConfig {
    /// Load from the default file location and the environment.
    pub fn load() -> Result<Self, EngineError> {
        let path =
            std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::load_from(Some(&path))
    }

    /// Load from an explicit (optional) file and the environment.
    pub fn load_from(path: Option<&str>) -> Result<Self, EngineError> {
        let mut builder =
            config::Config::builder().add_source(config::Config::try_from(&Self::default())?);

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML document layered over the defaults (no environment).
    pub fn from_toml(source: &str) -> Result<Self, EngineError> {
        let config: Self = config::Config::builder()
            .add_source(config::Config::try_from(&Self::default())?)
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.tick_rate_hz == 0 {
            return Err(DomainError::validation("tick_rate_hz must be positive"));
        }
        self.containment.validate()?;

        let mut seen = std::collections::HashSet::new();
        for template in &self.population {
            if !seen.insert((template.kind, template.index)) {
                return Err(DomainError::validation(format!(
                    "population lists {} #{} twice",
                    template.kind, template.index
                )));
            }
            if template.life <= 0 {
                return Err(DomainError::validation(format!(
                    "population entry '{}' needs positive life",
                    template.name
                )));
            }
        }
        Ok(())
    }

    /// Step period derived from `tick_rate_hz`.
    pub fn tick_period(&self) -> std::time::Duration {
        std::time::Duration::from_secs_f64(1.0 / f64::from(self.tick_rate_hz.max(1)))
    }
}
