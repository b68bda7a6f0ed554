//! # Scenario Configuration
//!
//! ```toml
//! mode = "no-chunk"
//! max_entities = 50000
//! min_life_secs = 1.0
//! max_life_secs = 10.0
//! duration_secs = 60.0
//! report_interval_secs = 1.0
//! seed = 7
//!
//! [engine]
//! prune_on_destroy = true
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;
use strata_core::EngineConfig;

use crate::error::ScenarioError;

/// Which storage the scenario runs on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScenarioMode {
    /// Every entity is its own heap object holding boxed components.
    NoChunk,
    /// Entities live in the archetype chunks of a [`strata_core::Engine`].
    #[default]
    Chunk,
}

impl ScenarioMode {
    /// Name used in config files and on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoChunk => "no-chunk",
            Self::Chunk => "chunk",
        }
    }
}

impl fmt::Display for ScenarioMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScenarioMode {
    type Err = ScenarioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "no-chunk" | "1" => Ok(Self::NoChunk),
            "chunk" | "2" => Ok(Self::Chunk),
            other => Err(ScenarioError::Invalid(format!(
                "unknown mode {other:?}, expected no-chunk or chunk"
            ))),
        }
    }
}

/// Scenario settings.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Storage the systems run on.
    pub mode: ScenarioMode,
    /// Population the create system tops up to every tick.
    pub max_entities: usize,
    /// Shortest random lifetime, in seconds.
    pub min_life_secs: f32,
    /// Longest random lifetime, in seconds.
    pub max_life_secs: f32,
    /// Wall-clock run time, in seconds.
    pub duration_secs: f32,
    /// Seconds between progress reports.
    pub report_interval_secs: f32,
    /// Use this delta every tick instead of measured time.
    pub fixed_delta_secs: Option<f32>,
    /// Seed for lifetime generation.
    pub seed: u64,
    /// Storage engine policies.
    pub engine: EngineConfig,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            mode: ScenarioMode::Chunk,
            max_entities: 100_000,
            min_life_secs: 1.0,
            max_life_secs: 10.0,
            duration_secs: 60.0,
            report_interval_secs: 1.0,
            fixed_delta_secs: None,
            seed: 0x5EED,
            engine: EngineConfig::default(),
        }
    }
}

impl ScenarioConfig {
    /// Parses settings from a TOML document.
    ///
    /// # Errors
    ///
    /// [`ScenarioError::Parse`] or [`ScenarioError::Invalid`].
    pub fn from_toml_str(source: &str) -> Result<Self, ScenarioError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a TOML file.
    ///
    /// # Errors
    ///
    /// [`ScenarioError::Io`] plus the errors of
    /// [`from_toml_str`](Self::from_toml_str).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScenarioError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// [`ScenarioError::Invalid`] naming the offending key.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        if !(self.min_life_secs > 0.0 && self.min_life_secs <= self.max_life_secs) {
            return Err(ScenarioError::Invalid(format!(
                "lifetime range {}..={} must be positive and ordered",
                self.min_life_secs, self.max_life_secs
            )));
        }
        if !(self.duration_secs > 0.0) {
            return Err(ScenarioError::Invalid(
                "duration_secs must be positive".to_string(),
            ));
        }
        if !(self.report_interval_secs > 0.0) {
            return Err(ScenarioError::Invalid(
                "report_interval_secs must be positive".to_string(),
            ));
        }
        if matches!(self.fixed_delta_secs, Some(delta) if !(delta > 0.0)) {
            return Err(ScenarioError::Invalid(
                "fixed_delta_secs must be positive".to_string(),
            ));
        }
        if self.engine.prune_limit == Some(0) {
            return Err(ScenarioError::Invalid(
                "engine.prune_limit must be at least 1 when set".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::RegistrationPolicy;

    #[test]
    fn test_defaults_match_reference_run() {
        let config = ScenarioConfig::default();
        assert_eq!(config.mode, ScenarioMode::Chunk);
        assert_eq!(config.max_entities, 100_000);
        assert_eq!(config.min_life_secs, 1.0);
        assert_eq!(config.max_life_secs, 10.0);
        assert_eq!(config.duration_secs, 60.0);
        assert_eq!(config.report_interval_secs, 1.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_with_engine_table() {
        let config = ScenarioConfig::from_toml_str(
            r#"
            max_entities = 500
            fixed_delta_secs = 0.25

            [engine]
            registration = "exact"
            prune_on_destroy = true
            "#,
        )
        .unwrap();

        assert_eq!(config.max_entities, 500);
        assert_eq!(config.fixed_delta_secs, Some(0.25));
        assert_eq!(config.engine.registration, RegistrationPolicy::Exact);
        assert!(config.engine.prune_on_destroy);
        assert_eq!(config.duration_secs, 60.0);
    }

    #[test]
    fn test_parse_mode() {
        let config = ScenarioConfig::from_toml_str(r#"mode = "no-chunk""#).unwrap();
        assert_eq!(config.mode, ScenarioMode::NoChunk);
        assert!(matches!(
            ScenarioConfig::from_toml_str(r#"mode = "sparse""#),
            Err(ScenarioError::Parse(_))
        ));

        assert_eq!("chunk".parse::<ScenarioMode>().unwrap(), ScenarioMode::Chunk);
        assert_eq!("1".parse::<ScenarioMode>().unwrap(), ScenarioMode::NoChunk);
        assert_eq!(ScenarioMode::NoChunk.to_string(), "no-chunk");
        assert!(matches!(
            "sparse".parse::<ScenarioMode>(),
            Err(ScenarioError::Invalid(_))
        ));
    }

    #[test]
    fn test_rejects_bad_ranges() {
        assert!(matches!(
            ScenarioConfig::from_toml_str("min_life_secs = 5.0\nmax_life_secs = 2.0"),
            Err(ScenarioError::Invalid(_))
        ));
        assert!(matches!(
            ScenarioConfig::from_toml_str("fixed_delta_secs = 0.0"),
            Err(ScenarioError::Invalid(_))
        ));
        assert!(matches!(
            ScenarioConfig::from_toml_str("unknown = 1"),
            Err(ScenarioError::Parse(_))
        ));
    }
}
