//! # Engine Configuration
//!
//! Policies that the storage core leaves to the caller. Loaded once at
//! startup, usually from a TOML document.
//!
//! ```toml
//! registration = "exact"
//! prune_limit = 1
//! prune_on_destroy = true
//! ```

use serde::Deserialize;

use crate::error::ConfigError;

/// How `register_archetype` treats a field set that an existing archetype
/// already covers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationPolicy {
    /// Reuse the first archetype whose fields are a superset of the request.
    ///
    /// Registering `{A}` after `{A, B}` hands back the `{A, B}` archetype.
    #[default]
    Superset,
    /// Reuse only an archetype with exactly the requested field set.
    ///
    /// Entity creation prefers an exact match and falls back to the first
    /// superset match.
    Exact,
}

/// Tunables for an [`Engine`](crate::Engine).
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Archetype reuse policy.
    pub registration: RegistrationPolicy,
    /// Maximum number of chunks removed per archetype in one prune pass.
    /// `None` removes every empty chunk except the current one.
    pub prune_limit: Option<usize>,
    /// Prune the owning archetype whenever a destroy empties a chunk.
    pub prune_on_destroy: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            registration: RegistrationPolicy::Superset,
            prune_limit: None,
            prune_on_destroy: false,
        }
    }
}

impl EngineConfig {
    /// Parses a configuration from a TOML document.
    ///
    /// Missing keys take their default value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML or unknown keys and
    /// [`ConfigError::Invalid`] for out-of-range values.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.prune_limit == Some(0) {
            return Err(ConfigError::Invalid(
                "prune_limit must be at least 1 when set".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_superset_reuse() {
        let config = EngineConfig::default();
        assert_eq!(config.registration, RegistrationPolicy::Superset);
        assert_eq!(config.prune_limit, None);
        assert!(!config.prune_on_destroy);
    }

    #[test]
    fn test_parse_full_document() {
        let config = EngineConfig::from_toml_str(
            "registration = \"exact\"\nprune_limit = 1\nprune_on_destroy = true\n",
        )
        .unwrap();
        assert_eq!(config.registration, RegistrationPolicy::Exact);
        assert_eq!(config.prune_limit, Some(1));
        assert!(config.prune_on_destroy);
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_rejects_zero_prune_limit() {
        let err = EngineConfig::from_toml_str("prune_limit = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_unknown_keys() {
        let err = EngineConfig::from_toml_str("chunk_size = 4096").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
