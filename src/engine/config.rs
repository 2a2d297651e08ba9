//! Engine configuration: rule knobs, the dictionary source and named bot profiles.
//! Loaded from TOML at runtime by the CLIs.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::engine::error::ConfigError;
use crate::engine::evaluator::{weights_for_profile, EvalWeights};
use crate::game::words::{builtin_dictionary, load_dictionary};

/// Move-budget rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulesConfig {
    #[serde(default = "default_base_moves")]
    pub base_moves: u32,
    /// Floor for the per-round move budget.
    #[serde(default = "default_min_moves")]
    pub min_moves: u32,
}

fn default_base_moves() -> u32 {
    15
}

fn default_min_moves() -> u32 {
    5
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            base_moves: default_base_moves(),
            min_moves: default_min_moves(),
        }
    }
}

/// A named bot profile.
#[derive(Debug, Deserialize, Clone)]
pub struct BotProfile {
    pub description: Option<String>,
    #[serde(default = "default_strategy_type")]
    pub strategy_type: String,
    /// Named evaluator preset: "default", "capture_heavy", "survival".
    pub eval_profile: Option<String>,
    /// Custom eval weights (overrides eval_profile when present).
    pub eval_weights: Option<EvalWeights>,
}

fn default_strategy_type() -> String {
    "greedy".into()
}

impl BotProfile {
    /// Effective evaluator weights: inline weights, else the named preset, else defaults.
    pub fn weights(&self) -> EvalWeights {
        if let Some(w) = self.eval_weights {
            return w;
        }
        let name = self.eval_profile.as_deref().unwrap_or("default");
        weights_for_profile(name).unwrap_or_else(|| {
            tracing::warn!(profile = name, "unknown eval profile, using default weights");
            EvalWeights::default()
        })
    }
}

/// Top-level TOML file structure.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub rules: RulesConfig,
    /// Newline-separated word list; the built-in list is used when absent.
    pub dictionary: Option<PathBuf>,
    #[serde(default)]
    pub profiles: HashMap<String, BotProfile>,
}

impl ConfigFile {
    pub fn load_dictionary(&self) -> Result<Vec<String>, ConfigError> {
        match &self.dictionary {
            Some(path) => load_dictionary(path),
            None => Ok(builtin_dictionary()),
        }
    }
}

/// Load configuration from a TOML file at the given path.
pub fn load_config(path: &Path) -> Result<ConfigFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Try well-known paths, returning the built-in defaults if none is found.
pub fn load_default_config() -> ConfigFile {
    let candidates = ["verbra.toml", "../verbra.toml", "/etc/verbra/verbra.toml"];
    for path in &candidates {
        let p = Path::new(path);
        if p.exists() {
            match load_config(p) {
                Ok(config) => {
                    tracing::info!(
                        path = %p.display(),
                        profiles = config.profiles.len(),
                        "loaded config"
                    );
                    return config;
                }
                Err(e) => {
                    tracing::warn!(path = %p.display(), error = %e, "failed to load config");
                }
            }
        }
    }
    tracing::info!("no verbra.toml found, using built-in defaults");
    ConfigFile::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: ConfigFile = toml::from_str("").unwrap();
        assert_eq!(config.rules, RulesConfig::default());
        assert!(config.dictionary.is_none());
        assert!(config.profiles.is_empty());
        assert!(config.load_dictionary().unwrap().len() > 100);
    }

    #[test]
    fn test_parse_full_config() {
        let config: ConfigFile = toml::from_str(
            r#"
            [rules]
            base_moves = 12

            [profiles.cautious]
            description = "plays for space"
            eval_profile = "survival"

            [profiles.chaos]
            strategy_type = "random"
            "#,
        )
        .unwrap();
        assert_eq!(config.rules.base_moves, 12);
        assert_eq!(config.rules.min_moves, 5);
        let cautious = &config.profiles["cautious"];
        assert_eq!(cautious.strategy_type, "greedy");
        assert_eq!(cautious.weights(), crate::engine::evaluator::SURVIVAL_WEIGHTS);
        assert_eq!(config.profiles["chaos"].strategy_type, "random");
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let words = dir.path().join("words.txt");
        std::fs::write(&words, "lantern\nharvest\n").unwrap();
        let path = dir.path().join("verbra.toml");
        std::fs::write(
            &path,
            format!("dictionary = {:?}\n[rules]\nmin_moves = 8\n", words.display().to_string()),
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.rules.min_moves, 8);
        assert_eq!(config.load_dictionary().unwrap(), vec!["LANTERN", "HARVEST"]);
    }

    #[test]
    fn test_load_config_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("verbra.toml");
        std::fs::write(&path, "[rules\nbase_moves = ").unwrap();
        assert!(matches!(load_config(&path), Err(ConfigError::Parse { .. })));
        assert!(matches!(
            load_config(&dir.path().join("nope.toml")),
            Err(ConfigError::Io { .. })
        ));
    }
}
