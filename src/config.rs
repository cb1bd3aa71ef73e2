use std::path::Path;

use crate::ai::SearchConfig;
use crate::error::ConfigError;
use crate::play::MatchConfig;

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub search: SearchConfig,
    pub matches: MatchConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            log::warn!("config file '{}' not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.search.validate()?;
        if self.search.depth > 12 {
            return Err(ConfigError::Validation("search.depth must be <= 12".into()));
        }
        self.matches.validate()?;
        Ok(())
    }

    /// Generate a TOML string with all default values (useful for creating
    /// example config files).
    pub fn default_toml() -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(&AppConfig::default())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{Algorithm, ScoringMode};
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        config.validate().expect("default config should be valid");
        assert_eq!(config.search.algorithm, Algorithm::AlphaBeta);
        assert_eq!(config.search.depth, 5);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let toml_str = r#"
[search]
algorithm = "EXPECTIMINIMAX"
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.search.algorithm, Algorithm::Expectiminimax);
        // Other fields should be defaults
        assert_eq!(config.search.depth, 5);
        assert_eq!(config.search.scoring_mode(), ScoringMode::Lite);
        assert_eq!(config.matches, MatchConfig::default());
    }

    #[test]
    fn test_empty_toml_uses_all_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_algorithm_aliases_and_scoring_override() {
        let toml_str = r#"
[search]
algorithm = "MINIMAX_NO_PRUNING"
scoring = "LITE"
depth = 3
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.search.algorithm, Algorithm::NoPruning);
        assert_eq!(config.search.scoring_mode(), ScoringMode::Lite);
    }

    #[test]
    fn test_names_are_case_insensitive_and_accept_hyphens() {
        for (name, expected) in [
            ("alpha_beta", Algorithm::AlphaBeta),
            ("alpha-beta", Algorithm::AlphaBeta),
            ("Expectiminimax", Algorithm::Expectiminimax),
            ("no-pruning", Algorithm::NoPruning),
            ("minimax_no_pruning", Algorithm::NoPruning),
        ] {
            let toml_str = format!("[search]\nalgorithm = \"{name}\"\n");
            let config: AppConfig = toml::from_str(&toml_str).unwrap();
            assert_eq!(config.search.algorithm, expected, "{name}");
            assert_eq!(name.parse::<Algorithm>().unwrap(), expected);
        }

        for (name, expected) in [("lite", ScoringMode::Lite), ("Full", ScoringMode::Full)] {
            let toml_str = format!("[search]\nscoring = \"{name}\"\n");
            let config: AppConfig = toml::from_str(&toml_str).unwrap();
            assert_eq!(config.search.scoring, Some(expected), "{name}");
        }
    }

    #[test]
    fn test_unknown_scoring_mode_is_rejected() {
        let err = toml::from_str::<AppConfig>("[search]\nscoring = \"medium\"\n").unwrap_err();
        assert!(err.to_string().contains("unknown scoring mode 'medium'"));
    }

    #[test]
    fn test_unknown_algorithm_is_rejected() {
        let toml_str = r#"
[search]
algorithm = "GREEDY"
"#;
        assert!(toml::from_str::<AppConfig>(toml_str).is_err());
    }

    #[test]
    fn test_validation_rejects_zero_depth() {
        let mut config = AppConfig::default();
        config.search.depth = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_excessive_depth() {
        let mut config = AppConfig::default();
        config.search.depth = 13;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_zero_games() {
        let mut config = AppConfig::default();
        config.matches.games = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = AppConfig::load_or_default(Path::new("nonexistent_config.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test_config.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(
            f,
            r#"
[search]
depth = 4
trace_depth = 1

[matches]
games = 3
seed = 17
"#
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.search.depth, 4);
        assert_eq!(config.search.trace_depth, 1);
        assert_eq!(config.matches.games, 3);
        assert_eq!(config.matches.seed, Some(17));
        // Others are defaults
        assert_eq!(config.search.algorithm, Algorithm::AlphaBeta);
        assert!(config.matches.ai_first);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[search]\ndepth = 0\n").unwrap();
        assert!(matches!(AppConfig::load(&path), Err(ConfigError::Validation(_))));

        std::fs::write(&path, "[search\n").unwrap();
        assert!(matches!(AppConfig::load(&path), Err(ConfigError::TomlParse(_))));
    }

    #[test]
    fn test_load_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(matches!(AppConfig::load(&path), Err(ConfigError::FileRead { .. })));
    }

    #[test]
    fn test_default_toml_roundtrips() {
        let toml_str = AppConfig::default_toml().unwrap();
        let config: AppConfig = toml::from_str(&toml_str).unwrap();
        config.validate().expect("roundtripped config should be valid");
        assert_eq!(config, AppConfig::default());
    }
}
