use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::prelude::*;

/// Everything tunable without touching code. Missing keys fall back to
/// their defaults, so a config file only needs the values it changes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub search: SearchConfig,
    pub eval: EvalParams,
}

impl EngineConfig {
    /// Save to TOML File
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> miette::Result<()> {
        let path = path.as_ref();
        let toml_string = toml::to_string_pretty(self).into_diagnostic()?;
        fs::write(path, toml_string)
            .into_diagnostic()
            .with_context(|| format!("Writing config to {}", path.display()))
    }

    /// Load from a TOML File
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> miette::Result<Self> {
        let path = path.as_ref();
        let file_content = fs::read_to_string(path)
            .into_diagnostic()
            .with_context(|| format!("Reading config from {}", path.display()))?;
        Self::from_toml(&file_content)
            .with_context(|| format!("Parsing config {}", path.display()))
    }

    pub fn from_toml(s: &str) -> miette::Result<Self> {
        toml::from_str(s).into_diagnostic()
    }

    /// Config from `path` if given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> miette::Result<Self> {
        match path {
            Some(p) => {
                let cfg = Self::load_from_file(p)?;
                info!("Loaded config from {}", p.display());
                Ok(cfg)
            }
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let cfg = EngineConfig::from_toml(
            r#"
            [search]
            hash_size_mb = 32
            use_tt = false

            [eval]
            early_queen_penalty = -40
            "#,
        )
        .unwrap();

        assert_eq!(cfg.search.hash_size_mb, 32);
        assert!(!cfg.search.use_tt);
        assert_eq!(cfg.search.time_divisor, 120);
        assert_eq!(cfg.eval.early_queen_penalty, -40);
        assert_eq!(cfg.eval.piece_values, [100, 320, 330, 500, 900]);
    }

    #[test]
    fn empty_config_is_default() {
        assert_eq!(EngineConfig::from_toml("").unwrap(), EngineConfig::default());
    }

    #[test]
    fn save_then_load() {
        let path = std::env::temp_dir().join(format!("tempo_config_{}.toml", std::process::id()));
        let mut cfg = EngineConfig::default();
        cfg.search.time_divisor = 60;
        cfg.eval.central_pawn_bonus = 25;

        cfg.save_to_file(&path).unwrap();
        let loaded = EngineConfig::load_from_file(&path).unwrap();
        let _ = fs::remove_file(&path);
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn bad_config_is_an_error() {
        assert!(EngineConfig::from_toml("[search]\nhash_size_mb = \"lots\"").is_err());
        assert!(EngineConfig::load_from_file("/definitely/not/here.toml").is_err());
    }
}
