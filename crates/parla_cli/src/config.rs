//! parla.toml handling

use anyhow::{Context, Result};
use parla_i18n::I18nConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "parla.toml";

/// Top-level configuration (parla.toml)
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ParlaConfig {
    #[serde(default)]
    pub i18n: I18nConfig,
}

impl ParlaConfig {
    /// Load configuration from a file, or from a directory containing parla.toml.
    ///
    /// Relative catalog directories are resolved against the config file's
    /// directory.
    pub fn load_from_dir(path: &Path) -> Result<Self> {
        let config_path = if path.is_file() {
            path.to_path_buf()
        } else {
            path.join(CONFIG_FILE)
        };

        if !config_path.exists() {
            anyhow::bail!(
                "No {CONFIG_FILE} found in {}. Run `parla init` to create one.",
                path.display()
            );
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        let mut config: ParlaConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;

        let base = config_path.parent().unwrap_or(Path::new("."));
        config.i18n.dirs = config
            .i18n
            .dirs
            .iter()
            .map(|dir| resolve_dir(base, dir))
            .collect();

        Ok(config)
    }

    /// Starter configuration: English with a `locales/` catalog directory.
    pub fn new() -> Self {
        Self {
            i18n: I18nConfig {
                locales: vec!["en".to_string()],
                default: Some("en".to_string()),
                dirs: vec![PathBuf::from("locales")],
                ..I18nConfig::default()
            },
        }
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}

fn resolve_dir(base: &Path, dir: &Path) -> PathBuf {
    if dir.is_absolute() {
        dir.to_path_buf()
    } else {
        base.join(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn starter_config_round_trips() {
        let text = ParlaConfig::new().to_toml().unwrap();
        let parsed: ParlaConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.i18n, ParlaConfig::new().i18n);
    }

    #[test]
    fn load_resolves_relative_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            r#"
[i18n]
locales = ["en-CA", "fr"]
default = "en-CA"
fallback = "fr"
dirs = ["locales"]
"#,
        )
        .unwrap();

        let config = ParlaConfig::load_from_dir(tmp.path()).unwrap();
        assert_eq!(config.i18n.locales, vec!["en-CA", "fr"]);
        assert_eq!(config.i18n.fallback.as_deref(), Some("fr"));
        assert_eq!(config.i18n.namespaces, vec!["messages"]);
        assert_eq!(config.i18n.dirs, vec![tmp.path().join("locales")]);
    }

    #[test]
    fn missing_file_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = ParlaConfig::load_from_dir(tmp.path()).unwrap_err();
        assert!(err.to_string().contains("parla init"));
    }
}
