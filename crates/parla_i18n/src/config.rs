use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub const DEFAULT_NAMESPACE: &str = "messages";

fn default_namespaces() -> Vec<String> {
    vec![DEFAULT_NAMESPACE.to_string()]
}

/// Registry setup, usually read from the `[i18n]` table of a config file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct I18nConfig {
    /// Locales to register, in order.
    pub locales: Vec<String>,
    pub default: Option<String>,
    pub fallback: Option<String>,
    /// Namespaces searched when a lookup names none.
    pub namespaces: Vec<String>,
    /// Catalog search directories; later ones override earlier ones.
    pub dirs: Vec<PathBuf>,
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            locales: Vec::new(),
            default: None,
            fallback: None,
            namespaces: default_namespaces(),
            dirs: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_fields_take_defaults() {
        let cfg: I18nConfig = serde_json::from_str(r#"{ "locales": ["en-CA"] }"#).unwrap();
        assert_eq!(cfg.locales, vec!["en-CA"]);
        assert_eq!(cfg.namespaces, vec!["messages"]);
        assert_eq!(cfg.default, None);
        assert!(cfg.dirs.is_empty());
    }
}
