use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde_json::Value;
use thiserror::Error;

use crate::rule::Rule;
use crate::template::Template;

const MAX_CATALOG_ENTRIES: usize = 10_000;
const MAX_KEY_BYTES: usize = 128;
const MAX_VALUE_BYTES: usize = 16 * 1024;

fn is_valid_key(key: &str) -> bool {
    let mut it = key.chars();
    match it.next() {
        Some(c) if c.is_ascii_alphanumeric() => {}
        _ => return false,
    }
    it.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.' || c == '-')
}

/// On-disk catalog encodings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CatalogFormat {
    Json,
    Yaml,
}

impl CatalogFormat {
    pub const EXTENSIONS: [(&'static str, CatalogFormat); 3] = [
        ("json", CatalogFormat::Json),
        ("yaml", CatalogFormat::Yaml),
        ("yml", CatalogFormat::Yaml),
    ];

    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        Self::EXTENSIONS
            .iter()
            .find(|(e, _)| e.eq_ignore_ascii_case(ext))
            .map(|(_, f)| *f)
    }
}

#[derive(Debug, Error)]
pub enum CatalogParseError {
    #[error("json error: {0}")]
    Json(String),

    #[error("yaml error: {0}")]
    Yaml(String),

    #[error("catalog must be a mapping of message keys")]
    NotAMapping,

    #[error("too many entries (max {MAX_CATALOG_ENTRIES})")]
    TooManyEntries,

    #[error("entry `{key}`: {msg}")]
    Entry { key: String, msg: String },
}

fn entry_error(key: &str, msg: impl Into<String>) -> CatalogParseError {
    CatalogParseError::Entry {
        key: key.to_string(),
        msg: msg.into(),
    }
}

/// Messages for one `(locale, namespace)` slot.
///
/// File format: a flat mapping from key to either a string or a mapping of
/// plural rule name to string.
///
/// ```yaml
/// greeting: "Hello, {name}!"
/// files:
///   one: "{count} file"
///   other: "{count} files"
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MessageCatalog {
    entries: HashMap<String, Template>,
}

impl MessageCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, template: impl Into<Template>) {
        self.entries.insert(key.into(), template.into());
    }

    pub fn with(mut self, key: impl Into<String>, template: impl Into<Template>) -> Self {
        self.insert(key, template);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Template> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Merge `other` into `self`; keys in `other` win.
    pub fn merge(&mut self, other: MessageCatalog) {
        self.entries.extend(other.entries);
    }

    pub fn parse(src: &str, format: CatalogFormat) -> Result<Self, CatalogParseError> {
        match format {
            CatalogFormat::Json => Self::parse_json(src),
            CatalogFormat::Yaml => Self::parse_yaml(src),
        }
    }

    pub fn parse_json(src: &str) -> Result<Self, CatalogParseError> {
        let value: Value =
            serde_json::from_str(src).map_err(|e| CatalogParseError::Json(e.to_string()))?;
        Self::from_value(value)
    }

    pub fn parse_yaml(src: &str) -> Result<Self, CatalogParseError> {
        let raw: serde_yaml::Value =
            serde_yaml::from_str(src).map_err(|e| CatalogParseError::Yaml(e.to_string()))?;
        // An empty document is an empty catalog.
        if raw.is_null() {
            return Ok(Self::new());
        }
        let value = serde_json::to_value(raw).map_err(|e| CatalogParseError::Yaml(e.to_string()))?;
        Self::from_value(value)
    }

    fn from_value(value: Value) -> Result<Self, CatalogParseError> {
        let Value::Object(raw) = value else {
            return Err(CatalogParseError::NotAMapping);
        };
        if raw.len() > MAX_CATALOG_ENTRIES {
            return Err(CatalogParseError::TooManyEntries);
        }

        let mut cat = Self::new();
        for (key, v) in raw {
            if !is_valid_key(&key) {
                return Err(entry_error(
                    &key,
                    "invalid key (allowed: [A-Za-z0-9][A-Za-z0-9_.-]*)",
                ));
            }
            if key.len() > MAX_KEY_BYTES {
                return Err(entry_error(
                    &key,
                    format!("key is too long (max {MAX_KEY_BYTES} bytes)"),
                ));
            }
            let template = match v {
                Value::String(s) => {
                    check_value_len(&key, &s)?;
                    Template::Plain(s)
                }
                Value::Object(forms) => {
                    let mut out = BTreeMap::new();
                    for (name, text) in forms {
                        let rule: Rule = name
                            .parse()
                            .map_err(|_| entry_error(&key, format!("unknown plural rule `{name}`")))?;
                        let Value::String(text) = text else {
                            return Err(entry_error(
                                &key,
                                format!("plural form `{name}` must be a string"),
                            ));
                        };
                        check_value_len(&key, &text)?;
                        out.insert(rule, text);
                    }
                    Template::Plural(out)
                }
                _ => {
                    return Err(entry_error(
                        &key,
                        "value must be a string or a mapping of plural forms",
                    ))
                }
            };
            cat.entries.insert(key, template);
        }
        Ok(cat)
    }
}

fn check_value_len(key: &str, value: &str) -> Result<(), CatalogParseError> {
    if value.len() > MAX_VALUE_BYTES {
        return Err(entry_error(
            key,
            format!("value is too long (max {MAX_VALUE_BYTES} bytes)"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_json_plain_and_plural() {
        let src = r#"{
            "greeting": "Hello, {name}!",
            "files": { "one": "{count} file", "other": "{count} files" }
        }"#;
        let cat = MessageCatalog::parse_json(src).unwrap();
        assert_eq!(cat.len(), 2);
        assert_eq!(cat.get("greeting"), Some(&Template::from("Hello, {name}!")));
        assert_eq!(
            cat.get("files"),
            Some(&Template::plural([
                (Rule::One, "{count} file"),
                (Rule::Other, "{count} files")
            ]))
        );
    }

    #[test]
    fn parse_yaml_plain_and_plural() {
        let src = r#"
app.title: "Parla Demo"
files:
  none: "No files"
  other: "{count} files"
"#;
        let cat = MessageCatalog::parse_yaml(src).unwrap();
        assert_eq!(cat.get("app.title"), Some(&Template::from("Parla Demo")));
        assert_eq!(
            cat.get("files"),
            Some(&Template::plural([
                (Rule::None, "No files"),
                (Rule::Other, "{count} files")
            ]))
        );
    }

    #[test]
    fn empty_yaml_is_empty_catalog() {
        assert!(MessageCatalog::parse_yaml("").unwrap().is_empty());
    }

    #[test]
    fn top_level_must_be_mapping() {
        assert!(matches!(
            MessageCatalog::parse_json("[1, 2]"),
            Err(CatalogParseError::NotAMapping)
        ));
        assert!(matches!(
            MessageCatalog::parse_json("\"text\""),
            Err(CatalogParseError::NotAMapping)
        ));
        assert!(matches!(
            MessageCatalog::parse_json("{ nope"),
            Err(CatalogParseError::Json(_))
        ));
    }

    #[test]
    fn values_must_be_strings_or_forms() {
        let err = MessageCatalog::parse_json(r#"{ "count": 123 }"#).unwrap_err();
        assert!(matches!(err, CatalogParseError::Entry { .. }));

        let err = MessageCatalog::parse_json(r#"{ "files": { "several": "x" } }"#).unwrap_err();
        assert!(err.to_string().contains("unknown plural rule `several`"));

        let err = MessageCatalog::parse_json(r#"{ "files": { "one": 1 } }"#).unwrap_err();
        assert!(matches!(err, CatalogParseError::Entry { .. }));
    }

    #[test]
    fn key_validation() {
        let err = MessageCatalog::parse_yaml("bad key: nope\n").unwrap_err();
        assert!(matches!(err, CatalogParseError::Entry { .. }));

        let long = "k".repeat(MAX_KEY_BYTES + 1);
        let err = MessageCatalog::parse_json(&format!(r#"{{ "{long}": "x" }}"#)).unwrap_err();
        assert!(err.to_string().contains("too long"));
    }

    #[test]
    fn merge_prefers_newer_entries() {
        let mut base = MessageCatalog::new().with("a", "old").with("b", "keep");
        base.merge(MessageCatalog::new().with("a", "new"));
        assert_eq!(base.get("a"), Some(&Template::from("new")));
        assert_eq!(base.get("b"), Some(&Template::from("keep")));
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(
            CatalogFormat::from_path(Path::new("en.json")),
            Some(CatalogFormat::Json)
        );
        assert_eq!(
            CatalogFormat::from_path(Path::new("en.YML")),
            Some(CatalogFormat::Yaml)
        );
        assert_eq!(CatalogFormat::from_path(Path::new("en.txt")), None);
    }
}
