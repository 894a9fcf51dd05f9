//! Locale identity and per-language grammar.

mod builtin;
mod language;

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{I18nError, Result};
use crate::format::{apply_transform, Formatter};
use crate::rule::{Quantity, Rule};
use crate::template::{select_variant, Template};

pub use builtin::available_locales;
pub(crate) use builtin::lookup as lookup_builtin;
pub use language::{Language, ListStyle};

fn code_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\A[A-Za-z_-]+\z").expect("locale code pattern is valid"))
}

/// Check that `code` only uses letters, `-` and `_`.
pub fn validate_locale_code(code: &str) -> Result<()> {
    if code_pattern().is_match(code) {
        Ok(())
    } else {
        Err(I18nError::InvalidLocaleCode(code.to_string()))
    }
}

/// Normalize a locale identifier for lookup and comparison.
///
/// - Converts `_` to `-` (Android often reports `en_US`).
/// - Lower-cases everything: `en_CA` -> `en-ca`.
pub fn normalize_locale(s: &str) -> String {
    s.trim().replace('_', "-").to_ascii_lowercase()
}

/// Display form of a locale code: separators become `-` and the region
/// subtag is upper-cased (`en_ca` -> `en-CA`). Other subtags are untouched.
pub fn canonical_locale(s: &str) -> String {
    s.trim()
        .replace('_', "-")
        .split('-')
        .enumerate()
        .map(|(i, part)| {
            if i == 1 {
                part.to_ascii_uppercase()
            } else {
                part.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}

/// A language/region pair with its grammar.
///
/// Equality is by normalized code.
#[derive(Clone, Debug)]
pub struct Locale {
    code: String,
    short_code: Option<String>,
    name: String,
    short_name: Option<String>,
    language: Language,
}

impl PartialEq for Locale {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Locale {}

impl Locale {
    pub fn new(code: impl Into<String>, name: impl Into<String>, language: Language) -> Self {
        Self {
            code: code.into(),
            short_code: None,
            name: name.into(),
            short_name: None,
            language,
        }
    }

    /// Attach the base locale this one falls back to.
    pub fn with_short(mut self, code: impl Into<String>, name: impl Into<String>) -> Self {
        self.short_code = Some(code.into());
        self.short_name = Some(name.into());
        self
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    /// The base locale code, or the code itself when there is none.
    pub fn short_code(&self) -> &str {
        self.short_code.as_deref().unwrap_or(&self.code)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn short_name(&self) -> &str {
        self.short_name.as_deref().unwrap_or(&self.name)
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Normalized code used as the registry and catalog key.
    pub fn key(&self) -> String {
        normalize_locale(&self.code)
    }

    pub fn has_short_code(&self) -> bool {
        normalize_locale(self.short_code()) != self.key()
    }

    /// `[code]`, or `[code, short_code]` for regional locales.
    pub fn codes(&self) -> Vec<&str> {
        if self.has_short_code() {
            vec![self.code(), self.short_code()]
        } else {
            vec![self.code()]
        }
    }

    pub fn cardinal_rule(&self, value: impl Into<Quantity>, zero_as_none: bool) -> Rule {
        self.language.cardinal_rule(value, zero_as_none)
    }

    pub fn cardinal_rule_int(&self, value: i64, zero_as_none: bool) -> Rule {
        self.language.cardinal_rule(Quantity::Int(value), zero_as_none)
    }

    pub fn range_rule(&self, start: impl Into<Quantity>, end: impl Into<Quantity>) -> Rule {
        self.language.range_rule(start, end)
    }

    pub fn format_list<S: AsRef<str>>(&self, items: &[S], style: ListStyle) -> String {
        self.language.format_list(items, style)
    }

    /// Apply a named transform: language-specific first, then the shared
    /// number table. Unknown methods return `value` unchanged.
    pub fn transform(&self, value: &str, method: &str, formatter: &dyn Formatter) -> String {
        self.language
            .transform(value, method)
            .or_else(|| apply_transform(formatter, &self.code, value, method))
            .unwrap_or_else(|| value.to_string())
    }

    pub fn pluralize<'a>(&self, template: &'a Template, rule: Rule) -> Result<&'a str> {
        select_variant(template, rule)
    }
}
