//! Parla message resolution
//!
//! Turns a message key plus a target locale into display text:
//! - Ranked locale fallback: caller locales (or the default chain), then the
//!   fallback chain, with regional locales falling back to their base
//!   language (`en-CA` -> `en`)
//! - Per-language plural rules selecting among `none`/`one`/`few`/`many`/
//!   `other` variants
//! - `{name}` and `{name:method}` placeholders with locale-aware transforms
//!   (`possessive`, `integer`, `decimal:2`, `ordinal`, `date:long`, ...)
//! - Default-locale formatting of numbers, money, dates and measured
//!   quantities (data sizes, lengths, masses)
//!
//! Catalogs are JSON or YAML files under `<dir>/<namespace>/<locale>.json`,
//! loaded lazily by [`DirectorySource`], or built in memory with
//! [`MemorySource`].
//!
//! ```no_run
//! use std::sync::Arc;
//! use parla_i18n::{args, DirectorySource, LocaleRegistry, Rule};
//!
//! let mut registry = LocaleRegistry::new(Arc::new(DirectorySource::new(["locales"])));
//! registry.register("en-CA")?;
//! registry.set_default(Some("en-CA"))?;
//!
//! let text = registry.get("greeting", &args! { name: "Ada" }, Rule::Other, None, None);
//! # Ok::<(), parla_i18n::I18nError>(())
//! ```

mod args;
mod catalog;
mod config;
mod error;
mod format;
mod locale;
mod registry;
mod rule;
mod source;
mod state;
mod template;
mod units;

pub use args::{ArgValue, Args, Message};
pub use catalog::{CatalogFormat, CatalogParseError, MessageCatalog};
pub use config::{I18nConfig, DEFAULT_NAMESPACE};
pub use error::{I18nError, Result};
pub use format::{apply_transform, parse_datetime, DateStyle, Formatter, IcuFormatter, TimeStyle};
pub use locale::{
    available_locales, canonical_locale, normalize_locale, validate_locale_code, Language,
    ListStyle, Locale,
};
pub use registry::LocaleRegistry;
pub use rule::{Quantity, Rule};
pub use source::{DirectorySource, MemorySource, MessageSource};
pub use state::{resolve, resolve_message, I18n};
pub use template::{select_variant, substitute, Template};
pub use units::{LengthUnit, MassUnit, SizeUnit};

pub use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Build [`Args`] from `name: value` pairs.
///
/// Example: `args! { name: user_name, count: 3 }`
#[macro_export]
macro_rules! args {
    () => {
        $crate::Args::new()
    };
    ($($name:ident : $value:expr),+ $(,)?) => {{
        let mut a = $crate::Args::new();
        $(
            a.insert(stringify!($name), $value);
        )+
        a
    }};
}

/// Convenience macro for building a [`Message`].
///
/// Examples:
/// - `t!("app.title")`
/// - `t!("greeting", { name: user_name, count: 3 })`
#[macro_export]
macro_rules! t {
    ($id:literal) => {
        $crate::Message::new($id)
    };
    ($id:literal, { $($name:ident : $value:expr),* $(,)? }) => {{
        let mut m = $crate::Message::new($id);
        $(
            m = m.arg(stringify!($name), $value);
        )*
        m
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn macros_build_args_in_order() {
        let a = args! { name: "Ada", count: 3 };
        let names: Vec<&str> = a.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["name", "count"]);
        assert_eq!(a.get("count"), Some(&ArgValue::Int(3)));
        assert!(args!().is_empty());

        let m = t!("greeting", { name: "Ada" });
        assert_eq!(m.id, "greeting");
        assert_eq!(m.args.get("name"), Some(&ArgValue::from("Ada")));
        assert_eq!(t!("app.title").args.len(), 0);
    }
}
