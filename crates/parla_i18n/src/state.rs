use std::sync::OnceLock;

use tracing::debug;

use crate::args::{Args, Message};
use crate::registry::LocaleRegistry;
use crate::rule::Rule;

static REGISTRY: OnceLock<LocaleRegistry> = OnceLock::new();

/// Process-wide registry slot for free-function lookups.
pub struct I18n;

impl I18n {
    /// Install a fully configured registry. The first install wins; later
    /// calls hand their registry back as `Err`.
    pub fn install(registry: LocaleRegistry) -> Result<&'static LocaleRegistry, LocaleRegistry> {
        REGISTRY.set(registry)?;
        debug!("installed global locale registry");
        Ok(Self::get())
    }

    pub fn get() -> &'static LocaleRegistry {
        REGISTRY
            .get()
            .expect("locale registry not installed. Call I18n::install() at startup.")
    }

    pub fn try_get() -> Option<&'static LocaleRegistry> {
        REGISTRY.get()
    }
}

/// Resolve `key` through the installed registry. Before install this
/// returns the key.
pub fn resolve(key: &str, args: &Args) -> String {
    match I18n::try_get() {
        Some(registry) => registry.get(key, args, Rule::Other, None, None),
        None => key.to_string(),
    }
}

/// Resolve a [`Message`] through the installed registry.
pub fn resolve_message(msg: &Message) -> String {
    match I18n::try_get() {
        Some(registry) => registry.format(msg),
        None => msg.id.to_string(),
    }
}
