//! Registered locales, fallback chains and message lookup.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::args::{Args, Message};
use crate::config::I18nConfig;
use crate::error::{I18nError, Result};
use crate::format::{DateStyle, Formatter, IcuFormatter, TimeStyle};
use crate::locale::{
    canonical_locale, lookup_builtin, normalize_locale, validate_locale_code, Language, ListStyle,
    Locale,
};
use crate::rule::{Quantity, Rule};
use crate::source::MessageSource;
use crate::template::{substitute, Template};
use crate::units::{LengthUnit, MassUnit, SizeUnit};

/// Owns the registered locales and answers message lookups.
///
/// Lookups walk a ranked list of locale codes: the codes passed by the
/// caller (or the default chain when there are none), followed by the
/// fallback chain. Within each locale the namespaces are searched in order
/// and the first hit wins. The locale that supplied the message decides
/// plural selection and transforms.
///
/// Setup (`register`, `set_default`, `set_fallback`) needs `&mut self`;
/// lookups only borrow, so a finished registry can be shared across threads.
pub struct LocaleRegistry {
    locales: IndexMap<String, Locale>,
    default_chain: Vec<String>,
    fallback_chain: Vec<String>,
    namespaces: Vec<String>,
    source: Arc<dyn MessageSource>,
    formatter: Arc<dyn Formatter>,
}

impl LocaleRegistry {
    pub fn new(source: Arc<dyn MessageSource>) -> Self {
        Self {
            locales: IndexMap::new(),
            default_chain: Vec::new(),
            fallback_chain: Vec::new(),
            namespaces: I18nConfig::default().namespaces,
            source,
            formatter: Arc::new(IcuFormatter::new()),
        }
    }

    pub fn with_formatter(mut self, formatter: Arc<dyn Formatter>) -> Self {
        self.formatter = formatter;
        self
    }

    /// Namespaces searched when a lookup does not name any.
    pub fn with_namespaces<I, S>(mut self, namespaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.namespaces = namespaces.into_iter().map(Into::into).collect();
        self
    }

    /// Register every configured locale, then apply the default and fallback.
    pub fn from_config(config: &I18nConfig, source: Arc<dyn MessageSource>) -> Result<Self> {
        let mut registry = Self::new(source).with_namespaces(config.namespaces.iter().cloned());
        for code in &config.locales {
            registry.register(code)?;
        }
        registry.set_default(config.default.as_deref())?;
        registry.set_fallback(config.fallback.as_deref())?;
        Ok(registry)
    }

    // -- setup ---------------------------------------------------------------

    /// Register a built-in locale by code (`en_CA`, `en-ca`, `fr`).
    ///
    /// Regional locales also register their base locale. Registering a code
    /// again replaces the entry but keeps its original position.
    pub fn register(&mut self, code: &str) -> Result<&Locale> {
        validate_locale_code(code)?;
        let canonical = canonical_locale(code);
        let locale = lookup_builtin(&canonical)
            .ok_or_else(|| I18nError::LocaleNotFound(canonical.clone()))?;

        let key = locale.key();
        let short = locale
            .has_short_code()
            .then(|| locale.short_code().to_string());

        self.source.bind(&key);
        self.locales.insert(key.clone(), locale);
        debug!(locale = %canonical, "registered locale");

        if let Some(short) = short {
            self.register(&short)?;
        }

        self.locales
            .get(&key)
            .ok_or(I18nError::LocaleNotFound(canonical))
    }

    pub fn register_locale(&mut self, code: &str) -> Result<&Locale> {
        self.register(code)
    }

    /// Set or clear (`None`) the default chain. The locale must be registered.
    pub fn set_default(&mut self, code: Option<&str>) -> Result<()> {
        self.default_chain = self.chain_for(code)?;
        debug!(chain = ?self.default_chain, "default locale changed");
        Ok(())
    }

    pub fn set_default_locale(&mut self, code: Option<&str>) -> Result<()> {
        self.set_default(code)
    }

    /// Set or clear (`None`) the fallback chain. The locale must be registered.
    pub fn set_fallback(&mut self, code: Option<&str>) -> Result<()> {
        self.fallback_chain = self.chain_for(code)?;
        debug!(chain = ?self.fallback_chain, "fallback locale changed");
        Ok(())
    }

    pub fn set_fallback_locale(&mut self, code: Option<&str>) -> Result<()> {
        self.set_fallback(code)
    }

    fn chain_for(&self, code: Option<&str>) -> Result<Vec<String>> {
        let Some(code) = code else {
            return Ok(Vec::new());
        };
        let locale = self
            .locale(code)
            .ok_or_else(|| I18nError::LocaleNotFound(code.to_string()))?;
        Ok(locale.codes().into_iter().map(str::to_string).collect())
    }

    // -- queries -------------------------------------------------------------

    pub fn locale(&self, code: &str) -> Option<&Locale> {
        self.locales.get(&normalize_locale(code))
    }

    pub fn contains(&self, code: &str) -> bool {
        self.locale(code).is_some()
    }

    /// Display codes of registered locales, in registration order.
    pub fn locale_codes(&self) -> impl Iterator<Item = &str> {
        self.locales.values().map(Locale::code)
    }

    /// First locale of the default chain.
    pub fn default_locale(&self) -> Option<&Locale> {
        self.default_chain.first().and_then(|c| self.locale(c))
    }

    pub fn default_codes(&self) -> &[String] {
        &self.default_chain
    }

    pub fn fallback_codes(&self) -> &[String] {
        &self.fallback_chain
    }

    pub fn namespaces(&self) -> &[String] {
        &self.namespaces
    }

    pub fn formatter(&self) -> &dyn Formatter {
        self.formatter.as_ref()
    }

    /// Ordered, de-duplicated locale codes a lookup would try.
    ///
    /// Caller codes (or the default chain) come first, then the fallback
    /// chain. With nothing to go on, every registered locale is tried in
    /// registration order.
    pub fn rank(&self, locales: Option<&[&str]>) -> Vec<String> {
        let mut ranked = Vec::new();
        let mut seen = HashSet::new();

        match locales {
            Some(codes) if !codes.is_empty() => {
                for code in codes {
                    self.push_ranked(&mut ranked, &mut seen, code);
                }
            }
            _ => {
                for code in &self.default_chain {
                    self.push_ranked(&mut ranked, &mut seen, code);
                }
            }
        }
        for code in &self.fallback_chain {
            self.push_ranked(&mut ranked, &mut seen, code);
        }

        if ranked.is_empty() {
            ranked = self.locale_codes().map(str::to_string).collect();
        }
        ranked
    }

    fn push_ranked(&self, ranked: &mut Vec<String>, seen: &mut HashSet<String>, code: &str) {
        if !seen.insert(normalize_locale(code)) {
            return;
        }
        ranked.push(match self.locale(code) {
            Some(locale) => locale.code().to_string(),
            None => canonical_locale(code),
        });
    }

    // -- lookup --------------------------------------------------------------

    /// First `(template, owning locale)` for `key` across `ranked` codes.
    /// Codes that are not registered are skipped.
    fn lookup(
        &self,
        key: &str,
        ranked: &[String],
        namespaces: Option<&[&str]>,
    ) -> Result<Option<(Template, &Locale)>> {
        let default_ns: Vec<&str>;
        let namespaces: &[&str] = match namespaces {
            Some(ns) => ns,
            None => {
                default_ns = self.namespaces.iter().map(String::as_str).collect();
                &default_ns
            }
        };

        for code in ranked {
            let Some(locale) = self.locale(code) else {
                continue;
            };
            let locale_key = locale.key();
            for namespace in namespaces {
                if let Some(template) = self.source.fetch(&locale_key, namespace, key)? {
                    return Ok(Some((template, locale)));
                }
            }
        }
        Ok(None)
    }

    fn render<R>(
        &self,
        key: &str,
        args: &Args,
        rule_for: R,
        ranked: &[String],
        namespaces: Option<&[&str]>,
    ) -> Result<Option<String>>
    where
        R: Fn(&Locale) -> Rule,
    {
        let Some((template, locale)) = self.lookup(key, ranked, namespaces)? else {
            return Ok(None);
        };
        let text = locale.pluralize(&template, rule_for(locale))?;
        let formatter = self.formatter.as_ref();
        Ok(Some(substitute(text, args, |value, method| {
            locale.transform(value, method, formatter)
        })))
    }

    /// Whether any ranked locale has `key`. Unreadable catalogs count as
    /// missing.
    pub fn has(&self, key: &str, locales: Option<&[&str]>, namespaces: Option<&[&str]>) -> bool {
        let ranked = self.rank(locales);
        match self.lookup(key, &ranked, namespaces) {
            Ok(found) => found.is_some(),
            Err(err) => {
                warn!(key, error = %err, "message lookup failed");
                false
            }
        }
    }

    pub fn has_message(
        &self,
        key: &str,
        locales: Option<&[&str]>,
        namespaces: Option<&[&str]>,
    ) -> bool {
        self.has(key, locales, namespaces)
    }

    /// Resolve `key`, surfacing data errors. `Ok(None)` means no ranked
    /// locale has the key.
    pub fn try_get(
        &self,
        key: &str,
        args: &Args,
        rule: Rule,
        locales: Option<&[&str]>,
        namespaces: Option<&[&str]>,
    ) -> Result<Option<String>> {
        let ranked = self.rank(locales);
        self.render(key, args, |_| rule, &ranked, namespaces)
    }

    /// Resolve `key`. Never fails: a missing key or broken catalog yields
    /// the key itself.
    pub fn get(
        &self,
        key: &str,
        args: &Args,
        rule: Rule,
        locales: Option<&[&str]>,
        namespaces: Option<&[&str]>,
    ) -> String {
        self.try_get(key, args, rule, locales, namespaces)
            .unwrap_or_else(|err| {
                warn!(key, error = %err, "message lookup failed");
                None
            })
            .unwrap_or_else(|| key.to_string())
    }

    pub fn get_message(
        &self,
        key: &str,
        args: &Args,
        rule: Rule,
        locales: Option<&[&str]>,
        namespaces: Option<&[&str]>,
    ) -> String {
        self.get(key, args, rule, locales, namespaces)
    }

    /// Resolve a [`Message`]. A `count` picks the rule with the grammar of
    /// the locale that supplies the message.
    pub fn try_format(&self, msg: &Message, locales: Option<&[&str]>) -> Result<Option<String>> {
        let ranked = self.rank(locales);
        let rule_for = |locale: &Locale| match msg.count {
            Some(count) => locale.cardinal_rule(count, msg.zero_as_none),
            None => msg.rule,
        };
        self.render(&msg.id, &msg.args, rule_for, &ranked, None)
    }

    pub fn format(&self, msg: &Message) -> String {
        self.try_format(msg, None)
            .unwrap_or_else(|err| {
                warn!(key = %msg.id, error = %err, "message lookup failed");
                None
            })
            .unwrap_or_else(|| msg.id.to_string())
    }

    // -- default-locale grammar ----------------------------------------------

    fn require_default(&self) -> Result<&Locale> {
        self.default_locale()
            .ok_or_else(|| I18nError::UnexpectedValue("no default locale is set".to_string()))
    }

    pub fn cardinal_rule(&self, value: impl Into<Quantity>, zero_as_none: bool) -> Result<Rule> {
        Ok(self.require_default()?.cardinal_rule(value, zero_as_none))
    }

    pub fn range_rule(
        &self,
        start: impl Into<Quantity>,
        end: impl Into<Quantity>,
    ) -> Result<Rule> {
        Ok(self.require_default()?.range_rule(start, end))
    }

    pub fn format_list<S: AsRef<str>>(&self, items: &[S], style: ListStyle) -> Result<String> {
        Ok(self.require_default()?.format_list(items, style))
    }

    fn target_locale(&self, locale: Option<&str>) -> Result<&Locale> {
        match locale {
            Some(code) => self
                .locale(code)
                .ok_or_else(|| I18nError::LocaleNotFound(code.to_string())),
            None => self.require_default(),
        }
    }

    // -- formatting with the default locale ----------------------------------

    pub fn format_integer(&self, value: i64) -> Result<String> {
        let locale = self.require_default()?;
        Ok(self.formatter.format_integer(locale.code(), value))
    }

    pub fn format_decimal(&self, value: f64, decimals: Option<u8>) -> Result<String> {
        let locale = self.require_default()?;
        Ok(self.formatter.format_decimal(locale.code(), value, decimals))
    }

    pub fn format_percent(&self, value: f64, decimals: Option<u8>) -> Result<String> {
        let locale = self.require_default()?;
        Ok(self.formatter.format_percent(locale.code(), value, decimals))
    }

    pub fn format_ordinal(&self, value: i64) -> Result<String> {
        let locale = self.require_default()?;
        Ok(self.formatter.format_ordinal(locale.code(), value))
    }

    pub fn format_spellout(&self, value: f64) -> Result<String> {
        let locale = self.require_default()?;
        Ok(self.formatter.format_spellout(locale.code(), value))
    }

    pub fn format_duration(&self, seconds: i64) -> Result<String> {
        let locale = self.require_default()?;
        Ok(self.formatter.format_duration(locale.code(), seconds))
    }

    /// `currency` is an ISO 4217 code; `None` uses the default locale's own.
    pub fn format_currency(&self, amount: f64, currency: Option<&str>) -> Result<String> {
        let locale = self.require_default()?;
        Ok(self.formatter.format_currency(locale.code(), amount, currency))
    }

    pub fn format_date(&self, date: NaiveDate, style: DateStyle) -> Result<String> {
        let locale = self.require_default()?;
        Ok(self.formatter.format_date(locale.code(), date, style))
    }

    pub fn format_time(&self, time: NaiveTime, style: TimeStyle) -> Result<String> {
        let locale = self.require_default()?;
        Ok(self.formatter.format_time(locale.code(), time, style))
    }

    pub fn format_datetime(
        &self,
        datetime: NaiveDateTime,
        date_style: DateStyle,
        time_style: TimeStyle,
    ) -> Result<String> {
        let locale = self.require_default()?;
        Ok(self
            .formatter
            .format_datetime(locale.code(), datetime, date_style, time_style))
    }

    // -- measured quantities -------------------------------------------------

    /// Render a data size such as `3 megabytes` in `locale` (or the default
    /// locale).
    ///
    /// A `unit.size.<name>` message (`.short` suffix for the abbreviated form)
    /// in that locale wins over the built-in names; it receives the formatted
    /// number as `{value}`.
    pub fn format_size(
        &self,
        value: i64,
        unit: SizeUnit,
        short: bool,
        locale: Option<&str>,
    ) -> Result<String> {
        let locale = self.target_locale(locale)?;
        let formatted = self.formatter.format_integer(locale.code(), value);
        self.format_measure(
            locale,
            Quantity::Int(value),
            &unit.message_key(short),
            formatted,
            |language, rule, value| unit.render(language, short, rule, value),
        )
    }

    /// Render a length such as `2.50 kilometers`, with `decimals` fraction
    /// digits. Overridden by `unit.length.<name>[.short]` messages.
    pub fn format_length(
        &self,
        value: impl Into<Quantity>,
        decimals: Option<u8>,
        unit: LengthUnit,
        short: bool,
        locale: Option<&str>,
    ) -> Result<String> {
        let value = value.into();
        let locale = self.target_locale(locale)?;
        let formatted = self
            .formatter
            .format_decimal(locale.code(), value.as_f64(), decimals);
        self.format_measure(
            locale,
            value,
            &unit.message_key(short),
            formatted,
            |language, rule, value| unit.render(language, short, rule, value),
        )
    }

    /// Render a mass such as `3 kilograms`. Overridden by
    /// `unit.mass.<name>[.short]` messages.
    pub fn format_mass(
        &self,
        value: impl Into<Quantity>,
        decimals: Option<u8>,
        unit: MassUnit,
        short: bool,
        locale: Option<&str>,
    ) -> Result<String> {
        let value = value.into();
        let locale = self.target_locale(locale)?;
        let formatted = self
            .formatter
            .format_decimal(locale.code(), value.as_f64(), decimals);
        self.format_measure(
            locale,
            value,
            &unit.message_key(short),
            formatted,
            |language, rule, value| unit.render(language, short, rule, value),
        )
    }

    /// Catalog message for `key` in `locale` or its base locale, else the
    /// built-in unit name. The fallback chain does not apply.
    fn format_measure<B>(
        &self,
        locale: &Locale,
        quantity: Quantity,
        key: &str,
        formatted: String,
        builtin: B,
    ) -> Result<String>
    where
        B: FnOnce(Language, Rule, &str) -> String,
    {
        let rule = locale.cardinal_rule(quantity, false);
        let ranked: Vec<String> = locale.codes().into_iter().map(str::to_string).collect();
        let args = Args::new().arg("value", formatted.clone());
        if let Some(text) = self.render(key, &args, |_| rule, &ranked, None)? {
            return Ok(text);
        }
        Ok(builtin(locale.language(), rule, &formatted))
    }
}
