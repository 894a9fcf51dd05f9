//! Number, currency and date formatting used by `{name:method}` transforms
//! and the registry's `format_*` helpers.
//!
//! The [`Formatter`] trait is the seam to the platform formatting library.
//! [`IcuFormatter`] is the default and renders through ICU4X compiled data.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use fixed_decimal::{Decimal, FloatPrecision};
use icu::calendar::Date;
use icu::datetime::{fieldsets, DateTimeFormatter, NoCalendarFormatter};
use icu::decimal::options::DecimalFormatterOptions;
use icu::decimal::DecimalFormatter;
use icu::locale::{locale, Locale as IcuLocale};
use icu::plurals::{PluralCategory, PluralRules};
use icu::time::Time;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::I18nError;

/// Length of a formatted date.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateStyle {
    /// Weekday included: `Friday, January 5, 2024`.
    Full,
    Long,
    Medium,
    #[default]
    Short,
}

/// Length of a formatted time of day.
///
/// `Full` renders like `Long`; no time zone is attached to the input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeStyle {
    Full,
    Long,
    Medium,
    #[default]
    Short,
}

macro_rules! style_names {
    ($ty:ident) => {
        impl $ty {
            pub fn name(self) -> &'static str {
                match self {
                    $ty::Full => "full",
                    $ty::Long => "long",
                    $ty::Medium => "medium",
                    $ty::Short => "short",
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }

        impl FromStr for $ty {
            type Err = I18nError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                [$ty::Full, $ty::Long, $ty::Medium, $ty::Short]
                    .into_iter()
                    .find(|style| style.name().eq_ignore_ascii_case(s))
                    .ok_or_else(|| {
                        I18nError::UnexpectedValue(format!(
                            concat!("unknown ", stringify!($ty), " `{}`"),
                            s
                        ))
                    })
            }
        }
    };
}

style_names!(DateStyle);
style_names!(TimeStyle);

/// Locale-aware number and date formatting.
///
/// `locale` is a display-form locale code such as `en-CA`.
pub trait Formatter: Send + Sync {
    fn format_integer(&self, locale: &str, value: i64) -> String;
    fn format_decimal(&self, locale: &str, value: f64, decimals: Option<u8>) -> String;
    fn format_percent(&self, locale: &str, value: f64, decimals: Option<u8>) -> String;
    fn format_ordinal(&self, locale: &str, value: i64) -> String;
    fn format_spellout(&self, locale: &str, value: f64) -> String;
    /// `seconds` rendered as `h:mm:ss`, or `m:ss` under an hour.
    fn format_duration(&self, locale: &str, seconds: i64) -> String;
    /// `currency` is an ISO 4217 code; `None` uses the locale's own currency.
    fn format_currency(&self, locale: &str, amount: f64, currency: Option<&str>) -> String;
    fn format_date(&self, locale: &str, date: NaiveDate, style: DateStyle) -> String;
    fn format_time(&self, locale: &str, time: NaiveTime, style: TimeStyle) -> String;

    fn format_datetime(
        &self,
        locale: &str,
        datetime: NaiveDateTime,
        date_style: DateStyle,
        time_style: TimeStyle,
    ) -> String {
        format!(
            "{} {}",
            self.format_date(locale, datetime.date(), date_style),
            self.format_time(locale, datetime.time(), time_style)
        )
    }
}

/// Apply one of the shared transform methods (`integer`, `decimal[:N]`,
/// `percent[:N]`, `ordinal`, `spellout`, `duration`, `currency[:CODE]`,
/// `date[:STYLE]`, `time[:STYLE]`).
///
/// Returns `None` for unknown methods or values that do not parse as numbers.
pub fn apply_transform(
    formatter: &dyn Formatter,
    locale: &str,
    value: &str,
    method: &str,
) -> Option<String> {
    let (name, arg) = match method.split_once(':') {
        Some((name, arg)) => (name, Some(arg)),
        None => (method, None),
    };

    match name {
        "integer" => parse_int(value).map(|v| formatter.format_integer(locale, v)),
        "decimal" => parse_float(value)
            .map(|v| formatter.format_decimal(locale, v, Some(decimals(arg, 2)))),
        "percent" => parse_float(value)
            .map(|v| formatter.format_percent(locale, v, Some(decimals(arg, 0)))),
        "ordinal" => parse_int(value).map(|v| formatter.format_ordinal(locale, v)),
        "spellout" => parse_float(value).map(|v| formatter.format_spellout(locale, v)),
        "duration" => parse_int(value).map(|v| formatter.format_duration(locale, v)),
        "currency" => parse_float(value).map(|v| formatter.format_currency(locale, v, arg)),
        "date" => {
            let style = style_arg(arg)?;
            parse_datetime(value)
                .map(|dt| dt.date())
                .or_else(|| value.trim().parse::<NaiveDate>().ok())
                .map(|date| formatter.format_date(locale, date, style))
        }
        "time" => {
            let style = style_arg(arg)?;
            parse_datetime(value)
                .map(|dt| dt.time())
                .or_else(|| value.trim().parse::<NaiveTime>().ok())
                .map(|time| formatter.format_time(locale, time, style))
        }
        _ => None,
    }
}

fn style_arg<S: FromStr + Default>(arg: Option<&str>) -> Option<S> {
    match arg {
        Some(arg) => arg.trim().parse().ok(),
        None => Some(S::default()),
    }
}

/// `2024-01-05T15:45:00` or `2024-01-05 15:45:00`.
pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    value
        .parse::<NaiveDateTime>()
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S"))
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M"))
        .ok()
}

fn decimals(arg: Option<&str>, default: u8) -> u8 {
    arg.and_then(|a| a.trim().parse().ok()).unwrap_or(default)
}

fn parse_float(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_int(value: &str) -> Option<i64> {
    let value = value.trim();
    value
        .parse::<i64>()
        .ok()
        .or_else(|| parse_float(value).map(|v| v.trunc() as i64))
}

fn language_of(locale: &str) -> &str {
    locale
        .split(|c: char| c == '-' || c == '_')
        .next()
        .unwrap_or(locale)
}

fn region_of(locale: &str) -> Option<&str> {
    locale.split(|c: char| c == '-' || c == '_').nth(1)
}

struct Currency {
    code: &'static str,
    symbol: &'static str,
    digits: u8,
}

const CURRENCIES: &[Currency] = &[
    Currency { code: "USD", symbol: "$", digits: 2 },
    Currency { code: "CAD", symbol: "$", digits: 2 },
    Currency { code: "AUD", symbol: "$", digits: 2 },
    Currency { code: "GBP", symbol: "£", digits: 2 },
    Currency { code: "EUR", symbol: "€", digits: 2 },
    Currency { code: "RUB", symbol: "₽", digits: 2 },
    Currency { code: "JPY", symbol: "¥", digits: 0 },
];

/// Currency used when a locale is asked for money without a code.
fn local_currency(locale: &str) -> &'static str {
    let region = region_of(locale).map(str::to_ascii_uppercase);
    match (language_of(locale), region.as_deref()) {
        (_, Some("CA")) => "CAD",
        (_, Some("AU")) => "AUD",
        (_, Some("UK" | "GB")) => "GBP",
        ("fr", _) => "EUR",
        ("ru", _) => "RUB",
        ("ja", _) => "JPY",
        _ => "USD",
    }
}

/// Formatter backed by ICU4X.
///
/// Spellout is only available for English; other languages fall back to
/// plain decimal formatting.
#[derive(Clone, Copy, Debug, Default)]
pub struct IcuFormatter;

impl IcuFormatter {
    pub fn new() -> Self {
        Self
    }

    fn icu_locale(code: &str) -> IcuLocale {
        code.parse().unwrap_or(locale!("und"))
    }

    fn render(code: &str, decimal: &Decimal) -> String {
        match DecimalFormatter::try_new(
            Self::icu_locale(code).into(),
            DecimalFormatterOptions::default(),
        ) {
            Ok(fmt) => fmt.format(decimal).to_string(),
            Err(err) => {
                warn!(locale = %code, error = ?err, "no decimal formatter data");
                decimal.to_string()
            }
        }
    }

    fn fixed(value: f64, decimals: Option<u8>) -> Option<Decimal> {
        let mut decimal = Decimal::try_from_f64(value, FloatPrecision::RoundTrip).ok()?;
        if let Some(decimals) = decimals {
            let position = -(decimals as i16);
            decimal.round(position);
            decimal.pad_end(position);
        }
        Some(decimal)
    }

    fn iso_date(date: NaiveDate) -> Option<Date<icu::calendar::Iso>> {
        let month = u8::try_from(date.month()).ok()?;
        let day = u8::try_from(date.day()).ok()?;
        Date::try_new_iso(date.year(), month, day).ok()
    }

    fn ordinal_category(code: &str, value: i64) -> PluralCategory {
        match PluralRules::try_new_ordinal(Self::icu_locale(code).into()) {
            Ok(rules) => rules.category_for(value),
            Err(_) => PluralCategory::Other,
        }
    }
}

impl Formatter for IcuFormatter {
    fn format_integer(&self, locale: &str, value: i64) -> String {
        Self::render(locale, &Decimal::from(value))
    }

    fn format_decimal(&self, locale: &str, value: f64, decimals: Option<u8>) -> String {
        match Self::fixed(value, decimals) {
            Some(decimal) => Self::render(locale, &decimal),
            None => value.to_string(),
        }
    }

    fn format_percent(&self, locale: &str, value: f64, decimals: Option<u8>) -> String {
        let Some(decimal) = Self::fixed(value * 100.0, Some(decimals.unwrap_or(0))) else {
            return value.to_string();
        };

        let number = Self::render(locale, &decimal);
        match language_of(locale) {
            "fr" => format!("{number}\u{202f}%"),
            "ru" => format!("{number}\u{a0}%"),
            _ => format!("{number}%"),
        }
    }

    fn format_ordinal(&self, locale: &str, value: i64) -> String {
        let number = self.format_integer(locale, value);
        match language_of(locale) {
            "en" => {
                let suffix = match Self::ordinal_category(locale, value) {
                    PluralCategory::One => "st",
                    PluralCategory::Two => "nd",
                    PluralCategory::Few => "rd",
                    _ => "th",
                };
                format!("{number}{suffix}")
            }
            "fr" => match Self::ordinal_category(locale, value) {
                PluralCategory::One => format!("{number}er"),
                _ => format!("{number}e"),
            },
            "ru" => format!("{number}-й"),
            "ja" => format!("第{number}"),
            _ => number,
        }
    }

    fn format_spellout(&self, locale: &str, value: f64) -> String {
        if language_of(locale) == "en" && value.fract() == 0.0 && value.abs() < 1e18 {
            return spell_english(value as i64);
        }
        self.format_decimal(locale, value, None)
    }

    fn format_duration(&self, _locale: &str, seconds: i64) -> String {
        let sign = if seconds < 0 { "-" } else { "" };
        let total = seconds.unsigned_abs();
        let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);
        if h > 0 {
            format!("{sign}{h}:{m:02}:{s:02}")
        } else {
            format!("{sign}{m}:{s:02}")
        }
    }

    fn format_currency(&self, locale: &str, amount: f64, currency: Option<&str>) -> String {
        let code = currency
            .map(|c| c.trim().to_ascii_uppercase())
            .unwrap_or_else(|| local_currency(locale).to_string());
        let (symbol, digits) = match CURRENCIES.iter().find(|c| c.code == code) {
            Some(c) => (c.symbol.to_string(), c.digits),
            None => (code.clone(), 2),
        };

        let number = self.format_decimal(locale, amount.abs(), Some(digits));
        let sign = if amount < 0.0 { "-" } else { "" };
        match language_of(locale) {
            "fr" | "ru" => format!("{sign}{number}\u{a0}{symbol}"),
            _ if symbol.chars().all(|c| c.is_ascii_alphabetic()) => {
                format!("{sign}{symbol}\u{a0}{number}")
            }
            _ => format!("{sign}{symbol}{number}"),
        }
    }

    fn format_date(&self, locale: &str, date: NaiveDate, style: DateStyle) -> String {
        let Some(iso) = Self::iso_date(date) else {
            return date.format("%Y-%m-%d").to_string();
        };
        let prefs = Self::icu_locale(locale).into();

        let formatted = match style {
            DateStyle::Short => DateTimeFormatter::try_new(prefs, fieldsets::YMD::short())
                .map(|f| f.format(&iso).to_string()),
            DateStyle::Medium => DateTimeFormatter::try_new(prefs, fieldsets::YMD::medium())
                .map(|f| f.format(&iso).to_string()),
            DateStyle::Long => DateTimeFormatter::try_new(prefs, fieldsets::YMD::long())
                .map(|f| f.format(&iso).to_string()),
            DateStyle::Full => DateTimeFormatter::try_new(prefs, fieldsets::YMDE::long())
                .map(|f| f.format(&iso).to_string()),
        };

        formatted.unwrap_or_else(|err| {
            warn!(locale = %locale, error = ?err, "no date formatter data");
            date.format("%Y-%m-%d").to_string()
        })
    }

    fn format_time(&self, locale: &str, time: NaiveTime, style: TimeStyle) -> String {
        let hms = (
            u8::try_from(time.hour()),
            u8::try_from(time.minute()),
            u8::try_from(time.second()),
        );
        let (Ok(hour), Ok(minute), Ok(second)) = hms else {
            return time.format("%H:%M:%S").to_string();
        };
        let Ok(icu_time) = Time::try_new(hour, minute, second, 0) else {
            return time.format("%H:%M:%S").to_string();
        };
        let prefs = Self::icu_locale(locale).into();

        let formatted = match style {
            TimeStyle::Short => NoCalendarFormatter::try_new(prefs, fieldsets::T::short())
                .map(|f| f.format(&icu_time).to_string()),
            TimeStyle::Medium => NoCalendarFormatter::try_new(prefs, fieldsets::T::medium())
                .map(|f| f.format(&icu_time).to_string()),
            TimeStyle::Long | TimeStyle::Full => {
                NoCalendarFormatter::try_new(prefs, fieldsets::T::long())
                    .map(|f| f.format(&icu_time).to_string())
            }
        };

        formatted.unwrap_or_else(|err| {
            warn!(locale = %locale, error = ?err, "no time formatter data");
            time.format("%H:%M:%S").to_string()
        })
    }
}

const ONES: [&str; 20] = [
    "zero",
    "one",
    "two",
    "three",
    "four",
    "five",
    "six",
    "seven",
    "eight",
    "nine",
    "ten",
    "eleven",
    "twelve",
    "thirteen",
    "fourteen",
    "fifteen",
    "sixteen",
    "seventeen",
    "eighteen",
    "nineteen",
];

const TENS: [&str; 10] = [
    "", "", "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety",
];

const SCALES: [(u64, &str); 5] = [
    (1_000_000_000_000_000, "quadrillion"),
    (1_000_000_000_000, "trillion"),
    (1_000_000_000, "billion"),
    (1_000_000, "million"),
    (1_000, "thousand"),
];

fn spell_english(value: i64) -> String {
    if value < 0 {
        return format!("minus {}", spell_english_unsigned(value.unsigned_abs()));
    }
    spell_english_unsigned(value as u64)
}

fn spell_english_unsigned(value: u64) -> String {
    if value == 0 {
        return ONES[0].to_string();
    }

    let mut parts = Vec::new();
    let mut rest = value;
    for (scale, name) in SCALES {
        if rest >= scale {
            parts.push(format!("{} {name}", spell_below_thousand(rest / scale)));
            rest %= scale;
        }
    }
    if rest > 0 {
        parts.push(spell_below_thousand(rest));
    }
    parts.join(" ")
}

fn spell_below_thousand(value: u64) -> String {
    let hundreds = value / 100;
    let rest = value % 100;

    let tail = match rest {
        0 => None,
        1..=19 => Some(ONES[rest as usize].to_string()),
        _ if rest % 10 == 0 => Some(TENS[(rest / 10) as usize].to_string()),
        _ => Some(format!(
            "{}-{}",
            TENS[(rest / 10) as usize],
            ONES[(rest % 10) as usize]
        )),
    };

    match (hundreds, tail) {
        (0, Some(tail)) => tail,
        (0, None) => String::new(),
        (h, None) => format!("{} hundred", ONES[h as usize]),
        (h, Some(tail)) => format!("{} hundred {tail}", ONES[h as usize]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn english_numbers() {
        let f = IcuFormatter::new();
        assert_eq!(f.format_integer("en", 1_234_567), "1,234,567");
        assert_eq!(f.format_integer("en-CA", -42), "-42");
        assert_eq!(f.format_decimal("en", 3.14159, Some(2)), "3.14");
        assert_eq!(f.format_decimal("en", 2.0, Some(2)), "2.00");
        assert_eq!(f.format_decimal("en", 1234.5, None), "1,234.5");
        assert_eq!(f.format_percent("en", 0.25, None), "25%");
        assert_eq!(f.format_percent("en", 0.1234, Some(1)), "12.3%");
    }

    #[test]
    fn english_ordinals() {
        let f = IcuFormatter::new();
        let got: Vec<String> = [1, 2, 3, 4, 11, 12, 13, 21, 22, 23, 101]
            .into_iter()
            .map(|n| f.format_ordinal("en", n))
            .collect();
        assert_eq!(
            got,
            vec!["1st", "2nd", "3rd", "4th", "11th", "12th", "13th", "21st", "22nd", "23rd", "101st"]
        );
    }

    #[test]
    fn other_ordinals() {
        let f = IcuFormatter::new();
        assert_eq!(f.format_ordinal("fr", 1), "1er");
        assert_eq!(f.format_ordinal("fr", 2), "2e");
        assert_eq!(f.format_ordinal("ru", 5), "5-й");
        assert_eq!(f.format_ordinal("ja", 3), "第3");
    }

    #[test]
    fn english_spellout() {
        let f = IcuFormatter::new();
        assert_eq!(f.format_spellout("en", 0.0), "zero");
        assert_eq!(f.format_spellout("en", 13.0), "thirteen");
        assert_eq!(f.format_spellout("en", 40.0), "forty");
        assert_eq!(f.format_spellout("en", 123.0), "one hundred twenty-three");
        assert_eq!(
            f.format_spellout("en", 2_000_015.0),
            "two million fifteen"
        );
        assert_eq!(f.format_spellout("en", -7.0), "minus seven");
        assert_eq!(f.format_spellout("en", 1.5), "1.5");
    }

    #[test]
    fn durations() {
        let f = IcuFormatter::new();
        assert_eq!(f.format_duration("en", 5), "0:05");
        assert_eq!(f.format_duration("en", 61), "1:01");
        assert_eq!(f.format_duration("en", 3661), "1:01:01");
        assert_eq!(f.format_duration("en", -90), "-1:30");
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()
    }

    #[test]
    fn currencies() {
        let f = IcuFormatter::new();
        assert_eq!(f.format_currency("en", 1234.5, None), "$1,234.50");
        assert_eq!(f.format_currency("en-US", -5.0, Some("usd")), "-$5.00");
        assert_eq!(f.format_currency("en-UK", 3.0, None), "£3.00");
        assert_eq!(f.format_currency("en", 5.0, Some("CHF")), "CHF\u{a0}5.00");
        assert_eq!(f.format_currency("fr", 12.5, None), "12,50\u{a0}€");
        assert_eq!(f.format_currency("ja", 1234.4, None), "¥1,234");
        assert_eq!(local_currency("fr-CA"), "CAD");
    }

    #[test]
    fn dates_by_style() {
        let f = IcuFormatter::new();
        assert_eq!(f.format_date("en", date(), DateStyle::Short), "1/5/24");
        assert_eq!(f.format_date("en", date(), DateStyle::Medium), "Jan 5, 2024");
        assert_eq!(f.format_date("en", date(), DateStyle::Long), "January 5, 2024");
        assert_eq!(
            f.format_date("en", date(), DateStyle::Full),
            "Friday, January 5, 2024"
        );
        assert_eq!(f.format_date("fr", date(), DateStyle::Long), "5 janvier 2024");
    }

    #[test]
    fn times_and_datetimes() {
        let f = IcuFormatter::new();
        let time = NaiveTime::from_hms_opt(15, 45, 30).unwrap();

        let en = f.format_time("en", time, TimeStyle::Short);
        assert!(en.starts_with("3:45") && en.ends_with("PM"), "{en}");
        assert_eq!(f.format_time("fr", time, TimeStyle::Short), "15:45");
        assert!(f.format_time("fr", time, TimeStyle::Medium).starts_with("15:45:30"));

        let dt = date().and_time(time);
        let both = f.format_datetime("fr", dt, DateStyle::Long, TimeStyle::Short);
        assert_eq!(both, "5 janvier 2024 15:45");
    }

    #[test]
    fn styles_parse_by_name() {
        assert_eq!("LONG".parse::<DateStyle>().unwrap(), DateStyle::Long);
        assert_eq!("short".parse::<TimeStyle>().unwrap(), TimeStyle::Short);
        assert!("tiny".parse::<DateStyle>().is_err());
        assert_eq!(DateStyle::default(), DateStyle::Short);
    }

    #[test]
    fn datetimes_parse_with_or_without_t() {
        let expected = date().and_hms_opt(15, 45, 0);
        assert_eq!(parse_datetime("2024-01-05T15:45:00"), expected);
        assert_eq!(parse_datetime("2024-01-05 15:45:00"), expected);
        assert_eq!(parse_datetime("2024-01-05 15:45"), expected);
        assert_eq!(parse_datetime("2024-01-05"), None);
    }

    #[test]
    fn transform_table() {
        let f = IcuFormatter::new();
        assert_eq!(
            apply_transform(&f, "en", "1234", "integer").as_deref(),
            Some("1,234")
        );
        assert_eq!(
            apply_transform(&f, "en", "3.7", "integer").as_deref(),
            Some("3")
        );
        assert_eq!(
            apply_transform(&f, "en", "2.5", "decimal").as_deref(),
            Some("2.50")
        );
        assert_eq!(
            apply_transform(&f, "en", "2.5", "decimal:1").as_deref(),
            Some("2.5")
        );
        assert_eq!(
            apply_transform(&f, "en", "0.5", "percent").as_deref(),
            Some("50%")
        );
        assert_eq!(
            apply_transform(&f, "en", "2", "ordinal").as_deref(),
            Some("2nd")
        );
        assert_eq!(
            apply_transform(&f, "en", "90", "duration").as_deref(),
            Some("1:30")
        );
        assert_eq!(
            apply_transform(&f, "en", "12.5", "currency:EUR").as_deref(),
            Some("€12.50")
        );
        assert_eq!(
            apply_transform(&f, "en", "2024-01-05", "date:long").as_deref(),
            Some("January 5, 2024")
        );
        assert_eq!(
            apply_transform(&f, "en", "2024-01-05T15:45:00", "date:medium").as_deref(),
            Some("Jan 5, 2024")
        );
        assert_eq!(apply_transform(&f, "en", "2024-01-05", "date:huge"), None);
        assert_eq!(apply_transform(&f, "en", "yesterday", "date"), None);
        assert_eq!(apply_transform(&f, "en", "abc", "integer"), None);
        assert_eq!(apply_transform(&f, "en", "1", "shout"), None);
    }
}
