//! Parla CLI
//!
//! Resolves messages from the catalogs configured in parla.toml:
//! - `parla get greeting -a name=Ada`
//! - `parla get files --count 3 -l fr`
//! - `parla rank -l en-CA`
//! - `parla length 2.5 km --decimals 1 -l fr`
//! - `parla date 2024-01-05T15:45 --style long`

mod config;
mod init;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use chrono::NaiveDate;
use parla_i18n::{
    parse_datetime, ArgValue, Args, DateStyle, DirectorySource, LengthUnit, ListStyle,
    LocaleRegistry, MassUnit, Quantity, Rule, SizeUnit, TimeStyle,
};
use tracing_subscriber::EnvFilter;

use crate::config::ParlaConfig;

/// Resolve localized messages from the command line
#[derive(Parser, Debug)]
#[command(name = "parla")]
#[command(about = "Resolve localized messages from parla catalogs")]
#[command(version)]
struct Cli {
    /// Config file, or a directory containing parla.toml
    #[arg(short, long, default_value = ".")]
    config: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve a message key
    Get {
        key: String,

        /// Locale to try, in order (repeatable)
        #[arg(short, long = "locale")]
        locales: Vec<String>,

        /// Namespace to search, in order (repeatable)
        #[arg(short, long = "namespace")]
        namespaces: Vec<String>,

        /// Template argument as name=value (repeatable)
        #[arg(short, long = "arg", value_parser = parse_arg)]
        args: Vec<(String, ArgValue)>,

        /// Pick the plural variant for this quantity and pass it as {count}
        #[arg(long)]
        count: Option<Quantity>,

        /// With --count, use the `none` variant for zero
        #[arg(long, requires = "count")]
        none: bool,

        /// Plural rule to use (none, zero, one, two, few, many, other)
        #[arg(long)]
        rule: Option<Rule>,
    },

    /// Check whether a message key exists
    Has {
        key: String,

        #[arg(short, long = "locale")]
        locales: Vec<String>,

        #[arg(short, long = "namespace")]
        namespaces: Vec<String>,
    },

    /// Print the ranked locale codes a lookup would try
    Rank {
        #[arg(short, long = "locale")]
        locales: Vec<String>,
    },

    /// Join items into a localized list
    List {
        items: Vec<String>,

        /// Join with "or" instead of "and"
        #[arg(long)]
        or: bool,

        /// Locale whose grammar to use (defaults to the default locale)
        #[arg(short, long)]
        locale: Option<String>,
    },

    /// Format a data size, e.g. `parla size 3 megabyte`
    Size {
        value: i64,

        /// Unit name or symbol (byte, kilobyte, KiB, ...)
        unit: SizeUnit,

        /// Use the abbreviated unit
        #[arg(long)]
        short: bool,

        #[arg(short, long)]
        locale: Option<String>,
    },

    /// Format a length, e.g. `parla length 3 km`
    Length {
        value: Quantity,

        /// Unit name or symbol (meter, km, foot, ...)
        unit: LengthUnit,

        /// Fraction digits to show
        #[arg(long)]
        decimals: Option<u8>,

        /// Use the abbreviated unit
        #[arg(long)]
        short: bool,

        #[arg(short, long)]
        locale: Option<String>,
    },

    /// Format a mass, e.g. `parla mass 2 kg`
    Mass {
        value: Quantity,

        /// Unit name or symbol (kilogram, lb, ounce, ...)
        unit: MassUnit,

        /// Fraction digits to show
        #[arg(long)]
        decimals: Option<u8>,

        /// Use the abbreviated unit
        #[arg(long)]
        short: bool,

        #[arg(short, long)]
        locale: Option<String>,
    },

    /// Format an amount of money
    Currency {
        amount: f64,

        /// ISO 4217 code (defaults to the locale's currency)
        #[arg(short, long)]
        currency: Option<String>,

        #[arg(short, long)]
        locale: Option<String>,
    },

    /// Format a date (`2024-01-05`) or a date and time (`2024-01-05T15:45`)
    Date {
        value: String,

        /// full, long, medium or short
        #[arg(long, default_value = "short")]
        style: DateStyle,

        /// Time style when the value has a time part
        #[arg(long, default_value = "short")]
        time_style: TimeStyle,

        #[arg(short, long)]
        locale: Option<String>,
    },

    /// Create parla.toml and a starter catalog
    Init {
        /// Target directory
        #[arg(default_value = ".")]
        path: PathBuf,
    },
}

fn parse_arg(s: &str) -> Result<(String, ArgValue), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got `{s}`"))?;
    if name.is_empty() {
        return Err(format!("argument name is empty in `{s}`"));
    }
    let value = if let Ok(i) = value.parse::<i64>() {
        ArgValue::Int(i)
    } else if let Ok(f) = value.parse::<f64>() {
        ArgValue::Float(f)
    } else {
        ArgValue::Str(value.to_string())
    };
    Ok((name.to_string(), value))
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn load_registry(config_path: &std::path::Path) -> Result<LocaleRegistry> {
    let config = ParlaConfig::load_from_dir(config_path)?;
    let source = DirectorySource::new(config.i18n.dirs.iter().cloned());
    LocaleRegistry::from_config(&config.i18n, Arc::new(source))
        .with_context(|| format!("Invalid locale setup in {}", config_path.display()))
}

/// Display code of `locale`, or of the default locale.
fn locale_code(registry: &LocaleRegistry, locale: Option<&str>) -> Result<String> {
    let found = match locale {
        Some(code) => registry
            .locale(code)
            .with_context(|| format!("Locale `{code}` is not registered"))?,
        None => registry
            .default_locale()
            .context("No default locale is configured")?,
    };
    Ok(found.code().to_string())
}

fn as_strs(v: &[String]) -> Option<Vec<&str>> {
    if v.is_empty() {
        None
    } else {
        Some(v.iter().map(String::as_str).collect())
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Init { path } => {
            init::init_project(&path)?;
            println!("Created {}", path.join(config::CONFIG_FILE).display());
        }
        Command::Get {
            key,
            locales,
            namespaces,
            args,
            count,
            none,
            rule,
        } => {
            let registry = load_registry(&cli.config)?;
            let locales = as_strs(&locales);
            let namespaces = as_strs(&namespaces);

            let mut args: Args = args.into_iter().collect();
            if let Some(count) = count {
                args.insert("count", count);
            }
            let rule = match (rule, count) {
                (Some(rule), _) => rule,
                (None, Some(count)) => registry
                    .rank(locales.as_deref())
                    .iter()
                    .find_map(|code| registry.locale(code))
                    .map(|locale| locale.cardinal_rule(count, none))
                    .unwrap_or_default(),
                (None, None) => Rule::Other,
            };

            println!(
                "{}",
                registry.get(&key, &args, rule, locales.as_deref(), namespaces.as_deref())
            );
        }
        Command::Has {
            key,
            locales,
            namespaces,
        } => {
            let registry = load_registry(&cli.config)?;
            let found = registry.has(
                &key,
                as_strs(&locales).as_deref(),
                as_strs(&namespaces).as_deref(),
            );
            println!("{found}");
        }
        Command::Rank { locales } => {
            let registry = load_registry(&cli.config)?;
            for code in registry.rank(as_strs(&locales).as_deref()) {
                println!("{code}");
            }
        }
        Command::List { items, or, locale } => {
            let registry = load_registry(&cli.config)?;
            let style = if or { ListStyle::Or } else { ListStyle::And };
            let text = match locale {
                Some(code) => registry
                    .locale(&code)
                    .with_context(|| format!("Locale `{code}` is not registered"))?
                    .format_list(&items, style),
                None => registry.format_list(&items, style)?,
            };
            println!("{text}");
        }
        Command::Size {
            value,
            unit,
            short,
            locale,
        } => {
            let registry = load_registry(&cli.config)?;
            println!(
                "{}",
                registry.format_size(value, unit, short, locale.as_deref())?
            );
        }
        Command::Length {
            value,
            unit,
            decimals,
            short,
            locale,
        } => {
            let registry = load_registry(&cli.config)?;
            println!(
                "{}",
                registry.format_length(value, decimals, unit, short, locale.as_deref())?
            );
        }
        Command::Mass {
            value,
            unit,
            decimals,
            short,
            locale,
        } => {
            let registry = load_registry(&cli.config)?;
            println!(
                "{}",
                registry.format_mass(value, decimals, unit, short, locale.as_deref())?
            );
        }
        Command::Currency {
            amount,
            currency,
            locale,
        } => {
            let registry = load_registry(&cli.config)?;
            let code = locale_code(&registry, locale.as_deref())?;
            println!(
                "{}",
                registry
                    .formatter()
                    .format_currency(&code, amount, currency.as_deref())
            );
        }
        Command::Date {
            value,
            style,
            time_style,
            locale,
        } => {
            let registry = load_registry(&cli.config)?;
            let code = locale_code(&registry, locale.as_deref())?;
            let formatter = registry.formatter();
            let text = match parse_datetime(&value) {
                Some(datetime) => formatter.format_datetime(&code, datetime, style, time_style),
                None => {
                    let date: NaiveDate = value
                        .trim()
                        .parse()
                        .with_context(|| format!("`{value}` is not a date"))?;
                    formatter.format_date(&code, date, style)
                }
            };
            println!("{text}");
        }
    }

    Ok(())
}
