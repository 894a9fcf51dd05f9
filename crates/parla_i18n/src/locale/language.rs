use serde::{Deserialize, Serialize};

use crate::rule::{Quantity, Rule};

/// How list items are joined by [`Language::format_list`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListStyle {
    #[default]
    And,
    Or,
}

/// Grammar family of a locale.
///
/// Regional locales share the family of their base language, so `en-CA`
/// pluralizes and joins lists exactly like `en`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    English,
    French,
    Russian,
    Japanese,
}

impl Language {
    /// CLDR-style cardinal category for `value`.
    ///
    /// With `zero_as_none`, a zero quantity selects [`Rule::None`] in every
    /// language. Russian selects `other` for every float, `1.0` included.
    pub fn cardinal_rule(self, value: impl Into<Quantity>, zero_as_none: bool) -> Rule {
        let quantity = value.into();
        if zero_as_none && quantity.is_zero() {
            return Rule::None;
        }
        let value = quantity.as_f64();

        match self {
            Language::English => {
                if value.abs() == 1.0 {
                    Rule::One
                } else {
                    Rule::Other
                }
            }
            Language::French => {
                let whole = value.trunc().abs();
                if whole == 0.0 || whole == 1.0 {
                    Rule::One
                } else {
                    Rule::Other
                }
            }
            Language::Russian => {
                let Quantity::Int(n) = quantity else {
                    return Rule::Other;
                };
                let n = n.unsigned_abs();
                // Teens must be checked before the last digit.
                if (11..=19).contains(&(n % 100)) {
                    return Rule::Many;
                }
                match n % 10 {
                    1 => Rule::One,
                    2..=4 => Rule::Few,
                    _ => Rule::Other,
                }
            }
            Language::Japanese => Rule::Other,
        }
    }

    /// Category for a range such as "1–3 items".
    pub fn range_rule(self, _start: impl Into<Quantity>, end: impl Into<Quantity>) -> Rule {
        match self {
            Language::English | Language::Japanese => Rule::Other,
            Language::French | Language::Russian => self.cardinal_rule(end, false),
        }
    }

    fn conjunction(self, style: ListStyle) -> &'static str {
        match (self, style) {
            (Language::English, ListStyle::And) => "and",
            (Language::English, ListStyle::Or) => "or",
            (Language::French, ListStyle::And) => "et",
            (Language::French, ListStyle::Or) => "ou",
            (Language::Russian, ListStyle::And) => "и",
            (Language::Russian, ListStyle::Or) => "или",
            (Language::Japanese, ListStyle::And) => "と",
            (Language::Japanese, ListStyle::Or) => "または",
        }
    }

    /// Join `items` with this language's separators and conjunction.
    ///
    /// An empty slice yields an empty string.
    pub fn format_list<S: AsRef<str>>(self, items: &[S], style: ListStyle) -> String {
        let conj = self.conjunction(style);
        let (pair, separator, last) = match self {
            Language::Japanese => (
                conj.to_string(),
                "、",
                match style {
                    ListStyle::And => "、".to_string(),
                    ListStyle::Or => format!("、{conj}"),
                },
            ),
            _ => (format!(" {conj} "), ", ", format!(" {conj} ")),
        };

        match items {
            [] => String::new(),
            [only] => only.as_ref().to_string(),
            [first, second] => format!("{}{pair}{}", first.as_ref(), second.as_ref()),
            _ => {
                let end = items.len() - 1;
                let mut out = String::new();
                for (i, item) in items.iter().enumerate() {
                    if i == end {
                        out.push_str(&last);
                    } else if i > 0 {
                        out.push_str(separator);
                    }
                    out.push_str(item.as_ref());
                }
                out
            }
        }
    }

    /// Language-specific text transforms. `None` defers to the shared table.
    pub fn transform(self, value: &str, method: &str) -> Option<String> {
        match (self, method) {
            // `possesive` is accepted for catalogs written against the old spelling.
            (Language::English, "possessive" | "possesive") => {
                if reads_as_plural(value) {
                    Some(format!("{value}'"))
                } else {
                    Some(format!("{value}'s"))
                }
            }
            _ => None,
        }
    }
}

/// A trailing `s` after a consonant other than `s` marks a plural ("Dogs");
/// names like "James" or words like "boss" take a full `'s`.
///
/// This is a spelling heuristic, not a dictionary: plurals whose `s`
/// follows a vowel or `y` ("Trees", "Boys") read as names and get `'s`.
fn reads_as_plural(value: &str) -> bool {
    let mut tail = value.chars().rev();
    match (tail.next(), tail.next()) {
        (Some('s' | 'S'), Some(prev)) => {
            prev.is_alphabetic()
                && !matches!(
                    prev.to_ascii_lowercase(),
                    'a' | 'e' | 'i' | 'o' | 'u' | 'y' | 's'
                )
        }
        _ => false,
    }
}
