use super::{Language, Locale};

struct Definition {
    code: &'static str,
    name: &'static str,
    short: Option<(&'static str, &'static str)>,
    language: Language,
}

const ENGLISH: Option<(&str, &str)> = Some(("en", "English"));
const FRENCH: Option<(&str, &str)> = Some(("fr", "Français"));

const DEFINITIONS: &[Definition] = &[
    Definition {
        code: "en",
        name: "English",
        short: None,
        language: Language::English,
    },
    Definition {
        code: "en-US",
        name: "English United States",
        short: ENGLISH,
        language: Language::English,
    },
    Definition {
        code: "en-CA",
        name: "English Canada",
        short: ENGLISH,
        language: Language::English,
    },
    Definition {
        code: "en-AU",
        name: "English Australia",
        short: ENGLISH,
        language: Language::English,
    },
    Definition {
        code: "en-UK",
        name: "English United Kingdom",
        short: ENGLISH,
        language: Language::English,
    },
    Definition {
        code: "fr",
        name: "Français",
        short: None,
        language: Language::French,
    },
    Definition {
        code: "fr-CA",
        name: "Français Canada",
        short: FRENCH,
        language: Language::French,
    },
    Definition {
        code: "ru",
        name: "русский",
        short: None,
        language: Language::Russian,
    },
    Definition {
        code: "ja",
        name: "日本語",
        short: None,
        language: Language::Japanese,
    },
];

/// Look up a built-in locale by its display-form code (`en-CA`).
pub(crate) fn lookup(code: &str) -> Option<Locale> {
    let def = DEFINITIONS.iter().find(|d| d.code == code)?;
    let locale = Locale::new(def.code, def.name, def.language);
    Some(match def.short {
        Some((short_code, short_name)) => locale.with_short(short_code, short_name),
        None => locale,
    })
}

/// Codes of every built-in locale, in definition order.
pub fn available_locales() -> impl Iterator<Item = &'static str> {
    DEFINITIONS.iter().map(|d| d.code)
}
