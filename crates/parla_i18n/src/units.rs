//! Built-in names for data-size, length and mass units.
//!
//! Catalogs can override any of these with a `unit.<kind>.<name>` (or
//! `unit.<kind>.<name>.short`) message, where `<kind>` is `size`, `length`
//! or `mass`; see
//! [`LocaleRegistry::format_size`](crate::LocaleRegistry::format_size).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::I18nError;
use crate::locale::Language;
use crate::rule::Rule;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeUnit {
    Byte,
    Kilobyte,
    Megabyte,
    Gigabyte,
    Terabyte,
    Petabyte,
    Exabyte,
    Zettabyte,
    Yottabyte,
    Kibibyte,
    Mebibyte,
    Gibibyte,
    Tebibyte,
    Pebibyte,
    Exbibyte,
    Zebibyte,
    Yobibyte,
}

struct UnitNames {
    unit: SizeUnit,
    name: &'static str,
    symbol: &'static str,
    fr: &'static str,
    fr_symbol: &'static str,
    ru: &'static str,
    ru_symbol: &'static str,
    ja: &'static str,
}

macro_rules! units {
    ($($unit:ident $name:literal $symbol:literal $fr:literal $fr_symbol:literal $ru:literal $ru_symbol:literal $ja:literal;)*) => {
        const UNITS: &[UnitNames] = &[
            $(UnitNames {
                unit: SizeUnit::$unit,
                name: $name,
                symbol: $symbol,
                fr: $fr,
                fr_symbol: $fr_symbol,
                ru: $ru,
                ru_symbol: $ru_symbol,
                ja: $ja,
            },)*
        ];
    };
}

units! {
    Byte      "byte"      "B"   "octet"      "o"   "байт"      "Б"   "バイト";
    Kilobyte  "kilobyte"  "kB"  "kilooctet"  "ko"  "килобайт"  "КБ"  "キロバイト";
    Megabyte  "megabyte"  "MB"  "mégaoctet"  "Mo"  "мегабайт"  "МБ"  "メガバイト";
    Gigabyte  "gigabyte"  "GB"  "gigaoctet"  "Go"  "гигабайт"  "ГБ"  "ギガバイト";
    Terabyte  "terabyte"  "TB"  "téraoctet"  "To"  "терабайт"  "ТБ"  "テラバイト";
    Petabyte  "petabyte"  "PB"  "pétaoctet"  "Po"  "петабайт"  "ПБ"  "ペタバイト";
    Exabyte   "exabyte"   "EB"  "exaoctet"   "Eo"  "эксабайт"  "ЭБ"  "エクサバイト";
    Zettabyte "zettabyte" "ZB"  "zettaoctet" "Zo"  "зеттабайт" "ЗБ"  "ゼタバイト";
    Yottabyte "yottabyte" "YB"  "yottaoctet" "Yo"  "йоттабайт" "ЙБ"  "ヨタバイト";
    Kibibyte  "kibibyte"  "KiB" "kibioctet"  "Kio" "кибибайт"  "КиБ" "キビバイト";
    Mebibyte  "mebibyte"  "MiB" "mébioctet"  "Mio" "мебибайт"  "МиБ" "メビバイト";
    Gibibyte  "gibibyte"  "GiB" "gibioctet"  "Gio" "гибибайт"  "ГиБ" "ギビバイト";
    Tebibyte  "tebibyte"  "TiB" "tébioctet"  "Tio" "тебибайт"  "ТиБ" "テビバイト";
    Pebibyte  "pebibyte"  "PiB" "pébioctet"  "Pio" "пебибайт"  "ПиБ" "ペビバイト";
    Exbibyte  "exbibyte"  "EiB" "exbioctet"  "Eio" "эксбибайт" "ЭиБ" "エクスビバイト";
    Zebibyte  "zebibyte"  "ZiB" "zébioctet"  "Zio" "зебибайт"  "ЗиБ" "ゼビバイト";
    Yobibyte  "yobibyte"  "YiB" "yobioctet"  "Yio" "йобибайт"  "ЙиБ" "ヨビバイト";
}

impl SizeUnit {
    fn names(self) -> &'static UnitNames {
        UNITS
            .iter()
            .find(|u| u.unit == self)
            .unwrap_or(&UNITS[0])
    }

    pub fn all() -> impl Iterator<Item = SizeUnit> {
        UNITS.iter().map(|u| u.unit)
    }

    /// Lower-case English name, as used in message keys.
    pub fn name(self) -> &'static str {
        self.names().name
    }

    /// `unit.size.<name>`, with a `.short` suffix for the abbreviated form.
    pub fn message_key(self, short: bool) -> String {
        message_key("size", self.name(), short)
    }

    /// Render `value` (already formatted) with the built-in name of this unit.
    pub fn render(self, language: Language, short: bool, rule: Rule, value: &str) -> String {
        let n = self.names();
        match (language, short) {
            (Language::English, false) => match rule {
                Rule::One => format!("{value} {}", n.name),
                _ => format!("{value} {}s", n.name),
            },
            (Language::French, false) => match rule {
                Rule::One => format!("{value} {}", n.fr),
                _ => format!("{value} {}s", n.fr),
            },
            (Language::French, true) => format!("{value} {}", n.fr_symbol),
            (Language::Russian, false) => match rule {
                Rule::Few => format!("{value} {}а", n.ru),
                _ => format!("{value} {}", n.ru),
            },
            (Language::Russian, true) => format!("{value} {}", n.ru_symbol),
            (Language::Japanese, false) => format!("{value} {}", n.ja),
            (Language::English | Language::Japanese, true) => format!("{value} {}", n.symbol),
        }
    }
}

impl fmt::Display for SizeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SizeUnit {
    type Err = I18nError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UNITS
            .iter()
            .find(|u| u.name.eq_ignore_ascii_case(s) || u.symbol == s)
            .map(|u| u.unit)
            .ok_or_else(|| I18nError::UnexpectedValue(format!("unknown size unit `{s}`")))
    }
}

fn message_key(kind: &str, name: &str, short: bool) -> String {
    if short {
        format!("unit.{kind}.{name}.short")
    } else {
        format!("unit.{kind}.{name}")
    }
}

/// Built-in names of a length or mass unit.
///
/// English and French carry `[one, other]`; Russian carries
/// `[one, few, other]`, where `other` is the genitive plural also used for
/// the `many` band.
struct MeasureNames<U: 'static> {
    unit: U,
    name: &'static str,
    symbol: &'static str,
    en: [&'static str; 2],
    fr: [&'static str; 2],
    fr_symbol: &'static str,
    ru: [&'static str; 3],
    ru_symbol: &'static str,
    ja: &'static str,
}

impl<U> MeasureNames<U> {
    fn render(&self, language: Language, short: bool, rule: Rule, value: &str) -> String {
        let name = match (language, short) {
            (Language::English, false) => match rule {
                Rule::One => self.en[0],
                _ => self.en[1],
            },
            (Language::French, false) => match rule {
                Rule::One => self.fr[0],
                _ => self.fr[1],
            },
            (Language::French, true) => self.fr_symbol,
            (Language::Russian, false) => match rule {
                Rule::One => self.ru[0],
                Rule::Few => self.ru[1],
                _ => self.ru[2],
            },
            (Language::Russian, true) => self.ru_symbol,
            (Language::Japanese, false) => self.ja,
            (Language::English | Language::Japanese, true) => self.symbol,
        };
        format!("{value} {name}")
    }
}

macro_rules! measures {
    (
        $(#[$meta:meta])*
        $ty:ident in $table:ident, kind $kind:literal {
            $($unit:ident $name:literal $symbol:literal
                [$en_one:literal $en_other:literal]
                [$fr_one:literal $fr_other:literal] $fr_symbol:literal
                [$ru_one:literal $ru_few:literal $ru_other:literal] $ru_symbol:literal
                $ja:literal;)*
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "kebab-case")]
        pub enum $ty {
            $($unit,)*
        }

        // Same order as the enum, so a variant indexes its own row.
        const $table: &[MeasureNames<$ty>] = &[
            $(MeasureNames {
                unit: $ty::$unit,
                name: $name,
                symbol: $symbol,
                en: [$en_one, $en_other],
                fr: [$fr_one, $fr_other],
                fr_symbol: $fr_symbol,
                ru: [$ru_one, $ru_few, $ru_other],
                ru_symbol: $ru_symbol,
                ja: $ja,
            },)*
        ];

        impl $ty {
            fn names(self) -> &'static MeasureNames<$ty> {
                &$table[self as usize]
            }

            pub fn all() -> impl Iterator<Item = $ty> {
                $table.iter().map(|u| u.unit)
            }

            /// Kebab-case English name, as used in message keys.
            pub fn name(self) -> &'static str {
                self.names().name
            }

            #[doc = concat!("`unit.", $kind, ".<name>`, with a `.short` suffix for the abbreviated form.")]
            pub fn message_key(self, short: bool) -> String {
                message_key($kind, self.name(), short)
            }

            /// Render `value` (already formatted) with the built-in name of this unit.
            pub fn render(self, language: Language, short: bool, rule: Rule, value: &str) -> String {
                self.names().render(language, short, rule, value)
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
                $table
                    .iter()
                    .find(|u| u.name.eq_ignore_ascii_case(s) || u.symbol == s)
                    .map(|u| u.unit)
                    .ok_or_else(|| {
                        I18nError::UnexpectedValue(format!(concat!("unknown ", $kind, " unit `{}`"), s))
                    })
            }
        }
    };
}

measures! {
    /// Units accepted by [`LocaleRegistry::format_length`](crate::LocaleRegistry::format_length).
    LengthUnit in LENGTH_UNITS, kind "length" {
        Kilometer "kilometer" "km" ["kilometer" "kilometers"] ["kilomètre" "kilomètres"] "km" ["километр" "километра" "километров"] "км" "キロメートル";
        Meter "meter" "m" ["meter" "meters"] ["mètre" "mètres"] "m" ["метр" "метра" "метров"] "м" "メートル";
        Decimeter "decimeter" "dm" ["decimeter" "decimeters"] ["décimètre" "décimètres"] "dm" ["дециметр" "дециметра" "дециметров"] "дм" "デシメートル";
        Centimeter "centimeter" "cm" ["centimeter" "centimeters"] ["centimètre" "centimètres"] "cm" ["сантиметр" "сантиметра" "сантиметров"] "см" "センチメートル";
        Millimeter "millimeter" "mm" ["millimeter" "millimeters"] ["millimètre" "millimètres"] "mm" ["миллиметр" "миллиметра" "миллиметров"] "мм" "ミリメートル";
        Micrometer "micrometer" "μm" ["micrometer" "micrometers"] ["micromètre" "micromètres"] "μm" ["микрометр" "микрометра" "микрометров"] "мкм" "マイクロメートル";
        Nanometer "nanometer" "nm" ["nanometer" "nanometers"] ["nanomètre" "nanomètres"] "nm" ["нанометр" "нанометра" "нанометров"] "нм" "ナノメートル";
        Mile "mile" "mi" ["mile" "miles"] ["mille" "milles"] "mi" ["миля" "мили" "миль"] "ми" "マイル";
        Yard "yard" "yd" ["yard" "yards"] ["yard" "yards"] "yd" ["ярд" "ярда" "ярдов"] "ярд." "ヤード";
        Foot "foot" "ft" ["foot" "feet"] ["pied" "pieds"] "pi" ["фут" "фута" "футов"] "фт" "フィート";
        Inch "inch" "in" ["inch" "inches"] ["pouce" "pouces"] "po" ["дюйм" "дюйма" "дюймов"] "дюйм." "インチ";
        NauticalMile "nautical-mile" "nmi" ["nautical mile" "nautical miles"] ["mille marin" "milles marins"] "M" ["морская миля" "морские мили" "морских миль"] "мор. миль" "海里";
    }
}

measures! {
    /// Units accepted by [`LocaleRegistry::format_mass`](crate::LocaleRegistry::format_mass).
    MassUnit in MASS_UNITS, kind "mass" {
        Tonne "tonne" "t" ["metric ton" "metric tons"] ["tonne" "tonnes"] "t" ["тонна" "тонны" "тонн"] "т" "トン";
        Kilogram "kilogram" "kg" ["kilogram" "kilograms"] ["kilogramme" "kilogrammes"] "kg" ["килограмм" "килограмма" "килограммов"] "кг" "キログラム";
        Gram "gram" "g" ["gram" "grams"] ["gramme" "grammes"] "g" ["грамм" "грамма" "граммов"] "г" "グラム";
        Milligram "milligram" "mg" ["milligram" "milligrams"] ["milligramme" "milligrammes"] "mg" ["миллиграмм" "миллиграмма" "миллиграммов"] "мг" "ミリグラム";
        Microgram "microgram" "μg" ["microgram" "micrograms"] ["microgramme" "microgrammes"] "μg" ["микрограмм" "микрограмма" "микрограммов"] "мкг" "マイクログラム";
        Ton "ton" "tn" ["ton" "tons"] ["tonne courte" "tonnes courtes"] "tc" ["короткая тонна" "короткие тонны" "коротких тонн"] "кор. т" "米トン";
        LongTon "long-ton" "lt" ["long ton" "long tons"] ["tonne longue" "tonnes longues"] "tl" ["длинная тонна" "длинные тонны" "длинных тонн"] "дл. т" "英トン";
        Stone "stone" "st" ["stone" "stones"] ["stone" "stones"] "st" ["стоун" "стоуна" "стоунов"] "стоун" "ストーン";
        Pound "pound" "lb" ["pound" "pounds"] ["livre" "livres"] "lb" ["фунт" "фунта" "фунтов"] "фнт" "ポンド";
        Ounce "ounce" "oz" ["ounce" "ounces"] ["once" "onces"] "oz" ["унция" "унции" "унций"] "унц." "オンス";
        TroyOunce "troy-ounce" "oz t" ["troy ounce" "troy ounces"] ["once troy" "onces troy"] "oz t" ["тройская унция" "тройские унции" "тройских унций"] "тр. унц." "トロイオンス";
        Carat "carat" "ct" ["carat" "carats"] ["carat" "carats"] "ct" ["карат" "карата" "карат"] "кт" "カラット";
    }
}
