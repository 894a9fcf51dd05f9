use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::I18nError;

/// Plural category used to pick a message variant.
///
/// `None` is not a CLDR category; it is selected for a zero quantity when the
/// caller asks for it, so catalogs can say "No files" instead of "0 files".
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Rule {
    None,
    Zero,
    One,
    Two,
    Few,
    Many,
    #[default]
    Other,
}

impl Rule {
    pub const ALL: [Rule; 7] = [
        Rule::None,
        Rule::Zero,
        Rule::One,
        Rule::Two,
        Rule::Few,
        Rule::Many,
        Rule::Other,
    ];

    /// The key used for this rule in plural message maps.
    pub fn name(self) -> &'static str {
        match self {
            Rule::None => "none",
            Rule::Zero => "zero",
            Rule::One => "one",
            Rule::Two => "two",
            Rule::Few => "few",
            Rule::Many => "many",
            Rule::Other => "other",
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Rule {
    type Err = I18nError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rule::ALL
            .into_iter()
            .find(|rule| rule.name() == s)
            .ok_or_else(|| I18nError::UnexpectedValue(format!("unknown plural rule `{s}`")))
    }
}

/// A quantity for plural selection.
///
/// Integer-ness is kept because some grammars treat `2` and `2.0`
/// differently: Russian selects `other` for every float.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Quantity {
    Int(i64),
    Float(f64),
}

impl Quantity {
    pub fn is_zero(self) -> bool {
        match self {
            Quantity::Int(n) => n == 0,
            Quantity::Float(v) => v == 0.0,
        }
    }

    pub fn as_f64(self) -> f64 {
        match self {
            Quantity::Int(n) => n as f64,
            Quantity::Float(v) => v,
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantity::Int(n) => write!(f, "{n}"),
            Quantity::Float(v) => write!(f, "{v}"),
        }
    }
}

impl FromStr for Quantity {
    type Err = I18nError;

    /// Integers parse as [`Quantity::Int`]; anything with a fraction,
    /// exponent or decimal point as [`Quantity::Float`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(n) = s.parse::<i64>() {
            return Ok(Quantity::Int(n));
        }
        s.parse::<f64>()
            .map(Quantity::Float)
            .map_err(|_| I18nError::UnexpectedValue(format!("`{s}` is not a number")))
    }
}

macro_rules! quantity_from {
    ($variant:ident: $($ty:ty),+) => {
        $(
            impl From<$ty> for Quantity {
                fn from(v: $ty) -> Self {
                    Quantity::$variant(v.into())
                }
            }
        )+
    };
}

quantity_from!(Int: i64, i32, i16, i8, u32, u16, u8);
quantity_from!(Float: f64, f32);

impl From<usize> for Quantity {
    fn from(v: usize) -> Self {
        Quantity::Int(i64::try_from(v).unwrap_or(i64::MAX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn names_round_trip_through_from_str() {
        for rule in Rule::ALL {
            assert_eq!(rule.name().parse::<Rule>().unwrap(), rule);
        }
    }

    #[test]
    fn unknown_name_is_rejected() {
        let err = "several".parse::<Rule>().unwrap_err();
        assert!(matches!(err, I18nError::UnexpectedValue(_)));
    }

    #[test]
    fn quantities_keep_integer_ness() {
        assert_eq!(Quantity::from(2), Quantity::Int(2));
        assert_eq!(Quantity::from(2.0), Quantity::Float(2.0));
        assert_eq!(Quantity::from(7usize), Quantity::Int(7));
        assert_eq!("3".parse::<Quantity>().unwrap(), Quantity::Int(3));
        assert_eq!("-3".parse::<Quantity>().unwrap(), Quantity::Int(-3));
        assert_eq!("3.0".parse::<Quantity>().unwrap(), Quantity::Float(3.0));
        assert!("three".parse::<Quantity>().is_err());
        assert!(Quantity::Float(0.0).is_zero());
        assert_eq!(Quantity::Float(2.5).to_string(), "2.5");
    }

    #[test]
    fn other_is_default() {
        assert_eq!(Rule::default(), Rule::Other);
    }
}
