use std::borrow::Cow;
use std::fmt;

use crate::rule::{Quantity, Rule};

/// A template argument value.
#[derive(Clone, Debug, PartialEq)]
pub enum ArgValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgValue::Str(s) => f.write_str(s),
            ArgValue::Int(i) => write!(f, "{i}"),
            ArgValue::Float(v) => {
                let mut s = v.to_string();
                if s.contains('.') {
                    while s.ends_with('0') {
                        s.pop();
                    }
                    if s.ends_with('.') {
                        s.pop();
                    }
                }
                f.write_str(&s)
            }
            ArgValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<String> for ArgValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<&str> for ArgValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<&String> for ArgValue {
    fn from(v: &String) -> Self {
        Self::Str(v.clone())
    }
}

impl From<i64> for ArgValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for ArgValue {
    fn from(v: i32) -> Self {
        Self::Int(v as i64)
    }
}

impl From<u32> for ArgValue {
    fn from(v: u32) -> Self {
        Self::Int(v as i64)
    }
}

impl From<usize> for ArgValue {
    fn from(v: usize) -> Self {
        Self::Int(v as i64)
    }
}

impl From<f64> for ArgValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<f32> for ArgValue {
    fn from(v: f32) -> Self {
        Self::Float(v as f64)
    }
}

impl From<Quantity> for ArgValue {
    fn from(v: Quantity) -> Self {
        match v {
            Quantity::Int(n) => Self::Int(n),
            Quantity::Float(f) => Self::Float(f),
        }
    }
}

impl From<bool> for ArgValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

/// Named template arguments, in insertion order.
///
/// Setting a name twice replaces the earlier value in place.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Args {
    entries: Vec<(Cow<'static, str>, ArgValue)>,
}

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arg(mut self, name: impl Into<Cow<'static, str>>, value: impl Into<ArgValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<Cow<'static, str>>, value: impl Into<ArgValue>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.entries
            .iter()
            .find(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArgValue)> {
        self.entries.iter().map(|(k, v)| (k.as_ref(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Args
where
    K: Into<Cow<'static, str>>,
    V: Into<ArgValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut args = Args::new();
        for (k, v) in iter {
            args.insert(k, v);
        }
        args
    }
}

/// A message key plus everything needed to render it.
///
/// When `count` is set the plural rule is derived from it using the grammar
/// of the locale that supplies the message, and `{count}` becomes available
/// to the template. Otherwise `rule` is used as given.
#[derive(Clone, Debug, PartialEq)]
pub struct Message {
    pub id: Cow<'static, str>,
    pub args: Args,
    pub rule: Rule,
    pub count: Option<Quantity>,
    pub zero_as_none: bool,
}

impl Message {
    pub fn new(id: impl Into<Cow<'static, str>>) -> Self {
        Self {
            id: id.into(),
            args: Args::new(),
            rule: Rule::Other,
            count: None,
            zero_as_none: false,
        }
    }

    pub fn arg(mut self, name: impl Into<Cow<'static, str>>, value: impl Into<ArgValue>) -> Self {
        self.args.insert(name, value);
        self
    }

    pub fn rule(mut self, rule: Rule) -> Self {
        self.rule = rule;
        self
    }

    pub fn count(mut self, count: impl Into<Quantity>) -> Self {
        let count = count.into();
        self.count = Some(count);
        self.args.insert("count", count);
        self
    }

    /// Select the `none` variant for a zero count.
    pub fn zero_as_none(mut self, yes: bool) -> Self {
        self.zero_as_none = yes;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn floats_drop_trailing_zeros() {
        assert_eq!(ArgValue::from(2.50).to_string(), "2.5");
        assert_eq!(ArgValue::from(3.0).to_string(), "3");
        assert_eq!(ArgValue::from(-0.125).to_string(), "-0.125");
    }

    #[test]
    fn insert_replaces_in_place() {
        let args = Args::new().arg("a", 1).arg("b", "x").arg("a", 2);
        let pairs: Vec<(String, String)> = args
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("a".to_string(), "2".to_string()),
                ("b".to_string(), "x".to_string())
            ]
        );
    }

    #[test]
    fn count_sets_argument() {
        let msg = Message::new("files").count(3);
        assert_eq!(msg.count, Some(Quantity::Int(3)));
        assert_eq!(msg.args.get("count"), Some(&ArgValue::Int(3)));
        assert_eq!(msg.args.get("count").unwrap().to_string(), "3");

        let msg = Message::new("files").count(2.5);
        assert_eq!(msg.count, Some(Quantity::Float(2.5)));
        assert_eq!(msg.args.get("count"), Some(&ArgValue::Float(2.5)));
    }
}
