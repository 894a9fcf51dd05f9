//! Plural-variant selection and placeholder substitution.
//!
//! Placeholders come in two shapes:
//!
//! - `{name}` is replaced with the stringified argument.
//! - `{name:method}` runs the argument through a locale transform first,
//!   e.g. `{item:possessive}` or `{price:decimal:2}`. Everything between the
//!   first colon and the next `}` is the method.
//!
//! A run of `n` backslashes right before a token renders as `n / 2`
//! backslashes; an odd run leaves the token itself unexpanded, so `\{name}`
//! renders `{name}` and `\\{name}` renders a backslash followed by the value.
//!
//! Arguments are applied longest name first. Each pass is a forward-only
//! scan over the text, so substitution is linear in the template size.
//! Tokens naming unknown arguments are left verbatim.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::args::Args;
use crate::error::{I18nError, Result};
use crate::rule::Rule;

const MAX_EXPANDED_BYTES: usize = 64 * 1024;

/// A raw message: either plain text or text per plural rule.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Template {
    Plain(String),
    Plural(BTreeMap<Rule, String>),
}

impl Template {
    pub fn plural<I, S>(forms: I) -> Self
    where
        I: IntoIterator<Item = (Rule, S)>,
        S: Into<String>,
    {
        Self::Plural(forms.into_iter().map(|(r, s)| (r, s.into())).collect())
    }
}

impl From<&str> for Template {
    fn from(s: &str) -> Self {
        Self::Plain(s.to_string())
    }
}

impl From<String> for Template {
    fn from(s: String) -> Self {
        Self::Plain(s)
    }
}

/// Pick the variant for `rule`, falling back to `other`.
///
/// Plain templates have no variants and are returned as-is.
pub fn select_variant(template: &Template, rule: Rule) -> Result<&str> {
    match template {
        Template::Plain(s) => Ok(s),
        Template::Plural(forms) => forms
            .get(&rule)
            .or_else(|| forms.get(&Rule::Other))
            .map(String::as_str)
            .ok_or_else(|| {
                I18nError::UnexpectedValue(format!(
                    "plural message has no `{}` or `other` variant",
                    rule
                ))
            }),
    }
}

/// Substitute `args` into `text`, applying `transform(value, method)` for
/// `{name:method}` directives.
///
/// Output past 64 KiB is logged once but never cut short.
pub fn substitute<F>(text: &str, args: &Args, transform: F) -> String
where
    F: Fn(&str, &str) -> String,
{
    if args.is_empty() || !text.contains('{') {
        return text.to_string();
    }

    let mut keys: Vec<(&str, String)> = args.iter().map(|(k, v)| (k, v.to_string())).collect();
    // Stable: equal lengths keep the caller's order.
    keys.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

    let mut out = text.to_string();
    let mut warned = false;
    for (key, value) in &keys {
        out = expand_key(&out, key, value, &transform);
        if !warned && out.len() > MAX_EXPANDED_BYTES {
            warn!(key, len = out.len(), "expanded message exceeds 64 KiB");
            warned = true;
        }
    }
    out
}

/// One forward scan handling both `{key}` and `{key:method}`, so inserted
/// values are never read back as escapes or tokens of the same key.
fn expand_key<F>(text: &str, key: &str, value: &str, transform: &F) -> String
where
    F: Fn(&str, &str) -> String,
{
    let open = format!("{{{key}");
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;

    while let Some(found) = text[cursor..].find(&open) {
        let pos = cursor + found;
        let after = pos + open.len();
        let delim = text.as_bytes().get(after).copied();

        // `{keyword}` is not a token for `key`.
        if !matches!(delim, Some(b'}' | b':')) {
            out.push_str(&text[cursor..after]);
            cursor = after;
            continue;
        }

        let run = trailing_backslashes(&text[cursor..pos]);
        out.push_str(&text[cursor..pos - run]);
        push_backslashes(&mut out, run / 2);

        if run % 2 == 1 {
            out.push_str(&text[pos..=after]);
            cursor = after + 1;
            continue;
        }

        if delim == Some(b'}') {
            out.push_str(value);
            cursor = after + 1;
            continue;
        }

        let method_start = after + 1;
        // No closing brace: leave the rest of the text alone for this key.
        let Some(close) = text[method_start..].find('}') else {
            out.push_str(&text[pos..]);
            return out;
        };

        let method = &text[method_start..method_start + close];
        out.push_str(&transform(value, method));
        cursor = method_start + close + 1;
    }

    out.push_str(&text[cursor..]);
    out
}

fn trailing_backslashes(s: &str) -> usize {
    s.bytes().rev().take_while(|&b| b == b'\\').count()
}

fn push_backslashes(out: &mut String, n: usize) {
    out.extend(std::iter::repeat('\\').take(n));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::Language;
    use pretty_assertions::assert_eq;

    fn english(value: &str, method: &str) -> String {
        if let Some(out) = Language::English.transform(value, method) {
            return out;
        }
        match method {
            "upper" => value.to_uppercase(),
            other => format!("<{other}:{value}>"),
        }
    }

    fn render(text: &str, args: &Args) -> String {
        substitute(text, args, english)
    }

    #[test]
    fn plain_placeholder() {
        let args = Args::new().arg("name", "World");
        assert_eq!(render("Hello {name}", &args), "Hello World");
        assert_eq!(render("{name}, {name}!", &args), "World, World!");
    }

    #[test]
    fn text_without_placeholders_is_unchanged() {
        let args = Args::new().arg("name", "World");
        for text in ["", "Hello", "braces } only", "{ unclosed", "a \\ b"] {
            assert_eq!(render(text, &args), text);
            assert_eq!(render(&render(text, &args), &args), text);
        }
    }

    #[test]
    fn possessive_directive() {
        assert_eq!(
            render("{item:possessive}", &Args::new().arg("item", "James")),
            "James's"
        );
        assert_eq!(
            render("{item:possessive}", &Args::new().arg("item", "Dogs")),
            "Dogs'"
        );
        assert_eq!(
            render("{item:possessive} and {item}", &Args::new().arg("item", "Ann")),
            "Ann's and Ann"
        );
    }

    #[test]
    fn method_keeps_its_own_arguments() {
        let args = Args::new().arg("price", 3.5);
        assert_eq!(render("{price:decimal:2}", &args), "<decimal:2:3.5>");
    }

    #[test]
    fn longest_key_wins() {
        let args = Args::new().arg("id", "1").arg("id_long", "99");
        assert_eq!(render("{id_long}-{id}", &args), "99-1");

        let args = Args::new().arg("item", "a").arg("item_count", "3");
        assert_eq!(render("{item_count} x {item:upper}", &args), "3 x A");
    }

    #[test]
    fn escaped_tokens_stay_literal() {
        let args = Args::new().arg("key", "v");
        assert_eq!(render("\\{key}", &args), "{key}");
        assert_eq!(render("\\\\{key}", &args), "\\v");
        assert_eq!(render("\\\\\\{key}", &args), "\\{key}");
        assert_eq!(render("\\{key:upper}", &args), "{key:upper}");
        assert_eq!(render("\\\\{key:upper}", &args), "\\V");
        assert_eq!(render("{key}\\{key}{key}", &args), "v{key}v");
    }

    #[test]
    fn unknown_tokens_are_left_verbatim() {
        let args = Args::new().arg("name", "World");
        assert_eq!(
            render("{greeting} {name} {other:upper}", &args),
            "{greeting} World {other:upper}"
        );
    }

    #[test]
    fn unclosed_directive_stops_expansion_for_that_key() {
        let args = Args::new().arg("a", "x").arg("bb", "y");
        assert_eq!(render("{a:upper {a:upper}", &args), "<upper {a:upper:x>");
        assert_eq!(render("{bb} {bb:upper", &args), "y {bb:upper");
        assert_eq!(render("{a:upper} {bb:upper", &args), "X {bb:upper");
    }

    #[test]
    fn large_output_keeps_every_substitution() {
        let args = Args::new().arg("a", "x".repeat(40 * 1024)).arg("b", "END");
        let s = render("{a}{a}{b}", &args);
        assert_eq!(s.len(), 80 * 1024 + 3);
        assert!(s.ends_with("END"));
        assert!(s.len() > MAX_EXPANDED_BYTES);
    }

    #[test]
    fn inserted_backslash_does_not_escape_the_next_token() {
        let args = Args::new().arg("p", "C:\\");
        assert_eq!(render("{p} then {p}{p:upper}", &args), "C:\\ then C:\\C:\\");
        assert_eq!(render("{p}{p}", &args), "C:\\C:\\");
    }

    #[test]
    fn key_prefix_is_not_a_token() {
        let args = Args::new().arg("id", "1");
        assert_eq!(render("{identity} {id}", &args), "{identity} 1");
        assert_eq!(render("\\{idx}{id}", &args), "\\{idx}1");
    }

    #[test]
    fn plural_selection_falls_back_to_other() {
        let t = Template::plural([(Rule::One, "one file"), (Rule::Other, "{count} files")]);
        assert_eq!(select_variant(&t, Rule::One).unwrap(), "one file");
        assert_eq!(select_variant(&t, Rule::Few).unwrap(), "{count} files");
        assert_eq!(
            select_variant(&Template::from("fixed"), Rule::One).unwrap(),
            "fixed"
        );
    }

    #[test]
    fn plural_without_other_is_an_error() {
        let t = Template::plural([(Rule::One, "one file")]);
        let err = select_variant(&t, Rule::Many).unwrap_err();
        assert!(matches!(err, I18nError::UnexpectedValue(_)));
    }
}
