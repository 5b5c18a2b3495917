//! Compiled message templates.
//!
//! The [`Template`] struct parses a named-placeholder template once and then
//! renders it any number of times, either as display text or as ordered
//! name/value pairs for structured sinks.

use std::borrow::Cow;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use log::trace;

use crate::composite;
use crate::error::{IndexError, Result};
use crate::log_values::LogValues;
use crate::scan::{find_brace_index, find_index_of};
use crate::value::Value;

/// Key of the pair that carries the original template text.
pub const ORIGINAL_FORMAT_KEY: &str = "{OriginalFormat}";

/// A message template with named placeholders.
///
/// Placeholders use the format item grammar `{name[,alignment][:formatSpec]}`;
/// `{{` and `}}` are literal braces. Compilation rewrites every name to its
/// zero-based position, so `"{A} {B} {A}"` has three placeholders named
/// `A`, `B`, `A` and the positional format `"{0} {1} {2}"`.
///
/// Compilation never fails. Braces that do not form a placeholder are kept
/// as literal text.
///
/// # Thread Safety
///
/// `Template` is immutable after compilation and is `Send + Sync`; render it
/// from as many threads as needed.
///
/// # Example
///
/// ```
/// use logtemplate::{Template, values};
///
/// let template = Template::compile("User {UserId} logged in from {IpAddress}");
/// assert_eq!(template.placeholder_names(), ["UserId", "IpAddress"]);
/// assert_eq!(template.positional_format(), "User {0} logged in from {1}");
///
/// let text = template.render(&values![42, "10.0.0.1"]).unwrap();
/// assert_eq!(text, "User 42 logged in from 10.0.0.1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Template {
    original: String,
    positional: String,
    names: Vec<String>,
}

impl Template {
    /// Compiles a template.
    pub fn compile(template: impl Into<String>) -> Self {
        let original = template.into();
        let (positional, names) = compile_positional(&original);
        trace!(
            "compiled template {:?} with {} placeholder(s)",
            original,
            names.len()
        );
        Template {
            original,
            positional,
            names,
        }
    }

    /// The template text exactly as supplied.
    pub fn original_format(&self) -> &str {
        &self.original
    }

    /// The template with every placeholder name replaced by its position.
    pub fn positional_format(&self) -> &str {
        &self.positional
    }

    /// Placeholder names in order of appearance, repeats included.
    pub fn placeholder_names(&self) -> &[String] {
        &self.names
    }

    /// Renders the template as display text.
    ///
    /// Sequence arguments are joined into `"a, b, c"` first (nulls skipped);
    /// text is never split. Numbers and timestamps use the culture-invariant
    /// formats of their format spec. The caller's slice is left untouched.
    /// An empty slice is valid for templates without placeholders.
    ///
    /// # Errors
    ///
    /// Returns a [`FormatError`](crate::FormatError) when a placeholder has no
    /// value, when a value (or a sequence element) cannot be formatted, or
    /// when the positional format itself is malformed (e.g. a stray `}`).
    ///
    /// # Example
    ///
    /// ```
    /// use logtemplate::{Template, values};
    ///
    /// let template = Template::compile("Items: {Items}; total {Total,8:N2}");
    /// let text = template.render(&values![vec![1, 2, 3], 1234.5]).unwrap();
    /// assert_eq!(text, "Items: 1, 2, 3; total 1,234.50");
    /// ```
    pub fn render(&self, values: &[Value]) -> Result<String> {
        let prepared = values
            .iter()
            .map(join_if_sequence)
            .collect::<Result<Vec<Cow<'_, Value>>>>()?;
        composite::format(&self.positional, &prepared)
    }

    /// Pairs each placeholder name with its value, in placeholder order.
    ///
    /// Values are passed through untouched. The result always ends with
    /// `("{OriginalFormat}", original template text)`, so it has one more
    /// entry than there are placeholders. Extra values are ignored.
    ///
    /// # Errors
    ///
    /// Returns an [`IndexError`] if fewer values than placeholders are
    /// supplied.
    ///
    /// # Example
    ///
    /// ```
    /// use logtemplate::{Template, Value, ORIGINAL_FORMAT_KEY, values};
    ///
    /// let template = Template::compile("{A} then {B}");
    /// let pairs = template.structured_values(&values![1, "two"]).unwrap();
    /// assert_eq!(
    ///     pairs,
    ///     vec![
    ///         ("A", Value::from(1)),
    ///         ("B", Value::from("two")),
    ///         (ORIGINAL_FORMAT_KEY, Value::from("{A} then {B}")),
    ///     ]
    /// );
    /// ```
    pub fn structured_values(&self, values: &[Value]) -> Result<Vec<(&str, Value)>, IndexError> {
        let mut pairs = Vec::with_capacity(self.names.len() + 1);
        for (index, name) in self.names.iter().enumerate() {
            let value = values.get(index).ok_or_else(|| IndexError {
                index,
                name: name.clone(),
                supplied: values.len(),
            })?;
            pairs.push((name.as_str(), value.clone()));
        }
        pairs.push((ORIGINAL_FORMAT_KEY, Value::String(self.original.clone())));
        Ok(pairs)
    }

    /// Binds the template to one set of arguments.
    pub fn bind<'a>(&'a self, values: &'a [Value]) -> LogValues<'a> {
        LogValues::new(self, values)
    }
}

fn join_if_sequence(value: &Value) -> Result<Cow<'_, Value>> {
    match value {
        Value::Seq(items) => {
            let joined = composite::format_sequence(items)?;
            Ok(Cow::Owned(Value::String(joined)))
        }
        other => Ok(Cow::Borrowed(other)),
    }
}

/// Rewrites named placeholders to positions and collects their names.
fn compile_positional(template: &str) -> (String, Vec<String>) {
    let bytes = template.as_bytes();
    let end = bytes.len();
    let mut positional = String::with_capacity(end);
    let mut names = Vec::new();
    let mut scan = 0;

    while scan < end {
        let open = find_brace_index(bytes, b'{', scan, end);
        let close = find_brace_index(bytes, b'}', open, end);

        if close == end {
            positional.push_str(&template[scan..end]);
            break;
        }

        // Format item syntax: {name[,alignment][:formatSpec]}
        let mut delimiter = find_index_of(bytes, b',', open, close);
        if delimiter == close {
            delimiter = find_index_of(bytes, b':', open, close);
        }

        positional.push_str(&template[scan..=open]);
        positional.push_str(&names.len().to_string());
        names.push(template[open + 1..delimiter].to_string());
        positional.push_str(&template[delimiter..=close]);

        scan = close + 1;
    }

    (positional, names)
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

impl FromStr for Template {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Template::compile(s))
    }
}

impl From<&str> for Template {
    fn from(s: &str) -> Self {
        Template::compile(s)
    }
}

impl From<String> for Template {
    fn from(s: String) -> Self {
        Template::compile(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FormatError;
    use crate::values;

    fn names(template: &Template) -> Vec<&str> {
        template.placeholder_names().iter().map(String::as_str).collect()
    }

    #[test]
    fn basic_placeholder() {
        let t = Template::compile("Hello {Name}!");
        assert_eq!(names(&t), ["Name"]);
        assert_eq!(t.positional_format(), "Hello {0}!");
        assert_eq!(t.original_format(), "Hello {Name}!");
        assert_eq!(t.render(&values!["World"]).unwrap(), "Hello World!");
    }

    #[test]
    fn no_placeholders_passes_through() {
        let t = Template::compile("just text");
        assert!(t.placeholder_names().is_empty());
        assert_eq!(t.positional_format(), "just text");
        assert_eq!(t.render(&[]).unwrap(), "just text");
    }

    #[test]
    fn empty_template() {
        let t = Template::compile("");
        assert_eq!(t.positional_format(), "");
        assert!(t.placeholder_names().is_empty());
        assert_eq!(t.render(&[]).unwrap(), "");
    }

    #[test]
    fn escaped_braces_are_not_placeholders() {
        let t = Template::compile("{{literal}}");
        assert_eq!(t.positional_format(), "{{literal}}");
        assert!(t.placeholder_names().is_empty());
        assert_eq!(t.render(&[]).unwrap(), "{literal}");
    }

    #[test]
    fn triple_braces_wrap_a_placeholder() {
        let t = Template::compile("{{{Name}}}");
        assert_eq!(names(&t), ["Name"]);
        assert_eq!(t.positional_format(), "{{{0}}}");
        assert_eq!(t.render(&values!["x"]).unwrap(), "{x}");
    }

    #[test]
    fn escapes_around_placeholders() {
        let t = Template::compile("{{prefix{{{Argument}}}suffix}}");
        assert_eq!(names(&t), ["Argument"]);
        assert_eq!(t.positional_format(), "{{prefix{{{0}}}suffix}}");
        assert_eq!(t.render(&values![1]).unwrap(), "{prefix{1}suffix}");
    }

    #[test]
    fn alignment_and_format_spec_preserved() {
        let t = Template::compile("{Count,5:D2}");
        assert_eq!(names(&t), ["Count"]);
        assert_eq!(t.positional_format(), "{0,5:D2}");
        assert_eq!(t.render(&values![7]).unwrap(), "   07");

        let t = Template::compile("{Elapsed:F1}ms");
        assert_eq!(names(&t), ["Elapsed"]);
        assert_eq!(t.positional_format(), "{0:F1}ms");
    }

    #[test]
    fn comma_wins_over_colon() {
        let t = Template::compile("{When:HH:mm,-10}");
        assert_eq!(names(&t), ["When:HH:mm"]);
        assert_eq!(t.positional_format(), "{0,-10}");
    }

    #[test]
    fn duplicate_names_are_kept() {
        let t = Template::compile("{A} {B} {A}");
        assert_eq!(names(&t), ["A", "B", "A"]);
        assert_eq!(t.positional_format(), "{0} {1} {2}");
        assert_eq!(t.render(&values![1, 2, 3]).unwrap(), "1 2 3");
    }

    #[test]
    fn names_are_not_validated() {
        let t = Template::compile("{} {user id} {@obj}");
        assert_eq!(names(&t), ["", "user id", "@obj"]);
        assert_eq!(t.positional_format(), "{0} {1} {2}");
    }

    #[test]
    fn unmatched_open_brace_is_literal() {
        let t = Template::compile("{A} and {unclosed");
        assert_eq!(names(&t), ["A"]);
        assert_eq!(t.positional_format(), "{0} and {unclosed");
    }

    #[test]
    fn stray_close_brace_fails_at_render() {
        let t = Template::compile("oops } here");
        assert!(t.placeholder_names().is_empty());
        assert_eq!(t.positional_format(), "oops } here");
        assert!(matches!(
            t.render(&[]),
            Err(FormatError::Malformed { .. })
        ));
    }

    #[test]
    fn close_brace_run_at_end_settles() {
        let t = Template::compile("{a}}");
        assert_eq!(names(&t), ["a"]);
        assert_eq!(t.positional_format(), "{0}}");
    }

    #[test]
    fn multibyte_text_is_preserved() {
        let t = Template::compile("héllo {Nämé} ✓");
        assert_eq!(names(&t), ["Nämé"]);
        assert_eq!(t.positional_format(), "héllo {0} ✓");
        assert_eq!(t.render(&values!["wörld"]).unwrap(), "héllo wörld ✓");
    }

    #[test]
    fn sequences_are_joined_but_strings_are_not() {
        let t = Template::compile("{Items} / {Name}");
        let values = values![vec![Value::from(1), Value::Null, Value::from(3)], "abc"];
        assert_eq!(t.render(&values).unwrap(), "1, 3 / abc");
        assert!(values[0].is_sequence());
    }

    #[test]
    fn render_under_supply_is_format_error() {
        let t = Template::compile("{A} {B}");
        assert_eq!(
            t.render(&values![1]).unwrap_err(),
            FormatError::IndexOutOfRange {
                index: 1,
                supplied: 1
            }
        );
        assert!(t.render(&[]).is_err());
    }

    #[test]
    fn structured_values_end_with_original_format() {
        let t = Template::compile("{A} {B}");
        let pairs = t.structured_values(&values![1, "x"]).unwrap();
        assert_eq!(pairs.len(), 3);
        assert_eq!(pairs[0], ("A", Value::from(1)));
        assert_eq!(pairs[1], ("B", Value::from("x")));
        assert_eq!(pairs[2], (ORIGINAL_FORMAT_KEY, Value::from("{A} {B}")));
    }

    #[test]
    fn structured_values_keep_raw_sequences() {
        let t = Template::compile("{Items}");
        let pairs = t.structured_values(&values![vec![1, 2]]).unwrap();
        assert_eq!(pairs[0].1, Value::from(vec![1, 2]));
    }

    #[test]
    fn structured_values_ignore_extra_values() {
        let t = Template::compile("{A}");
        let pairs = t.structured_values(&values![1, 2, 3]).unwrap();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[1].0, ORIGINAL_FORMAT_KEY);
    }

    #[test]
    fn structured_under_supply_is_index_error() {
        let t = Template::compile("{A} {B}");
        let err = t.structured_values(&values![1]).unwrap_err();
        assert_eq!(
            err,
            IndexError {
                index: 1,
                name: "B".into(),
                supplied: 1
            }
        );
    }

    #[test]
    fn template_conversions() {
        let parsed: Template = "{X}".parse().unwrap();
        assert_eq!(parsed, Template::from("{X}"));
        assert_eq!(parsed, Template::from(String::from("{X}")));
        assert_eq!(parsed.to_string(), "{X}");
    }

    #[test]
    fn template_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Template>();
    }
}
