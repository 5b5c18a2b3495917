//! Composite formatting of positional format strings.
//!
//! Renders strings of the form `"{0} {1,-8} {2:F2}"`: literal text, `{{`/`}}`
//! escapes, and format items `{index[,alignment][:formatSpec]}`.

use crate::error::{FormatError, Result};
use crate::value::{Value, SEQUENCE_SEPARATOR};
use crate::{datetime, numeric};

/// Upper bound (exclusive) for item indices and alignment widths.
const MAX_ITEM_NUMBER: usize = 1_000_000;

/// One parsed `{index[,alignment][:formatSpec]}` item.
#[derive(Debug, PartialEq)]
struct FormatItem<'a> {
    index: usize,
    alignment: Option<Alignment>,
    spec: Option<&'a str>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Alignment {
    width: usize,
    left: bool,
}

/// Renders `format`, substituting each item with the matching value.
pub(crate) fn format<V: AsRef<Value>>(format: &str, values: &[V]) -> Result<String> {
    let bytes = format.as_bytes();
    let mut out = String::with_capacity(format.len() + values.len() * 8);
    let mut literal_start = 0;
    let mut pos = 0;

    while pos < bytes.len() {
        match bytes[pos] {
            b'{' if bytes.get(pos + 1) == Some(&b'{') => {
                out.push_str(&format[literal_start..=pos]);
                pos += 2;
                literal_start = pos;
            }
            b'{' => {
                out.push_str(&format[literal_start..pos]);
                let (item, next) = parse_item(format, pos + 1)?;
                let value = values
                    .get(item.index)
                    .ok_or(FormatError::IndexOutOfRange {
                        index: item.index,
                        supplied: values.len(),
                    })?;
                let text = format_value(value.as_ref(), item.spec)?;
                push_aligned(&mut out, &text, item.alignment);
                pos = next;
                literal_start = pos;
            }
            b'}' if bytes.get(pos + 1) == Some(&b'}') => {
                out.push_str(&format[literal_start..=pos]);
                pos += 2;
                literal_start = pos;
            }
            b'}' => return Err(FormatError::malformed(pos, "unexpected '}'")),
            _ => pos += 1,
        }
    }

    out.push_str(&format[literal_start..]);
    Ok(out)
}

/// Formats a single value with an optional spec.
///
/// Null renders empty; text and booleans ignore the format spec.
pub(crate) fn format_value(value: &Value, spec: Option<&str>) -> Result<String> {
    match value {
        Value::Null => Ok(String::new()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => numeric::format_number(*n, spec),
        Value::Timestamp(t) => datetime::format_timestamp(*t, spec),
        Value::Seq(items) => format_sequence(items),
    }
}

/// Joins sequence elements with their default formats, skipping nulls.
///
/// Unlike `Display`, an element that cannot be formatted fails the join.
pub(crate) fn format_sequence(items: &[Value]) -> Result<String> {
    let parts = items
        .iter()
        .filter(|item| !item.is_null())
        .map(|item| format_value(item, None))
        .collect::<Result<Vec<_>>>()?;
    Ok(parts.join(SEQUENCE_SEPARATOR))
}

fn skip_spaces(bytes: &[u8], mut pos: usize) -> usize {
    while bytes.get(pos) == Some(&b' ') {
        pos += 1;
    }
    pos
}

/// Reads a run of decimal digits starting at `pos`.
fn parse_number(bytes: &[u8], mut pos: usize) -> Result<(usize, usize)> {
    let start = pos;
    let mut number = 0usize;
    while let Some(digit) = bytes.get(pos).filter(|b| b.is_ascii_digit()) {
        number = number * 10 + usize::from(digit - b'0');
        if number >= MAX_ITEM_NUMBER {
            return Err(FormatError::malformed(start, "number too large"));
        }
        pos += 1;
    }
    if pos == start {
        return Err(FormatError::malformed(start, "expected digits"));
    }
    Ok((number, pos))
}

/// Parses a format item whose opening `{` sits just before `start`.
///
/// Returns the item and the position just past its closing `}`.
fn parse_item(format: &str, start: usize) -> Result<(FormatItem<'_>, usize)> {
    let bytes = format.as_bytes();
    let (index, pos) = parse_number(bytes, start)?;
    let mut pos = skip_spaces(bytes, pos);

    let mut alignment = None;
    if bytes.get(pos) == Some(&b',') {
        pos = skip_spaces(bytes, pos + 1);
        let left = bytes.get(pos) == Some(&b'-');
        if left {
            pos += 1;
        }
        let (width, next) = parse_number(bytes, pos)?;
        alignment = Some(Alignment { width, left });
        pos = skip_spaces(bytes, next);
    }

    let mut spec = None;
    if bytes.get(pos) == Some(&b':') {
        let spec_start = pos + 1;
        let spec_end = spec_start
            + bytes[spec_start..]
                .iter()
                .position(|&b| b == b'}' || b == b'{')
                .ok_or(FormatError::malformed(spec_start, "unterminated format item"))?;
        if bytes[spec_end] == b'{' {
            return Err(FormatError::malformed(spec_end, "unexpected '{' in format spec"));
        }
        spec = Some(&format[spec_start..spec_end]).filter(|s| !s.is_empty());
        pos = spec_end;
    }

    match bytes.get(pos) {
        Some(b'}') => Ok((
            FormatItem {
                index,
                alignment,
                spec,
            },
            pos + 1,
        )),
        Some(_) => Err(FormatError::malformed(pos, "expected '}'")),
        None => Err(FormatError::malformed(pos, "unterminated format item")),
    }
}

fn push_aligned(out: &mut String, text: &str, alignment: Option<Alignment>) {
    let Some(Alignment { width, left }) = alignment else {
        out.push_str(text);
        return;
    };
    let padding = width.saturating_sub(text.chars().count());
    if left {
        out.push_str(text);
        out.extend(std::iter::repeat(' ').take(padding));
    } else {
        out.extend(std::iter::repeat(' ').take(padding));
        out.push_str(text);
    }
}
