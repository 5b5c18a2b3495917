//! Culture-invariant timestamp formatting.
//!
//! Timestamps are rendered in UTC. Standard single-letter specs expand to the
//! invariant patterns below; anything longer is a custom pattern.

use jiff::civil::{DateTime, Weekday};
use jiff::tz::Offset;

use crate::error::{FormatError, Result};
use crate::value::Timestamp;

const VALUE_TYPE: &str = "timestamp";
const GENERAL_PATTERN: &str = "MM/dd/yyyy HH:mm:ss";
const MAX_FRACTION_DIGITS: usize = 7;

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

fn standard_pattern(letter: char) -> Option<&'static str> {
    let pattern = match letter {
        'd' => "MM/dd/yyyy",
        'D' => "dddd, dd MMMM yyyy",
        'f' => "dddd, dd MMMM yyyy HH:mm",
        'F' | 'U' => "dddd, dd MMMM yyyy HH:mm:ss",
        'g' => "MM/dd/yyyy HH:mm",
        'G' => GENERAL_PATTERN,
        'm' | 'M' => "MMMM dd",
        'o' | 'O' => "yyyy'-'MM'-'dd'T'HH':'mm':'ss'.'fffffffK",
        'r' | 'R' => "ddd, dd MMM yyyy HH':'mm':'ss 'GMT'",
        's' => "yyyy'-'MM'-'dd'T'HH':'mm':'ss",
        't' => "HH:mm",
        'T' => "HH:mm:ss",
        'u' => "yyyy'-'MM'-'dd HH':'mm':'ss'Z'",
        'y' | 'Y' => "yyyy MMMM",
        _ => return None,
    };
    Some(pattern)
}

/// Formats a timestamp with an optional format spec.
pub(crate) fn format_timestamp(timestamp: Timestamp, spec: Option<&str>) -> Result<String> {
    let instant = timestamp
        .to_jiff()
        .ok_or(FormatError::TimestampOutOfRange {
            millis: timestamp.as_millis(),
        })?;
    let datetime = Offset::UTC.to_datetime(instant);

    let pattern = match spec {
        None | Some("") => GENERAL_PATTERN,
        Some(spec) => {
            let mut chars = spec.chars();
            match (chars.next(), chars.next()) {
                (Some(letter), None) => standard_pattern(letter)
                    .ok_or_else(|| FormatError::invalid_spec(spec, VALUE_TYPE))?,
                _ => spec,
            }
        }
    };

    render_pattern(&datetime, pattern).ok_or_else(|| FormatError::invalid_spec(pattern, VALUE_TYPE))
}

fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Monday => "Monday",
        Weekday::Tuesday => "Tuesday",
        Weekday::Wednesday => "Wednesday",
        Weekday::Thursday => "Thursday",
        Weekday::Friday => "Friday",
        Weekday::Saturday => "Saturday",
        Weekday::Sunday => "Sunday",
    }
}

fn month_name(month: i8) -> &'static str {
    MONTHS[(month as usize).clamp(1, 12) - 1]
}

fn abbreviate(name: &str) -> &str {
    &name[..3]
}

fn padded(value: i64, width: usize) -> String {
    if value < 0 {
        format!("-{:0>width$}", value.unsigned_abs(), width = width)
    } else {
        format!("{:0>width$}", value, width = width)
    }
}

/// Counts how many times the char at the front of `rest` repeats.
fn run_length(rest: &str, ch: char) -> usize {
    rest.chars().take_while(|&c| c == ch).count()
}

/// Expands a custom pattern. Returns `None` when the pattern is malformed.
fn render_pattern(datetime: &DateTime, pattern: &str) -> Option<String> {
    let mut out = String::with_capacity(pattern.len() + 8);
    let mut rest = pattern;

    while let Some(ch) = rest.chars().next() {
        let count = run_length(rest, ch);
        let mut consumed = count * ch.len_utf8();

        match ch {
            'd' => match count {
                1 | 2 => out.push_str(&padded(datetime.day().into(), count)),
                3 => out.push_str(abbreviate(weekday_name(datetime.weekday()))),
                _ => out.push_str(weekday_name(datetime.weekday())),
            },
            'M' => match count {
                1 | 2 => out.push_str(&padded(datetime.month().into(), count)),
                3 => out.push_str(abbreviate(month_name(datetime.month()))),
                _ => out.push_str(month_name(datetime.month())),
            },
            'y' => {
                let year = i64::from(datetime.year());
                match count {
                    1 => out.push_str(&(year % 100).to_string()),
                    2 => out.push_str(&padded(year % 100, 2)),
                    _ => out.push_str(&padded(year, count)),
                }
            }
            'h' => {
                let hour = match datetime.hour() % 12 {
                    0 => 12,
                    h => h,
                };
                out.push_str(&padded(hour.into(), count.min(2)));
            }
            'H' => out.push_str(&padded(datetime.hour().into(), count.min(2))),
            'm' => out.push_str(&padded(datetime.minute().into(), count.min(2))),
            's' => out.push_str(&padded(datetime.second().into(), count.min(2))),
            'f' | 'F' => {
                if count > MAX_FRACTION_DIGITS {
                    return None;
                }
                let ticks = format!("{:07}", datetime.subsec_nanosecond() / 100);
                let digits = &ticks[..count];
                if ch == 'f' {
                    out.push_str(digits);
                } else {
                    let trimmed = digits.trim_end_matches('0');
                    if trimmed.is_empty() {
                        if out.ends_with('.') {
                            out.pop();
                        }
                    } else {
                        out.push_str(trimmed);
                    }
                }
            }
            't' => {
                let designator = if datetime.hour() < 12 { "AM" } else { "PM" };
                out.push_str(if count == 1 { &designator[..1] } else { designator });
            }
            'z' => out.push_str(match count {
                1 => "+0",
                2 => "+00",
                _ => "+00:00",
            }),
            'K' => {
                out.push('Z');
                consumed = 1;
            }
            'g' => out.push_str("A.D."),
            '\'' | '"' => {
                let body = &rest[1..];
                let end = body.find(ch)?;
                out.push_str(&body[..end]);
                consumed = end + 2;
            }
            '\\' => {
                let escaped = rest[1..].chars().next()?;
                out.push(escaped);
                consumed = 1 + escaped.len_utf8();
            }
            '%' => {
                let next = rest[1..].chars().next()?;
                if next == '%' {
                    return None;
                }
                let single = &rest[1..1 + next.len_utf8()];
                out.push_str(&render_pattern(datetime, single)?);
                consumed = 1 + next.len_utf8();
            }
            other => {
                out.push(other);
                consumed = other.len_utf8();
            }
        }

        rest = &rest[consumed..];
    }

    Some(out)
}
