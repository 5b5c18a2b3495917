//! Culture-invariant number formatting.
//!
//! Supports the standard specifiers (`D`, `X`, `F`, `N`, `E`, `P`, `C`, `G`,
//! `R`, each with an optional precision) and custom digit patterns such as
//! `#,##0.00` or `0.0%;(0.0%);zero`. Output always uses `.` as the decimal
//! point and `,` as the group separator.

use crate::error::{FormatError, Result};
use crate::value::Number;

const CURRENCY_SYMBOL: char = '¤';
const DEFAULT_DECIMALS: usize = 2;
const DEFAULT_EXPONENT_DECIMALS: usize = 6;
const SHORTEST_PRECISION: usize = 15;
const MAX_PRECISION: usize = 1_000;

/// Default text of a number, as used when no format spec is given.
pub(crate) fn default_text(number: Number) -> String {
    match number {
        Number::I64(n) => n.to_string(),
        Number::U64(n) => n.to_string(),
        Number::F64(_) => general(number, None, 'E'),
    }
}

/// Formats a number with an optional format spec.
pub(crate) fn format_number(number: Number, spec: Option<&str>) -> Result<String> {
    let spec = match spec {
        Some(spec) if !spec.is_empty() => spec,
        _ => return Ok(default_text(number)),
    };

    let standard_spec = parse_standard(spec);

    if let Number::F64(v) = number {
        if !v.is_finite() {
            if let Some((letter, precision)) = standard_spec {
                check_float_spec(number, spec, letter, precision)?;
            }
            return Ok(non_finite(v));
        }
    }

    match standard_spec {
        Some((letter, precision)) => standard(number, spec, letter, precision),
        None => Ok(custom(number, spec)),
    }
}

/// Rejects standard specs that never apply to a float, whatever its value.
fn check_float_spec(
    number: Number,
    spec: &str,
    letter: char,
    precision: Option<usize>,
) -> Result<()> {
    let valid = precision.map_or(true, |p| p <= MAX_PRECISION)
        && matches!(
            letter.to_ascii_uppercase(),
            'F' | 'N' | 'P' | 'C' | 'E' | 'G' | 'R'
        );
    if valid {
        Ok(())
    } else {
        Err(FormatError::invalid_spec(spec, number.type_name()))
    }
}

/// Splits `letter[digits]`; anything else is a custom pattern.
fn parse_standard(spec: &str) -> Option<(char, Option<usize>)> {
    let mut chars = spec.chars();
    let letter = chars.next().filter(char::is_ascii_alphabetic)?;
    let digits = chars.as_str();
    if digits.is_empty() {
        return Some((letter, None));
    }
    if digits.len() > 9 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok().map(|precision| (letter, Some(precision)))
}

fn standard(number: Number, spec: &str, letter: char, precision: Option<usize>) -> Result<String> {
    let invalid = || FormatError::invalid_spec(spec, number.type_name());
    if precision.is_some_and(|p| p > MAX_PRECISION) {
        return Err(invalid());
    }
    let decimals = precision.unwrap_or(DEFAULT_DECIMALS);

    match letter.to_ascii_uppercase() {
        'D' => decimal(number, precision.unwrap_or(0)).ok_or_else(invalid),
        'X' => hex(number, precision.unwrap_or(0), letter == 'x').ok_or_else(invalid),
        'F' => Ok(fixed(number, decimals, false)),
        'N' => Ok(fixed(number, decimals, true)),
        'P' => Ok(percent(number, decimals)),
        'C' => Ok(currency(number, decimals)),
        'E' => Ok(exponential(
            number,
            precision.unwrap_or(DEFAULT_EXPONENT_DECIMALS),
            letter,
        )),
        'G' => {
            let exponent_letter = if letter == 'g' { 'e' } else { 'E' };
            Ok(general(number, precision.filter(|&p| p > 0), exponent_letter))
        }
        'R' => Ok(general(number, None, 'E')),
        _ => Err(invalid()),
    }
}

fn non_finite(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else if v > 0.0 {
        "Infinity".to_string()
    } else {
        "-Infinity".to_string()
    }
}

/// Sign and digits of a number rounded to a fixed number of decimals.
struct Digits {
    negative: bool,
    integer: String,
    fraction: String,
}

fn fixed_digits(number: Number, decimals: usize) -> Digits {
    match number {
        Number::I64(n) => Digits {
            negative: n < 0,
            integer: n.unsigned_abs().to_string(),
            fraction: "0".repeat(decimals),
        },
        Number::U64(n) => Digits {
            negative: false,
            integer: n.to_string(),
            fraction: "0".repeat(decimals),
        },
        Number::F64(v) => {
            let text = format!("{:.*}", decimals, v.abs());
            let (integer, fraction) = text.split_once('.').unwrap_or((text.as_str(), ""));
            Digits {
                negative: v < 0.0 && has_nonzero(&text),
                integer: integer.to_string(),
                fraction: fraction.to_string(),
            }
        }
    }
}

fn has_nonzero(digits: &str) -> bool {
    digits.bytes().any(|b| matches!(b, b'1'..=b'9'))
}

fn join_parts(integer: &str, fraction: &str) -> String {
    if fraction.is_empty() {
        integer.to_string()
    } else {
        format!("{}.{}", integer, fraction)
    }
}

/// Inserts `,` between groups of three integer digits.
fn group(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn signed(negative: bool, body: String) -> String {
    if negative {
        format!("-{}", body)
    } else {
        body
    }
}

fn scale(number: Number, factor: u32) -> Number {
    match number {
        Number::I64(n) => n
            .checked_mul(i64::from(factor))
            .map_or(Number::F64(n as f64 * f64::from(factor)), Number::I64),
        Number::U64(n) => n
            .checked_mul(u64::from(factor))
            .map_or(Number::F64(n as f64 * f64::from(factor)), Number::U64),
        Number::F64(v) => Number::F64(v * f64::from(factor)),
    }
}

fn decimal(number: Number, min_digits: usize) -> Option<String> {
    match number {
        Number::I64(n) => Some(signed(
            n < 0,
            format!("{:0>width$}", n.unsigned_abs(), width = min_digits),
        )),
        Number::U64(n) => Some(format!("{:0>width$}", n, width = min_digits)),
        Number::F64(_) => None,
    }
}

fn hex(number: Number, min_digits: usize, lowercase: bool) -> Option<String> {
    let bits = match number {
        Number::I64(n) => n as u64,
        Number::U64(n) => n,
        Number::F64(_) => return None,
    };
    Some(if lowercase {
        format!("{:0width$x}", bits, width = min_digits)
    } else {
        format!("{:0width$X}", bits, width = min_digits)
    })
}

fn fixed(number: Number, decimals: usize, grouped: bool) -> String {
    let digits = fixed_digits(number, decimals);
    let integer = if grouped {
        group(&digits.integer)
    } else {
        digits.integer
    };
    signed(digits.negative, join_parts(&integer, &digits.fraction))
}

fn percent(number: Number, decimals: usize) -> String {
    format!("{} %", fixed(scale(number, 100), decimals, true))
}

fn currency(number: Number, decimals: usize) -> String {
    let digits = fixed_digits(number, decimals);
    let body = join_parts(&group(&digits.integer), &digits.fraction);
    if digits.negative {
        format!("({}{})", CURRENCY_SYMBOL, body)
    } else {
        format!("{}{}", CURRENCY_SYMBOL, body)
    }
}

/// Rounds a digit string to `keep` significant digits, half away from zero.
///
/// Returns the digits (exactly `keep` long) and whether rounding carried into
/// a new leading digit.
fn round_significant(digits: &str, keep: usize) -> (String, bool) {
    if digits.len() <= keep {
        return (format!("{:0<keep$}", digits, keep = keep), false);
    }

    let mut kept: Vec<u8> = digits.as_bytes()[..keep].to_vec();
    let mut carried = false;
    if digits.as_bytes()[keep] >= b'5' {
        let mut i = keep;
        loop {
            if i == 0 {
                kept.insert(0, b'1');
                kept.pop();
                carried = true;
                break;
            }
            i -= 1;
            if kept[i] == b'9' {
                kept[i] = b'0';
            } else {
                kept[i] += 1;
                break;
            }
        }
    }
    (kept.into_iter().map(char::from).collect(), carried)
}

/// Splits Rust's `{:e}` output into mantissa digits and a decimal exponent.
fn split_exponent(text: &str) -> (String, i32) {
    let (mantissa, exponent) = text.split_once('e').unwrap_or((text, "0"));
    (mantissa.replace('.', ""), exponent.parse().unwrap_or(0))
}

/// Sign, `significant` mantissa digits and exponent of a number.
fn scientific_digits(number: Number, significant: usize) -> (bool, String, i32) {
    let (negative, integer) = match number {
        Number::I64(n) => (n < 0, n.unsigned_abs().to_string()),
        Number::U64(n) => (false, n.to_string()),
        Number::F64(v) => {
            let text = format!("{:.*e}", significant - 1, v.abs());
            let (digits, exponent) = split_exponent(&text);
            return (v < 0.0 && has_nonzero(&digits), digits, exponent);
        }
    };
    let (digits, carried) = round_significant(&integer, significant);
    let exponent = (integer.len() - 1) as i32 + i32::from(carried);
    let exponent = if has_nonzero(&digits) { exponent } else { 0 };
    (negative, digits, exponent)
}

fn exponent_suffix(letter: char, exponent: i32, min_digits: usize) -> String {
    let sign = if exponent < 0 { '-' } else { '+' };
    format!(
        "{}{}{:0>width$}",
        letter,
        sign,
        exponent.unsigned_abs(),
        width = min_digits
    )
}

fn exponential(number: Number, decimals: usize, letter: char) -> String {
    let (negative, digits, exponent) = scientific_digits(number, decimals + 1);
    let (lead, rest) = digits.split_at(1);
    let body = format!(
        "{}{}",
        join_parts(lead, rest),
        exponent_suffix(letter, exponent, 3)
    );
    signed(negative, body)
}

fn trim_trailing_zeros(digits: &str) -> String {
    let trimmed = digits.trim_end_matches('0');
    if trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// General format: fixed-point unless the exponent is at least the precision
/// or below -4. Without a precision, floats use their shortest round-trip
/// digits and integers print in full.
fn general(number: Number, precision: Option<usize>, letter: char) -> String {
    let (negative, digits, exponent, threshold) = match number {
        Number::F64(v) if !v.is_finite() => return non_finite(v),
        Number::F64(v) => {
            let text = match precision {
                Some(p) => format!("{:.*e}", p - 1, v.abs()),
                None => format!("{:e}", v.abs()),
            };
            let (digits, exponent) = split_exponent(&text);
            (
                v < 0.0 && has_nonzero(&digits),
                trim_trailing_zeros(&digits),
                exponent,
                precision.unwrap_or(SHORTEST_PRECISION),
            )
        }
        Number::I64(_) | Number::U64(_) => {
            let (negative, integer) = match number {
                Number::I64(n) => (n < 0, n.unsigned_abs().to_string()),
                _ => (false, default_text(number)),
            };
            match precision {
                Some(p) if p < integer.len() => {
                    let (digits, carried) = round_significant(&integer, p);
                    let exponent = (integer.len() - 1) as i32 + i32::from(carried);
                    (negative, trim_trailing_zeros(&digits), exponent, p)
                }
                _ => return signed(negative, integer),
            }
        }
    };

    let body = if exponent >= threshold as i32 || exponent < -4 {
        let (lead, rest) = digits.split_at(1);
        format!(
            "{}{}",
            join_parts(lead, rest),
            exponent_suffix(letter, exponent, 2)
        )
    } else if exponent >= 0 {
        let integer_len = exponent as usize + 1;
        if digits.len() <= integer_len {
            format!("{:0<width$}", digits, width = integer_len)
        } else {
            let (integer, fraction) = digits.split_at(integer_len);
            join_parts(integer, fraction)
        }
    } else {
        format!("0.{}{}", "0".repeat((-exponent - 1) as usize), digits)
    };
    signed(negative, body)
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Digit { required: bool },
    Point,
    Group,
    Percent,
    Literal(String),
}

/// Splits a custom pattern on unquoted `;`.
fn split_sections(pattern: &str) -> Vec<&str> {
    let mut sections = Vec::new();
    let mut start = 0;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (i, ch) in pattern.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match (quote, ch) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\\') => escaped = true,
            (None, '\'' | '"') => quote = Some(ch),
            (None, ';') => {
                sections.push(&pattern[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    sections.push(&pattern[start..]);
    sections
}

fn tokenize(section: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = section.chars();
    let mut seen_point = false;

    while let Some(ch) = chars.next() {
        let token = match ch {
            '0' => Token::Digit { required: true },
            '#' => Token::Digit { required: false },
            '.' if !seen_point => {
                seen_point = true;
                Token::Point
            }
            '.' => continue,
            ',' => Token::Group,
            '%' => Token::Percent,
            '\'' | '"' => Token::Literal(chars.by_ref().take_while(|&c| c != ch).collect()),
            '\\' => match chars.next() {
                Some(next) => Token::Literal(next.to_string()),
                None => continue,
            },
            other => Token::Literal(other.to_string()),
        };
        tokens.push(token);
    }
    tokens
}

fn custom(number: Number, pattern: &str) -> String {
    let sections = split_sections(pattern);
    let (is_zero, negative) = match number {
        Number::I64(n) => (n == 0, n < 0),
        Number::U64(n) => (n == 0, false),
        Number::F64(v) => (v == 0.0, v < 0.0),
    };

    let pick = |index: usize| sections.get(index).copied().filter(|s| !s.is_empty());
    let (section, with_sign) = match (pick(2), pick(1)) {
        (Some(zero), _) if is_zero => (zero, false),
        (_, Some(negative_section)) if negative => (negative_section, false),
        _ => (sections[0], true),
    };

    render_section(number, &tokenize(section), with_sign)
}

fn render_section(number: Number, tokens: &[Token], with_sign: bool) -> String {
    let point = tokens
        .iter()
        .position(|t| *t == Token::Point)
        .unwrap_or(tokens.len());
    let (integer_tokens, fraction_tokens) = tokens.split_at(point);

    let integer_placeholders: Vec<(usize, bool)> = integer_tokens
        .iter()
        .enumerate()
        .filter_map(|(i, t)| match t {
            Token::Digit { required } => Some((i, *required)),
            _ => None,
        })
        .collect();
    let fraction_required: Vec<bool> = fraction_tokens
        .iter()
        .filter_map(|t| match t {
            Token::Digit { required } => Some(*required),
            _ => None,
        })
        .collect();

    let first_digit = integer_placeholders.first().map(|&(i, _)| i);
    let last_digit = integer_placeholders.last().map(|&(i, _)| i);
    let is_group_at = |i: usize| integer_tokens[i] == Token::Group;
    let grouping = match (first_digit, last_digit) {
        (Some(first), Some(last)) => (first..last).any(is_group_at),
        _ => false,
    };
    let scale_down = last_digit.map_or(0, |last| {
        (last + 1..integer_tokens.len())
            .filter(|&i| is_group_at(i))
            .count()
    });

    let mut value = number;
    if tokens.contains(&Token::Percent) {
        value = scale(value, 100);
    }
    if scale_down > 0 {
        let divisor = 1000f64.powi(scale_down as i32);
        value = Number::F64(value.to_f64() / divisor);
    }

    let max_fraction = fraction_required.len();
    let min_fraction = fraction_required.iter().rposition(|&r| r).map_or(0, |i| i + 1);
    let min_integer = integer_placeholders
        .iter()
        .position(|&(_, required)| required)
        .map_or(0, |i| integer_placeholders.len() - i);

    let digits = fixed_digits(value, max_fraction);
    let mut fraction = digits.fraction;
    while fraction.len() > min_fraction && fraction.ends_with('0') {
        fraction.pop();
    }
    let mut integer = if digits.integer == "0" && min_integer == 0 {
        String::new()
    } else {
        digits.integer
    };
    if integer.len() < min_integer {
        integer = format!("{:0>width$}", integer, width = min_integer);
    }

    let mut out = String::new();
    let placeholder_count = integer_placeholders.len();
    let mut placeholder = 0;
    for token in integer_tokens {
        match token {
            Token::Digit { .. } => {
                if grouping {
                    if placeholder == 0 {
                        out.push_str(&group(&integer));
                    }
                } else {
                    let len = integer.len();
                    let start = if placeholder == 0 {
                        0
                    } else {
                        len.saturating_sub(placeholder_count - placeholder)
                    };
                    let end = len.saturating_sub(placeholder_count - 1 - placeholder);
                    out.push_str(&integer[start..end]);
                }
                placeholder += 1;
            }
            Token::Percent => out.push('%'),
            Token::Literal(text) => out.push_str(text),
            Token::Point | Token::Group => {}
        }
    }
    if placeholder_count == 0 && !fraction_required.is_empty() {
        out.push_str(&integer);
    }

    let mut fraction_digits = fraction.chars();
    for token in fraction_tokens {
        match token {
            Token::Point if !fraction.is_empty() => out.push('.'),
            Token::Digit { .. } => {
                if let Some(digit) = fraction_digits.next() {
                    out.push(digit);
                }
            }
            Token::Percent => out.push('%'),
            Token::Literal(text) => out.push_str(text),
            Token::Point | Token::Group => {}
        }
    }

    let shows_nonzero = has_nonzero(&integer) || has_nonzero(&fraction);
    signed(with_sign && digits.negative && shows_nonzero, out)
}
