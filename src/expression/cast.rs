//! CAST conversion and the text conversions it relies on.

use crate::expression::expr::{ExprNode, Payload};
use crate::expression::types::ResultType;

/// Significant digits used when rendering a double as text.
const SIGNIFICANT_DIGITS: usize = 15;

/// Convert an evaluated literal to `target`.
///
/// Numeric targets read the value's payload; every other target (string,
/// date, time, timestamp) receives the value's text, clamped to `width`
/// characters when a positive width is given.
pub fn cast_value(value: &ExprNode, target: ResultType, width: Option<i64>) -> ExprNode {
    if value.is_null {
        return ExprNode::null(target);
    }

    match target {
        ResultType::Integer => {
            let converted = match value.result_type {
                ResultType::Integer | ResultType::Boolean | ResultType::Float => value.as_i64(),
                _ => parse_leading_int(&value.text()),
            };
            ExprNode::literal(ResultType::Integer, Payload::Int(converted))
        }
        ResultType::Float => {
            let converted = match value.result_type {
                ResultType::Integer | ResultType::Boolean | ResultType::Float => value.as_f64(),
                _ => parse_leading_float(&value.text()),
            };
            ExprNode::literal(ResultType::Float, Payload::Float(converted))
        }
        _ => {
            let text = match value.result_type {
                ResultType::Integer | ResultType::Boolean => value.as_i64().to_string(),
                ResultType::Float => format_float(value.as_f64()),
                _ => value.text().into_owned(),
            };
            ExprNode::literal(target, Payload::Text(clamp_width(text, width)))
        }
    }
}

fn clamp_width(text: String, width: Option<i64>) -> String {
    match width {
        Some(width) if width > 0 && (width as usize) < text.chars().count() => {
            text.chars().take(width as usize).collect()
        }
        _ => text,
    }
}

/// Render a double with 15 significant digits, switching to exponent
/// notation for very large or very small magnitudes. Trailing zeros are
/// dropped.
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    let scientific = format!("{:.*e}", SIGNIFICANT_DIGITS - 1, value);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((mantissa, exponent)) => match exponent.parse::<i32>() {
            Ok(exponent) => (mantissa, exponent),
            Err(_) => return value.to_string(),
        },
        None => return value.to_string(),
    };

    if exponent < -4 || exponent >= SIGNIFICANT_DIGITS as i32 {
        format!(
            "{}e{}{:02}",
            trim_fraction_zeros(mantissa),
            if exponent < 0 { '-' } else { '+' },
            exponent.abs()
        )
    } else {
        let decimals = (SIGNIFICANT_DIGITS as i32 - 1 - exponent) as usize;
        trim_fraction_zeros(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn trim_fraction_zeros(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}

/// Parse the leading integer of `text`, ignoring anything after it.
///
/// Leading whitespace and a sign are accepted; text without leading digits
/// parses to 0 and out-of-range values saturate.
pub fn parse_leading_int(text: &str) -> i64 {
    let text = text.trim_start();
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let mut value: i64 = 0;
    for digit in digits.bytes().take_while(u8::is_ascii_digit) {
        let digit = (digit - b'0') as i64;
        value = if negative {
            value.saturating_mul(10).saturating_sub(digit)
        } else {
            value.saturating_mul(10).saturating_add(digit)
        };
    }
    value
}

/// Parse the leading decimal number of `text`, ignoring anything after it.
///
/// Text without a leading number parses to 0.0.
pub fn parse_leading_float(text: &str) -> f64 {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'-') | Some(b'+')) {
        end += 1;
    }

    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }

    if int_digits == 0 && frac_digits == 0 {
        return 0.0;
    }

    if matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'-') | Some(b'+')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end.min(bytes.len())..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    text[..end].parse::<f64>().unwrap_or(0.0)
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}
