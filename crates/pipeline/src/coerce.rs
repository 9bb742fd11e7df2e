//! Coercion of loosely typed JSON values.
//!
//! Payloads come from a web form and a Node backend, so numbers arrive as
//! numbers, numeric strings, booleans or not at all. Numeric coercion
//! never fails: anything that cannot be read as a number becomes 0.0,
//! which is what the models saw for missing values at training time.

use serde_json::Value;

/// Read `value` as a number, falling back to 0.0.
///
/// - numbers keep their value
/// - strings are trimmed and parsed; `"inf"` stays infinite, `"nan"`
///   and unparseable text become 0.0
/// - `true`/`false` become 1.0/0.0
/// - null, arrays, objects and missing values become 0.0
pub fn coerce_numeric(value: Option<&Value>) -> f64 {
    let coerced = match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
        Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(f64::NAN),
        Some(Value::Bool(b)) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        _ => f64::NAN,
    };
    if coerced.is_nan() { 0.0 } else { coerced }
}

/// Text form of a categorical value, as the training code stringified it.
///
/// Missing values take `default`. Integers print without a decimal point,
/// floats follow [`float_text`], booleans are `True`/`False` and null is
/// `None`.
pub fn category_text(value: Option<&Value>, default: &str) -> String {
    match value {
        None => default.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) => "None".to_string(),
        Some(Value::Bool(true)) => "True".to_string(),
        Some(Value::Bool(false)) => "False".to_string(),
        Some(Value::Number(n)) => match (n.as_i64(), n.as_u64(), n.as_f64()) {
            (Some(i), _, _) => i.to_string(),
            (None, Some(u), _) => u.to_string(),
            (None, None, Some(f)) => float_text(f),
            _ => n.to_string(),
        },
        Some(other) => other.to_string(),
    }
}

/// Shortest round-trip text of `value` in the training-time float style.
///
/// Fixed notation with at least one decimal (`1.0`, `0.0001`) while the
/// decimal point sits within 16 digits of the leading digit, otherwise
/// scientific with a signed, two-digit exponent (`1e+16`, `1e-05`,
/// `1.5e+20`).
pub fn float_text(value: f64) -> String {
    if !value.is_finite() {
        return if value.is_nan() {
            "nan".to_string()
        } else if value > 0.0 {
            "inf".to_string()
        } else {
            "-inf".to_string()
        };
    }

    // `{:e}` yields the shortest round-trip digits, e.g. "-1.25e-7"
    let sci = format!("{:e}", value);
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);
    let (sign, mantissa) = match mantissa.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", mantissa),
    };
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let point = exp + 1;

    if point > 16 || point <= -4 {
        let exp_sign = if exp < 0 { '-' } else { '+' };
        return format!("{}{}e{}{:02}", sign, mantissa, exp_sign, exp.abs());
    }

    let body = if point <= 0 {
        format!("0.{}{}", "0".repeat(point.unsigned_abs() as usize), digits)
    } else {
        let point = point as usize;
        if point >= digits.len() {
            format!("{}{}.0", digits, "0".repeat(point - digits.len()))
        } else {
            format!("{}.{}", &digits[..point], &digits[point..])
        }
    };
    format!("{}{}", sign, body)
}
