//! Type inference for attribute values and text

use crate::value::Value;

/// Decides whether a raw string should become a number
pub trait NumericClassifier {
    /// `candidate` is the parsed value of `raw` (0 for blank input)
    fn is_numeric(&self, raw: &str, candidate: f64) -> bool;
}

/// Accepts finite decimal literals only: no `inf`, `NaN`, hex, or blank input
#[derive(Debug, Clone, Copy, Default)]
pub struct StrictNumeric;

impl NumericClassifier for StrictNumeric {
    fn is_numeric(&self, raw: &str, candidate: f64) -> bool {
        let raw = raw.trim();
        !raw.is_empty()
            && candidate.is_finite()
            && raw
                .bytes()
                .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'))
    }
}

/// Coerce `raw` into a boolean, number, trimmed string, or the `{}` sentinel
pub fn parse_value<C>(raw: Option<&str>, classifier: &C) -> Value
where
    C: NumericClassifier + ?Sized,
{
    let raw = raw.unwrap_or_default();
    let trimmed = raw.trim();

    if trimmed.eq_ignore_ascii_case("true") {
        return Value::Boolean(true);
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return Value::Boolean(false);
    }

    let candidate = if raw.is_empty() || raw == "\n" {
        Some(0.0)
    } else {
        trimmed.parse::<f64>().ok()
    };
    if let Some(number) = candidate.filter(|&n| classifier.is_numeric(raw, n)) {
        return Value::Number(number);
    }

    if trimmed.is_empty() {
        return Value::empty();
    }
    Value::String(trimmed.to_string())
}
