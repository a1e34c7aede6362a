//! Lenient conversions from model-produced JSON values.
//!
//! The model is asked for numbers but routinely returns numeric strings
//! (`"58.40"`), empty strings or nulls. Both the validator and the renderer
//! go through these helpers so they agree on what counts as a number.

use serde_json::Value;
use thiserror::Error;

/// Currency symbol prefixed to money amounts.
pub const CURRENCY_SYMBOL: &str = "£";

/// A JSON value that could not be interpreted as a number.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoercionError {
    #[error("value is absent")]
    Missing,

    #[error("expected a number, found {0}")]
    WrongType(&'static str),

    #[error("string {0:?} is not a number")]
    Unparseable(String),
}

/// Coerce a JSON value into an `f64`.
///
/// Accepts JSON numbers and strings holding a finite number (surrounding
/// whitespace is ignored). Everything else is rejected, including
/// booleans and `"NaN"`/`"inf"`.
pub fn to_number(value: Option<&Value>) -> Result<f64, CoercionError> {
    match value {
        None | Some(Value::Null) => Err(CoercionError::Missing),
        Some(Value::Number(n)) => n
            .as_f64()
            .filter(|x| x.is_finite())
            .ok_or_else(|| CoercionError::Unparseable(n.to_string())),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|x| x.is_finite())
            .ok_or_else(|| CoercionError::Unparseable(s.clone())),
        Some(other) => Err(CoercionError::WrongType(type_name(other))),
    }
}

/// Best-effort string form of a value for display.
///
/// Strings are returned verbatim, numbers as written in the source JSON,
/// null and absent values as the empty string, containers as compact JSON.
pub fn display_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(other) => other.to_string(),
    }
}

/// Format a money amount as `£12.34`.
///
/// Values that do not coerce to a number fall back to [`display_text`]
/// without the currency symbol.
pub fn format_money(value: Option<&Value>) -> String {
    match to_number(value) {
        Ok(amount) => format!("{CURRENCY_SYMBOL}{amount:.2}"),
        Err(_) => display_text(value),
    }
}

/// Short JSON type name used in diagnostics.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn numbers_and_numeric_strings_coerce() {
        assert_eq!(to_number(Some(&json!(58.4))), Ok(58.4));
        assert_eq!(to_number(Some(&json!(60))), Ok(60.0));
        assert_eq!(to_number(Some(&json!(" 61.00 "))), Ok(61.0));
        assert_eq!(to_number(Some(&json!("-3"))), Ok(-3.0));
    }

    #[test]
    fn non_numeric_values_are_rejected() {
        assert_eq!(to_number(None), Err(CoercionError::Missing));
        assert_eq!(to_number(Some(&Value::Null)), Err(CoercionError::Missing));
        assert_eq!(
            to_number(Some(&json!("about £60"))),
            Err(CoercionError::Unparseable("about £60".to_string()))
        );
        assert_eq!(
            to_number(Some(&json!(""))),
            Err(CoercionError::Unparseable(String::new()))
        );
        assert_eq!(
            to_number(Some(&json!(true))),
            Err(CoercionError::WrongType("boolean"))
        );
        assert_eq!(
            to_number(Some(&json!([1, 2]))),
            Err(CoercionError::WrongType("array"))
        );
    }

    #[test]
    fn non_finite_strings_are_rejected() {
        for raw in ["NaN", "inf", "-inf", "infinity", "1e999"] {
            assert_eq!(
                to_number(Some(&json!(raw))),
                Err(CoercionError::Unparseable(raw.to_string())),
                "{raw}"
            );
        }
        assert_eq!(format_money(Some(&json!("NaN"))), "NaN");
    }

    #[test]
    fn display_text_keeps_source_number_formatting() {
        assert_eq!(display_text(Some(&json!(160))), "160");
        assert_eq!(display_text(Some(&json!(160.5))), "160.5");
        assert_eq!(display_text(Some(&json!("Mon"))), "Mon");
        assert_eq!(display_text(Some(&Value::Null)), "");
        assert_eq!(display_text(None), "");
        assert_eq!(display_text(Some(&json!({"a": 1}))), r#"{"a":1}"#);
    }

    #[test]
    fn money_has_two_decimals_and_symbol() {
        assert_eq!(format_money(Some(&json!(58.4))), "£58.40");
        assert_eq!(format_money(Some(&json!("1.5"))), "£1.50");
        assert_eq!(format_money(Some(&json!(3))), "£3.00");
    }

    #[test]
    fn money_falls_back_to_raw_text_without_symbol() {
        assert_eq!(format_money(Some(&json!("n/a"))), "n/a");
        assert_eq!(format_money(None), "");
        assert_eq!(format_money(Some(&json!(false))), "false");
    }
}
