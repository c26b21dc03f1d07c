//! Per-cell type inference.
//!
//! A scalar is matched against [`RULES`] in order and the first rule that
//! accepts it decides the cell type. Anything no rule accepts is passed through
//! untouched as [`InferredValue::Raw`]. Classification cannot fail.

use std::borrow::Cow;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Numeric-looking text at or above this length stays text (phone numbers, ids).
pub const NUMERIC_TEXT_MAX_LEN: usize = 11;

pub const DATETIME_INPUT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const DATETIME_DISPLAY_FORMAT: &str = "%d/%m/%Y %H:%M:%S";
pub const DATE_INPUT_FORMAT: &str = "%Y-%m-%d";
pub const DATE_DISPLAY_FORMAT: &str = "%d/%m/%Y";
const DATETIME_SHAPE: &str = "9999-99-99 99:99:99";
const DATE_SHAPE: &str = "9999-99-99";

/// Name reported by [`classify_with_rule`] when no rule matched.
pub const FALLBACK_RULE: &str = "raw";

#[derive(Debug, Clone, PartialEq)]
pub enum InferredValue {
    Number(f64),
    /// Rendered in `DD/MM/YYYY HH:MM:SS`.
    DateTime(String),
    /// Rendered in `DD/MM/YYYY`.
    Date(String),
    String(String),
    Raw(Value),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InferredKind {
    Number,
    DateTime,
    Date,
    String,
    Raw,
}

impl InferredValue {
    pub fn kind(&self) -> InferredKind {
        match self {
            InferredValue::Number(_) => InferredKind::Number,
            InferredValue::DateTime(_) => InferredKind::DateTime,
            InferredValue::Date(_) => InferredKind::Date,
            InferredValue::String(_) => InferredKind::String,
            InferredValue::Raw(_) => InferredKind::Raw,
        }
    }

    pub fn as_display(&self) -> String {
        match self {
            InferredValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    (*n as i64).to_string()
                } else {
                    n.to_string()
                }
            }
            InferredValue::DateTime(s) | InferredValue::Date(s) | InferredValue::String(s) => {
                s.clone()
            }
            InferredValue::Raw(Value::Null) => String::new(),
            InferredValue::Raw(other) => other.to_string(),
        }
    }
}

impl fmt::Display for InferredValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_display())
    }
}

impl fmt::Display for InferredKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            InferredKind::Number => "number",
            InferredKind::DateTime => "datetime",
            InferredKind::Date => "date",
            InferredKind::String => "string",
            InferredKind::Raw => "raw",
        };
        f.write_str(label)
    }
}

pub struct Scalar<'a> {
    pub value: &'a Value,
    pub text: Cow<'a, str>,
}

impl<'a> Scalar<'a> {
    pub fn new(value: &'a Value) -> Self {
        let text = match value {
            Value::String(s) => Cow::Borrowed(s.as_str()),
            other => Cow::Owned(other.to_string()),
        };
        Self { value, text }
    }
}

#[derive(Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub apply: fn(&Scalar<'_>) -> Option<InferredValue>,
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule").field("name", &self.name).finish()
    }
}

/// Rules in priority order. The first match wins.
pub const RULES: [Rule; 5] = [
    Rule {
        name: "numeric-text",
        apply: numeric_text,
    },
    Rule {
        name: "datetime",
        apply: datetime_text,
    },
    Rule {
        name: "date",
        apply: date_text,
    },
    Rule {
        name: "json-string",
        apply: json_string,
    },
    Rule {
        name: "json-number",
        apply: json_number,
    },
];

pub fn classify(value: &Value) -> InferredValue {
    classify_with_rule(value).1
}

pub fn classify_with_rule(value: &Value) -> (&'static str, InferredValue) {
    let scalar = Scalar::new(value);
    RULES
        .iter()
        .find_map(|rule| (rule.apply)(&scalar).map(|inferred| (rule.name, inferred)))
        .unwrap_or_else(|| (FALLBACK_RULE, InferredValue::Raw(value.clone())))
}

fn numeric_text(scalar: &Scalar<'_>) -> Option<InferredValue> {
    if scalar.text.chars().count() >= NUMERIC_TEXT_MAX_LEN {
        return None;
    }
    // `inf`/`NaN` parse as floats but cannot be stored as numeric cells.
    scalar
        .text
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .map(InferredValue::Number)
}

fn datetime_text(scalar: &Scalar<'_>) -> Option<InferredValue> {
    if !has_shape(&scalar.text, DATETIME_SHAPE) {
        return None;
    }
    NaiveDateTime::parse_from_str(&scalar.text, DATETIME_INPUT_FORMAT)
        .ok()
        // chrono keeps `:60` as a leap second; the layout does not allow it.
        .filter(|dt| dt.nanosecond() < 1_000_000_000)
        .map(|dt| InferredValue::DateTime(dt.format(DATETIME_DISPLAY_FORMAT).to_string()))
}

fn date_text(scalar: &Scalar<'_>) -> Option<InferredValue> {
    if !has_shape(&scalar.text, DATE_SHAPE) {
        return None;
    }
    NaiveDate::parse_from_str(&scalar.text, DATE_INPUT_FORMAT)
        .ok()
        .map(|d| InferredValue::Date(d.format(DATE_DISPLAY_FORMAT).to_string()))
}

/// `9` stands for any ASCII digit; every other byte must match exactly.
fn has_shape(text: &str, shape: &str) -> bool {
    text.len() == shape.len()
        && text
            .bytes()
            .zip(shape.bytes())
            .all(|(b, want)| if want == b'9' { b.is_ascii_digit() } else { b == want })
}

fn json_string(scalar: &Scalar<'_>) -> Option<InferredValue> {
    match scalar.value {
        Value::String(s) => Some(InferredValue::String(s.clone())),
        _ => None,
    }
}

fn json_number(scalar: &Scalar<'_>) -> Option<InferredValue> {
    scalar
        .value
        .as_f64()
        .filter(|n| n.is_finite())
        .map(InferredValue::Number)
}
