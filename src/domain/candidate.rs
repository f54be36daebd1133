//! Untrusted candidates from the extraction provider.
//!
//! The provider is an LLM; its output is decoded field by field into typed
//! optionals. A field that is missing, null, or of the wrong JSON type
//! decodes as absent. Nothing here fails.

use serde_json::{Map, Value};

/// Decoded view of the `amount` field
#[derive(Debug, Clone, PartialEq)]
pub enum AmountField {
    /// Field absent or null
    Missing,
    /// Present but not readable as a number
    Unparseable(String),
    /// Parsed value, not yet range-checked (may be negative, zero, NaN)
    Value(f64),
}

/// One provider record, decoded but not yet validated
#[derive(Debug, Clone, PartialEq)]
pub struct RawCandidate {
    pub kind_label: Option<String>,
    pub amount: AmountField,
    pub category: Option<String>,
    pub account: Option<String>,
    pub description: Option<String>,
    pub datetime: Option<String>,
    pub to_account: Option<String>,
}

impl RawCandidate {
    /// Decode an arbitrary JSON value. Non-objects yield an all-absent record.
    pub fn decode(value: &Value) -> Self {
        let empty = Map::new();
        let fields = value.as_object().unwrap_or(&empty);

        Self {
            kind_label: string_field(fields, "type"),
            amount: amount_field(fields.get("amount")),
            category: string_field(fields, "category"),
            account: string_field(fields, "account"),
            description: string_field(fields, "description"),
            datetime: string_field(fields, "datetime"),
            to_account: string_field(fields, "toAccount"),
        }
    }
}

fn string_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields.get(key).and_then(Value::as_str).map(str::to_string)
}

fn amount_field(value: Option<&Value>) -> AmountField {
    match value {
        None | Some(Value::Null) => AmountField::Missing,
        // Out-of-range literals like 1e400 keep their text; they parse to infinity
        Some(Value::Number(n)) => match n.as_f64() {
            Some(v) => AmountField::Value(v),
            None => match n.to_string().parse::<f64>() {
                Ok(v) => AmountField::Value(v),
                Err(_) => AmountField::Unparseable(n.to_string()),
            },
        },
        Some(Value::String(s)) => match s.trim().parse::<f64>() {
            Ok(v) => AmountField::Value(v),
            Err(_) => AmountField::Unparseable(s.clone()),
        },
        Some(other) => AmountField::Unparseable(other.to_string()),
    }
}
