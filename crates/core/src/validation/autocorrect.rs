//! Idempotent normalizers applied to text-like fields before validation.
//!
//! Applying any normalizer twice yields the same result as applying it once.

use serde_json::Value;

use super::field_types::FieldType;
use super::rules::FormRules;
use crate::types::FormRecord;

/// Trim and lowercase.
pub fn email(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Collapse runs of internal whitespace to one space and trim.
pub fn name(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Keep ASCII digits only.
pub fn digits(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

/// Digits only, with a leading `91` country code or `0` trunk prefix
/// dropped when what remains is a 10-digit number.
pub fn phone(value: &str) -> String {
    let d = digits(value);
    if d.len() == 12 && d.starts_with("91") {
        return d[2..].to_string();
    }
    if d.len() == 11 && d.starts_with('0') {
        return d[1..].to_string();
    }
    d
}

/// Trim and uppercase (bank routing codes, PAN).
pub fn upper_code(value: &str) -> String {
    value.trim().to_uppercase()
}

/// Normalize a value according to its declared kind.
///
/// Kinds without a normalizer are only trimmed.
pub fn auto_correct(field_type: FieldType, value: &str) -> String {
    match field_type {
        FieldType::Email => email(value),
        FieldType::Name => name(value),
        FieldType::Mobile => phone(value),
        FieldType::Aadhaar | FieldType::Pincode | FieldType::BankAccount => digits(value),
        FieldType::IfscCode | FieldType::Pan => upper_code(value),
        FieldType::Address => name(value),
        _ => value.trim().to_string(),
    }
}

/// Apply [`auto_correct`] to every string field that has a text-like rule.
///
/// Non-string values and fields without a rule are left untouched.
pub fn auto_correct_record(record: &FormRecord, rules: &FormRules) -> FormRecord {
    record
        .iter()
        .map(|(field, value)| {
            let corrected = match (value, rules.get(field)) {
                (Value::String(s), Some(rule)) if rule.field_type.is_text_like() => {
                    Value::String(auto_correct(rule.field_type, s))
                }
                _ => value.clone(),
            };
            (field.clone(), corrected)
        })
        .collect()
}
