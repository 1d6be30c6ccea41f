//! Rule evaluator. Pure logic, no I/O.

use std::collections::BTreeMap;

use serde_json::Value;

use super::field_types::FieldType;
use super::rules::{FieldError, FormRules, ValidationResult};
use crate::types::FormRecord;

/// Whether a value counts as "not provided".
///
/// Missing, `null`, blank/whitespace strings and empty lists are empty.
pub fn is_empty_value(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(Value::Object(map)) => map.is_empty(),
        Some(Value::Number(_)) | Some(Value::Bool(_)) => false,
    }
}

/// Scalar text of a value, trimmed. Lists and objects have none.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Validate a single value against a declared kind.
///
/// An empty value yields [`FieldError::Required`] when `required` and no
/// error otherwise; the type check only runs on non-empty values.
pub fn validate_field(
    value: Option<&Value>,
    field_type: FieldType,
    required: bool,
) -> Option<FieldError> {
    if is_empty_value(value) {
        return required.then_some(FieldError::Required);
    }
    let value = value?;

    let accepted = match scalar_text(value) {
        Some(text) => field_type.accepts(&text),
        // Repeatable groups only need to be present.
        None => field_type == FieldType::Text,
    };

    if accepted {
        None
    } else {
        Some(FieldError::Invalid(field_type))
    }
}

/// [`validate_field`] for a plain string input.
pub fn validate_str(value: &str, field_type: FieldType, required: bool) -> Option<FieldError> {
    validate_field(Some(&Value::String(value.to_string())), field_type, required)
}

/// Validate every declared rule against the record.
///
/// Record keys without a rule are ignored.
pub fn validate_form(record: &FormRecord, rules: &FormRules) -> ValidationResult {
    let errors: BTreeMap<String, String> = rules
        .iter()
        .filter_map(|(field, rule)| {
            validate_field(record.get(field), rule.field_type, rule.required)
                .map(|err| (field.clone(), err.message().to_string()))
        })
        .collect();

    ValidationResult::from_errors(errors)
}

/// [`validate_form`] restricted to the named fields.
pub fn validate_fields(record: &FormRecord, rules: &FormRules, fields: &[&str]) -> ValidationResult {
    let subset: FormRules = rules
        .iter()
        .filter(|(name, _)| fields.contains(&name.as_str()))
        .map(|(name, rule)| (name.clone(), *rule))
        .collect();
    validate_form(record, &subset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::rules::{FieldRule, REQUIRED_MESSAGE};
    use assert_matches::assert_matches;
    use serde_json::json;

    fn record(pairs: &[(&str, Value)]) -> FormRecord {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn rules(pairs: &[(&str, FieldRule)]) -> FormRules {
        pairs.iter().map(|(k, r)| (k.to_string(), *r)).collect()
    }

    #[test]
    fn empty_required_is_required_error_for_every_type() {
        for t in FieldType::ALL {
            assert_eq!(validate_str("", t, true), Some(FieldError::Required), "{t}");
            assert_eq!(validate_str("   ", t, true), Some(FieldError::Required), "{t}");
        }
    }

    #[test]
    fn empty_optional_is_valid_for_every_type() {
        for t in FieldType::ALL {
            assert_eq!(validate_str("", t, false), None, "{t}");
            assert_eq!(validate_field(None, t, false), None, "{t}");
            assert_eq!(validate_field(Some(&Value::Null), t, false), None, "{t}");
        }
    }

    #[test]
    fn mobile_examples() {
        assert_eq!(validate_str("9876543210", FieldType::Mobile, true), None);
        assert_eq!(
            validate_str("1234567890", FieldType::Mobile, true),
            Some(FieldError::Invalid(FieldType::Mobile))
        );
    }

    #[test]
    fn aadhaar_examples() {
        assert_eq!(validate_str("123456789012", FieldType::Aadhaar, true), None);
        assert_matches!(
            validate_str("12345", FieldType::Aadhaar, true),
            Some(FieldError::Invalid(FieldType::Aadhaar))
        );
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        assert_eq!(validate_str(" 560001 ", FieldType::Pincode, true), None);
    }

    #[test]
    fn numbers_are_checked_as_text() {
        assert_eq!(validate_field(Some(&json!(1500.5)), FieldType::Amount, true), None);
        assert_eq!(validate_field(Some(&json!(42)), FieldType::Age, true), None);
        assert_matches!(
            validate_field(Some(&json!(-1)), FieldType::Amount, true),
            Some(FieldError::Invalid(_))
        );
    }

    #[test]
    fn optional_but_present_is_type_checked() {
        assert_matches!(
            validate_str("abc", FieldType::Email, false),
            Some(FieldError::Invalid(FieldType::Email))
        );
    }

    #[test]
    fn repeatable_groups() {
        let members = json!([{ "name": "Sita" }]);
        assert_eq!(validate_field(Some(&members), FieldType::Text, true), None);
        assert_eq!(
            validate_field(Some(&json!([])), FieldType::Text, true),
            Some(FieldError::Required)
        );
        assert_matches!(
            validate_field(Some(&members), FieldType::Mobile, true),
            Some(FieldError::Invalid(FieldType::Mobile))
        );
    }

    #[test]
    fn form_with_one_failing_required_field() {
        let r = record(&[
            ("applicant_name", json!("Ramesh Kumar")),
            ("mobile", json!("9876543210")),
            ("aadhaar", json!("")),
        ]);
        let rs = rules(&[
            ("applicant_name", FieldRule::required(FieldType::Name)),
            ("mobile", FieldRule::required(FieldType::Mobile)),
            ("aadhaar", FieldRule::required(FieldType::Aadhaar)),
        ]);
        let result = validate_form(&r, &rs);
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors["aadhaar"], REQUIRED_MESSAGE);
    }

    #[test]
    fn form_all_valid() {
        let r = record(&[("email", json!("a@b.in")), ("extra", json!("ignored"))]);
        let rs = rules(&[
            ("email", FieldRule::required(FieldType::Email)),
            ("pincode", FieldRule::optional(FieldType::Pincode)),
        ]);
        let result = validate_form(&r, &rs);
        assert!(result.is_valid);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn missing_record_key_for_required_rule() {
        let result = validate_form(
            &FormRecord::new(),
            &rules(&[("mobile", FieldRule::required(FieldType::Mobile))]),
        );
        assert_eq!(result.errors.keys().collect::<Vec<_>>(), vec!["mobile"]);
    }

    #[test]
    fn validate_fields_restricts_to_subset() {
        let rs = rules(&[
            ("mobile", FieldRule::required(FieldType::Mobile)),
            ("email", FieldRule::required(FieldType::Email)),
        ]);
        let result = validate_fields(&FormRecord::new(), &rs, &["email"]);
        assert_eq!(result.errors.keys().collect::<Vec<_>>(), vec!["email"]);
    }
}
