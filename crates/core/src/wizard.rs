//! Multi-step form wizard.
//!
//! A form is a fixed, ordered list of steps. Navigation is linear forward and
//! back over the *visible* steps; a step is hidden when its skip condition
//! matches a value entered earlier (e.g. the lease details step when the
//! applicant owns the land).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoreError;
use crate::types::FormRecord;
use crate::validation::evaluator::validate_fields;
use crate::validation::rules::{FormRules, ValidationResult};

// ---------------------------------------------------------------------------
// Step definitions
// ---------------------------------------------------------------------------

/// Hide a step when `field` holds `equals` (trimmed, ASCII case-insensitive).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkipCondition {
    pub field: String,
    pub equals: String,
}

impl SkipCondition {
    pub fn new(field: &str, equals: &str) -> Self {
        Self {
            field: field.to_string(),
            equals: equals.to_string(),
        }
    }

    fn matches(&self, record: &FormRecord) -> bool {
        record
            .get(&self.field)
            .and_then(Value::as_str)
            .is_some_and(|v| v.trim().eq_ignore_ascii_case(&self.equals))
    }
}

/// One page of a multi-step form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormStep {
    pub id: String,
    pub title: String,
    pub fields: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_when: Option<SkipCondition>,
}

impl FormStep {
    pub fn new(id: &str, title: &str, fields: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            fields: fields.iter().map(|f| f.to_string()).collect(),
            skip_when: None,
        }
    }

    /// Attach a skip condition.
    pub fn skip_when(mut self, field: &str, equals: &str) -> Self {
        self.skip_when = Some(SkipCondition::new(field, equals));
        self
    }

    /// Whether this step is hidden for the current record.
    pub fn is_skipped(&self, record: &FormRecord) -> bool {
        self.skip_when
            .as_ref()
            .is_some_and(|cond| cond.matches(record))
    }
}

// ---------------------------------------------------------------------------
// Navigation
// ---------------------------------------------------------------------------

/// Indices of the steps shown for the current record, in order.
pub fn visible_steps(steps: &[FormStep], record: &FormRecord) -> Vec<usize> {
    steps
        .iter()
        .enumerate()
        .filter(|(_, step)| !step.is_skipped(record))
        .map(|(i, _)| i)
        .collect()
}

/// Names of every field on a visible step.
pub fn visible_fields<'a>(steps: &'a [FormStep], record: &FormRecord) -> Vec<&'a str> {
    visible_steps(steps, record)
        .into_iter()
        .flat_map(|i| steps[i].fields.iter().map(String::as_str))
        .collect()
}

/// The first visible step, if any.
pub fn first_step(steps: &[FormStep], record: &FormRecord) -> Option<usize> {
    visible_steps(steps, record).first().copied()
}

/// The next visible step after `current`, or `None` at the end.
pub fn next_step(steps: &[FormStep], current: usize, record: &FormRecord) -> Option<usize> {
    visible_steps(steps, record)
        .into_iter()
        .find(|&i| i > current)
}

/// The previous visible step before `current`, or `None` at the start.
pub fn previous_step(steps: &[FormStep], current: usize, record: &FormRecord) -> Option<usize> {
    visible_steps(steps, record)
        .into_iter()
        .rev()
        .find(|&i| i < current)
}

/// Whether `current` is the last visible step.
pub fn is_last_step(steps: &[FormStep], current: usize, record: &FormRecord) -> bool {
    next_step(steps, current, record).is_none()
}

fn check_index(steps: &[FormStep], index: usize, what: &str) -> Result<(), CoreError> {
    if index >= steps.len() {
        return Err(CoreError::Validation(format!(
            "{what} step {index} is out of range (0..{})",
            steps.len()
        )));
    }
    Ok(())
}

/// Validate a move between steps.
///
/// Only the adjacent visible step (forward or back) is reachable; moving to
/// a hidden step or jumping over visible ones is rejected.
pub fn validate_step_transition(
    steps: &[FormStep],
    current: usize,
    next: usize,
    record: &FormRecord,
) -> Result<(), CoreError> {
    check_index(steps, current, "Current")?;
    check_index(steps, next, "Next")?;

    if next_step(steps, current, record) == Some(next)
        || previous_step(steps, current, record) == Some(next)
    {
        return Ok(());
    }

    Err(CoreError::Validation(format!(
        "Cannot move from step {current} to step {next}. \
         Must advance or go back exactly one visible step."
    )))
}

/// Validate only the fields declared on step `index`.
pub fn validate_step(
    steps: &[FormStep],
    rules: &FormRules,
    index: usize,
    record: &FormRecord,
) -> Result<ValidationResult, CoreError> {
    check_index(steps, index, "Requested")?;
    let fields: Vec<&str> = steps[index].fields.iter().map(String::as_str).collect();
    Ok(validate_fields(record, rules, &fields))
}

/// Whether step `index` is valid enough to move forward.
pub fn can_advance(
    steps: &[FormStep],
    rules: &FormRules,
    index: usize,
    record: &FormRecord,
) -> bool {
    validate_step(steps, rules, index, record).is_ok_and(|r| r.is_valid)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::field_types::FieldType;
    use crate::validation::rules::FieldRule;
    use serde_json::json;

    fn steps() -> Vec<FormStep> {
        vec![
            FormStep::new("applicant", "Applicant", &["applicant_name", "mobile"]),
            FormStep::new("land", "Land Details", &["land_ownership", "survey_number"]),
            FormStep::new("lease", "Lease Details", &["lessor_name"])
                .skip_when("land_ownership", "own"),
            FormStep::new("bank", "Bank Details", &["ifsc_code"]),
        ]
    }

    fn rules() -> FormRules {
        [
            ("applicant_name", FieldRule::required(FieldType::Name)),
            ("mobile", FieldRule::required(FieldType::Mobile)),
            ("land_ownership", FieldRule::required(FieldType::Text)),
            ("survey_number", FieldRule::required(FieldType::Text)),
            ("lessor_name", FieldRule::required(FieldType::Name)),
            ("ifsc_code", FieldRule::required(FieldType::IfscCode)),
        ]
        .into_iter()
        .map(|(k, r)| (k.to_string(), r))
        .collect()
    }

    fn record(pairs: &[(&str, Value)]) -> FormRecord {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn all_steps_visible_without_answers() {
        assert_eq!(visible_steps(&steps(), &FormRecord::new()), vec![0, 1, 2, 3]);
    }

    #[test]
    fn lease_step_skipped_for_owned_land() {
        let r = record(&[("land_ownership", json!(" Own "))]);
        assert_eq!(visible_steps(&steps(), &r), vec![0, 1, 3]);
        assert_eq!(next_step(&steps(), 1, &r), Some(3));
        assert_eq!(previous_step(&steps(), 3, &r), Some(1));
        assert!(!visible_fields(&steps(), &r).contains(&"lessor_name"));
    }

    #[test]
    fn lease_step_shown_for_leased_land() {
        let r = record(&[("land_ownership", json!("leased"))]);
        assert_eq!(next_step(&steps(), 1, &r), Some(2));
    }

    #[test]
    fn navigation_ends() {
        let r = FormRecord::new();
        assert_eq!(first_step(&steps(), &r), Some(0));
        assert_eq!(previous_step(&steps(), 0, &r), None);
        assert_eq!(next_step(&steps(), 3, &r), None);
        assert!(is_last_step(&steps(), 3, &r));
        assert!(!is_last_step(&steps(), 2, &r));
    }

    #[test]
    fn transitions_adjacent_only() {
        let r = FormRecord::new();
        assert!(validate_step_transition(&steps(), 0, 1, &r).is_ok());
        assert!(validate_step_transition(&steps(), 1, 0, &r).is_ok());
        assert!(validate_step_transition(&steps(), 0, 2, &r).is_err());
        assert!(validate_step_transition(&steps(), 1, 1, &r).is_err());
    }

    #[test]
    fn transition_over_skipped_step() {
        let r = record(&[("land_ownership", json!("own"))]);
        assert!(validate_step_transition(&steps(), 1, 3, &r).is_ok());
        assert!(validate_step_transition(&steps(), 1, 2, &r).is_err());
    }

    #[test]
    fn transition_out_of_range() {
        let r = FormRecord::new();
        assert!(validate_step_transition(&steps(), 4, 3, &r).is_err());
        assert!(validate_step_transition(&steps(), 3, 4, &r).is_err());
    }

    #[test]
    fn step_validation_only_checks_its_fields() {
        let r = record(&[("applicant_name", json!("Sita Devi")), ("mobile", json!("9876543210"))]);
        let result = validate_step(&steps(), &rules(), 0, &r).unwrap();
        assert!(result.is_valid);
        assert!(can_advance(&steps(), &rules(), 0, &r));

        let result = validate_step(&steps(), &rules(), 3, &r).unwrap();
        assert_eq!(result.errors.keys().collect::<Vec<_>>(), vec!["ifsc_code"]);
        assert!(!can_advance(&steps(), &rules(), 3, &r));
    }

    #[test]
    fn step_validation_out_of_range() {
        assert!(validate_step(&steps(), &rules(), 9, &FormRecord::new()).is_err());
        assert!(!can_advance(&steps(), &rules(), 9, &FormRecord::new()));
    }
}
