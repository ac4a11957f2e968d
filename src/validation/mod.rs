//! Field rules for candidate records and the classification of their
//! failures into missing-field (400) and invalid-value (422) errors.
//!
//! A candidate is the JSON object a record would be stored as. Rules run in
//! declaration order and every failing rule yields one [`Violation`].

use serde::Serialize;
use serde_json::{Map, Value};
use time::Date;

use crate::error::{LibraryError, LibraryResult};
use crate::utils::parse_calendar_date;

pub type Candidate = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RuleKind {
    /// Field is neither absent nor null
    Presence,
    /// Field holds text; absent values are left to a presence rule
    IsString,
    /// Field holds a calendar date; absent values fail
    IsDate,
}

#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub field: &'static str,
    pub kind: RuleKind,
    pub message: &'static str,
}

impl Rule {
    pub const fn presence(field: &'static str, message: &'static str) -> Self {
        Self {
            field,
            kind: RuleKind::Presence,
            message,
        }
    }

    pub const fn string(field: &'static str, message: &'static str) -> Self {
        Self {
            field,
            kind: RuleKind::IsString,
            message,
        }
    }

    pub const fn date(field: &'static str, message: &'static str) -> Self {
        Self {
            field,
            kind: RuleKind::IsDate,
            message,
        }
    }

    fn holds(&self, candidate: &Candidate) -> bool {
        let value = candidate.get(self.field).filter(|value| !value.is_null());
        match (self.kind, value) {
            (RuleKind::Presence, value) => value.is_some(),
            (RuleKind::IsString, None) => true,
            (RuleKind::IsString, Some(value)) => value.is_string(),
            (RuleKind::IsDate, value) => value
                .and_then(Value::as_str)
                .and_then(parse_calendar_date)
                .is_some(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub field: &'static str,
    pub rule: RuleKind,
    pub message: &'static str,
}

/// Run every rule against the candidate, in order.
pub fn validate(candidate: &Candidate, rules: &[Rule]) -> Vec<Violation> {
    rules
        .iter()
        .filter(|rule| !rule.holds(candidate))
        .map(|rule| Violation {
            field: rule.field,
            rule: rule.kind,
            message: rule.message,
        })
        .collect()
}

/// Turn violations into the error the request fails with.
///
/// Presence failures win: when any is present only their messages are
/// reported. Otherwise messages are joined per field with `", "` and
/// fields with `"; "`.
pub fn classify(violations: Vec<Violation>) -> LibraryResult<()> {
    if violations.is_empty() {
        return Ok(());
    }

    let missing: Vec<Violation> = violations
        .iter()
        .filter(|violation| violation.rule == RuleKind::Presence)
        .cloned()
        .collect();

    if !missing.is_empty() {
        let message = missing
            .iter()
            .map(|violation| violation.message)
            .collect::<Vec<_>>()
            .join(", ");
        return Err(LibraryError::MissingFields {
            message,
            violations: missing,
        });
    }

    let mut per_field: Vec<(&str, Vec<&str>)> = Vec::new();
    for violation in &violations {
        match per_field.iter_mut().find(|(field, _)| *field == violation.field) {
            Some((_, messages)) => messages.push(violation.message),
            None => per_field.push((violation.field, vec![violation.message])),
        }
    }

    let message = per_field
        .iter()
        .map(|(_, messages)| messages.join(", "))
        .collect::<Vec<_>>()
        .join("; ");

    Err(LibraryError::InvalidValue {
        message,
        violations,
    })
}

pub fn check(candidate: &Candidate, rules: &[Rule]) -> LibraryResult<()> {
    classify(validate(candidate, rules))
}

/// Reject anything but a single JSON object.
pub fn require_object(input: &Value) -> LibraryResult<&Candidate> {
    match input {
        Value::Object(map) => Ok(map),
        Value::Array(_) => Err(LibraryError::BadRequest(
            "Body should not be an array".to_string(),
        )),
        _ => Err(LibraryError::BadRequest(
            "Body should be a JSON object".to_string(),
        )),
    }
}

/// Copy the listed fields that are present in `input` (nulls included).
pub fn pick(input: &Candidate, fields: &[&str]) -> Candidate {
    let mut candidate = Candidate::new();
    overlay(&mut candidate, input, fields);
    candidate
}

/// Overwrite `target` with the listed fields that are present in `input`.
pub fn overlay(target: &mut Candidate, input: &Candidate, fields: &[&str]) {
    for field in fields {
        if let Some(value) = input.get(*field) {
            target.insert((*field).to_string(), value.clone());
        }
    }
}

/// Read a text field from a candidate that already passed validation.
pub fn text(candidate: &Candidate, field: &'static str) -> LibraryResult<String> {
    candidate
        .get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| unreadable(field))
}

/// Read a date field from a candidate that already passed validation.
pub fn date(candidate: &Candidate, field: &'static str) -> LibraryResult<Date> {
    candidate
        .get(field)
        .and_then(Value::as_str)
        .and_then(parse_calendar_date)
        .ok_or_else(|| unreadable(field))
}

fn unreadable(field: &'static str) -> LibraryError {
    LibraryError::InvalidValue {
        message: format!("{field} has an unexpected value"),
        violations: Vec::new(),
    }
}
