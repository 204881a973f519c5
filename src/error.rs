//! Error type, formatting and utilities.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::{path::FieldPath, shape::ValueKind};

/// Reason a value does not match its shape
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IssueKind {
    /// A required field is absent
    #[error("missing required field, expected {expected}")]
    Missing { expected: String },
    /// The value is of the wrong kind
    #[error("expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: ValueKind },
    /// None of the alternatives of a union accepted the value
    #[error("expected {expected}, found {found}, no alternative matches")]
    NoMatchingAlternative { expected: String, found: ValueKind },
    /// A string that must have content is empty
    #[error("expected a non-empty string")]
    Empty,
    /// The key is not part of the shape
    ///
    /// Only produced as a warning, see [`Checks::UNKNOWN_FIELDS`](crate::Checks::UNKNOWN_FIELDS).
    #[error("unknown field")]
    UnknownField,
    /// The input could not be decoded at all
    #[error("malformed document: {message}")]
    Malformed { message: String },
}

/// A single problem found at a location of the document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    /// Where the problem is
    pub path: FieldPath,
    /// What the problem is
    pub kind: IssueKind,
}

impl Issue {
    pub(crate) fn new(path: FieldPath, kind: IssueKind) -> Self {
        Self { path, kind }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "at `{}`: {}", self.path, self.kind)
    }
}

impl std::error::Error for Issue {}

/// A value did not match the shape of a schema
///
/// Holds every [`Issue`] found, never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationFailure {
    schema: &'static str,
    issues: Vec<Issue>,
}

impl ValidationFailure {
    pub(crate) fn new(schema: &'static str, issues: Vec<Issue>) -> Self {
        debug_assert!(!issues.is_empty(), "a failure needs at least one issue");
        Self { schema, issues }
    }

    /// Name of the schema the value was validated against
    pub fn schema(&self) -> &'static str {
        self.schema
    }

    /// All the issues
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    /// Transform into the list of issues
    pub fn into_issues(self) -> Vec<Issue> {
        self.issues
    }

    /// First issue at the given path, in its displayed form (`steps[0].instruction`)
    pub fn issue_at(&self, path: &str) -> Option<&Issue> {
        self.issues.iter().find(|i| i.path.to_string() == path)
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let [issue] = self.issues.as_slice() {
            return write!(f, "invalid {}: {issue}", self.schema);
        }
        writeln!(f, "invalid {}: {} issues", self.schema, self.issues.len())?;
        for issue in &self.issues {
            writeln!(f, "  {issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationFailure {}

/// Output of a validation
///
/// Holds either the typed output or the failure, plus the warnings found
/// along the way. Use [`Outcome::into_result`] to get a common rust
/// [`Result`].
#[derive(Debug)]
pub struct Outcome<T> {
    result: Result<T, ValidationFailure>,
    warnings: Vec<Issue>,
}

impl<T> Outcome<T> {
    pub(crate) fn accepted(output: T, warnings: Vec<Issue>) -> Self {
        Self {
            result: Ok(output),
            warnings,
        }
    }

    pub(crate) fn rejected(failure: ValidationFailure, warnings: Vec<Issue>) -> Self {
        Self {
            result: Err(failure),
            warnings,
        }
    }

    /// Check if the value was accepted
    pub fn is_valid(&self) -> bool {
        self.result.is_ok()
    }

    /// Check if the outcome has warnings
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Get the output
    pub fn output(&self) -> Option<&T> {
        self.result.as_ref().ok()
    }

    /// Get the warnings
    pub fn warnings(&self) -> &[Issue] {
        &self.warnings
    }

    /// Get the failure
    pub fn failure(&self) -> Option<&ValidationFailure> {
        self.result.as_ref().err()
    }

    /// Transform into a common rust [`Result`]
    pub fn into_result(self) -> Result<(T, Vec<Issue>), ValidationFailure> {
        let warnings = self.warnings;
        self.result.map(|output| (output, warnings))
    }

    /// Transform into the output discarding warnings and failure
    pub fn into_output(self) -> Option<T> {
        self.result.ok()
    }

    /// Transform into the failure, if any
    pub fn into_failure(self) -> Option<ValidationFailure> {
        self.result.err()
    }

    /// Map the inner output
    pub fn map<F, O>(self, f: F) -> Outcome<O>
    where
        F: FnOnce(T) -> O,
    {
        Outcome {
            result: self.result.map(f),
            warnings: self.warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(keys: &[&str], kind: IssueKind) -> Issue {
        Issue::new(keys.iter().copied().collect(), kind)
    }

    #[test]
    fn single_issue_display() {
        let failure = ValidationFailure::new(
            "Recipe",
            vec![issue(
                &["id"],
                IssueKind::TypeMismatch {
                    expected: "integer".into(),
                    found: ValueKind::String,
                },
            )],
        );
        assert_eq!(
            failure.to_string(),
            "invalid Recipe: at `id`: expected integer, found string"
        );
        assert!(failure.issue_at("id").is_some());
        assert!(failure.issue_at("name").is_none());
    }

    #[test]
    fn many_issues_display() {
        let failure = ValidationFailure::new(
            "Food",
            vec![
                issue(
                    &["id"],
                    IssueKind::Missing {
                        expected: "integer".into(),
                    },
                ),
                issue(
                    &["name"],
                    IssueKind::Missing {
                        expected: "string".into(),
                    },
                ),
            ],
        );
        let text = failure.to_string();
        assert!(text.starts_with("invalid Food: 2 issues\n"));
        assert!(text.contains("at `id`: missing required field, expected integer"));
        assert!(text.contains("at `name`: missing required field, expected string"));
    }

    #[test]
    fn outcome_into_result() {
        let ok = Outcome::accepted(3, vec![]);
        assert!(ok.is_valid());
        assert_eq!(ok.map(|n| n * 2).into_result().unwrap().0, 6);

        let failure = ValidationFailure::new("Unit", vec![issue(&["name"], IssueKind::Empty)]);
        let bad: Outcome<i32> = Outcome::rejected(failure.clone(), vec![]);
        assert!(!bad.is_valid());
        assert_eq!(bad.into_result().unwrap_err(), failure);
    }
}
