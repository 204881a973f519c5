//! Validating schemas and typed models for a recipe and meal planning API.
//!
//! This crate sits between the HTTP layer and the application. It takes the
//! untyped JSON the API answers with (or the payload about to be sent) and
//! turns it into typed values, or into a [`ValidationFailure`] listing every
//! problem with the path where it was found.
//!
//! Includes:
//! - Typed entities, see [`model`].
//! - Paginated and plain list responses, see [`envelope`].
//! - Request payloads, see [`payload`].
//! - A registry with the [`Shape`] of all of them, see [`registry`].
//!
//! # Basic usage
//! If you just want **to validate a single** document, see [`validate`].
//!
//! ```rust
//! # use recipe_schema::Recipe;
//! # use serde_json::json;
//! let input = json!({
//!     "id": 1,
//!     "name": "Soup",
//!     "steps": [{
//!         "instruction": "Boil",
//!         "ingredients": [{"amount": "2", "food": {"name": "Carrot"}}]
//!     }]
//! });
//! let recipe: Recipe = recipe_schema::validate(&input)?;
//! let food = recipe.steps()[0].ingredients.as_ref().unwrap()[0].food.as_ref().unwrap();
//! assert_eq!(food.name.as_deref(), Some("Carrot"));
//! assert_eq!(food.id, None);
//! # Ok::<(), recipe_schema::ValidationFailure>(())
//! ```
//!
//! To enable extra [`Checks`], construct a [`Validator`] yourself.
//!
//! ```rust
//! # use recipe_schema::{Checks, Food, Validator};
//! # use serde_json::json;
//! let validator = Validator::new(Checks::UNKNOWN_FIELDS);
//! let outcome = validator.validate::<Food>(&json!({"id": 1, "name": "Salt", "color": "white"}));
//! assert!(outcome.is_valid());
//! assert_eq!(outcome.warnings()[0].path.to_string(), "color");
//! ```

#![warn(rustdoc::broken_intra_doc_links, clippy::doc_markdown)]

pub mod envelope;
pub mod error;
pub mod model;
pub mod path;
pub mod payload;
pub mod registry;
pub mod shape;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use error::{Issue, IssueKind};
use shape::Findings;

pub use envelope::{
    FoodList, KeywordList, MealPlanList, Page, RecipeList, ShoppingList, UnitList,
};
pub use error::{Outcome, ValidationFailure};
pub use model::*;
pub use path::FieldPath;
pub use payload::{
    AddShoppingItemPayload, CreateMealPlanPayload, CreateRecipePayload,
    UpdateShoppingItemPayload,
};
pub use registry::{Schema, SchemaId};
pub use shape::{ObjectShape, Shape, ValueKind};

bitflags! {
    /// Optional checks
    ///
    /// Checks never change what is accepted, they only add warnings.
    ///
    /// [`Checks::default`] enables none.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Checks: u32 {
        /// Warn about object keys that are not part of the shape
        ///
        /// These keys are dropped from the typed value.
        const UNKNOWN_FIELDS = 1 << 0;
    }
}

impl Default for Checks {
    /// Enables no checks
    fn default() -> Self {
        Self::empty()
    }
}

/// A validator
///
/// Holds no state besides its configuration, so it is cheap to copy and can
/// be shared between threads.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Validator {
    checks: Checks,
}

impl Validator {
    /// Creates a new validator
    pub fn new(checks: Checks) -> Self {
        Self { checks }
    }

    /// Get the enabled checks
    pub fn checks(&self) -> Checks {
        self.checks
    }

    /// Validate a value and convert it to `T`
    #[tracing::instrument(level = "debug", name = "validate", skip_all, fields(schema = T::NAME))]
    pub fn validate<T: Schema>(&self, value: &Value) -> Outcome<T> {
        let findings = self.inspect(T::shape(), value);
        if !findings.errors.is_empty() {
            return reject(T::NAME, findings.errors, findings.warnings);
        }

        match T::deserialize(value) {
            Ok(output) => {
                if !findings.warnings.is_empty() {
                    tracing::debug!(warnings = findings.warnings.len(), "accepted with warnings");
                }
                Outcome::accepted(output, findings.warnings)
            }
            Err(e) => {
                // the shape accepted something the typed model does not
                tracing::warn!(error = %e, "shape and model disagree");
                let issue = Issue::new(
                    FieldPath::root(),
                    IssueKind::Malformed {
                        message: e.to_string(),
                    },
                );
                reject(T::NAME, vec![issue], findings.warnings)
            }
        }
    }

    /// Same as [`Self::validate`] but decodes the JSON text first
    #[tracing::instrument(level = "debug", name = "validate_str", skip_all, fields(schema = T::NAME))]
    pub fn validate_str<T: Schema>(&self, input: &str) -> Outcome<T> {
        match serde_json::from_str::<Value>(input) {
            Ok(value) => self.validate(&value),
            Err(e) => {
                let issue = Issue::new(
                    FieldPath::root(),
                    IssueKind::Malformed {
                        message: e.to_string(),
                    },
                );
                reject(T::NAME, vec![issue], vec![])
            }
        }
    }

    /// Check a value against a schema picked at runtime
    ///
    /// There is no typed output. Returns the warnings if the value is
    /// accepted.
    #[tracing::instrument(level = "debug", name = "validate_dynamic", skip(self, value))]
    pub fn validate_dynamic(
        &self,
        schema: SchemaId,
        value: &Value,
    ) -> Result<Vec<Issue>, ValidationFailure> {
        let findings = self.inspect(schema.shape(), value);
        if findings.errors.is_empty() {
            Ok(findings.warnings)
        } else {
            tracing::debug!(issues = findings.errors.len(), "rejected");
            Err(ValidationFailure::new(schema.name(), findings.errors))
        }
    }

    /// Check a typed value against its own shape
    ///
    /// Useful before sending a payload built by hand. Returns the warnings
    /// if the value is accepted.
    #[tracing::instrument(level = "debug", name = "check", skip_all, fields(schema = T::NAME))]
    pub fn check<T: Schema>(&self, value: &T) -> Result<Vec<Issue>, ValidationFailure> {
        let value = value.to_value().map_err(|e| {
            let issue = Issue::new(
                FieldPath::root(),
                IssueKind::Malformed {
                    message: e.to_string(),
                },
            );
            ValidationFailure::new(T::NAME, vec![issue])
        })?;
        let findings = self.inspect(T::shape(), &value);
        if findings.errors.is_empty() {
            Ok(findings.warnings)
        } else {
            tracing::debug!(issues = findings.errors.len(), "rejected");
            Err(ValidationFailure::new(T::NAME, findings.errors))
        }
    }

    fn inspect(&self, shape: &Shape, value: &Value) -> Findings {
        let mut findings = Findings::new(self.checks.contains(Checks::UNKNOWN_FIELDS));
        shape.check_at(value, &FieldPath::root(), &mut findings);
        findings
    }
}

fn reject<T>(schema: &'static str, errors: Vec<Issue>, warnings: Vec<Issue>) -> Outcome<T> {
    tracing::debug!(issues = errors.len(), "rejected");
    Outcome::rejected(ValidationFailure::new(schema, errors), warnings)
}

/// Validate a value with a default [`Validator`]
///
/// Warnings are discarded, use [`Validator::validate`] to get them.
pub fn validate<T: Schema>(value: &Value) -> Result<T, ValidationFailure> {
    Validator::default()
        .validate(value)
        .into_result()
        .map(|(output, _)| output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn malformed_text() {
        let outcome = Validator::default().validate_str::<Food>("{\"id\": 1,");
        let failure = outcome.into_failure().unwrap();
        assert_eq!(failure.schema(), "Food");
        assert!(matches!(
            failure.issues()[0].kind,
            IssueKind::Malformed { .. }
        ));
        assert!(failure.issues()[0].path.is_root());
    }

    #[test]
    fn valid_text() {
        let outcome = Validator::default()
            .validate_str::<Food>(r#"{"id": 1, "name": "Salt", "description": "fine"}"#);
        let food = outcome.into_output().unwrap();
        assert_eq!(food.id, 1);
        assert_eq!(food.description.as_deref(), Some("fine"));
    }

    #[test]
    fn dynamic() {
        let validator = Validator::default();
        let food = json!({"id": 1, "name": "Salt"});
        assert!(validator.validate_dynamic(SchemaId::Food, &food).is_ok());
        assert!(validator.validate_dynamic(SchemaId::PartialFood, &json!({})).is_ok());
        let failure = validator
            .validate_dynamic(SchemaId::Food, &json!({}))
            .unwrap_err();
        assert_eq!(failure.schema(), "Food");
        assert_eq!(failure.issues().len(), 2);
    }

    #[test]
    fn warnings_only_when_enabled() {
        let value = json!({"id": 1, "name": "Salt", "extra": true});
        let quiet = Validator::default().validate::<Food>(&value);
        assert!(quiet.is_valid());
        assert!(!quiet.has_warnings());

        let loud = Validator::new(Checks::UNKNOWN_FIELDS).validate::<Food>(&value);
        let (food, warnings) = loud.into_result().unwrap();
        assert_eq!(food.name, "Salt");
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn dotted_unknown_key_is_not_a_nested_path() {
        let value = json!({"id": 1, "name": "Salt", "name.extra": true});
        let (_, warnings) = Validator::new(Checks::UNKNOWN_FIELDS)
            .validate::<Food>(&value)
            .into_result()
            .unwrap();
        assert_eq!(warnings[0].path.to_string(), r#"["name.extra"]"#);
        assert_eq!(warnings[0].path.last_key(), Some("name.extra"));
    }

    #[test]
    fn check_empty_instruction() {
        let payload = CreateRecipePayload {
            name: "Toast".into(),
            description: None,
            servings: None,
            steps: vec![payload::NewStep {
                instruction: String::new(),
                ingredients: vec![],
            }],
        };
        let failure = Validator::default().check(&payload).unwrap_err();
        assert_eq!(
            failure.issue_at("steps[0].instruction").map(|i| &i.kind),
            Some(&IssueKind::Empty)
        );
    }
}
