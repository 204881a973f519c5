//! Shape descriptors and the structural checker
//!
//! A [`Shape`] describes what an untyped JSON value must look like. Checking a
//! value never stops at the first problem, every [`Issue`] is collected with
//! the [`FieldPath`] where it was found.
//!
//! ```rust
//! # use recipe_schema::shape::{ObjectShape, Shape};
//! # use serde_json::json;
//! let food = ObjectShape::new()
//!     .required("id", Shape::Integer)
//!     .required("name", Shape::string());
//!
//! assert!(Shape::from(food.clone()).accepts(&json!({"id": 1, "name": "Carrot"})));
//! assert!(!Shape::from(food.clone()).accepts(&json!({})));
//! // every field becomes optional
//! assert!(Shape::from(food.partial()).accepts(&json!({})));
//! ```

use std::fmt::{self, Display};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    error::{Issue, IssueKind},
    path::FieldPath,
};

/// Kind of an untyped JSON value
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ValueKind {
    Null,
    Boolean,
    Number,
    String,
    Array,
    Object,
}

impl ValueKind {
    /// Get the kind of a value
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Boolean,
            Value::Number(_) => Self::Number,
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Object,
        }
    }
}

/// Declarative description of a value
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// A string, optionally required to have content
    String { non_empty: bool },
    /// Any number
    Number,
    /// A number representable as an `i64`
    ///
    /// Numbers written with a fraction, even `1.0`, are not integers.
    Integer,
    Boolean,
    /// Anything, including `null`
    Unknown,
    /// The inner shape or `null`
    Nullable(Box<Shape>),
    /// An array where every element has the inner shape
    Array(Box<Shape>),
    /// One of the alternatives, tried in order
    Union(Vec<Shape>),
    Object(ObjectShape),
}

impl Shape {
    /// Any string
    pub fn string() -> Self {
        Self::String { non_empty: false }
    }

    /// A string with at least one character
    pub fn non_empty_string() -> Self {
        Self::String { non_empty: true }
    }

    /// The amount union used on read paths, a string or a number
    pub fn string_or_number() -> Self {
        Self::Union(vec![Self::string(), Self::Number])
    }

    /// Array of `item`
    pub fn array_of(item: impl Into<Shape>) -> Self {
        Self::Array(Box::new(item.into()))
    }

    /// This shape or `null`
    pub fn nullable(self) -> Self {
        Self::Nullable(Box::new(self))
    }

    /// The object shape, if this is one
    pub fn as_object(&self) -> Option<&ObjectShape> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Human readable expectation, used in issues
    pub fn describe(&self) -> String {
        match self {
            Self::String { non_empty: false } => "string".into(),
            Self::String { non_empty: true } => "non-empty string".into(),
            Self::Number => "number".into(),
            Self::Integer => "integer".into(),
            Self::Boolean => "boolean".into(),
            Self::Unknown => "any value".into(),
            Self::Nullable(inner) => format!("{} or null", inner.describe()),
            Self::Array(item) => format!("array of {}", item.describe()),
            Self::Union(alternatives) => alternatives
                .iter()
                .map(Shape::describe)
                .collect::<Vec<_>>()
                .join(" | "),
            Self::Object(_) => "object".into(),
        }
    }

    /// Check a value, returning every issue found
    ///
    /// An empty list means the value is accepted. Unknown object keys are
    /// never an issue here.
    pub fn check(&self, value: &Value) -> Vec<Issue> {
        let mut findings = Findings::new(false);
        self.check_at(value, &FieldPath::root(), &mut findings);
        findings.errors
    }

    /// Check if the value is accepted
    pub fn accepts(&self, value: &Value) -> bool {
        self.check(value).is_empty()
    }

    pub(crate) fn check_at(&self, value: &Value, path: &FieldPath, out: &mut Findings) {
        let mismatch = |out: &mut Findings| {
            out.error(
                path.clone(),
                IssueKind::TypeMismatch {
                    expected: self.describe(),
                    found: ValueKind::of(value),
                },
            )
        };

        match (self, value) {
            (Self::Unknown, _) => {}
            (Self::String { non_empty }, Value::String(s)) => {
                if *non_empty && s.is_empty() {
                    out.error(path.clone(), IssueKind::Empty);
                }
            }
            (Self::Number, Value::Number(_)) => {}
            (Self::Integer, Value::Number(n)) if n.as_i64().is_some() => {}
            (Self::Boolean, Value::Bool(_)) => {}
            (Self::Nullable(_), Value::Null) => {}
            (Self::Nullable(inner), _) => {
                // report against the nullable shape so the message says `or null`
                let mut inner_findings = out.scratch();
                inner.check_at(value, path, &mut inner_findings);
                if inner_findings.errors.len() == 1
                    && inner_findings.errors[0].path == *path
                    && matches!(inner_findings.errors[0].kind, IssueKind::TypeMismatch { .. })
                {
                    mismatch(out);
                } else {
                    out.absorb(inner_findings);
                }
            }
            (Self::Array(item), Value::Array(elements)) => {
                for (index, element) in elements.iter().enumerate() {
                    item.check_at(element, &path.index(index), out);
                }
            }
            (Self::Union(alternatives), _) => {
                for alternative in alternatives {
                    let mut attempt = out.scratch();
                    alternative.check_at(value, path, &mut attempt);
                    if attempt.errors.is_empty() {
                        out.warnings.append(&mut attempt.warnings);
                        return;
                    }
                }
                out.error(
                    path.clone(),
                    IssueKind::NoMatchingAlternative {
                        expected: self.describe(),
                        found: ValueKind::of(value),
                    },
                );
            }
            (Self::Object(object), Value::Object(map)) => object.check_map(map, path, out),
            _ => mismatch(out),
        }
    }
}

impl Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

impl From<ObjectShape> for Shape {
    fn from(value: ObjectShape) -> Self {
        Self::Object(value)
    }
}

/// Whether an object field has to be present
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Presence {
    Required,
    Optional,
}

/// A field of an [`ObjectShape`]
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub shape: Shape,
    pub presence: Presence,
}

impl Field {
    pub fn is_required(&self) -> bool {
        self.presence == Presence::Required
    }
}

/// Shape of an object, its fields in declaration order
///
/// Optional fields may be absent, but not `null` unless their shape is
/// [`Shape::Nullable`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectShape {
    fields: IndexMap<&'static str, Field>,
}

impl ObjectShape {
    /// An object without fields
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field that must be present
    pub fn required(self, name: &'static str, shape: impl Into<Shape>) -> Self {
        self.with_field(name, shape.into(), Presence::Required)
    }

    /// Add a field that may be absent
    pub fn optional(self, name: &'static str, shape: impl Into<Shape>) -> Self {
        self.with_field(name, shape.into(), Presence::Optional)
    }

    fn with_field(mut self, name: &'static str, shape: Shape, presence: Presence) -> Self {
        self.fields.insert(name, Field { shape, presence });
        self
    }

    /// Derive the shape where every field is optional
    ///
    /// Only the top level fields change, nested shapes are kept as they are.
    pub fn partial(&self) -> Self {
        let fields = self
            .fields
            .iter()
            .map(|(&name, field)| {
                let field = Field {
                    shape: field.shape.clone(),
                    presence: Presence::Optional,
                };
                (name, field)
            })
            .collect();
        Self { fields }
    }

    /// Get a field by name
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    /// Iterate over the fields in declaration order
    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &Field)> {
        self.fields.iter().map(|(&name, field)| (name, field))
    }

    /// Names of the required fields
    pub fn required_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields().filter(|(_, f)| f.is_required()).map(|(n, _)| n)
    }

    fn check_map(&self, map: &Map<String, Value>, path: &FieldPath, out: &mut Findings) {
        for (&name, field) in &self.fields {
            match map.get(name) {
                Some(value) => field.shape.check_at(value, &path.key(name), out),
                None if field.is_required() => out.error(
                    path.key(name),
                    IssueKind::Missing {
                        expected: field.shape.describe(),
                    },
                ),
                None => {}
            }
        }

        if out.unknown_fields {
            for key in map.keys().filter(|k| !self.fields.contains_key(k.as_str())) {
                tracing::trace!(%path, key = key.as_str(), "unknown field");
                out.warnings
                    .push(Issue::new(path.key(key), IssueKind::UnknownField));
            }
        }
    }
}

/// Issues collected during a check
#[derive(Debug, Default)]
pub(crate) struct Findings {
    pub(crate) errors: Vec<Issue>,
    pub(crate) warnings: Vec<Issue>,
    unknown_fields: bool,
}

impl Findings {
    pub(crate) fn new(unknown_fields: bool) -> Self {
        Self {
            unknown_fields,
            ..Default::default()
        }
    }

    fn scratch(&self) -> Self {
        Self::new(self.unknown_fields)
    }

    fn error(&mut self, path: FieldPath, kind: IssueKind) {
        self.errors.push(Issue::new(path, kind));
    }

    fn absorb(&mut self, mut other: Findings) {
        self.errors.append(&mut other.errors);
        self.warnings.append(&mut other.warnings);
    }
}
