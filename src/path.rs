//! Location of a value inside a validated document

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// One step into a document: an object key or an array index
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Segment {
    Key(String),
    Index(usize),
}

/// Path from the root of a document to one of its values
///
/// Displayed in the familiar accessor form, `steps[0].ingredients[1].food`.
/// The empty path is the root of the document and is displayed as `$`. Keys
/// that would read as more than one step (`a.b`, `x[0]`, the empty key) are
/// quoted in brackets, `["a.b"]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldPath(SmallVec<[Segment; 4]>);

impl FieldPath {
    /// The root of the document
    pub fn root() -> Self {
        Self::default()
    }

    /// Check if this is the root path
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Segments of the path, from the root
    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    /// Last object key in the path, if any
    pub fn last_key(&self) -> Option<&str> {
        self.0.iter().rev().find_map(|s| match s {
            Segment::Key(k) => Some(k.as_str()),
            Segment::Index(_) => None,
        })
    }

    pub(crate) fn key(&self, key: &str) -> Self {
        let mut p = self.clone();
        p.0.push(Segment::Key(key.to_string()));
        p
    }

    pub(crate) fn index(&self, index: usize) -> Self {
        let mut p = self.clone();
        p.0.push(Segment::Index(index));
        p
    }
}

impl Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            return f.write_str("$");
        }
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                Segment::Key(k) if needs_quotes(k) => write!(f, "[{k:?}]")?,
                Segment::Key(k) if i == 0 => write!(f, "{k}")?,
                Segment::Key(k) => write!(f, ".{k}")?,
                Segment::Index(n) => write!(f, "[{n}]")?,
            }
        }
        Ok(())
    }
}

fn needs_quotes(key: &str) -> bool {
    key.is_empty() || key.contains(['.', '[', ']', '"'])
}

impl<S: Into<String>> FromIterator<S> for FieldPath {
    /// Build a path of object keys only
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self(iter.into_iter().map(|k| Segment::Key(k.into())).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(FieldPath::root().to_string(), "$");
        let p = FieldPath::root()
            .key("steps")
            .index(0)
            .key("ingredients")
            .index(2)
            .key("food");
        assert_eq!(p.to_string(), "steps[0].ingredients[2].food");
        assert_eq!(p.last_key(), Some("food"));
        assert_eq!(FieldPath::root().index(3).to_string(), "[3]");
    }

    #[test]
    fn odd_keys_are_quoted() {
        let dotted = FieldPath::root().key("a.b");
        let nested = FieldPath::root().key("a").key("b");
        assert_eq!(dotted.to_string(), r#"["a.b"]"#);
        assert_ne!(dotted.to_string(), nested.to_string());
        assert_eq!(
            FieldPath::root().key("steps").key("x[0]").to_string(),
            r#"steps["x[0]"]"#
        );
        assert_eq!(FieldPath::root().key("").index(1).to_string(), r#"[""][1]"#);
    }

    #[test]
    fn from_keys() {
        let p: FieldPath = ["recipe", "name"].into_iter().collect();
        assert_eq!(p, FieldPath::root().key("recipe").key("name"));
    }
}
