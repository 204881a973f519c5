//! Typed entities of the recipe API
//!
//! Every entity is an immutable snapshot of server state. Optional fields are
//! [`None`] when absent in the document and are omitted again when
//! serializing, so a validated value re-serializes to a document with the
//! same fields.
//!
//! The `Partial*` types are the embeddings where every field of the entity is
//! optional (an ingredient's food, a meal plan's recipe...). The full types
//! stay strict.

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use serde_json::Number;

/// A food, the "what" of an ingredient
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Food {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A [`Food`] where every field is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialFood {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A unit of measure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A [`Unit`] where every field is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialUnit {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A keyword (tag) of a recipe
///
/// The API may send `name`, `label` or both. There is no rule for which one
/// should be displayed, both are exposed as they came.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyword {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Kind of meal (breakfast, dinner...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealType {
    pub id: i64,
    pub name: String,
}

/// Amount of an ingredient, servings of a meal plan...
///
/// On read paths the API sends either a string or a number. A string is tried
/// first. Numbers are kept as written, an integer stays an integer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Text(String),
    Number(Number),
}

impl Amount {
    /// Get the text, if it is text
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Amount::Text(s) => Some(s),
            Amount::Number(_) => None,
        }
    }

    /// Get the number, if it is a number
    ///
    /// Text is not parsed.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Amount::Text(_) => None,
            Amount::Number(n) => n.as_f64(),
        }
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Amount::Text(s) => f.write_str(s),
            Amount::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for Amount {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Amount {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Number> for Amount {
    fn from(value: Number) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for Amount {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

/// An ingredient line of a step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub food: Option<PartialFood>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<PartialUnit>,
    pub amount: Amount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// A recipe step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub instruction: String,
    /// Ingredients used in this step, in order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<Vec<Ingredient>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
}

/// A complete recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servings: Option<i64>,
    /// Rating of the recipe
    ///
    /// - [`None`]: not in the document
    /// - `Some(None)`: explicitly `null`, not rated
    /// - `Some(Some(n))`: rated `n`
    #[serde(default, skip_serializing_if = "Option::is_none", with = "nullable")]
    pub rating: Option<Option<i64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<Keyword>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<Step>>,
}

impl Recipe {
    /// All the steps, empty if the recipe has none
    pub fn steps(&self) -> &[Step] {
        self.steps.as_deref().unwrap_or_default()
    }

    /// All the keywords, empty if the recipe has none
    pub fn keywords(&self) -> &[Keyword] {
        self.keywords.as_deref().unwrap_or_default()
    }

    /// All the ingredients of every step, in step order
    pub fn ingredients(&self) -> impl Iterator<Item = &Ingredient> {
        self.steps()
            .iter()
            .flat_map(|s| s.ingredients.as_deref().unwrap_or_default())
    }
}

/// A [`Recipe`] where every field is optional
///
/// Nested keywords and steps keep their own strictness.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialRecipe {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servings: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "nullable")]
    pub rating: Option<Option<i64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<Keyword>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<Step>>,
}

/// A recipe planned for a date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealPlan {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipe: Option<PartialRecipe>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meal_type: Option<MealType>,
    /// Date as sent by the API, not parsed
    pub from_date: String,
    /// Can be absent but never `null`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_date: Option<String>,
    pub servings: Amount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// An entry of the shopping list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingListItem {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub food: Option<PartialFood>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<PartialUnit>,
    pub amount: Amount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl ShoppingListItem {
    /// An item without the `checked` field is not checked
    pub fn is_checked(&self) -> bool {
        self.checked.unwrap_or(false)
    }
}

impl From<Food> for PartialFood {
    fn from(value: Food) -> Self {
        Self {
            id: Some(value.id),
            name: Some(value.name),
            description: value.description,
        }
    }
}

impl From<Unit> for PartialUnit {
    fn from(value: Unit) -> Self {
        Self {
            id: Some(value.id),
            name: Some(value.name),
            description: value.description,
        }
    }
}

impl From<Recipe> for PartialRecipe {
    fn from(value: Recipe) -> Self {
        Self {
            id: Some(value.id),
            name: Some(value.name),
            description: value.description,
            servings: value.servings,
            rating: value.rating,
            keywords: value.keywords,
            steps: value.steps,
        }
    }
}

/// (De)serialize a field that can be absent, `null` or a value
///
/// Use together with `#[serde(default, skip_serializing_if = "Option::is_none")]`
/// so absent stays [`None`] and `null` becomes `Some(None)`.
pub(crate) mod nullable {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<T, S>(value: &Option<Option<T>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Serialize,
        S: Serializer,
    {
        match value {
            Some(inner) => inner.serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rating_three_states() {
        let base = json!({"id": 1, "name": "Soup"});
        let absent: Recipe = serde_json::from_value(base.clone()).unwrap();
        assert_eq!(absent.rating, None);

        let mut with_null = base.clone();
        with_null["rating"] = json!(null);
        let null: Recipe = serde_json::from_value(with_null.clone()).unwrap();
        assert_eq!(null.rating, Some(None));

        let mut with_number = base;
        with_number["rating"] = json!(4);
        let rated: Recipe = serde_json::from_value(with_number.clone()).unwrap();
        assert_eq!(rated.rating, Some(Some(4)));

        assert_eq!(serde_json::to_value(&null).unwrap(), with_null);
        assert_eq!(serde_json::to_value(&rated).unwrap(), with_number);
        assert!(serde_json::to_value(&absent)
            .unwrap()
            .get("rating")
            .is_none());
    }

    #[test]
    fn amount_prefers_text() {
        let text: Amount = serde_json::from_value(json!("2")).unwrap();
        assert_eq!(text, Amount::Text("2".into()));
        assert_eq!(text.as_f64(), None);
        let number: Amount = serde_json::from_value(json!(1.5)).unwrap();
        assert_eq!(number.as_f64(), Some(1.5));
        assert_eq!(number.to_string(), "1.5");
        let whole: Amount = serde_json::from_value(json!(2)).unwrap();
        assert_eq!(whole, Amount::from(2));
        assert_eq!(whole.to_string(), "2");
        assert_eq!(serde_json::to_value(&whole).unwrap(), json!(2));
    }

    #[test]
    fn recipe_ingredients_follow_steps() {
        let recipe: Recipe = serde_json::from_value(json!({
            "id": 1,
            "name": "Soup",
            "steps": [
                {"instruction": "Chop", "ingredients": [{"amount": "2", "food": {"name": "Carrot"}}]},
                {"instruction": "Rest"},
                {"instruction": "Boil", "ingredients": [{"amount": 1, "food": {"name": "Water"}}]}
            ]
        }))
        .unwrap();
        let names: Vec<_> = recipe
            .ingredients()
            .filter_map(|i| i.food.as_ref()?.name.as_deref())
            .collect();
        assert_eq!(names, vec!["Carrot", "Water"]);
        assert!(recipe.keywords().is_empty());
    }

    #[test]
    fn full_into_partial() {
        let food = Food {
            id: 3,
            name: "Leek".into(),
            description: None,
        };
        let partial = PartialFood::from(food);
        assert_eq!(partial.id, Some(3));
        assert_eq!(
            serde_json::to_value(&partial).unwrap(),
            json!({"id": 3, "name": "Leek"})
        );
    }
}
