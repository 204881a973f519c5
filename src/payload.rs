//! Request payloads
//!
//! Payloads are stricter than the entities they create. Amounts and servings
//! are always strings here, even where the read side also accepts numbers.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::{Food, MealType, Recipe, Unit};

/// Reference to something by name only
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRef {
    pub name: String,
}

impl NamedRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Reference to something by id and name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdNameRef {
    pub id: i64,
    pub name: String,
}

impl From<&Food> for IdNameRef {
    fn from(value: &Food) -> Self {
        Self {
            id: value.id,
            name: value.name.clone(),
        }
    }
}

impl From<&Unit> for IdNameRef {
    fn from(value: &Unit) -> Self {
        Self {
            id: value.id,
            name: value.name.clone(),
        }
    }
}

/// Body to create a recipe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRecipePayload {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servings: Option<i64>,
    pub steps: Vec<NewStep>,
}

/// A step of a [`CreateRecipePayload`]
///
/// The instruction must not be empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStep {
    pub instruction: String,
    pub ingredients: Vec<NewIngredient>,
}

/// An ingredient of a [`NewStep`], everything is required
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewIngredient {
    pub food: NamedRef,
    pub unit: NamedRef,
    pub amount: String,
}

impl NewIngredient {
    pub fn new(
        food: impl Into<String>,
        unit: impl Into<String>,
        amount: impl Into<String>,
    ) -> Self {
        Self {
            food: NamedRef::new(food),
            unit: NamedRef::new(unit),
            amount: amount.into(),
        }
    }
}

/// The recipe of a [`CreateMealPlanPayload`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealPlanRecipeRef {
    pub id: i64,
    pub name: String,
    /// Passed through as given, their shape is not checked
    pub keywords: Vec<Value>,
}

impl MealPlanRecipeRef {
    /// Reference an existing recipe, with its keywords
    pub fn from_recipe(recipe: &Recipe) -> serde_json::Result<Self> {
        let keywords = recipe
            .keywords()
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            id: recipe.id,
            name: recipe.name.clone(),
            keywords,
        })
    }
}

/// Body to plan a recipe for a date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateMealPlanPayload {
    pub recipe: MealPlanRecipeRef,
    pub meal_type: MealType,
    pub from_date: String,
    /// Always a string, unlike [`MealPlan::servings`](crate::MealPlan::servings)
    pub servings: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl CreateMealPlanPayload {
    /// Plan `recipe` as `meal_type` on `from_date`
    pub fn for_recipe(
        recipe: &Recipe,
        meal_type: MealType,
        from_date: impl Into<String>,
        servings: impl Into<String>,
    ) -> serde_json::Result<Self> {
        Ok(Self {
            recipe: MealPlanRecipeRef::from_recipe(recipe)?,
            meal_type,
            from_date: from_date.into(),
            servings: servings.into(),
            title: None,
            note: None,
        })
    }
}

/// Body to add an item to the shopping list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddShoppingItemPayload {
    pub food: IdNameRef,
    pub unit: IdNameRef,
    pub amount: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl AddShoppingItemPayload {
    pub fn new(food: &Food, unit: &Unit, amount: impl Into<String>) -> Self {
        Self {
            food: food.into(),
            unit: unit.into(),
            amount: amount.into(),
            note: None,
        }
    }
}

/// Patch of a shopping list item
///
/// Only the fields that are [`Some`] are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateShoppingItemPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    /// Id of the new unit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl UpdateShoppingItemPayload {
    /// Patch that only changes the checked state
    pub fn checked(checked: bool) -> Self {
        Self {
            checked: Some(checked),
            ..Default::default()
        }
    }

    /// Check if the patch changes nothing
    pub fn is_empty(&self) -> bool {
        self.checked.is_none()
            && self.amount.is_none()
            && self.unit.is_none()
            && self.note.is_none()
    }
}
