//! List responses
//!
//! The API returns collections in two ways:
//! - Recipes, foods, units and keywords come inside an offset paginated
//!   envelope, `{count, next, previous, results}`.
//! - Meal plans and shopping list items come as a plain array.
//!
//! The two are not interchangeable: a plain array is not a valid envelope and
//! an envelope is not a valid plain list.
//!
//! Envelopes also come with two strictness levels. The generic [`Page`],
//! built with [`paginated`], has every pagination field optional. The
//! [`RecipeList`], built with [`strict_paginated`], requires all of them.

use serde::{Deserialize, Serialize};

use crate::{
    model::{Food, Keyword, MealPlan, Recipe, ShoppingListItem, Unit},
    shape::{ObjectShape, Shape},
};

/// Generic paginated envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Total number of items in all pages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<i64>,
    /// URL of the next page. `Some(None)` when it was sent as `null`.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crate::model::nullable"
    )]
    pub next: Option<Option<String>>,
    /// URL of the previous page. `Some(None)` when it was sent as `null`.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crate::model::nullable"
    )]
    pub previous: Option<Option<String>>,
    /// Items in this page
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// Items in this page
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.results.iter()
    }

    /// Number of items in this page
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Check if this page has no items
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// URL of the next page, if there is one
    pub fn next_url(&self) -> Option<&str> {
        self.next.as_ref()?.as_deref()
    }

    /// URL of the previous page, if there is one
    pub fn previous_url(&self) -> Option<&str> {
        self.previous.as_ref()?.as_deref()
    }
}

impl<'a, T> IntoIterator for &'a Page<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> IntoIterator for Page<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.into_iter()
    }
}

pub type FoodList = Page<Food>;
pub type UnitList = Page<Unit>;
pub type KeywordList = Page<Keyword>;

/// Paginated recipes, every pagination field is required
///
/// `next` and `previous` must be present, but can be `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeList {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<Recipe>,
}

impl RecipeList {
    /// Check if there are more pages after this one
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }
}

/// Meal plans, a plain array
pub type MealPlanList = Vec<MealPlan>;

/// Shopping list items, a plain array
pub type ShoppingList = Vec<ShoppingListItem>;

/// Shape of the lax envelope around `item`
///
/// `count`, `next` and `previous` are optional; `next` and `previous` can
/// also be `null`.
pub fn paginated(item: impl Into<Shape>) -> ObjectShape {
    ObjectShape::new()
        .optional("count", Shape::Integer)
        .optional("next", Shape::string().nullable())
        .optional("previous", Shape::string().nullable())
        .required("results", Shape::array_of(item))
}

/// Shape of the strict envelope around `item`
///
/// All fields are required; `next` and `previous` can be `null`.
pub fn strict_paginated(item: impl Into<Shape>) -> ObjectShape {
    ObjectShape::new()
        .required("count", Shape::Integer)
        .required("next", Shape::string().nullable())
        .required("previous", Shape::string().nullable())
        .required("results", Shape::array_of(item))
}
