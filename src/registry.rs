//! The schema registry
//!
//! Every entity, envelope and payload has a [`Schema`]: a name and a
//! [`Shape`]. Shapes are built once, on first use, and never change after
//! that, so any number of validations can share them.
//!
//! Use [`SchemaId`] to pick a schema at runtime, for example by name.

use once_cell::sync::Lazy;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::{
    envelope::{paginated, strict_paginated, Page, RecipeList},
    model::{
        Food, Ingredient, Keyword, MealPlan, MealType, PartialFood, PartialRecipe, PartialUnit,
        Recipe, ShoppingListItem, Step, Unit,
    },
    payload::{
        AddShoppingItemPayload, CreateMealPlanPayload, CreateRecipePayload,
        UpdateShoppingItemPayload,
    },
    shape::{ObjectShape, Shape},
};

/// A type with a registered shape
///
/// Any value accepted by [`Schema::shape`] deserializes into `Self`, and a
/// `Self` serializes into a value accepted by the shape.
pub trait Schema: Serialize + DeserializeOwned {
    /// Name used in failures and logs
    const NAME: &'static str;

    /// The shape of this type
    fn shape() -> &'static Shape;

    /// Serialize into an untyped value
    fn to_value(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }
}

macro_rules! schema {
    ($ty:ty, $name:literal, $build:expr) => {
        impl Schema for $ty {
            const NAME: &'static str = $name;

            fn shape() -> &'static Shape {
                static SHAPE: Lazy<Shape> = Lazy::new($build);
                &SHAPE
            }
        }
    };
}

fn food() -> ObjectShape {
    ObjectShape::new()
        .required("id", Shape::Integer)
        .required("name", Shape::string())
        .optional("description", Shape::string())
}

fn unit() -> ObjectShape {
    ObjectShape::new()
        .required("id", Shape::Integer)
        .required("name", Shape::string())
        .optional("description", Shape::string())
}

fn keyword() -> ObjectShape {
    ObjectShape::new()
        .required("id", Shape::Integer)
        .optional("name", Shape::string())
        .optional("label", Shape::string())
        .optional("description", Shape::string())
}

fn meal_type() -> ObjectShape {
    ObjectShape::new()
        .required("id", Shape::Integer)
        .required("name", Shape::string())
}

fn ingredient() -> ObjectShape {
    ObjectShape::new()
        .optional("id", Shape::Integer)
        .optional("food", food().partial())
        .optional("unit", unit().partial())
        .required("amount", Shape::string_or_number())
        .optional("note", Shape::string())
}

fn step() -> ObjectShape {
    ObjectShape::new()
        .optional("id", Shape::Integer)
        .required("instruction", Shape::string())
        .optional("ingredients", Shape::array_of(ingredient()))
        .optional("order", Shape::Integer)
}

fn recipe() -> ObjectShape {
    ObjectShape::new()
        .required("id", Shape::Integer)
        .required("name", Shape::string())
        .optional("description", Shape::string())
        .optional("servings", Shape::Integer)
        .optional("rating", Shape::Integer.nullable())
        .optional("keywords", Shape::array_of(keyword()))
        .optional("steps", Shape::array_of(step()))
}

fn meal_plan() -> ObjectShape {
    ObjectShape::new()
        .optional("id", Shape::Integer)
        .optional("title", Shape::string())
        .optional("recipe", recipe().partial())
        .optional("meal_type", meal_type())
        .required("from_date", Shape::string())
        .optional("to_date", Shape::string())
        .required("servings", Shape::string_or_number())
        .optional("note", Shape::string())
}

fn shopping_list_item() -> ObjectShape {
    ObjectShape::new()
        .required("id", Shape::Integer)
        .optional("food", food().partial())
        .optional("unit", unit().partial())
        .required("amount", Shape::string_or_number())
        .optional("checked", Shape::Boolean)
        .optional("note", Shape::string())
}

fn named_ref() -> ObjectShape {
    ObjectShape::new().required("name", Shape::string())
}

fn id_name_ref() -> ObjectShape {
    ObjectShape::new()
        .required("id", Shape::Integer)
        .required("name", Shape::string())
}

fn create_recipe_payload() -> ObjectShape {
    let ingredient = ObjectShape::new()
        .required("food", named_ref())
        .required("unit", named_ref())
        .required("amount", Shape::string());
    let step = ObjectShape::new()
        .required("instruction", Shape::non_empty_string())
        .required("ingredients", Shape::array_of(ingredient));
    ObjectShape::new()
        .required("name", Shape::string())
        .optional("description", Shape::string())
        .optional("servings", Shape::Integer)
        .required("steps", Shape::array_of(step))
}

fn create_meal_plan_payload() -> ObjectShape {
    let recipe = id_name_ref().required("keywords", Shape::array_of(Shape::Unknown));
    ObjectShape::new()
        .required("recipe", recipe)
        .required("meal_type", meal_type())
        .required("from_date", Shape::string())
        .required("servings", Shape::string())
        .optional("title", Shape::string())
        .optional("note", Shape::string())
}

fn add_shopping_item_payload() -> ObjectShape {
    ObjectShape::new()
        .required("food", id_name_ref())
        .required("unit", id_name_ref())
        .required("amount", Shape::string())
        .optional("note", Shape::string())
}

fn update_shopping_item_payload() -> ObjectShape {
    ObjectShape::new()
        .optional("checked", Shape::Boolean)
        .optional("amount", Shape::string())
        .optional("unit", Shape::Integer)
        .optional("note", Shape::string())
}

schema!(Food, "Food", || food().into());
schema!(PartialFood, "PartialFood", || food().partial().into());
schema!(Unit, "Unit", || unit().into());
schema!(PartialUnit, "PartialUnit", || unit().partial().into());
schema!(Keyword, "Keyword", || keyword().into());
schema!(MealType, "MealType", || meal_type().into());
schema!(Ingredient, "Ingredient", || ingredient().into());
schema!(Step, "Step", || step().into());
schema!(Recipe, "Recipe", || recipe().into());
schema!(PartialRecipe, "PartialRecipe", || recipe().partial().into());
schema!(MealPlan, "MealPlan", || meal_plan().into());
schema!(ShoppingListItem, "ShoppingListItem", || {
    shopping_list_item().into()
});

schema!(RecipeList, "RecipeList", || strict_paginated(recipe()).into());
schema!(Page<Food>, "FoodList", || paginated(food()).into());
schema!(Page<Unit>, "UnitList", || paginated(unit()).into());
schema!(Page<Keyword>, "KeywordList", || paginated(keyword()).into());
schema!(Vec<MealPlan>, "MealPlanList", || Shape::array_of(meal_plan()));
schema!(Vec<ShoppingListItem>, "ShoppingList", || {
    Shape::array_of(shopping_list_item())
});

schema!(CreateRecipePayload, "CreateRecipePayload", || {
    create_recipe_payload().into()
});
schema!(CreateMealPlanPayload, "CreateMealPlanPayload", || {
    create_meal_plan_payload().into()
});
schema!(AddShoppingItemPayload, "AddShoppingItemPayload", || {
    add_shopping_item_payload().into()
});
schema!(UpdateShoppingItemPayload, "UpdateShoppingItemPayload", || {
    update_shopping_item_payload().into()
});

/// Every registered schema
///
/// The string form is the [`Schema::NAME`] of the schema.
///
/// ```rust
/// # use recipe_schema::SchemaId;
/// let id: SchemaId = "MealPlanList".parse().unwrap();
/// assert_eq!(id, SchemaId::MealPlanList);
/// assert!(id.shape().accepts(&serde_json::json!([])));
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::IntoStaticStr,
)]
pub enum SchemaId {
    Food,
    PartialFood,
    Unit,
    PartialUnit,
    Keyword,
    MealType,
    Ingredient,
    Step,
    Recipe,
    PartialRecipe,
    MealPlan,
    ShoppingListItem,
    RecipeList,
    FoodList,
    UnitList,
    KeywordList,
    MealPlanList,
    ShoppingList,
    CreateRecipePayload,
    CreateMealPlanPayload,
    AddShoppingItemPayload,
    UpdateShoppingItemPayload,
}

impl SchemaId {
    /// Name of the schema
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// Shape of the schema
    pub fn shape(self) -> &'static Shape {
        match self {
            SchemaId::Food => Food::shape(),
            SchemaId::PartialFood => PartialFood::shape(),
            SchemaId::Unit => Unit::shape(),
            SchemaId::PartialUnit => PartialUnit::shape(),
            SchemaId::Keyword => Keyword::shape(),
            SchemaId::MealType => MealType::shape(),
            SchemaId::Ingredient => Ingredient::shape(),
            SchemaId::Step => Step::shape(),
            SchemaId::Recipe => Recipe::shape(),
            SchemaId::PartialRecipe => PartialRecipe::shape(),
            SchemaId::MealPlan => MealPlan::shape(),
            SchemaId::ShoppingListItem => ShoppingListItem::shape(),
            SchemaId::RecipeList => RecipeList::shape(),
            SchemaId::FoodList => Page::<Food>::shape(),
            SchemaId::UnitList => Page::<Unit>::shape(),
            SchemaId::KeywordList => Page::<Keyword>::shape(),
            SchemaId::MealPlanList => Vec::<MealPlan>::shape(),
            SchemaId::ShoppingList => Vec::<ShoppingListItem>::shape(),
            SchemaId::CreateRecipePayload => CreateRecipePayload::shape(),
            SchemaId::CreateMealPlanPayload => CreateMealPlanPayload::shape(),
            SchemaId::AddShoppingItemPayload => AddShoppingItemPayload::shape(),
            SchemaId::UpdateShoppingItemPayload => UpdateShoppingItemPayload::shape(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    fn schema_name(id: SchemaId) -> &'static str {
        match id {
            SchemaId::Food => Food::NAME,
            SchemaId::PartialFood => PartialFood::NAME,
            SchemaId::Unit => Unit::NAME,
            SchemaId::PartialUnit => PartialUnit::NAME,
            SchemaId::Keyword => Keyword::NAME,
            SchemaId::MealType => MealType::NAME,
            SchemaId::Ingredient => Ingredient::NAME,
            SchemaId::Step => Step::NAME,
            SchemaId::Recipe => Recipe::NAME,
            SchemaId::PartialRecipe => PartialRecipe::NAME,
            SchemaId::MealPlan => MealPlan::NAME,
            SchemaId::ShoppingListItem => ShoppingListItem::NAME,
            SchemaId::RecipeList => RecipeList::NAME,
            SchemaId::FoodList => Page::<Food>::NAME,
            SchemaId::UnitList => Page::<Unit>::NAME,
            SchemaId::KeywordList => Page::<Keyword>::NAME,
            SchemaId::MealPlanList => Vec::<MealPlan>::NAME,
            SchemaId::ShoppingList => Vec::<ShoppingListItem>::NAME,
            SchemaId::CreateRecipePayload => CreateRecipePayload::NAME,
            SchemaId::CreateMealPlanPayload => CreateMealPlanPayload::NAME,
            SchemaId::AddShoppingItemPayload => AddShoppingItemPayload::NAME,
            SchemaId::UpdateShoppingItemPayload => UpdateShoppingItemPayload::NAME,
        }
    }

    #[test]
    fn ids_match_names() {
        for id in SchemaId::iter() {
            assert_eq!(id.name(), schema_name(id));
            assert_eq!(id.to_string().parse::<SchemaId>().unwrap(), id);
        }
    }

    #[test]
    fn partial_embeddings() {
        let ingredient = Ingredient::shape().as_object().unwrap();
        let food = ingredient.field("food").unwrap().shape.as_object().unwrap();
        assert_eq!(food.required_fields().count(), 0);
        assert_eq!(food.fields().count(), 3);

        let plan = MealPlan::shape().as_object().unwrap();
        let recipe = plan.field("recipe").unwrap().shape.as_object().unwrap();
        assert_eq!(recipe.required_fields().count(), 0);
        // meal types are embedded whole
        let meal_type = plan.field("meal_type").unwrap().shape.as_object().unwrap();
        assert_eq!(meal_type.required_fields().collect::<Vec<_>>(), vec!["id", "name"]);

        // the full shapes are untouched
        let food = Food::shape().as_object().unwrap();
        assert_eq!(food.required_fields().collect::<Vec<_>>(), vec!["id", "name"]);
    }

    #[test]
    fn write_amounts_are_strings() {
        let servings = &CreateMealPlanPayload::shape()
            .as_object()
            .unwrap()
            .field("servings")
            .unwrap()
            .shape;
        assert_eq!(*servings, Shape::string());
        let amount = &AddShoppingItemPayload::shape()
            .as_object()
            .unwrap()
            .field("amount")
            .unwrap()
            .shape;
        assert_eq!(*amount, Shape::string());
    }
}
