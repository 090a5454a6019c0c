//! Recipes and the recipe book.

use knead_common::{ItemType, RecipeName};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Errors raised while assembling a recipe.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecipeError {
    /// A per-craft quantity of zero
    #[error("Recipe {recipe}: {item} has zero quantity")]
    ZeroQuantity {
        /// Recipe being built
        recipe: RecipeName,
        /// Offending item
        item: ItemType,
    },
    /// Same item listed twice on one side
    #[error("Recipe {recipe}: {item} listed more than once in {side}")]
    DuplicateItem {
        /// Recipe being built
        recipe: RecipeName,
        /// Repeated item
        item: ItemType,
        /// "inputs" or "outputs"
        side: &'static str,
    },
    /// Nothing is produced
    #[error("Recipe {0} has no outputs")]
    NoOutputs(RecipeName),
}

/// One term of a recipe: an item and its per-craft quantity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ingredient {
    /// Item type
    pub item: ItemType,
    /// Quantity per single craft
    pub quantity: u32,
}

impl Ingredient {
    /// Creates a new recipe term.
    #[must_use]
    pub const fn new(item: ItemType, quantity: u32) -> Self {
        Self { item, quantity }
    }
}

/// A crafting recipe. Inputs and outputs keep their definition order.
///
/// Only [`RecipeBuilder::build`] creates recipes outside this crate, so every
/// quantity is at least 1 and no item repeats on one side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    pub(crate) name: RecipeName,
    pub(crate) description: String,
    pub(crate) inputs: Vec<Ingredient>,
    pub(crate) outputs: Vec<Ingredient>,
}

impl Recipe {
    /// Creates a new recipe builder.
    #[must_use]
    pub fn builder(name: RecipeName) -> RecipeBuilder {
        RecipeBuilder::new(name)
    }

    /// Recipe name.
    #[must_use]
    pub fn name(&self) -> &RecipeName {
        &self.name
    }

    /// Free-form description, possibly empty.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Terms consumed per craft.
    #[must_use]
    pub fn inputs(&self) -> &[Ingredient] {
        &self.inputs
    }

    /// Terms produced per craft.
    #[must_use]
    pub fn outputs(&self) -> &[Ingredient] {
        &self.outputs
    }

    /// Checks that there is an output, no zero quantity and no repeated item
    /// on either side.
    pub fn validate(&self) -> Result<(), RecipeError> {
        if self.outputs.is_empty() {
            return Err(RecipeError::NoOutputs(self.name.clone()));
        }
        for (side, terms) in [("inputs", &self.inputs), ("outputs", &self.outputs)] {
            for (i, term) in terms.iter().enumerate() {
                if term.quantity == 0 {
                    return Err(RecipeError::ZeroQuantity {
                        recipe: self.name.clone(),
                        item: term.item.clone(),
                    });
                }
                if terms[..i].iter().any(|t| t.item == term.item) {
                    return Err(RecipeError::DuplicateItem {
                        recipe: self.name.clone(),
                        item: term.item.clone(),
                        side,
                    });
                }
            }
        }
        Ok(())
    }

    /// Returns the per-craft input quantity of `item`, or 0.
    #[must_use]
    pub fn input_of(&self, item: &str) -> u32 {
        find(&self.inputs, item)
    }

    /// Returns the per-craft output quantity of `item`, or 0.
    #[must_use]
    pub fn output_of(&self, item: &str) -> u32 {
        find(&self.outputs, item)
    }

    /// Structured listing of both sides.
    #[must_use]
    pub fn view(&self) -> RecipeView {
        RecipeView {
            name: self.name.clone(),
            description: self.description.clone(),
            inputs: self.inputs.clone(),
            outputs: self.outputs.clone(),
        }
    }
}

fn find(terms: &[Ingredient], item: &str) -> u32 {
    terms
        .iter()
        .find(|t| t.item.as_str() == item)
        .map_or(0, |t| t.quantity)
}

/// Builder for creating recipes.
#[derive(Debug)]
pub struct RecipeBuilder {
    name: RecipeName,
    description: String,
    inputs: Vec<Ingredient>,
    outputs: Vec<Ingredient>,
}

impl RecipeBuilder {
    fn new(name: RecipeName) -> Self {
        Self {
            name,
            description: String::new(),
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = text.into();
        self
    }

    /// Adds an input consumed per craft.
    #[must_use]
    pub fn input(mut self, item: ItemType, quantity: u32) -> Self {
        self.inputs.push(Ingredient::new(item, quantity));
        self
    }

    /// Adds an output produced per craft.
    #[must_use]
    pub fn output(mut self, item: ItemType, quantity: u32) -> Self {
        self.outputs.push(Ingredient::new(item, quantity));
        self
    }

    /// Adds an item consumed and returned in equal quantity.
    #[must_use]
    pub fn tool(self, item: ItemType, quantity: u32) -> Self {
        self.input(item.clone(), quantity).output(item, quantity)
    }

    /// Builds the recipe, checking quantities and duplicate terms.
    pub fn build(self) -> Result<Recipe, RecipeError> {
        let recipe = Recipe {
            name: self.name,
            description: self.description,
            inputs: self.inputs,
            outputs: self.outputs,
        };
        recipe.validate()?;
        Ok(recipe)
    }
}

/// Recipes in definition order with lookup by name.
#[derive(Debug, Clone, Default)]
pub struct RecipeBook {
    recipes: Vec<Recipe>,
    by_name: HashMap<RecipeName, usize>,
}

impl RecipeBook {
    /// Creates an empty book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a recipe. Returns the recipe back if the name is taken.
    pub fn insert(&mut self, recipe: Recipe) -> Result<(), Recipe> {
        if self.by_name.contains_key(&recipe.name) {
            return Err(recipe);
        }
        self.by_name.insert(recipe.name.clone(), self.recipes.len());
        self.recipes.push(recipe);
        Ok(())
    }

    /// Gets a recipe by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Recipe> {
        self.by_name.get(name).map(|&i| &self.recipes[i])
    }

    /// Returns the number of recipes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    /// Returns true if there are no recipes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Iterates recipes in definition order.
    pub fn iter(&self) -> impl Iterator<Item = &Recipe> {
        self.recipes.iter()
    }

    /// Names of all recipes in definition order.
    #[must_use]
    pub fn listing(&self) -> RecipeListing {
        RecipeListing {
            names: self.recipes.iter().map(|r| r.name.clone()).collect(),
        }
    }
}

/// Names of the recipes in a catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeListing {
    /// Recipe names in definition order
    pub names: Vec<RecipeName>,
}

impl fmt::Display for RecipeListing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "-- All recipes --")?;
        for name in &self.names {
            writeln!(f, "- {name}")?;
        }
        Ok(())
    }
}

/// Inputs and outputs of one recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeView {
    /// Recipe name
    pub name: RecipeName,
    /// Description, possibly empty
    pub description: String,
    /// Materials needed per craft
    pub inputs: Vec<Ingredient>,
    /// Items created per craft
    pub outputs: Vec<Ingredient>,
}

impl fmt::Display for RecipeView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "-- Viewing recipe: {} --", self.name)?;
        if !self.description.is_empty() {
            writeln!(f, "{}", self.description)?;
        }
        writeln!(f, "Materials needed:")?;
        for term in &self.inputs {
            writeln!(f, "- {} {}", term.quantity, term.item)?;
        }
        writeln!(f, "Items created:")?;
        for term in &self.outputs {
            writeln!(f, "- {} {}", term.quantity, term.item)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str) -> ItemType {
        ItemType::new(name).expect("valid item")
    }

    fn name(text: &str) -> RecipeName {
        RecipeName::new(text).expect("valid name")
    }

    fn rolled() -> Recipe {
        Recipe::builder(name("roll flattened dough"))
            .input(item("dough"), 1)
            .tool(item("roll"), 1)
            .output(item("flattened dough"), 1)
            .build()
            .expect("valid recipe")
    }

    #[test]
    fn test_builder_keeps_order() {
        let recipe = rolled();
        let inputs: Vec<_> = recipe.inputs.iter().map(|i| i.item.as_str()).collect();
        assert_eq!(inputs, ["dough", "roll"]);
        let outputs: Vec<_> = recipe.outputs.iter().map(|i| i.item.as_str()).collect();
        assert_eq!(outputs, ["roll", "flattened dough"]);
    }

    #[test]
    fn test_tool_on_both_sides() {
        let recipe = rolled();
        assert_eq!(recipe.input_of("roll"), 1);
        assert_eq!(recipe.output_of("roll"), 1);
        assert_eq!(recipe.input_of("dough"), 1);
        assert_eq!(recipe.output_of("dough"), 0);
    }

    #[test]
    fn test_validate_catches_hand_built_recipe() {
        let recipe = Recipe {
            name: name("free dough"),
            description: String::new(),
            inputs: vec![Ingredient::new(item("flour"), 0)],
            outputs: vec![Ingredient::new(item("dough"), 1)],
        };
        assert_eq!(
            recipe.validate(),
            Err(RecipeError::ZeroQuantity {
                recipe: name("free dough"),
                item: item("flour"),
            })
        );
    }

    #[test]
    fn test_build_rejects_zero() {
        let err = Recipe::builder(name("bad"))
            .input(item("flour"), 0)
            .output(item("dough"), 1)
            .build()
            .expect_err("zero input");
        assert!(matches!(err, RecipeError::ZeroQuantity { .. }));
    }

    #[test]
    fn test_build_rejects_duplicate_side() {
        let err = Recipe::builder(name("bad"))
            .input(item("flour"), 1)
            .input(item("flour"), 2)
            .output(item("dough"), 1)
            .build()
            .expect_err("duplicate");
        assert!(matches!(err, RecipeError::DuplicateItem { side: "inputs", .. }));
    }

    #[test]
    fn test_build_rejects_no_outputs() {
        let err = Recipe::builder(name("nothing"))
            .input(item("flour"), 1)
            .build()
            .expect_err("no outputs");
        assert_eq!(err, RecipeError::NoOutputs(name("nothing")));
    }

    #[test]
    fn test_book_order_and_lookup() {
        let mut book = RecipeBook::new();
        let dough = Recipe::builder(name("dough"))
            .input(item("flour"), 2)
            .output(item("dough"), 2)
            .build()
            .expect("valid recipe");
        book.insert(rolled()).expect("unique");
        book.insert(dough.clone()).expect("unique");
        assert!(book.insert(dough).is_err());

        assert_eq!(book.len(), 2);
        assert!(book.get("dough").is_some());
        assert!(book.get("bread").is_none());
        assert_eq!(
            book.listing().to_string(),
            "-- All recipes --\n- roll flattened dough\n- dough\n"
        );
    }

    #[test]
    fn test_view_display() {
        let text = rolled().view().to_string();
        assert_eq!(
            text,
            "-- Viewing recipe: roll flattened dough --\n\
             Materials needed:\n- 1 dough\n- 1 roll\n\
             Items created:\n- 1 roll\n- 1 flattened dough\n"
        );
    }
}
