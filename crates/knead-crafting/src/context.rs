//! The crafting context: a recipe catalog plus the named inventories it acts on.

use std::collections::HashMap;

use knead_common::InventoryName;
use tracing::{debug, info, warn};

use crate::catalog::{Catalog, CatalogResult};
use crate::craft::{max_multiplier, CraftPlan, CraftReport, CraftingError, CraftingResult};
use crate::inventory::{Inventory, InventoryView};
use crate::quantity::IntoMultiplier;
use crate::recipe::{Recipe, RecipeBook, RecipeListing, RecipeView};
use crate::shared::SharedCraftingContext;

/// Owns the recipe book and every inventory.
///
/// Recipes and inventories are fixed at construction; crafting only changes
/// the contents of existing inventories.
#[derive(Debug, Clone)]
pub struct CraftingContext {
    recipes: RecipeBook,
    order: Vec<InventoryName>,
    inventories: HashMap<InventoryName, Inventory>,
}

impl CraftingContext {
    /// Creates a context from a validated catalog.
    #[must_use]
    pub fn new(catalog: Catalog) -> Self {
        let order = catalog
            .inventories
            .iter()
            .map(|(name, _)| name.clone())
            .collect();
        info!(
            "Crafting context ready: {} recipes, {} inventories",
            catalog.recipes.len(),
            catalog.inventories.len()
        );
        Self {
            recipes: catalog.recipes,
            order,
            inventories: catalog.inventories.into_iter().collect(),
        }
    }

    /// Creates a context from the embedded seed catalog.
    pub fn seeded() -> CatalogResult<Self> {
        Catalog::seed().map(Self::new)
    }

    /// Names of all recipes, in catalog order.
    #[must_use]
    pub fn list_recipes(&self) -> RecipeListing {
        self.recipes.listing()
    }

    /// Inputs and outputs of a recipe.
    pub fn view_recipe(&self, recipe: &str) -> CraftingResult<RecipeView> {
        self.recipe(recipe).map(Recipe::view)
    }

    /// Gets a recipe by name.
    pub fn recipe(&self, name: &str) -> CraftingResult<&Recipe> {
        self.recipes
            .get(name)
            .ok_or_else(|| CraftingError::RecipeNotFound(name.to_string()))
    }

    /// Returns the recipe book.
    #[must_use]
    pub fn recipes(&self) -> &RecipeBook {
        &self.recipes
    }

    /// Names of all inventories, in catalog order.
    #[must_use]
    pub fn inventory_names(&self) -> &[InventoryName] {
        &self.order
    }

    /// Gets an inventory by name.
    pub fn inventory(&self, name: &str) -> CraftingResult<&Inventory> {
        self.inventories
            .get(name)
            .ok_or_else(|| CraftingError::InventoryNotFound(name.to_string()))
    }

    /// Gets an inventory together with its name for display.
    pub fn view_inventory(&self, name: &str) -> CraftingResult<InventoryView<'_>> {
        self.inventories
            .get_key_value(name)
            .map(|(name, inventory)| InventoryView { name, inventory })
            .ok_or_else(|| CraftingError::InventoryNotFound(name.to_string()))
    }

    /// Validates a craft without changing anything.
    ///
    /// Runs the same checks as [`craft`](Self::craft), in the same order, and
    /// returns the scaled plan on success.
    pub fn check_craft(
        &self,
        inventory: &str,
        recipe: &str,
        qty: impl IntoMultiplier,
    ) -> CraftingResult<CraftPlan> {
        let multiplier = qty.into_multiplier()?;
        let recipe = self.recipe(recipe)?;
        let target = self.inventory(inventory)?;
        let plan = CraftPlan::new(recipe, multiplier);
        plan.check(target)?;
        Ok(plan)
    }

    /// Applies `recipe` `qty` times to `inventory`.
    ///
    /// The quantity is validated before any lookup. All inputs are checked
    /// before anything is removed; on any error the inventory is unchanged.
    pub fn craft(
        &mut self,
        inventory: &str,
        recipe: &str,
        qty: impl IntoMultiplier,
    ) -> CraftingResult<CraftReport> {
        let result = self.try_craft(inventory, recipe, qty);
        match &result {
            Ok(report) => info!(
                inventory = %report.inventory,
                recipe = %report.recipe,
                multiplier = report.multiplier.get(),
                "Item crafted"
            ),
            Err(e) => warn!(inventory, recipe, "Craft rejected: {e}"),
        }
        result
    }

    fn try_craft(
        &mut self,
        inventory: &str,
        recipe: &str,
        qty: impl IntoMultiplier,
    ) -> CraftingResult<CraftReport> {
        let multiplier = qty.into_multiplier()?;
        let recipe = self
            .recipes
            .get(recipe)
            .ok_or_else(|| CraftingError::RecipeNotFound(recipe.to_string()))?;
        let (name, target) = self
            .inventories
            .iter_mut()
            .find(|(name, _)| name.as_str() == inventory)
            .ok_or_else(|| CraftingError::InventoryNotFound(inventory.to_string()))?;

        let plan = CraftPlan::new(recipe, multiplier);
        debug!(consumed = ?plan.consumed, produced = ?plan.produced, "Planned craft");
        plan.apply(target)?;
        Ok(plan.into_report(name.clone()))
    }

    /// Largest multiplier the inventory can currently afford for a recipe.
    pub fn max_craftable(&self, inventory: &str, recipe: &str) -> CraftingResult<u32> {
        let recipe = self.recipe(recipe)?;
        let target = self.inventory(inventory)?;
        Ok(max_multiplier(recipe, target))
    }

    /// Recipes the inventory can afford at least once, in catalog order.
    pub fn craftable_recipes(&self, inventory: &str) -> CraftingResult<Vec<&Recipe>> {
        let target = self.inventory(inventory)?;
        Ok(self
            .recipes
            .iter()
            .filter(|recipe| max_multiplier(recipe, target) >= 1)
            .collect())
    }

    /// Converts into a context that can be shared between threads.
    #[must_use]
    pub fn into_shared(self) -> SharedCraftingContext {
        let mut inventories = self.inventories;
        SharedCraftingContext::from_parts(
            self.recipes,
            self.order
                .into_iter()
                .map(|name| {
                    let inventory = inventories.remove(&name).unwrap_or_default();
                    (name, inventory)
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quantity::QuantityError;
    use knead_common::{ItemType, RecipeName};

    fn seeded() -> CraftingContext {
        CraftingContext::seeded().expect("seed catalog is valid")
    }

    fn item(name: &str) -> ItemType {
        ItemType::new(name).expect("valid item")
    }

    fn snapshot(ctx: &CraftingContext, name: &str) -> Inventory {
        ctx.inventory(name).expect("inventory exists").clone()
    }

    #[test]
    fn test_list_recipes() {
        let names: Vec<String> = seeded()
            .list_recipes()
            .names
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(
            names,
            ["dough", "roll flattened dough", "machine flattened dough"]
        );
    }

    #[test]
    fn test_view_recipe() {
        let view = seeded().view_recipe("dough").expect("recipe exists");
        let inputs: Vec<_> = view
            .inputs
            .iter()
            .map(|t| (t.item.as_str(), t.quantity))
            .collect();
        assert_eq!(inputs, [("flour", 2), ("water", 1)]);
        let outputs: Vec<_> = view
            .outputs
            .iter()
            .map(|t| (t.item.as_str(), t.quantity))
            .collect();
        assert_eq!(outputs, [("dough", 2)]);
    }

    #[test]
    fn test_view_recipe_not_found() {
        assert_eq!(
            seeded().view_recipe("bread"),
            Err(CraftingError::RecipeNotFound("bread".to_string()))
        );
    }

    #[test]
    fn test_craft_dough_once() {
        let mut ctx = seeded();
        let report = ctx.craft("backpack", "dough", 1).expect("enough materials");
        assert_eq!(report.inventory.as_str(), "backpack");
        assert_eq!(report.multiplier.get(), 1);

        let expected =
            Inventory::from_entries([(item("flour"), 23), (item("water"), 1), (item("dough"), 2)])
                .expect("valid");
        assert_eq!(snapshot(&ctx, "backpack"), expected);
    }

    #[test]
    fn test_craft_dough_twenty_insufficient_water() {
        let mut ctx = seeded();
        let before = snapshot(&ctx, "backpack");
        let err = ctx.craft("backpack", "dough", 20).expect_err("two water only");
        assert_eq!(
            err,
            CraftingError::MaterialInsufficient {
                item: item("water"),
                needed: 20,
                available: 2
            }
        );
        assert_eq!(snapshot(&ctx, "backpack"), before);
    }

    #[test]
    fn test_craft_machine_in_house_missing_dough() {
        let mut ctx = seeded();
        let before = snapshot(&ctx, "house");
        let err = ctx
            .craft("house", "machine flattened dough", 1)
            .expect_err("no dough");
        assert_eq!(
            err,
            CraftingError::MaterialMissing {
                item: item("dough"),
                needed: 25
            }
        );
        assert_eq!(snapshot(&ctx, "house"), before);
    }

    #[test]
    fn test_invalid_quantities_rejected_before_lookup() {
        let mut ctx = seeded();
        let before = snapshot(&ctx, "backpack");

        assert_eq!(
            ctx.craft("backpack", "dough", 0),
            Err(CraftingError::InvalidQuantity(QuantityError::BelowOne))
        );
        assert_eq!(
            ctx.craft("backpack", "dough", -1),
            Err(CraftingError::InvalidQuantity(QuantityError::BelowOne))
        );
        assert_eq!(
            ctx.craft("backpack", "dough", 1.5),
            Err(CraftingError::InvalidQuantity(QuantityError::NotInteger))
        );
        // Unknown names are not even looked at.
        assert_eq!(
            ctx.craft("cellar", "bread", 0),
            Err(CraftingError::InvalidQuantity(QuantityError::BelowOne))
        );
        assert_eq!(snapshot(&ctx, "backpack"), before);
    }

    #[test]
    fn test_unknown_names() {
        let mut ctx = seeded();
        assert_eq!(
            ctx.craft("backpack", "bread", 1),
            Err(CraftingError::RecipeNotFound("bread".to_string()))
        );
        assert_eq!(
            ctx.craft("cellar", "dough", 1),
            Err(CraftingError::InventoryNotFound("cellar".to_string()))
        );
    }

    #[test]
    fn test_depletion_then_missing() {
        let mut ctx = seeded();
        ctx.craft("backpack", "dough", 2).expect("exactly two water");
        assert!(!ctx.inventory("backpack").expect("exists").contains("water"));
        assert_eq!(
            ctx.craft("backpack", "dough", 1),
            Err(CraftingError::MaterialMissing {
                item: item("water"),
                needed: 1
            })
        );
    }

    fn with_inventory(name: &str, inventory: Inventory) -> CraftingContext {
        let recipes: Vec<_> = Catalog::seed().expect("valid").recipes.iter().cloned().collect();
        let catalog = Catalog::new(recipes, [(InventoryName::new(name).expect("valid"), inventory)])
            .expect("valid catalog");
        CraftingContext::new(catalog)
    }

    #[test]
    fn test_tool_pattern() {
        let bench =
            Inventory::from_entries([(item("dough"), 1), (item("roll"), 1)]).expect("valid");
        let mut ctx = with_inventory("bench", bench);

        ctx.craft("bench", "roll flattened dough", 1).expect("roll available");
        let expected = Inventory::from_entries([(item("flattened dough"), 1), (item("roll"), 1)])
            .expect("valid");
        assert_eq!(snapshot(&ctx, "bench"), expected);
    }

    #[test]
    fn test_machine_batch_keeps_machine() {
        let bakery =
            Inventory::from_entries([(item("dough"), 25), (item("rolling machine"), 1)])
                .expect("valid");
        let mut ctx = with_inventory("bakery", bakery);

        let report = ctx
            .craft("bakery", "machine flattened dough", 1)
            .expect("one full batch");
        assert_eq!(report.consumed[0].quantity, 25);
        let expected = Inventory::from_entries([
            (item("flattened dough"), 25),
            (item("rolling machine"), 1),
        ])
        .expect("valid");
        assert_eq!(snapshot(&ctx, "bakery"), expected);
        assert!(!ctx.inventory("bakery").expect("exists").contains("dough"));
    }

    #[test]
    fn test_check_craft_does_not_mutate() {
        let ctx = seeded();
        let plan = ctx.check_craft("backpack", "dough", 2).expect("affordable");
        assert_eq!(plan.consumed[0].quantity, 4);
        assert_eq!(plan.produced[0].quantity, 4);
        assert_eq!(snapshot(&ctx, "backpack").count("dough"), 0);
    }

    #[test]
    fn test_max_and_craftable() {
        let ctx = seeded();
        assert_eq!(ctx.max_craftable("backpack", "dough"), Ok(2));
        assert_eq!(ctx.max_craftable("world", "dough"), Ok(0));

        let craftable: Vec<_> = ctx
            .craftable_recipes("backpack")
            .expect("exists")
            .into_iter()
            .map(|r| r.name().as_str())
            .collect();
        assert_eq!(craftable, ["dough"]);
    }

    #[test]
    fn test_inventory_names_in_order() {
        let ctx = seeded();
        let names: Vec<_> = ctx.inventory_names().iter().map(InventoryName::as_str).collect();
        assert_eq!(names, ["backpack", "house", "world"]);
        assert!(ctx.view_inventory("house").is_ok());
        assert!(ctx.view_inventory("attic").is_err());
    }

    #[test]
    fn test_recipe_name_type_roundtrip() {
        let ctx = seeded();
        let name = RecipeName::new("dough").expect("valid");
        assert_eq!(ctx.recipe(name.as_str()).map(Recipe::name), Ok(&name));
    }
}
