//! Thread-safe crafting context.
//!
//! The recipe book is immutable and shared. Each inventory sits behind its own
//! mutex, and a craft holds only that lock while it checks and commits, so
//! crafts against different inventories never contend.

use std::collections::HashMap;
use std::sync::Arc;

use knead_common::InventoryName;
use parking_lot::Mutex;
use tracing::{info, warn};

use crate::craft::{max_multiplier, CraftPlan, CraftReport, CraftingError, CraftingResult};
use crate::inventory::Inventory;
use crate::quantity::IntoMultiplier;
use crate::recipe::{Recipe, RecipeBook, RecipeListing, RecipeView};

#[derive(Debug)]
struct Shared {
    recipes: RecipeBook,
    order: Vec<InventoryName>,
    inventories: HashMap<InventoryName, Mutex<Inventory>>,
}

/// Cloneable handle to a crafting context usable from many threads.
#[derive(Debug, Clone)]
pub struct SharedCraftingContext {
    inner: Arc<Shared>,
}

impl SharedCraftingContext {
    pub(crate) fn from_parts(
        recipes: RecipeBook,
        inventories: Vec<(InventoryName, Inventory)>,
    ) -> Self {
        let order = inventories.iter().map(|(name, _)| name.clone()).collect();
        let inventories = inventories
            .into_iter()
            .map(|(name, inventory)| (name, Mutex::new(inventory)))
            .collect();
        Self {
            inner: Arc::new(Shared {
                recipes,
                order,
                inventories,
            }),
        }
    }

    /// Names of all recipes, in catalog order.
    #[must_use]
    pub fn list_recipes(&self) -> RecipeListing {
        self.inner.recipes.listing()
    }

    /// Inputs and outputs of a recipe.
    pub fn view_recipe(&self, recipe: &str) -> CraftingResult<RecipeView> {
        self.recipe(recipe).map(Recipe::view)
    }

    fn recipe(&self, name: &str) -> CraftingResult<&Recipe> {
        self.inner
            .recipes
            .get(name)
            .ok_or_else(|| CraftingError::RecipeNotFound(name.to_string()))
    }

    fn slot(&self, name: &str) -> CraftingResult<(&InventoryName, &Mutex<Inventory>)> {
        self.inner
            .inventories
            .get_key_value(name)
            .ok_or_else(|| CraftingError::InventoryNotFound(name.to_string()))
    }

    /// Names of all inventories, in catalog order.
    #[must_use]
    pub fn inventory_names(&self) -> &[InventoryName] {
        &self.inner.order
    }

    /// Copies the current contents of an inventory.
    pub fn snapshot(&self, inventory: &str) -> CraftingResult<Inventory> {
        let (_, slot) = self.slot(inventory)?;
        let contents = slot.lock().clone();
        Ok(contents)
    }

    /// Largest multiplier the inventory can currently afford for a recipe.
    pub fn max_craftable(&self, inventory: &str, recipe: &str) -> CraftingResult<u32> {
        let recipe = self.recipe(recipe)?;
        let (_, slot) = self.slot(inventory)?;
        let guard = slot.lock();
        Ok(max_multiplier(recipe, &guard))
    }

    /// Applies `recipe` `qty` times to `inventory` under that inventory's lock.
    pub fn craft(
        &self,
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
        &self,
        inventory: &str,
        recipe: &str,
        qty: impl IntoMultiplier,
    ) -> CraftingResult<CraftReport> {
        let multiplier = qty.into_multiplier()?;
        let recipe = self.recipe(recipe)?;
        let (name, slot) = self.slot(inventory)?;
        let plan = CraftPlan::new(recipe, multiplier);
        {
            let mut guard = slot.lock();
            plan.apply(&mut guard)?;
        }
        Ok(plan.into_report(name.clone()))
    }
}
