//! Recipe application.
//!
//! A craft is planned from a recipe and a multiplier, checked against the
//! target inventory, then committed. The commit works on a staged copy of the
//! inventory and only replaces the original once every subtraction and
//! addition has succeeded, so a failing craft never leaves a partial result.

use knead_common::{InventoryName, ItemType, RecipeName};
use std::fmt;
use thiserror::Error;
use tracing::debug;

use crate::inventory::{Inventory, InventoryError};
use crate::quantity::{Multiplier, QuantityError};
use crate::recipe::{Ingredient, Recipe};

/// Crafting error types.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CraftingError {
    /// Requested quantity rejected
    #[error(transparent)]
    InvalidQuantity(#[from] QuantityError),
    /// Recipe not in the catalog
    #[error("Recipe not found: {0}")]
    RecipeNotFound(String),
    /// Inventory not in the context
    #[error("Inventory not found: {0}")]
    InventoryNotFound(String),
    /// Required item has no entry at all
    #[error("You don't have {item} (quantity needed: {needed})")]
    MaterialMissing {
        /// Missing item
        item: ItemType,
        /// Amount needed
        needed: u64,
    },
    /// Required item present but short
    #[error(
        "Not enough {item} in inventory \
         (quantity needed: {needed}, quantity available: {available})"
    )]
    MaterialInsufficient {
        /// Short item
        item: ItemType,
        /// Amount needed
        needed: u64,
        /// Amount available
        available: u64,
    },
    /// A produced count would not fit
    #[error("Crafting would overflow the count of {item}")]
    QuantityOverflow {
        /// Item whose count would overflow
        item: ItemType,
    },
    /// Subtraction went below zero after the sufficiency check passed
    #[error("Not enough {item} to subtract from inventory: need {needed}, have {available}")]
    SubtractionUnderflow {
        /// Item being subtracted
        item: ItemType,
        /// Amount needed
        needed: u64,
        /// Amount available
        available: u64,
    },
}

impl From<InventoryError> for CraftingError {
    fn from(err: InventoryError) -> Self {
        match err {
            InventoryError::NotEnough { item, needed, have } => Self::SubtractionUnderflow {
                item,
                needed,
                available: have,
            },
            InventoryError::Overflow { item, .. } => Self::QuantityOverflow { item },
        }
    }
}

/// Result type for crafting operations.
pub type CraftingResult<T> = Result<T, CraftingError>;

/// A total quantity of one item moved by a craft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemQuantity {
    /// Item type
    pub item: ItemType,
    /// Total quantity
    pub quantity: u64,
}

/// Scaled requirements and products of a recipe for one multiplier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CraftPlan {
    /// Recipe being applied
    pub recipe: RecipeName,
    /// Number of applications
    pub multiplier: Multiplier,
    /// Totals to remove, in recipe input order
    pub consumed: Vec<ItemQuantity>,
    /// Totals to add, in recipe output order
    pub produced: Vec<ItemQuantity>,
}

impl CraftPlan {
    /// Scales every recipe term by the multiplier.
    #[must_use]
    pub fn new(recipe: &Recipe, multiplier: Multiplier) -> Self {
        let scale = |terms: &[Ingredient]| -> Vec<ItemQuantity> {
            terms
                .iter()
                .map(|t| ItemQuantity {
                    item: t.item.clone(),
                    quantity: multiplier.scale(t.quantity),
                })
                .collect()
        };
        Self {
            recipe: recipe.name.clone(),
            multiplier,
            consumed: scale(&recipe.inputs),
            produced: scale(&recipe.outputs),
        }
    }

    /// Verifies every required material before anything is touched.
    ///
    /// The first failing material, in recipe input order, is reported.
    pub fn check(&self, inventory: &Inventory) -> CraftingResult<()> {
        for need in &self.consumed {
            let available = inventory.count(need.item.as_str());
            if available == 0 {
                return Err(CraftingError::MaterialMissing {
                    item: need.item.clone(),
                    needed: need.quantity,
                });
            }
            if !inventory.has(need.item.as_str(), need.quantity) {
                return Err(CraftingError::MaterialInsufficient {
                    item: need.item.clone(),
                    needed: need.quantity,
                    available,
                });
            }
        }
        Ok(())
    }

    /// Checks then commits the plan against `inventory`.
    ///
    /// On error the inventory is left exactly as it was.
    pub fn apply(&self, inventory: &mut Inventory) -> CraftingResult<()> {
        self.check(inventory)?;

        let mut staged = inventory.clone();
        for need in &self.consumed {
            staged.remove(&need.item, need.quantity)?;
        }
        for made in &self.produced {
            staged.add(made.item.clone(), made.quantity)?;
        }
        debug!(
            recipe = %self.recipe,
            multiplier = self.multiplier.get(),
            "Committed craft"
        );
        *inventory = staged;
        Ok(())
    }

    /// Attaches the inventory name to produce a report.
    #[must_use]
    pub fn into_report(self, inventory: InventoryName) -> CraftReport {
        CraftReport {
            recipe: self.recipe,
            inventory,
            multiplier: self.multiplier,
            consumed: self.consumed,
            produced: self.produced,
        }
    }
}

/// Largest multiplier `inventory` can currently pay for.
///
/// A recipe without inputs is bounded only by [`Multiplier::MAX`].
#[must_use]
pub fn max_multiplier(recipe: &Recipe, inventory: &Inventory) -> u32 {
    recipe
        .inputs
        .iter()
        .map(|t| inventory.count(t.item.as_str()) / u64::from(t.quantity))
        .min()
        .map_or(Multiplier::MAX.get(), |n| {
            u32::try_from(n).unwrap_or(Multiplier::MAX.get())
        })
}

/// Outcome of a successful craft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CraftReport {
    /// Recipe applied
    pub recipe: RecipeName,
    /// Inventory changed
    pub inventory: InventoryName,
    /// Number of applications
    pub multiplier: Multiplier,
    /// Totals removed
    pub consumed: Vec<ItemQuantity>,
    /// Totals added
    pub produced: Vec<ItemQuantity>,
}

impl fmt::Display for CraftReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Crafted {} x {} in {}",
            self.multiplier, self.recipe, self.inventory
        )?;
        writeln!(f, "Materials used:")?;
        for q in &self.consumed {
            writeln!(f, "- {} {}", q.quantity, q.item)?;
        }
        writeln!(f, "Items created:")?;
        for q in &self.produced {
            writeln!(f, "- {} {}", q.quantity, q.item)?;
        }
        writeln!(f, "--- item crafted ---")
    }
}
