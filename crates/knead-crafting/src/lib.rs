//! # Knead Crafting
//!
//! Generic quantity-based crafting.
//!
//! This crate provides:
//! - Quantity inventories (absent means zero, zero is never stored)
//! - Recipes with ordered input and output terms
//! - Catalog loading from TOML or RON, plus the embedded seed catalog
//! - The crafting context: list and view recipes, craft atomically
//! - A thread-safe context with one lock per inventory

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod catalog;
pub mod context;
pub mod craft;
pub mod inventory;
pub mod quantity;
pub mod recipe;
pub mod shared;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::catalog::*;
    pub use crate::context::*;
    pub use crate::craft::*;
    pub use crate::inventory::*;
    pub use crate::quantity::*;
    pub use crate::recipe::*;
    pub use crate::shared::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_scenarios() {
        let mut ctx = CraftingContext::seeded().expect("seed catalog is valid");

        assert!(ctx.craft("backpack", "dough", 1).is_ok());
        assert!(matches!(
            ctx.craft("backpack", "dough", 20),
            Err(CraftingError::MaterialInsufficient { .. })
        ));
        assert!(matches!(
            ctx.craft("house", "machine flattened dough", 1),
            Err(CraftingError::MaterialMissing { .. })
        ));
    }

    #[test]
    fn test_world_water_untouched() {
        let mut ctx = CraftingContext::seeded().expect("seed catalog is valid");
        let flour = knead_common::ItemType::new("flour").expect("valid item");
        assert_eq!(
            ctx.craft("world", "dough", 1),
            Err(CraftingError::MaterialMissing {
                item: flour,
                needed: 2
            })
        );
        let world = ctx.inventory("world").expect("exists");
        assert_eq!(world.count("water"), 1000);
        assert_eq!(world.len(), 1);
    }
}
