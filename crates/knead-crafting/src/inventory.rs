//! Inventory system.
//!
//! An inventory counts fungible items by type. A type that is not present has
//! a count of zero, and a count that drops to zero removes the entry, so the
//! map never stores a zero.

use knead_common::{InventoryName, ItemType};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Inventory error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InventoryError {
    /// Not enough items
    #[error("Not enough {item}: need {needed}, have {have}")]
    NotEnough {
        /// Item being removed
        item: ItemType,
        /// Amount needed
        needed: u64,
        /// Amount available
        have: u64,
    },
    /// Adding would exceed the counter range
    #[error("Too many {item}: {have} + {adding} overflows")]
    Overflow {
        /// Item being added
        item: ItemType,
        /// Amount already held
        have: u64,
        /// Amount being added
        adding: u64,
    },
}

/// Result type for inventory operations.
pub type InventoryResult<T> = Result<T, InventoryError>;

/// A quantity-based inventory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    /// Items and their quantities (never zero)
    items: BTreeMap<ItemType, u64>,
}

impl Inventory {
    /// Creates an empty inventory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an inventory from `(item, quantity)` pairs.
    ///
    /// Repeated items are summed and zero quantities are skipped.
    pub fn from_entries(
        entries: impl IntoIterator<Item = (ItemType, u64)>,
    ) -> InventoryResult<Self> {
        let mut inventory = Self::new();
        for (item, quantity) in entries {
            inventory.add(item, quantity)?;
        }
        Ok(inventory)
    }

    /// Returns the number of distinct item types held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if nothing is held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the count of a specific item.
    #[must_use]
    pub fn count(&self, item: &str) -> u64 {
        self.items.get(item).copied().unwrap_or(0)
    }

    /// Returns true if the item has an entry at all.
    #[must_use]
    pub fn contains(&self, item: &str) -> bool {
        self.items.contains_key(item)
    }

    /// Checks if the inventory contains at least the given amount.
    #[must_use]
    pub fn has(&self, item: &str, amount: u64) -> bool {
        self.count(item) >= amount
    }

    /// Adds items to the inventory. Adding zero is a no-op.
    pub fn add(&mut self, item: ItemType, amount: u64) -> InventoryResult<()> {
        if amount == 0 {
            return Ok(());
        }
        let have = self.count(item.as_str());
        let total = have.checked_add(amount).ok_or_else(|| InventoryError::Overflow {
            item: item.clone(),
            have,
            adding: amount,
        })?;
        self.items.insert(item, total);
        Ok(())
    }

    /// Removes items from the inventory, dropping the entry when it hits zero.
    pub fn remove(&mut self, item: &ItemType, amount: u64) -> InventoryResult<()> {
        let current = self.count(item.as_str());
        if current < amount {
            return Err(InventoryError::NotEnough {
                item: item.clone(),
                needed: amount,
                have: current,
            });
        }
        if current == amount {
            self.items.remove(item);
        } else {
            self.items.insert(item.clone(), current - amount);
        }
        Ok(())
    }

    /// Returns an iterator over all items, ordered by item type.
    pub fn iter(&self) -> impl Iterator<Item = (&ItemType, u64)> + '_ {
        self.items.iter().map(|(item, &count)| (item, count))
    }
}

/// A named inventory prepared for display.
#[derive(Debug, Clone, Copy)]
pub struct InventoryView<'a> {
    /// Inventory name
    pub name: &'a InventoryName,
    /// Inventory contents
    pub inventory: &'a Inventory,
}

impl fmt::Display for InventoryView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "-- Inventory: {} --", self.name)?;
        if self.inventory.is_empty() {
            return writeln!(f, "(empty)");
        }
        for (item, count) in self.inventory.iter() {
            writeln!(f, "- {count} {item}")?;
        }
        Ok(())
    }
}
