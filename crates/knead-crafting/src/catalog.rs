//! Catalog loading and validation.
//!
//! This module provides:
//! - The on-disk catalog schema (TOML, or RON by file extension)
//! - Validation of names, quantities and duplicates on load
//! - An optional item registry that rejects unknown item types
//! - The embedded seed catalog

use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use knead_common::{IdError, InventoryName, ItemType, RecipeName, SchemaVersion, VersionError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::inventory::{Inventory, InventoryError};
use crate::recipe::{Recipe, RecipeBook, RecipeError};

/// Seed catalog shipped with the crate.
const SEED_CATALOG: &str = include_str!("../assets/seed_catalog.toml");

/// Errors that can occur while loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Failed to read file.
    #[error("Failed to read catalog file: {0}")]
    Read(#[from] std::io::Error),

    /// Failed to parse TOML.
    #[error("Failed to parse catalog TOML: {0}")]
    Toml(#[from] toml::de::Error),

    /// Failed to parse RON.
    #[error("Failed to parse catalog RON: {0}")]
    Ron(#[from] ron::error::SpannedError),

    /// File extension is neither `toml` nor `ron`.
    #[error("Unsupported catalog format: {0}")]
    UnsupportedFormat(PathBuf),

    /// Malformed version string.
    #[error("Catalog version error: {0}")]
    Version(#[from] VersionError),

    /// Schema major version not readable.
    #[error("Catalog version {found} is not readable by this build (supports {supported})")]
    IncompatibleVersion {
        /// Version declared by the file
        found: SchemaVersion,
        /// Version this build writes
        supported: SchemaVersion,
    },

    /// Blank or padded name.
    #[error("Invalid name: {0}")]
    Name(#[from] IdError),

    /// Invalid recipe.
    #[error("Invalid recipe: {0}")]
    Recipe(#[from] RecipeError),

    /// Invalid starting inventory contents.
    #[error("Invalid inventory {inventory}: {source}")]
    Inventory {
        /// Inventory being loaded
        inventory: InventoryName,
        /// Underlying error
        source: InventoryError,
    },

    /// Two recipes share a name.
    #[error("Duplicate recipe name: {0}")]
    DuplicateRecipe(RecipeName),

    /// Two inventories share a name.
    #[error("Duplicate inventory name: {0}")]
    DuplicateInventory(InventoryName),

    /// Same item listed twice in one inventory.
    #[error("Inventory {inventory} lists {item} more than once")]
    DuplicateStock {
        /// Inventory being loaded
        inventory: InventoryName,
        /// Repeated item
        item: ItemType,
    },

    /// Item not in the declared registry.
    #[error("Unknown item {item:?} in {owner}")]
    UnknownItem {
        /// Recipe or inventory referencing it
        owner: String,
        /// Undeclared item
        item: String,
    },
}

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// One `{ item, quantity }` term of a recipe in a catalog file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngredientEntry {
    /// Item type.
    pub item: String,
    /// Quantity per craft.
    pub quantity: u32,
}

/// One `{ item, quantity }` stock line of an inventory in a catalog file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockEntry {
    /// Item type.
    pub item: String,
    /// Quantity held.
    pub quantity: u64,
}

/// A recipe definition as written in a catalog file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeDefinition {
    /// Recipe name.
    pub name: String,
    /// Recipe description.
    #[serde(default)]
    pub description: String,
    /// Consumed per craft.
    #[serde(default)]
    pub inputs: Vec<IngredientEntry>,
    /// Produced per craft.
    pub outputs: Vec<IngredientEntry>,
}

impl RecipeDefinition {
    /// Converts to a validated recipe.
    pub fn to_recipe(&self) -> CatalogResult<Recipe> {
        let mut builder = Recipe::builder(RecipeName::new(self.name.as_str())?)
            .description(self.description.as_str());
        for entry in &self.inputs {
            builder = builder.input(ItemType::new(entry.item.as_str())?, entry.quantity);
        }
        for entry in &self.outputs {
            builder = builder.output(ItemType::new(entry.item.as_str())?, entry.quantity);
        }
        Ok(builder.build()?)
    }
}

/// An inventory definition as written in a catalog file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryDefinition {
    /// Inventory name.
    pub name: String,
    /// Starting contents.
    #[serde(default)]
    pub items: Vec<StockEntry>,
}

impl InventoryDefinition {
    /// Converts to a named inventory.
    ///
    /// Zero stock lines are dropped; an item may appear only once.
    pub fn to_inventory(&self) -> CatalogResult<(InventoryName, Inventory)> {
        let name = InventoryName::new(self.name.as_str())?;
        let mut seen = HashSet::new();
        let mut entries = Vec::with_capacity(self.items.len());
        for entry in &self.items {
            let item = ItemType::new(entry.item.as_str())?;
            if !seen.insert(item.clone()) {
                return Err(CatalogError::DuplicateStock {
                    inventory: name,
                    item,
                });
            }
            entries.push((item, entry.quantity));
        }
        let inventory = Inventory::from_entries(entries).map_err(|source| {
            CatalogError::Inventory {
                inventory: name.clone(),
                source,
            }
        })?;
        Ok((name, inventory))
    }
}

/// A catalog file: recipes, starting inventories and an optional item list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogFile {
    /// File format version.
    #[serde(default = "default_version")]
    pub version: String,
    /// Known item types. Empty means any item is accepted.
    #[serde(default)]
    pub items: Vec<String>,
    /// Recipes in this file.
    #[serde(default)]
    pub recipes: Vec<RecipeDefinition>,
    /// Inventories in this file.
    #[serde(default)]
    pub inventories: Vec<InventoryDefinition>,
}

fn default_version() -> String {
    SchemaVersion::CATALOG.to_string()
}

/// A validated catalog, ready to seed a crafting context.
#[derive(Debug, Clone)]
pub struct Catalog {
    /// Schema version declared by the source.
    pub version: SchemaVersion,
    /// Declared item types (empty when the source declared none).
    pub items: BTreeSet<ItemType>,
    /// Recipes in definition order.
    pub recipes: RecipeBook,
    /// Inventories in definition order.
    pub inventories: Vec<(InventoryName, Inventory)>,
}

impl Catalog {
    /// Builds a catalog from already-constructed parts.
    ///
    /// Every recipe is validated again before it enters the book.
    pub fn new(
        recipes: impl IntoIterator<Item = Recipe>,
        inventories: impl IntoIterator<Item = (InventoryName, Inventory)>,
    ) -> CatalogResult<Self> {
        let mut book = RecipeBook::new();
        for recipe in recipes {
            recipe.validate()?;
            book.insert(recipe)
                .map_err(|r| CatalogError::DuplicateRecipe(r.name))?;
        }
        let mut names = HashSet::new();
        let mut list = Vec::new();
        for (name, inventory) in inventories {
            if !names.insert(name.clone()) {
                return Err(CatalogError::DuplicateInventory(name));
            }
            list.push((name, inventory));
        }
        Ok(Self {
            version: SchemaVersion::CATALOG,
            items: BTreeSet::new(),
            recipes: book,
            inventories: list,
        })
    }

    /// Returns the embedded seed catalog.
    pub fn seed() -> CatalogResult<Self> {
        Self::from_toml_str(SEED_CATALOG)
    }

    /// Parses and validates TOML text.
    pub fn from_toml_str(text: &str) -> CatalogResult<Self> {
        let file: CatalogFile = toml::from_str(text)?;
        Self::from_file(&file)
    }

    /// Parses and validates RON text.
    pub fn from_ron_str(text: &str) -> CatalogResult<Self> {
        let file: CatalogFile = ron::from_str(text)?;
        Self::from_file(&file)
    }

    /// Loads a catalog from disk, choosing the format by extension.
    pub fn load(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let path = path.as_ref();
        debug!("Loading catalog file: {:?}", path);

        let content = fs::read_to_string(path)?;
        let catalog = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_str(&content)?,
            Some("ron") => Self::from_ron_str(&content)?,
            _ => return Err(CatalogError::UnsupportedFormat(path.to_path_buf())),
        };

        info!(
            "Loaded {} recipes and {} inventories from {:?}",
            catalog.recipes.len(),
            catalog.inventories.len(),
            path
        );
        Ok(catalog)
    }

    /// Validates a parsed catalog file.
    pub fn from_file(file: &CatalogFile) -> CatalogResult<Self> {
        let version: SchemaVersion = file.version.parse()?;
        if !SchemaVersion::CATALOG.can_read(&version) {
            return Err(CatalogError::IncompatibleVersion {
                found: version,
                supported: SchemaVersion::CATALOG,
            });
        }

        let items = file
            .items
            .iter()
            .map(|i| ItemType::new(i.as_str()))
            .collect::<Result<BTreeSet<_>, _>>()?;

        let recipes = file
            .recipes
            .iter()
            .map(RecipeDefinition::to_recipe)
            .collect::<CatalogResult<Vec<_>>>()?;
        let inventories = file
            .inventories
            .iter()
            .map(InventoryDefinition::to_inventory)
            .collect::<CatalogResult<Vec<_>>>()?;

        let mut catalog = Self::new(recipes, inventories)?;
        catalog.version = version;
        catalog.items = items;
        catalog.check_registry()?;
        Ok(catalog)
    }

    /// With a non-empty item registry, every referenced item must be declared.
    fn check_registry(&self) -> CatalogResult<()> {
        if self.items.is_empty() {
            return Ok(());
        }
        let unknown = |owner: String, item: &ItemType| CatalogError::UnknownItem {
            owner,
            item: item.to_string(),
        };
        for recipe in self.recipes.iter() {
            for term in recipe.inputs.iter().chain(&recipe.outputs) {
                if !self.items.contains(&term.item) {
                    return Err(unknown(format!("recipe {}", recipe.name), &term.item));
                }
            }
        }
        for (name, inventory) in &self.inventories {
            for (item, _) in inventory.iter() {
                if !self.items.contains(item) {
                    return Err(unknown(format!("inventory {name}"), item));
                }
            }
        }
        Ok(())
    }
}
