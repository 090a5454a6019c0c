//! Identifier types for item types, recipes and inventories.
//!
//! All three are thin wrappers around a validated `String`. They hash and
//! order exactly like the wrapped text, so maps keyed by them can be queried
//! with a plain `&str`.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

use crate::error::IdError;

fn check(kind: &'static str, value: String) -> Result<String, IdError> {
    if value.trim().is_empty() {
        return Err(IdError::Blank { kind });
    }
    if value.trim() != value {
        return Err(IdError::Padded { kind, value });
    }
    Ok(value)
}

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates the identifier, rejecting blank or padded text.
            pub fn new(value: impl Into<String>) -> Result<Self, IdError> {
                check($kind, value.into()).map(Self)
            }

            /// Returns the identifier text.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = IdError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

string_id!(
    /// Identifier for a fungible item type, e.g. `flour`.
    ItemType,
    "item type"
);

string_id!(
    /// Name of a recipe in the catalog, e.g. `roll flattened dough`.
    RecipeName,
    "recipe name"
);

string_id!(
    /// Name of an inventory, e.g. `backpack`.
    InventoryName,
    "inventory name"
);
