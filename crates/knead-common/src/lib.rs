//! # Knead Common
//!
//! Common types shared by the Knead crafting crates.
//!
//! This crate provides foundational types used across the workspace:
//! - Identifier types (item types, recipe names, inventory names)
//! - Version information for the catalog schema
//! - Common error types
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod error;
pub mod ids;
pub mod version;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::*;
    pub use crate::ids::*;
    pub use crate::version::*;
}

pub use prelude::*;
