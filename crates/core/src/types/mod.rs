//! Core types for The Pace Note.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod id;
pub mod price;
pub mod product;

pub use cart::{Cart, CartLine};
pub use id::{LineId, ProductId};
pub use price::{CurrencyCode, ParseCurrencyError, Price};
pub use product::{CatalogProduct, ProductImage, ProductSnapshot};
