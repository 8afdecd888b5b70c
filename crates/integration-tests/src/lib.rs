//! Integration tests for The Pace Note.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p pace-note-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_persistence` - Cart store over the file backend across reloads
//! - `cart_properties` - Count/total/merge laws over operation sequences
//!
//! Shared fixtures live here so each test file stays focused on behaviour.

use std::num::NonZeroU32;

use pace_note_core::ProductSnapshot;
use rust_decimal::Decimal;

/// Storage key used by every test.
pub const CART_KEY: &str = "cart";

/// The hoodie from the shop's front page.
#[must_use]
pub fn hoodie() -> ProductSnapshot {
    ProductSnapshot::new("p1", "Hoodie", Decimal::from(249)).with_images(["img.png"])
}

/// A sticker with no product image.
#[must_use]
pub fn sticker() -> ProductSnapshot {
    ProductSnapshot::new("p2", "Sticker", Decimal::from(49))
}

/// Shorthand for a non-zero quantity; zero maps to one.
#[must_use]
pub fn qty(n: u32) -> NonZeroU32 {
    NonZeroU32::new(n).unwrap_or(NonZeroU32::MIN)
}
