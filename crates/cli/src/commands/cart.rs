//! Cart commands.
//!
//! Commands write their output to any `Write` so they can be tested against
//! an in-memory buffer and an in-memory store.

use std::io::{self, Read, Write};
use std::num::NonZeroU32;
use std::path::Path;

use pace_note_core::{CatalogProduct, CurrencyCode, ProductSnapshot};
use pace_note_storefront::cart::view::CartView;
use pace_note_storefront::{CartStore, PersistentStore};
use thiserror::Error;

/// Errors that can occur while running a cart command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Reading input or writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The catalog record is not valid JSON.
    #[error("Invalid catalog record: {0}")]
    Json(#[from] serde_json::Error),

    /// The product has no stock left.
    #[error("{0} is out of stock")]
    OutOfStock(String),

    /// The product is sized but no size was given.
    #[error("{name} requires a size (one of: {sizes})")]
    SizeRequired {
        /// Product name.
        name: String,
        /// Comma-separated size list.
        sizes: String,
    },

    /// The size is not offered for the product.
    #[error("{name} is not available in size {size}")]
    UnknownSize {
        /// Product name.
        name: String,
        /// Requested size.
        size: String,
    },
}

/// Read a catalog record from a file, or from stdin when the path is `-`.
///
/// # Errors
///
/// Returns an error if the input cannot be read or parsed.
pub fn read_catalog_product(path: &Path) -> Result<CatalogProduct, CommandError> {
    let raw = if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(path)?
    };
    Ok(serde_json::from_str(&raw)?)
}

/// Check stock and size the way the product page does before adding.
///
/// # Errors
///
/// Returns an error if the product is out of stock, or if the size is
/// missing or not offered.
pub fn checked_snapshot(
    product: &CatalogProduct,
    size: Option<&str>,
) -> Result<ProductSnapshot, CommandError> {
    if !product.in_stock() {
        return Err(CommandError::OutOfStock(product.name.clone()));
    }

    match size {
        None if product.requires_size() => {
            return Err(CommandError::SizeRequired {
                name: product.name.clone(),
                sizes: product.sizes.join(", "),
            });
        }
        Some(size) if product.requires_size() && !product.offers_size(size) => {
            return Err(CommandError::UnknownSize {
                name: product.name.clone(),
                size: size.to_owned(),
            });
        }
        _ => {}
    }

    Ok(product.snapshot())
}

/// Add a product and report the resulting line.
///
/// # Errors
///
/// Returns an error if writing the confirmation fails.
pub fn add<S: PersistentStore>(
    cart: &mut CartStore<S>,
    product: &ProductSnapshot,
    size: Option<&str>,
    quantity: NonZeroU32,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let line_id = cart.add_to_cart(product, size, quantity);
    let in_cart = cart.line(&line_id).map_or(0, |line| line.quantity.get());

    writeln!(
        out,
        "Added {quantity} x {} [{line_id}] ({in_cart} in cart, {} items total)",
        product.name,
        cart.cart_count()
    )?;
    Ok(())
}

/// Print the drawer summary, or the cart view as JSON.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn show<S: PersistentStore>(
    cart: &CartStore<S>,
    currency: CurrencyCode,
    json: bool,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let view = CartView::new(cart.cart(), currency);

    if json {
        serde_json::to_writer_pretty(&mut *out, &view)?;
        writeln!(out)?;
        return Ok(());
    }

    if view.is_empty {
        writeln!(out, "Your cart is empty.")?;
        return Ok(());
    }

    writeln!(out, "Shopping Cart ({} items)", view.item_count)?;
    for item in &view.items {
        let size = item
            .variant
            .as_ref()
            .map(|s| format!(" (Size: {s})"))
            .unwrap_or_default();
        writeln!(
            out,
            "  {}{size} x{}  {}  [{}]",
            item.name, item.quantity, item.line_price, item.id
        )?;
    }
    writeln!(out, "Subtotal: {}", view.subtotal)?;
    writeln!(out, "Shipping: calculated at checkout")?;
    Ok(())
}
