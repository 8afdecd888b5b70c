//! Cart lines and the ordered cart collection.
//!
//! [`Cart`] holds the pure business rules (merge on add, absolute quantity
//! updates, derived totals). It does no I/O; persistence lives with the
//! storefront's cart store.
//!
//! ## Invariants
//!
//! - At most one [`CartLine`] per [`LineId`]
//! - Every stored line has `quantity >= 1` (enforced by [`NonZeroU32`])
//! - Lines keep insertion order
//! - Name, price and image are snapshots taken when the line is created

use core::num::NonZeroU32;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{LineId, ProductId};
use super::product::ProductSnapshot;

/// One row in the cart.
///
/// Field names on the wire match the snapshot shape the storefront has always
/// written to browser storage: `id`, `productId`, `name`, `price`, `image`,
/// `size`, `quantity`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    #[serde(rename = "id")]
    pub line_id: LineId,
    pub product_id: ProductId,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "price")]
    pub unit_price: Decimal,
    #[serde(rename = "image", default)]
    pub image_ref: String,
    #[serde(rename = "size", default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    pub quantity: NonZeroU32,
}

impl CartLine {
    /// Price of this line (`unit_price * quantity`).
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price
            .saturating_mul(Decimal::from(self.quantity.get()))
    }
}

/// An ordered collection of cart lines keyed by [`LineId`].
///
/// Serializes as a plain JSON array of lines. Deserializing goes through
/// [`Cart::from_lines`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Vec<CartLine>")]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Build a cart from restored lines.
    ///
    /// Lines sharing a `LineId` are folded into the first occurrence with their
    /// quantities summed, so hand-edited or legacy snapshots cannot break the
    /// one-line-per-key invariant.
    #[must_use]
    pub fn from_lines(lines: Vec<CartLine>) -> Self {
        let mut cart = Self::new();
        for line in lines {
            match cart.position(&line.line_id) {
                Some(idx) => {
                    if let Some(existing) = cart.lines.get_mut(idx) {
                        existing.quantity = existing.quantity.saturating_add(line.quantity.get());
                    }
                }
                None => cart.lines.push(line),
            }
        }
        cart
    }

    /// Add `quantity` of a product (and optional variant) to the cart.
    ///
    /// If a line with the derived key exists its quantity grows and its
    /// snapshot is left untouched; otherwise a new line is appended.
    /// Returns the key of the affected line.
    pub fn add(
        &mut self,
        product: &ProductSnapshot,
        variant: Option<&str>,
        quantity: NonZeroU32,
    ) -> LineId {
        let line_id = LineId::derive(&product.id, variant);

        if let Some(existing) = self.lines.iter_mut().find(|line| line.line_id == line_id) {
            existing.quantity = existing.quantity.saturating_add(quantity.get());
        } else {
            self.lines.push(CartLine {
                line_id: line_id.clone(),
                product_id: product.id.clone(),
                name: product.name.clone(),
                unit_price: product.price,
                image_ref: product.first_image_url().to_owned(),
                variant: variant.filter(|v| !v.is_empty()).map(str::to_owned),
                quantity,
            });
        }

        line_id
    }

    /// Remove the line with this key. Returns whether a line was removed.
    pub fn remove(&mut self, line_id: &LineId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| &line.line_id != line_id);
        self.lines.len() != before
    }

    /// Set a line's quantity to an absolute value.
    ///
    /// A quantity of zero or less removes the line. Quantities above
    /// `u32::MAX` are clamped. Returns whether the cart changed.
    pub fn set_quantity(&mut self, line_id: &LineId, quantity: i64) -> bool {
        let Some(quantity) = u32::try_from(quantity.max(0))
            .map_or(Some(NonZeroU32::MAX), NonZeroU32::new)
        else {
            return self.remove(line_id);
        };

        match self.lines.iter_mut().find(|line| &line.line_id == line_id) {
            Some(line) => {
                line.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Look up a line by key.
    #[must_use]
    pub fn get(&self, line_id: &LineId) -> Option<&CartLine> {
        self.lines.iter().find(|line| &line.line_id == line_id)
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total number of items: the sum of all line quantities.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.lines
            .iter()
            .map(|line| u64::from(line.quantity.get()))
            .sum()
    }

    /// Sum of `unit_price * quantity` over all lines.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.lines
            .iter()
            .fold(Decimal::ZERO, |acc, line| acc.saturating_add(line.line_total()))
    }

    fn position(&self, line_id: &LineId) -> Option<usize> {
        self.lines.iter().position(|line| &line.line_id == line_id)
    }
}

impl From<Vec<CartLine>> for Cart {
    fn from(lines: Vec<CartLine>) -> Self {
        Self::from_lines(lines)
    }
}

impl Serialize for Cart {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.lines.serialize(serializer)
    }
}
