//! Cart display data for the drawer panel and the checkout summary.

use pace_note_core::{Cart, CartLine, CurrencyCode, Price};
use rust_decimal::Decimal;
use serde::Serialize;

/// Image shown for lines whose product had no picture.
pub const PLACEHOLDER_IMAGE: &str = "/images/logo.png";

/// Cart item display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartItemView {
    pub id: String,
    pub name: String,
    pub variant: Option<String>,
    pub quantity: u32,
    pub unit_price: String,
    pub line_price: String,
    pub image: String,
}

/// Cart display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    /// Shipping is quoted separately, so this equals the subtotal.
    pub total: String,
    pub item_count: u64,
    pub is_empty: bool,
}

impl CartView {
    /// Create an empty cart view.
    #[must_use]
    pub fn empty(currency: CurrencyCode) -> Self {
        Self::new(&Cart::new(), currency)
    }

    /// Build the view for a cart, rendering amounts in `currency`.
    #[must_use]
    pub fn new(cart: &Cart, currency: CurrencyCode) -> Self {
        let subtotal = format_price(cart.total(), currency);
        Self {
            items: cart
                .lines()
                .iter()
                .map(|line| CartItemView::new(line, currency))
                .collect(),
            total: subtotal.clone(),
            subtotal,
            item_count: cart.count(),
            is_empty: cart.is_empty(),
        }
    }
}

impl CartItemView {
    #[must_use]
    pub fn new(line: &CartLine, currency: CurrencyCode) -> Self {
        Self {
            id: line.line_id.to_string(),
            name: line.name.clone(),
            variant: line.variant.clone(),
            quantity: line.quantity.get(),
            unit_price: format_price(line.unit_price, currency),
            line_price: format_price(line.line_total(), currency),
            image: if line.image_ref.is_empty() {
                PLACEHOLDER_IMAGE.to_string()
            } else {
                line.image_ref.clone()
            },
        }
    }
}

fn format_price(amount: Decimal, currency: CurrencyCode) -> String {
    Price::new(amount, currency).to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::num::NonZeroU32;

    use pace_note_core::ProductSnapshot;

    use super::*;

    fn sample_cart() -> Cart {
        let mut cart = Cart::new();
        let hoodie =
            ProductSnapshot::new("p1", "Hoodie", Decimal::from(249)).with_images(["img.png"]);
        let sticker = ProductSnapshot::new("p2", "Sticker", Decimal::from(49));
        cart.add(&hoodie, Some("M"), NonZeroU32::new(3).unwrap());
        cart.add(&sticker, None, NonZeroU32::MIN);
        cart
    }

    #[test]
    fn test_empty_view() {
        let view = CartView::empty(CurrencyCode::RON);
        assert!(view.is_empty);
        assert!(view.items.is_empty());
        assert_eq!(view.subtotal, "0 RON");
        assert_eq!(view.item_count, 0);
    }

    #[test]
    fn test_view_totals() {
        let view = CartView::new(&sample_cart(), CurrencyCode::RON);
        assert_eq!(view.item_count, 4);
        assert_eq!(view.subtotal, "796 RON");
        assert_eq!(view.total, view.subtotal);
        assert!(!view.is_empty);
    }

    #[test]
    fn test_item_view_prices_and_size() {
        let view = CartView::new(&sample_cart(), CurrencyCode::RON);
        let hoodie = &view.items[0];
        assert_eq!(hoodie.id, "p1-M");
        assert_eq!(hoodie.variant.as_deref(), Some("M"));
        assert_eq!(hoodie.unit_price, "249 RON");
        assert_eq!(hoodie.line_price, "747 RON");
        assert_eq!(hoodie.image, "img.png");
    }

    #[test]
    fn test_item_without_image_uses_placeholder() {
        let view = CartView::new(&sample_cart(), CurrencyCode::EUR);
        let sticker = &view.items[1];
        assert_eq!(sticker.image, PLACEHOLDER_IMAGE);
        assert_eq!(sticker.line_price, "49 EUR");
        assert!(sticker.variant.is_none());
    }
}
