//! Product shapes consumed by the cart.
//!
//! The catalog hands out full [`CatalogProduct`] records; the cart only ever
//! sees the narrower [`ProductSnapshot`], so every caller normalizes first.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;

/// A product image reference.
///
/// Catalog records carry image URLs as plain strings, while bundled demo
/// products carry opaque handles with a `src` field. Both forms deserialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductImage {
    /// A plain URL.
    Url(String),
    /// An image handle exposing its URL as `src`.
    Handle {
        /// URL of the image.
        src: String,
    },
}

impl ProductImage {
    /// Returns the image URL regardless of representation.
    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            Self::Url(url) | Self::Handle { src: url } => url,
        }
    }
}

impl From<&str> for ProductImage {
    fn from(url: &str) -> Self {
        Self::Url(url.to_owned())
    }
}

impl From<String> for ProductImage {
    fn from(url: String) -> Self {
        Self::Url(url)
    }
}

/// The product fields captured when an item is added to the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub images: Vec<ProductImage>,
}

impl ProductSnapshot {
    /// Create a snapshot with no images.
    #[must_use]
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: Decimal) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            images: Vec::new(),
        }
    }

    /// Builder-style image setter.
    #[must_use]
    pub fn with_images<I>(mut self, images: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<ProductImage>,
    {
        self.images = images.into_iter().map(Into::into).collect();
        self
    }

    /// URL of the first image, or an empty string when there is none.
    #[must_use]
    pub fn first_image_url(&self) -> &str {
        self.images.first().map_or("", ProductImage::url)
    }
}

/// A product record as returned by the catalog service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogProduct {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub images: Vec<ProductImage>,
    /// Size codes offered for this product; empty when the product is unsized.
    #[serde(default)]
    pub sizes: Vec<String>,
}

impl CatalogProduct {
    /// Normalize into the shape the cart accepts.
    #[must_use]
    pub fn snapshot(&self) -> ProductSnapshot {
        ProductSnapshot {
            id: self.id.clone(),
            name: self.name.clone(),
            price: self.price,
            images: self.images.clone(),
        }
    }

    /// Whether the product can be added to a cart at all.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Whether a size must be picked before adding.
    #[must_use]
    pub fn requires_size(&self) -> bool {
        !self.sizes.is_empty()
    }

    /// Whether `size` is one of this product's offered sizes.
    #[must_use]
    pub fn offers_size(&self, size: &str) -> bool {
        self.sizes.iter().any(|s| s == size)
    }
}
