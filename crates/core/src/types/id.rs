//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_string_id!` macro to create type-safe ID wrappers that
//! prevent accidentally mixing IDs from different entity types. Catalog ids
//! are opaque strings issued by the hosted backend, so the wrappers hold a
//! `String` rather than a number.

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>`, `From<&str>` and `AsRef<str>` implementations
///
/// # Example
///
/// ```rust
/// # use pace_note_core::define_string_id;
/// define_string_id!(ArticleId);
/// define_string_id!(OrderId);
///
/// let article_id = ArticleId::new("a-1");
/// let order_id = OrderId::new("a-1");
///
/// // These are different types, so this won't compile:
/// // let _: ArticleId = order_id;
/// assert_eq!(article_id.as_str(), order_id.as_str());
/// ```
#[macro_export]
macro_rules! define_string_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from anything string-like.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_string_id!(ProductId);
define_string_id!(LineId);

impl LineId {
    /// Derive the cart key for a product and an optional variant.
    ///
    /// The key is the product id alone, or `"{product_id}-{variant}"` when a
    /// variant is selected. An empty variant counts as no variant.
    ///
    /// ```
    /// use pace_note_core::{LineId, ProductId};
    ///
    /// let id = ProductId::new("p1");
    /// assert_eq!(LineId::derive(&id, Some("M")).as_str(), "p1-M");
    /// assert_eq!(LineId::derive(&id, None).as_str(), "p1");
    /// assert_eq!(LineId::derive(&id, Some("")).as_str(), "p1");
    /// ```
    #[must_use]
    pub fn derive(product_id: &ProductId, variant: Option<&str>) -> Self {
        match variant.filter(|v| !v.is_empty()) {
            Some(variant) => Self(format!("{product_id}-{variant}")),
            None => Self(product_id.as_str().to_owned()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_with_variant() {
        let id = LineId::derive(&ProductId::new("p1"), Some("XL"));
        assert_eq!(id.as_str(), "p1-XL");
    }

    #[test]
    fn test_derive_without_variant() {
        let id = LineId::derive(&ProductId::new("p2"), None);
        assert_eq!(id, LineId::new("p2"));
    }

    #[test]
    fn test_derive_empty_variant_is_no_variant() {
        let product = ProductId::new("p3");
        assert_eq!(LineId::derive(&product, Some("")), LineId::derive(&product, None));
    }

    #[test]
    fn test_ids_serialize_transparently() {
        let json = serde_json::to_string(&LineId::new("p1-M")).unwrap();
        assert_eq!(json, "\"p1-M\"");

        let parsed: ProductId = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(parsed.as_str(), "abc");
    }

    #[test]
    fn test_display_matches_inner() {
        assert_eq!(ProductId::new("p9").to_string(), "p9");
    }
}
