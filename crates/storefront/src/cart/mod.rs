//! The shopper's cart, mirrored to durable storage.
//!
//! [`CartStore`] owns the in-memory [`Cart`] and a [`PersistentStore`]. Every
//! mutation updates memory first and then writes the whole line collection
//! under one key. Storage failures never escape a mutation: they are logged,
//! the store is flagged non-durable, and memory stays authoritative.
//!
//! # Lifecycle
//!
//! ```rust
//! use std::num::NonZeroU32;
//!
//! use pace_note_core::ProductSnapshot;
//! use pace_note_storefront::cart::CartStore;
//! use pace_note_storefront::storage::MemoryStore;
//! use rust_decimal::Decimal;
//!
//! let mut cart = CartStore::initialize(MemoryStore::new(), "cart");
//! let hoodie = ProductSnapshot::new("p1", "Hoodie", Decimal::from(249));
//!
//! cart.add_to_cart(&hoodie, Some("M"), NonZeroU32::MIN);
//! assert_eq!(cart.cart_count(), 1);
//! assert!(cart.is_drawer_open());
//!
//! let store = cart.teardown();
//! let reloaded = CartStore::initialize(store, "cart");
//! assert_eq!(reloaded.cart_count(), 1);
//! ```
//!
//! # Multiple contexts
//!
//! Two stores over the same backing storage do not notice each other's
//! writes. Each reads storage only in [`CartStore::initialize`] and
//! [`CartStore::reload`], so the last writer wins.

pub mod view;

use std::num::NonZeroU32;

use pace_note_core::{Cart, CartLine, LineId, ProductSnapshot};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::instrument;

use crate::storage::PersistentStore;

/// Errors from writing the cart snapshot.
#[derive(Debug, Error)]
pub enum PersistError {
    /// The cart could not be encoded.
    #[error("failed to serialize cart: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The backing store rejected the write.
    #[error("failed to write cart to storage: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// The cart for one storefront context, synchronized to durable storage.
#[derive(Debug)]
pub struct CartStore<S: PersistentStore> {
    store: S,
    key: String,
    cart: Cart,
    drawer_open: bool,
    durable: bool,
}

impl<S: PersistentStore> CartStore<S> {
    /// Create the store, restoring any snapshot saved under `key`.
    ///
    /// A missing, unreadable, or malformed snapshot yields an empty cart.
    /// This never fails.
    pub fn initialize(store: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let cart = load_snapshot(&store, &key);
        tracing::debug!(key = %key, lines = cart.len(), "Cart initialized");

        Self {
            store,
            key,
            cart,
            drawer_open: false,
            durable: true,
        }
    }

    /// Flush a pending write if the last one failed, then hand back the store.
    pub fn teardown(self) -> S {
        if !self.durable {
            match self.persist() {
                Ok(()) => tracing::info!(key = %self.key, "Cart written on teardown"),
                Err(e) => tracing::error!(key = %self.key, "Cart lost on teardown: {e}"),
            }
        }
        self.store
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add `quantity` of a product to the cart and open the drawer.
    ///
    /// An existing line with the same product and variant grows; its name,
    /// price, and image keep their original values. Returns the line's key.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub fn add_to_cart(
        &mut self,
        product: &ProductSnapshot,
        variant: Option<&str>,
        quantity: NonZeroU32,
    ) -> LineId {
        let line_id = self.cart.add(product, variant, quantity);
        self.drawer_open = true;
        self.sync();
        line_id
    }

    /// Remove a line. Unknown keys are ignored.
    #[instrument(skip(self))]
    pub fn remove_from_cart(&mut self, line_id: &LineId) {
        if !self.cart.remove(line_id) {
            tracing::debug!("No cart line to remove");
        }
        self.sync();
    }

    /// Set a line's quantity. Zero or negative removes the line; unknown keys
    /// are ignored.
    #[instrument(skip(self))]
    pub fn update_quantity(&mut self, line_id: &LineId, quantity: i64) {
        if quantity <= 0 {
            self.remove_from_cart(line_id);
            return;
        }
        if !self.cart.set_quantity(line_id, quantity) {
            tracing::debug!("No cart line to update");
        }
        self.sync();
    }

    /// Add one to a line's quantity.
    pub fn increment(&mut self, line_id: &LineId) {
        if let Some(quantity) = self.quantity_of(line_id) {
            self.update_quantity(line_id, quantity.saturating_add(1));
        }
    }

    /// Take one from a line's quantity, removing it when it reaches zero.
    pub fn decrement(&mut self, line_id: &LineId) {
        if let Some(quantity) = self.quantity_of(line_id) {
            self.update_quantity(line_id, (quantity - 1).max(0));
        }
    }

    /// Empty the cart.
    #[instrument(skip(self))]
    pub fn clear_cart(&mut self) {
        self.cart.clear();
        self.sync();
    }

    /// Show or hide the cart drawer. Not persisted.
    pub const fn set_drawer_open(&mut self, open: bool) {
        self.drawer_open = open;
    }

    /// Replace memory with whatever is currently in storage.
    ///
    /// Use this to pick up writes made by another context sharing the same
    /// storage. Local changes that were never persisted are discarded.
    pub fn reload(&mut self) {
        self.cart = load_snapshot(&self.store, &self.key);
        self.durable = true;
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Write the full line collection to storage, replacing the previous value.
    ///
    /// # Errors
    ///
    /// Returns `PersistError` if encoding fails or the store rejects the write.
    pub fn persist(&self) -> Result<(), PersistError> {
        let snapshot = serde_json::to_string(&self.cart)?;
        self.store
            .set(&self.key, &snapshot)
            .map_err(|e| PersistError::Storage(Box::new(e)))
    }

    fn sync(&mut self) {
        match self.persist() {
            Ok(()) => {
                if !self.durable {
                    tracing::info!(key = %self.key, "Cart storage recovered");
                }
                self.durable = true;
            }
            Err(e) => {
                tracing::error!(
                    key = %self.key,
                    lines = self.cart.len(),
                    "Failed to persist cart, keeping in-memory state: {e}"
                );
                self.durable = false;
            }
        }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Lines in the order they were first added.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        self.cart.lines()
    }

    /// Look up one line.
    #[must_use]
    pub fn line(&self, line_id: &LineId) -> Option<&CartLine> {
        self.cart.get(line_id)
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Total number of items across all lines.
    #[must_use]
    pub fn cart_count(&self) -> u64 {
        self.cart.count()
    }

    /// Sum of `unit_price * quantity` across all lines.
    #[must_use]
    pub fn cart_total(&self) -> Decimal {
        self.cart.total()
    }

    #[must_use]
    pub const fn is_drawer_open(&self) -> bool {
        self.drawer_open
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }

    /// Whether the most recent write reached storage.
    #[must_use]
    pub const fn is_durable(&self) -> bool {
        self.durable
    }

    /// Storage key the snapshot is written under.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The backing store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    fn quantity_of(&self, line_id: &LineId) -> Option<i64> {
        self.cart
            .get(line_id)
            .map(|line| i64::from(line.quantity.get()))
    }
}

fn load_snapshot<S: PersistentStore>(store: &S, key: &str) -> Cart {
    match store.get(key) {
        Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!(key, "Discarding unreadable cart snapshot: {e}");
            Cart::new()
        }),
        Ok(None) => Cart::new(),
        Err(e) => {
            tracing::warn!(key, "Failed to read cart from storage: {e}");
            Cart::new()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, StorageError};

    const KEY: &str = "cart";

    fn qty(n: u32) -> NonZeroU32 {
        NonZeroU32::new(n).unwrap()
    }

    fn hoodie() -> ProductSnapshot {
        ProductSnapshot::new("p1", "Hoodie", Decimal::from(249)).with_images(["img.png"])
    }

    fn sticker() -> ProductSnapshot {
        ProductSnapshot::new("p2", "Sticker", Decimal::from(49))
    }

    fn saved_lines(store: &MemoryStore) -> Vec<CartLine> {
        serde_json::from_str(&store.raw(KEY).unwrap()).unwrap()
    }

    /// Store whose writes always fail, for exercising the durability path.
    #[derive(Debug, Default)]
    struct BrokenStore;

    impl PersistentStore for BrokenStore {
        type Error = StorageError;

        fn get(&self, _key: &str) -> Result<Option<String>, Self::Error> {
            Err(StorageError::Io(std::io::Error::other("disk gone")))
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), Self::Error> {
            Err(StorageError::Io(std::io::Error::other("disk gone")))
        }
    }

    #[test]
    fn test_initialize_empty_store() {
        let cart = CartStore::initialize(MemoryStore::new(), KEY);
        assert!(cart.is_empty());
        assert!(!cart.is_drawer_open());
        assert!(cart.is_durable());
        assert_eq!(cart.key(), KEY);
    }

    #[test]
    fn test_initialize_discards_malformed_snapshot() {
        let store = MemoryStore::new();
        store.insert_raw(KEY, "{not json");

        let cart = CartStore::initialize(store, KEY);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_initialize_discards_non_array_snapshot() {
        let store = MemoryStore::new();
        store.insert_raw(KEY, "null");

        let cart = CartStore::initialize(store, KEY);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_initialize_survives_read_failure() {
        let cart = CartStore::initialize(BrokenStore, KEY);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_initialize_adopts_legacy_line_ids() {
        let store = MemoryStore::new();
        store.insert_raw(
            KEY,
            r#"[{"id":"legacy_key","productId":"p1","name":"Hoodie","price":249,"image":"","size":"M","quantity":2}]"#,
        );

        let cart = CartStore::initialize(store, KEY);
        let line = cart.line(&LineId::new("legacy_key")).unwrap();
        assert_eq!(line.quantity.get(), 2);
        assert_eq!(line.variant.as_deref(), Some("M"));
    }

    #[test]
    fn test_initialize_keeps_lines_without_name() {
        let store = MemoryStore::new();
        store.insert_raw(
            KEY,
            r#"[{"id":"p1-M","productId":"p1","name":"Hoodie","price":249,"image":"img.png","size":"M","quantity":3},{"id":"p2","productId":"p2","price":49,"image":"","quantity":1}]"#,
        );

        let cart = CartStore::initialize(store, KEY);
        assert_eq!(cart.lines().len(), 2);
        assert_eq!(cart.cart_count(), 4);
        assert_eq!(cart.line(&LineId::new("p2")).unwrap().name, "");
        assert_eq!(cart.cart_total(), Decimal::from(796));
    }

    #[test]
    fn test_add_merges_and_opens_drawer() {
        let store = MemoryStore::new();
        let mut cart = CartStore::initialize(store.clone(), KEY);

        let first = cart.add_to_cart(&hoodie(), Some("M"), qty(1));
        cart.set_drawer_open(false);
        let second = cart.add_to_cart(&hoodie(), Some("M"), qty(2));

        assert_eq!(first, second);
        assert_eq!(first.as_str(), "p1-M");
        assert!(cart.is_drawer_open());
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.line(&first).unwrap().quantity.get(), 3);
        assert_eq!(cart.cart_total(), Decimal::from(747));
        assert_eq!(saved_lines(&store).len(), 1);
    }

    #[test]
    fn test_add_without_variant_or_image() {
        let mut cart = CartStore::initialize(MemoryStore::new(), KEY);
        let id = cart.add_to_cart(&sticker(), None, qty(1));

        let line = cart.line(&id).unwrap();
        assert_eq!(id.as_str(), "p2");
        assert_eq!(line.image_ref, "");
    }

    #[test]
    fn test_count_and_total() {
        let mut cart = CartStore::initialize(MemoryStore::new(), KEY);
        cart.add_to_cart(&hoodie(), Some("M"), qty(3));
        cart.add_to_cart(&sticker(), None, qty(1));

        assert_eq!(cart.cart_count(), 4);
        assert_eq!(cart.cart_total(), Decimal::from(796));
    }

    #[test]
    fn test_update_quantity_nonpositive_matches_remove() {
        for requested in [0, -5] {
            let mut updated = CartStore::initialize(MemoryStore::new(), KEY);
            let mut removed = CartStore::initialize(MemoryStore::new(), KEY);
            for cart in [&mut updated, &mut removed] {
                cart.add_to_cart(&hoodie(), Some("M"), qty(3));
                cart.add_to_cart(&sticker(), None, qty(1));
            }

            updated.update_quantity(&LineId::new("p1-M"), requested);
            removed.remove_from_cart(&LineId::new("p1-M"));

            assert_eq!(updated.cart(), removed.cart());
            assert_eq!(updated.store().raw(KEY), removed.store().raw(KEY));
        }
    }

    #[test]
    fn test_update_quantity_sets_absolute_value() {
        let store = MemoryStore::new();
        let mut cart = CartStore::initialize(store.clone(), KEY);
        let id = cart.add_to_cart(&hoodie(), Some("M"), qty(3));

        cart.update_quantity(&id, 1);

        assert_eq!(cart.cart_count(), 1);
        assert_eq!(saved_lines(&store)[0].quantity.get(), 1);
    }

    #[test]
    fn test_update_unknown_line_is_noop() {
        let mut cart = CartStore::initialize(MemoryStore::new(), KEY);
        cart.add_to_cart(&sticker(), None, qty(1));
        let before = cart.cart().clone();

        cart.update_quantity(&LineId::new("ghost"), 7);
        assert_eq!(cart.cart(), &before);
    }

    #[test]
    fn test_remove_twice_is_idempotent() {
        let store = MemoryStore::new();
        let mut cart = CartStore::initialize(store.clone(), KEY);
        cart.add_to_cart(&hoodie(), Some("M"), qty(1));
        let id = cart.add_to_cart(&sticker(), None, qty(1));

        cart.remove_from_cart(&id);
        let once = store.raw(KEY);
        cart.remove_from_cart(&id);

        assert_eq!(store.raw(KEY), once);
        assert_eq!(cart.lines().len(), 1);
    }

    #[test]
    fn test_increment_and_decrement() {
        let mut cart = CartStore::initialize(MemoryStore::new(), KEY);
        let id = cart.add_to_cart(&sticker(), None, qty(1));

        cart.increment(&id);
        assert_eq!(cart.cart_count(), 2);

        cart.decrement(&id);
        cart.decrement(&id);
        assert!(cart.line(&id).is_none());

        // Unknown keys stay untouched
        cart.increment(&id);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_clear_cart_persists_empty_list() {
        let store = MemoryStore::new();
        let mut cart = CartStore::initialize(store.clone(), KEY);
        cart.add_to_cart(&hoodie(), None, qty(2));

        cart.clear_cart();

        assert!(cart.is_empty());
        assert_eq!(store.raw(KEY).as_deref(), Some("[]"));
    }

    #[test]
    fn test_drawer_flag_not_persisted() {
        let store = MemoryStore::new();
        let mut cart = CartStore::initialize(store.clone(), KEY);
        cart.add_to_cart(&sticker(), None, qty(1));
        let before = store.raw(KEY);

        cart.set_drawer_open(false);
        cart.set_drawer_open(true);

        assert_eq!(store.raw(KEY), before);
        assert!(!before.unwrap().contains("open"));
    }

    #[test]
    fn test_roundtrip_through_storage() {
        let mut cart = CartStore::initialize(MemoryStore::new(), KEY);
        cart.add_to_cart(&hoodie(), Some("M"), qty(3));
        cart.add_to_cart(&sticker(), None, qty(1));
        cart.add_to_cart(&hoodie(), Some("L"), qty(1));
        let lines = cart.lines().to_vec();

        let restored = CartStore::initialize(cart.teardown(), KEY);
        assert_eq!(restored.lines(), lines.as_slice());
        assert!(!restored.is_drawer_open());
    }

    #[test]
    fn test_write_failure_keeps_memory_authoritative() {
        let mut cart = CartStore::initialize(BrokenStore, KEY);

        cart.add_to_cart(&hoodie(), Some("M"), qty(2));
        cart.add_to_cart(&sticker(), None, qty(1));

        assert!(!cart.is_durable());
        assert_eq!(cart.cart_count(), 3);
        assert!(matches!(cart.persist(), Err(PersistError::Storage(_))));
    }

    #[test]
    fn test_quota_failure_then_recovery() {
        let store = MemoryStore::with_quota(200);
        let mut cart = CartStore::initialize(store.clone(), KEY);
        let id = cart.add_to_cart(&sticker(), None, qty(1));
        assert!(cart.is_durable());

        let big = ProductSnapshot::new("p9", "x".repeat(300), Decimal::from(1));
        let big_id = cart.add_to_cart(&big, None, qty(1));
        assert!(!cart.is_durable());
        assert_eq!(cart.lines().len(), 2);
        // Storage still holds the last good snapshot
        assert_eq!(saved_lines(&store).len(), 1);

        cart.remove_from_cart(&big_id);
        assert!(cart.is_durable());
        assert_eq!(saved_lines(&store)[0].line_id, id);
    }

    #[test]
    fn test_teardown_retries_failed_write() {
        let store = MemoryStore::with_quota(200);
        let mut cart = CartStore::initialize(store.clone(), KEY);
        let big = ProductSnapshot::new("p9", "x".repeat(300), Decimal::from(1));
        cart.add_to_cart(&big, None, qty(1));
        assert!(store.raw(KEY).is_none());

        // Still over quota, so teardown cannot help; nothing panics
        let returned = cart.teardown();
        assert!(returned.raw(KEY).is_none());
    }

    #[test]
    fn test_contexts_diverge_until_reload() {
        let shared = MemoryStore::new();
        let mut tab_a = CartStore::initialize(shared.clone(), KEY);
        let mut tab_b = CartStore::initialize(shared.clone(), KEY);

        tab_a.add_to_cart(&hoodie(), Some("M"), qty(1));
        assert!(tab_b.is_empty());

        // Last writer wins
        tab_b.add_to_cart(&sticker(), None, qty(1));
        assert_eq!(saved_lines(&shared).len(), 1);
        assert_eq!(saved_lines(&shared)[0].line_id.as_str(), "p2");

        tab_a.reload();
        assert_eq!(tab_a.lines(), tab_b.lines());
    }
}
