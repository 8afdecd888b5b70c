//! The Pace Note Storefront library.
//!
//! Client-side shopping cart state for the storefront: the [`cart::CartStore`]
//! that tracks what a shopper has picked, the durable key/value
//! [`storage`] it mirrors itself to, and the view models the drawer panel
//! and checkout summary render.
//!
//! # Modules
//!
//! - [`cart`] - Cart store and view models
//! - [`storage`] - `PersistentStore` trait with file and in-memory backends
//! - [`config`] - Environment-driven configuration

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod config;
pub mod storage;

pub use cart::{CartStore, PersistError};
pub use config::{CartConfig, ConfigError};
pub use storage::{FileStore, MemoryStore, PersistentStore, StorageError};
