//! The Pace Note Core - Shared types library.
//!
//! This crate provides the types used across all Pace Note components:
//! - `storefront` - Cart Store, storage backends, and view models
//! - `cli` - Terminal front-end for the cart
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no storage,
//! no logging. Everything here can be unit tested without fakes.
//!
//! # Modules
//!
//! - [`types`] - Newtype ids, prices, product snapshots, and the cart collection

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
