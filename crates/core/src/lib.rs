//! Lookbook Core - Shared types library.
//!
//! This crate provides common types used across all Lookbook components:
//! - `storefront` - The storefront service (catalog, wishlist, auth, AI flows)
//! - `integration-tests` - Container and flow tests
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no hosted
//! service SDKs. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, and roles

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
