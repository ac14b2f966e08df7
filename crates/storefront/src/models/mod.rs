//! Domain models.
//!
//! Container-owned state lives in [`session`] and [`wishlist`]; the backend
//! owns the canonical copy of everything in [`catalog`], of which the
//! storefront holds only transient projections.

pub mod catalog;
pub mod session;
pub mod wishlist;
