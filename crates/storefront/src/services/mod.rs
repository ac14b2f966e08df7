//! Application services.
//!
//! The two state containers ([`session`] and [`wishlist`]) are explicit
//! constructed objects handed to whoever needs them - no module-level
//! singletons. [`notifications`] is the capability seam for user-visible
//! confirmations and push-token handling.

pub mod notifications;
pub mod session;
pub mod wishlist;

pub use notifications::{LogNotificationSender, NotificationSender};
pub use session::{AuthProvider, SessionService};
pub use wishlist::WishlistService;
