//! Role flags carried on a session.

use serde::{Deserialize, Serialize};

/// Role flags for an authenticated user.
///
/// Both flags default to `false`; absent fields in older persisted snapshots
/// deserialize to the default.
///
/// Note: the dealer flag only gates what the storefront *shows* (dealer
/// pricing). It is advisory - any authorization that matters must be
/// enforced by the backend, never derived from this client-held flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roles {
    /// Can manage products, categories, and site configuration.
    #[serde(default)]
    pub administrator: bool,
    /// Sees dealer pricing on products that carry one.
    #[serde(default)]
    pub dealer: bool,
}
