//! Session-related types.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use papaya_market_core::UserId;

/// Session-stored user identity.
///
/// Minimal data identifying the logged-in user. Only produced by the
/// `RequireAuth` extractor, which guarantees the token cell was present:
/// without a token the user id is never treated as an identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Store API user id.
    pub user_id: UserId,
    /// Opaque access token. Never validated or decoded locally; any stored
    /// non-empty value counts as authenticated.
    pub token: String,
}

/// Session keys for persisted cells.
pub mod session_keys {
    /// Key for the opaque access token.
    pub const TOKEN: &str = "token";

    /// Key for the authenticated user's id.
    pub const USER_ID: &str = "userId";

    /// Key for the single-slot flash notification.
    pub const FLASH: &str = "flash";
}
