//! Single-slot flash notifications.
//!
//! One pending notification per session: writing a new one replaces
//! whatever was there (last-write-wins, no backlog). The page shell renders
//! and consumes the slot on the next response; the banner auto-dismisses
//! after five seconds client-side.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::models::session_keys;

/// A pending notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub message: String,
    pub severity: Severity,
}

impl Flash {
    /// Build a notification without touching a session, for responses that
    /// render it inline instead of redirecting.
    #[must_use]
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
        }
    }
}

/// Notification severity, mirrored into a CSS class on the banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
    Info,
}

impl Severity {
    /// CSS class suffix for the banner.
    #[must_use]
    pub const fn css_class(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Info => "info",
        }
    }
}

/// Queue a notification for the next rendered page.
///
/// Replaces any notification already pending in this session.
///
/// # Errors
///
/// Returns an error if the session cannot be written.
pub async fn notify(
    session: &Session,
    message: impl Into<String>,
    severity: Severity,
) -> Result<(), tower_sessions::session::Error> {
    session
        .insert(session_keys::FLASH, Flash::new(message, severity))
        .await
}

/// Take the pending notification, leaving the slot empty.
///
/// Session read failures count as "nothing pending".
pub async fn take(session: &Session) -> Option<Flash> {
    session
        .remove::<Flash>(session_keys::FLASH)
        .await
        .ok()
        .flatten()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_css_class() {
        assert_eq!(Severity::Success.css_class(), "success");
        assert_eq!(Severity::Error.css_class(), "error");
        assert_eq!(Severity::Info.css_class(), "info");
    }

    #[test]
    fn test_flash_serde_severity_lowercase() {
        let flash = Flash::new("Cart added successfully", Severity::Success);
        let json = serde_json::to_value(&flash).expect("serializes");
        assert_eq!(json["severity"], "success");
        assert_eq!(json["message"], "Cart added successfully");
    }
}
