//! Access guard for the single authorized user.
//!
//! The bot serves exactly one configured identity; everyone else gets a
//! fixed denial and nothing happens.

use teloxide::types::UserId;

/// Denial reply for unauthorized messages (MarkdownV2).
pub const DENIED: &str = "⛔ This is a private bot\\. Access denied\\.";

/// Denial text for unauthorized button presses (plain, shown as a
/// callback answer).
pub const DENIED_ALERT: &str = "Access denied";

/// Compares inbound sender identities against the configured one.
#[derive(Debug, Clone, Copy)]
pub struct AccessGuard {
    authorized: UserId,
}

impl AccessGuard {
    pub fn new(authorized: UserId) -> Self {
        Self { authorized }
    }

    /// Whether the sender may interact with the bot.
    ///
    /// Updates without a sender (channel posts, anonymous admins) are
    /// never permitted.
    pub fn permits(&self, sender: Option<UserId>) -> bool {
        sender == Some(self.authorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorized_user_permitted() {
        let guard = AccessGuard::new(UserId(42));
        assert!(guard.permits(Some(UserId(42))));
    }

    #[test]
    fn test_other_users_denied() {
        let guard = AccessGuard::new(UserId(42));
        assert!(!guard.permits(Some(UserId(43))));
        assert!(!guard.permits(Some(UserId(0))));
    }

    #[test]
    fn test_missing_sender_denied() {
        let guard = AccessGuard::new(UserId(42));
        assert!(!guard.permits(None));
    }
}
