use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::tier::SubscriptionTier;

pub const MIN_NAME_LENGTH: usize = 2;
pub const MAX_NAME_LENGTH: usize = 32;
pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MAX_PASSWORD_LENGTH: usize = 32;
pub const MAX_EMAIL_LENGTH: usize = 255;

/// The authenticated identity handed back by login / signup / me. Never
/// carries credentials.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct Identity {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub tier: SubscriptionTier,
}

pub fn name_is_valid(name: &str) -> bool {
    let name = name.trim();
    name.len() >= MIN_NAME_LENGTH && name.len() <= MAX_NAME_LENGTH
}

pub fn email_is_valid(email: &str) -> bool {
    if email.len() > MAX_EMAIL_LENGTH || email.contains(char::is_whitespace) {
        return false;
    }
    let mut parts = email.splitn(2, '@');
    let local = parts.next().unwrap_or_default();
    let domain = parts.next().unwrap_or_default();
    !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

pub fn password_is_valid(password: &str) -> bool {
    password.len() >= MIN_PASSWORD_LENGTH && password.len() <= MAX_PASSWORD_LENGTH
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn accepts_plain_addresses() {
        assert!(email_is_valid("someone@example.com"));
        assert!(email_is_valid("a.b+c@mail.example.org"));
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(!email_is_valid("no-at-sign"));
        assert!(!email_is_valid("spaced out@example.com"));
        assert!(!email_is_valid("dotless@domain"));
        assert!(!email_is_valid("trailing@domain."));
    }

    #[test]
    fn password_bounds() {
        assert!(!password_is_valid("short"));
        assert!(password_is_valid("long enough"));
        assert!(!password_is_valid(&"x".repeat(MAX_PASSWORD_LENGTH + 1)));
    }
}
