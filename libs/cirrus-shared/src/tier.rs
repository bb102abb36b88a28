use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::usage::bytes_to_human;

pub const FREE_TIER_STORAGE: u64 = 200 * 1024 * 1024;
pub const PRO_TIER_STORAGE: u64 = 10 * 1024 * 1024 * 1024;
pub const PREMIUM_TIER_STORAGE: u64 = 100 * 1024 * 1024 * 1024;

pub const FREE_TIER_MAX_FILE: u64 = 100 * 1024 * 1024;
pub const PRO_TIER_MAX_FILE: u64 = 2 * 1024 * 1024 * 1024;
pub const PREMIUM_TIER_MAX_FILE: u64 = 10 * 1024 * 1024 * 1024;

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionTier {
    Free,
    Pro,
    Premium,
}

/// The static limit table consulted before any write credential is issued.
/// `allowed_mime_types: None` means unrestricted. An entry ending in `/` is a
/// prefix match (`image/` admits `image/png`), anything else is exact.
#[derive(Debug, Clone, Copy)]
pub struct TierLimits {
    pub max_file_size: u64,
    pub max_total_storage: u64,
    pub allowed_mime_types: Option<&'static [&'static str]>,
}

impl SubscriptionTier {
    pub fn limits(&self) -> TierLimits {
        match self {
            SubscriptionTier::Free => TierLimits {
                max_file_size: FREE_TIER_MAX_FILE,
                max_total_storage: FREE_TIER_STORAGE,
                allowed_mime_types: None,
            },
            SubscriptionTier::Pro => TierLimits {
                max_file_size: PRO_TIER_MAX_FILE,
                max_total_storage: PRO_TIER_STORAGE,
                allowed_mime_types: None,
            },
            SubscriptionTier::Premium => TierLimits {
                max_file_size: PREMIUM_TIER_MAX_FILE,
                max_total_storage: PREMIUM_TIER_STORAGE,
                allowed_mime_types: None,
            },
        }
    }
}

impl Display for SubscriptionTier {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            SubscriptionTier::Free => write!(f, "free"),
            SubscriptionTier::Pro => write!(f, "pro"),
            SubscriptionTier::Premium => write!(f, "premium"),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub enum QuotaDecision {
    Allowed,
    Denied(DenialReason),
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub enum DenialReason {
    /// The single file is larger than the tier permits, regardless of how
    /// much space remains.
    FileTooLarge { max_file_size: u64 },

    /// The tier restricts content types and this one is not on the list.
    MimeTypeNotAllowed { mime_type: String },

    /// Accepting the file would push total consumption past the cap.
    QuotaExceeded { remaining: u64 },
}

impl Display for DenialReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            DenialReason::FileTooLarge { max_file_size } => {
                write!(f, "Files on your plan can be at most {}", bytes_to_human(*max_file_size))
            }
            DenialReason::MimeTypeNotAllowed { mime_type } => {
                write!(f, "Your plan does not allow uploads of type {mime_type}")
            }
            DenialReason::QuotaExceeded { remaining } => {
                write!(
                    f,
                    "Storage limit exceeded, {} remaining. Please upgrade your subscription or delete some files.",
                    bytes_to_human(*remaining)
                )
            }
        }
    }
}

/// The authoritative check for a prospective upload. A file that lands
/// exactly on the storage cap is allowed; only strictly exceeding it is
/// denied.
pub fn check_limits(
    tier: SubscriptionTier, file_size: u64, mime_type: Option<&str>, current_usage: u64,
) -> QuotaDecision {
    let limits = tier.limits();

    if file_size > limits.max_file_size {
        return QuotaDecision::Denied(DenialReason::FileTooLarge {
            max_file_size: limits.max_file_size,
        });
    }

    if let (Some(allowed), Some(mime)) = (limits.allowed_mime_types, mime_type) {
        let permitted = allowed
            .iter()
            .any(|entry| *entry == mime || (entry.ends_with('/') && mime.starts_with(entry)));
        if !permitted {
            return QuotaDecision::Denied(DenialReason::MimeTypeNotAllowed {
                mime_type: mime.to_string(),
            });
        }
    }

    if current_usage + file_size > limits.max_total_storage {
        return QuotaDecision::Denied(DenialReason::QuotaExceeded {
            remaining: limits.max_total_storage.saturating_sub(current_usage),
        });
    }

    QuotaDecision::Allowed
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn boundary_exactly_at_cap_is_allowed() {
        let used = FREE_TIER_STORAGE - 1000;
        assert_eq!(
            check_limits(SubscriptionTier::Free, 1000, Some("image/png"), used),
            QuotaDecision::Allowed
        );
    }

    #[test]
    fn one_byte_over_cap_is_denied() {
        let used = FREE_TIER_STORAGE - 1000;
        match check_limits(SubscriptionTier::Free, 1001, Some("image/png"), used) {
            QuotaDecision::Denied(DenialReason::QuotaExceeded { remaining }) => {
                assert_eq!(remaining, 1000)
            }
            other => panic!("expected quota denial, got {other:?}"),
        }
    }

    #[test]
    fn oversized_file_denied_before_quota() {
        match check_limits(SubscriptionTier::Free, FREE_TIER_MAX_FILE + 1, None, 0) {
            QuotaDecision::Denied(DenialReason::FileTooLarge { max_file_size }) => {
                assert_eq!(max_file_size, FREE_TIER_MAX_FILE)
            }
            other => panic!("expected size denial, got {other:?}"),
        }
    }

    #[test]
    fn denial_message_includes_remaining_space() {
        let used = 150 * 1024 * 1024;
        let decision = check_limits(SubscriptionTier::Free, 60 * 1024 * 1024, None, used);
        match decision {
            QuotaDecision::Denied(reason @ DenialReason::QuotaExceeded { remaining }) => {
                assert_eq!(remaining, 50 * 1024 * 1024);
                assert!(reason.to_string().contains("52.42 MB"));
            }
            other => panic!("expected quota denial, got {other:?}"),
        }
    }
}
