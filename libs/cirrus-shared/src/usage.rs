use serde::{Deserialize, Serialize};

use crate::tier::SubscriptionTier;

pub const BYTE: u64 = 1;
pub const KILOBYTE: u64 = BYTE * 1000;
pub const MEGABYTE: u64 = KILOBYTE * 1000;
pub const GIGABYTE: u64 = MEGABYTE * 1000;
pub const TERABYTE: u64 = GIGABYTE * 1000;

pub const KILOBYTE_MINUS_ONE: u64 = KILOBYTE - 1;
pub const MEGABYTE_MINUS_ONE: u64 = MEGABYTE - 1;
pub const GIGABYTE_MINUS_ONE: u64 = GIGABYTE - 1;
pub const TERABYTE_MINUS_ONE: u64 = TERABYTE - 1;

/// Point-in-time storage consumption for one user. Recomputed from the file
/// records on every request, never cached server-side.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct StorageUsage {
    pub used_storage: u64,
    pub storage_limit: u64,
    pub remaining_storage: u64,
    pub usage_percentage: u64,
    pub tier: SubscriptionTier,
}

pub fn bytes_to_human(size: u64) -> String {
    let (unit, abbr) = match size {
        0..=KILOBYTE_MINUS_ONE => (BYTE, "B"),
        KILOBYTE..=MEGABYTE_MINUS_ONE => (KILOBYTE, "KB"),
        MEGABYTE..=GIGABYTE_MINUS_ONE => (MEGABYTE, "MB"),
        GIGABYTE..=TERABYTE_MINUS_ONE => (GIGABYTE, "GB"),
        TERABYTE..=u64::MAX => (TERABYTE, "TB"),
    };

    let size_in_unit = size as f64 / unit as f64;
    let dec = f64::trunc(size_in_unit.fract() * 100.0) / 100.0;

    let num = format!("{:.2}", size_in_unit.trunc() + dec)
        .trim_end_matches(['0'])
        .trim_end_matches(['.'])
        .to_owned();

    format!("{num} {abbr}")
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn bytes_to_human_kb() {
        assert_eq!(bytes_to_human(2000), "2 KB".to_string());
    }

    #[test]
    fn bytes_to_human_mb() {
        assert_eq!(bytes_to_human(2000000), "2 MB".to_string());
    }

    #[test]
    fn bytes_to_human_gb() {
        assert_eq!(bytes_to_human(2000000000), "2 GB".to_string());
    }

    #[test]
    fn bytes_to_human_fractional() {
        assert_eq!(bytes_to_human(52428800), "52.42 MB".to_string());
    }
}
