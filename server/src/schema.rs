use serde::{Deserialize, Serialize};
use uuid::Uuid;

use cirrus_shared::file_metadata::FileRecord;
use cirrus_shared::tier::SubscriptionTier;

hmdb::schema! {
    DriveV1 {
        emails: <String, Uuid>,
        accounts: <Uuid, Account>,
        owned_files: <Uuid, Vec<Uuid>>,
        metas: <Uuid, FileRecord>,
        checkout_sessions: <String, CheckoutRecord>
    }
}

pub type DriveDb = DriveV1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub tier: SubscriptionTier,
    pub stripe_customer_id: Option<String>,
    pub created_at: u64,
}

/// The audit trail a webhook completes. One row per checkout attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutRecord {
    pub session_id: String,
    pub user_id: Uuid,
    pub tier: SubscriptionTier,
    pub amount_cents: i64,
    pub status: CheckoutStatus,
    pub created_at: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckoutStatus {
    Pending,
    Completed,
    Cancelled,
}
