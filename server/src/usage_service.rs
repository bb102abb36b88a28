use std::fmt::Debug;

use uuid::Uuid;

use cirrus_shared::usage::StorageUsage;

use crate::session_service::Session;
use crate::{ServerError, ServerState};

/// Sum of `size` over exactly this user's records. Folders contribute their
/// nominal zero. O(n) in file count, recomputed per call; no running
/// counter is maintained anywhere.
pub fn used_storage<T: Debug>(
    server_state: &ServerState, user_id: Uuid,
) -> Result<u64, ServerError<T>> {
    let db = &server_state.index_db;
    let ids = db.owned_files.get(&user_id)?.unwrap_or_default();

    let mut total = 0;
    for id in ids {
        if let Some(record) = db.metas.get(&id)? {
            total += record.size;
        }
    }
    Ok(total)
}

/// The derived snapshot the quota display renders. Two concurrent uploads
/// may each read a snapshot that predates the other's write; that race is
/// accepted, there is no reservation step.
pub fn storage_usage<T: Debug>(
    server_state: &ServerState, session: &Session,
) -> Result<StorageUsage, ServerError<T>> {
    let used_storage = used_storage(server_state, session.user_id)?;
    let storage_limit = session.tier.limits().max_total_storage;

    Ok(StorageUsage {
        used_storage,
        storage_limit,
        remaining_storage: storage_limit.saturating_sub(used_storage),
        usage_percentage: used_storage * 100 / storage_limit,
        tier: session.tier,
    })
}
