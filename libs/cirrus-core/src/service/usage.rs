use serde::Serialize;

use cirrus_shared::api::GetStorageUsageRequest;
use cirrus_shared::usage::{bytes_to_human, StorageUsage};

use crate::io::network::Requester;
use crate::model::errors::CoreResult;
use crate::service::uploads::Transfer;
use crate::CirrusLib;

#[derive(Serialize, Debug)]
pub struct UsageMetrics {
    pub usage: StorageUsage,
    pub used: UsageItemMetric,
    pub limit: UsageItemMetric,
}

#[derive(Serialize, PartialEq, Eq, Debug)]
pub struct UsageItemMetric {
    pub exact: u64,
    pub readable: String,
}

impl<Client: Requester, Store: Transfer> CirrusLib<Client, Store> {
    /// Fetch a fresh usage snapshot and cache it; the cached figure backs
    /// the soft client-side batch pre-check.
    #[instrument(level = "debug", skip_all, err(Debug))]
    pub async fn get_usage(&self) -> CoreResult<UsageMetrics> {
        let usage = self.client.request(GetStorageUsageRequest {}).await?;

        *self.usage.lock().expect("usage cache poisoned") = Some(usage.clone());
        self.events.usage_changed();

        Ok(UsageMetrics {
            used: UsageItemMetric {
                exact: usage.used_storage,
                readable: bytes_to_human(usage.used_storage),
            },
            limit: UsageItemMetric {
                exact: usage.storage_limit,
                readable: bytes_to_human(usage.storage_limit),
            },
            usage,
        })
    }

    pub(crate) fn cached_remaining_storage(&self) -> Option<u64> {
        self.usage
            .lock()
            .expect("usage cache poisoned")
            .as_ref()
            .map(|usage| usage.remaining_storage)
    }
}
