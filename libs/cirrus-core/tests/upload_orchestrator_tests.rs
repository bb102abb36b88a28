use std::collections::{HashMap, HashSet};
use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::{json, Value};
use tokio::sync::Notify;
use uuid::Uuid;

use cirrus_core::io::network::{ApiError, Requester};
use cirrus_core::model::config::Config;
use cirrus_core::service::files::{favorites, files_at_path, files_in_category};
use cirrus_core::service::uploads::{
    CancelFlag, ProgressFn, Transfer, TransferError, UploadSource, UploadStatus,
};
use cirrus_core::{CirrusLib, CoreErrKind};
use cirrus_shared::account::Identity;
use cirrus_shared::api::*;
use cirrus_shared::file_metadata::{FileCategory, FileRecord, FileType, FileWithUrl};
use cirrus_shared::tier::{DenialReason, SubscriptionTier};

const LIMIT: u64 = 200 * 1024 * 1024;

#[derive(Clone)]
struct StubApi {
    inner: Arc<Mutex<StubServer>>,
}

struct StubServer {
    identity: Identity,
    records: Vec<FileRecord>,
    deny_quota_for: HashSet<String>,
    confirmed: Vec<String>,
    /// Storage the server pretends is already consumed.
    used_offset: u64,
}

impl StubApi {
    fn new() -> Self {
        let identity = Identity {
            id: Uuid::new_v4(),
            name: "probe".to_string(),
            email: "probe@example.com".to_string(),
            tier: SubscriptionTier::Free,
        };
        Self {
            inner: Arc::new(Mutex::new(StubServer {
                identity,
                records: vec![],
                deny_quota_for: HashSet::new(),
                confirmed: vec![],
                used_offset: 0,
            })),
        }
    }

    fn deny_quota_for(&self, name: &str) {
        self.inner
            .lock()
            .unwrap()
            .deny_quota_for
            .insert(name.to_string());
    }

    fn set_used_storage(&self, used: u64) {
        self.inner.lock().unwrap().used_offset = used;
    }

    fn confirmed(&self) -> Vec<String> {
        self.inner.lock().unwrap().confirmed.clone()
    }

    fn handle(&self, route: &str, body: Value) -> Result<Value, Value> {
        let mut server = self.inner.lock().unwrap();
        match route {
            "/api/auth/login" => Ok(serde_json::to_value(&server.identity).unwrap()),
            "/api/file" => {
                let files: Vec<FileWithUrl> = server
                    .records
                    .iter()
                    .map(|record| FileWithUrl { record: record.clone(), url: None })
                    .collect();
                Ok(serde_json::to_value(GetFilesResponse { files }).unwrap())
            }
            "/api/file/getStorageUsage" => {
                let used: u64 =
                    server.used_offset + server.records.iter().map(|r| r.size).sum::<u64>();
                Ok(json!({
                    "used_storage": used,
                    "storage_limit": LIMIT,
                    "remaining_storage": LIMIT - used,
                    "usage_percentage": used * 100 / LIMIT,
                    "tier": "free",
                }))
            }
            "/api/file/presignedUrl" => {
                let req: PresignedUrlRequest = serde_json::from_value(body).unwrap();
                if server.deny_quota_for.contains(&req.name) {
                    let used: u64 = server.records.iter().map(|r| r.size).sum();
                    let denial = PresignedUrlError::Denied(DenialReason::QuotaExceeded {
                        remaining: LIMIT - used,
                    });
                    return Err(serde_json::to_value(denial).unwrap());
                }
                let unique_key = format!("{}{}{}", req.user_id, req.path, req.name);
                Ok(serde_json::to_value(PresignedUrlResponse {
                    credential: format!("https://storage.test/{unique_key}"),
                    unique_key,
                })
                .unwrap())
            }
            "/api/file/uploadFileMetadata" => {
                let req: UploadFileMetadataRequest = serde_json::from_value(body).unwrap();
                if server
                    .records
                    .iter()
                    .any(|r| r.name == req.name && r.path == req.path)
                {
                    return Err(
                        serde_json::to_value(UploadFileMetadataError::FileAlreadyExists).unwrap()
                    );
                }
                let id = Uuid::new_v4();
                server.records.push(FileRecord {
                    id,
                    user_id: req.user_id,
                    name: req.name.clone(),
                    file_type: req.file_type,
                    storage_key: req.storage_key,
                    size: req.size,
                    mime_type: req.mime_type,
                    path: req.path,
                    is_favorited: req.is_favorited,
                    category: req.category,
                    created_at: 0,
                    updated_at: 0,
                });
                server.confirmed.push(req.name);
                Ok(serde_json::to_value(UploadFileMetadataResponse { id }).unwrap())
            }
            other => panic!("stub has no handler for {other}"),
        }
    }
}

impl Requester for StubApi {
    async fn request<T: Request + Send>(
        &self, request: T,
    ) -> Result<T::Response, ApiError<T::Error>> {
        let body = serde_json::to_value(&request).unwrap();
        match self.handle(T::ROUTE, body) {
            Ok(value) => Ok(serde_json::from_value(value).unwrap()),
            Err(value) => Err(ApiError::Endpoint(serde_json::from_value(value).unwrap())),
        }
    }
}

/// Simulated transfer: two progress ticks with an optional hold point in
/// between so tests can act mid-flight.
#[derive(Clone, Default)]
struct StubTransfer {
    holds: Arc<Mutex<HashMap<String, Arc<Notify>>>>,
    puts: Arc<Mutex<Vec<String>>>,
}

impl StubTransfer {
    fn hold_mid_transfer(&self, name: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.holds
            .lock()
            .unwrap()
            .insert(name.to_string(), gate.clone());
        gate
    }
}

impl Transfer for StubTransfer {
    async fn put(
        &self, credential: &str, _mime_type: &str, content: Vec<u8>, progress: ProgressFn,
        cancelled: CancelFlag,
    ) -> Result<(), TransferError> {
        let total = content.len() as u64;
        progress(total / 2, total);

        let gate = self
            .holds
            .lock()
            .unwrap()
            .iter()
            .find(|(name, _)| credential.ends_with(name.as_str()))
            .map(|(_, gate)| gate.clone());
        if let Some(gate) = gate {
            gate.notified().await;
        }

        if cancelled.load(Ordering::SeqCst) {
            return Err(TransferError::Cancelled);
        }

        progress(total, total);
        self.puts.lock().unwrap().push(credential.to_string());
        Ok(())
    }
}

type TestLib = CirrusLib<StubApi, StubTransfer>;

fn test_config() -> Config {
    let mut config = Config::new("https://api.test", "/tmp");
    config.logs = false;
    config
}

async fn test_lib() -> (TestLib, StubApi, StubTransfer) {
    let api = StubApi::new();
    let store = StubTransfer::default();
    let lib = CirrusLib::with_parts(test_config(), api.clone(), store.clone());
    lib.login("probe@example.com", "password123").await.unwrap();
    lib.get_usage().await.unwrap();
    (lib, api, store)
}

fn source(name: &str, size: usize) -> UploadSource {
    UploadSource {
        name: name.to_string(),
        mime_type: "application/octet-stream".to_string(),
        content: vec![0u8; size],
    }
}

#[tokio::test]
async fn batch_requires_a_session() {
    let api = StubApi::new();
    let lib = CirrusLib::with_parts(test_config(), api, StubTransfer::default());

    let err = lib
        .start_batch("/", vec![source("a.bin", 10)])
        .await
        .unwrap_err();
    assert_eq!(err.kind, CoreErrKind::NotLoggedIn);
}

#[tokio::test]
async fn oversized_batch_rejected_before_any_network_call() {
    let (lib, api, _) = test_lib().await;
    api.set_used_storage(LIMIT - 100);
    lib.get_usage().await.unwrap();

    let err = lib
        .start_batch("/", vec![source("a.bin", 60), source("b.bin", 60)])
        .await
        .unwrap_err();
    match err.kind {
        CoreErrKind::BatchTooLarge { total, remaining } => {
            assert_eq!(total, 120);
            assert_eq!(remaining, 100);
        }
        other => panic!("expected BatchTooLarge, got {other:?}"),
    }
    assert!(lib.uploads.items().is_empty());
    assert!(api.confirmed().is_empty());
}

#[tokio::test]
async fn single_file_runs_to_completion() {
    let (lib, api, store) = test_lib().await;

    let items = lib
        .start_batch("/", vec![source("report.pdf", 4096)])
        .await
        .unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].status, UploadStatus::Completed);
    assert_eq!(items[0].progress_percent, 100);
    assert_eq!(api.confirmed(), vec!["report.pdf".to_string()]);
    assert_eq!(store.puts.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn quota_denied_file_fails_without_stopping_siblings() {
    let (lib, api, _) = test_lib().await;
    api.deny_quota_for("two.bin");

    let items = lib
        .start_batch(
            "/",
            vec![source("one.bin", 128), source("two.bin", 128), source("three.bin", 128)],
        )
        .await
        .unwrap();

    let statuses: Vec<UploadStatus> = items.iter().map(|i| i.status).collect();
    assert_eq!(
        statuses,
        vec![UploadStatus::Completed, UploadStatus::Error, UploadStatus::Completed]
    );
    assert!(items[1]
        .error
        .as_ref()
        .unwrap()
        .contains("Storage limit exceeded"));

    let mut confirmed = api.confirmed();
    confirmed.sort();
    assert_eq!(confirmed, vec!["one.bin".to_string(), "three.bin".to_string()]);
}

#[tokio::test]
async fn cancel_mid_transfer_lands_in_cancelled_and_skips_confirmation() {
    let (lib, api, store) = test_lib().await;
    let gate = store.hold_mid_transfer("held.bin");

    let runner = {
        let lib = lib.clone();
        tokio::spawn(async move { lib.start_batch("/", vec![source("held.bin", 2048)]).await })
    };

    // wait until the transfer is provably in flight
    loop {
        let items = lib.uploads.items();
        if items
            .first()
            .map(|i| i.progress_percent > 0)
            .unwrap_or(false)
        {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let id = lib.uploads.items()[0].id;
    lib.cancel_upload(id);
    gate.notify_one();

    let items = runner.await.unwrap().unwrap();
    assert_eq!(items[0].status, UploadStatus::Cancelled);
    assert!(items[0].error.is_none());
    assert!(api.confirmed().is_empty());
    assert!(store.puts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn cancelling_a_terminal_item_is_a_no_op() {
    let (lib, _, _) = test_lib().await;

    let items = lib
        .start_batch("/", vec![source("done.bin", 64)])
        .await
        .unwrap();
    let id = items[0].id;
    assert_eq!(items[0].status, UploadStatus::Completed);

    lib.cancel_upload(id);
    assert_eq!(lib.uploads.items()[0].status, UploadStatus::Completed);
}

#[tokio::test]
async fn dismiss_refuses_while_uploads_are_live() {
    let (lib, _, store) = test_lib().await;
    let gate = store.hold_mid_transfer("slow.bin");

    let runner = {
        let lib = lib.clone();
        tokio::spawn(async move { lib.start_batch("/", vec![source("slow.bin", 1024)]).await })
    };

    loop {
        let items = lib.uploads.items();
        if items
            .first()
            .map(|i| i.status == UploadStatus::Uploading)
            .unwrap_or(false)
        {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let err = lib.dismiss_batch().unwrap_err();
    assert_eq!(err.kind, CoreErrKind::UploadsInFlight);
    assert!(lib.uploads.is_visible());

    gate.notify_one();
    runner.await.unwrap().unwrap();

    lib.dismiss_batch().unwrap();
    assert!(lib.uploads.items().is_empty());
    assert!(!lib.uploads.is_visible());
}

#[tokio::test]
async fn duplicate_confirmation_is_a_conflict_and_keeps_the_original() {
    let (lib, api, _) = test_lib().await;

    let first = lib
        .start_batch("/", vec![source("report.pdf", 256)])
        .await
        .unwrap();
    assert_eq!(first[0].status, UploadStatus::Completed);
    lib.dismiss_batch().unwrap();

    let second = lib
        .start_batch("/", vec![source("report.pdf", 256)])
        .await
        .unwrap();
    assert_eq!(second[0].status, UploadStatus::Error);
    assert!(second[0]
        .error
        .as_ref()
        .unwrap()
        .contains("already exists"));

    // exactly the one confirmation went through
    assert_eq!(api.confirmed(), vec!["report.pdf".to_string()]);
}

#[tokio::test]
async fn folder_creation_is_metadata_only() {
    let (lib, api, store) = test_lib().await;

    lib.create_folder("/", "docs").await.unwrap();

    let files = lib.list_files().await.unwrap();
    assert_eq!(files.len(), 1);
    let record = &files[0].record;
    assert_eq!(record.file_type, FileType::Folder);
    assert_eq!(record.size, 0);
    assert_eq!(record.storage_key, None);
    assert_eq!(record.category, None);
    assert!(store.puts.lock().unwrap().is_empty());
    assert_eq!(api.confirmed(), vec!["docs".to_string()]);
}

#[tokio::test]
async fn derived_views_filter_by_path_category_and_favorites() {
    let record = |name: &str, path: &str, category, favorited| FileWithUrl {
        record: FileRecord {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            name: name.to_string(),
            file_type: FileType::File,
            storage_key: Some(format!("key-{name}")),
            size: 1,
            mime_type: None,
            path: path.to_string(),
            is_favorited: favorited,
            category,
            created_at: 0,
            updated_at: 0,
        },
        url: None,
    };

    let files = vec![
        record("a.png", "/", Some(FileCategory::Images), true),
        record("b.mp4", "/media/", Some(FileCategory::Videos), false),
        record("c.png", "/media/", Some(FileCategory::Images), false),
    ];

    assert_eq!(files_at_path(&files, "/").len(), 1);
    assert_eq!(files_at_path(&files, "/media/").len(), 2);
    assert_eq!(files_in_category(&files, FileCategory::Images).len(), 2);
    assert_eq!(favorites(&files).len(), 1);
}
