use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::StreamExt;
use uuid::Uuid;

use cirrus_shared::api::{PresignedUrlRequest, UploadFileMetadataRequest};
use cirrus_shared::file_metadata::{path_is_valid, FileCategory, FileType};

use crate::io::network::Requester;
use crate::model::errors::{CoreErr, CoreErrKind, CoreResult};
use crate::service::events::EventSubs;
use crate::CirrusLib;

pub type CancelFlag = Arc<AtomicBool>;
pub type ProgressFn = Arc<dyn Fn(u64, u64) + Send + Sync>;

pub const TRANSFER_CHUNK_SIZE: usize = 64 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStatus {
    Pending,
    Uploading,
    Completed,
    Error,
    Cancelled,
}

impl UploadStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, UploadStatus::Completed | UploadStatus::Error | UploadStatus::Cancelled)
    }
}

/// One file's observable place in a batch. Ephemeral: lives until the batch
/// is dismissed, never persisted.
#[derive(Debug, Clone)]
pub struct UploadItem {
    pub id: Uuid,
    pub name: String,
    pub size: u64,
    pub progress_percent: u8,
    pub status: UploadStatus,
    pub error: Option<String>,
}

/// A file the user selected for upload.
#[derive(Debug, Clone)]
pub struct UploadSource {
    pub name: String,
    pub mime_type: String,
    pub content: Vec<u8>,
}

#[derive(Debug)]
pub enum TransferError {
    /// The caller aborted this transfer; distinguished from failure so the
    /// item lands in `Cancelled`, not `Error`.
    Cancelled,
    /// The transfer outlived its configured bound.
    TimedOut,
    Failed(String),
}

/// The seam between the orchestrator and the byte-moving mechanism. Swapping
/// single-PUT for chunked transfer must not change orchestrator contracts.
pub trait Transfer: Clone + Send + Sync + 'static {
    fn put(
        &self, credential: &str, mime_type: &str, content: Vec<u8>, progress: ProgressFn,
        cancelled: CancelFlag,
    ) -> impl Future<Output = Result<(), TransferError>> + Send;
}

/// Streams the body straight at the presigned endpoint, one chunk at a time,
/// reporting cumulative bytes after each chunk. The cancel flag is observed
/// at chunk boundaries; a stalled connection is reclaimed by the timeout.
#[derive(Debug, Clone)]
pub struct HttpTransfer {
    client: reqwest::Client,
}

impl HttpTransfer {
    pub fn new(timeout: Duration) -> CoreResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| CoreErrKind::Unexpected(format!("{err:?}")))?;
        Ok(Self { client })
    }
}

impl Transfer for HttpTransfer {
    async fn put(
        &self, credential: &str, mime_type: &str, content: Vec<u8>, progress: ProgressFn,
        cancelled: CancelFlag,
    ) -> Result<(), TransferError> {
        let total = content.len() as u64;
        let sent = Arc::new(AtomicU64::new(0));
        let chunks: Vec<Vec<u8>> = content
            .chunks(TRANSFER_CHUNK_SIZE)
            .map(|chunk| chunk.to_vec())
            .collect();

        let flag = cancelled.clone();
        let stream = futures::stream::iter(chunks).map(move |chunk| {
            if flag.load(Ordering::SeqCst) {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::Interrupted,
                    "transfer cancelled",
                ));
            }
            let done = sent.fetch_add(chunk.len() as u64, Ordering::SeqCst) + chunk.len() as u64;
            progress(done, total);
            Ok(chunk)
        });

        let response = self
            .client
            .put(credential)
            .header("Content-Type", mime_type)
            .header("Content-Length", total)
            .body(reqwest::Body::wrap_stream(stream))
            .send()
            .await;

        let response = match response {
            Ok(response) => response,
            Err(err) => {
                if cancelled.load(Ordering::SeqCst) {
                    return Err(TransferError::Cancelled);
                }
                if err.is_timeout() {
                    return Err(TransferError::TimedOut);
                }
                return Err(TransferError::Failed(err.to_string()));
            }
        };

        if !response.status().is_success() {
            return Err(TransferError::Failed(format!("storage replied {}", response.status())));
        }
        Ok(())
    }
}

/// The per-batch state every clone of the library handle shares. The item
/// vec is the single source of truth the UI renders; flows are its only
/// writers.
#[derive(Clone, Default)]
pub struct UploadState {
    items: Arc<Mutex<Vec<UploadItem>>>,
    cancel_flags: Arc<Mutex<HashMap<Uuid, CancelFlag>>>,
    visible: Arc<AtomicBool>,
}

impl UploadState {
    pub fn items(&self) -> Vec<UploadItem> {
        self.items.lock().expect("upload items poisoned").clone()
    }

    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::SeqCst)
    }

    fn push(&self, item: UploadItem, flag: CancelFlag) {
        self.items
            .lock()
            .expect("upload items poisoned")
            .push(item.clone());
        self.cancel_flags
            .lock()
            .expect("cancel flags poisoned")
            .insert(item.id, flag);
    }

    fn cancel_flag(&self, id: Uuid) -> Option<CancelFlag> {
        self.cancel_flags
            .lock()
            .expect("cancel flags poisoned")
            .get(&id)
            .cloned()
    }

    fn status_of(&self, id: Uuid) -> Option<UploadStatus> {
        self.items
            .lock()
            .expect("upload items poisoned")
            .iter()
            .find(|item| item.id == id)
            .map(|item| item.status)
    }

    fn set_status(&self, id: Uuid, status: UploadStatus, error: Option<String>, events: &EventSubs) {
        let mut items = self.items.lock().expect("upload items poisoned");
        if let Some(item) = items.iter_mut().find(|item| item.id == id) {
            item.status = status;
            item.error = error;
            events.upload_status(id, status);
        }
    }

    /// Progress only moves forward, whatever order chunk callbacks land in.
    fn set_progress(&self, id: Uuid, percent: u8, events: &EventSubs) {
        let mut items = self.items.lock().expect("upload items poisoned");
        if let Some(item) = items.iter_mut().find(|item| item.id == id) {
            if percent > item.progress_percent {
                item.progress_percent = percent;
                events.upload_progress(id, percent);
            }
        }
    }

    fn any_live(&self) -> bool {
        self.items
            .lock()
            .expect("upload items poisoned")
            .iter()
            .any(|item| !item.status.is_terminal())
    }

    fn clear(&self) {
        self.items.lock().expect("upload items poisoned").clear();
        self.cancel_flags
            .lock()
            .expect("cancel flags poisoned")
            .clear();
        self.visible.store(false, Ordering::SeqCst);
    }
}

impl<Client: Requester, Store: Transfer> CirrusLib<Client, Store> {
    /// Launch every file in the batch concurrently and wait for all of them
    /// to settle. One file's failure never aborts its siblings; the file
    /// list and usage refresh only once the whole batch is final.
    #[instrument(level = "debug", skip_all, fields(files = files.len()), err(Debug))]
    pub async fn start_batch(
        &self, target_path: &str, files: Vec<UploadSource>,
    ) -> CoreResult<Vec<UploadItem>> {
        let identity = self.session()?;

        if !path_is_valid(target_path) {
            return Err(CoreErrKind::BadRequest.into());
        }
        if files.is_empty() {
            return Err(CoreErrKind::NoFilesSelected.into());
        }

        // soft pre-check against the cached snapshot; the server remains
        // authoritative per file
        let remaining = self
            .cached_remaining_storage()
            .ok_or(CoreErrKind::UsageUnknown)?;
        let total: u64 = files.iter().map(|f| f.content.len() as u64).sum();
        if total > remaining {
            return Err(CoreErrKind::BatchTooLarge { total, remaining }.into());
        }

        let mut created = Vec::with_capacity(files.len());
        for file in &files {
            let item = UploadItem {
                id: Uuid::new_v4(),
                name: file.name.clone(),
                size: file.content.len() as u64,
                progress_percent: 0,
                status: UploadStatus::Pending,
                error: None,
            };
            self.uploads.push(item.clone(), Arc::default());
            created.push(item);
        }
        self.uploads.visible.store(true, Ordering::SeqCst);

        let mut handles = Vec::with_capacity(files.len());
        for (item, source) in created.iter().zip(files) {
            let this = self.clone();
            let id = item.id;
            let user_id = identity.id;
            let target = target_path.to_string();
            handles.push(tokio::spawn(async move {
                this.upload_single(id, user_id, &target, source).await;
            }));
        }
        for handle in handles {
            if let Err(err) = handle.await {
                error!(?err, "upload flow panicked");
            }
        }

        self.refresh_after_batch().await;

        Ok(self.uploads.items())
    }

    /// credential -> transfer -> confirm, strictly in order, aborting only
    /// this item on any failure.
    async fn upload_single(&self, id: Uuid, user_id: Uuid, target_path: &str, source: UploadSource) {
        let flag = match self.uploads.cancel_flag(id) {
            Some(flag) => flag,
            None => return,
        };

        self.uploads
            .set_status(id, UploadStatus::Uploading, None, &self.events);
        if flag.load(Ordering::SeqCst) {
            self.uploads
                .set_status(id, UploadStatus::Cancelled, None, &self.events);
            return;
        }

        let size = source.content.len() as u64;
        let credential = match self
            .client
            .request(PresignedUrlRequest {
                user_id,
                name: source.name.clone(),
                size,
                mime_type: source.mime_type.clone(),
                path: target_path.to_string(),
            })
            .await
        {
            Ok(resp) => resp,
            Err(err) => {
                let err = CoreErr::from(err);
                self.uploads
                    .set_status(id, UploadStatus::Error, Some(err.to_string()), &self.events);
                return;
            }
        };

        if flag.load(Ordering::SeqCst) {
            // the issued credential is simply left unused; it expires on its own
            self.uploads
                .set_status(id, UploadStatus::Cancelled, None, &self.events);
            return;
        }

        let progress: ProgressFn = {
            let uploads = self.uploads.clone();
            let events = self.events.clone();
            Arc::new(move |sent, total| {
                let percent = if total == 0 { 100 } else { ((sent * 100) / total).min(100) as u8 };
                uploads.set_progress(id, percent, &events);
            })
        };

        match self
            .store
            .put(&credential.credential, &source.mime_type, source.content, progress, flag.clone())
            .await
        {
            Ok(()) => {}
            Err(TransferError::Cancelled) => {
                self.uploads
                    .set_status(id, UploadStatus::Cancelled, None, &self.events);
                return;
            }
            Err(TransferError::TimedOut) => {
                let err = CoreErr::from(CoreErrKind::TransferTimeout);
                self.uploads
                    .set_status(id, UploadStatus::Error, Some(err.to_string()), &self.events);
                return;
            }
            Err(TransferError::Failed(msg)) => {
                let err = CoreErr::from(CoreErrKind::TransferFailed(msg));
                self.uploads
                    .set_status(id, UploadStatus::Error, Some(err.to_string()), &self.events);
                return;
            }
        }

        let confirm = UploadFileMetadataRequest {
            user_id,
            name: source.name.clone(),
            file_type: FileType::File,
            storage_key: Some(credential.unique_key.clone()),
            size,
            mime_type: Some(source.mime_type.clone()),
            path: target_path.to_string(),
            is_favorited: false,
            category: Some(FileCategory::from_mime(&source.mime_type)),
        };
        match self.client.request(confirm).await {
            Ok(_) => {
                self.uploads.set_progress(id, 100, &self.events);
                self.uploads
                    .set_status(id, UploadStatus::Completed, None, &self.events);
            }
            Err(err) => {
                let err = CoreErr::from(err);
                self.uploads
                    .set_status(id, UploadStatus::Error, Some(err.to_string()), &self.events);
            }
        }
    }

    /// Abort one in-flight transfer. Sibling transfers and the batch-level
    /// refresh are untouched; a terminal item is a no-op.
    pub fn cancel_upload(&self, id: Uuid) {
        match self.uploads.status_of(id) {
            Some(status) if !status.is_terminal() => {
                if let Some(flag) = self.uploads.cancel_flag(id) {
                    info!(%id, "cancelling upload");
                    flag.store(true, Ordering::SeqCst);
                }
            }
            _ => {}
        }
    }

    /// Clear the batch view, refusing while anything is still live so a
    /// running transfer can't silently lose its surface.
    pub fn dismiss_batch(&self) -> CoreResult<()> {
        if self.uploads.any_live() {
            warn!("refusing to dismiss the upload view while transfers are live");
            return Err(CoreErrKind::UploadsInFlight.into());
        }
        self.uploads.clear();
        Ok(())
    }

    /// A folder is the degenerate upload: a record with no bytes behind it.
    #[instrument(level = "debug", skip(self), err(Debug))]
    pub async fn create_folder(&self, target_path: &str, name: &str) -> CoreResult<Uuid> {
        let identity = self.session()?;
        let resp = self
            .client
            .request(UploadFileMetadataRequest {
                user_id: identity.id,
                name: name.to_string(),
                file_type: FileType::Folder,
                storage_key: None,
                size: 0,
                mime_type: None,
                path: target_path.to_string(),
                is_favorited: false,
                category: None,
            })
            .await?;
        self.events.meta_changed();
        Ok(resp.id)
    }

    async fn refresh_after_batch(&self) {
        if let Err(err) = self.list_files().await {
            warn!(?err, "post-batch file refresh failed");
        }
        if let Err(err) = self.get_usage().await {
            warn!(?err, "post-batch usage refresh failed");
        }
        self.events.meta_changed();
    }
}
