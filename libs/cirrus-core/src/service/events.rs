pub use tokio::sync::broadcast::{self, Receiver, Sender};
use uuid::Uuid;

use crate::service::uploads::UploadStatus;

/// The observable the UI subscribes to. Progress and status ticks flow here,
/// decoupled from the transfer mechanism producing them.
#[derive(Clone)]
pub struct EventSubs {
    tx: Sender<Event>,
}

#[derive(Clone, Debug)]
pub enum Event {
    /// The caller's file records changed, either locally initiated or
    /// observed after a batch settled.
    MetadataChanged,

    /// A fresh storage-usage snapshot was fetched.
    UsageChanged,

    UploadProgress { id: Uuid, percent: u8 },

    UploadStatusChanged { id: Uuid, status: UploadStatus },
}

impl Default for EventSubs {
    fn default() -> Self {
        let (tx, _) = broadcast::channel::<Event>(10000);
        Self { tx }
    }
}

impl EventSubs {
    pub fn subscribe(&self) -> Receiver<Event> {
        self.tx.subscribe()
    }

    pub(crate) fn meta_changed(&self) {
        self.queue(Event::MetadataChanged);
    }

    pub(crate) fn usage_changed(&self) {
        self.queue(Event::UsageChanged);
    }

    pub(crate) fn upload_progress(&self, id: Uuid, percent: u8) {
        self.queue(Event::UploadProgress { id, percent });
    }

    pub(crate) fn upload_status(&self, id: Uuid, status: UploadStatus) {
        self.queue(Event::UploadStatusChanged { id, status });
    }

    fn queue(&self, evt: Event) {
        // send only fails when nobody is subscribed, which is fine
        let _ = self.tx.send(evt);
    }
}
