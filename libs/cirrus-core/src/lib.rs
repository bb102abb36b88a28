//! The library that sits under every cirrus client.
//!
//! UIs rely on this crate to authenticate, browse and organize file records,
//! and drive uploads straight at object storage through presigned write
//! credentials — the server never proxies bytes.
//!
//! - Most integrators will be interested in the functions attached to the
//!   [CirrusLib] struct. See the [service] module for evolving this
//!   functionality.
//! - The [service::uploads] module is the upload state machine; subscribe to
//!   progress through [CirrusLib::subscribe].
//! - The [io] module talks to the network. Both the API transport and the
//!   byte-transfer mechanism are seams, swapped out wholesale in tests.

#[macro_use]
extern crate tracing;

pub mod io;
pub mod model;
pub mod service;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use cirrus_shared::account::Identity;
use cirrus_shared::usage::StorageUsage;

use crate::io::network::{Network, Requester};
use crate::model::config::Config;
use crate::service::events::{Event, EventSubs, Receiver};
use crate::service::logging;
use crate::service::uploads::{HttpTransfer, Transfer, UploadState};

pub use crate::model::errors::{CoreErr, CoreErrKind, CoreResult};

#[derive(Clone)]
pub struct CirrusLib<Client: Requester, Store: Transfer> {
    pub config: Config,
    pub client: Client,
    pub store: Store,
    pub events: EventSubs,
    pub uploads: UploadState,
    session: Arc<Mutex<Option<Identity>>>,
    usage: Arc<Mutex<Option<StorageUsage>>>,
}

pub type Cirrus = CirrusLib<Network, HttpTransfer>;

impl Cirrus {
    #[instrument(level = "info", skip_all, err(Debug))]
    pub fn init(config: Config) -> CoreResult<Self> {
        logging::init(&config)?;
        let client = Network::new(&config)?;
        let store = HttpTransfer::new(Duration::from_secs(config.transfer_timeout_secs))?;
        Ok(Self::with_parts(config, client, store))
    }
}

impl<Client: Requester, Store: Transfer> CirrusLib<Client, Store> {
    /// Assemble a library around explicit transport implementations. Tests
    /// instantiate this with stubs; [Cirrus::init] is the production path.
    pub fn with_parts(config: Config, client: Client, store: Store) -> Self {
        Self {
            config,
            client,
            store,
            events: EventSubs::default(),
            uploads: UploadState::default(),
            session: Arc::new(Mutex::new(None)),
            usage: Arc::new(Mutex::new(None)),
        }
    }

    pub fn subscribe(&self) -> Receiver<Event> {
        self.events.subscribe()
    }
}

pub fn get_code_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
