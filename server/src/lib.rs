#[macro_use]
extern crate tracing;

use std::fmt::Debug;
use std::sync::Arc;

use uuid::Uuid;

use crate::content::file_content_client::ObjectStore;
use crate::session_service::{Session, SessionStore};

static CARGO_PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

pub struct ServerState {
    pub config: config::Config,
    pub index_db: schema::DriveDb,
    pub sessions: Arc<SessionStore>,
    pub files_db: Arc<dyn ObjectStore>,
    pub stripe_client: Option<stripe::Client>,
}

/// Handed to every protected handler. The router only builds one of these
/// after the session cookie has resolved, so `session` is always live.
pub struct RequestContext<'a, TRequest> {
    pub server_state: &'a ServerState,
    pub request: TRequest,
    pub session: Session,
}

#[derive(Clone, Debug)]
pub enum ServerError<U: Debug> {
    ClientError(U),
    InternalError(String),
}

pub use ServerError::ClientError;

#[macro_export]
macro_rules! internal {
    ($($arg:tt)*) => {
        $crate::ServerError::InternalError(format!($($arg)*))
    };
}

/// The one ownership check every mutating handler goes through, replacing
/// the per-route copies this kind of code tends to accumulate.
#[derive(Debug)]
pub enum Authorization<'a> {
    Authorized(&'a Session),
    Unauthenticated,
    Forbidden,
}

pub fn authorize(session: Option<&Session>, resource_owner: Uuid) -> Authorization {
    match session {
        None => Authorization::Unauthenticated,
        Some(session) if session.user_id != resource_owner => Authorization::Forbidden,
        Some(session) => Authorization::Authorized(session),
    }
}

impl<'a, TRequest> RequestContext<'a, TRequest> {
    /// 403 when the caller acts on someone else's resource; never folded
    /// into 404, so "not yours" stays distinguishable from "doesn't exist".
    pub fn caller_owns(&self, resource_owner: Uuid) -> bool {
        matches!(authorize(Some(&self.session), resource_owner), Authorization::Authorized(_))
    }
}

pub fn get_build_info() -> &'static str {
    CARGO_PKG_VERSION
}

pub mod account_service;
pub mod billing;
pub mod config;
pub mod content;
pub mod error_handler;
pub mod file_service;
pub mod loggers;
pub mod router_service;
pub mod schema;
pub mod session_service;
pub mod usage_service;
