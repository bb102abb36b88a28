use std::backtrace::Backtrace;
use std::fmt::{self, Debug, Display, Formatter};

use cirrus_shared::api::ErrorWrapper;
use cirrus_shared::usage::bytes_to_human;

use crate::io::network::ApiError;

pub type CoreResult<T> = Result<T, CoreErr>;

#[derive(Debug)]
pub struct CoreErr {
    pub kind: CoreErrKind,
    pub backtrace: Option<Backtrace>,
}

impl Display for CoreErr {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreErrKind {
    NotLoggedIn,
    BadRequest,
    ServerUnreachable,
    /// The server rejected the operation; the payload is the wording shown
    /// to the customer.
    Rejected(String),
    TransferCancelled,
    TransferTimeout,
    TransferFailed(String),
    UploadsInFlight,
    NoFilesSelected,
    BatchTooLarge { total: u64, remaining: u64 },
    UsageUnknown,
    Unexpected(String),
}

/// Uniform wording for everything a customer may see. Errors that should
/// never leave this crate use an uglier debug rendering.
impl Display for CoreErrKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            CoreErrKind::NotLoggedIn => write!(f, "You need to be signed in to do that"),
            CoreErrKind::BadRequest => write!(f, "The server could not understand that request"),
            CoreErrKind::ServerUnreachable => write!(f, "Could not reach server"),
            CoreErrKind::Rejected(msg) => write!(f, "{msg}"),
            CoreErrKind::TransferCancelled => write!(f, "Upload cancelled"),
            CoreErrKind::TransferTimeout => write!(f, "Upload timed out"),
            CoreErrKind::TransferFailed(msg) => write!(f, "Network error during upload: {msg}"),
            CoreErrKind::UploadsInFlight => {
                write!(f, "Uploads are still in progress, wait for them or cancel them first")
            }
            CoreErrKind::NoFilesSelected => write!(f, "No files selected"),
            CoreErrKind::BatchTooLarge { total, remaining } => {
                write!(
                    f,
                    "Upload size ({}) exceeds remaining storage ({}). Please upgrade your subscription or delete some files.",
                    bytes_to_human(*total),
                    bytes_to_human(*remaining)
                )
            }
            CoreErrKind::UsageUnknown => {
                write!(f, "Unable to check storage limits. Please try again.")
            }
            CoreErrKind::Unexpected(msg) => write!(f, "Unexpected error: {msg}"),
        }
    }
}

impl From<CoreErrKind> for CoreErr {
    fn from(kind: CoreErrKind) -> Self {
        Self { kind, backtrace: Some(Backtrace::force_capture()) }
    }
}

impl<E: Debug + Display> From<ApiError<E>> for CoreErr {
    fn from(err: ApiError<E>) -> Self {
        match err {
            ApiError::Endpoint(e) => CoreErrKind::Rejected(e.to_string()),
            ApiError::InvalidAuth => CoreErrKind::NotLoggedIn,
            ApiError::BadRequest => CoreErrKind::BadRequest,
            ApiError::InternalError => {
                CoreErrKind::Unexpected("the server hit an internal error".to_string())
            }
            ApiError::SendFailed(_) | ApiError::ReceiveFailed(_) => CoreErrKind::ServerUnreachable,
            ApiError::Serialize(msg) | ApiError::Deserialize(msg) => CoreErrKind::Unexpected(msg),
        }
        .into()
    }
}

impl<E> From<ErrorWrapper<E>> for ApiError<E> {
    fn from(err: ErrorWrapper<E>) -> Self {
        match err {
            ErrorWrapper::Endpoint(e) => ApiError::Endpoint(e),
            ErrorWrapper::InvalidAuth => ApiError::InvalidAuth,
            ErrorWrapper::BadRequest => ApiError::BadRequest,
            ErrorWrapper::InternalError => ApiError::InternalError,
        }
    }
}

pub fn core_err_unexpected<T: Debug>(err: T) -> CoreErr {
    CoreErrKind::Unexpected(format!("{err:?}")).into()
}
