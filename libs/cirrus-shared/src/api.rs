use std::fmt::{self, Debug, Display, Formatter};

use http::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::account::Identity;
use crate::file_metadata::{FileCategory, FileType, FileWithUrl};
use crate::tier::{DenialReason, SubscriptionTier};
use crate::usage::StorageUsage;

/// Endpoint errors implement [Display] with the wording a customer may see;
/// clients surface these messages directly.
pub trait Request: Serialize + 'static {
    type Response: Debug + Serialize + DeserializeOwned + Clone;
    type Error: Debug + Serialize + DeserializeOwned + Clone + Display + ErrorStatus;
    const METHOD: Method;
    const ROUTE: &'static str;
    const SUCCESS: StatusCode = StatusCode::OK;
}

/// Every endpoint error knows the status code it travels under. The
/// transport-level failures in [ErrorWrapper] carry their own.
pub trait ErrorStatus {
    fn status(&self) -> StatusCode;
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub enum ErrorWrapper<E> {
    Endpoint(E),
    /// Missing, unknown, or expired session.
    InvalidAuth,
    BadRequest,
    InternalError,
}

impl<E: ErrorStatus> ErrorWrapper<E> {
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorWrapper::Endpoint(e) => e.status(),
            ErrorWrapper::InvalidAuth => StatusCode::UNAUTHORIZED,
            ErrorWrapper::BadRequest => StatusCode::BAD_REQUEST,
            ErrorWrapper::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// ---------------------------------------------------------------- auth

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub enum LoginError {
    InvalidInput,
    UserNotFound,
    InvalidPassword,
}

impl Request for LoginRequest {
    type Response = Identity;
    type Error = LoginError;
    const METHOD: Method = Method::POST;
    const ROUTE: &'static str = "/api/auth/login";
}

impl ErrorStatus for LoginError {
    fn status(&self) -> StatusCode {
        match self {
            LoginError::InvalidInput => StatusCode::BAD_REQUEST,
            LoginError::UserNotFound => StatusCode::NOT_FOUND,
            LoginError::InvalidPassword => StatusCode::UNAUTHORIZED,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub enum SignupError {
    InvalidInput,
    PasswordsDontMatch,
    EmailTaken,
}

impl Request for SignupRequest {
    type Response = Identity;
    type Error = SignupError;
    const METHOD: Method = Method::POST;
    const ROUTE: &'static str = "/api/auth/signup";
    const SUCCESS: StatusCode = StatusCode::CREATED;
}

impl ErrorStatus for SignupError {
    fn status(&self) -> StatusCode {
        match self {
            SignupError::InvalidInput | SignupError::PasswordsDontMatch => StatusCode::BAD_REQUEST,
            SignupError::EmailTaken => StatusCode::CONFLICT,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct LogoutRequest {}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub enum LogoutError {}

impl Request for LogoutRequest {
    type Response = ();
    type Error = LogoutError;
    const METHOD: Method = Method::POST;
    const ROUTE: &'static str = "/api/auth/logout";
}

impl ErrorStatus for LogoutError {
    fn status(&self) -> StatusCode {
        match *self {}
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct GetMeRequest {}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub enum GetMeError {
    UserNotFound,
}

impl Request for GetMeRequest {
    type Response = Identity;
    type Error = GetMeError;
    const METHOD: Method = Method::GET;
    const ROUTE: &'static str = "/api/auth/me";
}

impl ErrorStatus for GetMeError {
    fn status(&self) -> StatusCode {
        match self {
            GetMeError::UserNotFound => StatusCode::NOT_FOUND,
        }
    }
}

// ---------------------------------------------------------------- user

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct ChangeNameRequest {
    pub user_id: Uuid,
    pub new_name: String,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct ChangeNameResponse {
    pub name: String,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub enum ChangeNameError {
    InvalidInput,
    /// The new name must differ from the current one.
    NameUnchanged,
    NotPermitted,
    UserNotFound,
}

impl Request for ChangeNameRequest {
    type Response = ChangeNameResponse;
    type Error = ChangeNameError;
    const METHOD: Method = Method::PATCH;
    const ROUTE: &'static str = "/api/user/name";
}

impl ErrorStatus for ChangeNameError {
    fn status(&self) -> StatusCode {
        match self {
            ChangeNameError::InvalidInput | ChangeNameError::NameUnchanged => {
                StatusCode::BAD_REQUEST
            }
            ChangeNameError::NotPermitted => StatusCode::FORBIDDEN,
            ChangeNameError::UserNotFound => StatusCode::NOT_FOUND,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct ChangePasswordRequest {
    pub user_id: Uuid,
    pub current_password: String,
    pub new_password: String,
    pub confirm_new_password: String,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub enum ChangePasswordError {
    InvalidInput,
    PasswordsDontMatch,
    WrongCurrentPassword,
    NotPermitted,
    UserNotFound,
}

impl Request for ChangePasswordRequest {
    type Response = ();
    type Error = ChangePasswordError;
    const METHOD: Method = Method::PATCH;
    const ROUTE: &'static str = "/api/user/password";
}

impl ErrorStatus for ChangePasswordError {
    fn status(&self) -> StatusCode {
        match self {
            ChangePasswordError::InvalidInput | ChangePasswordError::PasswordsDontMatch => {
                StatusCode::BAD_REQUEST
            }
            ChangePasswordError::WrongCurrentPassword => StatusCode::UNAUTHORIZED,
            ChangePasswordError::NotPermitted => StatusCode::FORBIDDEN,
            ChangePasswordError::UserNotFound => StatusCode::NOT_FOUND,
        }
    }
}

// ---------------------------------------------------------------- files

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct GetFilesRequest {}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct GetFilesResponse {
    pub files: Vec<FileWithUrl>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub enum GetFilesError {}

impl Request for GetFilesRequest {
    type Response = GetFilesResponse;
    type Error = GetFilesError;
    const METHOD: Method = Method::GET;
    const ROUTE: &'static str = "/api/file";
}

impl ErrorStatus for GetFilesError {
    fn status(&self) -> StatusCode {
        match *self {}
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct GetStorageUsageRequest {}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub enum GetStorageUsageError {}

impl Request for GetStorageUsageRequest {
    type Response = StorageUsage;
    type Error = GetStorageUsageError;
    const METHOD: Method = Method::GET;
    const ROUTE: &'static str = "/api/file/getStorageUsage";
}

impl ErrorStatus for GetStorageUsageError {
    fn status(&self) -> StatusCode {
        match *self {}
    }
}

/// Ask for a time-boxed, single-object write credential. The server checks
/// the caller's quota before issuing; the bytes themselves never transit the
/// server.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct PresignedUrlRequest {
    pub user_id: Uuid,
    pub name: String,
    pub size: u64,
    pub mime_type: String,
    pub path: String,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct PresignedUrlResponse {
    pub credential: String,
    pub unique_key: String,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub enum PresignedUrlError {
    InvalidInput,
    NotPermitted,
    Denied(DenialReason),
}

impl Request for PresignedUrlRequest {
    type Response = PresignedUrlResponse;
    type Error = PresignedUrlError;
    const METHOD: Method = Method::POST;
    const ROUTE: &'static str = "/api/file/presignedUrl";
}

impl ErrorStatus for PresignedUrlError {
    fn status(&self) -> StatusCode {
        match self {
            PresignedUrlError::InvalidInput => StatusCode::BAD_REQUEST,
            PresignedUrlError::NotPermitted | PresignedUrlError::Denied(_) => StatusCode::FORBIDDEN,
        }
    }
}

/// Confirm a completed direct-to-storage write (or create a folder, which is
/// the same record with no bytes behind it).
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct UploadFileMetadataRequest {
    pub user_id: Uuid,
    pub name: String,
    pub file_type: FileType,
    pub storage_key: Option<String>,
    pub size: u64,
    pub mime_type: Option<String>,
    pub path: String,
    pub is_favorited: bool,
    pub category: Option<FileCategory>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct UploadFileMetadataResponse {
    pub id: Uuid,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub enum UploadFileMetadataError {
    InvalidInput,
    NotPermitted,
    /// A record with this name already exists at this path.
    FileAlreadyExists,
    Denied(DenialReason),
}

impl Request for UploadFileMetadataRequest {
    type Response = UploadFileMetadataResponse;
    type Error = UploadFileMetadataError;
    const METHOD: Method = Method::POST;
    const ROUTE: &'static str = "/api/file/uploadFileMetadata";
    const SUCCESS: StatusCode = StatusCode::CREATED;
}

impl ErrorStatus for UploadFileMetadataError {
    fn status(&self) -> StatusCode {
        match self {
            UploadFileMetadataError::InvalidInput => StatusCode::BAD_REQUEST,
            UploadFileMetadataError::NotPermitted | UploadFileMetadataError::Denied(_) => {
                StatusCode::FORBIDDEN
            }
            UploadFileMetadataError::FileAlreadyExists => StatusCode::CONFLICT,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct RenameFileRequest {
    pub id: Uuid,
    pub user_id: Uuid,
    pub new_name: String,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub enum RenameFileError {
    InvalidInput,
    NotPermitted,
    FileNotFound,
}

impl Request for RenameFileRequest {
    type Response = ();
    type Error = RenameFileError;
    const METHOD: Method = Method::POST;
    const ROUTE: &'static str = "/api/file/renameFile";
}

impl ErrorStatus for RenameFileError {
    fn status(&self) -> StatusCode {
        match self {
            RenameFileError::InvalidInput => StatusCode::BAD_REQUEST,
            RenameFileError::NotPermitted => StatusCode::FORBIDDEN,
            RenameFileError::FileNotFound => StatusCode::NOT_FOUND,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct ToggleFavoriteRequest {
    pub id: Uuid,
    pub user_id: Uuid,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct ToggleFavoriteResponse {
    pub is_favorited: bool,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub enum ToggleFavoriteError {
    NotPermitted,
    FileNotFound,
}

impl Request for ToggleFavoriteRequest {
    type Response = ToggleFavoriteResponse;
    type Error = ToggleFavoriteError;
    const METHOD: Method = Method::POST;
    const ROUTE: &'static str = "/api/file/toggleFavorite";
}

impl ErrorStatus for ToggleFavoriteError {
    fn status(&self) -> StatusCode {
        match self {
            ToggleFavoriteError::NotPermitted => StatusCode::FORBIDDEN,
            ToggleFavoriteError::FileNotFound => StatusCode::NOT_FOUND,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct DeleteFileRequest {
    pub id: Uuid,
    pub user_id: Uuid,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub enum DeleteFileError {
    /// Folders must be emptied before they can be deleted; children are
    /// never silently orphaned.
    FolderNotEmpty,
    NotPermitted,
    FileNotFound,
}

impl Request for DeleteFileRequest {
    type Response = ();
    type Error = DeleteFileError;
    const METHOD: Method = Method::DELETE;
    const ROUTE: &'static str = "/api/file";
}

impl ErrorStatus for DeleteFileError {
    fn status(&self) -> StatusCode {
        match self {
            DeleteFileError::FolderNotEmpty => StatusCode::BAD_REQUEST,
            DeleteFileError::NotPermitted => StatusCode::FORBIDDEN,
            DeleteFileError::FileNotFound => StatusCode::NOT_FOUND,
        }
    }
}

// ---------------------------------------------------------------- billing

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct CheckoutRequest {
    pub tier: SubscriptionTier,
    pub success_url: String,
    pub cancel_url: String,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct CheckoutResponse {
    pub url: String,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub enum CheckoutError {
    InvalidInput,
    /// The free tier is not something you check out.
    TierNotPurchasable,
    UserNotFound,
    AlreadySubscribed,
}

impl Request for CheckoutRequest {
    type Response = CheckoutResponse;
    type Error = CheckoutError;
    const METHOD: Method = Method::POST;
    const ROUTE: &'static str = "/api/stripe/checkout";
}

impl ErrorStatus for CheckoutError {
    fn status(&self) -> StatusCode {
        match self {
            CheckoutError::InvalidInput => StatusCode::BAD_REQUEST,
            CheckoutError::TierNotPurchasable => StatusCode::FORBIDDEN,
            CheckoutError::UserNotFound => StatusCode::NOT_FOUND,
            CheckoutError::AlreadySubscribed => StatusCode::CONFLICT,
        }
    }
}

/// The payment-processor event sink is not a typed [Request]; it carries a
/// raw signed payload and is matched on its route alone.
pub const WEBHOOK_ROUTE: &str = "/api/webhook";

pub const SESSION_COOKIE: &str = "CIRRUS_SESSION_ID";

// ------------------------------------------------- customer-facing wording

impl Display for LoginError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            LoginError::InvalidInput => write!(f, "That email or password is malformed"),
            LoginError::UserNotFound => write!(f, "No account exists with that email"),
            LoginError::InvalidPassword => write!(f, "That password is incorrect"),
        }
    }
}

impl Display for SignupError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            SignupError::InvalidInput => write!(f, "That name, email, or password is invalid"),
            SignupError::PasswordsDontMatch => write!(f, "Those passwords don't match"),
            SignupError::EmailTaken => write!(f, "An account with that email already exists"),
        }
    }
}

impl Display for LogoutError {
    fn fmt(&self, _: &mut Formatter<'_>) -> fmt::Result {
        match *self {}
    }
}

impl Display for GetMeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            GetMeError::UserNotFound => write!(f, "That account no longer exists"),
        }
    }
}

impl Display for ChangeNameError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ChangeNameError::InvalidInput => write!(f, "That name is invalid"),
            ChangeNameError::NameUnchanged => {
                write!(f, "The new name must differ from the current one")
            }
            ChangeNameError::NotPermitted => write!(f, "You don't have permission to do that"),
            ChangeNameError::UserNotFound => write!(f, "That account no longer exists"),
        }
    }
}

impl Display for ChangePasswordError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ChangePasswordError::InvalidInput => write!(f, "That password is invalid"),
            ChangePasswordError::PasswordsDontMatch => write!(f, "Those passwords don't match"),
            ChangePasswordError::WrongCurrentPassword => {
                write!(f, "Your current password is incorrect")
            }
            ChangePasswordError::NotPermitted => write!(f, "You don't have permission to do that"),
            ChangePasswordError::UserNotFound => write!(f, "That account no longer exists"),
        }
    }
}

impl Display for GetFilesError {
    fn fmt(&self, _: &mut Formatter<'_>) -> fmt::Result {
        match *self {}
    }
}

impl Display for GetStorageUsageError {
    fn fmt(&self, _: &mut Formatter<'_>) -> fmt::Result {
        match *self {}
    }
}

impl Display for PresignedUrlError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            PresignedUrlError::InvalidInput => write!(f, "That upload request is malformed"),
            PresignedUrlError::NotPermitted => write!(f, "You don't have permission to do that"),
            PresignedUrlError::Denied(reason) => write!(f, "{reason}"),
        }
    }
}

impl Display for UploadFileMetadataError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            UploadFileMetadataError::InvalidInput => write!(f, "That file record is malformed"),
            UploadFileMetadataError::NotPermitted => {
                write!(f, "You don't have permission to do that")
            }
            UploadFileMetadataError::FileAlreadyExists => {
                write!(f, "A file with that name already exists here")
            }
            UploadFileMetadataError::Denied(reason) => write!(f, "{reason}"),
        }
    }
}

impl Display for RenameFileError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            RenameFileError::InvalidInput => write!(f, "That name is invalid"),
            RenameFileError::NotPermitted => write!(f, "You don't have permission to do that"),
            RenameFileError::FileNotFound => write!(f, "That file does not exist"),
        }
    }
}

impl Display for ToggleFavoriteError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ToggleFavoriteError::NotPermitted => write!(f, "You don't have permission to do that"),
            ToggleFavoriteError::FileNotFound => write!(f, "That file does not exist"),
        }
    }
}

impl Display for DeleteFileError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            DeleteFileError::FolderNotEmpty => {
                write!(f, "That folder still contains files, delete them first")
            }
            DeleteFileError::NotPermitted => write!(f, "You don't have permission to do that"),
            DeleteFileError::FileNotFound => write!(f, "That file does not exist"),
        }
    }
}

impl Display for CheckoutError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            CheckoutError::InvalidInput => write!(f, "That checkout request is malformed"),
            CheckoutError::TierNotPurchasable => write!(f, "That plan cannot be purchased"),
            CheckoutError::UserNotFound => write!(f, "That account no longer exists"),
            CheckoutError::AlreadySubscribed => {
                write!(f, "You are already subscribed to that plan")
            }
        }
    }
}
