//! The contract between the cirrus client library and our server.
//!
//! - [api] holds every endpoint's request, response, and error types, and the
//!   [api::Request] trait that binds them to a method and route.
//! - [file_metadata] is the file/folder record model both sides agree on.
//! - [tier] is the subscription tier table and the quota decision logic.
//! - [usage] is the derived storage-usage snapshot and byte formatting.

pub mod account;
pub mod api;
pub mod clock;
pub mod file_metadata;
pub mod tier;
pub mod usage;
