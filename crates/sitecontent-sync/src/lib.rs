//! Sync layer: the REST document store client and the sync validator that
//! cross-checks which content sections carry authored data.

#[cfg(feature = "http")]
pub mod http;
pub mod validator;

#[cfg(feature = "http")]
pub use http::{RestDocumentClient, SyncError};
pub use validator::SyncValidator;
