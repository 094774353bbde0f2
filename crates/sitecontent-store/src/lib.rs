//! Storage layer: document store clients, the shared read cache, and
//! admin-gated writes.

mod cache;
mod client;
mod editor;
mod error;
mod file;

pub use cache::{CacheConfig, CacheEntry, QueryCache};
pub use client::{DocumentClient, MemoryDocumentClient, insert, lookup};
pub use editor::{AccessGate, ContentEditor, StaticSession};
pub use error::{EditError, FetchError, StoreError};
pub use file::JsonFileClient;
