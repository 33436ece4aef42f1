//! Storage module
//!
//! Blob storage for item photo bytes.

pub mod blob_store;

pub use blob_store::{content_hash, BlobStore};
