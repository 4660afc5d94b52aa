//! Folio Storage Library
//!
//! This crate provides the storage abstraction used by the upload routes and its
//! S3-compatible implementation.
//!
//! # Storage key format
//!
//! Every object lives under its upload category: `{category}/{millis}-{filename}`, where
//! `filename` has already been sanitized. The public path of an object is the key with a
//! leading `/`. Key generation is centralized in the `keys` module.

pub mod factory;
pub mod keys;
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use keys::{build_storage_key, key_for_path, keys_from_urls, path_for_key};
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
