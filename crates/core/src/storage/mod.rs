//! Image storage for entry attachments using Apache OpenDAL.
//!
//! Operators upload one image per entry. The bytes go to object storage
//! before any database transaction opens; only the returned path is
//! written to the entry row.
//!
//! Supported backends:
//! - S3-compatible: Cloudflare R2, Supabase Storage, AWS S3, MinIO
//! - Local filesystem (development only)

mod config;
mod error;
mod service;

pub use config::{StorageConfig, StorageProvider};
pub use error::StorageError;
pub use service::{ImageStore, sanitize_filename};
