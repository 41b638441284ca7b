//! Shared configuration, errors, and telemetry for Entryflow.
//!
//! This crate provides common pieces used across all other crates:
//! - Application-wide error types
//! - Configuration management
//! - Tracing subscriber setup for the binaries

pub mod config;
pub mod error;
pub mod telemetry;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
