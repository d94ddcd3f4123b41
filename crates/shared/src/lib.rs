//! Shared types, errors, and configuration for the accrual engine.
//!
//! This crate provides common types used across all other crates:
//! - `Hours` with half-hour granularity on top of `Decimal`
//! - Typed IDs for type-safe entity references
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
