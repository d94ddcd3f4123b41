//! In-process persistence for the accrual engine.
//!
//! This crate provides:
//! - `MemoryStore`, the `AccrualStore` implementation used by the server
//! - Employee directory records
//! - JSON seed loading

pub mod memory;
pub mod seed;

pub use memory::MemoryStore;
pub use seed::{EmployeeRecord, SeedError, SeedFile};
