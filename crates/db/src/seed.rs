//! Employee directory records and JSON seed loading.

use std::fs;
use std::path::Path;

use accrual_core::policy::{AccessTier, EmployeePolicy};
use accrual_shared::types::EmployeeId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An employee as known to the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    /// Identifier.
    pub id: EmployeeId,
    /// Display name.
    pub name: String,
    /// Daily overtime rate.
    pub overtime_rate: Decimal,
    /// Access tier.
    #[serde(default)]
    pub access_tier: AccessTier,
    /// Annual leave quota; the store default applies when absent.
    #[serde(default)]
    pub annual_quota: Option<i32>,
}

impl EmployeeRecord {
    /// A standard-tier employee with the default quota.
    #[must_use]
    pub fn new(name: impl Into<String>, overtime_rate: Decimal) -> Self {
        Self {
            id: EmployeeId::new(),
            name: name.into(),
            overtime_rate,
            access_tier: AccessTier::Standard,
            annual_quota: None,
        }
    }

    /// The policy slice the engine consumes.
    #[must_use]
    pub fn policy(&self) -> EmployeePolicy {
        EmployeePolicy {
            overtime_rate: self.overtime_rate,
            access_tier: self.access_tier,
        }
    }
}

/// Seed file layout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedFile {
    /// Employees to register.
    #[serde(default)]
    pub employees: Vec<EmployeeRecord>,
}

/// Errors while loading a seed file.
#[derive(Debug, Error)]
pub enum SeedError {
    /// File could not be read.
    #[error("Failed to read seed file: {0}")]
    Io(#[from] std::io::Error),

    /// File is not valid seed JSON.
    #[error("Failed to parse seed file: {0}")]
    Parse(#[from] serde_json::Error),

    /// The same employee id appears twice.
    #[error("Duplicate employee {0} in seed file")]
    DuplicateEmployee(EmployeeId),
}

impl SeedFile {
    /// Parses seed JSON.
    pub fn from_json(json: &str) -> Result<Self, SeedError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a seed file.
    pub fn load(path: &Path) -> Result<Self, SeedError> {
        let raw = fs::read_to_string(path)?;
        Self::from_json(&raw)
    }
}
