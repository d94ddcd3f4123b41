//! Application configuration management.

use std::path::PathBuf;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Overtime and recap policy constants.
    #[serde(default)]
    pub policy: PolicyConfig,
    /// Leave caps and quotas.
    #[serde(default)]
    pub leave: LeaveConfig,
    /// Bulk recap execution settings.
    #[serde(default)]
    pub bulk: BulkConfig,
    /// Optional JSON file with employees to load at startup.
    #[serde(default)]
    pub seed_path: Option<PathBuf>,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_request_timeout() -> u64 {
    30
}

/// Overtime policy constants.
#[derive(Debug, Clone, Deserialize)]
pub struct PolicyConfig {
    /// IANA timezone used to turn "now" into a calendar date.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Maximum overtime hours for a single entry (one day).
    #[serde(default = "default_max_hours_per_day")]
    pub max_hours_per_day: Decimal,
    /// Minimum overtime hours for a single entry.
    #[serde(default = "default_min_hours_per_entry")]
    pub min_hours_per_entry: Decimal,
    /// Maximum number of entries in one overtime request.
    #[serde(default = "default_max_entries")]
    pub max_entries_per_request: usize,
    /// How many days back an entry may be dated.
    #[serde(default = "default_submission_window")]
    pub submission_window_days: i64,
    /// Hours per period eligible for cash payment.
    #[serde(default = "default_payable_cap")]
    pub payable_cap_hours: Decimal,
    /// Excess hours that convert into one TOIL day.
    #[serde(default = "default_toil_ratio")]
    pub toil_hour_ratio: Decimal,
    /// Hours in a standard working day (divides the daily overtime rate).
    #[serde(default = "default_standard_day_hours")]
    pub standard_day_hours: Decimal,
    /// Fixed hourly base paid to the privileged access tier.
    #[serde(default = "default_privileged_hourly_base")]
    pub privileged_hourly_base: Decimal,
    /// Public holidays excluded from working-day counts.
    #[serde(default)]
    pub public_holidays: Vec<NaiveDate>,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            max_hours_per_day: default_max_hours_per_day(),
            min_hours_per_entry: default_min_hours_per_entry(),
            max_entries_per_request: default_max_entries(),
            submission_window_days: default_submission_window(),
            payable_cap_hours: default_payable_cap(),
            toil_hour_ratio: default_toil_ratio(),
            standard_day_hours: default_standard_day_hours(),
            privileged_hourly_base: default_privileged_hourly_base(),
            public_holidays: Vec::new(),
        }
    }
}

fn default_timezone() -> String {
    "Asia/Jakarta".to_string()
}

fn default_max_hours_per_day() -> Decimal {
    Decimal::from(12)
}

fn default_min_hours_per_entry() -> Decimal {
    Decimal::new(5, 1)
}

fn default_max_entries() -> usize {
    5
}

fn default_submission_window() -> i64 {
    7
}

fn default_payable_cap() -> Decimal {
    Decimal::from(72)
}

fn default_toil_ratio() -> Decimal {
    Decimal::from(8)
}

fn default_standard_day_hours() -> Decimal {
    Decimal::from(8)
}

fn default_privileged_hourly_base() -> Decimal {
    Decimal::from(50_000)
}

/// Leave caps and quotas.
#[derive(Debug, Clone, Deserialize)]
pub struct LeaveConfig {
    /// Annual leave days granted when no balance exists for a year.
    #[serde(default = "default_annual_quota")]
    pub default_annual_quota: i32,
    /// Maximum unpaid leave days per year (approved and pending).
    #[serde(default = "default_unpaid_max_days")]
    pub unpaid_max_days_per_year: i32,
    /// Maximum working days in a single unpaid leave request.
    #[serde(default = "default_unpaid_max_consecutive")]
    pub unpaid_max_consecutive_days: i32,
}

impl Default for LeaveConfig {
    fn default() -> Self {
        Self {
            default_annual_quota: default_annual_quota(),
            unpaid_max_days_per_year: default_unpaid_max_days(),
            unpaid_max_consecutive_days: default_unpaid_max_consecutive(),
        }
    }
}

fn default_annual_quota() -> i32 {
    12
}

fn default_unpaid_max_days() -> i32 {
    14
}

fn default_unpaid_max_consecutive() -> i32 {
    5
}

/// Bulk recap execution settings.
#[derive(Debug, Clone, Deserialize)]
pub struct BulkConfig {
    /// Worker threads used for one bulk run.
    #[serde(default = "default_workers")]
    pub workers: usize,
    /// Attempts per employee when the store reports a transient failure.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Backoff step between attempts, in milliseconds.
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,
}

impl Default for BulkConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            max_attempts: default_max_attempts(),
            backoff_ms: default_backoff_ms(),
        }
    }
}

fn default_workers() -> usize {
    4
}

fn default_max_attempts() -> u32 {
    3
}

fn default_backoff_ms() -> u64 {
    50
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("ACCRUAL").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
