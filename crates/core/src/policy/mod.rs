//! Clock and policy provider.
//!
//! Every engine call receives "now" and the policy constants explicitly;
//! nothing in the core reads ambient time or configuration.

pub mod clock;
pub mod types;

pub use clock::{Clock, FixedClock, SystemClock};
pub use types::{AccessTier, EmployeePolicy, Policy, PolicyError};
