//! Hazard alerting domain logic.
//!
//! Contains the alert policy and the seen-record tracker. All logic in this
//! module is pure (no I/O) so it can be tested in isolation.

pub mod policy;
pub mod seen;
