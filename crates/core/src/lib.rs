//! Quakewatch domain logic.
//!
//! Everything in this crate is pure: no network, no clock reads except where
//! the caller passes `now` in. Delivery lives in `quakewatch-events` and the
//! polling daemon in `quakewatch-agent`.

pub mod alert;
pub mod channels;
pub mod error;
pub mod event_record;
pub mod hazards;
pub mod message;
pub mod threshold_validation;
pub mod types;
pub mod usgs;

pub use alert::{AlertDecision, AlertThreshold, DEFAULT_MINIMUM_MAGNITUDE};
pub use error::CoreError;
pub use event_record::EventRecord;
pub use hazards::policy::evaluate;
pub use hazards::seen::SeenRecordTracker;
