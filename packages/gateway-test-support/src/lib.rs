//! Gateway test support utilities
//!
//! Helpers shared by the gateway's unit and integration tests: one-time
//! logging initialization and assertions over the JSON response envelopes.

pub mod envelope;
pub mod logging;
