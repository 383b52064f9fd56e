//! Outbound services: the shared rate gate and the Snyk API client

pub mod rate_gate;
pub mod snyk_client;

pub use rate_gate::{GateError, RateGate};
pub use snyk_client::{SnykClient, SubmitError};
