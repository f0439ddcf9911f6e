//! Hotspot domain logic
//!
//! Credential verification against the router's hotspot user directory
//! and traffic counters from the active session table. Both lean on the
//! `routeros` pool; nothing here speaks the wire protocol directly.

mod stats;
mod types;
mod verifier;

pub use stats::SessionStatsFetcher;
pub use types::{
    ActiveSession, BackendError, HotspotUser, RejectReason, SessionTraffic, VerificationResult,
};
pub use verifier::CredentialVerifier;
