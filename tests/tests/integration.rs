//! All integration tests for aulos
#![expect(
    clippy::unwrap_used,
    reason = "integration test crate: unwraps are acceptable in test code"
)]

mod aulos_abr;
mod aulos_bandwidth;
mod aulos_session;
