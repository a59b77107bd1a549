//! Shared test utilities
//!
//! Used by the unit tests and, behind the `testing` feature, by the
//! integration tests. [`vectors`] holds fixed ceremony payloads with real
//! signatures; [`builders`] assembles raw payloads for malformed-input
//! cases.

pub mod builders;
pub mod vectors;
