//! Jenkins Core
//!
//! Data shapes decoded from the Jenkins JSON API.
//!
//! This crate contains:
//! - Domain types: typed records for jobs, builds, views, computers, executors,
//!   the build queue and test reports, plus the pure math projected from them
//! - DTOs: wire-only envelopes that never leave the client (crumb issuer, computer set)
//!
//! Nothing here performs I/O. The HTTP side lives in `jenkins-client`.

pub mod domain;
pub mod dto;
