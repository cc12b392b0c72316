//! Connection profile domain module.
//!
//! # Module Structure
//!
//! - `profile`: the REST connection profile, its validation and URL building
//! - `probe`: the reachability probe port and its result
//! - `active`: the process-wide active profile read by every outbound call

mod active;
mod probe;
mod profile;

pub use active::ActiveProfile;
pub use probe::{ConnectionProbe, ProbeResult, TOKEN_PROBE_PATH, is_probe_success_status};
pub use profile::{ConnectionProfile, DEFAULT_BASE_PATH, Protocol, ValidationReport};
