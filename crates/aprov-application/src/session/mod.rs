//! Session lifecycle: login, token refresh and biometric unlock.

mod manager;

pub use manager::{AutoLoginOutcome, SessionManager};
