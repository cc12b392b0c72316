//! Session domain module.
//!
//! # Module Structure
//!
//! - `model`: the signed-in user, token responses and the persisted session record
//! - `token`: the shared bearer token slot read by every outbound call
//! - `auth`: the token endpoint port
//! - `biometric`: the device biometric capability port

mod auth;
mod biometric;
mod model;
mod token;

pub use auth::AuthApi;
pub use biometric::{BiometricAuthenticator, BiometricEnableOutcome, BiometricKind};
pub use model::{PersistedSession, TokenResponse, User};
pub use token::TokenSlot;
