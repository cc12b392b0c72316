//! Terminal stand-in for a device biometric sensor.
//!
//! The sensor is "present" when `APROV_BIOMETRIC` names a kind (`face`,
//! `fingerprint` or `biometric`); the challenge is a y/N confirmation.

use std::io::{self, BufRead, Write};

use async_trait::async_trait;

use aprov_core::session::{BiometricAuthenticator, BiometricKind};

const ENV_VAR: &str = "APROV_BIOMETRIC";

pub struct ConsoleBiometric {
    kind: Option<BiometricKind>,
}

impl ConsoleBiometric {
    pub fn from_env() -> Self {
        let kind = std::env::var(ENV_VAR).ok().and_then(|value| {
            match value.trim().to_lowercase().as_str() {
                "face" => Some(BiometricKind::Face),
                "fingerprint" => Some(BiometricKind::Fingerprint),
                "biometric" | "1" | "true" => Some(BiometricKind::Biometric),
                _ => None,
            }
        });
        Self { kind }
    }
}

#[async_trait]
impl BiometricAuthenticator for ConsoleBiometric {
    async fn has_hardware(&self) -> bool {
        self.kind.is_some()
    }

    async fn is_enrolled(&self) -> bool {
        self.kind.is_some()
    }

    async fn supported_kinds(&self) -> Vec<BiometricKind> {
        self.kind.into_iter().collect()
    }

    async fn authenticate(&self, prompt: &str) -> bool {
        if self.kind.is_none() {
            return false;
        }
        let prompt = prompt.to_string();
        tokio::task::spawn_blocking(move || {
            eprint!("{} [y/N]: ", prompt);
            let _ = io::stderr().flush();
            let mut answer = String::new();
            io::stdin().lock().read_line(&mut answer).is_ok()
                && matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
        })
        .await
        .unwrap_or(false)
    }
}
