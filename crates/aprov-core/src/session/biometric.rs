use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use strum::Display;

/// Biometric modality, used for labeling only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BiometricKind {
    #[default]
    None,
    Face,
    Fingerprint,
    /// Hardware present but neither face nor fingerprint reported
    Biometric,
}

impl BiometricKind {
    /// Best available kind for display: face, then fingerprint, then generic.
    pub fn best_of(kinds: &[BiometricKind]) -> Self {
        if kinds.contains(&Self::Face) {
            Self::Face
        } else if kinds.contains(&Self::Fingerprint) {
            Self::Fingerprint
        } else {
            Self::Biometric
        }
    }
}

/// Reason code returned by enabling biometric unlock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum BiometricEnableOutcome {
    Success,
    NoRefresh,
    NoHardware,
    NotEnrolled,
}

impl BiometricEnableOutcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Success)
    }
}

/// Device biometric prompt.
#[async_trait]
pub trait BiometricAuthenticator: Send + Sync {
    async fn has_hardware(&self) -> bool;

    async fn is_enrolled(&self) -> bool;

    async fn supported_kinds(&self) -> Vec<BiometricKind>;

    /// Shows the challenge; `true` only when the user passed it.
    async fn authenticate(&self, prompt: &str) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_best_kind_prefers_face() {
        use BiometricKind::*;
        assert_eq!(BiometricKind::best_of(&[Fingerprint, Face]), Face);
        assert_eq!(BiometricKind::best_of(&[Fingerprint]), Fingerprint);
        assert_eq!(BiometricKind::best_of(&[]), Biometric);
    }

    #[test]
    fn test_outcome_codes() {
        assert_eq!(BiometricEnableOutcome::NoHardware.to_string(), "no-hardware");
        assert!(BiometricEnableOutcome::Success.is_ok());
    }
}
