use chrono::Utc;
use sha2::{Digest, Sha256};

/// Short-lived identifier correlating the internal steps of one chat
/// exchange. Not a persistent identity: conversational memory travels in the
/// explicit history the caller passes, so a fresh correlator per call is
/// fine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCorrelator(String);

impl SessionCorrelator {
    /// Derives a correlator from the message being processed.
    pub fn derive(message: &str) -> Self {
        Self(digest(message.as_bytes()))
    }

    /// Derives a fresh correlator for a retry of the same message, salted
    /// with the current timestamp so the runtime sees a new thread.
    pub fn derive_salted(message: &str) -> Self {
        let salted = format!("{message}:{}", Utc::now().timestamp_micros());
        Self(digest(salted.as_bytes()))
    }

    /// The correlator as a hex string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionCorrelator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

fn digest(input: &[u8]) -> String {
    let hash = Sha256::digest(input);
    // 16 hex chars is plenty for log correlation
    hash.iter().take(8).map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivation_is_deterministic() {
        let a = SessionCorrelator::derive("what's trending in rust?");
        let b = SessionCorrelator::derive("what's trending in rust?");
        assert_eq!(a, b);
        assert_eq!(a.as_str().len(), 16);
    }

    #[test]
    fn salted_derivation_differs_from_plain() {
        let plain = SessionCorrelator::derive("hello");
        let salted = SessionCorrelator::derive_salted("hello");
        assert_ne!(plain, salted);
    }
}
