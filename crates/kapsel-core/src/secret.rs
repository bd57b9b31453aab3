//! Signing credentials and where they come from.
//!
//! Descriptors never carry credentials in plaintext. They name environment
//! variables instead, and the loader resolves those names through a
//! [`SecretSource`] into [`Secret`] values that redact themselves in debug
//! and serialized output.

use std::collections::HashMap;
use std::fmt;

use serde::{Serialize, Serializer};

/// A resolved credential.
///
/// The wrapped value is only reachable through [`Secret::expose`]; `Debug`
/// and `Serialize` both redact.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The underlying credential, for handing to the signing step.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(<redacted>)")
    }
}

impl Serialize for Secret {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str("<redacted>")
    }
}

/// Resolves credential variable names to values.
pub trait SecretSource {
    fn lookup(&self, var: &str) -> Option<String>;
}

/// Resolves credentials from the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSecrets;

impl SecretSource for EnvSecrets {
    fn lookup(&self, var: &str) -> Option<String> {
        std::env::var(var).ok()
    }
}

/// In-memory source, mainly for tests.
impl SecretSource for HashMap<String, String> {
    fn lookup(&self, var: &str) -> Option<String> {
        self.get(var).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_redacts() {
        let secret = Secret::new("hunter2");
        assert_eq!(format!("{secret:?}"), "Secret(<redacted>)");
    }

    #[test]
    fn expose_returns_value() {
        let secret = Secret::new("hunter2");
        assert_eq!(secret.expose(), "hunter2");
    }

    #[test]
    fn map_source_resolves() {
        let source: HashMap<String, String> =
            [("STORE_PASSWORD".to_string(), "s3cret".to_string())].into();
        assert_eq!(source.lookup("STORE_PASSWORD").as_deref(), Some("s3cret"));
        assert_eq!(source.lookup("MISSING"), None);
    }
}
