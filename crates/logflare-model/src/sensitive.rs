//! Wrapper for values that must never be rendered in logs or diagnostics.

use serde::{Deserialize, Serialize};
use std::fmt;
use value_core::REDACTED;

/// A value whose `Debug` and `Display` output is always `<sensitive>`.
///
/// Serialization is transparent so persisted state keeps the real value.
#[derive(Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sensitive<T>(T);

impl<T> Sensitive<T> {
    pub fn new(value: T) -> Self {
        Self(value)
    }

    /// Borrow the wrapped value.
    pub fn expose(&self) -> &T {
        &self.0
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

impl Sensitive<String> {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<T> From<T> for Sensitive<T> {
    fn from(value: T) -> Self {
        Self(value)
    }
}

impl From<&str> for Sensitive<String> {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl<T> fmt::Debug for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl<T> fmt::Display for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_never_rendered() {
        let token = Sensitive::from("tok-1");
        assert_eq!(format!("{token:?} {token}"), "<sensitive> <sensitive>");
        assert_eq!(token.as_str(), "tok-1");
    }

    #[test]
    fn test_serializes_transparently() {
        let token = Sensitive::from("tok-1");
        assert_eq!(serde_json::to_string(&token).unwrap(), "\"tok-1\"");
        let back: Sensitive<String> = serde_json::from_str("\"tok-1\"").unwrap();
        assert_eq!(back, token);
    }
}
