//! Secret types.
//!
//! Plaintext only ever lives inside [`SecretValue`], which zeroizes its
//! buffer on drop and never prints its contents.

use std::fmt;

use zeroize::Zeroizing;

use super::SecretFile;
use crate::core::types::{SecretKey, TargetName};

/// Decrypted plaintext held in memory only.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretValue(Zeroizing<String>);

impl SecretValue {
    pub fn new(value: impl Into<String>) -> Self {
        Self(Zeroizing::new(value.into()))
    }

    /// Borrow the plaintext. Callers must not log the result.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for SecretValue {
    fn from(value: String) -> Self {
        Self(Zeroizing::new(value))
    }
}

impl fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretValue([REDACTED; {} bytes])", self.0.len())
    }
}

/// One non-null leaf of a decrypted document.
#[derive(Debug, Clone)]
pub struct ExtractedSecret<'f> {
    key: SecretKey,
    value: SecretValue,
    source: &'f SecretFile,
}

impl<'f> ExtractedSecret<'f> {
    pub fn new(key: SecretKey, value: SecretValue, source: &'f SecretFile) -> Self {
        Self { key, value, source }
    }

    /// Dotted path of the leaf within its document.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &SecretValue {
        &self.value
    }

    pub fn source(&self) -> &'f SecretFile {
        self.source
    }
}

/// An extracted secret paired with its target store name.
#[derive(Debug, Clone)]
pub struct NamedSecret<'f> {
    extracted: ExtractedSecret<'f>,
    target: TargetName,
}

impl<'f> NamedSecret<'f> {
    pub fn new(extracted: ExtractedSecret<'f>, target: TargetName) -> Self {
        Self { extracted, target }
    }

    pub fn extracted(&self) -> &ExtractedSecret<'f> {
        &self.extracted
    }

    pub fn target(&self) -> &str {
        &self.target
    }
}

impl fmt::Display for NamedSecret<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.extracted.key, self.target)
    }
}
