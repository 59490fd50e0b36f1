// ==========================================
// Expo Lead Fusion - Identity Key
// ==========================================
// Responsibility: tagged key deciding which records refer to the
// same real-world entity
// Priority order: website > phone > email > company > unique
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of signal an identity key was derived from, strongest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum KeyKind {
    Website,
    Phone,
    Email,
    Company,
    /// Synthetic key guaranteeing every record lands in exactly one
    /// group even when it shares nothing with any other record.
    Unique,
}

impl KeyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyKind::Website => "website",
            KeyKind::Phone => "phone",
            KeyKind::Email => "email",
            KeyKind::Company => "company",
            KeyKind::Unique => "unique",
        }
    }
}

impl fmt::Display for KeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ==========================================
// IdentityKey
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IdentityKey {
    pub kind: KeyKind,
    pub value: String,
}

impl IdentityKey {
    pub fn new(kind: KeyKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }

    pub fn unique(value: impl Into<String>) -> Self {
        Self::new(KeyKind::Unique, value)
    }

    /// Rendered bucket key used by the grouping engine.
    pub fn bucket_key(&self) -> String {
        format!("{}:{}", self.kind, self.value)
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.value)
    }
}
