//! Result type for operations that degrade instead of failing.
//!
//! Remote services and decoders in this crate never abort the interview.
//! `Outcome` keeps the degraded path visible so callers (and tests) can tell
//! a real answer from a substitute.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome<T> {
    /// The primary path produced this value
    Ok { value: T },
    /// A substitute value, with the reason the primary path was abandoned
    Fallback { value: T, reason: String },
    /// Nothing usable could be produced
    Failed { reason: String },
}

impl<T> Outcome<T> {
    pub fn ok(value: T) -> Self {
        Outcome::Ok { value }
    }

    pub fn fallback(value: T, reason: impl Into<String>) -> Self {
        Outcome::Fallback {
            value,
            reason: reason.into(),
        }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Outcome::Failed {
            reason: reason.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Outcome::Ok { .. })
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Outcome::Fallback { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed { .. })
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Outcome::Ok { value } | Outcome::Fallback { value, .. } => Some(value),
            Outcome::Failed { .. } => None,
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            Outcome::Ok { value } | Outcome::Fallback { value, .. } => Some(value),
            Outcome::Failed { .. } => None,
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Outcome::Ok { .. } => None,
            Outcome::Fallback { reason, .. } | Outcome::Failed { reason } => Some(reason),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Ok { value } => Outcome::Ok { value: f(value) },
            Outcome::Fallback { value, reason } => Outcome::Fallback {
                value: f(value),
                reason,
            },
            Outcome::Failed { reason } => Outcome::Failed { reason },
        }
    }
}
