use thiserror::Error;

use crate::types::ContentType;

/// Rejected content part construction
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentError {
    /// The part's payload was empty
    #[error("{content_type} content requires a non-empty payload")]
    EmptyPayload {
        /// Type of the rejected part
        content_type: ContentType,
    },
}

/// Request incompatible with the chosen provider
///
/// Always carries every violation found, never just the first.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("request rejected by {provider}: {}", violations.join("; "))]
pub struct ValidationError {
    /// Provider the request was validated against
    pub provider: String,
    /// Every violation found
    pub violations: Vec<String>,
}

impl ValidationError {
    /// Turn a list of violations into a result
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` when `violations` is non-empty.
    pub fn check(provider: impl Into<String>, violations: Vec<String>) -> Result<(), Self> {
        if violations.is_empty() {
            Ok(())
        } else {
            Err(Self {
                provider: provider.into(),
                violations,
            })
        }
    }

    /// Whether any violation mentions `needle` (case-insensitive)
    pub fn mentions(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.violations.iter().any(|v| v.to_lowercase().contains(&needle))
    }
}

/// Failure of an outbound translation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslateError {
    /// The request failed validation
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No adapter is registered under the given identifier
    #[error("unresolved provider: {provider}")]
    UnresolvedProvider {
        /// Identifier as supplied by the caller
        provider: String,
    },
}

impl TranslateError {
    /// Every human-readable problem carried by this error
    pub fn messages(&self) -> Vec<String> {
        match self {
            Self::Validation(err) => err.violations.clone(),
            Self::UnresolvedProvider { .. } => vec![self.to_string()],
        }
    }
}
