//! Unified fault taxonomy for key handling and proof construction
//!
//! Every failure raised by this workspace falls into one of four kinds:
//! caller bugs (`Argument`), negotiation mismatches (`UnsupportedAlgorithm`),
//! user-visible authentication failures (`Validation`), and faults from the
//! underlying crypto provider (`Provider`), which are passed through with
//! their original description. None of these are retried internally; retry
//! is a policy decision of the enclosing token pipeline.
//!
//! Validation messages are safe for external exposure: they carry an error
//! kind and an opaque code, never raw key material or internal state.

use serde::{Deserialize, Serialize};

/// Classification of token-validation failures
///
/// Surfaced to the caller as an authentication failure. The set is closed;
/// collaborators match on it rather than parsing message strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationKind {
    /// The token's validity period has ended
    Expired,
    /// The token's validity period has not started
    NotYetValid,
    /// The token or a key reference inside it is structurally invalid
    Malformed,
}

impl std::fmt::Display for ValidationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ValidationKind::Expired => "expired",
            ValidationKind::NotYetValid => "not yet valid",
            ValidationKind::Malformed => "malformed",
        };
        f.write_str(name)
    }
}

/// Unified error type for all token-layer operations
#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
pub enum TokenError {
    /// Null, empty, or malformed constructor input. A caller bug, never
    /// retryable.
    #[error("invalid argument `{parameter}`: {message}")]
    Argument {
        /// Name of the offending parameter
        parameter: String,
        /// Description of what was wrong with it
        message: String,
    },

    /// Algorithm URI not recognized by the key variant it was dispatched
    /// against. A configuration or interop mismatch, surfaced to the caller
    /// as a negotiation failure.
    #[error("algorithm not supported by this key: {algorithm}")]
    UnsupportedAlgorithm {
        /// The URI that failed to dispatch
        algorithm: String,
    },

    /// Token-level validation failure, surfaced as a user-visible
    /// authentication failure
    #[error("token validation failed ({kind}): {code}")]
    Validation {
        /// Failure classification
        kind: ValidationKind,
        /// Opaque error-code string, safe to expose externally
        code: String,
    },

    /// Fault from the underlying cryptographic provider, passed through
    /// unmodified
    #[error("crypto provider fault: {message}")]
    Provider {
        /// The provider's own description of the failure
        message: String,
    },
}

impl TokenError {
    /// Create an argument fault naming the offending parameter
    pub fn argument(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Argument {
            parameter: parameter.into(),
            message: message.into(),
        }
    }

    /// Create an unsupported-algorithm fault for a URI
    pub fn unsupported_algorithm(algorithm: impl Into<String>) -> Self {
        Self::UnsupportedAlgorithm {
            algorithm: algorithm.into(),
        }
    }

    /// Create a validation fault with an explicit kind
    pub fn validation(kind: ValidationKind, code: impl Into<String>) -> Self {
        Self::Validation {
            kind,
            code: code.into(),
        }
    }

    /// Create an expired-token validation fault
    pub fn expired(code: impl Into<String>) -> Self {
        Self::Validation {
            kind: ValidationKind::Expired,
            code: code.into(),
        }
    }

    /// Create a provider fault wrapping the provider's own message
    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider {
            message: message.into(),
        }
    }
}

/// Standard Result type for token-layer operations
pub type Result<T> = std::result::Result<T, TokenError>;

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_argument_fault_names_parameter() {
        let err = TokenError::argument("hash", "must not be empty");
        assert_matches!(err, TokenError::Argument { ref parameter, .. } if parameter == "hash");
        assert_eq!(
            err.to_string(),
            "invalid argument `hash`: must not be empty"
        );
    }

    #[test]
    fn test_unsupported_algorithm_carries_uri() {
        let err = TokenError::unsupported_algorithm("urn:unknown");
        assert_eq!(
            err.to_string(),
            "algorithm not supported by this key: urn:unknown"
        );
    }

    #[test]
    fn test_validation_fault_display() {
        let err = TokenError::expired("ERR-TOKEN-0012");
        assert_eq!(
            err.to_string(),
            "token validation failed (expired): ERR-TOKEN-0012"
        );
    }

    #[test]
    fn test_provider_fault_passthrough() {
        let err = TokenError::provider("aead::Error");
        assert_matches!(err, TokenError::Provider { ref message } if message == "aead::Error");
    }

    #[test]
    fn test_error_round_trips_through_serde() {
        let err = TokenError::validation(ValidationKind::Malformed, "ERR-KEY-0001");
        let json = serde_json::to_string(&err).expect("serialize");
        let back: TokenError = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(err.to_string(), back.to_string());
    }
}
