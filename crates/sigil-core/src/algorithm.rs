//! Algorithm-URI registry and dispatch
//!
//! Cryptographic operations across the token layer are selected by
//! algorithm-identifier URIs, the way the XML-Signature and
//! WS-SecureConversation profiles name them. Dispatch is exact and
//! case-sensitive: an unknown URI never falls back to a guess, it is
//! reported as unsupported by the key that received it.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TokenError};

/// WS-SecureConversation P_SHA1 key-derivation algorithm
pub const P_SHA1: &str = "http://schemas.xmlsoap.org/ws/2005/02/sc/dk/p_sha1";

/// HMAC-SHA1 keyed hash
pub const HMAC_SHA1: &str = "http://www.w3.org/2000/09/xmldsig#hmac-sha1";

/// HMAC-SHA256 keyed hash
pub const HMAC_SHA256: &str = "http://www.w3.org/2001/04/xmldsig-more#hmac-sha256";

/// AES-128-GCM authenticated cipher
pub const AES128_GCM: &str = "http://www.w3.org/2009/xmlenc11#aes128-gcm";

/// AES-256-GCM authenticated cipher
pub const AES256_GCM: &str = "http://www.w3.org/2009/xmlenc11#aes256-gcm";

/// Ed25519 signature
pub const ED25519: &str = "http://www.w3.org/2021/04/xmldsig-more#eddsa-ed25519";

/// SHA-1 digest
pub const SHA1: &str = "http://www.w3.org/2000/09/xmldsig#sha1";

/// SHA-256 digest
pub const SHA256: &str = "http://www.w3.org/2001/04/xmlenc#sha256";

/// SHA-512 digest
pub const SHA512: &str = "http://www.w3.org/2001/04/xmlenc#sha512";

/// Functional classification of a registered algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlgorithmClass {
    /// Derives key material from a shared secret
    KeyDerivation,
    /// Message authentication over a shared secret
    KeyedHash,
    /// Authenticated symmetric encryption
    AuthenticatedCipher,
    /// Public-key signature
    Signature,
    /// Unkeyed digest
    Digest,
}

/// A registered algorithm identifier
///
/// The registry is closed: every URI the token layer can dispatch on has a
/// variant here, and [`Algorithm::from_uri`] is the single place strings are
/// resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Algorithm {
    /// [`P_SHA1`]
    PSha1,
    /// [`HMAC_SHA1`]
    HmacSha1,
    /// [`HMAC_SHA256`]
    HmacSha256,
    /// [`AES128_GCM`]
    Aes128Gcm,
    /// [`AES256_GCM`]
    Aes256Gcm,
    /// [`ED25519`]
    Ed25519,
    /// [`SHA1`]
    Sha1,
    /// [`SHA256`]
    Sha256,
    /// [`SHA512`]
    Sha512,
}

impl Algorithm {
    /// Resolve an algorithm URI by exact, case-sensitive comparison
    ///
    /// Returns `None` for any URI outside the registry. Callers turn that
    /// into an unsupported-algorithm fault; nothing ever guesses at a
    /// near-match.
    pub fn from_uri(uri: &str) -> Option<Self> {
        match uri {
            P_SHA1 => Some(Algorithm::PSha1),
            HMAC_SHA1 => Some(Algorithm::HmacSha1),
            HMAC_SHA256 => Some(Algorithm::HmacSha256),
            AES128_GCM => Some(Algorithm::Aes128Gcm),
            AES256_GCM => Some(Algorithm::Aes256Gcm),
            ED25519 => Some(Algorithm::Ed25519),
            SHA1 => Some(Algorithm::Sha1),
            SHA256 => Some(Algorithm::Sha256),
            SHA512 => Some(Algorithm::Sha512),
            _ => None,
        }
    }

    /// The URI this algorithm was registered under
    pub fn uri(&self) -> &'static str {
        match self {
            Algorithm::PSha1 => P_SHA1,
            Algorithm::HmacSha1 => HMAC_SHA1,
            Algorithm::HmacSha256 => HMAC_SHA256,
            Algorithm::Aes128Gcm => AES128_GCM,
            Algorithm::Aes256Gcm => AES256_GCM,
            Algorithm::Ed25519 => ED25519,
            Algorithm::Sha1 => SHA1,
            Algorithm::Sha256 => SHA256,
            Algorithm::Sha512 => SHA512,
        }
    }

    /// Functional class of this algorithm
    pub fn class(&self) -> AlgorithmClass {
        match self {
            Algorithm::PSha1 => AlgorithmClass::KeyDerivation,
            Algorithm::HmacSha1 | Algorithm::HmacSha256 => AlgorithmClass::KeyedHash,
            Algorithm::Aes128Gcm | Algorithm::Aes256Gcm => AlgorithmClass::AuthenticatedCipher,
            Algorithm::Ed25519 => AlgorithmClass::Signature,
            Algorithm::Sha1 | Algorithm::Sha256 | Algorithm::Sha512 => AlgorithmClass::Digest,
        }
    }

    /// Whether this algorithm operates on a shared secret
    pub fn is_symmetric(&self) -> bool {
        matches!(
            self.class(),
            AlgorithmClass::KeyDerivation
                | AlgorithmClass::KeyedHash
                | AlgorithmClass::AuthenticatedCipher
        )
    }

    /// Whether this algorithm operates on a public/private key pair
    pub fn is_asymmetric(&self) -> bool {
        self.class() == AlgorithmClass::Signature
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.uri())
    }
}

/// An immutable, constructor-validated set of algorithm URIs
///
/// Used to carry a negotiated or configured algorithm selection. Every entry
/// must be an absolute URI; validation happens once at construction and the
/// container exposes no mutation afterward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlgorithmSuite {
    uris: Vec<String>,
}

impl AlgorithmSuite {
    /// Build a suite from a list of algorithm URIs
    ///
    /// # Errors
    ///
    /// Returns an argument fault naming the first entry that is not an
    /// absolute URI.
    pub fn new(uris: Vec<String>) -> Result<Self> {
        for uri in &uris {
            if !is_absolute_uri(uri) {
                return Err(TokenError::argument(
                    "uris",
                    format!("`{uri}` is not an absolute URI"),
                ));
            }
        }
        Ok(Self { uris })
    }

    /// Exact-match membership test
    pub fn contains(&self, uri: &str) -> bool {
        self.uris.iter().any(|u| u == uri)
    }

    /// Iterate the URIs in construction order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.uris.iter().map(String::as_str)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.uris.len()
    }

    /// Whether the suite is empty
    pub fn is_empty(&self) -> bool {
        self.uris.is_empty()
    }
}

/// Absolute-URI check: a non-empty scheme of `ALPHA *(ALPHA / DIGIT / "+" /
/// "-" / ".")` followed by `:` and a non-empty remainder.
fn is_absolute_uri(uri: &str) -> bool {
    let Some((scheme, rest)) = uri.split_once(':') else {
        return false;
    };
    if rest.is_empty() {
        return false;
    }
    let mut chars = scheme.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_uri_round_trip() {
        for alg in [
            Algorithm::PSha1,
            Algorithm::HmacSha1,
            Algorithm::HmacSha256,
            Algorithm::Aes128Gcm,
            Algorithm::Aes256Gcm,
            Algorithm::Ed25519,
            Algorithm::Sha1,
            Algorithm::Sha256,
            Algorithm::Sha512,
        ] {
            assert_eq!(Algorithm::from_uri(alg.uri()), Some(alg));
        }
    }

    #[test]
    fn test_unknown_uri_is_not_resolved() {
        assert_eq!(Algorithm::from_uri("urn:unknown"), None);
        assert_eq!(Algorithm::from_uri(""), None);
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let upper = ED25519.to_uppercase();
        assert_eq!(Algorithm::from_uri(&upper), None);
    }

    #[test]
    fn test_no_prefix_matching() {
        let truncated = &AES256_GCM[..AES256_GCM.len() - 1];
        assert_eq!(Algorithm::from_uri(truncated), None);
        let extended = format!("{AES256_GCM}x");
        assert_eq!(Algorithm::from_uri(&extended), None);
    }

    #[test]
    fn test_classification_partition() {
        assert!(Algorithm::PSha1.is_symmetric());
        assert!(Algorithm::Aes256Gcm.is_symmetric());
        assert!(!Algorithm::Aes256Gcm.is_asymmetric());
        assert!(Algorithm::Ed25519.is_asymmetric());
        assert!(!Algorithm::Ed25519.is_symmetric());
        // Digests are usable from either variant, so they classify as neither.
        assert!(!Algorithm::Sha256.is_symmetric());
        assert!(!Algorithm::Sha256.is_asymmetric());
    }

    #[test]
    fn test_suite_accepts_absolute_uris() {
        let suite = AlgorithmSuite::new(vec![
            ED25519.to_string(),
            "urn:oid:1.2.840".to_string(),
        ])
        .expect("valid suite");
        assert_eq!(suite.len(), 2);
        assert!(suite.contains(ED25519));
        assert!(!suite.contains(AES128_GCM));
    }

    #[test]
    fn test_suite_rejects_relative_entries() {
        let err = AlgorithmSuite::new(vec!["not-a-uri".to_string()]).unwrap_err();
        assert_matches!(err, TokenError::Argument { ref parameter, .. } if parameter == "uris");

        assert!(AlgorithmSuite::new(vec!["9ad:rest".to_string()]).is_err());
        assert!(AlgorithmSuite::new(vec!["http:".to_string()]).is_err());
    }
}
