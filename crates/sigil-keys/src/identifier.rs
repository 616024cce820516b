//! Opaque binary identifiers for hash-based key references
//!
//! A [`BinaryIdentifier`] owns an immutable copy of an externally produced
//! hash (a certificate thumbprint, a ticket digest). Identifiers from inbound
//! tokens are attacker-influenced, so equality runs in constant time over the
//! buffer contents; only the length check may exit early, since lengths are
//! not secret.

use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

use sigil_core::{Result, TokenError};

/// An immutable, owned byte buffer identifying a key by hash
///
/// Construction copies the input, so the caller's buffer can be reused or
/// mutated afterward without affecting the identifier. The contents never
/// change once constructed.
#[derive(Clone, Serialize, Deserialize)]
pub struct BinaryIdentifier {
    #[serde(with = "serde_bytes")]
    bytes: Vec<u8>,
}

impl BinaryIdentifier {
    /// Create an identifier from a byte slice, copying it
    ///
    /// # Errors
    ///
    /// Returns an argument fault if `bytes` is empty.
    pub fn new(bytes: &[u8]) -> Result<Self> {
        Self::from_owned(bytes.to_vec())
    }

    /// Create an identifier from an already-owned buffer without copying
    ///
    /// The no-copy path: callers must hand over a buffer nothing else can
    /// mutate. Prefer [`BinaryIdentifier::new`] at any trust boundary.
    pub fn from_owned(bytes: Vec<u8>) -> Result<Self> {
        if bytes.is_empty() {
            return Err(TokenError::argument("bytes", "identifier must not be empty"));
        }
        Ok(Self { bytes })
    }

    /// Parse a lower- or upper-case hex rendering
    pub fn from_hex(hex_str: &str) -> Result<Self> {
        let bytes = hex::decode(hex_str)
            .map_err(|e| TokenError::argument("hex_str", format!("invalid hex: {e}")))?;
        Self::from_owned(bytes)
    }

    /// Parse a standard-alphabet base64 rendering
    pub fn from_base64(b64: &str) -> Result<Self> {
        let bytes = BASE64
            .decode(b64)
            .map_err(|e| TokenError::argument("b64", format!("invalid base64: {e}")))?;
        Self::from_owned(bytes)
    }

    /// The identifier bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Length in bytes, always non-zero
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always false; empty identifiers cannot be constructed
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Constant-time byte equality against a candidate buffer
    ///
    /// Differing lengths compare unequal immediately; equal-length buffers
    /// are compared without short-circuiting on the first mismatch.
    pub fn matches(&self, candidate: &[u8]) -> bool {
        if self.bytes.len() != candidate.len() {
            return false;
        }
        bool::from(self.bytes.as_slice().ct_eq(candidate))
    }

    /// Lossless lower-case hex rendering
    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }

    /// Lossless base64 rendering, standard alphabet
    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.bytes)
    }
}

impl PartialEq for BinaryIdentifier {
    fn eq(&self, other: &Self) -> bool {
        self.matches(&other.bytes)
    }
}

impl Eq for BinaryIdentifier {}

impl std::fmt::Display for BinaryIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

// The identifier is a public hash, not key material, so rendering it in
// full is safe for diagnostics.
impl std::fmt::Debug for BinaryIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BinaryIdentifier({})", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_construction_copies_the_input() {
        let mut source = vec![0xAA, 0xBB, 0xCC];
        let id = BinaryIdentifier::new(&source).unwrap();
        source[0] = 0x00;
        assert_eq!(id.to_hex(), "aabbcc");
    }

    #[test]
    fn test_empty_input_is_an_argument_fault() {
        let err = BinaryIdentifier::new(&[]).unwrap_err();
        assert_matches!(err, TokenError::Argument { ref parameter, .. } if parameter == "bytes");
    }

    #[test]
    fn test_matches_exact_bytes_only() {
        let id = BinaryIdentifier::new(&[1, 2, 3, 4]).unwrap();
        assert!(id.matches(&[1, 2, 3, 4]));
        assert!(!id.matches(&[1, 2, 3, 5]));
        assert!(!id.matches(&[1, 2, 3]));
        assert!(!id.matches(&[1, 2, 3, 4, 5]));
        assert!(!id.matches(&[]));
    }

    #[test]
    fn test_hex_round_trip() {
        let id = BinaryIdentifier::new(&[0x00, 0xFF, 0x10]).unwrap();
        let back = BinaryIdentifier::from_hex(&id.to_hex()).unwrap();
        assert_eq!(id, back);
    }

    #[test]
    fn test_base64_round_trip() {
        let id = BinaryIdentifier::new(b"thumbprint-material").unwrap();
        let back = BinaryIdentifier::from_base64(&id.to_base64()).unwrap();
        assert_eq!(id, back);
    }

    #[test]
    fn test_invalid_hex_is_an_argument_fault() {
        assert_matches!(
            BinaryIdentifier::from_hex("zz").unwrap_err(),
            TokenError::Argument { ref parameter, .. } if parameter == "hex_str"
        );
    }

    #[test]
    fn test_display_and_debug_render_hex() {
        let id = BinaryIdentifier::new(&[0xDE, 0xAD]).unwrap();
        assert_eq!(format!("{id}"), "dead");
        assert_eq!(format!("{id:?}"), "BinaryIdentifier(dead)");
    }

    #[test]
    fn test_serde_round_trip() {
        let id = BinaryIdentifier::new(&[9, 8, 7]).unwrap();
        let json = serde_json::to_string(&id).unwrap();
        let back: BinaryIdentifier = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }
}
