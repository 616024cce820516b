//! The security-key capability model
//!
//! A [`SecurityKey`] lets the token pipeline use a key without knowing its
//! concrete type. Callers check [`SecurityKey::is_supported_algorithm`]
//! first, then request a narrow capability object for the operation they
//! need; skipping the check does not produce undefined behavior, just an
//! unsupported-algorithm fault from the acquisition call.
//!
//! The variant set is closed: symmetric, asymmetric, bearer. The
//! symmetric/asymmetric query methods are provided in terms of the tag so a
//! key can never answer inconsistently with its own variant.

use std::fmt;

use sigil_core::Result;

/// Closed variant tag for key capability sets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    /// Shared-secret key: derivation, keyed hashes, authenticated ciphers
    Symmetric,
    /// Public/private key pair: signing and verification
    Asymmetric,
    /// No proof key at all; the token is presented, not proven
    Bearer,
}

/// Abstract capability surface for a single cryptographic key
///
/// Implementations are immutable after construction, safe for concurrent
/// read-only use, and never retain caller buffers. The layer borrows a key
/// for the duration of one operation; ownership stays with whichever
/// resolver produced it.
pub trait SecurityKey: Send + Sync + fmt::Debug {
    /// Key size in bits; zero for bearer keys
    fn key_size_bits(&self) -> usize;

    /// The variant tag deciding which capability set applies
    fn kind(&self) -> KeyKind;

    /// Pure query: can this key perform the named algorithm?
    ///
    /// Algorithm URIs are matched exactly and case-sensitively; unknown URIs
    /// are unsupported, never guessed.
    fn is_supported_algorithm(&self, algorithm: &str) -> bool;

    /// Supported symmetric algorithm? False on any non-symmetric variant.
    fn is_symmetric_algorithm(&self, algorithm: &str) -> bool {
        self.kind() == KeyKind::Symmetric && self.is_supported_algorithm(algorithm)
    }

    /// Supported asymmetric algorithm? False on any non-asymmetric variant.
    fn is_asymmetric_algorithm(&self, algorithm: &str) -> bool {
        self.kind() == KeyKind::Asymmetric && self.is_supported_algorithm(algorithm)
    }
}

/// One-shot authenticated encryption or decryption capability
pub trait CipherTransform: Send {
    /// URI of the algorithm this transform performs
    fn algorithm(&self) -> &str;

    /// Apply the transform to `input`, producing ciphertext or plaintext
    fn process(&self, input: &[u8]) -> Result<Vec<u8>>;
}

/// Keyed-hash (MAC) capability
pub trait KeyedHashFunction: Send {
    /// URI of the MAC algorithm
    fn algorithm(&self) -> &str;

    /// Compute the tag over `data`
    fn compute(&self, data: &[u8]) -> Result<Vec<u8>>;

    /// Verify `tag` over `data` in constant time
    fn verify(&self, data: &[u8], tag: &[u8]) -> Result<bool>;
}

/// Signing capability; the private key never leaves the object
pub trait SignatureFormatter: Send {
    /// URI of the signature algorithm
    fn algorithm(&self) -> &str;

    /// Sign `message`, returning the detached signature bytes
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>>;
}

/// Verification capability over the public half of a key pair
pub trait SignatureDeformatter: Send {
    /// URI of the signature algorithm
    fn algorithm(&self) -> &str;

    /// Check `signature` over `message`; a structurally invalid signature
    /// verifies as false rather than faulting
    fn verify(&self, message: &[u8], signature: &[u8]) -> Result<bool>;
}

/// Unkeyed digest capability
pub trait HashFunction: Send {
    /// URI of the digest algorithm
    fn algorithm(&self) -> &str;

    /// Digest output length in bytes
    fn output_len(&self) -> usize;

    /// Digest `data`
    fn digest(&self, data: &[u8]) -> Vec<u8>;
}

/// The bearer variant: a token holder with no proof key
///
/// Supports no algorithm; every capability query answers false.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BearerKey;

impl SecurityKey for BearerKey {
    fn key_size_bits(&self) -> usize {
        0
    }

    fn kind(&self) -> KeyKind {
        KeyKind::Bearer
    }

    fn is_supported_algorithm(&self, _algorithm: &str) -> bool {
        false
    }
}
