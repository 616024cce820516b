//! Symmetric key material
//!
//! [`InMemorySymmetricKey`] holds a shared secret in process memory and
//! hands out the symmetric capability set: raw-key export, deterministic
//! derived-key generation, AES-GCM transforms, and HMAC keyed hashes. The
//! buffer is zeroized on drop and never printed.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes128Gcm, Aes256Gcm, Key,
};
use hmac::{Hmac, Mac};
use sha1::Sha1;
use sha2::Sha256;
use zeroize::Zeroizing;

use sigil_core::algorithm::{self, Algorithm};
use sigil_core::{Result, TokenError};

use crate::derive::{p_sha1, DerivationLimits};
use crate::key::{CipherTransform, KeyKind, KeyedHashFunction, SecurityKey};

/// GCM nonce length in bytes, shared by both AES-GCM suites
const GCM_IV_LEN: usize = 12;

/// A symmetric key held in process memory
///
/// Immutable after construction. The capability set it supports depends on
/// the key size: the AES-GCM suites dispatch only when the key length
/// matches the cipher, while derivation and the HMAC suites accept any
/// non-empty key.
#[derive(Clone)]
pub struct InMemorySymmetricKey {
    key: Zeroizing<Vec<u8>>,
    limits: DerivationLimits,
}

impl InMemorySymmetricKey {
    /// Create a key, copying the input buffer
    ///
    /// # Errors
    ///
    /// Returns an argument fault if `key` is empty.
    pub fn new(key: &[u8]) -> Result<Self> {
        Self::from_owned(key.to_vec())
    }

    /// Create a key from an already-owned buffer without copying
    ///
    /// The buffer must be private to the caller; prefer
    /// [`InMemorySymmetricKey::new`] at any trust boundary.
    pub fn from_owned(key: Vec<u8>) -> Result<Self> {
        if key.is_empty() {
            return Err(TokenError::argument("key", "key must not be empty"));
        }
        Ok(Self {
            key: Zeroizing::new(key),
            limits: DerivationLimits::default(),
        })
    }

    /// Override the derivation input/output caps
    pub fn with_derivation_limits(mut self, limits: DerivationLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Return a copy of the raw key bytes
    ///
    /// The returned buffer is owned by the caller from this point; the key
    /// keeps no reference to it. Treat the result as sensitive and drop it
    /// as soon as the operation that needed it completes.
    pub fn symmetric_key(&self) -> Vec<u8> {
        self.key.to_vec()
    }

    /// Deterministically derive key material from this key
    ///
    /// Dispatches on `algorithm` (only [`algorithm::P_SHA1`] is in the
    /// registry), seeds the PRF with `label || nonce`, and returns
    /// `length_bits / 8` bytes starting at byte `offset` of the output
    /// stream. Identical inputs always produce identical output, so two
    /// parties deriving independently agree.
    ///
    /// # Errors
    ///
    /// Unsupported-algorithm fault for any URI other than P_SHA1; argument
    /// faults for a zero or non-byte-aligned `length_bits` or for inputs
    /// exceeding the derivation limits.
    pub fn generate_derived_key(
        &self,
        algorithm: &str,
        label: &[u8],
        nonce: &[u8],
        length_bits: usize,
        offset: usize,
    ) -> Result<Vec<u8>> {
        match Algorithm::from_uri(algorithm) {
            Some(Algorithm::PSha1) => {}
            _ => return Err(TokenError::unsupported_algorithm(algorithm)),
        }
        if length_bits == 0 || length_bits % 8 != 0 {
            return Err(TokenError::argument(
                "length_bits",
                "derived key length must be a non-zero multiple of 8 bits",
            ));
        }
        p_sha1(
            &self.key,
            label,
            nonce,
            offset,
            length_bits / 8,
            &self.limits,
        )
    }

    /// Acquire an encryption transform for `algorithm` under `iv`
    pub fn encryption_transform(
        &self,
        algorithm: &str,
        iv: &[u8],
    ) -> Result<Box<dyn CipherTransform>> {
        self.gcm_transform(algorithm, iv, Direction::Encrypt)
    }

    /// Acquire a decryption transform for `algorithm` under `iv`
    pub fn decryption_transform(
        &self,
        algorithm: &str,
        iv: &[u8],
    ) -> Result<Box<dyn CipherTransform>> {
        self.gcm_transform(algorithm, iv, Direction::Decrypt)
    }

    /// IV length in bytes required by `algorithm`
    pub fn iv_size(&self, algorithm: &str) -> Result<usize> {
        match Algorithm::from_uri(algorithm) {
            Some(Algorithm::Aes128Gcm) | Some(Algorithm::Aes256Gcm)
                if self.is_supported_algorithm(algorithm) =>
            {
                Ok(GCM_IV_LEN)
            }
            _ => Err(TokenError::unsupported_algorithm(algorithm)),
        }
    }

    /// Acquire a keyed-hash capability for `algorithm`
    pub fn keyed_hash(&self, algorithm: &str) -> Result<Box<dyn KeyedHashFunction>> {
        let alg = match Algorithm::from_uri(algorithm) {
            Some(alg @ (Algorithm::HmacSha1 | Algorithm::HmacSha256)) => alg,
            _ => return Err(TokenError::unsupported_algorithm(algorithm)),
        };
        Ok(Box::new(HmacKeyedHash {
            key: self.key.clone(),
            algorithm: alg,
        }))
    }

    fn gcm_transform(
        &self,
        algorithm: &str,
        iv: &[u8],
        direction: Direction,
    ) -> Result<Box<dyn CipherTransform>> {
        let cipher = match Algorithm::from_uri(algorithm) {
            Some(Algorithm::Aes128Gcm) if self.key.len() == 16 => {
                GcmCipher::Aes128(Aes128Gcm::new(Key::<Aes128Gcm>::from_slice(&self.key)))
            }
            Some(Algorithm::Aes256Gcm) if self.key.len() == 32 => {
                GcmCipher::Aes256(Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&self.key)))
            }
            _ => return Err(TokenError::unsupported_algorithm(algorithm)),
        };
        if iv.len() != GCM_IV_LEN {
            return Err(TokenError::argument(
                "iv",
                format!("IV must be {GCM_IV_LEN} bytes, got {}", iv.len()),
            ));
        }
        let mut nonce = [0u8; GCM_IV_LEN];
        nonce.copy_from_slice(iv);
        Ok(Box::new(GcmTransform {
            cipher,
            nonce,
            direction,
        }))
    }
}

impl SecurityKey for InMemorySymmetricKey {
    fn key_size_bits(&self) -> usize {
        self.key.len() * 8
    }

    fn kind(&self) -> KeyKind {
        KeyKind::Symmetric
    }

    fn is_supported_algorithm(&self, algorithm: &str) -> bool {
        match Algorithm::from_uri(algorithm) {
            Some(Algorithm::PSha1 | Algorithm::HmacSha1 | Algorithm::HmacSha256) => true,
            Some(Algorithm::Aes128Gcm) => self.key.len() == 16,
            Some(Algorithm::Aes256Gcm) => self.key.len() == 32,
            _ => false,
        }
    }
}

// Never print the key bytes.
impl std::fmt::Debug for InMemorySymmetricKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "InMemorySymmetricKey({} bits)", self.key_size_bits())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Encrypt,
    Decrypt,
}

enum GcmCipher {
    Aes128(Aes128Gcm),
    Aes256(Aes256Gcm),
}

struct GcmTransform {
    cipher: GcmCipher,
    nonce: [u8; GCM_IV_LEN],
    direction: Direction,
}

impl CipherTransform for GcmTransform {
    fn algorithm(&self) -> &str {
        match self.cipher {
            GcmCipher::Aes128(_) => algorithm::AES128_GCM,
            GcmCipher::Aes256(_) => algorithm::AES256_GCM,
        }
    }

    fn process(&self, input: &[u8]) -> Result<Vec<u8>> {
        let nonce = &self.nonce.into();
        let result = match (&self.cipher, self.direction) {
            (GcmCipher::Aes128(c), Direction::Encrypt) => c.encrypt(nonce, input),
            (GcmCipher::Aes128(c), Direction::Decrypt) => c.decrypt(nonce, input),
            (GcmCipher::Aes256(c), Direction::Encrypt) => c.encrypt(nonce, input),
            (GcmCipher::Aes256(c), Direction::Decrypt) => c.decrypt(nonce, input),
        };
        result.map_err(|e| TokenError::provider(format!("AES-GCM failed: {e}")))
    }
}

struct HmacKeyedHash {
    key: Zeroizing<Vec<u8>>,
    algorithm: Algorithm,
}

impl KeyedHashFunction for HmacKeyedHash {
    fn algorithm(&self) -> &str {
        self.algorithm.uri()
    }

    fn compute(&self, data: &[u8]) -> Result<Vec<u8>> {
        match self.algorithm {
            Algorithm::HmacSha1 => {
                let mut mac = <Hmac<Sha1> as Mac>::new_from_slice(&self.key)
                    .map_err(|e| TokenError::provider(format!("HMAC keying failed: {e}")))?;
                mac.update(data);
                Ok(mac.finalize().into_bytes().to_vec())
            }
            Algorithm::HmacSha256 => {
                let mut mac = <Hmac<Sha256> as Mac>::new_from_slice(&self.key)
                    .map_err(|e| TokenError::provider(format!("HMAC keying failed: {e}")))?;
                mac.update(data);
                Ok(mac.finalize().into_bytes().to_vec())
            }
            _ => Err(TokenError::unsupported_algorithm(self.algorithm.uri())),
        }
    }

    fn verify(&self, data: &[u8], tag: &[u8]) -> Result<bool> {
        match self.algorithm {
            Algorithm::HmacSha1 => {
                let mut mac = <Hmac<Sha1> as Mac>::new_from_slice(&self.key)
                    .map_err(|e| TokenError::provider(format!("HMAC keying failed: {e}")))?;
                mac.update(data);
                Ok(mac.verify_slice(tag).is_ok())
            }
            Algorithm::HmacSha256 => {
                let mut mac = <Hmac<Sha256> as Mac>::new_from_slice(&self.key)
                    .map_err(|e| TokenError::provider(format!("HMAC keying failed: {e}")))?;
                mac.update(data);
                Ok(mac.verify_slice(tag).is_ok())
            }
            _ => Err(TokenError::unsupported_algorithm(self.algorithm.uri())),
        }
    }
}
