//! Asymmetric key material
//!
//! [`Ed25519AsymmetricKey`] wraps an Ed25519 verifying key and, when the
//! holder controls it, the signing half. The private key is never exposed:
//! signing happens inside the [`SignatureFormatter`] capability object and
//! verification inside the [`SignatureDeformatter`].

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use sha2::{Digest, Sha512};

use sigil_core::algorithm::{self, Algorithm};
use sigil_core::{Result, TokenError};

use crate::key::{
    HashFunction, KeyKind, SecurityKey, SignatureDeformatter, SignatureFormatter,
};

/// An Ed25519 key pair, possibly public-only
#[derive(Clone)]
pub struct Ed25519AsymmetricKey {
    verifying: VerifyingKey,
    signing: Option<SigningKey>,
}

impl Ed25519AsymmetricKey {
    /// Wrap a verifying key; the result cannot sign
    pub fn from_verifying_key(verifying: VerifyingKey) -> Self {
        Self {
            verifying,
            signing: None,
        }
    }

    /// Wrap a signing key; the verifying half is computed from it
    pub fn from_signing_key(signing: SigningKey) -> Self {
        Self {
            verifying: signing.verifying_key(),
            signing: Some(signing),
        }
    }

    /// Decode a 32-byte public key
    ///
    /// # Errors
    ///
    /// Argument faults for a wrong-length buffer or a point that does not
    /// decode.
    pub fn from_public_bytes(bytes: &[u8]) -> Result<Self> {
        let arr: [u8; 32] = bytes.try_into().map_err(|_| {
            TokenError::argument(
                "bytes",
                format!("public key must be 32 bytes, got {}", bytes.len()),
            )
        })?;
        let verifying = VerifyingKey::from_bytes(&arr)
            .map_err(|e| TokenError::argument("bytes", format!("invalid public key: {e}")))?;
        Ok(Self::from_verifying_key(verifying))
    }

    /// Decode a 32-byte private key seed
    pub fn from_private_bytes(bytes: &[u8]) -> Result<Self> {
        let arr: [u8; 32] = bytes.try_into().map_err(|_| {
            TokenError::argument(
                "bytes",
                format!("private key must be 32 bytes, got {}", bytes.len()),
            )
        })?;
        Ok(Self::from_signing_key(SigningKey::from_bytes(&arr)))
    }

    /// Whether the signing half is present
    pub fn has_private_key(&self) -> bool {
        self.signing.is_some()
    }

    /// The public half, encoded
    pub fn public_bytes(&self) -> [u8; 32] {
        self.verifying.to_bytes()
    }

    /// Acquire a signing capability for `algorithm`
    ///
    /// # Errors
    ///
    /// Unsupported-algorithm fault for any URI other than Ed25519; provider
    /// fault when only the public half is held, since no signer can be
    /// constructed from it. Callers gate on
    /// [`Ed25519AsymmetricKey::has_private_key`].
    pub fn signature_formatter(&self, alg_uri: &str) -> Result<Box<dyn SignatureFormatter>> {
        self.check_signature_algorithm(alg_uri)?;
        let signing = self
            .signing
            .clone()
            .ok_or_else(|| TokenError::provider("no private key available to construct a signer"))?;
        Ok(Box::new(Ed25519Formatter { signing }))
    }

    /// Acquire a verification capability for `algorithm`
    pub fn signature_deformatter(&self, alg_uri: &str) -> Result<Box<dyn SignatureDeformatter>> {
        self.check_signature_algorithm(alg_uri)?;
        Ok(Box::new(Ed25519Deformatter {
            verifying: self.verifying,
        }))
    }

    /// Digest capability used with `algorithm` signatures
    pub fn hash_algorithm_for_signature(&self, alg_uri: &str) -> Result<Box<dyn HashFunction>> {
        self.check_signature_algorithm(alg_uri)?;
        Ok(Box::new(Sha512Function))
    }

    fn check_signature_algorithm(&self, alg_uri: &str) -> Result<()> {
        match Algorithm::from_uri(alg_uri) {
            Some(Algorithm::Ed25519) => Ok(()),
            _ => Err(TokenError::unsupported_algorithm(alg_uri)),
        }
    }
}

impl SecurityKey for Ed25519AsymmetricKey {
    fn key_size_bits(&self) -> usize {
        256
    }

    fn kind(&self) -> KeyKind {
        KeyKind::Asymmetric
    }

    fn is_supported_algorithm(&self, algorithm: &str) -> bool {
        matches!(Algorithm::from_uri(algorithm), Some(Algorithm::Ed25519))
    }
}

// Shows a short public-key prefix and whether the private half is present.
impl std::fmt::Debug for Ed25519AsymmetricKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Ed25519AsymmetricKey(public={}.., private={})",
            hex::encode(&self.verifying.to_bytes()[..4]),
            self.signing.is_some()
        )
    }
}

struct Ed25519Formatter {
    signing: SigningKey,
}

impl SignatureFormatter for Ed25519Formatter {
    fn algorithm(&self) -> &str {
        algorithm::ED25519
    }

    fn sign(&self, message: &[u8]) -> Result<Vec<u8>> {
        Ok(self.signing.sign(message).to_bytes().to_vec())
    }
}

struct Ed25519Deformatter {
    verifying: VerifyingKey,
}

impl SignatureDeformatter for Ed25519Deformatter {
    fn algorithm(&self) -> &str {
        algorithm::ED25519
    }

    fn verify(&self, message: &[u8], signature: &[u8]) -> Result<bool> {
        let Ok(sig) = Signature::from_slice(signature) else {
            return Ok(false);
        };
        Ok(self.verifying.verify(message, &sig).is_ok())
    }
}

struct Sha512Function;

impl HashFunction for Sha512Function {
    fn algorithm(&self) -> &str {
        algorithm::SHA512
    }

    fn output_len(&self) -> usize {
        64
    }

    fn digest(&self, data: &[u8]) -> Vec<u8> {
        let mut hasher = Sha512::new();
        hasher.update(data);
        hasher.finalize().to_vec()
    }
}
