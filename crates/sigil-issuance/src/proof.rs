//! Proof descriptors
//!
//! A proof descriptor binds the key being provisioned to the response that
//! provisions it. Applying a descriptor validates everything first and then
//! writes the proof section in one step, so a failed application leaves the
//! response untouched. Re-applying replaces the previous section; the final
//! state after two applications equals the state after one.

use tracing::debug;
use zeroize::Zeroizing;

use sigil_core::algorithm;
use sigil_core::{Result, TokenError};
use sigil_keys::{Ed25519AsymmetricKey, InMemorySymmetricKey, KeyIdentifierClause};

use crate::response::{IssueResponse, ProofToken};

/// Produces the proof-of-possession section of an issuance response
pub trait ProofDescriptor: Send + Sync {
    /// The clause that names the proof key inside the response
    ///
    /// Pure query; the requester uses this to correlate the proof with the
    /// key it contributed entropy to.
    fn key_identifier(&self) -> &KeyIdentifierClause;

    /// Write the proof section of `response`
    ///
    /// Idempotent by replacement: a second application overwrites the first.
    /// On error the response is left exactly as it was.
    fn apply_to(&self, response: &mut IssueResponse) -> Result<()>;
}

/// Proof for a symmetric provisioned key
///
/// Two modes. With an issuer-supplied key the proof token carries the
/// secret itself. With combined entropy the proof token carries a
/// computed-key recipe, and the proof key is derived here with the same
/// P_SHA1 parameters the requester will use, so both sides agree by
/// construction.
pub struct SymmetricProofDescriptor {
    key: InMemorySymmetricKey,
    clause: KeyIdentifierClause,
    computed: Option<ComputedKeyRecipe>,
}

struct ComputedKeyRecipe {
    algorithm: String,
    issuer_entropy: Zeroizing<Vec<u8>>,
}

impl SymmetricProofDescriptor {
    /// Protect an issuer-supplied key named by `clause`
    pub fn from_key(key: InMemorySymmetricKey, clause: KeyIdentifierClause) -> Self {
        Self {
            key,
            clause,
            computed: None,
        }
    }

    /// Combine requester and issuer entropy into the proof key
    ///
    /// The proof key is `P_SHA1(requester_entropy, issuer_entropy)` at
    /// `key_size_bits`; the response carries the issuer entropy so the
    /// requester can run the same derivation.
    ///
    /// # Errors
    ///
    /// Argument faults for empty entropy or a zero / non-byte-aligned key
    /// size.
    pub fn from_combined_entropy(
        requester_entropy: &[u8],
        issuer_entropy: &[u8],
        key_size_bits: usize,
        clause: KeyIdentifierClause,
    ) -> Result<Self> {
        if requester_entropy.is_empty() {
            return Err(TokenError::argument(
                "requester_entropy",
                "entropy must not be empty",
            ));
        }
        if issuer_entropy.is_empty() {
            return Err(TokenError::argument(
                "issuer_entropy",
                "entropy must not be empty",
            ));
        }
        let base = InMemorySymmetricKey::new(requester_entropy)?;
        let derived =
            base.generate_derived_key(algorithm::P_SHA1, b"", issuer_entropy, key_size_bits, 0)?;
        Ok(Self {
            key: InMemorySymmetricKey::from_owned(derived)?,
            clause,
            computed: Some(ComputedKeyRecipe {
                algorithm: algorithm::P_SHA1.to_string(),
                issuer_entropy: Zeroizing::new(issuer_entropy.to_vec()),
            }),
        })
    }

    /// The proof key this descriptor protects
    ///
    /// The issuer uses it to bind the issued token; in combined-entropy
    /// mode it equals what the requester derives from the response.
    pub fn proof_key(&self) -> &InMemorySymmetricKey {
        &self.key
    }
}

impl ProofDescriptor for SymmetricProofDescriptor {
    fn key_identifier(&self) -> &KeyIdentifierClause {
        &self.clause
    }

    fn apply_to(&self, response: &mut IssueResponse) -> Result<()> {
        let token = match &self.computed {
            Some(recipe) => ProofToken::ComputedKey {
                algorithm: recipe.algorithm.clone(),
                issuer_entropy: recipe.issuer_entropy.to_vec(),
            },
            None => ProofToken::Secret(self.key.symmetric_key()),
        };
        debug!(clause = %self.clause, computed = self.computed.is_some(), "applying symmetric proof");
        response.set_proof_section(Some(token), self.clause.clone());
        Ok(())
    }
}

/// Proof for an asymmetric key the requester already holds
///
/// No proof token is written: possession is proven with the requester's own
/// private key. The response only carries the reference naming that key.
pub struct AsymmetricProofDescriptor {
    key: Ed25519AsymmetricKey,
    clause: KeyIdentifierClause,
}

impl AsymmetricProofDescriptor {
    /// Name the requester's public key by `clause`
    pub fn new(key: Ed25519AsymmetricKey, clause: KeyIdentifierClause) -> Self {
        Self { key, clause }
    }

    /// The requester's public key
    pub fn public_key(&self) -> &Ed25519AsymmetricKey {
        &self.key
    }
}

impl ProofDescriptor for AsymmetricProofDescriptor {
    fn key_identifier(&self) -> &KeyIdentifierClause {
        &self.clause
    }

    fn apply_to(&self, response: &mut IssueResponse) -> Result<()> {
        debug!(clause = %self.clause, "applying asymmetric proof reference");
        response.set_proof_section(None, self.clause.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use sigil_keys::{ClauseKind, DerivationLimits, p_sha1};

    fn clause(byte: u8) -> KeyIdentifierClause {
        KeyIdentifierClause::from_hash(ClauseKind::X509Thumbprint, &[byte; 20]).unwrap()
    }

    #[test]
    fn test_issuer_key_mode_writes_the_secret() {
        let key = InMemorySymmetricKey::new(&[0x11u8; 32]).unwrap();
        let descriptor = SymmetricProofDescriptor::from_key(key, clause(0xAA));
        let mut response = IssueResponse::new();
        descriptor.apply_to(&mut response).unwrap();

        assert_matches!(
            response.proof(),
            Some(ProofToken::Secret(bytes)) if bytes == &[0x11u8; 32]
        );
        assert!(response
            .attached_reference()
            .unwrap()
            .matches(&[0xAAu8; 20]));
    }

    #[test]
    fn test_apply_twice_equals_apply_once() {
        let key = InMemorySymmetricKey::new(&[0x22u8; 32]).unwrap();
        let descriptor = SymmetricProofDescriptor::from_key(key, clause(0xBB));

        let mut once = IssueResponse::new();
        descriptor.apply_to(&mut once).unwrap();

        let mut twice = IssueResponse::new();
        descriptor.apply_to(&mut twice).unwrap();
        descriptor.apply_to(&mut twice).unwrap();

        assert_eq!(once, twice);
    }

    #[test]
    fn test_reapplying_replaces_the_previous_section() {
        let first = SymmetricProofDescriptor::from_key(
            InMemorySymmetricKey::new(&[0x01u8; 32]).unwrap(),
            clause(0x01),
        );
        let second = SymmetricProofDescriptor::from_key(
            InMemorySymmetricKey::new(&[0x02u8; 32]).unwrap(),
            clause(0x02),
        );

        let mut response = IssueResponse::new();
        first.apply_to(&mut response).unwrap();
        second.apply_to(&mut response).unwrap();

        let mut fresh = IssueResponse::new();
        second.apply_to(&mut fresh).unwrap();
        assert_eq!(response, fresh);
    }

    #[test]
    fn test_combined_entropy_agrees_with_requester_derivation() {
        let requester_entropy = [0x5Au8; 32];
        let issuer_entropy = [0xC3u8; 32];
        let descriptor = SymmetricProofDescriptor::from_combined_entropy(
            &requester_entropy,
            &issuer_entropy,
            256,
            clause(0xCC),
        )
        .unwrap();

        let mut response = IssueResponse::new();
        descriptor.apply_to(&mut response).unwrap();

        // The requester reads the recipe out of the response and derives
        // independently.
        let (algorithm_uri, entropy_from_response) = match response.proof() {
            Some(ProofToken::ComputedKey {
                algorithm,
                issuer_entropy,
            }) => (algorithm.clone(), issuer_entropy.clone()),
            other => panic!("expected computed-key proof, got {other:?}"),
        };
        assert_eq!(algorithm_uri, algorithm::P_SHA1);

        let requester_side = p_sha1(
            &requester_entropy,
            b"",
            &entropy_from_response,
            0,
            32,
            &DerivationLimits::default(),
        )
        .unwrap();
        assert_eq!(requester_side, descriptor.proof_key().symmetric_key());
    }

    #[test]
    fn test_combined_entropy_validates_inputs() {
        assert_matches!(
            SymmetricProofDescriptor::from_combined_entropy(&[], &[1u8; 16], 256, clause(0))
                .unwrap_err(),
            TokenError::Argument { ref parameter, .. } if parameter == "requester_entropy"
        );
        assert_matches!(
            SymmetricProofDescriptor::from_combined_entropy(&[1u8; 16], &[1u8; 16], 100, clause(0))
                .unwrap_err(),
            TokenError::Argument { ref parameter, .. } if parameter == "length_bits"
        );
    }

    #[test]
    fn test_asymmetric_proof_writes_reference_only() {
        let key = Ed25519AsymmetricKey::from_private_bytes(&[0x09u8; 32]).unwrap();
        let public = Ed25519AsymmetricKey::from_public_bytes(&key.public_bytes()).unwrap();
        let descriptor = AsymmetricProofDescriptor::new(public, clause(0xDD));

        let mut response = IssueResponse::new().with_context("uuid:ctx");
        descriptor.apply_to(&mut response).unwrap();

        assert!(response.proof().is_none());
        assert!(response
            .attached_reference()
            .unwrap()
            .matches(&[0xDDu8; 20]));
        // Context written before application survives it.
        assert_eq!(response.context(), Some("uuid:ctx"));
    }

    #[test]
    fn test_key_identifier_is_a_pure_query() {
        let descriptor = SymmetricProofDescriptor::from_key(
            InMemorySymmetricKey::new(&[0x33u8; 16]).unwrap(),
            clause(0xEE),
        );
        let before = descriptor.key_identifier().clone();
        let mut response = IssueResponse::new();
        descriptor.apply_to(&mut response).unwrap();
        assert_eq!(descriptor.key_identifier(), &before);
    }
}
