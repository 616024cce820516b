//! The proof surface of a token-issuance response
//!
//! This is the slice of the issuance response this layer owns: the proof
//! token and the reference naming the proof key. The full response wire
//! format (WS-Trust RSTR XML) is produced by a serializer outside this
//! layer, which reads these fields.

use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use sigil_keys::KeyIdentifierClause;

/// Proof-of-possession material carried in a response
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub enum ProofToken {
    /// The proof key itself, for exchanges where the issuer supplies it
    /// whole. Zeroized on drop.
    Secret(#[serde(with = "serde_bytes")] Vec<u8>),
    /// A computed-key recipe: the requester combines its own entropy with
    /// `issuer_entropy` under `algorithm` to derive the proof key.
    ComputedKey {
        /// Key-derivation algorithm URI
        algorithm: String,
        /// The issuer's entropy contribution. Zeroized on drop.
        #[serde(with = "serde_bytes")]
        issuer_entropy: Vec<u8>,
    },
}

impl ProofToken {
    /// Length in bytes of the sensitive payload
    pub fn material_len(&self) -> usize {
        match self {
            ProofToken::Secret(bytes) => bytes.len(),
            ProofToken::ComputedKey { issuer_entropy, .. } => issuer_entropy.len(),
        }
    }
}

impl Drop for ProofToken {
    fn drop(&mut self) {
        match self {
            ProofToken::Secret(bytes) => bytes.zeroize(),
            ProofToken::ComputedKey { issuer_entropy, .. } => issuer_entropy.zeroize(),
        }
    }
}

// Never render the payload bytes.
impl std::fmt::Debug for ProofToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProofToken::Secret(bytes) => write!(f, "ProofToken::Secret({} bytes)", bytes.len()),
            ProofToken::ComputedKey {
                algorithm,
                issuer_entropy,
            } => write!(
                f,
                "ProofToken::ComputedKey({algorithm}, {} entropy bytes)",
                issuer_entropy.len()
            ),
        }
    }
}

/// The issuance response as seen by the proof layer
///
/// A response starts with no proof section; applying a proof descriptor
/// writes it, and re-applying replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IssueResponse {
    context: Option<String>,
    proof: Option<ProofToken>,
    attached_reference: Option<KeyIdentifierClause>,
}

impl IssueResponse {
    /// A response with no proof section
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the request-correlation context
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Request-correlation context, if any
    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    /// The proof token, once a descriptor has been applied
    pub fn proof(&self) -> Option<&ProofToken> {
        self.proof.as_ref()
    }

    /// The clause naming the proof key, once a descriptor has been applied
    pub fn attached_reference(&self) -> Option<&KeyIdentifierClause> {
        self.attached_reference.as_ref()
    }

    /// Replace the proof section wholesale
    pub(crate) fn set_proof_section(
        &mut self,
        proof: Option<ProofToken>,
        reference: KeyIdentifierClause,
    ) {
        self.proof = proof;
        self.attached_reference = Some(reference);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sigil_keys::ClauseKind;

    #[test]
    fn test_new_response_has_no_proof_section() {
        let response = IssueResponse::new().with_context("uuid:1234");
        assert_eq!(response.context(), Some("uuid:1234"));
        assert!(response.proof().is_none());
        assert!(response.attached_reference().is_none());
    }

    #[test]
    fn test_debug_never_shows_proof_bytes() {
        let token = ProofToken::Secret(vec![0xAB; 32]);
        let rendered = format!("{token:?}");
        assert_eq!(rendered, "ProofToken::Secret(32 bytes)");
        assert!(!rendered.contains("ab"));
    }

    #[test]
    fn test_set_proof_section_replaces() {
        let clause =
            KeyIdentifierClause::from_hash(ClauseKind::X509Thumbprint, &[1u8; 20]).unwrap();
        let mut response = IssueResponse::new();
        response.set_proof_section(Some(ProofToken::Secret(vec![1, 2, 3])), clause.clone());
        response.set_proof_section(None, clause);
        assert!(response.proof().is_none());
        assert!(response.attached_reference().is_some());
    }
}
