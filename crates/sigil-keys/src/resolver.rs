//! Resolving identifier clauses to keys
//!
//! Key resolution proper lives outside this layer (certificate stores,
//! configuration); [`KeyResolver`] is the seam it plugs into. [`KeySet`] is
//! the in-memory implementation used by the issuance pipeline and tests.

use std::sync::Arc;

use tracing::debug;

use sigil_core::{Result, TokenError, ValidationKind};

use crate::clause::KeyIdentifierClause;
use crate::key::SecurityKey;

/// Maps an identifier clause to the key it names
pub trait KeyResolver: Send + Sync {
    /// Resolve `clause` to a key
    ///
    /// # Errors
    ///
    /// A malformed-token validation fault when no key matches; the fault
    /// carries only the clause's safe rendering.
    fn resolve(&self, clause: &KeyIdentifierClause) -> Result<Arc<dyn SecurityKey>>;
}

/// An immutable set of (clause, key) pairs resolved by hash matching
pub struct KeySet {
    entries: Vec<(KeyIdentifierClause, Arc<dyn SecurityKey>)>,
}

impl KeySet {
    /// Build a set from its entries; no mutation afterward
    pub fn new(entries: Vec<(KeyIdentifierClause, Arc<dyn SecurityKey>)>) -> Self {
        Self { entries }
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyResolver for KeySet {
    fn resolve(&self, clause: &KeyIdentifierClause) -> Result<Arc<dyn SecurityKey>> {
        for (candidate, key) in &self.entries {
            if candidate.matches(clause.identifier().as_bytes()) {
                debug!(clause = %clause, key = ?key, "resolved key identifier clause");
                return Ok(Arc::clone(key));
            }
        }
        debug!(clause = %clause, "no key for identifier clause");
        Err(TokenError::validation(
            ValidationKind::Malformed,
            format!("unresolved-key-reference:{}", clause.identifier().to_hex()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use sigil_core::algorithm;

    use crate::clause::ClauseKind;
    use crate::symmetric::InMemorySymmetricKey;

    fn clause(byte: u8) -> KeyIdentifierClause {
        KeyIdentifierClause::from_hash(ClauseKind::X509Thumbprint, &[byte; 20]).unwrap()
    }

    #[test]
    fn test_resolves_matching_clause() {
        let key: Arc<dyn SecurityKey> =
            Arc::new(InMemorySymmetricKey::new(&[1u8; 32]).unwrap());
        let set = KeySet::new(vec![(clause(0xAA), key)]);

        let resolved = set.resolve(&clause(0xAA)).unwrap();
        assert!(resolved.is_supported_algorithm(algorithm::AES256_GCM));
    }

    #[test]
    fn test_unresolved_clause_is_a_validation_fault() {
        let set = KeySet::new(vec![]);
        let err = set.resolve(&clause(0xBB)).unwrap_err();
        assert_matches!(
            err,
            TokenError::Validation { kind: ValidationKind::Malformed, ref code }
                if code.contains(&"bb".repeat(20))
        );
    }
}
