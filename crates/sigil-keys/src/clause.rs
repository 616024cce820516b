//! Key identifier clauses
//!
//! A clause names a key without transmitting the key itself: it wraps the
//! hash of some credential (an X.509 certificate, a Kerberos ticket) plus
//! optional derived-key parameters. Clauses are comparison keys, not owners
//! of key material; many clauses may resolve to the same underlying key.
//!
//! The hash is computed once, at construction, by the digest provider.
//! Matching never re-hashes; it only compares the stored identifier against
//! a candidate hash in constant time.

use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};

use sigil_core::{Result, TokenError};

use crate::identifier::BinaryIdentifier;

/// What kind of credential the identifier hash was computed from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClauseKind {
    /// SHA-1 thumbprint of an X.509 certificate (DER encoding)
    X509Thumbprint,
    /// SHA-1 digest of a Kerberos ticket
    KerberosTicketHash,
}

impl ClauseKind {
    fn as_str(&self) -> &'static str {
        match self {
            ClauseKind::X509Thumbprint => "X509Thumbprint",
            ClauseKind::KerberosTicketHash => "KerberosTicketHash",
        }
    }
}

impl std::fmt::Display for ClauseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A hash-based reference to a key, with optional derivation parameters
///
/// Immutable after construction. When `derivation_nonce` is present the
/// clause names a key derived from the referenced one; `derivation_length`
/// is only ever present together with the nonce.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyIdentifierClause {
    kind: ClauseKind,
    identifier: BinaryIdentifier,
    derivation_nonce: Option<BinaryIdentifier>,
    derivation_length: Option<usize>,
}

impl KeyIdentifierClause {
    /// Wrap an externally computed hash
    ///
    /// # Errors
    ///
    /// Returns an argument fault if `hash` is empty.
    pub fn from_hash(kind: ClauseKind, hash: &[u8]) -> Result<Self> {
        if hash.is_empty() {
            return Err(TokenError::argument("hash", "hash must not be empty"));
        }
        Ok(Self {
            kind,
            identifier: BinaryIdentifier::new(hash)?,
            derivation_nonce: None,
            derivation_length: None,
        })
    }

    /// Build a thumbprint clause from a DER-encoded certificate
    ///
    /// Computes the SHA-1 thumbprint the way X.509 tooling renders it.
    pub fn x509_thumbprint(cert_der: &[u8]) -> Result<Self> {
        if cert_der.is_empty() {
            return Err(TokenError::argument(
                "cert_der",
                "certificate must not be empty",
            ));
        }
        Self::from_hash(ClauseKind::X509Thumbprint, &sha1_digest(cert_der))
    }

    /// Build a ticket-hash clause from a raw Kerberos ticket
    pub fn kerberos_ticket_hash(ticket: &[u8]) -> Result<Self> {
        if ticket.is_empty() {
            return Err(TokenError::argument("ticket", "ticket must not be empty"));
        }
        Self::from_hash(ClauseKind::KerberosTicketHash, &sha1_digest(ticket))
    }

    /// Attach derived-key parameters to this clause
    ///
    /// # Errors
    ///
    /// Returns an argument fault if `nonce` is empty or `length` is zero;
    /// a derivation length is meaningless without its nonce.
    pub fn with_derivation(mut self, nonce: &[u8], length: usize) -> Result<Self> {
        if nonce.is_empty() {
            return Err(TokenError::argument("nonce", "nonce must not be empty"));
        }
        if length == 0 {
            return Err(TokenError::argument("length", "length must be non-zero"));
        }
        self.derivation_nonce = Some(BinaryIdentifier::new(nonce)?);
        self.derivation_length = Some(length);
        Ok(self)
    }

    /// Does `candidate_hash` name the same credential as this clause?
    ///
    /// Constant-time byte equality against the stored identifier.
    pub fn matches(&self, candidate_hash: &[u8]) -> bool {
        self.identifier.matches(candidate_hash)
    }

    /// Credential kind the hash was computed from
    pub fn kind(&self) -> ClauseKind {
        self.kind
    }

    /// The stored identifier hash
    pub fn identifier(&self) -> &BinaryIdentifier {
        &self.identifier
    }

    /// Derivation nonce, when this clause names a derived key
    pub fn derivation_nonce(&self) -> Option<&BinaryIdentifier> {
        self.derivation_nonce.as_ref()
    }

    /// Derived-key length in bits, present only alongside the nonce
    pub fn derivation_length(&self) -> Option<usize> {
        self.derivation_length
    }
}

impl PartialEq for KeyIdentifierClause {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.identifier == other.identifier
            && self.derivation_nonce == other.derivation_nonce
            && self.derivation_length == other.derivation_length
    }
}

impl Eq for KeyIdentifierClause {}

// Renders the identifier hash only; safe for diagnostic logs.
impl std::fmt::Display for KeyIdentifierClause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.kind, self.identifier)
    }
}

fn sha1_digest(data: &[u8]) -> [u8; 20] {
    let mut hasher = Sha1::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut output = [0u8; 20];
    output.copy_from_slice(&result);
    output
}
