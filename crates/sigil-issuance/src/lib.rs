//! Sigil Issuance: proof of possession for issued tokens
//!
//! When the token service issues a token, the requester needs evidence it
//! can prove possession of the associated key. A [`ProofDescriptor`]
//! consumes the key being provisioned and writes the proof section of the
//! outgoing [`IssueResponse`]: either the proof key itself, a computed-key
//! recipe both parties can derive from exchanged entropy, or, for
//! asymmetric keys, just the reference naming the requester's own key.
//!
//! The descriptor also exposes the [`KeyIdentifierClause`] embedded in the
//! response so the requester can correlate the proof with the key it
//! contributed entropy to.
//!
//! [`KeyIdentifierClause`]: sigil_keys::KeyIdentifierClause

pub mod proof;
pub mod response;

pub use proof::{AsymmetricProofDescriptor, ProofDescriptor, SymmetricProofDescriptor};
pub use response::{IssueResponse, ProofToken};

pub use sigil_core::{Result, TokenError};
