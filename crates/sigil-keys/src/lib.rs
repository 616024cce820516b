//! Sigil Keys: key material and key identification
//!
//! The key-abstraction layer of the token system. A [`SecurityKey`] is a
//! capability object for a single cryptographic key: callers query whether an
//! algorithm URI is supported and obtain narrow capability objects (cipher
//! transforms, keyed hashes, signers, verifiers) without ever seeing the
//! concrete key type or its raw material. Keys are correlated across token
//! exchanges by [`KeyIdentifierClause`], an opaque hash reference matched
//! byte-for-byte in constant time.
//!
//! ## Core Components
//!
//! - [`BinaryIdentifier`]: immutable byte buffer with constant-time equality
//!   and lossless hex/base64 rendering
//! - [`KeyIdentifierClause`]: hash-based key reference with optional
//!   derived-key parameters
//! - [`SecurityKey`] and its capability traits, with the
//!   [`InMemorySymmetricKey`], [`Ed25519AsymmetricKey`], and [`BearerKey`]
//!   variants
//! - [`derive`]: the P_SHA1 pseudo-random function behind derived keys
//! - [`KeyResolver`]: the seam through which clauses resolve to keys
//!
//! All types are immutable after construction; concurrent read-only use
//! across threads is safe and every operation is synchronous.

pub mod asymmetric;
pub mod clause;
pub mod derive;
pub mod identifier;
pub mod key;
pub mod resolver;
pub mod symmetric;

pub use asymmetric::Ed25519AsymmetricKey;
pub use clause::{ClauseKind, KeyIdentifierClause};
pub use derive::{p_sha1, DerivationLimits};
pub use identifier::BinaryIdentifier;
pub use key::{
    BearerKey, CipherTransform, HashFunction, KeyKind, KeyedHashFunction, SecurityKey,
    SignatureDeformatter, SignatureFormatter,
};
pub use resolver::{KeyResolver, KeySet};
pub use symmetric::InMemorySymmetricKey;

// Error types come from the shared core crate.
pub use sigil_core::{Result, TokenError};
