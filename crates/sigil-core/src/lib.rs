//! Sigil Core: shared fault taxonomy and algorithm registry
//!
//! This crate holds the two pieces every other layer of the token system
//! depends on: the closed [`TokenError`] taxonomy raised by key handling and
//! proof construction, and the algorithm-URI registry used to dispatch
//! cryptographic operations by identifier.
//!
//! ## Core Components
//!
//! - **Fault taxonomy**: argument faults, unsupported-algorithm faults,
//!   token-validation faults, and provider-fault passthrough
//! - **Algorithm registry**: exact-match URI dispatch with symmetric /
//!   asymmetric classification
//! - **AlgorithmSuite**: constructor-validated, immutable set of algorithm
//!   URIs for negotiation

pub mod algorithm;
pub mod error;

pub use algorithm::{Algorithm, AlgorithmClass, AlgorithmSuite};
pub use error::{Result, TokenError, ValidationKind};
