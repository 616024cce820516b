//! P_SHA1 key derivation
//!
//! The pseudo-random function behind derived keys, as profiled by
//! WS-SecureConversation: HMAC-SHA1 chained over `label || nonce`, with the
//! output stream addressed by byte offset and length. The function is pure
//! and deterministic, which is what lets two parties derive the same key
//! independently from exchanged entropy.

use hmac::{Hmac, Mac};
use sha1::Sha1;
use zeroize::Zeroizing;

use sigil_core::{Result, TokenError};

type HmacSha1 = Hmac<Sha1>;

const PRF_BLOCK_LEN: usize = 20;

/// Bounds on derivation inputs and outputs
///
/// Inbound derivation parameters come from the peer, so both the seed and
/// the requested output window are capped. The defaults are generous for
/// every profile this layer serves.
#[derive(Debug, Clone)]
pub struct DerivationLimits {
    /// Maximum combined `label || nonce` length in bytes
    pub max_seed_len: usize,
    /// Maximum `offset + length` of the requested output window in bytes
    pub max_output_len: usize,
}

impl Default for DerivationLimits {
    fn default() -> Self {
        Self {
            max_seed_len: 1024,
            max_output_len: 512,
        }
    }
}

/// Derive `length` bytes at `offset` of the P_SHA1 output stream
///
/// `secret` is the base key, `label` and `nonce` form the seed. The label
/// may be empty (computed-key exchanges seed with entropy alone); the nonce
/// may not.
///
/// # Errors
///
/// Argument faults for an empty secret or nonce, a zero length, or inputs
/// exceeding `limits`. Provider faults from the MAC layer are passed
/// through.
pub fn p_sha1(
    secret: &[u8],
    label: &[u8],
    nonce: &[u8],
    offset: usize,
    length: usize,
    limits: &DerivationLimits,
) -> Result<Vec<u8>> {
    if secret.is_empty() {
        return Err(TokenError::argument("secret", "secret must not be empty"));
    }
    if nonce.is_empty() {
        return Err(TokenError::argument("nonce", "nonce must not be empty"));
    }
    if length == 0 {
        return Err(TokenError::argument("length", "length must be non-zero"));
    }
    if label.len() + nonce.len() > limits.max_seed_len {
        return Err(TokenError::argument(
            "nonce",
            format!("label and nonce exceed {} seed bytes", limits.max_seed_len),
        ));
    }
    let end = offset
        .checked_add(length)
        .ok_or_else(|| TokenError::argument("offset", "offset + length overflows"))?;
    if end > limits.max_output_len {
        return Err(TokenError::argument(
            "length",
            format!("output window exceeds {} bytes", limits.max_output_len),
        ));
    }

    let mut seed = Zeroizing::new(Vec::with_capacity(label.len() + nonce.len()));
    seed.extend_from_slice(label);
    seed.extend_from_slice(nonce);

    // A(1) = HMAC(secret, seed); A(i) = HMAC(secret, A(i-1))
    // block(i) = HMAC(secret, A(i) || seed)
    let mut a = Zeroizing::new(hmac_sha1(secret, &seed)?);
    let mut stream = Zeroizing::new(Vec::with_capacity(end + PRF_BLOCK_LEN));
    while stream.len() < end {
        let mut block_input = Zeroizing::new(Vec::with_capacity(PRF_BLOCK_LEN + seed.len()));
        block_input.extend_from_slice(&*a);
        block_input.extend_from_slice(&seed);
        stream.extend_from_slice(&hmac_sha1(secret, &block_input)?);
        *a = hmac_sha1(secret, &*a)?;
    }

    Ok(stream[offset..end].to_vec())
}

fn hmac_sha1(key: &[u8], data: &[u8]) -> Result<[u8; PRF_BLOCK_LEN]> {
    let mut mac = <HmacSha1 as Mac>::new_from_slice(key)
        .map_err(|e| TokenError::provider(format!("HMAC-SHA1 keying failed: {e}")))?;
    mac.update(data);
    let result = mac.finalize().into_bytes();
    let mut output = [0u8; PRF_BLOCK_LEN];
    output.copy_from_slice(&result);
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn limits() -> DerivationLimits {
        DerivationLimits::default()
    }

    #[test]
    fn test_same_inputs_same_output() {
        let a = p_sha1(b"secret", b"label", b"nonce", 0, 32, &limits()).unwrap();
        let b = p_sha1(b"secret", b"label", b"nonce", 0, 32, &limits()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 32);
    }

    #[test]
    fn test_offset_addresses_the_same_stream() {
        let full = p_sha1(b"secret", b"label", b"nonce", 0, 64, &limits()).unwrap();
        let tail = p_sha1(b"secret", b"label", b"nonce", 48, 16, &limits()).unwrap();
        assert_eq!(tail, full[48..64]);
    }

    #[test]
    fn test_different_labels_diverge() {
        let a = p_sha1(b"secret", b"label-a", b"nonce", 0, 32, &limits()).unwrap();
        let b = p_sha1(b"secret", b"label-b", b"nonce", 0, 32, &limits()).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_empty_label_is_allowed() {
        let out = p_sha1(b"secret", b"", b"entropy", 0, 32, &limits()).unwrap();
        assert_eq!(out.len(), 32);
    }

    #[test]
    fn test_empty_secret_and_nonce_fault() {
        assert_matches!(
            p_sha1(b"", b"l", b"n", 0, 16, &limits()).unwrap_err(),
            TokenError::Argument { ref parameter, .. } if parameter == "secret"
        );
        assert_matches!(
            p_sha1(b"s", b"l", b"", 0, 16, &limits()).unwrap_err(),
            TokenError::Argument { ref parameter, .. } if parameter == "nonce"
        );
    }

    #[test]
    fn test_output_window_cap() {
        let tight = DerivationLimits {
            max_seed_len: 1024,
            max_output_len: 64,
        };
        assert!(p_sha1(b"s", b"l", b"n", 0, 64, &tight).is_ok());
        assert_matches!(
            p_sha1(b"s", b"l", b"n", 32, 33, &tight).unwrap_err(),
            TokenError::Argument { ref parameter, .. } if parameter == "length"
        );
    }

    #[test]
    fn test_seed_cap() {
        let tight = DerivationLimits {
            max_seed_len: 8,
            max_output_len: 512,
        };
        let err = p_sha1(b"s", b"12345", b"45678", 0, 16, &tight).unwrap_err();
        assert_matches!(err, TokenError::Argument { .. });
    }
}
