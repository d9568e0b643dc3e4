//! BLAKE3 hashing and HKDF-SHA256 derivation.

use hkdf::Hkdf;
use sha2::Sha256;
use sigaid_types::error::CryptoError;

/// BLAKE3 over the concatenation of `parts`.
///
/// Concatenation is unambiguous because every caller hashes a fixed-layout
/// structure whose variable fields are length-prefixed upstream.
pub fn hash(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new();
    for part in parts {
        hasher.update(part);
    }
    *hasher.finalize().as_bytes()
}

/// BLAKE3 of a single buffer. The usual entry point for payload hashing.
pub fn hash_payload(data: &[u8]) -> [u8; 32] {
    *blake3::hash(data).as_bytes()
}

/// HKDF-SHA256 key derivation.
pub fn hkdf_sha256(
    ikm: &[u8],
    salt: &[u8],
    info: &[u8],
    length: usize,
) -> Result<Vec<u8>, CryptoError> {
    let hk = Hkdf::<Sha256>::new(Some(salt), ikm);
    let mut okm = vec![0u8; length];
    hk.expand(info, &mut okm)
        .map_err(|_| CryptoError::InvalidInput("HKDF output length too large".into()))?;
    Ok(okm)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concatenation_equals_single_buffer() {
        assert_eq!(hash(&[b"ab", b"cd"]), hash_payload(b"abcd"));
    }

    #[test]
    fn hkdf_output_length() {
        let okm = hkdf_sha256(b"ikm", b"salt", b"info", 42).unwrap();
        assert_eq!(okm.len(), 42);
    }

    #[test]
    fn hkdf_is_deterministic() {
        let a = hkdf_sha256(b"ikm", b"salt", b"info", 32).unwrap();
        let b = hkdf_sha256(b"ikm", b"salt", b"info", 32).unwrap();
        assert_eq!(a, b);
        let c = hkdf_sha256(b"ikm", b"salt", b"other", 32).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn hkdf_rejects_absurd_length() {
        // SHA-256 HKDF caps output at 255 * 32 bytes.
        assert!(hkdf_sha256(b"ikm", b"salt", b"info", 256 * 32).is_err());
    }
}
