//! XChaCha20-Poly1305 sealing and opening.
//!
//! The 24-byte extended nonce lets callers use fresh random nonces without
//! bookkeeping. Opening failures are opaque: a wrong key, a wrong nonce,
//! tampered ciphertext, and tampered associated data are indistinguishable
//! to the caller.

use chacha20poly1305::aead::{Aead, KeyInit, Payload};
use chacha20poly1305::{Key, XChaCha20Poly1305, XNonce};
use sigaid_types::error::CryptoError;

/// Length in bytes of an XChaCha20-Poly1305 nonce.
pub const NONCE_LEN: usize = 24;
/// Length in bytes of the Poly1305 authentication tag.
pub const TAG_LEN: usize = 16;
/// Length in bytes of the symmetric key.
pub const KEY_LEN: usize = 32;

/// Seals `plaintext` under `key` and `nonce`, binding `aad`.
pub fn seal(
    key: &[u8; KEY_LEN],
    nonce: &[u8; NONCE_LEN],
    aad: &[u8],
    plaintext: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    let cipher = XChaCha20Poly1305::new(Key::from_slice(key));
    cipher
        .encrypt(
            XNonce::from_slice(nonce),
            Payload {
                msg: plaintext,
                aad,
            },
        )
        .map_err(|_| CryptoError::Failure)
}

/// Opens a sealed box. Fails opaquely on any mismatch.
pub fn open(
    key: &[u8; KEY_LEN],
    nonce: &[u8; NONCE_LEN],
    aad: &[u8],
    ciphertext: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    let cipher = XChaCha20Poly1305::new(Key::from_slice(key));
    cipher
        .decrypt(
            XNonce::from_slice(nonce),
            Payload {
                msg: ciphertext,
                aad,
            },
        )
        .map_err(|_| CryptoError::Failure)
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: [u8; KEY_LEN] = [0x11; KEY_LEN];
    const NONCE: [u8; NONCE_LEN] = [0x22; NONCE_LEN];

    #[test]
    fn roundtrip() {
        let sealed = seal(&KEY, &NONCE, b"aad", b"secret").unwrap();
        assert_eq!(sealed.len(), 6 + TAG_LEN);
        let opened = open(&KEY, &NONCE, b"aad", &sealed).unwrap();
        assert_eq!(opened, b"secret");
    }

    #[test]
    fn any_bit_flip_fails() {
        let sealed = seal(&KEY, &NONCE, b"aad", b"secret").unwrap();
        for i in 0..sealed.len() {
            let mut tampered = sealed.clone();
            tampered[i] ^= 0x01;
            assert!(open(&KEY, &NONCE, b"aad", &tampered).is_err());
        }
    }

    #[test]
    fn aad_is_bound() {
        let sealed = seal(&KEY, &NONCE, b"aad", b"secret").unwrap();
        assert!(open(&KEY, &NONCE, b"other", &sealed).is_err());
    }

    #[test]
    fn wrong_key_fails() {
        let sealed = seal(&KEY, &NONCE, b"aad", b"secret").unwrap();
        let wrong = [0x12u8; KEY_LEN];
        assert!(open(&wrong, &NONCE, b"aad", &sealed).is_err());
    }
}
