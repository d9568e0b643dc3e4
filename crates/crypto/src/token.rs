//! The lease-token envelope.
//!
//! Tokens are `v4.local.<payload>` strings: the versioned header names the
//! construction (symmetric, local-key encryption) so no algorithm
//! confusion is possible, and the payload is a Base64url-encoded
//! XChaCha20-Poly1305 box over the JSON claims with the header bound as
//! associated data. The Authority's symmetric key is long-lived and never
//! leaves it; tokens are minted and validated by the same process.

use crate::aead;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use rand::rngs::OsRng;
use rand::RngCore;
use sigaid_types::error::CryptoError;
use sigaid_types::lease::TokenClaims;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// The versioned header every token starts with.
pub const TOKEN_HEADER: &str = "v4.local.";

/// The Authority's long-lived symmetric token key. Zeroized on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct TokenKey([u8; aead::KEY_LEN]);

impl TokenKey {
    /// Generates a fresh key from the OS CSPRNG.
    pub fn generate() -> Result<Self, CryptoError> {
        let mut key = [0u8; aead::KEY_LEN];
        OsRng
            .try_fill_bytes(&mut key)
            .map_err(|_| CryptoError::Csprng)?;
        Ok(Self(key))
    }

    /// Wraps existing key bytes.
    pub fn from_bytes(bytes: [u8; aead::KEY_LEN]) -> Self {
        Self(bytes)
    }
}

/// Mints a token over `claims` with a fresh random nonce.
pub fn seal_claims(key: &TokenKey, claims: &TokenClaims) -> Result<String, CryptoError> {
    let plaintext = serde_json::to_vec(claims)
        .map_err(|e| CryptoError::InvalidInput(format!("claims serialization: {}", e)))?;

    let mut nonce = [0u8; aead::NONCE_LEN];
    OsRng
        .try_fill_bytes(&mut nonce)
        .map_err(|_| CryptoError::Csprng)?;

    let sealed = aead::seal(&key.0, &nonce, TOKEN_HEADER.as_bytes(), &plaintext)?;

    let mut payload = Vec::with_capacity(aead::NONCE_LEN + sealed.len());
    payload.extend_from_slice(&nonce);
    payload.extend_from_slice(&sealed);

    Ok(format!("{}{}", TOKEN_HEADER, URL_SAFE_NO_PAD.encode(payload)))
}

/// Validates a token and returns its claims. Fails opaquely on a missing
/// or wrong header, malformed payload, or authentication failure.
pub fn open_claims(key: &TokenKey, token: &str) -> Result<TokenClaims, CryptoError> {
    let payload_b64 = token.strip_prefix(TOKEN_HEADER).ok_or(CryptoError::Failure)?;
    let payload = URL_SAFE_NO_PAD
        .decode(payload_b64)
        .map_err(|_| CryptoError::Failure)?;

    if payload.len() < aead::NONCE_LEN + aead::TAG_LEN {
        return Err(CryptoError::Failure);
    }
    let (nonce_bytes, sealed) = payload.split_at(aead::NONCE_LEN);
    let mut nonce = [0u8; aead::NONCE_LEN];
    nonce.copy_from_slice(nonce_bytes);

    let plaintext = aead::open(&key.0, &nonce, TOKEN_HEADER.as_bytes(), sealed)?;
    serde_json::from_slice(&plaintext).map_err(|_| CryptoError::Failure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sigaid_types::AgentId;

    fn claims() -> TokenClaims {
        let signing = ed25519_dalek_key();
        TokenClaims {
            agent_id: AgentId::from_public_key_bytes(signing).unwrap(),
            session_id: "sess-1".into(),
            iat: "2026-01-01T00:00:00Z".into(),
            exp: "2026-01-01T00:05:00Z".into(),
            jti: "tok-1".into(),
            seq: 0,
        }
    }

    fn ed25519_dalek_key() -> [u8; 32] {
        ed25519_dalek::SigningKey::from_bytes(&[9u8; 32])
            .verifying_key()
            .to_bytes()
    }

    #[test]
    fn mint_and_validate() {
        let key = TokenKey::generate().unwrap();
        let token = seal_claims(&key, &claims()).unwrap();
        assert!(token.starts_with("v4.local."));
        let opened = open_claims(&key, &token).unwrap();
        assert_eq!(opened, claims());
    }

    #[test]
    fn fresh_nonce_per_mint() {
        let key = TokenKey::generate().unwrap();
        let a = seal_claims(&key, &claims()).unwrap();
        let b = seal_claims(&key, &claims()).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn wrong_key_rejected() {
        let key = TokenKey::generate().unwrap();
        let other = TokenKey::generate().unwrap();
        let token = seal_claims(&key, &claims()).unwrap();
        assert!(open_claims(&other, &token).is_err());
    }

    #[test]
    fn tampered_payload_rejected() {
        let key = TokenKey::generate().unwrap();
        let token = seal_claims(&key, &claims()).unwrap();
        let mut chars: Vec<char> = token.chars().collect();
        let last = chars.len() - 1;
        chars[last] = if chars[last] == 'A' { 'B' } else { 'A' };
        let tampered: String = chars.into_iter().collect();
        assert!(open_claims(&key, &tampered).is_err());
    }

    #[test]
    fn header_is_mandatory() {
        let key = TokenKey::generate().unwrap();
        let token = seal_claims(&key, &claims()).unwrap();
        let stripped = token.trim_start_matches("v4.local.");
        assert!(open_claims(&key, stripped).is_err());
        assert!(open_claims(&key, &format!("v4.public.{}", stripped)).is_err());
    }
}
