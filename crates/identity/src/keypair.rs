//! The agent's Ed25519 identity keypair.
//!
//! A `KeyPair` owns the 32-byte seed and the derived public key. Seeds are
//! zeroized on drop by the underlying signing key and are never logged.

use ed25519_dalek::{SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use rand::RngCore;
use sigaid_crypto::key_store::{self, KdfParams};
use sigaid_crypto::sign::Domain;
use sigaid_types::error::{CryptoError, IdentityError};
use sigaid_types::AgentId;
use std::path::Path;
use zeroize::Zeroize;

/// An agent's identity keypair.
pub struct KeyPair {
    signing: SigningKey,
}

impl KeyPair {
    /// Generates a fresh keypair from the OS CSPRNG. Fails only when the
    /// CSPRNG itself fails.
    pub fn generate() -> Result<Self, CryptoError> {
        let mut seed = [0u8; 32];
        OsRng
            .try_fill_bytes(&mut seed)
            .map_err(|_| CryptoError::Csprng)?;
        let pair = Self::from_seed(seed);
        seed.zeroize();
        Ok(pair)
    }

    /// Derives a keypair deterministically from a 32-byte seed.
    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self {
            signing: SigningKey::from_bytes(&seed),
        }
    }

    /// The derived public key.
    pub fn public_key(&self) -> VerifyingKey {
        self.signing.verifying_key()
    }

    /// The printable identity of this keypair.
    ///
    /// The public key is a valid point by construction, so this cannot
    /// fail for a live keypair.
    pub fn agent_id(&self) -> Result<AgentId, IdentityError> {
        AgentId::from_public_key_bytes(self.public_key().to_bytes())
    }

    /// Signs `message` under the given domain.
    pub fn sign(&self, domain: Domain, message: &[u8]) -> [u8; 64] {
        sigaid_crypto::sign::sign(&self.signing, domain, message)
    }

    /// Writes the seed to `path` inside a freshly-salted, freshly-nonced
    /// encrypted container. An existing file is replaced atomically via
    /// write-to-temp-and-rename.
    pub fn to_keyfile(
        &self,
        path: &Path,
        password: &str,
        params: KdfParams,
    ) -> Result<(), IdentityError> {
        let seed = self.signing.to_bytes();
        let encrypted = key_store::encrypt_key(&seed, password, params)?;

        let tmp = path.with_extension("tmp");
        std::fs::write(&tmp, &encrypted)?;
        if let Err(e) = std::fs::rename(&tmp, path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(IdentityError::Io(e));
        }
        log::debug!("[KeyPair] wrote keyfile to {}", path.display());
        Ok(())
    }

    /// Loads a keypair from an encrypted keyfile.
    pub fn from_keyfile(path: &Path, password: &str) -> Result<Self, IdentityError> {
        let encrypted = std::fs::read(path)?;
        let decrypted = key_store::decrypt_key(&encrypted, password)?;
        if decrypted.0.len() != 32 {
            return Err(IdentityError::CorruptKeyfile(
                "decrypted payload is not a 32-byte seed".into(),
            ));
        }
        let mut seed = [0u8; 32];
        seed.copy_from_slice(&decrypted.0);
        let pair = Self::from_seed(seed);
        seed.zeroize();
        Ok(pair)
    }
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Secret material never reaches logs; only the public identity.
        f.debug_struct("KeyPair")
            .field("public_key", &hex_public(&self.public_key()))
            .finish()
    }
}

fn hex_public(key: &VerifyingKey) -> String {
    key.to_bytes().iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn deterministic_from_seed() {
        let a = KeyPair::from_seed([0x01; 32]);
        let b = KeyPair::from_seed([0x01; 32]);
        assert_eq!(a.public_key(), b.public_key());
        assert_eq!(
            a.sign(Domain::Identity, b"hello"),
            b.sign(Domain::Identity, b"hello")
        );
    }

    #[test]
    fn agent_id_roundtrip() {
        let pair = KeyPair::from_seed([0x01; 32]);
        let id = pair.agent_id().unwrap();
        let text = id.to_string();
        assert!(text.starts_with("aid_"));
        let parsed = AgentId::from_str(&text).unwrap();
        assert_eq!(parsed.as_bytes(), &pair.public_key().to_bytes());
    }

    #[test]
    fn generated_keys_differ() {
        let a = KeyPair::generate().unwrap();
        let b = KeyPair::generate().unwrap();
        assert_ne!(a.public_key(), b.public_key());
    }

    #[test]
    fn keyfile_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("agent.key");
        let pair = KeyPair::from_seed([0x07; 32]);

        pair.to_keyfile(&path, "hunter2", KdfParams::insecure_fast())
            .unwrap();
        let loaded = KeyPair::from_keyfile(&path, "hunter2").unwrap();
        assert_eq!(loaded.public_key(), pair.public_key());
    }

    #[test]
    fn keyfile_wrong_password() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("agent.key");
        let pair = KeyPair::from_seed([0x07; 32]);

        pair.to_keyfile(&path, "hunter2", KdfParams::insecure_fast())
            .unwrap();
        assert!(matches!(
            KeyPair::from_keyfile(&path, "hunter3"),
            Err(IdentityError::WrongPassword)
        ));
    }

    #[test]
    fn keyfile_replace_is_atomic_shape() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("agent.key");
        let first = KeyPair::from_seed([0x07; 32]);
        let second = KeyPair::from_seed([0x08; 32]);

        first
            .to_keyfile(&path, "pw", KdfParams::insecure_fast())
            .unwrap();
        second
            .to_keyfile(&path, "pw", KdfParams::insecure_fast())
            .unwrap();

        // No temp file left behind, and the file now holds the second key.
        assert!(!path.with_extension("tmp").exists());
        let loaded = KeyPair::from_keyfile(&path, "pw").unwrap();
        assert_eq!(loaded.public_key(), second.public_key());
    }

    #[test]
    fn debug_does_not_print_seed() {
        let pair = KeyPair::from_seed([0x55; 32]);
        let debug = format!("{:?}", pair);
        assert!(!debug.contains("5555555555"));
        assert!(debug.contains("public_key"));
    }
}
