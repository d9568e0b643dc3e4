//! Secure at-rest storage for identity seeds.
//!
//! Format V1:
//! [ Magic: "SIGAIDK1" (8) ]
//! [ Version: u8 (1) ]
//! [ KDF log2(N): u8 (1) ]
//! [ KDF r: u32 (4) ]
//! [ KDF p: u32 (4) ]
//! [ Salt: 16B ]
//! [ Nonce: 24B ]
//! [ Ciphertext + Tag: N + 16 ]
//!
//! KDF: scrypt(password, salt, N, r, p) -> 32-byte key.
//! AEAD: XChaCha20-Poly1305 with the full header as associated data, so
//! any bit flip inside the file causes decryption to fail.

use crate::aead;
use rand::rngs::OsRng;
use rand::RngCore;
use sigaid_types::error::IdentityError;
use zeroize::{Zeroize, ZeroizeOnDrop};

// Header constants
const HEADER_MAGIC: &[u8; 8] = b"SIGAIDK1";
const HEADER_VERSION: u8 = 1;
const SALT_LEN: usize = 16;
const HEADER_LEN: usize = 8 + 1 + 1 + 4 + 4 + SALT_LEN + aead::NONCE_LEN; // 58 bytes
const KEK_LEN: usize = 32;

/// scrypt cost parameters stored in the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    /// log2 of the CPU/memory cost N.
    pub log_n: u8,
    /// Block size.
    pub r: u32,
    /// Parallelization.
    pub p: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        // 32 MiB, interactive-login strength.
        Self {
            log_n: 15,
            r: 8,
            p: 1,
        }
    }
}

impl KdfParams {
    /// Cheap parameters for tests. Not for production keyfiles.
    pub fn insecure_fast() -> Self {
        Self { log_n: 8, r: 8, p: 1 }
    }
}

/// A container for sensitive data that zeroizes on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SensitiveBytes(pub Vec<u8>);

// Ceilings on the cost parameters a file may demand. A container asking
// for more is corrupt or hostile, not merely expensive.
const MAX_LOG_N: u8 = 22;
const MAX_R: u32 = 32;
const MAX_P: u32 = 16;

fn derive_kek(passphrase: &str, salt: &[u8], params: KdfParams) -> Result<[u8; KEK_LEN], IdentityError> {
    if params.log_n > MAX_LOG_N || params.r > MAX_R || params.p > MAX_P {
        return Err(IdentityError::CorruptKeyfile(
            "scrypt parameters out of bounds".into(),
        ));
    }
    let scrypt_params = scrypt::Params::new(params.log_n, params.r, params.p, KEK_LEN)
        .map_err(|e| IdentityError::CorruptKeyfile(format!("invalid scrypt parameters: {}", e)))?;
    let mut kek = [0u8; KEK_LEN];
    scrypt::scrypt(passphrase.as_bytes(), salt, &scrypt_params, &mut kek)
        .map_err(|e| IdentityError::CorruptKeyfile(format!("scrypt derivation failed: {}", e)))?;
    Ok(kek)
}

/// Encrypts raw seed bytes under a passphrase, wrapping them in the V1
/// format with a fresh salt and nonce.
pub fn encrypt_key(
    secret: &[u8],
    passphrase: &str,
    params: KdfParams,
) -> Result<Vec<u8>, IdentityError> {
    // 1. Generate salt and nonce
    let mut salt = [0u8; SALT_LEN];
    let mut nonce = [0u8; aead::NONCE_LEN];
    OsRng.fill_bytes(&mut salt);
    OsRng.fill_bytes(&mut nonce);

    // 2. Construct header
    // Bytes are packed manually for a stable, endian-independent format.
    let mut header = Vec::with_capacity(HEADER_LEN);
    header.extend_from_slice(HEADER_MAGIC);
    header.push(HEADER_VERSION);
    header.push(params.log_n);
    header.extend_from_slice(&params.r.to_be_bytes());
    header.extend_from_slice(&params.p.to_be_bytes());
    header.extend_from_slice(&salt);
    header.extend_from_slice(&nonce);

    assert_eq!(header.len(), HEADER_LEN, "header size mismatch");

    // 3. Derive KEK
    let mut kek = derive_kek(passphrase, &salt, params)?;

    // 4. Encrypt with the header as associated data
    let sealed = aead::seal(&kek, &nonce, &header, secret)?;
    kek.zeroize();

    // 5. Pack output
    let mut output = header;
    output.extend_from_slice(&sealed);
    Ok(output)
}

/// Decrypts a keyfile blob under a passphrase.
///
/// Structural problems (bad magic, unsupported version, truncation) are
/// `CorruptKeyfile`; an authentication failure is `WrongPassword`. The
/// password check itself goes through the AEAD tag and carries no
/// password-dependent timing.
pub fn decrypt_key(data: &[u8], passphrase: &str) -> Result<SensitiveBytes, IdentityError> {
    // 1. Validate header structure
    if data.len() < HEADER_LEN + aead::TAG_LEN {
        return Err(IdentityError::CorruptKeyfile("file too short".into()));
    }
    if &data[0..8] != HEADER_MAGIC {
        return Err(IdentityError::CorruptKeyfile("bad magic".into()));
    }
    if data[8] != HEADER_VERSION {
        return Err(IdentityError::CorruptKeyfile(format!(
            "unsupported keyfile version: {}",
            data[8]
        )));
    }

    // 2. Extract metadata
    let params = KdfParams {
        log_n: data[9],
        r: u32::from_be_bytes(data[10..14].try_into().unwrap_or([0; 4])),
        p: u32::from_be_bytes(data[14..18].try_into().unwrap_or([0; 4])),
    };
    let salt = &data[18..18 + SALT_LEN];
    let mut nonce = [0u8; aead::NONCE_LEN];
    nonce.copy_from_slice(&data[18 + SALT_LEN..HEADER_LEN]);
    let header = &data[..HEADER_LEN];
    let ciphertext = &data[HEADER_LEN..];

    // 3. Derive KEK
    let mut kek = derive_kek(passphrase, salt, params)?;

    // 4. Decrypt; a tag failure means wrong password or a flipped bit,
    // indistinguishable by construction.
    let plaintext = aead::open(&kek, &nonce, header, ciphertext);
    kek.zeroize();

    plaintext
        .map(SensitiveBytes)
        .map_err(|_| IdentityError::WrongPassword)
}
