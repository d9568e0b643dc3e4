#![forbid(unsafe_code)]
#![deny(missing_docs)]

//! # SIGAID Face
//!
//! The deterministic visual-identity renderer: a pure function from a
//! 32-byte key to a vector-graphic portrait. Two independent
//! implementations in different ecosystems must produce byte-identical
//! output for the same input, so everything here — the parameter
//! extraction, the MT19937 stream, the number formatting, the emission
//! order — is frozen. This crate depends on the BLAKE3 hash and nothing
//! else from the workspace.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use thiserror::Error;

/// Canonical number formatting for emitted coordinates.
pub mod fmt;
/// The frozen MT19937 pseudo-random stream.
pub mod mt19937;
/// Parameter extraction from the 32 input bytes.
pub mod params;
/// SVG document composition.
pub mod svg;
/// The categorical feature tables.
pub mod tables;

pub use params::{byte_to_range, FaceParams};
pub use tables::total_combinations;

/// Errors from face construction. Rendering itself cannot fail.
#[derive(Error, Debug)]
pub enum FaceError {
    /// The hex input could not be decoded.
    #[error("invalid hex input: {0}")]
    InvalidHex(String),
    /// The Base64 input could not be decoded.
    #[error("invalid base64 input: {0}")]
    InvalidBase64(String),
}

/// A renderable visual identity.
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    bytes: [u8; 32],
    params: FaceParams,
}

impl Face {
    /// Builds a face from arbitrary bytes. Inputs that are not exactly 32
    /// bytes are first hashed to 32 bytes with BLAKE3.
    pub fn from_bytes(input: &[u8]) -> Self {
        let bytes: [u8; 32] = match input.try_into() {
            Ok(exact) => exact,
            Err(_) => *blake3::hash(input).as_bytes(),
        };
        let params = FaceParams::from_bytes(&bytes);
        Self { bytes, params }
    }

    /// Builds a face from a hex string.
    pub fn from_hex(input: &str) -> Result<Self, FaceError> {
        let raw = hex::decode(input.trim()).map_err(|e| FaceError::InvalidHex(e.to_string()))?;
        Ok(Self::from_bytes(&raw))
    }

    /// Builds a face from a standard-Base64 string.
    pub fn from_base64(input: &str) -> Result<Self, FaceError> {
        let raw = BASE64
            .decode(input.trim())
            .map_err(|e| FaceError::InvalidBase64(e.to_string()))?;
        Ok(Self::from_bytes(&raw))
    }

    /// The 32 bytes this face renders.
    pub fn key_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }

    /// The extracted feature record.
    pub fn params(&self) -> &FaceParams {
        &self.params
    }

    /// Renders the vector-graphic document at the given output size.
    pub fn to_vector_graphic(&self, size: u32, animated: bool) -> String {
        svg::render_document(&self.params, size, animated)
    }

    /// Eight hex characters: the first 4 bytes of BLAKE3 over the input.
    pub fn fingerprint(&self) -> String {
        hex::encode(&blake3::hash(&self.bytes).as_bytes()[..4])
    }

    /// A one-line feature summary.
    pub fn describe(&self) -> String {
        let p = &self.params;
        format!(
            "{} {} face with {} {} eyes and a {} mouth",
            tables::PALETTES[p.palette].name,
            tables::FACE_SHAPES[p.face_shape],
            tables::EYE_EXPRESSIONS[p.eye_expr],
            tables::EYE_STYLES[p.eye_style],
            tables::MOUTH_STYLES[p.mouth],
        )
    }

    /// A full, line-per-feature description.
    pub fn full_description(&self) -> String {
        let p = &self.params;
        let mut lines = vec![
            format!("fingerprint: {}", self.fingerprint()),
            format!("palette: {}", tables::PALETTES[p.palette].name),
            format!("face shape: {}", tables::FACE_SHAPES[p.face_shape]),
            format!(
                "eyes: {} ({})",
                tables::EYE_STYLES[p.eye_style],
                tables::EYE_EXPRESSIONS[p.eye_expr]
            ),
            format!("mouth: {}", tables::MOUTH_STYLES[p.mouth]),
            format!("crown: {}", tables::CROWN_STYLES[p.crown]),
            format!("forehead: {}", tables::FOREHEAD_MARKS[p.forehead]),
            format!("cheeks: {}", tables::CHEEK_PATTERNS[p.cheek]),
            format!("chin: {}", tables::CHIN_FEATURES[p.chin]),
            format!("sides: {}", tables::SIDE_ACCESSORIES[p.side]),
            format!("background: {}", tables::BG_STYLES[p.bg]),
            format!("aura: {}", tables::AURA_STYLES[p.aura]),
        ];
        lines.push(format!(
            "proportions: {}x{}",
            fmt::num(p.face_w * 2.0),
            fmt::num(p.face_h * 2.0)
        ));
        lines.join("\n")
    }

    /// Hamming distance over the 12 categorical indices, divided by 12.
    /// Zero means categorically identical; one means nothing shared.
    pub fn similarity(&self, other: &Face) -> f64 {
        let a = self.params.categorical_indices();
        let b = other.params.categorical_indices();
        let differing = a.iter().zip(b.iter()).filter(|(x, y)| x != y).count();
        differing as f64 / 12.0
    }
}
