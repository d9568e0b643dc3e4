//! Parameter extraction: the pure mapping from 32 input bytes to the
//! renderer's feature record.
//!
//! Bytes 0..=11 select categorical features by table-size modulus, bytes
//! 12..=23 produce continuous values through `byte_to_range`, and bytes
//! 24..=31 carry four big-endian 16-bit seeds consumed by the renderer.

use crate::tables;

/// Maps a byte onto `[lo, hi]`: `lo + (v / 255) * (hi - lo)`, evaluated in
/// IEEE-754 double precision.
pub fn byte_to_range(v: u8, lo: f64, hi: f64) -> f64 {
    lo + (f64::from(v) / 255.0) * (hi - lo)
}

/// The full feature record extracted from a 32-byte input.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceParams {
    /// Index into [`tables::PALETTES`].
    pub palette: usize,
    /// Index into [`tables::FACE_SHAPES`].
    pub face_shape: usize,
    /// Index into [`tables::EYE_STYLES`].
    pub eye_style: usize,
    /// Index into [`tables::EYE_EXPRESSIONS`].
    pub eye_expr: usize,
    /// Index into [`tables::MOUTH_STYLES`].
    pub mouth: usize,
    /// Index into [`tables::CROWN_STYLES`].
    pub crown: usize,
    /// Index into [`tables::FOREHEAD_MARKS`].
    pub forehead: usize,
    /// Index into [`tables::CHEEK_PATTERNS`].
    pub cheek: usize,
    /// Index into [`tables::CHIN_FEATURES`].
    pub chin: usize,
    /// Index into [`tables::SIDE_ACCESSORIES`].
    pub side: usize,
    /// Index into [`tables::BG_STYLES`].
    pub bg: usize,
    /// Index into [`tables::AURA_STYLES`].
    pub aura: usize,

    /// Face width, 50..=70.
    pub face_w: f64,
    /// Face height, 65..=85.
    pub face_h: f64,
    /// Eye size, 10..=20.
    pub eye_size: f64,
    /// Horizontal eye spacing from center, 22..=38.
    pub eye_spacing: f64,
    /// Mouth width, 18..=40.
    pub mouth_w: f64,
    /// Crown scale factor, 0.7..=1.3.
    pub crown_size: f64,
    /// Forehead-mark scale factor, 0.7..=1.3.
    pub mark_size: f64,
    /// Side-accessory scale factor, 0.8..=1.2.
    pub accessory_size: f64,
    /// Glow intensity, 0.5..=1.0.
    pub glow: f64,
    /// Animation speed in seconds per cycle, 1.5..=3.5.
    pub anim_speed: f64,
    /// Glitch overlay intensity, 0.1..=0.3.
    pub glitch: f64,
    /// Background particle count, floor of 8..=20.
    pub particle_density: u32,

    /// Seed installed before drawing the background pattern.
    pub pattern_seed: u16,
    /// Seed installed before drawing circuitry.
    pub circuit_seed: u16,
    /// Seed installed before drawing aura particles.
    pub particle_seed: u16,
    /// Seed installed before drawing the glitch/scan overlay.
    pub effect_seed: u16,
}

impl FaceParams {
    /// Extracts the feature record from exactly 32 bytes.
    pub fn from_bytes(b: &[u8; 32]) -> Self {
        Self {
            palette: usize::from(b[0]) % tables::PALETTES.len(),
            face_shape: usize::from(b[1]) % tables::FACE_SHAPES.len(),
            eye_style: usize::from(b[2]) % tables::EYE_STYLES.len(),
            eye_expr: usize::from(b[3]) % tables::EYE_EXPRESSIONS.len(),
            mouth: usize::from(b[4]) % tables::MOUTH_STYLES.len(),
            crown: usize::from(b[5]) % tables::CROWN_STYLES.len(),
            forehead: usize::from(b[6]) % tables::FOREHEAD_MARKS.len(),
            cheek: usize::from(b[7]) % tables::CHEEK_PATTERNS.len(),
            chin: usize::from(b[8]) % tables::CHIN_FEATURES.len(),
            side: usize::from(b[9]) % tables::SIDE_ACCESSORIES.len(),
            bg: usize::from(b[10]) % tables::BG_STYLES.len(),
            aura: usize::from(b[11]) % tables::AURA_STYLES.len(),

            face_w: byte_to_range(b[12], 50.0, 70.0),
            face_h: byte_to_range(b[13], 65.0, 85.0),
            eye_size: byte_to_range(b[14], 10.0, 20.0),
            eye_spacing: byte_to_range(b[15], 22.0, 38.0),
            mouth_w: byte_to_range(b[16], 18.0, 40.0),
            crown_size: byte_to_range(b[17], 0.7, 1.3),
            mark_size: byte_to_range(b[18], 0.7, 1.3),
            accessory_size: byte_to_range(b[19], 0.8, 1.2),
            glow: byte_to_range(b[20], 0.5, 1.0),
            anim_speed: byte_to_range(b[21], 1.5, 3.5),
            glitch: byte_to_range(b[22], 0.1, 0.3),
            particle_density: byte_to_range(b[23], 8.0, 20.0).floor() as u32,

            pattern_seed: u16::from_be_bytes([b[24], b[25]]),
            circuit_seed: u16::from_be_bytes([b[26], b[27]]),
            particle_seed: u16::from_be_bytes([b[28], b[29]]),
            effect_seed: u16::from_be_bytes([b[30], b[31]]),
        }
    }

    /// The 12 categorical indices in table order, for similarity metrics.
    pub fn categorical_indices(&self) -> [usize; 12] {
        [
            self.palette,
            self.face_shape,
            self.eye_style,
            self.eye_expr,
            self.mouth,
            self.crown,
            self.forehead,
            self.cheek,
            self.chin,
            self.side,
            self.bg,
            self.aura,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_to_range_endpoints() {
        assert_eq!(byte_to_range(0, 50.0, 70.0), 50.0);
        assert_eq!(byte_to_range(255, 50.0, 70.0), 70.0);
        // Midpoint: 127/255 is just below one half.
        let mid = byte_to_range(127, 0.0, 1.0);
        assert!(mid > 0.49 && mid < 0.5);
    }

    #[test]
    fn extraction_is_positional() {
        let mut bytes = [0u8; 32];
        bytes[0] = 21; // 21 % 20 = 1
        bytes[1] = 13; // 13 % 12 = 1
        bytes[24] = 0xAB;
        bytes[25] = 0xCD;
        let p = FaceParams::from_bytes(&bytes);
        assert_eq!(p.palette, 1);
        assert_eq!(p.face_shape, 1);
        assert_eq!(p.pattern_seed, 0xABCD);
        assert_eq!(p.face_w, 50.0);
        assert_eq!(p.particle_density, 8);
    }

    #[test]
    fn particle_density_is_floored() {
        let mut bytes = [0u8; 32];
        bytes[23] = 255;
        assert_eq!(FaceParams::from_bytes(&bytes).particle_density, 20);
        bytes[23] = 100;
        // 8 + (100/255) * 12 = 12.705..., floored.
        assert_eq!(FaceParams::from_bytes(&bytes).particle_density, 12);
    }

    #[test]
    fn same_bytes_same_params() {
        let bytes = [0x5Au8; 32];
        assert_eq!(FaceParams::from_bytes(&bytes), FaceParams::from_bytes(&bytes));
    }
}
