//! The categorical feature tables.
//!
//! Table sizes are normative: 20 palettes, 12 face shapes, 16 eye styles,
//! 8 eye expressions, 14 mouth styles, 16 crown styles, 12 forehead marks,
//! 10 cheek patterns, 8 chin features, 10 side accessories, 6 backgrounds,
//! and 6 auras. The categorical product is 2,378,170,368,000 distinct
//! faces, which `total_combinations` self-checks.

/// A named four-color scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Human-readable palette name.
    pub name: &'static str,
    /// Main stroke and feature color.
    pub primary: &'static str,
    /// Fill and secondary feature color.
    pub secondary: &'static str,
    /// Accent color for marks and accessories.
    pub accent: &'static str,
    /// Glow and aura color.
    pub glow: &'static str,
}

/// The 20 color palettes.
pub const PALETTES: [Palette; 20] = [
    Palette { name: "neon_violet", primary: "#b388ff", secondary: "#7c4dff", accent: "#e040fb", glow: "#d1c4e9" },
    Palette { name: "cyber_teal", primary: "#64ffda", secondary: "#1de9b6", accent: "#00bfa5", glow: "#a7ffeb" },
    Palette { name: "ember", primary: "#ff8a65", secondary: "#ff7043", accent: "#ffab40", glow: "#ffccbc" },
    Palette { name: "arctic", primary: "#81d4fa", secondary: "#4fc3f7", accent: "#00b0ff", glow: "#e1f5fe" },
    Palette { name: "toxic_lime", primary: "#ccff90", secondary: "#b2ff59", accent: "#76ff03", glow: "#f4ff81" },
    Palette { name: "rose_gold", primary: "#f8bbd0", secondary: "#f48fb1", accent: "#ff80ab", glow: "#fce4ec" },
    Palette { name: "solar_amber", primary: "#ffd54f", secondary: "#ffca28", accent: "#ffab00", glow: "#fff8e1" },
    Palette { name: "deep_sea", primary: "#4dd0e1", secondary: "#26c6da", accent: "#00acc1", glow: "#b2ebf2" },
    Palette { name: "crimson", primary: "#ef5350", secondary: "#e53935", accent: "#ff1744", glow: "#ffcdd2" },
    Palette { name: "ultraviolet", primary: "#9575cd", secondary: "#7e57c2", accent: "#651fff", glow: "#ede7f6" },
    Palette { name: "mint", primary: "#a5d6a7", secondary: "#81c784", accent: "#00e676", glow: "#e8f5e9" },
    Palette { name: "copper", primary: "#bcaaa4", secondary: "#a1887f", accent: "#ff9e80", glow: "#efebe9" },
    Palette { name: "midnight", primary: "#7986cb", secondary: "#5c6bc0", accent: "#536dfe", glow: "#c5cae9" },
    Palette { name: "magenta_burst", primary: "#f06292", secondary: "#ec407a", accent: "#f50057", glow: "#f8bbd0" },
    Palette { name: "slate", primary: "#90a4ae", secondary: "#78909c", accent: "#607d8b", glow: "#eceff1" },
    Palette { name: "aurora", primary: "#80cbc4", secondary: "#4db6ac", accent: "#64ffda", glow: "#e0f2f1" },
    Palette { name: "tangerine", primary: "#ffb74d", secondary: "#ffa726", accent: "#ff9100", glow: "#ffe0b2" },
    Palette { name: "orchid", primary: "#ce93d8", secondary: "#ba68c8", accent: "#d500f9", glow: "#f3e5f5" },
    Palette { name: "steel_blue", primary: "#64b5f6", secondary: "#42a5f5", accent: "#2979ff", glow: "#bbdefb" },
    Palette { name: "phosphor", primary: "#69f0ae", secondary: "#00e676", accent: "#00c853", glow: "#b9f6ca" },
];

/// The 12 face outlines.
pub const FACE_SHAPES: [&str; 12] = [
    "ellipse",
    "circle",
    "hexagon",
    "octagon",
    "squircle",
    "diamond",
    "shield",
    "capsule",
    "teardrop",
    "trapezoid",
    "heptagon",
    "rounded_square",
];

/// The 16 eye styles.
pub const EYE_STYLES: [&str; 16] = [
    "round",
    "almond",
    "slit",
    "hexagon",
    "ring",
    "cross",
    "star",
    "bracket",
    "visor",
    "pixel",
    "spiral",
    "diamond",
    "half_moon",
    "triangle",
    "bar",
    "orb",
];

/// The 8 eye expressions.
pub const EYE_EXPRESSIONS: [&str; 8] = [
    "neutral",
    "wide",
    "narrow",
    "upturned",
    "downturned",
    "asymmetric",
    "focused",
    "sleepy",
];

/// The 14 mouth styles.
pub const MOUTH_STYLES: [&str; 14] = [
    "line",
    "smile",
    "frown",
    "open",
    "zigzag",
    "dot",
    "square",
    "wave",
    "grill",
    "smirk",
    "pout",
    "diamond",
    "double_line",
    "crescent",
];

/// The 16 crown styles. The first three render behind the face; the rest
/// render in front.
pub const CROWN_STYLES: [&str; 16] = [
    "halo",
    "flames",
    "data_cloud",
    "antenna",
    "spikes",
    "mohawk",
    "horns",
    "crystal",
    "satellite",
    "twin_antenna",
    "coil",
    "fin",
    "plume",
    "arc",
    "prongs",
    "rings",
];

/// The 12 forehead marks.
pub const FOREHEAD_MARKS: [&str; 12] = [
    "none",
    "third_eye",
    "circuit",
    "diamond",
    "bar",
    "chevron",
    "dot_matrix",
    "crescent",
    "triangle",
    "cross",
    "wave",
    "rune",
];

/// The 10 cheek patterns.
pub const CHEEK_PATTERNS: [&str; 10] = [
    "none",
    "blush",
    "circuit_lines",
    "dots",
    "slashes",
    "hex_tiles",
    "gills",
    "freckles",
    "bars",
    "swirls",
];

/// The 8 chin features.
pub const CHIN_FEATURES: [&str; 8] = [
    "none",
    "stud",
    "cleft",
    "plate",
    "spike",
    "ring",
    "beard_line",
    "vent",
];

/// The 10 side accessories.
pub const SIDE_ACCESSORIES: [&str; 10] = [
    "none",
    "bolts",
    "fins",
    "wires",
    "discs",
    "vents",
    "wings",
    "cables",
    "plates",
    "spikes",
];

/// The 6 background styles.
pub const BG_STYLES: [&str; 6] = ["solid", "grid", "radial", "starfield", "circuit", "gradient"];

/// The 6 aura styles.
pub const AURA_STYLES: [&str; 6] = [
    "none",
    "glow_ring",
    "particles",
    "rays",
    "double_ring",
    "shimmer",
];

/// The number of distinct categorical combinations. Normative self-check.
pub fn total_combinations() -> u64 {
    (PALETTES.len()
        * FACE_SHAPES.len()
        * EYE_STYLES.len()
        * EYE_EXPRESSIONS.len()
        * MOUTH_STYLES.len()
        * CROWN_STYLES.len()
        * FOREHEAD_MARKS.len()
        * CHEEK_PATTERNS.len()
        * CHIN_FEATURES.len()
        * SIDE_ACCESSORIES.len()
        * BG_STYLES.len()
        * AURA_STYLES.len()) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_sizes_are_normative() {
        assert_eq!(PALETTES.len(), 20);
        assert_eq!(FACE_SHAPES.len(), 12);
        assert_eq!(EYE_STYLES.len(), 16);
        assert_eq!(EYE_EXPRESSIONS.len(), 8);
        assert_eq!(MOUTH_STYLES.len(), 14);
        assert_eq!(CROWN_STYLES.len(), 16);
        assert_eq!(FOREHEAD_MARKS.len(), 12);
        assert_eq!(CHEEK_PATTERNS.len(), 10);
        assert_eq!(CHIN_FEATURES.len(), 8);
        assert_eq!(SIDE_ACCESSORIES.len(), 10);
        assert_eq!(BG_STYLES.len(), 6);
        assert_eq!(AURA_STYLES.len(), 6);
    }

    #[test]
    fn combination_count_is_pinned() {
        assert_eq!(total_combinations(), 2_378_170_368_000);
    }
}
