//! Renderer conformance vectors.
//!
//! The 32-byte input is BLAKE3 of the ASCII bytes `sigaid-test-vector-1`;
//! its categorical decomposition, seeds, continuous parameters, and
//! fingerprint are pinned, and rendering must be byte-stable across
//! constructions.

use sigaid_face::{total_combinations, Face};

const INPUT: &[u8] = b"sigaid-test-vector-1";
const INPUT_HASH_HEX: &str = "77b55989ae7e936066b76d55cc9041f49cd37a585e86338ccb988124402f0a30";

#[test]
fn input_hash_is_pinned() {
    assert_eq!(hex::encode(blake3::hash(INPUT).as_bytes()), INPUT_HASH_HEX);
}

#[test]
fn categorical_decomposition_matches_fixture() {
    let face = Face::from_bytes(INPUT);
    let params = face.params();

    assert_eq!(params.palette, 19);
    assert_eq!(params.face_shape, 1);
    assert_eq!(params.eye_style, 9);
    assert_eq!(params.eye_expr, 1);
    assert_eq!(params.mouth, 6);
    assert_eq!(params.crown, 14);
    assert_eq!(params.forehead, 3);
    assert_eq!(params.cheek, 6);
    assert_eq!(params.chin, 6);
    assert_eq!(params.side, 3);
    assert_eq!(params.bg, 1);
    assert_eq!(params.aura, 1);
}

#[test]
fn seeds_and_continuous_parameters_match_fixture() {
    let face = Face::from_bytes(INPUT);
    let params = face.params();

    assert_eq!(params.pattern_seed, 52120);
    assert_eq!(params.circuit_seed, 33060);
    assert_eq!(params.particle_seed, 16431);
    assert_eq!(params.effect_seed, 2608);

    assert_eq!(params.face_w, 66.0);
    assert_eq!(params.face_h, 76.29411764705883);
    assert_eq!(params.particle_density, 14);
}

#[test]
fn fingerprint_matches_fixture() {
    assert_eq!(Face::from_bytes(INPUT).fingerprint(), "f0a6bcf8");
    assert_eq!(Face::from_bytes(&[1u8; 32]).fingerprint(), "95150490");
}

#[test]
fn rendering_is_byte_identical_across_constructions() {
    // Two independent paths to the same 32 bytes must agree exactly.
    let via_text = Face::from_bytes(INPUT);
    let via_hex = Face::from_hex(INPUT_HASH_HEX).unwrap();

    for animated in [false, true] {
        let a = via_text.to_vector_graphic(128, animated);
        let b = via_hex.to_vector_graphic(128, animated);
        assert_eq!(a, b, "animated={}", animated);
        assert!(a.contains("width=\"128\" height=\"128\""));
        assert!(a.starts_with("<svg"));
        assert!(a.ends_with("</svg>"));
    }
}

#[test]
fn renders_are_stable_across_repeated_calls() {
    let face = Face::from_bytes(INPUT);
    let first = face.to_vector_graphic(200, true);
    for _ in 0..3 {
        assert_eq!(face.to_vector_graphic(200, true), first);
    }
}

#[test]
fn combination_count_self_check() {
    assert_eq!(total_combinations(), 2_378_170_368_000);
}

#[test]
fn description_is_deterministic_and_nonempty() {
    let face = Face::from_bytes(INPUT);
    assert_eq!(face.describe(), Face::from_bytes(INPUT).describe());
    assert!(face.full_description().contains("fingerprint: f0a6bcf8"));
}
