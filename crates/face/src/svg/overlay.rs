//! Animation definitions and the animated scan overlay.
//!
//! The glitch slices draw from the PRNG; the effect seed is installed
//! immediately before drawing.

use super::{Ctx, VIEW};
use crate::fmt::num;
use crate::mt19937::Mt19937;

/// Emits the `<style>` block with the keyframe set. Durations derive from
/// the extracted animation speed.
pub(crate) fn render_animations(ctx: &Ctx<'_>, out: &mut String) {
    let speed = ctx.params.anim_speed;
    out.push_str("<style>");
    out.push_str(&format!(
        "@keyframes sg-pulse{{0%{{opacity:0.55}}50%{{opacity:1}}100%{{opacity:0.55}}}}.sg-pulse{{animation:sg-pulse {}s ease-in-out infinite}}",
        num(speed)
    ));
    out.push_str(&format!(
        "@keyframes sg-scan{{0%{{transform:translateY(0)}}100%{{transform:translateY({}px)}}}}.sg-scan{{animation:sg-scan {}s linear infinite}}",
        num(VIEW),
        num(speed * 1.5)
    ));
    out.push_str(&format!(
        "@keyframes sg-flicker{{0%{{opacity:0}}8%{{opacity:1}}12%{{opacity:0}}100%{{opacity:0}}}}.sg-flicker{{animation:sg-flicker {}s steps(2) infinite}}",
        num(speed * 0.8)
    ));
    out.push_str("</style>");
}

/// Emits the scan line and glitch slices. Animated documents only.
pub(crate) fn render_scan(ctx: &Ctx<'_>, out: &mut String) {
    let p = ctx.params;
    let pal = ctx.palette;

    out.push_str(&format!(
        "<rect class=\"sg-scan\" x=\"0\" y=\"-6\" width=\"{}\" height=\"6\" fill=\"{}\" opacity=\"{}\"/>",
        num(VIEW),
        pal.glow,
        num(p.glitch)
    ));

    let mut rng = Mt19937::new(u32::from(p.effect_seed));
    let slices = rng.randint(2, 4);
    for _ in 0..slices {
        let y = rng.uniform(0.0, VIEW - 4.0);
        let h = rng.uniform(1.0, 3.5);
        let dx = rng.uniform(-4.0, 4.0);
        out.push_str(&format!(
            "<rect class=\"sg-flicker\" x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\" opacity=\"{}\"/>",
            num(dx),
            num(y),
            num(VIEW),
            num(h),
            pal.accent,
            num(p.glitch * rng.uniform(0.6, 1.0))
        ));
    }
}
