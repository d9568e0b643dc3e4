//! Shared gradient definitions.
//!
//! The set of definitions is fixed regardless of which features reference
//! them, so the `<defs>` block is identical in structure for every face
//! and differs only in palette colors.

use super::Ctx;

pub(crate) fn render(ctx: &Ctx<'_>, out: &mut String) {
    let pal = ctx.palette;
    out.push_str("<defs>");
    // Radial falloff used by the radial background and orb eyes.
    out.push_str(&format!(
        "<radialGradient id=\"sg-radial\"><stop offset=\"0%\" stop-color=\"{}\" stop-opacity=\"0.6\"/><stop offset=\"100%\" stop-color=\"{}\" stop-opacity=\"0\"/></radialGradient>",
        pal.glow, pal.glow
    ));
    // Vertical wash used by the gradient background.
    out.push_str(&format!(
        "<linearGradient id=\"sg-linear\" x1=\"0\" y1=\"0\" x2=\"0\" y2=\"1\"><stop offset=\"0%\" stop-color=\"{}\" stop-opacity=\"0.35\"/><stop offset=\"100%\" stop-color=\"{}\" stop-opacity=\"0.05\"/></linearGradient>",
        pal.secondary, pal.primary
    ));
    // Specular ball used by orb-style eyes.
    out.push_str(&format!(
        "<radialGradient id=\"sg-orb\" cx=\"0.35\" cy=\"0.35\" r=\"0.8\"><stop offset=\"0%\" stop-color=\"#ffffff\" stop-opacity=\"0.9\"/><stop offset=\"45%\" stop-color=\"{}\"/><stop offset=\"100%\" stop-color=\"{}\"/></radialGradient>",
        pal.primary, pal.secondary
    ));
    out.push_str("</defs>");
}
