//! Background layer.
//!
//! A dark base rectangle plus one style-dependent overlay. The starfield
//! and circuit variants draw from the PRNG; the pattern seed is installed
//! immediately before drawing so the emitted geometry is independent of
//! everything rendered earlier.

use super::{Ctx, VIEW};
use crate::fmt::num;
use crate::mt19937::Mt19937;
use crate::tables::BG_STYLES;

const BASE_COLOR: &str = "#0b0b14";

pub(crate) fn render(ctx: &Ctx<'_>, out: &mut String) {
    out.push_str(&format!(
        "<rect x=\"0\" y=\"0\" width=\"{v}\" height=\"{v}\" fill=\"{}\"/>",
        BASE_COLOR,
        v = num(VIEW)
    ));

    match BG_STYLES[ctx.params.bg] {
        "solid" => {}
        "grid" => render_grid(ctx, out),
        "radial" => {
            out.push_str(&format!(
                "<rect x=\"0\" y=\"0\" width=\"{v}\" height=\"{v}\" fill=\"url(#sg-radial)\"/>",
                v = num(VIEW)
            ));
        }
        "starfield" => render_starfield(ctx, out),
        "circuit" => render_circuit(ctx, out),
        "gradient" => {
            out.push_str(&format!(
                "<rect x=\"0\" y=\"0\" width=\"{v}\" height=\"{v}\" fill=\"url(#sg-linear)\"/>",
                v = num(VIEW)
            ));
        }
        _ => {}
    }
}

fn render_grid(ctx: &Ctx<'_>, out: &mut String) {
    let color = ctx.palette.secondary;
    out.push_str(&format!(
        "<g stroke=\"{}\" stroke-width=\"0.5\" opacity=\"0.25\">",
        color
    ));
    let mut pos = 20.0;
    while pos < VIEW {
        out.push_str(&format!(
            "<line x1=\"{p}\" y1=\"0\" x2=\"{p}\" y2=\"{v}\"/><line x1=\"0\" y1=\"{p}\" x2=\"{v}\" y2=\"{p}\"/>",
            p = num(pos),
            v = num(VIEW)
        ));
        pos += 20.0;
    }
    out.push_str("</g>");
}

fn render_starfield(ctx: &Ctx<'_>, out: &mut String) {
    let mut rng = Mt19937::new(u32::from(ctx.params.pattern_seed));
    let count = ctx.params.particle_density * 2;
    out.push_str(&format!("<g fill=\"{}\">", ctx.palette.glow));
    for _ in 0..count {
        let x = rng.uniform(0.0, VIEW);
        let y = rng.uniform(0.0, VIEW);
        let r = rng.uniform(0.3, 1.4);
        let opacity = rng.uniform(0.2, 0.9);
        out.push_str(&format!(
            "<circle cx=\"{}\" cy=\"{}\" r=\"{}\" opacity=\"{}\"/>",
            num(x),
            num(y),
            num(r),
            num(opacity)
        ));
    }
    out.push_str("</g>");
}

fn render_circuit(ctx: &Ctx<'_>, out: &mut String) {
    let mut rng = Mt19937::new(u32::from(ctx.params.pattern_seed));
    out.push_str(&format!(
        "<g stroke=\"{}\" stroke-width=\"0.8\" fill=\"none\" opacity=\"0.3\">",
        ctx.palette.secondary
    ));
    // Eight right-angled traces, each a three-segment polyline with a
    // terminal node.
    for _ in 0..8 {
        let x0 = rng.uniform(0.0, VIEW);
        let y0 = rng.uniform(0.0, VIEW);
        let dx = rng.uniform(15.0, 45.0) * if rng.random_double() < 0.5 { -1.0 } else { 1.0 };
        let dy = rng.uniform(15.0, 45.0) * if rng.random_double() < 0.5 { -1.0 } else { 1.0 };
        let x1 = x0 + dx;
        let y1 = y0 + dy;
        out.push_str(&format!(
            "<polyline points=\"{},{} {},{} {},{}\"/>",
            num(x0),
            num(y0),
            num(x1),
            num(y0),
            num(x1),
            num(y1)
        ));
        out.push_str(&format!(
            "<circle cx=\"{}\" cy=\"{}\" r=\"1.6\" fill=\"{}\" stroke=\"none\"/>",
            num(x1),
            num(y1),
            ctx.palette.accent
        ));
    }
    out.push_str("</g>");
}
