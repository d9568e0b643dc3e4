//! Aura layer, drawn behind the face.
//!
//! The particles variant draws from the PRNG; the particle seed is
//! installed immediately before drawing.

use super::{Ctx, CX, CY};
use crate::fmt::num;
use crate::mt19937::Mt19937;
use crate::tables::AURA_STYLES;

pub(crate) fn render(ctx: &Ctx<'_>, out: &mut String) {
    let p = ctx.params;
    let pal = ctx.palette;
    let rx = p.face_w + 18.0;
    let ry = p.face_h + 18.0;
    let pulse = if ctx.animated { " class=\"sg-pulse\"" } else { "" };

    match AURA_STYLES[p.aura] {
        "none" => {}
        "glow_ring" => {
            out.push_str(&format!(
                "<ellipse cx=\"{}\" cy=\"{}\" rx=\"{}\" ry=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"6\" opacity=\"{}\"{}/>",
                num(CX),
                num(CY),
                num(rx),
                num(ry),
                pal.glow,
                num(p.glow * 0.5),
                pulse
            ));
        }
        "particles" => {
            let mut rng = Mt19937::new(u32::from(p.particle_seed));
            out.push_str(&format!("<g fill=\"{}\"{}>", pal.glow, pulse));
            for _ in 0..p.particle_density {
                let theta = rng.uniform(0.0, std::f64::consts::TAU);
                let dist = rng.uniform(1.05, 1.35);
                let x = CX + rx * dist * theta.cos();
                let y = CY + ry * dist * theta.sin();
                let r = rng.uniform(0.8, 2.4);
                out.push_str(&format!(
                    "<circle cx=\"{}\" cy=\"{}\" r=\"{}\" opacity=\"{}\"/>",
                    num(x),
                    num(y),
                    num(r),
                    num(p.glow * rng.uniform(0.4, 0.9))
                ));
            }
            out.push_str("</g>");
        }
        "rays" => {
            out.push_str(&format!(
                "<g stroke=\"{}\" stroke-width=\"2\" opacity=\"{}\"{}>",
                pal.glow,
                num(p.glow * 0.45),
                pulse
            ));
            for i in 0..8 {
                let theta = f64::from(i) * std::f64::consts::TAU / 8.0;
                let x1 = CX + (rx + 4.0) * theta.cos();
                let y1 = CY + (ry + 4.0) * theta.sin();
                let x2 = CX + (rx + 20.0) * theta.cos();
                let y2 = CY + (ry + 20.0) * theta.sin();
                out.push_str(&format!(
                    "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\"/>",
                    num(x1),
                    num(y1),
                    num(x2),
                    num(y2)
                ));
            }
            out.push_str("</g>");
        }
        "double_ring" => {
            for (extra, width) in [(0.0, 3.0), (10.0, 1.5)] {
                out.push_str(&format!(
                    "<ellipse cx=\"{}\" cy=\"{}\" rx=\"{}\" ry=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\" opacity=\"{}\"{}/>",
                    num(CX),
                    num(CY),
                    num(rx + extra),
                    num(ry + extra),
                    pal.glow,
                    num(width),
                    num(p.glow * 0.4),
                    pulse
                ));
            }
        }
        "shimmer" => {
            for i in 0..3 {
                let grow = f64::from(i) * 7.0;
                out.push_str(&format!(
                    "<ellipse cx=\"{}\" cy=\"{}\" rx=\"{}\" ry=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"1\" opacity=\"{}\"{}/>",
                    num(CX),
                    num(CY),
                    num(rx + grow),
                    num(ry + grow),
                    pal.glow,
                    num(p.glow * (0.5 - f64::from(i) * 0.12)),
                    pulse
                ));
            }
        }
        _ => {}
    }
}
