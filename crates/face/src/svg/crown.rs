//! Crown: sixteen styles.
//!
//! `halo`, `flames`, and `data_cloud` render behind the face; the caller
//! decides placement. The data cloud draws from the PRNG; the circuit seed
//! is installed immediately before drawing.

use super::{Ctx, CX, CY};
use crate::fmt::num;
use crate::mt19937::Mt19937;
use crate::tables::CROWN_STYLES;

pub(crate) fn render(ctx: &Ctx<'_>, out: &mut String) {
    let p = ctx.params;
    let pal = ctx.palette;
    let scale = p.crown_size;
    // The crown anchors just above the face outline.
    let top = CY - p.face_h;
    let cw = p.face_w * 0.8 * scale;

    match CROWN_STYLES[p.crown] {
        "halo" => out.push_str(&format!(
            "<ellipse cx=\"{}\" cy=\"{}\" rx=\"{}\" ry=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"3\" opacity=\"0.85\"/>",
            num(CX),
            num(top - 16.0 * scale),
            num(cw),
            num(cw * 0.22),
            pal.glow
        )),
        "flames" => {
            out.push_str(&format!("<g fill=\"{}\" opacity=\"0.85\">", pal.accent));
            for i in 0..5 {
                let fx = CX + (f64::from(i) - 2.0) * cw * 0.4;
                let fh = (14.0 + 6.0 * (1.0 - (f64::from(i) - 2.0).abs() / 2.0)) * scale;
                out.push_str(&format!(
                    "<path d=\"M {} {} Q {} {} {} {} Q {} {} {} {} Z\"/>",
                    num(fx - 4.0 * scale),
                    num(top + 2.0),
                    num(fx - 2.0 * scale),
                    num(top - fh * 0.6),
                    num(fx),
                    num(top - fh),
                    num(fx + 2.0 * scale),
                    num(top - fh * 0.4),
                    num(fx + 4.0 * scale),
                    num(top + 2.0)
                ));
            }
            out.push_str("</g>");
        }
        "data_cloud" => {
            let mut rng = Mt19937::new(u32::from(p.circuit_seed));
            out.push_str(&format!("<g fill=\"{}\" opacity=\"0.75\">", pal.secondary));
            for _ in 0..12 {
                let x = CX + rng.uniform(-cw, cw);
                let y = top - rng.uniform(8.0, 30.0) * scale;
                let edge = rng.uniform(1.5, 4.5);
                out.push_str(&format!(
                    "<rect x=\"{}\" y=\"{}\" width=\"{e}\" height=\"{e}\"/>",
                    num(x),
                    num(y),
                    e = num(edge)
                ));
            }
            out.push_str("</g>");
        }
        "antenna" => out.push_str(&format!(
            "<line x1=\"{x}\" y1=\"{}\" x2=\"{x}\" y2=\"{}\" stroke=\"{}\" stroke-width=\"2\"/><circle cx=\"{x}\" cy=\"{}\" r=\"{}\" fill=\"{}\"/>",
            num(top),
            num(top - 20.0 * scale),
            pal.primary,
            num(top - 22.0 * scale),
            num(3.0 * scale),
            pal.accent,
            x = num(CX)
        )),
        "spikes" => {
            out.push_str(&format!("<g fill=\"{}\">", pal.primary));
            for i in 0..5 {
                let sx = CX + (f64::from(i) - 2.0) * cw * 0.42;
                let sh = 12.0 * scale;
                out.push_str(&format!(
                    "<polygon points=\"{},{} {},{} {},{}\"/>",
                    num(sx - 3.5),
                    num(top + 3.0),
                    num(sx + 3.5),
                    num(top + 3.0),
                    num(sx),
                    num(top - sh)
                ));
            }
            out.push_str("</g>");
        }
        "mohawk" => {
            out.push_str(&format!("<g fill=\"{}\">", pal.accent));
            for i in 0..7 {
                let t = (f64::from(i) - 3.0) / 3.0;
                let sx = CX + t * cw * 0.7;
                let sh = (16.0 - 8.0 * t.abs()) * scale;
                let sy = top + t.abs() * 6.0;
                out.push_str(&format!(
                    "<polygon points=\"{},{} {},{} {},{}\"/>",
                    num(sx - 2.5),
                    num(sy + 4.0),
                    num(sx + 2.5),
                    num(sy + 4.0),
                    num(sx),
                    num(sy - sh)
                ));
            }
            out.push_str("</g>");
        }
        "horns" => {
            for side in [-1.0, 1.0] {
                let hx = CX + side * p.face_w * 0.62;
                out.push_str(&format!(
                    "<path d=\"M {} {} Q {} {} {} {}\" fill=\"none\" stroke=\"{}\" stroke-width=\"4\" stroke-linecap=\"round\"/>",
                    num(hx),
                    num(top + 10.0),
                    num(hx + side * 10.0 * scale),
                    num(top - 8.0 * scale),
                    num(hx + side * 6.0 * scale),
                    num(top - 20.0 * scale),
                    pal.primary
                ));
            }
        }
        "crystal" => {
            out.push_str(&format!(
                "<g fill=\"{}\" stroke=\"{}\" stroke-width=\"1\" opacity=\"0.85\">",
                pal.secondary, pal.primary
            ));
            for (dx, h) in [(-0.35, 12.0), (0.0, 20.0), (0.35, 14.0)] {
                let kx = CX + dx * cw;
                let kh = h * scale;
                out.push_str(&format!(
                    "<polygon points=\"{},{} {},{} {},{} {},{}\"/>",
                    num(kx - 4.0),
                    num(top + 2.0),
                    num(kx),
                    num(top - kh),
                    num(kx + 4.0),
                    num(top + 2.0),
                    num(kx),
                    num(top + 6.0)
                ));
            }
            out.push_str("</g>");
        }
        "satellite" => {
            let sy = top - 14.0 * scale;
            out.push_str(&format!(
                "<line x1=\"{x}\" y1=\"{}\" x2=\"{x}\" y2=\"{}\" stroke=\"{c}\" stroke-width=\"1.8\"/><path d=\"M {} {sy} A {r} {r} 0 0 1 {} {sy}\" fill=\"none\" stroke=\"{c}\" stroke-width=\"2\"/>",
                num(top),
                num(sy),
                num(CX - 10.0 * scale),
                num(CX + 10.0 * scale),
                x = num(CX),
                c = pal.primary,
                sy = num(sy),
                r = num(10.0 * scale)
            ));
        }
        "twin_antenna" => {
            for side in [-1.0, 1.0] {
                let ax = CX + side * p.face_w * 0.45;
                out.push_str(&format!(
                    "<line x1=\"{x}\" y1=\"{}\" x2=\"{x2}\" y2=\"{}\" stroke=\"{}\" stroke-width=\"1.8\"/><circle cx=\"{x2}\" cy=\"{}\" r=\"{}\" fill=\"{}\"/>",
                    num(top + 4.0),
                    num(top - 14.0 * scale),
                    pal.primary,
                    num(top - 16.0 * scale),
                    num(2.2 * scale),
                    pal.accent,
                    x = num(ax),
                    x2 = num(ax + side * 6.0 * scale)
                ));
            }
        }
        "coil" => {
            out.push_str(&format!(
                "<polyline points=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"2\"/>",
                {
                    let mut pts = Vec::new();
                    for i in 0..=6 {
                        let y = top - f64::from(i) * 4.0 * scale;
                        let x = CX + if i % 2 == 0 { -6.0 } else { 6.0 } * scale;
                        pts.push(format!("{},{}", num(x), num(y)));
                    }
                    pts.join(" ")
                },
                pal.primary
            ));
        }
        "fin" => out.push_str(&format!(
            "<path d=\"M {} {} Q {} {} {} {} L {} {} Z\" fill=\"{}\" opacity=\"0.9\"/>",
            num(CX - cw * 0.3),
            num(top + 4.0),
            num(CX),
            num(top - 26.0 * scale),
            num(CX + cw * 0.3),
            num(top + 4.0),
            num(CX - cw * 0.3),
            num(top + 4.0),
            pal.secondary
        )),
        "plume" => {
            out.push_str(&format!("<g fill=\"{}\" opacity=\"0.8\">", pal.accent));
            for (dx, len) in [(-0.25, 14.0), (0.0, 22.0), (0.25, 14.0)] {
                out.push_str(&format!(
                    "<ellipse cx=\"{}\" cy=\"{}\" rx=\"{}\" ry=\"{}\" transform=\"rotate({} {} {})\"/>",
                    num(CX + dx * cw),
                    num(top - len * scale * 0.5),
                    num(3.5 * scale),
                    num(len * scale * 0.5),
                    num(dx * 40.0),
                    num(CX + dx * cw),
                    num(top - len * scale * 0.5)
                ));
            }
            out.push_str("</g>");
        }
        "arc" => out.push_str(&format!(
            "<path d=\"M {} {} A {r} {r} 0 0 1 {} {}\" fill=\"none\" stroke=\"{}\" stroke-width=\"2.5\"/>",
            num(CX - cw),
            num(top - 2.0),
            num(CX + cw),
            num(top - 2.0),
            pal.primary,
            r = num(cw)
        )),
        "prongs" => {
            out.push_str(&format!(
                "<g stroke=\"{}\" stroke-width=\"2.5\" stroke-linecap=\"round\">",
                pal.primary
            ));
            for i in 0..3 {
                let px = CX + (f64::from(i) - 1.0) * cw * 0.5;
                out.push_str(&format!(
                    "<line x1=\"{x}\" y1=\"{}\" x2=\"{x}\" y2=\"{}\"/>",
                    num(top + 2.0),
                    num(top - 14.0 * scale),
                    x = num(px)
                ));
            }
            out.push_str("</g>");
        }
        "rings" => {
            for (grow, width) in [(0.0, 2.5), (6.0, 1.2)] {
                out.push_str(&format!(
                    "<ellipse cx=\"{}\" cy=\"{}\" rx=\"{}\" ry=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\"/>",
                    num(CX),
                    num(top - 10.0 * scale),
                    num(cw * 0.5 + grow),
                    num(cw * 0.16 + grow * 0.4),
                    pal.primary,
                    num(width)
                ));
            }
        }
        _ => {}
    }
}
