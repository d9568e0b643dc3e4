//! Forehead marks, cheek patterns, and chin features.
//!
//! The forehead `circuit` mark draws from the PRNG; the circuit seed is
//! installed immediately before drawing.

use super::{ellipse_polygon_points, Ctx, CX, CY};
use crate::fmt::num;
use crate::mt19937::Mt19937;
use crate::tables::{CHEEK_PATTERNS, CHIN_FEATURES, FOREHEAD_MARKS};

pub(crate) fn render_forehead(ctx: &Ctx<'_>, out: &mut String) {
    let p = ctx.params;
    let pal = ctx.palette;
    let fy = CY - p.face_h * 0.52;
    let s = 7.0 * p.mark_size;

    match FOREHEAD_MARKS[p.forehead] {
        "none" => {}
        "third_eye" => {
            out.push_str(&format!(
                "<ellipse cx=\"{}\" cy=\"{}\" rx=\"{}\" ry=\"{}\" fill=\"{}\"/><circle cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"{}\"/>",
                num(CX),
                num(fy),
                num(s),
                num(s * 0.55),
                pal.primary,
                num(CX),
                num(fy),
                num(s * 0.3),
                pal.accent
            ));
        }
        "circuit" => {
            let mut rng = Mt19937::new(u32::from(p.circuit_seed));
            out.push_str(&format!(
                "<g stroke=\"{}\" stroke-width=\"1\" fill=\"none\">",
                pal.accent
            ));
            for _ in 0..3 {
                let x0 = CX + rng.uniform(-s * 1.6, s * 1.6);
                let len = rng.uniform(s * 0.6, s * 1.4);
                let dir = if rng.random_double() < 0.5 { -1.0 } else { 1.0 };
                out.push_str(&format!(
                    "<polyline points=\"{},{} {},{} {},{}\"/><circle cx=\"{}\" cy=\"{}\" r=\"1.2\" fill=\"{}\" stroke=\"none\"/>",
                    num(x0),
                    num(fy - s * 0.5),
                    num(x0),
                    num(fy),
                    num(x0 + len * dir),
                    num(fy),
                    num(x0 + len * dir),
                    num(fy),
                    pal.accent
                ));
            }
            out.push_str("</g>");
        }
        "diamond" => out.push_str(&format!(
            "<polygon points=\"{}\" fill=\"{}\"/>",
            ellipse_polygon_points(CX, fy, s * 0.7, s, 4),
            pal.accent
        )),
        "bar" => out.push_str(&format!(
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" rx=\"1\" fill=\"{}\"/>",
            num(CX - s),
            num(fy - 1.5),
            num(s * 2.0),
            num(3.0),
            pal.accent
        )),
        "chevron" => out.push_str(&format!(
            "<polyline points=\"{},{} {},{} {},{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"2\"/>",
            num(CX - s),
            num(fy + s * 0.4),
            num(CX),
            num(fy - s * 0.4),
            num(CX + s),
            num(fy + s * 0.4),
            pal.accent
        )),
        "dot_matrix" => {
            out.push_str(&format!("<g fill=\"{}\">", pal.accent));
            for row in 0..2 {
                for col in 0..3 {
                    let x = CX + (f64::from(col) - 1.0) * s * 0.8;
                    let y = fy + (f64::from(row) - 0.5) * s * 0.8;
                    out.push_str(&format!(
                        "<circle cx=\"{}\" cy=\"{}\" r=\"{}\"/>",
                        num(x),
                        num(y),
                        num(s * 0.18)
                    ));
                }
            }
            out.push_str("</g>");
        }
        "crescent" => out.push_str(&format!(
            "<path d=\"M {l} {y} A {r} {r} 0 0 1 {rr} {y} A {r2} {r2} 0 0 0 {l} {y} Z\" fill=\"{}\"/>",
            pal.accent,
            l = num(CX - s),
            rr = num(CX + s),
            y = num(fy),
            r = num(s),
            r2 = num(s * 1.5)
        )),
        "triangle" => out.push_str(&format!(
            "<polygon points=\"{},{} {},{} {},{}\" fill=\"{}\"/>",
            num(CX),
            num(fy - s),
            num(CX + s * 0.85),
            num(fy + s * 0.6),
            num(CX - s * 0.85),
            num(fy + s * 0.6),
            pal.accent
        )),
        "cross" => out.push_str(&format!(
            "<g stroke=\"{}\" stroke-width=\"2\"><line x1=\"{}\" y1=\"{y}\" x2=\"{}\" y2=\"{y}\"/><line x1=\"{x}\" y1=\"{}\" x2=\"{x}\" y2=\"{}\"/></g>",
            pal.accent,
            num(CX - s),
            num(CX + s),
            num(fy - s),
            num(fy + s),
            y = num(fy),
            x = num(CX)
        )),
        "wave" => out.push_str(&format!(
            "<path d=\"M {} {y} Q {} {} {} {y} Q {} {} {} {y}\" fill=\"none\" stroke=\"{}\" stroke-width=\"2\"/>",
            num(CX - s),
            num(CX - s * 0.5),
            num(fy - s * 0.5),
            num(CX),
            num(CX + s * 0.5),
            num(fy + s * 0.5),
            num(CX + s),
            pal.accent,
            y = num(fy)
        )),
        "rune" => out.push_str(&format!(
            "<polyline points=\"{},{} {},{} {},{} {},{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"1.8\"/>",
            num(CX - s * 0.5),
            num(fy - s),
            num(CX + s * 0.5),
            num(fy - s * 0.3),
            num(CX - s * 0.5),
            num(fy + s * 0.3),
            num(CX + s * 0.5),
            num(fy + s),
            pal.accent
        )),
        _ => {}
    }
}

pub(crate) fn render_cheeks(ctx: &Ctx<'_>, out: &mut String) {
    let p = ctx.params;
    let pal = ctx.palette;
    let chy = CY + p.face_h * 0.12;
    let offset = p.face_w * 0.62;

    for side in [-1.0, 1.0] {
        let chx = CX + side * offset;
        match CHEEK_PATTERNS[p.cheek] {
            "none" => {}
            "blush" => out.push_str(&format!(
                "<ellipse cx=\"{}\" cy=\"{}\" rx=\"7\" ry=\"4\" fill=\"{}\" opacity=\"0.4\"/>",
                num(chx),
                num(chy),
                pal.glow
            )),
            "circuit_lines" => {
                out.push_str(&format!(
                    "<g stroke=\"{}\" stroke-width=\"1\" fill=\"none\" opacity=\"0.8\">",
                    pal.accent
                ));
                for i in 0..2 {
                    let y = chy + f64::from(i) * 3.5;
                    out.push_str(&format!(
                        "<polyline points=\"{},{} {},{} {},{}\"/>",
                        num(chx - side * 5.0),
                        num(y),
                        num(chx + side * 2.0),
                        num(y),
                        num(chx + side * 5.0),
                        num(y + 2.5)
                    ));
                }
                out.push_str("</g>");
            }
            "dots" => {
                out.push_str(&format!("<g fill=\"{}\">", pal.accent));
                for i in 0..3 {
                    out.push_str(&format!(
                        "<circle cx=\"{}\" cy=\"{}\" r=\"1.3\"/>",
                        num(chx + side * f64::from(i) * 3.0 * -1.0),
                        num(chy + f64::from(i) * 2.0)
                    ));
                }
                out.push_str("</g>");
            }
            "slashes" => {
                out.push_str(&format!(
                    "<g stroke=\"{}\" stroke-width=\"1.6\">",
                    pal.accent
                ));
                for i in 0..2 {
                    let x = chx + f64::from(i) * 4.0 * -side;
                    out.push_str(&format!(
                        "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\"/>",
                        num(x),
                        num(chy - 4.0),
                        num(x - side * 3.0),
                        num(chy + 4.0)
                    ));
                }
                out.push_str("</g>");
            }
            "hex_tiles" => {
                for i in 0..2 {
                    out.push_str(&format!(
                        "<polygon points=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"1\"/>",
                        ellipse_polygon_points(
                            chx - side * f64::from(i) * 5.5,
                            chy + f64::from(i) * 2.0,
                            3.0,
                            3.0,
                            6
                        ),
                        pal.accent
                    ));
                }
            }
            "gills" => {
                out.push_str(&format!(
                    "<g fill=\"none\" stroke=\"{}\" stroke-width=\"1.4\">",
                    pal.primary
                ));
                for i in 0..3 {
                    let x = chx + f64::from(i) * 3.0 * -side;
                    out.push_str(&format!(
                        "<path d=\"M {x} {} Q {} {} {x} {}\"/>",
                        num(chy - 4.0),
                        num(x - side * 2.5),
                        num(chy),
                        num(chy + 4.0),
                        x = num(x)
                    ));
                }
                out.push_str("</g>");
            }
            "freckles" => {
                out.push_str(&format!("<g fill=\"{}\" opacity=\"0.7\">", pal.secondary));
                for (dx, dy) in [(-2.0, -2.0), (2.5, -1.0), (-1.0, 2.0), (3.0, 2.5)] {
                    out.push_str(&format!(
                        "<circle cx=\"{}\" cy=\"{}\" r=\"0.9\"/>",
                        num(chx + dx),
                        num(chy + dy)
                    ));
                }
                out.push_str("</g>");
            }
            "bars" => {
                for i in 0..2 {
                    out.push_str(&format!(
                        "<rect x=\"{}\" y=\"{}\" width=\"6\" height=\"2\" fill=\"{}\"/>",
                        num(chx - 3.0),
                        num(chy + f64::from(i) * 4.0),
                        pal.accent
                    ));
                }
            }
            "swirls" => out.push_str(&format!(
                "<path d=\"M {} {} A 4 4 0 1 1 {} {} A 2 2 0 1 0 {} {}\" fill=\"none\" stroke=\"{}\" stroke-width=\"1.3\"/>",
                num(chx - 4.0),
                num(chy),
                num(chx + 4.0),
                num(chy),
                num(chx),
                num(chy),
                pal.accent
            )),
            _ => {}
        }
    }
}

pub(crate) fn render_chin(ctx: &Ctx<'_>, out: &mut String) {
    let p = ctx.params;
    let pal = ctx.palette;
    let cy2 = CY + p.face_h * 0.68;

    match CHIN_FEATURES[p.chin] {
        "none" => {}
        "stud" => out.push_str(&format!(
            "<circle cx=\"{}\" cy=\"{}\" r=\"2.4\" fill=\"{}\"/>",
            num(CX),
            num(cy2),
            pal.accent
        )),
        "cleft" => out.push_str(&format!(
            "<line x1=\"{x}\" y1=\"{}\" x2=\"{x}\" y2=\"{}\" stroke=\"{}\" stroke-width=\"1.8\"/>",
            num(cy2 - 4.0),
            num(cy2 + 2.0),
            pal.primary,
            x = num(CX)
        )),
        "plate" => out.push_str(&format!(
            "<rect x=\"{}\" y=\"{}\" width=\"16\" height=\"5\" rx=\"2\" fill=\"{}\" opacity=\"0.8\"/>",
            num(CX - 8.0),
            num(cy2 - 2.5),
            pal.secondary
        )),
        "spike" => out.push_str(&format!(
            "<polygon points=\"{},{} {},{} {},{}\" fill=\"{}\"/>",
            num(CX - 3.5),
            num(cy2 - 2.0),
            num(CX + 3.5),
            num(cy2 - 2.0),
            num(CX),
            num(cy2 + 7.0),
            pal.primary
        )),
        "ring" => out.push_str(&format!(
            "<circle cx=\"{}\" cy=\"{}\" r=\"3\" fill=\"none\" stroke=\"{}\" stroke-width=\"1.5\"/>",
            num(CX),
            num(cy2 + 1.0),
            pal.accent
        )),
        "beard_line" => out.push_str(&format!(
            "<path d=\"M {} {} Q {} {} {} {}\" fill=\"none\" stroke=\"{}\" stroke-width=\"2\"/>",
            num(CX - 10.0),
            num(cy2 - 3.0),
            num(CX),
            num(cy2 + 4.0),
            num(CX + 10.0),
            num(cy2 - 3.0),
            pal.primary
        )),
        "vent" => {
            for i in 0..3 {
                out.push_str(&format!(
                    "<rect x=\"{}\" y=\"{}\" width=\"2\" height=\"5\" fill=\"{}\"/>",
                    num(CX - 5.0 + f64::from(i) * 4.0),
                    num(cy2 - 2.5),
                    pal.secondary
                ));
            }
        }
        _ => {}
    }
}
