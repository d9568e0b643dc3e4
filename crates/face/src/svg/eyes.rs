//! Eyes: sixteen styles modulated by eight expressions.
//!
//! Each eye draws at its own origin inside a transform group; the
//! expression only changes the group transform, so style geometry stays
//! identical across expressions.

use super::{Ctx, CX, CY};
use crate::fmt::num;
use crate::tables::{EYE_EXPRESSIONS, EYE_STYLES};

/// Per-eye placement adjustments derived from the expression.
struct EyePose {
    scale_x: f64,
    scale_y: f64,
    rotate: f64,
    dy: f64,
}

fn pose(expr: &str, is_left: bool) -> EyePose {
    let side = if is_left { 1.0 } else { -1.0 };
    match expr {
        "wide" => EyePose { scale_x: 1.2, scale_y: 1.25, rotate: 0.0, dy: 0.0 },
        "narrow" => EyePose { scale_x: 1.0, scale_y: 0.55, rotate: 0.0, dy: 0.0 },
        "upturned" => EyePose { scale_x: 1.0, scale_y: 1.0, rotate: -8.0 * side, dy: 0.0 },
        "downturned" => EyePose { scale_x: 1.0, scale_y: 1.0, rotate: 8.0 * side, dy: 0.0 },
        "asymmetric" => {
            if is_left {
                EyePose { scale_x: 0.85, scale_y: 0.85, rotate: 0.0, dy: 1.5 }
            } else {
                EyePose { scale_x: 1.15, scale_y: 1.15, rotate: 0.0, dy: -1.5 }
            }
        }
        "focused" => EyePose { scale_x: 0.9, scale_y: 0.75, rotate: -4.0 * side, dy: 0.0 },
        "sleepy" => EyePose { scale_x: 1.0, scale_y: 0.45, rotate: 0.0, dy: 2.0 },
        _ => EyePose { scale_x: 1.0, scale_y: 1.0, rotate: 0.0, dy: 0.0 }, // neutral
    }
}

pub(crate) fn render(ctx: &Ctx<'_>, out: &mut String) {
    let p = ctx.params;
    let ey = CY - p.face_h * 0.15;
    let expr = EYE_EXPRESSIONS[p.eye_expr];

    for is_left in [true, false] {
        let ex = if is_left { CX - p.eye_spacing } else { CX + p.eye_spacing };
        let pose = pose(expr, is_left);
        out.push_str(&format!(
            "<g transform=\"translate({} {}) rotate({}) scale({} {})\">",
            num(ex),
            num(ey + pose.dy),
            num(pose.rotate),
            num(pose.scale_x),
            num(pose.scale_y)
        ));
        render_style(ctx, out);
        out.push_str("</g>");
    }
}

/// Draws one eye at the origin with size `eye_size`.
fn render_style(ctx: &Ctx<'_>, out: &mut String) {
    let p = ctx.params;
    let pal = ctx.palette;
    let s = p.eye_size;
    let half = s / 2.0;

    match EYE_STYLES[p.eye_style] {
        "round" => {
            out.push_str(&format!(
                "<circle cx=\"0\" cy=\"0\" r=\"{}\" fill=\"{}\"/><circle cx=\"0\" cy=\"0\" r=\"{}\" fill=\"{}\"/>",
                num(half),
                pal.primary,
                num(s / 6.0),
                pal.accent
            ));
        }
        "almond" => {
            out.push_str(&format!(
                "<ellipse cx=\"0\" cy=\"0\" rx=\"{}\" ry=\"{}\" fill=\"{}\"/><circle cx=\"0\" cy=\"0\" r=\"{}\" fill=\"{}\"/>",
                num(s * 0.62),
                num(s * 0.35),
                pal.primary,
                num(s / 7.0),
                pal.accent
            ));
        }
        "slit" => {
            out.push_str(&format!(
                "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" rx=\"{}\" fill=\"{}\"/>",
                num(-half),
                num(-s * 0.09),
                num(s),
                num(s * 0.18),
                num(s * 0.09),
                pal.primary
            ));
        }
        "hexagon" => {
            out.push_str(&format!(
                "<polygon points=\"{}\" fill=\"{}\"/>",
                super::ellipse_polygon_points(0.0, 0.0, half, half, 6),
                pal.primary
            ));
        }
        "ring" => {
            out.push_str(&format!(
                "<circle cx=\"0\" cy=\"0\" r=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\"/><circle cx=\"0\" cy=\"0\" r=\"{}\" fill=\"{}\"/>",
                num(half),
                pal.primary,
                num(s * 0.16),
                num(s * 0.12),
                pal.accent
            ));
        }
        "cross" => {
            let arm = num(s * 0.14);
            out.push_str(&format!(
                "<rect x=\"{}\" y=\"-{a}\" width=\"{}\" height=\"{d}\" fill=\"{c}\"/><rect x=\"-{a}\" y=\"{}\" width=\"{d}\" height=\"{}\" fill=\"{c}\"/>",
                num(-half),
                num(s),
                num(-half),
                num(s),
                a = arm,
                d = num(s * 0.28),
                c = pal.primary
            ));
        }
        "star" => {
            // Four-point star: outer points on the axes, inner points on
            // the diagonals.
            let inner = half * 0.38;
            let k = inner * std::f64::consts::FRAC_1_SQRT_2;
            out.push_str(&format!(
                "<polygon points=\"0,{t} {k},{mk} {r},0 {k},{k} 0,{b} {mk2},{k} {l},0 {mk2},{mk}\" fill=\"{}\"/>",
                pal.primary,
                t = num(-half),
                b = num(half),
                l = num(-half),
                r = num(half),
                k = num(k),
                mk = num(-k),
                mk2 = num(-k)
            ));
        }
        "bracket" => {
            out.push_str(&format!(
                "<path d=\"M {i} {t} L {o} {t} L {o} {b} L {i} {b}\" fill=\"none\" stroke=\"{c}\" stroke-width=\"{w}\"/><path d=\"M {mi} {t} L {mo} {t} L {mo} {b} L {mi} {b}\" fill=\"none\" stroke=\"{c}\" stroke-width=\"{w}\"/>",
                i = num(-half * 0.2),
                o = num(-half),
                mi = num(half * 0.2),
                mo = num(half),
                t = num(-half * 0.8),
                b = num(half * 0.8),
                c = pal.primary,
                w = num(s * 0.12)
            ));
        }
        "visor" => {
            out.push_str(&format!(
                "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" rx=\"{}\" fill=\"{}\" opacity=\"0.85\"/>",
                num(-s * 0.8),
                num(-s * 0.28),
                num(s * 1.6),
                num(s * 0.56),
                num(s * 0.2),
                pal.primary
            ));
        }
        "pixel" => {
            let u = s * 0.3;
            out.push_str(&format!("<g fill=\"{}\">", pal.primary));
            for (gx, gy) in [(-1.0, -1.0), (0.0, -1.0), (-1.0, 0.0), (0.0, 0.0)] {
                out.push_str(&format!(
                    "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"/>",
                    num(gx * u + u * 0.05),
                    num(gy * u + u * 0.05),
                    num(u * 0.9),
                    num(u * 0.9)
                ));
            }
            out.push_str("</g>");
        }
        "spiral" => {
            out.push_str(&format!(
                "<g fill=\"none\" stroke=\"{}\" stroke-width=\"{}\">",
                pal.primary,
                num(s * 0.1)
            ));
            for (r, o) in [(half, 1.0), (half * 0.62, 0.8), (half * 0.3, 0.6)] {
                out.push_str(&format!(
                    "<circle cx=\"0\" cy=\"0\" r=\"{}\" opacity=\"{}\"/>",
                    num(r),
                    num(o)
                ));
            }
            out.push_str("</g>");
        }
        "diamond" => {
            out.push_str(&format!(
                "<polygon points=\"0,{} {},0 0,{} {},0\" fill=\"{}\"/>",
                num(-half),
                num(half),
                num(half),
                num(-half),
                pal.primary
            ));
        }
        "half_moon" => {
            out.push_str(&format!(
                "<path d=\"M {l} 0 A {r} {r} 0 0 1 {rr} 0 Z\" fill=\"{}\"/>",
                pal.primary,
                l = num(-half),
                r = num(half),
                rr = num(half)
            ));
        }
        "triangle" => {
            out.push_str(&format!(
                "<polygon points=\"0,{} {},{} {},{}\" fill=\"{}\"/>",
                num(-half),
                num(half),
                num(half * 0.7),
                num(-half),
                num(half * 0.7),
                pal.primary
            ));
        }
        "bar" => {
            out.push_str(&format!(
                "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\"/>",
                num(-s * 0.12),
                num(-half),
                num(s * 0.24),
                num(s),
                pal.primary
            ));
        }
        "orb" => {
            out.push_str(&format!(
                "<circle cx=\"0\" cy=\"0\" r=\"{}\" fill=\"url(#sg-orb)\"/>",
                num(half)
            ));
        }
        _ => {}
    }
}
