//! The face outline.

use super::{ellipse_polygon_points, Ctx, CX, CY};
use crate::fmt::num;
use crate::tables::FACE_SHAPES;

pub(crate) fn render(ctx: &Ctx<'_>, out: &mut String) {
    let p = ctx.params;
    let pal = ctx.palette;
    let (w, h) = (p.face_w, p.face_h);
    let style = format!(
        "fill=\"{}\" fill-opacity=\"0.22\" stroke=\"{}\" stroke-width=\"2.5\"",
        pal.secondary, pal.primary
    );

    match FACE_SHAPES[p.face_shape] {
        "ellipse" => out.push_str(&format!(
            "<ellipse cx=\"{}\" cy=\"{}\" rx=\"{}\" ry=\"{}\" {}/>",
            num(CX),
            num(CY),
            num(w),
            num(h),
            style
        )),
        "circle" => out.push_str(&format!(
            "<circle cx=\"{}\" cy=\"{}\" r=\"{}\" {}/>",
            num(CX),
            num(CY),
            num((w + h) / 2.0),
            style
        )),
        "hexagon" => out.push_str(&format!(
            "<polygon points=\"{}\" {}/>",
            ellipse_polygon_points(CX, CY, w, h, 6),
            style
        )),
        "octagon" => out.push_str(&format!(
            "<polygon points=\"{}\" {}/>",
            ellipse_polygon_points(CX, CY, w, h, 8),
            style
        )),
        "squircle" => out.push_str(&format!(
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" rx=\"{}\" {}/>",
            num(CX - w),
            num(CY - h),
            num(w * 2.0),
            num(h * 2.0),
            num(w * 0.55),
            style
        )),
        "diamond" => out.push_str(&format!(
            "<polygon points=\"{}\" {}/>",
            ellipse_polygon_points(CX, CY, w, h, 4),
            style
        )),
        "shield" => {
            // Flat shoulders, curved flanks, pointed chin.
            out.push_str(&format!(
                "<path d=\"M {x0} {yt} L {x1} {yt} Q {x1b} {ym} {cx} {yb} Q {x0b} {ym} {x0} {yt} Z\" {s}/>",
                x0 = num(CX - w),
                x1 = num(CX + w),
                x0b = num(CX - w),
                x1b = num(CX + w),
                yt = num(CY - h),
                ym = num(CY + h * 0.35),
                yb = num(CY + h),
                cx = num(CX),
                s = style
            ));
        }
        "capsule" => out.push_str(&format!(
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" rx=\"{}\" {}/>",
            num(CX - w),
            num(CY - h),
            num(w * 2.0),
            num(h * 2.0),
            num(w),
            style
        )),
        "teardrop" => {
            out.push_str(&format!(
                "<path d=\"M {cx} {yt} Q {x1} {yq} {x1} {ym} Q {x1} {yb} {cx} {yb} Q {x0} {yb} {x0} {ym} Q {x0} {yq} {cx} {yt} Z\" {s}/>",
                cx = num(CX),
                x0 = num(CX - w),
                x1 = num(CX + w),
                yt = num(CY - h),
                yq = num(CY - h * 0.2),
                ym = num(CY + h * 0.25),
                yb = num(CY + h),
                s = style
            ));
        }
        "trapezoid" => out.push_str(&format!(
            "<polygon points=\"{},{} {},{} {},{} {},{}\" {}/>",
            num(CX - w * 0.7),
            num(CY - h),
            num(CX + w * 0.7),
            num(CY - h),
            num(CX + w),
            num(CY + h),
            num(CX - w),
            num(CY + h),
            style
        )),
        "heptagon" => out.push_str(&format!(
            "<polygon points=\"{}\" {}/>",
            ellipse_polygon_points(CX, CY, w, h, 7),
            style
        )),
        "rounded_square" => out.push_str(&format!(
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" rx=\"12\" {}/>",
            num(CX - w),
            num(CY - h),
            num(w * 2.0),
            num(h * 2.0),
            style
        )),
        _ => {}
    }
}
