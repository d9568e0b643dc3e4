//! Side accessories, mirrored on both flanks of the face.

use super::{Ctx, CX, CY};
use crate::fmt::num;
use crate::tables::SIDE_ACCESSORIES;

pub(crate) fn render(ctx: &Ctx<'_>, out: &mut String) {
    let p = ctx.params;
    let pal = ctx.palette;
    let scale = p.accessory_size;
    let offset = p.face_w + 6.0;

    for side in [-1.0, 1.0] {
        let ax = CX + side * offset;
        match SIDE_ACCESSORIES[p.side] {
            "none" => {}
            "bolts" => out.push_str(&format!(
                "<circle cx=\"{x}\" cy=\"{y}\" r=\"{r}\" fill=\"{}\"/><line x1=\"{x}\" y1=\"{}\" x2=\"{x}\" y2=\"{}\" stroke=\"{}\" stroke-width=\"1.2\"/>",
                pal.secondary,
                num(CY - 2.0 * scale),
                num(CY + 2.0 * scale),
                pal.primary,
                x = num(ax),
                y = num(CY),
                r = num(4.0 * scale)
            )),
            "fins" => out.push_str(&format!(
                "<polygon points=\"{},{} {},{} {},{}\" fill=\"{}\" opacity=\"0.85\"/>",
                num(ax - side * 4.0),
                num(CY - 10.0 * scale),
                num(ax + side * 8.0 * scale),
                num(CY),
                num(ax - side * 4.0),
                num(CY + 10.0 * scale),
                pal.secondary
            )),
            "wires" => {
                out.push_str(&format!(
                    "<g fill=\"none\" stroke=\"{}\" stroke-width=\"1.2\">",
                    pal.accent
                ));
                for i in 0..3 {
                    let y0 = CY - 6.0 + f64::from(i) * 6.0;
                    out.push_str(&format!(
                        "<path d=\"M {} {y0} Q {} {} {} {}\"/>",
                        num(ax - side * 2.0),
                        num(ax + side * 8.0 * scale),
                        num(y0 + 3.0),
                        num(ax + side * 6.0 * scale),
                        num(y0 + 12.0 * scale),
                        y0 = num(y0)
                    ));
                }
                out.push_str("</g>");
            }
            "discs" => {
                for (r, o) in [(5.0, 0.9), (2.2, 1.0)] {
                    out.push_str(&format!(
                        "<circle cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"1.4\" opacity=\"{}\"/>",
                        num(ax),
                        num(CY),
                        num(r * scale),
                        pal.primary,
                        num(o)
                    ));
                }
            }
            "vents" => {
                for i in 0..3 {
                    out.push_str(&format!(
                        "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"2\" fill=\"{}\"/>",
                        num(ax - 3.0 * scale),
                        num(CY - 5.0 + f64::from(i) * 5.0),
                        num(6.0 * scale),
                        pal.secondary
                    ));
                }
            }
            "wings" => out.push_str(&format!(
                "<path d=\"M {} {} Q {} {} {} {} Q {} {} {} {} Z\" fill=\"{}\" opacity=\"0.7\"/>",
                num(ax),
                num(CY - 4.0),
                num(ax + side * 16.0 * scale),
                num(CY - 14.0 * scale),
                num(ax + side * 20.0 * scale),
                num(CY),
                num(ax + side * 14.0 * scale),
                num(CY + 8.0 * scale),
                num(ax),
                num(CY + 4.0),
                pal.glow
            )),
            "cables" => {
                out.push_str(&format!(
                    "<g fill=\"none\" stroke=\"{}\" stroke-width=\"1.6\">",
                    pal.secondary
                ));
                for i in 0..2 {
                    let y0 = CY - 3.0 + f64::from(i) * 7.0;
                    out.push_str(&format!(
                        "<path d=\"M {} {y0} C {} {} {} {} {} {}\"/>",
                        num(ax),
                        num(ax + side * 10.0 * scale),
                        num(y0 + 2.0),
                        num(ax + side * 8.0 * scale),
                        num(y0 + 14.0),
                        num(ax + side * 12.0 * scale),
                        num(y0 + 20.0),
                        y0 = num(y0)
                    ));
                }
                out.push_str("</g>");
            }
            "plates" => {
                for i in 0..2 {
                    out.push_str(&format!(
                        "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" rx=\"1.5\" fill=\"{}\" opacity=\"0.85\"/>",
                        num(ax - 2.5 * scale),
                        num(CY - 8.0 + f64::from(i) * 9.0),
                        num(5.0 * scale),
                        num(7.0 * scale),
                        pal.secondary
                    ));
                }
            }
            "spikes" => {
                out.push_str(&format!("<g fill=\"{}\">", pal.primary));
                for i in 0..3 {
                    let y0 = CY - 8.0 + f64::from(i) * 8.0;
                    out.push_str(&format!(
                        "<polygon points=\"{},{} {},{} {},{}\"/>",
                        num(ax - side * 1.5),
                        num(y0 - 3.0),
                        num(ax - side * 1.5),
                        num(y0 + 3.0),
                        num(ax + side * 7.0 * scale),
                        num(y0)
                    ));
                }
                out.push_str("</g>");
            }
            _ => {}
        }
    }
}
