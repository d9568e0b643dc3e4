//! Mouth: fourteen styles.

use super::{Ctx, CX, CY};
use crate::fmt::num;
use crate::tables::MOUTH_STYLES;

pub(crate) fn render(ctx: &Ctx<'_>, out: &mut String) {
    let p = ctx.params;
    let pal = ctx.palette;
    let my = CY + p.face_h * 0.38;
    let hw = p.mouth_w / 2.0;
    let stroke = format!(
        "fill=\"none\" stroke=\"{}\" stroke-width=\"2.2\" stroke-linecap=\"round\"",
        pal.primary
    );

    match MOUTH_STYLES[p.mouth] {
        "line" => out.push_str(&format!(
            "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" {}/>",
            num(CX - hw),
            num(my),
            num(CX + hw),
            num(my),
            stroke
        )),
        "smile" => out.push_str(&format!(
            "<path d=\"M {} {} Q {} {} {} {}\" {}/>",
            num(CX - hw),
            num(my),
            num(CX),
            num(my + hw * 0.6),
            num(CX + hw),
            num(my),
            stroke
        )),
        "frown" => out.push_str(&format!(
            "<path d=\"M {} {} Q {} {} {} {}\" {}/>",
            num(CX - hw),
            num(my),
            num(CX),
            num(my - hw * 0.6),
            num(CX + hw),
            num(my),
            stroke
        )),
        "open" => out.push_str(&format!(
            "<ellipse cx=\"{}\" cy=\"{}\" rx=\"{}\" ry=\"{}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"2\"/>",
            num(CX),
            num(my),
            num(hw * 0.6),
            num(hw * 0.45),
            pal.accent,
            pal.primary
        )),
        "zigzag" => {
            let step = p.mouth_w / 4.0;
            out.push_str(&format!(
                "<polyline points=\"{},{} {},{} {},{} {},{} {},{}\" {}/>",
                num(CX - hw),
                num(my),
                num(CX - hw + step),
                num(my - 4.0),
                num(CX),
                num(my),
                num(CX + hw - step),
                num(my - 4.0),
                num(CX + hw),
                num(my),
                stroke
            ));
        }
        "dot" => out.push_str(&format!(
            "<circle cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"{}\"/>",
            num(CX),
            num(my),
            num(p.mouth_w * 0.12),
            pal.primary
        )),
        "square" => out.push_str(&format!(
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\" opacity=\"0.9\"/>",
            num(CX - hw * 0.6),
            num(my - 3.0),
            num(p.mouth_w * 0.6),
            num(6.0),
            pal.primary
        )),
        "wave" => out.push_str(&format!(
            "<path d=\"M {} {} Q {} {} {} {} Q {} {} {} {}\" {}/>",
            num(CX - hw),
            num(my),
            num(CX - hw / 2.0),
            num(my - 5.0),
            num(CX),
            num(my),
            num(CX + hw / 2.0),
            num(my + 5.0),
            num(CX + hw),
            num(my),
            stroke
        )),
        "grill" => {
            out.push_str(&format!(
                "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"8\" rx=\"2\" fill=\"none\" stroke=\"{}\" stroke-width=\"1.8\"/>",
                num(CX - hw),
                num(my - 4.0),
                num(p.mouth_w),
                pal.primary
            ));
            let slats = 4;
            for i in 1..slats {
                let x = CX - hw + p.mouth_w * f64::from(i) / f64::from(slats);
                out.push_str(&format!(
                    "<line x1=\"{x}\" y1=\"{}\" x2=\"{x}\" y2=\"{}\" stroke=\"{}\" stroke-width=\"1.2\"/>",
                    num(my - 4.0),
                    num(my + 4.0),
                    pal.primary,
                    x = num(x)
                ));
            }
        }
        "smirk" => out.push_str(&format!(
            "<path d=\"M {} {} Q {} {} {} {}\" {}/>",
            num(CX - hw),
            num(my + 2.0),
            num(CX + hw * 0.2),
            num(my + hw * 0.5),
            num(CX + hw),
            num(my - 3.0),
            stroke
        )),
        "pout" => out.push_str(&format!(
            "<ellipse cx=\"{}\" cy=\"{}\" rx=\"{}\" ry=\"{}\" fill=\"{}\"/>",
            num(CX),
            num(my),
            num(hw * 0.45),
            num(hw * 0.3),
            pal.primary
        )),
        "diamond" => out.push_str(&format!(
            "<polygon points=\"{},{} {},{} {},{} {},{}\" fill=\"{}\"/>",
            num(CX),
            num(my - 5.0),
            num(CX + hw * 0.5),
            num(my),
            num(CX),
            num(my + 5.0),
            num(CX - hw * 0.5),
            num(my),
            pal.primary
        )),
        "double_line" => {
            for dy in [-2.0, 2.0] {
                out.push_str(&format!(
                    "<line x1=\"{}\" y1=\"{y}\" x2=\"{}\" y2=\"{y}\" {}/>",
                    num(CX - hw),
                    num(CX + hw),
                    stroke,
                    y = num(my + dy)
                ));
            }
        }
        "crescent" => out.push_str(&format!(
            "<path d=\"M {l} {y} A {r1} {r1} 0 0 0 {rr} {y} A {r2} {r2} 0 0 1 {l} {y} Z\" fill=\"{}\"/>",
            pal.primary,
            l = num(CX - hw),
            rr = num(CX + hw),
            y = num(my),
            r1 = num(hw),
            r2 = num(hw * 1.6)
        )),
        _ => {}
    }
}
