//! SVG document composition.
//!
//! The document is a fixed 200×200 viewport whose subcomponents are
//! emitted in a frozen order: definitions, animations, background, aura,
//! the three behind-the-face crown variants, face shape, forehead mark,
//! eyes, cheeks, mouth, chin, side accessories, the remaining crown
//! variants, and the scan overlay. Reordering anything breaks byte
//! equality with sibling implementations.

mod aura;
mod background;
mod crown;
mod defs;
mod eyes;
mod face_shape;
mod marks;
mod mouth;
mod overlay;
mod side;

use crate::fmt::num;
use crate::params::FaceParams;
use crate::tables::{Palette, CROWN_STYLES, PALETTES};

/// Horizontal center of the face.
pub(crate) const CX: f64 = 100.0;
/// Vertical center of the face.
pub(crate) const CY: f64 = 105.0;
/// Edge length of the fixed viewport.
pub(crate) const VIEW: f64 = 200.0;

/// Everything a subcomponent needs to draw itself.
pub(crate) struct Ctx<'a> {
    pub params: &'a FaceParams,
    pub palette: &'a Palette,
    pub animated: bool,
}

/// Renders the complete document.
pub fn render_document(params: &FaceParams, size: u32, animated: bool) -> String {
    let palette = &PALETTES[params.palette];
    let ctx = Ctx {
        params,
        palette,
        animated,
    };

    let mut out = String::with_capacity(8 * 1024);
    out.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{size}\" height=\"{size}\" viewBox=\"0 0 {v} {v}\">",
        size = size,
        v = num(VIEW),
    ));

    defs::render(&ctx, &mut out);
    if animated {
        overlay::render_animations(&ctx, &mut out);
    }
    background::render(&ctx, &mut out);
    aura::render(&ctx, &mut out);
    if crown_is_behind_face(params.crown) {
        crown::render(&ctx, &mut out);
    }
    face_shape::render(&ctx, &mut out);
    marks::render_forehead(&ctx, &mut out);
    eyes::render(&ctx, &mut out);
    marks::render_cheeks(&ctx, &mut out);
    mouth::render(&ctx, &mut out);
    marks::render_chin(&ctx, &mut out);
    side::render(&ctx, &mut out);
    if !crown_is_behind_face(params.crown) {
        crown::render(&ctx, &mut out);
    }
    if animated {
        overlay::render_scan(&ctx, &mut out);
    }

    out.push_str("</svg>");
    out
}

/// `halo`, `flames`, and `data_cloud` draw behind the face; every other
/// crown draws in front.
fn crown_is_behind_face(crown: usize) -> bool {
    matches!(CROWN_STYLES[crown], "halo" | "flames" | "data_cloud")
}

/// A polygon's `points` attribute for `k` vertices on an ellipse, starting
/// at the top and proceeding clockwise.
pub(crate) fn ellipse_polygon_points(cx: f64, cy: f64, rx: f64, ry: f64, k: u32) -> String {
    let mut points = Vec::with_capacity(k as usize);
    for i in 0..k {
        let theta = -std::f64::consts::FRAC_PI_2 + (f64::from(i) / f64::from(k)) * std::f64::consts::TAU;
        let x = cx + rx * theta.cos();
        let y = cy + ry * theta.sin();
        points.push(format!("{},{}", num(x), num(y)));
    }
    points.join(" ")
}
