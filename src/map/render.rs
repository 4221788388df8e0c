// Canvas 2D rendering of a MapSurface.
use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::{CirclePaint, LayerSource, LinePaint, MapSurface, Paint};
use crate::counter::LensPolygon;
use crate::features::FeatureSet;
use crate::map::LayerFilter;
use crate::state::Camera;

const BACKGROUND: &str = "#e9e6df";

pub fn draw_surface(ctx: &CanvasRenderingContext2d, surface: &MapSurface) {
    let cam = &surface.camera;
    ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0).ok();
    ctx.set_global_alpha(1.0);
    ctx.set_fill_style_str(BACKGROUND);
    ctx.fill_rect(0.0, 0.0, cam.width, cam.height);
    for layer in surface.layers() {
        if !layer.visible {
            continue;
        }
        match (&layer.source, &layer.paint) {
            (LayerSource::Points(dataset), Paint::Circle(paint)) => {
                if let Some(set) = surface.source(*dataset) {
                    draw_circles(ctx, cam, set, &layer.filter, paint);
                }
            }
            (LayerSource::LensOutline, Paint::Line(paint)) => {
                if let Some(outline) = surface.outline() {
                    draw_outline(ctx, cam, outline, paint);
                }
            }
            _ => {}
        }
    }
}

fn draw_circles(
    ctx: &CanvasRenderingContext2d,
    cam: &Camera,
    set: &FeatureSet,
    filter: &LayerFilter,
    paint: &CirclePaint,
) {
    if matches!(filter, LayerFilter::Nothing) {
        return;
    }
    let reach = paint.radius + paint.stroke_width;
    ctx.set_global_alpha(paint.opacity);
    ctx.set_fill_style_str(&paint.color);
    ctx.set_stroke_style_str(&paint.stroke_color);
    ctx.set_line_width(paint.stroke_width);
    for feature in set.iter() {
        let p = cam.project(feature.coord);
        // off-canvas points are skipped before the (costlier) filter test
        if p.x < -reach || p.y < -reach || p.x > cam.width + reach || p.y > cam.height + reach {
            continue;
        }
        if !filter.matches(feature.coord) {
            continue;
        }
        ctx.begin_path();
        ctx.arc(p.x, p.y, paint.radius, 0.0, std::f64::consts::PI * 2.0).ok();
        ctx.fill();
        if paint.stroke_width > 0.0 {
            ctx.stroke();
        }
    }
    ctx.set_global_alpha(1.0);
}

fn draw_outline(ctx: &CanvasRenderingContext2d, cam: &Camera, outline: &LensPolygon, paint: &LinePaint) {
    let dash = js_sys::Array::of2(
        &JsValue::from_f64(paint.dash[0] * paint.width),
        &JsValue::from_f64(paint.dash[1] * paint.width),
    );
    ctx.set_line_dash(&dash).ok();
    ctx.set_stroke_style_str(&paint.color);
    ctx.set_line_width(paint.width);
    ctx.begin_path();
    for (i, c) in outline.ring().iter().enumerate() {
        let p = cam.project(*c);
        if i == 0 {
            ctx.move_to(p.x, p.y);
        } else {
            ctx.line_to(p.x, p.y);
        }
    }
    ctx.stroke();
    ctx.set_line_dash(&js_sys::Array::new()).ok();
}
