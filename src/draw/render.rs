//! Cairo-based rendering functions for shapes.

use super::color::Color;
use super::font::FontDescriptor;
use super::shape::Shape;
use crate::util::{self, Point};

/// Fills the whole canvas with a solid color.
///
/// Should be called after clearing the canvas but before rendering the
/// background image and shapes.
pub fn render_canvas_color(ctx: &cairo::Context, color: Color) {
    let _ = ctx.save();
    ctx.set_operator(cairo::Operator::Source);
    set_source(ctx, color);
    let _ = ctx.paint(); // If paint fails the canvas simply stays transparent
    let _ = ctx.restore();
}

/// Paints an image surface anchored at the canvas origin with a uniform scale.
pub fn render_background_image(
    ctx: &cairo::Context,
    image: &cairo::ImageSurface,
    scale: f64,
) -> Result<(), cairo::Error> {
    ctx.save()?;
    ctx.scale(scale, scale);
    ctx.set_source_surface(image, 0.0, 0.0)?;
    // Smooth filtering when the photo is scaled down to fit
    ctx.source().set_filter(cairo::Filter::Good);
    let result = ctx.paint();
    ctx.restore()?;
    result
}

/// Renders all shapes in order (first shape = bottom layer).
pub fn render_shapes<'a>(ctx: &cairo::Context, shapes: impl IntoIterator<Item = &'a Shape>) {
    for shape in shapes {
        render_shape(ctx, shape);
    }
}

/// Renders a single shape, dispatching on its kind.
pub fn render_shape(ctx: &cairo::Context, shape: &Shape) {
    match shape {
        Shape::Text {
            left,
            top,
            text,
            font_size,
            font,
            fill,
        } => render_text(ctx, *left, *top, text, *font_size, font, *fill),
        Shape::Rect {
            left,
            top,
            width,
            height,
            fill,
        } => {
            set_source(ctx, *fill);
            ctx.rectangle(*left, *top, *width, *height);
            let _ = ctx.fill();
        }
        Shape::Circle {
            left,
            top,
            radius,
            fill,
        } => {
            set_source(ctx, *fill);
            ctx.new_sub_path();
            ctx.arc(
                left + radius,
                top + radius,
                *radius,
                0.0,
                std::f64::consts::TAU,
            );
            let _ = ctx.fill();
        }
        Shape::Triangle {
            left,
            top,
            width,
            height,
            fill,
        } => {
            let vertices = [
                Point::new(left + width / 2.0, *top),
                Point::new(left + width, top + height),
                Point::new(*left, top + height),
            ];
            fill_polygon(ctx, &vertices, *fill);
        }
        Shape::Polygon {
            left,
            top,
            points,
            fill,
        } => {
            // Offsets are relative to the polygon's own origin; shift so the
            // bounding box corner lands on (left, top).
            let Some(local) = util::points_bounds(points) else {
                return;
            };
            let placed: Vec<Point> = points
                .iter()
                .map(|p| Point::new(left + p.x - local.x, top + p.y - local.y))
                .collect();
            fill_polygon(ctx, &placed, *fill);
        }
    }
}

fn fill_polygon(ctx: &cairo::Context, vertices: &[Point], fill: Color) {
    let Some((first, rest)) = vertices.split_first() else {
        return;
    };
    set_source(ctx, fill);
    ctx.new_path();
    ctx.move_to(first.x, first.y);
    for vertex in rest {
        ctx.line_to(vertex.x, vertex.y);
    }
    ctx.close_path();
    let _ = ctx.fill();
}

/// Renders a text box with Pango, anchored at its top-left corner.
///
/// Newlines in `text` start new lines with spacing from the font metrics.
pub fn render_text(
    ctx: &cairo::Context,
    left: f64,
    top: f64,
    text: &str,
    size: f64,
    font: &FontDescriptor,
    fill: Color,
) {
    // Keep font settings from leaking into later shapes
    ctx.save().ok();
    ctx.set_antialias(cairo::Antialias::Best);

    let layout = pangocairo::functions::create_layout(ctx);
    let font_desc = pango::FontDescription::from_string(&font.to_pango_string(size));
    layout.set_font_description(Some(&font_desc));
    layout.set_text(text);

    ctx.move_to(left, top);
    set_source(ctx, fill);
    pangocairo::functions::show_layout(ctx, &layout);

    ctx.restore().ok();
}

fn set_source(ctx: &cairo::Context, color: Color) {
    ctx.set_source_rgba(color.r, color.g, color.b, color.a);
}
