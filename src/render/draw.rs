//! Cairo-based drawing of scene contents.

use crate::scene::{Color, Shape, Skybox};

/// Paints the skybox as a vertical gradient covering the whole target.
pub fn render_skybox(
    ctx: &cairo::Context,
    skybox: &Skybox,
    width: f64,
    height: f64,
) -> Result<(), cairo::Error> {
    let zenith = skybox.zenith.to_color();
    let horizon = skybox.horizon.to_color();

    let gradient = cairo::LinearGradient::new(0.0, 0.0, 0.0, height);
    // Skybox is always opaque, whatever alpha the scene file asked for
    gradient.add_color_stop_rgb(0.0, zenith.r, zenith.g, zenith.b);
    gradient.add_color_stop_rgb(1.0, horizon.r, horizon.g, horizon.b);

    ctx.save()?;
    ctx.set_operator(cairo::Operator::Source);
    ctx.set_source(&gradient)?;
    ctx.rectangle(0.0, 0.0, width, height);
    ctx.fill()?;
    ctx.restore()
}

/// Replaces every pixel with `color`, alpha included.
pub fn render_solid_background(ctx: &cairo::Context, color: Color) -> Result<(), cairo::Error> {
    ctx.save()?;
    ctx.set_operator(cairo::Operator::Source);
    ctx.set_source_rgba(color.r, color.g, color.b, color.a);
    ctx.paint()?;
    ctx.restore()
}

/// Renders all shapes in order (first shape = bottom layer).
pub fn render_shapes(ctx: &cairo::Context, shapes: &[Shape]) -> Result<(), cairo::Error> {
    for shape in shapes {
        render_shape(ctx, shape)?;
    }
    Ok(())
}

/// Renders a single shape to a Cairo context.
pub fn render_shape(ctx: &cairo::Context, shape: &Shape) -> Result<(), cairo::Error> {
    let color = shape.color().to_color();
    ctx.set_source_rgba(color.r, color.g, color.b, color.a);

    match shape {
        Shape::Rect {
            x,
            y,
            w,
            h,
            fill,
            thick,
            ..
        } => {
            // Normalize negative extents so the outline joins render consistently
            let (x, w) = if *w >= 0.0 { (*x, *w) } else { (x + w, -w) };
            let (y, h) = if *h >= 0.0 { (*y, *h) } else { (y + h, -h) };

            ctx.rectangle(x, y, w, h);
            finish_path(ctx, *fill, *thick, cairo::LineJoin::Miter)
        }
        Shape::Ellipse {
            cx,
            cy,
            rx,
            ry,
            fill,
            thick,
            ..
        } => {
            if *rx == 0.0 || *ry == 0.0 {
                return Ok(());
            }

            ctx.save()?;
            ctx.translate(*cx, *cy);
            ctx.scale(*rx, *ry);
            ctx.arc(0.0, 0.0, 1.0, 0.0, 2.0 * std::f64::consts::PI);
            ctx.restore()?;

            finish_path(ctx, *fill, *thick, cairo::LineJoin::Round)
        }
        Shape::Line {
            x1,
            y1,
            x2,
            y2,
            thick,
            ..
        } => {
            ctx.set_line_cap(cairo::LineCap::Round);
            ctx.move_to(*x1, *y1);
            ctx.line_to(*x2, *y2);
            finish_path(ctx, false, *thick, cairo::LineJoin::Round)
        }
        Shape::Polyline { points, thick, .. } => {
            let Some(([x0, y0], rest)) = points.split_first() else {
                return Ok(());
            };

            ctx.set_line_cap(cairo::LineCap::Round);
            ctx.move_to(*x0, *y0);
            for [x, y] in rest {
                ctx.line_to(*x, *y);
            }
            finish_path(ctx, false, *thick, cairo::LineJoin::Round)
        }
    }
}

fn finish_path(
    ctx: &cairo::Context,
    fill: bool,
    thick: f64,
    join: cairo::LineJoin,
) -> Result<(), cairo::Error> {
    if fill {
        ctx.fill()
    } else {
        ctx.set_line_width(thick);
        ctx.set_line_join(join);
        ctx.stroke()
    }
}
