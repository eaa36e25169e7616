use std::time::Instant;

use rayon::prelude::*;

use crate::canvas::Canvas;
use crate::config::RenderStyle;
use crate::data::BoundarySource;
use crate::map::geometry::{draw_polyline, fill_rings};
use crate::map::globe::{Orientation, Projector};
use crate::map::tessellate::{PixelShape, Tessellator};
use crate::scene::Drawable;

/// Full projection-and-rasterization pass.
///
/// Drawables are tessellated and projected in parallel, then painted one
/// after another in insertion order so later drawables overwrite earlier ones.
pub fn render(
    drawables: &[Drawable],
    orientation: &Orientation,
    boundaries: &dyn BoundarySource,
    resolution: usize,
    style: &RenderStyle,
) -> Canvas {
    let start = Instant::now();
    let size = resolution.max(1);
    let projector = Projector::new(orientation, size);
    let tessellator = Tessellator::new(style.curve_step_degrees, style.dot_bearing_step_degrees);

    // par_iter + collect keeps insertion order
    let layers: Vec<Vec<PixelShape>> = drawables
        .par_iter()
        .map(|drawable| {
            tessellator
                .shapes(drawable, boundaries)
                .iter()
                .map(|shape| tessellator.project_shape(shape, &projector))
                .collect::<Vec<_>>()
        })
        .collect();

    let mut canvas = Canvas::new(size, style.background);
    let mut painted = 0usize;
    for layer in &layers {
        for shape in layer {
            paint(&mut canvas, shape, style);
            painted += 1;
        }
    }

    log::debug!(
        "Rendered {} drawables ({} shapes) at {}px centered on {:?} in {:?}",
        drawables.len(),
        painted,
        size,
        orientation.center(),
        start.elapsed()
    );

    canvas
}

/// Paint one projected shape with the stroke color
fn paint(canvas: &mut Canvas, shape: &PixelShape, style: &RenderStyle) {
    match shape {
        PixelShape::Stroke(runs) => {
            for run in runs {
                draw_polyline(canvas, run, style.stroke);
            }
        }
        PixelShape::Fill { rings, outline } => {
            fill_rings(canvas, rings.as_slice(), style.stroke);
            // Outline keeps sub-pixel dots visible
            for run in outline {
                draw_polyline(canvas, run, style.stroke);
            }
        }
    }
}
