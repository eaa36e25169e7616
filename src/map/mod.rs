mod geometry;
mod globe;
mod renderer;
mod tessellate;

pub use geometry::{draw_line, draw_polyline, fill_polygon, fill_rings};
pub use globe::{horizon_crossing, is_front, Orientation, Projected, Projector};
pub use renderer::render;
pub use tessellate::{project_cap, project_clipped, PixelRun, PixelShape, Shape, Tessellator};
