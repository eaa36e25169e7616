use std::sync::Arc;

use crate::canvas::Canvas;
use crate::config::RenderStyle;
use crate::data::{BoundaryKind, BoundarySet, BoundarySource};
use crate::geo::GeoPoint;
use crate::map::{render, Orientation};

/// Narrowest accepted graticule spacing, in degrees
pub const MIN_GRATICULE_SPACING: f64 = 0.1;

/// Smallest accepted dot radius, in degrees
pub const MIN_DOT_RADIUS: f64 = 0.01;

/// Something the scene can draw. Immutable once appended.
#[derive(Debug, Clone, PartialEq)]
pub enum Drawable {
    /// Meridians and parallels every `spacing` degrees
    Graticule { spacing: f64 },
    /// Filled geodesic circle with an angular radius in degrees
    Dot { center: GeoPoint, radius: f64 },
    /// Great-circle segment
    Line { from: GeoPoint, to: GeoPoint },
    /// Geodesic quadrilateral spanned by two opposite corners
    Rect { corner1: GeoPoint, corner2: GeoPoint },
    /// Every polyline of an external boundary dataset
    Boundaries(BoundaryKind),
}

/// Ordered list of drawables plus the current viewing orientation.
///
/// Drawing only records; nothing is projected until [`Scene::render`], which
/// is a full independent pass over the then-current state.
#[derive(Clone)]
pub struct Scene {
    drawables: Vec<Drawable>,
    orientation: Orientation,
    boundaries: Arc<dyn BoundarySource>,
}

impl Scene {
    /// Empty scene centered on (0, 0) with the built-in boundary outlines
    pub fn new() -> Self {
        Self::with_boundaries(BoundarySet::builtin())
    }

    /// Empty scene drawing boundaries from `source`
    pub fn with_boundaries(source: impl BoundarySource + 'static) -> Self {
        Self {
            drawables: Vec::new(),
            orientation: Orientation::default(),
            boundaries: Arc::new(source),
        }
    }

    pub fn draw_graticule(&mut self, spacing: f64) {
        let spacing = if spacing.is_finite() {
            spacing.max(MIN_GRATICULE_SPACING)
        } else {
            MIN_GRATICULE_SPACING
        };
        self.drawables.push(Drawable::Graticule { spacing });
    }

    pub fn draw_dot(&mut self, lat: f64, lng: f64, radius: f64) {
        let radius = if radius.is_finite() {
            radius.clamp(MIN_DOT_RADIUS, 180.0)
        } else {
            MIN_DOT_RADIUS
        };
        self.drawables.push(Drawable::Dot {
            center: GeoPoint::new(lat, lng),
            radius,
        });
    }

    pub fn draw_line(&mut self, lat1: f64, lng1: f64, lat2: f64, lng2: f64) {
        self.drawables.push(Drawable::Line {
            from: GeoPoint::new(lat1, lng1),
            to: GeoPoint::new(lat2, lng2),
        });
    }

    pub fn draw_rect(&mut self, lat1: f64, lng1: f64, lat2: f64, lng2: f64) {
        self.drawables.push(Drawable::Rect {
            corner1: GeoPoint::new(lat1, lng1),
            corner2: GeoPoint::new(lat2, lng2),
        });
    }

    pub fn draw_land_boundaries(&mut self) {
        self.drawables.push(Drawable::Boundaries(BoundaryKind::Land));
    }

    pub fn draw_country_boundaries(&mut self) {
        self.drawables.push(Drawable::Boundaries(BoundaryKind::Country));
    }

    /// Replace the viewing orientation
    pub fn center_on(&mut self, lat: f64, lng: f64) {
        self.orientation = Orientation::new(lat, lng);
    }

    pub fn orientation(&self) -> &Orientation {
        &self.orientation
    }

    pub fn drawables(&self) -> &[Drawable] {
        &self.drawables
    }

    /// Render a fresh `resolution`×`resolution` raster of the current state
    pub fn render(&self, resolution: usize, style: &RenderStyle) -> Canvas {
        render(
            &self.drawables,
            &self.orientation,
            self.boundaries.as_ref(),
            resolution,
            style,
        )
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("drawables", &self.drawables)
            .field("orientation", &self.orientation)
            .finish_non_exhaustive()
    }
}
