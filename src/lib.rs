//! Deterministic orthographic globe snapshots.
//!
//! Build a [`Scene`] by appending drawables (graticules, dots, great-circle
//! lines, geodesic rectangles, land and country boundaries), pick a center
//! with [`Scene::center_on`], and call [`Scene::render`] for a fresh RGBA
//! [`Canvas`]. Identical scene state always yields identical pixels.

pub mod canvas;
pub mod config;
pub mod data;
pub mod geo;
pub mod hash;
pub mod map;
pub mod scene;

pub use canvas::{Canvas, Rgba};
pub use config::{DrawCommand, RenderStyle, SnapshotConfig};
pub use data::{BoundaryKind, BoundarySet, BoundarySource, Polyline};
pub use geo::GeoPoint;
pub use map::{Orientation, Projector};
pub use scene::{Drawable, Scene};
