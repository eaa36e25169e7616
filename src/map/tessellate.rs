//! Curve tessellation and horizon clipping.
//!
//! Every drawable is reduced to geographic polylines sampled at a fixed
//! angular step (independent of output resolution), then rotated, projected
//! and clipped against the visibility horizon.

use std::f64::consts::TAU;

use glam::DVec3;

use crate::data::BoundarySource;
use crate::geo::{angular_distance, degrees_to_km, destination, intermediate, is_degenerate_arc, GeoPoint};
use crate::map::globe::{horizon_crossing, is_front, Projector};
use crate::scene::Drawable;

/// Smallest accepted sampling step in degrees
const MIN_STEP_DEGREES: f64 = 0.01;

/// A connected run of pixel-space points
pub type PixelRun = Vec<(f64, f64)>;

/// Geographic output of tessellating one drawable
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Open or closed polyline, stroked
    Stroke(Vec<GeoPoint>),
    /// Spherical cap of angular `radius` degrees around `center`, with its
    /// closed outline ring. Filled and outlined.
    Cap {
        center: GeoPoint,
        radius: f64,
        ring: Vec<GeoPoint>,
    },
}

/// Pixel-space shape after rotation, projection and horizon clipping
#[derive(Debug, Clone, PartialEq)]
pub enum PixelShape {
    Stroke(Vec<PixelRun>),
    /// `rings` are filled together under the even-odd rule, `outline` is stroked
    Fill { rings: Vec<PixelRun>, outline: Vec<PixelRun> },
}

/// Samples geodesic curves into fine polylines.
#[derive(Debug, Clone, Copy)]
pub struct Tessellator {
    /// Angular step along lines, edges, meridians and parallels
    step: f64,
    /// Bearing step around dot circles
    bearing_step: f64,
}

impl Tessellator {
    pub fn new(step_degrees: f64, bearing_step_degrees: f64) -> Self {
        Self {
            step: sane_step(step_degrees, 1.0),
            bearing_step: sane_step(bearing_step_degrees, 5.0),
        }
    }

    /// Tessellate one drawable into geographic shapes
    pub fn shapes(&self, drawable: &Drawable, boundaries: &dyn BoundarySource) -> Vec<Shape> {
        match drawable {
            Drawable::Graticule { spacing } => self
                .graticule(*spacing)
                .into_iter()
                .map(Shape::Stroke)
                .collect(),
            Drawable::Dot { center, radius } => vec![Shape::Cap {
                center: *center,
                radius: *radius,
                ring: self.circle(*center, *radius),
            }],
            Drawable::Line { from, to } => vec![Shape::Stroke(self.geodesic(*from, *to))],
            Drawable::Rect { corner1, corner2 } => {
                vec![Shape::Stroke(self.rect_outline(*corner1, *corner2))]
            }
            Drawable::Boundaries(kind) => boundaries
                .polylines(*kind)
                .iter()
                .filter(|line| line.len() >= 2)
                .map(|line| Shape::Stroke(self.polyline(line)))
                .collect(),
        }
    }

    /// Points along the great circle from `a` to `b`, both endpoints included.
    /// Coincident or antipodal endpoints collapse to the single point `a`.
    pub fn geodesic(&self, a: GeoPoint, b: GeoPoint) -> Vec<GeoPoint> {
        let angle = angular_distance(a, b);
        if is_degenerate_arc(angle.to_radians()) {
            return vec![a];
        }

        let steps = ((angle / self.step).ceil() as usize).max(1);
        (0..=steps)
            .map(|i| match i {
                0 => a,
                i if i == steps => b,
                i => {
                    let (lat, lng) = intermediate(a.lat, a.lng, b.lat, b.lng, i as f64 / steps as f64);
                    GeoPoint::new(lat, lng)
                }
            })
            .collect()
    }

    /// Densify a vertex list, joining consecutive vertices with geodesics
    pub fn polyline(&self, vertices: &[GeoPoint]) -> Vec<GeoPoint> {
        let Some(&first) = vertices.first() else {
            return Vec::new();
        };

        let mut out = vec![first];
        for pair in vertices.windows(2) {
            let segment = self.geodesic(pair[0], pair[1]);
            if segment.len() == 1 {
                out.push(pair[1]);
            } else {
                out.extend_from_slice(&segment[1..]);
            }
        }
        out
    }

    /// Closed outline through the four vertices derived from two opposite corners
    pub fn rect_outline(&self, corner1: GeoPoint, corner2: GeoPoint) -> Vec<GeoPoint> {
        let vertices = [
            corner1,
            GeoPoint::new(corner1.lat, corner2.lng),
            corner2,
            GeoPoint::new(corner2.lat, corner1.lng),
            corner1,
        ];
        self.polyline(&vertices)
    }

    /// Closed geodesic circle of angular radius `radius` (degrees) around `center`
    pub fn circle(&self, center: GeoPoint, radius: f64) -> Vec<GeoPoint> {
        let distance = degrees_to_km(radius);
        let steps = ((360.0 / self.bearing_step).ceil() as usize).max(3);

        let mut ring: Vec<GeoPoint> = (0..steps)
            .map(|i| {
                let bearing = 360.0 * i as f64 / steps as f64;
                let (lat, lng) = destination(center.lat, center.lng, distance, bearing);
                GeoPoint::new(lat, lng)
            })
            .collect();
        ring.push(ring[0]);
        ring
    }

    /// Line of constant longitude from pole to pole
    pub fn meridian(&self, lng: f64) -> Vec<GeoPoint> {
        let steps = ((180.0 / self.step).ceil() as usize).max(1);
        (0..=steps)
            .map(|i| GeoPoint::new(-90.0 + 180.0 * i as f64 / steps as f64, lng))
            .collect()
    }

    /// Line of constant latitude all the way around
    pub fn parallel(&self, lat: f64) -> Vec<GeoPoint> {
        let steps = ((360.0 / self.step).ceil() as usize).max(1);
        (0..=steps)
            .map(|i| GeoPoint::new(lat, -180.0 + 360.0 * i as f64 / steps as f64))
            .collect()
    }

    /// Project a geographic shape into pixel space
    pub fn project_shape(&self, shape: &Shape, projector: &Projector) -> PixelShape {
        match shape {
            Shape::Stroke(points) => PixelShape::Stroke(project_clipped(points, projector)),
            Shape::Cap { center, radius, ring } => {
                project_cap(*center, *radius, ring, projector, self.step)
            }
        }
    }

    /// Meridians and parallels at multiples of `spacing` degrees.
    /// Parallels stop short of the poles, where they would degenerate.
    pub fn graticule(&self, spacing: f64) -> Vec<Vec<GeoPoint>> {
        let mut lines = Vec::new();

        let mut k = (-180.0 / spacing).ceil() as i64;
        while (k as f64) * spacing < 180.0 - 1e-9 {
            lines.push(self.meridian(k as f64 * spacing));
            k += 1;
        }

        let m = ((90.0 - 1e-9) / spacing).floor() as i64;
        for k in -m..=m {
            lines.push(self.parallel(k as f64 * spacing));
        }

        lines
    }
}

impl Default for Tessellator {
    fn default() -> Self {
        Self::new(1.0, 5.0)
    }
}

fn sane_step(step: f64, fallback: f64) -> f64 {
    if step.is_finite() && step > 0.0 {
        step.clamp(MIN_STEP_DEGREES, 90.0)
    } else {
        fallback
    }
}

/// Rotate and project a polyline, keeping only its front-hemisphere parts.
///
/// Segments with both ends in front are kept, segments with both ends behind
/// are dropped, and straddling segments are cut at the horizon. Each
/// returned run has at least two points.
pub fn project_clipped(points: &[GeoPoint], projector: &Projector) -> Vec<PixelRun> {
    let mut runs = Vec::new();
    let Some(first) = points.first() else {
        return runs;
    };

    let mut current: PixelRun = Vec::new();
    let mut prev = projector.rotate(first.to_vec3());
    if is_front(prev) {
        current.push(projector.to_pixel(prev));
    }

    for p in &points[1..] {
        let r = projector.rotate(p.to_vec3());
        match (is_front(prev), is_front(r)) {
            (true, true) => current.push(projector.to_pixel(r)),
            (false, false) => {}
            (true, false) => {
                current.push(projector.to_pixel(horizon_crossing(prev, r)));
                flush_run(&mut runs, &mut current);
            }
            (false, true) => {
                current.push(projector.to_pixel(horizon_crossing(prev, r)));
                current.push(projector.to_pixel(r));
            }
        }
        prev = r;
    }
    flush_run(&mut runs, &mut current);

    runs
}

fn flush_run(runs: &mut Vec<PixelRun>, current: &mut PixelRun) {
    if current.len() >= 2 {
        runs.push(std::mem::take(current));
    } else {
        current.clear();
    }
}

/// Project a spherical cap into the rings covering its visible part.
///
/// Where the outline dips behind the globe, the visible region is closed
/// along the rim between the exit and entry crossings, walking the way that
/// stays inside the cap. Outlines with no visible part fill the whole disc
/// when the cap covers the view center. Caps covering the point opposite
/// the view center fill the disc minus the outline polygon.
pub fn project_cap(
    center: GeoPoint,
    radius: f64,
    ring: &[GeoPoint],
    projector: &Projector,
    rim_step_degrees: f64,
) -> PixelShape {
    let outline = project_clipped(ring, projector);
    let c = projector.rotate(center.to_vec3());
    let cos_radius = radius.to_radians().cos();
    let contains = |p: DVec3| p.dot(c) >= cos_radius;
    let rim_step = rim_step_degrees.to_radians();

    let mut rotated: Vec<DVec3> = ring.iter().map(|p| projector.rotate(p.to_vec3())).collect();
    if rotated.len() > 1 && rotated.first() == rotated.last() {
        rotated.pop();
    }

    let rings = match rotated.iter().position(|r| !is_front(*r)) {
        None => {
            let polygon: PixelRun = rotated.iter().map(|r| projector.to_pixel(*r)).collect();
            if contains(DVec3::NEG_X) {
                vec![rim_ring(projector, rim_step), polygon]
            } else {
                vec![polygon]
            }
        }
        Some(start) => {
            let arcs = front_arcs(&rotated, start);
            if !arcs.is_empty() {
                vec![close_along_rim(&arcs, &contains, projector, rim_step)]
            } else if contains(DVec3::X) {
                vec![rim_ring(projector, rim_step)]
            } else {
                Vec::new()
            }
        }
    };

    PixelShape::Fill { rings, outline }
}

/// Visible arcs of a closed ring, each running from an entry crossing to an
/// exit crossing. `start` must index a point behind the horizon.
fn front_arcs(ring: &[DVec3], start: usize) -> Vec<Vec<DVec3>> {
    let n = ring.len();
    let mut arcs = Vec::new();
    let mut current: Vec<DVec3> = Vec::new();
    let mut prev = ring[start];

    for k in 1..=n {
        let r = ring[(start + k) % n];
        match (is_front(prev), is_front(r)) {
            (true, true) => current.push(r),
            (false, false) => {}
            (false, true) => {
                current.push(horizon_crossing(prev, r));
                current.push(r);
            }
            (true, false) => {
                current.push(horizon_crossing(prev, r));
                arcs.push(std::mem::take(&mut current));
            }
        }
        prev = r;
    }

    arcs
}

/// Join visible arcs into one polygon, bridging each exit to the next entry
/// along the rim
fn close_along_rim(
    arcs: &[Vec<DVec3>],
    contains: &impl Fn(DVec3) -> bool,
    projector: &Projector,
    rim_step: f64,
) -> PixelRun {
    let mut polygon = Vec::new();
    for (i, arc) in arcs.iter().enumerate() {
        polygon.extend(arc.iter().map(|r| projector.to_pixel(*r)));

        let (Some(&exit), Some(&entry)) = (arc.last(), arcs[(i + 1) % arcs.len()].first()) else {
            continue;
        };
        let from = rim_angle(exit);
        let ccw = (rim_angle(entry) - from).rem_euclid(TAU);
        if ccw < 1e-12 || ccw > TAU - 1e-12 {
            continue;
        }

        let sweep = if contains(rim_point(from + ccw / 2.0)) { ccw } else { ccw - TAU };
        let steps = (sweep.abs() / rim_step).ceil() as usize;
        for j in 1..steps {
            let angle = from + sweep * j as f64 / steps as f64;
            polygon.push(projector.to_pixel(rim_point(angle)));
        }
    }
    polygon
}

/// The whole visible disc as a polygon on the rim
fn rim_ring(projector: &Projector, rim_step: f64) -> PixelRun {
    let steps = ((TAU / rim_step).ceil() as usize).max(3);
    (0..steps)
        .map(|i| projector.to_pixel(rim_point(TAU * i as f64 / steps as f64)))
        .collect()
}

/// Angle of a horizon point within the viewer-axis = 0 plane
#[inline(always)]
fn rim_angle(r: DVec3) -> f64 {
    r.z.atan2(r.y)
}

#[inline(always)]
fn rim_point(angle: f64) -> DVec3 {
    DVec3::new(0.0, angle.cos(), angle.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{BoundaryKind, BoundarySet};
    use crate::geo::haversine_distance;
    use crate::map::globe::Orientation;

    fn assert_close(expected: f64, actual: f64, tol: f64) {
        assert!(
            (expected - actual).abs() <= tol,
            "expected {expected}, got {actual} (tolerance {tol})"
        );
    }

    #[test]
    fn test_geodesic_endpoints_and_step() {
        let tess = Tessellator::default();
        let a = GeoPoint::new(51.453349, -2.588323);
        let b = GeoPoint::new(40.645423, -73.903879);
        let pts = tess.geodesic(a, b);

        assert_eq!(a, pts[0]);
        let last = pts[pts.len() - 1];
        assert_close(b.lat, last.lat, 1e-9);
        assert_close(b.lng, last.lng, 1e-9);

        for pair in pts.windows(2) {
            assert!(angular_distance(pair[0], pair[1]) <= 1.0 + 1e-9);
        }
    }

    #[test]
    fn test_geodesic_degenerate_collapses() {
        let tess = Tessellator::default();
        let a = GeoPoint::new(10.0, 20.0);
        assert_eq!(vec![a], tess.geodesic(a, a));
        assert_eq!(vec![a], tess.geodesic(a, GeoPoint::new(-10.0, -160.0)));
    }

    #[test]
    fn test_rect_outline_is_closed_through_corners() {
        let tess = Tessellator::default();
        let c1 = GeoPoint::new(41.897209, 12.500285);
        let c2 = GeoPoint::new(55.782693, 37.615993);
        let ring = tess.rect_outline(c1, c2);

        assert_eq!(ring[0], ring[ring.len() - 1]);
        for corner in [c1, c2, GeoPoint::new(c1.lat, c2.lng), GeoPoint::new(c2.lat, c1.lng)] {
            assert!(ring.iter().any(|p| angular_distance(*p, corner) < 1e-9));
        }
    }

    #[test]
    fn test_circle_points_at_radius() {
        let tess = Tessellator::default();
        let center = GeoPoint::new(-33.9, 151.2);
        let ring = tess.circle(center, 2.0);
        assert_eq!(73, ring.len());
        assert_eq!(ring[0], ring[72]);
        let expected = degrees_to_km(2.0);
        for p in &ring {
            assert_close(expected, haversine_distance(center.lat, center.lng, p.lat, p.lng), 1e-6);
        }
    }

    #[test]
    fn test_graticule_line_counts() {
        let tess = Tessellator::default();
        // 36 meridians + parallels at -80..=80 step 10
        assert_eq!(36 + 17, tess.graticule(10.0).len());
        // Spacing that does not divide 180 still stays inside the globe
        let lines = tess.graticule(7.0);
        assert!(lines.iter().flatten().all(|p| p.lat.abs() <= 90.0));
    }

    #[test]
    fn test_meridian_and_parallel_sampling() {
        let tess = Tessellator::default();
        let m = tess.meridian(25.0);
        assert_eq!(181, m.len());
        assert_eq!(-90.0, m[0].lat);
        assert_eq!(90.0, m[180].lat);
        let p = tess.parallel(30.0);
        assert_eq!(361, p.len());
        assert!(p.iter().all(|q| q.lat == 30.0));
    }

    #[test]
    fn test_boundaries_come_from_source() {
        let tess = Tessellator::default();
        let mut set = BoundarySet::default();
        set.add(BoundaryKind::Land, vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 5.0)]);
        set.add(BoundaryKind::Land, vec![GeoPoint::new(1.0, 1.0)]);
        let shapes = tess.shapes(&Drawable::Boundaries(BoundaryKind::Land), &set);
        assert_eq!(1, shapes.len());
        assert!(tess
            .shapes(&Drawable::Boundaries(BoundaryKind::Country), &set)
            .is_empty());
    }

    #[test]
    fn test_clip_keeps_front_segments() {
        let proj = Projector::new(&Orientation::default(), 100);
        let pts = [GeoPoint::new(0.0, -10.0), GeoPoint::new(0.0, 10.0)];
        let runs = project_clipped(&pts, &proj);
        assert_eq!(1, runs.len());
        assert_eq!(2, runs[0].len());
    }

    #[test]
    fn test_clip_drops_back_segments() {
        let proj = Projector::new(&Orientation::default(), 100);
        let pts = [GeoPoint::new(0.0, 120.0), GeoPoint::new(0.0, 150.0)];
        assert!(project_clipped(&pts, &proj).is_empty());
    }

    #[test]
    fn test_clip_cuts_at_horizon() {
        let proj = Projector::new(&Orientation::default(), 100);
        let pts = [GeoPoint::new(0.0, 80.0), GeoPoint::new(0.0, 100.0)];
        let runs = project_clipped(&pts, &proj);
        assert_eq!(1, runs.len());
        let (x, y) = runs[0][1];
        // Horizon point at lng 90 sits on the right rim of the disc
        assert_close(100.0, x, 1e-9);
        assert_close(50.0, y, 1e-9);

        // Reverse direction starts the run at the horizon
        let back = [pts[1], pts[0]];
        let runs = project_clipped(&back, &proj);
        assert_eq!(1, runs.len());
        assert_close(100.0, runs[0][0].0, 1e-9);
    }

    #[test]
    fn test_clipped_points_stay_inside_disc() {
        let proj = Projector::new(&Orientation::new(30.0, -37.0), 256);
        let tess = Tessellator::default();
        let line = tess.geodesic(GeoPoint::new(-60.0, 120.0), GeoPoint::new(70.0, -10.0));
        for run in project_clipped(&line, &proj) {
            for (x, y) in run {
                let dx = x - 128.0;
                let dy = y - 128.0;
                assert!(dx * dx + dy * dy <= 128.0 * 128.0 + 1e-6);
            }
        }
    }

    fn cap_rings(lat: f64, lng: f64, radius: f64) -> (Vec<PixelRun>, Vec<PixelRun>) {
        let tess = Tessellator::default();
        let proj = Projector::new(&Orientation::default(), 256);
        let drawable = Drawable::Dot { center: GeoPoint::new(lat, lng), radius };
        let shapes = tess.shapes(&drawable, &BoundarySet::default());
        match tess.project_shape(&shapes[0], &proj) {
            PixelShape::Fill { rings, outline } => (rings, outline),
            other => panic!("expected a fill, got {other:?}"),
        }
    }

    #[test]
    fn test_cap_across_horizon_closes_along_rim() {
        let (rings, outline) = cap_rings(0.0, 90.0, 30.0);
        assert_eq!(1, rings.len());
        assert!(!outline.is_empty());

        // Closing edge follows the right rim instead of the chord at x ≈ 239
        let polygon = &rings[0];
        let max_x = polygon.iter().map(|p| p.0).fold(f64::MIN, f64::max);
        assert!(max_x > 255.9, "rim not reached, max x {max_x}");
        for &(x, y) in polygon {
            let (dx, dy) = (x - 128.0, y - 128.0);
            assert!(dx * dx + dy * dy <= 128.0 * 128.0 + 1e-6);
            assert!(x >= 128.0 + 128.0 * 60f64.to_radians().sin() - 1e-6);
        }
    }

    #[test]
    fn test_hidden_outline_around_view_center_fills_disc() {
        let (rings, outline) = cap_rings(0.0, 0.0, 100.0);
        assert!(outline.is_empty());
        assert_eq!(1, rings.len());
        for &(x, y) in &rings[0] {
            assert_close(128.0, ((x - 128.0).powi(2) + (y - 128.0).powi(2)).sqrt(), 1e-9);
        }
    }

    #[test]
    fn test_hidden_cap_fills_nothing() {
        let (rings, outline) = cap_rings(0.0, 180.0, 10.0);
        assert!(rings.is_empty());
        assert!(outline.is_empty());
    }

    #[test]
    fn test_cap_around_far_pole_punches_hole() {
        let (rings, outline) = cap_rings(0.0, 180.0, 100.0);
        // Rim ring plus the outline polygon
        assert_eq!(2, rings.len());
        assert_eq!(1, outline.len());
    }
}
