use glam::DVec3;

use crate::geo::GeoPoint;

/// Viewing orientation: the geographic point facing the viewer.
/// Only consulted at render time, so re-centering never touches drawables.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Orientation {
    center: GeoPoint,
}

impl Orientation {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self {
            center: GeoPoint::new(lat, lng),
        }
    }

    /// The point that maps onto the viewer-facing pole
    pub fn center(&self) -> GeoPoint {
        self.center
    }

    /// Orthonormal view basis (forward, right, up) for this center.
    /// Forward points at the viewer, right is local east, up is local north.
    fn basis(&self) -> (DVec3, DVec3, DVec3) {
        let lat_rad = self.center.lat.to_radians();
        let lng_rad = self.center.lng.to_radians();

        let forward = self.center.to_vec3();

        // East tangent; stays defined at the poles
        let right = DVec3::new(-lng_rad.sin(), lng_rad.cos(), 0.0);

        // Derivative of forward w.r.t. latitude (points north on sphere)
        let up = DVec3::new(
            -lat_rad.sin() * lng_rad.cos(),
            -lat_rad.sin() * lng_rad.sin(),
            -lat_rad.cos(),
        );

        (forward, right, up)
    }
}

/// A projected point in pixel space plus its hemisphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projected {
    pub x: f64,
    pub y: f64,
    pub visible: bool,
}

/// Orthographic projector for a square canvas of side `size`.
/// The globe fills the canvas: radius = size / 2, centered at the midpoint.
#[derive(Debug, Clone)]
pub struct Projector {
    forward: DVec3,
    right: DVec3,
    up: DVec3,
    /// Sphere radius in pixels
    radius: f64,
}

impl Projector {
    pub fn new(orientation: &Orientation, size: usize) -> Self {
        let (forward, right, up) = orientation.basis();
        Self {
            forward,
            right,
            up,
            radius: size as f64 / 2.0,
        }
    }

    /// Rotate a unit vector into view space.
    /// x is the viewer axis (>= 0 faces the viewer), y is screen right, z is screen up.
    #[inline(always)]
    pub fn rotate(&self, p: DVec3) -> DVec3 {
        DVec3::new(p.dot(self.forward), p.dot(self.right), p.dot(self.up))
    }

    /// Map a rotated vector to pixel coordinates, ignoring visibility
    #[inline(always)]
    pub fn to_pixel(&self, r: DVec3) -> (f64, f64) {
        (self.radius + r.y * self.radius, self.radius - r.z * self.radius)
    }

    /// Project a geographic point to pixel space with its visibility flag
    pub fn project(&self, p: GeoPoint) -> Projected {
        let r = self.rotate(p.to_vec3());
        let (x, y) = self.to_pixel(r);
        Projected {
            x,
            y,
            visible: is_front(r),
        }
    }

    /// Unproject pixel coordinates back to a geographic point.
    /// Returns `None` if the pixel lies outside the globe's disc.
    pub fn unproject(&self, px: f64, py: f64) -> Option<GeoPoint> {
        if self.radius <= 0.0 {
            return None;
        }
        let sx = (px - self.radius) / self.radius;
        let sy = -(py - self.radius) / self.radius;

        let r2 = sx * sx + sy * sy;
        if r2 > 1.0 {
            return None;
        }

        // Reconstruct 3D point on unit sphere
        let sz = (1.0 - r2).sqrt();
        let p = self.right * sx + self.up * sy + self.forward * sz;
        Some(GeoPoint::from_vec3(p))
    }

    /// Sphere radius in pixels
    pub fn radius(&self) -> f64 {
        self.radius
    }
}

/// Front-hemisphere test on a rotated vector
#[inline(always)]
pub fn is_front(r: DVec3) -> bool {
    r.x >= 0.0
}

/// Point where the great-circle arc from `a` to `b` crosses the horizon.
///
/// Both inputs are rotated unit vectors whose viewer-axis (x) coordinates have
/// opposite signs. The result is a unit vector with x = 0 lying on the minor
/// arc between them.
pub fn horizon_crossing(a: DVec3, b: DVec3) -> DVec3 {
    // The crossing lies on both the arc's plane (normal a × b) and the
    // horizon plane (normal X), i.e. along X × (a × b).
    let n = a.cross(b);
    let dir = DVec3::new(0.0, -n.z, n.y);
    if let Some(c) = dir.try_normalize() {
        let mid = a + b;
        if mid.length_squared() > 1e-18 {
            return if c.dot(mid) >= 0.0 { c } else { -c };
        }
    }

    // Nearly parallel or antipodal inputs: fall back to the chord root
    let denom = a.x - b.x;
    let t = if denom.abs() > 1e-15 { a.x / denom } else { 0.5 };
    let mut c = a.lerp(b, t);
    c.x = 0.0;
    c.try_normalize().unwrap_or(DVec3::Y)
}
