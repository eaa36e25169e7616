use glam::DVec3;

/// Mean Earth radius in kilometres
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Angular distances (radians) below this are treated as coincident
const DEGENERATE_ANGLE: f64 = 1e-7;

/// A geographic coordinate in degrees.
/// Always finite, latitude in [-90, 90], longitude in [-180, 180).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    /// Build a point, clamping latitude and wrapping longitude.
    /// Non-finite components become 0.
    pub fn new(lat: f64, lng: f64) -> Self {
        Self {
            lat: clamp_lat(finite_or_zero(lat)),
            lng: wrap_lng(finite_or_zero(lng)),
        }
    }

    /// Unit vector for this point
    #[inline(always)]
    pub fn to_vec3(self) -> DVec3 {
        let (x, y, z) = cartesian(self.lat, self.lng);
        DVec3::new(x, y, z)
    }

    /// Recover a point from a (not necessarily normalized) direction vector
    #[inline]
    pub fn from_vec3(v: DVec3) -> Self {
        let lat = (-v.z).atan2((v.x * v.x + v.y * v.y).sqrt()).to_degrees();
        let lng = v.y.atan2(v.x).to_degrees();
        Self::new(lat, lng)
    }
}

#[inline(always)]
fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

/// Wrap longitude into [-180, 180)
#[inline(always)]
pub fn wrap_lng(lng: f64) -> f64 {
    (lng + 180.0).rem_euclid(360.0) - 180.0
}

/// Clamp latitude into [-90, 90]
#[inline(always)]
pub fn clamp_lat(lat: f64) -> f64 {
    lat.clamp(-90.0, 90.0)
}

/// Convert lat/lng (degrees) to a unit vector.
///
/// x points at (0, 0), y at (0, 90E) and z at the south pole, so the
/// default view looks down +x with east to the right and north up the image.
#[inline(always)]
pub fn cartesian(lat: f64, lng: f64) -> (f64, f64, f64) {
    let lat_rad = lat.to_radians();
    let lng_rad = lng.to_radians();
    (
        lat_rad.cos() * lng_rad.cos(),
        lat_rad.cos() * lng_rad.sin(),
        -lat_rad.sin(),
    )
}

/// Central angle between two points in radians
#[inline]
fn central_angle(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dphi = phi2 - phi1;
    let dlambda = (lng2 - lng1).to_radians();

    let h = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    // Rounding can push h just past 1 near antipodes
    2.0 * h.clamp(0.0, 1.0).sqrt().asin()
}

/// Great-circle distance in km (haversine formula)
pub fn haversine_distance(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    EARTH_RADIUS_KM * central_angle(lat1, lng1, lat2, lng2)
}

/// Point reached by travelling `distance_km` from (lat, lng) on an initial
/// bearing (degrees clockwise from north).
pub fn destination(lat: f64, lng: f64, distance_km: f64, bearing: f64) -> (f64, f64) {
    let phi1 = lat.to_radians();
    let lambda1 = lng.to_radians();
    let theta = bearing.to_radians();
    let delta = distance_km / EARTH_RADIUS_KM;

    let sin_phi2 = (phi1.sin() * delta.cos() + phi1.cos() * delta.sin() * theta.cos()).clamp(-1.0, 1.0);
    let phi2 = sin_phi2.asin();
    let lambda2 = lambda1
        + (theta.sin() * delta.sin() * phi1.cos()).atan2(delta.cos() - phi1.sin() * sin_phi2);

    (phi2.to_degrees(), wrap_lng(lambda2.to_degrees()))
}

/// Initial bearing (degrees in [0, 360)) of the great circle from the first
/// point towards the second.
pub fn initial_bearing(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dlambda = (lng2 - lng1).to_radians();

    let y = dlambda.sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * dlambda.cos();
    y.atan2(x).to_degrees().rem_euclid(360.0)
}

/// Point at `fraction` along the great-circle arc between two points.
///
/// Coincident or antipodal endpoints have no unique arc; every fraction then
/// yields the first point.
pub fn intermediate(lat1: f64, lng1: f64, lat2: f64, lng2: f64, fraction: f64) -> (f64, f64) {
    let delta = central_angle(lat1, lng1, lat2, lng2);
    if is_degenerate_arc(delta) {
        return (lat1, lng1);
    }

    let f = fraction.clamp(0.0, 1.0);
    let sin_delta = delta.sin();
    let a = ((1.0 - f) * delta).sin() / sin_delta;
    let b = (f * delta).sin() / sin_delta;

    let phi1 = lat1.to_radians();
    let lambda1 = lng1.to_radians();
    let phi2 = lat2.to_radians();
    let lambda2 = lng2.to_radians();

    let x = a * phi1.cos() * lambda1.cos() + b * phi2.cos() * lambda2.cos();
    let y = a * phi1.cos() * lambda1.sin() + b * phi2.cos() * lambda2.sin();
    let z = a * phi1.sin() + b * phi2.sin();

    let lat = z.atan2((x * x + y * y).sqrt()).to_degrees();
    let lng = y.atan2(x).to_degrees();
    (lat, lng)
}

/// True when an arc of this central angle has no well-defined great circle
#[inline(always)]
pub fn is_degenerate_arc(delta: f64) -> bool {
    delta < DEGENERATE_ANGLE || (std::f64::consts::PI - delta) < DEGENERATE_ANGLE
}

/// Central angle in degrees between two points
#[inline]
pub fn angular_distance(a: GeoPoint, b: GeoPoint) -> f64 {
    central_angle(a.lat, a.lng, b.lat, b.lng).to_degrees()
}

/// Convert an angular radius in degrees to a surface distance in km
#[inline(always)]
pub fn degrees_to_km(degrees: f64) -> f64 {
    degrees.to_radians() * EARTH_RADIUS_KM
}
