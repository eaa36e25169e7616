//! Boundary supplier: land and country outlines as geographic polylines.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use geojson::{GeoJson, Geometry, Value};

use crate::geo::GeoPoint;

/// An ordered run of boundary vertices
pub type Polyline = Vec<GeoPoint>;

/// Which boundary dataset a drawable refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundaryKind {
    Land,
    Country,
}

/// Supplies boundary polylines by category.
/// Shared read-only across the render pass, hence `Send + Sync`.
pub trait BoundarySource: Send + Sync {
    fn polylines(&self, kind: BoundaryKind) -> &[Polyline];
}

/// In-memory boundary datasets
#[derive(Debug, Clone, Default)]
pub struct BoundarySet {
    land: Vec<Polyline>,
    countries: Vec<Polyline>,
}

impl BoundarySource for BoundarySet {
    fn polylines(&self, kind: BoundaryKind) -> &[Polyline] {
        match kind {
            BoundaryKind::Land => &self.land,
            BoundaryKind::Country => &self.countries,
        }
    }
}

impl BoundarySet {
    /// Coarse built-in outlines, used when no dataset is supplied
    pub fn builtin() -> Self {
        let convert = |line: &&[(f64, f64)]| -> Polyline {
            line.iter().map(|&(lat, lng)| GeoPoint::new(lat, lng)).collect()
        };
        Self {
            land: BUILTIN_LAND.iter().map(convert).collect(),
            countries: BUILTIN_BORDERS.iter().map(convert).collect(),
        }
    }

    /// Append one polyline to a dataset
    pub fn add(&mut self, kind: BoundaryKind, line: Polyline) {
        match kind {
            BoundaryKind::Land => self.land.push(line),
            BoundaryKind::Country => self.countries.push(line),
        }
    }

    /// Load GeoJSON datasets, falling back to the built-in outlines for any
    /// category that has no path or fails to load.
    pub fn from_paths(land: Option<&Path>, countries: Option<&Path>) -> Self {
        let builtin = Self::builtin();
        let mut set = Self::default();

        for (kind, path) in [(BoundaryKind::Land, land), (BoundaryKind::Country, countries)] {
            let loaded = match path {
                Some(path) => match set.load_file(kind, path) {
                    Ok(count) => {
                        log::info!("Loaded {} {:?} polylines from {}", count, kind, path.display());
                        count
                    }
                    Err(e) => {
                        log::warn!("Failed to load {}: {:#}", path.display(), e);
                        0
                    }
                },
                None => 0,
            };
            if loaded == 0 {
                for line in builtin.polylines(kind) {
                    set.add(kind, line.clone());
                }
            }
        }

        set
    }

    /// Load one GeoJSON file into a dataset, returning the polyline count
    pub fn load_file(&mut self, kind: BoundaryKind, path: &Path) -> Result<usize> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        self.load_str(kind, &content)
            .with_context(|| format!("parsing {}", path.display()))
    }

    /// Parse GeoJSON text into a dataset, returning the polyline count
    pub fn load_str(&mut self, kind: BoundaryKind, content: &str) -> Result<usize> {
        let geojson: GeoJson = content.parse()?;
        let mut count = 0;
        process_geojson_lines(&geojson, |line| {
            if line.len() >= 2 {
                self.add(kind, line);
                count += 1;
            }
        });
        Ok(count)
    }
}

/// Walk GeoJSON and hand every line feature to `add_line`
fn process_geojson_lines<F>(geojson: &GeoJson, mut add_line: F)
where
    F: FnMut(Polyline),
{
    match geojson {
        GeoJson::FeatureCollection(fc) => {
            for feature in &fc.features {
                if let Some(ref geometry) = feature.geometry {
                    process_geometry_lines(geometry, &mut add_line);
                }
            }
        }
        GeoJson::Feature(f) => {
            if let Some(ref geometry) = f.geometry {
                process_geometry_lines(geometry, &mut add_line);
            }
        }
        GeoJson::Geometry(geometry) => {
            process_geometry_lines(geometry, &mut add_line);
        }
    }
}

/// GeoJSON positions are [lng, lat]
fn to_polyline(coords: &[Vec<f64>]) -> Polyline {
    coords
        .iter()
        .filter(|c| c.len() >= 2)
        .map(|c| GeoPoint::new(c[1], c[0]))
        .collect()
}

fn process_geometry_lines<F>(geometry: &Geometry, add_line: &mut F)
where
    F: FnMut(Polyline),
{
    match &geometry.value {
        Value::LineString(coords) => add_line(to_polyline(coords)),
        Value::MultiLineString(lines) => {
            for coords in lines {
                add_line(to_polyline(coords));
            }
        }
        // Outer rings only; holes are lakes and enclaves
        Value::Polygon(rings) => {
            if let Some(exterior) = rings.first() {
                add_line(to_polyline(exterior));
            }
        }
        Value::MultiPolygon(polygons) => {
            for rings in polygons {
                if let Some(exterior) = rings.first() {
                    add_line(to_polyline(exterior));
                }
            }
        }
        Value::GeometryCollection(geometries) => {
            for g in geometries {
                process_geometry_lines(g, add_line);
            }
        }
        _ => {}
    }
}

/// Simplified continent outlines as (lat, lng)
const BUILTIN_LAND: &[&[(f64, f64)]] = &[
    // North America
    &[
        (65.0, -168.0), (60.0, -166.0), (60.0, -141.0), (55.0, -130.0), (48.0, -125.0), (40.0, -124.0),
        (32.0, -117.0), (25.0, -110.0), (25.0, -97.0), (28.0, -97.0), (24.0, -82.0), (25.0, -80.0),
        (31.0, -81.0), (35.0, -75.0), (41.0, -70.0), (45.0, -67.0), (47.0, -65.0), (47.0, -55.0),
        (47.0, -52.0), (52.0, -55.0), (55.0, -58.0), (60.0, -64.0), (62.0, -73.0), (63.0, -80.0),
        (62.0, -95.0), (68.0, -110.0), (70.0, -130.0), (70.0, -145.0), (65.0, -168.0),
    ],
    // South America
    &[
        (10.0, -80.0), (5.0, -75.0), (5.0, -70.0), (5.0, -60.0), (0.0, -50.0), (-5.0, -35.0),
        (-10.0, -35.0), (-15.0, -38.0), (-22.0, -40.0), (-25.0, -48.0), (-34.0, -55.0), (-38.0, -58.0),
        (-42.0, -65.0), (-50.0, -68.0), (-52.0, -75.0), (-45.0, -75.0), (-40.0, -72.0), (-30.0, -72.0),
        (-20.0, -70.0), (-15.0, -70.0), (-5.0, -80.0), (0.0, -80.0), (10.0, -80.0),
    ],
    // Europe
    &[
        (36.0, -10.0), (36.0, -5.0), (38.0, 0.0), (43.0, 5.0), (44.0, 10.0), (45.0, 15.0),
        (40.0, 20.0), (37.0, 25.0), (40.0, 30.0), (42.0, 35.0), (43.0, 40.0), (55.0, 40.0),
        (60.0, 30.0), (65.0, 25.0), (70.0, 20.0), (71.0, 10.0), (62.0, 5.0), (58.0, 5.0),
        (58.0, -5.0), (52.0, -10.0), (48.0, -5.0), (43.0, -5.0), (36.0, -10.0),
    ],
    // West and southern Africa
    &[
        (15.0, -17.0), (10.0, -15.0), (5.0, -10.0), (5.0, 0.0), (5.0, 10.0), (0.0, 15.0),
        (-5.0, 20.0), (-10.0, 25.0), (-20.0, 35.0), (-25.0, 35.0), (-30.0, 30.0), (-35.0, 20.0),
        (-35.0, 18.0), (-30.0, 15.0), (-15.0, 10.0), (0.0, 10.0), (5.0, 5.0), (5.0, -5.0),
        (10.0, -10.0), (15.0, -17.0),
    ],
    // North and east Africa
    &[
        (15.0, -17.0), (20.0, -17.0), (28.0, -15.0), (35.0, -5.0), (37.0, 10.0), (33.0, 20.0),
        (32.0, 25.0), (30.0, 35.0), (20.0, 35.0), (12.0, 42.0), (12.0, 50.0), (5.0, 45.0),
        (-5.0, 35.0), (-20.0, 35.0),
    ],
    // Asia
    &[
        (42.0, 35.0), (43.0, 40.0), (40.0, 50.0), (37.0, 55.0), (25.0, 60.0), (25.0, 65.0),
        (20.0, 70.0), (15.0, 75.0), (8.0, 80.0), (15.0, 80.0), (22.0, 88.0), (22.0, 92.0),
        (16.0, 95.0), (14.0, 100.0), (10.0, 105.0), (20.0, 110.0), (22.0, 115.0), (22.0, 120.0),
        (25.0, 122.0), (30.0, 125.0), (35.0, 130.0), (35.0, 135.0), (40.0, 140.0), (45.0, 145.0),
        (50.0, 145.0), (55.0, 140.0), (55.0, 135.0), (52.0, 130.0), (43.0, 130.0), (40.0, 120.0),
        (45.0, 110.0), (50.0, 90.0), (55.0, 70.0), (55.0, 60.0), (50.0, 50.0), (43.0, 40.0),
    ],
    // Australia
    &[
        (-20.0, 115.0), (-18.0, 120.0), (-12.0, 130.0), (-12.0, 140.0), (-15.0, 145.0), (-25.0, 150.0),
        (-30.0, 153.0), (-35.0, 150.0), (-38.0, 145.0), (-38.0, 140.0), (-35.0, 135.0), (-32.0, 130.0),
        (-32.0, 125.0), (-35.0, 115.0), (-25.0, 115.0), (-20.0, 115.0),
    ],
];

/// A few coarse international borders as (lat, lng)
const BUILTIN_BORDERS: &[&[(f64, f64)]] = &[
    // Canada / United States
    &[
        (49.0, -123.3), (49.0, -110.0), (49.0, -95.2), (48.3, -89.5), (46.5, -84.5), (43.5, -79.0),
        (45.0, -74.7), (45.0, -71.5), (47.4, -69.2), (45.1, -67.4),
    ],
    // Canada / Alaska
    &[(69.6, -141.0), (60.3, -141.0), (59.5, -135.5), (56.0, -130.0), (54.7, -130.6)],
    // United States / Mexico
    &[
        (32.5, -117.1), (32.7, -114.7), (31.3, -111.1), (31.3, -108.2), (31.8, -106.5), (29.8, -104.5),
        (29.3, -103.1), (29.8, -101.4), (27.5, -99.5), (25.9, -97.1),
    ],
    // France / Spain
    &[(43.4, -1.8), (42.8, 0.0), (42.7, 1.8), (42.4, 3.2)],
    // Germany / Poland
    &[(54.0, 14.2), (52.8, 14.1), (51.9, 14.7), (51.0, 15.0)],
    // Brazil / Argentina / Uruguay
    &[(-25.6, -54.6), (-27.2, -53.8), (-28.1, -55.9), (-30.2, -57.6), (-32.4, -53.2), (-33.7, -53.4)],
    // Chile / Argentina
    &[
        (-22.0, -67.9), (-27.0, -68.3), (-32.0, -70.2), (-37.0, -71.1), (-42.0, -71.8), (-47.0, -72.4),
        (-52.0, -71.9),
    ],
    // India / China
    &[(35.5, 77.8), (32.5, 79.5), (30.8, 81.0), (28.0, 88.0), (27.8, 92.0), (29.0, 95.5), (28.2, 97.3)],
    // China / Mongolia
    &[(49.0, 87.8), (45.0, 90.5), (42.5, 96.0), (42.7, 105.0), (41.8, 110.0), (45.0, 113.5), (47.5, 119.7)],
    // Egypt / Sudan / Libya
    &[(22.0, 36.9), (22.0, 25.0), (31.5, 25.0)],
    // Western / South Australia
    &[(-13.8, 129.0), (-31.7, 129.0)],
];
