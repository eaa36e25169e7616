use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::canvas::Rgba;
use crate::data::BoundarySet;
use crate::scene::Scene;

/// Explicit render settings passed into every render call
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderStyle {
    pub background: Rgba,
    pub stroke: Rgba,
    /// Sampling step along curves, in degrees
    pub curve_step_degrees: f64,
    /// Bearing step around dot outlines, in degrees
    pub dot_bearing_step_degrees: f64,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            background: [255, 255, 255, 255],
            stroke: [34, 34, 34, 255],
            curve_step_degrees: 1.0,
            dot_bearing_step_degrees: 5.0,
        }
    }
}

/// One scene entry in a snapshot file
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DrawCommand {
    Graticule { spacing: f64 },
    Dot { lat: f64, lng: f64, radius: f64 },
    Line { from: [f64; 2], to: [f64; 2] },
    Rect { from: [f64; 2], to: [f64; 2] },
    Land,
    Countries,
}

/// Snapshot description read by the driver
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SnapshotConfig {
    pub output: PathBuf,
    pub resolution: usize,
    /// [lat, lng] the globe is centered on
    pub center: [f64; 2],
    /// GeoJSON land outlines
    pub land: Option<PathBuf>,
    /// GeoJSON country outlines
    pub countries: Option<PathBuf>,
    pub style: RenderStyle,
    pub draw: Vec<DrawCommand>,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from("globe.png"),
            resolution: 1024,
            center: [0.0, 0.0],
            land: None,
            countries: None,
            style: RenderStyle::default(),
            draw: vec![DrawCommand::Graticule { spacing: 10.0 }, DrawCommand::Land],
        }
    }
}

impl SnapshotConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Build the scene this snapshot describes, in file order
    pub fn build_scene(&self) -> Scene {
        let boundaries = BoundarySet::from_paths(self.land.as_deref(), self.countries.as_deref());
        let mut scene = Scene::with_boundaries(boundaries);

        for cmd in &self.draw {
            match *cmd {
                DrawCommand::Graticule { spacing } => scene.draw_graticule(spacing),
                DrawCommand::Dot { lat, lng, radius } => scene.draw_dot(lat, lng, radius),
                DrawCommand::Line { from, to } => scene.draw_line(from[0], from[1], to[0], to[1]),
                DrawCommand::Rect { from, to } => scene.draw_rect(from[0], from[1], to[0], to[1]),
                DrawCommand::Land => scene.draw_land_boundaries(),
                DrawCommand::Countries => scene.draw_country_boundaries(),
            }
        }
        scene.center_on(self.center[0], self.center[1]);

        scene
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Drawable;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = SnapshotConfig::from_toml("").unwrap();
        assert_eq!(SnapshotConfig::default(), config);
    }

    #[test]
    fn test_partial_style_keeps_other_defaults() {
        let config = SnapshotConfig::from_toml(
            r#"
            resolution = 256
            [style]
            stroke = [200, 0, 0, 255]
            "#,
        )
        .unwrap();
        assert_eq!(256, config.resolution);
        assert_eq!([200, 0, 0, 255], config.style.stroke);
        assert_eq!(RenderStyle::default().background, config.style.background);
        assert_eq!(1.0, config.style.curve_step_degrees);
    }

    #[test]
    fn test_draw_commands_in_order() {
        let config = SnapshotConfig::from_toml(
            r#"
            center = [48.0, 25.0]

            [[draw]]
            kind = "rect"
            from = [41.897209, 12.500285]
            to = [55.782693, 37.615993]

            [[draw]]
            kind = "dot"
            lat = 51.5
            lng = -0.1
            radius = 0.5

            [[draw]]
            kind = "countries"
            "#,
        )
        .unwrap();
        assert_eq!(3, config.draw.len());

        let scene = config.build_scene();
        assert_eq!(48.0, scene.orientation().center().lat);
        assert!(matches!(scene.drawables()[0], Drawable::Rect { .. }));
        assert!(matches!(scene.drawables()[1], Drawable::Dot { .. }));
        assert!(matches!(scene.drawables()[2], Drawable::Boundaries(_)));
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let err = SnapshotConfig::from_toml(
            r#"
            [[draw]]
            kind = "spiral"
            "#,
        );
        assert!(err.is_err());
    }
}
