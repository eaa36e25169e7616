mod braille;
mod ui;

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use globe::SnapshotConfig;

/// Config picked up from the working directory when none is given
const DEFAULT_CONFIG: &str = "globe.toml";

fn main() -> Result<()> {
    env_logger::init();

    let mut config_path: Option<PathBuf> = None;
    let mut preview = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--preview" | "-p" => preview = true,
            "--help" | "-h" => {
                println!("usage: globe [CONFIG.toml] [--preview]");
                return Ok(());
            }
            other if other.starts_with('-') => return Err(anyhow!("unknown flag {other}")),
            other => config_path = Some(PathBuf::from(other)),
        }
    }

    let config = load_config(config_path.as_deref())?;
    let scene = config.build_scene();
    log::info!(
        "Scene has {} drawables, centered on {:?}",
        scene.drawables().len(),
        scene.orientation().center()
    );

    if preview {
        return ui::run(&scene, &config.style);
    }

    let canvas = scene.render(config.resolution, &config.style);
    let size = canvas.size() as u32;
    let hash = canvas.content_hash();
    let image = image::RgbaImage::from_raw(size, size, canvas.into_rgba())
        .ok_or_else(|| anyhow!("pixel buffer does not match {size}x{size}"))?;
    image
        .save(&config.output)
        .with_context(|| format!("writing {}", config.output.display()))?;

    log::info!("Wrote {} ({}px, hash {:016x})", config.output.display(), size, hash);
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<SnapshotConfig> {
    match path {
        Some(path) => SnapshotConfig::load(path),
        None if Path::new(DEFAULT_CONFIG).exists() => SnapshotConfig::load(Path::new(DEFAULT_CONFIG)),
        None => {
            log::info!("No config given, rendering the default scene");
            Ok(SnapshotConfig::default())
        }
    }
}
