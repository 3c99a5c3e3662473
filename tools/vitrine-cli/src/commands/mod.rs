pub mod follow;
pub mod replay;
pub mod validate;
pub mod windows;

use std::path::{Path, PathBuf};

use vitrine_common::{AppConfig, LoggingConfig};
use vitrine_scene_model::{Point2D, Scene};

/// Explicit config path wins; otherwise the user config or defaults.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<AppConfig> {
    match path {
        Some(path) => AppConfig::load_from(path)
            .map_err(|e| anyhow::anyhow!("Failed to load config {}: {e}", path.display())),
        None => Ok(AppConfig::load()),
    }
}

/// The config file's logging section; `--verbose` raises the level to debug.
pub fn logging_config(config: &AppConfig, verbose: bool) -> LoggingConfig {
    let mut logging = config.logging.clone();
    if verbose {
        logging.level = "debug".to_string();
    }
    logging
}

pub fn load_scene(path: &PathBuf) -> anyhow::Result<Scene> {
    Scene::load_layout(path)
        .map_err(|e| anyhow::anyhow!("Failed to load layout {}: {e}", path.display()))
}

/// Parse "x,y".
pub fn parse_point(s: &str) -> anyhow::Result<Point2D> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| anyhow::anyhow!("Expected \"x,y\", got {s:?}"))?;
    let x: f64 = x.trim().parse()?;
    let y: f64 = y.trim().parse()?;
    Ok(Point2D::new(x, y))
}
