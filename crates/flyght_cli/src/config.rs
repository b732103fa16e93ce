//! Loading the motion config and page documents named on the command line

use anyhow::{Context, Result};
use flyght_motion::{MotionConfig, Scene};
use std::fs;
use std::path::Path;

/// Load `flyght.toml` from `path`, or the defaults when none is given
pub fn load_config(path: Option<&Path>) -> Result<MotionConfig> {
    match path {
        Some(path) => MotionConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => {
            tracing::debug!("no config given, using defaults");
            Ok(MotionConfig::default())
        }
    }
}

/// Read a page document, falling back to the one bundled with `scene`
pub fn load_page(path: Option<&Path>, scene: Scene) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read page document {}", path.display())),
        None => Ok(scene.page().to_string()),
    }
}

/// Frame interval for a frame rate given on the command line
pub fn frame_interval(fps: u32) -> f32 {
    1.0 / fps.max(1) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_page_fallback() {
        let page = load_page(None, Scene::Film).unwrap();
        assert!(page.contains("flyingPlane"));
    }

    #[test]
    fn test_missing_config_has_context() {
        let err = load_config(Some(Path::new("/nonexistent/flyght.toml"))).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/flyght.toml"));
    }

    #[test]
    fn test_frame_interval() {
        assert_eq!(frame_interval(50), 0.02);
        assert_eq!(frame_interval(0), 1.0);
    }
}
