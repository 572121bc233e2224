//! Export configuration and output naming.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::svg::SvgStyle;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Which outputs to produce and where.
///
/// Paths left unset are derived from the source image name, see
/// [`ExportPaths::from_source`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default)]
    pub ellipse_path: Option<PathBuf>,
    #[serde(default)]
    pub polygon_path: Option<PathBuf>,
    #[serde(default)]
    pub svg_path: Option<PathBuf>,
    #[serde(default)]
    pub label_image_path: Option<PathBuf>,
    /// Also write the polygon record file. Off by default.
    #[serde(default)]
    pub write_polygons: bool,
    /// Also write the label image as a 16-bit PNG. Off by default.
    #[serde(default)]
    pub write_label_image: bool,
    #[serde(default)]
    pub svg: SvgStyle,
}

impl ExportConfig {
    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Resolve output paths for results of `source`, applying overrides.
    pub fn resolve_paths(&self, source: &Path) -> ExportPaths {
        let mut paths = ExportPaths::from_source(source);
        if let Some(p) = &self.ellipse_path {
            paths.ellipses = p.clone();
        }
        if let Some(p) = &self.polygon_path {
            paths.polygons = p.clone();
        }
        if let Some(p) = &self.svg_path {
            paths.svg = p.clone();
        }
        if let Some(p) = &self.label_image_path {
            paths.label_image = p.clone();
        }
        paths
    }
}

/// Concrete output locations for one export run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPaths {
    pub ellipses: PathBuf,
    pub polygons: PathBuf,
    pub svg: PathBuf,
    pub label_image: PathBuf,
}

impl ExportPaths {
    /// Derive output names next to `source` from its file stem:
    /// `<stem>_out_ellipse.txt`, `<stem>_out_polygon.txt`, `<stem>.svg`,
    /// `<stem>_labels.png`.
    pub fn from_source(source: &Path) -> Self {
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "output".to_string());
        let dir = source.parent().unwrap_or_else(|| Path::new(""));
        Self::in_dir(dir, &stem)
    }

    /// Same naming scheme rooted at `dir`.
    pub fn in_dir(dir: &Path, stem: &str) -> Self {
        Self {
            ellipses: dir.join(format!("{stem}_out_ellipse.txt")),
            polygons: dir.join(format!("{stem}_out_polygon.txt")),
            svg: dir.join(format!("{stem}.svg")),
            label_image: dir.join(format!("{stem}_labels.png")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_follow_source_stem() {
        let paths = ExportPaths::from_source(Path::new("data/ring.pgm"));
        assert_eq!(paths.ellipses, Path::new("data/ring_out_ellipse.txt"));
        assert_eq!(paths.polygons, Path::new("data/ring_out_polygon.txt"));
        assert_eq!(paths.svg, Path::new("data/ring.svg"));
        assert_eq!(paths.label_image, Path::new("data/ring_labels.png"));
    }

    #[test]
    fn overrides_replace_derived_paths() {
        let cfg = ExportConfig {
            svg_path: Some(PathBuf::from("/tmp/custom.svg")),
            ..ExportConfig::default()
        };
        let paths = cfg.resolve_paths(Path::new("img.pgm"));
        assert_eq!(paths.svg, Path::new("/tmp/custom.svg"));
        assert_eq!(paths.ellipses, Path::new("img_out_ellipse.txt"));
    }

    #[test]
    fn polygon_export_is_off_by_default() {
        let cfg: ExportConfig = serde_json::from_str("{}").expect("empty config");
        assert!(!cfg.write_polygons);
        assert!(!cfg.write_label_image);
        assert_eq!(cfg.svg, SvgStyle::default());
    }

    #[test]
    fn json_round_trip_on_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("export.json");
        let cfg = ExportConfig {
            write_polygons: true,
            ..ExportConfig::default()
        };
        cfg.write_json(&path).expect("write");
        assert_eq!(ExportConfig::load_json(&path).expect("load"), cfg);
    }
}
