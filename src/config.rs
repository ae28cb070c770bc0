//! Configuration persistence for tagger settings

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::domain::Size;

/// Serializable color representation for config storage
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Default for ShapeColor {
    fn default() -> Self {
        // Dashboard accent blue
        Self {
            r: 0.0,
            g: 0.48,
            b: 1.0,
        }
    }
}

impl ShapeColor {
    /// Convert to RGBA bytes (0-255) with the given opacity
    pub fn to_rgba_u8(self, opacity: f32) -> [u8; 4] {
        [
            (self.r * 255.0).round() as u8,
            (self.g * 255.0).round() as u8,
            (self.b * 255.0).round() as u8,
            (opacity.clamp(0.0, 1.0) * 255.0).round() as u8,
        ]
    }
}

/// Region drawing tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ShapeTool {
    #[default]
    Rectangle,
    Circle,
    Polyline,
}

impl ShapeTool {
    /// Get the next shape tool in the cycle
    pub fn next(self) -> Self {
        match self {
            ShapeTool::Rectangle => ShapeTool::Circle,
            ShapeTool::Circle => ShapeTool::Polyline,
            ShapeTool::Polyline => ShapeTool::Rectangle,
        }
    }
}

/// Tagger configuration persisted between sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaggerConfig {
    /// Width of the display surface in display units
    pub display_width: u32,
    /// Height of the display surface in display units
    pub display_height: u32,
    /// Drags at or below this size (per axis, or radius) are discarded
    pub min_shape_size: f32,
    /// Tool selected when a session starts
    pub default_tool: ShapeTool,
    /// Fill color for committed and preview regions
    pub fill_color: ShapeColor,
    /// Fill opacity (0.0-1.0)
    pub fill_opacity: f32,
    /// Outline color for regions
    pub stroke_color: ShapeColor,
    /// Outline width in display units
    pub stroke_width: f32,
}

impl Default for TaggerConfig {
    fn default() -> Self {
        Self {
            display_width: 288,
            display_height: 400,
            min_shape_size: 5.0,
            default_tool: ShapeTool::Rectangle,
            fill_color: ShapeColor::default(),
            fill_opacity: 0.3,
            stroke_color: ShapeColor::default(),
            stroke_width: 2.0,
        }
    }
}

impl TaggerConfig {
    /// Directory name under the platform config dir
    pub const APP_DIR: &'static str = "uniform-tagger";
    /// Config file name
    pub const FILE_NAME: &'static str = "config.json";

    /// Display surface size in display units
    pub fn display_size(&self) -> Size {
        Size::new(self.display_width as f32, self.display_height as f32)
    }

    /// Default location of the config file
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(Self::APP_DIR).join(Self::FILE_NAME))
    }

    /// Load configuration from disk, or return defaults if unavailable
    pub fn load() -> Self {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => {
                log::warn!("No config directory available, using defaults");
                Self::default()
            }
        }
    }

    /// Load configuration from a specific file, or return defaults
    pub fn load_from(path: &Path) -> Self {
        match Self::read(path) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Error loading config, using defaults: {err:#}");
                Self::default()
            }
        }
    }

    fn read(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = serde_json::from_str(&json)
            .with_context(|| format!("Malformed config file: {}", path.display()))?;
        Ok(config)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> anyhow::Result<()> {
        let path = Self::default_path().context("No config directory available")?;
        self.save_to(&path)
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_tool_cycle() {
        assert_eq!(ShapeTool::Rectangle.next(), ShapeTool::Circle);
        assert_eq!(ShapeTool::Circle.next(), ShapeTool::Polyline);
        assert_eq!(ShapeTool::Polyline.next(), ShapeTool::Rectangle);
    }

    #[test]
    fn test_color_to_rgba() {
        let c = ShapeColor {
            r: 1.0,
            g: 0.0,
            b: 0.5,
        };
        assert_eq!(c.to_rgba_u8(1.0), [255, 0, 128, 255]);
        assert_eq!(c.to_rgba_u8(2.0)[3], 255);
        assert_eq!(c.to_rgba_u8(0.0)[3], 0);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(TaggerConfig::FILE_NAME);

        let config = TaggerConfig {
            display_width: 320,
            min_shape_size: 8.0,
            default_tool: ShapeTool::Polyline,
            ..TaggerConfig::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(TaggerConfig::load_from(&path), config);
    }

    #[test]
    fn test_missing_or_malformed_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.json");
        assert_eq!(TaggerConfig::load_from(&missing), TaggerConfig::default());

        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, "{ not json").unwrap();
        assert_eq!(TaggerConfig::load_from(&broken), TaggerConfig::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.json");
        std::fs::write(&path, r#"{ "stroke_width": 4.0 }"#).unwrap();

        let config = TaggerConfig::load_from(&path);
        assert_eq!(config.stroke_width, 4.0);
        assert_eq!(config.display_width, 288);
        assert_eq!(config.display_height, 400);
    }
}
