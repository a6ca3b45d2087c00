//! Pipeline Configuration
//!
//! Every field has a built-in default; a JSON file named by
//! [`CONFIG_ENV`] may override any subset of them.

use std::path::{Path, PathBuf};
use anyhow::{ensure, Context};
use serde::{Deserialize, Serialize};
use fos_render::ContainerFormat;
use fos_text::{AntialiasMode, MeasuringMode, TextureType};

/// Environment variable holding the path of a JSON config file
pub const CONFIG_ENV: &str = "FOS_GLYPH_CONFIG";

/// Requested em size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontSize {
    Pixels(f32),
    Points(f32),
}

impl FontSize {
    /// Em size in pixels at `dpi`
    pub fn to_pixels(&self, dpi: f32) -> f32 {
        match *self {
            Self::Pixels(px) => px,
            Self::Points(pt) => pt * dpi / 72.0,
        }
    }

    fn value(&self) -> f32 {
        match *self {
            Self::Pixels(v) | Self::Points(v) => v,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasuringSetting {
    #[default]
    Natural,
    GdiClassic,
    GdiNatural,
}

impl From<MeasuringSetting> for MeasuringMode {
    fn from(setting: MeasuringSetting) -> Self {
        match setting {
            MeasuringSetting::Natural => Self::Natural,
            MeasuringSetting::GdiClassic => Self::GdiClassic,
            MeasuringSetting::GdiNatural => Self::GdiNatural,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AntialiasSetting {
    None,
    #[default]
    Grayscale,
    Subpixel,
}

impl From<AntialiasSetting> for AntialiasMode {
    fn from(setting: AntialiasSetting) -> Self {
        match setting {
            AntialiasSetting::None => Self::None,
            AntialiasSetting::Grayscale => Self::Grayscale,
            AntialiasSetting::Subpixel => Self::Subpixel,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextureSetting {
    #[default]
    #[serde(rename = "aliased_1x1")]
    Aliased1x1,
    #[serde(rename = "cleartype_3x1")]
    ClearType3x1,
}

impl From<TextureSetting> for TextureType {
    fn from(setting: TextureSetting) -> Self {
        match setting {
            TextureSetting::Aliased1x1 => Self::Aliased1x1,
            TextureSetting::ClearType3x1 => Self::ClearType3x1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerSetting {
    #[default]
    Png,
    Bmp,
}

impl From<ContainerSetting> for ContainerFormat {
    fn from(setting: ContainerSetting) -> Self {
        match setting {
            ContainerSetting::Png => Self::Png,
            ContainerSetting::Bmp => Self::Bmp,
        }
    }
}

/// Pipeline configuration options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlyphConfig {
    /// Family name looked up in the font catalog
    pub font_family: String,

    /// Unicode codepoint to render
    pub codepoint: u32,

    pub font_size: FontSize,

    /// Horizontal device resolution
    pub dpi_x: f32,

    /// Vertical device resolution
    pub dpi_y: f32,

    pub measuring_mode: MeasuringSetting,
    pub antialias: AntialiasSetting,
    pub texture: TextureSetting,

    /// ppem at and above which outline rendering is recommended
    pub outline_threshold: f32,

    /// Output file path
    pub output: PathBuf,

    pub container: ContainerSetting,

    /// Retry an unsupported ClearType 3x1 request with aliased 1x1 sampling
    pub fallback_to_aliased: bool,

    /// Fail mapping instead of rendering `.notdef`
    pub reject_missing_glyph: bool,
}

impl Default for GlyphConfig {
    fn default() -> Self {
        Self {
            font_family: "Segoe UI".to_string(),
            codepoint: 0x03B3, // γ
            font_size: FontSize::Pixels(64.0),
            dpi_x: 96.0,
            dpi_y: 96.0,
            measuring_mode: MeasuringSetting::Natural,
            antialias: AntialiasSetting::Grayscale,
            texture: TextureSetting::Aliased1x1,
            outline_threshold: 100.0,
            output: PathBuf::from("output.png"),
            container: ContainerSetting::Png,
            fallback_to_aliased: true,
            reject_missing_glyph: false,
        }
    }
}

impl GlyphConfig {
    /// Load the configuration named by [`CONFIG_ENV`], or the defaults when unset
    pub fn load() -> anyhow::Result<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(Path::new(&path)),
            None => {
                tracing::debug!("{} not set, using built-in configuration", CONFIG_ENV);
                Ok(Self::default())
            }
        }
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config = Self::from_json(&text).with_context(|| format!("invalid config file {}", path.display()))?;
        tracing::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse a (possibly partial) JSON document; missing fields keep their defaults
    pub fn from_json(text: &str) -> anyhow::Result<Self> {
        let config: Self = serde_json::from_str(text).context("malformed configuration JSON")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(!self.font_family.trim().is_empty(), "font_family must not be empty");
        let size = self.font_size.value();
        ensure!(size.is_finite() && size > 0.0, "font_size must be positive, got {}", size);
        for (name, dpi) in [("dpi_x", self.dpi_x), ("dpi_y", self.dpi_y)] {
            ensure!(dpi.is_finite() && dpi > 0.0, "{} must be positive, got {}", name, dpi);
        }
        ensure!(
            self.outline_threshold.is_finite() && self.outline_threshold > 0.0,
            "outline_threshold must be positive, got {}",
            self.outline_threshold
        );
        Ok(())
    }

    /// Em size in pixels, using the vertical resolution for point sizes
    pub fn em_size(&self) -> f32 {
        self.font_size.to_pixels(self.dpi_y)
    }
}
