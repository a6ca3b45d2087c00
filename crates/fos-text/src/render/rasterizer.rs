//! Glyph run rasterization to coverage buffers

use crate::shaping::GlyphRun;
use crate::{Result, TextError};
use super::analysis::{AnalysisParams, DeviceBounds, TextAnalyzer};
use super::hinting::{AntialiasMode, MeasuringMode, TextureType};
use super::mode::CoverageDecision;

/// Row-major, unpadded coverage bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageBuffer {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Bytes per pixel (1 aliased, 3 subpixel)
    pub channels: usize,
    pub data: Vec<u8>,
}

impl CoverageBuffer {
    /// Bytes per row
    pub fn row_bytes(&self) -> usize {
        self.width as usize * self.channels
    }

    /// Coverage of row `y`
    pub fn row(&self, y: u32) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let start = y as usize * self.row_bytes();
        self.data.get(start..start + self.row_bytes())
    }
}

/// Runs the coverage path of the analysis service for a glyph run
#[derive(Debug, Clone, Copy)]
pub struct CoverageRasterizer {
    pub dpi_x: f32,
    pub dpi_y: f32,
    pub measuring_mode: MeasuringMode,
}

impl Default for CoverageRasterizer {
    fn default() -> Self {
        Self {
            dpi_x: 96.0,
            dpi_y: 96.0,
            measuring_mode: MeasuringMode::Natural,
        }
    }
}

impl CoverageRasterizer {
    /// Rasterize a run at baseline origin (0, 0).
    ///
    /// Fails with [`TextError::EmptyBounds`] before allocating when the run has
    /// no coverage, and with [`TextError::UnsupportedTextureType`] when the
    /// texture cannot be produced. Never retries.
    pub fn rasterize(
        &self,
        analyzer: &TextAnalyzer,
        run: &GlyphRun<'_>,
        decision: CoverageDecision,
        antialias: AntialiasMode,
        texture: TextureType,
    ) -> Result<(DeviceBounds, CoverageBuffer)> {
        let params = AnalysisParams::new(decision, antialias)
            .dpi(self.dpi_x, self.dpi_y)
            .measuring_mode(self.measuring_mode);
        let analysis = analyzer.create_glyph_run_analysis(run, params)?;

        let bounds = analysis.alpha_texture_bounds(texture)?;
        if bounds.is_empty() {
            return Err(TextError::EmptyBounds);
        }

        let channels = texture.channels();
        let mut data = vec![0u8; bounds.area() as usize * channels];
        analysis.create_alpha_texture(texture, bounds, &mut data)?;
        tracing::debug!(
            "Rasterized {}x{} {:?} coverage at ({}, {})",
            bounds.width(),
            bounds.height(),
            texture,
            bounds.left,
            bounds.top
        );

        Ok((bounds, CoverageBuffer {
            width: bounds.width(),
            height: bounds.height(),
            channels,
            data,
        }))
    }
}
