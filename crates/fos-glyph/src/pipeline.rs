//! The glyph rendering pipeline

use std::path::PathBuf;
use fos_render::{ImageEncoder, PixelFormat, PixelImage, RenderError};
use fos_text::{
    AntialiasMode, CoverageBuffer, CoverageDecision, CoverageRasterizer, DeviceBounds, FontCatalog, GlyphMapper, GlyphRun,
    RenderingModeSelector, RenderingParams, TextAnalyzer, TextError, TextureType,
};
use crate::config::GlyphConfig;
use crate::error::{PipelineError, Stage};

/// Image written by a successful run
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphImage {
    pub path: PathBuf,
    /// Device bounds relative to the baseline origin
    pub bounds: DeviceBounds,
    pub format: PixelFormat,
    /// Texture actually rasterized, after any fallback
    pub texture: TextureType,
    pub decision: CoverageDecision,
    /// Whether an outline recommendation was rasterized instead
    pub downgraded: bool,
}

impl GlyphImage {
    pub fn width(&self) -> u32 {
        self.bounds.width()
    }

    pub fn height(&self) -> u32 {
        self.bounds.height()
    }
}

/// Result of a pipeline run
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Encoded(GlyphImage),
    /// The glyph has no coverage (whitespace); nothing was written
    Empty { glyph_id: u16 },
}

impl Outcome {
    /// Exit code for the binary
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Encoded(_) => 0,
            Self::Empty { .. } => 8,
        }
    }
}

/// Renders the configured codepoint with fonts from `catalog`.
///
/// Analysis and encoding services are built per run; nothing is shared
/// between runs.
pub struct Pipeline<C: FontCatalog> {
    catalog: C,
    config: GlyphConfig,
}

impl<C: FontCatalog> Pipeline<C> {
    pub fn new(catalog: C, config: GlyphConfig) -> Self {
        Self { catalog, config }
    }

    /// Run every stage once, failing fast
    pub fn run(&self) -> Result<Outcome, PipelineError> {
        let config = &self.config;
        let em_size = config.em_size();

        let face = self
            .catalog
            .resolve_family(&config.font_family)
            .map_err(|e| PipelineError::new(Stage::Resolve, e))?;
        tracing::debug!("Resolved family {}", config.font_family);

        let glyph_id = GlyphMapper::new()
            .reject_missing(config.reject_missing_glyph)
            .map(&face, config.codepoint)
            .map_err(|e| PipelineError::new(Stage::Map, e))?;
        let run = GlyphRun::single(&face, em_size, glyph_id).map_err(|e| PipelineError::new(Stage::Map, e))?;

        let antialias: AntialiasMode = config.antialias.into();
        let analyzer = TextAnalyzer::new(RenderingParams::default().outline_threshold(config.outline_threshold));
        let selector = RenderingModeSelector {
            dpi_x: config.dpi_x,
            dpi_y: config.dpi_y,
            measuring_mode: config.measuring_mode.into(),
            antialias,
        };
        let selection = selector
            .select(&analyzer, &face, em_size)
            .map_err(|e| PipelineError::new(Stage::SelectMode, e))?;

        let rasterizer = CoverageRasterizer {
            dpi_x: config.dpi_x,
            dpi_y: config.dpi_y,
            measuring_mode: config.measuring_mode.into(),
        };
        let mut texture: TextureType = config.texture.into();
        let mut result = rasterizer.rasterize(&analyzer, &run, selection.coverage, antialias, texture);
        if let Err(TextError::UnsupportedTextureType { .. }) = result {
            if texture == TextureType::ClearType3x1 && config.fallback_to_aliased {
                tracing::warn!(
                    "ClearType 3x1 unsupported for {:?} with {:?} antialiasing, retrying with aliased 1x1",
                    selection.coverage.mode,
                    antialias
                );
                texture = TextureType::Aliased1x1;
                result = rasterizer.rasterize(&analyzer, &run, selection.coverage, antialias, texture);
            }
        }

        let (bounds, coverage) = match result {
            Ok(rasterized) => rasterized,
            Err(TextError::EmptyBounds) => {
                tracing::info!(
                    "U+{:04X} (glyph {}) has no coverage, skipping encoding",
                    config.codepoint,
                    glyph_id
                );
                return Ok(Outcome::Empty { glyph_id });
            }
            Err(e) => return Err(PipelineError::new(Stage::Rasterize, e)),
        };

        let image = pack(&coverage).map_err(|e| PipelineError::new(Stage::Pack, e))?;

        ImageEncoder::new(config.container.into())
            .encode_to_file(&image, &config.output)
            .map_err(|e| PipelineError::new(Stage::Encode, e))?;

        Ok(Outcome::Encoded(GlyphImage {
            path: config.output.clone(),
            bounds,
            format: image.format(),
            texture,
            decision: selection.coverage,
            downgraded: selection.downgraded(),
        }))
    }
}

/// Wrap coverage in the pixel format matching its channel count
fn pack(coverage: &CoverageBuffer) -> Result<PixelImage, RenderError> {
    let format = PixelFormat::for_channels(coverage.channels).ok_or(RenderError::UnsupportedChannels(coverage.channels))?;
    PixelImage::from_coverage(coverage, format)
}
