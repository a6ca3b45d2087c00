//! fOS Text - Glyph Analysis and Coverage Rasterization
//!
//! This crate turns a single codepoint into alpha coverage:
//! - Font catalog lookup and face selection (fontdb)
//! - Codepoint to glyph mapping (ttf-parser)
//! - Rendering mode recommendation (gasp-aware)
//! - Device bounds and coverage textures (tiny-skia)

pub mod font;
pub mod shaping;
pub mod render;

pub use font::{FontCatalog, FontDatabase, FontFace, FontId, FontStyle, FontWeight, GlyphFace};
pub use font::gasp::{GaspBehavior, GaspRange, GaspTable};
pub use shaping::{GlyphMapper, GlyphOffset, GlyphRun};
pub use render::{
    AnalysisParams, AntialiasMode, CoverageBuffer, CoverageDecision, CoverageMode, CoverageRasterizer,
    DeviceBounds, GlyphRunAnalysis, GridFitMode, MeasuringMode, RenderingDecision, RenderingModeSelector,
    RenderingParams, Selection, SubpixelFilter, SubpixelMode, TextAnalyzer, TextureType,
};

#[cfg(any(test, feature = "test-support"))]
pub use font::synthetic::{SyntheticCatalog, SyntheticFace};

/// Text rendering error types
#[derive(Debug, thiserror::Error)]
pub enum TextError {
    #[error("Font family not found: {0}")]
    FontNotFound(String),

    #[error("Font catalog unavailable: no faces could be enumerated")]
    CatalogUnavailable,

    #[error("No normal weight/stretch/style face in family {0}")]
    FaceNotFound(String),

    #[error("Failed to parse font: {0}")]
    FontParsing(String),

    #[error("Not a Unicode scalar value: U+{0:04X}")]
    InvalidCodepoint(u32),

    #[error("Codepoint U+{0:04X} maps to .notdef")]
    MissingGlyph(u32),

    #[error("Malformed glyph run: {0}")]
    InvalidGlyphRun(String),

    #[error("Texture type {texture:?} is not supported for {mode:?} with {antialias:?} antialiasing")]
    UnsupportedTextureType {
        texture: TextureType,
        mode: CoverageMode,
        antialias: AntialiasMode,
    },

    #[error("Glyph run has empty device bounds")]
    EmptyBounds,

    #[error("Coverage buffer too small: need {needed} bytes, got {actual}")]
    InsufficientBuffer { needed: usize, actual: usize },

    #[error("Rasterization failed: {0}")]
    RasterizationFailed(String),
}

pub type Result<T> = std::result::Result<T, TextError>;
