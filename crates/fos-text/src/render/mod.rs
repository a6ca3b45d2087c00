//! Glyph rendering module

mod analysis;
pub mod hinting;
mod mode;
mod outline;
mod rasterizer;

pub use analysis::{AnalysisParams, DeviceBounds, GlyphRunAnalysis, TextAnalyzer};
pub use hinting::{
    AntialiasMode, CoverageMode, GridFitMode, MeasuringMode, RenderingParams, SubpixelFilter,
    SubpixelMode, TextureType,
};
pub use mode::{CoverageDecision, RenderingDecision, RenderingModeSelector, Selection, OUTLINE_FALLBACK};
pub use rasterizer::{CoverageBuffer, CoverageRasterizer};
