//! fOS Glyph - Single Glyph Rendering Pipeline
//!
//! Resolves a font family, maps one codepoint, picks a rendering mode,
//! rasterizes coverage and writes it out as an image:
//!
//! resolve -> map -> select mode -> rasterize -> pack -> encode

pub mod config;
mod error;
mod pipeline;

pub use config::{
    AntialiasSetting, ContainerSetting, FontSize, GlyphConfig, MeasuringSetting, TextureSetting, CONFIG_ENV,
};
pub use error::{ErrorKind, PipelineError, Stage, StageError};
pub use pipeline::{GlyphImage, Outcome, Pipeline};

/// Version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
