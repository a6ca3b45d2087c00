//! fOS Render - Pixel Packing and Image Encoding
//!
//! Turns coverage buffers into strided pixel images and writes them to disk.

mod encode;
mod pixels;

pub use encode::{ContainerFormat, EncodeStep, ImageEncoder};
pub use pixels::{PixelFormat, PixelImage};

/// Rendering error types
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Image dimensions {width}x{height} are empty")]
    EmptyImage { width: u32, height: u32 },

    #[error("{format:?} needs {expected} channels, coverage has {actual}")]
    ChannelMismatch {
        format: PixelFormat,
        expected: usize,
        actual: usize,
    },

    #[error("No pixel format holds {0} channels")]
    UnsupportedChannels(usize),

    #[error("Source buffer is {actual} bytes, expected {expected}")]
    SourceSize { expected: usize, actual: usize },

    #[error("Stride {stride} is smaller than the {row_bytes} byte row")]
    StrideTooSmall { stride: usize, row_bytes: usize },

    #[error("{step} failed: {source}")]
    Encode {
        step: EncodeStep,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl RenderError {
    pub(crate) fn encode(step: EncodeStep, source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Encode { step, source: source.into() }
    }

    /// Whether the error came from the container encoder rather than packing
    pub fn is_encoding(&self) -> bool {
        matches!(self, Self::Encode { .. })
    }
}

pub type Result<T> = std::result::Result<T, RenderError>;
