//! Pipeline errors

use fos_render::RenderError;
use fos_text::TextError;

/// Pipeline stage, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Resolve,
    Map,
    SelectMode,
    Rasterize,
    Pack,
    Encode,
}

impl Stage {
    /// Error kind reported for failures in this stage
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Resolve => ErrorKind::Resolution,
            Self::Map => ErrorKind::Mapping,
            Self::SelectMode | Self::Rasterize => ErrorKind::Analysis,
            Self::Pack => ErrorKind::Packing,
            Self::Encode => ErrorKind::Encoding,
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Resolve => "font resolution",
            Self::Map => "glyph mapping",
            Self::SelectMode => "rendering mode selection",
            Self::Rasterize => "coverage rasterization",
            Self::Pack => "pixel packing",
            Self::Encode => "image encoding",
        };
        f.write_str(name)
    }
}

/// Error taxonomy, one process exit code each
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Resolution,
    Mapping,
    Analysis,
    Packing,
    Encoding,
    Config,
}

impl ErrorKind {
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Resolution => 2,
            Self::Mapping => 3,
            Self::Analysis => 4,
            Self::Packing => 5,
            Self::Encoding => 6,
            Self::Config => 7,
        }
    }
}

/// Error raised inside a stage
#[derive(Debug, thiserror::Error)]
pub enum StageError {
    #[error(transparent)]
    Text(#[from] TextError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

/// A failed pipeline run
#[derive(Debug, thiserror::Error)]
#[error("{stage} failed: {source}")]
pub struct PipelineError {
    pub stage: Stage,
    pub kind: ErrorKind,
    #[source]
    pub source: StageError,
}

impl PipelineError {
    pub fn new(stage: Stage, source: impl Into<StageError>) -> Self {
        Self {
            stage,
            kind: stage.kind(),
            source: source.into(),
        }
    }
}
