//! Rendering mode selection

use crate::font::GlyphFace;
use crate::Result;
use super::analysis::TextAnalyzer;
use super::hinting::{AntialiasMode, CoverageMode, GridFitMode, MeasuringMode};

/// A coverage rendering variant plus its grid-fitting policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoverageDecision {
    pub mode: CoverageMode,
    pub grid_fit: GridFitMode,
}

/// Rendering strategy recommended for a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderingDecision {
    /// Emit vector outlines; there is no coverage texture in this strategy
    Outline,
    RasterizedCoverage(CoverageDecision),
}

impl RenderingDecision {
    /// The coverage decision, if this is a coverage strategy
    pub fn coverage(self) -> Option<CoverageDecision> {
        match self {
            Self::Outline => None,
            Self::RasterizedCoverage(decision) => Some(decision),
        }
    }
}

/// Coverage used in place of an outline recommendation
pub const OUTLINE_FALLBACK: CoverageDecision = CoverageDecision {
    mode: CoverageMode::NaturalSymmetric,
    grid_fit: GridFitMode::Disabled,
};

/// Selection result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    /// What the analyzer recommended
    pub recommended: RenderingDecision,
    /// What the rasterizer will execute
    pub coverage: CoverageDecision,
}

impl Selection {
    pub fn downgraded(&self) -> bool {
        self.recommended == RenderingDecision::Outline
    }
}

/// Asks the analyzer for a strategy and settles on a coverage variant.
///
/// Outline recommendations are downgraded to [`OUTLINE_FALLBACK`]: there is
/// no vector-geometry consumer, so very large sizes are rasterized instead.
#[derive(Debug, Clone, Copy)]
pub struct RenderingModeSelector {
    pub dpi_x: f32,
    pub dpi_y: f32,
    pub measuring_mode: MeasuringMode,
    pub antialias: AntialiasMode,
}

impl Default for RenderingModeSelector {
    fn default() -> Self {
        Self {
            dpi_x: 96.0,
            dpi_y: 96.0,
            measuring_mode: MeasuringMode::Natural,
            antialias: AntialiasMode::Grayscale,
        }
    }
}

impl RenderingModeSelector {
    pub fn select(&self, analyzer: &TextAnalyzer, face: &dyn GlyphFace, em_size: f32) -> Result<Selection> {
        let recommended = analyzer.recommended_rendering_mode(
            face,
            em_size,
            self.dpi_x,
            self.dpi_y,
            self.measuring_mode,
            self.antialias,
        )?;

        let coverage = match recommended {
            RenderingDecision::RasterizedCoverage(decision) => decision,
            RenderingDecision::Outline => {
                tracing::warn!(
                    "Outline rendering recommended for {} at {}px; rasterizing as {:?}",
                    face.family_name(),
                    em_size,
                    OUTLINE_FALLBACK.mode
                );
                OUTLINE_FALLBACK
            }
        };
        tracing::debug!("Rendering mode {:?}, grid fit {:?}", coverage.mode, coverage.grid_fit);
        Ok(Selection { recommended, coverage })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::synthetic::SyntheticFace;

    #[test]
    fn test_outline_downgraded() {
        let face = SyntheticFace::test_mono();
        let selection = RenderingModeSelector::default()
            .select(&TextAnalyzer::default(), &face, 300.0)
            .unwrap();
        assert!(selection.downgraded());
        assert_eq!(selection.coverage, OUTLINE_FALLBACK);
    }

    #[test]
    fn test_coverage_recommendation_kept() {
        let face = SyntheticFace::test_mono();
        let selection = RenderingModeSelector::default()
            .select(&TextAnalyzer::default(), &face, 64.0)
            .unwrap();
        assert!(!selection.downgraded());
        assert_eq!(Some(selection.coverage), selection.recommended.coverage());
    }
}
