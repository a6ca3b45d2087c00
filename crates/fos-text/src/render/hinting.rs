//! Antialiasing, Grid Fitting and Rendering Parameters
//!
//! Knobs that decide how a glyph run turns into coverage.

/// Subpixel order of the target display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubpixelMode {
    /// RGB horizontal subpixel order (most common)
    #[default]
    Rgb,
    /// BGR horizontal subpixel order
    Bgr,
}

impl SubpixelMode {
    /// Channel index for each of the left, middle and right subpixels
    pub fn subpixel_order(&self) -> [usize; 3] {
        match self {
            Self::Rgb => [0, 1, 2], // R, G, B
            Self::Bgr => [2, 1, 0], // B, G, R
        }
    }
}

/// Antialiasing mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AntialiasMode {
    /// No antialiasing (binary)
    None,
    /// Grayscale antialiasing
    #[default]
    Grayscale,
    /// Subpixel antialiasing (LCD)
    Subpixel,
}

/// How advances are measured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MeasuringMode {
    /// Ideal design advances
    #[default]
    Natural,
    /// Whole-pixel advances, classic GDI compatible
    GdiClassic,
    /// Whole-pixel advances with natural glyph shapes
    GdiNatural,
}

impl MeasuringMode {
    /// Whether advances snap to whole pixels
    pub fn rounds_advances(&self) -> bool {
        !matches!(self, Self::Natural)
    }
}

/// Grid-fitting policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GridFitMode {
    #[default]
    Disabled,
    /// Snap glyph origins to whole pixels
    Enabled,
}

/// Coverage rendering variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverageMode {
    /// Binary coverage, one sample per pixel
    Aliased,
    /// Horizontal-only smoothing, GDI metrics
    GdiClassic,
    /// Horizontal-only smoothing, GDI natural metrics
    GdiNatural,
    /// Horizontal-only smoothing, natural metrics
    Natural,
    /// Smoothing in both directions
    NaturalSymmetric,
}

impl CoverageMode {
    /// Supersampling factor (horizontal, vertical) per device pixel.
    ///
    /// Horizontal factors are multiples of 3 so subpixel textures split evenly.
    pub fn oversampling(&self) -> (u32, u32) {
        match self {
            Self::Aliased => (1, 1),
            Self::GdiClassic | Self::GdiNatural | Self::Natural => (6, 1),
            Self::NaturalSymmetric => (6, 5),
        }
    }

    pub fn is_antialiased(&self) -> bool {
        !matches!(self, Self::Aliased)
    }
}

/// Alpha texture layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextureType {
    /// One coverage byte per pixel
    #[default]
    Aliased1x1,
    /// Three subpixel coverage bytes per pixel
    ClearType3x1,
}

impl TextureType {
    /// Bytes per pixel
    pub fn channels(&self) -> usize {
        match self {
            Self::Aliased1x1 => 1,
            Self::ClearType3x1 => 3,
        }
    }
}

/// Text rendering parameters consulted by the analyzer
#[derive(Debug, Clone)]
pub struct RenderingParams {
    /// At or above this ppem the recommendation is outline rendering
    pub outline_threshold: f32,
    /// At or above this ppem natural rendering becomes symmetric
    pub symmetric_threshold: f32,
    /// Below this ppem grid fitting is enabled
    pub grid_fit_threshold: f32,
    /// Subpixel order for ClearType textures
    pub pixel_geometry: SubpixelMode,
    /// Filter applied across subpixels
    pub filter: SubpixelFilter,
}

impl Default for RenderingParams {
    fn default() -> Self {
        Self {
            outline_threshold: 100.0,
            symmetric_threshold: 20.0,
            grid_fit_threshold: 20.0,
            pixel_geometry: SubpixelMode::Rgb,
            filter: SubpixelFilter::default(),
        }
    }
}

impl RenderingParams {
    /// Set the outline threshold in ppem
    pub fn outline_threshold(mut self, ppem: f32) -> Self {
        self.outline_threshold = ppem;
        self
    }
}

/// Subpixel filter for LCD rendering
#[derive(Debug, Clone, PartialEq)]
pub struct SubpixelFilter {
    /// Filter weights (5 taps)
    pub weights: [f32; 5],
}

impl Default for SubpixelFilter {
    fn default() -> Self {
        // FreeType default filter
        Self {
            weights: [0.08, 0.24, 0.36, 0.24, 0.08],
        }
    }
}

impl SubpixelFilter {
    /// Pass-through filter
    pub fn none() -> Self {
        Self {
            weights: [0.0, 0.0, 1.0, 0.0, 0.0],
        }
    }

    /// Filter one row of subpixel coverage in place.
    ///
    /// Taps past either end of the row read as zero coverage.
    pub fn apply_row(&self, row: &mut [u8]) {
        let source = row.to_vec();
        let len = source.len() as isize;

        for (i, out) in row.iter_mut().enumerate() {
            let mut value = 0.0f32;
            for (j, &weight) in self.weights.iter().enumerate() {
                let idx = i as isize + j as isize - 2;
                if (0..len).contains(&idx) {
                    value += source[idx as usize] as f32 * weight;
                }
            }
            *out = value.round().clamp(0.0, 255.0) as u8;
        }
    }
}
