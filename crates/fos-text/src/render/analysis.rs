//! Glyph run analysis: rendering mode recommendation and alpha textures

use std::cell::OnceCell;
use crate::font::GlyphFace;
use crate::shaping::GlyphRun;
use crate::{Result, TextError};
use super::hinting::{
    AntialiasMode, CoverageMode, GridFitMode, MeasuringMode, RenderingParams, TextureType,
};
use super::mode::{CoverageDecision, RenderingDecision};
use super::outline::{self, Placement};

/// Largest supersampled surface edge, in samples
const MAX_SURFACE_DIMENSION: u32 = 16384;

/// Integer rectangle in device pixels, right/bottom exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct DeviceBounds {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl DeviceBounds {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right: right.max(left),
            bottom: bottom.max(top),
        }
    }

    pub fn width(&self) -> u32 {
        self.right.abs_diff(self.left)
    }

    pub fn height(&self) -> u32 {
        self.bottom.abs_diff(self.top)
    }

    pub fn area(&self) -> u64 {
        self.width() as u64 * self.height() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.area() == 0
    }
}

/// Inputs for [`TextAnalyzer::create_glyph_run_analysis`]
#[derive(Debug, Clone, Copy)]
pub struct AnalysisParams {
    pub decision: CoverageDecision,
    pub measuring_mode: MeasuringMode,
    pub antialias: AntialiasMode,
    pub dpi_x: f32,
    pub dpi_y: f32,
    pub baseline_origin: (f32, f32),
}

impl AnalysisParams {
    /// 96 DPI, natural measuring, origin (0, 0)
    pub fn new(decision: CoverageDecision, antialias: AntialiasMode) -> Self {
        Self {
            decision,
            measuring_mode: MeasuringMode::Natural,
            antialias,
            dpi_x: 96.0,
            dpi_y: 96.0,
            baseline_origin: (0.0, 0.0),
        }
    }

    pub fn dpi(mut self, dpi_x: f32, dpi_y: f32) -> Self {
        self.dpi_x = dpi_x;
        self.dpi_y = dpi_y;
        self
    }

    pub fn measuring_mode(mut self, mode: MeasuringMode) -> Self {
        self.measuring_mode = mode;
        self
    }

    pub fn baseline_origin(mut self, x: f32, y: f32) -> Self {
        self.baseline_origin = (x, y);
        self
    }
}

fn check_dpi(dpi_x: f32, dpi_y: f32) -> Result<()> {
    if dpi_x.is_finite() && dpi_y.is_finite() && dpi_x > 0.0 && dpi_y > 0.0 {
        Ok(())
    } else {
        Err(TextError::InvalidGlyphRun(format!("DPI {dpi_x}x{dpi_y}")))
    }
}

/// Text analysis service.
///
/// Built per pipeline run and passed by reference; holds no global state.
#[derive(Debug, Clone, Default)]
pub struct TextAnalyzer {
    params: RenderingParams,
}

impl TextAnalyzer {
    pub fn new(params: RenderingParams) -> Self {
        Self { params }
    }

    /// Recommend a rendering strategy for a face at a size.
    ///
    /// `em_size` is in pixels at `dpi_y`.
    pub fn recommended_rendering_mode(
        &self,
        face: &dyn GlyphFace,
        em_size: f32,
        dpi_x: f32,
        dpi_y: f32,
        measuring_mode: MeasuringMode,
        antialias: AntialiasMode,
    ) -> Result<RenderingDecision> {
        check_dpi(dpi_x, dpi_y)?;
        if !em_size.is_finite() || em_size <= 0.0 {
            return Err(TextError::InvalidGlyphRun(format!("em size {em_size}")));
        }

        let ppem = em_size * dpi_x.max(dpi_y) / dpi_y;
        let gasp = face.gasp().and_then(|table| table.behavior(ppem.round().min(u16::MAX as f32) as u16));
        let grid_fit = if ppem < self.params.grid_fit_threshold && gasp.is_none_or(|b| b.grid_fit()) {
            GridFitMode::Enabled
        } else {
            GridFitMode::Disabled
        };

        if antialias == AntialiasMode::None {
            return Ok(RenderingDecision::RasterizedCoverage(CoverageDecision {
                mode: CoverageMode::Aliased,
                grid_fit: GridFitMode::Enabled,
            }));
        }
        if ppem >= self.params.outline_threshold {
            return Ok(RenderingDecision::Outline);
        }
        if gasp.is_some_and(|b| !b.gray()) {
            return Ok(RenderingDecision::RasterizedCoverage(CoverageDecision {
                mode: CoverageMode::Aliased,
                grid_fit: GridFitMode::Enabled,
            }));
        }

        let mode = match measuring_mode {
            MeasuringMode::GdiClassic => CoverageMode::GdiClassic,
            MeasuringMode::GdiNatural => CoverageMode::GdiNatural,
            MeasuringMode::Natural => {
                if ppem >= self.params.symmetric_threshold || gasp.is_some_and(|b| b.symmetric_smoothing()) {
                    CoverageMode::NaturalSymmetric
                } else {
                    CoverageMode::Natural
                }
            }
        };
        Ok(RenderingDecision::RasterizedCoverage(CoverageDecision { mode, grid_fit }))
    }

    /// Prepare a run for coverage queries
    pub fn create_glyph_run_analysis(&self, run: &GlyphRun<'_>, params: AnalysisParams) -> Result<GlyphRunAnalysis> {
        check_dpi(params.dpi_x, params.dpi_y)?;

        let path = outline::run_path(run, Placement {
            aspect: params.dpi_x / params.dpi_y,
            origin: params.baseline_origin,
            grid_fit: params.decision.grid_fit,
            measuring_mode: params.measuring_mode,
        });
        tracing::debug!(
            "Analyzing {} glyph(s) at {}px, {:?}, path bounds {:?}",
            run.len(),
            run.em_size(),
            params.decision,
            path.as_ref().map(|p| p.bounds())
        );

        Ok(GlyphRunAnalysis {
            path,
            mode: params.decision.mode,
            antialias: params.antialias,
            params: self.params.clone(),
            aliased: OnceCell::new(),
            cleartype: OnceCell::new(),
        })
    }
}

/// Rasterized coverage cached per texture type
#[derive(Debug)]
struct Texture {
    bounds: DeviceBounds,
    channels: usize,
    data: Vec<u8>,
}

impl Texture {
    fn empty(channels: usize) -> Self {
        Self { bounds: DeviceBounds::default(), channels, data: Vec::new() }
    }

    /// Shrink to the rows and columns holding non-zero coverage
    fn trimmed(self) -> Self {
        let width = self.bounds.width() as usize;
        let height = self.bounds.height() as usize;
        let row_bytes = width * self.channels;
        let (mut x0, mut y0, mut x1, mut y1) = (width, height, 0, 0);

        for y in 0..height {
            let row = &self.data[y * row_bytes..(y + 1) * row_bytes];
            for (x, pixel) in row.chunks_exact(self.channels).enumerate() {
                if pixel.iter().any(|&c| c != 0) {
                    x0 = x0.min(x);
                    x1 = x1.max(x + 1);
                    y0 = y0.min(y);
                    y1 = y1.max(y + 1);
                }
            }
        }
        if x1 <= x0 || y1 <= y0 {
            return Self::empty(self.channels);
        }
        if (x0, y0, x1, y1) == (0, 0, width, height) {
            return self;
        }

        let mut data = Vec::with_capacity((x1 - x0) * (y1 - y0) * self.channels);
        for y in y0..y1 {
            let start = y * row_bytes + x0 * self.channels;
            data.extend_from_slice(&self.data[start..start + (x1 - x0) * self.channels]);
        }
        Self {
            bounds: DeviceBounds::new(
                self.bounds.left + x0 as i32,
                self.bounds.top + y0 as i32,
                self.bounds.left + x1 as i32,
                self.bounds.top + y1 as i32,
            ),
            channels: self.channels,
            data,
        }
    }
}

/// Analysis of one glyph run, answering bounds and coverage queries
pub struct GlyphRunAnalysis {
    path: Option<tiny_skia::Path>,
    mode: CoverageMode,
    antialias: AntialiasMode,
    params: RenderingParams,
    aliased: OnceCell<Texture>,
    cleartype: OnceCell<Texture>,
}

impl GlyphRunAnalysis {
    /// Whether this analysis can produce the texture type
    pub fn supports(&self, texture: TextureType) -> bool {
        match texture {
            TextureType::Aliased1x1 => true,
            TextureType::ClearType3x1 => {
                self.antialias == AntialiasMode::Subpixel && self.mode.is_antialiased()
            }
        }
    }

    /// Minimal bounds of non-zero coverage for the texture type
    pub fn alpha_texture_bounds(&self, texture: TextureType) -> Result<DeviceBounds> {
        Ok(self.texture(texture)?.bounds)
    }

    /// Write coverage for `bounds` into `buffer`, row-major and unpadded.
    ///
    /// Pixels of `bounds` outside the coverage rectangle are written as zero.
    pub fn create_alpha_texture(&self, texture: TextureType, bounds: DeviceBounds, buffer: &mut [u8]) -> Result<()> {
        let cached = self.texture(texture)?;
        let channels = texture.channels();
        let row_bytes = bounds.width() as usize * channels;
        let needed = row_bytes * bounds.height() as usize;
        if buffer.len() < needed {
            return Err(TextError::InsufficientBuffer { needed, actual: buffer.len() });
        }

        let buffer = &mut buffer[..needed];
        buffer.fill(0);

        let src = cached.bounds;
        let left = bounds.left.max(src.left);
        let right = bounds.right.min(src.right);
        let top = bounds.top.max(src.top);
        let bottom = bounds.bottom.min(src.bottom);
        if right <= left || bottom <= top {
            return Ok(());
        }

        let span = right.abs_diff(left) as usize * channels;
        let src_row_bytes = src.width() as usize * channels;
        for y in top..bottom {
            let src_start = y.abs_diff(src.top) as usize * src_row_bytes + left.abs_diff(src.left) as usize * channels;
            let dst_start = y.abs_diff(bounds.top) as usize * row_bytes + left.abs_diff(bounds.left) as usize * channels;
            buffer[dst_start..dst_start + span].copy_from_slice(&cached.data[src_start..src_start + span]);
        }
        Ok(())
    }

    fn texture(&self, texture: TextureType) -> Result<&Texture> {
        if !self.supports(texture) {
            return Err(TextError::UnsupportedTextureType {
                texture,
                mode: self.mode,
                antialias: self.antialias,
            });
        }

        let cell = match texture {
            TextureType::Aliased1x1 => &self.aliased,
            TextureType::ClearType3x1 => &self.cleartype,
        };
        if let Some(cached) = cell.get() {
            return Ok(cached);
        }
        let rendered = self.rasterize(texture)?;
        Ok(cell.get_or_init(|| rendered))
    }

    /// Supersample the path and reduce it to per-pixel or per-subpixel coverage
    fn rasterize(&self, texture: TextureType) -> Result<Texture> {
        let channels = texture.channels();
        let Some(path) = &self.path else {
            return Ok(Texture::empty(channels));
        };

        // Room for the subpixel filter to spread past the outline
        let pad = if texture == TextureType::ClearType3x1 { 1.0 } else { 0.0 };
        let (sx, sy) = self.mode.oversampling();
        let candidate = surface_bounds(path.bounds(), pad, sx, sy)?;
        if candidate.is_empty() {
            return Ok(Texture::empty(channels));
        }

        let width = candidate.width();
        let height = candidate.height();
        let (sample_w, sample_h) = match (width.checked_mul(sx), height.checked_mul(sy)) {
            (Some(w), Some(h)) if w <= MAX_SURFACE_DIMENSION && h <= MAX_SURFACE_DIMENSION => (w, h),
            _ => {
                return Err(TextError::RasterizationFailed(format!(
                    "{width}x{height} px at {sx}x{sy} samples exceeds surface limit"
                )));
            }
        };

        let mut pixmap = tiny_skia::Pixmap::new(sample_w, sample_h)
            .ok_or_else(|| TextError::RasterizationFailed(format!("cannot allocate {sample_w}x{sample_h} surface")))?;

        let mut paint = tiny_skia::Paint::default();
        paint.set_color(tiny_skia::Color::WHITE);
        // Point sampling; smoothing comes from the supersampled grid
        paint.anti_alias = false;

        let transform = tiny_skia::Transform::from_row(
            sx as f32,
            0.0,
            0.0,
            sy as f32,
            -(candidate.left as f32) * sx as f32,
            -(candidate.top as f32) * sy as f32,
        );
        pixmap.fill_path(path, &paint, tiny_skia::FillRule::Winding, transform, None);

        let samples: Vec<u8> = pixmap.pixels().iter().map(|p| p.alpha()).collect();
        let (width, height, sx, sy) = (width as usize, height as usize, sx as usize, sy as usize);
        let mut data = vec![0u8; width * height * channels];

        match texture {
            TextureType::Aliased1x1 => {
                for y in 0..height {
                    for x in 0..width {
                        data[y * width + x] = box_average(&samples, sample_w as usize, x * sx, y * sy, sx, sy);
                    }
                }
            }
            TextureType::ClearType3x1 => {
                let sub = sx / 3;
                let order = self.params.pixel_geometry.subpixel_order();
                let row_bytes = width * 3;
                for y in 0..height {
                    let row = &mut data[y * row_bytes..(y + 1) * row_bytes];
                    for (i, value) in row.iter_mut().enumerate() {
                        *value = box_average(&samples, sample_w as usize, i * sub, y * sy, sub, sy);
                    }
                    self.params.filter.apply_row(row);
                    if order != [0, 1, 2] {
                        for pixel in row.chunks_exact_mut(3) {
                            let spatial = [pixel[0], pixel[1], pixel[2]];
                            for (position, &channel) in order.iter().enumerate() {
                                pixel[channel] = spatial[position];
                            }
                        }
                    }
                }
            }
        }

        Ok(Texture { bounds: candidate, channels, data }.trimmed())
    }
}

/// Pixel-aligned device rectangle around `rect`, checked against the surface
/// limit while still in floating point
fn surface_bounds(rect: tiny_skia::Rect, pad: f32, sx: u32, sy: u32) -> Result<DeviceBounds> {
    let left = rect.left().floor() - pad;
    let top = rect.top().floor();
    let right = rect.right().ceil() + pad;
    let bottom = rect.bottom().ceil();

    let limit = MAX_SURFACE_DIMENSION as f32;
    // Edges stay far inside i32 so widths and offsets cannot overflow
    let edge_limit = (i32::MAX / 2) as f32;
    let fits = (right - left) * sx as f32 <= limit
        && (bottom - top) * sy as f32 <= limit
        && [left, top, right, bottom].iter().all(|v| v.abs() <= edge_limit);
    if !fits {
        return Err(TextError::RasterizationFailed(format!(
            "glyph bounds {left}..{right} x {top}..{bottom} at {sx}x{sy} samples exceed surface limit"
        )));
    }
    Ok(DeviceBounds::new(left as i32, top as i32, right as i32, bottom as i32))
}

/// Mean of a `w`x`h` block of 0/255 samples, rounded
fn box_average(samples: &[u8], stride: usize, x: usize, y: usize, w: usize, h: usize) -> u8 {
    let mut sum = 0u32;
    for row in y..y + h {
        let start = row * stride + x;
        sum += samples[start..start + w].iter().map(|&s| s as u32).sum::<u32>();
    }
    let n = (w * h) as u32;
    ((sum + n / 2) / n) as u8
}

impl std::fmt::Debug for GlyphRunAnalysis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlyphRunAnalysis")
            .field("mode", &self.mode)
            .field("antialias", &self.antialias)
            .field("has_path", &self.path.is_some())
            .finish()
    }
}
