//! Glyph runs submitted for analysis

use crate::font::GlyphFace;
use crate::{Result, TextError};

/// Per-glyph placement offset in pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GlyphOffset {
    /// Offset along the advance direction
    pub advance_offset: f32,
    /// Offset perpendicular to the baseline, positive is up
    pub ascender_offset: f32,
}

/// A run of glyphs sharing one face and size.
///
/// Borrows the face, so the face must outlive the run.
#[derive(Clone)]
pub struct GlyphRun<'a> {
    face: &'a dyn GlyphFace,
    em_size: f32,
    glyph_ids: Vec<u16>,
    advances: Vec<f32>,
    offsets: Vec<GlyphOffset>,
    is_sideways: bool,
    bidi_level: u8,
}

impl<'a> GlyphRun<'a> {
    /// Create a run, checking that the per-glyph arrays line up
    pub fn new(
        face: &'a dyn GlyphFace,
        em_size: f32,
        glyph_ids: Vec<u16>,
        advances: Vec<f32>,
        offsets: Vec<GlyphOffset>,
    ) -> Result<Self> {
        if glyph_ids.len() != advances.len() || glyph_ids.len() != offsets.len() {
            return Err(TextError::InvalidGlyphRun(format!(
                "{} glyphs, {} advances, {} offsets",
                glyph_ids.len(),
                advances.len(),
                offsets.len()
            )));
        }
        if !em_size.is_finite() || em_size <= 0.0 {
            return Err(TextError::InvalidGlyphRun(format!("em size {em_size}")));
        }
        Ok(Self {
            face,
            em_size,
            glyph_ids,
            advances,
            offsets,
            is_sideways: false,
            bidi_level: 0,
        })
    }

    /// Run of one glyph with its natural advance and no offset
    pub fn single(face: &'a dyn GlyphFace, em_size: f32, glyph_id: u16) -> Result<Self> {
        let upem = face.units_per_em().max(1) as f32;
        let advance = face.glyph_hor_advance(glyph_id).unwrap_or(0) as f32 * em_size / upem;
        Self::new(face, em_size, vec![glyph_id], vec![advance], vec![GlyphOffset::default()])
    }

    pub fn sideways(mut self, is_sideways: bool) -> Self {
        self.is_sideways = is_sideways;
        self
    }

    pub fn bidi_level(mut self, level: u8) -> Self {
        self.bidi_level = level;
        self
    }

    pub fn face(&self) -> &'a dyn GlyphFace {
        self.face
    }

    /// Em size in pixels
    pub fn em_size(&self) -> f32 {
        self.em_size
    }

    pub fn glyph_ids(&self) -> &[u16] {
        &self.glyph_ids
    }

    pub fn advances(&self) -> &[f32] {
        &self.advances
    }

    pub fn offsets(&self) -> &[GlyphOffset] {
        &self.offsets
    }

    pub fn is_sideways(&self) -> bool {
        self.is_sideways
    }

    pub fn is_right_to_left(&self) -> bool {
        self.bidi_level & 1 == 1
    }

    /// Number of glyphs
    pub fn len(&self) -> usize {
        self.glyph_ids.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.glyph_ids.is_empty()
    }

    /// Scale factor from design units to pixels
    pub fn scale(&self) -> f32 {
        self.em_size / self.face.units_per_em() as f32
    }
}

impl std::fmt::Debug for GlyphRun<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlyphRun")
            .field("family", &self.face.family_name())
            .field("em_size", &self.em_size)
            .field("glyph_ids", &self.glyph_ids)
            .field("advances", &self.advances)
            .field("offsets", &self.offsets)
            .field("is_sideways", &self.is_sideways)
            .field("bidi_level", &self.bidi_level)
            .finish()
    }
}
