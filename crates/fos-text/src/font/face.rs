//! Font face backed by owned font data

use std::sync::Arc;
use ttf_parser::{Face, GlyphId, OutlineBuilder, Rect, Tag};
use super::gasp::GaspTable;
use super::{FontId, GlyphFace};
use crate::{Result, TextError};

/// A resolved font face.
///
/// Owns a copy of the font bytes so it can outlive the catalog that produced
/// it; the ttf-parser view is re-created per query, which only reads the
/// table directory.
pub struct FontFace {
    data: Arc<[u8]>,
    index: u32,
    /// Font ID in database
    pub id: FontId,
    family: String,
    units_per_em: u16,
}

impl FontFace {
    /// Parse a font face from data
    pub fn from_bytes(data: Arc<[u8]>, index: u32, id: FontId, family: String) -> Result<Self> {
        let units_per_em = Face::parse(&data, index)
            .map_err(|e| TextError::FontParsing(format!("{family}: {e}")))?
            .units_per_em();
        Ok(Self { data, index, id, family, units_per_em })
    }

    fn face(&self) -> Option<Face<'_>> {
        Face::parse(&self.data, self.index).ok()
    }
}

impl GlyphFace for FontFace {
    fn family_name(&self) -> &str {
        &self.family
    }

    fn units_per_em(&self) -> u16 {
        self.units_per_em
    }

    fn glyph_index(&self, c: char) -> Option<u16> {
        self.face()?.glyph_index(c).map(|g| g.0)
    }

    fn glyph_hor_advance(&self, glyph_id: u16) -> Option<u16> {
        self.face()?.glyph_hor_advance(GlyphId(glyph_id))
    }

    fn outline_glyph(&self, glyph_id: u16, builder: &mut dyn OutlineBuilder) -> Option<Rect> {
        self.face()?.outline_glyph(GlyphId(glyph_id), builder)
    }

    fn gasp(&self) -> Option<GaspTable> {
        let face = self.face()?;
        let data = face.raw_face().table(Tag::from_bytes(b"gasp"))?;
        GaspTable::parse(data)
    }
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("family", &self.family)
            .field("id", &self.id)
            .field("index", &self.index)
            .field("units_per_em", &self.units_per_em)
            .finish()
    }
}
