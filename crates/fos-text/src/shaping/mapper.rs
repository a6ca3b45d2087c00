//! Codepoint to glyph mapping

use crate::font::GlyphFace;
use crate::{Result, TextError};

/// The `.notdef` glyph id
pub const NOTDEF: u16 = 0;

/// Maps single codepoints to glyph ids through a face's cmap
#[derive(Debug, Clone, Copy, Default)]
pub struct GlyphMapper {
    reject_missing: bool,
}

impl GlyphMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail with [`TextError::MissingGlyph`] instead of returning `.notdef`
    pub fn reject_missing(mut self, reject: bool) -> Self {
        self.reject_missing = reject;
        self
    }

    /// Map a codepoint to its glyph id.
    ///
    /// Codepoints the face does not cover map to [`NOTDEF`] unless
    /// [`reject_missing`](Self::reject_missing) is set.
    pub fn map(&self, face: &dyn GlyphFace, codepoint: u32) -> Result<u16> {
        let c = char::from_u32(codepoint).ok_or(TextError::InvalidCodepoint(codepoint))?;
        let glyph_id = face.glyph_index(c).unwrap_or(NOTDEF);

        if glyph_id == NOTDEF {
            if self.reject_missing {
                return Err(TextError::MissingGlyph(codepoint));
            }
            tracing::warn!("{} has no glyph for U+{:04X}, using .notdef", face.family_name(), codepoint);
        } else {
            tracing::debug!("U+{:04X} -> glyph {}", codepoint, glyph_id);
        }
        Ok(glyph_id)
    }
}
