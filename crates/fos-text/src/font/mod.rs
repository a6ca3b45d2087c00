//! Font loading, face selection and glyph queries

mod database;
mod face;
pub mod gasp;
#[cfg(any(test, feature = "test-support"))]
pub mod synthetic;

pub use database::FontDatabase;
pub use face::FontFace;

use ttf_parser::{OutlineBuilder, Rect};
use crate::Result;
use gasp::GaspTable;

/// Unique identifier for a loaded font
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FontId(pub fontdb::ID);

/// Font weight (100-900)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FontWeight(pub u16);

impl FontWeight {
    pub const NORMAL: FontWeight = FontWeight(400);
}

/// Font style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
    Oblique,
}

impl From<fontdb::Style> for FontStyle {
    fn from(style: fontdb::Style) -> Self {
        match style {
            fontdb::Style::Normal => FontStyle::Normal,
            fontdb::Style::Italic => FontStyle::Italic,
            fontdb::Style::Oblique => FontStyle::Oblique,
        }
    }
}

/// Glyph-level queries the analysis stage needs from a resolved face.
///
/// Implemented by [`FontFace`] for catalog fonts. Glyph ids are raw `u16`
/// values; id 0 is `.notdef`.
pub trait GlyphFace {
    /// Family name the face was resolved from
    fn family_name(&self) -> &str;

    /// Design units per em
    fn units_per_em(&self) -> u16;

    /// Map a character through the face's cmap
    fn glyph_index(&self, c: char) -> Option<u16>;

    /// Horizontal advance in design units
    fn glyph_hor_advance(&self, glyph_id: u16) -> Option<u16>;

    /// Emit the glyph outline in design units (y up).
    ///
    /// Returns the outline bounding box, or `None` when the glyph has no contours.
    fn outline_glyph(&self, glyph_id: u16, builder: &mut dyn OutlineBuilder) -> Option<Rect>;

    /// Parsed `gasp` table, if the face has one
    fn gasp(&self) -> Option<GaspTable>;
}

/// A font catalog able to resolve a family name to a face
pub trait FontCatalog {
    type Face: GlyphFace;

    /// Resolve the first normal weight/stretch/style face of `family`.
    fn resolve_family(&self, family: &str) -> Result<Self::Face>;
}
