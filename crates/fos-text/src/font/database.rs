//! Font database for loading and resolving fonts

use std::sync::Arc;
use fontdb::{Database, FaceInfo};
use super::{FontCatalog, FontFace, FontId, FontStyle, FontWeight};
use crate::{Result, TextError};

/// Font database backed by fontdb
pub struct FontDatabase {
    db: Database,
}

impl FontDatabase {
    /// Create a new empty font database
    pub fn new() -> Self {
        Self {
            db: Database::new(),
        }
    }

    /// Create a font database with system fonts loaded
    pub fn with_system_fonts() -> Self {
        let mut db = Database::new();
        db.load_system_fonts();
        tracing::debug!("Loaded {} system font faces", db.len());
        Self { db }
    }

    /// Find the index-ordered faces of a family (case-insensitive exact match)
    pub fn family_faces<'a>(&'a self, family: &'a str) -> impl Iterator<Item = &'a FaceInfo> + 'a {
        self.db.faces().filter(move |info| {
            info.families.iter().any(|(name, _)| name.eq_ignore_ascii_case(family))
        })
    }

    /// List all loaded font families
    pub fn families(&self) -> impl Iterator<Item = &str> {
        self.db.faces().filter_map(|f| f.families.first().map(|(name, _)| name.as_str()))
    }

    /// Number of loaded fonts
    pub fn len(&self) -> usize {
        self.db.len()
    }

    /// Check if database is empty
    pub fn is_empty(&self) -> bool {
        self.db.len() == 0
    }
}

impl Default for FontDatabase {
    fn default() -> Self {
        Self::new()
    }
}

fn is_normal_face(info: &FaceInfo) -> bool {
    info.weight.0 == FontWeight::NORMAL.0
        && info.stretch == fontdb::Stretch::Normal
        && FontStyle::from(info.style) == FontStyle::Normal
}

impl FontCatalog for FontDatabase {
    type Face = FontFace;

    fn resolve_family(&self, family: &str) -> Result<FontFace> {
        if self.is_empty() {
            return Err(TextError::CatalogUnavailable);
        }

        let mut faces = self.family_faces(family).peekable();
        if faces.peek().is_none() {
            return Err(TextError::FontNotFound(family.to_string()));
        }

        // No weight/style fallback: the first exact normal face wins
        let info = faces
            .find(|info| is_normal_face(info))
            .ok_or_else(|| TextError::FaceNotFound(family.to_string()))?;
        let id = FontId(info.id);
        tracing::debug!("Resolved {:?} to face {:?} ({})", family, id, info.post_script_name);

        let name = info.families.first().map(|(name, _)| name.clone()).unwrap_or_else(|| family.to_string());
        self.db
            .with_face_data(info.id, |data, index| FontFace::from_bytes(Arc::from(data), index, id, name))
            .ok_or_else(|| TextError::FontParsing(format!("face data for {family} is not readable")))?
    }
}
