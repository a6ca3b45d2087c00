//! Codepoint mapping and glyph runs

mod mapper;
mod run;

pub use mapper::{GlyphMapper, NOTDEF};
pub use run::{GlyphOffset, GlyphRun};
