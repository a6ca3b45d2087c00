//! In-memory faces for tests
//!
//! "Test Mono" is a 1000 upem monospace face with a handful of glyphs drawn
//! from straight lines and quadratic curves, enough to exercise the pipeline
//! without installed fonts.

use ttf_parser::{OutlineBuilder, Rect};
use super::gasp::GaspTable;
use super::{FontCatalog, GlyphFace};
use crate::{Result, TextError};

/// Outline command
#[derive(Debug, Clone, Copy)]
enum OutlineCommand {
    MoveTo(f32, f32),
    LineTo(f32, f32),
    QuadTo(f32, f32, f32, f32),
    Close,
}

#[derive(Debug, Clone)]
struct SyntheticGlyph {
    advance: u16,
    commands: Vec<OutlineCommand>,
}

impl SyntheticGlyph {
    fn blank(advance: u16) -> Self {
        Self { advance, commands: Vec::new() }
    }

    fn polygon(mut self, points: &[(f32, f32)]) -> Self {
        let Some((&(x0, y0), rest)) = points.split_first() else {
            return self;
        };
        self.commands.push(OutlineCommand::MoveTo(x0, y0));
        self.commands.extend(rest.iter().map(|&(x, y)| OutlineCommand::LineTo(x, y)));
        self.commands.push(OutlineCommand::Close);
        self
    }

    /// Axis-aligned ellipse from four quadratic arcs
    fn ellipse(mut self, cx: f32, cy: f32, rx: f32, ry: f32, clockwise: bool) -> Self {
        let (sx, sy) = if clockwise { (-1.0, 1.0) } else { (1.0, 1.0) };
        let p = |dx: f32, dy: f32| (cx + dx * rx * sx, cy + dy * ry * sy);
        let arcs = [
            (p(1.0, 1.0), p(0.0, 1.0)),
            (p(-1.0, 1.0), p(-1.0, 0.0)),
            (p(-1.0, -1.0), p(0.0, -1.0)),
            (p(1.0, -1.0), p(1.0, 0.0)),
        ];
        let (x0, y0) = p(1.0, 0.0);
        self.commands.push(OutlineCommand::MoveTo(x0, y0));
        for ((cx1, cy1), (x, y)) in arcs {
            self.commands.push(OutlineCommand::QuadTo(cx1, cy1, x, y));
        }
        self.commands.push(OutlineCommand::Close);
        self
    }
}

/// A procedurally defined face
#[derive(Debug, Clone)]
pub struct SyntheticFace {
    family: String,
    cmap: Vec<(char, u16)>,
    glyphs: Vec<SyntheticGlyph>,
    gasp: Option<GaspTable>,
}

impl SyntheticFace {
    pub const UNITS_PER_EM: u16 = 1000;
    pub const ADVANCE: u16 = 600;

    /// The "Test Mono" face: `.notdef` box, `A`, `O`, `.` and space
    pub fn test_mono() -> Self {
        let notdef = SyntheticGlyph::blank(Self::ADVANCE)
            .polygon(&[(50.0, 0.0), (550.0, 0.0), (550.0, 700.0), (50.0, 700.0)])
            .polygon(&[(100.0, 50.0), (100.0, 650.0), (500.0, 650.0), (500.0, 50.0)]);
        let a = SyntheticGlyph::blank(Self::ADVANCE)
            .polygon(&[
                (30.0, 0.0), (130.0, 0.0), (300.0, 560.0),
                (470.0, 0.0), (570.0, 0.0), (340.0, 700.0), (260.0, 700.0),
            ])
            .polygon(&[(150.0, 200.0), (450.0, 200.0), (450.0, 280.0), (150.0, 280.0)]);
        let o = SyntheticGlyph::blank(Self::ADVANCE)
            .ellipse(300.0, 350.0, 260.0, 360.0, false)
            .ellipse(300.0, 350.0, 170.0, 270.0, true);
        let period = SyntheticGlyph::blank(Self::ADVANCE)
            .polygon(&[(240.0, 0.0), (360.0, 0.0), (360.0, 120.0), (240.0, 120.0)]);

        Self {
            family: "Test Mono".to_string(),
            cmap: vec![(' ', 1), ('A', 2), ('O', 3), ('.', 4)],
            glyphs: vec![notdef, SyntheticGlyph::blank(Self::ADVANCE), a, o, period],
            gasp: None,
        }
    }

    pub fn with_gasp(mut self, gasp: GaspTable) -> Self {
        self.gasp = Some(gasp);
        self
    }
}

impl GlyphFace for SyntheticFace {
    fn family_name(&self) -> &str {
        &self.family
    }

    fn units_per_em(&self) -> u16 {
        Self::UNITS_PER_EM
    }

    fn glyph_index(&self, c: char) -> Option<u16> {
        self.cmap.iter().find(|(ch, _)| *ch == c).map(|&(_, id)| id)
    }

    fn glyph_hor_advance(&self, glyph_id: u16) -> Option<u16> {
        self.glyphs.get(glyph_id as usize).map(|g| g.advance)
    }

    fn outline_glyph(&self, glyph_id: u16, builder: &mut dyn OutlineBuilder) -> Option<Rect> {
        let glyph = self.glyphs.get(glyph_id as usize)?;
        if glyph.commands.is_empty() {
            return None;
        }

        let (mut x_min, mut y_min, mut x_max, mut y_max) = (f32::MAX, f32::MAX, f32::MIN, f32::MIN);
        let mut extend = |x: f32, y: f32| {
            x_min = x_min.min(x);
            y_min = y_min.min(y);
            x_max = x_max.max(x);
            y_max = y_max.max(y);
        };
        for command in &glyph.commands {
            match *command {
                OutlineCommand::MoveTo(x, y) => {
                    extend(x, y);
                    builder.move_to(x, y);
                }
                OutlineCommand::LineTo(x, y) => {
                    extend(x, y);
                    builder.line_to(x, y);
                }
                OutlineCommand::QuadTo(x1, y1, x, y) => {
                    extend(x1, y1);
                    extend(x, y);
                    builder.quad_to(x1, y1, x, y);
                }
                OutlineCommand::Close => builder.close(),
            }
        }

        Some(Rect {
            x_min: x_min.floor() as i16,
            y_min: y_min.floor() as i16,
            x_max: x_max.ceil() as i16,
            y_max: y_max.ceil() as i16,
        })
    }

    fn gasp(&self) -> Option<GaspTable> {
        self.gasp.clone()
    }
}

/// Catalog over a fixed list of synthetic faces
#[derive(Debug, Clone, Default)]
pub struct SyntheticCatalog {
    faces: Vec<SyntheticFace>,
}

impl SyntheticCatalog {
    pub fn new(faces: Vec<SyntheticFace>) -> Self {
        Self { faces }
    }

    /// Catalog holding only "Test Mono"
    pub fn test_mono() -> Self {
        Self::new(vec![SyntheticFace::test_mono()])
    }
}

impl FontCatalog for SyntheticCatalog {
    type Face = SyntheticFace;

    fn resolve_family(&self, family: &str) -> Result<SyntheticFace> {
        if self.faces.is_empty() {
            return Err(TextError::CatalogUnavailable);
        }
        self.faces
            .iter()
            .find(|face| face.family.eq_ignore_ascii_case(family))
            .cloned()
            .ok_or_else(|| TextError::FontNotFound(family.to_string()))
    }
}
