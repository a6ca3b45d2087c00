//! Glyph run outlines in device space

use ttf_parser::OutlineBuilder;
use crate::shaping::GlyphRun;
use super::hinting::{GridFitMode, MeasuringMode};

/// Affine map from design units (y up) to device pixels (y down)
#[derive(Debug, Clone, Copy)]
struct GlyphTransform {
    xx: f32,
    xy: f32,
    yx: f32,
    yy: f32,
    tx: f32,
    ty: f32,
}

impl GlyphTransform {
    fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        (
            self.xx * x + self.xy * y + self.tx,
            self.yx * x + self.yy * y + self.ty,
        )
    }
}

/// Path builder that converts glyph outlines to a tiny-skia path
struct PathBuilder {
    builder: tiny_skia::PathBuilder,
    transform: GlyphTransform,
}

impl OutlineBuilder for PathBuilder {
    fn move_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.transform.apply(x, y);
        self.builder.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.transform.apply(x, y);
        self.builder.line_to(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let (x1, y1) = self.transform.apply(x1, y1);
        let (x, y) = self.transform.apply(x, y);
        self.builder.quad_to(x1, y1, x, y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let (x1, y1) = self.transform.apply(x1, y1);
        let (x2, y2) = self.transform.apply(x2, y2);
        let (x, y) = self.transform.apply(x, y);
        self.builder.cubic_to(x1, y1, x2, y2, x, y);
    }

    fn close(&mut self) {
        self.builder.close();
    }
}

/// Placement inputs for [`run_path`]
#[derive(Debug, Clone, Copy)]
pub(crate) struct Placement {
    /// Horizontal over vertical DPI
    pub aspect: f32,
    pub origin: (f32, f32),
    pub grid_fit: GridFitMode,
    pub measuring_mode: MeasuringMode,
}

/// Build the device-space path of a whole run.
///
/// Returns `None` when no glyph contributes a contour (whitespace).
pub(crate) fn run_path(run: &GlyphRun<'_>, placement: Placement) -> Option<tiny_skia::Path> {
    let face = run.face();
    let scale_y = run.scale();
    let scale_x = scale_y * placement.aspect;
    let rtl = run.is_right_to_left();
    let (origin_x, origin_y) = placement.origin;

    let mut builder = PathBuilder {
        builder: tiny_skia::PathBuilder::new(),
        transform: GlyphTransform { xx: 0.0, xy: 0.0, yx: 0.0, yy: 0.0, tx: 0.0, ty: 0.0 },
    };
    let mut pen = 0.0f32;

    for ((&glyph_id, &advance), offset) in run.glyph_ids().iter().zip(run.advances()).zip(run.offsets()) {
        let mut advance = advance * placement.aspect;
        if placement.measuring_mode.rounds_advances() {
            advance = advance.round();
        }
        if rtl {
            pen -= advance;
        }

        let along = offset.advance_offset * placement.aspect;
        let mut x = origin_x + if rtl { pen - along } else { pen + along };
        let mut y = origin_y - offset.ascender_offset;
        if placement.grid_fit == GridFitMode::Enabled {
            x = x.round();
            y = y.round();
        }

        builder.transform = if run.is_sideways() {
            // Rotated 90 degrees counter-clockwise about the glyph origin
            GlyphTransform { xx: 0.0, xy: -scale_x, yx: -scale_y, yy: 0.0, tx: x, ty: y }
        } else {
            GlyphTransform { xx: scale_x, xy: 0.0, yx: 0.0, yy: -scale_y, tx: x, ty: y }
        };
        if face.outline_glyph(glyph_id, &mut builder).is_none() {
            tracing::trace!("Glyph {} has no outline", glyph_id);
        }

        if !rtl {
            pen += advance;
        }
    }

    builder.builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::synthetic::SyntheticFace;

    fn placement() -> Placement {
        Placement {
            aspect: 1.0,
            origin: (0.0, 0.0),
            grid_fit: GridFitMode::Disabled,
            measuring_mode: MeasuringMode::Natural,
        }
    }

    #[test]
    fn test_glyph_sits_on_baseline() {
        let face = SyntheticFace::test_mono();
        let run = GlyphRun::single(&face, 100.0, 4).unwrap(); // '.'
        let bounds = run_path(&run, placement()).unwrap().bounds();

        // 240..360 x 0..120 design units at 0.1 px/unit, y flipped
        assert!((bounds.left() - 24.0).abs() < 1e-3);
        assert!((bounds.right() - 36.0).abs() < 1e-3);
        assert!((bounds.top() + 12.0).abs() < 1e-3);
        assert!(bounds.bottom().abs() < 1e-3);
    }

    #[test]
    fn test_whitespace_has_no_path() {
        let face = SyntheticFace::test_mono();
        let run = GlyphRun::single(&face, 64.0, 1).unwrap();
        assert!(run_path(&run, placement()).is_none());
    }

    #[test]
    fn test_right_to_left_places_glyph_before_origin() {
        let face = SyntheticFace::test_mono();
        let run = GlyphRun::single(&face, 100.0, 4).unwrap().bidi_level(1);
        let bounds = run_path(&run, placement()).unwrap().bounds();

        // Pen moves back by the 60px advance first
        assert!((bounds.left() + 36.0).abs() < 1e-3);
        assert!((bounds.right() + 24.0).abs() < 1e-3);
    }

    #[test]
    fn test_sideways_rotates_counter_clockwise() {
        let face = SyntheticFace::test_mono();
        let run = GlyphRun::single(&face, 100.0, 4).unwrap().sideways(true);
        let bounds = run_path(&run, placement()).unwrap().bounds();

        // (x, y) -> (-y, -x) in device space
        assert!((bounds.left() + 12.0).abs() < 1e-3);
        assert!(bounds.right().abs() < 1e-3);
        assert!((bounds.top() + 36.0).abs() < 1e-3);
        assert!((bounds.bottom() + 24.0).abs() < 1e-3);
    }

    #[test]
    fn test_anisotropic_dpi_stretches_horizontally() {
        let face = SyntheticFace::test_mono();
        let run = GlyphRun::single(&face, 100.0, 4).unwrap();
        let wide = Placement { aspect: 2.0, ..placement() };
        let bounds = run_path(&run, wide).unwrap().bounds();

        assert!((bounds.left() - 48.0).abs() < 1e-3);
        assert!((bounds.right() - 72.0).abs() < 1e-3);
        assert!((bounds.top() + 12.0).abs() < 1e-3);
    }
}
