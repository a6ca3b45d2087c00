//! End-to-end pipeline tests against the in-memory "Test Mono" face

use std::fs::File;
use std::path::{Path, PathBuf};
use fos_glyph::{
    AntialiasSetting, ContainerSetting, ErrorKind, FontSize, GlyphConfig, Outcome, Pipeline, Stage, StageError,
    TextureSetting,
};
use fos_render::PixelFormat;
use fos_text::{
    CoverageMode, GaspBehavior, GridFitMode, GaspRange, GaspTable, SyntheticCatalog, SyntheticFace, TextError, TextureType,
};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("fos-glyph-{}-{}", name, std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn test_mono(codepoint: char, output: &Path) -> GlyphConfig {
    GlyphConfig {
        font_family: "Test Mono".to_string(),
        codepoint: codepoint as u32,
        font_size: FontSize::Pixels(64.0),
        output: output.to_path_buf(),
        ..GlyphConfig::default()
    }
}

/// Decode a PNG into (width, height, color type, unpadded pixel bytes)
fn decode_png(path: &Path) -> (u32, u32, png::ColorType, Vec<u8>) {
    let decoder = png::Decoder::new(File::open(path).unwrap());
    let mut reader = decoder.read_info().unwrap();
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf).unwrap();
    buf.truncate(info.buffer_size());
    (info.width, info.height, info.color_type, buf)
}

fn encoded(outcome: Outcome) -> fos_glyph::GlyphImage {
    match outcome {
        Outcome::Encoded(image) => image,
        other => panic!("expected an encoded image, got {other:?}"),
    }
}

#[test]
fn test_letter_renders_gray8_png() {
    let dir = scratch_dir("letter");
    let output = dir.join("a.png");

    let image = encoded(Pipeline::new(SyntheticCatalog::test_mono(), test_mono('A', &output)).run().unwrap());
    assert!(image.width() > 0 && image.height() > 0);
    assert_eq!(image.format, PixelFormat::Gray8);
    assert_eq!(image.texture, TextureType::Aliased1x1);
    // 64px stays below the 100px outline threshold
    assert!(!image.downgraded);

    let (width, height, color, pixels) = decode_png(&output);
    assert_eq!((width, height), (image.width(), image.height()));
    assert_eq!(color, png::ColorType::Grayscale);
    assert_eq!(pixels.len(), (width * height) as usize);
    assert!(pixels.iter().any(|&p| p == 255));

    // Tight bounds: every edge row and column holds some coverage
    let row = |y: u32| &pixels[(y * width) as usize..((y + 1) * width) as usize];
    assert!(row(0).iter().any(|&p| p > 0));
    assert!(row(height - 1).iter().any(|&p| p > 0));
    assert!((0..height).any(|y| row(y)[0] > 0));
    assert!((0..height).any(|y| row(y)[(width - 1) as usize] > 0));

    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn test_space_is_empty_and_writes_nothing() {
    let dir = scratch_dir("space");
    let output = dir.join("space.png");

    let outcome = Pipeline::new(SyntheticCatalog::test_mono(), test_mono(' ', &output)).run().unwrap();
    assert!(matches!(outcome, Outcome::Empty { glyph_id: 1 }));
    assert_eq!(outcome.exit_code(), 8);
    assert!(!output.exists());
    assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 0);

    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn test_absent_family_fails_resolution() {
    let dir = scratch_dir("absent");
    let output = dir.join("absent.png");
    let config = GlyphConfig {
        font_family: "No Such Family".to_string(),
        ..test_mono('A', &output)
    };

    let err = Pipeline::new(SyntheticCatalog::test_mono(), config).run().unwrap_err();
    assert_eq!(err.stage, Stage::Resolve);
    assert_eq!(err.kind, ErrorKind::Resolution);
    assert_eq!(err.kind.exit_code(), 2);
    assert!(matches!(err.source, StageError::Text(TextError::FontNotFound(_))));
    assert!(!output.exists());

    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn test_family_lookup_ignores_case() {
    let dir = scratch_dir("case");
    let output = dir.join("o.png");
    let config = GlyphConfig {
        font_family: "test mono".to_string(),
        ..test_mono('O', &output)
    };

    assert!(matches!(Pipeline::new(SyntheticCatalog::test_mono(), config).run(), Ok(Outcome::Encoded(_))));
    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn test_empty_catalog_fails_resolution() {
    let dir = scratch_dir("no-fonts");
    let err = Pipeline::new(SyntheticCatalog::default(), test_mono('A', &dir.join("x.png"))).run().unwrap_err();
    assert_eq!(err.kind, ErrorKind::Resolution);
    assert!(matches!(err.source, StageError::Text(TextError::CatalogUnavailable)));
    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn test_identical_runs_write_identical_files() {
    let dir = scratch_dir("determinism");
    let first = dir.join("first.png");
    let second = dir.join("second.png");

    Pipeline::new(SyntheticCatalog::test_mono(), test_mono('O', &first)).run().unwrap();
    Pipeline::new(SyntheticCatalog::test_mono(), test_mono('O', &second)).run().unwrap();
    assert_eq!(std::fs::read(&first).unwrap(), std::fs::read(&second).unwrap());

    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn test_cleartype_writes_rgb24() {
    let dir = scratch_dir("cleartype");
    let output = dir.join("a-rgb.png");
    let config = GlyphConfig {
        antialias: AntialiasSetting::Subpixel,
        texture: TextureSetting::ClearType3x1,
        ..test_mono('A', &output)
    };

    let image = encoded(Pipeline::new(SyntheticCatalog::test_mono(), config).run().unwrap());
    assert_eq!(image.format, PixelFormat::Rgb24);
    assert_eq!(image.texture, TextureType::ClearType3x1);

    let (width, height, color, pixels) = decode_png(&output);
    assert_eq!(color, png::ColorType::Rgb);
    assert_eq!(pixels.len(), (width * height * 3) as usize);

    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn test_unsupported_cleartype_falls_back_to_aliased() {
    let dir = scratch_dir("fallback");
    let output = dir.join("fallback.png");
    // Grayscale antialiasing cannot produce a 3x1 texture
    let config = GlyphConfig {
        texture: TextureSetting::ClearType3x1,
        ..test_mono('A', &output)
    };

    let image = encoded(Pipeline::new(SyntheticCatalog::test_mono(), config).run().unwrap());
    assert_eq!(image.texture, TextureType::Aliased1x1);
    assert_eq!(image.format, PixelFormat::Gray8);
    assert_eq!(decode_png(&output).2, png::ColorType::Grayscale);

    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn test_fallback_disabled_reports_analysis_error() {
    let dir = scratch_dir("no-fallback");
    let output = dir.join("none.png");
    // No DOGRAY flag at any size: the face only supports aliased rendering
    let face = SyntheticFace::test_mono().with_gasp(GaspTable::new(vec![GaspRange {
        max_ppem: u16::MAX,
        behavior: GaspBehavior(GaspBehavior::GRIDFIT),
    }]));
    let config = GlyphConfig {
        antialias: AntialiasSetting::Subpixel,
        texture: TextureSetting::ClearType3x1,
        fallback_to_aliased: false,
        ..test_mono('A', &output)
    };

    let err = Pipeline::new(SyntheticCatalog::new(vec![face]), config).run().unwrap_err();
    assert_eq!(err.stage, Stage::Rasterize);
    assert_eq!(err.kind, ErrorKind::Analysis);
    assert!(matches!(err.source, StageError::Text(TextError::UnsupportedTextureType { .. })));
    assert!(!output.exists());

    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn test_missing_glyph_renders_notdef() {
    let dir = scratch_dir("notdef");
    let output = dir.join("notdef.png");

    let image = encoded(Pipeline::new(SyntheticCatalog::test_mono(), test_mono('Z', &output)).run().unwrap());
    assert!(image.width() > 0 && image.height() > 0);
    assert!(output.exists());

    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn test_missing_glyph_rejected_when_configured() {
    let dir = scratch_dir("reject");
    let output = dir.join("reject.png");
    let config = GlyphConfig {
        reject_missing_glyph: true,
        ..test_mono('Z', &output)
    };

    let err = Pipeline::new(SyntheticCatalog::test_mono(), config).run().unwrap_err();
    assert_eq!(err.kind, ErrorKind::Mapping);
    assert!(matches!(err.source, StageError::Text(TextError::MissingGlyph(0x5A))));
    assert!(!output.exists());

    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn test_surrogate_codepoint_fails_mapping() {
    let dir = scratch_dir("surrogate");
    let config = GlyphConfig {
        codepoint: 0xD800,
        ..test_mono('A', &dir.join("s.png"))
    };

    let err = Pipeline::new(SyntheticCatalog::test_mono(), config).run().unwrap_err();
    assert_eq!(err.stage, Stage::Map);
    assert!(matches!(err.source, StageError::Text(TextError::InvalidCodepoint(0xD800))));

    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn test_large_size_downgrades_outline() {
    let dir = scratch_dir("outline");
    let output = dir.join("big.png");
    let config = GlyphConfig {
        font_size: FontSize::Points(120.0),
        ..test_mono('.', &output)
    };

    let image = encoded(Pipeline::new(SyntheticCatalog::test_mono(), config).run().unwrap());
    assert!(image.downgraded);
    assert_eq!(image.decision.mode, CoverageMode::NaturalSymmetric);
    assert_eq!(image.decision.grid_fit, GridFitMode::Disabled);
    // 120pt at 96 dpi is 160px; the period is 0.12em square
    assert!((19..=21).contains(&image.width()));

    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn test_huge_em_size_fails_rasterization() {
    let dir = scratch_dir("huge");
    let output = dir.join("huge.png");
    let config = GlyphConfig {
        font_size: FontSize::Pixels(1.0e10),
        ..test_mono('A', &output)
    };
    assert!(config.validate().is_ok());

    let err = Pipeline::new(SyntheticCatalog::test_mono(), config).run().unwrap_err();
    assert_eq!(err.stage, Stage::Rasterize);
    assert_eq!(err.kind, ErrorKind::Analysis);
    assert!(matches!(err.source, StageError::Text(TextError::RasterizationFailed(_))));
    assert!(!output.exists());

    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn test_bmp_container() {
    let dir = scratch_dir("bmp");
    let output = dir.join("a.bmp");
    let config = GlyphConfig {
        container: ContainerSetting::Bmp,
        ..test_mono('A', &output)
    };

    encoded(Pipeline::new(SyntheticCatalog::test_mono(), config).run().unwrap());
    assert_eq!(&std::fs::read(&output).unwrap()[..2], b"BM");

    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn test_unwritable_output_fails_encoding() {
    let dir = scratch_dir("unwritable");
    let output = dir.join("missing").join("a.png");

    let err = Pipeline::new(SyntheticCatalog::test_mono(), test_mono('A', &output)).run().unwrap_err();
    assert_eq!(err.stage, Stage::Encode);
    assert_eq!(err.kind.exit_code(), 6);
    assert!(!output.exists());

    let _ = std::fs::remove_dir_all(dir);
}
