//! Pack coverage, encode it, decode it again

use std::fs::File;
use std::path::PathBuf;
use fos_render::{ContainerFormat, EncodeStep, ImageEncoder, PixelFormat, PixelImage, RenderError};
use fos_text::CoverageBuffer;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("fos-render-it-{}-{}", name, std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn gradient(width: u32, height: u32, channels: usize) -> CoverageBuffer {
    let len = width as usize * height as usize * channels;
    CoverageBuffer {
        width,
        height,
        channels,
        data: (0..len).map(|i| (i * 7 % 256) as u8).collect(),
    }
}

#[test]
fn test_packed_rows_survive_png() {
    let dir = scratch_dir("png");
    let path = dir.join("gray.png");
    // Width 5 forces 3 bytes of row padding
    let coverage = gradient(5, 3, 1);
    let image = PixelImage::from_coverage(&coverage, PixelFormat::Gray8).unwrap();
    assert_eq!(image.stride(), 8);
    for y in 0..coverage.height {
        assert_eq!(image.row(y), coverage.row(y));
    }

    ImageEncoder::new(ContainerFormat::Png).encode_to_file(&image, &path).unwrap();

    let decoder = png::Decoder::new(File::open(&path).unwrap());
    let mut reader = decoder.read_info().unwrap();
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf).unwrap();
    assert_eq!((info.width, info.height), (5, 3));
    assert_eq!(info.color_type, png::ColorType::Grayscale);
    assert_eq!(info.bit_depth, png::BitDepth::Eight);
    assert_eq!(&buf[..info.buffer_size()], coverage.data.as_slice());

    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn test_rgb_png() {
    let dir = scratch_dir("rgb");
    let path = dir.join("rgb.png");
    let coverage = gradient(3, 2, 3);
    let image = PixelImage::from_coverage(&coverage, PixelFormat::Rgb24).unwrap();

    ImageEncoder::default().encode_to_file(&image, &path).unwrap();

    let decoder = png::Decoder::new(File::open(&path).unwrap());
    let mut reader = decoder.read_info().unwrap();
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf).unwrap();
    assert_eq!(info.color_type, png::ColorType::Rgb);
    assert_eq!(&buf[..info.buffer_size()], coverage.data.as_slice());

    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn test_overwrite_leaves_no_partial_file() {
    let dir = scratch_dir("overwrite");
    let path = dir.join("glyph.png");
    std::fs::write(&path, b"stale").unwrap();

    let image = PixelImage::from_coverage(&gradient(2, 2, 1), PixelFormat::Gray8).unwrap();
    ImageEncoder::default().encode_to_file(&image, &path).unwrap();

    assert_eq!(&std::fs::read(&path).unwrap()[..8], b"\x89PNG\r\n\x1a\n");
    let names: Vec<_> = std::fs::read_dir(&dir).unwrap().map(|e| e.unwrap().file_name()).collect();
    assert_eq!(names, vec![std::ffi::OsString::from("glyph.png")]);

    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn test_wrong_format_is_packing_error() {
    let err = PixelImage::from_coverage(&gradient(2, 2, 3), PixelFormat::Gray8).unwrap_err();
    assert!(matches!(err, RenderError::ChannelMismatch { expected: 1, actual: 3, .. }));
    assert!(!err.is_encoding());
}

#[test]
fn test_encode_error_names_step() {
    let dir = scratch_dir("step");
    let image = PixelImage::new(1, 1, PixelFormat::Gray8).unwrap();
    let err = ImageEncoder::default()
        .encode_to_file(&image, &dir.join("absent").join("x.png"))
        .unwrap_err();
    assert!(err.is_encoding());
    assert!(err.to_string().starts_with(&EncodeStep::CreateStream.to_string()));
    let _ = std::fs::remove_dir_all(dir);
}
