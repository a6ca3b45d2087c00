//! Single-frame image encoding
//!
//! Encoding follows a fixed protocol; every step must succeed before the next
//! one runs, and a failure names the step that broke. PNG is driven through
//! the `png` crate's staged writer, so its header, image data and trailer are
//! written by separate steps. BMP has no staged writer and emits the whole
//! frame in the write-source step.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use image::codecs::bmp::BmpEncoder;
use image::{ExtendedColorType, ImageEncoder as _};
use crate::pixels::{PixelFormat, PixelImage};
use crate::{RenderError, Result};

/// Image container format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContainerFormat {
    #[default]
    Png,
    Bmp,
}

impl ContainerFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Bmp => "bmp",
        }
    }

    /// Whether the container can describe an image of this size
    fn accepts(&self, width: u32, height: u32, bytes_per_pixel: usize) -> bool {
        let edges_fit = width <= i32::MAX as u32 && height <= i32::MAX as u32;
        match self {
            Self::Png => edges_fit,
            Self::Bmp => {
                // 32-bit file size: header, 256-entry palette, 4-byte aligned rows
                let row = (width as u64 * bytes_per_pixel as u64 + 3) & !3;
                edges_fit && 54 + 1024 + row * height as u64 <= u32::MAX as u64
            }
        }
    }
}

/// Steps of the encode protocol, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EncodeStep {
    /// Open the temporary output file
    CreateStream,
    /// Check the container limits and bind an encoder to the stream
    CreateEncoder,
    /// Compression and filter settings
    InitializeEncoder,
    /// Gather the unpadded frame rows
    CreateFrame,
    /// Negotiate the pixel format; PNG writes its header here
    InitializeFrame,
    /// Write the pixel data
    WriteSource,
    /// Finish the frame and flush it to the stream
    CommitFrame,
    /// Sync the file and move it onto the target path
    CommitEncoder,
}

impl std::fmt::Display for EncodeStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::CreateStream => "create stream",
            Self::CreateEncoder => "create encoder",
            Self::InitializeEncoder => "initialize encoder",
            Self::CreateFrame => "create frame",
            Self::InitializeFrame => "initialize frame",
            Self::WriteSource => "write source",
            Self::CommitFrame => "commit frame",
            Self::CommitEncoder => "commit encoder",
        };
        f.write_str(name)
    }
}

/// Temporary output removed on drop unless committed
struct PendingFile {
    path: PathBuf,
    committed: bool,
}

impl Drop for PendingFile {
    fn drop(&mut self) {
        if !self.committed {
            let _ = std::fs::remove_file(&self.path);
        }
    }
}

enum ContainerEncoder<'w, W: Write> {
    Png(png::Encoder<'static, &'w mut W>),
    Bmp(BmpEncoder<'w, W>),
}

enum FrameWriter<'w, W: Write> {
    Png(png::Writer<&'w mut W>),
    Bmp(BmpEncoder<'w, W>, ExtendedColorType),
}

/// Writes [`PixelImage`]s as standalone image files
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageEncoder {
    format: ContainerFormat,
}

impl ImageEncoder {
    pub fn new(format: ContainerFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> ContainerFormat {
        self.format
    }

    /// Encode `image` into a new file at `path`.
    ///
    /// Data is written to a hidden sibling file that is renamed onto `path`
    /// only when every step succeeded; on failure it is removed.
    pub fn encode_to_file(&self, image: &PixelImage, path: &Path) -> Result<()> {
        let pending_path = pending_path(path).map_err(|e| RenderError::encode(EncodeStep::CreateStream, e))?;
        let file = File::create(&pending_path).map_err(|e| RenderError::encode(EncodeStep::CreateStream, e))?;
        let mut pending = PendingFile { path: pending_path, committed: false };
        let mut stream = BufWriter::new(file);

        self.encode_frame(image, &mut stream)?;

        let file = stream
            .into_inner()
            .map_err(|e| RenderError::encode(EncodeStep::CommitEncoder, e.into_error()))?;
        file.sync_all().map_err(|e| RenderError::encode(EncodeStep::CommitEncoder, e))?;
        std::fs::rename(&pending.path, path).map_err(|e| RenderError::encode(EncodeStep::CommitEncoder, e))?;
        pending.committed = true;

        tracing::info!("Wrote {}x{} {:?} {} to {}", image.width(), image.height(), image.format(), self.format.extension(), path.display());
        Ok(())
    }

    /// Run the steps from encoder creation through frame commit on `stream`
    fn encode_frame<W: Write>(&self, image: &PixelImage, stream: &mut W) -> Result<()> {
        let format = self.format;
        let (width, height) = (image.width(), image.height());

        if !format.accepts(width, height, image.format().bytes_per_pixel()) {
            return Err(RenderError::encode(
                EncodeStep::CreateEncoder,
                format!("{}x{} exceeds {:?} limits", width, height, format),
            ));
        }
        {
            let mut encoder = match format {
                ContainerFormat::Png => ContainerEncoder::Png(png::Encoder::new(&mut *stream, width, height)),
                ContainerFormat::Bmp => ContainerEncoder::Bmp(BmpEncoder::new(&mut *stream)),
            };

            if let ContainerEncoder::Png(encoder) = &mut encoder {
                encoder.set_compression(png::Compression::Default);
                encoder.set_adaptive_filter(png::AdaptiveFilterType::Adaptive);
            }

            let pixels = image.to_packed();
            tracing::trace!("{}: {} bytes", EncodeStep::CreateFrame, pixels.len());

            let frame = match encoder {
                ContainerEncoder::Png(mut encoder) => {
                    encoder.set_color(png_color(image.format()));
                    encoder.set_depth(png::BitDepth::Eight);
                    let writer = encoder
                        .write_header()
                        .map_err(|e| RenderError::encode(EncodeStep::InitializeFrame, e))?;
                    FrameWriter::Png(writer)
                }
                ContainerEncoder::Bmp(encoder) => FrameWriter::Bmp(encoder, extended_color(image.format())),
            };

            let png_writer = match frame {
                FrameWriter::Png(mut writer) => {
                    writer
                        .write_image_data(&pixels)
                        .map_err(|e| RenderError::encode(EncodeStep::WriteSource, e))?;
                    Some(writer)
                }
                FrameWriter::Bmp(encoder, color) => {
                    encoder
                        .write_image(&pixels, width, height, color)
                        .map_err(|e| RenderError::encode(EncodeStep::WriteSource, e))?;
                    None
                }
            };

            if let Some(writer) = png_writer {
                writer.finish().map_err(|e| RenderError::encode(EncodeStep::CommitFrame, e))?;
            }
        }
        stream.flush().map_err(|e| RenderError::encode(EncodeStep::CommitFrame, e))?;
        Ok(())
    }
}

fn png_color(format: PixelFormat) -> png::ColorType {
    match format {
        PixelFormat::Gray8 => png::ColorType::Grayscale,
        PixelFormat::Rgb24 => png::ColorType::Rgb,
    }
}

fn extended_color(format: PixelFormat) -> ExtendedColorType {
    match format {
        PixelFormat::Gray8 => ExtendedColorType::L8,
        PixelFormat::Rgb24 => ExtendedColorType::Rgb8,
    }
}

fn pending_path(path: &Path) -> std::result::Result<PathBuf, String> {
    let name = path
        .file_name()
        .ok_or_else(|| format!("{} has no file name", path.display()))?;
    Ok(path.with_file_name(format!(".{}.partial", name.to_string_lossy())))
}
