//! Pixel images - strided pixel buffers

use fos_text::CoverageBuffer;
use crate::{RenderError, Result};

/// Pixel format of a [`PixelImage`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// 8-bit grayscale
    Gray8,
    /// 24-bit RGB
    Rgb24,
}

impl PixelFormat {
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            Self::Gray8 => 1,
            Self::Rgb24 => 3,
        }
    }

    /// Format holding `channels` coverage bytes per pixel
    pub fn for_channels(channels: usize) -> Option<Self> {
        match channels {
            1 => Some(Self::Gray8),
            3 => Some(Self::Rgb24),
            _ => None,
        }
    }
}

/// Strided pixel buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelImage {
    width: u32,
    height: u32,
    format: PixelFormat,
    stride: usize,
    data: Vec<u8>,
}

impl PixelImage {
    /// Default stride: row bytes rounded up to a multiple of 4
    pub fn default_stride(width: u32, format: PixelFormat) -> usize {
        (width as usize * format.bytes_per_pixel() + 3) & !3
    }

    /// Create a zeroed image with the default stride
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Result<Self> {
        Self::with_stride(width, height, format, Self::default_stride(width, format))
    }

    /// Create a zeroed image with an explicit stride
    pub fn with_stride(width: u32, height: u32, format: PixelFormat, stride: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(RenderError::EmptyImage { width, height });
        }
        let row_bytes = width as usize * format.bytes_per_pixel();
        if stride < row_bytes {
            return Err(RenderError::StrideTooSmall { stride, row_bytes });
        }
        Ok(Self {
            width,
            height,
            format,
            stride,
            data: vec![0; stride * height as usize],
        })
    }

    /// Pack a coverage buffer using the default stride
    pub fn from_coverage(coverage: &CoverageBuffer, format: PixelFormat) -> Result<Self> {
        let stride = Self::default_stride(coverage.width, format);
        Self::pack(&coverage.data, coverage.width, coverage.height, coverage.channels, format, stride)
    }

    /// Copy tightly packed rows into a strided image.
    ///
    /// Each row of `width * channels` bytes lands at `y * stride`; padding
    /// bytes stay zero. No conversion is applied.
    pub fn pack(
        source: &[u8],
        width: u32,
        height: u32,
        channels: usize,
        format: PixelFormat,
        stride: usize,
    ) -> Result<Self> {
        if channels != format.bytes_per_pixel() {
            return Err(RenderError::ChannelMismatch {
                format,
                expected: format.bytes_per_pixel(),
                actual: channels,
            });
        }
        let mut image = Self::with_stride(width, height, format, stride)?;

        let row_bytes = image.row_bytes();
        let expected = row_bytes * height as usize;
        if source.len() != expected {
            return Err(RenderError::SourceSize { expected, actual: source.len() });
        }

        if stride == row_bytes {
            image.data.copy_from_slice(source);
        } else {
            for (src, dst) in source.chunks_exact(row_bytes).zip(image.data.chunks_exact_mut(stride)) {
                dst[..row_bytes].copy_from_slice(src);
            }
        }
        tracing::debug!("Packed {}x{} {:?} image, stride {}", width, height, format, stride);
        Ok(image)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Bytes between row starts
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Raw buffer including row padding
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Pixel bytes per row, without padding
    pub fn row_bytes(&self) -> usize {
        self.width as usize * self.format.bytes_per_pixel()
    }

    /// Pixel bytes of row `y`, without padding
    pub fn row(&self, y: u32) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let start = y as usize * self.stride;
        Some(&self.data[start..start + self.row_bytes()])
    }

    /// Rows copied into one unpadded buffer
    pub fn to_packed(&self) -> Vec<u8> {
        let mut packed = Vec::with_capacity(self.row_bytes() * self.height as usize);
        for y in 0..self.height {
            if let Some(row) = self.row(y) {
                packed.extend_from_slice(row);
            }
        }
        packed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_stride_alignment() {
        assert_eq!(PixelImage::default_stride(1, PixelFormat::Gray8), 4);
        assert_eq!(PixelImage::default_stride(4, PixelFormat::Gray8), 4);
        assert_eq!(PixelImage::default_stride(5, PixelFormat::Rgb24), 16);
    }

    #[test]
    fn test_pack_with_padding_preserves_rows() {
        // 3x2 grayscale, stride 4 -> one padding byte per row
        let source = [1, 2, 3, 4, 5, 6];
        let image = PixelImage::pack(&source, 3, 2, 1, PixelFormat::Gray8, 4).unwrap();

        assert_eq!(image.data(), &[1, 2, 3, 0, 4, 5, 6, 0]);
        assert_eq!(image.row(0).unwrap(), &[1, 2, 3]);
        assert_eq!(image.row(1).unwrap(), &[4, 5, 6]);
        assert!(image.row(2).is_none());
        assert_eq!(image.to_packed(), source.to_vec());
    }

    #[test]
    fn test_pack_contiguous() {
        let source: Vec<u8> = (0..24).collect();
        let image = PixelImage::pack(&source, 4, 2, 3, PixelFormat::Rgb24, 12).unwrap();
        assert_eq!(image.data(), source.as_slice());
    }

    #[test]
    fn test_pack_rejects_bad_input() {
        let source = [0u8; 6];
        assert!(matches!(
            PixelImage::pack(&source, 3, 2, 1, PixelFormat::Gray8, 2),
            Err(RenderError::StrideTooSmall { .. })
        ));
        assert!(matches!(
            PixelImage::pack(&source, 3, 2, 3, PixelFormat::Gray8, 4),
            Err(RenderError::ChannelMismatch { .. })
        ));
        assert!(matches!(
            PixelImage::pack(&source[..5], 3, 2, 1, PixelFormat::Gray8, 4),
            Err(RenderError::SourceSize { expected: 6, actual: 5 })
        ));
        assert!(matches!(
            PixelImage::pack(&[], 0, 2, 1, PixelFormat::Gray8, 4),
            Err(RenderError::EmptyImage { .. })
        ));
    }

    #[test]
    fn test_from_coverage() {
        let coverage = CoverageBuffer { width: 2, height: 2, channels: 3, data: (1..=12).collect() };
        let image = PixelImage::from_coverage(&coverage, PixelFormat::Rgb24).unwrap();
        assert_eq!(image.stride(), 8);
        assert_eq!(image.row(1).unwrap(), coverage.row(1).unwrap());
    }
}
