//! Deterministic PNG writer for atlas images.
//!
//! Fixed compression and filter settings make the encoded bytes a pure
//! function of the pixels, so two runs over the same input produce
//! byte-identical files and hashes.

use std::io::Write;
use std::path::Path;

use png::{BitDepth, ColorType, Compression, Encoder, FilterType};
use thiserror::Error;

use crate::buffer::AtlasImage;

/// Errors from PNG operations.
#[derive(Debug, Error)]
pub enum PngError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PNG encoding error: {0}")]
    Encoding(#[from] png::EncodingError),

    #[error("Invalid dimensions: {0}")]
    InvalidDimensions(String),
}

/// PNG export configuration.
#[derive(Debug, Clone)]
pub struct PngConfig {
    /// Compression level. Keep fixed across runs.
    pub compression: Compression,
    /// Row filter. Keep fixed across runs.
    pub filter: FilterType,
}

impl Default for PngConfig {
    fn default() -> Self {
        Self {
            compression: Compression::Default,
            filter: FilterType::NoFilter,
        }
    }
}

impl PngConfig {
    /// Smaller files, slower encoding.
    pub fn best_compression() -> Self {
        Self {
            compression: Compression::Best,
            filter: FilterType::Paeth,
        }
    }

    /// Faster encoding, larger files.
    pub fn fast() -> Self {
        Self {
            compression: Compression::Fast,
            filter: FilterType::NoFilter,
        }
    }
}

/// Write an atlas image as RGBA8 PNG to any writer.
pub fn write_rgba_to_writer<W: Write>(
    image: &AtlasImage,
    writer: W,
    config: &PngConfig,
) -> Result<(), PngError> {
    if image.width() == 0 || image.height() == 0 {
        return Err(PngError::InvalidDimensions(format!(
            "{}x{}",
            image.width(),
            image.height()
        )));
    }

    let mut encoder = Encoder::new(writer, image.width(), image.height());
    encoder.set_color(ColorType::Rgba);
    encoder.set_depth(BitDepth::Eight);
    encoder.set_compression(config.compression);
    encoder.set_filter(config.filter);

    let mut png_writer = encoder.write_header()?;
    png_writer.write_image_data(&image.to_rgba8())?;

    Ok(())
}

/// Write an atlas image to a PNG file.
pub fn write_rgba(image: &AtlasImage, path: &Path, config: &PngConfig) -> Result<(), PngError> {
    let file = std::fs::File::create(path)?;
    let writer = std::io::BufWriter::new(file);

    write_rgba_to_writer(image, writer, config)
}

/// Compute the BLAKE3 hash of PNG data.
pub fn hash_png(data: &[u8]) -> String {
    blake3::hash(data).to_hex().to_string()
}

/// Encode to a Vec<u8> and return it with its hash.
pub fn write_rgba_to_vec_with_hash(
    image: &AtlasImage,
    config: &PngConfig,
) -> Result<(Vec<u8>, String), PngError> {
    let mut data = Vec::new();
    write_rgba_to_writer(image, &mut data, config)?;
    let hash = hash_png(&data);
    Ok((data, hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::{AlphaMode, PixelBuffer};

    fn gradient(width: u32, height: u32) -> AtlasImage {
        let mut buffer = PixelBuffer::new(width, height);
        for y in 0..height {
            for x in 0..width {
                buffer.set(x, y, [(x * 4) as u8, (y * 4) as u8, 128, (x + y) as u8]);
            }
        }
        buffer.seal(AlphaMode::Transparent)
    }

    #[test]
    fn test_rgba_deterministic() {
        let image = gradient(32, 16);
        let config = PngConfig::default();

        let (data1, hash1) = write_rgba_to_vec_with_hash(&image, &config).unwrap();
        let (data2, hash2) = write_rgba_to_vec_with_hash(&image, &config).unwrap();

        assert_eq!(data1, data2, "PNG data should be identical");
        assert_eq!(hash1, hash2, "PNG hashes should be identical");
        assert_eq!(&data1[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn test_decodes_back_to_same_pixels() {
        let image = gradient(8, 8);
        let (data, _) = write_rgba_to_vec_with_hash(&image, &PngConfig::best_compression()).unwrap();

        let decoder = png::Decoder::new(data.as_slice());
        let mut reader = decoder.read_info().unwrap();
        let mut out = vec![0; reader.output_buffer_size()];
        let info = reader.next_frame(&mut out).unwrap();
        assert_eq!((info.width, info.height), (8, 8));
        assert_eq!(&out[..info.buffer_size()], image.to_rgba8().as_slice());
    }

    #[test]
    fn test_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("atlas.png");
        write_rgba(&gradient(4, 4), &path, &PngConfig::fast()).unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn test_rejects_empty_image() {
        let image = PixelBuffer::new(0, 4).seal(AlphaMode::Transparent);
        let err = write_rgba_to_vec_with_hash(&image, &PngConfig::default()).unwrap_err();
        assert!(matches!(err, PngError::InvalidDimensions(_)));
    }
}
