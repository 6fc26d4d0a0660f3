//! PNG decoding and encoding.

use std::io::Cursor;
use std::path::Path;

use crate::color::Srgb;
use crate::error::ImageError;

/// Decoded image as row-major sRGB pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct RgbImage {
    width: usize,
    height: usize,
    pixels: Vec<Srgb>,
}

impl RgbImage {
    pub fn new(width: usize, height: usize, pixels: Vec<Srgb>) -> Result<Self, ImageError> {
        if pixels.len() != width * height {
            return Err(ImageError::DimensionMismatch {
                width,
                height,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn filled(width: usize, height: usize, color: Srgb) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width * height],
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    #[inline]
    pub fn pixels(&self) -> &[Srgb] {
        &self.pixels
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Srgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(y * self.width + x).copied()
    }

    /// Packed 8-bit `RGBRGB...` rows.
    pub fn to_rgb8(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|p| p.to_bytes()).collect()
    }
}

/// Decode a PNG of any color type. Palettes and low bit depths are expanded,
/// 16-bit channels are stripped to 8 bits and alpha is dropped.
pub fn decode_png(bytes: &[u8]) -> Result<RgbImage, ImageError> {
    let mut decoder = png::Decoder::new(Cursor::new(bytes));
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder
        .read_info()
        .map_err(|e| ImageError::PngDecode(e.to_string()))?;

    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e| ImageError::PngDecode(e.to_string()))?;
    let data = &buf[..info.buffer_size()];

    if info.bit_depth != png::BitDepth::Eight {
        return Err(ImageError::UnsupportedFormat(format!(
            "bit depth {:?}",
            info.bit_depth
        )));
    }

    let channels = match info.color_type {
        png::ColorType::Grayscale => 1,
        png::ColorType::GrayscaleAlpha => 2,
        png::ColorType::Rgb => 3,
        png::ColorType::Rgba => 4,
        png::ColorType::Indexed => {
            return Err(ImageError::UnsupportedFormat(
                "indexed color after expansion".to_string(),
            ))
        }
    };

    let pixels: Vec<Srgb> = data
        .chunks_exact(channels)
        .map(|px| match channels {
            1 | 2 => Srgb::from_u8(px[0], px[0], px[0]),
            _ => Srgb::from_u8(px[0], px[1], px[2]),
        })
        .collect();

    let image = RgbImage::new(info.width as usize, info.height as usize, pixels)?;
    tracing::debug!(
        width = image.width(),
        height = image.height(),
        color_type = ?info.color_type,
        "Decoded PNG"
    );
    Ok(image)
}

/// Encode as an 8-bit RGB PNG.
pub fn encode_png(image: &RgbImage) -> Result<Vec<u8>, ImageError> {
    if image.is_empty() {
        return Err(ImageError::Empty);
    }
    let width = u32::try_from(image.width())
        .map_err(|_| ImageError::UnsupportedFormat(format!("width {}", image.width())))?;
    let height = u32::try_from(image.height())
        .map_err(|_| ImageError::UnsupportedFormat(format!("height {}", image.height())))?;

    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, width, height);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder
            .write_header()
            .map_err(|e| ImageError::PngEncode(e.to_string()))?;
        writer
            .write_image_data(&image.to_rgb8())
            .map_err(|e| ImageError::PngEncode(e.to_string()))?;
    }
    Ok(buf.into_inner())
}

pub fn load_png(path: &Path) -> Result<RgbImage, ImageError> {
    let bytes = std::fs::read(path)?;
    decode_png(&bytes)
}

pub fn save_png(path: &Path, image: &RgbImage) -> Result<(), ImageError> {
    let bytes = encode_png(image)?;
    std::fs::write(path, &bytes)?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "Wrote PNG");
    Ok(())
}
