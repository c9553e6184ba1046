//! ESC/POS command builder
//!
//! Provides a fluent API for building ESC/POS print data.

use crate::encoding::{CODE_PAGE_WPC1252, encode_cp1252};
#[cfg(feature = "image")]
use crate::error::{PrintError, PrintResult};
#[cfg(feature = "image")]
use tracing::instrument;

/// Lines fed before a cut so the last printed line clears the cutter
const CUT_FEED_LINES: u8 = 3;

/// QR module size in dots
const QR_MODULE_SIZE: u8 = 6;

/// Largest raster dimension `GS v 0` can address (16-bit header fields)
#[cfg(feature = "image")]
const MAX_RASTER_DIM: u32 = u16::MAX as u32;

/// Character style applied to subsequent text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextStyle {
    #[default]
    Normal,
    Bold,
    BoldUnderline,
}

/// ESC/POS command builder
///
/// Builds ESC/POS byte sequences for thermal printers.
/// Text is converted to WPC1252 as it is appended.
#[derive(Debug, Default)]
pub struct EscPosBuilder {
    buf: Vec<u8>,
}

impl EscPosBuilder {
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(256),
        }
    }

    /// Reset the printer and select the WPC1252 code page
    pub fn initialize(&mut self) -> &mut Self {
        // ESC @ - Initialize printer
        self.buf.extend_from_slice(&[0x1B, 0x40]);
        // ESC t n - Select character code table
        self.buf.extend_from_slice(&[0x1B, 0x74, CODE_PAGE_WPC1252]);
        self
    }

    // === Text Output ===

    /// Write raw text (will be WPC1252 encoded)
    pub fn text(&mut self, s: &str) -> &mut Self {
        self.buf.extend_from_slice(&encode_cp1252(s));
        self
    }

    // === Alignment ===

    /// Align to center
    pub fn center(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x61, 0x01]);
        self
    }

    /// Align to left (default)
    pub fn left(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x61, 0x00]);
        self
    }

    // === Text Style ===

    /// Enable bold text
    pub fn bold(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x45, 0x01]);
        self
    }

    /// Disable bold text
    pub fn bold_off(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x45, 0x00]);
        self
    }

    /// Enable single-dot underline
    pub fn underline(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x2D, 0x01]);
        self
    }

    /// Disable underline
    pub fn underline_off(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x2D, 0x00]);
        self
    }

    /// Replace the current character style
    ///
    /// Both bold and underline are always written so a style never
    /// inherits attributes left over from a previous one.
    pub fn style(&mut self, style: TextStyle) -> &mut Self {
        match style {
            TextStyle::Normal => self.bold_off().underline_off(),
            TextStyle::Bold => self.bold().underline_off(),
            TextStyle::BoldUnderline => self.bold().underline(),
        }
    }

    // === Paper Control ===

    /// Full cut with feed, feeds n lines then cuts.
    pub fn cut_feed(&mut self, lines: u8) -> &mut Self {
        // GS V 66 n - Full cut after feeding n lines
        self.buf.extend_from_slice(&[0x1D, 0x56, 0x42, lines]);
        self
    }

    /// Feed enough paper to clear the cutter, then cut
    pub fn cut(&mut self) -> &mut Self {
        self.cut_feed(CUT_FEED_LINES)
    }

    // === QR Code ===

    /// Print a QR code
    ///
    /// Size: 1-16 (module size in dots)
    pub fn qr_code(&mut self, data: &str, size: u8) -> &mut Self {
        let size = size.clamp(1, 16);

        // Function 165: Select model (Model 2)
        self.buf
            .extend_from_slice(&[0x1D, 0x28, 0x6B, 0x04, 0x00, 0x31, 0x41, 0x32, 0x00]);

        // Function 167: Set module size
        self.buf
            .extend_from_slice(&[0x1D, 0x28, 0x6B, 0x03, 0x00, 0x31, 0x43, size]);

        // Function 169: Set error correction (L)
        self.buf
            .extend_from_slice(&[0x1D, 0x28, 0x6B, 0x03, 0x00, 0x31, 0x45, 0x30]);

        // Function 180: Store data
        let data_bytes = data.as_bytes();
        let len = data_bytes.len() + 3;
        let p_l = (len & 0xFF) as u8;
        let p_h = ((len >> 8) & 0xFF) as u8;
        self.buf
            .extend_from_slice(&[0x1D, 0x28, 0x6B, p_l, p_h, 0x31, 0x50, 0x30]);
        self.buf.extend_from_slice(data_bytes);

        // Function 181: Print
        self.buf
            .extend_from_slice(&[0x1D, 0x28, 0x6B, 0x03, 0x00, 0x31, 0x51, 0x30]);

        self
    }

    /// Print a QR code with the default module size
    pub fn qr(&mut self, data: &str) -> &mut Self {
        self.qr_code(data, QR_MODULE_SIZE)
    }

    // === Images ===

    /// Print a raster image, centered
    ///
    /// Dimensions are sent as 16-bit fields; images built through
    /// [`RasterImage::from_image`] are checked against that limit.
    pub fn raster(&mut self, image: &RasterImage) -> &mut Self {
        self.center();

        // GS v 0 m xL xH yL yH
        self.buf.extend_from_slice(&[0x1D, 0x76, 0x30, 0x00]);
        self.buf.push(image.width_bytes as u8);
        self.buf.push((image.width_bytes >> 8) as u8);
        self.buf.push(image.height as u8);
        self.buf.push((image.height >> 8) as u8);
        self.buf.extend_from_slice(&image.data);

        self.buf.push(b'\n');
        self.left()
    }

    // === Build ===

    pub fn build(self) -> Vec<u8> {
        self.buf
    }
}

// ============================================================================
// Image Processing
// ============================================================================

/// Monochrome bitmap ready for `GS v 0`
///
/// Rows are packed 8 dots per byte, most significant bit first.
/// A set bit prints a black dot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    pub width_bytes: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl RasterImage {
    pub fn new(width_bytes: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            width_bytes,
            height,
            data,
        }
    }

    /// Load an image file and convert it to raster data
    ///
    /// The image will be:
    /// - Resized to fit `max_width` dots
    /// - Converted to 1-bit monochrome
    #[cfg(feature = "image")]
    #[instrument]
    pub fn open(path: &std::path::Path, max_width: u32) -> PrintResult<Self> {
        let img = image::open(path)
            .map_err(|e| PrintError::Image(format!("{}: {}", path.display(), e)))?;
        Self::from_image(&img, max_width)
    }

    /// Convert a decoded image to raster data
    ///
    /// Fails when the scaled image does not fit the 16-bit `GS v 0` header.
    #[cfg(feature = "image")]
    pub fn from_image(img: &image::DynamicImage, max_width: u32) -> PrintResult<Self> {
        use image::GenericImageView;

        let (w, h) = img.dimensions();

        let (new_w, new_h) = if w > max_width {
            let ratio = max_width as f64 / w as f64;
            (max_width, ((h as f64 * ratio) as u32).max(1))
        } else {
            (w, h)
        };

        let x_bytes = new_w.div_ceil(8);
        if x_bytes > MAX_RASTER_DIM || new_h > MAX_RASTER_DIM {
            return Err(PrintError::Image(format!(
                "Image too large for raster output: {}x{} dots",
                new_w, new_h
            )));
        }

        let resized = img.resize_exact(new_w, new_h, image::imageops::FilterType::Nearest);

        let mut data = Vec::with_capacity((x_bytes * new_h) as usize);

        // Convert to RGBA for transparency handling
        let rgba = resized.to_rgba8();

        for y in 0..new_h {
            for x_byte in 0..x_bytes {
                let mut byte = 0u8;
                for bit in 0..8 {
                    let x = x_byte * 8 + bit;
                    if x < new_w {
                        let pixel = rgba.get_pixel(x, y);

                        // Transparent = white (0)
                        if pixel[3] >= 128 {
                            let luma = (0.299 * pixel[0] as f32
                                + 0.587 * pixel[1] as f32
                                + 0.114 * pixel[2] as f32) as u8;

                            if luma < 128 {
                                byte |= 1 << (7 - bit);
                            }
                        }
                    }
                }
                data.push(byte);
            }
        }

        Ok(Self::new(x_bytes, new_h, data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initialize_selects_code_page() {
        let mut b = EscPosBuilder::new();
        b.initialize();
        assert_eq!(b.build(), vec![0x1B, 0x40, 0x1B, 0x74, 16]);
    }

    #[test]
    fn test_text_is_encoded() {
        let mut b = EscPosBuilder::new();
        b.text("Olé\n");
        assert_eq!(b.build(), vec![b'O', b'l', 0xE9, b'\n']);
    }

    #[test]
    fn test_style_clears_underline() {
        let mut b = EscPosBuilder::new();
        b.style(TextStyle::Bold);
        assert_eq!(b.build(), vec![0x1B, 0x45, 0x01, 0x1B, 0x2D, 0x00]);

        let mut b = EscPosBuilder::new();
        b.style(TextStyle::Normal);
        assert_eq!(b.build(), vec![0x1B, 0x45, 0x00, 0x1B, 0x2D, 0x00]);
    }

    #[test]
    fn test_cut_feeds_first() {
        let mut b = EscPosBuilder::new();
        b.cut();
        assert_eq!(b.build(), vec![0x1D, 0x56, 0x42, 3]);
    }

    #[test]
    fn test_qr_store_length() {
        let mut b = EscPosBuilder::new();
        b.qr("abc");
        let data = b.build();
        // Store header carries payload length + 3
        let store = [0x1D, 0x28, 0x6B, 6, 0, 0x31, 0x50, 0x30, b'a', b'b', b'c'];
        assert!(data.windows(store.len()).any(|w| w == store));
    }

    #[test]
    fn test_raster_header() {
        let img = RasterImage::new(2, 1, vec![0xFF, 0x00]);
        let mut b = EscPosBuilder::new();
        b.raster(&img);
        let data = b.build();
        assert_eq!(
            &data[..13],
            &[0x1B, 0x61, 0x01, 0x1D, 0x76, 0x30, 0x00, 2, 0, 1, 0, 0xFF, 0x00]
        );
        assert_eq!(&data[13..], &[b'\n', 0x1B, 0x61, 0x00]);
    }

    #[cfg(feature = "image")]
    #[test]
    fn test_from_image_thresholds_and_resizes() {
        let mut img = image::RgbaImage::from_pixel(20, 4, image::Rgba([255, 255, 255, 255]));
        img.put_pixel(0, 0, image::Rgba([0, 0, 0, 255]));
        img.put_pixel(1, 0, image::Rgba([0, 0, 0, 0]));
        let raster = RasterImage::from_image(&image::DynamicImage::ImageRgba8(img), 512).unwrap();

        assert_eq!(raster.width_bytes, 3);
        assert_eq!(raster.height, 4);
        assert_eq!(raster.data[0], 0b1000_0000);
        assert!(raster.data[1..].iter().all(|b| *b == 0));

        let wide = image::DynamicImage::ImageRgba8(image::RgbaImage::new(1024, 100));
        let raster = RasterImage::from_image(&wide, 512).unwrap();
        assert_eq!(raster.width_bytes, 64);
        assert_eq!(raster.height, 50);
    }

    #[cfg(feature = "image")]
    #[test]
    fn test_from_image_rejects_oversized_height() {
        let tall = image::DynamicImage::ImageLuma8(image::GrayImage::new(8, 65_536));
        let result = RasterImage::from_image(&tall, 512);
        assert!(matches!(result, Err(PrintError::Image(_))));

        let fits = image::DynamicImage::ImageLuma8(image::GrayImage::new(8, 65_535));
        let raster = RasterImage::from_image(&fits, 512).unwrap();
        assert_eq!(raster.height, 65_535);
    }
}
