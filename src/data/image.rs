use std::fmt;

use image::error::{ImageFormatHint, UnsupportedError, UnsupportedErrorKind};
use image::{DynamicImage, GenericImageView, ImageError, ImageResult};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ElementType – numeric type of one channel sample
// ---------------------------------------------------------------------------

/// Element representation of a decoded buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    U8,
    U16,
    F32,
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementType::U8 => write!(f, "uint8"),
            ElementType::U16 => write!(f, "uint16"),
            ElementType::F32 => write!(f, "float32"),
        }
    }
}

// ---------------------------------------------------------------------------
// PixelData – the flat sample storage
// ---------------------------------------------------------------------------

/// Flat, row-major, channel-interleaved samples.
#[derive(Debug, Clone, PartialEq)]
pub enum PixelData {
    U8(Vec<u8>),
    U16(Vec<u16>),
    F32(Vec<f32>),
}

impl PixelData {
    pub fn len(&self) -> usize {
        match self {
            PixelData::U8(v) => v.len(),
            PixelData::U16(v) => v.len(),
            PixelData::F32(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn element_type(&self) -> ElementType {
        match self {
            PixelData::U8(_) => ElementType::U8,
            PixelData::U16(_) => ElementType::U16,
            PixelData::F32(_) => ElementType::F32,
        }
    }
}

// ---------------------------------------------------------------------------
// PixelArray – rows × cols × channels
// ---------------------------------------------------------------------------

/// A decoded image as a 3-D array (rows × columns × channels).
///
/// The channel layout is whatever the file stored: 1 (luma), 2 (luma + alpha),
/// 3 (RGB) or 4 (RGBA) bands. Nothing is dropped or synthesized.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelArray {
    rows: usize,
    cols: usize,
    channels: usize,
    data: PixelData,
}

impl PixelArray {
    /// Wrap existing samples. Returns `None` if `data` does not hold exactly
    /// `rows * cols * channels` elements or `channels` is zero.
    pub fn from_raw(rows: usize, cols: usize, channels: usize, data: PixelData) -> Option<Self> {
        if channels == 0 || rows.checked_mul(cols)?.checked_mul(channels)? != data.len() {
            return None;
        }
        Some(Self {
            rows,
            cols,
            channels,
            data,
        })
    }

    /// Take ownership of a decoded image, keeping its native channel count
    /// and sample depth. Layouts this crate does not know are rejected as
    /// unsupported rather than converted.
    pub fn from_dynamic(img: DynamicImage) -> ImageResult<Self> {
        let (width, height) = img.dimensions();
        let rows = height as usize;
        let cols = width as usize;

        let (channels, data) = match img {
            DynamicImage::ImageLuma8(buf) => (1, PixelData::U8(buf.into_raw())),
            DynamicImage::ImageLumaA8(buf) => (2, PixelData::U8(buf.into_raw())),
            DynamicImage::ImageRgb8(buf) => (3, PixelData::U8(buf.into_raw())),
            DynamicImage::ImageRgba8(buf) => (4, PixelData::U8(buf.into_raw())),
            DynamicImage::ImageLuma16(buf) => (1, PixelData::U16(buf.into_raw())),
            DynamicImage::ImageLumaA16(buf) => (2, PixelData::U16(buf.into_raw())),
            DynamicImage::ImageRgb16(buf) => (3, PixelData::U16(buf.into_raw())),
            DynamicImage::ImageRgba16(buf) => (4, PixelData::U16(buf.into_raw())),
            DynamicImage::ImageRgb32F(buf) => (3, PixelData::F32(buf.into_raw())),
            DynamicImage::ImageRgba32F(buf) => (4, PixelData::F32(buf.into_raw())),
            other => {
                return Err(ImageError::Unsupported(
                    UnsupportedError::from_format_and_kind(
                        ImageFormatHint::Unknown,
                        UnsupportedErrorKind::Color(other.color().into()),
                    ),
                ));
            }
        };

        Ok(Self {
            rows,
            cols,
            channels,
            data,
        })
    }

    /// Widen every sample to `f32`. Values are carried over exactly; no
    /// scaling or normalisation is applied.
    pub fn to_float32(self) -> Self {
        let Self {
            rows,
            cols,
            channels,
            data,
        } = self;
        let data = match data {
            PixelData::U8(v) => PixelData::F32(v.into_iter().map(f32::from).collect()),
            PixelData::U16(v) => PixelData::F32(v.into_iter().map(f32::from).collect()),
            f @ PixelData::F32(_) => f,
        };
        Self {
            rows,
            cols,
            channels,
            data,
        }
    }

    /// `[rows, cols, channels]`
    pub fn shape(&self) -> [usize; 3] {
        [self.rows, self.cols, self.channels]
    }

    /// `(rows, cols)`, i.e. the first two dimensions of [`Self::shape`].
    pub fn hw(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn element_type(&self) -> ElementType {
        self.data.element_type()
    }

    pub fn data(&self) -> &PixelData {
        &self.data
    }

    pub fn into_data(self) -> PixelData {
        self.data
    }

    /// Sample at `(row, col, channel)` as `f64`, or `None` when out of bounds.
    pub fn get(&self, row: usize, col: usize, channel: usize) -> Option<f64> {
        if row >= self.rows || col >= self.cols || channel >= self.channels {
            return None;
        }
        let idx = (row * self.cols + col) * self.channels + channel;
        match &self.data {
            PixelData::U8(v) => v.get(idx).map(|&s| f64::from(s)),
            PixelData::U16(v) => v.get(idx).map(|&s| f64::from(s)),
            PixelData::F32(v) => v.get(idx).map(|&s| f64::from(s)),
        }
    }

    pub fn as_u8(&self) -> Option<&[u8]> {
        match &self.data {
            PixelData::U8(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_u16(&self) -> Option<&[u16]> {
        match &self.data {
            PixelData::U16(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_f32(&self) -> Option<&[f32]> {
        match &self.data {
            PixelData::F32(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for PixelArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<{}x{}x{} {} buffer>",
            self.rows,
            self.cols,
            self.channels,
            self.element_type()
        )
    }
}
