use crate::error::Error;

/// How a pixel format treats its alpha channel.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlphaTransparency {
    /// Every pixel is fully opaque. Any fourth byte is padding.
    Opaque = 0x01,

    /// Color channels are independent of alpha.
    NonPremultiplied = 0x02,

    /// Color channels have already been multiplied by alpha.
    Premultiplied = 0x03,
}

/// The color model of a pixel format.
///
/// There is only one for now, blue-green-red-alpha. The RGB variants of
/// [`PixelFormat`] are the same model with a different byte order.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorModel {
    Bgra = 0x00,
}

/// The layout of pixel bytes in memory.
///
/// Values less than `0x10` use the same bit pattern as the file format.
/// Values at or above it only exist in the API:
///  - the `0x10` bit means 3 (not 4) bytes per (fully opaque) pixel.
///  - the `0x20` bit means RGBA (not BGRA) byte order.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    Invalid = 0x00,
    Bgrx = 0x01,
    BgraNonPremul = 0x02,
    BgraPremul = 0x03,
    Bgr = 0x11,
    Rgbx = 0x21,
    RgbaNonPremul = 0x22,
    RgbaPremul = 0x23,
    Rgb = 0x31,
}

impl PixelFormat {
    const MASK_FOR_ALPHA_TRANSPARENCY: u32 = 0x03;
    const MASK_FOR_COLOR_MODEL: u32 = 0x0C;
    const THREE_BYTES_PER_PIXEL: u32 = 0x10;
    const RGB_BYTE_ORDER: u32 = 0x20;
    const FIRST_API_ONLY_VALUE: u32 = 0x10;

    /// Number of bytes each pixel occupies in memory, either 3 or 4.
    pub const fn bytes_per_pixel(self) -> usize {
        if self as u32 & Self::THREE_BYTES_PER_PIXEL != 0 {
            3
        } else {
            4
        }
    }

    /// The alpha handling of this format, or [`None`] for
    /// [`PixelFormat::Invalid`].
    pub fn alpha_transparency(self) -> Option<AlphaTransparency> {
        Some(match self as u32 & Self::MASK_FOR_ALPHA_TRANSPARENCY {
            0x01 => AlphaTransparency::Opaque,
            0x02 => AlphaTransparency::NonPremultiplied,
            0x03 => AlphaTransparency::Premultiplied,
            _ => return None,
        })
    }

    /// The color model of this format.
    pub fn color_model(self) -> ColorModel {
        debug_assert_eq!(self as u32 & Self::MASK_FOR_COLOR_MODEL, ColorModel::Bgra as u32);
        ColorModel::Bgra
    }

    /// Whether the bytes are stored red first instead of blue first.
    pub const fn is_rgb_order(self) -> bool {
        self as u32 & Self::RGB_BYTE_ORDER != 0
    }

    /// Whether the format carries a meaningful alpha channel.
    pub fn has_alpha(self) -> bool {
        matches!(
            self.alpha_transparency(),
            Some(AlphaTransparency::NonPremultiplied | AlphaTransparency::Premultiplied)
        )
    }

    /// Whether the value may be written to a file as is. API-only formats
    /// must never be serialized.
    pub const fn is_file_representable(self) -> bool {
        (self as u32) < Self::FIRST_API_ONLY_VALUE
    }

    pub fn from_u32(value: u32) -> Result<Self, Error> {
        Ok(match value {
            0x00 => Self::Invalid,
            0x01 => Self::Bgrx,
            0x02 => Self::BgraNonPremul,
            0x03 => Self::BgraPremul,
            0x11 => Self::Bgr,
            0x21 => Self::Rgbx,
            0x22 => Self::RgbaNonPremul,
            0x23 => Self::RgbaPremul,
            0x31 => Self::Rgb,
            _ => return Err(Error::UnsupportedPixfmt),
        })
    }
}

impl From<PixelFormat> for u32 {
    fn from(value: PixelFormat) -> u32 {
        value as u32
    }
}

/// Format and dimensions of a pixel buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelConfiguration {
    pub pixel_format: PixelFormat,
    pub width: u32,
    pub height: u32,
}

impl PixelConfiguration {
    pub fn new(pixel_format: PixelFormat, width: u32, height: u32) -> Self {
        Self {
            pixel_format,
            width,
            height,
        }
    }

    /// Bytes in one tightly packed row, or [`None`] on overflow.
    pub fn packed_stride(&self) -> Option<usize> {
        (self.width as usize).checked_mul(self.pixel_format.bytes_per_pixel())
    }

    /// Bytes in the whole tightly packed image, or [`None`] on overflow.
    pub fn packed_len(&self) -> Option<usize> {
        self.packed_stride()?.checked_mul(self.height as usize)
    }
}

/// Pixel data together with the configuration describing it.
///
/// Rows start `stride` bytes apart. The stride may be larger than
/// `width * bytes_per_pixel`, in which case the trailing bytes of every row
/// are padding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    configuration: PixelConfiguration,
    data: Vec<u8>,
    stride: usize,
}

impl PixelBuffer {
    /// Allocate a zeroed, tightly packed buffer.
    pub fn new(configuration: PixelConfiguration) -> Result<Self, Error> {
        let stride = configuration.packed_stride().ok_or(Error::InvalidData)?;
        let len = configuration.packed_len().ok_or(Error::InvalidData)?;

        let mut data = Vec::new();
        data.try_reserve_exact(len).map_err(|_| Error::OutOfMemory)?;
        data.resize(len, 0);

        Ok(Self {
            configuration,
            data,
            stride,
        })
    }

    /// Wrap existing pixel data.
    ///
    /// The stride must cover a whole row and the data must hold every row,
    /// otherwise [`Error::InvalidArgument`] is returned.
    pub fn from_raw(
        configuration: PixelConfiguration,
        data: Vec<u8>,
        stride: usize,
    ) -> Result<Self, Error> {
        let row_len = configuration.packed_stride().ok_or(Error::InvalidArgument)?;
        if stride < row_len {
            return Err(Error::InvalidArgument);
        }

        let min_len = min_data_len(row_len, stride, configuration.height)
            .map_err(|_| Error::InvalidArgument)?;
        if data.len() < min_len {
            return Err(Error::InvalidArgument);
        }

        Ok(Self {
            configuration,
            data,
            stride,
        })
    }

    pub fn configuration(&self) -> PixelConfiguration {
        self.configuration
    }

    pub fn pixel_format(&self) -> PixelFormat {
        self.configuration.pixel_format
    }

    pub fn width(&self) -> u32 {
        self.configuration.width
    }

    pub fn height(&self) -> u32 {
        self.configuration.height
    }

    /// Byte distance between the starts of consecutive rows.
    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Give up the buffer, returning the underlying bytes.
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// The pixel bytes of row `y`, without any stride padding.
    pub fn row(&self, y: u32) -> Option<&[u8]> {
        if y >= self.configuration.height {
            return None;
        }

        let start = self.stride.checked_mul(y as usize)?;
        let len = self.configuration.packed_stride()?;
        self.data.get(start..start.checked_add(len)?)
    }

    /// Compare configuration and visible pixels, ignoring stride padding.
    pub fn pixels_eq(&self, other: &PixelBuffer) -> bool {
        if self.configuration != other.configuration {
            return false;
        }

        (0..self.configuration.height).all(|y| self.row(y) == other.row(y))
    }
}

/// Smallest data length that holds `height` rows of `row_len` bytes placed
/// `stride` bytes apart. The final row needs no padding.
pub(crate) fn min_data_len(row_len: usize, stride: usize, height: u32) -> Result<usize, Error> {
    if height == 0 {
        return Ok(0);
    }

    stride
        .checked_mul(height as usize - 1)
        .and_then(|n| n.checked_add(row_len))
        .ok_or(Error::InvalidData)
}
