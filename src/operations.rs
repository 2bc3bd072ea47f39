use crate::{
    error::Error,
    opcode::Rgba,
    pixel::{AlphaTransparency, PixelFormat},
};

/// Writes decoded RGBA pixels into the byte layout of a destination
/// [`PixelFormat`].
#[derive(Debug, Clone, Copy)]
pub struct Emitter {
    bytes_per_pixel: usize,
    bgr_order: bool,
    alpha: AlphaTransparency,
}

impl Emitter {
    pub fn new(format: PixelFormat) -> Result<Self, Error> {
        let alpha = format.alpha_transparency().ok_or(Error::UnsupportedPixfmt)?;

        Ok(Self {
            bytes_per_pixel: format.bytes_per_pixel(),
            bgr_order: !format.is_rgb_order(),
            alpha,
        })
    }

    pub fn bytes_per_pixel(&self) -> usize {
        self.bytes_per_pixel
    }

    /// Write one pixel. `out` must be exactly [`Self::bytes_per_pixel`] long.
    #[inline]
    pub fn emit(&self, px: &Rgba, out: &mut [u8]) {
        let [r, g, b, a] = *px;

        let (r, g, b, a) = match self.alpha {
            AlphaTransparency::Opaque => (r, g, b, 0xFF),
            AlphaTransparency::NonPremultiplied => (r, g, b, a),
            AlphaTransparency::Premultiplied => {
                (premultiply(r, a), premultiply(g, a), premultiply(b, a), a)
            }
        };

        let (r, b) = if self.bgr_order { (b, r) } else { (r, b) };

        if self.bytes_per_pixel == 4 {
            out.copy_from_slice(&[r, g, b, a]);
        } else {
            out.copy_from_slice(&[r, g, b]);
        }
    }
}

/// Scale a color channel by alpha, rounding to nearest.
#[inline]
pub fn premultiply(channel: u8, alpha: u8) -> u8 {
    ((u16::from(channel) * u16::from(alpha) + 127) / 255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    const PX: Rgba = [10, 20, 30, 128];

    fn emit(format: PixelFormat) -> Vec<u8> {
        let emitter = Emitter::new(format).unwrap();
        let mut out = vec![0; emitter.bytes_per_pixel()];
        emitter.emit(&PX, &mut out);
        out
    }

    #[test]
    fn byte_orders() {
        assert_eq!(emit(PixelFormat::RgbaNonPremul), [10, 20, 30, 128]);
        assert_eq!(emit(PixelFormat::BgraNonPremul), [30, 20, 10, 128]);
        assert_eq!(emit(PixelFormat::Rgb), [10, 20, 30]);
        assert_eq!(emit(PixelFormat::Bgr), [30, 20, 10]);
    }

    #[test]
    fn opaque_padding_byte() {
        assert_eq!(emit(PixelFormat::Rgbx), [10, 20, 30, 0xFF]);
        assert_eq!(emit(PixelFormat::Bgrx), [30, 20, 10, 0xFF]);
    }

    #[test]
    fn premultiplied() {
        assert_eq!(emit(PixelFormat::RgbaPremul), [5, 10, 15, 128]);
        assert_eq!(emit(PixelFormat::BgraPremul), [15, 10, 5, 128]);
        assert_eq!(premultiply(200, 255), 200);
        assert_eq!(premultiply(200, 0), 0);
    }

    #[test]
    fn invalid_format() {
        assert!(matches!(Emitter::new(PixelFormat::Invalid), Err(Error::UnsupportedPixfmt)));
    }
}
