//! QOIR is a fast, simple, lossless image format. Pixels are stored as a
//! stream of small opcodes, each deriving the next pixel from the previous
//! one or from a 64 entry cache of recently seen colors.
//!
//! A file is a 14 byte header (`qoif`, big-endian width and height, channel
//! count), the opcode stream, and an 8 byte end marker.
//!
//! Decoding can produce any [`PixelFormat`]: RGB or BGR byte order, 3 or 4
//! bytes per pixel, and opaque, non-premultiplied or premultiplied alpha.
//! Encoding accepts tightly packed [`PixelFormat::Rgb`] and
//! [`PixelFormat::RgbaNonPremul`] buffers.
//!
//! # Example
//! ## Encoding a picture
//! ```
//! use qoir::{EncodeOptions, PixelBuffer, PixelConfiguration, PixelFormat};
//!
//! let width = 2;
//! let height = 2;
//! let bitmap = vec![
//!     0xFF, 0xFF, 0xFF, 0xFF,
//!     0x00, 0x80, 0x00, 0x80,
//!     0xFF, 0xFF, 0xFF, 0xFF,
//!     0x00, 0x80, 0x00, 0x80,
//! ];
//!
//! let config = PixelConfiguration::new(PixelFormat::RgbaNonPremul, width, height);
//! let pixels = PixelBuffer::from_raw(config, bitmap, 8).unwrap();
//!
//! let encoded: Vec<u8> = qoir::encode(&pixels, EncodeOptions::default()).unwrap();
//! # assert_eq!(&encoded[..4], b"qoif");
//! ```
//!
//! ## Decoding a picture
//! ```
//! # use qoir::{EncodeOptions, PixelBuffer, PixelConfiguration, PixelFormat};
//! # let config = PixelConfiguration::new(PixelFormat::RgbaNonPremul, 1, 1);
//! # let pixels = PixelBuffer::from_raw(config, vec![1, 2, 3, 4], 4).unwrap();
//! # let encoded = qoir::encode(&pixels, EncodeOptions::default()).unwrap();
//! use qoir::DecodeOptions;
//!
//! // Only look at the header...
//! let config = qoir::decode_pixel_configuration(&encoded).unwrap();
//!
//! // ...or decode everything, here into premultiplied BGRA.
//! let options = DecodeOptions::default().with_pixel_format(PixelFormat::BgraPremul);
//! let image = qoir::decode(&encoded, options).unwrap();
//! assert_eq!(image.width(), config.width);
//! ```

mod binio;
mod decoder;
mod encoder;
mod opcode;
mod operations;

pub mod codec;
pub mod error;
pub mod header;
pub mod pixel;

// ----------------------- //
// INLINED USEFUL FEATURES //
// ----------------------- //
#[doc(inline)]
pub use codec::{decode, decode_into, decode_pixel_configuration, encode, DecodeOptions, EncodeOptions};

#[doc(inline)]
pub use error::Error;

#[doc(inline)]
pub use pixel::{AlphaTransparency, ColorModel, PixelBuffer, PixelConfiguration, PixelFormat};
