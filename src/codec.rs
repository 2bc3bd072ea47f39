use log::debug;

use crate::{
    decoder::{Destination, OpcodeDecoder},
    encoder::{self, Descriptor},
    error::Error,
    header::{Channels, Header, HEADER_LEN},
    pixel::{PixelBuffer, PixelConfiguration, PixelFormat},
};

/// Options for [`decode`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Format of the decoded pixels. [`None`] means
    /// [`PixelFormat::RgbaNonPremul`].
    pub pixel_format: Option<PixelFormat>,
}

impl DecodeOptions {
    pub fn with_pixel_format(mut self, pixel_format: PixelFormat) -> Self {
        self.pixel_format = Some(pixel_format);
        self
    }

    fn resolved_pixel_format(&self) -> PixelFormat {
        self.pixel_format.unwrap_or(PixelFormat::RgbaNonPremul)
    }
}

/// Options for [`encode`]. There are none yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncodeOptions {}

/// Read the dimensions and natural pixel format of an encoded image
/// without decoding any pixels.
pub fn decode_pixel_configuration(input: &[u8]) -> Result<PixelConfiguration, Error> {
    let header = Header::read_from(input)?;

    Ok(PixelConfiguration::new(
        header.channels.pixel_format(),
        header.width,
        header.height,
    ))
}

/// Decode an image into a newly allocated, tightly packed pixel buffer.
///
/// # Example
/// ```
/// use qoir::{DecodeOptions, PixelFormat};
///
/// let file = [
///     b'q', b'o', b'i', b'f', 0, 0, 0, 2, 0, 0, 0, 1, 4, 0,
///     0xFE, 10, 20, 30,
///     0, 0, 0, 0, 0, 0, 0, 1,
/// ];
///
/// let options = DecodeOptions::default().with_pixel_format(PixelFormat::Rgb);
/// let image = qoir::decode(&file, options).unwrap();
/// assert_eq!(image.data(), [10, 20, 30, 10, 20, 30]);
/// ```
pub fn decode(input: &[u8], options: DecodeOptions) -> Result<PixelBuffer, Error> {
    let header = Header::read_from(input)?;

    let pixel_format = options.resolved_pixel_format();
    let mut pixels = PixelBuffer::new(PixelConfiguration::new(
        pixel_format,
        header.width,
        header.height,
    ))?;

    run_decoder(&header, &input[HEADER_LEN..], &mut pixels)?;

    Ok(pixels)
}

/// Decode an image into an existing pixel buffer, which may have padded
/// rows and any supported format.
///
/// The buffer's dimensions must match the encoded image.
pub fn decode_into(input: &[u8], pixels: &mut PixelBuffer) -> Result<(), Error> {
    let header = Header::read_from(input)?;

    if (header.width, header.height) != (pixels.width(), pixels.height()) {
        debug!(
            "Buffer is {}x{} but image is {}x{}",
            pixels.width(),
            pixels.height(),
            header.width,
            header.height
        );
        return Err(Error::InvalidArgument);
    }

    run_decoder(&header, &input[HEADER_LEN..], pixels)
}

fn run_decoder(header: &Header, payload: &[u8], pixels: &mut PixelBuffer) -> Result<(), Error> {
    let pixel_format = pixels.pixel_format();
    let stride = pixels.stride();

    OpcodeDecoder::new(payload, header.channels)?
        .decode_into(Destination {
            pixel_format,
            width: header.width,
            height: header.height,
            data: pixels.data_mut(),
            stride,
        })
        .inspect_err(|e| debug!("Decoding {}x{} image failed: {e}", header.width, header.height))
}

/// Encode a tightly packed RGB or non-premultiplied RGBA pixel buffer.
///
/// # Example
/// ```
/// use qoir::{EncodeOptions, PixelBuffer, PixelConfiguration, PixelFormat};
///
/// let config = PixelConfiguration::new(PixelFormat::Rgb, 2, 1);
/// let pixels = PixelBuffer::from_raw(config, vec![10, 20, 30, 10, 20, 30], 6).unwrap();
///
/// let file = qoir::encode(&pixels, EncodeOptions::default()).unwrap();
/// let decoded = qoir::decode(&file, Default::default()).unwrap();
/// assert_eq!(decoded.data(), [10, 20, 30, 255, 10, 20, 30, 255]);
/// ```
pub fn encode(pixels: &PixelBuffer, _options: EncodeOptions) -> Result<Vec<u8>, Error> {
    let Some(channels) = Channels::for_pixel_format(pixels.pixel_format()) else {
        debug!("Cannot encode pixel format {:?}", pixels.pixel_format());
        return Err(Error::UnsupportedPixfmt);
    };

    let row_len = pixels
        .configuration()
        .packed_stride()
        .ok_or(Error::UnsupportedPixbuf)?;
    if pixels.stride() != row_len {
        debug!("Cannot encode stride {} for rows of {row_len} bytes", pixels.stride());
        return Err(Error::UnsupportedPixbuf);
    }

    let desc = Descriptor {
        width: pixels.width(),
        height: pixels.height(),
        channels,
    };

    let len = desc.pixels_len().ok_or(Error::InvalidArgument)?;
    let data = pixels.data().get(..len).ok_or(Error::InvalidArgument)?;

    encoder::encode(data, &desc)
}
