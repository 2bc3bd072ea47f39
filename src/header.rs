use std::io::{Cursor, Write};

use byteorder::{ReadBytesExt, WriteBytesExt, BE};
use log::trace;

use crate::{error::Error, pixel::PixelFormat};

/// Identifier at the start of every file, `qoif`.
pub const MAGIC: u32 = 0x716F_6966;

/// Fixed size of the [`Header`] in bytes.
pub const HEADER_LEN: usize = 14;

/// A QOIR file header. This must be included at the beginning
/// of a valid QOIR file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Width of the image in pixels.
    pub width: u32,

    /// Height of the image in pixels.
    pub height: u32,

    /// Channels stored per pixel in the opcode stream.
    pub channels: Channels,

    /// Reserved. Written as 0 and ignored when reading.
    pub colorspace: u8,
}

impl Header {
    pub fn new(width: u32, height: u32, channels: Channels) -> Self {
        Self {
            width,
            height,
            channels,
            colorspace: 0,
        }
    }

    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut buf = [0u8; HEADER_LEN];

        // Writing into a correctly sized array cannot fail
        let _ = self.write_into(&mut &mut buf[..]);

        buf
    }

    pub fn write_into<T: Write + WriteBytesExt>(&self, output: &mut T) -> Result<(), std::io::Error> {
        output.write_u32::<BE>(MAGIC)?;
        output.write_u32::<BE>(self.width)?;
        output.write_u32::<BE>(self.height)?;
        output.write_u8(self.channels.into())?;
        output.write_u8(self.colorspace)?;

        Ok(())
    }

    pub fn len(&self) -> usize {
        HEADER_LEN
    }

    /// Parse the header at the start of `input`.
    ///
    /// Input shorter than [`HEADER_LEN`], a wrong identifier and a channel
    /// count other than 3 or 4 are all [`Error::InvalidData`].
    pub fn read_from(input: &[u8]) -> Result<Self, Error> {
        if input.len() < HEADER_LEN {
            return Err(Error::InvalidData);
        }

        let mut input = Cursor::new(&input[..HEADER_LEN]);

        let magic = input.read_u32::<BE>().map_err(truncated)?;
        if magic != MAGIC {
            return Err(Error::InvalidData);
        }

        let width = input.read_u32::<BE>().map_err(truncated)?;
        let height = input.read_u32::<BE>().map_err(truncated)?;
        let channels = Channels::try_from(input.read_u8().map_err(truncated)?)?;
        let colorspace = input.read_u8().map_err(truncated)?;

        trace!("Image width: {width}");
        trace!("Image height: {height}");
        trace!("Image channels: {channels:?}");

        Ok(Header {
            width,
            height,
            channels,
            colorspace,
        })
    }
}

fn truncated(_: std::io::Error) -> Error {
    Error::InvalidData
}

/// Number of color channels stored in the file.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channels {
    /// RGB, 8 bits per channel
    Rgb = 3,

    /// RGBA, 8 bits per channel
    Rgba = 4,
}

impl Channels {
    /// Bytes per pixel in the source stream.
    pub fn bytes_per_pixel(self) -> usize {
        self as usize
    }

    /// The pixel format this channel count naturally decodes to.
    pub fn pixel_format(self) -> PixelFormat {
        match self {
            Channels::Rgb => PixelFormat::Rgb,
            Channels::Rgba => PixelFormat::RgbaNonPremul,
        }
    }

    /// The channel count that stores `format` without loss, if the encoder
    /// accepts that format.
    pub fn for_pixel_format(format: PixelFormat) -> Option<Self> {
        match format {
            PixelFormat::Rgb => Some(Channels::Rgb),
            PixelFormat::RgbaNonPremul => Some(Channels::Rgba),
            _ => None,
        }
    }
}

impl TryFrom<u8> for Channels {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            3 => Self::Rgb,
            4 => Self::Rgba,
            _ => return Err(Error::InvalidData),
        })
    }
}

impl From<Channels> for u8 {
    fn from(value: Channels) -> u8 {
        value as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_bytes_are_big_endian() {
        let header = Header::new(0x0102_0304, 7, Channels::Rgba);
        assert_eq!(
            header.to_bytes(),
            [b'q', b'o', b'i', b'f', 1, 2, 3, 4, 0, 0, 0, 7, 4, 0]
        );
        assert_eq!(Header::read_from(&header.to_bytes()).unwrap(), header);
    }

    #[test]
    fn too_short() {
        let bytes = Header::new(1, 1, Channels::Rgb).to_bytes();
        assert_eq!(Header::read_from(&bytes[..13]), Err(Error::InvalidData));
        assert_eq!(Header::read_from(&[]), Err(Error::InvalidData));
    }

    #[test]
    fn wrong_magic() {
        let mut bytes = Header::new(1, 1, Channels::Rgb).to_bytes();
        bytes[0] = b'Q';
        assert_eq!(Header::read_from(&bytes), Err(Error::InvalidData));
    }

    #[test]
    fn bad_channel_count() {
        for channels in [0, 1, 2, 5, 255] {
            let mut bytes = Header::new(1, 1, Channels::Rgb).to_bytes();
            bytes[12] = channels;
            assert_eq!(Header::read_from(&bytes), Err(Error::InvalidData));
        }
    }

    #[test]
    fn reserved_byte_is_ignored() {
        let mut bytes = Header::new(2, 3, Channels::Rgb).to_bytes();
        bytes[13] = 0x7F;
        let header = Header::read_from(&bytes).unwrap();
        assert_eq!((header.width, header.height), (2, 3));
        assert_eq!(header.colorspace, 0x7F);
    }
}
