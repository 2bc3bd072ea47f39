use log::{debug, trace};

use crate::{
    binio::ByteReader,
    error::Error,
    header::Channels,
    opcode::{ColorCache, Opcode, Rgba, END_MARKER, START_PIXEL},
    operations::Emitter,
    pixel::{min_data_len, PixelFormat},
};

/// Where decoded pixels go.
pub struct Destination<'a> {
    pub pixel_format: PixelFormat,
    pub width: u32,
    pub height: u32,
    pub data: &'a mut [u8],
    pub stride: usize,
}

/// Single pass decoder for an opcode stream.
///
/// Holds the running pixel, the color cache and the pending run. All state
/// lives for one stream only.
pub struct OpcodeDecoder<'a> {
    reader: ByteReader<'a>,
    source_channels: Channels,
    cache: ColorCache,
    pixel: Rgba,
    run: usize,
}

impl<'a> OpcodeDecoder<'a> {
    /// Start decoding `input`, whose last 8 bytes are the end marker and are
    /// never read as opcodes.
    pub fn new(input: &'a [u8], source_channels: Channels) -> Result<Self, Error> {
        let Some(reader) = ByteReader::new(input, END_MARKER.len()) else {
            debug!("Opcode stream of {} bytes cannot hold the end marker", input.len());
            return Err(Error::InvalidData);
        };

        Ok(Self {
            reader,
            source_channels,
            cache: ColorCache::new(),
            pixel: START_PIXEL,
            run: 0,
        })
    }

    /// Advance to the next pixel and return it.
    ///
    /// Once the stream is exhausted the last pixel repeats forever.
    pub fn next_pixel(&mut self) -> Result<Rgba, Error> {
        if self.run > 0 {
            self.run -= 1;
            return Ok(self.pixel);
        }

        if self.reader.is_exhausted() {
            return Ok(self.pixel);
        }

        let offset = self.reader.byte_offset();
        let control = self.reader.read_u8().ok_or(Error::InvalidData)?;

        let opcode = Opcode::classify(control);
        if self.reader.remaining() < opcode.operand_len() {
            debug!(
                "Truncated {opcode:?} at byte {offset}, needs {} bytes but {} remain",
                opcode.operand_len(),
                self.reader.remaining()
            );
            return Err(Error::InvalidData);
        }

        let px = &mut self.pixel;
        match opcode {
            Opcode::LiteralRgb => {
                let [r, g, b] = self.reader.read::<3>().ok_or(Error::InvalidData)?;
                px[0] = r;
                px[1] = g;
                px[2] = b;
            }
            Opcode::LiteralRgba => {
                if self.source_channels == Channels::Rgb {
                    trace!("RGBA literal at byte {offset} in a 3 channel stream");
                }
                *px = self.reader.read::<4>().ok_or(Error::InvalidData)?;
            }
            Opcode::Index(slot) => {
                *px = self.cache.get(slot);
            }
            Opcode::Diff(dr, dg, db) => {
                px[0] = px[0].wrapping_add_signed(dr);
                px[1] = px[1].wrapping_add_signed(dg);
                px[2] = px[2].wrapping_add_signed(db);
            }
            Opcode::Luma(payload) => {
                let b2 = self.reader.read_u8().ok_or(Error::InvalidData)?;
                let vg = payload.wrapping_sub(32);

                px[0] = px[0].wrapping_add(vg.wrapping_sub(8).wrapping_add(b2 >> 4));
                px[1] = px[1].wrapping_add(vg);
                px[2] = px[2].wrapping_add(vg.wrapping_sub(8).wrapping_add(b2 & 0x0F));
            }
            Opcode::Run(count) => {
                self.run = usize::from(count);
            }
        }

        self.cache.insert(self.pixel);

        Ok(self.pixel)
    }

    /// Fill every pixel of `dst`, row by row. Padding past the end of each
    /// row is left untouched.
    pub fn decode_into(&mut self, mut dst: Destination<'_>) -> Result<(), Error> {
        let emitter = Emitter::new(dst.pixel_format)?;
        let bpp = emitter.bytes_per_pixel();

        let row_len = (dst.width as usize).checked_mul(bpp).ok_or(Error::InvalidData)?;
        if dst.stride < row_len || dst.data.len() < min_data_len(row_len, dst.stride, dst.height)? {
            return Err(Error::InvalidArgument);
        }

        for y in 0..dst.height as usize {
            let start = y * dst.stride;
            let row = &mut dst.data[start..start + row_len];

            for out in row.chunks_exact_mut(bpp) {
                let px = self.next_pixel()?;
                emitter.emit(&px, out);
            }
        }

        trace!(
            "Finished decoding, {} of {} opcode bytes used",
            self.reader.byte_offset(),
            self.reader.byte_offset() + self.reader.remaining()
        );

        Ok(())
    }
}
