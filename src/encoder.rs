use log::trace;

use crate::{
    error::Error,
    header::{Channels, Header, HEADER_LEN},
    opcode::{
        hash, ColorCache, Rgba, END_MARKER, MAX_RUN, OP_DIFF, OP_INDEX, OP_LUMA, OP_RGB, OP_RGBA, OP_RUN,
        START_PIXEL,
    },
};

/// What the encoder needs to know about tightly packed pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Descriptor {
    pub width: u32,
    pub height: u32,
    pub channels: Channels,
}

impl Descriptor {
    /// Length of the pixel data this descriptor describes.
    pub fn pixels_len(&self) -> Option<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)?
            .checked_mul(self.channels.bytes_per_pixel())
    }

    /// Upper bound on the size of the encoded file. Every pixel costs at
    /// most one control byte plus its channels.
    pub fn max_encoded_len(&self) -> Option<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)?
            .checked_mul(self.channels.bytes_per_pixel() + 1)?
            .checked_add(HEADER_LEN + END_MARKER.len())
    }
}

/// Encode tightly packed RGB or RGBA `pixels` into a complete file: header,
/// opcode stream and end marker.
pub fn encode(pixels: &[u8], desc: &Descriptor) -> Result<Vec<u8>, Error> {
    if desc.pixels_len() != Some(pixels.len()) {
        return Err(Error::InvalidArgument);
    }

    let capacity = desc.max_encoded_len().ok_or(Error::OutOfMemory)?;
    let mut output = Vec::new();
    output
        .try_reserve_exact(capacity)
        .map_err(|_| Error::OutOfMemory)?;

    output.extend_from_slice(&Header::new(desc.width, desc.height, desc.channels).to_bytes());

    let mut cache = ColorCache::new();
    let mut px_prev: Rgba = START_PIXEL;
    let mut px: Rgba = START_PIXEL;
    let mut run = 0u8;

    let channels = desc.channels.bytes_per_pixel();
    for chunk in pixels.chunks_exact(channels) {
        px[..channels].copy_from_slice(chunk);

        if px == px_prev {
            run += 1;
            if run == MAX_RUN {
                output.push(OP_RUN | (run - 1));
                run = 0;
            }
            continue;
        }

        if run > 0 {
            output.push(OP_RUN | (run - 1));
            run = 0;
        }

        if cache.contains(&px) {
            output.push(OP_INDEX | hash(&px) as u8);
        } else {
            cache.insert(px);
            push_delta_or_literal(&mut output, &px, &px_prev);
        }

        px_prev = px;
    }

    if run > 0 {
        output.push(OP_RUN | (run - 1));
    }

    output.extend_from_slice(&END_MARKER);

    trace!(
        "Encoded {}x{} image into {} bytes",
        desc.width,
        desc.height,
        output.len()
    );

    Ok(output)
}

fn push_delta_or_literal(output: &mut Vec<u8>, px: &Rgba, prev: &Rgba) {
    if px[3] != prev[3] {
        output.push(OP_RGBA);
        output.extend_from_slice(px);
        return;
    }

    let vr = px[0].wrapping_sub(prev[0]);
    let vg = px[1].wrapping_sub(prev[1]);
    let vb = px[2].wrapping_sub(prev[2]);

    let vg_r = vr.wrapping_sub(vg);
    let vg_b = vb.wrapping_sub(vg);

    // Wrapped deltas: -2..=1 is outside 2..=253, -32..=31 outside 32..=223
    if !(2..=253).contains(&vr) && !(2..=253).contains(&vg) && !(2..=253).contains(&vb) {
        output.push(
            OP_DIFF | vr.wrapping_add(2) << 4 | vg.wrapping_add(2) << 2 | vb.wrapping_add(2),
        );
    } else if !(8..=247).contains(&vg_r)
        && !(32..=223).contains(&vg)
        && !(8..=247).contains(&vg_b)
    {
        output.push(OP_LUMA | vg.wrapping_add(32));
        output.push(vg_r.wrapping_add(8) << 4 | vg_b.wrapping_add(8));
    } else {
        output.push(OP_RGB);
        output.extend_from_slice(&px[..3]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn desc(width: u32, height: u32, channels: Channels) -> Descriptor {
        Descriptor {
            width,
            height,
            channels,
        }
    }

    fn ops(encoded: &[u8]) -> &[u8] {
        &encoded[HEADER_LEN..encoded.len() - END_MARKER.len()]
    }

    #[test]
    fn framing() {
        let encoded = encode(&[1, 2, 3], &desc(1, 1, Channels::Rgb)).unwrap();
        assert_eq!(&encoded[..4], b"qoif");
        assert_eq!(encoded[12], 3);
        assert!(encoded.ends_with(&END_MARKER));
    }

    #[test]
    fn start_pixel_is_a_run() {
        let encoded = encode(&[0, 0, 0, 255, 0, 0, 0, 255], &desc(2, 1, Channels::Rgba)).unwrap();
        assert_eq!(ops(&encoded), [OP_RUN | 1]);
    }

    #[test]
    fn runs_split_at_max() {
        let pixels = vec![0u8; 100 * 3];
        let encoded = encode(&pixels, &desc(100, 1, Channels::Rgb)).unwrap();
        // Black differs from the start pixel only in alpha, which RGB never stores
        assert_eq!(ops(&encoded), [OP_RUN | 61, OP_RUN | 37]);
    }

    #[test]
    fn picks_smallest_opcode() {
        let pixels = [
            1, 0, 255, // diff
            11, 10, 9, // luma
            200, 10, 9, // literal
            1, 0, 255, // index
        ];
        let encoded = encode(&pixels, &desc(4, 1, Channels::Rgb)).unwrap();
        let ops = ops(&encoded);

        assert_eq!(ops[0], OP_DIFF | 3 << 4 | 2 << 2 | 1);
        assert_eq!(ops[1], OP_LUMA | (10 + 32));
        assert_eq!(ops[2], 0x88);
        assert_eq!(&ops[3..7], [OP_RGB, 200, 10, 9]);
        assert_eq!(ops[7], OP_INDEX | hash(&[1, 0, 255, 255]) as u8);
        assert_eq!(ops.len(), 8);
    }

    #[test]
    fn alpha_change_is_rgba_literal() {
        let encoded = encode(&[1, 2, 3, 4], &desc(1, 1, Channels::Rgba)).unwrap();
        assert_eq!(ops(&encoded), [OP_RGBA, 1, 2, 3, 4]);
    }

    #[test]
    fn length_mismatch() {
        assert_eq!(encode(&[0; 5], &desc(2, 1, Channels::Rgb)), Err(Error::InvalidArgument));
    }

    #[test]
    fn empty_image() {
        let encoded = encode(&[], &desc(0, 5, Channels::Rgba)).unwrap();
        assert_eq!(encoded.len(), HEADER_LEN + END_MARKER.len());
    }
}
