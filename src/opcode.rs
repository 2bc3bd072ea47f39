//! The opcode set shared by the decoder and encoder.
//!
//! Every opcode starts with a control byte. `0xFE` and `0xFF` are literal
//! pixels, anything else is split into a 2-bit tag and a 6-bit payload.

pub const OP_INDEX: u8 = 0b00_000000;
pub const OP_DIFF: u8 = 0b01_000000;
pub const OP_LUMA: u8 = 0b10_000000;
pub const OP_RUN: u8 = 0b11_000000;
pub const OP_RGB: u8 = 0xFE;
pub const OP_RGBA: u8 = 0xFF;

const MASK_2: u8 = 0b11_000000;
const MASK_6: u8 = 0b00_111111;

/// The 8 bytes closing every opcode stream.
pub const END_MARKER: [u8; 8] = [0, 0, 0, 0, 0, 0, 0, 1];

/// Longest run a single run opcode can express. Payloads 62 and 63 would
/// collide with the literal opcodes.
pub const MAX_RUN: u8 = 62;

/// Pixel channels in R, G, B, A order.
pub type Rgba = [u8; 4];

/// The pixel every stream starts from, opaque black.
pub const START_PIXEL: Rgba = [0, 0, 0, 0xFF];

/// A classified control byte.
///
/// Variants that need more bytes than the control byte carry how many in
/// [`Opcode::operand_len`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    /// Reuse the color cache slot.
    Index(u8),

    /// Small per-channel deltas in `-2..=1`, R, G, B.
    Diff(i8, i8, i8),

    /// Green delta in `-32..=31`. The red/blue deltas relative to green
    /// come from the following byte.
    Luma(u8),

    /// Repeat the current pixel this many more times.
    Run(u8),

    LiteralRgb,
    LiteralRgba,
}

impl Opcode {
    /// Classify a control byte. Every byte maps to exactly one opcode.
    pub fn classify(control: u8) -> Self {
        match control {
            OP_RGB => Opcode::LiteralRgb,
            OP_RGBA => Opcode::LiteralRgba,
            c => {
                let payload = c & MASK_6;
                match c & MASK_2 {
                    OP_INDEX => Opcode::Index(payload),
                    OP_DIFF => Opcode::Diff(
                        ((payload >> 4) & 0x03) as i8 - 2,
                        ((payload >> 2) & 0x03) as i8 - 2,
                        (payload & 0x03) as i8 - 2,
                    ),
                    OP_LUMA => Opcode::Luma(payload),
                    _ => Opcode::Run(payload),
                }
            }
        }
    }

    /// Bytes following the control byte.
    pub fn operand_len(self) -> usize {
        match self {
            Opcode::Index(_) | Opcode::Diff(..) | Opcode::Run(_) => 0,
            Opcode::Luma(_) => 1,
            Opcode::LiteralRgb => 3,
            Opcode::LiteralRgba => 4,
        }
    }
}

/// Cache slot for a pixel.
#[inline]
pub fn hash(px: &Rgba) -> usize {
    (usize::from(px[0]) * 3 + usize::from(px[1]) * 5 + usize::from(px[2]) * 7 + usize::from(px[3]) * 11)
        % 64
}

/// The 64 most recently hashed pixels, one per hash slot.
///
/// Slots are overwritten without checking for collisions.
pub struct ColorCache {
    slots: [Rgba; 64],
}

impl ColorCache {
    pub fn new() -> Self {
        Self { slots: [[0; 4]; 64] }
    }

    pub fn get(&self, slot: u8) -> Rgba {
        self.slots[usize::from(slot & MASK_6)]
    }

    /// Store `px` in its slot, returning the slot index.
    pub fn insert(&mut self, px: Rgba) -> usize {
        let slot = hash(&px);
        self.slots[slot] = px;
        slot
    }

    /// Whether `px` is currently held in its slot.
    pub fn contains(&self, px: &Rgba) -> bool {
        self.slots[hash(px)] == *px
    }
}

impl Default for ColorCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_every_tag() {
        assert_eq!(Opcode::classify(0xFE), Opcode::LiteralRgb);
        assert_eq!(Opcode::classify(0xFF), Opcode::LiteralRgba);
        assert_eq!(Opcode::classify(0x00), Opcode::Index(0));
        assert_eq!(Opcode::classify(0x3F), Opcode::Index(63));
        assert_eq!(Opcode::classify(0b01_10_01_11), Opcode::Diff(0, -1, 1));
        assert_eq!(Opcode::classify(0b01_00_00_00), Opcode::Diff(-2, -2, -2));
        assert_eq!(Opcode::classify(0b10_100000), Opcode::Luma(32));
        assert_eq!(Opcode::classify(0b11_000000), Opcode::Run(0));
        assert_eq!(Opcode::classify(0xFD), Opcode::Run(61));
    }

    #[test]
    fn operand_lengths() {
        assert_eq!(Opcode::LiteralRgb.operand_len(), 3);
        assert_eq!(Opcode::LiteralRgba.operand_len(), 4);
        assert_eq!(Opcode::Luma(0).operand_len(), 1);
        assert_eq!(Opcode::Run(4).operand_len(), 0);
    }

    #[test]
    fn hash_weights() {
        assert_eq!(hash(&[0, 0, 0, 0]), 0);
        assert_eq!(hash(&START_PIXEL), (255 * 11) % 64);
        assert_eq!(hash(&[1, 1, 1, 1]), 26);
        assert_eq!(hash(&[255, 255, 255, 255]), (255 * 26) % 64);
    }

    #[test]
    fn cache_overwrites_on_collision() {
        let mut cache = ColorCache::new();
        // Both hash to slot 0
        let a = [0, 0, 0, 0];
        let b = [64, 0, 0, 0];
        assert_eq!(hash(&a), hash(&b));

        cache.insert(a);
        assert!(cache.contains(&a));
        cache.insert(b);
        assert!(!cache.contains(&a));
        assert_eq!(cache.get(0), b);
    }
}
