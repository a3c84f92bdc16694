//! Word codecs turning a numeric value into the 16-bit words a register bank
//! exposes on the wire.
//!
//! All float kinds start from the IEEE-754 bit pattern of the value narrowed to
//! `f32`, split into a high and a low word. The kind then decides which word
//! goes first and whether the two bytes inside each word are exchanged.
use super::EncodingKind;

/// One or two encoded 16-bit words, in wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodedWords {
    Single(u16),
    Pair([u16; 2]),
}

impl EncodedWords {
    pub fn as_slice(&self) -> &[u16] {
        match self {
            EncodedWords::Single(word) => std::slice::from_ref(word),
            EncodedWords::Pair(words) => words,
        }
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Split every word into its high byte followed by its low byte.
    pub fn to_be_bytes(&self) -> Vec<u8> {
        self.as_slice()
            .iter()
            .flat_map(|word| word.to_be_bytes())
            .collect()
    }
}

/// Exchange the two 8-bit halves of a word.
pub const fn swap_bytes(word: u16) -> u16 {
    word.swap_bytes()
}

/// Split the `f32` bit pattern of `number` into `(high, low)` words.
pub fn float_words(number: f64) -> (u16, u16) {
    let bits = (number as f32).to_bits();
    ((bits >> 16) as u16, (bits & 0xFFFF) as u16)
}

pub fn encode_words(kind: EncodingKind, number: f64) -> EncodedWords {
    match kind {
        EncodingKind::WordInt16BigEndian => {
            // Value in the upper byte, lower byte pinned to 1. This is the
            // layout modpoll accepts for coils, not a general int16 encoding.
            EncodedWords::Single(((number as u16) << 8) | 0x0001)
        }
        EncodingKind::WordInt16LittleEndian => EncodedWords::Single(swap_bytes(number as u16)),
        _ => {
            let (mut high, mut low) = float_words(number);
            if kind.swaps_bytes() {
                high = swap_bytes(high);
                low = swap_bytes(low);
            }
            if kind.low_word_first() {
                EncodedWords::Pair([low, high])
            } else {
                EncodedWords::Pair([high, low])
            }
        }
    }
}

/// Reassemble a float from words produced by [`encode_words`].
///
/// Returns `None` for single-word kinds or when `words` is not exactly two
/// words long.
pub fn decode_float(kind: EncodingKind, words: &[u16]) -> Option<f32> {
    if !kind.is_float() {
        return None;
    }
    let [first, second] = <[u16; 2]>::try_from(words).ok()?;
    let (mut high, mut low) = if kind.low_word_first() {
        (second, first)
    } else {
        (first, second)
    };
    if kind.swaps_bytes() {
        high = swap_bytes(high);
        low = swap_bytes(low);
    }
    Some(f32::from_bits(((high as u32) << 16) | low as u32))
}
