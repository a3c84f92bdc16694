use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Binary representation selected by the `type` field of a value record.
///
/// Float kinds are named after their word order first, then the byte order
/// inside each 16-bit word. The two single-word kinds are meant for coils and
/// discrete inputs.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    AsRefStr,
    Display,
    EnumIter,
    EnumString,
    Serialize,
    Deserialize,
)]
pub enum EncodingKind {
    #[strum(serialize = "float32LittleWordBigEndian")]
    #[serde(rename = "float32LittleWordBigEndian")]
    Float32LittleWordBigEndian,
    #[strum(serialize = "float32BigWordBigEndian")]
    #[serde(rename = "float32BigWordBigEndian")]
    Float32BigWordBigEndian,
    #[strum(serialize = "float32LittleWordLittleEndian")]
    #[serde(rename = "float32LittleWordLittleEndian")]
    Float32LittleWordLittleEndian,
    #[strum(serialize = "float32BigWordLittleEndian")]
    #[serde(rename = "float32BigWordLittleEndian")]
    Float32BigWordLittleEndian,
    #[strum(serialize = "wordInt16BigEndian")]
    #[serde(rename = "wordInt16BigEndian")]
    WordInt16BigEndian,
    #[strum(serialize = "wordInt16LittleEndian")]
    #[serde(rename = "wordInt16LittleEndian")]
    WordInt16LittleEndian,
}

impl EncodingKind {
    /// Number of 16-bit words the kind produces.
    pub const fn word_count(self) -> usize {
        match self {
            Self::WordInt16BigEndian | Self::WordInt16LittleEndian => 1,
            _ => 2,
        }
    }

    pub const fn is_float(self) -> bool {
        self.word_count() == 2
    }

    /// True when the low word goes first on the wire.
    pub const fn low_word_first(self) -> bool {
        matches!(
            self,
            Self::Float32LittleWordBigEndian | Self::Float32LittleWordLittleEndian
        )
    }

    /// True when the two bytes inside every word are swapped.
    pub const fn swaps_bytes(self) -> bool {
        matches!(
            self,
            Self::Float32LittleWordLittleEndian
                | Self::Float32BigWordLittleEndian
                | Self::WordInt16LittleEndian
        )
    }
}
