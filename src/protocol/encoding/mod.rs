pub mod codec;
mod descriptor;
mod kind;

pub use codec::{decode_float, encode_words, swap_bytes, EncodedWords};
pub use descriptor::ValueDescriptor;
pub use kind::EncodingKind;

/// Encoded words of one descriptor together with its configured address.
///
/// The register start offset is not applied yet; placement does that.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodedEntry {
    pub kind: EncodingKind,
    pub words: EncodedWords,
    pub address: i64,
}

impl EncodedEntry {
    pub fn new(kind: EncodingKind, number: f64, address: i64) -> Self {
        Self {
            kind,
            words: encode_words(kind, number),
            address,
        }
    }
}
