use derive_more::{Display, Error};

use super::register::RegisterCategory;

/// A single value record could not be turned into a descriptor.
///
/// Recoverable: the record is skipped and the rest of the file is processed.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum DecodeError {
    #[display("malformed descriptor: field `{field}` {reason}")]
    MalformedDescriptor { field: &'static str, reason: String },
    #[display("unknown encoding kind `{kind}`")]
    UnknownEncodingKind { kind: String },
}

impl DecodeError {
    pub(crate) fn malformed(field: &'static str, reason: impl Into<String>) -> Self {
        DecodeError::MalformedDescriptor {
            field,
            reason: reason.into(),
        }
    }
}

/// Placement invariant violated while writing one category's image.
///
/// Aborts that category; entries already written stay in the image.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum PlacementError {
    #[display("{category} address {address} is outside the register address space")]
    AddressOutOfRange {
        category: RegisterCategory,
        address: i64,
    },
    #[display(
        "wrong increment of address in {category} register: address {address} must be at least {} (previous entry at {previous})",
        previous + width
    )]
    OverlapOrNonMonotonicAddress {
        category: RegisterCategory,
        address: i64,
        previous: i64,
        width: i64,
    },
}

impl PlacementError {
    pub fn category(&self) -> RegisterCategory {
        match self {
            PlacementError::AddressOutOfRange { category, .. }
            | PlacementError::OverlapOrNonMonotonicAddress { category, .. } => *category,
        }
    }

    /// The effective address that could not be placed.
    pub fn address(&self) -> i64 {
        match self {
            PlacementError::AddressOutOfRange { address, .. }
            | PlacementError::OverlapOrNonMonotonicAddress { address, .. } => *address,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("unknown register category `{name}`: allowed are coil|discrete|input|holding")]
pub struct UnknownRegisterCategory {
    pub name: String,
}
