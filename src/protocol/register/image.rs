use serde::Serialize;
use strum::IntoEnumIterator;

use super::{RegisterCategory, UnitLayout, ADDRESS_SPACE};
use crate::protocol::{encoding::EncodedWords, error::PlacementError};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Units {
    Bytes(Box<[u8]>),
    Words(Box<[u16]>),
}

/// Zero-initialised table spanning the whole address space of one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterImage {
    category: RegisterCategory,
    units: Units,
}

impl RegisterImage {
    pub fn new(category: RegisterCategory) -> Self {
        let units = match category.layout() {
            UnitLayout::Bytes => Units::Bytes(vec![0u8; ADDRESS_SPACE].into_boxed_slice()),
            UnitLayout::Words => Units::Words(vec![0u16; ADDRESS_SPACE].into_boxed_slice()),
        };
        Self { category, units }
    }

    pub fn category(&self) -> RegisterCategory {
        self.category
    }

    pub fn len(&self) -> usize {
        match &self.units {
            Units::Bytes(bytes) => bytes.len(),
            Units::Words(words) => words.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Byte table of a coil or discrete image.
    pub fn bytes(&self) -> Option<&[u8]> {
        match &self.units {
            Units::Bytes(bytes) => Some(bytes),
            Units::Words(_) => None,
        }
    }

    /// Word table of an input or holding image.
    pub fn words(&self) -> Option<&[u16]> {
        match &self.units {
            Units::Words(words) => Some(words),
            Units::Bytes(_) => None,
        }
    }

    /// Unit at `address` widened to 16 bits.
    pub fn get(&self, address: usize) -> Option<u16> {
        match &self.units {
            Units::Bytes(bytes) => bytes.get(address).map(|b| *b as u16),
            Units::Words(words) => words.get(address).copied(),
        }
    }

    /// Write encoded words starting at `address`.
    ///
    /// Byte tables receive every word as its high byte then its low byte;
    /// word tables receive the words as they are. Nothing is written when the
    /// entry does not fit.
    pub fn write(&mut self, address: usize, words: &EncodedWords) -> Result<(), PlacementError> {
        let category = self.category;
        let out_of_range = || PlacementError::AddressOutOfRange {
            category,
            address: address as i64,
        };
        match &mut self.units {
            Units::Bytes(bytes) => {
                let data = words.to_be_bytes();
                let target = bytes
                    .get_mut(address..address + data.len())
                    .ok_or_else(out_of_range)?;
                target.copy_from_slice(&data);
            }
            Units::Words(table) => {
                let data = words.as_slice();
                let target = table
                    .get_mut(address..address + data.len())
                    .ok_or_else(out_of_range)?;
                target.copy_from_slice(data);
            }
        }
        Ok(())
    }

    /// Every non-zero unit as `(address, value)`.
    pub fn non_zero(&self) -> Vec<(usize, u16)> {
        (0..self.len())
            .filter_map(|address| match self.get(address) {
                Some(0) | None => None,
                Some(value) => Some((address, value)),
            })
            .collect()
    }
}

/// The four register images a slave serves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterBank {
    coils: RegisterImage,
    discrete_inputs: RegisterImage,
    input_registers: RegisterImage,
    holding_registers: RegisterImage,
}

impl Default for RegisterBank {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterBank {
    pub fn new() -> Self {
        Self {
            coils: RegisterImage::new(RegisterCategory::Coil),
            discrete_inputs: RegisterImage::new(RegisterCategory::DiscreteInput),
            input_registers: RegisterImage::new(RegisterCategory::InputRegister),
            holding_registers: RegisterImage::new(RegisterCategory::HoldingRegister),
        }
    }

    pub fn image(&self, category: RegisterCategory) -> &RegisterImage {
        match category {
            RegisterCategory::Coil => &self.coils,
            RegisterCategory::DiscreteInput => &self.discrete_inputs,
            RegisterCategory::InputRegister => &self.input_registers,
            RegisterCategory::HoldingRegister => &self.holding_registers,
        }
    }

    pub fn image_mut(&mut self, category: RegisterCategory) -> &mut RegisterImage {
        match category {
            RegisterCategory::Coil => &mut self.coils,
            RegisterCategory::DiscreteInput => &mut self.discrete_inputs,
            RegisterCategory::InputRegister => &mut self.input_registers,
            RegisterCategory::HoldingRegister => &mut self.holding_registers,
        }
    }

    pub fn snapshot(&self) -> BankSnapshot {
        BankSnapshot {
            categories: RegisterCategory::iter()
                .map(|category| CategorySnapshot {
                    category,
                    units: self
                        .image(category)
                        .non_zero()
                        .into_iter()
                        .map(|(address, value)| UnitSnapshot { address, value })
                        .collect(),
                })
                .collect(),
        }
    }
}

/// Serializable view of the non-zero content of a bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BankSnapshot {
    pub categories: Vec<CategorySnapshot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySnapshot {
    pub category: RegisterCategory,
    pub units: Vec<UnitSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitSnapshot {
    pub address: usize,
    pub value: u16,
}
