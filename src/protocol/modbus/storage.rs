use anyhow::{anyhow, Result};
use parking_lot::RwLock;
use rmodbus::server::storage::ModbusStorage;
use std::sync::Arc;
use strum::IntoEnumIterator;

use crate::protocol::register::{RegisterBank, RegisterCategory, RegisterImage, ADDRESS_SPACE};

/// rmodbus storage spanning the whole protocol address space of every table.
pub type GeneratorStorage =
    ModbusStorage<ADDRESS_SPACE, ADDRESS_SPACE, ADDRESS_SPACE, ADDRESS_SPACE>;

/// Register tables owned by the server once startup is done.
///
/// Boxed, the four tables are too large to move around on the stack.
pub type SharedStorage = Arc<RwLock<Box<GeneratorStorage>>>;

/// Copy a populated bank into the server's storage.
///
/// Bit tables take every non-zero byte as `true`; word tables are copied as
/// they are.
pub fn storage_from_bank(bank: &RegisterBank) -> Result<Box<GeneratorStorage>> {
    let mut storage = Box::<GeneratorStorage>::default();
    for category in RegisterCategory::iter() {
        load_image(&mut storage, bank.image(category))?;
    }
    Ok(storage)
}

/// Hand the bank off to the transport.
pub fn into_shared_storage(bank: RegisterBank) -> Result<SharedStorage> {
    let storage = storage_from_bank(&bank)?;
    Ok(Arc::new(RwLock::new(storage)))
}

fn load_image(storage: &mut GeneratorStorage, image: &RegisterImage) -> Result<()> {
    let category = image.category();
    match category {
        RegisterCategory::Coil | RegisterCategory::DiscreteInput => {
            let bytes = image
                .bytes()
                .ok_or_else(|| anyhow!("{category} image is not a bit table"))?;
            let bits = if category == RegisterCategory::Coil {
                &mut storage.coils
            } else {
                &mut storage.discretes
            };
            for (bit, byte) in bits.iter_mut().zip(bytes) {
                *bit = *byte != 0;
            }
        }
        RegisterCategory::InputRegister | RegisterCategory::HoldingRegister => {
            let words = image
                .words()
                .ok_or_else(|| anyhow!("{category} image is not a word table"))?;
            let table = if category == RegisterCategory::InputRegister {
                &mut storage.inputs
            } else {
                &mut storage.holdings
            };
            table.copy_from_slice(words);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::encoding::{EncodedEntry, EncodingKind};
    use rmodbus::server::context::ModbusContext;

    #[test]
    fn test_storage_from_bank() {
        let mut bank = RegisterBank::new();
        bank.build_image(
            RegisterCategory::Coil,
            &[EncodedEntry::new(EncodingKind::WordInt16BigEndian, 0.0, 3)],
            -1,
        )
        .unwrap();
        bank.build_image(
            RegisterCategory::HoldingRegister,
            &[EncodedEntry::new(
                EncodingKind::Float32LittleWordBigEndian,
                3.1415,
                101,
            )],
            -1,
        )
        .unwrap();

        let storage = storage_from_bank(&bank).unwrap();
        // 0x0001 splits into a cleared coil followed by a set one.
        assert!(!storage.get_coil(2).unwrap());
        assert!(storage.get_coil(3).unwrap());
        assert!(!storage.get_discrete(3).unwrap());
        assert_eq!(storage.get_holding(100).unwrap(), 0x0E56);
        assert_eq!(storage.get_holding(101).unwrap(), 0x4049);
        assert_eq!(storage.get_input(100).unwrap(), 0);
    }

    #[test]
    fn test_high_addresses_are_served() {
        let mut bank = RegisterBank::new();
        bank.build_image(
            RegisterCategory::HoldingRegister,
            &[
                EncodedEntry::new(EncodingKind::Float32BigWordBigEndian, 3.1415, 30001),
                EncodedEntry::new(EncodingKind::WordInt16LittleEndian, 9.0, 65535),
            ],
            -1,
        )
        .unwrap();
        bank.build_image(
            RegisterCategory::DiscreteInput,
            &[EncodedEntry::new(EncodingKind::WordInt16BigEndian, 1.0, 65535)],
            -1,
        )
        .unwrap();

        let storage = into_shared_storage(bank).unwrap();
        let storage = storage.read();
        assert_eq!(storage.get_holding(30000).unwrap(), 0x4049);
        assert_eq!(storage.get_holding(30001).unwrap(), 0x0E56);
        assert_eq!(storage.get_holding(65534).unwrap(), 0x0900);
        assert!(storage.get_discrete(65534).unwrap());
        assert!(storage.get_discrete(65535).unwrap());
    }
}
