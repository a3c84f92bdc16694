use super::{RegisterBank, RegisterCategory, RegisterImage};
use crate::protocol::{encoding::EncodedEntry, error::PlacementError};

/// Place encoded entries into `image`, in the order given.
///
/// Every entry lands at `entry.address + address_offset`. Each effective
/// address must be non-negative and at least the previous one plus the
/// category's unit width, the first entry being measured against address 0.
/// The first violation stops the run; entries placed before it stay written.
/// Addresses between entries keep their zero value.
pub fn build_image(
    image: &mut RegisterImage,
    entries: &[EncodedEntry],
    address_offset: i64,
) -> Result<(), PlacementError> {
    let category = image.category();
    let width = category.unit_width();
    let mut previous: i64 = 0;

    for entry in entries {
        let address = entry.address.saturating_add(address_offset);
        let index = usize::try_from(address)
            .map_err(|_| PlacementError::AddressOutOfRange { category, address })?;

        if previous > address - width {
            return Err(PlacementError::OverlapOrNonMonotonicAddress {
                category,
                address,
                previous,
                width,
            });
        }

        image.write(index, &entry.words)?;
        log::debug!(
            "Placed {} {:04X?} at {category} address {address}",
            entry.kind,
            entry.words.as_slice()
        );
        previous = address;
    }

    Ok(())
}

impl RegisterBank {
    /// Run [`build_image`] against the image of `category`.
    pub fn build_image(
        &mut self,
        category: RegisterCategory,
        entries: &[EncodedEntry],
        address_offset: i64,
    ) -> Result<(), PlacementError> {
        build_image(self.image_mut(category), entries, address_offset)
    }
}
