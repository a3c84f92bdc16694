mod builder;
mod category;
mod image;

pub use builder::build_image;
pub use category::{RegisterCategory, UnitLayout, ADDRESS_SPACE};
pub use image::{BankSnapshot, CategorySnapshot, RegisterBank, RegisterImage, UnitSnapshot};
