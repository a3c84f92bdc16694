use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use strum::EnumIter;

use crate::protocol::error::UnknownRegisterCategory;

/// Size of every register table: the whole 16-bit protocol address space.
pub const ADDRESS_SPACE: usize = 1 << 16;

/// How a category's image stores its units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitLayout {
    /// Bit tables kept as one byte per address.
    Bytes,
    /// 16-bit register tables.
    Words,
}

/// The four Modbus register tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegisterCategory {
    Coil,
    DiscreteInput,
    InputRegister,
    HoldingRegister,
}

impl RegisterCategory {
    /// Addresses one entry reserves when checking for overlap.
    ///
    /// Word tables reserve two so a float32 is never split by its successor.
    pub const fn unit_width(self) -> i64 {
        match self {
            RegisterCategory::Coil | RegisterCategory::DiscreteInput => 1,
            RegisterCategory::InputRegister | RegisterCategory::HoldingRegister => 2,
        }
    }

    pub const fn layout(self) -> UnitLayout {
        match self {
            RegisterCategory::Coil | RegisterCategory::DiscreteInput => UnitLayout::Bytes,
            RegisterCategory::InputRegister | RegisterCategory::HoldingRegister => UnitLayout::Words,
        }
    }

    /// Short name used in configuration and diagnostics.
    pub const fn name(self) -> &'static str {
        match self {
            RegisterCategory::Coil => "coil",
            RegisterCategory::DiscreteInput => "discrete",
            RegisterCategory::InputRegister => "input",
            RegisterCategory::HoldingRegister => "holding",
        }
    }
}

impl fmt::Display for RegisterCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for RegisterCategory {
    type Err = UnknownRegisterCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "coil" | "coils" => Ok(RegisterCategory::Coil),
            "discrete" | "discrete_input" | "discrete_inputs" => Ok(RegisterCategory::DiscreteInput),
            "input" | "input_register" | "input_registers" => Ok(RegisterCategory::InputRegister),
            "holding" | "holding_register" | "holding_registers" => {
                Ok(RegisterCategory::HoldingRegister)
            }
            _ => Err(UnknownRegisterCategory {
                name: s.to_string(),
            }),
        }
    }
}
