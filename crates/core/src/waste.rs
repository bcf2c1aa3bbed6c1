//! Waste categories shared by inventory batches and orders.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_object::ValueObject;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WasteType {
    Plastic,
    Paper,
    Glass,
    Metal,
    Organic,
    Electronic,
}

impl WasteType {
    pub const ALL: [WasteType; 6] = [
        WasteType::Plastic,
        WasteType::Paper,
        WasteType::Glass,
        WasteType::Metal,
        WasteType::Organic,
        WasteType::Electronic,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            WasteType::Plastic => "Plastic",
            WasteType::Paper => "Paper",
            WasteType::Glass => "Glass",
            WasteType::Metal => "Metal",
            WasteType::Organic => "Organic",
            WasteType::Electronic => "Electronic",
        }
    }
}

impl ValueObject for WasteType {}

impl core::fmt::Display for WasteType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WasteType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WasteType::ALL
            .into_iter()
            .find(|w| w.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DomainError::validation(format!("unknown waste type: {s}")))
    }
}
