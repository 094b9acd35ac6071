//! Product lines a keyword can be attributed to.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// A business-defined product line, or one of the assignment sentinels.
///
/// `Twisting`, `Winding` and `HeatSetting` are concrete lines that positive tokens map to.
/// `Multiple`, `BrandKw` and `None` only appear as classification outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductLine {
    /// Yarn twisting machinery.
    Twisting,
    /// Winding machinery.
    Winding,
    /// Heat-setting machinery.
    HeatSetting,
    /// More than one concrete line was implicated.
    Multiple,
    /// A brand keyword without a concrete line.
    BrandKw,
    /// No line was implicated.
    None,
}

impl ProductLine {
    /// The concrete product lines, in declaration order.
    pub const CONCRETE: [Self; 3] = [Self::Twisting, Self::Winding, Self::HeatSetting];

    /// Returns true for lines a token can map to.
    pub fn is_concrete(self) -> bool {
        Self::CONCRETE.contains(&self)
    }

    /// Returns the stored (wire) name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Twisting => "TWISTING",
            Self::Winding => "WINDING",
            Self::HeatSetting => "HEAT_SETTING",
            Self::Multiple => "MULTIPLE",
            Self::BrandKw => "BRAND_KW",
            Self::None => "NONE",
        }
    }
}

impl fmt::Display for ProductLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductLine {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_uppercase().replace(['-', ' '], "_");
        match key.as_str() {
            "TWISTING" => Ok(Self::Twisting),
            "WINDING" => Ok(Self::Winding),
            "HEAT_SETTING" => Ok(Self::HeatSetting),
            "MULTIPLE" => Ok(Self::Multiple),
            "BRAND_KW" => Ok(Self::BrandKw),
            "NONE" => Ok(Self::None),
            _ => Err(format!("unknown product line '{s}'")),
        }
    }
}
