//! Asset classes and their ATR volatility multipliers.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AssetType {
    Gold,
    Silver,
    Platinum,
    Palladium,
    Ethereum,
    Bitcoin,
    Other,
}

/// Substring → asset type, checked in order against the uppercased symbol.
const DETECTION_TABLE: &[(&str, AssetType)] = &[
    ("BTC", AssetType::Bitcoin),
    ("BITCOIN", AssetType::Bitcoin),
    ("ETH", AssetType::Ethereum),
    ("ETHEREUM", AssetType::Ethereum),
    ("GOLD", AssetType::Gold),
    ("XAU", AssetType::Gold),
    ("SILVER", AssetType::Silver),
    ("XAG", AssetType::Silver),
    ("PALLADIUM", AssetType::Palladium),
    ("PLATINUM", AssetType::Platinum),
];

impl AssetType {
    /// Multiplier applied to the raw ATR.
    pub fn volatility_multiplier(self) -> f64 {
        match self {
            AssetType::Gold => 1.0,
            AssetType::Silver => 1.2,
            AssetType::Platinum => 1.3,
            AssetType::Palladium => 1.5,
            AssetType::Ethereum => 1.8,
            AssetType::Bitcoin => 2.0,
            AssetType::Other => 1.0,
        }
    }

    /// Guess the asset class from a ticker such as `XAUUSD` or `BTC-USD`.
    pub fn detect(symbol: &str) -> AssetType {
        let upper = symbol.to_uppercase();
        DETECTION_TABLE
            .iter()
            .find(|(needle, _)| upper.contains(needle))
            .map(|(_, asset)| *asset)
            .unwrap_or(AssetType::Other)
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AssetType::Gold => "Gold",
            AssetType::Silver => "Silver",
            AssetType::Platinum => "Platinum",
            AssetType::Palladium => "Palladium",
            AssetType::Ethereum => "Ethereum",
            AssetType::Bitcoin => "Bitcoin",
            AssetType::Other => "Other",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown asset type: {0}")]
pub struct UnknownAssetType(pub String);

impl FromStr for AssetType {
    type Err = UnknownAssetType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gold" => Ok(AssetType::Gold),
            "silver" => Ok(AssetType::Silver),
            "platinum" => Ok(AssetType::Platinum),
            "palladium" => Ok(AssetType::Palladium),
            "ethereum" => Ok(AssetType::Ethereum),
            "bitcoin" => Ok(AssetType::Bitcoin),
            "other" => Ok(AssetType::Other),
            _ => Err(UnknownAssetType(s.to_string())),
        }
    }
}

/// How the asset class is chosen for a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AssetSelection {
    #[default]
    Auto,
    Fixed(AssetType),
}

impl AssetSelection {
    pub fn resolve(self, symbol: &str) -> AssetType {
        match self {
            AssetSelection::Auto => AssetType::detect(symbol),
            AssetSelection::Fixed(asset) => asset,
        }
    }
}

impl FromStr for AssetSelection {
    type Err = UnknownAssetType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("auto") {
            Ok(AssetSelection::Auto)
        } else {
            s.parse().map(AssetSelection::Fixed)
        }
    }
}
