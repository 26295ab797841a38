//! CIM unit symbols and unit multipliers
//!
//! Both are closed sets. Their text forms are the CIM literals, which is
//! also how they travel inside property modifications.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Scale prefix applied to a quantity's unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitMultiplier {
    #[serde(rename = "p")]
    Pico,
    #[serde(rename = "n")]
    Nano,
    #[serde(rename = "micro")]
    Micro,
    #[serde(rename = "m")]
    Milli,
    #[serde(rename = "c")]
    Centi,
    #[serde(rename = "d")]
    Deci,
    #[serde(rename = "none")]
    None,
    #[serde(rename = "k")]
    Kilo,
    #[serde(rename = "M")]
    Mega,
    #[serde(rename = "G")]
    Giga,
    #[serde(rename = "T")]
    Tera,
}

impl UnitMultiplier {
    pub const ALL: [UnitMultiplier; 11] = [
        UnitMultiplier::Pico,
        UnitMultiplier::Nano,
        UnitMultiplier::Micro,
        UnitMultiplier::Milli,
        UnitMultiplier::Centi,
        UnitMultiplier::Deci,
        UnitMultiplier::None,
        UnitMultiplier::Kilo,
        UnitMultiplier::Mega,
        UnitMultiplier::Giga,
        UnitMultiplier::Tera,
    ];

    /// The CIM literal (`none` for the unscaled multiplier)
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitMultiplier::Pico => "p",
            UnitMultiplier::Nano => "n",
            UnitMultiplier::Micro => "micro",
            UnitMultiplier::Milli => "m",
            UnitMultiplier::Centi => "c",
            UnitMultiplier::Deci => "d",
            UnitMultiplier::None => "none",
            UnitMultiplier::Kilo => "k",
            UnitMultiplier::Mega => "M",
            UnitMultiplier::Giga => "G",
            UnitMultiplier::Tera => "T",
        }
    }

    /// The prefix written in front of a unit symbol (empty for `none`)
    pub fn prefix(&self) -> &'static str {
        match self {
            UnitMultiplier::None => "",
            other => other.as_str(),
        }
    }

    /// Power of ten this multiplier stands for
    pub fn exponent(&self) -> i32 {
        match self {
            UnitMultiplier::Pico => -12,
            UnitMultiplier::Nano => -9,
            UnitMultiplier::Micro => -6,
            UnitMultiplier::Milli => -3,
            UnitMultiplier::Centi => -2,
            UnitMultiplier::Deci => -1,
            UnitMultiplier::None => 0,
            UnitMultiplier::Kilo => 3,
            UnitMultiplier::Mega => 6,
            UnitMultiplier::Giga => 9,
            UnitMultiplier::Tera => 12,
        }
    }
}

impl fmt::Display for UnitMultiplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnitMultiplier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| format!("'{}' is not a unit multiplier", s))
    }
}

/// Unit of measure of a quantity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitSymbol {
    A,
    V,
    W,
    #[serde(rename = "VA")]
    Va,
    #[serde(rename = "VAr")]
    VAr,
    #[serde(rename = "VAh")]
    VAh,
    #[serde(rename = "Wh")]
    Wh,
    #[serde(rename = "VArh")]
    VArh,
    #[serde(rename = "ohm")]
    Ohm,
    S,
    F,
    H,
    #[serde(rename = "Hz")]
    Hz,
    J,
    N,
    #[serde(rename = "Pa")]
    Pa,
    #[serde(rename = "s")]
    Second,
    #[serde(rename = "min")]
    Minute,
    #[serde(rename = "h")]
    Hour,
    #[serde(rename = "deg")]
    Degree,
    #[serde(rename = "degC")]
    DegreeCelsius,
    #[serde(rename = "rad")]
    Radian,
    #[serde(rename = "m")]
    Metre,
    #[serde(rename = "m2")]
    SquareMetre,
    #[serde(rename = "m3")]
    CubicMetre,
    #[serde(rename = "g")]
    Gram,
    #[serde(rename = "none")]
    None,
}

impl UnitSymbol {
    pub const ALL: [UnitSymbol; 27] = [
        UnitSymbol::A,
        UnitSymbol::V,
        UnitSymbol::W,
        UnitSymbol::Va,
        UnitSymbol::VAr,
        UnitSymbol::VAh,
        UnitSymbol::Wh,
        UnitSymbol::VArh,
        UnitSymbol::Ohm,
        UnitSymbol::S,
        UnitSymbol::F,
        UnitSymbol::H,
        UnitSymbol::Hz,
        UnitSymbol::J,
        UnitSymbol::N,
        UnitSymbol::Pa,
        UnitSymbol::Second,
        UnitSymbol::Minute,
        UnitSymbol::Hour,
        UnitSymbol::Degree,
        UnitSymbol::DegreeCelsius,
        UnitSymbol::Radian,
        UnitSymbol::Metre,
        UnitSymbol::SquareMetre,
        UnitSymbol::CubicMetre,
        UnitSymbol::Gram,
        UnitSymbol::None,
    ];

    /// The CIM literal
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitSymbol::A => "A",
            UnitSymbol::V => "V",
            UnitSymbol::W => "W",
            UnitSymbol::Va => "VA",
            UnitSymbol::VAr => "VAr",
            UnitSymbol::VAh => "VAh",
            UnitSymbol::Wh => "Wh",
            UnitSymbol::VArh => "VArh",
            UnitSymbol::Ohm => "ohm",
            UnitSymbol::S => "S",
            UnitSymbol::F => "F",
            UnitSymbol::H => "H",
            UnitSymbol::Hz => "Hz",
            UnitSymbol::J => "J",
            UnitSymbol::N => "N",
            UnitSymbol::Pa => "Pa",
            UnitSymbol::Second => "s",
            UnitSymbol::Minute => "min",
            UnitSymbol::Hour => "h",
            UnitSymbol::Degree => "deg",
            UnitSymbol::DegreeCelsius => "degC",
            UnitSymbol::Radian => "rad",
            UnitSymbol::Metre => "m",
            UnitSymbol::SquareMetre => "m2",
            UnitSymbol::CubicMetre => "m3",
            UnitSymbol::Gram => "g",
            UnitSymbol::None => "none",
        }
    }
}

impl fmt::Display for UnitSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnitSymbol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|u| u.as_str() == s)
            .ok_or_else(|| format!("'{}' is not a unit symbol", s))
    }
}

/// Split a prefixed unit such as `kV`, `microH` or `degC` into its parts
///
/// Longer prefixes are tried first and the unprefixed reading last, so
/// `mm` reads as milli-metre while `min` and `m2` stay plain units.
pub fn split_prefixed_unit(text: &str) -> Option<(UnitMultiplier, UnitSymbol)> {
    let mut prefixed: Vec<UnitMultiplier> = UnitMultiplier::ALL
        .iter()
        .copied()
        .filter(|m| *m != UnitMultiplier::None)
        .collect();
    prefixed.sort_by_key(|m| std::cmp::Reverse(m.prefix().len()));

    prefixed
        .into_iter()
        .find_map(|m| {
            text.strip_prefix(m.prefix())
                .and_then(|rest| rest.parse::<UnitSymbol>().ok())
                .map(|unit| (m, unit))
        })
        .or_else(|| {
            text.parse::<UnitSymbol>()
                .ok()
                .map(|unit| (UnitMultiplier::None, unit))
        })
}
