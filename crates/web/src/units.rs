//! Unit conversion tables.
//!
//! Three categories with the full pairwise conversion table. Results round
//! to four decimal places, and an identity pair short-circuits to the input
//! (also rounded). A pair that cannot be converted (an unknown unit name or
//! units from different categories) is an explicit error rather than a
//! silent no-op.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Conversion failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertError {
    /// The unit name is not recognized.
    #[error("unknown unit: {0}")]
    UnknownUnit(String),
    /// The two units belong to different categories.
    #[error("cannot convert {from} to {to}")]
    CategoryMismatch {
        /// Source unit.
        from: Unit,
        /// Target unit.
        to: Unit,
    },
}

/// A measurement category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Length,
    Weight,
    Temperature,
}

impl Category {
    /// The units belonging to this category, in display order.
    #[must_use]
    pub const fn units(self) -> &'static [Unit] {
        match self {
            Self::Length => &[
                Unit::Meter,
                Unit::Kilometer,
                Unit::Mile,
                Unit::Inch,
                Unit::Foot,
                Unit::Centimeter,
            ],
            Self::Weight => &[Unit::Kilogram, Unit::Gram, Unit::Pound, Unit::Ounce],
            Self::Temperature => &[Unit::Celsius, Unit::Fahrenheit, Unit::Kelvin],
        }
    }

    /// All categories, in display order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Length, Self::Weight, Self::Temperature]
    }
}

/// A single unit of measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Meter,
    Kilometer,
    Mile,
    Inch,
    Foot,
    Centimeter,
    Kilogram,
    Gram,
    Pound,
    Ounce,
    Celsius,
    Fahrenheit,
    Kelvin,
}

impl Unit {
    /// The category this unit belongs to.
    #[must_use]
    pub const fn category(self) -> Category {
        match self {
            Self::Meter
            | Self::Kilometer
            | Self::Mile
            | Self::Inch
            | Self::Foot
            | Self::Centimeter => Category::Length,
            Self::Kilogram | Self::Gram | Self::Pound | Self::Ounce => Category::Weight,
            Self::Celsius | Self::Fahrenheit | Self::Kelvin => Category::Temperature,
        }
    }

    /// The short name used in the API and select options.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Meter => "m",
            Self::Kilometer => "km",
            Self::Mile => "mile",
            Self::Inch => "inch",
            Self::Foot => "ft",
            Self::Centimeter => "cm",
            Self::Kilogram => "kg",
            Self::Gram => "g",
            Self::Pound => "lb",
            Self::Ounce => "oz",
            Self::Celsius => "celsius",
            Self::Fahrenheit => "fahrenheit",
            Self::Kelvin => "kelvin",
        }
    }

    /// A label for select options, e.g. `Kilometer (km)`.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Meter => "Meter (m)",
            Self::Kilometer => "Kilometer (km)",
            Self::Mile => "Mile (mile)",
            Self::Inch => "Inch (inch)",
            Self::Foot => "Foot (ft)",
            Self::Centimeter => "Centimeter (cm)",
            Self::Kilogram => "Kilogram (kg)",
            Self::Gram => "Gram (g)",
            Self::Pound => "Pound (lb)",
            Self::Ounce => "Ounce (oz)",
            Self::Celsius => "Celsius (°C)",
            Self::Fahrenheit => "Fahrenheit (°F)",
            Self::Kelvin => "Kelvin (K)",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Unit {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "m" => Ok(Self::Meter),
            "km" => Ok(Self::Kilometer),
            "mile" => Ok(Self::Mile),
            "inch" => Ok(Self::Inch),
            "ft" => Ok(Self::Foot),
            "cm" => Ok(Self::Centimeter),
            "kg" => Ok(Self::Kilogram),
            "g" => Ok(Self::Gram),
            "lb" => Ok(Self::Pound),
            "oz" => Ok(Self::Ounce),
            "celsius" => Ok(Self::Celsius),
            "fahrenheit" => Ok(Self::Fahrenheit),
            "kelvin" => Ok(Self::Kelvin),
            other => Err(ConvertError::UnknownUnit(other.to_owned())),
        }
    }
}

/// Convert `value` between two units, rounded to four decimal places.
///
/// # Errors
///
/// Returns [`ConvertError::CategoryMismatch`] when the units do not share a
/// category.
pub fn convert(value: f64, from: Unit, to: Unit) -> Result<f64, ConvertError> {
    if from == to {
        return Ok(round4(value));
    }
    if from.category() != to.category() {
        return Err(ConvertError::CategoryMismatch { from, to });
    }
    Ok(round4(convert_raw(value, from, to)))
}

/// The pairwise table. Constants are carried over verbatim from the
/// published tables the product shipped with, rounded variants included.
#[allow(clippy::match_same_arms)]
fn convert_raw(v: f64, from: Unit, to: Unit) -> f64 {
    use Unit::{
        Celsius, Centimeter, Fahrenheit, Foot, Gram, Inch, Kelvin, Kilogram, Kilometer, Meter,
        Mile, Ounce, Pound,
    };

    match (from, to) {
        // Length
        (Meter, Kilometer) => v / 1000.0,
        (Meter, Mile) => v / 1609.344,
        (Meter, Inch) => v * 39.3701,
        (Meter, Foot) => v * 3.28084,
        (Meter, Centimeter) => v * 100.0,
        (Kilometer, Meter) => v * 1000.0,
        (Kilometer, Mile) => v / 1.60934,
        (Kilometer, Inch) => v * 39370.1,
        (Kilometer, Foot) => v * 3280.84,
        (Kilometer, Centimeter) => v * 100_000.0,
        (Mile, Meter) => v * 1609.344,
        (Mile, Kilometer) => v * 1.60934,
        (Mile, Inch) => v * 63360.0,
        (Mile, Foot) => v * 5280.0,
        (Mile, Centimeter) => v * 160_934.4,
        (Inch, Meter) => v / 39.3701,
        (Inch, Kilometer) => v / 39370.1,
        (Inch, Mile) => v / 63360.0,
        (Inch, Foot) => v / 12.0,
        (Inch, Centimeter) => v * 2.54,
        (Foot, Meter) => v / 3.28084,
        (Foot, Kilometer) => v / 3280.84,
        (Foot, Mile) => v / 5280.0,
        (Foot, Inch) => v * 12.0,
        (Foot, Centimeter) => v * 30.48,
        (Centimeter, Meter) => v / 100.0,
        (Centimeter, Kilometer) => v / 100_000.0,
        (Centimeter, Mile) => v / 160_934.4,
        (Centimeter, Inch) => v / 2.54,
        (Centimeter, Foot) => v / 30.48,

        // Weight
        (Kilogram, Gram) => v * 1000.0,
        (Kilogram, Pound) => v * 2.20462,
        (Kilogram, Ounce) => v * 35.274,
        (Gram, Kilogram) => v / 1000.0,
        (Gram, Pound) => v / 453.592,
        (Gram, Ounce) => v / 28.3495,
        (Pound, Kilogram) => v / 2.20462,
        (Pound, Gram) => v * 453.592,
        (Pound, Ounce) => v * 16.0,
        (Ounce, Kilogram) => v / 35.274,
        (Ounce, Gram) => v * 28.3495,
        (Ounce, Pound) => v / 16.0,

        // Temperature
        (Celsius, Fahrenheit) => v * 9.0 / 5.0 + 32.0,
        (Celsius, Kelvin) => v + 273.15,
        (Fahrenheit, Celsius) => (v - 32.0) * 5.0 / 9.0,
        (Fahrenheit, Kelvin) => (v - 32.0) * 5.0 / 9.0 + 273.15,
        (Kelvin, Celsius) => v - 273.15,
        (Kelvin, Fahrenheit) => (v - 273.15) * 9.0 / 5.0 + 32.0,

        // Identity and cross-category pairs are rejected before this point.
        _ => v,
    }
}

/// Round to four decimal places.
fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_km_to_mile() {
        assert!((convert(1.0, Unit::Kilometer, Unit::Mile).unwrap() - 0.6214).abs() < f64::EPSILON);
    }

    #[test]
    fn test_km_mile_round_trip() {
        let there = convert(1.0, Unit::Kilometer, Unit::Mile).unwrap();
        let back = convert(there, Unit::Mile, Unit::Kilometer).unwrap();
        assert!((back - 1.0).abs() < 1e-3, "round trip drifted to {back}");
    }

    #[test]
    fn test_identity_rounds_to_four_decimals() {
        assert!(
            (convert(1.23456789, Unit::Meter, Unit::Meter).unwrap() - 1.2346).abs() < f64::EPSILON
        );
    }

    #[test]
    fn test_temperature_formulas() {
        assert!((convert(0.0, Unit::Celsius, Unit::Fahrenheit).unwrap() - 32.0).abs() < 1e-9);
        assert!((convert(100.0, Unit::Celsius, Unit::Kelvin).unwrap() - 373.15).abs() < 1e-9);
        assert!((convert(212.0, Unit::Fahrenheit, Unit::Celsius).unwrap() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_weight_pairs() {
        assert!((convert(1.0, Unit::Kilogram, Unit::Pound).unwrap() - 2.2046).abs() < f64::EPSILON);
        assert!((convert(16.0, Unit::Ounce, Unit::Pound).unwrap() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_cross_category_is_an_error() {
        let err = convert(1.0, Unit::Meter, Unit::Kilogram).unwrap_err();
        assert_eq!(
            err,
            ConvertError::CategoryMismatch {
                from: Unit::Meter,
                to: Unit::Kilogram,
            }
        );
    }

    #[test]
    fn test_unknown_unit_name() {
        let err = "furlong".parse::<Unit>().unwrap_err();
        assert_eq!(err, ConvertError::UnknownUnit("furlong".to_owned()));
    }

    #[test]
    fn test_every_category_pair_is_covered() {
        // The table must be total within each category.
        for category in Category::all() {
            for &from in category.units() {
                for &to in category.units() {
                    assert!(convert(2.5, from, to).is_ok(), "missing pair {from}->{to}");
                }
            }
        }
    }

    #[test]
    fn test_unit_names_round_trip() {
        for category in Category::all() {
            for &unit in category.units() {
                assert_eq!(unit.as_str().parse::<Unit>().unwrap(), unit);
            }
        }
    }
}
