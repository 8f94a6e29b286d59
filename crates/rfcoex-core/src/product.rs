//! Interference product records
//!
//! Every generator emits [`InterferenceProduct`] values with the same field
//! set; optional fields are `Option`s rather than missing keys.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoexError;

/// Product family tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ProductType {
    #[serde(rename = "2H")]
    H2,
    #[serde(rename = "3H")]
    H3,
    #[serde(rename = "4H")]
    H4,
    #[serde(rename = "5H")]
    H5,
    IM2,
    IM3,
    IM4,
    IM5,
    IM7,
    ACLR,
}

impl ProductType {
    pub const ALL: [ProductType; 10] = [
        ProductType::H2,
        ProductType::H3,
        ProductType::H4,
        ProductType::H5,
        ProductType::IM2,
        ProductType::IM3,
        ProductType::IM4,
        ProductType::IM5,
        ProductType::IM7,
        ProductType::ACLR,
    ];

    /// Harmonic tag for order `n` (2..=5).
    pub fn harmonic(n: u32) -> Option<Self> {
        match n {
            2 => Some(ProductType::H2),
            3 => Some(ProductType::H3),
            4 => Some(ProductType::H4),
            5 => Some(ProductType::H5),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductType::H2 => "2H",
            ProductType::H3 => "3H",
            ProductType::H4 => "4H",
            ProductType::H5 => "5H",
            ProductType::IM2 => "IM2",
            ProductType::IM3 => "IM3",
            ProductType::IM4 => "IM4",
            ProductType::IM5 => "IM5",
            ProductType::IM7 => "IM7",
            ProductType::ACLR => "ACLR",
        }
    }

    /// Typical signal-strength rank; lower is historically stronger.
    pub fn priority(&self) -> u8 {
        match self {
            ProductType::H2 => 1,
            ProductType::IM2 => 2,
            ProductType::H3 => 3,
            ProductType::IM3 => 4,
            ProductType::H4 => 5,
            ProductType::IM4 => 6,
            ProductType::H5 => 7,
            ProductType::IM5 => 8,
            ProductType::IM7 => 9,
            ProductType::ACLR => 10,
        }
    }

    /// Nonlinearity order; `None` for ACLR.
    pub fn order(&self) -> Option<u32> {
        match self {
            ProductType::H2 | ProductType::IM2 => Some(2),
            ProductType::H3 | ProductType::IM3 => Some(3),
            ProductType::H4 | ProductType::IM4 => Some(4),
            ProductType::H5 | ProductType::IM5 => Some(5),
            ProductType::IM7 => Some(7),
            ProductType::ACLR => None,
        }
    }

    pub fn is_harmonic(&self) -> bool {
        matches!(
            self,
            ProductType::H2 | ProductType::H3 | ProductType::H4 | ProductType::H5
        )
    }

    pub fn is_intermod(&self) -> bool {
        matches!(
            self,
            ProductType::IM2
                | ProductType::IM3
                | ProductType::IM4
                | ProductType::IM5
                | ProductType::IM7
        )
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductType {
    type Err = CoexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProductType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| CoexError::UnsupportedProduct(s.to_string()))
    }
}

/// Qualitative severity, 0 (no hit) through 5 (critical).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Severity(u8);

impl Severity {
    pub const SAFE: Severity = Severity(0);
    pub const VERY_LOW: Severity = Severity(1);
    pub const LOW: Severity = Severity(2);
    pub const MEDIUM: Severity = Severity(3);
    pub const HIGH: Severity = Severity(4);
    pub const CRITICAL: Severity = Severity(5);

    /// Clamp into 0..=5.
    pub fn new(level: u8) -> Self {
        Severity(level.min(5))
    }

    pub fn level(&self) -> u8 {
        self.0
    }

    pub fn is_hit(&self) -> bool {
        self.0 > 0
    }

    pub fn tier(&self) -> &'static str {
        match self.0 {
            5 => "critical",
            4 => "high",
            3 => "medium",
            2 => "low",
            1 => "very low",
            _ => "safe",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self.0 {
            5 => "🔴",
            4 => "🟠",
            3 => "🟡",
            2 => "🔵",
            _ => "✅",
        }
    }

    /// Sort key placing the most severe first and safe products last.
    pub fn rank(&self) -> u8 {
        if self.0 > 0 {
            6 - self.0
        } else {
            10
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.symbol(), self.tier())
    }
}

/// One generated harmonic, intermodulation or leakage product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterferenceProduct {
    #[serde(rename = "type")]
    pub product_type: ProductType,
    pub subtype: Option<String>,
    pub formula: String,
    /// Resultant frequency, rounded to 2 decimals.
    pub frequency_mhz: f64,
    pub aggressors: Vec<String>,
    /// Band whose receive window contains the frequency.
    pub victim: Option<String>,
    pub severity: Severity,
    pub details: String,
    /// Mixing coefficients `(m, n)` for intermodulation products.
    pub coefficients: Option<(i32, i32)>,
}

impl InterferenceProduct {
    pub fn new(product_type: ProductType, formula: impl Into<String>, frequency_mhz: f64) -> Self {
        Self {
            product_type,
            subtype: None,
            formula: formula.into(),
            frequency_mhz: round2(frequency_mhz),
            aggressors: Vec::new(),
            victim: None,
            severity: Severity::SAFE,
            details: String::new(),
            coefficients: None,
        }
    }

    pub fn with_subtype(mut self, subtype: impl Into<String>) -> Self {
        self.subtype = Some(subtype.into());
        self
    }

    pub fn with_aggressors<S: AsRef<str>>(mut self, codes: &[S]) -> Self {
        self.aggressors = codes.iter().map(|c| c.as_ref().to_string()).collect();
        self
    }

    pub fn with_victim(mut self, victim: Option<&str>) -> Self {
        self.victim = victim.map(str::to_string);
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = details.into();
        self
    }

    pub fn with_coefficients(mut self, m: i32, n: i32) -> Self {
        self.coefficients = Some((m, n));
        self
    }

    pub fn is_hit(&self) -> bool {
        self.victim.is_some()
    }

    pub fn risk_symbol(&self) -> &'static str {
        self.severity.symbol()
    }

    /// Aggressor codes joined for display.
    pub fn aggressor_list(&self) -> String {
        self.aggressors.join(", ")
    }
}

/// Round to 2 decimal places.
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_order() {
        let mut types = ProductType::ALL.to_vec();
        types.sort_by_key(|t| t.priority());
        let names: Vec<_> = types.iter().map(|t| t.as_str()).collect();
        assert_eq!(
            names,
            ["2H", "IM2", "3H", "IM3", "4H", "IM4", "5H", "IM5", "IM7", "ACLR"]
        );
    }

    #[test]
    fn test_parse_type() {
        assert_eq!("im3".parse::<ProductType>().unwrap(), ProductType::IM3);
        assert_eq!("4H".parse::<ProductType>().unwrap(), ProductType::H4);
        assert!("IM9".parse::<ProductType>().is_err());
    }

    #[test]
    fn test_severity_tiers() {
        assert_eq!(Severity::new(9), Severity::CRITICAL);
        assert_eq!(Severity::CRITICAL.tier(), "critical");
        assert_eq!(Severity::VERY_LOW.tier(), "very low");
        assert_eq!(Severity::SAFE.symbol(), "✅");
        assert!(Severity::CRITICAL.rank() < Severity::VERY_LOW.rank());
        assert!(Severity::VERY_LOW.rank() < Severity::SAFE.rank());
    }

    #[test]
    fn test_product_rounding_and_serde() {
        let p = InterferenceProduct::new(ProductType::H2, "2×Tx_low(LTE_B1)", 3840.004)
            .with_aggressors(&["LTE_B1"]);
        assert_eq!(p.frequency_mhz, 3840.0);
        assert!(!p.is_hit());

        let json = serde_json::to_string(&p).unwrap();
        assert!(json.contains("\"type\":\"2H\""));
        let back: InterferenceProduct = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }
}
