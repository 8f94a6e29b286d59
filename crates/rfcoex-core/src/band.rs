//! Radio band reference data
//!
//! A [`Band`] describes one transmitter/receiver allocation in MHz. Bands
//! whose transmit edges are both zero are receive-only (satellite
//! navigation, supplemental downlink) and never act as aggressors.
//!
//! Each band carries a [`Technology`] tag resolved once from its code when
//! it is constructed. Criticality, transmit power and receiver sensitivity
//! lookups all go through that tag rather than matching substrings of the
//! code, so `LTE_B13` is LTE band 13 and never band 1.
//!
//! ```rust
//! use rfcoex_core::band::{Band, Technology};
//!
//! let b13 = Band::new("LTE_B13", 777.0, 787.0, 746.0, 756.0, "LTE B13 (700c)", "LTE");
//! assert_eq!(b13.technology, Technology::Lte);
//! assert!(b13.public_safety);
//!
//! let l1 = Band::new("GNSS_L1", 0.0, 0.0, 1559.0, 1606.0, "GNSS L1/E1", "GNSS");
//! assert!(l1.is_receive_only());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed frequency interval in MHz.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FreqRange {
    pub low: f64,
    pub high: f64,
}

impl FreqRange {
    pub fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    /// Widen both edges outward by `margin` MHz.
    pub fn expanded(&self, margin: f64) -> Self {
        Self {
            low: self.low - margin,
            high: self.high + margin,
        }
    }

    /// Inclusive containment test.
    pub fn contains(&self, freq: f64) -> bool {
        self.low <= freq && freq <= self.high
    }

    /// Inclusive interval intersection; touching edges count.
    pub fn intersects(&self, other: &FreqRange) -> bool {
        !(self.high < other.low || other.high < self.low)
    }

    pub fn center(&self) -> f64 {
        (self.low + self.high) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.high - self.low
    }
}

/// Which edge of a transmit window a frequency came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    Low,
    High,
}

impl Edge {
    pub fn as_str(&self) -> &'static str {
        match self {
            Edge::Low => "low",
            Edge::High => "high",
        }
    }
}

/// GNSS signal carried by a navigation band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GnssSignal {
    L1,
    L2,
    L5,
    Other,
}

/// Radio technology of a band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Technology {
    Gsm,
    Umts,
    Lte,
    WiFi2G,
    WiFi5G,
    WiFi6E,
    Ble,
    Ism,
    HaLow,
    LoRa,
    Gnss(GnssSignal),
    Other,
}

impl Technology {
    /// Resolve the technology from a band code such as `LTE_B13`,
    /// `WiFi_5G`, `GNSS_L1` or `UHF433`.
    ///
    /// Only the leading token (before the first `_`) selects the family;
    /// the trailing token only refines Wi-Fi generation and GNSS signal.
    pub fn classify(code: &str) -> Self {
        let upper = code.to_ascii_uppercase();
        let (family, suffix) = match upper.split_once('_') {
            Some((f, s)) => (f.to_string(), s.to_string()),
            None => (upper.clone(), String::new()),
        };

        match family.as_str() {
            "GSM" => Technology::Gsm,
            "UMTS" => Technology::Umts,
            "LTE" => Technology::Lte,
            "WIFI" | "WLAN" => match suffix.as_str() {
                "5G" => Technology::WiFi5G,
                "6E" => Technology::WiFi6E,
                _ => Technology::WiFi2G,
            },
            "BLE" => Technology::Ble,
            "HALOW" => Technology::HaLow,
            "LORA" => Technology::LoRa,
            "GNSS" | "GPS" => Technology::Gnss(match suffix.as_str() {
                "L1" => GnssSignal::L1,
                "L2" => GnssSignal::L2,
                "L5" => GnssSignal::L5,
                _ => GnssSignal::Other,
            }),
            f if f.starts_with("ISM") || f.starts_with("UHF") => Technology::Ism,
            _ => Technology::Other,
        }
    }

    pub fn is_gnss(&self) -> bool {
        matches!(self, Technology::Gnss(_))
    }

    pub fn is_wifi(&self) -> bool {
        matches!(
            self,
            Technology::WiFi2G | Technology::WiFi5G | Technology::WiFi6E
        )
    }
}

impl fmt::Display for Technology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Technology::Gsm => "GSM",
            Technology::Umts => "UMTS",
            Technology::Lte => "LTE",
            Technology::WiFi2G => "Wi-Fi 2.4 GHz",
            Technology::WiFi5G => "Wi-Fi 5 GHz",
            Technology::WiFi6E => "Wi-Fi 6E",
            Technology::Ble => "BLE",
            Technology::Ism => "ISM",
            Technology::HaLow => "HaLow",
            Technology::LoRa => "LoRa",
            Technology::Gnss(GnssSignal::L1) => "GNSS L1",
            Technology::Gnss(GnssSignal::L2) => "GNSS L2",
            Technology::Gnss(GnssSignal::L5) => "GNSS L5",
            Technology::Gnss(GnssSignal::Other) => "GNSS",
            Technology::Other => "Other",
        };
        write!(f, "{}", name)
    }
}

/// 3GPP band number of an LTE/UMTS code (`LTE_B13` -> 13).
fn band_number(code: &str) -> Option<u32> {
    let (_, suffix) = code.split_once('_')?;
    suffix.strip_prefix('B')?.parse().ok()
}

/// LTE bands reserved for public-safety services (FirstNet / 700 MHz PS).
const PUBLIC_SAFETY_LTE_BANDS: &[u32] = &[13, 14];

/// A radio band with transmit and receive windows in MHz.
///
/// Deserializing rebuilds the technology tag and public-safety flag from
/// the code; serialized values for those fields are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "BandFields")]
pub struct Band {
    pub code: String,
    pub label: String,
    pub category: String,
    pub tx_low: f64,
    pub tx_high: f64,
    pub rx_low: f64,
    pub rx_high: f64,
    pub technology: Technology,
    pub public_safety: bool,
}

/// Wire form of a [`Band`] without the derived tags.
#[derive(Deserialize)]
struct BandFields {
    code: String,
    #[serde(default)]
    label: String,
    #[serde(default)]
    category: String,
    tx_low: f64,
    tx_high: f64,
    rx_low: f64,
    rx_high: f64,
}

impl From<BandFields> for Band {
    fn from(f: BandFields) -> Self {
        Band::new(&f.code, f.tx_low, f.tx_high, f.rx_low, f.rx_high, &f.label, &f.category)
    }
}

impl Band {
    /// Build a band, tagging its technology from the code.
    pub fn new(
        code: &str,
        tx_low: f64,
        tx_high: f64,
        rx_low: f64,
        rx_high: f64,
        label: &str,
        category: &str,
    ) -> Self {
        let technology = Technology::classify(code);
        let public_safety = technology == Technology::Lte
            && band_number(code).is_some_and(|n| PUBLIC_SAFETY_LTE_BANDS.contains(&n));
        Self {
            code: code.to_string(),
            label: label.to_string(),
            category: category.to_string(),
            tx_low,
            tx_high,
            rx_low,
            rx_high,
            technology,
            public_safety,
        }
    }

    /// Receive-only sentinel: both transmit edges are zero.
    pub fn is_receive_only(&self) -> bool {
        self.tx_low == 0.0 && self.tx_high == 0.0
    }

    pub fn transmits(&self) -> bool {
        !self.is_receive_only()
    }

    pub fn tx_window(&self) -> FreqRange {
        FreqRange::new(self.tx_low, self.tx_high)
    }

    pub fn rx_window(&self) -> FreqRange {
        FreqRange::new(self.rx_low, self.rx_high)
    }

    /// Transmit edges paired with their labels, low first.
    pub fn tx_edges(&self) -> [(Edge, f64); 2] {
        [(Edge::Low, self.tx_low), (Edge::High, self.tx_high)]
    }

    /// `CODE_low` / `CODE_high` label used in formulas.
    pub fn edge_label(&self, edge: Edge) -> String {
        format!("{}_{}", self.code, edge.as_str())
    }

    /// True when `freq` lands in the receive window widened by `guard`.
    pub fn receives(&self, freq: f64, guard: f64) -> bool {
        self.rx_window().expanded(guard).contains(freq)
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_receive_only() {
            write!(
                f,
                "{} ({}): Rx {}-{} MHz (receive-only)",
                self.code, self.label, self.rx_low, self.rx_high
            )
        } else {
            write!(
                f,
                "{} ({}): Tx {}-{} MHz | Rx {}-{} MHz",
                self.code, self.label, self.tx_low, self.tx_high, self.rx_low, self.rx_high
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_families() {
        assert_eq!(Technology::classify("GSM_850"), Technology::Gsm);
        assert_eq!(Technology::classify("UMTS_B1"), Technology::Umts);
        assert_eq!(Technology::classify("LTE_B1"), Technology::Lte);
        assert_eq!(Technology::classify("WiFi_2G"), Technology::WiFi2G);
        assert_eq!(Technology::classify("WiFi_5G"), Technology::WiFi5G);
        assert_eq!(Technology::classify("WiFi_6E"), Technology::WiFi6E);
        assert_eq!(Technology::classify("BLE"), Technology::Ble);
        assert_eq!(Technology::classify("UHF433"), Technology::Ism);
        assert_eq!(Technology::classify("ISM902"), Technology::Ism);
        assert_eq!(Technology::classify("HaLow_EU"), Technology::HaLow);
        assert_eq!(Technology::classify("LoRa_US"), Technology::LoRa);
        assert_eq!(
            Technology::classify("GNSS_L5"),
            Technology::Gnss(GnssSignal::L5)
        );
        assert_eq!(Technology::classify("Mystery_1"), Technology::Other);
    }

    #[test]
    fn test_public_safety_exact_band_number() {
        let b13 = Band::new("LTE_B13", 777.0, 787.0, 746.0, 756.0, "B13", "LTE");
        let b14 = Band::new("LTE_B14", 788.0, 798.0, 758.0, 768.0, "B14", "LTE");
        let b1 = Band::new("LTE_B1", 1920.0, 1980.0, 2110.0, 2170.0, "B1", "LTE");
        let b130 = Band::new("LTE_B130", 700.0, 710.0, 720.0, 730.0, "B130", "LTE");
        assert!(b13.public_safety);
        assert!(b14.public_safety);
        assert!(!b1.public_safety);
        assert!(!b130.public_safety);
    }

    #[test]
    fn test_receive_only() {
        let gnss = Band::new("GNSS_L1", 0.0, 0.0, 1559.0, 1606.0, "L1", "GNSS");
        assert!(gnss.is_receive_only());
        assert!(!gnss.transmits());
    }

    #[test]
    fn test_guarded_receive() {
        let band = Band::new("LTE_B1", 1920.0, 1980.0, 2110.0, 2170.0, "B1", "LTE");
        assert!(band.receives(2110.0, 0.0));
        assert!(!band.receives(2109.5, 0.0));
        assert!(band.receives(2109.5, 1.0));
        assert!(band.receives(2171.0, 1.0));
        assert!(!band.receives(2171.1, 1.0));
    }

    #[test]
    fn test_range_intersection() {
        let a = FreqRange::new(100.0, 200.0);
        assert!(a.intersects(&FreqRange::new(200.0, 300.0)));
        assert!(a.intersects(&FreqRange::new(50.0, 100.0)));
        assert!(!a.intersects(&FreqRange::new(200.1, 300.0)));
        assert!(a.expanded(0.5).intersects(&FreqRange::new(200.4, 300.0)));
    }

    #[test]
    fn test_edge_label() {
        let band = Band::new("LTE_B1", 1920.0, 1980.0, 2110.0, 2170.0, "B1", "LTE");
        assert_eq!(band.edge_label(Edge::High), "LTE_B1_high");
        assert_eq!(band.tx_edges()[0], (Edge::Low, 1920.0));
    }

    #[test]
    fn test_deserialize_rederives_tags() {
        let json = r#"{
            "code": "LTE_B13", "label": "B13", "category": "LTE",
            "tx_low": 777.0, "tx_high": 787.0, "rx_low": 746.0, "rx_high": 756.0,
            "technology": "ble", "public_safety": false
        }"#;
        let band: Band = serde_json::from_str(json).unwrap();
        assert_eq!(band.technology, Technology::Lte);
        assert!(band.public_safety);

        let round_trip: Band = serde_json::from_str(&serde_json::to_string(&band).unwrap()).unwrap();
        assert_eq!(round_trip, band);
    }
}
