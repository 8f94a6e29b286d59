//! Band catalog
//!
//! The built-in table covers 2G/3G/LTE cellular allocations, Wi-Fi, BLE,
//! sub-GHz ISM/HaLow/LoRa and the GNSS navigation bands. User-defined
//! bands from configuration are merged on top; a user band with an existing
//! code replaces the built-in entry in place.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::band::Band;
use crate::error::{CoexError, CoexResult};

/// Serializable band definition for configuration files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandSpec {
    pub code: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub tx_low: f64,
    #[serde(default)]
    pub tx_high: f64,
    pub rx_low: f64,
    pub rx_high: f64,
}

impl BandSpec {
    pub fn to_band(&self) -> Band {
        let label = if self.label.is_empty() {
            self.code.as_str()
        } else {
            self.label.as_str()
        };
        let category = if self.category.is_empty() {
            "Custom"
        } else {
            self.category.as_str()
        };
        Band::new(
            &self.code,
            self.tx_low,
            self.tx_high,
            self.rx_low,
            self.rx_high,
            label,
            category,
        )
    }
}

// code, tx_low, tx_high, rx_low, rx_high, label, category
type CatalogEntry = (&'static str, f64, f64, f64, f64, &'static str, &'static str);

const CATALOG: &[CatalogEntry] = &[
    // 2G GSM
    ("GSM_850", 824.0, 849.0, 869.0, 894.0, "GSM 850", "2G GSM"),
    ("GSM_1800", 1710.0, 1785.0, 1805.0, 1880.0, "GSM 1800 (DCS)", "2G GSM"),
    ("GSM_1900", 1850.0, 1910.0, 1930.0, 1990.0, "GSM 1900 (PCS)", "2G GSM"),
    // 3G UMTS/WCDMA
    ("UMTS_B1", 1920.0, 1980.0, 2110.0, 2170.0, "UMTS B1 (2100)", "3G UMTS/WCDMA"),
    ("UMTS_B2", 1850.0, 1910.0, 1930.0, 1990.0, "UMTS B2 (1900 PCS)", "3G UMTS/WCDMA"),
    ("UMTS_B3", 1710.0, 1785.0, 1805.0, 1880.0, "UMTS B3 (1800 DCS)", "3G UMTS/WCDMA"),
    ("UMTS_B4", 1710.0, 1755.0, 2110.0, 2155.0, "UMTS B4 (AWS-1)", "3G UMTS/WCDMA"),
    ("UMTS_B5", 824.0, 849.0, 869.0, 894.0, "UMTS B5 (850)", "3G UMTS/WCDMA"),
    ("UMTS_B8", 880.0, 915.0, 925.0, 960.0, "UMTS B8 (900)", "3G UMTS/WCDMA"),
    // LTE FDD / TDD
    ("LTE_B1", 1920.0, 1980.0, 2110.0, 2170.0, "LTE B1 (2100)", "LTE"),
    ("LTE_B2", 1850.0, 1910.0, 1930.0, 1990.0, "LTE B2 (1900 PCS)", "LTE"),
    ("LTE_B3", 1710.0, 1785.0, 1805.0, 1880.0, "LTE B3 (1800 DCS)", "LTE"),
    ("LTE_B4", 1710.0, 1755.0, 2110.0, 2155.0, "LTE B4 (AWS-1)", "LTE"),
    ("LTE_B5", 824.0, 849.0, 869.0, 894.0, "LTE B5 (850)", "LTE"),
    ("LTE_B7", 2500.0, 2570.0, 2620.0, 2690.0, "LTE B7 (2600)", "LTE"),
    ("LTE_B8", 880.0, 915.0, 925.0, 960.0, "LTE B8 (900)", "LTE"),
    ("LTE_B12", 699.0, 716.0, 729.0, 746.0, "LTE B12 (700a)", "LTE"),
    ("LTE_B13", 777.0, 787.0, 746.0, 756.0, "LTE B13 (700c)", "LTE"),
    ("LTE_B14", 788.0, 798.0, 758.0, 768.0, "LTE B14 (700 PS)", "LTE"),
    ("LTE_B17", 704.0, 716.0, 734.0, 746.0, "LTE B17 (700b)", "LTE"),
    ("LTE_B18", 815.0, 830.0, 860.0, 875.0, "LTE B18 (800 Lower)", "LTE"),
    ("LTE_B19", 830.0, 845.0, 875.0, 890.0, "LTE B19 (800 Upper)", "LTE"),
    ("LTE_B20", 832.0, 862.0, 791.0, 821.0, "LTE B20 (800 DD)", "LTE"),
    ("LTE_B21", 1447.9, 1462.9, 1495.9, 1510.9, "LTE B21 (1500)", "LTE"),
    ("LTE_B25", 1850.0, 1915.0, 1930.0, 1995.0, "LTE B25 (1900+)", "LTE"),
    ("LTE_B26", 814.0, 849.0, 859.0, 894.0, "LTE B26 (850+)", "LTE"),
    ("LTE_B28", 703.0, 748.0, 758.0, 803.0, "LTE B28 (700)", "LTE"),
    ("LTE_B29", 0.0, 0.0, 717.0, 728.0, "LTE B29 (700 DL)", "LTE"),
    ("LTE_B30", 2305.0, 2315.0, 2350.0, 2360.0, "LTE B30 (2300)", "LTE"),
    ("LTE_B32", 1452.0, 1496.0, 1452.0, 1496.0, "LTE B32 (1500 SDL)", "LTE"),
    ("LTE_B38", 2570.0, 2620.0, 2570.0, 2620.0, "LTE B38 (TDD 2600)", "LTE"),
    ("LTE_B39", 1880.0, 1920.0, 1880.0, 1920.0, "LTE B39 (TDD 1900)", "LTE"),
    ("LTE_B40", 2300.0, 2400.0, 2300.0, 2400.0, "LTE B40 (TDD 2300)", "LTE"),
    ("LTE_B41", 2496.0, 2690.0, 2496.0, 2690.0, "LTE B41 (TDD 2500)", "LTE"),
    ("LTE_B42", 3400.0, 3600.0, 3400.0, 3600.0, "LTE B42 (TDD 3500)", "LTE"),
    ("LTE_B43", 3600.0, 3800.0, 3600.0, 3800.0, "LTE B43 (TDD 3700)", "LTE"),
    ("LTE_B44", 703.0, 803.0, 703.0, 803.0, "LTE B44 (TDD 700)", "LTE"),
    ("LTE_B48", 3550.0, 3700.0, 3550.0, 3700.0, "LTE B48 (TDD CBRS)", "LTE"),
    ("LTE_B66", 1710.0, 1780.0, 2110.0, 2200.0, "LTE B66 (AWS-3)", "LTE"),
    ("LTE_B71", 663.0, 698.0, 617.0, 652.0, "LTE B71 (600)", "LTE"),
    // Wi-Fi, BLE, ISM
    ("WiFi_2G", 2400.0, 2495.0, 2400.0, 2495.0, "Wi-Fi 2.4G Band", "Wi-Fi"),
    ("WiFi_5G", 4900.0, 5900.0, 4900.0, 5900.0, "Wi-Fi 5G Band", "Wi-Fi"),
    ("WiFi_6E", 5900.0, 7125.0, 5900.0, 7125.0, "Wi-Fi 6E Band", "Wi-Fi"),
    ("BLE", 2402.0, 2480.0, 2402.0, 2480.0, "Bluetooth LE (2402-2480)", "BLE"),
    ("UHF433", 433.0, 435.0, 433.0, 435.0, "UHF 433 MHz", "ISM"),
    ("ISM902", 902.0, 928.0, 902.0, 928.0, "ISM 902-928 MHz", "ISM"),
    // Sub-GHz IoT
    ("HaLow_NA", 902.0, 928.0, 902.0, 928.0, "HaLow NA (915)", "HaLow"),
    ("HaLow_EU", 863.0, 868.0, 863.0, 868.0, "HaLow EU (866)", "HaLow"),
    ("HaLow_AUS", 915.0, 928.0, 915.0, 928.0, "HaLow AUS/NZ (920)", "HaLow"),
    ("HaLow_JP", 920.5, 928.1, 920.5, 928.1, "HaLow JP (922.5)", "HaLow"),
    ("HaLow_TW", 920.0, 925.0, 920.0, 925.0, "HaLow TW (922.5)", "HaLow"),
    ("HaLow_KR", 918.0, 923.0, 918.0, 923.0, "HaLow KR (920.5)", "HaLow"),
    ("LoRa_US", 902.0, 928.0, 902.0, 928.0, "LoRaWAN US", "LoRa"),
    ("LoRa_EU", 863.0, 870.0, 863.0, 870.0, "LoRaWAN EU", "LoRa"),
    // GNSS (receive-only)
    ("GNSS_L1", 0.0, 0.0, 1559.0, 1606.0, "GNSS L1/E1", "GNSS"),
    ("GNSS_L2", 0.0, 0.0, 1215.0, 1245.0, "GNSS L2", "GNSS"),
    ("GNSS_L5", 0.0, 0.0, 1164.0, 1189.0, "GNSS L5/E5", "GNSS"),
];

/// Read-only mapping from band code to [`Band`], in catalog order.
#[derive(Debug, Clone, Default)]
pub struct BandRegistry {
    bands: Vec<Band>,
    index: HashMap<String, usize>,
}

impl BandRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry populated with the built-in catalog.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for &(code, tx_low, tx_high, rx_low, rx_high, label, category) in CATALOG {
            registry.insert(Band::new(code, tx_low, tx_high, rx_low, rx_high, label, category));
        }
        registry
    }

    /// Built-in catalog plus user-defined bands.
    pub fn with_custom(specs: &[BandSpec]) -> Self {
        let mut registry = Self::builtin();
        for spec in specs {
            registry.insert(spec.to_band());
        }
        registry
    }

    /// Add a band, replacing any existing band with the same code.
    pub fn insert(&mut self, band: Band) {
        match self.index.get(&band.code) {
            Some(&i) => self.bands[i] = band,
            None => {
                self.index.insert(band.code.clone(), self.bands.len());
                self.bands.push(band);
            }
        }
    }

    pub fn get(&self, code: &str) -> Option<&Band> {
        self.index.get(code).map(|&i| &self.bands[i])
    }

    pub fn contains(&self, code: &str) -> bool {
        self.index.contains_key(code)
    }

    /// Resolve a selection of codes, preserving the caller's order.
    pub fn select<S: AsRef<str>>(&self, codes: &[S]) -> CoexResult<Vec<Band>> {
        codes
            .iter()
            .map(|c| {
                self.get(c.as_ref())
                    .cloned()
                    .ok_or_else(|| CoexError::UnknownBand(c.as_ref().to_string()))
            })
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Band> {
        self.bands.iter()
    }

    pub fn len(&self) -> usize {
        self.bands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }

    /// Distinct categories, sorted.
    pub fn categories(&self) -> Vec<String> {
        let mut cats: Vec<String> = self.bands.iter().map(|b| b.category.clone()).collect();
        cats.sort();
        cats.dedup();
        cats
    }

    pub fn by_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a Band> + 'a {
        self.bands.iter().filter(move |b| b.category == category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::band::{GnssSignal, Technology};

    #[test]
    fn test_builtin_catalog() {
        let reg = BandRegistry::builtin();
        assert_eq!(reg.len(), CATALOG.len());
        let b1 = reg.get("LTE_B1").unwrap();
        assert_eq!(b1.tx_low, 1920.0);
        assert_eq!(b1.rx_high, 2170.0);
        assert!(reg.get("LTE_B99").is_none());
    }

    #[test]
    fn test_gnss_receive_only() {
        let reg = BandRegistry::builtin();
        for code in ["GNSS_L1", "GNSS_L2", "GNSS_L5", "LTE_B29"] {
            assert!(reg.get(code).unwrap().is_receive_only(), "{}", code);
        }
        assert_eq!(
            reg.get("GNSS_L2").unwrap().technology,
            Technology::Gnss(GnssSignal::L2)
        );
    }

    #[test]
    fn test_catalog_well_formed() {
        let reg = BandRegistry::builtin();
        for band in reg.iter() {
            assert!(band.rx_low < band.rx_high, "{}", band.code);
            assert!(band.is_receive_only() || band.tx_low < band.tx_high, "{}", band.code);
        }
    }

    #[test]
    fn test_select_preserves_order() {
        let reg = BandRegistry::builtin();
        let sel = reg.select(&["WiFi_2G", "LTE_B1"]).unwrap();
        assert_eq!(sel[0].code, "WiFi_2G");
        assert_eq!(sel[1].code, "LTE_B1");
    }

    #[test]
    fn test_select_unknown() {
        let reg = BandRegistry::builtin();
        let err = reg.select(&["LTE_B1", "NOPE"]).unwrap_err();
        assert!(matches!(err, CoexError::UnknownBand(ref c) if c == "NOPE"));
    }

    #[test]
    fn test_custom_bands_override() {
        let specs = vec![
            BandSpec {
                code: "LTE_B1".into(),
                label: "Narrow B1".into(),
                category: "LTE".into(),
                tx_low: 1930.0,
                tx_high: 1940.0,
                rx_low: 2120.0,
                rx_high: 2130.0,
            },
            BandSpec {
                code: "PRIV_900".into(),
                label: String::new(),
                category: String::new(),
                tx_low: 0.0,
                tx_high: 0.0,
                rx_low: 900.0,
                rx_high: 901.0,
            },
        ];
        let reg = BandRegistry::with_custom(&specs);
        assert_eq!(reg.len(), CATALOG.len() + 1);
        assert_eq!(reg.get("LTE_B1").unwrap().tx_low, 1930.0);
        let private = reg.get("PRIV_900").unwrap();
        assert_eq!(private.category, "Custom");
        assert_eq!(private.label, "PRIV_900");
        assert!(private.is_receive_only());
    }

    #[test]
    fn test_categories() {
        let reg = BandRegistry::builtin();
        let cats = reg.categories();
        assert!(cats.contains(&"LTE".to_string()));
        assert!(cats.contains(&"GNSS".to_string()));
        assert_eq!(reg.by_category("GNSS").count(), 3);
    }
}
