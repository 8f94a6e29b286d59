//! Qualitative severity assessment
//!
//! Maps a hit (frequency, victim, aggressors, product type) onto a 1..=5
//! [`Severity`]. The rules run in a fixed order and later rules may
//! override earlier ones:
//!
//! 1. baseline 1
//! 2. victim criticality by technology tag
//! 3. first matching critical spectrum window (GNSS windows force 5)
//! 4. product-type modifier (2H/3H/IM2 up, IM4/IM5/IM7 down)
//! 5. multiple aggressors +1
//! 6. public-safety aggressor +1
//! 7. BLE victim with a Wi-Fi aggressor inside 2400-2500 MHz forces 5

use crate::band::{Band, Technology};
use crate::product::{ProductType, Severity};

/// Named spectrum window whose occupancy raises severity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CriticalWindow {
    pub name: &'static str,
    pub low_mhz: f64,
    pub high_mhz: f64,
    pub severity: u8,
    pub gnss: bool,
}

impl CriticalWindow {
    const fn new(name: &'static str, low_mhz: f64, high_mhz: f64, severity: u8, gnss: bool) -> Self {
        Self {
            name,
            low_mhz,
            high_mhz,
            severity,
            gnss,
        }
    }

    pub fn contains(&self, freq: f64) -> bool {
        self.low_mhz <= freq && freq <= self.high_mhz
    }
}

/// Checked in order; only the first match applies.
pub const CRITICAL_WINDOWS: &[CriticalWindow] = &[
    CriticalWindow::new("GNSS_L1", 1575.0, 1576.0, 5, true),
    CriticalWindow::new("GNSS_L2", 1227.0, 1228.0, 5, true),
    CriticalWindow::new("GNSS_L5", 1176.0, 1177.0, 4, true),
    CriticalWindow::new("ISM_24", 2400.0, 2500.0, 4, false),
    CriticalWindow::new("ISM_58", 5725.0, 5875.0, 3, false),
    CriticalWindow::new("FirstNet", 758.0, 768.0, 5, false),
    CriticalWindow::new("PublicSafety", 763.0, 775.0, 5, false),
    CriticalWindow::new("Cellular_UL", 824.0, 894.0, 4, false),
    CriticalWindow::new("WiFi_24", 2400.0, 2495.0, 4, false),
    CriticalWindow::new("WiFi_5", 5150.0, 5925.0, 3, false),
    CriticalWindow::new("BLE", 2402.0, 2480.0, 4, false),
];

/// BLE/Wi-Fi coexistence window.
const ISM_24_LOW: f64 = 2400.0;
const ISM_24_HIGH: f64 = 2500.0;

/// Base severity contributed by the victim's technology, if any.
pub fn victim_criticality(victim: &Band) -> Option<u8> {
    if victim.public_safety {
        return Some(5);
    }
    match victim.technology {
        Technology::Gnss(_) => Some(5),
        Technology::Ble | Technology::WiFi2G => Some(4),
        Technology::WiFi5G | Technology::HaLow => Some(3),
        _ => None,
    }
}

/// First critical window containing `freq`.
pub fn critical_window(freq: f64) -> Option<&'static CriticalWindow> {
    CRITICAL_WINDOWS.iter().find(|w| w.contains(freq))
}

/// Severity of a confirmed hit.
pub fn assess(freq: f64, victim: &Band, aggressors: &[&Band], product_type: ProductType) -> Severity {
    let mut severity: u8 = 1;

    if let Some(crit) = victim_criticality(victim) {
        severity = severity.max(crit);
    }

    if let Some(window) = critical_window(freq) {
        severity = severity.max(window.severity);
        if window.gnss {
            severity = 5;
        }
    }

    match product_type {
        ProductType::H2 | ProductType::H3 | ProductType::IM2 => {
            severity = (severity + 1).min(5);
        }
        ProductType::IM4 | ProductType::IM5 | ProductType::IM7 => {
            severity = severity.saturating_sub(1).max(1);
        }
        _ => {}
    }

    if aggressors.len() > 1 {
        severity = (severity + 1).min(5);
    }

    if aggressors.iter().any(|a| a.public_safety) {
        severity = (severity + 1).min(5);
    }

    if victim.technology == Technology::Ble
        && aggressors.iter().any(|a| a.technology.is_wifi())
        && (ISM_24_LOW..=ISM_24_HIGH).contains(&freq)
    {
        severity = 5;
    }

    Severity::new(severity)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn band(code: &str, tx: (f64, f64), rx: (f64, f64)) -> Band {
        Band::new(code, tx.0, tx.1, rx.0, rx.1, code, "test")
    }

    #[test]
    fn test_baseline() {
        let victim = band("LTE_B7", (2500.0, 2570.0), (2620.0, 2690.0));
        let aggr = band("LTE_B3", (1710.0, 1785.0), (1805.0, 1880.0));
        let s = assess(2650.0, &victim, &[&aggr], ProductType::IM3);
        assert_eq!(s, Severity::VERY_LOW);
    }

    #[test]
    fn test_gnss_window_forces_critical() {
        let victim = band("GNSS_L5", (0.0, 0.0), (1164.0, 1189.0));
        let aggr = band("LTE_B3", (1710.0, 1785.0), (1805.0, 1880.0));
        let s = assess(1176.5, &victim, &[&aggr], ProductType::IM7);
        assert_eq!(s, Severity::CRITICAL);
    }

    #[test]
    fn test_type_modifier_floor() {
        let victim = band("LTE_B7", (2500.0, 2570.0), (2620.0, 2690.0));
        let aggr = band("LTE_B3", (1710.0, 1785.0), (1805.0, 1880.0));
        let s = assess(2650.0, &victim, &[&aggr], ProductType::IM5);
        assert_eq!(s, Severity::VERY_LOW);
        let s = assess(2650.0, &victim, &[&aggr], ProductType::H2);
        assert_eq!(s, Severity::LOW);
    }

    #[test]
    fn test_multiple_and_public_safety_aggressors() {
        let victim = band("LTE_B7", (2500.0, 2570.0), (2620.0, 2690.0));
        let a = band("LTE_B13", (777.0, 787.0), (746.0, 756.0));
        let b = band("LTE_B3", (1710.0, 1785.0), (1805.0, 1880.0));
        // 1 + multi + public safety
        let s = assess(2650.0, &victim, &[&a, &b], ProductType::IM3);
        assert_eq!(s, Severity::MEDIUM);
    }

    #[test]
    fn test_ble_wifi_coexistence() {
        let ble = band("BLE", (2402.0, 2480.0), (2402.0, 2480.0));
        let wifi = band("WiFi_2G", (2400.0, 2495.0), (2400.0, 2495.0));
        let s = assess(2440.0, &ble, &[&wifi], ProductType::IM5);
        assert_eq!(s, Severity::CRITICAL);
    }

    #[test]
    fn test_lte_b1_is_not_public_safety() {
        let victim = band("LTE_B7", (2500.0, 2570.0), (2620.0, 2690.0));
        let b1 = band("LTE_B1", (1920.0, 1980.0), (2110.0, 2170.0));
        let b13 = band("LTE_B13", (777.0, 787.0), (746.0, 756.0));
        let s1 = assess(2650.0, &victim, &[&b1], ProductType::IM3);
        let s13 = assess(2650.0, &victim, &[&b13], ProductType::IM3);
        assert!(s13 > s1);
    }

    #[test]
    fn test_first_window_wins() {
        // 2450 sits in ISM_24, WiFi_24 and BLE; ISM_24 is listed first
        assert_eq!(critical_window(2450.0).unwrap().name, "ISM_24");
        assert_eq!(critical_window(765.0).unwrap().name, "FirstNet");
        assert!(critical_window(3000.0).is_none());
    }
}
