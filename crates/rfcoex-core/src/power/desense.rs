//! Receiver desensitization
//!
//! `desense = 10·log10(1 + I/N)` once interference clears the noise floor,
//! cross-checked against a scaled overshoot of the nominal sensitivity and
//! capped per technology.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::params::SystemParameters;
use crate::band::Technology;

/// Sentinel SIR when no interference is present.
pub const NO_INTERFERENCE_SIR_DB: f64 = 999.0;

/// Assumed receiver channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReceiverProfile {
    pub bandwidth_hz: f64,
    pub noise_figure_db: f64,
    pub required_cnr_db: f64,
}

impl ReceiverProfile {
    pub fn for_technology(technology: Technology, params: &SystemParameters) -> Self {
        let nf = params.noise_figure_db;
        let (bandwidth_hz, noise_figure_db, required_cnr_db) = match technology {
            Technology::Gnss(_) => (2e6, 2.0, 15.0),
            Technology::Lte => (10e6, nf, 10.0),
            t if t.is_wifi() => (20e6, nf, 12.0),
            Technology::Ble => (1e6, nf, 8.0),
            _ => (5e6, nf, 10.0),
        };
        Self {
            bandwidth_hz,
            noise_figure_db,
            required_cnr_db,
        }
    }

    /// Thermal noise over the channel plus noise figure, dBm.
    pub fn noise_floor_dbm(&self, density_dbm_hz: f64) -> f64 {
        density_dbm_hz + 10.0 * self.bandwidth_hz.log10() + self.noise_figure_db
    }
}

/// Victim sensitivity by technology, dBm.
pub fn sensitivity_dbm(technology: Technology, params: &SystemParameters) -> f64 {
    match technology {
        Technology::Gnss(_) => params.gnss_sensitivity_dbm,
        Technology::Lte => params.lte_sensitivity_dbm,
        t if t.is_wifi() => params.wifi_sensitivity_dbm,
        Technology::Ble => params.ble_sensitivity_dbm,
        Technology::HaLow => params.halow_sensitivity_dbm,
        _ => -100.0,
    }
}

/// Quantitative risk tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum QuantRisk {
    Negligible,
    Low,
    Medium,
    High,
    Critical,
}

impl QuantRisk {
    /// Tier for a desense value; GNSS uses tighter breakpoints.
    pub fn from_desense(desense_db: f64, technology: Technology) -> Self {
        let (critical, high, medium, low) = if technology.is_gnss() {
            (8.0, 3.0, 1.0, 0.5)
        } else {
            (12.0, 6.0, 3.0, 1.0)
        };
        if desense_db >= critical {
            QuantRisk::Critical
        } else if desense_db >= high {
            QuantRisk::High
        } else if desense_db >= medium {
            QuantRisk::Medium
        } else if desense_db >= low {
            QuantRisk::Low
        } else {
            QuantRisk::Negligible
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            QuantRisk::Critical => "Critical",
            QuantRisk::High => "High",
            QuantRisk::Medium => "Medium",
            QuantRisk::Low => "Low",
            QuantRisk::Negligible => "Negligible",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            QuantRisk::Critical => "🔴",
            QuantRisk::High => "🟠",
            QuantRisk::Medium => "🟡",
            QuantRisk::Low => "🔵",
            QuantRisk::Negligible => "✅",
        }
    }
}

impl fmt::Display for QuantRisk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.symbol(), self.label())
    }
}

/// Interference impact at one receiver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VictimAnalysis {
    pub interference_dbm: f64,
    pub sensitivity_dbm: f64,
    /// Positive is safe
    pub margin_db: f64,
    pub desensitization_db: f64,
    pub effective_sensitivity_dbm: f64,
    pub noise_floor_dbm: f64,
    pub sir_db: f64,
    pub rx_bandwidth_hz: f64,
    pub required_cnr_db: f64,
    pub risk: QuantRisk,
}

/// Desensitization in dB for interference `i_dbm` against a receiver with
/// the given noise floor and sensitivity.
pub fn desensitization_db(i_dbm: f64, noise_floor_dbm: f64, sensitivity_dbm: f64, gnss: bool) -> f64 {
    if i_dbm <= noise_floor_dbm {
        return 0.0;
    }
    let i_over_n = 10f64.powf((i_dbm - noise_floor_dbm) / 10.0);
    let mut desense = 10.0 * (1.0 + i_over_n).log10();
    if i_dbm > sensitivity_dbm {
        let scale = if gnss { 0.6 } else { 0.4 };
        desense = desense.max((i_dbm - sensitivity_dbm) * scale);
    }
    let cap = if gnss { 15.0 } else { 30.0 };
    desense.min(cap)
}

/// Analyse interference already referred to the victim input.
pub fn analyze_victim(interference_dbm: f64, technology: Technology, params: &SystemParameters) -> VictimAnalysis {
    let sensitivity = sensitivity_dbm(technology, params);
    let profile = ReceiverProfile::for_technology(technology, params);
    let noise_floor = profile.noise_floor_dbm(params.thermal_noise_density_dbm_hz);
    let desense = desensitization_db(interference_dbm, noise_floor, sensitivity, technology.is_gnss());
    let sir_db = if interference_dbm > -200.0 {
        (sensitivity + 3.0) - interference_dbm
    } else {
        NO_INTERFERENCE_SIR_DB
    };

    VictimAnalysis {
        interference_dbm,
        sensitivity_dbm: sensitivity,
        margin_db: sensitivity - interference_dbm,
        desensitization_db: desense,
        effective_sensitivity_dbm: sensitivity + desense,
        noise_floor_dbm: noise_floor,
        sir_db,
        rx_bandwidth_hz: profile.bandwidth_hz,
        required_cnr_db: profile.required_cnr_db,
        risk: QuantRisk::from_desense(desense, technology),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::band::GnssSignal;
    use approx::assert_relative_eq;

    const L1: Technology = Technology::Gnss(GnssSignal::L1);

    #[test]
    fn test_noise_floor() {
        let params = SystemParameters::default();
        let gnss = ReceiverProfile::for_technology(L1, &params);
        // -174 + 63.01 + 2
        assert_relative_eq!(gnss.noise_floor_dbm(-174.0), -108.99, epsilon = 0.01);
        let lte = ReceiverProfile::for_technology(Technology::Lte, &params);
        assert_relative_eq!(lte.noise_floor_dbm(-174.0), -98.0, epsilon = 1e-9);
        let other = ReceiverProfile::for_technology(Technology::Gsm, &params);
        assert_eq!(other.bandwidth_hz, 5e6);
    }

    #[test]
    fn test_below_noise_floor() {
        assert_eq!(desensitization_db(-120.0, -100.0, -105.0, false), 0.0);
    }

    #[test]
    fn test_equal_power_gives_3db() {
        let d = desensitization_db(-100.0, -100.0 - 1e-9, -90.0, false);
        assert_relative_eq!(d, 3.0103, epsilon = 1e-3);
    }

    #[test]
    fn test_overshoot_and_caps() {
        // far above sensitivity: capped
        assert_eq!(desensitization_db(0.0, -100.0, -150.0, true), 15.0);
        assert_eq!(desensitization_db(0.0, -100.0, -105.0, false), 30.0);
    }

    #[test]
    fn test_gnss_thresholds_are_stricter() {
        assert_eq!(QuantRisk::from_desense(8.0, L1), QuantRisk::Critical);
        assert_eq!(QuantRisk::from_desense(8.0, Technology::Lte), QuantRisk::High);
        assert_eq!(QuantRisk::from_desense(0.7, L1), QuantRisk::Low);
        assert_eq!(QuantRisk::from_desense(0.7, Technology::Lte), QuantRisk::Negligible);
        assert!(QuantRisk::Critical > QuantRisk::High);
    }

    #[test]
    fn test_analyze_victim() {
        let params = SystemParameters::default();
        let v = analyze_victim(-90.0, L1, &params);
        assert_eq!(v.sensitivity_dbm, -150.0);
        assert_relative_eq!(v.margin_db, -60.0);
        assert_eq!(v.desensitization_db, 15.0);
        assert_eq!(v.risk, QuantRisk::Critical);
        assert_relative_eq!(v.sir_db, -57.0);
        assert_relative_eq!(v.effective_sensitivity_dbm, -135.0);

        let quiet = analyze_victim(-250.0, Technology::Ble, &params);
        assert_eq!(quiet.desensitization_db, 0.0);
        assert_eq!(quiet.sir_db, NO_INTERFERENCE_SIR_DB);
        assert_eq!(quiet.risk, QuantRisk::Negligible);
    }

    #[test]
    fn test_sensitivity_lookup() {
        let params = SystemParameters::default();
        assert_eq!(sensitivity_dbm(Technology::WiFi5G, &params), -85.0);
        assert_eq!(sensitivity_dbm(Technology::HaLow, &params), -90.0);
        assert_eq!(sensitivity_dbm(Technology::LoRa, &params), -100.0);
    }
}
