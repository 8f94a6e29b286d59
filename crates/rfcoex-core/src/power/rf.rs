//! Closed-form RF helpers: path loss, filter roll-off, legacy IMD power
//! formulas, packet error estimates and on-board coupling.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::params::SystemParameters;
use crate::band::Technology;

/// Default filter stopband depth, dB.
pub const DEFAULT_STOPBAND_DB: f64 = 40.0;

/// Antenna spacing assumed for on-board coupling, metres.
pub const BOARD_DISTANCE_M: f64 = 0.05;

/// Free-space path loss in dB for a frequency in MHz and a distance in
/// metres.
///
/// FSPL = 20*log10(d_m) + 20*log10(f_MHz) - 27.55, and 0 for
/// non-positive inputs.
pub fn fspl_db(freq_mhz: f64, distance_m: f64) -> f64 {
    if freq_mhz <= 0.0 || distance_m <= 0.0 {
        return 0.0;
    }
    20.0 * distance_m.log10() + 20.0 * freq_mhz.log10() + FSPL_CONSTANT_M_MHZ
}

/// 20*log10(4π/c) for metres and MHz.
const FSPL_CONSTANT_M_MHZ: f64 = -27.55;

/// Attenuation of a band-pass filter at `freq_mhz`, ramping linearly from
/// the passband edge to `stopband_db` one bandwidth away.
pub fn filter_attenuation_db(freq_mhz: f64, center_mhz: f64, bandwidth_mhz: f64, stopband_db: f64) -> f64 {
    let edge_offset = (freq_mhz - center_mhz).abs() - bandwidth_mhz / 2.0;
    if edge_offset <= 0.0 {
        0.0
    } else if edge_offset < bandwidth_mhz {
        edge_offset / bandwidth_mhz * stopband_db
    } else {
        stopband_db
    }
}

/// Two-tone IM3 power from the input intercept: `2·P - IIP3`.
pub fn im3_power_dbm(tone_power_dbm: f64, iip3_dbm: f64) -> f64 {
    2.0 * tone_power_dbm - iip3_dbm
}

/// Two-tone IM5 power: `3·P - IIP5`.
pub fn im5_power_dbm(tone_power_dbm: f64, iip5_dbm: f64) -> f64 {
    3.0 * tone_power_dbm - iip5_dbm
}

/// PER curve family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Modulation {
    /// BLE, 802.15.4
    Oqpsk,
    /// High-rate Wi-Fi
    Qam64,
    Other,
}

impl Modulation {
    /// Curve used for a victim receiver of `technology`.
    pub fn for_technology(technology: Technology) -> Self {
        match technology {
            Technology::Ble => Modulation::Oqpsk,
            t if t.is_wifi() => Modulation::Qam64,
            _ => Modulation::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Modulation::Oqpsk => "OQPSK",
            Modulation::Qam64 => "64QAM",
            Modulation::Other => "other",
        }
    }
}

/// Coarse packet error rate for a given SNR.
pub fn estimate_per(snr_db: f64, modulation: Modulation) -> f64 {
    match modulation {
        Modulation::Oqpsk => stepped(snr_db, 4.0, 8.0, 0.5, 0.1),
        Modulation::Qam64 => stepped(snr_db, 15.0, 20.0, 0.5, 0.1),
        Modulation::Other => stepped(snr_db, 6.0, 12.0, 0.3, 0.05),
    }
}

/// Impact class of an on-board coupling estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CouplingImpact {
    Low,
    Medium,
    High,
    Critical,
}

impl CouplingImpact {
    pub fn symbol(&self) -> &'static str {
        match self {
            CouplingImpact::Critical => "🔴",
            CouplingImpact::High => "🟠",
            CouplingImpact::Medium => "🟡",
            CouplingImpact::Low => "🔵",
        }
    }
}

impl fmt::Display for CouplingImpact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CouplingImpact::Critical => "Critical",
            CouplingImpact::High => "High",
            CouplingImpact::Medium => "Medium",
            CouplingImpact::Low => "Low",
        };
        f.write_str(s)
    }
}

/// Interference estimate for two antennas on the same board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardCoupling {
    pub path_loss_db: f64,
    pub total_isolation_db: f64,
    pub interference_dbm: f64,
    pub margin_db: f64,
    pub impact: CouplingImpact,
}

/// Couple `tx_power_dbm` at `freq_mhz` into a receiver with
/// `sensitivity_dbm` through antenna isolation plus board-distance path
/// loss.
pub fn board_coupling(
    tx_power_dbm: f64,
    freq_mhz: f64,
    sensitivity_dbm: f64,
    params: &SystemParameters,
) -> BoardCoupling {
    let path_loss_db = fspl_db(freq_mhz, BOARD_DISTANCE_M);
    let total_isolation_db = params.antenna_isolation_db + path_loss_db;
    let interference_dbm = tx_power_dbm - total_isolation_db;
    let margin_db = sensitivity_dbm - interference_dbm;
    let impact = if margin_db < 6.0 {
        CouplingImpact::Critical
    } else if margin_db < 12.0 {
        CouplingImpact::High
    } else if margin_db < 20.0 {
        CouplingImpact::Medium
    } else {
        CouplingImpact::Low
    };
    BoardCoupling {
        path_loss_db,
        total_isolation_db,
        interference_dbm,
        margin_db,
        impact,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_fspl() {
        // 1 m at 1000 MHz: 0 + 60 - 27.55
        assert_relative_eq!(fspl_db(1000.0, 1.0), 32.45, epsilon = 1e-9);
        assert_relative_eq!(fspl_db(2400.0, 1.0), 40.05, epsilon = 0.01);
        // 1 km at 1 GHz
        assert_relative_eq!(fspl_db(1000.0, 1000.0), 92.45, epsilon = 1e-9);
        assert_eq!(fspl_db(0.0, 1.0), 0.0);
        assert_eq!(fspl_db(1000.0, -1.0), 0.0);
    }

    #[test]
    fn test_filter_attenuation() {
        assert_eq!(filter_attenuation_db(1000.0, 1000.0, 20.0, 40.0), 0.0);
        assert_eq!(filter_attenuation_db(1010.0, 1000.0, 20.0, 40.0), 0.0);
        assert_relative_eq!(filter_attenuation_db(1020.0, 1000.0, 20.0, 40.0), 20.0);
        assert_eq!(filter_attenuation_db(1100.0, 1000.0, 20.0, DEFAULT_STOPBAND_DB), 40.0);
    }

    #[test]
    fn test_imd_formulas() {
        assert_relative_eq!(im3_power_dbm(0.0, 10.0), -10.0);
        assert_relative_eq!(im5_power_dbm(-10.0, 5.0), -35.0);
    }

    #[test]
    fn test_modulation_by_technology() {
        assert_eq!(Modulation::for_technology(Technology::Ble), Modulation::Oqpsk);
        assert_eq!(Modulation::for_technology(Technology::WiFi5G), Modulation::Qam64);
        assert_eq!(Modulation::for_technology(Technology::Lte), Modulation::Other);
    }

    #[test]
    fn test_per_steps() {
        assert_eq!(estimate_per(2.0, Modulation::Oqpsk), 0.5);
        assert_eq!(estimate_per(6.0, Modulation::Oqpsk), 0.1);
        assert_eq!(estimate_per(10.0, Modulation::Qam64), 0.5);
        assert_eq!(estimate_per(16.0, Modulation::Qam64), 0.1);
        assert_eq!(estimate_per(20.0, Modulation::Qam64), 0.01);
        assert_eq!(estimate_per(3.0, Modulation::Other), 0.3);
        assert_eq!(estimate_per(8.0, Modulation::Other), 0.05);
    }

    #[test]
    fn test_board_coupling_impact() {
        let params = SystemParameters::default();
        let strong = board_coupling(23.0, 1575.0, -150.0, &params);
        assert_eq!(strong.impact, CouplingImpact::Critical);
        assert!(strong.path_loss_db > 0.0);
        // 5 cm at 1575 MHz is about 10.4 dB
        assert_relative_eq!(strong.path_loss_db, 10.38, epsilon = 0.01);
        let weak = board_coupling(-80.0, 2440.0, -70.0, &params);
        assert_eq!(weak.impact, CouplingImpact::Low);
        assert_relative_eq!(weak.margin_db, -70.0 - weak.interference_dbm);
    }
}
