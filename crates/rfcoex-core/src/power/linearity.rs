//! Harmonic distortion from transmit power and intercept points.

use serde::{Deserialize, Serialize};

use super::params::{PaClass, SystemParameters};

pub const HD3_RANGE_DBC: (f64, f64) = (-70.0, -20.0);
pub const HD2_RANGE_DBC: (f64, f64) = (-60.0, -15.0);
pub const HIGHER_ORDER_FLOOR_DBC: f64 = -80.0;

/// HD3 in dBc: `-2·(P - IIP3)` plus PA-class and power-regime corrections,
/// clamped to [`HD3_RANGE_DBC`].
pub fn hd3_from_iip3(tx_power_dbm: f64, iip3_dbm: f64, pa_class: PaClass) -> f64 {
    let delta = tx_power_dbm - iip3_dbm;
    let mut correction = pa_class.hd3_correction_db();
    if delta < 5.0 {
        correction += 5.0;
    } else if delta > 15.0 {
        correction -= 3.0;
    }
    (-2.0 * delta + correction).clamp(HD3_RANGE_DBC.0, HD3_RANGE_DBC.1)
}

/// HD2 in dBc: `-(P - IIP2)` plus bias and symmetry corrections, clamped
/// to [`HD2_RANGE_DBC`].
pub fn hd2_from_iip2(tx_power_dbm: f64, iip2_dbm: f64, bias_optimized: bool) -> f64 {
    let delta = tx_power_dbm - iip2_dbm;
    let bias = if bias_optimized { 3.0 } else { -2.0 };
    let symmetry = if delta < 10.0 {
        3.0
    } else if delta > 20.0 {
        -5.0
    } else {
        0.0
    };
    (-delta + bias + symmetry).clamp(HD2_RANGE_DBC.0, HD2_RANGE_DBC.1)
}

/// HD4 and HD5 as fixed offsets below HD2 and HD3.
pub fn higher_order_harmonics(hd2_dbc: f64, hd3_dbc: f64) -> (f64, f64) {
    (
        (hd2_dbc - 20.0).max(HIGHER_ORDER_FLOOR_DBC),
        (hd3_dbc - 15.0).max(HIGHER_ORDER_FLOOR_DBC),
    )
}

/// Harmonic levels of one transmitter, dBc.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HarmonicLevels {
    pub hd2_dbc: f64,
    pub hd3_dbc: f64,
    pub hd4_dbc: f64,
    pub hd5_dbc: f64,
}

impl HarmonicLevels {
    pub fn compute(tx_power_dbm: f64, params: &SystemParameters) -> Self {
        let hd2_dbc = hd2_from_iip2(tx_power_dbm, params.iip2_dbm, params.bias_point_optimized);
        let hd3_dbc = hd3_from_iip3(tx_power_dbm, params.iip3_dbm, params.pa_class);
        let (hd4_dbc, hd5_dbc) = higher_order_harmonics(hd2_dbc, hd3_dbc);
        Self {
            hd2_dbc,
            hd3_dbc,
            hd4_dbc,
            hd5_dbc,
        }
    }

    /// Level of harmonic `order` (2..=5).
    pub fn order(&self, order: u32) -> Option<f64> {
        match order {
            2 => Some(self.hd2_dbc),
            3 => Some(self.hd3_dbc),
            4 => Some(self.hd4_dbc),
            5 => Some(self.hd5_dbc),
            _ => None,
        }
    }
}
