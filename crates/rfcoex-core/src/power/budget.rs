//! Product power budget
//!
//! Each budget starts from a dBc level at the transmitter and walks it
//! through TX filtering, isolation and RX rejection to the victim input.
//! The final dBc is taken against the fundamental as seen at the victim,
//! then capped at a per-order ceiling so no order is reported stronger
//! than physically plausible.
//!
//! Reference levels come from a 5th-order polynomial two-tone expansion
//! `V₀ = a₁V + a₂V² + a₃V³ + a₄V⁴ + a₅V⁵` with
//! `a₂ = 0.0562, a₃ = 0.01, a₄ = 0.0018, a₅ = 0.001`.

use serde::{Deserialize, Serialize};

use super::linearity::HarmonicLevels;
use super::params::SystemParameters;
use crate::error::{CoexError, CoexResult};
use crate::product::ProductType;

/// Tabulated reference level for one product order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolynomialReference {
    pub reference_dbc: f64,
    pub formula: &'static str,
    pub coefficient: &'static str,
}

const fn reference(reference_dbc: f64, formula: &'static str, coefficient: &'static str) -> PolynomialReference {
    PolynomialReference {
        reference_dbc,
        formula,
        coefficient,
    }
}

pub fn harmonic_reference(order: u32) -> Option<PolynomialReference> {
    match order {
        2 => Some(reference(-32.1, "2H = a₂V²", "a₂ = 0.0562")),
        3 => Some(reference(-60.4, "3H = a₃V³", "a₃ = 0.01")),
        4 => Some(reference(-73.0, "4H = a₄V⁴", "a₄ = 0.0018")),
        5 => Some(reference(-84.0, "5H = a₅V⁵", "a₅ = 0.001")),
        _ => None,
    }
}

pub fn intermod_reference(product_type: ProductType) -> Option<PolynomialReference> {
    match product_type {
        ProductType::IM2 => Some(reference(
            -25.7,
            "a₂V₁V₂ (2nd order beat/sum products)",
            "a₂ = 0.0562",
        )),
        ProductType::IM3 => Some(reference(
            -47.0,
            "a₃(2V₁²V₂ + 2V₁V₂²) + 5th order contributions",
            "a₃ = 0.01 + a₅ contributions",
        )),
        ProductType::IM4 => Some(reference(
            -57.4,
            "a₄(3V₁³V₂ + 3V₁V₂³ + mixed terms)",
            "a₄ = 0.0018",
        )),
        ProductType::IM5 => Some(reference(-63.9, "a₅(3V₁²2V₂² + 3V₂²2V₁²)", "a₅ = 0.001")),
        ProductType::IM7 => Some(reference(
            -70.0,
            "a₇ higher-order polynomial terms (estimated)",
            "a₇ ≈ 0.0001 (estimated)",
        )),
        _ => None,
    }
}

/// Ceiling on the victim-referred harmonic level, dBc.
fn harmonic_ceiling_dbc(order: u32) -> f64 {
    match order {
        2 => -15.0,
        3 => -25.0,
        4 => -35.0,
        5 => -45.0,
        _ => -50.0,
    }
}

/// Ceiling on the victim-referred intermodulation level, dBc.
fn intermod_ceiling_dbc(order: u32) -> f64 {
    match order {
        2 => -10.0,
        3 => -15.0,
        4 => -25.0,
        5 => -30.0,
        7 => -35.0,
        _ => -40.0,
    }
}

/// Extra TX filtering on higher harmonics, dB.
fn harmonic_filter_slope_db(order: u32) -> f64 {
    match order {
        3 => 3.0,
        4 => 6.0,
        5 => 10.0,
        _ => 0.0,
    }
}

/// Fraction of the out-of-band rejection applied to a harmonic.
fn harmonic_rx_fraction(order: u32) -> f64 {
    match order {
        3 => 0.7,
        4 => 0.8,
        5 => 0.9,
        _ => 0.5,
    }
}

/// Level used for products with no polynomial reference.
pub const DEFAULT_PRODUCT_DBC: f64 = -50.0;

/// Result of walking one product through the budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelBudget {
    /// Drive level used for the estimate, dBm
    pub input_power_dbm: f64,
    /// Distortion relative to the carrier at the TX output
    pub source_level_dbc: f64,
    /// Product power at the TX output
    pub at_tx_dbm: f64,
    pub tx_filter_db: f64,
    pub isolation_db: f64,
    pub rx_rejection_db: f64,
    /// Product power at the victim input
    pub at_victim_dbm: f64,
    /// Product relative to the fundamental at the victim
    pub level_dbc: f64,
    pub formula: String,
    pub coefficient: String,
}

/// Budget for harmonic `order` of a transmitter at `tx_power_dbm`.
pub fn harmonic_budget(tx_power_dbm: f64, order: u32, params: &SystemParameters) -> CoexResult<LevelBudget> {
    let reference = harmonic_reference(order)
        .ok_or_else(|| CoexError::UnsupportedProduct(format!("{}H", order)))?;
    let levels = HarmonicLevels::compute(tx_power_dbm, params);
    let source_level_dbc = levels
        .order(order)
        .ok_or_else(|| CoexError::UnsupportedProduct(format!("{}H", order)))?;

    let at_tx_dbm = tx_power_dbm + source_level_dbc;
    let tx_filter_db = params.tx_harmonic_filtering_db + harmonic_filter_slope_db(order);
    let base_isolation = params.base_isolation_db();
    let isolation_db = base_isolation + (20.0 * (order as f64).log10()).min(10.0);
    let rx_rejection_db = params.out_of_band_rejection_db * harmonic_rx_fraction(order);

    let mut at_victim_dbm = at_tx_dbm - tx_filter_db - isolation_db - rx_rejection_db;
    let fundamental_at_victim = tx_power_dbm - base_isolation;
    let mut level_dbc = at_victim_dbm - fundamental_at_victim;

    let ceiling = harmonic_ceiling_dbc(order);
    if level_dbc > ceiling {
        level_dbc = ceiling;
        at_victim_dbm = fundamental_at_victim + level_dbc;
    }

    Ok(LevelBudget {
        input_power_dbm: tx_power_dbm,
        source_level_dbc,
        at_tx_dbm,
        tx_filter_db,
        isolation_db,
        rx_rejection_db,
        at_victim_dbm,
        level_dbc,
        formula: reference.formula.to_string(),
        coefficient: reference.coefficient.to_string(),
    })
}

/// Budget for a two-tone intermodulation product. The stronger tone sets
/// the drive level.
pub fn intermod_budget(
    power1_dbm: f64,
    power2_dbm: f64,
    product_type: ProductType,
    params: &SystemParameters,
) -> CoexResult<LevelBudget> {
    let reference = intermod_reference(product_type)
        .ok_or_else(|| CoexError::UnsupportedProduct(product_type.to_string()))?;
    let order = product_type
        .order()
        .ok_or_else(|| CoexError::UnsupportedProduct(product_type.to_string()))?;

    let input_power_dbm = power1_dbm.max(power2_dbm);
    let levels = HarmonicLevels::compute(input_power_dbm, params);

    // Couple the reference table to the actual linearity through the
    // matching harmonic's offset from its own reference.
    let scaling = match product_type {
        ProductType::IM2 => 0.8 * (levels.hd2_dbc + 32.1),
        ProductType::IM3 => 1.2 * (levels.hd3_dbc + 60.4),
        ProductType::IM4 => 0.9 * (levels.hd4_dbc + 73.0),
        ProductType::IM5 => 0.8 * (levels.hd5_dbc + 84.0),
        _ => 0.0,
    };
    let source_level_dbc = reference.reference_dbc + scaling;
    let at_tx_dbm = input_power_dbm + source_level_dbc;

    let even = order % 2 == 0;
    let tx_filter_db = if even {
        params.tx_harmonic_filtering_db * 0.3
    } else {
        0.0
    };

    let base_isolation = params.base_isolation_db();
    let mut technology_db = 0.0;
    if params.wifi_ble_isolation_db > 0.0 {
        technology_db += params.wifi_ble_isolation_db * 0.4;
    }
    if params.cellular_wifi_isolation_db > 0.0 {
        technology_db += params.cellular_wifi_isolation_db * 0.4;
    }
    let isolation_db = base_isolation + technology_db;

    let mut rx_rejection_db = params.rx_preselector_filtering_db;
    if even || order >= 5 {
        rx_rejection_db += params.out_of_band_rejection_db * 0.3;
    }

    let mut at_victim_dbm = at_tx_dbm - tx_filter_db - isolation_db - rx_rejection_db;
    let fundamental_at_victim = input_power_dbm - base_isolation;
    let mut level_dbc = at_victim_dbm - fundamental_at_victim;

    let ceiling = intermod_ceiling_dbc(order);
    if level_dbc > ceiling {
        level_dbc = ceiling;
        at_victim_dbm = fundamental_at_victim + level_dbc;
    }

    Ok(LevelBudget {
        input_power_dbm,
        source_level_dbc,
        at_tx_dbm,
        tx_filter_db,
        isolation_db,
        rx_rejection_db,
        at_victim_dbm,
        level_dbc,
        formula: reference.formula.to_string(),
        coefficient: reference.coefficient.to_string(),
    })
}

/// Flat estimate for leakage and other products without a reference.
pub fn default_budget(tx_power_dbm: f64, params: &SystemParameters) -> LevelBudget {
    let at_tx_dbm = tx_power_dbm + DEFAULT_PRODUCT_DBC;
    let isolation_db = params.base_isolation_db();
    LevelBudget {
        input_power_dbm: tx_power_dbm,
        source_level_dbc: DEFAULT_PRODUCT_DBC,
        at_tx_dbm,
        tx_filter_db: 0.0,
        isolation_db,
        rx_rejection_db: 0.0,
        at_victim_dbm: at_tx_dbm - isolation_db,
        level_dbc: DEFAULT_PRODUCT_DBC,
        formula: "Default nonlinearity estimate".to_string(),
        coefficient: "mixed".to_string(),
    }
}

/// Budget for any product type.
pub fn product_budget(
    product_type: ProductType,
    tx_power_dbm: f64,
    params: &SystemParameters,
) -> CoexResult<LevelBudget> {
    if product_type.is_harmonic() {
        let order = product_type
            .order()
            .ok_or_else(|| CoexError::UnsupportedProduct(product_type.to_string()))?;
        harmonic_budget(tx_power_dbm, order, params)
    } else if product_type.is_intermod() {
        intermod_budget(tx_power_dbm, tx_power_dbm, product_type, params)
    } else {
        Ok(default_budget(tx_power_dbm, params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_harmonic_budget_stages() {
        let params = SystemParameters::default();
        let b = harmonic_budget(23.0, 3, &params).unwrap();
        // HD3 at 23 dBm, IIP3 -10, AB: -66 - 3
        assert_relative_eq!(b.source_level_dbc, -69.0);
        assert_relative_eq!(b.at_tx_dbm, -46.0);
        assert_relative_eq!(b.tx_filter_db, 43.0);
        assert_relative_eq!(b.isolation_db, 45.0 + 20.0 * 3f64.log10(), epsilon = 1e-9);
        assert_relative_eq!(b.rx_rejection_db, 42.0, epsilon = 1e-9);
        assert!(b.level_dbc <= -25.0);
        assert_relative_eq!(
            b.at_victim_dbm,
            (23.0 - 45.0) + b.level_dbc,
            epsilon = 1e-9
        );
        assert_eq!(b.formula, "3H = a₃V³");
    }

    #[test]
    fn test_harmonic_ceiling() {
        // Negative filtering stands in for a gain stage after the PA.
        let params = SystemParameters {
            antenna_isolation_db: 0.0,
            pcb_isolation_db: 0.0,
            tx_harmonic_filtering_db: -20.0,
            out_of_band_rejection_db: 0.0,
            iip2_dbm: 40.0,
            ..Default::default()
        };
        let b = harmonic_budget(23.0, 2, &params).unwrap();
        assert_relative_eq!(b.level_dbc, -15.0);
        assert_relative_eq!(b.at_victim_dbm, 8.0);
    }

    #[test]
    fn test_isolation_term_capped() {
        let params = SystemParameters::default();
        let b5 = harmonic_budget(23.0, 5, &params).unwrap();
        assert_relative_eq!(b5.isolation_db, 55.0);
    }

    #[test]
    fn test_unsupported_orders() {
        let params = SystemParameters::default();
        assert!(matches!(
            harmonic_budget(23.0, 6, &params),
            Err(CoexError::UnsupportedProduct(_))
        ));
        assert!(intermod_budget(23.0, 23.0, ProductType::ACLR, &params).is_err());
    }

    #[test]
    fn test_intermod_budget() {
        let params = SystemParameters::default();
        let im3 = intermod_budget(23.0, 10.0, ProductType::IM3, &params).unwrap();
        assert_relative_eq!(im3.input_power_dbm, 23.0);
        // HD3 = -69: -47 + 1.2 × (-8.6)
        assert_relative_eq!(im3.source_level_dbc, -47.0 + 1.2 * (-69.0 + 60.4), epsilon = 1e-9);
        assert_relative_eq!(im3.tx_filter_db, 0.0);
        assert_relative_eq!(im3.isolation_db, 45.0 + 4.0 + 6.0, epsilon = 1e-9);
        assert_relative_eq!(im3.rx_rejection_db, 0.0);

        let im2 = intermod_budget(23.0, 23.0, ProductType::IM2, &params).unwrap();
        assert_relative_eq!(im2.tx_filter_db, 12.0, epsilon = 1e-9);
        assert_relative_eq!(im2.rx_rejection_db, 18.0, epsilon = 1e-9);

        let im7 = intermod_budget(23.0, 23.0, ProductType::IM7, &params).unwrap();
        assert_relative_eq!(im7.source_level_dbc, -70.0);
        assert!(im7.level_dbc <= -35.0);
    }

    #[test]
    fn test_default_budget() {
        let params = SystemParameters::default();
        let b = product_budget(ProductType::ACLR, 23.0, &params).unwrap();
        assert_relative_eq!(b.at_tx_dbm, -27.0);
        assert_relative_eq!(b.at_victim_dbm, -72.0);
        assert_eq!(b.coefficient, "mixed");
    }
}
