//! Board-level performance estimate per hit
//!
//! A coarser view than the power budget: the aggressor's full TX power
//! couples across the board, the victim's preselector removes what falls
//! outside its receive window, and the remaining margin is read as SNR
//! for a packet error estimate.
//!
//! ```text
//!  TX power ──► preselector roll-off ──► antenna isolation + 5 cm FSPL
//!                                                   │
//!              PER(margin) ◄── margin vs sensitivity ◄┘
//! ```

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::{debug, info, warn};

use super::desense::sensitivity_dbm;
use super::params::SystemParameters;
use super::rf::{
    board_coupling, estimate_per, filter_attenuation_db, im3_power_dbm, im5_power_dbm, CouplingImpact,
    Modulation, DEFAULT_STOPBAND_DB,
};
use super::{aggressor_power_dbm, lookup};
use crate::error::CoexResult;
use crate::product::{InterferenceProduct, ProductType};
use crate::registry::BandRegistry;

/// IIP5 sits this far above IIP3 for a typical front end, dB.
pub const IIP5_OFFSET_DB: f64 = 12.0;

/// Performance estimate of one product against one victim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceResult {
    pub frequency_mhz: f64,
    pub product_type: ProductType,
    pub formula: String,
    pub aggressors: Vec<String>,
    pub victim: String,
    pub aggressor_power_dbm: f64,
    pub victim_sensitivity_dbm: f64,
    /// Victim preselector roll-off at the product frequency
    pub filter_attenuation_db: f64,
    pub path_loss_db: f64,
    pub total_isolation_db: f64,
    pub interference_at_victim_dbm: f64,
    pub margin_db: f64,
    pub impact: CouplingImpact,
    /// Two-tone intercept estimate, IM3 and IM5 only
    pub imd_power_dbm: Option<f64>,
    pub modulation: Modulation,
    pub per_estimate: f64,
}

impl PerformanceResult {
    pub fn risk_symbol(&self) -> &'static str {
        self.impact.symbol()
    }
}

fn imd_power(product_type: ProductType, tone_power_dbm: f64, params: &SystemParameters) -> Option<f64> {
    match product_type {
        ProductType::IM3 => Some(im3_power_dbm(tone_power_dbm, params.iip3_dbm)),
        ProductType::IM5 => Some(im5_power_dbm(tone_power_dbm, params.iip3_dbm + IIP5_OFFSET_DB)),
        _ => None,
    }
}

/// Estimate a single product. Non-hits yield `Ok(None)`.
pub fn assess_performance(
    product: &InterferenceProduct,
    registry: &BandRegistry,
    params: &SystemParameters,
) -> CoexResult<Option<PerformanceResult>> {
    let Some(victim_code) = product.victim.as_deref() else {
        return Ok(None);
    };
    if !product.is_hit() || product.frequency_mhz <= 0.0 {
        return Ok(None);
    }
    let victim = lookup(registry, victim_code)?;
    let tx_power = aggressor_power_dbm(product, registry, params)?;
    let sensitivity = sensitivity_dbm(victim.technology, params);

    let rx = victim.rx_window();
    let filter_db = filter_attenuation_db(product.frequency_mhz, rx.center(), rx.width(), DEFAULT_STOPBAND_DB);
    let coupling = board_coupling(tx_power - filter_db, product.frequency_mhz, sensitivity, params);

    let modulation = Modulation::for_technology(victim.technology);
    Ok(Some(PerformanceResult {
        frequency_mhz: product.frequency_mhz,
        product_type: product.product_type,
        formula: product.formula.clone(),
        aggressors: product.aggressors.clone(),
        victim: victim_code.to_string(),
        aggressor_power_dbm: tx_power,
        victim_sensitivity_dbm: sensitivity,
        filter_attenuation_db: filter_db,
        path_loss_db: coupling.path_loss_db,
        total_isolation_db: coupling.total_isolation_db,
        interference_at_victim_dbm: coupling.interference_dbm,
        margin_db: coupling.margin_db,
        impact: coupling.impact,
        imd_power_dbm: imd_power(product.product_type, tx_power, params),
        modulation,
        per_estimate: estimate_per(coupling.margin_db, modulation),
    }))
}

/// Estimate every hit in `products`, skipping the ones that reference
/// bands outside `registry`.
pub fn system_performance(
    products: &[InterferenceProduct],
    registry: &BandRegistry,
    params: &SystemParameters,
) -> Vec<PerformanceResult> {
    let mut results = Vec::new();
    let mut skipped = 0usize;
    for product in products {
        match assess_performance(product, registry, params) {
            Ok(Some(result)) => results.push(result),
            Ok(None) => {}
            Err(e) if e.is_recoverable() => {
                skipped += 1;
                debug!(formula = %product.formula, error = %e, "skipping product in performance estimate");
            }
            Err(e) => {
                skipped += 1;
                warn!(formula = %product.formula, error = %e, "performance estimate failed");
            }
        }
    }
    info!(
        results = results.len(),
        skipped,
        configuration = %params.configuration_name,
        "performance estimate complete"
    );
    results
}

/// Worst impact first, then smallest margin.
pub fn sort_by_impact(results: &mut [PerformanceResult]) {
    results.sort_by(|a, b| {
        b.impact
            .cmp(&a.impact)
            .then_with(|| a.margin_db.partial_cmp(&b.margin_db).unwrap_or(Ordering::Equal))
    });
}
