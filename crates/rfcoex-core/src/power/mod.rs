//! Quantitative power-budget model
//!
//! Turns qualitative hits into absolute levels at the victim receiver:
//!
//! ```text
//!  aggressor TX power ──► linearity (HD2..HD5, IMD table) ──► dBc at TX
//!                                                              │
//!        TX filter ◄── isolation (antenna+PCB+shield+order) ◄──┘
//!            │
//!            └──► RX rejection ──► I at victim ──► desense / margin / SIR
//! ```
//!
//! Parameters come in as an explicit [`SystemParameters`] value, typically
//! built from a [`Preset`] plus configuration overrides.

pub mod budget;
pub mod desense;
pub mod linearity;
pub mod params;
pub mod performance;
pub mod rf;

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::{debug, info, warn};

use crate::band::{Band, Technology};
use crate::error::{CoexError, CoexResult};
use crate::product::{InterferenceProduct, ProductType};
use crate::registry::BandRegistry;

pub use budget::{default_budget, harmonic_budget, intermod_budget, product_budget, LevelBudget};
pub use desense::{analyze_victim, sensitivity_dbm, QuantRisk, ReceiverProfile, VictimAnalysis};
pub use linearity::{hd2_from_iip2, hd3_from_iip3, HarmonicLevels};
pub use params::{PaClass, Preset, SystemOverrides, SystemParameters};
pub use performance::{assess_performance, sort_by_impact, system_performance, PerformanceResult};
pub use rf::{board_coupling, estimate_per, filter_attenuation_db, fspl_db, BoardCoupling, CouplingImpact, Modulation};

/// Fundamental TX power for a transmitting technology, dBm.
pub fn tx_power_dbm(technology: Technology, params: &SystemParameters) -> f64 {
    match technology {
        Technology::Lte => params.lte_tx_power_dbm,
        t if t.is_wifi() => params.wifi_tx_power_dbm,
        Technology::Ble => params.ble_tx_power_dbm,
        Technology::HaLow => params.halow_tx_power_dbm,
        Technology::Ism => 10.0,
        Technology::LoRa => 14.0,
        Technology::Gnss(_) => 0.0,
        _ => 20.0,
    }
}

/// Power budget of one product against one victim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantitativeResult {
    pub frequency_mhz: f64,
    pub product_type: ProductType,
    pub formula: String,
    pub aggressors: Vec<String>,
    pub victim: String,
    pub aggressor_power_dbm: f64,
    pub interference_level_dbc: f64,
    pub interference_at_tx_dbm: f64,
    pub interference_at_victim_dbm: f64,
    pub victim_sensitivity_dbm: f64,
    pub interference_margin_db: f64,
    pub desensitization_db: f64,
    pub risk: QuantRisk,
    pub mathematical_formula: String,
    pub coefficient: String,
    pub noise_floor_dbm: f64,
    pub effective_sensitivity_dbm: f64,
    pub sir_db: f64,
}

impl QuantitativeResult {
    pub fn risk_symbol(&self) -> &'static str {
        self.risk.symbol()
    }
}

pub(crate) fn lookup<'a>(registry: &'a BandRegistry, code: &str) -> CoexResult<&'a Band> {
    registry
        .get(code)
        .ok_or_else(|| CoexError::UnknownBand(code.to_string()))
}

/// Strongest aggressor's TX power, 20 dBm when none are listed.
pub fn aggressor_power_dbm(
    product: &InterferenceProduct,
    registry: &BandRegistry,
    params: &SystemParameters,
) -> CoexResult<f64> {
    let mut power = f64::NEG_INFINITY;
    for code in &product.aggressors {
        let band = lookup(registry, code)?;
        power = power.max(tx_power_dbm(band.technology, params));
    }
    Ok(if power.is_finite() { power } else { 20.0 })
}

/// Budget a single product. Non-hits yield `Ok(None)`.
pub fn quantify(
    product: &InterferenceProduct,
    registry: &BandRegistry,
    params: &SystemParameters,
) -> CoexResult<Option<QuantitativeResult>> {
    let Some(victim_code) = product.victim.as_deref() else {
        return Ok(None);
    };
    if !product.is_hit() || product.frequency_mhz <= 0.0 {
        return Ok(None);
    }
    let victim = lookup(registry, victim_code)?;
    let aggressor_power_dbm = aggressor_power_dbm(product, registry, params)?;

    let budget = product_budget(product.product_type, aggressor_power_dbm, params)?;
    let analysis = analyze_victim(budget.at_victim_dbm, victim.technology, params);

    Ok(Some(QuantitativeResult {
        frequency_mhz: product.frequency_mhz,
        product_type: product.product_type,
        formula: product.formula.clone(),
        aggressors: product.aggressors.clone(),
        victim: victim_code.to_string(),
        aggressor_power_dbm,
        interference_level_dbc: budget.level_dbc,
        interference_at_tx_dbm: budget.at_tx_dbm,
        interference_at_victim_dbm: budget.at_victim_dbm,
        victim_sensitivity_dbm: analysis.sensitivity_dbm,
        interference_margin_db: analysis.margin_db,
        desensitization_db: analysis.desensitization_db,
        risk: analysis.risk,
        mathematical_formula: budget.formula,
        coefficient: budget.coefficient,
        noise_floor_dbm: analysis.noise_floor_dbm,
        effective_sensitivity_dbm: analysis.effective_sensitivity_dbm,
        sir_db: analysis.sir_db,
    }))
}

/// Budget every hit in `products`.
///
/// Products that cannot be budgeted (unknown band, unsupported type) are
/// skipped; they stay in the qualitative list.
pub fn analyze_quantitative(
    products: &[InterferenceProduct],
    registry: &BandRegistry,
    params: &SystemParameters,
) -> Vec<QuantitativeResult> {
    let mut results = Vec::new();
    let mut skipped = 0usize;
    for product in products {
        match quantify(product, registry, params) {
            Ok(Some(result)) => results.push(result),
            Ok(None) => {}
            Err(e) if e.is_recoverable() => {
                skipped += 1;
                debug!(formula = %product.formula, error = %e, "skipping product in power budget");
            }
            Err(e) => {
                skipped += 1;
                warn!(formula = %product.formula, error = %e, "power budget failed");
            }
        }
    }
    info!(
        results = results.len(),
        skipped,
        configuration = %params.configuration_name,
        "quantitative analysis complete"
    );
    results
}

/// Order by risk tier (worst first), then desensitization.
pub fn sort_by_risk(results: &mut [QuantitativeResult]) {
    results.sort_by(|a, b| {
        b.risk
            .cmp(&a.risk)
            .then_with(|| {
                b.desensitization_db
                    .partial_cmp(&a.desensitization_db)
                    .unwrap_or(Ordering::Equal)
            })
    });
}

/// Result counts per tier, worst first.
pub fn risk_counts(results: &[QuantitativeResult]) -> [(QuantRisk, usize); 5] {
    let tiers = [
        QuantRisk::Critical,
        QuantRisk::High,
        QuantRisk::Medium,
        QuantRisk::Low,
        QuantRisk::Negligible,
    ];
    tiers.map(|tier| (tier, results.iter().filter(|r| r.risk == tier).count()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{analyze, AnalysisOptions};
    use crate::product::Severity;

    fn b13_gnss() -> (BandRegistry, Vec<InterferenceProduct>) {
        let registry = BandRegistry::builtin();
        let bands = registry.select(&["LTE_B13", "GNSS_L1"]).unwrap();
        let report = analyze(&bands, &AnalysisOptions::default().with_guard(1.0));
        (registry, report.products)
    }

    #[test]
    fn test_tx_power_lookup() {
        let params = SystemParameters::default();
        assert_eq!(tx_power_dbm(Technology::Lte, &params), params.lte_tx_power_dbm);
        assert_eq!(tx_power_dbm(Technology::WiFi5G, &params), params.wifi_tx_power_dbm);
        assert_eq!(tx_power_dbm(Technology::LoRa, &params), 14.0);
        assert_eq!(tx_power_dbm(Technology::Gsm, &params), 20.0);
    }

    #[test]
    fn test_b13_second_harmonic_hits_gnss() {
        let (registry, products) = b13_gnss();
        let results = analyze_quantitative(&products, &registry, &SystemParameters::default());
        assert!(!results.is_empty());
        let h2 = results
            .iter()
            .find(|r| r.product_type == ProductType::H2 && r.victim == "GNSS_L1")
            .unwrap();
        assert_eq!(h2.aggressors, vec!["LTE_B13".to_string()]);
        assert_eq!(h2.aggressor_power_dbm, SystemParameters::default().lte_tx_power_dbm);
        assert_eq!(h2.victim_sensitivity_dbm, -150.0);
        assert!(h2.interference_at_victim_dbm < h2.interference_at_tx_dbm);
        assert!(h2.desensitization_db <= 15.0);
    }

    #[test]
    fn test_non_hits_are_skipped() {
        let registry = BandRegistry::builtin();
        let miss = InterferenceProduct::new(ProductType::H3, "3×Tx_high(LTE_B13)", 2361.0)
            .with_aggressors(&["LTE_B13"])
            .with_severity(Severity::SAFE);
        assert!(analyze_quantitative(&[miss], &registry, &SystemParameters::default()).is_empty());
    }

    #[test]
    fn test_unknown_band_is_skipped() {
        let registry = BandRegistry::builtin();
        let ghost = InterferenceProduct::new(ProductType::IM3, "2×A - B", 1575.0)
            .with_aggressors(&["NOPE"])
            .with_victim(Some("GNSS_L1"))
            .with_severity(Severity::CRITICAL);
        let err = quantify(&ghost, &registry, &SystemParameters::default()).unwrap_err();
        assert!(err.is_recoverable());
        assert!(analyze_quantitative(&[ghost], &registry, &SystemParameters::default()).is_empty());
    }

    #[test]
    fn test_sort_by_risk() {
        let (registry, products) = b13_gnss();
        let mut results =
            analyze_quantitative(&products, &registry, &SystemParameters::preset(Preset::MobileDevicePoor));
        sort_by_risk(&mut results);
        for w in results.windows(2) {
            assert!(w[0].risk >= w[1].risk);
            if w[0].risk == w[1].risk {
                assert!(w[0].desensitization_db >= w[1].desensitization_db);
            }
        }
        let total: usize = risk_counts(&results).iter().map(|(_, n)| n).sum();
        assert_eq!(total, results.len());
    }
}
