//! Two-band quick evaluator
//!
//! A compact view of one transmitter against one receiver: harmonic ranges,
//! IM2 sum/difference, the canonical edge combinations for IM3/IM4/IM5/IM7
//! and ACLR, each with a hit flag and a proximity level. Unlike
//! [`crate::analysis::analyze`] there is no deduplication or severity.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::aclr::aclr_risk;
use crate::analysis::AnalysisOptions;
use crate::band::{Band, FreqRange};
use crate::harmonic::HARMONIC_ORDERS;
use crate::product::ProductType;

/// Distance-based risk level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ProximityRisk {
    High,
    Med,
    Low,
    Minimal,
}

impl fmt::Display for ProximityRisk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProximityRisk::High => "High",
            ProximityRisk::Med => "Med",
            ProximityRisk::Low => "Low",
            ProximityRisk::Minimal => "Minimal",
        };
        f.write_str(s)
    }
}

/// Proximity of `[freq_low, freq_high]` to a (guarded) receive window.
pub fn proximity_risk(freq_low: f64, freq_high: f64, rx: &FreqRange) -> ProximityRisk {
    if rx.contains(freq_low) || rx.contains(freq_high) {
        return ProximityRisk::High;
    }
    let min_distance = [
        (freq_low - rx.low).abs(),
        (freq_low - rx.high).abs(),
        (freq_high - rx.low).abs(),
        (freq_high - rx.high).abs(),
    ]
    .into_iter()
    .fold(f64::INFINITY, f64::min);

    if min_distance < 1.0 {
        ProximityRisk::High
    } else if min_distance < 5.0 {
        ProximityRisk::Med
    } else if min_distance < 20.0 {
        ProximityRisk::Low
    } else {
        ProximityRisk::Minimal
    }
}

/// Any overlap between a product range and the receive window.
fn range_hits(freq_low: f64, freq_high: f64, rx: &FreqRange) -> bool {
    rx.contains(freq_low)
        || rx.contains(freq_high)
        || (freq_low <= rx.low && freq_high >= rx.high)
}

/// One row of a pair evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairRow {
    #[serde(rename = "type")]
    pub product_type: ProductType,
    pub formula: String,
    pub freq_low: f64,
    pub freq_high: f64,
    pub hit: bool,
    pub risk: ProximityRisk,
}

impl PairRow {
    fn discrete(product_type: ProductType, formula: impl Into<String>, freq: f64, rx: &FreqRange) -> Self {
        Self {
            product_type,
            formula: formula.into(),
            freq_low: freq,
            freq_high: freq,
            hit: rx.contains(freq),
            risk: proximity_risk(freq, freq, rx),
        }
    }
}

// (X coefficient, Y coefficient, X edge is high, Y edge is high, template)
type Combo = (f64, f64, bool, bool, &'static str);

const IM3_COMBOS: &[Combo] = &[
    (2.0, -1.0, false, true, "2·X_low − Y_high"),
    (2.0, -1.0, true, false, "2·X_high − Y_low"),
    (-1.0, 2.0, true, false, "2·Y_low − X_high"),
    (-1.0, 2.0, false, true, "2·Y_high − X_low"),
];
const IM4_COMBOS: &[Combo] = &[
    (2.0, 2.0, false, true, "2·X_low + 2·Y_high"),
    (2.0, 2.0, true, false, "2·X_high + 2·Y_low"),
    (2.0, 2.0, true, false, "2·Y_low + 2·X_high"),
    (2.0, 2.0, false, true, "2·Y_high + 2·X_low"),
];
const IM5_COMBOS: &[Combo] = &[
    (3.0, -2.0, false, true, "3·X_low − 2·Y_high"),
    (3.0, -2.0, true, false, "3·X_high − 2·Y_low"),
    (-2.0, 3.0, true, false, "3·Y_low − 2·X_high"),
    (-2.0, 3.0, false, true, "3·Y_high − 2·X_low"),
];
const IM7_COMBOS: &[Combo] = &[
    (4.0, -3.0, false, true, "4·X_low − 3·Y_high"),
    (4.0, -3.0, true, false, "4·X_high − 3·Y_low"),
    (-3.0, 4.0, true, false, "4·Y_low − 3·X_high"),
    (-3.0, 4.0, false, true, "4·Y_high − 3·X_low"),
];

/// Evaluate `tx` as aggressor against `rx`'s receive window.
///
/// Returns nothing when `tx` is receive-only. IM2 and the mixing
/// combinations need `rx` to transmit as well.
pub fn evaluate_pair(tx: &Band, rx: &Band, options: &AnalysisOptions) -> Vec<PairRow> {
    if tx.is_receive_only() {
        return Vec::new();
    }
    let window = rx.rx_window().expanded(options.guard_mhz);
    let mut rows = Vec::new();

    for order in HARMONIC_ORDERS {
        let Some(product_type) = ProductType::harmonic(order) else {
            continue;
        };
        let n = order as f64;
        let (low, high) = (tx.tx_low * n, tx.tx_high * n);
        rows.push(PairRow {
            product_type,
            formula: format!("{}×Tx({})", order, tx.code),
            freq_low: low,
            freq_high: high,
            hit: range_hits(low, high, &window),
            risk: proximity_risk(low, high, &window),
        });
    }

    if rx.transmits() {
        if options.imd2 {
            for (_, f1) in tx.tx_edges() {
                for (_, f2) in rx.tx_edges() {
                    if f1 <= 0.0 || f2 <= 0.0 {
                        continue;
                    }
                    rows.push(PairRow::discrete(
                        ProductType::IM2,
                        format!("Tx({}) + Tx({})", tx.code, rx.code),
                        f1 + f2,
                        &window,
                    ));
                    let diff = (f1 - f2).abs();
                    if diff > 0.0 {
                        rows.push(PairRow::discrete(
                            ProductType::IM2,
                            format!("|Tx({}) - Tx({})|", tx.code, rx.code),
                            diff,
                            &window,
                        ));
                    }
                }
            }
        }

        let mut sets: Vec<(ProductType, &[Combo])> = vec![(ProductType::IM3, IM3_COMBOS)];
        if options.imd4 {
            sets.push((ProductType::IM4, IM4_COMBOS));
        }
        if options.imd5 {
            sets.push((ProductType::IM5, IM5_COMBOS));
        }
        if options.imd7 {
            sets.push((ProductType::IM7, IM7_COMBOS));
        }
        for (product_type, combos) in sets {
            for &(cx, cy, x_high, y_high, label) in combos {
                let x = if x_high { tx.tx_high } else { tx.tx_low };
                let y = if y_high { rx.tx_high } else { rx.tx_low };
                rows.push(PairRow::discrete(product_type, label, cx * x + cy * y, &window));
            }
        }
    }

    if options.aclr_margin_mhz > 0.0 {
        let hit = aclr_risk(tx.tx_high, rx.rx_low, options.aclr_margin_mhz);
        rows.push(PairRow {
            product_type: ProductType::ACLR,
            formula: "Tx_high vs Rx_low".to_string(),
            freq_low: tx.tx_high,
            freq_high: rx.rx_low,
            hit,
            risk: if hit {
                ProximityRisk::High
            } else {
                ProximityRisk::Low
            },
        });
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_proximity_levels() {
        let rx = FreqRange::new(1000.0, 1100.0);
        assert_eq!(proximity_risk(1050.0, 1050.0, &rx), ProximityRisk::High);
        assert_eq!(proximity_risk(999.5, 999.5, &rx), ProximityRisk::High);
        assert_eq!(proximity_risk(997.0, 997.0, &rx), ProximityRisk::Med);
        assert_eq!(proximity_risk(1110.0, 1110.0, &rx), ProximityRisk::Low);
        assert_eq!(proximity_risk(1200.0, 1200.0, &rx), ProximityRisk::Minimal);
    }

    #[test]
    fn test_receive_only_tx() {
        let gnss = Band::new("GNSS_L1", 0.0, 0.0, 1559.0, 1606.0, "L1", "GNSS");
        let b13 = Band::new("LTE_B13", 777.0, 787.0, 746.0, 756.0, "B13", "LTE");
        assert!(evaluate_pair(&gnss, &b13, &AnalysisOptions::default()).is_empty());
    }

    #[test]
    fn test_b13_against_gnss() {
        let gnss = Band::new("GNSS_L1", 0.0, 0.0, 1559.0, 1606.0, "L1", "GNSS");
        let b13 = Band::new("LTE_B13", 777.0, 787.0, 746.0, 756.0, "B13", "LTE");
        let rows = evaluate_pair(&b13, &gnss, &AnalysisOptions::default());
        // only harmonics: GNSS does not transmit
        assert_eq!(rows.len(), 4);
        let h2 = &rows[0];
        assert_eq!(h2.formula, "2×Tx(LTE_B13)");
        assert_eq!((h2.freq_low, h2.freq_high), (1554.0, 1574.0));
        assert!(h2.hit);
        assert_eq!(h2.risk, ProximityRisk::High);
    }

    #[test]
    fn test_im3_combos_and_aclr() {
        let b1 = Band::new("LTE_B1", 1920.0, 1980.0, 2110.0, 2170.0, "B1", "LTE");
        let wifi = Band::new("WiFi_2G", 2400.0, 2483.5, 2400.0, 2483.5, "Wi-Fi", "Wi-Fi");
        let options = AnalysisOptions {
            aclr_margin_mhz: 500.0,
            ..AnalysisOptions::default()
        };
        let rows = evaluate_pair(&b1, &wifi, &options);
        let im3: Vec<_> = rows
            .iter()
            .filter(|r| r.product_type == ProductType::IM3)
            .collect();
        assert_eq!(im3.len(), 4);
        assert_eq!(im3[0].freq_low, 2.0 * 1920.0 - 2483.5);
        assert_eq!(im3[2].freq_low, 2.0 * 2400.0 - 1980.0);
        let aclr = rows.last().unwrap();
        assert_eq!(aclr.product_type, ProductType::ACLR);
        assert!(aclr.hit);
    }
}
