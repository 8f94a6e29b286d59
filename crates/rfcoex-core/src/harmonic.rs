//! Harmonic generator (2H..5H)
//!
//! Each transmit edge of each transmitting band is multiplied by the
//! harmonic order and tested against every selected receive window,
//! including the source band's own.

use tracing::debug;

use crate::band::Band;
use crate::product::{InterferenceProduct, ProductType};
use crate::scan::VictimScan;

/// Harmonic orders enumerated.
pub const HARMONIC_ORDERS: [u32; 4] = [2, 3, 4, 5];

pub(crate) fn ordinal(n: u32) -> String {
    let suffix = match n {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    };
    format!("{}{}", n, suffix)
}

/// Harmonics of a single aggressor band.
pub fn harmonics_of(aggressor: &Band, scan: &VictimScan<'_>, out: &mut Vec<InterferenceProduct>) {
    if aggressor.is_receive_only() {
        return;
    }
    for order in HARMONIC_ORDERS {
        let Some(product_type) = ProductType::harmonic(order) else {
            continue;
        };
        for (edge, value) in aggressor.tx_edges() {
            if value == 0.0 {
                continue;
            }
            let freq = value * order as f64;
            let template = InterferenceProduct::new(
                product_type,
                format!("{}×Tx_{}({})", order, edge.as_str(), aggressor.code),
                freq,
            )
            .with_subtype("Harmonic")
            .with_aggressors(&[&aggressor.code])
            .with_details(format!(
                "{} Harmonic: {}×{} = {:.1} MHz (Band: {})",
                ordinal(order),
                order,
                value,
                freq,
                aggressor.code
            ));
            scan.emit(template, freq, &[aggressor], out);
        }
    }
}

/// Harmonic products for every transmitting band in the selection.
pub fn generate_harmonics(bands: &[Band], guard_mhz: f64) -> Vec<InterferenceProduct> {
    let scan = VictimScan::new(bands, guard_mhz);
    let mut out = Vec::new();
    for band in bands {
        harmonics_of(band, &scan, &mut out);
    }
    debug!(count = out.len(), "harmonic products generated");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wifi_and_b1() -> Vec<Band> {
        vec![
            Band::new("WiFi_2G", 2400.0, 2483.5, 2400.0, 2483.5, "Wi-Fi", "Wi-Fi"),
            Band::new("LTE_B1", 1920.0, 1980.0, 2110.0, 2170.0, "B1", "LTE"),
        ]
    }

    #[test]
    fn test_second_harmonic_of_b1_high() {
        let products = generate_harmonics(&wifi_and_b1(), 1.0);
        let p = products
            .iter()
            .find(|p| p.formula == "2×Tx_high(LTE_B1)")
            .unwrap();
        assert_eq!(p.frequency_mhz, 3960.0);
        assert_eq!(p.victim, None);
        assert_eq!(p.product_type, ProductType::H2);
        assert_eq!(p.aggressors, vec!["LTE_B1".to_string()]);
    }

    #[test]
    fn test_receive_only_never_aggressor() {
        let bands = vec![
            Band::new("GNSS_L1", 0.0, 0.0, 1559.0, 1606.0, "L1", "GNSS"),
            Band::new("LTE_B13", 777.0, 787.0, 746.0, 756.0, "B13", "LTE"),
        ];
        let products = generate_harmonics(&bands, 0.0);
        assert!(!products.is_empty());
        assert!(products
            .iter()
            .all(|p| !p.aggressors.contains(&"GNSS_L1".to_string())));
        // 2 × 787 = 1574 lands in L1
        let hit = products
            .iter()
            .find(|p| p.victim.as_deref() == Some("GNSS_L1"))
            .unwrap();
        assert_eq!(hit.frequency_mhz, 1574.0);
    }

    #[test]
    fn test_all_orders_and_edges() {
        let bands = vec![Band::new("LTE_B7", 2500.0, 2570.0, 2620.0, 2690.0, "B7", "LTE")];
        let products = generate_harmonics(&bands, 0.0);
        // one band misses everything: one record per (order, edge)
        assert_eq!(products.len(), HARMONIC_ORDERS.len() * 2);
        assert_eq!(products[0].formula, "2×Tx_low(LTE_B7)");
        assert_eq!(products[1].formula, "2×Tx_high(LTE_B7)");
    }

    #[test]
    fn test_ordinal() {
        assert_eq!(ordinal(2), "2nd");
        assert_eq!(ordinal(3), "3rd");
        assert_eq!(ordinal(5), "5th");
    }
}
