//! Adjacent-channel leakage check

use tracing::debug;

use crate::band::Band;
use crate::product::{InterferenceProduct, ProductType, Severity};
use crate::risk;

/// True when the transmit upper edge sits within `margin` of the receive
/// lower edge.
pub fn aclr_risk(tx_high: f64, rx_low: f64, margin: f64) -> bool {
    (tx_high - rx_low).abs() <= margin
}

/// One product per ordered pair `(b1, b2)` with `b1` transmitting.
/// Disabled when `margin_mhz <= 0`.
pub fn generate_aclr(bands: &[Band], margin_mhz: f64) -> Vec<InterferenceProduct> {
    let mut out = Vec::new();
    if margin_mhz <= 0.0 {
        return out;
    }
    for (i, b1) in bands.iter().enumerate() {
        if b1.is_receive_only() {
            continue;
        }
        for (j, b2) in bands.iter().enumerate() {
            if i == j {
                continue;
            }
            let freq = (b1.tx_high + b2.rx_low) / 2.0;
            let hit = aclr_risk(b1.tx_high, b2.rx_low, margin_mhz);
            let mut product = InterferenceProduct::new(
                ProductType::ACLR,
                format!("{}_tx_high vs {}_rx_low", b1.code, b2.code),
                freq,
            )
            .with_subtype("Adjacent-channel")
            .with_aggressors(&[&b1.code])
            .with_details(format!(
                "ACLR: {} MHz vs {} MHz (gap: {:.1} MHz)",
                b1.tx_high,
                b2.rx_low,
                (b1.tx_high - b2.rx_low).abs()
            ));
            if hit {
                let severity = risk::assess(product.frequency_mhz, b2, &[b1], ProductType::ACLR);
                product = product.with_victim(Some(&b2.code)).with_severity(severity);
            } else {
                product = product.with_severity(Severity::SAFE);
            }
            out.push(product);
        }
    }
    debug!(count = out.len(), margin_mhz, "ACLR products generated");
    out
}
