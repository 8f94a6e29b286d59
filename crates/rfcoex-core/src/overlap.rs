//! Direct band overlap alerts
//!
//! Diagnostic side channel: free-text alerts for unordered pairs whose
//! guard-widened windows collide. Not part of the product list.

use tracing::debug;

use crate::band::Band;

/// Overlap alerts for every unordered pair of the selection.
pub fn check_overlaps(bands: &[Band], guard_mhz: f64) -> Vec<String> {
    let mut alerts = Vec::new();
    for (i, b1) in bands.iter().enumerate() {
        for b2 in &bands[i + 1..] {
            pair_overlaps(b1, b2, guard_mhz, &mut alerts);
        }
    }
    debug!(count = alerts.len(), "overlap alerts");
    alerts
}

fn pair_overlaps(b1: &Band, b2: &Band, guard: f64, alerts: &mut Vec<String>) {
    let tx1 = b1.tx_window().expanded(guard);
    let tx2 = b2.tx_window().expanded(guard);
    let rx1 = b1.rx_window().expanded(guard);
    let rx2 = b2.rx_window().expanded(guard);

    if b1.transmits() && b2.transmits() && tx1.intersects(&tx2) {
        alerts.push(format!(
            "Tx band overlap: {} ({}-{} MHz) and {} ({}-{} MHz)",
            b1.code, b1.tx_low, b1.tx_high, b2.code, b2.tx_low, b2.tx_high
        ));
    }
    if rx1.intersects(&rx2) {
        alerts.push(format!(
            "Rx band overlap: {} ({}-{} MHz) and {} ({}-{} MHz)",
            b1.code, b1.rx_low, b1.rx_high, b2.code, b2.rx_low, b2.rx_high
        ));
    }
    if b1.transmits() && tx1.intersects(&rx2) {
        alerts.push(format!("Tx({}) overlaps Rx({})", b1.code, b2.code));
    }
    if b2.transmits() && tx2.intersects(&rx1) {
        alerts.push(format!("Tx({}) overlaps Rx({})", b2.code, b1.code));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_rx_single_alert() {
        let bands = vec![
            Band::new("GNSS_L1", 0.0, 0.0, 1559.0, 1606.0, "L1", "GNSS"),
            Band::new("GNSS_X", 0.0, 0.0, 1559.0, 1606.0, "X", "GNSS"),
        ];
        let alerts = check_overlaps(&bands, 0.0);
        assert_eq!(alerts.len(), 1);
        assert!(alerts[0].starts_with("Rx band overlap: GNSS_L1"));
    }

    #[test]
    fn test_tdd_pair() {
        let bands = vec![
            Band::new("WiFi_2G", 2400.0, 2495.0, 2400.0, 2495.0, "Wi-Fi", "Wi-Fi"),
            Band::new("BLE", 2402.0, 2480.0, 2402.0, 2480.0, "BLE", "BLE"),
        ];
        let alerts = check_overlaps(&bands, 0.0);
        assert_eq!(alerts.len(), 4);
        assert!(alerts.contains(&"Tx(WiFi_2G) overlaps Rx(BLE)".to_string()));
        assert!(alerts.contains(&"Tx(BLE) overlaps Rx(WiFi_2G)".to_string()));
    }

    #[test]
    fn test_guard_creates_overlap() {
        let bands = vec![
            Band::new("A_1", 100.0, 110.0, 200.0, 210.0, "a", "t"),
            Band::new("B_1", 111.0, 120.0, 300.0, 310.0, "b", "t"),
        ];
        assert!(check_overlaps(&bands, 0.0).is_empty());
        let alerts = check_overlaps(&bands, 0.5);
        assert_eq!(alerts.len(), 1);
        assert!(alerts[0].starts_with("Tx band overlap"));
    }

    #[test]
    fn test_receive_only_not_tx_source() {
        let bands = vec![
            Band::new("GNSS_L1", 0.0, 0.0, 1559.0, 1606.0, "L1", "GNSS"),
            Band::new("X_1", 1560.0, 1570.0, 3000.0, 3010.0, "x", "t"),
        ];
        let alerts = check_overlaps(&bands, 0.0);
        assert_eq!(alerts, vec!["Tx(X_1) overlaps Rx(GNSS_L1)".to_string()]);
    }
}
