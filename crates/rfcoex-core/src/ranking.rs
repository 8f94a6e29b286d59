//! Deduplication, ordering and positivity filtering.

use std::cmp::Ordering;
use std::collections::HashSet;

use tracing::debug;

use crate::product::{InterferenceProduct, ProductType};

/// Mathematical identity of a product: type, frequency in hundredths of a
/// MHz, sorted aggressors and victim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProductKey {
    pub product_type: ProductType,
    pub centi_mhz: i64,
    pub aggressors: Vec<String>,
    pub victim: Option<String>,
}

impl ProductKey {
    pub fn of(product: &InterferenceProduct) -> Self {
        let mut aggressors = product.aggressors.clone();
        aggressors.sort();
        Self {
            product_type: product.product_type,
            centi_mhz: (product.frequency_mhz * 100.0).round() as i64,
            aggressors,
            victim: product.victim.clone(),
        }
    }
}

/// Keep the first product seen for each [`ProductKey`].
pub fn dedup(products: Vec<InterferenceProduct>) -> Vec<InterferenceProduct> {
    let before = products.len();
    let mut seen = HashSet::with_capacity(before);
    let kept: Vec<_> = products
        .into_iter()
        .filter(|p| seen.insert(ProductKey::of(p)))
        .collect();
    debug!(before, after = kept.len(), "deduplicated products");
    kept
}

/// Most severe first, then typical signal strength, type, formula and
/// frequency.
pub fn compare(a: &InterferenceProduct, b: &InterferenceProduct) -> Ordering {
    a.severity
        .rank()
        .cmp(&b.severity.rank())
        .then_with(|| a.product_type.priority().cmp(&b.product_type.priority()))
        .then_with(|| a.product_type.as_str().cmp(b.product_type.as_str()))
        .then_with(|| a.formula.cmp(&b.formula))
        .then_with(|| a.frequency_mhz.total_cmp(&b.frequency_mhz))
}

/// Stable sort by [`compare`].
pub fn rank(products: &mut [InterferenceProduct]) {
    products.sort_by(compare);
}

/// Drop non-positive frequencies, returning how many were removed.
pub fn retain_positive(products: &mut Vec<InterferenceProduct>) -> usize {
    let before = products.len();
    products.retain(|p| p.frequency_mhz > 0.0);
    before - products.len()
}

pub fn invalid_frequency_note(count: usize) -> String {
    format!(
        "Note: {} products with invalid frequencies (≤ 0 MHz) were filtered out",
        count
    )
}

/// Dedup, rank and filter a raw product list, appending the filtered-count
/// note to `alerts` when anything was removed.
pub fn finalize(
    products: Vec<InterferenceProduct>,
    alerts: &mut Vec<String>,
) -> Vec<InterferenceProduct> {
    let mut products = dedup(products);
    rank(&mut products);
    let invalid = retain_positive(&mut products);
    if invalid > 0 {
        debug!(invalid, "filtered non-positive frequencies");
        alerts.push(invalid_frequency_note(invalid));
    }
    products
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::Severity;

    fn product(t: ProductType, formula: &str, freq: f64, aggr: &[&str], victim: Option<&str>) -> InterferenceProduct {
        InterferenceProduct::new(t, formula, freq)
            .with_aggressors(aggr)
            .with_victim(victim)
    }

    #[test]
    fn test_dedup_keeps_first() {
        let products = vec![
            product(ProductType::IM3, "first", 1000.0, &["A", "B"], Some("V")),
            product(ProductType::IM3, "second", 1000.001, &["B", "A"], Some("V")),
            product(ProductType::IM3, "other victim", 1000.0, &["A", "B"], None),
        ];
        let kept = dedup(products);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].formula, "first");
        assert_eq!(kept[1].formula, "other victim");
    }

    #[test]
    fn test_rank_order() {
        let mut products = vec![
            product(ProductType::IM3, "b", 10.0, &["A"], None),
            product(ProductType::IM3, "a", 10.0, &["A"], None),
            product(ProductType::IM3, "z", 10.0, &["A"], Some("V")).with_severity(Severity::VERY_LOW),
            product(ProductType::H3, "y", 10.0, &["A"], Some("V")).with_severity(Severity::VERY_LOW),
            product(ProductType::IM2, "x", 10.0, &["A"], Some("V")).with_severity(Severity::CRITICAL),
        ];
        rank(&mut products);
        let order: Vec<_> = products.iter().map(|p| p.formula.as_str()).collect();
        assert_eq!(order, ["x", "y", "z", "a", "b"]);
    }

    #[test]
    fn test_finalize_filters_and_notes() {
        let products = vec![
            product(ProductType::IM3, "neg", -50.0, &["A", "B"], None),
            product(ProductType::IM3, "zero", 0.0, &["A", "B"], None),
            product(ProductType::IM3, "ok", 50.0, &["A", "B"], None),
        ];
        let mut alerts = Vec::new();
        let kept = finalize(products, &mut alerts);
        assert_eq!(kept.len(), 1);
        assert_eq!(
            alerts,
            vec!["Note: 2 products with invalid frequencies (≤ 0 MHz) were filtered out".to_string()]
        );
    }

    #[test]
    fn test_finalize_no_note_when_clean() {
        let mut alerts = Vec::new();
        finalize(vec![product(ProductType::H2, "ok", 5.0, &["A"], None)], &mut alerts);
        assert!(alerts.is_empty());
    }
}
