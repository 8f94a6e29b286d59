//! Qualitative analysis pipeline
//!
//! ```text
//! bands ──┬── overlap ─────────────────────────────► alerts
//!         ├── harmonics ──┐
//!         ├── IM2 beats ──┤
//!         ├── mixing ─────┼──► dedup ─► rank ─► filter ≤ 0 ─► products
//!         └── ACLR ───────┘                        │
//!                                                   └──────────► note alert
//! ```
//!
//! Severity is assigned per hit while generating; ranking only orders.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::aclr::generate_aclr;
use crate::band::Band;
use crate::error::{CoexError, CoexResult};
use crate::harmonic::generate_harmonics;
use crate::imd::{generate_beats, generate_mixing};
use crate::overlap::check_overlaps;
use crate::product::{InterferenceProduct, Severity};
use crate::ranking;
use crate::registry::BandRegistry;

/// Guard margin and generator toggles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisOptions {
    /// Symmetric widening of every window, MHz
    pub guard_mhz: f64,
    pub imd2: bool,
    pub imd4: bool,
    pub imd5: bool,
    pub imd7: bool,
    /// ACLR proximity margin, MHz; 0 disables the check
    pub aclr_margin_mhz: f64,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            guard_mhz: 0.0,
            imd2: true,
            imd4: false,
            imd5: true,
            imd7: false,
            aclr_margin_mhz: 0.0,
        }
    }
}

impl AnalysisOptions {
    pub fn with_guard(mut self, guard_mhz: f64) -> Self {
        self.guard_mhz = guard_mhz;
        self
    }

    /// Every generator on.
    pub fn exhaustive() -> Self {
        Self {
            imd4: true,
            imd7: true,
            ..Self::default()
        }
    }

    /// Guard and ACLR margin must be finite and non-negative.
    pub fn validate(&self) -> CoexResult<()> {
        for (name, value) in [("guard_mhz", self.guard_mhz), ("aclr_margin_mhz", self.aclr_margin_mhz)] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(CoexError::InvalidConfig(format!(
                    "{} must be non-negative, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Ordered products plus free-text alerts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub products: Vec<InterferenceProduct>,
    pub alerts: Vec<String>,
}

impl AnalysisReport {
    /// Products that land in some receive window.
    pub fn hits(&self) -> impl Iterator<Item = &InterferenceProduct> {
        self.products.iter().filter(|p| p.is_hit())
    }

    pub fn at_least(&self, min: Severity) -> impl Iterator<Item = &InterferenceProduct> {
        self.products.iter().filter(move |p| p.severity >= min)
    }

    pub fn worst_severity(&self) -> Severity {
        self.products
            .iter()
            .map(|p| p.severity)
            .max()
            .unwrap_or(Severity::SAFE)
    }
}

/// Raw, unfiltered products in emission order.
pub fn generate_products(bands: &[Band], options: &AnalysisOptions) -> Vec<InterferenceProduct> {
    let mut products = generate_harmonics(bands, options.guard_mhz);
    products.extend(generate_beats(bands, options));
    products.extend(generate_mixing(bands, options));
    products.extend(generate_aclr(bands, options.aclr_margin_mhz));
    products
}

/// Run the full qualitative analysis over a band selection.
pub fn analyze(bands: &[Band], options: &AnalysisOptions) -> AnalysisReport {
    let mut alerts = check_overlaps(bands, options.guard_mhz);
    let raw = generate_products(bands, options);
    debug!(raw = raw.len(), "products generated");
    let products = ranking::finalize(raw, &mut alerts);
    info!(
        bands = bands.len(),
        products = products.len(),
        hits = products.iter().filter(|p| p.is_hit()).count(),
        alerts = alerts.len(),
        "analysis complete"
    );
    AnalysisReport { products, alerts }
}

/// Resolve codes through the registry, then [`analyze`].
pub fn analyze_codes<S: AsRef<str>>(
    registry: &BandRegistry,
    codes: &[S],
    options: &AnalysisOptions,
) -> CoexResult<AnalysisReport> {
    let bands = registry.select(codes)?;
    Ok(analyze(&bands, options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::ProductType;

    #[test]
    fn test_defaults() {
        let o = AnalysisOptions::default();
        assert!(o.imd2 && o.imd5);
        assert!(!o.imd4 && !o.imd7);
        assert_eq!(o.aclr_margin_mhz, 0.0);
    }

    #[test]
    fn test_options_validate() {
        assert!(AnalysisOptions::default().with_guard(2.0).validate().is_ok());
        assert!(matches!(
            AnalysisOptions::default().with_guard(-0.5).validate(),
            Err(CoexError::InvalidConfig(_))
        ));
        let options = AnalysisOptions {
            aclr_margin_mhz: f64::NAN,
            ..AnalysisOptions::default()
        };
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_b13_hits_gnss_l1() {
        let reg = BandRegistry::builtin();
        let report = analyze_codes(&reg, &["LTE_B13", "GNSS_L1"], &AnalysisOptions::default().with_guard(1.0))
            .unwrap();
        let hit = report
            .hits()
            .find(|p| p.victim.as_deref() == Some("GNSS_L1"))
            .unwrap();
        assert_eq!(hit.product_type, ProductType::H2);
        assert_eq!(hit.severity, Severity::CRITICAL);
        assert_eq!(report.worst_severity(), Severity::CRITICAL);
        // most severe first
        assert_eq!(report.products[0].severity, Severity::CRITICAL);
    }

    #[test]
    fn test_unknown_code() {
        let reg = BandRegistry::builtin();
        assert!(analyze_codes(&reg, &["LTE_B404"], &AnalysisOptions::default()).is_err());
    }

    #[test]
    fn test_empty_selection() {
        let report = analyze(&[], &AnalysisOptions::default());
        assert!(report.products.is_empty());
        assert!(report.alerts.is_empty());
    }
}
