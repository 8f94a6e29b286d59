//! # Co-located Radio Interference Engine
//!
//! Given a set of radio bands sharing one device, this crate enumerates the
//! spurious products their transmitters can create and scores each one
//! against every receiver in the set:
//!
//! - **Overlap**: Tx/Tx, Rx/Rx and Tx/Rx window overlaps as alerts
//! - **Harmonics**: 2nd to 5th order of each transmit edge
//! - **Intermodulation**: IM2 beats and IM3/IM4/IM5/IM7 mixing of every pair
//! - **ACLR**: transmit edges sitting close to another band's receive edge
//! - **Severity**: a 0..5 qualitative score per hit
//! - **Power budget**: dBm at the victim, desensitization and risk tier
//! - **Board performance**: on-board coupling, preselector roll-off and PER
//!
//! ## Pipeline
//!
//! ```text
//! codes → BandRegistry → [Band] ─┬─ overlap ───────────────────► alerts
//!                                 └─ generators → dedup → rank → products
//!                                                                   │
//!               SystemParameters ──► power budget ◄─────────────────┘
//!                                         │
//!                                         ▼
//!                                 QuantitativeResult
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use rfcoex_core::prelude::*;
//!
//! let registry = BandRegistry::builtin();
//! let options = AnalysisOptions::default().with_guard(1.0);
//! let report = analyze_codes(&registry, &["LTE_B13", "GNSS_L1"], &options)?;
//!
//! for product in report.at_least(Severity::HIGH) {
//!     println!("{} {} {:.1} MHz", product.risk_symbol(), product.formula, product.frequency_mhz);
//! }
//!
//! let params = SystemParameters::preset(Preset::MobileDeviceTypical);
//! let budget = analyze_quantitative(&report.products, &registry, &params);
//! # Ok::<(), rfcoex_core::CoexError>(())
//! ```

pub mod aclr;
pub mod analysis;
pub mod band;
pub mod config;
pub mod error;
pub mod export;
pub mod harmonic;
pub mod imd;
pub mod observe;
pub mod overlap;
pub mod pair;
pub mod power;
pub mod product;
pub mod ranking;
pub mod registry;
pub mod risk;
pub mod scan;
pub mod scenarios;
pub mod validation;

#[cfg(feature = "parallel")]
pub mod parallel;

pub use analysis::{analyze, analyze_codes, generate_products, AnalysisOptions, AnalysisReport};
pub use band::{Band, Edge, FreqRange, GnssSignal, Technology};
pub use config::CoexConfig;
pub use error::{CoexError, CoexResult};
pub use product::{InterferenceProduct, ProductType, Severity};
pub use registry::{BandRegistry, BandSpec};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::analysis::{analyze, analyze_codes, AnalysisOptions, AnalysisReport};
    pub use crate::band::{Band, Technology};
    pub use crate::config::CoexConfig;
    pub use crate::error::{CoexError, CoexResult};
    pub use crate::pair::{evaluate_pair, PairRow, ProximityRisk};
    pub use crate::power::{
        analyze_quantitative, sort_by_impact, sort_by_risk, system_performance, PerformanceResult, Preset, QuantRisk,
        QuantitativeResult, SystemParameters,
    };
    pub use crate::product::{InterferenceProduct, ProductType, Severity};
    pub use crate::registry::BandRegistry;
    pub use crate::validation::validate_band_configuration;
    #[cfg(feature = "parallel")]
    pub use crate::parallel::analyze_parallel;
}
