//! Canned co-location scenarios with known critical interactions.

use serde::Serialize;

use crate::analysis::{analyze, AnalysisOptions, AnalysisReport};
use crate::error::CoexResult;
use crate::product::{InterferenceProduct, Severity};
use crate::registry::BandRegistry;

/// Products at or above this severity are reported for a demo.
pub const DEMO_MIN_SEVERITY: Severity = Severity::HIGH;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Scenario {
    pub name: &'static str,
    pub bands: &'static [&'static str],
    pub description: &'static str,
}

pub const DEMO_SCENARIOS: &[Scenario] = &[
    Scenario {
        name: "LTE B13 → GNSS L1",
        bands: &["LTE_B13", "GNSS_L1"],
        description: "B13 uplink second harmonic lands on GPS L1",
    },
    Scenario {
        name: "LTE B4 → Wi-Fi 5G",
        bands: &["LTE_B4", "WiFi_5G"],
        description: "AWS uplink harmonics against the 5 GHz Wi-Fi receiver",
    },
    Scenario {
        name: "LTE B26 → Wi-Fi 2.4G / BLE",
        bands: &["LTE_B26", "WiFi_2G", "BLE"],
        description: "850 MHz uplink harmonics and mixing in the 2.4 GHz ISM band",
    },
    Scenario {
        name: "LTE B13 + B26 → BLE",
        bands: &["LTE_B13", "LTE_B26", "BLE"],
        description: "Dual-uplink intermodulation into Bluetooth LE",
    },
];

/// Options every demo runs with.
pub fn demo_options() -> AnalysisOptions {
    AnalysisOptions {
        guard_mhz: 1.0,
        imd2: true,
        imd5: true,
        ..AnalysisOptions::default()
    }
}

/// Outcome of one demo run.
#[derive(Debug, Clone)]
pub struct ScenarioOutcome {
    pub scenario: Scenario,
    pub report: AnalysisReport,
}

impl ScenarioOutcome {
    /// Products at [`DEMO_MIN_SEVERITY`] or above.
    pub fn critical(&self) -> Vec<&InterferenceProduct> {
        self.report.at_least(DEMO_MIN_SEVERITY).collect()
    }
}

pub fn run_scenario(registry: &BandRegistry, scenario: &Scenario) -> CoexResult<ScenarioOutcome> {
    let bands = registry.select(scenario.bands)?;
    Ok(ScenarioOutcome {
        scenario: *scenario,
        report: analyze(&bands, &demo_options()),
    })
}

pub fn run_demos(registry: &BandRegistry) -> CoexResult<Vec<ScenarioOutcome>> {
    DEMO_SCENARIOS.iter().map(|s| run_scenario(registry, s)).collect()
}
