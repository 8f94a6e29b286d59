//! Column-stable flat records for tables, CSV and JSON.

use serde::{Deserialize, Serialize};

use crate::error::CoexResult;
use crate::power::{PerformanceResult, QuantitativeResult};
use crate::product::InterferenceProduct;

/// A record with a fixed CSV column set.
pub trait CsvRecord {
    const HEADER: &'static [&'static str];

    fn fields(&self) -> Vec<String>;
}

/// Flat view of one interference product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRow {
    #[serde(rename = "type")]
    pub product_type: String,
    pub subtype: String,
    pub formula: String,
    pub frequency_mhz: f64,
    pub aggressors: String,
    pub victims: String,
    pub risk_symbol: String,
    pub severity: u8,
    pub details: String,
}

impl From<&InterferenceProduct> for ProductRow {
    fn from(p: &InterferenceProduct) -> Self {
        Self {
            product_type: p.product_type.to_string(),
            subtype: p.subtype.clone().unwrap_or_default(),
            formula: p.formula.clone(),
            frequency_mhz: p.frequency_mhz,
            aggressors: p.aggressor_list(),
            victims: p.victim.clone().unwrap_or_default(),
            risk_symbol: p.risk_symbol().to_string(),
            severity: p.severity.level(),
            details: p.details.clone(),
        }
    }
}

impl CsvRecord for ProductRow {
    const HEADER: &'static [&'static str] = &[
        "type",
        "subtype",
        "formula",
        "frequency_mhz",
        "aggressors",
        "victims",
        "risk_symbol",
        "severity",
        "details",
    ];

    fn fields(&self) -> Vec<String> {
        vec![
            self.product_type.clone(),
            self.subtype.clone(),
            self.formula.clone(),
            format!("{:.2}", self.frequency_mhz),
            self.aggressors.clone(),
            self.victims.clone(),
            self.risk_symbol.clone(),
            self.severity.to_string(),
            self.details.clone(),
        ]
    }
}

/// Flat view of one power-budget result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantitativeRow {
    #[serde(rename = "type")]
    pub product_type: String,
    pub frequency_mhz: f64,
    pub formula: String,
    pub aggressors: String,
    pub victim: String,
    pub aggressor_power_dbm: f64,
    pub level_dbc: f64,
    pub at_tx_dbm: f64,
    pub at_victim_dbm: f64,
    pub sensitivity_dbm: f64,
    pub margin_db: f64,
    pub desense_db: f64,
    pub noise_floor_dbm: f64,
    pub sir_db: f64,
    pub risk: String,
    pub risk_symbol: String,
}

impl From<&QuantitativeResult> for QuantitativeRow {
    fn from(r: &QuantitativeResult) -> Self {
        Self {
            product_type: r.product_type.to_string(),
            frequency_mhz: r.frequency_mhz,
            formula: r.formula.clone(),
            aggressors: r.aggressors.join(", "),
            victim: r.victim.clone(),
            aggressor_power_dbm: r.aggressor_power_dbm,
            level_dbc: r.interference_level_dbc,
            at_tx_dbm: r.interference_at_tx_dbm,
            at_victim_dbm: r.interference_at_victim_dbm,
            sensitivity_dbm: r.victim_sensitivity_dbm,
            margin_db: r.interference_margin_db,
            desense_db: r.desensitization_db,
            noise_floor_dbm: r.noise_floor_dbm,
            sir_db: r.sir_db,
            risk: r.risk.label().to_string(),
            risk_symbol: r.risk_symbol().to_string(),
        }
    }
}

impl CsvRecord for QuantitativeRow {
    const HEADER: &'static [&'static str] = &[
        "type",
        "frequency_mhz",
        "formula",
        "aggressors",
        "victim",
        "aggressor_power_dbm",
        "level_dbc",
        "at_tx_dbm",
        "at_victim_dbm",
        "sensitivity_dbm",
        "margin_db",
        "desense_db",
        "noise_floor_dbm",
        "sir_db",
        "risk",
        "risk_symbol",
    ];

    fn fields(&self) -> Vec<String> {
        let db = |v: f64| format!("{:.2}", v);
        vec![
            self.product_type.clone(),
            db(self.frequency_mhz),
            self.formula.clone(),
            self.aggressors.clone(),
            self.victim.clone(),
            db(self.aggressor_power_dbm),
            db(self.level_dbc),
            db(self.at_tx_dbm),
            db(self.at_victim_dbm),
            db(self.sensitivity_dbm),
            db(self.margin_db),
            db(self.desense_db),
            db(self.noise_floor_dbm),
            db(self.sir_db),
            self.risk.clone(),
            self.risk_symbol.clone(),
        ]
    }
}

/// Flat view of one board-level performance estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceRow {
    #[serde(rename = "type")]
    pub product_type: String,
    pub frequency_mhz: f64,
    pub formula: String,
    pub aggressors: String,
    pub victim: String,
    pub aggressor_power_dbm: f64,
    pub filter_db: f64,
    pub path_loss_db: f64,
    pub isolation_db: f64,
    pub at_victim_dbm: f64,
    pub sensitivity_dbm: f64,
    pub margin_db: f64,
    pub imd_power_dbm: Option<f64>,
    pub modulation: String,
    pub per: f64,
    pub impact: String,
    pub risk_symbol: String,
}

impl From<&PerformanceResult> for PerformanceRow {
    fn from(r: &PerformanceResult) -> Self {
        Self {
            product_type: r.product_type.to_string(),
            frequency_mhz: r.frequency_mhz,
            formula: r.formula.clone(),
            aggressors: r.aggressors.join(", "),
            victim: r.victim.clone(),
            aggressor_power_dbm: r.aggressor_power_dbm,
            filter_db: r.filter_attenuation_db,
            path_loss_db: r.path_loss_db,
            isolation_db: r.total_isolation_db,
            at_victim_dbm: r.interference_at_victim_dbm,
            sensitivity_dbm: r.victim_sensitivity_dbm,
            margin_db: r.margin_db,
            imd_power_dbm: r.imd_power_dbm,
            modulation: r.modulation.as_str().to_string(),
            per: r.per_estimate,
            impact: r.impact.to_string(),
            risk_symbol: r.risk_symbol().to_string(),
        }
    }
}

impl CsvRecord for PerformanceRow {
    const HEADER: &'static [&'static str] = &[
        "type",
        "frequency_mhz",
        "formula",
        "aggressors",
        "victim",
        "aggressor_power_dbm",
        "filter_db",
        "path_loss_db",
        "isolation_db",
        "at_victim_dbm",
        "sensitivity_dbm",
        "margin_db",
        "imd_power_dbm",
        "modulation",
        "per",
        "impact",
        "risk_symbol",
    ];

    fn fields(&self) -> Vec<String> {
        let db = |v: f64| format!("{:.2}", v);
        vec![
            self.product_type.clone(),
            db(self.frequency_mhz),
            self.formula.clone(),
            self.aggressors.clone(),
            self.victim.clone(),
            db(self.aggressor_power_dbm),
            db(self.filter_db),
            db(self.path_loss_db),
            db(self.isolation_db),
            db(self.at_victim_dbm),
            db(self.sensitivity_dbm),
            db(self.margin_db),
            self.imd_power_dbm.map(db).unwrap_or_default(),
            self.modulation.clone(),
            format!("{:.2}", self.per),
            self.impact.clone(),
            self.risk_symbol.clone(),
        ]
    }
}

pub fn product_rows(products: &[InterferenceProduct]) -> Vec<ProductRow> {
    products.iter().map(ProductRow::from).collect()
}

pub fn quantitative_rows(results: &[QuantitativeResult]) -> Vec<QuantitativeRow> {
    results.iter().map(QuantitativeRow::from).collect()
}

pub fn performance_rows(results: &[PerformanceResult]) -> Vec<PerformanceRow> {
    results.iter().map(PerformanceRow::from).collect()
}

/// Quote a CSV field when it holds a separator, quote or line break.
pub fn csv_escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

pub fn to_csv<R: CsvRecord>(rows: &[R]) -> String {
    let mut out = R::HEADER.join(",");
    out.push('\n');
    for row in rows {
        let line: Vec<String> = row.fields().iter().map(|f| csv_escape(f)).collect();
        out.push_str(&line.join(","));
        out.push('\n');
    }
    out
}

pub fn to_json<T: Serialize + ?Sized>(value: &T) -> CoexResult<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{analyze, AnalysisOptions};
    use crate::product::{ProductType, Severity};
    use crate::registry::BandRegistry;

    #[test]
    fn test_csv_escape() {
        assert_eq!(csv_escape("plain"), "plain");
        assert_eq!(csv_escape("LTE_B13, LTE_B26"), "\"LTE_B13, LTE_B26\"");
        assert_eq!(csv_escape("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_product_row_columns() {
        let p = InterferenceProduct::new(ProductType::IM3, "2×A - B", 1575.4199)
            .with_aggressors(&["LTE_B13", "LTE_B26"])
            .with_victim(Some("GNSS_L1"))
            .with_severity(Severity::CRITICAL);
        let row = ProductRow::from(&p);
        assert_eq!(row.fields().len(), ProductRow::HEADER.len());
        assert_eq!(row.victims, "GNSS_L1");
        assert_eq!(row.severity, 5);

        let csv = to_csv(&[row]);
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some(ProductRow::HEADER.join(",").as_str()));
        let data = lines.next().unwrap();
        assert!(data.starts_with("IM3,,2×A - B,1575.42,\"LTE_B13, LTE_B26\",GNSS_L1,"));
    }

    #[test]
    fn test_json_uses_type_key() {
        let registry = BandRegistry::builtin();
        let bands = registry.select(&["LTE_B13", "GNSS_L1"]).unwrap();
        let report = analyze(&bands, &AnalysisOptions::default());
        let json = to_json(&product_rows(&report.products)).unwrap();
        let parsed: Vec<ProductRow> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.len(), report.products.len());
        assert!(json.contains("\"type\""));
    }

    #[test]
    fn test_performance_row_blank_imd_column() {
        let registry = BandRegistry::builtin();
        let params = crate::power::SystemParameters::default();
        let p = InterferenceProduct::new(ProductType::H2, "2×LTE_B13_high", 1574.0)
            .with_aggressors(&["LTE_B13"])
            .with_victim(Some("GNSS_L1"))
            .with_severity(Severity::CRITICAL);
        let results = crate::power::system_performance(&[p], &registry, &params);
        let rows = performance_rows(&results);
        assert_eq!(rows.len(), 1);
        let fields = rows[0].fields();
        assert_eq!(fields.len(), PerformanceRow::HEADER.len());
        let imd = PerformanceRow::HEADER.iter().position(|h| *h == "imd_power_dbm").unwrap();
        assert_eq!(fields[imd], "");
        assert_eq!(rows[0].modulation, "other");
    }
}
