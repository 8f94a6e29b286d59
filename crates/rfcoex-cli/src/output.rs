//! Result formatting for the terminal.

use anyhow::Result;
use serde_json::json;

use rfcoex_core::export::{csv_escape, performance_rows, product_rows, quantitative_rows, to_csv, to_json};
use rfcoex_core::pair::PairRow;
use rfcoex_core::power::{risk_counts, CouplingImpact, PerformanceResult, Preset, QuantitativeResult, SystemParameters};
use rfcoex_core::product::InterferenceProduct;
use rfcoex_core::scenarios::ScenarioOutcome;
use rfcoex_core::Band;

use crate::OutputFormat;

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}

pub fn print_bands(bands: &[&Band], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", to_json(bands)?),
        OutputFormat::Csv => {
            println!("code,label,category,tx_low,tx_high,rx_low,rx_high,technology");
            for b in bands {
                println!(
                    "{},{},{},{},{},{},{},{}",
                    csv_escape(&b.code),
                    csv_escape(&b.label),
                    csv_escape(&b.category),
                    b.tx_low,
                    b.tx_high,
                    b.rx_low,
                    b.rx_high,
                    b.technology
                );
            }
        }
        OutputFormat::Text => {
            println!("{:<12} {:<10} {:>17} {:>17}  {}", "Code", "Category", "Tx (MHz)", "Rx (MHz)", "Label");
            for b in bands {
                let tx = if b.is_receive_only() {
                    "rx only".to_string()
                } else {
                    format!("{:.1}-{:.1}", b.tx_low, b.tx_high)
                };
                println!(
                    "{:<12} {:<10} {:>17} {:>17}  {}",
                    b.code,
                    b.category,
                    tx,
                    format!("{:.1}-{:.1}", b.rx_low, b.rx_high),
                    b.label
                );
            }
            println!("\n{} bands", bands.len());
        }
    }
    Ok(())
}

pub fn print_warnings(warnings: &[String], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", to_json(warnings)?),
        OutputFormat::Csv => {
            println!("warning");
            for w in warnings {
                println!("{}", csv_escape(w));
            }
        }
        OutputFormat::Text => {
            if warnings.is_empty() {
                println!("✅ Band configuration looks valid");
            }
            for w in warnings {
                println!("⚠ {}", w);
            }
        }
    }
    Ok(())
}

pub fn print_alerts(alerts: &[String], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            println!("\nAlerts:");
            if alerts.is_empty() {
                println!("  none");
            }
            for a in alerts {
                println!("  • {}", a);
            }
            Ok(())
        }
        _ => print_warnings(alerts, format),
    }
}

pub fn print_products(products: &[InterferenceProduct], format: OutputFormat) -> Result<()> {
    let rows = product_rows(products);
    match format {
        OutputFormat::Json => println!("{}", to_json(&rows)?),
        OutputFormat::Csv => print!("{}", to_csv(&rows)),
        OutputFormat::Text => {
            println!(
                "{:<2} {:<5} {:>10}  {:<36} {:<22} {:<10}",
                "", "Type", "MHz", "Formula", "Aggressors", "Victim"
            );
            for r in &rows {
                println!(
                    "{:<2} {:<5} {:>10.2}  {:<36} {:<22} {:<10}",
                    r.risk_symbol,
                    r.product_type,
                    r.frequency_mhz,
                    truncate(&r.formula, 36),
                    truncate(&r.aggressors, 22),
                    if r.victims.is_empty() { "-" } else { r.victims.as_str() }
                );
            }
            let hits = products.iter().filter(|p| p.is_hit()).count();
            println!("\n{} products, {} hits", products.len(), hits);
        }
    }
    Ok(())
}

pub fn print_pair(tx: &Band, rx: &Band, rows: &[PairRow], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", to_json(rows)?),
        OutputFormat::Csv => {
            println!("type,formula,freq_low,freq_high,hit,risk");
            for r in rows {
                println!(
                    "{},{},{:.2},{:.2},{},{}",
                    r.product_type,
                    csv_escape(&r.formula),
                    r.freq_low,
                    r.freq_high,
                    r.hit,
                    r.risk
                );
            }
        }
        OutputFormat::Text => {
            println!("{} → {}", tx.code, rx.code);
            if rows.is_empty() {
                println!("  {} is receive-only", tx.code);
            }
            for r in rows {
                let range = if r.freq_low == r.freq_high {
                    format!("{:.1}", r.freq_low)
                } else {
                    format!("{:.1}-{:.1}", r.freq_low, r.freq_high)
                };
                println!(
                    "  {} {:<5} {:<24} {:>17} {}",
                    if r.hit { "✗" } else { " " },
                    r.product_type.as_str(),
                    r.formula,
                    range,
                    r.risk
                );
            }
        }
    }
    Ok(())
}

pub fn print_quantitative(
    params: &SystemParameters,
    results: &[QuantitativeResult],
    format: OutputFormat,
) -> Result<()> {
    let rows = quantitative_rows(results);
    match format {
        OutputFormat::Json => {
            let counts: Vec<_> = risk_counts(results)
                .iter()
                .map(|(tier, n)| json!({ "risk": tier.label(), "count": n }))
                .collect();
            let doc = json!({
                "configuration": params.configuration_name,
                "summary": counts,
                "results": rows,
            });
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
        OutputFormat::Csv => print!("{}", to_csv(&rows)),
        OutputFormat::Text => {
            println!("System: {}", params.configuration_name);
            if !params.configuration_notes.is_empty() {
                println!("        {}", params.configuration_notes);
            }
            println!();
            println!(
                "{:<13} {:<5} {:>9} {:<10} {:>9} {:>9} {:>8} {:>8}",
                "Risk", "Type", "MHz", "Victim", "I (dBm)", "Sens", "Margin", "Desense"
            );
            for r in results {
                println!(
                    "{:<13} {:<5} {:>9.1} {:<10} {:>9.1} {:>9.1} {:>8.1} {:>8.1}",
                    r.risk.to_string(),
                    r.product_type.as_str(),
                    r.frequency_mhz,
                    r.victim,
                    r.interference_at_victim_dbm,
                    r.victim_sensitivity_dbm,
                    r.interference_margin_db,
                    r.desensitization_db
                );
            }
            println!();
            for (tier, n) in risk_counts(results) {
                if n > 0 {
                    println!("{} {}: {}", tier.symbol(), tier.label(), n);
                }
            }
        }
    }
    Ok(())
}

pub fn print_performance(
    params: &SystemParameters,
    results: &[PerformanceResult],
    format: OutputFormat,
) -> Result<()> {
    let rows = performance_rows(results);
    match format {
        OutputFormat::Json => {
            let doc = json!({
                "configuration": params.configuration_name,
                "results": rows,
            });
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
        OutputFormat::Csv => print!("{}", to_csv(&rows)),
        OutputFormat::Text => {
            println!("System: {}", params.configuration_name);
            println!();
            println!(
                "{:<11} {:<5} {:>9} {:<10} {:>8} {:>8} {:>9} {:>8} {:>6}",
                "Impact", "Type", "MHz", "Victim", "Filter", "Isol", "I (dBm)", "Margin", "PER"
            );
            for r in results {
                println!(
                    "{:<11} {:<5} {:>9.1} {:<10} {:>8.1} {:>8.1} {:>9.1} {:>8.1} {:>5.0}%",
                    format!("{} {}", r.risk_symbol(), r.impact),
                    r.product_type.as_str(),
                    r.frequency_mhz,
                    r.victim,
                    r.filter_attenuation_db,
                    r.total_isolation_db,
                    r.interference_at_victim_dbm,
                    r.margin_db,
                    r.per_estimate * 100.0
                );
            }
            println!();
            for impact in [
                CouplingImpact::Critical,
                CouplingImpact::High,
                CouplingImpact::Medium,
                CouplingImpact::Low,
            ] {
                let n = results.iter().filter(|r| r.impact == impact).count();
                if n > 0 {
                    println!("{} {}: {}", impact.symbol(), impact, n);
                }
            }
        }
    }
    Ok(())
}

pub fn print_demos(outcomes: &[ScenarioOutcome], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let doc: Vec<_> = outcomes
                .iter()
                .map(|o| {
                    let critical: Vec<InterferenceProduct> = o.critical().into_iter().cloned().collect();
                    json!({
                        "scenario": o.scenario.name,
                        "bands": o.scenario.bands,
                        "critical": product_rows(&critical),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
        OutputFormat::Csv => {
            let mut all = Vec::new();
            for o in outcomes {
                all.extend(o.critical().into_iter().cloned());
            }
            print!("{}", to_csv(&product_rows(&all)));
        }
        OutputFormat::Text => {
            for o in outcomes {
                println!("=== {} ===", o.scenario.name);
                println!("{}", o.scenario.description);
                let critical = o.critical();
                if critical.is_empty() {
                    println!("  no high-severity products");
                }
                for p in critical {
                    println!(
                        "  {} {:<5} {:>9.2} MHz  {}  → {}",
                        p.risk_symbol(),
                        p.product_type.as_str(),
                        p.frequency_mhz,
                        p.formula,
                        p.victim.as_deref().unwrap_or("-")
                    );
                }
                println!();
            }
        }
    }
    Ok(())
}

pub fn print_presets(presets: &[Preset], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let doc: Vec<_> = presets
                .iter()
                .map(|p| json!({ "name": p.name(), "description": p.description(), "parameters": SystemParameters::preset(*p) }))
                .collect();
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
        OutputFormat::Csv => {
            println!("name,description");
            for p in presets {
                println!("{},{}", p.name(), csv_escape(p.description()));
            }
        }
        OutputFormat::Text => {
            for p in presets {
                println!("{:<24} {}", p.name(), p.description());
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("LTE_B13, LTE_B26, BLE", 8), "LTE_B13…");
    }
}
