//! rfcoex: co-located radio interference analysis from the command line.

mod output;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use rfcoex_core::observe::{init_logging, LogLevel};
use rfcoex_core::prelude::*;
use rfcoex_core::scenarios::run_demos;

#[derive(Parser)]
#[command(name = "rfcoex")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file (otherwise the standard search path)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "text", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
}

#[derive(Args, Debug, Default)]
struct AnalysisArgs {
    /// Guard margin around receive windows, MHz
    #[arg(long)]
    guard: Option<f64>,

    /// Skip IM2 beat products
    #[arg(long)]
    no_im2: bool,

    /// Include IM4 products
    #[arg(long)]
    im4: bool,

    /// Skip IM5 products
    #[arg(long)]
    no_im5: bool,

    /// Include IM7 products
    #[arg(long)]
    im7: bool,

    /// ACLR proximity margin, MHz (0 disables)
    #[arg(long)]
    aclr_margin: Option<f64>,
}

impl AnalysisArgs {
    /// Command-line flags layered over the configured options, checked
    /// after merging.
    fn apply(&self, base: &AnalysisOptions) -> Result<AnalysisOptions> {
        let mut options = base.clone();
        if let Some(guard) = self.guard {
            options.guard_mhz = guard;
        }
        if self.no_im2 {
            options.imd2 = false;
        }
        if self.im4 {
            options.imd4 = true;
        }
        if self.no_im5 {
            options.imd5 = false;
        }
        if self.im7 {
            options.imd7 = true;
        }
        if let Some(margin) = self.aclr_margin {
            options.aclr_margin_mhz = margin;
        }
        options.validate().context("invalid analysis options")?;
        Ok(options)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List the band catalog
    Bands {
        /// Only this category (e.g. LTE, GNSS, Wi-Fi)
        #[arg(long)]
        category: Option<String>,
    },

    /// Check band definitions for malformed windows
    Validate {
        /// Band codes (defaults to the configured selection)
        codes: Vec<String>,
    },

    /// Enumerate and score interference products
    Analyze {
        /// Band codes (defaults to the configured selection)
        codes: Vec<String>,

        #[command(flatten)]
        analysis: AnalysisArgs,

        /// Only report products at or above this severity (0-5)
        #[arg(long, default_value = "0")]
        min_severity: u8,

        /// Also print overlap alerts and notes
        #[arg(long)]
        alerts: bool,
    },

    /// Evaluate one transmitter against one receiver
    Pair {
        /// Aggressor band code
        tx: String,
        /// Victim band code
        rx: String,

        #[command(flatten)]
        analysis: AnalysisArgs,
    },

    /// Power budget and desensitization for every hit
    Quant {
        /// Band codes (defaults to the configured selection)
        codes: Vec<String>,

        #[command(flatten)]
        analysis: AnalysisArgs,

        /// System preset (overrides the configured one)
        #[arg(long)]
        preset: Option<String>,
    },

    /// Board coupling and packet error estimate for every hit
    Perf {
        /// Band codes (defaults to the configured selection)
        codes: Vec<String>,

        #[command(flatten)]
        analysis: AnalysisArgs,

        /// System preset (overrides the configured one)
        #[arg(long)]
        preset: Option<String>,
    },

    /// Run the built-in critical scenarios
    Demo,

    /// List system parameter presets
    Presets,

    /// Print an example configuration file
    ExampleConfig,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => CoexConfig::load_from(path).with_context(|| format!("loading {}", path.display()))?,
        None => CoexConfig::load().context("loading configuration")?,
    };

    let mut log_config = config.logging.clone();
    log_config.level = LogLevel::from_verbosity(log_config.level, cli.verbose);
    init_logging(&log_config)?;

    config.validate().context("invalid configuration")?;
    let registry = config.registry();

    match cli.command {
        Commands::Bands { category } => {
            let bands: Vec<&Band> = match &category {
                Some(cat) => registry.by_category(cat).collect(),
                None => registry.iter().collect(),
            };
            output::print_bands(&bands, cli.format)?;
        }
        Commands::Validate { codes } => {
            let bands = registry.select(&selection(codes, &config)?)?;
            let warnings = validate_band_configuration(&bands);
            output::print_warnings(&warnings, cli.format)?;
        }
        Commands::Analyze {
            codes,
            analysis,
            min_severity,
            alerts,
        } => {
            let options = analysis.apply(&config.analysis)?;
            let bands = registry.select(&selection(codes, &config)?)?;
            for warning in validate_band_configuration(&bands) {
                tracing::warn!("{}", warning);
            }
            let report = run_analysis(&bands, &options);
            let min = Severity::new(min_severity);
            let products: Vec<InterferenceProduct> = report.at_least(min).cloned().collect();
            output::print_products(&products, cli.format)?;
            if alerts {
                output::print_alerts(&report.alerts, cli.format)?;
            }
        }
        Commands::Pair { tx, rx, analysis } => {
            let options = analysis.apply(&config.analysis)?;
            let tx_band = registry
                .get(&tx)
                .ok_or_else(|| CoexError::UnknownBand(tx.clone()))?;
            let rx_band = registry
                .get(&rx)
                .ok_or_else(|| CoexError::UnknownBand(rx.clone()))?;
            let rows = evaluate_pair(tx_band, rx_band, &options);
            output::print_pair(tx_band, rx_band, &rows, cli.format)?;
        }
        Commands::Quant {
            codes,
            analysis,
            preset,
        } => {
            let options = analysis.apply(&config.analysis)?;
            let params = system_parameters(preset.as_deref(), &config)?;
            let bands = registry.select(&selection(codes, &config)?)?;
            let report = run_analysis(&bands, &options);
            let mut results = analyze_quantitative(&report.products, &registry, &params);
            sort_by_risk(&mut results);
            output::print_quantitative(&params, &results, cli.format)?;
        }
        Commands::Perf {
            codes,
            analysis,
            preset,
        } => {
            let options = analysis.apply(&config.analysis)?;
            let params = system_parameters(preset.as_deref(), &config)?;
            let bands = registry.select(&selection(codes, &config)?)?;
            let report = run_analysis(&bands, &options);
            let mut results = system_performance(&report.products, &registry, &params);
            sort_by_impact(&mut results);
            output::print_performance(&params, &results, cli.format)?;
        }
        Commands::Demo => {
            let outcomes = run_demos(&registry)?;
            output::print_demos(&outcomes, cli.format)?;
        }
        Commands::Presets => {
            output::print_presets(&Preset::ALL, cli.format)?;
        }
        Commands::ExampleConfig => {
            print!("{}", CoexConfig::example_yaml());
        }
    }

    Ok(())
}

/// Band codes from the command line, else from the configuration.
fn selection(codes: Vec<String>, config: &CoexConfig) -> Result<Vec<String>> {
    if !codes.is_empty() {
        return Ok(codes);
    }
    if config.selection.is_empty() {
        bail!("no bands given and no selection in the configuration");
    }
    Ok(config.selection.clone())
}

/// Named preset with the configured overrides, else the configured system.
fn system_parameters(preset: Option<&str>, config: &CoexConfig) -> Result<SystemParameters> {
    let params = match preset {
        Some(name) => config.system.overrides.apply(&SystemParameters::named(name)?),
        None => config.system_parameters()?,
    };
    params.validate()?;
    Ok(params)
}

#[cfg(feature = "parallel")]
fn run_analysis(bands: &[Band], options: &AnalysisOptions) -> AnalysisReport {
    rfcoex_core::parallel::analyze_parallel(bands, options)
}

#[cfg(not(feature = "parallel"))]
fn run_analysis(bands: &[Band], options: &AnalysisOptions) -> AnalysisReport {
    analyze(bands, options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from([
            "rfcoex", "-vv", "--format", "csv", "analyze", "LTE_B13", "GNSS_L1", "--guard", "1.5", "--im7",
            "--no-im2",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.format, OutputFormat::Csv);
        let Commands::Analyze { codes, analysis, .. } = cli.command else {
            panic!("expected analyze");
        };
        assert_eq!(codes, vec!["LTE_B13", "GNSS_L1"]);
        let options = analysis.apply(&AnalysisOptions::default()).unwrap();
        assert_eq!(options.guard_mhz, 1.5);
        assert!(options.imd7);
        assert!(!options.imd2);
        assert!(options.imd5);
    }

    #[test]
    fn test_negative_guard_rejected_after_merge() {
        let cli = Cli::try_parse_from(["rfcoex", "analyze", "BLE", "--guard=-2"]).unwrap();
        let Commands::Analyze { analysis, .. } = cli.command else {
            panic!("expected analyze");
        };
        assert!(analysis.apply(&AnalysisOptions::default()).is_err());

        let cli = Cli::try_parse_from(["rfcoex", "pair", "LTE_B13", "GNSS_L1", "--aclr-margin=-1"]).unwrap();
        let Commands::Pair { analysis, .. } = cli.command else {
            panic!("expected pair");
        };
        assert!(analysis.apply(&AnalysisOptions::default()).is_err());
    }

    #[test]
    fn test_perf_preset_override() {
        let cli = Cli::try_parse_from(["rfcoex", "perf", "LTE_B13", "BLE", "--preset", "base_station"]).unwrap();
        let Commands::Perf { codes, preset, .. } = cli.command else {
            panic!("expected perf");
        };
        assert_eq!(codes, vec!["LTE_B13", "BLE"]);
        let config = CoexConfig::default();
        let params = system_parameters(preset.as_deref(), &config).unwrap();
        assert_eq!(params, SystemParameters::preset(Preset::BaseStation));
        assert!(system_parameters(Some("warp_drive"), &config).is_err());
    }

    #[test]
    fn test_selection_fallback() {
        let mut config = CoexConfig::default();
        assert!(selection(Vec::new(), &config).is_err());
        config.selection = vec!["BLE".to_string()];
        assert_eq!(selection(Vec::new(), &config).unwrap(), vec!["BLE"]);
        assert_eq!(selection(vec!["LTE_B1".into()], &config).unwrap(), vec!["LTE_B1"]);
    }
}
