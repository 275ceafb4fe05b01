//! SmallCell Advisor
//!
//! Command-line front-end to the link-budget engine.
//!
//! - `assess` evaluates one scenario and prints or exports the report
//! - `compare` runs every propagation model on the same scenario
//! - `batch` assesses each `[[scenarios]]` entry of a config file
//! - `distance`, `margin` and `power` expose the GPS, fade-margin and unit
//!   helpers

mod output;

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use smallcell_core::assessment::{AssessOptions, DecisionMode, assess, assess_cached};
use smallcell_core::coverage::required_margin_for_reliability;
use smallcell_core::export::{ExportFormat, default_file_name};
use smallcell_core::geo::{self, GeoPoint};
use smallcell_core::error::AdvisorError;
use smallcell_core::propagation::{ComparisonCache, PropagationModel, compare_models};
use smallcell_core::scenario::{
    Environment, FacadeMaterial, ScenarioConfig, ScenarioFile, ScenarioInput, ServiceType,
    Technology,
};
use smallcell_core::units;
use tracing_subscriber::EnvFilter;

/// Indoor coverage assessment and small cell recommendation.
#[derive(Parser, Debug)]
#[command(name = "smallcell-advisor", version, about)]
struct Cli {
    /// Debug-level logging (overridden by RUST_LOG).
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Assess one scenario.
    Assess {
        #[command(flatten)]
        scenario: ScenarioArgs,

        /// Report format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Write the report here instead of stdout. A directory gets a
        /// timestamped file name.
        #[arg(long)]
        output: Option<PathBuf>,

        /// Decide on mean RSRP only, without shadowing statistics.
        #[arg(long, default_value_t = false)]
        deterministic: bool,

        /// Propagation model feeding the link budget.
        #[arg(long, default_value = "itu_p1411")]
        model: PropagationModel,
    },
    /// Path loss of every model for one scenario.
    Compare {
        #[command(flatten)]
        scenario: ScenarioArgs,
    },
    /// Assess every scenario of a config file.
    Batch {
        /// TOML file with `[[scenarios]]` entries.
        #[arg(long)]
        config: PathBuf,

        #[arg(long, value_enum, default_value_t = BatchFormat::Text)]
        format: BatchFormat,

        #[arg(long, default_value_t = false)]
        deterministic: bool,
    },
    /// Distance between two GPS points.
    Distance {
        /// `LAT,LON[,ALT_M]` of the macro site.
        #[arg(long, value_parser = parse_point)]
        from: GeoPoint,

        /// `LAT,LON[,ALT_M]` of the building.
        #[arg(long, value_parser = parse_point)]
        to: GeoPoint,
    },
    /// Shadowing margin needed for a target reliability.
    Margin {
        /// Shadowing standard deviation in dB.
        #[arg(long)]
        sigma: f64,

        /// Target coverage probability, strictly between 0 and 1.
        #[arg(long, default_value_t = 0.95)]
        target: f64,
    },
    /// Convert a power level or gain between log and linear units.
    Power {
        #[arg(allow_negative_numbers = true)]
        value: f64,

        /// Unit of VALUE.
        #[arg(long, value_enum, default_value_t = PowerUnit::Dbm)]
        from: PowerUnit,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PowerUnit {
    Dbm,
    Watt,
    Db,
    Linear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Csv,
    Markdown,
}

impl OutputFormat {
    fn export(self) -> Option<ExportFormat> {
        match self {
            OutputFormat::Text => None,
            OutputFormat::Json => Some(ExportFormat::Json),
            OutputFormat::Csv => Some(ExportFormat::Csv),
            OutputFormat::Markdown => Some(ExportFormat::Markdown),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum BatchFormat {
    Text,
    Json,
}

/// Scenario flags shared by `assess` and `compare`. Anything set here
/// overrides the config file.
#[derive(Args, Debug, Default)]
struct ScenarioArgs {
    /// TOML scenario file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// lte (4G) or nr (5G).
    #[arg(long)]
    technology: Option<Technology>,

    /// Carrier frequency in MHz.
    #[arg(long = "frequency")]
    frequency_mhz: Option<f64>,

    /// Transmit power in dBm.
    #[arg(long = "tx-power")]
    tx_power_dbm: Option<f64>,

    /// Transmit antenna gain in dBi.
    #[arg(long = "tx-gain", allow_negative_numbers = true)]
    tx_gain_dbi: Option<f64>,

    /// Receive antenna gain in dBi.
    #[arg(long = "rx-gain", allow_negative_numbers = true)]
    rx_gain_dbi: Option<f64>,

    /// Site-to-building distance in metres.
    #[arg(long = "distance")]
    distance_m: Option<f64>,

    /// Base station antenna height in metres.
    #[arg(long = "bs-height")]
    bs_height_m: Option<f64>,

    /// Terminal height in metres.
    #[arg(long = "ue-height")]
    ue_height_m: Option<f64>,

    /// rural, suburban, urban or urban_dense.
    #[arg(long)]
    environment: Option<Environment>,

    /// Force line of sight.
    #[arg(long, conflicts_with = "nlos")]
    los: bool,

    /// Force non line of sight.
    #[arg(long)]
    nlos: bool,

    /// Facade material, e.g. standard_wall.
    #[arg(long)]
    facade: Option<FacadeMaterial>,

    /// Target service, e.g. video_hd.
    #[arg(long)]
    service: Option<ServiceType>,

    /// Shadowing standard deviation in dB.
    #[arg(long = "sigma")]
    shadowing_sigma_db: Option<f64>,

    /// Explicit RSRP threshold in dBm, replacing the service default.
    #[arg(long = "threshold", allow_negative_numbers = true)]
    rsrp_threshold_dbm: Option<f64>,
}

impl ScenarioArgs {
    fn overrides(&self) -> ScenarioInput {
        let line_of_sight = match (self.los, self.nlos) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };
        ScenarioInput {
            name: None,
            technology: self.technology,
            frequency_mhz: self.frequency_mhz,
            tx_power_dbm: self.tx_power_dbm,
            tx_gain_dbi: self.tx_gain_dbi,
            rx_gain_dbi: self.rx_gain_dbi,
            distance_m: self.distance_m,
            bs_height_m: self.bs_height_m,
            ue_height_m: self.ue_height_m,
            environment: self.environment,
            line_of_sight,
            facade_material: self.facade,
            service_type: self.service,
            shadowing_sigma_db: self.shadowing_sigma_db,
            rsrp_threshold_dbm: self.rsrp_threshold_dbm,
        }
    }

    fn load(&self) -> anyhow::Result<ScenarioConfig> {
        let base = match &self.config {
            Some(path) => load_file(path)?.single(),
            None => ScenarioInput::default(),
        };
        let config = base
            .merged_with(self.overrides())
            .resolve()
            .context("invalid scenario")?;
        Ok(config)
    }
}

fn load_file(path: &Path) -> anyhow::Result<ScenarioFile> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    ScenarioFile::from_toml_str(&text)
        .with_context(|| format!("failed to parse {}", path.display()))
}

fn convert_power(value: f64, from: PowerUnit) -> Result<String, AdvisorError> {
    Ok(match from {
        PowerUnit::Dbm => format!("{value} dBm = {} W", units::dbm_to_watt(value)),
        PowerUnit::Watt => format!("{value} W = {:.2} dBm", units::watt_to_dbm(value)?),
        PowerUnit::Db => format!("{value} dB = {} (linear)", units::db_to_linear(value)),
        PowerUnit::Linear => format!("{value} = {:.2} dB", units::linear_to_db(value)?),
    })
}

/// `LAT,LON` or `LAT,LON,ALT_M`.
fn parse_point(s: &str) -> Result<GeoPoint, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    let num = |v: &str| v.parse::<f64>().map_err(|e| format!("'{v}': {e}"));
    match parts.as_slice() {
        [lat, lon] => Ok(GeoPoint::new(num(lat)?, num(lon)?)),
        [lat, lon, alt] => Ok(GeoPoint::new(num(lat)?, num(lon)?).with_altitude(num(alt)?)),
        _ => Err(format!("expected LAT,LON[,ALT_M], got '{s}'")),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    run(cli.command)
}

fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Assess {
            scenario,
            format,
            output: out_path,
            deterministic,
            model,
        } => {
            let config = scenario.load()?;
            let options = AssessOptions {
                model,
                mode: decision_mode(deterministic),
                ..Default::default()
            };
            let assessment = assess(&config, &options)?;

            let rendered = match format.export() {
                Some(export) => export
                    .render(&assessment)
                    .context("failed to render report")?,
                None => output::assessment_text(&assessment),
            };
            match out_path {
                Some(path) => {
                    let path = output_path(&path, config.technology, format);
                    std::fs::write(&path, rendered)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    tracing::info!(path = %path.display(), "report written");
                }
                None => print!("{rendered}"),
            }
        }

        Command::Compare { scenario } => {
            let config = scenario.load()?;
            print!("{}", output::comparison_text(&config, &compare_models(&config)));
        }

        Command::Batch {
            config,
            format,
            deterministic,
        } => {
            let file = load_file(&config)?;
            let options = AssessOptions {
                mode: decision_mode(deterministic),
                ..Default::default()
            };
            let mut cache = ComparisonCache::new();
            let rows: Vec<output::BatchRow> = file
                .batch()
                .into_iter()
                .enumerate()
                .map(|(i, input)| {
                    let name = input
                        .name
                        .clone()
                        .unwrap_or_else(|| format!("scenario {}", i + 1));
                    let result = input
                        .resolve()
                        .and_then(|cfg| assess_cached(&cfg, &options, &mut cache))
                        .map_err(|e| e.to_string());
                    if let Err(e) = &result {
                        tracing::warn!(scenario = %name, error = %e, "scenario failed");
                    }
                    output::BatchRow { name, result }
                })
                .collect();
            let (hits, misses) = cache.stats();
            tracing::debug!(hits, misses, "model comparison cache");

            match format {
                BatchFormat::Text => print!("{}", output::batch_text(&rows)),
                BatchFormat::Json => {
                    let json = output::batch_json(&rows).context("failed to render batch")?;
                    println!("{json:#}");
                }
            }

            let failed = rows.iter().filter(|r| r.result.is_err()).count();
            if failed > 0 {
                bail!("{failed} of {} scenarios failed", rows.len());
            }
        }

        Command::Distance { from, to } => {
            let ground = geo::haversine_distance_m(&from, &to)?;
            let slant = geo::distance_3d_m(&from, &to)?;
            println!("ground distance: {ground:.1} m");
            println!("slant distance:  {slant:.1} m");
        }

        Command::Margin { sigma, target } => {
            let margin = required_margin_for_reliability(sigma, target)?;
            println!(
                "required margin for {:.1}% coverage at sigma {sigma} dB: {margin:.2} dB",
                target * 100.0
            );
        }

        Command::Power { value, from } => println!("{}", convert_power(value, from)?),
    }
    Ok(())
}

fn decision_mode(deterministic: bool) -> DecisionMode {
    if deterministic {
        DecisionMode::Deterministic
    } else {
        DecisionMode::Probabilistic
    }
}

/// Directories get `rf_planning_<tech>_<timestamp>.<ext>` appended.
fn output_path(path: &Path, technology: Technology, format: OutputFormat) -> PathBuf {
    if !path.is_dir() {
        return path.to_path_buf();
    }
    let now = chrono::Local::now().naive_local();
    let name = match format.export() {
        Some(export) => default_file_name(technology, export, now),
        None => format!(
            "rf_planning_{}_{}.txt",
            technology.generation(),
            now.format("%Y%m%d_%H%M%S")
        ),
    };
    path.join(name)
}
