//! Report export: CSV parameter sheet, Markdown report, JSON.
//!
//! Everything renders into a `String`; writing it to disk is the caller's
//! business.

use std::fmt::{self, Write};
use std::str::FromStr;

use chrono::NaiveDateTime;

use crate::assessment::Assessment;
use crate::error::AdvisorError;
use crate::scenario::Technology;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Markdown,
    Json,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Markdown => "md",
            ExportFormat::Json => "json",
        }
    }

    pub fn render(self, assessment: &Assessment) -> Result<String, serde_json::Error> {
        match self {
            ExportFormat::Csv => Ok(to_csv(assessment)),
            ExportFormat::Markdown => Ok(to_markdown(assessment)),
            ExportFormat::Json => to_json(assessment),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Csv => write!(f, "csv"),
            ExportFormat::Markdown => write!(f, "markdown"),
            ExportFormat::Json => write!(f, "json"),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = AdvisorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "md" | "markdown" => Ok(ExportFormat::Markdown),
            "json" => Ok(ExportFormat::Json),
            other => Err(AdvisorError::UnknownVariant {
                kind: "export format",
                value: other.to_string(),
                expected: "csv, markdown, json",
            }),
        }
    }
}

/// `rf_planning_<4G|5G>_<YYYYmmdd_HHMMSS>.<ext>`
pub fn default_file_name(
    technology: Technology,
    format: ExportFormat,
    at: NaiveDateTime,
) -> String {
    format!(
        "rf_planning_{}_{}.{}",
        technology.generation(),
        at.format("%Y%m%d_%H%M%S"),
        format.extension()
    )
}

// ── CSV ─────────────────────────────────────────────────────────────

/// Ordered `(parameter, value)` pairs shared by the CSV and Markdown views.
pub fn parameter_rows(a: &Assessment) -> Vec<(&'static str, String)> {
    let c = &a.config;
    let lb = &a.link_budget;
    let mut rows = vec![
        ("Technology", c.technology.generation().to_string()),
        ("Frequency (MHz)", c.frequency_mhz.to_string()),
        ("Distance (m)", c.distance_m.to_string()),
        ("Environment", c.environment.to_string()),
        ("Line of sight", c.line_of_sight.to_string()),
        ("Facade material", c.facade_material.label()),
        ("Service", c.service_type.to_string()),
        ("Propagation model", lb.model.to_string()),
        ("EIRP (dBm)", format!("{:.2}", lb.eirp_dbm)),
        ("EIRP (W)", format!("{:.1}", c.eirp_watt())),
        ("Outdoor path loss (dB)", format!("{:.2}", lb.outdoor_path_loss_db)),
        ("Building entry loss (dB)", format!("{:.2}", lb.building_entry_loss_db)),
        ("RSRP (dBm)", format!("{:.2}", lb.rsrp_dbm)),
        ("RSRP threshold (dBm)", format!("{:.2}", a.threshold_dbm)),
        ("Margin (dB)", format!("{:.2}", a.margin_db)),
        ("Signal quality", lb.quality.to_string()),
        (
            "Small cell",
            if a.recommendation.needs_small_cell() { "yes" } else { "no" }.to_string(),
        ),
    ];
    if let Some(est) = &a.coverage {
        rows.push(("Coverage probability (%)", format!("{:.1}", est.percent())));
        rows.push(("Shadowing sigma (dB)", est.sigma_db.to_string()));
    }
    if let Some(m) = a.required_margin_db {
        rows.push((
            "Required margin (dB)",
            format!("{m:.2} for {:.0}%", a.target_reliability * 100.0),
        ));
    }
    rows.push((
        "Share above threshold (%)",
        format!("{:.1}", a.distribution.share_above * 100.0),
    ));
    rows.push(("Recommendation", a.recommendation.to_string()));
    rows
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Two-column `parameter,value` sheet.
pub fn to_csv(a: &Assessment) -> String {
    let mut out = String::from("parameter,value\n");
    for (name, value) in parameter_rows(a) {
        out.push_str(&csv_field(name));
        out.push(',');
        out.push_str(&csv_field(&value));
        out.push('\n');
    }
    out
}

// ── Markdown ────────────────────────────────────────────────────────

pub fn write_markdown<W: Write>(w: &mut W, a: &Assessment) -> fmt::Result {
    writeln!(w, "# Indoor coverage assessment ({})", a.config.technology.generation())?;
    writeln!(w)?;
    writeln!(w, "**Recommendation:** {}", a.recommendation)?;
    writeln!(w)?;
    writeln!(w, "| Parameter | Value |")?;
    writeln!(w, "|-----------|-------|")?;
    for (name, value) in parameter_rows(a) {
        writeln!(w, "| {name} | {} |", value.replace('|', "\\|"))?;
    }

    let warnings = a.warnings();
    if !warnings.is_empty() {
        writeln!(w)?;
        writeln!(w, "## Warnings")?;
        writeln!(w)?;
        for warning in &warnings {
            writeln!(w, "- {warning}")?;
        }
    }

    writeln!(w)?;
    writeln!(w, "## Summary")?;
    writeln!(w)?;
    writeln!(w, "{}", a.summary())
}

pub fn to_markdown(a: &Assessment) -> String {
    let mut out = String::with_capacity(2048);
    // fmt::Write for String is infallible.
    let _ = write_markdown(&mut out, a);
    out
}

// ── JSON ────────────────────────────────────────────────────────────

pub fn to_json(a: &Assessment) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(a)
}
