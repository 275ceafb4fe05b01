//! Plain-text rendering for the terminal.

use std::fmt::{self, Write};

use serde_json::{Value, json};
use smallcell_core::assessment::Assessment;
use smallcell_core::chart::{StepKind, loss_waterfall};
use smallcell_core::propagation::ModelComparison;
use smallcell_core::scenario::ScenarioConfig;

/// One line of a batch run.
#[derive(Debug)]
pub struct BatchRow {
    pub name: String,
    pub result: Result<Assessment, String>,
}

// String sinks cannot fail, so the fmt::Result of the writers below is
// dropped by the public wrappers.

fn scenario_header<W: Write>(w: &mut W, c: &ScenarioConfig) -> fmt::Result {
    writeln!(
        w,
        "{} @ {} MHz, {} m, {} ({}), {}",
        c.technology.generation(),
        c.frequency_mhz,
        c.distance_m,
        c.environment,
        if c.line_of_sight { "LOS" } else { "NLOS" },
        c.facade_material.label()
    )
}

fn write_assessment<W: Write>(w: &mut W, a: &Assessment) -> fmt::Result {
    let lb = &a.link_budget;
    scenario_header(w, &a.config)?;
    writeln!(w, "  {}", a.config.environment.description())?;
    writeln!(w)?;

    // ── Budget ──────────────────────────────────────────────────
    for step in loss_waterfall(lb, a.config.rx_gain_dbi) {
        match step.kind {
            StepKind::Level => writeln!(w, "  {:<22} {:>9.2} dBm", step.label, step.value_db)?,
            StepKind::Delta => writeln!(w, "  {:<22} {:>+9.2} dB", step.label, step.value_db)?,
        }
    }
    writeln!(w, "  {:<22} {:>9.1} W", "EIRP (linear)", a.config.eirp_watt())?;
    writeln!(w, "  {:<22} {:>9}", "Model", lb.model.to_string())?;
    writeln!(
        w,
        "  {:<22} {:>9.2} dB ({} to {})",
        "Model spread",
        a.model_spread.uncertainty_db,
        a.model_spread.optimistic,
        a.model_spread.pessimistic
    )?;
    writeln!(w, "  {:<22} {:>9}", "Signal quality", lb.quality.to_string())?;
    writeln!(
        w,
        "  {:<22} {:>9.2} dBm ({})",
        "Threshold", a.threshold_dbm, a.config.service_type
    )?;
    writeln!(w, "  {:<22} {:>+9.2} dB", "Margin", a.margin_db)?;

    // ── Coverage ────────────────────────────────────────────────
    if let Some(est) = &a.coverage {
        writeln!(
            w,
            "  {:<22} {:>9.1} %  (sigma {} dB)",
            "Coverage probability",
            est.percent(),
            est.sigma_db
        )?;
    }
    writeln!(
        w,
        "  {:<22} {:>9.1} %  (below {:.1} %)",
        "Share above threshold",
        a.distribution.share_above * 100.0,
        a.distribution.share_below * 100.0
    )?;
    if let (Some(required), Some(deficit)) = (a.required_margin_db, a.margin_deficit_db) {
        writeln!(
            w,
            "  {:<22} {:>9.2} dB (deficit {:+.2} dB)",
            format!("Margin for {:.0}%", a.target_reliability * 100.0),
            required,
            deficit
        )?;
    }

    writeln!(w)?;
    writeln!(w, "Recommendation: {}", a.recommendation)?;
    writeln!(w, "  {}", a.recommendation.guidance())?;

    let warnings = a.warnings();
    if !warnings.is_empty() {
        writeln!(w)?;
        writeln!(w, "Warnings:")?;
        for warning in &warnings {
            writeln!(w, "  - {warning}")?;
        }
    }
    Ok(())
}

pub fn assessment_text(a: &Assessment) -> String {
    let mut out = String::with_capacity(1024);
    let _ = write_assessment(&mut out, a);
    out
}

fn write_comparison<W: Write>(
    w: &mut W,
    c: &ScenarioConfig,
    cmp: &ModelComparison,
) -> fmt::Result {
    scenario_header(w, c)?;
    writeln!(w)?;
    writeln!(w, "  {:<18} {:>10}  {}", "Model", "Loss (dB)", "Domain")?;
    for r in &cmp.results {
        let domain = if r.is_valid { "ok" } else { "outside" };
        writeln!(w, "  {:<18} {:>10.2}  {domain}", r.model.to_string(), r.path_loss_db)?;
    }
    writeln!(w)?;
    writeln!(
        w,
        "  optimistic  {} ({:.2} dB)",
        cmp.spread.optimistic, cmp.spread.optimistic_db
    )?;
    writeln!(
        w,
        "  pessimistic {} ({:.2} dB)",
        cmp.spread.pessimistic, cmp.spread.pessimistic_db
    )?;
    writeln!(w, "  uncertainty {:.2} dB", cmp.spread.uncertainty_db)?;

    let warnings: Vec<&String> = cmp.results.iter().flat_map(|r| &r.warnings).collect();
    if !warnings.is_empty() {
        writeln!(w)?;
        writeln!(w, "Warnings:")?;
        for warning in warnings {
            writeln!(w, "  - {warning}")?;
        }
    }
    Ok(())
}

pub fn comparison_text(c: &ScenarioConfig, cmp: &ModelComparison) -> String {
    let mut out = String::with_capacity(1024);
    let _ = write_comparison(&mut out, c, cmp);
    out
}

fn write_batch<W: Write>(w: &mut W, rows: &[BatchRow]) -> fmt::Result {
    writeln!(
        w,
        "{:<36} {:>4} {:>8} {:>10} {:>7}  {}",
        "Scenario", "Tech", "Dist (m)", "RSRP (dBm)", "P (%)", "Recommendation"
    )?;
    for row in rows {
        match &row.result {
            Ok(a) => {
                let probability = a
                    .probability()
                    .map_or_else(|| "-".to_string(), |p| format!("{:.1}", p * 100.0));
                writeln!(
                    w,
                    "{:<36} {:>4} {:>8} {:>10.2} {:>7}  {}",
                    row.name,
                    a.config.technology.generation(),
                    a.config.distance_m,
                    a.link_budget.rsrp_dbm,
                    probability,
                    a.recommendation
                )?;
            }
            Err(e) => writeln!(w, "{:<36} error: {e}", row.name)?,
        }
    }
    Ok(())
}

pub fn batch_text(rows: &[BatchRow]) -> String {
    let mut out = String::with_capacity(128 * (rows.len() + 1));
    let _ = write_batch(&mut out, rows);
    out
}

/// `[{ "name", "assessment" }]` or `[{ "name", "error" }]` per row.
pub fn batch_json(rows: &[BatchRow]) -> Result<Value, serde_json::Error> {
    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        out.push(match &row.result {
            Ok(a) => json!({ "name": row.name, "assessment": serde_json::to_value(a)? }),
            Err(e) => json!({ "name": row.name, "error": e }),
        });
    }
    Ok(Value::Array(out))
}
