//! `keto-plan validate` command: check a saved plan against targets.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde_json::Value;

use keto_core::plan::{ValidationReport, validate_value};
use keto_core::target::TargetProfile;

/// Read a plan file as JSON. Any JSON value is accepted; shape problems are
/// reported by the validator.
pub fn read_plan_file(path: &Path) -> Result<Value> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read plan file {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("{} is not valid JSON", path.display()))
}

/// Run the validate command. Fails if the plan has any problems.
pub fn run_validate(path: &Path, target: &TargetProfile) -> Result<()> {
    let plan = read_plan_file(path)?;
    let report = validate_value(&plan, target);
    print_report(&report, &mut std::io::stdout().lock())?;
    if !report.passed() {
        bail!(
            "plan failed validation with {} problem(s)",
            report.problems.len()
        );
    }
    Ok(())
}

fn print_report(report: &ValidationReport, out: &mut dyn Write) -> Result<()> {
    if report.passed() {
        writeln!(out, "PASS: plan meets budget and macro targets")?;
        return Ok(());
    }
    writeln!(out, "FAIL:")?;
    for problem in &report.problems {
        writeln!(out, "  [{:?}] {problem}", problem.kind())?;
    }
    Ok(())
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
