//! `keto-plan render` command: turn a saved plan into a markdown report.

use std::path::Path;

use anyhow::{Context, Result};

use keto_core::plan::render::render_value;

use crate::validate_cmd::read_plan_file;

/// Render the plan at `path` to `output`, or stdout when no output is given.
pub fn run_render(path: &Path, output: Option<&Path>) -> Result<()> {
    let plan = read_plan_file(path)?;
    let markdown = render_value(&plan);

    match output {
        Some(out) => {
            std::fs::write(out, &markdown)
                .with_context(|| format!("cannot write report to {}", out.display()))?;
            println!("Report written to {}", out.display());
        }
        None => println!("{markdown}"),
    }
    Ok(())
}
