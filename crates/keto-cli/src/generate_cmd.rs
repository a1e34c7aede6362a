//! `keto-plan generate` command: ask the model for a plan, then check and render it.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};

use keto_core::llm::CompletionClient;
use keto_core::price_hints::PriceHints;
use keto_core::prompt::build_messages;
use keto_core::{GenerateError, GeneratedPlan, UserProfile, generate_plan, render};

use crate::config::PlannerConfig;

/// Options shared by the real and dry-run paths.
#[derive(Debug, Default)]
pub struct GenerateOptions {
    pub prices: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub report: Option<PathBuf>,
    pub dry_run: bool,
}

impl GenerateOptions {
    fn load_hints(&self) -> Result<Option<PriceHints>> {
        let Some(path) = &self.prices else {
            return Ok(None);
        };
        let hints = PriceHints::from_path(path)
            .with_context(|| format!("failed to load price hints from {}", path.display()))?;
        tracing::info!(rows = hints.len(), path = %path.display(), "loaded price hints");
        Ok(Some(hints))
    }
}

/// Print the messages that would be sent, without calling the model.
pub fn run_dry_run(profile: &UserProfile, options: &GenerateOptions) -> Result<()> {
    profile.validate().context("invalid profile")?;
    let hints = options.load_hints()?;
    let mut out = std::io::stdout().lock();
    for message in build_messages(profile, hints.as_ref()) {
        writeln!(out, "=== {} ===", message.role)?;
        writeln!(out, "{}", message.content)?;
        writeln!(out)?;
    }
    Ok(())
}

/// Run the generate command against the configured model.
pub async fn run_generate(
    config: &PlannerConfig,
    profile: &UserProfile,
    options: &GenerateOptions,
) -> Result<()> {
    let client = config.client();
    let hints = options.load_hints()?;
    let generated = request_plan(&client, profile, hints.as_ref()).await?;
    let mut out = std::io::stdout().lock();
    present(&generated, hints.as_ref(), options, &mut out)
}

async fn request_plan(
    client: &dyn CompletionClient,
    profile: &UserProfile,
    hints: Option<&PriceHints>,
) -> Result<GeneratedPlan> {
    match generate_plan(client, profile, hints).await {
        Ok(generated) => Ok(generated),
        Err(GenerateError::InvalidJson { raw, source }) => {
            eprintln!("Model output (unparsed):");
            eprintln!("{raw}");
            bail!("the model did not return a valid JSON plan: {source}");
        }
        Err(err) => Err(err).context("plan generation failed"),
    }
}

/// Print validation results and the report, and write any requested files.
fn present(
    generated: &GeneratedPlan,
    hints: Option<&PriceHints>,
    options: &GenerateOptions,
    out: &mut dyn Write,
) -> Result<()> {
    if generated.report.passed() {
        writeln!(out, "All checks passed.")?;
    } else {
        writeln!(out, "Validation issues:")?;
        for message in generated.report.messages() {
            writeln!(out, "- {message}")?;
        }
    }
    writeln!(out)?;

    let markdown = render(&generated.document);
    match &options.report {
        Some(path) => {
            std::fs::write(path, &markdown)
                .with_context(|| format!("cannot write report to {}", path.display()))?;
            writeln!(out, "Report written to {}", path.display())?;
        }
        None => writeln!(out, "{markdown}")?,
    }

    if let Some(hints) = hints {
        writeln!(out)?;
        writeln!(out, "## Price hints used")?;
        writeln!(out)?;
        writeln!(out, "{}", hints.render_table())?;
    }

    if let Some(path) = &options.output {
        std::fs::write(path, generated.document.to_export_json())
            .with_context(|| format!("cannot write plan JSON to {}", path.display()))?;
        writeln!(out, "Plan JSON written to {}", path.display())?;
    }

    Ok(())
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
