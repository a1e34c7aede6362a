//! Plan generation: profile check, prompt, model call, parse, validate.
//!
//! One request, no retries. The model's output is untrusted, so a response
//! that parses but fails validation is still returned to the caller with its
//! [`ValidationReport`]; only unusable responses are errors.

use thiserror::Error;
use tracing::{info, warn};

use crate::llm::{CompletionClient, LlmError};
use crate::plan::{PlanDocument, PlanError, ValidationReport, validate};
use crate::price_hints::PriceHints;
use crate::profile::{ProfileError, UserProfile};
use crate::prompt::build_messages;

/// Errors that prevent a plan from being produced at all.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("invalid profile: {0}")]
    Profile(#[from] ProfileError),

    #[error(transparent)]
    Llm(#[from] LlmError),

    /// The model's reply is not a JSON object. `raw` is kept for display.
    #[error("the model did not return a valid JSON plan: {source}")]
    InvalidJson {
        raw: String,
        #[source]
        source: PlanError,
    },
}

/// A plan as returned by the model, with its validation outcome.
#[derive(Debug, Clone)]
pub struct GeneratedPlan {
    /// Exact text returned by the model.
    pub raw: String,
    pub document: PlanDocument,
    pub report: ValidationReport,
}

/// Ask the model for a plan and validate it against the profile's targets.
pub async fn generate_plan(
    client: &dyn CompletionClient,
    profile: &UserProfile,
    hints: Option<&PriceHints>,
) -> Result<GeneratedPlan, GenerateError> {
    profile.validate()?;

    let messages = build_messages(profile, hints);
    info!(
        model = client.model(),
        price_hints = hints.map_or(0, PriceHints::len),
        "requesting meal plan"
    );

    let raw = client.complete(&messages).await?;

    let document = match PlanDocument::from_json_str(&raw) {
        Ok(doc) => doc,
        Err(source) => {
            warn!(error = %source, "model response is not a JSON object");
            return Err(GenerateError::InvalidJson { raw, source });
        }
    };

    let report = validate(&document, &profile.target_profile());
    info!(
        passed = report.passed(),
        problems = report.problems.len(),
        "meal plan generated"
    );

    Ok(GeneratedPlan {
        raw,
        document,
        report,
    })
}
