//! Core logic for keto meal plan generation.
//!
//! The [`plan`] module holds the pure pieces: the lenient [`PlanDocument`]
//! view over model output, the validator and the markdown renderer. The
//! remaining modules build the request that is sent to the model
//! ([`profile`], [`prompt`], [`price_hints`]) and perform the call
//! ([`llm`], [`generate`]).

pub mod generate;
pub mod llm;
pub mod plan;
pub mod price_hints;
pub mod profile;
pub mod prompt;
pub mod target;

pub use generate::{GenerateError, GeneratedPlan, generate_plan};
pub use plan::{PlanDocument, PlanError, Problem, ProblemKind, ValidationReport, render, validate};
pub use profile::UserProfile;
pub use target::TargetProfile;
