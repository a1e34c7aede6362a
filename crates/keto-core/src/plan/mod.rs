//! Plan handling: lenient document view, coercion, validation, rendering.

pub mod coerce;
pub mod document;
pub mod render;
pub mod validate;

pub use coerce::{CoercionError, display_text, format_money, to_number};
pub use document::{PlanDocument, PlanError, PlanField};
pub use render::render;
pub use validate::{Problem, ProblemKind, ValidationReport, validate, validate_value};
