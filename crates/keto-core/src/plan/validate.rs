//! Plan validator.
//!
//! Checks a [`PlanDocument`] against a [`TargetProfile`] and collects every
//! problem it finds rather than stopping at the first one:
//! - All seven top-level fields are present.
//! - The weekly total is a number and within budget.
//! - Each day's protein and calories are within 5% of target.
//! - Each day's net carbs are within 20–30 g when strict keto is requested.
//!
//! Problems are reported in a fixed order (missing fields, then budget,
//! then macros rows in table order) so reports are reproducible.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::target::{KETO_NET_CARBS_G, TargetProfile};

use super::coerce::{display_text, to_number, type_name};
use super::document::{PlanDocument, PlanField, row_get};

/// Broad category of a [`Problem`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProblemKind {
    /// A required field is absent.
    Structural,
    /// A field is present but not a usable number.
    TypeCoercion,
    /// A well-typed value is outside its allowed range.
    Constraint,
    /// The document is not a JSON object at all.
    MalformedInput,
}

/// A single validation finding. `Display` yields the user-facing message.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Problem {
    #[error("Missing key: {0}")]
    MissingField(PlanField),

    #[error("{} is not a number", PlanField::TotalWeeklyCost)]
    CostNotANumber,

    #[error("Budget exceeded: £{total:.2} > £{budget:.2}")]
    BudgetExceeded { total: f64, budget: f64 },

    #[error("{} missing or empty.", PlanField::MacrosTable)]
    MacrosMissing,

    #[error("Invalid macros row encountered.")]
    InvalidMacrosRow { index: usize },

    #[error("Protein off target on {day}: {actual} g vs target {target} g (±5%)")]
    ProteinOffTarget { day: String, actual: f64, target: f64 },

    #[error("Calories off target on {day}: {actual} kcal vs target {target} kcal (±5%)")]
    CaloriesOffTarget { day: String, actual: f64, target: f64 },

    #[error("Net carbs outside 20–30 g on {day}: {actual} g")]
    NetCarbsOutOfRange { day: String, actual: f64 },

    #[error("Plan is not a JSON object (found {found})")]
    NotAnObject { found: &'static str },
}

impl Problem {
    pub fn kind(&self) -> ProblemKind {
        match self {
            Self::MissingField(_) | Self::MacrosMissing => ProblemKind::Structural,
            Self::CostNotANumber | Self::InvalidMacrosRow { .. } => ProblemKind::TypeCoercion,
            Self::BudgetExceeded { .. }
            | Self::ProteinOffTarget { .. }
            | Self::CaloriesOffTarget { .. }
            | Self::NetCarbsOutOfRange { .. } => ProblemKind::Constraint,
            Self::NotAnObject { .. } => ProblemKind::MalformedInput,
        }
    }
}

/// Outcome of validating one plan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    pub problems: Vec<Problem>,
}

impl ValidationReport {
    /// `true` iff no problems were found.
    pub fn passed(&self) -> bool {
        self.problems.is_empty()
    }

    /// Problem messages in the order they were found.
    pub fn messages(&self) -> Vec<String> {
        self.problems.iter().map(ToString::to_string).collect()
    }

    /// The `(passed, messages)` pair shown to users.
    pub fn into_verdict(self) -> (bool, Vec<String>) {
        (self.passed(), self.messages())
    }
}

/// Validate a plan document against the user's targets.
///
/// Never fails: malformed content becomes problems in the report.
pub fn validate(plan: &PlanDocument, target: &TargetProfile) -> ValidationReport {
    let mut problems = Vec::new();

    problems.extend(plan.missing_fields().into_iter().map(Problem::MissingField));

    check_budget(plan, target, &mut problems);
    check_macros(plan, target, &mut problems);

    if problems.is_empty() {
        debug!("plan passed validation");
    } else {
        warn!(count = problems.len(), "plan failed validation");
    }

    ValidationReport { problems }
}

/// Validate an arbitrary JSON value.
///
/// A non-object value yields a single [`Problem::NotAnObject`].
pub fn validate_value(value: &Value, target: &TargetProfile) -> ValidationReport {
    match PlanDocument::from_value(value.clone()) {
        Ok(plan) => validate(&plan, target),
        Err(_) => ValidationReport {
            problems: vec![Problem::NotAnObject {
                found: type_name(value),
            }],
        },
    }
}

fn check_budget(plan: &PlanDocument, target: &TargetProfile, problems: &mut Vec<Problem>) {
    // An absent total is already reported as a missing key.
    let Some(cost) = plan.total_weekly_cost.as_ref() else {
        return;
    };

    match to_number(Some(cost)) {
        Ok(total) if total > target.budget => problems.push(Problem::BudgetExceeded {
            total,
            budget: target.budget,
        }),
        Ok(_) => {}
        Err(e) => {
            debug!(error = %e, "weekly total did not coerce");
            problems.push(Problem::CostNotANumber);
        }
    }
}

fn check_macros(plan: &PlanDocument, target: &TargetProfile, problems: &mut Vec<Problem>) {
    let rows = plan.rows(PlanField::MacrosTable);
    if rows.is_empty() {
        problems.push(Problem::MacrosMissing);
        return;
    }

    for (index, row) in rows.iter().enumerate() {
        let Some(macros) = DayMacros::from_row(row) else {
            debug!(index, "skipping macros row that did not coerce");
            problems.push(Problem::InvalidMacrosRow { index });
            continue;
        };

        if !TargetProfile::within_tolerance(macros.protein_g, target.protein_target_g) {
            problems.push(Problem::ProteinOffTarget {
                day: macros.day.clone(),
                actual: macros.protein_g,
                target: target.protein_target_g,
            });
        }

        if !TargetProfile::within_tolerance(macros.kcal, target.kcal_target) {
            problems.push(Problem::CaloriesOffTarget {
                day: macros.day.clone(),
                actual: macros.kcal,
                target: target.kcal_target,
            });
        }

        if target.keto_strict && !KETO_NET_CARBS_G.contains(&macros.net_carbs_g) {
            problems.push(Problem::NetCarbsOutOfRange {
                day: macros.day,
                actual: macros.net_carbs_g,
            });
        }
    }
}

/// The numeric columns of one macros row after coercion.
struct DayMacros {
    day: String,
    protein_g: f64,
    net_carbs_g: f64,
    kcal: f64,
}

impl DayMacros {
    fn from_row(row: &Value) -> Option<Self> {
        let number = |key: &str| to_number(row_get(row, &[key])).ok();

        let protein_g = number("protein_g")?;
        let net_carbs_g = number("net_carbs_g")?;
        let kcal = number("kcal")?;

        let day = match row_get(row, &["day"]) {
            None | Some(Value::Null) => "?".to_string(),
            day => display_text(day),
        };

        Some(Self {
            day,
            protein_g,
            net_carbs_g,
            kcal,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn target() -> TargetProfile {
        TargetProfile::new(60.0, 165.0, 2200.0, true)
    }

    fn doc(value: Value) -> PlanDocument {
        PlanDocument::from_value(value).expect("test plan should be an object")
    }

    /// A plan with every field present and one passing day.
    fn complete_plan() -> Value {
        json!({
            "shopping_list": [],
            "total_weekly_cost_gbp": 58.40,
            "meal_plan": [],
            "macros_table": [
                {"day": "Mon", "protein_g": 160, "net_carbs_g": 25, "fat_g": 150, "kcal": 2190}
            ],
            "batch_cooking_guide": "",
            "flavour_rotation": [],
            "optional_snacks": []
        })
    }

    #[test]
    fn complete_plan_passes() {
        let report = validate(&doc(complete_plan()), &target());
        assert!(report.passed(), "unexpected problems: {:?}", report.messages());
    }

    #[test]
    fn missing_fields_reported_in_declaration_order() {
        let report = validate(&doc(json!({})), &target());
        let messages = report.messages();
        assert_eq!(
            &messages[..7],
            &[
                "Missing key: shopping_list",
                "Missing key: total_weekly_cost_gbp",
                "Missing key: meal_plan",
                "Missing key: macros_table",
                "Missing key: batch_cooking_guide",
                "Missing key: flavour_rotation",
                "Missing key: optional_snacks",
            ]
        );
        assert_eq!(messages[7], "macros_table missing or empty.");
        assert_eq!(messages.len(), 8);
        assert!(!report.passed());
    }

    #[test]
    fn non_numeric_cost_is_reported() {
        let mut plan = complete_plan();
        plan["total_weekly_cost_gbp"] = json!("cheap");
        let report = validate(&doc(plan), &target());
        assert_eq!(report.problems, vec![Problem::CostNotANumber]);
        assert_eq!(report.messages(), vec!["total_weekly_cost_gbp is not a number"]);
    }

    #[test]
    fn numeric_string_cost_is_accepted() {
        let mut plan = complete_plan();
        plan["total_weekly_cost_gbp"] = json!("59.99");
        assert!(validate(&doc(plan), &target()).passed());
    }

    #[test]
    fn cost_equal_to_budget_passes() {
        let mut plan = complete_plan();
        plan["total_weekly_cost_gbp"] = json!(60);
        assert!(validate(&doc(plan), &target()).passed());
    }

    #[test]
    fn non_object_macros_row_is_invalid() {
        let mut plan = complete_plan();
        plan["macros_table"] = json!(["Mon: 160g"]);
        let report = validate(&doc(plan), &target());
        assert_eq!(report.problems, vec![Problem::InvalidMacrosRow { index: 0 }]);
        assert_eq!(report.messages(), vec!["Invalid macros row encountered."]);
    }

    #[test]
    fn row_missing_a_macro_is_invalid() {
        let mut plan = complete_plan();
        plan["macros_table"] = json!([{"day": "Tue", "protein_g": 165, "kcal": 2200}]);
        let report = validate(&doc(plan), &target());
        assert_eq!(report.problems, vec![Problem::InvalidMacrosRow { index: 0 }]);
    }

    #[test]
    fn invalid_row_does_not_stop_later_rows() {
        let mut plan = complete_plan();
        plan["macros_table"] = json!([
            {"day": "Mon", "protein_g": "lots", "net_carbs_g": 25, "kcal": 2200},
            {"day": "Tue", "protein_g": 100, "net_carbs_g": 25, "kcal": 2200}
        ]);
        let report = validate(&doc(plan), &target());
        assert_eq!(report.problems.len(), 2);
        assert_eq!(report.problems[0], Problem::InvalidMacrosRow { index: 0 });
        assert!(matches!(
            &report.problems[1],
            Problem::ProteinOffTarget { day, .. } if day == "Tue"
        ));
    }

    #[test]
    fn missing_day_is_shown_as_question_mark() {
        let mut plan = complete_plan();
        plan["macros_table"] = json!([{"protein_g": 100, "net_carbs_g": 25, "kcal": 2200}]);
        let report = validate(&doc(plan), &target());
        assert_eq!(
            report.messages(),
            vec!["Protein off target on ?: 100 g vs target 165 g (±5%)"]
        );
    }

    #[test]
    fn one_row_can_fail_every_check() {
        let mut plan = complete_plan();
        plan["macros_table"] = json!([
            {"day": "Wed", "protein_g": 100, "net_carbs_g": 50, "kcal": 3000}
        ]);
        let kinds: Vec<_> = validate(&doc(plan), &target())
            .problems
            .into_iter()
            .map(|p| std::mem::discriminant(&p))
            .collect();
        assert_eq!(kinds.len(), 3);
    }

    #[test]
    fn problem_kinds() {
        assert_eq!(
            Problem::MissingField(PlanField::MealPlan).kind(),
            ProblemKind::Structural
        );
        assert_eq!(Problem::CostNotANumber.kind(), ProblemKind::TypeCoercion);
        assert_eq!(
            Problem::BudgetExceeded {
                total: 1.0,
                budget: 0.5
            }
            .kind(),
            ProblemKind::Constraint
        );
        assert_eq!(
            Problem::NotAnObject { found: "array" }.kind(),
            ProblemKind::MalformedInput
        );
    }

    #[test]
    fn validate_value_rejects_non_object() {
        let report = validate_value(&json!([1, 2, 3]), &target());
        assert!(!report.passed());
        assert_eq!(
            report.messages(),
            vec!["Plan is not a JSON object (found array)"]
        );
    }

    #[test]
    fn validation_does_not_modify_the_document() {
        let plan = doc(complete_plan());
        let before = plan.clone();
        let _ = validate(&plan, &target());
        assert_eq!(plan, before);
    }

    #[test]
    fn into_verdict_pairs_flag_with_messages() {
        let (passed, messages) = validate(&doc(json!({})), &target()).into_verdict();
        assert!(!passed);
        assert_eq!(messages.len(), 8);
    }
}
