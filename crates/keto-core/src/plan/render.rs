//! Markdown report for a plan document.
//!
//! Rendering works on invalid plans too, so users can see what the model
//! produced even when it failed validation. Missing or wrong-typed values
//! render blank; list sections that are not arrays render as empty.

use serde_json::Value;

use super::coerce::{display_text, format_money};
use super::document::{PlanDocument, PlanField, row_get};

pub const REPORT_TITLE: &str = "# 7-Day Keto Meal Plan (Aldi UK)";

const SHOPPING_HEADER: &str = "| Product | Pack size | Unit price | Qty | Line total |";
const SHOPPING_ALIGN: &str = "|---|---:|---:|---:|---:|";
const MACROS_HEADER: &str = "| Day | Protein (g) | Net Carbs (g) | Fat (g) | kcal |";
const MACROS_ALIGN: &str = "|---|---:|---:|---:|---:|";
const SNACKS_HEADER: &str = "| Item | Serving | Protein (g) | Net Carbs (g) | Fat (g) | kcal | Price |";
const SNACKS_ALIGN: &str = "|---|---|---:|---:|---:|---:|---:|";

/// Render a plan as a markdown report.
///
/// Deterministic: the same document always yields the same text.
pub fn render(plan: &PlanDocument) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push(REPORT_TITLE.to_string());
    lines.push(String::new());
    lines.push(format!(
        "**Total weekly cost:** {}",
        format_money(plan.field(PlanField::TotalWeeklyCost))
    ));
    lines.push(String::new());

    render_shopping_list(plan, &mut lines);
    render_meal_plan(plan, &mut lines);
    render_macros(plan, &mut lines);

    lines.push("## Batch Cooking Guide".to_string());
    lines.push(display_text(plan.field(PlanField::BatchCookingGuide)));
    lines.push(String::new());

    lines.push("## Flavour Rotation".to_string());
    for flavour in plan.rows(PlanField::FlavourRotation) {
        lines.push(format!("- {}", display_text(Some(flavour))));
    }
    lines.push(String::new());

    render_snacks(plan, &mut lines);

    lines.join("\n")
}

/// Render an arbitrary JSON value; non-objects render as an empty plan.
pub fn render_value(value: &Value) -> String {
    let plan = PlanDocument::from_value(value.clone()).unwrap_or_default();
    render(&plan)
}

fn render_shopping_list(plan: &PlanDocument, lines: &mut Vec<String>) {
    lines.push("## Shopping List".to_string());
    let items = plan.rows(PlanField::ShoppingList);
    if !items.is_empty() {
        lines.push(SHOPPING_HEADER.to_string());
        lines.push(SHOPPING_ALIGN.to_string());
        for item in items {
            lines.push(table_row(&[
                cell(item, &["name"]),
                cell(item, &["pack_size"]),
                format_money(row_get(item, &["unit_price_gbp", "unit_price"])),
                cell(item, &["quantity"]),
                format_money(row_get(item, &["line_total_gbp", "line_total"])),
            ]));
        }
    }
    lines.push(String::new());
}

fn render_meal_plan(plan: &PlanDocument, lines: &mut Vec<String>) {
    lines.push("## Meal Plan".to_string());
    for day in plan.rows(PlanField::MealPlan) {
        // Two trailing spaces force a markdown line break after the header.
        lines.push(format!("**{}**  ", cell(day, &["day"])));
        lines.push(format!("- Meal 1: {}", cell(day, &["meal_1"])));
        lines.push(format!("- Meal 2: {}", cell(day, &["meal_2"])));
        lines.push(String::new());
    }
}

fn render_macros(plan: &PlanDocument, lines: &mut Vec<String>) {
    lines.push("## Macros".to_string());
    lines.push(MACROS_HEADER.to_string());
    lines.push(MACROS_ALIGN.to_string());
    for row in plan.rows(PlanField::MacrosTable) {
        lines.push(table_row(&[
            cell(row, &["day"]),
            cell(row, &["protein_g"]),
            cell(row, &["net_carbs_g"]),
            cell(row, &["fat_g"]),
            cell(row, &["kcal"]),
        ]));
    }
    lines.push(String::new());
}

fn render_snacks(plan: &PlanDocument, lines: &mut Vec<String>) {
    let snacks = plan.rows(PlanField::OptionalSnacks);
    if snacks.is_empty() {
        return;
    }

    lines.push("## Optional Snacks".to_string());
    lines.push(SNACKS_HEADER.to_string());
    lines.push(SNACKS_ALIGN.to_string());
    for snack in snacks {
        lines.push(table_row(&[
            cell(snack, &["name"]),
            cell(snack, &["serving_desc"]),
            cell(snack, &["protein_g"]),
            cell(snack, &["net_carbs_g"]),
            cell(snack, &["fat_g"]),
            cell(snack, &["kcal"]),
            format_money(row_get(snack, &["price_gbp", "price"])),
        ]));
    }
    lines.push(String::new());
}

fn cell(row: &Value, keys: &[&str]) -> String {
    display_text(row_get(row, keys))
}

fn table_row(cells: &[String]) -> String {
    format!("| {} |", cells.join(" | "))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn doc(value: Value) -> PlanDocument {
        PlanDocument::from_value(value).expect("test plan should be an object")
    }

    #[test]
    fn empty_plan_renders_every_fixed_section() {
        let out = render(&doc(json!({})));
        let expected = [
            REPORT_TITLE,
            "",
            "**Total weekly cost:** ",
            "",
            "## Shopping List",
            "",
            "## Meal Plan",
            "## Macros",
            MACROS_HEADER,
            MACROS_ALIGN,
            "",
            "## Batch Cooking Guide",
            "",
            "",
            "## Flavour Rotation",
            "",
        ]
        .join("\n");
        assert_eq!(out, expected);
    }

    #[test]
    fn shopping_list_table_formats_money() {
        let out = render(&doc(json!({
            "shopping_list": [
                {"name": "Eggs", "pack_size": "15", "unit_price_gbp": 2.49, "quantity": 2, "line_total_gbp": "4.98"}
            ]
        })));
        assert!(out.contains(SHOPPING_HEADER));
        assert!(out.contains("| Eggs | 15 | £2.49 | 2 | £4.98 |"), "got:\n{out}");
    }

    #[test]
    fn shopping_money_fallback_drops_symbol() {
        let out = render(&doc(json!({
            "shopping_list": [{"name": "Salmon", "unit_price_gbp": "varies"}]
        })));
        assert!(out.contains("| Salmon |  | varies |  |  |"), "got:\n{out}");
    }

    #[test]
    fn total_cost_is_money_formatted() {
        let out = render(&doc(json!({"total_weekly_cost_gbp": 58.4})));
        assert!(out.contains("**Total weekly cost:** £58.40"));

        let out = render(&doc(json!({"total_weekly_cost_gbp": "unknown"})));
        assert!(out.contains("**Total weekly cost:** unknown"));
    }

    #[test]
    fn meal_plan_blocks_fall_back_to_blank() {
        let out = render(&doc(json!({
            "meal_plan": [
                {"day": "Mon", "meal_1": "Chicken thighs 250 g", "meal_2": "Beef chilli 300 g"},
                {"day": "Tue"}
            ]
        })));
        assert!(out.contains(
            "**Mon**  \n- Meal 1: Chicken thighs 250 g\n- Meal 2: Beef chilli 300 g\n"
        ));
        assert!(out.contains("**Tue**  \n- Meal 1: \n- Meal 2: \n"));
    }

    #[test]
    fn macros_values_are_inserted_raw() {
        let out = render(&doc(json!({
            "macros_table": [
                {"day": "Mon", "protein_g": 160, "net_carbs_g": 25.5, "fat_g": "150", "kcal": 2190}
            ]
        })));
        assert!(out.contains("| Mon | 160 | 25.5 | 150 | 2190 |"), "got:\n{out}");
    }

    #[test]
    fn guide_and_flavours_render_verbatim() {
        let out = render(&doc(json!({
            "batch_cooking_guide": "Sunday: roast everything.",
            "flavour_rotation": ["Smoky paprika", "Lemon & herb"]
        })));
        assert!(out.contains("## Batch Cooking Guide\nSunday: roast everything.\n"));
        assert!(out.contains("## Flavour Rotation\n- Smoky paprika\n- Lemon & herb\n"));
    }

    #[test]
    fn snacks_section_only_when_non_empty() {
        let out = render(&doc(json!({"optional_snacks": []})));
        assert!(!out.contains("## Optional Snacks"));

        let out = render(&doc(json!({
            "optional_snacks": [
                {"name": "Pork scratchings", "serving_desc": "30 g", "protein_g": 14,
                 "net_carbs_g": 0, "fat_g": 13, "kcal": 180, "price_gbp": 0.5}
            ]
        })));
        assert!(out.contains(SNACKS_HEADER));
        assert!(out.contains("| Pork scratchings | 30 g | 14 | 0 | 13 | 180 | £0.50 |"));
    }

    #[test]
    fn wrong_typed_fields_render_blank() {
        let out = render(&doc(json!({
            "shopping_list": "eggs, butter",
            "meal_plan": 7,
            "macros_table": {"Mon": 1},
            "flavour_rotation": "spicy",
            "optional_snacks": null,
            "batch_cooking_guide": ["step 1", "step 2"]
        })));
        assert!(!out.contains("eggs, butter"));
        assert!(!out.contains("## Optional Snacks"));
        assert!(out.contains(r#"["step 1","step 2"]"#));
    }

    #[test]
    fn rendering_is_deterministic() {
        let plan = doc(json!({
            "total_weekly_cost_gbp": 41,
            "meal_plan": [{"day": "Mon", "meal_1": "a", "meal_2": "b"}],
            "extra": {"ignored": true}
        }));
        assert_eq!(render(&plan), render(&plan));
    }

    #[test]
    fn render_value_tolerates_non_objects() {
        let out = render_value(&json!([1, 2, 3]));
        assert!(out.starts_with(REPORT_TITLE));
        assert_eq!(out, render(&PlanDocument::default()));
    }
}
