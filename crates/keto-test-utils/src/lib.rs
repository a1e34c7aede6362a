//! Shared fixtures for keto-plan tests.
//!
//! Plans are returned as raw `serde_json::Value`s, the same shape the model
//! produces, so tests can mutate individual fields before parsing them.

use serde_json::{Value, json};

/// Days used by the fixture plans.
pub const WEEK: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// A macros row.
pub fn macros_row(day: &str, protein_g: f64, net_carbs_g: f64, kcal: f64) -> Value {
    json!({
        "day": day,
        "protein_g": protein_g,
        "net_carbs_g": net_carbs_g,
        "fat_g": 150,
        "kcal": kcal,
    })
}

/// A full week that satisfies the default targets (£60, 165 g protein,
/// 2200 kcal, strict keto).
pub fn sample_plan() -> Value {
    json!({
        "shopping_list": [
            {"name": "Large free range eggs", "pack_size": "15", "unit_price_gbp": 2.49, "quantity": 2, "line_total_gbp": 4.98},
            {"name": "Chicken thighs", "pack_size": "1kg", "unit_price_gbp": 3.29, "quantity": 3, "line_total_gbp": 9.87},
            {"name": "Beef mince 20% fat", "pack_size": "750g", "unit_price_gbp": 3.99, "quantity": 3, "line_total_gbp": 11.97},
            {"name": "Mature cheddar", "pack_size": "400g", "unit_price_gbp": 2.19, "quantity": 2, "line_total_gbp": 4.38},
            {"name": "Broccoli", "pack_size": "360g", "unit_price_gbp": 0.59, "quantity": 4, "line_total_gbp": 2.36}
        ],
        "total_weekly_cost_gbp": 58.40,
        "meal_plan": WEEK.iter().map(|day| json!({
            "day": day,
            "meal_1": "4 eggs (240 g) scrambled in 10 g butter with 40 g cheddar",
            "meal_2": "300 g chicken thighs, 150 g broccoli"
        })).collect::<Vec<_>>(),
        "macros_table": WEEK.iter().map(|day| macros_row(day, 165.0, 25.0, 2200.0)).collect::<Vec<_>>(),
        "batch_cooking_guide": "Sunday: roast all chicken thighs, brown the mince, portion into 14 boxes.",
        "flavour_rotation": ["Smoky paprika", "Garlic & herb", "Cajun"],
        "optional_snacks": [
            {"name": "Pork scratchings", "serving_desc": "30 g", "protein_g": 14, "net_carbs_g": 0, "fat_g": 13, "kcal": 180, "price_gbp": 0.5}
        ]
    })
}

/// The sample plan with its macros table replaced by `rows`.
pub fn plan_with_macros(rows: Vec<Value>) -> Value {
    let mut plan = sample_plan();
    plan["macros_table"] = Value::Array(rows);
    plan
}

/// Remove a top-level key from a fixture plan.
pub fn without(mut plan: Value, key: &str) -> Value {
    if let Some(obj) = plan.as_object_mut() {
        obj.remove(key);
    }
    plan
}
