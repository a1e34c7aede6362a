//! Lenient, optional-field view over a model-generated meal plan.
//!
//! Nothing in the document is trusted: every field may be absent, null or
//! of the wrong type. [`PlanDocument`] therefore stores each field as an
//! `Option<Value>` and leaves interpretation to the validator and renderer.
//! The only hard failure is a top-level value that is not a JSON object.

use serde_json::{Map, Value};
use thiserror::Error;

use super::coerce::type_name;

/// Errors building a [`PlanDocument`].
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("plan is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Plan is not a JSON object (found {found})")]
    NotAnObject { found: &'static str },
}

/// The seven top-level fields of a plan, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlanField {
    ShoppingList,
    TotalWeeklyCost,
    MealPlan,
    MacrosTable,
    BatchCookingGuide,
    FlavourRotation,
    OptionalSnacks,
}

impl PlanField {
    pub const ALL: [PlanField; 7] = [
        PlanField::ShoppingList,
        PlanField::TotalWeeklyCost,
        PlanField::MealPlan,
        PlanField::MacrosTable,
        PlanField::BatchCookingGuide,
        PlanField::FlavourRotation,
        PlanField::OptionalSnacks,
    ];

    /// Key the model is instructed to emit.
    pub fn key(self) -> &'static str {
        match self {
            Self::ShoppingList => "shopping_list",
            Self::TotalWeeklyCost => "total_weekly_cost_gbp",
            Self::MealPlan => "meal_plan",
            Self::MacrosTable => "macros_table",
            Self::BatchCookingGuide => "batch_cooking_guide",
            Self::FlavourRotation => "flavour_rotation",
            Self::OptionalSnacks => "optional_snacks",
        }
    }

    /// Alternative key accepted when reading.
    fn alias(self) -> Option<&'static str> {
        match self {
            Self::TotalWeeklyCost => Some("total_weekly_cost"),
            _ => None,
        }
    }
}

impl std::fmt::Display for PlanField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// A meal plan as returned by the model.
///
/// `source` keeps the object exactly as it was parsed so it can be exported
/// unmodified; the typed fields are copies taken at construction time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlanDocument {
    pub shopping_list: Option<Value>,
    pub total_weekly_cost: Option<Value>,
    pub meal_plan: Option<Value>,
    pub macros_table: Option<Value>,
    pub batch_cooking_guide: Option<Value>,
    pub flavour_rotation: Option<Value>,
    pub optional_snacks: Option<Value>,
    source: Map<String, Value>,
}

impl PlanDocument {
    /// Build a document from an arbitrary JSON value.
    ///
    /// Fails only when `value` is not an object. Unknown keys are ignored
    /// but preserved in [`PlanDocument::source`].
    pub fn from_value(value: Value) -> Result<Self, PlanError> {
        let source = match value {
            Value::Object(map) => map,
            other => {
                return Err(PlanError::NotAnObject {
                    found: type_name(&other),
                });
            }
        };

        let lookup = |field: PlanField| -> Option<Value> {
            source
                .get(field.key())
                .or_else(|| field.alias().and_then(|alias| source.get(alias)))
                .cloned()
        };

        let shopping_list = lookup(PlanField::ShoppingList);
        let total_weekly_cost = lookup(PlanField::TotalWeeklyCost);
        let meal_plan = lookup(PlanField::MealPlan);
        let macros_table = lookup(PlanField::MacrosTable);
        let batch_cooking_guide = lookup(PlanField::BatchCookingGuide);
        let flavour_rotation = lookup(PlanField::FlavourRotation);
        let optional_snacks = lookup(PlanField::OptionalSnacks);

        Ok(Self {
            shopping_list,
            total_weekly_cost,
            meal_plan,
            macros_table,
            batch_cooking_guide,
            flavour_rotation,
            optional_snacks,
            source,
        })
    }

    /// Parse the raw text returned by the model.
    pub fn from_json_str(raw: &str) -> Result<Self, PlanError> {
        let value: Value = serde_json::from_str(raw)?;
        Self::from_value(value)
    }

    /// Field value by enum, `None` when absent.
    pub fn field(&self, field: PlanField) -> Option<&Value> {
        match field {
            PlanField::ShoppingList => self.shopping_list.as_ref(),
            PlanField::TotalWeeklyCost => self.total_weekly_cost.as_ref(),
            PlanField::MealPlan => self.meal_plan.as_ref(),
            PlanField::MacrosTable => self.macros_table.as_ref(),
            PlanField::BatchCookingGuide => self.batch_cooking_guide.as_ref(),
            PlanField::FlavourRotation => self.flavour_rotation.as_ref(),
            PlanField::OptionalSnacks => self.optional_snacks.as_ref(),
        }
    }

    /// Fields absent from the document, in declaration order.
    pub fn missing_fields(&self) -> Vec<PlanField> {
        PlanField::ALL
            .into_iter()
            .filter(|f| self.field(*f).is_none())
            .collect()
    }

    /// Elements of a list field, or an empty slice when the field is absent
    /// or not an array.
    pub fn rows(&self, field: PlanField) -> &[Value] {
        match self.field(field) {
            Some(Value::Array(items)) => items,
            _ => &[],
        }
    }

    /// The object as originally parsed, including unknown keys.
    pub fn source(&self) -> &Map<String, Value> {
        &self.source
    }

    /// Pretty-printed JSON of the untouched source, for download/export.
    pub fn to_export_json(&self) -> String {
        // A map of serde_json values always serializes.
        serde_json::to_string_pretty(&self.source).unwrap_or_default()
    }
}

/// Look up `key` in a row object, trying each alias in turn.
///
/// Non-object rows behave as if every key were absent.
pub(crate) fn row_get<'a>(row: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    let obj = row.as_object()?;
    keys.iter().find_map(|k| obj.get(*k))
}
