//! Prompt construction for plan generation.
//!
//! Pure string assembly: the fixed system instructions, the user's profile
//! as JSON, and optionally the uploaded price hints.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::price_hints::PriceHints;
use crate::profile::UserProfile;

/// Role of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::System => "system",
            Self::User => "user",
        };
        f.write_str(s)
    }
}

/// A single chat completion message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

const ROLE: &str = "You are a specialist nutrition and meal-planning assistant who creates \
keto-friendly, high-protein, batch-cooking meal plans and shopping lists for UK Aldi customers.";

const TASK: &str = r#"## Task

When asked, generate a complete 7-day shopping list and cooking plan based on the user's
provided personal details, dietary goals, and preferences.
"#;

const CONSTRAINTS: &str = r#"## Constraints & Requirements

- Keep total weekly grocery cost under the user's stated budget (default: £60).
- Exactly match the user's macro targets and calorie goals where provided.
- Strict keto: 20–30 g net carbs/day (unless user specifies otherwise).
- Focus on best £ per gram of protein using Aldi UK products with real pack sizes and current prices (cross-check from latest Aldi UK online listings or an uploaded CSV).
- Plan 2 main meals/day, plus optional snacks if requested.
- All meals must be bulk-prep friendly and easy to store for 7 days with minimal mid-week cooking.
- Use high ingredient reuse to minimise waste but avoid flavour fatigue.
- Minimise ultra-processed foods unless user explicitly requests.
- Use metric weights and UK spelling.
"#;

/// Output schema. Keys here must match `PlanField::key` and the row keys
/// read by the validator and renderer.
const OUTPUT_FORMAT: &str = r#"## Output Format (JSON only)

Return a single JSON object with these keys:
- shopping_list: [{name, pack_size, unit_price_gbp, quantity, line_total_gbp}]
- total_weekly_cost_gbp: number
- meal_plan: [{day, meal_1, meal_2}]  # Include exact ingredient weights in the meal text
- macros_table: [{day, protein_g, net_carbs_g, fat_g, kcal}]
- batch_cooking_guide: string
- flavour_rotation: [string]
- optional_snacks: [{name, serving_desc, protein_g, net_carbs_g, fat_g, kcal, price_gbp}]
"#;

const VALIDATION_RULES: &str = r#"## Validation rules

- Keep total_weekly_cost_gbp <= budget.
- Ensure each day's net_carbs_g is within 20–30 g if keto_strict is True.
- Hit protein_target ± 5% and calories ± 5% daily.
- Use realistic Aldi UK pack sizes.
- Prefer best £/g protein options.
- Reuse ingredients sensibly to minimise waste.
"#;

/// Build the system prompt sent with every generation request.
pub fn build_system_prompt() -> String {
    let mut prompt = String::with_capacity(2048);
    prompt.push_str(ROLE);
    prompt.push_str("\n\n");
    for section in [TASK, CONSTRAINTS, OUTPUT_FORMAT, VALIDATION_RULES] {
        prompt.push_str(section);
        prompt.push('\n');
    }
    prompt
}

/// Assemble the chat messages for one generation request.
///
/// The price hints message is only added when hints with at least one row
/// were supplied. It names the CSV's own columns.
pub fn build_messages(profile: &UserProfile, hints: Option<&PriceHints>) -> Vec<ChatMessage> {
    let context = serde_json::to_string_pretty(&profile.context_json()).unwrap_or_default();

    let mut messages = vec![
        ChatMessage::system(build_system_prompt()),
        ChatMessage::user(format!("Here are my preferences and goals:\n{context}")),
    ];

    if let Some(hints) = hints.filter(|h| !h.is_empty()) {
        messages.push(ChatMessage::user(format!(
            "Here is a CSV-derived list of Aldi price hints ({}):\n{}",
            hints.headers().join(", "),
            hints.to_json()
        )));
    }

    messages
}
