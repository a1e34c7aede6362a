//! The user's details and preferences sent to the model.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;

use crate::target::TargetProfile;

/// Errors from checking a [`UserProfile`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProfileError {
    #[error("{field} must be between {min} and {max} (got {value})")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("invalid {field} {value:?} (expected one of: {expected})")]
    UnknownChoice {
        field: &'static str,
        value: String,
        expected: &'static str,
    },
}

// ---------------------------------------------------------------------------
// Choices
// ---------------------------------------------------------------------------

/// What the user is training for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Goal {
    FatLoss,
    MuscleGain,
    Recomp,
}

impl Goal {
    /// Human-readable label used in the prompt.
    pub fn label(self) -> &'static str {
        match self {
            Self::FatLoss => "Fat loss",
            Self::MuscleGain => "Muscle gain",
            Self::Recomp => "Recomp",
        }
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::FatLoss => "fat-loss",
            Self::MuscleGain => "muscle-gain",
            Self::Recomp => "recomp",
        };
        f.write_str(s)
    }
}

impl FromStr for Goal {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fat-loss" => Ok(Self::FatLoss),
            "muscle-gain" => Ok(Self::MuscleGain),
            "recomp" => Ok(Self::Recomp),
            other => Err(ProfileError::UnknownChoice {
                field: "goal",
                value: other.to_owned(),
                expected: "fat-loss, muscle-gain, recomp",
            }),
        }
    }
}

/// How often meals may repeat across the week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RepeatTolerance {
    Low,
    Medium,
    High,
}

impl RepeatTolerance {
    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low (varied daily)",
            Self::Medium => "Medium (repeat some meals)",
            Self::High => "High (happy to repeat often)",
        }
    }
}

impl fmt::Display for RepeatTolerance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        };
        f.write_str(s)
    }
}

impl FromStr for RepeatTolerance {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(ProfileError::UnknownChoice {
                field: "repeat tolerance",
                value: other.to_owned(),
                expected: "low, medium, high",
            }),
        }
    }
}

/// How the user likes to cook during the week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CookingPreference {
    OneBatch,
    BatchPlusTopUp,
    Fresh,
}

impl CookingPreference {
    pub fn label(self) -> &'static str {
        match self {
            Self::OneBatch => "One weekly batch-cook",
            Self::BatchPlusTopUp => "One batch + midweek top-up",
            Self::Fresh => "Cook fresh most days",
        }
    }
}

impl fmt::Display for CookingPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::OneBatch => "one-batch",
            Self::BatchPlusTopUp => "batch-plus-top-up",
            Self::Fresh => "fresh",
        };
        f.write_str(s)
    }
}

impl FromStr for CookingPreference {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "one-batch" => Ok(Self::OneBatch),
            "batch-plus-top-up" => Ok(Self::BatchPlusTopUp),
            "fresh" => Ok(Self::Fresh),
            other => Err(ProfileError::UnknownChoice {
                field: "cooking preference",
                value: other.to_owned(),
                expected: "one-batch, batch-plus-top-up, fresh",
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

/// Everything the user tells us about themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub weight_kg: f64,
    pub goal: Goal,
    pub training_routine: String,
    pub daily_protein_target_g: u32,
    pub daily_calorie_target_kcal: u32,
    pub keto_strict: bool,
    pub dietary_restrictions: String,
    pub repeat_tolerance: RepeatTolerance,
    pub cooking_preference: CookingPreference,
    pub include_snacks: bool,
    pub budget_gbp: f64,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            weight_kg: 83.0,
            goal: Goal::Recomp,
            training_routine: "5 gym sessions + 2 runs/week".to_string(),
            daily_protein_target_g: 165,
            daily_calorie_target_kcal: 2200,
            keto_strict: true,
            dietary_restrictions: "No sugar or grains. Avoid ultra-processed foods.".to_string(),
            repeat_tolerance: RepeatTolerance::Medium,
            cooking_preference: CookingPreference::OneBatch,
            include_snacks: true,
            budget_gbp: 60.0,
        }
    }
}

impl UserProfile {
    pub const WEIGHT_KG: (f64, f64) = (35.0, 200.0);
    pub const PROTEIN_G: (f64, f64) = (60.0, 300.0);
    pub const CALORIES_KCAL: (f64, f64) = (1200.0, 4000.0);
    pub const BUDGET_GBP: (f64, f64) = (20.0, 200.0);

    /// Check every numeric input is within its accepted range.
    pub fn validate(&self) -> Result<(), ProfileError> {
        check_range("weight_kg", self.weight_kg, Self::WEIGHT_KG)?;
        check_range(
            "daily_protein_target_g",
            f64::from(self.daily_protein_target_g),
            Self::PROTEIN_G,
        )?;
        check_range(
            "daily_calorie_target_kcal",
            f64::from(self.daily_calorie_target_kcal),
            Self::CALORIES_KCAL,
        )?;
        check_range("budget_gbp", self.budget_gbp, Self::BUDGET_GBP)?;
        Ok(())
    }

    /// Targets the generated plan is validated against.
    pub fn target_profile(&self) -> TargetProfile {
        TargetProfile::new(
            self.budget_gbp,
            f64::from(self.daily_protein_target_g),
            f64::from(self.daily_calorie_target_kcal),
            self.keto_strict,
        )
    }

    /// The user context object sent to the model.
    ///
    /// Choices are spelled out with their labels so the model sees prose
    /// rather than CLI slugs.
    pub fn context_json(&self) -> Value {
        json!({
            "weight_kg": self.weight_kg,
            "goal": self.goal.label(),
            "training_routine": self.training_routine,
            "daily_protein_target_g": self.daily_protein_target_g,
            "daily_calorie_target_kcal": self.daily_calorie_target_kcal,
            "keto_strict": self.keto_strict,
            "dietary_restrictions": self.dietary_restrictions,
            "repeat_tolerance": self.repeat_tolerance.label(),
            "cooking_preference": self.cooking_preference.label(),
            "include_snacks": self.include_snacks,
            "budget_gbp": self.budget_gbp,
        })
    }
}

fn check_range(field: &'static str, value: f64, (min, max): (f64, f64)) -> Result<(), ProfileError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ProfileError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}
