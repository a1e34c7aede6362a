//! Numeric targets a generated plan is checked against.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// Relative tolerance applied to the daily protein and calorie targets.
pub const MACRO_TOLERANCE: f64 = 0.05;

/// Allowed daily net carbs (grams) when strict keto is requested.
pub const KETO_NET_CARBS_G: RangeInclusive<f64> = 20.0..=30.0;

/// The user's budget and daily macro targets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetProfile {
    /// Weekly grocery budget in pounds.
    pub budget: f64,
    /// Daily protein target in grams.
    pub protein_target_g: f64,
    /// Daily calorie target.
    pub kcal_target: f64,
    /// Whether daily net carbs must stay within [`KETO_NET_CARBS_G`].
    #[serde(default = "default_keto_strict")]
    pub keto_strict: bool,
}

impl TargetProfile {
    pub fn new(budget: f64, protein_target_g: f64, kcal_target: f64, keto_strict: bool) -> Self {
        Self {
            budget,
            protein_target_g,
            kcal_target,
            keto_strict,
        }
    }

    /// `true` if `actual` is within [`MACRO_TOLERANCE`] of `target`.
    ///
    /// The tolerance band is measured against the target, not the actual
    /// value.
    pub fn within_tolerance(actual: f64, target: f64) -> bool {
        (actual - target).abs() <= MACRO_TOLERANCE * target
    }
}

impl Default for TargetProfile {
    fn default() -> Self {
        Self::new(60.0, 165.0, 2200.0, true)
    }
}

fn default_keto_strict() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tolerance_boundary_is_inclusive() {
        // 5% of 200 is exactly 10, which survives f64 arithmetic.
        assert!(TargetProfile::within_tolerance(210.0, 200.0));
        assert!(TargetProfile::within_tolerance(190.0, 200.0));
        assert!(!TargetProfile::within_tolerance(210.5, 200.0));
        assert!(!TargetProfile::within_tolerance(189.5, 200.0));
    }

    #[test]
    fn tolerance_is_relative_to_target() {
        // 100 vs 105: 5 <= 5.25 (5% of 105), but 5 > 5.0 (5% of 100).
        assert!(TargetProfile::within_tolerance(100.0, 105.0));
        assert!(!TargetProfile::within_tolerance(105.0, 100.0 - 0.01));
    }

    #[test]
    fn deserialize_defaults_keto_strict() {
        let target: TargetProfile = serde_json::from_str(
            r#"{"budget": 50, "protein_target_g": 150, "kcal_target": 2000}"#,
        )
        .unwrap();
        assert!(target.keto_strict);
        assert_eq!(target.budget, 50.0);
    }

    #[test]
    fn net_carb_range_bounds() {
        assert!(KETO_NET_CARBS_G.contains(&20.0));
        assert!(KETO_NET_CARBS_G.contains(&30.0));
        assert!(!KETO_NET_CARBS_G.contains(&19.99));
        assert!(!KETO_NET_CARBS_G.contains(&30.01));
    }
}
