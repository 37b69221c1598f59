//! Daily calorie and macro targets from the user profile.

use serde::Serialize;

use crate::models::Profile;

/// Daily targets, whole units (kcal and grams).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Targets {
    pub kcal: i64,
    pub protein: i64,
    pub carbs: i64,
    pub fat: i64,
}

/// Returned when age, height, or weight is missing — a deliberate
/// degrade-gracefully policy, not an error.
pub const FALLBACK_TARGETS: Targets = Targets {
    kcal: 2000,
    protein: 75,
    carbs: 250,
    fat: 70,
};

/// Activity multiplier over BMR. Unrecognized levels fall back to "light".
#[must_use]
pub fn activity_factor(activity: &str) -> f64 {
    match activity {
        "sedentary" => 1.2,
        "moderate" => 1.55,
        "active" => 1.725,
        _ => 1.375,
    }
}

/// Computes daily targets via Mifflin-St Jeor, an activity multiplier, a
/// goal adjustment (fatloss −500, muscle +300), and a fixed 25/50/25
/// protein/carbs/fat calorie split. Deterministic: same profile, same
/// targets.
#[must_use]
pub fn calc_targets(profile: &Profile) -> Targets {
    let (Some(age), Some(height), Some(weight)) = (profile.age, profile.height, profile.weight)
    else {
        return FALLBACK_TARGETS;
    };

    let gender_term = if profile.gender == "male" { 5.0 } else { -161.0 };
    let bmr = 10.0 * weight + 6.25 * height - 5.0 * age + gender_term;
    let tdee = bmr * activity_factor(&profile.activity);

    let goal_calories = match profile.goal.as_str() {
        "fatloss" => tdee - 500.0,
        "muscle" => tdee + 300.0,
        _ => tdee,
    };

    // Macros come from the unrounded calorie total; each output is rounded
    // independently.
    Targets {
        kcal: goal_calories.round() as i64,
        protein: (goal_calories * 0.25 / 4.0).round() as i64,
        carbs: (goal_calories * 0.5 / 4.0).round() as i64,
        fat: (goal_calories * 0.25 / 9.0).round() as i64,
    }
}
