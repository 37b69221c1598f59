//! Weekly plan generation: filter a recipe pool by restrictions, then pick
//! uniformly at random per slot per day.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use crate::models::{DayPlan, Recipe, Restrictions};

/// Terms implied by the halal diet type during plan generation. A policy
/// table, kept as data rather than logic.
pub const HALAL_IMPLIED_TERMS: &[&str] = &["pork", "bacon", "ham", "alcohol", "gelatin"];

/// One of the three meal slots in a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
}

impl MealSlot {
    pub const ALL: [MealSlot; 3] = [MealSlot::Breakfast, MealSlot::Lunch, MealSlot::Dinner];
}

impl fmt::Display for MealSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MealSlot::Breakfast => write!(f, "breakfast"),
            MealSlot::Lunch => write!(f, "lunch"),
            MealSlot::Dinner => write!(f, "dinner"),
        }
    }
}

impl FromStr for MealSlot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "breakfast" => Ok(MealSlot::Breakfast),
            "lunch" => Ok(MealSlot::Lunch),
            "dinner" => Ok(MealSlot::Dinner),
            _ => Err(format!(
                "Invalid meal slot '{s}'. Valid options: breakfast, lunch, dinner"
            )),
        }
    }
}

/// A candidate recipe tagged with the slot it can fill.
#[derive(Debug, Clone)]
pub struct PoolRecipe {
    pub recipe: Recipe,
    pub slot: MealSlot,
}

/// Plan generation failure a caller can act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    /// A slot had zero eligible candidates under the current restrictions.
    InsufficientOptions { slot: MealSlot },
}

impl fmt::Display for PlanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanError::InsufficientOptions { slot } => {
                write!(f, "Not enough {slot} options with the current restrictions")
            }
        }
    }
}

impl std::error::Error for PlanError {}

/// Forbidden terms for matching: the avoid list plus diet-implied defaults,
/// lowercased and deduplicated.
#[must_use]
pub fn forbidden_terms(restrictions: &Restrictions) -> Vec<String> {
    let mut terms: Vec<String> = restrictions
        .avoid
        .iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect();
    if restrictions.diet_type.to_lowercase() == "halal" {
        terms.extend(HALAL_IMPLIED_TERMS.iter().map(|t| (*t).to_string()));
    }
    terms.sort();
    terms.dedup();
    terms
}

/// A recipe is eligible when its slot matches and no forbidden term occurs
/// in its name or tags. Matching is a case-insensitive substring check —
/// deliberately loose ("hamburger" contains "ham"), for compatibility.
#[must_use]
pub fn is_eligible(candidate: &PoolRecipe, slot: MealSlot, forbidden: &[String]) -> bool {
    if candidate.slot != slot {
        return false;
    }
    let mut haystacks = vec![candidate.recipe.name.to_lowercase()];
    haystacks.extend(candidate.recipe.tags.iter().map(|t| t.to_lowercase()));
    !haystacks
        .iter()
        .any(|h| forbidden.iter().any(|term| h.contains(term)))
}

/// Generates a 7-day plan: per day and slot, a uniform-random pick among
/// the eligible candidates, independently (repeats across the week are
/// expected). Calling again re-rolls; determinism only via a seeded rng.
pub fn generate_week<R: Rng>(
    pool: &[PoolRecipe],
    restrictions: &Restrictions,
    rng: &mut R,
) -> Result<Vec<DayPlan>, PlanError> {
    let forbidden = forbidden_terms(restrictions);

    let mut eligible: Vec<Vec<&PoolRecipe>> = Vec::with_capacity(MealSlot::ALL.len());
    for slot in MealSlot::ALL {
        let options: Vec<&PoolRecipe> = pool
            .iter()
            .filter(|c| is_eligible(c, slot, &forbidden))
            .collect();
        if options.is_empty() {
            return Err(PlanError::InsufficientOptions { slot });
        }
        eligible.push(options);
    }

    let week = (0..7)
        .map(|_| DayPlan {
            breakfast: pick(&eligible[0], rng),
            lunch: pick(&eligible[1], rng),
            dinner: pick(&eligible[2], rng),
        })
        .collect();
    Ok(week)
}

fn pick<R: Rng>(options: &[&PoolRecipe], rng: &mut R) -> Recipe {
    // Callers guarantee options is non-empty.
    options
        .choose(rng)
        .map(|c| c.recipe.clone())
        .unwrap_or_default()
}

/// Summed macros for one day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DayTotals {
    pub kcal: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

#[must_use]
pub fn day_totals(day: &DayPlan) -> DayTotals {
    let meals = [&day.breakfast, &day.lunch, &day.dinner];
    DayTotals {
        kcal: meals.iter().map(|m| m.kcal).sum(),
        protein: meals.iter().map(|m| m.protein).sum(),
        carbs: meals.iter().map(|m| m.carbs).sum(),
        fat: meals.iter().map(|m| m.fat).sum(),
    }
}

/// Per-day averages over the plan, rounded to whole units. An empty plan
/// averages to zero.
#[must_use]
pub fn weekly_average(plan: &[DayPlan]) -> DayTotals {
    if plan.is_empty() {
        return DayTotals::default();
    }
    let sum = plan.iter().map(day_totals).fold(DayTotals::default(), |acc, t| DayTotals {
        kcal: acc.kcal + t.kcal,
        protein: acc.protein + t.protein,
        carbs: acc.carbs + t.carbs,
        fat: acc.fat + t.fat,
    });
    let days = plan.len() as f64;
    DayTotals {
        kcal: (sum.kcal / days).round(),
        protein: (sum.protein / days).round(),
        carbs: (sum.carbs / days).round(),
        fat: (sum.fat / days).round(),
    }
}
