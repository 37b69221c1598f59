use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

/// Known gender values for BMR calculation.
pub const GENDERS: &[&str] = &["male", "female"];

/// Known activity levels, in increasing order of energy expenditure.
pub const ACTIVITY_LEVELS: &[&str] = &["sedentary", "light", "moderate", "active"];

/// Known goals.
pub const GOALS: &[&str] = &["fatloss", "maintain", "muscle"];

/// Known diet types. The persisted field tolerates free-form tags; this list
/// is what the CLI offers and validates on input.
pub const DIET_TYPES: &[&str] = &[
    "none",
    "halal",
    "vegetarian",
    "vegan",
    "lowcarb",
    "mediterranean",
];

pub fn validate_gender(s: &str) -> Result<String> {
    let lower = s.to_lowercase();
    if GENDERS.contains(&lower.as_str()) {
        Ok(lower)
    } else {
        bail!("Invalid gender '{s}'. Must be one of: {}", GENDERS.join(", "))
    }
}

pub fn validate_activity(s: &str) -> Result<String> {
    let lower = s.to_lowercase();
    if ACTIVITY_LEVELS.contains(&lower.as_str()) {
        Ok(lower)
    } else {
        bail!(
            "Invalid activity level '{s}'. Must be one of: {}",
            ACTIVITY_LEVELS.join(", ")
        )
    }
}

pub fn validate_goal(s: &str) -> Result<String> {
    let lower = s.to_lowercase();
    if GOALS.contains(&lower.as_str()) {
        Ok(lower)
    } else {
        bail!("Invalid goal '{s}'. Must be one of: {}", GOALS.join(", "))
    }
}

pub fn validate_diet_type(s: &str) -> Result<String> {
    let lower = s.to_lowercase();
    if DIET_TYPES.contains(&lower.as_str()) {
        Ok(lower)
    } else {
        bail!(
            "Invalid diet type '{s}'. Must be one of: {}",
            DIET_TYPES.join(", ")
        )
    }
}

/// User profile. Numeric fields stay unset until onboarding fills them in;
/// readers must cope with their absence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub name: String,
    /// Years.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<f64>,
    /// Centimeters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// Kilograms.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    pub gender: String,
    pub activity: String,
    pub goal: String,
    /// Opaque encoded image blob (data URL), or empty.
    pub avatar: String,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            name: String::new(),
            age: None,
            height: None,
            weight: None,
            gender: "male".to_string(),
            activity: "light".to_string(),
            goal: "fatloss".to_string(),
            avatar: String::new(),
        }
    }
}

impl Profile {
    /// A profile is complete once name, age, height, and weight are all set.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty()
            && self.age.is_some()
            && self.height.is_some()
            && self.weight.is_some()
    }
}

/// Diet restrictions: a diet tag plus ingredients to avoid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Restrictions {
    #[serde(rename = "type")]
    pub diet_type: String,
    pub avoid: Vec<String>,
}

impl Default for Restrictions {
    fn default() -> Self {
        Self {
            diet_type: "none".to_string(),
            avoid: Vec::new(),
        }
    }
}

/// A recipe, either hand-entered, from the built-in pool, or imported from
/// the search provider (which supplies `id`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Recipe {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub kcal: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl Recipe {
    /// The empty placeholder used for unassigned slots.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.name.is_empty()
    }
}

/// One day of the weekly plan: exactly three slots.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DayPlan {
    pub breakfast: Recipe,
    pub lunch: Recipe,
    pub dinner: Recipe,
}

/// The single persisted document. Field names match the serialized v1
/// record so existing documents round-trip.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppData {
    pub profile: Profile,
    pub restrictions: Restrictions,
    #[serde(rename = "weeklyPlan")]
    pub weekly_plan: Vec<DayPlan>,
    pub recipes: Vec<Recipe>,
    #[serde(rename = "onboardingComplete")]
    pub onboarding_complete: bool,
}

/// Partial profile update. `None` fields are preserved on merge.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub age: Option<f64>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub gender: Option<String>,
    pub activity: Option<String>,
    pub goal: Option<String>,
    pub avatar: Option<String>,
}

impl ProfileUpdate {
    pub(crate) fn apply(self, profile: &mut Profile) {
        if let Some(name) = self.name {
            profile.name = name;
        }
        if let Some(age) = self.age {
            profile.age = Some(age);
        }
        if let Some(height) = self.height {
            profile.height = Some(height);
        }
        if let Some(weight) = self.weight {
            profile.weight = Some(weight);
        }
        if let Some(gender) = self.gender {
            profile.gender = gender;
        }
        if let Some(activity) = self.activity {
            profile.activity = activity;
        }
        if let Some(goal) = self.goal {
            profile.goal = goal;
        }
        if let Some(avatar) = self.avatar {
            profile.avatar = avatar;
        }
    }
}

/// Partial restrictions update. An explicit `avoid` replaces the list
/// wholesale (after normalization); `None` preserves it.
#[derive(Debug, Clone, Default)]
pub struct RestrictionsUpdate {
    pub diet_type: Option<String>,
    pub avoid: Option<Vec<String>>,
}

/// Trim entries, drop empties, and deduplicate case-insensitively.
/// The first casing of each term wins.
#[must_use]
pub fn normalize_avoid_list(items: &[String]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    let mut out = Vec::new();
    for item in items {
        let trimmed = item.trim();
        if trimmed.is_empty() {
            continue;
        }
        let lower = trimmed.to_lowercase();
        if seen.contains(&lower) {
            continue;
        }
        seen.push(lower);
        out.push(trimmed.to_string());
    }
    out
}
