//! The document store: owns the single persisted `AppData` record.
//!
//! Every write is a whole-document save followed by a change notification;
//! readers re-fetch on notification instead of trusting passed payloads.
//! Loading never fails — malformed persisted data degrades to defaults.

use std::sync::Arc;

use crate::models::{
    AppData, DayPlan, Profile, ProfileUpdate, Recipe, Restrictions, RestrictionsUpdate,
    normalize_avoid_list,
};
use crate::notify::ChangeBus;
use crate::planner::MealSlot;
use crate::storage::{MemoryStorage, StoragePort};
use anyhow::{Result, bail};
use uuid::Uuid;

/// Versioned storage key. A future schema change bumps the suffix and
/// migrates, leaving unrelated keys alone.
pub const STORAGE_KEY: &str = "appData.v1";

/// Handle to the persisted document. Cloning shares the storage port and
/// the change bus, so every clone observes every write.
#[derive(Clone)]
pub struct AppStore {
    pub(crate) storage: Arc<dyn StoragePort>,
    pub(crate) bus: ChangeBus,
}

impl AppStore {
    pub fn new(storage: impl StoragePort + 'static) -> Self {
        Self {
            storage: Arc::new(storage),
            bus: ChangeBus::new(),
        }
    }

    /// Store over a fresh in-memory port, for tests and ephemeral runs.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(MemoryStorage::new())
    }

    #[must_use]
    pub fn bus(&self) -> &ChangeBus {
        &self.bus
    }

    /// Reads the persisted document. Missing or corrupt data falls back to
    /// defaults; corruption inside one sub-entity only defaults that
    /// sub-entity.
    #[must_use]
    pub fn load(&self) -> AppData {
        let Ok(Some(raw)) = self.storage.read(STORAGE_KEY) else {
            return AppData::default();
        };
        let Ok(value) = serde_json::from_str::<serde_json::Value>(&raw) else {
            return AppData::default();
        };
        data_from_value(&value)
    }

    /// Serializes and persists the whole document, then notifies
    /// subscribers. Write failures are reported on stderr and swallowed;
    /// no error escapes the store boundary.
    pub fn save(&self, data: &AppData) {
        let Ok(raw) = serde_json::to_string(data) else {
            eprintln!("Failed to serialize app data; write skipped");
            return;
        };
        match self.storage.write(STORAGE_KEY, &raw) {
            Ok(()) => self.bus.publish(),
            Err(e) => eprintln!("Failed to persist app data: {e:#}"),
        }
    }

    /// Deletes all persisted state. The next `load` yields fresh defaults.
    pub fn reset(&self) {
        if let Err(e) = self.storage.remove(STORAGE_KEY) {
            eprintln!("Failed to reset app data: {e:#}");
            return;
        }
        self.bus.publish();
    }

    /// Entry point for the cross-context storage signal. The key filter is
    /// advisory only: subscribers always re-derive truth via `load`.
    pub fn external_change(&self, key: Option<&str>) {
        match key {
            None => self.bus.publish(),
            Some(k) if k == STORAGE_KEY => self.bus.publish(),
            Some(_) => {}
        }
    }

    // --- Per-entity accessors ---

    #[must_use]
    pub fn get_app(&self) -> AppData {
        self.load()
    }

    #[must_use]
    pub fn get_profile(&self) -> Profile {
        self.load().profile
    }

    pub fn set_profile(&self, update: ProfileUpdate) {
        let mut data = self.load();
        update.apply(&mut data.profile);
        self.save(&data);
    }

    #[must_use]
    pub fn get_restrictions(&self) -> Restrictions {
        self.load().restrictions
    }

    pub fn set_restrictions(&self, update: RestrictionsUpdate) {
        let mut data = self.load();
        if let Some(diet_type) = update.diet_type {
            data.restrictions.diet_type = diet_type;
        }
        if let Some(avoid) = update.avoid {
            data.restrictions.avoid = normalize_avoid_list(&avoid);
        }
        self.save(&data);
    }

    #[must_use]
    pub fn get_weekly_plan(&self) -> Vec<DayPlan> {
        self.load().weekly_plan
    }

    pub fn set_weekly_plan(&self, plan: Vec<DayPlan>) {
        let mut data = self.load();
        data.weekly_plan = plan;
        self.save(&data);
    }

    /// Places one recipe into a slot, padding the plan with empty days up
    /// to a full week first.
    pub fn set_plan_slot(&self, day: usize, slot: MealSlot, recipe: Recipe) -> Result<()> {
        if day >= 7 {
            bail!("Day index must be between 0 and 6 (got {day})");
        }
        let mut data = self.load();
        while data.weekly_plan.len() < 7 {
            data.weekly_plan.push(DayPlan::default());
        }
        let entry = &mut data.weekly_plan[day];
        match slot {
            MealSlot::Breakfast => entry.breakfast = recipe,
            MealSlot::Lunch => entry.lunch = recipe,
            MealSlot::Dinner => entry.dinner = recipe,
        }
        self.save(&data);
        Ok(())
    }

    #[must_use]
    pub fn get_recipes(&self) -> Vec<Recipe> {
        self.load().recipes
    }

    pub fn set_recipes(&self, recipes: Vec<Recipe>) {
        let mut data = self.load();
        data.recipes = recipes;
        self.save(&data);
    }

    /// Appends a recipe to the library, stamping an id when the source
    /// supplied none.
    pub fn add_recipe(&self, mut recipe: Recipe) {
        if recipe.id.is_none() {
            recipe.id = Some(Uuid::new_v4().to_string());
        }
        let mut data = self.load();
        data.recipes.push(recipe);
        self.save(&data);
    }

    #[must_use]
    pub fn get_onboarding_complete(&self) -> bool {
        self.load().onboarding_complete
    }

    pub fn set_onboarding_complete(&self, value: bool) {
        let mut data = self.load();
        data.onboarding_complete = value;
        self.save(&data);
    }

    #[must_use]
    pub fn is_profile_complete(&self) -> bool {
        self.load().profile.is_complete()
    }

    // --- Avoid-list helpers ---

    pub fn set_avoids(&self, items: Vec<String>) {
        let mut data = self.load();
        data.restrictions.avoid = normalize_avoid_list(&items);
        self.save(&data);
    }

    pub fn add_avoid(&self, item: &str) {
        let mut data = self.load();
        let mut items = data.restrictions.avoid.clone();
        items.push(item.to_string());
        data.restrictions.avoid = normalize_avoid_list(&items);
        self.save(&data);
    }

    /// Removes a term, matching case-insensitively.
    pub fn remove_avoid(&self, item: &str) {
        let needle = item.trim().to_lowercase();
        let mut data = self.load();
        data.restrictions
            .avoid
            .retain(|a| a.to_lowercase() != needle);
        self.save(&data);
    }
}

/// Tolerant per-section parse: each top-level sub-entity is decoded
/// independently, so one corrupt section cannot take down the rest.
fn data_from_value(value: &serde_json::Value) -> AppData {
    let mut data = AppData::default();
    let serde_json::Value::Object(map) = value else {
        return data;
    };
    if let Some(v) = map.get("profile") {
        if let Ok(profile) = serde_json::from_value(v.clone()) {
            data.profile = profile;
        }
    }
    if let Some(v) = map.get("restrictions") {
        if let Ok(restrictions) = serde_json::from_value::<Restrictions>(v.clone()) {
            data.restrictions = Restrictions {
                avoid: normalize_avoid_list(&restrictions.avoid),
                ..restrictions
            };
        }
    }
    if let Some(v) = map.get("weeklyPlan") {
        if let Ok(plan) = serde_json::from_value(v.clone()) {
            data.weekly_plan = plan;
        }
    }
    if let Some(v) = map.get("recipes") {
        if let Ok(recipes) = serde_json::from_value(v.clone()) {
            data.recipes = recipes;
        }
    }
    if let Some(v) = map.get("onboardingComplete") {
        if let Some(flag) = v.as_bool() {
            data.onboarding_complete = flag;
        }
    }
    data
}
