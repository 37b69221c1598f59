//! Mealweek core library.
//!
//! One persisted document (profile, restrictions, weekly plan, recipe
//! library), a change-notification model over it, and the pure transforms
//! built on top: nutrition targets and weekly plan generation.

pub mod debounce;
pub mod models;
pub mod notify;
pub mod nutrition;
pub mod planner;
pub mod selector;
pub mod spoonacular;
pub mod storage;
pub mod store;

pub use debounce::DebouncedSaver;
pub use models::{
    AppData, DayPlan, Profile, ProfileUpdate, Recipe, Restrictions, RestrictionsUpdate,
};
pub use notify::{ChangeBus, Subscription};
pub use nutrition::{Targets, calc_targets};
pub use planner::{MealSlot, PlanError, PoolRecipe, generate_week};
pub use selector::Selector;
pub use storage::{FileStorage, MemoryStorage, StoragePort};
pub use store::{AppStore, STORAGE_KEY};
