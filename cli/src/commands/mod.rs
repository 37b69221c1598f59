mod helpers;
mod onboard;
mod plan;
mod profile;
mod recipes;
mod restrict;
mod search;
mod targets;

use anyhow::Result;

use mealweek_core::store::AppStore;

pub(crate) use onboard::cmd_onboard;
pub(crate) use plan::{cmd_plan_generate, cmd_plan_set, cmd_plan_show};
pub(crate) use profile::{
    cmd_profile_avatar, cmd_profile_reset_onboarding, cmd_profile_set, cmd_profile_show,
};
pub(crate) use recipes::cmd_recipes_list;
pub(crate) use restrict::{
    cmd_avoid_add, cmd_avoid_clear, cmd_avoid_remove, cmd_avoid_set, cmd_restrict_diet,
    cmd_restrict_show,
};
pub(crate) use search::cmd_search;
pub(crate) use targets::cmd_targets;

/// Entry fork: first run goes to onboarding, later runs to the plan view.
pub(crate) fn cmd_home(store: &AppStore) -> Result<()> {
    if store.get_onboarding_complete() {
        cmd_plan_show(store, false)
    } else {
        cmd_onboard(store)
    }
}

pub(crate) fn cmd_reset(store: &AppStore, yes: bool) -> Result<()> {
    if !yes && !helpers::confirm("Delete all mealweek data (profile, restrictions, plan, recipes)?")? {
        eprintln!("Aborted");
        return Ok(());
    }
    store.reset();
    println!("All data reset. Run `mealweek` to start over.");
    Ok(())
}
