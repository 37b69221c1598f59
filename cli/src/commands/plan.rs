use anyhow::{Result, bail};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::process;

use mealweek_core::nutrition::calc_targets;
use mealweek_core::planner::{MealSlot, day_totals, generate_week, weekly_average};
use mealweek_core::store::AppStore;

use super::helpers::print_plan;
use super::onboard::builtin_pool;

pub(crate) fn cmd_plan_show(store: &AppStore, json: bool) -> Result<()> {
    // Read through selector bindings, the same path a live view uses.
    let profile = store.select(|a| a.profile.clone());
    let plan = store.select(|a| a.weekly_plan.clone());

    let profile = profile.get().unwrap_or_default();
    let plan = plan.get().unwrap_or_default();
    let targets = calc_targets(&profile);

    if plan.is_empty() {
        if json {
            println!("[]");
        } else {
            eprintln!("No plan found. Run `mealweek onboard` or `mealweek plan generate`.");
        }
        process::exit(2);
    }

    if json {
        let days: Vec<serde_json::Value> = plan
            .iter()
            .map(|day| {
                serde_json::json!({
                    "meals": day,
                    "totals": day_totals(day),
                })
            })
            .collect();
        let out = serde_json::json!({
            "targets": targets,
            "days": days,
            "dailyAverage": weekly_average(&plan),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        if !profile.name.is_empty() {
            println!("Weekly plan for {}", profile.name);
        }
        print_plan(&plan, &targets);
    }

    Ok(())
}

pub(crate) fn cmd_plan_generate(store: &AppStore, seed: Option<u64>, json: bool) -> Result<()> {
    let restrictions = store.get_restrictions();
    let pool = builtin_pool();

    let generated = match seed {
        Some(s) => generate_week(&pool, &restrictions, &mut StdRng::seed_from_u64(s)),
        None => generate_week(&pool, &restrictions, &mut rand::rng()),
    };

    match generated {
        Ok(week) => {
            store.set_weekly_plan(week);
            if json {
                let plan = store.get_weekly_plan();
                println!("{}", serde_json::to_string_pretty(&plan)?);
            } else {
                println!("Plan regenerated.");
                print_plan(
                    &store.get_weekly_plan(),
                    &calc_targets(&store.get_profile()),
                );
            }
            Ok(())
        }
        Err(e) => {
            if json {
                println!("{}", serde_json::json!({ "error": e.to_string() }));
            } else {
                eprintln!("{e}. Adjust your restrictions and try again.");
            }
            process::exit(2);
        }
    }
}

pub(crate) fn cmd_plan_set(
    store: &AppStore,
    day: usize,
    slot: &str,
    recipe_idx: usize,
    json: bool,
) -> Result<()> {
    if !(1..=7).contains(&day) {
        bail!("Day must be between 1 and 7");
    }
    let slot: MealSlot = slot.parse().map_err(|e: String| anyhow::anyhow!(e))?;

    let recipes = store.get_recipes();
    if recipe_idx < 1 || recipe_idx > recipes.len() {
        bail!(
            "Recipe #{recipe_idx} not found; the library has {} entries (see `mealweek recipes list`)",
            recipes.len()
        );
    }
    let recipe = recipes[recipe_idx - 1].clone();
    let name = recipe.name.clone();

    store.set_plan_slot(day - 1, slot, recipe)?;

    if json {
        let plan = store.get_weekly_plan();
        println!("{}", serde_json::to_string_pretty(&plan[day - 1])?);
    } else {
        println!("Day {day} {slot} set to {name}");
    }
    Ok(())
}
