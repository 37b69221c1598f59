use anyhow::Result;

use mealweek_core::debounce::DebouncedSaver;
use mealweek_core::models::{Recipe, RestrictionsUpdate, validate_diet_type};
use mealweek_core::nutrition::calc_targets;
use mealweek_core::planner::{MealSlot, PoolRecipe, generate_week};
use mealweek_core::store::AppStore;

use super::helpers::{print_plan, prompt_line};

/// Built-in recipe pool used for the generated starter plan (halal-friendly
/// and fish-free, like the original seed data).
pub(crate) fn builtin_pool() -> Vec<PoolRecipe> {
    fn entry(name: &str, kcal: f64, protein: f64, carbs: f64, fat: f64, slot: MealSlot) -> PoolRecipe {
        PoolRecipe {
            recipe: Recipe {
                name: name.to_string(),
                kcal,
                protein,
                carbs,
                fat,
                ..Recipe::default()
            },
            slot,
        }
    }

    vec![
        // breakfasts
        entry("Greek Yogurt Power Bowl", 350.0, 36.0, 30.0, 10.0, MealSlot::Breakfast),
        entry("Protein Oats", 400.0, 35.0, 50.0, 9.0, MealSlot::Breakfast),
        entry("Egg & Avocado Toast", 340.0, 20.0, 25.0, 14.0, MealSlot::Breakfast),
        entry("Cottage Cheese + Fruit", 350.0, 33.0, 28.0, 10.0, MealSlot::Breakfast),
        // lunch
        entry("Chicken Rice Bowl", 500.0, 42.0, 50.0, 15.0, MealSlot::Lunch),
        entry("Mediterranean Chicken Salad", 480.0, 42.0, 20.0, 20.0, MealSlot::Lunch),
        entry("Beef Bulgur Bowl", 500.0, 42.0, 55.0, 14.0, MealSlot::Lunch),
        entry("Shawarma Salad + Pita", 480.0, 38.0, 40.0, 15.0, MealSlot::Lunch),
        // dinner
        entry("Beef Stir-fry Noodles", 550.0, 42.0, 65.0, 14.0, MealSlot::Dinner),
        entry("Chicken Curry + Rice", 540.0, 40.0, 60.0, 13.0, MealSlot::Dinner),
        entry("Pasta w/ Lean Beef", 520.0, 42.0, 60.0, 12.0, MealSlot::Dinner),
        entry("Lamb Kofta Plate", 540.0, 40.0, 50.0, 15.0, MealSlot::Dinner),
    ]
}

fn prompt_text(label: &str, current: &str, min_len: usize) -> Result<String> {
    loop {
        let shown = if current.is_empty() {
            label.to_string()
        } else {
            format!("{label} [{current}]")
        };
        let answer = prompt_line(&shown)?;
        if answer.is_empty() && !current.is_empty() {
            return Ok(current.to_string());
        }
        if answer.chars().count() >= min_len {
            return Ok(answer);
        }
        eprintln!("Please enter at least {min_len} characters.");
    }
}

fn prompt_number(label: &str, current: Option<f64>, min: f64, max: f64) -> Result<f64> {
    loop {
        let shown = match current {
            Some(v) => format!("{label} [{v}]"),
            None => label.to_string(),
        };
        let answer = prompt_line(&shown)?;
        if answer.is_empty() {
            if let Some(v) = current {
                return Ok(v);
            }
        }
        match answer.parse::<f64>() {
            Ok(v) if (min..=max).contains(&v) => return Ok(v),
            _ => eprintln!("Please enter a number between {min} and {max}."),
        }
    }
}

fn prompt_option(label: &str, options: &[&str], default: &str) -> Result<String> {
    loop {
        let answer = prompt_line(&format!("{label} ({}) [{default}]", options.join("/")))?;
        if answer.is_empty() {
            return Ok(default.to_string());
        }
        let lower = answer.to_lowercase();
        if options.contains(&lower.as_str()) {
            return Ok(lower);
        }
        eprintln!("Please pick one of: {}", options.join(", "));
    }
}

pub(crate) fn cmd_onboard(store: &AppStore) -> Result<()> {
    eprintln!("Welcome to mealweek! Let's personalize a 7-day plan.");
    eprintln!();

    // Step 1: profile. Answers stream through the debounced saver so the
    // latest state lands even if the flow is interrupted.
    let mut data = store.load();
    let mut saver = DebouncedSaver::new(store.clone());

    data.profile.name = prompt_text("Name", &data.profile.name, 2)?;
    saver.submit(data.clone());

    data.profile.age = Some(prompt_number("Age (years)", data.profile.age, 14.0, 90.0)?);
    saver.submit(data.clone());

    data.profile.height = Some(prompt_number(
        "Height (cm)",
        data.profile.height,
        120.0,
        230.0,
    )?);
    saver.submit(data.clone());

    data.profile.weight = Some(prompt_number(
        "Weight (kg)",
        data.profile.weight,
        35.0,
        250.0,
    )?);
    saver.submit(data.clone());

    data.profile.gender = prompt_option("Gender", mealweek_core::models::GENDERS, &data.profile.gender)?;
    saver.submit(data.clone());

    data.profile.activity = prompt_option(
        "Activity",
        mealweek_core::models::ACTIVITY_LEVELS,
        &data.profile.activity,
    )?;
    saver.submit(data.clone());

    data.profile.goal = prompt_option("Goal", mealweek_core::models::GOALS, &data.profile.goal)?;
    saver.submit(data.clone());
    saver.flush();

    // Step 2: restrictions.
    eprintln!();
    let diet = prompt_option(
        "Diet type",
        mealweek_core::models::DIET_TYPES,
        &store.get_restrictions().diet_type,
    )?;
    let diet = validate_diet_type(&diet)?;
    let avoid_raw = prompt_line("Ingredients to avoid (comma separated, empty for none)")?;
    let avoid: Vec<String> = avoid_raw.split(',').map(ToString::to_string).collect();
    store.set_restrictions(RestrictionsUpdate {
        diet_type: Some(diet),
        avoid: Some(avoid),
    });

    // Step 3: generate the starter week.
    eprintln!();
    eprintln!("Generating your week plan…");
    let restrictions = store.get_restrictions();
    match generate_week(&builtin_pool(), &restrictions, &mut rand::rng()) {
        Ok(week) => {
            store.set_weekly_plan(week);
            store.set_onboarding_complete(true);

            let data = store.load();
            println!("Your week plan is ready, {}!", data.profile.name);
            print_plan(&data.weekly_plan, &calc_targets(&data.profile));
            println!("Run `mealweek plan generate` any time to re-roll.");
        }
        Err(e) => {
            store.set_weekly_plan(Vec::new());
            store.set_onboarding_complete(true);
            eprintln!("{e}.");
            eprintln!(
                "Your profile was saved. Relax the avoid list (`mealweek restrict`) and run `mealweek plan generate`."
            );
        }
    }

    Ok(())
}
