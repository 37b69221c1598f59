use anyhow::{Result, bail};
use std::process;

use mealweek_core::models::Recipe;
use mealweek_core::spoonacular::result_to_recipe;
use mealweek_core::store::AppStore;

use crate::spoonacular::{SearchParams, SpoonacularClient};

use super::helpers::{parse_plan_ref, print_recipe_table, prompt_choice};

fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(ToString::to_string)
        .collect()
}

#[allow(clippy::too_many_arguments, clippy::fn_params_excessive_bools)]
pub(crate) async fn cmd_search(
    store: &AppStore,
    spoon: &SpoonacularClient,
    query: &str,
    cuisine: Option<String>,
    number: u32,
    include: Option<String>,
    exclude: Option<String>,
    halal_approx: bool,
    save: bool,
    plan: Option<String>,
    pick: Option<usize>,
    json: bool,
) -> Result<()> {
    // Seed the exclusion list from stored restrictions, like the original
    // search form: the avoid list pre-fills excludes, and a halal diet
    // implies the approximate-halal expansion.
    let restrictions = store.get_restrictions();
    let mut excludes = restrictions.avoid.clone();
    if let Some(extra) = exclude {
        excludes.extend(split_csv(&extra));
    }
    let halal_approx = halal_approx || restrictions.diet_type.eq_ignore_ascii_case("halal");

    let params = SearchParams {
        query: query.to_string(),
        cuisine: cuisine.unwrap_or_default(),
        number,
        halal_approx,
        include: include.as_deref().map(split_csv).unwrap_or_default(),
        exclude: excludes,
    };

    let response = spoon.search_async(&params).await?;
    let recipes: Vec<Recipe> = response.results.iter().map(result_to_recipe).collect();

    if recipes.is_empty() {
        if json {
            println!("[]");
        } else {
            eprintln!("No results found for '{query}'");
        }
        process::exit(2);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&recipes)?);
    } else {
        print_recipe_table(&recipes);
    }

    if !save && plan.is_none() {
        return Ok(());
    }

    let idx = match pick {
        Some(n) => {
            if n < 1 || n > recipes.len() {
                bail!("--pick {n} is out of range (1-{})", recipes.len());
            }
            n - 1
        }
        None => prompt_choice(recipes.len())?,
    };
    let recipe = recipes[idx].clone();

    if save {
        store.add_recipe(recipe.clone());
        println!("Saved • {}", recipe.name);
    }
    if let Some(plan_ref) = plan {
        let (day, slot) = parse_plan_ref(&plan_ref)?;
        store.set_plan_slot(day, slot, recipe.clone())?;
        println!("Added to Day {} • {slot}: {}", day + 1, recipe.name);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_csv() {
        assert_eq!(split_csv("raw onion, fish ,,eggplant"), vec![
            "raw onion",
            "fish",
            "eggplant"
        ]);
        assert!(split_csv(" ").is_empty());
    }
}
