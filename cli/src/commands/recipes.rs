use anyhow::Result;
use std::process;

use mealweek_core::store::AppStore;

use super::helpers::print_recipe_table;

pub(crate) fn cmd_recipes_list(store: &AppStore, json: bool) -> Result<()> {
    let recipes = store.get_recipes();

    if recipes.is_empty() {
        if json {
            println!("[]");
        } else {
            eprintln!("No saved recipes yet. Use `mealweek search <query> --save <#>` to add some.");
        }
        process::exit(2);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&recipes)?);
    } else {
        print_recipe_table(&recipes);
    }
    Ok(())
}
