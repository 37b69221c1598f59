mod commands;
mod config;
mod server;
mod spoonacular;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process;
use std::sync::Arc;

use crate::commands::{
    cmd_avoid_add, cmd_avoid_clear, cmd_avoid_remove, cmd_avoid_set, cmd_home, cmd_onboard,
    cmd_plan_generate, cmd_plan_set, cmd_plan_show, cmd_profile_avatar,
    cmd_profile_reset_onboarding, cmd_profile_set, cmd_profile_show, cmd_recipes_list, cmd_reset,
    cmd_restrict_diet, cmd_restrict_show, cmd_search, cmd_targets,
};
use crate::config::Config;
use crate::spoonacular::SpoonacularClient;
use mealweek_core::storage::FileStorage;
use mealweek_core::store::AppStore;

#[derive(Parser)]
#[command(
    name = "mealweek",
    version,
    about = "A local-first weekly meal planner",
    long_about = "\n\n  ┌┬┐┌─┐┌─┐┬  ┬ ┬┌─┐┌─┐┬┌─\n  │││├┤ ├─┤│  │││├┤ ├┤ ├┴┐\n  ┴ ┴└─┘┴ ┴┴─┘└┴┘└─┘└─┘┴ ┴\n    your week, planned.\n"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the guided onboarding flow (profile, restrictions, starter plan)
    Onboard,
    /// View or regenerate the weekly plan
    Plan {
        #[command(subcommand)]
        command: PlanCommands,
    },
    /// Show daily calorie/macro targets computed from your profile
    Targets {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// View or edit your profile
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },
    /// View or edit diet restrictions
    Restrict {
        #[command(subcommand)]
        command: RestrictCommands,
    },
    /// Manage the saved recipe library
    Recipes {
        #[command(subcommand)]
        command: RecipeCommands,
    },
    /// Search Spoonacular for recipes
    Search {
        /// Search query
        query: String,
        /// Cuisine filter (comma-separated)
        #[arg(long)]
        cuisine: Option<String>,
        /// Number of results
        #[arg(short, long, default_value = "12")]
        number: u32,
        /// Ingredients to include (comma-separated)
        #[arg(long)]
        include: Option<String>,
        /// Extra ingredients to exclude (comma-separated; your avoid list is always applied)
        #[arg(long)]
        exclude: Option<String>,
        /// Apply the approximate-halal exclusion list (implied by a halal diet type)
        #[arg(long)]
        halal_approx: bool,
        /// Save the picked result to the recipe library
        #[arg(long)]
        save: bool,
        /// Place the picked result into the plan, e.g. "2:lunch"
        #[arg(long, value_name = "DAY:SLOT")]
        plan: Option<String>,
        /// Result number to pick for --save/--plan (prompts if omitted)
        #[arg(long, value_name = "N")]
        pick: Option<usize>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Start the recipe-search proxy server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,
        /// Address to bind to (default: 127.0.0.1, use 0.0.0.0 to expose to network)
        #[arg(short, long, default_value = "127.0.0.1")]
        bind: String,
    },
    /// Delete all stored data and start fresh
    Reset {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum PlanCommands {
    /// Show the weekly plan with targets and day totals
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Re-roll the weekly plan from the recipe pool
    Generate {
        /// Seed for reproducible generation
        #[arg(long)]
        seed: Option<u64>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Put a saved recipe into one slot of the plan
    Set {
        /// Day of the week (1-7)
        day: usize,
        /// Slot: breakfast, lunch, dinner
        slot: String,
        /// Library recipe number (see `mealweek recipes list`)
        recipe: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum ProfileCommands {
    /// Show the stored profile
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Update profile fields (only the provided flags change)
    Set {
        #[arg(long)]
        name: Option<String>,
        /// Age in years
        #[arg(long)]
        age: Option<f64>,
        /// Height in cm
        #[arg(long)]
        height: Option<f64>,
        /// Weight in kg
        #[arg(long)]
        weight: Option<f64>,
        /// male or female
        #[arg(long)]
        gender: Option<String>,
        /// sedentary, light, moderate, or active
        #[arg(long)]
        activity: Option<String>,
        /// fatloss, maintain, or muscle
        #[arg(long)]
        goal: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set the profile avatar from an image file
    Avatar {
        /// Path to a png/jpg/gif/webp file
        file: std::path::PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Unlock onboarding again without deleting data
    ResetOnboarding {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum RestrictCommands {
    /// Show diet type and avoid list
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set the diet type
    Diet {
        /// none, halal, vegetarian, vegan, lowcarb, or mediterranean
        diet_type: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Manage the ingredients-to-avoid list
    Avoid {
        #[command(subcommand)]
        command: AvoidCommands,
    },
}

#[derive(Subcommand)]
enum AvoidCommands {
    /// Add an ingredient to avoid
    Add {
        term: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove an ingredient (case-insensitive)
    Remove {
        term: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Replace the whole avoid list
    Set {
        terms: Vec<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Clear the avoid list
    Clear {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum RecipeCommands {
    /// List saved recipes
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

#[allow(clippy::too_many_lines)]
async fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let store = AppStore::new(FileStorage::new(config.data_dir));

    match cli.command {
        None => cmd_home(&store),
        Some(Commands::Onboard) => cmd_onboard(&store),
        Some(Commands::Plan { command }) => match command {
            PlanCommands::Show { json } => cmd_plan_show(&store, json),
            PlanCommands::Generate { seed, json } => cmd_plan_generate(&store, seed, json),
            PlanCommands::Set {
                day,
                slot,
                recipe,
                json,
            } => cmd_plan_set(&store, day, &slot, recipe, json),
        },
        Some(Commands::Targets { json }) => cmd_targets(&store, json),
        Some(Commands::Profile { command }) => match command {
            ProfileCommands::Show { json } => cmd_profile_show(&store, json),
            ProfileCommands::Set {
                name,
                age,
                height,
                weight,
                gender,
                activity,
                goal,
                json,
            } => cmd_profile_set(
                &store, name, age, height, weight, gender, activity, goal, json,
            ),
            ProfileCommands::Avatar { file, json } => cmd_profile_avatar(&store, &file, json),
            ProfileCommands::ResetOnboarding { json } => {
                cmd_profile_reset_onboarding(&store, json)
            }
        },
        Some(Commands::Restrict { command }) => match command {
            RestrictCommands::Show { json } => cmd_restrict_show(&store, json),
            RestrictCommands::Diet { diet_type, json } => {
                cmd_restrict_diet(&store, &diet_type, json)
            }
            RestrictCommands::Avoid { command } => match command {
                AvoidCommands::Add { term, json } => cmd_avoid_add(&store, &term, json),
                AvoidCommands::Remove { term, json } => cmd_avoid_remove(&store, &term, json),
                AvoidCommands::Set { terms, json } => cmd_avoid_set(&store, terms, json),
                AvoidCommands::Clear { json } => cmd_avoid_clear(&store, json),
            },
        },
        Some(Commands::Recipes { command }) => match command {
            RecipeCommands::List { json } => cmd_recipes_list(&store, json),
        },
        Some(Commands::Search {
            query,
            cuisine,
            number,
            include,
            exclude,
            halal_approx,
            save,
            plan,
            pick,
            json,
        }) => {
            let spoon = SpoonacularClient::new();
            cmd_search(
                &store,
                &spoon,
                &query,
                cuisine,
                number,
                include,
                exclude,
                halal_approx,
                save,
                plan,
                pick,
                json,
            )
            .await
        }
        Some(Commands::Serve { port, bind }) => {
            server::start_server(Arc::new(SpoonacularClient::new()), port, &bind).await
        }
        Some(Commands::Reset { yes }) => cmd_reset(&store, yes),
    }
}
