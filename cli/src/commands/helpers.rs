use anyhow::{Context, Result, bail};
use std::io::{self, BufRead, Write};
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use mealweek_core::models::{DayPlan, Recipe};
use mealweek_core::nutrition::Targets;
use mealweek_core::planner::{MealSlot, day_totals, weekly_average};

/// Parse a "day:slot" reference like "2:lunch" (day is 1-based).
pub(crate) fn parse_plan_ref(s: &str) -> Result<(usize, MealSlot)> {
    let parts: Vec<&str> = s.splitn(2, ':').collect();
    if parts.len() != 2 {
        bail!("Invalid plan reference '{s}'. Use format 'day:slot' (e.g. '2:lunch')");
    }
    let day: usize = parts[0]
        .trim()
        .parse()
        .with_context(|| format!("Invalid day in '{s}'"))?;
    if !(1..=7).contains(&day) {
        bail!("Day must be between 1 and 7");
    }
    let slot: MealSlot = parts[1].parse().map_err(|e: String| anyhow::anyhow!(e))?;
    Ok((day - 1, slot))
}

pub(crate) fn prompt_line(label: &str) -> Result<String> {
    eprint!("{label}: ");
    io::stderr().flush()?;
    let stdin = io::stdin();
    let line = stdin.lock().lines().next().context("No input")??;
    Ok(line.trim().to_string())
}

pub(crate) fn prompt_choice(count: usize) -> Result<usize> {
    eprint!("\nSelect a recipe (1-{count}): ");
    io::stderr().flush()?;
    let stdin = io::stdin();
    let line = stdin.lock().lines().next().context("No input")??;
    let n: usize = line.trim().parse().context("Invalid number")?;
    if n < 1 || n > count {
        bail!("Selection out of range");
    }
    Ok(n - 1)
}

pub(crate) fn confirm(question: &str) -> Result<bool> {
    let answer = prompt_line(&format!("{question} [y/N]"))?;
    Ok(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
}

pub(crate) fn print_recipe_table(recipes: &[Recipe]) {
    #[derive(Tabled)]
    struct RecipeRow {
        #[tabled(rename = "#")]
        idx: usize,
        #[tabled(rename = "Name")]
        name: String,
        #[tabled(rename = "Kcal")]
        kcal: String,
        #[tabled(rename = "P (g)")]
        protein: String,
        #[tabled(rename = "C (g)")]
        carbs: String,
        #[tabled(rename = "F (g)")]
        fat: String,
        #[tabled(rename = "Tags")]
        tags: String,
    }

    let rows: Vec<RecipeRow> = recipes
        .iter()
        .enumerate()
        .map(|(i, r)| RecipeRow {
            idx: i + 1,
            name: truncate(&r.name, 40),
            kcal: format!("{:.0}", r.kcal),
            protein: format!("{:.0}", r.protein),
            carbs: format!("{:.0}", r.carbs),
            fat: format!("{:.0}", r.fat),
            tags: truncate(&r.tags.join(", "), 25),
        })
        .collect();

    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(2..6)).with(Alignment::right()))
        .to_string();
    println!("{table}");
}

pub(crate) fn print_plan(plan: &[DayPlan], targets: &Targets) {
    #[derive(Tabled)]
    struct DayRow {
        #[tabled(rename = "Day")]
        day: usize,
        #[tabled(rename = "Breakfast")]
        breakfast: String,
        #[tabled(rename = "Lunch")]
        lunch: String,
        #[tabled(rename = "Dinner")]
        dinner: String,
        #[tabled(rename = "Kcal")]
        kcal: String,
        #[tabled(rename = "P (g)")]
        protein: String,
    }

    let slot_name = |r: &Recipe| {
        if r.is_placeholder() {
            "—".to_string()
        } else {
            truncate(&r.name, 28)
        }
    };

    let rows: Vec<DayRow> = plan
        .iter()
        .enumerate()
        .map(|(i, day)| {
            let totals = day_totals(day);
            DayRow {
                day: i + 1,
                breakfast: slot_name(&day.breakfast),
                lunch: slot_name(&day.lunch),
                dinner: slot_name(&day.dinner),
                kcal: format!("{:.0}", totals.kcal),
                protein: format!("{:.0}", totals.protein),
            }
        })
        .collect();

    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(4..6)).with(Alignment::right()))
        .to_string();
    println!("{table}");

    let avg = weekly_average(plan);
    println!(
        "Daily average: {:.0} kcal • {:.0}g P • {:.0}g C • {:.0}g F",
        avg.kcal, avg.protein, avg.carbs, avg.fat
    );
    println!(
        "Daily target:  {} kcal • {}g P • {}g C • {}g F",
        targets.kcal, targets.protein, targets.carbs, targets.fat
    );
}

pub(crate) fn print_targets(targets: &Targets) {
    println!("Calories: {} kcal", targets.kcal);
    println!("Protein:  {} g", targets.protein);
    println!("Carbs:    {} g", targets.carbs);
    println!("Fat:      {} g", targets.fat);
}

pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let end = s.char_indices().nth(max - 3).map_or(s.len(), |(i, _)| i);
        format!("{}...", &s[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plan_ref() {
        let (day, slot) = parse_plan_ref("2:lunch").unwrap();
        assert_eq!(day, 1);
        assert_eq!(slot, MealSlot::Lunch);

        let (day, slot) = parse_plan_ref("7:Dinner").unwrap();
        assert_eq!(day, 6);
        assert_eq!(slot, MealSlot::Dinner);
    }

    #[test]
    fn test_parse_plan_ref_invalid() {
        assert!(parse_plan_ref("nocolon").is_err());
        assert!(parse_plan_ref("0:lunch").is_err());
        assert!(parse_plan_ref("8:lunch").is_err());
        assert!(parse_plan_ref("2:brunch").is_err());
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world this is long", 10), "hello w...");
    }

    #[test]
    fn test_truncate_utf8() {
        // Should not panic on multi-byte characters
        assert_eq!(truncate("Crème fraîche", 10), "Crème f...");
        assert_eq!(truncate("Müsli", 10), "Müsli");
    }
}
