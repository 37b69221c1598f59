//! Spoonacular complexSearch response shapes and the mapping into library
//! recipes.

use serde::Deserialize;

use crate::models::Recipe;

#[derive(Debug, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
pub struct SearchResult {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub image: String,
    pub nutrition: Option<Nutrition>,
}

#[derive(Debug, Deserialize)]
pub struct Nutrition {
    #[serde(default)]
    pub nutrients: Vec<Nutrient>,
}

#[derive(Debug, Deserialize)]
pub struct Nutrient {
    pub name: String,
    pub amount: f64,
    #[serde(default)]
    pub unit: String,
}

/// "Halal (approx)" exclusion list for the search boundary. A heuristic
/// policy table, not a certified compliance check; distinct from the
/// smaller list the plan generator implies.
pub const HALAL_APPROX_EXCLUDES: &[&str] = &[
    "pork",
    "bacon",
    "ham",
    "prosciutto",
    "pepperoni",
    "salami",
    "chorizo",
    "mortadella",
    "pancetta",
    "lard",
    "wine",
    "beer",
    "rum",
    "whiskey",
    "vodka",
    "brandy",
    "gin",
    "sake",
    "vermouth",
    "cognac",
    "bourbon",
    "baileys",
    "gelatin",
];

/// Unions the caller's exclude terms with the approximate-halal table:
/// trimmed, empties dropped, first occurrence wins.
#[must_use]
pub fn build_exclude_list(exclude: &[String], halal_approx: bool) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let extra = if halal_approx {
        HALAL_APPROX_EXCLUDES
    } else {
        &[]
    };
    for term in exclude.iter().map(String::as_str).chain(extra.iter().copied()) {
        let trimmed = term.trim();
        if trimmed.is_empty() || out.iter().any(|t| t == trimmed) {
            continue;
        }
        out.push(trimmed.to_string());
    }
    out
}

/// Maps a provider result into a library recipe: nutrients looked up by
/// case-insensitive name, amounts rounded, the provider id kept as a
/// string. Missing nutrition reads as zeros, never an error.
#[must_use]
pub fn result_to_recipe(result: &SearchResult) -> Recipe {
    let nutrients = result
        .nutrition
        .as_ref()
        .map(|n| n.nutrients.as_slice())
        .unwrap_or_default();
    let amount = |name: &str| {
        nutrients
            .iter()
            .find(|n| n.name.eq_ignore_ascii_case(name))
            .map_or(0.0, |n| n.amount.round())
    };
    Recipe {
        id: Some(result.id.to_string()),
        name: result.title.clone(),
        kcal: amount("Calories"),
        protein: amount("Protein"),
        carbs: amount("Carbohydrates"),
        fat: amount("Fat"),
        tags: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_result() -> SearchResult {
        SearchResult {
            id: 6421,
            title: "Herbed Chicken with Rice".to_string(),
            image: "https://img.spoonacular.com/recipes/6421.jpg".to_string(),
            nutrition: Some(Nutrition {
                nutrients: vec![
                    Nutrient {
                        name: "Calories".to_string(),
                        amount: 512.4,
                        unit: "kcal".to_string(),
                    },
                    Nutrient {
                        name: "Protein".to_string(),
                        amount: 41.6,
                        unit: "g".to_string(),
                    },
                    Nutrient {
                        name: "Carbohydrates".to_string(),
                        amount: 49.9,
                        unit: "g".to_string(),
                    },
                    Nutrient {
                        name: "Fat".to_string(),
                        amount: 14.2,
                        unit: "g".to_string(),
                    },
                ],
            }),
        }
    }

    #[test]
    fn test_result_to_recipe_complete() {
        let recipe = result_to_recipe(&full_result());
        assert_eq!(recipe.id.as_deref(), Some("6421"));
        assert_eq!(recipe.name, "Herbed Chicken with Rice");
        assert!((recipe.kcal - 512.0).abs() < f64::EPSILON);
        assert!((recipe.protein - 42.0).abs() < f64::EPSILON);
        assert!((recipe.carbs - 50.0).abs() < f64::EPSILON);
        assert!((recipe.fat - 14.0).abs() < f64::EPSILON);
        assert!(recipe.tags.is_empty());
    }

    #[test]
    fn test_result_to_recipe_nutrient_names_case_insensitive() {
        let mut r = full_result();
        for n in &mut r.nutrition.as_mut().unwrap().nutrients {
            n.name = n.name.to_uppercase();
        }
        let recipe = result_to_recipe(&r);
        assert!((recipe.kcal - 512.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_result_to_recipe_missing_nutrition() {
        let mut r = full_result();
        r.nutrition = None;
        let recipe = result_to_recipe(&r);
        assert_eq!(recipe.name, "Herbed Chicken with Rice");
        assert!((recipe.kcal).abs() < f64::EPSILON);
        assert!((recipe.protein).abs() < f64::EPSILON);
    }

    #[test]
    fn test_search_response_tolerates_missing_results() {
        let resp: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.results.is_empty());
    }

    #[test]
    fn test_build_exclude_list_plain() {
        let exclude = vec![" fish ".to_string(), String::new(), "fish".to_string()];
        assert_eq!(build_exclude_list(&exclude, false), vec!["fish"]);
    }

    #[test]
    fn test_build_exclude_list_unions_halal_table() {
        let exclude = vec!["pork".to_string(), "mushrooms".to_string()];
        let list = build_exclude_list(&exclude, true);
        // Caller terms come first; the table is appended without duplicates.
        assert_eq!(list[0], "pork");
        assert_eq!(list[1], "mushrooms");
        assert_eq!(list.iter().filter(|t| *t == "pork").count(), 1);
        assert!(list.contains(&"gelatin".to_string()));
        assert_eq!(list.len(), 1 + HALAL_APPROX_EXCLUDES.len());
    }

    #[test]
    fn test_build_exclude_list_empty_without_flag() {
        assert!(build_exclude_list(&[], false).is_empty());
        assert_eq!(build_exclude_list(&[], true).len(), HALAL_APPROX_EXCLUDES.len());
    }
}
