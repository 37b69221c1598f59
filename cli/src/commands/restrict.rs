use anyhow::Result;

use mealweek_core::models::{RestrictionsUpdate, validate_diet_type};
use mealweek_core::store::AppStore;

pub(crate) fn cmd_restrict_show(store: &AppStore, json: bool) -> Result<()> {
    let restrictions = store.get_restrictions();

    if json {
        println!("{}", serde_json::to_string_pretty(&restrictions)?);
    } else {
        println!("Diet type: {}", restrictions.diet_type);
        if restrictions.avoid.is_empty() {
            println!("Avoiding:  nothing");
        } else {
            println!("Avoiding:  {}", restrictions.avoid.join(", "));
        }
    }
    Ok(())
}

pub(crate) fn cmd_restrict_diet(store: &AppStore, diet_type: &str, json: bool) -> Result<()> {
    let diet_type = validate_diet_type(diet_type)?;
    store.set_restrictions(RestrictionsUpdate {
        diet_type: Some(diet_type.clone()),
        avoid: None,
    });

    if json {
        println!("{}", serde_json::to_string_pretty(&store.get_restrictions())?);
    } else {
        println!("Diet type set to {diet_type}");
    }
    Ok(())
}

pub(crate) fn cmd_avoid_add(store: &AppStore, term: &str, json: bool) -> Result<()> {
    store.add_avoid(term);
    print_avoids(store, json)
}

pub(crate) fn cmd_avoid_remove(store: &AppStore, term: &str, json: bool) -> Result<()> {
    store.remove_avoid(term);
    print_avoids(store, json)
}

pub(crate) fn cmd_avoid_set(store: &AppStore, terms: Vec<String>, json: bool) -> Result<()> {
    store.set_avoids(terms);
    print_avoids(store, json)
}

pub(crate) fn cmd_avoid_clear(store: &AppStore, json: bool) -> Result<()> {
    store.set_avoids(Vec::new());
    print_avoids(store, json)
}

fn print_avoids(store: &AppStore, json: bool) -> Result<()> {
    let avoid = store.get_restrictions().avoid;
    if json {
        println!("{}", serde_json::to_string_pretty(&avoid)?);
    } else if avoid.is_empty() {
        println!("Avoiding: nothing");
    } else {
        println!("Avoiding: {}", avoid.join(", "));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diet_roundtrip() {
        let store = AppStore::in_memory();
        cmd_restrict_diet(&store, "Halal", false).unwrap();
        assert_eq!(store.get_restrictions().diet_type, "halal");
    }

    #[test]
    fn test_diet_rejects_unknown() {
        let store = AppStore::in_memory();
        assert!(cmd_restrict_diet(&store, "keto", false).is_err());
    }

    #[test]
    fn test_avoid_add_remove_cycle() {
        let store = AppStore::in_memory();
        cmd_avoid_add(&store, "Mushrooms", false).unwrap();
        cmd_avoid_add(&store, "fish", false).unwrap();
        cmd_avoid_add(&store, "mushrooms", false).unwrap();
        assert_eq!(store.get_restrictions().avoid, vec!["Mushrooms", "fish"]);

        cmd_avoid_remove(&store, "MUSHROOMS", false).unwrap();
        assert_eq!(store.get_restrictions().avoid, vec!["fish"]);

        cmd_avoid_clear(&store, false).unwrap();
        assert!(store.get_restrictions().avoid.is_empty());
    }
}
