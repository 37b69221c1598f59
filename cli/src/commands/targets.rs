use anyhow::Result;

use mealweek_core::nutrition::calc_targets;
use mealweek_core::store::AppStore;

use super::helpers::print_targets;

pub(crate) fn cmd_targets(store: &AppStore, json: bool) -> Result<()> {
    let profile = store.get_profile();
    let targets = calc_targets(&profile);

    if json {
        println!("{}", serde_json::to_string_pretty(&targets)?);
    } else {
        if !profile.is_complete() {
            eprintln!("Profile incomplete — showing fallback targets. Run `mealweek onboard`.");
        }
        print_targets(&targets);
    }
    Ok(())
}
