use std::path::Path;

use anyhow::{Context, Result, bail};
use base64::{Engine as _, engine::general_purpose::STANDARD};

use mealweek_core::models::{
    ProfileUpdate, validate_activity, validate_gender, validate_goal,
};
use mealweek_core::store::AppStore;

pub(crate) fn cmd_profile_show(store: &AppStore, json: bool) -> Result<()> {
    let profile = store.get_profile();

    if json {
        println!("{}", serde_json::to_string_pretty(&profile)?);
        return Ok(());
    }

    let fmt_num = |v: Option<f64>| v.map_or("—".to_string(), |n| format!("{n}"));
    println!(
        "Name:     {}",
        if profile.name.is_empty() {
            "—"
        } else {
            profile.name.as_str()
        }
    );
    println!("Age:      {}", fmt_num(profile.age));
    println!("Height:   {} cm", fmt_num(profile.height));
    println!("Weight:   {} kg", fmt_num(profile.weight));
    println!("Gender:   {}", profile.gender);
    println!("Activity: {}", profile.activity);
    println!("Goal:     {}", profile.goal);
    println!(
        "Avatar:   {}",
        if profile.avatar.is_empty() { "none" } else { "set" }
    );
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn cmd_profile_set(
    store: &AppStore,
    name: Option<String>,
    age: Option<f64>,
    height: Option<f64>,
    weight: Option<f64>,
    gender: Option<String>,
    activity: Option<String>,
    goal: Option<String>,
    json: bool,
) -> Result<()> {
    for (label, value) in [("age", age), ("height", height), ("weight", weight)] {
        if let Some(v) = value {
            if v <= 0.0 {
                bail!("{label} must be a positive number");
            }
        }
    }

    let update = ProfileUpdate {
        name,
        age,
        height,
        weight,
        gender: gender.as_deref().map(validate_gender).transpose()?,
        activity: activity.as_deref().map(validate_activity).transpose()?,
        goal: goal.as_deref().map(validate_goal).transpose()?,
        avatar: None,
    };
    store.set_profile(update);

    if json {
        println!("{}", serde_json::to_string_pretty(&store.get_profile())?);
    } else {
        println!("Profile updated");
    }
    Ok(())
}

/// Encodes an image file as an opaque data-URL blob on the profile.
pub(crate) fn cmd_profile_avatar(store: &AppStore, file: &Path, json: bool) -> Result<()> {
    let bytes = std::fs::read(file)
        .with_context(|| format!("Failed to read avatar file: {}", file.display()))?;

    let mime = match file.extension().and_then(|e| e.to_str()) {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => bail!("Unsupported avatar format. Use png, jpg, gif, or webp"),
    };

    let avatar = format!("data:{mime};base64,{}", STANDARD.encode(&bytes));
    store.set_profile(ProfileUpdate {
        avatar: Some(avatar),
        ..ProfileUpdate::default()
    });

    if json {
        println!("{}", serde_json::json!({ "avatar": "set" }));
    } else {
        println!("Avatar updated");
    }
    Ok(())
}

/// Re-opens the onboarding fork without touching any data.
pub(crate) fn cmd_profile_reset_onboarding(store: &AppStore, json: bool) -> Result<()> {
    store.set_onboarding_complete(false);
    if json {
        println!("{}", serde_json::json!({ "onboardingComplete": false }));
    } else {
        println!("Onboarding unlocked. Run `mealweek` to re-run the steps; your data is kept.");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_profile_set_validates_numbers() {
        let store = AppStore::in_memory();
        let result = cmd_profile_set(
            &store,
            None,
            Some(-5.0),
            None,
            None,
            None,
            None,
            None,
            false,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_profile_set_merges_partially() {
        let store = AppStore::in_memory();
        cmd_profile_set(
            &store,
            Some("Sam".to_string()),
            Some(30.0),
            None,
            None,
            None,
            None,
            None,
            false,
        )
        .unwrap();
        cmd_profile_set(
            &store,
            None,
            None,
            None,
            Some(82.0),
            None,
            None,
            Some("Muscle".to_string()),
            false,
        )
        .unwrap();

        let p = store.get_profile();
        assert_eq!(p.name, "Sam");
        assert_eq!(p.age, Some(30.0));
        assert_eq!(p.weight, Some(82.0));
        assert_eq!(p.goal, "muscle");
    }

    #[test]
    fn test_avatar_encodes_file() {
        let store = AppStore::in_memory();
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("me.png");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(&[0x89, 0x50, 0x4e, 0x47]).unwrap();

        cmd_profile_avatar(&store, &path, false).unwrap();

        let avatar = store.get_profile().avatar;
        assert!(avatar.starts_with("data:image/png;base64,"));
    }

    #[test]
    fn test_avatar_rejects_unknown_extension() {
        let store = AppStore::in_memory();
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("me.bmp");
        std::fs::write(&path, b"x").unwrap();
        assert!(cmd_profile_avatar(&store, &path, false).is_err());
    }
}
