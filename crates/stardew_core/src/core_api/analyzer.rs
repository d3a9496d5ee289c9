use std::collections::BTreeSet;

use tracing::{error, warn};

use super::catalog::Catalog;
use super::error::{CoreError, CoreErrorCode};
use super::fish_catalog::FishCatalog;
use super::recipe_catalog::RecipeCatalog;
use super::types::{
    CookedRecipe, FishEntry, FishProgress, MissingRecipe, ProgressReport, RawProgress,
    RecipeProgress,
};

pub fn analyze(catalog: &Catalog, progress: &RawProgress) -> Result<ProgressReport, CoreError> {
    let report = ProgressReport {
        recipes: analyze_recipes(catalog.recipes(), progress),
        fish: analyze_fish(catalog.fish(), progress),
    };
    check_report(&report)?;
    Ok(report)
}

/// Summary counts must equal the lengths of the lists they summarise.
pub fn check_report(report: &ProgressReport) -> Result<(), CoreError> {
    let recipes = &report.recipes;
    if !recipes.is_consistent() {
        error!(
            total = recipes.total,
            cooked = recipes.cooked,
            missing_to_cook = recipes.missing_to_cook,
            "recipe summary does not match its lists"
        );
        return Err(CoreError::new(
            CoreErrorCode::Analysis,
            format!(
                "recipe summary is inconsistent: total {}, learned {}, cooked {}, missing to learn {}, missing to cook {}",
                recipes.total,
                recipes.learned,
                recipes.cooked,
                recipes.missing_to_learn,
                recipes.missing_to_cook
            ),
        ));
    }

    let fish = &report.fish;
    if !fish.is_consistent() {
        error!(
            total = fish.total,
            caught = fish.caught,
            uncaught = fish.uncaught,
            "fish summary does not match its lists"
        );
        return Err(CoreError::new(
            CoreErrorCode::Analysis,
            format!(
                "fish summary is inconsistent: total {}, caught {}, uncaught {}",
                fish.total, fish.caught, fish.uncaught
            ),
        ));
    }
    Ok(())
}

/// Cooked ids translate through the recipe catalog id; learned keys are
/// compared against recipe names as-is.
pub fn analyze_recipes(recipes: &RecipeCatalog, progress: &RawProgress) -> RecipeProgress {
    let all: BTreeSet<&str> = recipes.names().collect();

    let cooked_names: BTreeSet<&str> = progress
        .cooked
        .keys()
        .map(|id| recipes.name_for_catalog_id(id).unwrap_or(id))
        .collect();
    let learned_ids: BTreeSet<&str> = progress.learned.keys().map(String::as_str).collect();

    let missing_to_cook: Vec<&str> = all.difference(&cooked_names).copied().collect();
    let missing_to_learn: BTreeSet<&str> = all.difference(&learned_ids).copied().collect();

    let cooked: Vec<&str> = cooked_names.intersection(&all).copied().collect();
    let learned: Vec<&str> = learned_ids.intersection(&all).copied().collect();
    let unrecognized_cooked: Vec<String> =
        cooked_names.difference(&all).map(|s| s.to_string()).collect();
    if !unrecognized_cooked.is_empty() {
        warn!(ids = ?unrecognized_cooked, "cooked entries match no catalog recipe");
    }
    let unrecognized_learned = learned_ids.difference(&all).map(|s| s.to_string()).collect();

    let missing_list: Vec<MissingRecipe> = missing_to_cook
        .iter()
        .map(|&name| MissingRecipe {
            name: name.to_string(),
            ingredients: recipes
                .get(name)
                .map(|entry| entry.ingredients.clone())
                .unwrap_or_default(),
            need_to_learn: missing_to_learn.contains(name),
        })
        .collect();

    RecipeProgress {
        total: all.len(),
        learned: learned.len(),
        cooked: cooked.len(),
        missing_to_learn: missing_to_learn.len(),
        missing_to_cook: missing_list.len(),
        missing_list,
        cooked_list: cooked
            .iter()
            .map(|&name| CookedRecipe {
                name: name.to_string(),
            })
            .collect(),
        learned_list: learned.iter().map(|s| s.to_string()).collect(),
        missing_to_learn_list: missing_to_learn.iter().map(|s| s.to_string()).collect(),
        unrecognized_learned,
        unrecognized_cooked,
    }
}

pub fn analyze_fish(fish: &FishCatalog, progress: &RawProgress) -> FishProgress {
    let all: BTreeSet<&str> = fish.ids().collect();
    let reported: BTreeSet<&str> = progress.caught_fish.keys().map(String::as_str).collect();

    let caught: BTreeSet<&str> = reported.intersection(&all).copied().collect();
    let uncaught: BTreeSet<&str> = all.difference(&caught).copied().collect();

    let total_caught = caught
        .iter()
        .filter_map(|id| progress.caught_fish.get(*id))
        .map(|&count| i64::from(count))
        .sum();

    let to_entries = |ids: &BTreeSet<&str>| -> Vec<FishEntry> {
        ids.iter()
            .filter_map(|id| fish.get(id))
            .map(|entry| FishEntry {
                id: entry.id.clone(),
                name: entry.name.clone(),
            })
            .collect()
    };

    FishProgress {
        total: all.len(),
        caught: caught.len(),
        uncaught: uncaught.len(),
        total_caught,
        missing_list: to_entries(&uncaught),
        caught_list: to_entries(&caught),
    }
}
