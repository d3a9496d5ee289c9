use std::collections::{BTreeMap, BTreeSet};

use super::types::{FishEntry, ProgressDiff, ProgressSnapshot};

/// Items that went from not-achieved in `previous` to achieved in `current`.
/// Only catches and cooks are reported; learning a recipe is not progress here.
pub fn diff_snapshots(previous: &ProgressSnapshot, current: &ProgressSnapshot) -> ProgressDiff {
    let previously_caught: BTreeSet<&str> = previous
        .fish
        .iter()
        .filter(|record| record.caught)
        .map(|record| record.fish_id.as_str())
        .collect();
    let now_caught: BTreeMap<&str, &str> = current
        .fish
        .iter()
        .filter(|record| record.caught)
        .map(|record| (record.fish_id.as_str(), record.fish_name.as_str()))
        .collect();

    let mut newly_caught_fish: Vec<FishEntry> = now_caught
        .iter()
        .filter(|(id, _)| !previously_caught.contains(*id))
        .map(|(id, name)| FishEntry {
            id: (*id).to_string(),
            name: (*name).to_string(),
        })
        .collect();
    newly_caught_fish.sort();

    let previously_cooked: BTreeSet<&str> = cooked_names(previous).collect();
    let mut newly_cooked_recipes: Vec<String> = cooked_names(current)
        .filter(|name| !previously_cooked.contains(name))
        .map(str::to_string)
        .collect();
    newly_cooked_recipes.sort();
    newly_cooked_recipes.dedup();

    ProgressDiff {
        previous_snapshot_id: previous.id,
        previous_uploaded_at: previous.uploaded_at,
        newly_caught_fish,
        newly_cooked_recipes,
    }
}

fn cooked_names(snapshot: &ProgressSnapshot) -> impl Iterator<Item = &str> {
    snapshot
        .recipes
        .iter()
        .filter(|record| record.cooked)
        .map(|record| record.recipe_name.as_str())
}
