use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Ingredient {
    pub name: String,
    pub quantity: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RecipeCatalogEntry {
    pub name: String,
    pub ingredients: Vec<Ingredient>,
    pub output_quantity: u32,
    pub catalog_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FishCatalogEntry {
    pub id: String,
    pub name: String,
}

/// Progress exactly as the save records it, keyed by raw game identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RawProgress {
    pub learned: BTreeMap<String, i32>,
    pub cooked: BTreeMap<String, i32>,
    pub caught_fish: BTreeMap<String, i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MissingRecipe {
    pub name: String,
    pub ingredients: Vec<Ingredient>,
    pub need_to_learn: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CookedRecipe {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RecipeProgress {
    pub total: usize,
    pub learned: usize,
    pub cooked: usize,
    pub missing_to_learn: usize,
    pub missing_to_cook: usize,
    pub missing_list: Vec<MissingRecipe>,
    pub cooked_list: Vec<CookedRecipe>,
    pub learned_list: Vec<String>,
    pub missing_to_learn_list: Vec<String>,
    pub unrecognized_learned: Vec<String>,
    pub unrecognized_cooked: Vec<String>,
}

impl RecipeProgress {
    pub fn is_consistent(&self) -> bool {
        self.learned == self.learned_list.len()
            && self.cooked == self.cooked_list.len()
            && self.missing_to_learn == self.missing_to_learn_list.len()
            && self.missing_to_cook == self.missing_list.len()
            && self.total == self.learned + self.missing_to_learn
            && self.total == self.cooked + self.missing_to_cook
    }
}

/// A fish identified by catalog id, carrying its display name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FishEntry {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FishProgress {
    pub total: usize,
    pub caught: usize,
    pub uncaught: usize,
    pub total_caught: i64,
    pub missing_list: Vec<FishEntry>,
    pub caught_list: Vec<FishEntry>,
}

impl FishProgress {
    pub fn is_consistent(&self) -> bool {
        self.caught == self.caught_list.len()
            && self.uncaught == self.missing_list.len()
            && self.total == self.caught + self.uncaught
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProgressReport {
    pub recipes: RecipeProgress,
    pub fish: FishProgress,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FishRecord {
    pub fish_id: String,
    pub fish_name: String,
    pub caught: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RecipeRecord {
    pub recipe_name: String,
    pub learned: bool,
    pub cooked: bool,
}

/// One persisted upload: a status row for every catalog fish and recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProgressSnapshot {
    pub id: i64,
    pub uploaded_at: DateTime<Utc>,
    pub fish: Vec<FishRecord>,
    pub recipes: Vec<RecipeRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SnapshotSummary {
    pub id: i64,
    pub uploaded_at: DateTime<Utc>,
    pub fish_caught: usize,
    pub recipes_learned: usize,
    pub recipes_cooked: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProgressDiff {
    pub previous_snapshot_id: i64,
    pub previous_uploaded_at: DateTime<Utc>,
    pub newly_caught_fish: Vec<FishEntry>,
    pub newly_cooked_recipes: Vec<String>,
}

impl ProgressDiff {
    pub fn is_empty(&self) -> bool {
        self.newly_caught_fish.is_empty() && self.newly_cooked_recipes.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisResponse {
    pub snapshot_id: i64,
    pub report: ProgressReport,
    pub progress_since: Option<ProgressDiff>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
}
