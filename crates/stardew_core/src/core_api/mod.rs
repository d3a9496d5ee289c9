mod analyzer;
mod catalog;
mod diff;
mod engine;
mod error;
mod fish_catalog;
mod recipe_catalog;
mod types;
pub mod well_known_items;

pub use analyzer::{analyze, analyze_fish, analyze_recipes, check_report};
pub use catalog::Catalog;
pub use diff::diff_snapshots;
pub use engine::{Engine, Session};
pub use error::{CoreError, CoreErrorCode};
pub use fish_catalog::{FishCatalog, decode_fish};
pub use recipe_catalog::{RecipeCatalog, decode_recipe};
pub use types::{
    AnalysisResponse, CookedRecipe, FishCatalogEntry, FishEntry, FishProgress, FishRecord,
    HealthStatus, Ingredient, MissingRecipe, ProgressDiff, ProgressReport, ProgressSnapshot,
    RawProgress, RecipeCatalogEntry, RecipeProgress, RecipeRecord, SnapshotSummary,
};
