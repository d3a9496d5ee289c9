use std::fs;
use std::path::Path;

use serde_json::Value as JsonValue;
use tracing::info;

use super::error::{CoreError, CoreErrorCode};
use super::fish_catalog::FishCatalog;
use super::recipe_catalog::RecipeCatalog;

const CONTENT_KEY: &str = "content";

/// Every recipe and fish the game knows about. Loaded once, then shared
/// read-only between requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    recipes: RecipeCatalog,
    fish: FishCatalog,
}

impl Catalog {
    pub fn new(recipes: RecipeCatalog, fish: FishCatalog) -> Self {
        Self { recipes, fish }
    }

    pub fn load_from_paths(recipes_path: &Path, fish_path: &Path) -> Result<Self, CoreError> {
        let recipes_json = read_source_file(recipes_path)?;
        let fish_json = read_source_file(fish_path)?;
        let catalog = Self::from_json_strs(&recipes_json, &fish_json)?;
        info!(
            recipes = catalog.recipes.len(),
            fish = catalog.fish.len(),
            "loaded catalog from {} and {}",
            recipes_path.display(),
            fish_path.display()
        );
        Ok(catalog)
    }

    pub fn from_json_strs(recipes_json: &str, fish_json: &str) -> Result<Self, CoreError> {
        Ok(Self {
            recipes: RecipeCatalog::from_json_str(recipes_json)?,
            fish: FishCatalog::from_json_str(fish_json)?,
        })
    }

    pub fn recipes(&self) -> &RecipeCatalog {
        &self.recipes
    }

    pub fn fish(&self) -> &FishCatalog {
        &self.fish
    }
}

fn read_source_file(path: &Path) -> Result<String, CoreError> {
    fs::read_to_string(path).map_err(|e| {
        CoreError::new(
            CoreErrorCode::CatalogLoad,
            format!("failed to read {}: {e}", path.display()),
        )
    })
}

/// Decodes a source table into `(key, encoded record)` pairs. The table may be
/// a bare object or nested under a `content` key.
pub(crate) fn parse_source_table(
    json: &str,
    label: &str,
) -> Result<Vec<(String, String)>, CoreError> {
    let root: JsonValue = serde_json::from_str(json).map_err(|e| {
        CoreError::new(
            CoreErrorCode::CatalogLoad,
            format!("{label} table is not valid JSON: {e}"),
        )
    })?;

    let JsonValue::Object(mut object) = root else {
        return Err(CoreError::new(
            CoreErrorCode::CatalogLoad,
            format!("{label} table must be a JSON object"),
        ));
    };

    let table = match object.remove(CONTENT_KEY) {
        Some(JsonValue::Object(content)) => content,
        Some(_) => {
            return Err(CoreError::new(
                CoreErrorCode::CatalogLoad,
                format!("{label} table has a non-object `{CONTENT_KEY}` field"),
            ));
        }
        None => object,
    };

    table
        .into_iter()
        .map(|(key, value)| match value {
            JsonValue::String(encoded) => Ok((key, encoded)),
            other => Err(CoreError::new(
                CoreErrorCode::CatalogLoad,
                format!("{label} record {key:?} is not a string: {other}"),
            )),
        })
        .collect()
}
