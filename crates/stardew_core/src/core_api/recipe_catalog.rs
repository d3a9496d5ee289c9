use std::collections::BTreeMap;

use tracing::debug;

use super::catalog::parse_source_table;
use super::error::{CoreError, CoreErrorCode};
use super::types::{Ingredient, RecipeCatalogEntry};
use super::well_known_items;

const RECIPE_FIELD_INGREDIENTS: usize = 0;
const RECIPE_FIELD_CATALOG_ID: usize = 2;
const RECIPE_OUTPUT_QUANTITY: u32 = 1;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeCatalog {
    entries: BTreeMap<String, RecipeCatalogEntry>,
    names_by_catalog_id: BTreeMap<String, String>,
}

impl RecipeCatalog {
    pub fn from_json_str(json: &str) -> Result<Self, CoreError> {
        Self::from_records(parse_source_table(json, "recipe")?)
    }

    pub fn from_records<I, K, V>(records: I) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut entries = BTreeMap::new();
        for (name, encoded) in records {
            let entry = decode_recipe(name.as_ref(), encoded.as_ref())?;
            entries.insert(entry.name.clone(), entry);
        }

        // Entries iterate by name, so a catalog id shared by several recipes
        // resolves to the alphabetically first one.
        let mut names_by_catalog_id = BTreeMap::new();
        for entry in entries.values() {
            if let Some(id) = &entry.catalog_id {
                names_by_catalog_id
                    .entry(id.clone())
                    .or_insert_with(|| entry.name.clone());
            }
        }

        Ok(Self {
            entries,
            names_by_catalog_id,
        })
    }

    pub fn get(&self, name: &str) -> Option<&RecipeCatalogEntry> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn name_for_catalog_id(&self, catalog_id: &str) -> Option<&str> {
        self.names_by_catalog_id.get(catalog_id).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RecipeCatalogEntry> {
        self.entries.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Decodes one packed recipe record, e.g. `"-5 1/10 10/194/default"`.
pub fn decode_recipe(name: &str, encoded: &str) -> Result<RecipeCatalogEntry, CoreError> {
    let fields: Vec<&str> = encoded.trim_matches('/').split('/').collect();
    let ingredient_field = fields.get(RECIPE_FIELD_INGREDIENTS).copied().unwrap_or("");

    let tokens: Vec<&str> = ingredient_field.split_whitespace().collect();
    if tokens.len() % 2 != 0 {
        return Err(CoreError::new(
            CoreErrorCode::CatalogLoad,
            format!("recipe {name:?} has an unpaired ingredient token in {ingredient_field:?}"),
        ));
    }

    let mut ingredients = Vec::with_capacity(tokens.len() / 2);
    for pair in tokens.chunks_exact(2) {
        let (item_id, quantity) = (pair[0], pair[1]);
        let quantity = quantity.parse::<i32>().map_err(|e| {
            CoreError::new(
                CoreErrorCode::CatalogLoad,
                format!("recipe {name:?} has invalid quantity {quantity:?} for item {item_id}: {e}"),
            )
        })?;
        if well_known_items::lookup(item_id).is_none() {
            debug!(recipe = name, item_id, "unrecognized ingredient id");
        }
        ingredients.push(Ingredient {
            name: well_known_items::display_name(item_id),
            quantity,
        });
    }

    Ok(RecipeCatalogEntry {
        name: name.to_string(),
        ingredients,
        output_quantity: RECIPE_OUTPUT_QUANTITY,
        catalog_id: fields
            .get(RECIPE_FIELD_CATALOG_ID)
            .map(|id| (*id).to_string()),
    })
}
