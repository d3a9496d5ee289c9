use std::collections::BTreeMap;

use super::catalog::parse_source_table;
use super::error::CoreError;
use super::types::FishCatalogEntry;

// Jellies count toward the collection but have no row in the fish table.
const SUPPLEMENTAL_SPECIES: &[(&str, &str)] = &[
    ("CaveJelly", "Cave Jelly"),
    ("RiverJelly", "River Jelly"),
    ("SeaJelly", "Sea Jelly"),
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FishCatalog {
    entries: BTreeMap<String, FishCatalogEntry>,
}

impl FishCatalog {
    pub fn from_json_str(json: &str) -> Result<Self, CoreError> {
        Ok(Self::from_records(parse_source_table(json, "fish")?))
    }

    pub fn from_records<I, K, V>(records: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut entries = BTreeMap::new();
        for (id, encoded) in records {
            let entry = decode_fish(id.as_ref(), encoded.as_ref());
            entries.insert(entry.id.clone(), entry);
        }
        for (id, name) in SUPPLEMENTAL_SPECIES {
            entries.insert(
                (*id).to_string(),
                FishCatalogEntry {
                    id: (*id).to_string(),
                    name: (*name).to_string(),
                },
            );
        }
        Self { entries }
    }

    pub fn get(&self, id: &str) -> Option<&FishCatalogEntry> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FishCatalogEntry> {
        self.entries.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Decodes one packed fish record; only the leading display name is kept.
pub fn decode_fish(id: &str, encoded: &str) -> FishCatalogEntry {
    let name = encoded.split('/').next().unwrap_or("");
    FishCatalogEntry {
        id: id.to_string(),
        name: name.to_string(),
    }
}
