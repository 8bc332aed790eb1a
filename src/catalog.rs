use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// One named encounter in the catalog document: the boss display names it
/// covers, keyed to the trigger ids the reporting service emits for each
/// boss and difficulty combination, plus a categorization array whose second
/// element is the wing number.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub name: String,
    pub bosses: BTreeMap<String, u64>,
    pub categories: Vec<u32>,
}

/// Static boss classification table, loaded once at startup and read-only
/// afterwards.
#[derive(Debug, Clone)]
pub struct EncounterCatalog {
    entries: Vec<CatalogEntry>,
}

impl EncounterCatalog {
    pub fn from_entries(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw_json = std::fs::read_to_string(path).with_context(|| {
            format!("Failed to read encounter catalog '{}'", path.display())
        })?;

        let entries: Vec<CatalogEntry> = serde_json::from_str(&raw_json).with_context(|| {
            format!("Failed to parse encounter catalog '{}'", path.display())
        })?;

        Ok(Self::from_entries(entries))
    }

    /// Resolves the wing label for a boss trigger id. An id absent from the
    /// catalog means the report cannot be classified, which is fatal for the
    /// whole session build.
    pub fn wing_label_for_trigger(&self, trigger_id: u64) -> Result<String> {
        for entry in &self.entries {
            if entry.bosses.values().any(|&boss_id| boss_id == trigger_id) {
                let wing_number = entry.categories.get(1).with_context(|| {
                    format!(
                        "Encounter catalog entry '{}' is missing its wing category",
                        entry.name
                    )
                })?;
                return Ok(format!("Wing {wing_number}"));
            }
        }

        bail!("Unknown boss trigger id {trigger_id} in the encounter catalog")
    }
}
