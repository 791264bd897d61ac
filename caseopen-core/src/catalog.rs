use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::rarity::{Rarity, RarityTable};
use crate::{CaseError, Result};

/// A droppable item.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub rarity: Rarity,
}

impl Item {
    pub fn new(name: impl Into<String>, rarity: Rarity) -> Self {
        Self {
            name: name.into(),
            rarity,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    case: CaseDocument,
}

#[derive(Debug, Deserialize)]
struct CaseDocument {
    #[serde(default)]
    name: Option<String>,
    skins: Vec<Item>,
}

/// The contents of one case, in source order.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    name: Option<String>,
    items: Vec<Item>,
    // Positions into `items`, one list per rarity index.
    pools: [Vec<usize>; 5],
}

impl Catalog {
    pub fn new(items: Vec<Item>) -> Result<Self> {
        Self::build(None, items, "<memory>")
    }

    /// Reads a catalog document such as `{"case": {"skins": [...]}}`.
    pub fn load(path: &Path) -> Result<Self> {
        let origin = path.display().to_string();
        let data = fs::read_to_string(path).map_err(|e| CaseError::CatalogLoadFailure {
            origin: origin.clone(),
            reason: e.to_string(),
        })?;
        Self::from_json_str(&data, &origin)
    }

    pub fn from_json_str(data: &str, origin: &str) -> Result<Self> {
        let doc: CatalogDocument =
            serde_json::from_str(data).map_err(|e| CaseError::CatalogLoadFailure {
                origin: origin.to_string(),
                reason: e.to_string(),
            })?;
        let catalog = Self::build(doc.case.name, doc.case.skins, origin)?;
        log::debug!(
            "loaded {} items from {} ({})",
            catalog.len(),
            origin,
            catalog.name().unwrap_or("unnamed case"),
        );
        Ok(catalog)
    }

    fn build(name: Option<String>, items: Vec<Item>, origin: &str) -> Result<Self> {
        let mut pools: [Vec<usize>; 5] = Default::default();
        {
            let mut seen = HashSet::new();
            for (pos, item) in items.iter().enumerate() {
                if !seen.insert(item.name.as_str()) {
                    return Err(CaseError::CatalogLoadFailure {
                        origin: origin.to_string(),
                        reason: format!("duplicate item name '{}'", item.name),
                    });
                }
                pools[item.rarity.index()].push(pos);
            }
        }

        Ok(Self { name, items, pools })
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.name == name)
    }

    pub fn items_of(&self, rarity: Rarity) -> impl Iterator<Item = &Item> + '_ {
        self.pools[rarity.index()].iter().map(move |&pos| &self.items[pos])
    }

    /// Picks uniformly among the items of `rarity`.
    pub fn select<R: Rng + ?Sized>(&self, rarity: Rarity, rng: &mut R) -> Result<&Item> {
        self.pools[rarity.index()]
            .choose(rng)
            .map(|&pos| &self.items[pos])
            .ok_or(CaseError::EmptyRarityPool { rarity })
    }

    /// Rarities with a positive weight in `table` but no items here.
    pub fn missing_rarities(&self, table: &RarityTable) -> Vec<Rarity> {
        Rarity::ALL
            .iter()
            .copied()
            .filter(|rarity| table.weight_of(*rarity) > 0.0)
            .filter(|rarity| self.pools[rarity.index()].is_empty())
            .collect()
    }
}
