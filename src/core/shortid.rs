//! Short ID system for easier entity selection
//!
//! Listings hand out aliases that map to full entity IDs:
//! - Entity-prefixed: `STK@1`, `SHOP@2`, `RCP@3` (stable, never reused)
//! - Simple: `@1`, `@2` (position in the most recent listing)
//!
//! The index lives in `<data_dir>/shortids.json` and is updated whenever
//! entities are listed.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::core::identity::EntityId;

const INDEX_FILE: &str = "shortids.json";

/// A mapping of short IDs to full entity IDs
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ShortIdIndex {
    /// "PREFIX@N" to full ID
    #[serde(default)]
    entries: BTreeMap<String, EntityId>,
    /// Next number per prefix
    #[serde(default)]
    next_ids: BTreeMap<String, u32>,
    /// IDs of the most recent listing; `@N` is position N
    #[serde(default)]
    listing: Vec<EntityId>,
    /// Full ID to "PREFIX@N"
    #[serde(skip)]
    reverse: BTreeMap<EntityId, String>,
}

impl ShortIdIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn path(data_dir: &Path) -> PathBuf {
        data_dir.join(INDEX_FILE)
    }

    /// Load the index from a data directory, or start empty
    pub fn load(data_dir: &Path) -> Self {
        let path = Self::path(data_dir);
        let Ok(content) = fs::read_to_string(&path) else {
            return Self::new();
        };
        match serde_json::from_str::<ShortIdIndex>(&content) {
            Ok(mut index) => {
                index.reverse = index
                    .entries
                    .iter()
                    .map(|(k, v)| (*v, k.clone()))
                    .collect();
                index
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Ignoring unreadable short id index");
                Self::new()
            }
        }
    }

    pub fn save(&self, data_dir: &Path) -> std::io::Result<()> {
        fs::create_dir_all(data_dir)?;
        let content = serde_json::to_string_pretty(self)?;
        fs::write(Self::path(data_dir), content)
    }

    /// Replace the current listing, assigning prefixed aliases to new IDs
    pub fn rebuild(&mut self, ids: impl IntoIterator<Item = EntityId>) {
        self.listing.clear();
        for id in ids {
            self.add(id);
        }
        debug!(count = self.listing.len(), "Rebuilt short id listing");
    }

    /// Append an ID to the listing and return its simple number
    pub fn add(&mut self, id: EntityId) -> u32 {
        let simple = match self.listing.iter().position(|listed| *listed == id) {
            Some(position) => position,
            None => {
                self.listing.push(id);
                self.listing.len() - 1
            }
        };

        if !self.reverse.contains_key(&id) {
            let prefix = id.prefix().as_str();
            let next = self.next_ids.entry(prefix.to_string()).or_insert(1);
            let key = format!("{}@{}", prefix, next);
            *next += 1;
            self.entries.insert(key.clone(), id);
            self.reverse.insert(id, key);
        }

        simple as u32 + 1
    }

    /// Whether `reference` has the shape of a short ID
    pub fn is_short_ref(reference: &str) -> bool {
        let number = match reference.split_once('@') {
            Some((prefix, number)) if prefix.chars().all(|c| c.is_ascii_alphabetic()) => number,
            Some(_) => return false,
            None => reference,
        };
        !number.is_empty() && number.chars().all(|c| c.is_ascii_digit())
    }

    /// Resolve `PREFIX@N`, `@N` or a bare number to a full ID
    pub fn resolve(&self, reference: &str) -> Option<EntityId> {
        let reference = reference.trim();
        if !Self::is_short_ref(reference) {
            return None;
        }

        match reference.split_once('@') {
            Some((prefix, _)) if !prefix.is_empty() => {
                self.entries.get(&reference.to_ascii_uppercase()).copied()
            }
            Some((_, number)) => self.listed(number),
            None => self.listed(reference),
        }
    }

    fn listed(&self, number: &str) -> Option<EntityId> {
        let n: usize = number.parse().ok()?;
        self.listing.get(n.checked_sub(1)?).copied()
    }

    /// Simple number of an ID in the current listing
    pub fn get_short_id(&self, id: &EntityId) -> Option<u32> {
        self.listing
            .iter()
            .position(|listed| listed == id)
            .map(|position| position as u32 + 1)
    }

    /// Prefixed alias of an ID (e.g. "STK@1")
    pub fn get_prefixed_short_id(&self, id: &EntityId) -> Option<&str> {
        self.reverse.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.listing.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listing.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::identity::EntityPrefix;
    use tempfile::tempdir;

    #[test]
    fn test_short_id_add_and_resolve() {
        let mut index = ShortIdIndex::new();
        let a = EntityId::new(EntityPrefix::Stk);
        let b = EntityId::new(EntityPrefix::Stk);

        assert_eq!(index.add(a), 1);
        assert_eq!(index.add(b), 2);
        assert_eq!(index.add(a), 1);

        assert_eq!(index.resolve("@1"), Some(a));
        assert_eq!(index.resolve("2"), Some(b));
        assert_eq!(index.resolve("@99"), None);
        assert_eq!(index.resolve("@0"), None);
    }

    #[test]
    fn test_prefixed_short_ids_are_per_prefix() {
        let mut index = ShortIdIndex::new();
        let stk = EntityId::new(EntityPrefix::Stk);
        let shop = EntityId::new(EntityPrefix::Shop);
        index.rebuild(vec![stk, shop]);

        assert_eq!(index.resolve("STK@1"), Some(stk));
        assert_eq!(index.resolve("shop@1"), Some(shop));
        assert_eq!(index.get_prefixed_short_id(&shop), Some("SHOP@1"));
        assert_eq!(index.resolve("RCP@1"), None);
    }

    #[test]
    fn test_rebuild_keeps_prefixed_aliases() {
        let mut index = ShortIdIndex::new();
        let old = EntityId::new(EntityPrefix::Rcp);
        index.rebuild(vec![old]);

        let new = EntityId::new(EntityPrefix::Rcp);
        index.rebuild(vec![new, old]);

        assert_eq!(index.len(), 2);
        assert_eq!(index.resolve("@1"), Some(new));
        assert_eq!(index.resolve("RCP@1"), Some(old));
        assert_eq!(index.resolve("RCP@2"), Some(new));
    }

    #[test]
    fn test_names_are_not_short_refs() {
        assert!(ShortIdIndex::is_short_ref("@3"));
        assert!(ShortIdIndex::is_short_ref("STK@3"));
        assert!(ShortIdIndex::is_short_ref("12"));
        assert!(!ShortIdIndex::is_short_ref("milk"));
        assert!(!ShortIdIndex::is_short_ref("STK-01ABC"));
        assert!(!ShortIdIndex::is_short_ref("@"));
        assert_eq!(ShortIdIndex::new().resolve("milk"), None);
    }

    #[test]
    fn test_save_and_load() {
        let tmp = tempdir().unwrap();
        let mut index = ShortIdIndex::new();
        let id = EntityId::new(EntityPrefix::Shop);
        index.rebuild(vec![id]);
        index.save(tmp.path()).unwrap();

        let loaded = ShortIdIndex::load(tmp.path());
        assert_eq!(loaded.resolve("@1"), Some(id));
        assert_eq!(loaded.resolve("SHOP@1"), Some(id));
        assert_eq!(loaded.get_prefixed_short_id(&id), Some("SHOP@1"));
    }

    #[test]
    fn test_unreadable_index_starts_empty() {
        let tmp = tempdir().unwrap();
        fs::write(tmp.path().join(INDEX_FILE), "not json").unwrap();
        assert!(ShortIdIndex::load(tmp.path()).is_empty());
    }
}
