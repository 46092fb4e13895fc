//! Stock ledger - the pantry collection
//!
//! Items are unique by (case-insensitive name, exact unit). Adding an item
//! that already exists merges quantities instead of creating a duplicate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use crate::core::categorize::default_categories;
use crate::core::entity::{
    is_other, names_match, normalize_category, normalize_unit, require_name, require_quantity,
    Entity, ValidationError,
};
use crate::core::identity::{EntityId, EntityPrefix};

/// A tracked good
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockItem {
    pub id: EntityId,

    /// Display name, first letter upper-cased
    pub name: String,

    /// Never negative
    pub quantity: f64,

    pub unit: String,

    pub category: String,

    /// When the item first entered the pantry
    #[serde(default = "Utc::now")]
    pub added: DateTime<Utc>,
}

impl Entity for StockItem {
    const PREFIX: &'static str = "STK";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn created(&self) -> DateTime<Utc> {
        self.added
    }
}

/// Manual edit of a stock item; `None` fields stay as they are
#[derive(Debug, Clone, Default)]
pub struct StockEdit {
    pub name: Option<String>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub category: Option<String>,
}

/// Owns the pantry items
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StockLedger {
    items: Vec<StockItem>,
}

impl StockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items(items: Vec<StockItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[StockItem] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &StockItem> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &EntityId) -> Option<&StockItem> {
        self.items.iter().find(|item| item.id == *id)
    }

    /// First item whose name equals `name`, ignoring case and unit
    pub fn find_by_name(&self, name: &str) -> Option<&StockItem> {
        let name = name.trim();
        self.items.iter().find(|item| names_match(&item.name, name))
    }

    /// Add a quantity, merging into an existing item with the same name and unit
    ///
    /// A merge upgrades an "Other" category to the supplied one but never
    /// replaces a specific category.
    pub fn add_or_merge(
        &mut self,
        name: &str,
        quantity: f64,
        unit: Option<&str>,
        category: Option<&str>,
    ) -> Result<&StockItem, ValidationError> {
        let name = require_name(name, "Item name")?;
        let quantity = require_quantity(quantity)?;
        let unit = normalize_unit(unit);
        let category = normalize_category(category);

        let existing = self
            .items
            .iter()
            .position(|item| names_match(&item.name, &name) && item.unit == unit);

        let index = match existing {
            Some(index) => {
                let merged = require_quantity(self.items[index].quantity + quantity)?;
                let item = &mut self.items[index];
                item.quantity = merged;
                if is_other(&item.category) && !is_other(&category) {
                    item.category = category;
                }
                debug!(id = %item.id, name = %item.name, quantity = item.quantity, "Merged stock item");
                index
            }
            None => {
                let item = StockItem {
                    id: EntityId::new(EntityPrefix::Stk),
                    name,
                    quantity,
                    unit,
                    category,
                    added: Utc::now(),
                };
                debug!(id = %item.id, name = %item.name, "Created stock item");
                self.items.push(item);
                self.items.len() - 1
            }
        };

        Ok(&self.items[index])
    }

    /// Delete by id; absent ids are ignored
    pub fn remove(&mut self, id: &EntityId) -> Option<StockItem> {
        let index = self.items.iter().position(|item| item.id == *id);
        match index {
            Some(index) => Some(self.items.remove(index)),
            None => {
                debug!(%id, "Stock item not found for removal");
                None
            }
        }
    }

    /// Subtract from the first item with a matching name, flooring at zero
    ///
    /// Units are not compared. Returns false when nothing matched. Callers
    /// run [`prune_empty`](Self::prune_empty) after a batch of deductions.
    pub fn deduct(&mut self, name: &str, quantity: f64) -> bool {
        let name = name.trim();
        match self.items.iter_mut().find(|item| names_match(&item.name, name)) {
            Some(item) => {
                item.quantity = (item.quantity - quantity).max(0.0);
                debug!(id = %item.id, name = %item.name, remaining = item.quantity, "Deducted stock");
                true
            }
            None => false,
        }
    }

    /// Remove every item with quantity ≤ 0, returning them
    pub fn prune_empty(&mut self) -> Vec<StockItem> {
        let (kept, pruned): (Vec<_>, Vec<_>) = std::mem::take(&mut self.items)
            .into_iter()
            .partition(|item| item.quantity > 0.0);
        self.items = kept;
        if !pruned.is_empty() {
            debug!(count = pruned.len(), "Pruned empty stock items");
        }
        pruned
    }

    /// Apply a manual edit; `Ok(None)` when the id is unknown
    pub fn edit(
        &mut self,
        id: &EntityId,
        edit: StockEdit,
    ) -> Result<Option<&StockItem>, ValidationError> {
        let Some(index) = self.items.iter().position(|item| item.id == *id) else {
            debug!(%id, "Stock item not found for edit");
            return Ok(None);
        };

        // validate everything before touching the item
        let name = edit
            .name
            .as_deref()
            .map(|n| require_name(n, "Item name"))
            .transpose()?;
        let quantity = edit.quantity.map(require_quantity).transpose()?;

        let item = &mut self.items[index];
        if let Some(name) = name {
            item.name = name;
        }
        if let Some(quantity) = quantity {
            item.quantity = quantity;
        }
        if let Some(unit) = edit.unit.as_deref() {
            item.unit = normalize_unit(Some(unit));
        }
        if let Some(category) = edit.category.as_deref() {
            item.category = normalize_category(Some(category));
        }
        Ok(Some(&self.items[index]))
    }

    /// Items grouped by category; categories and names sorted alphabetically
    pub fn grouped(&self) -> BTreeMap<&str, Vec<&StockItem>> {
        let mut groups: BTreeMap<&str, Vec<&StockItem>> = BTreeMap::new();
        for item in &self.items {
            groups.entry(item.category.as_str()).or_default().push(item);
        }
        for items in groups.values_mut() {
            items.sort_by(|a, b| a.name.cmp(&b.name));
        }
        groups
    }

    /// Built-in categories merged with every category in use, sorted
    pub fn categories(&self) -> Vec<String> {
        let mut all: BTreeSet<String> = default_categories()
            .into_iter()
            .map(str::to_string)
            .collect();
        all.extend(self.items.iter().map(|item| item.category.clone()));
        all.into_iter().collect()
    }
}
