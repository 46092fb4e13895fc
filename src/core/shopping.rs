//! Shopping list ledger
//!
//! Entries are unique by case-insensitive name. Removing an entry puts it
//! back into stock: removal means "bought it, it's in the pantry now".

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::entity::{
    names_match, normalize_category, normalize_unit, require_name, require_quantity, Entity,
    ValidationError,
};
use crate::core::identity::{EntityId, EntityPrefix};
use crate::core::stock::StockLedger;

/// An item to buy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingEntry {
    pub id: EntityId,

    pub name: String,

    pub quantity: f64,

    pub unit: String,

    pub category: String,

    /// Ticked off in the shop
    #[serde(default)]
    pub acquired: bool,

    #[serde(default = "Utc::now")]
    pub added: DateTime<Utc>,
}

impl Entity for ShoppingEntry {
    const PREFIX: &'static str = "SHOP";

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

/// Single-field change to an entry
#[derive(Debug, Clone, PartialEq)]
pub enum ShoppingUpdate {
    Quantity(f64),
    Unit(String),
    Category(String),
}

/// Owns the shopping list entries
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShoppingList {
    entries: Vec<ShoppingEntry>,
}

impl ShoppingList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<ShoppingEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[ShoppingEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &EntityId) -> Option<&ShoppingEntry> {
        self.entries.iter().find(|entry| entry.id == *id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&ShoppingEntry> {
        let name = name.trim();
        self.entries.iter().find(|entry| names_match(&entry.name, name))
    }

    /// Add an entry unless one with the same name is already listed
    ///
    /// Returns `Ok(None)` when the name is already on the list.
    pub fn add_if_absent(
        &mut self,
        name: &str,
        quantity: f64,
        unit: Option<&str>,
        category: Option<&str>,
    ) -> Result<Option<&ShoppingEntry>, ValidationError> {
        let name = require_name(name, "Item name")?;
        let quantity = require_quantity(quantity)?;

        if self.find_by_name(&name).is_some() {
            debug!(name = %name, "Already on the shopping list");
            return Ok(None);
        }

        let entry = ShoppingEntry {
            id: EntityId::new(EntityPrefix::Shop),
            name,
            quantity,
            unit: normalize_unit(unit),
            category: normalize_category(category),
            acquired: false,
            added: Utc::now(),
        };
        debug!(id = %entry.id, name = %entry.name, "Added shopping entry");
        self.entries.push(entry);
        Ok(self.entries.last())
    }

    /// Flip the acquired flag; false when the id is unknown
    pub fn toggle_acquired(&mut self, id: &EntityId) -> bool {
        match self.entries.iter_mut().find(|entry| entry.id == *id) {
            Some(entry) => {
                entry.acquired = !entry.acquired;
                true
            }
            None => {
                debug!(%id, "Shopping entry not found for toggle");
                false
            }
        }
    }

    /// Change one field; false when the id is unknown
    pub fn update(&mut self, id: &EntityId, update: ShoppingUpdate) -> Result<bool, ValidationError> {
        if let ShoppingUpdate::Quantity(quantity) = update {
            require_quantity(quantity)?;
        }

        let Some(entry) = self.entries.iter_mut().find(|entry| entry.id == *id) else {
            debug!(%id, "Shopping entry not found for update");
            return Ok(false);
        };

        match update {
            ShoppingUpdate::Quantity(quantity) => entry.quantity = quantity,
            ShoppingUpdate::Unit(unit) => entry.unit = normalize_unit(Some(&unit)),
            ShoppingUpdate::Category(category) => entry.category = normalize_category(Some(&category)),
        }
        Ok(true)
    }

    /// Remove an entry and return it to stock
    ///
    /// The entry's name, quantity, unit and category are merged into `stock`
    /// before it leaves the list.
    pub fn remove(
        &mut self,
        id: &EntityId,
        stock: &mut StockLedger,
    ) -> Result<Option<ShoppingEntry>, ValidationError> {
        let Some(index) = self.entries.iter().position(|entry| entry.id == *id) else {
            debug!(%id, "Shopping entry not found for removal");
            return Ok(None);
        };

        {
            let entry = &self.entries[index];
            stock.add_or_merge(
                &entry.name,
                entry.quantity,
                Some(&entry.unit),
                Some(&entry.category),
            )?;
        }

        let entry = self.entries.remove(index);
        info!(name = %entry.name, quantity = entry.quantity, unit = %entry.unit, "Returned to stock");
        Ok(Some(entry))
    }

    /// Drop every entry; the caller is responsible for confirming first
    pub fn clear(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        info!(count, "Cleared shopping list");
        count
    }

    /// Presentation order: unacquired first, otherwise insertion order
    pub fn sorted(&self) -> Vec<&ShoppingEntry> {
        let mut entries: Vec<_> = self.entries.iter().collect();
        entries.sort_by_key(|entry| entry.acquired);
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_if_absent_rejects_duplicate_names() {
        let mut list = ShoppingList::new();
        assert!(list.add_if_absent("milk", 1.0, Some("l"), Some("Dairy")).unwrap().is_some());
        assert!(list.add_if_absent("MILK", 2.0, Some("l"), None).unwrap().is_none());
        assert_eq!(list.len(), 1);

        let entry = &list.entries()[0];
        assert_eq!(entry.name, "Milk");
        assert_eq!(entry.quantity, 1.0);
        assert!(!entry.acquired);
        assert!(entry.id.to_string().starts_with("SHOP-"));
    }

    #[test]
    fn test_toggle_and_update() {
        let mut list = ShoppingList::new();
        let id = list.add_if_absent("Bread", 1.0, None, None).unwrap().unwrap().id;

        assert!(list.toggle_acquired(&id));
        assert!(list.get(&id).unwrap().acquired);
        assert!(list.toggle_acquired(&id));
        assert!(!list.get(&id).unwrap().acquired);

        assert!(list.update(&id, ShoppingUpdate::Quantity(2.0)).unwrap());
        assert!(list.update(&id, ShoppingUpdate::Unit("loaf".to_string())).unwrap());
        let entry = list.get(&id).unwrap();
        assert_eq!(entry.quantity, 2.0);
        assert_eq!(entry.unit, "loaf");

        assert!(list.update(&id, ShoppingUpdate::Quantity(-1.0)).is_err());
    }

    #[test]
    fn test_missing_ids_are_silent_noops() {
        let mut list = ShoppingList::new();
        let mut stock = StockLedger::new();
        let missing = EntityId::new(EntityPrefix::Shop);

        assert!(!list.toggle_acquired(&missing));
        assert!(!list.update(&missing, ShoppingUpdate::Quantity(1.0)).unwrap());
        assert!(list.remove(&missing, &mut stock).unwrap().is_none());
        assert!(stock.is_empty());
    }

    #[test]
    fn test_remove_returns_to_stock() {
        let mut list = ShoppingList::new();
        let mut stock = StockLedger::new();
        let id = list
            .add_if_absent("Milk", 2.0, Some("l"), Some("Dairy"))
            .unwrap()
            .unwrap()
            .id;

        let removed = list.remove(&id, &mut stock).unwrap().unwrap();
        assert_eq!(removed.name, "Milk");
        assert!(list.is_empty());

        let item = stock.find_by_name("milk").unwrap();
        assert_eq!(item.quantity, 2.0);
        assert_eq!(item.unit, "l");
        assert_eq!(item.category, "Dairy");
    }

    #[test]
    fn test_remove_merges_into_existing_stock() {
        let mut list = ShoppingList::new();
        let mut stock = StockLedger::new();
        stock.add_or_merge("Milk", 0.5, Some("l"), None).unwrap();
        let id = list
            .add_if_absent("milk", 1.5, Some("l"), Some("Dairy"))
            .unwrap()
            .unwrap()
            .id;

        list.remove(&id, &mut stock).unwrap();
        assert_eq!(stock.len(), 1);
        assert_eq!(stock.items()[0].quantity, 2.0);
        assert_eq!(stock.items()[0].category, "Dairy");
    }

    #[test]
    fn test_remove_keeps_entry_when_stock_would_overflow() {
        let mut stock = StockLedger::new();
        stock.add_or_merge("Salt", 1e308, Some("kg"), None).unwrap();
        let mut list = ShoppingList::new();
        let id = list.add_if_absent("Salt", 1e308, Some("kg"), None).unwrap().unwrap().id;

        assert!(list.remove(&id, &mut stock).is_err());
        assert!(list.get(&id).is_some());
        assert_eq!(stock.items()[0].quantity, 1e308);
    }

    #[test]
    fn test_clear() {
        let mut list = ShoppingList::new();
        list.add_if_absent("A", 1.0, None, None).unwrap();
        list.add_if_absent("B", 1.0, None, None).unwrap();
        assert_eq!(list.clear(), 2);
        assert!(list.is_empty());
    }

    #[test]
    fn test_sorted_puts_acquired_last_and_is_stable() {
        let mut list = ShoppingList::new();
        let a = list.add_if_absent("A", 1.0, None, None).unwrap().unwrap().id;
        list.add_if_absent("B", 1.0, None, None).unwrap();
        let c = list.add_if_absent("C", 1.0, None, None).unwrap().unwrap().id;
        list.add_if_absent("D", 1.0, None, None).unwrap();
        list.toggle_acquired(&a);
        list.toggle_acquired(&c);

        let names: Vec<_> = list.sorted().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["B", "D", "A", "C"]);
    }
}
