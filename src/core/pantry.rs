//! Pantry - the application service over the three collections
//!
//! A `Pantry` owns the stock ledger, the shopping list, the recipe book and
//! the store they are persisted in. Every mutating method applies the ledger
//! operation first and then saves the collections it touched. If saving
//! fails the error is returned, but the in-memory state is kept.

use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::core::categorize::Categorizer;
use crate::core::config::LookupPolicy;
use crate::core::entity::{
    normalize_category, normalize_name, require_name, require_quantity, ValidationError,
    OTHER_CATEGORY,
};
use crate::core::identity::EntityId;
use crate::core::lookup::LookupError;
use crate::core::recipe::{self, CookOutcome, Recipe, RecipeBook, RecipeDraft, ShortageReport};
use crate::core::shopping::{ShoppingEntry, ShoppingList, ShoppingUpdate};
use crate::core::stock::{StockEdit, StockItem, StockLedger};
use crate::core::store::{load_collection, save_collection, StorageError, Store, StoreKey};
use crate::core::suggest::{RemoteSuggestion, Suggester, Suggestion};

const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Errors from pantry operations
#[derive(Debug, Error)]
pub enum PantryError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Result of checking a recipe against stock
#[derive(Debug, Clone)]
pub struct RecipeCheck {
    pub shortages: ShortageReport,
    /// Shopping entries created for the shortages
    pub added: Vec<ShoppingEntry>,
}

/// A product identified by barcode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedProduct {
    pub barcode: String,
    pub name: String,
    pub category: String,
}

/// Stock, shopping list and recipes bound to a store
pub struct Pantry<S: Store> {
    store: S,
    stock: StockLedger,
    shopping: ShoppingList,
    recipes: RecipeBook,
    categorizer: Categorizer,
    policy: LookupPolicy,
    suggester: Suggester,
}

impl<S: Store> Pantry<S> {
    /// Load all collections from `store`
    ///
    /// A store that has never held recipes starts with the starter recipe,
    /// which is saved right away so its id stays stable.
    pub fn open(mut store: S, categorizer: Categorizer) -> Result<Self, PantryError> {
        let stock: StockLedger = load_collection(&store, StoreKey::Stock)?.unwrap_or_default();
        let shopping: ShoppingList =
            load_collection(&store, StoreKey::ShoppingList)?.unwrap_or_default();
        let recipes = match load_collection(&store, StoreKey::Recipes)? {
            Some(recipes) => recipes,
            None => {
                info!("No recipes stored yet, adding the starter recipe");
                let starter = RecipeBook::with_starter();
                save_collection(&mut store, StoreKey::Recipes, &starter)?;
                starter
            }
        };

        debug!(
            stock = stock.len(),
            shopping = shopping.len(),
            recipes = recipes.len(),
            "Opened pantry"
        );

        Ok(Self {
            store,
            stock,
            shopping,
            recipes,
            suggester: Suggester::new(categorizer.clone(), DEFAULT_DEBOUNCE),
            categorizer,
            policy: LookupPolicy::default(),
        })
    }

    /// Lookup policy used when reporting shortages
    pub fn with_policy(mut self, policy: LookupPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Quiet interval for as-you-type suggestions
    pub fn with_debounce(mut self, quiet: Duration) -> Self {
        self.suggester = Suggester::new(self.categorizer.clone(), quiet);
        self
    }

    pub fn stock(&self) -> &StockLedger {
        &self.stock
    }

    pub fn shopping(&self) -> &ShoppingList {
        &self.shopping
    }

    pub fn recipes(&self) -> &RecipeBook {
        &self.recipes
    }

    pub fn categorizer(&self) -> &Categorizer {
        &self.categorizer
    }

    pub fn policy(&self) -> LookupPolicy {
        self.policy
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn persist(&mut self, key: StoreKey) -> Result<(), StorageError> {
        match key {
            StoreKey::Stock => save_collection(&mut self.store, key, &self.stock),
            StoreKey::ShoppingList => save_collection(&mut self.store, key, &self.shopping),
            StoreKey::Recipes => save_collection(&mut self.store, key, &self.recipes),
        }
    }

    /// Category for a new item: the given one, else the waterfall, else "Other"
    async fn category_for(&self, name: &str, given: Option<&str>) -> String {
        if let Some(category) = given.filter(|c| !c.trim().is_empty()) {
            return normalize_category(Some(category));
        }
        if let Some(category) = self.categorizer.classify(name, self.stock.items()) {
            return category;
        }
        self.categorizer
            .classify_remote(name)
            .await
            .unwrap_or_else(|| OTHER_CATEGORY.to_string())
    }

    // ----- stock -----

    /// Add to stock, merging with an existing item of the same name and unit
    ///
    /// Without a category the item is categorized automatically.
    pub async fn add_stock(
        &mut self,
        name: &str,
        quantity: f64,
        unit: Option<&str>,
        category: Option<&str>,
    ) -> Result<StockItem, PantryError> {
        require_name(name, "Item name")?;
        require_quantity(quantity)?;
        let category = self.category_for(name, category).await;
        let item = self
            .stock
            .add_or_merge(name, quantity, unit, Some(&category))?
            .clone();
        self.persist(StoreKey::Stock)?;
        Ok(item)
    }

    pub fn edit_stock(
        &mut self,
        id: &EntityId,
        edit: StockEdit,
    ) -> Result<Option<StockItem>, PantryError> {
        let Some(item) = self.stock.edit(id, edit)?.cloned() else {
            return Ok(None);
        };
        self.persist(StoreKey::Stock)?;
        Ok(Some(item))
    }

    pub fn remove_stock(&mut self, id: &EntityId) -> Result<Option<StockItem>, PantryError> {
        let Some(item) = self.stock.remove(id) else {
            return Ok(None);
        };
        self.persist(StoreKey::Stock)?;
        info!(name = %item.name, "Removed stock item");
        Ok(Some(item))
    }

    // ----- shopping list -----

    /// Copy a stock item onto the shopping list
    ///
    /// An empty item is listed with quantity 1. `Ok(None)` when the id is
    /// unknown or the name is already listed.
    pub fn add_stock_item_to_list(
        &mut self,
        id: &EntityId,
    ) -> Result<Option<ShoppingEntry>, PantryError> {
        let Some(item) = self.stock.get(id).cloned() else {
            debug!(%id, "Stock item not found for listing");
            return Ok(None);
        };
        let quantity = if item.quantity > 0.0 { item.quantity } else { 1.0 };

        let Some(entry) = self
            .shopping
            .add_if_absent(&item.name, quantity, Some(&item.unit), Some(&item.category))?
            .cloned()
        else {
            return Ok(None);
        };
        self.persist(StoreKey::ShoppingList)?;
        Ok(Some(entry))
    }

    /// Put an item on the list; `Ok(None)` when the name is already listed
    pub async fn add_to_list(
        &mut self,
        name: &str,
        quantity: f64,
        unit: Option<&str>,
        category: Option<&str>,
    ) -> Result<Option<ShoppingEntry>, PantryError> {
        if let Some(existing) = self.shopping.find_by_name(name) {
            debug!(id = %existing.id, "Already on the shopping list");
            return Ok(None);
        }
        require_name(name, "Item name")?;
        require_quantity(quantity)?;
        let category = self.category_for(name, category).await;
        let Some(entry) = self
            .shopping
            .add_if_absent(name, quantity, unit, Some(&category))?
            .cloned()
        else {
            return Ok(None);
        };
        self.persist(StoreKey::ShoppingList)?;
        Ok(Some(entry))
    }

    pub fn toggle_acquired(&mut self, id: &EntityId) -> Result<bool, PantryError> {
        if !self.shopping.toggle_acquired(id) {
            return Ok(false);
        }
        self.persist(StoreKey::ShoppingList)?;
        Ok(true)
    }

    pub fn update_entry(
        &mut self,
        id: &EntityId,
        update: ShoppingUpdate,
    ) -> Result<bool, PantryError> {
        if !self.shopping.update(id, update)? {
            return Ok(false);
        }
        self.persist(StoreKey::ShoppingList)?;
        Ok(true)
    }

    /// Remove an entry from the list and return it to stock
    pub fn remove_from_list(
        &mut self,
        id: &EntityId,
    ) -> Result<Option<ShoppingEntry>, PantryError> {
        let Some(entry) = self.shopping.remove(id, &mut self.stock)? else {
            return Ok(None);
        };
        self.persist(StoreKey::Stock)?;
        self.persist(StoreKey::ShoppingList)?;
        Ok(Some(entry))
    }

    /// Empty the list without touching stock
    pub fn clear_list(&mut self) -> Result<usize, PantryError> {
        let count = self.shopping.clear();
        self.persist(StoreKey::ShoppingList)?;
        Ok(count)
    }

    // ----- recipes -----

    pub fn save_recipe(&mut self, draft: RecipeDraft) -> Result<Option<Recipe>, PantryError> {
        let Some(recipe) = self.recipes.save(draft)?.cloned() else {
            return Ok(None);
        };
        self.persist(StoreKey::Recipes)?;
        Ok(Some(recipe))
    }

    pub fn remove_recipe(&mut self, id: &EntityId) -> Result<Option<Recipe>, PantryError> {
        let Some(recipe) = self.recipes.remove(id) else {
            debug!(%id, "Recipe not found for removal");
            return Ok(None);
        };
        self.persist(StoreKey::Recipes)?;
        info!(name = %recipe.name, "Removed recipe");
        Ok(Some(recipe))
    }

    /// Evaluate a recipe and put every shortage on the shopping list
    pub async fn check_recipe(&mut self, id: &EntityId) -> Result<Option<RecipeCheck>, PantryError> {
        let Some(recipe) = self.recipes.get(id) else {
            debug!(%id, "Recipe not found for check");
            return Ok(None);
        };
        let shortages = recipe::evaluate(recipe, &self.stock);
        if shortages.is_empty() {
            return Ok(Some(RecipeCheck {
                shortages,
                added: Vec::new(),
            }));
        }

        let listed = self.shopping.len();
        let reported = recipe::report_shortages(
            &shortages,
            &self.stock,
            &mut self.shopping,
            &self.categorizer,
            self.policy,
        )
        .await;
        // entries added before a failure are kept and saved
        if self.shopping.len() != listed {
            self.persist(StoreKey::ShoppingList)?;
        }
        let added = reported?;
        Ok(Some(RecipeCheck { shortages, added }))
    }

    /// Cook a recipe; with `allow_partial` a shortfall does not block
    pub fn cook(
        &mut self,
        id: &EntityId,
        allow_partial: bool,
    ) -> Result<Option<CookOutcome>, PantryError> {
        let Some(recipe) = self.recipes.get(id) else {
            debug!(%id, "Recipe not found for cooking");
            return Ok(None);
        };
        let outcome = recipe::cook(recipe, &mut self.stock, allow_partial);
        if !outcome.is_blocked() {
            self.persist(StoreKey::Stock)?;
        }
        Ok(Some(outcome))
    }

    // ----- categorization -----

    /// As-you-type category suggestion for a name being entered
    pub fn suggest_category(&self, name: &str) -> Suggestion {
        self.suggester.suggest(name, self.stock.items())
    }

    /// Remote suggestions published after [`suggest_category`](Self::suggest_category)
    pub fn suggestions(&self) -> watch::Receiver<Option<RemoteSuggestion>> {
        self.suggester.subscribe()
    }

    /// Look up a product by barcode and suggest its category
    ///
    /// `None` when the catalog does not know the code or cannot be reached.
    pub async fn scan_barcode(&self, barcode: &str) -> Option<ScannedProduct> {
        let barcode = barcode.trim();
        if barcode.is_empty() {
            return None;
        }

        let timeout = self.categorizer.timeout();
        let lookup = self.categorizer.lookup().product_name(barcode);
        let result = match tokio::time::timeout(timeout, lookup).await {
            Ok(result) => result,
            Err(_) => Err(LookupError::Timeout(timeout)),
        };

        let name = match result {
            Ok(Some(name)) if !name.trim().is_empty() => normalize_name(&name),
            Ok(_) => {
                debug!(barcode, "Barcode not in catalog");
                return None;
            }
            Err(e) => {
                warn!(barcode, error = %e, "Barcode lookup unavailable");
                return None;
            }
        };

        let category = self.category_for(&name, None).await;
        Some(ScannedProduct {
            barcode: barcode.to_string(),
            name,
            category,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::categorize::tests::FixedLookup;
    use crate::core::lookup::CatalogLookup;
    use crate::core::identity::EntityPrefix;
    use crate::core::recipe::{Ingredient, IngredientRow};
    use crate::core::store::MemoryStore;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::Arc;

    fn pantry() -> Pantry<MemoryStore> {
        Pantry::open(MemoryStore::new(), Categorizer::offline()).unwrap()
    }

    fn draft(name: &str, rows: &[(&str, f64, &str)]) -> RecipeDraft {
        RecipeDraft {
            name: name.to_string(),
            ingredients: rows
                .iter()
                .map(|(n, q, u)| IngredientRow::new(*n, *q, *u))
                .collect(),
            ..Default::default()
        }
    }

    struct Barcodes;

    #[async_trait]
    impl CatalogLookup for Barcodes {
        async fn search_tags(&self, _name: &str) -> Result<Option<Vec<String>>, LookupError> {
            Ok(Some(vec!["en:cheeses".to_string()]))
        }

        async fn product_name(&self, barcode: &str) -> Result<Option<String>, LookupError> {
            Ok(match barcode {
                "5998200000000" => Some("trappista sajt".to_string()),
                "5998200000001" => Some("Kakaós csiga".to_string()),
                _ => None,
            })
        }
    }

    #[test]
    fn test_new_pantry_gets_starter_recipe() {
        let pantry = pantry();
        assert_eq!(pantry.recipes().len(), 1);
        assert_eq!(pantry.recipes().recipes()[0].name, "Spaghetti Bolognese");
        assert!(pantry.stock().is_empty());
        assert!(pantry.shopping().is_empty());
    }

    #[test]
    fn test_starter_recipe_keeps_its_id() {
        let pantry = pantry();
        let id = pantry.recipes().recipes()[0].id;

        let reopened = Pantry::open(pantry.store().clone(), Categorizer::offline()).unwrap();
        assert_eq!(reopened.recipes().recipes()[0].id, id);
    }

    #[test]
    fn test_deleting_every_recipe_does_not_reseed() {
        let mut pantry = pantry();
        let id = pantry.recipes().recipes()[0].id;
        pantry.remove_recipe(&id).unwrap();

        let reopened = Pantry::open(pantry.store().clone(), Categorizer::offline()).unwrap();
        assert!(reopened.recipes().is_empty());
    }

    #[tokio::test]
    async fn test_mutations_are_persisted() {
        let mut pantry = pantry();
        pantry.add_stock("rice", 1.0, Some("kg"), None).await.unwrap();
        pantry.add_to_list("milk", 2.0, Some("l"), None).await.unwrap();

        let reopened = Pantry::open(pantry.store().clone(), Categorizer::offline()).unwrap();
        let rice = reopened.stock().find_by_name("Rice").unwrap();
        assert_eq!(rice.category, "Grains");
        let milk = reopened.shopping().find_by_name("milk").unwrap();
        assert_eq!(milk.category, "Dairy");
    }

    #[tokio::test]
    async fn test_add_stock_merges_and_respects_given_category() {
        let mut pantry = pantry();
        pantry.add_stock("Quark", 1.0, Some("pcs"), None).await.unwrap();
        assert_eq!(pantry.stock().items()[0].category, OTHER_CATEGORY);

        let merged = pantry
            .add_stock("quark", 2.0, Some("pcs"), Some("Dairy"))
            .await
            .unwrap();
        assert_eq!(pantry.stock().len(), 1);
        assert_eq!(merged.quantity, 3.0);
        assert_eq!(merged.category, "Dairy");
    }

    #[tokio::test]
    async fn test_add_stock_rejects_invalid_input_without_saving() {
        let mut pantry = pantry();
        let err = pantry.add_stock("  ", 1.0, None, None).await.unwrap_err();
        assert!(matches!(err, PantryError::Validation(ValidationError::Empty { .. })));
        let err = pantry.add_stock("Rice", -1.0, None, None).await.unwrap_err();
        assert!(matches!(
            err,
            PantryError::Validation(ValidationError::InvalidQuantity { .. })
        ));
        assert!(pantry.store().load(StoreKey::Stock).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_invalid_input_skips_remote_lookup() {
        let lookup = Arc::new(FixedLookup::new(&["en:cheeses"]));
        let categorizer = Categorizer::new(lookup.clone(), Duration::from_secs(1));
        let mut pantry = Pantry::open(MemoryStore::new(), categorizer).unwrap();

        assert!(pantry.add_stock("  ", 1.0, None, None).await.is_err());
        assert!(pantry.add_stock("quark", -1.0, None, None).await.is_err());
        assert!(pantry.add_to_list("quark", f64::NAN, None, None).await.is_err());
        assert_eq!(lookup.calls(), 0);

        pantry.add_to_list("quark", 1.0, None, None).await.unwrap();
        assert_eq!(lookup.calls(), 1);
    }

    #[tokio::test]
    async fn test_stock_item_to_list() {
        let mut pantry = pantry();
        let id = pantry.add_stock("Flour", 0.0, Some("kg"), None).await.unwrap().id;

        let entry = pantry.add_stock_item_to_list(&id).unwrap().unwrap();
        assert_eq!(entry.name, "Flour");
        assert_eq!(entry.quantity, 1.0);
        assert_eq!(entry.unit, "kg");
        assert_eq!(entry.category, "Baking");

        assert!(pantry.add_stock_item_to_list(&id).unwrap().is_none());
        assert_eq!(pantry.shopping().len(), 1);
    }

    #[tokio::test]
    async fn test_remove_from_list_returns_to_stock_and_saves_both() {
        let mut pantry = pantry();
        let id = pantry
            .add_to_list("Milk", 2.0, Some("l"), None)
            .await
            .unwrap()
            .unwrap()
            .id;

        pantry.remove_from_list(&id).unwrap().unwrap();

        let reopened = Pantry::open(pantry.store().clone(), Categorizer::offline()).unwrap();
        assert!(reopened.shopping().is_empty());
        let milk = reopened.stock().find_by_name("milk").unwrap();
        assert_eq!(milk.quantity, 2.0);
        assert_eq!(milk.category, "Dairy");
    }

    #[tokio::test]
    async fn test_check_recipe_lists_shortages() {
        let mut pantry = pantry();
        pantry.add_stock("Pasta", 1.0, Some("kg"), None).await.unwrap();
        pantry.add_stock("Tomato", 1.0, Some("pcs"), None).await.unwrap();
        let recipe = pantry
            .save_recipe(draft(
                "Pasta al pomodoro",
                &[("pasta", 0.5, "kg"), ("tomato", 3.0, "pcs"), ("basil", 1.0, "bunch")],
            ))
            .unwrap()
            .unwrap();

        let check = pantry.check_recipe(&recipe.id).await.unwrap().unwrap();
        let names: Vec<_> = check.shortages.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Tomato", "Basil"]);
        assert_eq!(check.added.len(), 2);

        let tomato = pantry.shopping().find_by_name("tomato").unwrap();
        assert_eq!(tomato.quantity, 3.0);
        assert_eq!(tomato.category, "Vegetables");
        assert_eq!(pantry.shopping().find_by_name("basil").unwrap().category, "Spices");

        // a second check adds nothing new
        let again = pantry.check_recipe(&recipe.id).await.unwrap().unwrap();
        assert!(again.added.is_empty());
        assert_eq!(pantry.shopping().len(), 2);
    }

    #[tokio::test]
    async fn test_check_recipe_saves_entries_added_before_a_failure() {
        let broken = Recipe {
            id: EntityId::new(EntityPrefix::Rcp),
            name: "Hand edited".to_string(),
            category: "Soups".to_string(),
            ingredients: vec![
                Ingredient {
                    name: "Onion".to_string(),
                    quantity: 1.0,
                    unit: "pcs".to_string(),
                },
                Ingredient {
                    name: "  ".to_string(),
                    quantity: 1.0,
                    unit: "pcs".to_string(),
                },
            ],
            created: Utc::now(),
        };
        let id = broken.id;
        let mut store = MemoryStore::new();
        save_collection(&mut store, StoreKey::Recipes, &RecipeBook::from_recipes(vec![broken]))
            .unwrap();
        let mut pantry = Pantry::open(store, Categorizer::offline()).unwrap();

        let err = pantry.check_recipe(&id).await.unwrap_err();
        assert!(matches!(err, PantryError::Validation(ValidationError::Empty { .. })));

        let reopened = Pantry::open(pantry.store().clone(), Categorizer::offline()).unwrap();
        assert_eq!(reopened.shopping().len(), 1);
        assert!(reopened.shopping().find_by_name("onion").is_some());
    }

    #[tokio::test]
    async fn test_cook_blocked_then_forced() {
        let mut pantry = pantry();
        pantry.add_stock("Egg", 2.0, Some("pcs"), None).await.unwrap();
        pantry.add_stock("Milk", 1.0, Some("l"), None).await.unwrap();
        let recipe = pantry
            .save_recipe(draft("Pancakes", &[("egg", 3.0, "pcs"), ("milk", 0.5, "l")]))
            .unwrap()
            .unwrap();

        let outcome = pantry.cook(&recipe.id, false).unwrap().unwrap();
        assert!(outcome.is_blocked());
        assert_eq!(pantry.stock().find_by_name("egg").unwrap().quantity, 2.0);

        let CookOutcome::Cooked { shortages, pruned } = pantry.cook(&recipe.id, true).unwrap().unwrap()
        else {
            panic!("forced cook must proceed");
        };
        assert_eq!(shortages.len(), 1);
        assert_eq!(pruned.len(), 1);
        assert!(pantry.stock().find_by_name("egg").is_none());
        assert_eq!(pantry.stock().find_by_name("milk").unwrap().quantity, 0.5);

        let reopened = Pantry::open(pantry.store().clone(), Categorizer::offline()).unwrap();
        assert_eq!(reopened.stock().len(), 1);
    }

    #[test]
    fn test_missing_ids_are_noops() {
        let mut pantry = pantry();
        let stk: EntityId = EntityId::new(crate::core::identity::EntityPrefix::Stk);
        let shop = EntityId::new(crate::core::identity::EntityPrefix::Shop);
        let rcp = EntityId::new(crate::core::identity::EntityPrefix::Rcp);

        assert!(pantry.remove_stock(&stk).unwrap().is_none());
        assert!(pantry.edit_stock(&stk, StockEdit::default()).unwrap().is_none());
        assert!(pantry.add_stock_item_to_list(&stk).unwrap().is_none());
        assert!(!pantry.toggle_acquired(&shop).unwrap());
        assert!(!pantry.update_entry(&shop, ShoppingUpdate::Quantity(1.0)).unwrap());
        assert!(pantry.remove_from_list(&shop).unwrap().is_none());
        assert!(pantry.remove_recipe(&rcp).unwrap().is_none());
        assert!(pantry.cook(&rcp, true).unwrap().is_none());
        assert!(pantry.store().load(StoreKey::Stock).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_scan_barcode() {
        let categorizer = Categorizer::new(Arc::new(Barcodes), Duration::from_secs(1));
        let pantry = Pantry::open(MemoryStore::new(), categorizer).unwrap();

        let product = pantry.scan_barcode(" 5998200000000 ").await.unwrap();
        assert_eq!(product.name, "Trappista sajt");
        assert_eq!(product.category, "Dairy");
        assert_eq!(product.barcode, "5998200000000");

        assert!(pantry.scan_barcode("0000").await.is_none());
        assert!(pantry.scan_barcode("").await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_suggest_category_publishes_remote_answer() {
        let lookup = Arc::new(FixedLookup::new(&["en:cheeses"]));
        let categorizer = Categorizer::new(lookup.clone(), Duration::from_secs(1));
        let pantry = Pantry::open(MemoryStore::new(), categorizer)
            .unwrap()
            .with_debounce(Duration::from_millis(200));
        let mut rx = pantry.suggestions();

        assert_eq!(
            pantry.suggest_category("milk"),
            Suggestion::Local("Dairy".to_string())
        );
        assert!(matches!(pantry.suggest_category("quark"), Suggestion::Pending(_)));

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().as_ref().unwrap().category, "Dairy");
        assert_eq!(lookup.calls(), 1);
    }
}
