//! Core module - pantry domain types, categorization and persistence

pub mod categorize;
pub mod config;
pub mod entity;
pub mod identity;
pub mod inspiration;
pub mod lookup;
pub mod pantry;
pub mod recipe;
pub mod shopping;
pub mod shortid;
pub mod stock;
pub mod store;
pub mod suggest;

pub use categorize::{Categorizer, LocalMatch, NameMatch};
pub use config::{Config, ConfigError, InspirationConfig, LookupConfig, LookupPolicy};
pub use entity::{Entity, ValidationError, OTHER_CATEGORY};
pub use identity::{EntityId, EntityPrefix, IdParseError};
pub use lookup::{CatalogLookup, LookupError, NoLookup, OpenFoodFacts};
pub use pantry::{Pantry, PantryError, RecipeCheck, ScannedProduct};
pub use recipe::{CookOutcome, Recipe, RecipeBook, RecipeDraft, Shortage, ShortageReport};
pub use shopping::{ShoppingEntry, ShoppingList, ShoppingUpdate};
pub use shortid::ShortIdIndex;
pub use stock::{StockEdit, StockItem, StockLedger};
pub use store::{FileStore, MemoryStore, StorageError, Store, StoreKey};
pub use suggest::{RemoteSuggestion, Suggester, Suggestion};
