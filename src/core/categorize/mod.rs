//! Categorizer - the categorization waterfall
//!
//! Precedence, first hit wins:
//! 1. stock knowledge: a known item with a specific category
//! 2. keyword rules ([`keywords`])
//! 3. a known item whose category is "Other" keeps "Other"
//! 4. remote catalog lookup ([`Categorizer::classify_remote`]), bounded by a timeout
//!
//! Remote failures never surface as errors; they read as "unresolved".

pub mod keywords;
pub mod tags;

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::core::entity::{is_other, OTHER_CATEGORY};
use crate::core::lookup::{CatalogLookup, LookupError, NoLookup};
use crate::core::stock::StockItem;

pub const CANNED_GOODS: &str = "Canned Goods";
pub const DAIRY: &str = "Dairy";
pub const BAKERY: &str = "Bakery";
pub const FRUITS: &str = "Fruits";
pub const VEGETABLES: &str = "Vegetables";
pub const MEATS: &str = "Meats";
pub const PASTA: &str = "Pasta";
pub const GRAINS: &str = "Grains";
pub const BAKING: &str = "Baking";
pub const SPICES: &str = "Spices";
pub const BEVERAGES: &str = "Beverages";
pub const SNACKS: &str = "Snacks";

/// Built-in category vocabulary offered to users
pub fn default_categories() -> Vec<&'static str> {
    vec![
        CANNED_GOODS,
        DAIRY,
        BAKERY,
        FRUITS,
        VEGETABLES,
        MEATS,
        PASTA,
        GRAINS,
        BAKING,
        SPICES,
        BEVERAGES,
        SNACKS,
        OTHER_CATEGORY,
    ]
}

/// How known item names are compared with the name being classified
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameMatch {
    /// Case-insensitive equality
    Exact,
    /// Known name contains the query, case-insensitive
    Contains,
}

/// Outcome of the local (non-network) rules
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalMatch {
    /// Stock knowledge or a keyword gave a category
    Category(String),
    /// Only a known item filed under "Other" matched
    KnownOther,
    /// Nothing local applies
    Miss,
}

/// Rule evaluator plus the remote fallback
#[derive(Clone)]
pub struct Categorizer {
    lookup: Arc<dyn CatalogLookup>,
    timeout: Duration,
}

impl Default for Categorizer {
    fn default() -> Self {
        Self::offline()
    }
}

impl Categorizer {
    pub fn new(lookup: Arc<dyn CatalogLookup>, timeout: Duration) -> Self {
        Self { lookup, timeout }
    }

    /// Categorizer whose remote tier never answers
    pub fn offline() -> Self {
        Self::new(Arc::new(NoLookup), Duration::from_secs(3))
    }

    pub fn lookup(&self) -> &Arc<dyn CatalogLookup> {
        &self.lookup
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Evaluate stock knowledge and keyword rules
    pub fn classify_local(&self, name: &str, known: &[StockItem], mode: NameMatch) -> LocalMatch {
        let query = name.trim().to_lowercase();
        if query.is_empty() {
            return LocalMatch::Miss;
        }

        let matches = |item: &&StockItem| {
            let known_name = item.name.to_lowercase();
            match mode {
                NameMatch::Exact => known_name == query,
                NameMatch::Contains => known_name.contains(&query),
            }
        };

        let mut matched_other = false;
        for item in known.iter().filter(matches) {
            if !is_other(&item.category) {
                return LocalMatch::Category(item.category.clone());
            }
            matched_other = true;
        }

        if let Some(category) = keywords::category_for_name(&query) {
            return LocalMatch::Category(category.to_string());
        }

        if matched_other {
            LocalMatch::KnownOther
        } else {
            LocalMatch::Miss
        }
    }

    /// Synchronous classification; `None` means unresolved
    ///
    /// Callers that need a category anyway should fire
    /// [`classify_remote`](Self::classify_remote) and fall back to "Other".
    pub fn classify(&self, name: &str, known: &[StockItem]) -> Option<String> {
        match self.classify_local(name, known, NameMatch::Contains) {
            LocalMatch::Category(category) => Some(category),
            LocalMatch::KnownOther => Some(OTHER_CATEGORY.to_string()),
            LocalMatch::Miss => None,
        }
    }

    /// Ask the remote catalog; `None` on no result, error or timeout
    pub async fn classify_remote(&self, name: &str) -> Option<String> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let result = match tokio::time::timeout(self.timeout, self.lookup.search_tags(name)).await {
            Ok(result) => result,
            Err(_) => Err(LookupError::Timeout(self.timeout)),
        };

        match result {
            Ok(Some(tags)) => {
                let category = tags::category_for_tags(&tags).map(str::to_string);
                debug!(name, ?category, tag_count = tags.len(), "Remote lookup finished");
                category
            }
            Ok(None) => {
                debug!(name, "Remote lookup found no product");
                None
            }
            Err(e) => {
                warn!(name, error = %e, "Remote category lookup unavailable");
                None
            }
        }
    }

    /// Category from stock knowledge or keywords only (exact name match)
    pub fn resolve_local(&self, name: &str, known: &[StockItem]) -> Option<String> {
        match self.classify_local(name, known, NameMatch::Exact) {
            LocalMatch::Category(category) => Some(category),
            LocalMatch::KnownOther | LocalMatch::Miss => None,
        }
    }

    /// Full waterfall for an ingredient, always yielding a category
    ///
    /// An exactly matching stock item filed under "Other" does not stop the
    /// waterfall here; the remote tier still gets a chance.
    pub async fn resolve(&self, name: &str, known: &[StockItem]) -> String {
        if let Some(category) = self.resolve_local(name, known) {
            return category;
        }
        self.classify_remote(name)
            .await
            .unwrap_or_else(|| OTHER_CATEGORY.to_string())
    }
}
