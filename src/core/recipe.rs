//! Recipe engine - feasibility checks, shortage reports and cooking
//!
//! Cooking is a best-effort transaction: with shortages and no override
//! it is refused without touching stock; with the override every
//! ingredient is deducted (floored at zero) and empty items are pruned.

use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::categorize::Categorizer;
use crate::core::config::LookupPolicy;
use crate::core::entity::{
    names_match, normalize_category, normalize_name, require_name, Entity, ValidationError,
};
use crate::core::identity::{EntityId, EntityPrefix};
use crate::core::shopping::{ShoppingEntry, ShoppingList};
use crate::core::stock::{StockItem, StockLedger};

/// Display order of recipe groups; unknown categories follow alphabetically
pub const RECIPE_CATEGORIES: &[&str] = &[
    "Soups",
    "Pasta Dishes",
    "Vegetable Dishes",
    "Meat Dishes",
    "Sides",
    "Desserts",
    "Other",
];

/// One line of a recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub quantity: f64,
    pub unit: String,
}

/// A named list of ingredients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: EntityId,

    pub name: String,

    /// Grouping only
    #[serde(default = "default_category")]
    pub category: String,

    pub ingredients: Vec<Ingredient>,

    #[serde(default = "Utc::now")]
    pub created: DateTime<Utc>,
}

fn default_category() -> String {
    normalize_category(None)
}

impl Entity for Recipe {
    const PREFIX: &'static str = "RCP";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn created(&self) -> DateTime<Utc> {
        self.created
    }
}

/// Editing-form row; any field may still be missing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IngredientRow {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub quantity: Option<f64>,
    #[serde(default)]
    pub unit: String,
}

impl IngredientRow {
    pub fn new(name: impl Into<String>, quantity: f64, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity: Some(quantity),
            unit: unit.into(),
        }
    }

    /// A complete row has a name, a positive quantity and a unit
    fn complete(&self) -> Option<Ingredient> {
        let name = normalize_name(&self.name);
        let unit = self.unit.trim();
        let quantity = self.quantity.filter(|q| q.is_finite() && *q > 0.0)?;
        if name.is_empty() || unit.is_empty() {
            return None;
        }
        Some(Ingredient {
            name,
            quantity,
            unit: unit.to_string(),
        })
    }
}

/// Recipe as entered by the user, before validation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipeDraft {
    /// Set when editing an existing recipe
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,

    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default)]
    pub ingredients: Vec<IngredientRow>,
}

/// An ingredient the pantry cannot cover
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Shortage {
    pub name: String,
    pub required: f64,
    pub unit: String,
    /// Quantity of the matching stock item, 0 when there is none
    pub available: f64,
}

/// Ordered shortages of one recipe evaluation
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ShortageReport {
    shortages: Vec<Shortage>,
}

impl ShortageReport {
    pub fn is_empty(&self) -> bool {
        self.shortages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.shortages.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Shortage> {
        self.shortages.iter()
    }

    pub fn shortages(&self) -> &[Shortage] {
        &self.shortages
    }
}

/// Result of a cook attempt
#[derive(Debug, Clone, PartialEq)]
pub enum CookOutcome {
    /// Shortages exist and no override was given; stock untouched
    Blocked { shortages: ShortageReport },
    /// Every ingredient was deducted; `pruned` lists the emptied items
    Cooked {
        shortages: ShortageReport,
        pruned: Vec<StockItem>,
    },
}

impl CookOutcome {
    pub fn is_blocked(&self) -> bool {
        matches!(self, CookOutcome::Blocked { .. })
    }
}

/// Stages of a cook attempt, used for tracing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CookStage {
    Evaluating,
    Blocked,
    Proceeding,
    Deducting,
    Pruning,
    Done,
}

/// Check a recipe against stock
///
/// An ingredient is short when no stock item has the same name (ignoring
/// case) or when that item holds strictly less than required.
pub fn evaluate(recipe: &Recipe, stock: &StockLedger) -> ShortageReport {
    let shortages = recipe
        .ingredients
        .iter()
        .filter_map(|ingredient| {
            let available = stock
                .find_by_name(&ingredient.name)
                .map(|item| item.quantity);
            match available {
                Some(quantity) if quantity >= ingredient.quantity => None,
                _ => Some(Shortage {
                    name: ingredient.name.clone(),
                    required: ingredient.quantity,
                    unit: ingredient.unit.clone(),
                    available: available.unwrap_or(0.0),
                }),
            }
        })
        .collect();
    ShortageReport { shortages }
}

/// Put every shortage on the shopping list with a resolved category
///
/// Categories come from the waterfall: stock knowledge, keywords, then the
/// remote catalog. Under [`LookupPolicy::Parallel`] the local tiers still run
/// per ingredient first and only the remaining remote lookups overlap.
/// Entries are added in shortage order; names already listed are skipped.
pub async fn report_shortages(
    report: &ShortageReport,
    stock: &StockLedger,
    shopping: &mut ShoppingList,
    categorizer: &Categorizer,
    policy: LookupPolicy,
) -> Result<Vec<ShoppingEntry>, ValidationError> {
    let categories: Vec<String> = match policy {
        LookupPolicy::Sequential => {
            let mut categories = Vec::with_capacity(report.len());
            for shortage in report.iter() {
                categories.push(categorizer.resolve(&shortage.name, stock.items()).await);
            }
            categories
        }
        LookupPolicy::Parallel => {
            let local: Vec<Option<String>> = report
                .iter()
                .map(|shortage| categorizer.resolve_local(&shortage.name, stock.items()))
                .collect();
            let lookups = report.iter().zip(&local).map(|(shortage, local)| async move {
                match local {
                    Some(category) => category.clone(),
                    None => categorizer
                        .classify_remote(&shortage.name)
                        .await
                        .unwrap_or_else(|| normalize_category(None)),
                }
            });
            join_all(lookups).await
        }
    };

    let mut added = Vec::new();
    for (shortage, category) in report.iter().zip(categories) {
        if let Some(entry) = shopping.add_if_absent(
            &shortage.name,
            shortage.required,
            Some(&shortage.unit),
            Some(&category),
        )? {
            added.push(entry.clone());
        }
    }
    info!(shortages = report.len(), added = added.len(), %policy, "Reported shortages");
    Ok(added)
}

/// Cook a recipe, deducting its ingredients from stock
pub fn cook(recipe: &Recipe, stock: &mut StockLedger, allow_partial: bool) -> CookOutcome {
    let trace = |stage: CookStage| debug!(recipe = %recipe.name, ?stage, "Cook");

    trace(CookStage::Evaluating);
    let shortages = evaluate(recipe, stock);
    if !shortages.is_empty() && !allow_partial {
        trace(CookStage::Blocked);
        return CookOutcome::Blocked { shortages };
    }

    trace(CookStage::Proceeding);
    trace(CookStage::Deducting);
    for ingredient in &recipe.ingredients {
        stock.deduct(&ingredient.name, ingredient.quantity);
    }

    trace(CookStage::Pruning);
    let pruned = stock.prune_empty();

    trace(CookStage::Done);
    info!(recipe = %recipe.name, short = shortages.len(), pruned = pruned.len(), "Cooked recipe");
    CookOutcome::Cooked { shortages, pruned }
}

/// Owns the saved recipes
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipeBook {
    recipes: Vec<Recipe>,
}

impl RecipeBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_recipes(recipes: Vec<Recipe>) -> Self {
        Self { recipes }
    }

    /// Book holding the starter recipe given to new pantries
    pub fn with_starter() -> Self {
        let starter = Recipe {
            id: EntityId::new(EntityPrefix::Rcp),
            name: "Spaghetti Bolognese".to_string(),
            category: "Pasta Dishes".to_string(),
            ingredients: vec![
                ingredient("Spaghetti", 0.5, "kg"),
                ingredient("Minced pork", 0.5, "kg"),
                ingredient("Onion", 1.0, "pcs"),
                ingredient("Bolognese seasoning", 2.0, "pcs"),
                ingredient("Oil", 0.1, "l"),
                ingredient("Italian herbs", 1.0, "pack"),
            ],
            created: Utc::now(),
        };
        Self::from_recipes(vec![starter])
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    pub fn get(&self, id: &EntityId) -> Option<&Recipe> {
        self.recipes.iter().find(|recipe| recipe.id == *id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Recipe> {
        let name = name.trim();
        self.recipes.iter().find(|recipe| names_match(&recipe.name, name))
    }

    /// Validate and store a draft
    ///
    /// Incomplete ingredient rows are dropped. A draft with an id replaces
    /// that recipe entirely, keeping its id and creation time; `Ok(None)`
    /// when no recipe has that id.
    pub fn save(&mut self, draft: RecipeDraft) -> Result<Option<&Recipe>, ValidationError> {
        let name = require_name(&draft.name, "Recipe name")?;
        let ingredients: Vec<Ingredient> = draft
            .ingredients
            .iter()
            .filter_map(IngredientRow::complete)
            .collect();
        if ingredients.is_empty() {
            return Err(ValidationError::NoIngredients { recipe: name });
        }
        let category = normalize_category(draft.category.as_deref());

        match draft.id {
            Some(id) => {
                let Some(index) = self.recipes.iter().position(|r| r.id == id) else {
                    debug!(%id, "Recipe not found for update");
                    return Ok(None);
                };
                let created = self.recipes[index].created;
                self.recipes[index] = Recipe {
                    id,
                    name,
                    category,
                    ingredients,
                    created,
                };
                info!(%id, "Updated recipe");
                Ok(Some(&self.recipes[index]))
            }
            None => {
                let recipe = Recipe {
                    id: EntityId::new(EntityPrefix::Rcp),
                    name,
                    category,
                    ingredients,
                    created: Utc::now(),
                };
                info!(id = %recipe.id, name = %recipe.name, "Created recipe");
                self.recipes.push(recipe);
                Ok(self.recipes.last())
            }
        }
    }

    pub fn remove(&mut self, id: &EntityId) -> Option<Recipe> {
        let index = self.recipes.iter().position(|recipe| recipe.id == *id)?;
        Some(self.recipes.remove(index))
    }

    /// Recipes grouped for display, in [`RECIPE_CATEGORIES`] order
    pub fn grouped(&self) -> Vec<(&str, Vec<&Recipe>)> {
        let mut categories: Vec<&str> = self.recipes.iter().map(|r| r.category.as_str()).collect();
        categories.sort_by_key(|category| {
            let rank = RECIPE_CATEGORIES
                .iter()
                .position(|known| known == category)
                .unwrap_or(RECIPE_CATEGORIES.len());
            (rank, *category)
        });
        categories.dedup();

        categories
            .into_iter()
            .map(|category| {
                let recipes = self
                    .recipes
                    .iter()
                    .filter(|recipe| recipe.category == category)
                    .collect();
                (category, recipes)
            })
            .collect()
    }
}

fn ingredient(name: &str, quantity: f64, unit: &str) -> Ingredient {
    Ingredient {
        name: name.to_string(),
        quantity,
        unit: unit.to_string(),
    }
}
