//! Larder: a household stock ledger
//!
//! Keeps pantry stock, recipes and a shopping list in plain JSON files.
//! Recipes are checked against stock and whatever is missing lands on the
//! shopping list, categorized by name, keywords or a remote product catalog.

pub mod cli;
pub mod core;
pub mod util;
pub mod yaml;
