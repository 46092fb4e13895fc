//! CLI command implementations

pub mod completions;
pub mod inspire;
pub mod recipe;
pub mod shop;
pub mod stock;
