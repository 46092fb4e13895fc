//! Shared helper functions for CLI commands

use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm};
use miette::{bail, miette, IntoDiagnostic, Result};
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;

use crate::core::categorize::Categorizer;
use crate::core::entity::{names_match, Entity};
use crate::core::identity::EntityId;
use crate::core::lookup::OpenFoodFacts;
use crate::core::pantry::Pantry;
use crate::core::shortid::ShortIdIndex;
use crate::core::store::FileStore;
use crate::core::Config;

/// An opened pantry plus the paths and settings around it
pub struct Session {
    pub config: Config,
    pub data_dir: PathBuf,
    pub pantry: Pantry<FileStore>,
}

impl Session {
    pub fn open(config: &Config) -> Result<Self> {
        let data_dir = config.data_dir();
        let pantry = Pantry::open(FileStore::new(&data_dir), categorizer(config))
            .into_diagnostic()?
            .with_policy(config.lookup.policy)
            .with_debounce(config.lookup.debounce());

        Ok(Self {
            config: config.clone(),
            data_dir,
            pantry,
        })
    }

    pub fn short_ids(&self) -> ShortIdIndex {
        ShortIdIndex::load(&self.data_dir)
    }

    /// Record a listing so `@N` refers to its rows
    pub fn record_listing(&self, ids: impl IntoIterator<Item = EntityId>) -> ShortIdIndex {
        let mut short_ids = self.short_ids();
        short_ids.rebuild(ids);
        if let Err(e) = short_ids.save(&self.data_dir) {
            warn!(error = %e, "Failed to save short id index");
        }
        short_ids
    }
}

/// Categorizer for the configured lookup settings
pub fn categorizer(config: &Config) -> Categorizer {
    if !config.lookup.enabled {
        return Categorizer::offline();
    }
    match OpenFoodFacts::new(&config.lookup) {
        Ok(client) => Categorizer::new(Arc::new(client), config.lookup.timeout()),
        Err(e) => {
            warn!(error = %e, "Catalog client unavailable, categorizing offline");
            Categorizer::offline()
        }
    }
}

/// Find the entity a user reference points at
///
/// Accepts a short id (`@N`, `STK@N`), a full id, a unique id prefix, or a
/// case-insensitive name.
pub fn resolve_entity<'a, T: Entity>(
    reference: &str,
    items: &'a [T],
    short_ids: &ShortIdIndex,
    kind: &str,
) -> Result<&'a T> {
    let reference = reference.trim();
    let by_id = |id: &EntityId| items.iter().find(|item| item.id() == id);

    if ShortIdIndex::is_short_ref(reference) {
        let id = short_ids.resolve(reference).ok_or_else(|| {
            miette!(
                "Unknown short id '{}' (list the {}s first)",
                reference,
                kind
            )
        })?;
        return by_id(&id).ok_or_else(|| miette!("No {} matching '{}'", kind, reference));
    }

    if let Ok(id) = reference.parse::<EntityId>() {
        if let Some(found) = by_id(&id) {
            return Ok(found);
        }
    }

    let upper = reference.to_ascii_uppercase();
    if upper.starts_with(&format!("{}-", T::PREFIX)) {
        let matches: Vec<&T> = items
            .iter()
            .filter(|item| item.id().to_string().starts_with(&upper))
            .collect();
        match matches.as_slice() {
            [single] => return Ok(*single),
            [] => {}
            many => bail!(
                "Ambiguous {} id '{}' matches {} entries",
                kind,
                reference,
                many.len()
            ),
        }
    }

    items
        .iter()
        .find(|item| names_match(item.name(), reference))
        .ok_or_else(|| miette!("No {} matching '{}'", kind, reference))
}

/// Ask for confirmation; without a terminal only `assume_yes` confirms
pub fn confirm(prompt: &str, assume_yes: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    if !io::stdin().is_terminal() {
        return Ok(false);
    }
    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(false)
        .interact()
        .into_diagnostic()
}

/// Short id column value (`@N`), or blank when not listed
pub fn format_short_id(id: &EntityId, short_ids: &ShortIdIndex) -> String {
    short_ids
        .get_short_id(id)
        .map(|n| format!("@{}", n))
        .unwrap_or_default()
}

/// Truncate to `max_len` characters, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Record creation time as shown in detail views
pub fn format_created<T: Entity>(record: &T) -> String {
    record.created().format("%Y-%m-%d %H:%M").to_string()
}

/// Print a success line
pub fn success(message: impl std::fmt::Display) {
    println!("{} {}", style("✓").green(), message);
}
