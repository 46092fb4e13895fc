//! `larder shop` command - shopping list management

use clap::Subcommand;
use console::style;
use miette::{bail, miette, Result};

use crate::cli::helpers::{confirm, format_short_id, resolve_entity, success, Session};
use crate::cli::output::{list_format, print_structured, tsv_line};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::entity::format_quantity;
use crate::core::shopping::{ShoppingEntry, ShoppingUpdate};
use crate::core::Config;

#[derive(Subcommand, Debug)]
pub enum ShopCommands {
    /// List the shopping list, unacquired entries first
    List(ListArgs),

    /// Put an item on the list
    Add(AddArgs),

    /// Tick an entry off (or back on)
    Toggle(RefArgs),

    /// Change an entry's quantity, unit or category
    Set(SetArgs),

    /// Remove an entry and put it into stock
    Remove(RefArgs),

    /// Empty the list
    Clear(ClearArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Hide acquired entries
    #[arg(long)]
    pub pending: bool,

    /// Show only count
    #[arg(long)]
    pub count: bool,
}

#[derive(clap::Args, Debug)]
pub struct AddArgs {
    /// Item name
    pub name: String,

    /// Quantity to buy
    #[arg(long, short = 'n', default_value_t = 1.0)]
    pub quantity: f64,

    /// Unit (kg, l, pcs, ...)
    #[arg(long, short = 'u')]
    pub unit: Option<String>,

    /// Category (suggested automatically when omitted)
    #[arg(long, short = 'c')]
    pub category: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct RefArgs {
    /// Entry name, ID or short ID (@N, SHOP@N)
    pub entry: String,
}

#[derive(clap::Args, Debug)]
pub struct SetArgs {
    /// Entry name, ID or short ID (@N, SHOP@N)
    pub entry: String,

    /// New quantity
    #[arg(long, short = 'n')]
    pub quantity: Option<f64>,

    /// New unit
    #[arg(long, short = 'u')]
    pub unit: Option<String>,

    /// New category
    #[arg(long, short = 'c')]
    pub category: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct ClearArgs {
    /// Do not ask for confirmation
    #[arg(long, short = 'y')]
    pub yes: bool,
}

/// Run a shopping list subcommand
pub async fn run(cmd: ShopCommands, global: &GlobalOpts, config: &Config) -> Result<()> {
    let mut session = Session::open(config)?;
    match cmd {
        ShopCommands::List(args) => run_list(args, &session, global),
        ShopCommands::Add(args) => run_add(args, &mut session, global).await,
        ShopCommands::Toggle(args) => run_toggle(args, &mut session),
        ShopCommands::Set(args) => run_set(args, &mut session),
        ShopCommands::Remove(args) => run_remove(args, &mut session),
        ShopCommands::Clear(args) => run_clear(args, &mut session),
    }
}

fn resolve(session: &Session, reference: &str) -> Result<ShoppingEntry> {
    let short_ids = session.short_ids();
    resolve_entity(
        reference,
        session.pantry.shopping().entries(),
        &short_ids,
        "shopping entry",
    )
    .cloned()
}

fn run_list(args: ListArgs, session: &Session, global: &GlobalOpts) -> Result<()> {
    let entries: Vec<&ShoppingEntry> = session
        .pantry
        .shopping()
        .sorted()
        .into_iter()
        .filter(|entry| !(args.pending && entry.acquired))
        .collect();

    if args.count {
        println!("{}", entries.len());
        return Ok(());
    }

    let format = list_format(global.format);
    if print_structured(&entries, format)? {
        return Ok(());
    }

    if entries.is_empty() {
        if format == OutputFormat::Tsv {
            println!("The shopping list is empty.");
        }
        return Ok(());
    }

    let short_ids = session.record_listing(entries.iter().map(|entry| entry.id));
    match format {
        OutputFormat::Id => {
            for entry in &entries {
                println!("{}", entry.id);
            }
        }
        _ => {
            println!(
                "{}",
                tsv_line(&["SHORT", "DONE", "NAME", "QUANTITY", "UNIT", "CATEGORY"])
            );
            for entry in &entries {
                println!(
                    "{}",
                    tsv_line(&[
                        &format_short_id(&entry.id, &short_ids),
                        if entry.acquired { "x" } else { "" },
                        &entry.name,
                        &format_quantity(entry.quantity),
                        &entry.unit,
                        &entry.category,
                    ])
                );
            }
        }
    }
    Ok(())
}

async fn run_add(args: AddArgs, session: &mut Session, global: &GlobalOpts) -> Result<()> {
    let added = session
        .pantry
        .add_to_list(
            &args.name,
            args.quantity,
            args.unit.as_deref(),
            args.category.as_deref(),
        )
        .await
        .map_err(|e| miette!("{}", e))?;

    let Some(entry) = added else {
        println!("{} is already on the shopping list", style(args.name.trim()).yellow());
        return Ok(());
    };

    match global.format {
        OutputFormat::Id => println!("{}", entry.id),
        format => {
            if !print_structured(&entry, format)? {
                success(format!(
                    "Listed {} {} {} ({})",
                    format_quantity(entry.quantity),
                    entry.unit,
                    style(&entry.name).yellow(),
                    entry.category
                ));
            }
        }
    }
    Ok(())
}

fn run_toggle(args: RefArgs, session: &mut Session) -> Result<()> {
    let entry = resolve(session, &args.entry)?;
    session
        .pantry
        .toggle_acquired(&entry.id)
        .map_err(|e| miette!("{}", e))?;
    let state = if entry.acquired { "not acquired" } else { "acquired" };
    success(format!("{} marked {}", style(&entry.name).yellow(), state));
    Ok(())
}

fn run_set(args: SetArgs, session: &mut Session) -> Result<()> {
    let mut updates = Vec::new();
    if let Some(quantity) = args.quantity {
        updates.push(ShoppingUpdate::Quantity(quantity));
    }
    if let Some(unit) = args.unit {
        updates.push(ShoppingUpdate::Unit(unit));
    }
    if let Some(category) = args.category {
        updates.push(ShoppingUpdate::Category(category));
    }
    if updates.is_empty() {
        bail!("Nothing to change: pass --quantity, --unit or --category");
    }

    let entry = resolve(session, &args.entry)?;
    for update in updates {
        session
            .pantry
            .update_entry(&entry.id, update)
            .map_err(|e| miette!("{}", e))?;
    }
    success(format!("Updated {}", style(&entry.name).yellow()));
    Ok(())
}

fn run_remove(args: RefArgs, session: &mut Session) -> Result<()> {
    let entry = resolve(session, &args.entry)?;
    if let Some(entry) = session
        .pantry
        .remove_from_list(&entry.id)
        .map_err(|e| miette!("{}", e))?
    {
        success(format!(
            "Moved {} {} {} into stock",
            format_quantity(entry.quantity),
            entry.unit,
            style(&entry.name).yellow()
        ));
    }
    Ok(())
}

fn run_clear(args: ClearArgs, session: &mut Session) -> Result<()> {
    let count = session.pantry.shopping().len();
    if count == 0 {
        println!("The shopping list is already empty.");
        return Ok(());
    }

    let prompt = format!("Remove all {} entries from the shopping list?", count);
    if !confirm(&prompt, args.yes)? {
        bail!("Not clearing the shopping list without confirmation (pass --yes)");
    }

    let removed = session.pantry.clear_list().map_err(|e| miette!("{}", e))?;
    success(format!("Cleared {} entries", removed));
    Ok(())
}
