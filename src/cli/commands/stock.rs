//! `larder stock` command - pantry stock management

use clap::Subcommand;
use console::style;
use miette::{bail, miette, Result};
use std::time::Duration;

use crate::cli::helpers::{format_created, format_short_id, resolve_entity, success, Session};
use crate::cli::output::{list_format, print_structured, tsv_line};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::entity::{format_quantity, names_match};
use crate::core::stock::{StockEdit, StockItem};
use crate::core::suggest::Suggestion;
use crate::core::Config;

#[derive(Subcommand, Debug)]
pub enum StockCommands {
    /// Add to stock (merges with an item of the same name and unit)
    Add(AddArgs),

    /// List stock grouped by category
    List(ListArgs),

    /// Show one stock item
    Show(RefArgs),

    /// Change a stock item
    Edit(EditArgs),

    /// Delete a stock item
    Remove(RefArgs),

    /// Put a stock item on the shopping list
    ToList(RefArgs),

    /// List known categories
    Categories,

    /// Suggest a category for a name
    Suggest(SuggestArgs),

    /// Look up a product by barcode
    Scan(ScanArgs),
}

#[derive(clap::Args, Debug)]
pub struct AddArgs {
    /// Item name
    pub name: String,

    /// Quantity to add
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
pub struct ListArgs {
    /// Only this category
    #[arg(long, short = 'c')]
    pub category: Option<String>,

    /// Show only count
    #[arg(long)]
    pub count: bool,
}

#[derive(clap::Args, Debug)]
pub struct RefArgs {
    /// Item name, ID or short ID (@N, STK@N)
    pub item: String,
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Item name, ID or short ID (@N, STK@N)
    pub item: String,

    /// New name
    #[arg(long)]
    pub name: Option<String>,

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
pub struct SuggestArgs {
    /// Name as typed so far
    pub name: String,
}

#[derive(clap::Args, Debug)]
pub struct ScanArgs {
    /// Barcode digits
    pub barcode: String,

    /// Add the product to stock
    #[arg(long)]
    pub add: bool,

    /// Quantity when adding
    #[arg(long, short = 'n', default_value_t = 1.0)]
    pub quantity: f64,

    /// Unit when adding
    #[arg(long, short = 'u')]
    pub unit: Option<String>,
}

/// Run a stock subcommand
pub async fn run(cmd: StockCommands, global: &GlobalOpts, config: &Config) -> Result<()> {
    let mut session = Session::open(config)?;
    match cmd {
        StockCommands::Add(args) => run_add(args, &mut session, global).await,
        StockCommands::List(args) => run_list(args, &session, global),
        StockCommands::Show(args) => run_show(args, &session, global),
        StockCommands::Edit(args) => run_edit(args, &mut session, global),
        StockCommands::Remove(args) => run_remove(args, &mut session),
        StockCommands::ToList(args) => run_to_list(args, &mut session),
        StockCommands::Categories => run_categories(&session, global),
        StockCommands::Suggest(args) => run_suggest(args, &session).await,
        StockCommands::Scan(args) => run_scan(args, &mut session, global).await,
    }
}

fn describe(item: &StockItem) -> String {
    format!(
        "{} {} {} ({})",
        format_quantity(item.quantity),
        item.unit,
        style(&item.name).yellow(),
        item.category
    )
}

/// Print a single item after a change
fn print_item(item: &StockItem, global: &GlobalOpts, message: &str) -> Result<()> {
    match global.format {
        OutputFormat::Id => println!("{}", item.id),
        format => {
            if !print_structured(item, format)? {
                success(format!("{}: {}", message, describe(item)));
            }
        }
    }
    Ok(())
}

async fn run_add(args: AddArgs, session: &mut Session, global: &GlobalOpts) -> Result<()> {
    let item = session
        .pantry
        .add_stock(
            &args.name,
            args.quantity,
            args.unit.as_deref(),
            args.category.as_deref(),
        )
        .await
        .map_err(|e| miette!("{}", e))?;
    print_item(&item, global, "In stock")
}

fn run_list(args: ListArgs, session: &Session, global: &GlobalOpts) -> Result<()> {
    let groups = session.pantry.stock().grouped();
    let items: Vec<&StockItem> = groups
        .iter()
        .filter(|(category, _)| {
            args.category
                .as_deref()
                .is_none_or(|wanted| names_match(category, wanted))
        })
        .flat_map(|(_, items)| items.iter().copied())
        .collect();

    if args.count {
        println!("{}", items.len());
        return Ok(());
    }

    let format = list_format(global.format);
    if print_structured(&items, format)? {
        return Ok(());
    }

    if items.is_empty() {
        if format == OutputFormat::Tsv {
            println!("No stock items found.");
        }
        return Ok(());
    }

    let short_ids = session.record_listing(items.iter().map(|item| item.id));
    match format {
        OutputFormat::Id => {
            for item in &items {
                println!("{}", item.id);
            }
        }
        _ => {
            println!("{}", tsv_line(&["SHORT", "NAME", "QUANTITY", "UNIT", "CATEGORY"]));
            for item in &items {
                println!(
                    "{}",
                    tsv_line(&[
                        &format_short_id(&item.id, &short_ids),
                        &item.name,
                        &format_quantity(item.quantity),
                        &item.unit,
                        &item.category,
                    ])
                );
            }
        }
    }
    Ok(())
}

fn run_show(args: RefArgs, session: &Session, global: &GlobalOpts) -> Result<()> {
    let short_ids = session.short_ids();
    let item = resolve_entity(&args.item, session.pantry.stock().items(), &short_ids, "stock item")?;

    match global.format {
        OutputFormat::Id => println!("{}", item.id),
        OutputFormat::Tsv => println!(
            "{}",
            tsv_line(&[
                &item.id.to_string(),
                &item.name,
                &format_quantity(item.quantity),
                &item.unit,
                &item.category,
            ])
        ),
        format => {
            if !print_structured(item, format)? {
                println!("{}", style("─".repeat(60)).dim());
                println!("{}: {}", style("ID").bold(), style(&item.id).cyan());
                println!("{}: {}", style("Name").bold(), style(&item.name).yellow());
                println!(
                    "{}: {} {}",
                    style("Quantity").bold(),
                    format_quantity(item.quantity),
                    item.unit
                );
                println!("{}: {}", style("Category").bold(), item.category);
                println!("{}", style("─".repeat(60)).dim());
                println!(
                    "{}: {}",
                    style("Added").dim(),
                    format_created(item)
                );
            }
        }
    }
    Ok(())
}

fn run_edit(args: EditArgs, session: &mut Session, global: &GlobalOpts) -> Result<()> {
    let edit = StockEdit {
        name: args.name,
        quantity: args.quantity,
        unit: args.unit,
        category: args.category,
    };
    if edit.name.is_none() && edit.quantity.is_none() && edit.unit.is_none() && edit.category.is_none()
    {
        bail!("Nothing to change: pass --name, --quantity, --unit or --category");
    }

    let short_ids = session.short_ids();
    let id = resolve_entity(&args.item, session.pantry.stock().items(), &short_ids, "stock item")?.id;
    let item = session
        .pantry
        .edit_stock(&id, edit)
        .map_err(|e| miette!("{}", e))?
        .ok_or_else(|| miette!("No stock item matching '{}'", args.item))?;
    print_item(&item, global, "Updated")
}

fn run_remove(args: RefArgs, session: &mut Session) -> Result<()> {
    let short_ids = session.short_ids();
    let id = resolve_entity(&args.item, session.pantry.stock().items(), &short_ids, "stock item")?.id;
    if let Some(item) = session.pantry.remove_stock(&id).map_err(|e| miette!("{}", e))? {
        success(format!("Removed {}", style(&item.name).yellow()));
    }
    Ok(())
}

fn run_to_list(args: RefArgs, session: &mut Session) -> Result<()> {
    let short_ids = session.short_ids();
    let item = resolve_entity(&args.item, session.pantry.stock().items(), &short_ids, "stock item")?;
    let (id, name) = (item.id, item.name.clone());

    match session
        .pantry
        .add_stock_item_to_list(&id)
        .map_err(|e| miette!("{}", e))?
    {
        Some(entry) => success(format!(
            "Listed {} {} {}",
            format_quantity(entry.quantity),
            entry.unit,
            style(&entry.name).yellow()
        )),
        None => println!("{} is already on the shopping list", style(name).yellow()),
    }
    Ok(())
}

fn run_categories(session: &Session, global: &GlobalOpts) -> Result<()> {
    let categories = session.pantry.stock().categories();
    if !print_structured(&categories, global.format)? {
        for category in categories {
            println!("{}", category);
        }
    }
    Ok(())
}

async fn run_suggest(args: SuggestArgs, session: &Session) -> Result<()> {
    let category = match session.pantry.suggest_category(&args.name) {
        Suggestion::Skipped => bail!("Type at least 2 characters to get a suggestion"),
        Suggestion::Local(category) => Some(category),
        Suggestion::Unresolved => None,
        Suggestion::Pending(_) if !session.config.lookup.enabled => None,
        Suggestion::Pending(seq) => {
            let mut rx = session.pantry.suggestions();
            let wait = session.config.lookup.debounce()
                + session.config.lookup.timeout()
                + Duration::from_millis(250);
            let category = match tokio::time::timeout(
                wait,
                rx.wait_for(|published| published.as_ref().is_some_and(|s| s.seq == seq)),
            )
            .await
            {
                Ok(Ok(published)) => published.as_ref().map(|s| s.category.clone()),
                _ => None,
            };
            category
        }
    };

    match category {
        Some(category) => println!("{}", category),
        None => {
            println!("{}", crate::core::entity::OTHER_CATEGORY);
            eprintln!("{}", style("No category found, using the default").dim());
        }
    }
    Ok(())
}

async fn run_scan(args: ScanArgs, session: &mut Session, global: &GlobalOpts) -> Result<()> {
    let product = session
        .pantry
        .scan_barcode(&args.barcode)
        .await
        .ok_or_else(|| miette!("No product found for barcode '{}'", args.barcode.trim()))?;

    if args.add {
        let item = session
            .pantry
            .add_stock(
                &product.name,
                args.quantity,
                args.unit.as_deref(),
                Some(&product.category),
            )
            .await
            .map_err(|e| miette!("{}", e))?;
        return print_item(&item, global, "In stock");
    }

    match global.format {
        OutputFormat::Id => println!("{}", product.name),
        OutputFormat::Json | OutputFormat::Yaml => {
            let value = serde_json::json!({
                "barcode": product.barcode,
                "name": product.name,
                "category": product.category,
            });
            print_structured(&value, global.format)?;
        }
        _ => println!("{}", tsv_line(&[&product.barcode, &product.name, &product.category])),
    }
    Ok(())
}
