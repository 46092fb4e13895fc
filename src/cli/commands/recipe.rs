//! `larder recipe` command - recipes, stock checks and cooking

use clap::Subcommand;
use console::style;
use dialoguer::{theme::ColorfulTheme, Input};
use miette::{bail, miette, IntoDiagnostic, Result};
use std::path::PathBuf;

use crate::cli::helpers::{
    confirm, format_created, format_short_id, resolve_entity, success, truncate_str, Session,
};
use crate::cli::output::{list_format, print_structured, tsv_line};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::entity::format_quantity;
use crate::core::recipe::{
    evaluate, CookOutcome, IngredientRow, Recipe, RecipeDraft, ShortageReport, RECIPE_CATEGORIES,
};
use crate::core::Config;
use crate::yaml::parse_yaml_file;

#[derive(Subcommand, Debug)]
pub enum RecipeCommands {
    /// List recipes grouped by category
    List(ListArgs),

    /// Show a recipe with stock availability
    Show(RefArgs),

    /// Create a recipe, or replace one with --replace
    New(NewArgs),

    /// Create or replace a recipe from a YAML file
    Import(ImportArgs),

    /// Delete a recipe
    Remove(RefArgs),

    /// Check a recipe against stock and list what is missing
    Check(RefArgs),

    /// Cook a recipe, deducting its ingredients from stock
    Cook(CookArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Show only count
    #[arg(long)]
    pub count: bool,
}

#[derive(clap::Args, Debug)]
pub struct RefArgs {
    /// Recipe name, ID or short ID (@N, RCP@N)
    pub recipe: String,
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Recipe name
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// Recipe category (Soups, Pasta Dishes, ...)
    #[arg(long, short = 'c')]
    pub category: Option<String>,

    /// Ingredient as NAME:QUANTITY:UNIT (repeatable)
    #[arg(long = "ingredient", short = 'I', value_name = "NAME:QTY:UNIT")]
    pub ingredients: Vec<String>,

    /// Replace this recipe instead of creating a new one
    #[arg(long, value_name = "RECIPE")]
    pub replace: Option<String>,

    /// Interactive mode (prompt for fields)
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

#[derive(clap::Args, Debug)]
pub struct ImportArgs {
    /// YAML file with name, category and ingredients
    pub file: PathBuf,
}

#[derive(clap::Args, Debug)]
pub struct CookArgs {
    /// Recipe name, ID or short ID (@N, RCP@N)
    pub recipe: String,

    /// Cook even when ingredients are short
    #[arg(long)]
    pub force: bool,
}

/// Run a recipe subcommand
pub async fn run(cmd: RecipeCommands, global: &GlobalOpts, config: &Config) -> Result<()> {
    let mut session = Session::open(config)?;
    match cmd {
        RecipeCommands::List(args) => run_list(args, &session, global),
        RecipeCommands::Show(args) => run_show(args, &session, global),
        RecipeCommands::New(args) => run_new(args, &mut session, global),
        RecipeCommands::Import(args) => run_import(args, &mut session, global),
        RecipeCommands::Remove(args) => run_remove(args, &mut session),
        RecipeCommands::Check(args) => run_check(args, &mut session, global).await,
        RecipeCommands::Cook(args) => run_cook(args, &mut session),
    }
}

fn resolve(session: &Session, reference: &str) -> Result<Recipe> {
    let short_ids = session.short_ids();
    resolve_entity(reference, session.pantry.recipes().recipes(), &short_ids, "recipe").cloned()
}

/// Parse `NAME:QTY:UNIT`; missing parts leave the row incomplete
fn parse_ingredient(row: &str) -> Result<IngredientRow> {
    let mut parts = row.splitn(3, ':');
    let name = parts.next().unwrap_or_default().trim().to_string();
    let quantity = match parts.next().map(str::trim).filter(|q| !q.is_empty()) {
        Some(q) => Some(
            q.replace(',', ".")
                .parse::<f64>()
                .map_err(|_| miette!("Invalid quantity '{}' in ingredient '{}'", q, row))?,
        ),
        None => None,
    };
    let unit = parts.next().unwrap_or_default().trim().to_string();
    Ok(IngredientRow {
        name,
        quantity,
        unit,
    })
}

fn print_shortages(shortages: &ShortageReport) {
    for shortage in shortages.iter() {
        println!(
            "  {} {}: need {} {}, have {}",
            style("✗").red(),
            shortage.name,
            format_quantity(shortage.required),
            shortage.unit,
            format_quantity(shortage.available)
        );
    }
}

fn print_saved(recipe: &Recipe, global: &GlobalOpts, message: &str) -> Result<()> {
    match global.format {
        OutputFormat::Id => println!("{}", recipe.id),
        format => {
            if !print_structured(recipe, format)? {
                success(format!(
                    "{} {} ({} ingredients)",
                    message,
                    style(&recipe.name).yellow(),
                    recipe.ingredients.len()
                ));
            }
        }
    }
    Ok(())
}

fn run_list(args: ListArgs, session: &Session, global: &GlobalOpts) -> Result<()> {
    let groups = session.pantry.recipes().grouped();
    let recipes: Vec<&Recipe> = groups
        .iter()
        .flat_map(|(_, recipes)| recipes.iter().copied())
        .collect();

    if args.count {
        println!("{}", recipes.len());
        return Ok(());
    }

    let format = list_format(global.format);
    if print_structured(&recipes, format)? {
        return Ok(());
    }

    if recipes.is_empty() {
        if format == OutputFormat::Tsv {
            println!("No recipes found.");
        }
        return Ok(());
    }

    let short_ids = session.record_listing(recipes.iter().map(|recipe| recipe.id));
    match format {
        OutputFormat::Id => {
            for recipe in &recipes {
                println!("{}", recipe.id);
            }
        }
        _ => {
            println!(
                "{}",
                tsv_line(&["SHORT", "NAME", "CATEGORY", "INGREDIENTS", "MISSING"])
            );
            let stock = session.pantry.stock();
            for recipe in &recipes {
                let missing = evaluate(recipe, stock).len();
                let names: Vec<&str> = recipe.ingredients.iter().map(|i| i.name.as_str()).collect();
                println!(
                    "{}",
                    tsv_line(&[
                        &format_short_id(&recipe.id, &short_ids),
                        &recipe.name,
                        &recipe.category,
                        &truncate_str(&names.join(", "), 40),
                        &missing.to_string(),
                    ])
                );
            }
        }
    }
    Ok(())
}

fn run_show(args: RefArgs, session: &Session, global: &GlobalOpts) -> Result<()> {
    let recipe = resolve(session, &args.recipe)?;

    match global.format {
        OutputFormat::Id => println!("{}", recipe.id),
        OutputFormat::Tsv => {
            for ingredient in &recipe.ingredients {
                println!(
                    "{}",
                    tsv_line(&[
                        &ingredient.name,
                        &format_quantity(ingredient.quantity),
                        &ingredient.unit,
                    ])
                );
            }
        }
        format => {
            if print_structured(&recipe, format)? {
                return Ok(());
            }
            let stock = session.pantry.stock();
            println!("{}", style("─".repeat(60)).dim());
            println!("{}: {}", style("ID").bold(), style(&recipe.id).cyan());
            println!("{}: {}", style("Name").bold(), style(&recipe.name).yellow());
            println!("{}: {}", style("Category").bold(), recipe.category);
            println!("{}", style("─".repeat(60)).dim());
            println!("{}: {}", style("Created").dim(), format_created(&recipe));
            println!();
            println!(
                "{} ({}):",
                style("Ingredients").bold(),
                recipe.ingredients.len()
            );
            for ingredient in &recipe.ingredients {
                let available = stock
                    .find_by_name(&ingredient.name)
                    .map(|item| item.quantity)
                    .unwrap_or(0.0);
                let mark = if available >= ingredient.quantity {
                    style("✓").green()
                } else {
                    style("✗").red()
                };
                println!(
                    "  {} {} {} {} {}",
                    mark,
                    format_quantity(ingredient.quantity),
                    ingredient.unit,
                    ingredient.name,
                    style(format!("(have {})", format_quantity(available))).dim()
                );
            }
        }
    }
    Ok(())
}

fn prompt_draft(args: &NewArgs) -> Result<RecipeDraft> {
    let theme = ColorfulTheme::default();

    let name: String = Input::with_theme(&theme)
        .with_prompt("Recipe name")
        .with_initial_text(args.name.clone().unwrap_or_default())
        .interact_text()
        .into_diagnostic()?;

    let category: String = Input::with_theme(&theme)
        .with_prompt(format!("Category ({})", RECIPE_CATEGORIES.join(", ")))
        .default(
            args.category
                .clone()
                .unwrap_or_else(|| crate::core::entity::OTHER_CATEGORY.to_string()),
        )
        .interact_text()
        .into_diagnostic()?;

    let mut ingredients = args
        .ingredients
        .iter()
        .map(|row| parse_ingredient(row))
        .collect::<Result<Vec<_>>>()?;
    loop {
        let row: String = Input::with_theme(&theme)
            .with_prompt("Ingredient NAME:QTY:UNIT (empty to finish)")
            .allow_empty(true)
            .interact_text()
            .into_diagnostic()?;
        if row.trim().is_empty() {
            break;
        }
        ingredients.push(parse_ingredient(&row)?);
    }

    Ok(RecipeDraft {
        id: None,
        name,
        category: Some(category),
        ingredients,
    })
}

fn run_new(args: NewArgs, session: &mut Session, global: &GlobalOpts) -> Result<()> {
    let mut draft = if args.interactive {
        prompt_draft(&args)?
    } else {
        RecipeDraft {
            id: None,
            name: args.name.clone().unwrap_or_default(),
            category: args.category.clone(),
            ingredients: args
                .ingredients
                .iter()
                .map(|row| parse_ingredient(row))
                .collect::<Result<Vec<_>>>()?,
        }
    };

    if let Some(reference) = &args.replace {
        draft.id = Some(resolve(session, reference)?.id);
    }

    let message = if draft.id.is_some() { "Replaced" } else { "Created" };
    let recipe = session
        .pantry
        .save_recipe(draft)
        .map_err(|e| miette!("{}", e))?
        .ok_or_else(|| miette!("Recipe to replace no longer exists"))?;
    print_saved(&recipe, global, message)
}

fn run_import(args: ImportArgs, session: &mut Session, global: &GlobalOpts) -> Result<()> {
    let draft: RecipeDraft = parse_yaml_file(&args.file)?;
    let target = draft.id;
    let message = if target.is_some() { "Replaced" } else { "Imported" };

    let recipe = session
        .pantry
        .save_recipe(draft)
        .map_err(|e| miette!("{}", e))?;
    match (recipe, target) {
        (Some(recipe), _) => print_saved(&recipe, global, message),
        (None, Some(id)) => bail!("No recipe with id {} to replace", id),
        (None, None) => bail!("Recipe was not saved"),
    }
}

fn run_remove(args: RefArgs, session: &mut Session) -> Result<()> {
    let recipe = resolve(session, &args.recipe)?;
    if let Some(removed) = session
        .pantry
        .remove_recipe(&recipe.id)
        .map_err(|e| miette!("{}", e))?
    {
        success(format!("Removed {}", style(&removed.name).yellow()));
    }
    Ok(())
}

async fn run_check(args: RefArgs, session: &mut Session, global: &GlobalOpts) -> Result<()> {
    let recipe = resolve(session, &args.recipe)?;
    let check = session
        .pantry
        .check_recipe(&recipe.id)
        .await
        .map_err(|e| miette!("{}", e))?
        .ok_or_else(|| miette!("No recipe matching '{}'", args.recipe))?;

    match global.format {
        OutputFormat::Id => {
            for entry in &check.added {
                println!("{}", entry.id);
            }
        }
        OutputFormat::Json | OutputFormat::Yaml => {
            let value = serde_json::json!({
                "recipe": recipe.name,
                "shortages": check.shortages,
                "added": check.added,
            });
            print_structured(&value, global.format)?;
        }
        _ => {
            if check.shortages.is_empty() {
                success(format!(
                    "Everything for {} is in stock",
                    style(&recipe.name).yellow()
                ));
                return Ok(());
            }
            println!(
                "{} is short of {} ingredient(s):",
                style(&recipe.name).yellow(),
                check.shortages.len()
            );
            print_shortages(&check.shortages);
            if check.added.is_empty() {
                println!("Everything missing is already on the shopping list.");
            } else {
                success(format!(
                    "Added {} item(s) to the shopping list",
                    check.added.len()
                ));
                for entry in &check.added {
                    println!(
                        "  {} {} {} ({})",
                        format_quantity(entry.quantity),
                        entry.unit,
                        entry.name,
                        entry.category
                    );
                }
            }
        }
    }
    Ok(())
}

fn run_cook(args: CookArgs, session: &mut Session) -> Result<()> {
    let recipe = resolve(session, &args.recipe)?;

    let mut outcome = session
        .pantry
        .cook(&recipe.id, args.force)
        .map_err(|e| miette!("{}", e))?
        .ok_or_else(|| miette!("No recipe matching '{}'", args.recipe))?;

    if let CookOutcome::Blocked { shortages } = &outcome {
        println!(
            "Not enough stock for {}:",
            style(&recipe.name).yellow()
        );
        print_shortages(shortages);
        if !confirm("Cook anyway with what is available?", false)? {
            bail!("Not cooking {} (use --force to cook anyway)", recipe.name);
        }
        outcome = session
            .pantry
            .cook(&recipe.id, true)
            .map_err(|e| miette!("{}", e))?
            .ok_or_else(|| miette!("No recipe matching '{}'", args.recipe))?;
    }

    if let CookOutcome::Cooked { shortages, pruned } = outcome {
        success(format!("Cooked {}", style(&recipe.name).yellow()));
        if !shortages.is_empty() {
            println!("Cooked with {} ingredient(s) short", shortages.len());
        }
        for item in &pruned {
            println!("  {} {} is used up", style("•").dim(), item.name);
        }
    }
    Ok(())
}
