//! Command line arguments

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::completions::CompletionsArgs;
use crate::cli::commands::inspire::InspireArgs;
use crate::cli::commands::recipe::RecipeCommands;
use crate::cli::commands::shop::ShopCommands;
use crate::cli::commands::stock::StockCommands;
use crate::core::Config;

#[derive(Parser, Debug)]
#[command(
    name = "larder",
    version,
    about = "Household stock, shopping list and recipes",
    long_about = "Track what is in the pantry, check recipes against it, and keep a \
                  shopping list of whatever is missing.",
    propagate_version = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Args, Debug, Clone)]
pub struct GlobalOpts {
    /// Directory holding the stored collections
    #[arg(long, global = true, env = "LARDER_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Never contact remote catalogs
    #[arg(long, global = true)]
    pub offline: bool,

    /// More log output (repeat for more)
    #[arg(long, short = 'v', global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl GlobalOpts {
    /// User configuration with command line overrides applied
    pub fn config(&self) -> Config {
        let mut config = Config::load();
        if let Some(dir) = &self.data_dir {
            config.data_dir = Some(dir.clone());
        }
        if self.offline {
            config.go_offline();
        }
        config
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Tab-separated for lists, readable text for single entities
    Auto,
    Tsv,
    Json,
    Yaml,
    /// Full ids only, one per line
    Id,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Pantry stock
    #[command(subcommand)]
    Stock(StockCommands),

    /// Shopping list
    #[command(subcommand)]
    Shop(ShopCommands),

    /// Recipes
    #[command(subcommand)]
    Recipe(RecipeCommands),

    /// Suggest a random dish
    Inspire(InspireArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}
