//! `larder inspire` command - a random dish suggestion

use console::style;
use miette::{miette, Result};

use crate::cli::output::{print_structured, tsv_line};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::inspiration::{inspire, MealDb};
use crate::core::Config;

#[derive(clap::Args, Debug)]
pub struct InspireArgs {
    /// Also print the picture link
    #[arg(long)]
    pub thumbnail: bool,
}

pub async fn run(args: InspireArgs, global: &GlobalOpts, config: &Config) -> Result<()> {
    if !config.inspiration.enabled {
        println!("Meal inspiration is turned off (offline).");
        return Ok(());
    }

    let source = MealDb::new(&config.inspiration).map_err(|e| miette!("{}", e))?;
    let Some(meal) = inspire(&source, config.inspiration.timeout()).await else {
        println!("No suggestion right now, try again later.");
        return Ok(());
    };

    match global.format {
        OutputFormat::Id => println!("{}", meal.name),
        OutputFormat::Tsv => println!(
            "{}",
            tsv_line(&[
                &meal.display_name,
                &meal.category,
                meal.thumbnail.as_deref().unwrap_or_default(),
            ])
        ),
        format => {
            if !print_structured(&meal, format)? {
                println!(
                    "How about {} {}",
                    style(&meal.display_name).yellow().bold(),
                    style(format!("({})", meal.category)).dim()
                );
                if args.thumbnail {
                    if let Some(thumbnail) = &meal.thumbnail {
                        println!("{}", style(thumbnail).cyan());
                    }
                }
            }
        }
    }
    Ok(())
}
