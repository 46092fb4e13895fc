use clap::Parser;
use larder::cli::{commands, Cli, Commands};
use larder::util::{init_logging, LoggingConfig};
use miette::Result;

#[tokio::main]
async fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let config = cli.global.config();

    init_logging(LoggingConfig::from_flags(
        cli.global.verbose,
        cli.global.quiet,
        config.log_level.as_deref(),
    ));

    match cli.command {
        Commands::Stock(cmd) => commands::stock::run(cmd, &cli.global, &config).await,
        Commands::Shop(cmd) => commands::shop::run(cmd, &cli.global, &config).await,
        Commands::Recipe(cmd) => commands::recipe::run(cmd, &cli.global, &config).await,
        Commands::Inspire(args) => commands::inspire::run(args, &cli.global, &config).await,
        Commands::Completions(args) => commands::completions::run(args),
    }
}
