//! Initials CLI entry point.

use clap::Parser;

use initials::cli::{commands, handle_error, Cli, Commands};
use initials::infrastructure::config::ConfigLoader;
use initials::infrastructure::logging::LoggerImpl;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match ConfigLoader::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => handle_error(err, cli.json),
    };

    // Keep the guard alive so the file appender flushes on exit.
    let _logger = match LoggerImpl::init(&config.logging) {
        Ok(logger) => logger,
        Err(err) => handle_error(err, cli.json),
    };

    let result = match cli.command {
        Commands::Init(args) => commands::init::execute(args, &config, cli.json).await,
        Commands::Allocate(args) => commands::allocate::execute(args, &config, cli.json).await,
        Commands::Preview(args) => commands::preview::execute(&args, cli.json),
        Commands::List(args) => commands::list::execute(args, &config, cli.json).await,
        Commands::Serve(args) => commands::serve::execute(args, &config).await,
    };

    if let Err(err) = result {
        handle_error(err, cli.json);
    }
}
