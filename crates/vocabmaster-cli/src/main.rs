//! VocabMaster CLI - vocabulary practice and lyric annotation.

mod cli;
mod commands;
mod logging;

use clap::Parser;
use cli::{Cli, Commands};
use commands::Context;

fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let ctx = Context {
        library_path: cli.library,
        oracle: cli.oracle,
        model: cli.model,
        verbose: cli.verbose,
    };

    let result = match cli.command {
        Commands::Init { force } => commands::init::run(&ctx, force),

        Commands::Words { action } => commands::words::run(&ctx, action),

        Commands::Import { file, section } => commands::import::run(&ctx, file, section),

        Commands::Practice { mode, pool } => commands::practice::run(&ctx, mode, pool),

        Commands::Annotate { target, title } => commands::annotate::run(&ctx, target, title),

        Commands::Songs { action } => commands::songs::run(&ctx, action),

        Commands::Status { json } => commands::status::run(&ctx, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
