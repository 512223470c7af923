//! sparklab CLI entry point.

use clap::Parser;

use sparklab::cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init(args) => sparklab::cli::commands::init::execute(args).await,
        Commands::Serve(args) => sparklab::cli::commands::serve::execute(args).await,
    };

    if let Err(err) = result {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}
