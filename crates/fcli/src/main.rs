//! `fcli` -- uniform forge client CLI.
//!
//! Parses arguments with clap, builds a `forge_client::Context` from the
//! global flags, and dispatches to the per-entity command handlers. Any
//! error bubbles up here, is printed to stderr, and turns into exit
//! code 1.

mod cli;
mod commands;
mod output;
mod runtime;
mod table;

use clap::Parser;

use cli::{Cli, Commands};
use runtime::Runtime;

fn main() {
    let cli = Cli::parse();

    if cli.global.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("fcli=debug,forge_client=debug,forge_http=debug")
            .with_writer(std::io::stderr)
            .init();
    }

    let result = Runtime::new(&cli.global).and_then(|rt| match cli.command {
        Commands::Issues(args) => commands::issues::run(&rt, &args),
        Commands::Pulls(args) => commands::pulls::run(&rt, &args),
        Commands::Labels(args) => commands::labels::run(&rt, &args),
        Commands::Milestones(args) => commands::milestones::run(&rt, &args),
        Commands::Releases(args) => commands::releases::run(&rt, &args),
        Commands::Repos(args) => commands::repos::run(&rt, &args),
        Commands::Forks(args) => commands::forks::run(&rt, &args),
        Commands::Comment(args) => commands::comment::run(&rt, &args),
        Commands::Notifications(args) => commands::notifications::run(&rt, &args),
        Commands::Checks(args) => commands::checks::run(&rt, &args),
        Commands::Attachments(args) => commands::attachments::run(&rt, &args),
        Commands::Keys(args) => commands::keys::run(&rt, &args),
        Commands::Api(args) => commands::api::run(&rt, &args),
    });

    if let Err(error) = result {
        eprintln!("fcli: error: {error:#}");
        std::process::exit(1);
    }
}
