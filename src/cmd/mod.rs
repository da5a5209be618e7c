//! Subcommand dispatch.
//!
//! Routes the parsed [`Cli`] to its handler module. Invoking the
//! binary with no subcommand prints a short orientation message
//! instead of an error.

pub mod health;
pub mod init;
pub mod run;
pub mod validate;

use crate::cli::{Cli, Commands};
use crate::error::BackhaulError;

pub async fn dispatch(cli: Cli) -> Result<(), BackhaulError> {
    let Some(command) = cli.command else {
        print_welcome();
        return Ok(());
    };

    match command {
        Commands::Run(args) => run::execute(*args).await,
        Commands::Init(args) => init::execute(&args),
        Commands::Validate(args) => validate::execute(&args),
        Commands::Health(args) => health::execute(args).await,
    }
}

fn print_welcome() {
    println!(
        "\n  backhaul v{} \u{2014} host-routing HTTP reverse proxy\n\n  \
         Nothing to do yet. Try:\n\n    \
         backhaul init              Write a starter config\n    \
         backhaul run               Serve (auto-detects ./backhaul.yaml)\n    \
         backhaul validate          Check a config without serving\n    \
         backhaul --help            Full command reference\n",
        env!("CARGO_PKG_VERSION")
    );
}
