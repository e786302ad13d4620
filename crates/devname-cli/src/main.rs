//! CLI entry point - infrastructure is wired together in `bootstrap`.

mod bootstrap;
mod commands;
mod host;
mod parser;

use clap::Parser;

use devname_core::DeviceClass;

use crate::bootstrap::{BootstrapOptions, bootstrap};
use crate::parser::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Load environment variables
    dotenvy::dotenv().ok();

    // Parse CLI arguments
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        // No command provided - show help
        use clap::CommandFactory;
        Cli::command().print_help()?;
        return Ok(());
    };

    // The resolve command carries the hints the host provider needs; every
    // other command runs with neutral defaults.
    let (device_class, arm_is_simulator) = match &command {
        Commands::Resolve {
            class,
            arm_simulator,
            ..
        } => (DeviceClass::from(*class), *arm_simulator),
        _ => (DeviceClass::Unspecified, false),
    };

    let ctx = bootstrap(BootstrapOptions {
        data_dir: cli.data_dir,
        endpoint: cli.endpoint,
        device_class,
        arm_is_simulator,
    })
    .await?;

    match command {
        Commands::Resolve {
            identifier,
            no_type,
            ..
        } => commands::resolve(&ctx, identifier.as_deref(), !no_type)?,
        Commands::Refresh { force } => commands::refresh(&ctx, force).await?,
        Commands::Paths => commands::paths(&ctx)?,
        Commands::Show => commands::show(&ctx)?,
    }

    Ok(())
}
