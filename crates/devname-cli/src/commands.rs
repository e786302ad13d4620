//! Command handlers. Each delegates to the composed service and prints a
//! human-readable result.

use anyhow::{Context, Result};

use devname_core::{RefreshOutcome, Validator};
use devname_store::{METADATA_FILE, TABLE_FILE};

use crate::bootstrap::CliContext;

/// `devname resolve [IDENTIFIER]`
pub fn resolve(ctx: &CliContext, identifier: Option<&str>, include_type: bool) -> Result<()> {
    println!("{}", ctx.service.resolve(identifier, include_type));
    Ok(())
}

/// `devname refresh [--force]`
pub async fn refresh(ctx: &CliContext, force: bool) -> Result<()> {
    let outcome = ctx
        .service
        .refresh(force)
        .await
        .context("refresh failed")?;
    match outcome {
        RefreshOutcome::Updated => {
            let table = ctx.service.table();
            println!(
                "Updated: published a new table ({} families, {} models)",
                table.family_count(),
                table.model_count()
            );
        }
        RefreshOutcome::NotModified => {
            println!("Not modified: table unchanged, revalidation timestamp advanced");
        }
        RefreshOutcome::SkippedCooldown => {
            println!("Skipped: checked recently (use --force to override the cool-down)");
        }
        RefreshOutcome::AlreadyChecking => {
            println!("Skipped: another check is already in flight");
        }
    }
    Ok(())
}

/// `devname paths`
pub fn paths(ctx: &CliContext) -> Result<()> {
    match &ctx.data_root {
        Some(root) => {
            println!("Data directory: {}", root.display());
            println!("Table file:     {}", root.join(TABLE_FILE).display());
            println!("Metadata file:  {}", root.join(METADATA_FILE).display());
        }
        None => println!("Data directory: <unavailable on this platform>"),
    }
    Ok(())
}

/// `devname show`
pub fn show(ctx: &CliContext) -> Result<()> {
    let table = ctx.service.table();
    let metadata = ctx.service.metadata();

    println!("Families: {}", table.family_count());
    println!("Models:   {}", table.model_count());
    match &metadata.validator {
        Some(Validator::ETag(value)) => println!("Validator: ETag {value}"),
        Some(Validator::LastModified(value)) => println!("Validator: Last-Modified {value}"),
        None => println!("Validator: none"),
    }
    match metadata.last_checked_at {
        Some(at) => println!("Last checked: {}", at.to_rfc3339()),
        None => println!("Last checked: never"),
    }
    Ok(())
}
