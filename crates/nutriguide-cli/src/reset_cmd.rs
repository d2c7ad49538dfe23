//! `nutriguide reset` command: delete every stored slot.

use anyhow::{Context, Result, bail};

use crate::config::NutriConfig;

pub fn run_reset(config: &NutriConfig, yes: bool) -> Result<()> {
    let dir = config.store.data_dir.display();
    if !yes {
        bail!(
            "this deletes your profile, plan, guidelines and history in {dir}\n\
             Re-run with --yes to confirm."
        );
    }

    config
        .slots()?
        .clear_all()
        .context("failed to clear stored data")?;
    tracing::info!(data_dir = %dir, "stored data cleared");
    println!("All data cleared. Run `nutriguide onboard` to start over.");
    Ok(())
}
