//! `nutriguide tips` command: fetch and print a fresh batch of tips.

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;

use nutriguide_core::views::tip_category_label;

use crate::config::NutriConfig;

/// Tips are never stored; every run asks the service again.
pub async fn run_tips(config: &NutriConfig, cancel: &CancellationToken) -> Result<()> {
    let generator = config.generator()?;
    let tips = generator
        .daily_tips(cancel)
        .await
        .context("failed to fetch tips")?;

    for (idx, tip) in tips.iter().enumerate() {
        if idx > 0 {
            println!();
        }
        println!("[{}] {}", tip_category_label(tip.category), tip.title);
        println!("  {}", tip.content);
    }
    Ok(())
}
