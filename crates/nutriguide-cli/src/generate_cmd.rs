//! `nutriguide generate` command: regenerate plan and guidelines.

use anyhow::{Result, bail};
use tokio_util::sync::CancellationToken;

use nutriguide_core::controller::{AppController, AppState};
use nutriguide_core::views::format_amount;

use crate::config::NutriConfig;

/// Run the generate command.
///
/// Always regenerates both plan and guidelines, even when both exist. This is
/// also the recovery path after a failed generation.
pub async fn run_generate(config: &NutriConfig, cancel: &CancellationToken) -> Result<()> {
    let generator = config.generator()?;
    let mut controller = AppController::load(config.slots()?, generator)?;
    if controller.profile().is_none() {
        bail!("no profile found; run `nutriguide onboard` first");
    }

    println!("Generating your meal plan and guidelines...");
    controller.generate(cancel).await?;
    report(&controller)
}

/// Print the outcome of a generation run. A failure becomes an error so the
/// process exits non-zero.
pub fn report(controller: &AppController) -> Result<()> {
    match controller.state() {
        AppState::Ready if controller.last_error().is_some() => {
            let reason = controller
                .last_error()
                .map(ToString::to_string)
                .unwrap_or_default();
            bail!(
                "generation failed: {reason}\nYour previous plan was kept. Run `nutriguide generate` to try again."
            )
        }
        AppState::Ready => {
            let days = controller.meal_plan().map_or(0, <[_]>::len);
            if let Some(g) = controller.guidelines() {
                println!(
                    "Plan ready: {days} days, {} kcal/day target.",
                    format_amount(g.daily_calories)
                );
            }
            for conflict in controller.allergen_conflicts() {
                println!("  warning: {conflict}");
            }
            println!("Run `nutriguide plan` or `nutriguide dashboard` to see it.");
            Ok(())
        }
        AppState::Failed { reason } => {
            bail!("generation failed: {reason}\nRun `nutriguide generate` to try again.")
        }
        other => bail!("generation did not complete (state: {other})"),
    }
}
