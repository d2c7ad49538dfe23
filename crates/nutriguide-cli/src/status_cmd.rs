//! `nutriguide status` command: summarize stored state.

use anyhow::{Context, Result};

use nutriguide_core::views::{first_name, format_amount};

use crate::config::NutriConfig;

/// Run the status command.
///
/// Reads the slots directly and never contacts the generation service.
pub fn run_status(config: &NutriConfig) -> Result<()> {
    let state = config
        .slots()?
        .load_all()
        .context("failed to read stored data (run `nutriguide reset --yes` to start over)")?;

    println!("Data directory: {}", config.store.data_dir.display());
    println!("Model: {}", config.model);
    println!(
        "API key: {}",
        if config.api_key.is_some() { "configured" } else { "missing" }
    );
    println!();

    let Some(profile) = &state.profile else {
        println!("Profile: none");
        println!();
        println!("Next: run `nutriguide onboard` to create your profile.");
        return Ok(());
    };
    println!("Profile: {} ({}, {})", first_name(&profile.name), profile.goal, profile.activity_level);

    match &state.meal_plan {
        Some(plan) => println!("Meal plan: {} days", plan.len()),
        None => println!("Meal plan: missing"),
    }
    match &state.guidelines {
        Some(g) => println!("Guidelines: {} kcal/day", format_amount(g.daily_calories)),
        None => println!("Guidelines: missing"),
    }
    match state.history.first() {
        Some(latest) => println!(
            "Check-ins: {} (latest {} at {} kg)",
            state.history.len(),
            latest.date,
            format_amount(latest.weight)
        ),
        None => println!("Check-ins: none"),
    }

    if state.meal_plan.is_none() || state.guidelines.is_none() {
        println!();
        println!("Next: run `nutriguide generate` to create your plan.");
    }
    Ok(())
}
