//! Read-only commands: `plan`, `guidelines`, `profile`.

use anyhow::{Context, Result, bail};

use nutriguide_core::allergens;
use nutriguide_core::views::{
    self, DashboardSummary, MealCard, format_amount, humanize, meal_cards,
};
use nutriguide_store::models::{DailyPlan, UserProfile};
use nutriguide_store::Slots;

use crate::config::NutriConfig;

fn require_profile(slots: &Slots) -> Result<UserProfile> {
    slots
        .load_profile()
        .context("failed to read profile")?
        .context("no profile found; run `nutriguide onboard` first")
}

// -----------------------------------------------------------------------
// plan
// -----------------------------------------------------------------------

/// Show the stored meal plan, optionally a single 1-based `day`.
pub fn run_plan(config: &NutriConfig, day: Option<usize>, json: bool) -> Result<()> {
    let slots = config.slots()?;
    let profile = require_profile(&slots)?;
    let plan = slots
        .load_meal_plan()
        .context("failed to read meal plan")?
        .context("no meal plan stored; run `nutriguide generate`")?;

    let selected: Vec<&DailyPlan> = match day {
        Some(0) => bail!("days are numbered from 1"),
        Some(n) => match plan.get(n - 1) {
            Some(d) => vec![d],
            None => bail!("day {n} not found; the plan has {} days", plan.len()),
        },
        None => plan.iter().collect(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&selected)?);
        return Ok(());
    }

    for (idx, d) in selected.iter().enumerate() {
        if idx > 0 {
            println!();
        }
        println!("{}  ({} kcal)", d.day, format_amount(d.total_calories));
        for card in meal_cards(d) {
            print_card(&card);
        }
    }

    let conflicts = allergens::find_conflicts(&plan, &profile.allergies);
    if !conflicts.is_empty() {
        println!();
        println!("Allergy warnings:");
        for c in conflicts {
            println!("  {c}");
        }
    }
    Ok(())
}

fn print_card(card: &MealCard) {
    println!(
        "  {:<10} {}  {} kcal  P {}g  C {}g  F {}g",
        card.slot.to_string(),
        card.name,
        format_amount(card.calories),
        format_amount(card.protein),
        format_amount(card.carbs),
        format_amount(card.fat),
    );
    let mut ingredients = card.visible_ingredients.join(", ");
    if let Some(more) = card.more_label() {
        ingredients.push(' ');
        ingredients.push_str(&more);
    }
    println!("             {ingredients}");
    if !card.instructions.trim().is_empty() {
        println!("             {}", card.instructions.trim());
    }
}

// -----------------------------------------------------------------------
// guidelines
// -----------------------------------------------------------------------

pub fn run_guidelines(config: &NutriConfig, json: bool) -> Result<()> {
    let slots = config.slots()?;
    let profile = require_profile(&slots)?;
    let guidelines = slots
        .load_guidelines()
        .context("failed to read guidelines")?
        .context("no guidelines stored; run `nutriguide generate`")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&guidelines)?);
        return Ok(());
    }

    let summary = DashboardSummary::new(&profile, &guidelines);
    println!("Hello, {}! Goal: {}", summary.first_name, summary.goal);
    println!();
    for (label, value) in views::daily_targets(&guidelines) {
        println!("  {label:<9} {value}");
    }

    print_list("Key tips", &guidelines.key_tips);
    print_list("Recommended foods", &guidelines.recommended_foods);
    print_list("Foods to limit", &guidelines.avoid_foods);
    Ok(())
}

fn print_list(title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!();
    println!("{title}:");
    for item in items {
        println!("  - {item}");
    }
}

// -----------------------------------------------------------------------
// profile
// -----------------------------------------------------------------------

pub fn run_profile(config: &NutriConfig) -> Result<()> {
    let slots = config.slots()?;
    let profile = require_profile(&slots)?;

    println!("[{}] {}", views::initial(&profile.name), profile.name);
    println!();
    for (label, value) in views::profile_stats(&profile) {
        println!("  {label:<9} {value}");
    }
    println!("  {:<9} {}", "Gender", humanize(profile.gender));
    if !profile.allergies.is_empty() {
        println!("  {:<9} {}", "Allergies", profile.allergies.join(", "));
    }
    if !profile.preferences.is_empty() {
        println!("  {:<9} {}", "Prefers", profile.preferences);
    }

    if let Some(guidelines) = slots.load_guidelines().context("failed to read guidelines")? {
        println!();
        println!("Daily targets:");
        for (label, value) in views::daily_targets(&guidelines) {
            println!("  {label:<9} {value}");
        }
    }
    Ok(())
}
