//! `nutriguide log` and `nutriguide history` commands.

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;

use nutriguide_core::progress::{DATE_FORMAT, ProgressLogger};
use nutriguide_core::views::{format_amount, mood_label};

use crate::config::NutriConfig;

/// Normalize a user-supplied date to `MM/DD/YYYY`.
fn parse_date(input: &str) -> Result<String> {
    let date = NaiveDate::parse_from_str(input.trim(), DATE_FORMAT)
        .with_context(|| format!("invalid date {input:?}; expected MM/DD/YYYY"))?;
    Ok(date.format(DATE_FORMAT).to_string())
}

/// Record one check-in.
///
/// An unusable weight records nothing and is reported on stderr; it is not
/// treated as a failure.
pub fn run_log(
    config: &NutriConfig,
    weight: &str,
    mood: u8,
    adherence: u8,
    date: Option<&str>,
) -> Result<()> {
    let slots = config.slots()?;
    if slots.load_profile().context("failed to read profile")?.is_none() {
        bail!("no profile found; run `nutriguide onboard` first");
    }
    let date = date.map(parse_date).transpose()?;

    let mut logger = ProgressLogger::load(slots).context("failed to read history")?;
    let form = logger.form_mut();
    form.set_weight(weight);
    form.set_mood(mood);
    form.set_adherence(adherence);

    let recorded = match date {
        Some(d) => logger.submit_on(d),
        None => logger.submit(),
    }
    .context("failed to save history")?;

    match recorded {
        Some(entry) => println!(
            "Logged {}: {} kg, mood {} ({}), adherence {}%",
            entry.date,
            format_amount(entry.weight),
            entry.mood,
            mood_label(entry.mood),
            entry.adherence
        ),
        None => eprintln!("No entry recorded: weight must be a positive number (got {weight:?})."),
    }
    Ok(())
}

pub fn run_history(config: &NutriConfig, json: bool) -> Result<()> {
    let history = config.slots()?.load_history().context("failed to read history")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&history)?);
        return Ok(());
    }
    if history.is_empty() {
        println!("No check-ins yet. Record one with `nutriguide log --weight <KG>`.");
        return Ok(());
    }

    println!("{:<12} {:>8} {:>6} {:>10}", "Date", "Weight", "Mood", "Adherence");
    for entry in &history {
        println!(
            "{:<12} {:>8} {:>6} {:>9}%",
            entry.date,
            format_amount(entry.weight),
            entry.mood,
            entry.adherence
        );
    }

    if let (Some(newest), Some(oldest)) = (history.first(), history.last()) {
        if history.len() > 1 {
            let change = newest.weight - oldest.weight;
            let sign = if change > 0.0 { "+" } else { "" };
            println!();
            println!(
                "Change over {} check-ins: {sign}{} kg",
                history.len(),
                format_amount(change)
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dates_are_normalized() {
        assert_eq!(parse_date("03/04/2025").unwrap(), "03/04/2025");
        assert_eq!(parse_date(" 12/31/2024 ").unwrap(), "12/31/2024");
    }

    #[test]
    fn bad_dates_are_rejected() {
        assert!(parse_date("2025-03-04").is_err());
        assert!(parse_date("13/01/2025").is_err());
    }
}
