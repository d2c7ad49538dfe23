//! Response parsing and structural validation.
//!
//! A response passes three gates before it is accepted:
//! 1. It is JSON (`GenerationError::Parse` otherwise).
//! 2. It decodes into the expected model (`InvalidResponse` on missing or
//!    mistyped fields).
//! 3. It is structurally sane: non-empty lists and names, finite
//!    non-negative amounts, positive calorie totals (`InvalidResponse`).
//!
//! Nutritional plausibility is not judged here. Calorie totals that drift
//! from the sum of their meals are only logged.

use serde::de::DeserializeOwned;

use nutriguide_store::models::{DailyPlan, EducationalTip, Meal, NutritionGuidelines};

use super::prompt::PLAN_DAYS;
use crate::provider::{GenerationError, RequestKind};

/// Relative drift between `totalCalories` and the summed meals that is
/// tolerated without a warning.
const CALORIE_DRIFT_WARN: f64 = 0.15;

/// Parse and validate a meal plan response.
pub fn parse_meal_plan(raw: &str) -> Result<Vec<DailyPlan>, GenerationError> {
    let kind = RequestKind::MealPlan;
    let plan: Vec<DailyPlan> = decode(kind, raw)?;
    validate_meal_plan(&plan).map_err(|reason| GenerationError::invalid(kind, reason))?;
    Ok(plan)
}

/// Parse and validate a guidelines response.
pub fn parse_guidelines(raw: &str) -> Result<NutritionGuidelines, GenerationError> {
    let kind = RequestKind::Guidelines;
    let guidelines: NutritionGuidelines = decode(kind, raw)?;
    validate_guidelines(&guidelines).map_err(|reason| GenerationError::invalid(kind, reason))?;
    Ok(guidelines)
}

/// Parse and validate a tips response.
pub fn parse_tips(raw: &str) -> Result<Vec<EducationalTip>, GenerationError> {
    let kind = RequestKind::Tips;
    let tips: Vec<EducationalTip> = decode(kind, raw)?;
    validate_tips(&tips).map_err(|reason| GenerationError::invalid(kind, reason))?;
    Ok(tips)
}

/// Models occasionally wrap JSON in a Markdown fence despite the MIME type.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

fn decode<T: DeserializeOwned>(kind: RequestKind, raw: &str) -> Result<T, GenerationError> {
    let value: serde_json::Value = serde_json::from_str(strip_code_fence(raw))
        .map_err(|source| GenerationError::Parse { kind, source })?;
    serde_json::from_value(value).map_err(|e| GenerationError::invalid(kind, e.to_string()))
}

// ---------------------------------------------------------------------------
// Structural checks
// ---------------------------------------------------------------------------

fn check_amount(label: &str, value: f64) -> Result<(), String> {
    if !value.is_finite() || value < 0.0 {
        return Err(format!("{label} must be a non-negative number, got {value}"));
    }
    Ok(())
}

fn check_text(label: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{label} must not be empty"));
    }
    Ok(())
}

fn validate_meal(label: &str, meal: &Meal) -> Result<(), String> {
    check_text(&format!("{label} name"), &meal.name)?;
    if meal.ingredients.iter().all(|i| i.trim().is_empty()) {
        return Err(format!("{label} has no ingredients"));
    }
    check_amount(&format!("{label} calories"), meal.calories)?;
    check_amount(&format!("{label} protein"), meal.protein)?;
    check_amount(&format!("{label} carbs"), meal.carbs)?;
    check_amount(&format!("{label} fat"), meal.fat)?;
    Ok(())
}

fn validate_meal_plan(plan: &[DailyPlan]) -> Result<(), String> {
    if plan.is_empty() {
        return Err("meal plan contains no days".to_string());
    }
    if plan.len() != PLAN_DAYS {
        tracing::warn!(days = plan.len(), expected = PLAN_DAYS, "meal plan day count differs");
    }

    for (idx, day) in plan.iter().enumerate() {
        let day_label = format!("day {}", idx + 1);
        check_text(&format!("{day_label} label"), &day.day)?;
        for (slot, meal) in day.meals() {
            validate_meal(&format!("{day_label} {}", slot.to_string().to_lowercase()), meal)?;
        }
        if !day.total_calories.is_finite() || day.total_calories <= 0.0 {
            return Err(format!(
                "{day_label} totalCalories must be positive, got {}",
                day.total_calories
            ));
        }

        let summed = day.summed_calories();
        let drift = (day.total_calories - summed).abs() / day.total_calories;
        if drift > CALORIE_DRIFT_WARN {
            tracing::warn!(
                day = %day.day,
                total = day.total_calories,
                summed,
                "totalCalories disagrees with the sum of the meals"
            );
        }
    }
    Ok(())
}

fn validate_guidelines(g: &NutritionGuidelines) -> Result<(), String> {
    if !g.daily_calories.is_finite() || g.daily_calories <= 0.0 {
        return Err(format!(
            "dailyCalories must be positive, got {}",
            g.daily_calories
        ));
    }
    check_amount("macros.protein", g.macros.protein)?;
    check_amount("macros.carbs", g.macros.carbs)?;
    check_amount("macros.fat", g.macros.fat)?;
    Ok(())
}

fn validate_tips(tips: &[EducationalTip]) -> Result<(), String> {
    if tips.is_empty() {
        return Err("no tips returned".to_string());
    }
    for (idx, tip) in tips.iter().enumerate() {
        check_text(&format!("tip {} title", idx + 1), &tip.title)?;
        check_text(&format!("tip {} content", idx + 1), &tip.content)?;
    }
    Ok(())
}
