//! Natural-language prompts built from a profile.
//!
//! Pure string formatting. The profile is trusted as-is: every field is
//! embedded verbatim so the model sees exactly what the user entered.

use nutriguide_store::models::{TipCategory, UserProfile};

/// Number of days a generated meal plan covers.
pub const PLAN_DAYS: usize = 3;

/// Number of tips requested per visit to the tips feed.
pub const TIP_COUNT: usize = 4;

/// Allergies as a comma-separated phrase, or `none`.
pub fn allergies_phrase(profile: &UserProfile) -> String {
    let listed: Vec<&str> = profile
        .allergies
        .iter()
        .map(|a| a.trim())
        .filter(|a| !a.is_empty())
        .collect();
    if listed.is_empty() {
        "none".to_string()
    } else {
        listed.join(", ")
    }
}

fn preferences_phrase(profile: &UserProfile) -> &str {
    let trimmed = profile.preferences.trim();
    if trimmed.is_empty() { "none" } else { trimmed }
}

/// Prompt for a [`PLAN_DAYS`]-day meal plan.
pub fn meal_plan_prompt(profile: &UserProfile) -> String {
    format!(
        "Generate a {days}-day healthy and affordable meal plan for a {age}-year-old {gender} \
         who is {height}cm, {weight}kg.\n\
         Activity Level: {activity}. Goal: {goal}. Allergies: {allergies}. Preferences: {preferences}.\n\
         Ensure meals are easy to cook and use common ingredients.",
        days = PLAN_DAYS,
        age = profile.age,
        gender = profile.gender,
        height = profile.height,
        weight = profile.weight,
        activity = profile.activity_level,
        goal = profile.goal,
        allergies = allergies_phrase(profile),
        preferences = preferences_phrase(profile),
    )
}

/// Prompt for daily calorie and macro guidelines.
pub fn guidelines_prompt(profile: &UserProfile) -> String {
    format!(
        "Based on the following profile, provide professional nutrition guidelines:\n\
         - Age: {age}\n\
         - Gender: {gender}\n\
         - Height: {height}cm\n\
         - Weight: {weight}kg\n\
         - Goal: {goal}\n\
         - Activity: {activity}\n\
         - Allergies: {allergies}\n\
         - Preferences: {preferences}\n\
         Calculate daily caloric needs and macronutrient distribution (protein, carbs, fat in grams). \
         Provide specific tips for their goal.",
        age = profile.age,
        gender = profile.gender,
        height = profile.height,
        weight = profile.weight,
        goal = profile.goal,
        activity = profile.activity_level,
        allergies = allergies_phrase(profile),
        preferences = preferences_phrase(profile),
    )
}

/// Prompt for the tips feed. Takes no profile input.
pub fn tips_prompt() -> String {
    let categories: Vec<String> = TipCategory::ALL.iter().map(|c| c.to_string()).collect();
    format!(
        "Generate {TIP_COUNT} short, actionable nutrition and wellness tips for beginner health enthusiasts.\n\
         Categories: {}.",
        categories.join(", ")
    )
}
