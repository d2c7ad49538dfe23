//! Presentation helpers shared by the text commands and the dashboard.
//!
//! Everything here is pure: no I/O, no terminal types.

pub mod meals;

pub use meals::{DaySelector, MealCard, VISIBLE_INGREDIENTS, meal_cards};

use nutriguide_store::models::{NutritionGuidelines, TipCategory, UserProfile};

/// Key tips shown on the dashboard.
pub const DASHBOARD_TIPS: usize = 3;

/// First whitespace-separated word of `name`.
pub fn first_name(name: &str) -> &str {
    name.split_whitespace().next().unwrap_or("")
}

/// Upper-cased first letter of `name`, or `?`.
pub fn initial(name: &str) -> char {
    name.trim()
        .chars()
        .next()
        .and_then(|c| c.to_uppercase().next())
        .unwrap_or('?')
}

/// `weight_loss` -> `weight loss`.
pub fn humanize(value: impl std::fmt::Display) -> String {
    value.to_string().replace('_', " ")
}

/// Whole numbers without a fraction, everything else to one decimal.
pub fn format_amount(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}

pub fn mood_label(mood: u8) -> &'static str {
    match mood {
        0 | 1 => "awful",
        2 => "low",
        3 => "okay",
        4 => "good",
        _ => "great",
    }
}

pub fn tip_category_label(category: TipCategory) -> &'static str {
    match category {
        TipCategory::Nutrition => "Nutrition",
        TipCategory::Habit => "Habit",
        TipCategory::Hydration => "Hydration",
        TipCategory::Cooking => "Cooking",
    }
}

/// Everything the dashboard header and target cards show.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    pub first_name: String,
    pub daily_calories: f64,
    pub goal: String,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub key_tips: Vec<String>,
    pub recommended_foods: Vec<String>,
    pub avoid_foods: Vec<String>,
}

impl DashboardSummary {
    pub fn new(profile: &UserProfile, guidelines: &NutritionGuidelines) -> Self {
        Self {
            first_name: first_name(&profile.name).to_owned(),
            daily_calories: guidelines.daily_calories,
            goal: humanize(profile.goal),
            protein: guidelines.macros.protein,
            carbs: guidelines.macros.carbs,
            fat: guidelines.macros.fat,
            key_tips: guidelines
                .key_tips
                .iter()
                .take(DASHBOARD_TIPS)
                .cloned()
                .collect(),
            recommended_foods: guidelines.recommended_foods.clone(),
            avoid_foods: guidelines.avoid_foods.clone(),
        }
    }
}

/// Label/value rows for the profile screen.
pub fn profile_stats(profile: &UserProfile) -> Vec<(&'static str, String)> {
    vec![
        ("Height", format!("{} cm", format_amount(profile.height))),
        ("Weight", format!("{} kg", format_amount(profile.weight))),
        ("Age", profile.age.to_string()),
        ("Activity", humanize(profile.activity_level)),
        ("Goal", humanize(profile.goal)),
    ]
}

/// Label/value rows for the daily targets.
pub fn daily_targets(guidelines: &NutritionGuidelines) -> Vec<(&'static str, String)> {
    vec![
        ("Calories", format!("{} kcal", format_amount(guidelines.daily_calories))),
        ("Protein", format!("{} g", format_amount(guidelines.macros.protein))),
        ("Carbs", format!("{} g", format_amount(guidelines.macros.carbs))),
        ("Fat", format!("{} g", format_amount(guidelines.macros.fat))),
    ]
}

#[cfg(test)]
mod tests {
    use nutriguide_store::models::{ActivityLevel, Gender, Goal, Macros};

    use super::*;

    fn profile() -> UserProfile {
        UserProfile {
            name: "Alex Doe".to_string(),
            age: 30,
            gender: Gender::Female,
            height: 165.0,
            weight: 60.5,
            activity_level: ActivityLevel::VeryActive,
            goal: Goal::WeightLoss,
            allergies: vec![],
            preferences: String::new(),
        }
    }

    fn guidelines() -> NutritionGuidelines {
        NutritionGuidelines {
            daily_calories: 1850.0,
            macros: Macros {
                protein: 110.0,
                carbs: 200.0,
                fat: 60.0,
            },
            key_tips: (1..=5).map(|i| format!("tip {i}")).collect(),
            recommended_foods: vec!["lentils".to_string()],
            avoid_foods: vec!["soda".to_string()],
        }
    }

    #[test]
    fn name_helpers() {
        assert_eq!(first_name("Alex Doe"), "Alex");
        assert_eq!(first_name("  Sam "), "Sam");
        assert_eq!(first_name(""), "");
        assert_eq!(initial("alex"), 'A');
        assert_eq!(initial(" "), '?');
    }

    #[test]
    fn humanize_replaces_underscores() {
        assert_eq!(humanize(Goal::WeightLoss), "weight loss");
        assert_eq!(humanize(ActivityLevel::VeryActive), "very active");
    }

    #[test]
    fn amounts_drop_trailing_zero() {
        assert_eq!(format_amount(165.0), "165");
        assert_eq!(format_amount(60.5), "60.5");
        assert_eq!(format_amount(72.24), "72.2");
    }

    #[test]
    fn summary_keeps_three_tips() {
        let summary = DashboardSummary::new(&profile(), &guidelines());
        assert_eq!(summary.first_name, "Alex");
        assert_eq!(summary.goal, "weight loss");
        assert_eq!(summary.key_tips, vec!["tip 1", "tip 2", "tip 3"]);
        assert_eq!(summary.daily_calories, 1850.0);
    }

    #[test]
    fn profile_rows() {
        let rows = profile_stats(&profile());
        assert_eq!(rows[0], ("Height", "165 cm".to_string()));
        assert_eq!(rows[1], ("Weight", "60.5 kg".to_string()));
        assert_eq!(rows[3], ("Activity", "very active".to_string()));

        let targets = daily_targets(&guidelines());
        assert_eq!(targets[0], ("Calories", "1850 kcal".to_string()));
    }
}
