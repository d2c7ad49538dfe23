use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Gender as collected during onboarding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Other => "other",
        };
        f.write_str(s)
    }
}

impl FromStr for Gender {
    type Err = GenderParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            "other" => Ok(Self::Other),
            other => Err(GenderParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`Gender`] string.
#[derive(Debug, Clone)]
pub struct GenderParseError(pub String);

impl fmt::Display for GenderParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid gender: {:?}", self.0)
    }
}

impl std::error::Error for GenderParseError {}

// ---------------------------------------------------------------------------

/// Self-reported weekly activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Active,
    VeryActive,
}

impl ActivityLevel {
    /// Least to most active.
    pub const ALL: [ActivityLevel; 5] = [
        ActivityLevel::Sedentary,
        ActivityLevel::Light,
        ActivityLevel::Moderate,
        ActivityLevel::Active,
        ActivityLevel::VeryActive,
    ];
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Sedentary => "sedentary",
            Self::Light => "light",
            Self::Moderate => "moderate",
            Self::Active => "active",
            Self::VeryActive => "very_active",
        };
        f.write_str(s)
    }
}

impl FromStr for ActivityLevel {
    type Err = ActivityLevelParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sedentary" => Ok(Self::Sedentary),
            "light" => Ok(Self::Light),
            "moderate" => Ok(Self::Moderate),
            "active" => Ok(Self::Active),
            "very_active" => Ok(Self::VeryActive),
            other => Err(ActivityLevelParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`ActivityLevel`] string.
#[derive(Debug, Clone)]
pub struct ActivityLevelParseError(pub String);

impl fmt::Display for ActivityLevelParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid activity level: {:?}", self.0)
    }
}

impl std::error::Error for ActivityLevelParseError {}

// ---------------------------------------------------------------------------

/// What the user wants the plan to optimize for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    WeightLoss,
    WeightGain,
    Maintenance,
    BetterSkin,
    HighEnergy,
}

impl Goal {
    pub const ALL: [Goal; 5] = [
        Goal::WeightLoss,
        Goal::WeightGain,
        Goal::Maintenance,
        Goal::BetterSkin,
        Goal::HighEnergy,
    ];
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::WeightLoss => "weight_loss",
            Self::WeightGain => "weight_gain",
            Self::Maintenance => "maintenance",
            Self::BetterSkin => "better_skin",
            Self::HighEnergy => "high_energy",
        };
        f.write_str(s)
    }
}

impl FromStr for Goal {
    type Err = GoalParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weight_loss" => Ok(Self::WeightLoss),
            "weight_gain" => Ok(Self::WeightGain),
            "maintenance" => Ok(Self::Maintenance),
            "better_skin" => Ok(Self::BetterSkin),
            "high_energy" => Ok(Self::HighEnergy),
            other => Err(GoalParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`Goal`] string.
#[derive(Debug, Clone)]
pub struct GoalParseError(pub String);

impl fmt::Display for GoalParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid goal: {:?}", self.0)
    }
}

impl std::error::Error for GoalParseError {}

// ---------------------------------------------------------------------------

/// Topic of an educational tip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TipCategory {
    Nutrition,
    Habit,
    Hydration,
    Cooking,
}

impl TipCategory {
    /// Every category, in the order the tips prompt lists them.
    pub const ALL: [TipCategory; 4] = [
        TipCategory::Nutrition,
        TipCategory::Habit,
        TipCategory::Hydration,
        TipCategory::Cooking,
    ];
}

impl fmt::Display for TipCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Nutrition => "nutrition",
            Self::Habit => "habit",
            Self::Hydration => "hydration",
            Self::Cooking => "cooking",
        };
        f.write_str(s)
    }
}

impl FromStr for TipCategory {
    type Err = TipCategoryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "nutrition" => Ok(Self::Nutrition),
            "habit" => Ok(Self::Habit),
            "hydration" => Ok(Self::Hydration),
            "cooking" => Ok(Self::Cooking),
            other => Err(TipCategoryParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`TipCategory`] string.
#[derive(Debug, Clone)]
pub struct TipCategoryParseError(pub String);

impl fmt::Display for TipCategoryParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid tip category: {:?}", self.0)
    }
}

impl std::error::Error for TipCategoryParseError {}

// ---------------------------------------------------------------------------

/// The four meals of a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealSlot {
    /// Slots in the order the meal browser shows them.
    pub const DISPLAY_ORDER: [MealSlot; 4] = [
        MealSlot::Breakfast,
        MealSlot::Lunch,
        MealSlot::Snack,
        MealSlot::Dinner,
    ];
}

impl fmt::Display for MealSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Breakfast => "Breakfast",
            Self::Lunch => "Lunch",
            Self::Dinner => "Dinner",
            Self::Snack => "Snack",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// Onboarding answers. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    /// Height in centimetres.
    pub height: f64,
    /// Weight in kilograms.
    pub weight: f64,
    pub activity_level: ActivityLevel,
    pub goal: Goal,
    pub allergies: Vec<String>,
    /// Free text, e.g. "vegetarian, no seafood".
    pub preferences: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
    pub name: String,
    pub ingredients: Vec<String>,
    pub instructions: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

/// One day of a generated meal plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyPlan {
    pub day: String,
    pub breakfast: Meal,
    pub lunch: Meal,
    pub dinner: Meal,
    pub snack: Meal,
    pub total_calories: f64,
}

impl DailyPlan {
    pub fn meal(&self, slot: MealSlot) -> &Meal {
        match slot {
            MealSlot::Breakfast => &self.breakfast,
            MealSlot::Lunch => &self.lunch,
            MealSlot::Dinner => &self.dinner,
            MealSlot::Snack => &self.snack,
        }
    }

    /// Meals paired with their slot, in display order.
    pub fn meals(&self) -> impl Iterator<Item = (MealSlot, &Meal)> {
        MealSlot::DISPLAY_ORDER
            .into_iter()
            .map(move |slot| (slot, self.meal(slot)))
    }

    /// Sum of the four meals' calories.
    pub fn summed_calories(&self) -> f64 {
        self.meals().map(|(_, m)| m.calories).sum()
    }
}

/// Daily macronutrient targets in grams.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Macros {
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionGuidelines {
    pub daily_calories: f64,
    pub macros: Macros,
    pub key_tips: Vec<String>,
    pub recommended_foods: Vec<String>,
    pub avoid_foods: Vec<String>,
}

/// A manual weight/mood/adherence check-in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressEntry {
    /// Local date, `MM/DD/YYYY`.
    pub date: String,
    pub weight: f64,
    /// 1 (worst) to 5 (best).
    pub mood: u8,
    /// Plan adherence percentage, 0 to 100.
    pub adherence: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EducationalTip {
    pub title: String,
    pub content: String,
    pub category: TipCategory,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn meal(name: &str, calories: f64) -> Meal {
        Meal {
            name: name.to_string(),
            ingredients: vec!["oats".to_string()],
            instructions: "Mix.".to_string(),
            calories,
            protein: 10.0,
            carbs: 20.0,
            fat: 5.0,
        }
    }

    #[test]
    fn enums_display_and_parse_agree() {
        for level in ActivityLevel::ALL {
            assert_eq!(level.to_string().parse::<ActivityLevel>().unwrap(), level);
        }
        for goal in Goal::ALL {
            assert_eq!(goal.to_string().parse::<Goal>().unwrap(), goal);
        }
        assert_eq!("better_skin".parse::<Goal>().unwrap(), Goal::BetterSkin);
        assert_eq!("other".parse::<Gender>().unwrap(), Gender::Other);
        assert_eq!("cooking".parse::<TipCategory>().unwrap(), TipCategory::Cooking);
    }

    #[test]
    fn enum_parse_errors_name_the_value() {
        let err = "athletic".parse::<ActivityLevel>().unwrap_err();
        assert_eq!(err.to_string(), "invalid activity level: \"athletic\"");
        assert!("".parse::<Goal>().is_err());
    }

    #[test]
    fn profile_uses_camel_case_keys() {
        let profile = UserProfile {
            name: "Alex Doe".to_string(),
            age: 30,
            gender: Gender::Female,
            height: 165.0,
            weight: 60.0,
            activity_level: ActivityLevel::VeryActive,
            goal: Goal::WeightLoss,
            allergies: vec!["peanuts".to_string()],
            preferences: "vegetarian".to_string(),
        };
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["activityLevel"], "very_active");
        assert_eq!(json["goal"], "weight_loss");
        assert_eq!(json["gender"], "female");
    }

    #[test]
    fn daily_plan_reads_original_storage_format() {
        let raw = r#"{
            "day": "Day 1",
            "breakfast": {"name":"Oats","ingredients":["oats"],"instructions":"Cook.","calories":300,"protein":10,"carbs":50,"fat":6},
            "lunch": {"name":"Salad","ingredients":["lettuce"],"instructions":"Toss.","calories":450,"protein":20,"carbs":30,"fat":15},
            "dinner": {"name":"Curry","ingredients":["lentils"],"instructions":"Simmer.","calories":600,"protein":25,"carbs":70,"fat":18},
            "snack": {"name":"Apple","ingredients":["apple"],"instructions":"Eat.","calories":95,"protein":0.5,"carbs":25,"fat":0.3},
            "totalCalories": 1445
        }"#;
        let plan: DailyPlan = serde_json::from_str(raw).unwrap();
        assert_eq!(plan.total_calories, 1445.0);
        assert_eq!(plan.summed_calories(), 1445.0);
    }

    #[test]
    fn meals_iterate_in_display_order() {
        let plan = DailyPlan {
            day: "Monday".to_string(),
            breakfast: meal("b", 1.0),
            lunch: meal("l", 2.0),
            dinner: meal("d", 3.0),
            snack: meal("s", 4.0),
            total_calories: 10.0,
        };
        let names: Vec<&str> = plan.meals().map(|(_, m)| m.name.as_str()).collect();
        assert_eq!(names, vec!["b", "l", "s", "d"]);
        assert_eq!(plan.meal(MealSlot::Dinner).name, "d");
    }

    #[test]
    fn unknown_tip_category_is_rejected() {
        let raw = r#"{"title":"t","content":"c","category":"sleep"}"#;
        assert!(serde_json::from_str::<EducationalTip>(raw).is_err());
    }
}
