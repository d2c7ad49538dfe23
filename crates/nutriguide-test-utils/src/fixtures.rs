//! Canned profile and model outputs.

use serde_json::json;

use nutriguide_store::models::{
    ActivityLevel, DailyPlan, EducationalTip, Gender, Goal, NutritionGuidelines, UserProfile,
};

/// 30-year-old vegetarian woman, 165 cm, 60 kg, moderately active, aiming
/// to lose weight, allergic to peanuts.
pub fn sample_profile() -> UserProfile {
    UserProfile {
        name: "Alex Doe".to_string(),
        age: 30,
        gender: Gender::Female,
        height: 165.0,
        weight: 60.0,
        activity_level: ActivityLevel::Moderate,
        goal: Goal::WeightLoss,
        allergies: vec!["peanuts".to_string()],
        preferences: "vegetarian".to_string(),
    }
}

fn meal(name: &str, ingredients: &[&str], calories: u32, protein: u32, carbs: u32, fat: u32) -> serde_json::Value {
    json!({
        "name": name,
        "ingredients": ingredients,
        "instructions": format!("Prepare the {}.", name.to_lowercase()),
        "calories": calories,
        "protein": protein,
        "carbs": carbs,
        "fat": fat,
    })
}

/// Three days, four meals each, totals equal to the meal sums.
pub fn meal_plan_json() -> String {
    let days = [
        ("Day 1", "Overnight Oats", "Chickpea Salad", "Vegetable Curry", "Greek Yogurt"),
        ("Day 2", "Spinach Omelette", "Lentil Soup", "Tofu Stir Fry", "Apple Slices"),
        ("Day 3", "Berry Smoothie", "Quinoa Bowl", "Bean Chili", "Hummus and Carrots"),
    ];
    let plan: Vec<serde_json::Value> = days
        .iter()
        .map(|(day, breakfast, lunch, dinner, snack)| {
            json!({
                "day": day,
                "breakfast": meal(breakfast, &["oats", "milk", "berries", "chia seeds", "honey", "cinnamon"], 350, 14, 55, 8),
                "lunch": meal(lunch, &["chickpeas", "cucumber", "tomato"], 450, 18, 60, 14),
                "dinner": meal(dinner, &["rice", "vegetables", "coconut milk", "spices"], 550, 20, 75, 18),
                "snack": meal(snack, &["yogurt"], 150, 12, 10, 5),
                "totalCalories": 1500,
            })
        })
        .collect();
    serde_json::Value::Array(plan).to_string()
}

pub fn guidelines_json() -> String {
    json!({
        "dailyCalories": 1750,
        "macros": { "protein": 95, "carbs": 190, "fat": 58 },
        "keyTips": [
            "Fill half your plate with vegetables",
            "Choose whole grains",
            "Keep a steady meal schedule",
            "Limit sugary drinks"
        ],
        "recommendedFoods": ["lentils", "leafy greens", "tofu"],
        "avoidFoods": ["peanut butter", "soda"]
    })
    .to_string()
}

pub fn tips_json() -> String {
    json!([
        { "title": "Drink water first", "content": "Start each meal with a glass of water.", "category": "hydration" },
        { "title": "Batch cook grains", "content": "Cook rice or quinoa once for several days.", "category": "cooking" },
        { "title": "Read labels", "content": "Check serving sizes before comparing calories.", "category": "nutrition" },
        { "title": "Plan ahead", "content": "Decide tomorrow's lunch tonight.", "category": "habit" }
    ])
    .to_string()
}

pub fn sample_meal_plan() -> Vec<DailyPlan> {
    serde_json::from_str(&meal_plan_json()).expect("meal plan fixture is valid")
}

pub fn sample_guidelines() -> NutritionGuidelines {
    serde_json::from_str(&guidelines_json()).expect("guidelines fixture is valid")
}

pub fn sample_tips() -> Vec<EducationalTip> {
    serde_json::from_str(&tips_json()).expect("tips fixture is valid")
}
