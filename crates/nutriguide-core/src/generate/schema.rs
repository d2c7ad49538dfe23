//! Output schemas declared to the generation service.
//!
//! Written in the OpenAPI subset the service understands (`ARRAY`, `OBJECT`,
//! `STRING`, `NUMBER`). Field names match the camelCase storage format, so a
//! conforming answer deserializes straight into the store models.

use serde_json::{Value, json};

use nutriguide_store::models::TipCategory;

fn string_list() -> Value {
    json!({ "type": "ARRAY", "items": { "type": "STRING" } })
}

fn meal_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "name": { "type": "STRING" },
            "ingredients": string_list(),
            "instructions": { "type": "STRING" },
            "calories": { "type": "NUMBER" },
            "protein": { "type": "NUMBER" },
            "carbs": { "type": "NUMBER" },
            "fat": { "type": "NUMBER" },
        },
        "required": ["name", "ingredients", "instructions", "calories", "protein", "carbs", "fat"],
    })
}

/// Array of daily plans, each with four meals and a calorie total.
pub fn meal_plan_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "day": { "type": "STRING" },
                "breakfast": meal_schema(),
                "lunch": meal_schema(),
                "dinner": meal_schema(),
                "snack": meal_schema(),
                "totalCalories": { "type": "NUMBER" },
            },
            "required": ["day", "breakfast", "lunch", "dinner", "snack", "totalCalories"],
        },
    })
}

/// Calorie target, macro targets and food lists.
pub fn guidelines_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "dailyCalories": { "type": "NUMBER" },
            "macros": {
                "type": "OBJECT",
                "properties": {
                    "protein": { "type": "NUMBER" },
                    "carbs": { "type": "NUMBER" },
                    "fat": { "type": "NUMBER" },
                },
                "required": ["protein", "carbs", "fat"],
            },
            "keyTips": string_list(),
            "recommendedFoods": string_list(),
            "avoidFoods": string_list(),
        },
        "required": ["dailyCalories", "macros", "keyTips", "recommendedFoods", "avoidFoods"],
    })
}

/// Array of tips with a closed category set.
pub fn tips_schema() -> Value {
    let categories: Vec<String> = TipCategory::ALL.iter().map(|c| c.to_string()).collect();
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "title": { "type": "STRING" },
                "content": { "type": "STRING" },
                "category": { "type": "STRING", "format": "enum", "enum": categories },
            },
            "required": ["title", "content", "category"],
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn required(schema: &Value) -> Vec<&str> {
        schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect()
    }

    #[test]
    fn every_meal_slot_shares_the_meal_schema() {
        let schema = meal_plan_schema();
        let day = &schema["items"];
        for slot in ["breakfast", "lunch", "dinner", "snack"] {
            assert_eq!(day["properties"][slot], meal_schema(), "slot {slot}");
        }
        assert_eq!(
            required(day),
            vec!["day", "breakfast", "lunch", "dinner", "snack", "totalCalories"]
        );
    }

    #[test]
    fn required_fields_are_all_declared() {
        for schema in [meal_schema(), guidelines_schema(), tips_schema()["items"].clone()] {
            for field in required(&schema) {
                assert!(
                    schema["properties"].get(field).is_some(),
                    "required field {field} not declared"
                );
            }
        }
    }

    #[test]
    fn tip_category_is_a_closed_enum() {
        let schema = tips_schema();
        let values = schema["items"]["properties"]["category"]["enum"]
            .as_array()
            .unwrap()
            .len();
        assert_eq!(values, TipCategory::ALL.len());
    }
}
