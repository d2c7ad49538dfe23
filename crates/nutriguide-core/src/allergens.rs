//! Allergen cross-check between a profile and a generated plan.
//!
//! The model is asked to respect allergies but nothing guarantees it did.
//! This scan reports meals whose name or ingredients mention an allergy so
//! the views can flag them. Matches are warnings, never grounds to reject a
//! plan.

use nutriguide_store::models::{DailyPlan, MealSlot};

/// A meal that mentions one of the user's allergies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllergenConflict {
    pub day: String,
    pub slot: MealSlot,
    pub meal: String,
    pub allergen: String,
}

impl std::fmt::Display for AllergenConflict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {}: {} may contain {}",
            self.day, self.slot, self.meal, self.allergen
        )
    }
}

/// Lowercased search terms for one allergy: the entry itself plus its
/// singular form ("peanuts" also matches "peanut butter").
fn search_terms(allergen: &str) -> Vec<String> {
    let lower = allergen.trim().to_lowercase();
    let mut terms = vec![lower.clone()];
    if let Some(singular) = lower.strip_suffix('s') {
        if singular.len() >= 3 {
            terms.push(singular.to_string());
        }
    }
    terms
}

/// Scan every meal of `plan` against `allergies` (case-insensitive).
///
/// Reports at most one conflict per meal and allergy. Blank allergy entries
/// are ignored.
pub fn find_conflicts(plan: &[DailyPlan], allergies: &[String]) -> Vec<AllergenConflict> {
    let allergies: Vec<(&str, Vec<String>)> = allergies
        .iter()
        .map(|a| a.trim())
        .filter(|a| !a.is_empty())
        .map(|a| (a, search_terms(a)))
        .collect();
    if allergies.is_empty() {
        return Vec::new();
    }

    let mut conflicts = Vec::new();
    for day in plan {
        for (slot, meal) in day.meals() {
            let haystacks: Vec<String> = std::iter::once(meal.name.as_str())
                .chain(meal.ingredients.iter().map(String::as_str))
                .map(str::to_lowercase)
                .collect();

            for (allergen, terms) in &allergies {
                let hit = terms
                    .iter()
                    .any(|term| haystacks.iter().any(|h| h.contains(term.as_str())));
                if hit {
                    conflicts.push(AllergenConflict {
                        day: day.day.clone(),
                        slot,
                        meal: meal.name.clone(),
                        allergen: (*allergen).to_string(),
                    });
                }
            }
        }
    }
    conflicts
}

#[cfg(test)]
mod tests {
    use super::*;
    use nutriguide_store::models::Meal;

    fn meal(name: &str, ingredients: &[&str]) -> Meal {
        Meal {
            name: name.to_string(),
            ingredients: ingredients.iter().map(|s| s.to_string()).collect(),
            instructions: String::new(),
            calories: 100.0,
            protein: 1.0,
            carbs: 1.0,
            fat: 1.0,
        }
    }

    fn day() -> DailyPlan {
        DailyPlan {
            day: "Day 1".to_string(),
            breakfast: meal("Toast with Peanut Butter", &["bread", "peanut butter"]),
            lunch: meal("Shrimp Salad", &["Shrimp", "lettuce"]),
            dinner: meal("Lentil Soup", &["lentils", "carrot"]),
            snack: meal("Apple", &["apple"]),
            total_calories: 400.0,
        }
    }

    #[test]
    fn plural_allergy_matches_singular_ingredient() {
        let conflicts = find_conflicts(&[day()], &["Peanuts".to_string()]);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].slot, MealSlot::Breakfast);
        assert_eq!(conflicts[0].allergen, "Peanuts");
    }

    #[test]
    fn match_is_case_insensitive_and_once_per_meal() {
        let conflicts = find_conflicts(&[day()], &["shrimp".to_string()]);
        assert_eq!(conflicts.len(), 1, "name and ingredient hit the same meal");
        assert_eq!(
            conflicts[0].to_string(),
            "Day 1 Lunch: Shrimp Salad may contain shrimp"
        );
    }

    #[test]
    fn blank_allergies_find_nothing() {
        assert!(find_conflicts(&[day()], &["".to_string(), "  ".to_string()]).is_empty());
        assert!(find_conflicts(&[day()], &[]).is_empty());
    }

    #[test]
    fn short_stems_are_not_used() {
        assert_eq!(search_terms("oats").len(), 2);
        assert_eq!(search_terms("ots"), vec!["ots".to_string()]);
        assert_eq!(search_terms("eggs"), vec!["eggs".to_string(), "egg".to_string()]);
    }
}
