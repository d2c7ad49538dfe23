//! Meal browser view models.

use nutriguide_store::models::{DailyPlan, Meal, MealSlot};

/// Ingredients shown on a card before collapsing into `+N more`.
pub const VISIBLE_INGREDIENTS: usize = 4;

/// Bar width as a 0–100 percentage.
fn bar(value: f64, scale: f64) -> u16 {
    if !value.is_finite() {
        return 0;
    }
    (value * scale).clamp(0.0, 100.0).round() as u16
}

/// One meal as rendered in the browser.
#[derive(Debug, Clone, PartialEq)]
pub struct MealCard {
    pub slot: MealSlot,
    pub name: String,
    pub visible_ingredients: Vec<String>,
    pub hidden_ingredients: usize,
    pub instructions: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl MealCard {
    pub fn new(slot: MealSlot, meal: &Meal) -> Self {
        let visible_ingredients: Vec<String> = meal
            .ingredients
            .iter()
            .take(VISIBLE_INGREDIENTS)
            .cloned()
            .collect();
        Self {
            slot,
            name: meal.name.clone(),
            hidden_ingredients: meal.ingredients.len() - visible_ingredients.len(),
            visible_ingredients,
            instructions: meal.instructions.clone(),
            calories: meal.calories,
            protein: meal.protein,
            carbs: meal.carbs,
            fat: meal.fat,
        }
    }

    /// `+N more` when ingredients were cut off.
    pub fn more_label(&self) -> Option<String> {
        (self.hidden_ingredients > 0).then(|| format!("+{} more", self.hidden_ingredients))
    }

    pub fn protein_bar(&self) -> u16 {
        bar(self.protein, 2.0)
    }

    pub fn carbs_bar(&self) -> u16 {
        bar(self.carbs, 1.0)
    }

    pub fn fat_bar(&self) -> u16 {
        bar(self.fat, 3.0)
    }
}

/// Cards for one day: Breakfast, Lunch, Snack, Dinner.
pub fn meal_cards(day: &DailyPlan) -> Vec<MealCard> {
    day.meals().map(|(slot, meal)| MealCard::new(slot, meal)).collect()
}

/// Selected-day index, always within `0..len` (or 0 when empty).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DaySelector {
    selected: usize,
    len: usize,
}

impl DaySelector {
    pub fn new(len: usize) -> Self {
        Self { selected: 0, len }
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn select(&mut self, index: usize) {
        self.selected = index.min(self.len.saturating_sub(1));
    }

    /// Update the day count after a regeneration, keeping the index valid.
    pub fn resize(&mut self, len: usize) {
        self.len = len;
        self.select(self.selected);
    }

    pub fn next(&mut self) {
        self.select(self.selected + 1);
    }

    pub fn prev(&mut self) {
        self.select(self.selected.saturating_sub(1));
    }

    /// The selected day, if the plan has any.
    pub fn current<'a>(&self, plan: &'a [DailyPlan]) -> Option<&'a DailyPlan> {
        plan.get(self.selected).or_else(|| plan.last())
    }
}
