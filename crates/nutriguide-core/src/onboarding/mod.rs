//! The four-step onboarding form.
//!
//! ```text
//! step 1: name, age, gender
//! step 2: height, weight
//! step 3: goal, activity level
//! step 4: preferences, allergies   -> finish() -> UserProfile
//! ```
//!
//! Only step 1 gates advancement (a name is required). Numeric fields are
//! clamped to their slider ranges on every write.

use std::ops::RangeInclusive;

use thiserror::Error;

use nutriguide_store::models::{ActivityLevel, Gender, Goal, UserProfile};

pub const STEP_COUNT: u8 = 4;

pub const DEFAULT_AGE: u32 = 25;
pub const DEFAULT_HEIGHT_CM: f64 = 170.0;
pub const DEFAULT_WEIGHT_KG: f64 = 70.0;

pub const AGE_RANGE: RangeInclusive<u32> = 1..=120;
pub const HEIGHT_RANGE_CM: RangeInclusive<f64> = 100.0..=250.0;
pub const WEIGHT_RANGE_KG: RangeInclusive<f64> = 30.0..=200.0;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OnboardingError {
    #[error("name is required")]
    NameRequired,

    #[error("onboarding is on step {step} of {}", STEP_COUNT)]
    Incomplete { step: u8 },
}

/// Split a comma-separated allergy list, trimming items and dropping blanks.
pub fn parse_allergies(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_owned)
        .collect()
}

fn clamp_f64(value: f64, range: &RangeInclusive<f64>) -> f64 {
    if value.is_nan() {
        return *range.start();
    }
    value.clamp(*range.start(), *range.end())
}

#[derive(Debug, Clone, PartialEq)]
pub struct OnboardingForm {
    step: u8,
    pub name: String,
    age: u32,
    pub gender: Gender,
    height: f64,
    weight: f64,
    pub goal: Goal,
    pub activity_level: ActivityLevel,
    pub preferences: String,
    /// Raw comma-separated text as typed.
    pub allergies: String,
}

impl Default for OnboardingForm {
    fn default() -> Self {
        Self {
            step: 1,
            name: String::new(),
            age: DEFAULT_AGE,
            gender: Gender::Female,
            height: DEFAULT_HEIGHT_CM,
            weight: DEFAULT_WEIGHT_KG,
            goal: Goal::Maintenance,
            activity_level: ActivityLevel::Moderate,
            preferences: String::new(),
            allergies: String::new(),
        }
    }
}

impl OnboardingForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> u8 {
        self.step
    }

    pub fn is_last_step(&self) -> bool {
        self.step == STEP_COUNT
    }

    /// Completion shown in the progress bar: 25, 50, 75, 100.
    pub fn progress_percent(&self) -> u16 {
        u16::from(self.step) * 100 / u16::from(STEP_COUNT)
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn set_age(&mut self, age: u32) {
        self.age = age.clamp(*AGE_RANGE.start(), *AGE_RANGE.end());
    }

    pub fn set_height(&mut self, cm: f64) {
        self.height = clamp_f64(cm, &HEIGHT_RANGE_CM);
    }

    pub fn set_weight(&mut self, kg: f64) {
        self.weight = clamp_f64(kg, &WEIGHT_RANGE_KG);
    }

    pub fn can_advance(&self) -> bool {
        match self.step {
            1 => !self.name.trim().is_empty(),
            s => s < STEP_COUNT,
        }
    }

    /// Move forward one step. Stays put on the last step.
    pub fn next_step(&mut self) -> Result<(), OnboardingError> {
        if self.step == 1 && self.name.trim().is_empty() {
            return Err(OnboardingError::NameRequired);
        }
        if self.step < STEP_COUNT {
            self.step += 1;
        }
        Ok(())
    }

    /// Move back one step. Stays put on the first step.
    pub fn prev_step(&mut self) {
        self.step = self.step.saturating_sub(1).max(1);
    }

    /// Build the profile. Only valid on the last step.
    pub fn finish(&self) -> Result<UserProfile, OnboardingError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(OnboardingError::NameRequired);
        }
        if !self.is_last_step() {
            return Err(OnboardingError::Incomplete { step: self.step });
        }
        Ok(UserProfile {
            name: name.to_owned(),
            age: self.age,
            gender: self.gender,
            height: self.height,
            weight: self.weight,
            activity_level: self.activity_level,
            goal: self.goal,
            allergies: parse_allergies(&self.allergies),
            preferences: self.preferences.trim().to_owned(),
        })
    }

    /// Walk every remaining step and build the profile. Used when all answers
    /// arrive at once (command-line flags).
    pub fn complete(mut self) -> Result<UserProfile, OnboardingError> {
        while !self.is_last_step() {
            self.next_step()?;
        }
        self.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_form() {
        let form = OnboardingForm::new();
        assert_eq!(form.step(), 1);
        assert_eq!(form.age(), 25);
        assert_eq!(form.gender, Gender::Female);
        assert_eq!(form.height(), 170.0);
        assert_eq!(form.weight(), 70.0);
        assert_eq!(form.activity_level, ActivityLevel::Moderate);
        assert_eq!(form.goal, Goal::Maintenance);
        assert_eq!(form.progress_percent(), 25);
    }

    #[test]
    fn name_gates_the_first_step() {
        let mut form = OnboardingForm::new();
        form.name = "   ".to_string();
        assert!(!form.can_advance());
        assert_eq!(form.next_step(), Err(OnboardingError::NameRequired));
        assert_eq!(form.step(), 1);

        form.name = "Alex".to_string();
        form.next_step().unwrap();
        assert_eq!(form.step(), 2);
    }

    #[test]
    fn steps_stay_in_bounds() {
        let mut form = OnboardingForm::new();
        form.prev_step();
        assert_eq!(form.step(), 1);
        form.name = "Alex".to_string();
        for _ in 0..10 {
            form.next_step().unwrap();
        }
        assert_eq!(form.step(), STEP_COUNT);
        assert!(form.is_last_step());
        assert!(!form.can_advance());
        assert_eq!(form.progress_percent(), 100);
    }

    #[test]
    fn sliders_clamp() {
        let mut form = OnboardingForm::new();
        form.set_height(90.0);
        assert_eq!(form.height(), 100.0);
        form.set_height(300.0);
        assert_eq!(form.height(), 250.0);
        form.set_weight(10.0);
        assert_eq!(form.weight(), 30.0);
        form.set_weight(f64::NAN);
        assert_eq!(form.weight(), 30.0);
        form.set_age(0);
        assert_eq!(form.age(), 1);
    }

    #[test]
    fn allergies_are_split_and_trimmed() {
        assert_eq!(
            parse_allergies(" peanuts, ,shellfish ,, dairy"),
            vec!["peanuts", "shellfish", "dairy"]
        );
        assert!(parse_allergies("").is_empty());
    }

    #[test]
    fn finish_requires_last_step() {
        let mut form = OnboardingForm::new();
        form.name = "Alex Doe".to_string();
        assert_eq!(form.finish(), Err(OnboardingError::Incomplete { step: 1 }));
    }

    #[test]
    fn complete_builds_profile() {
        let mut form = OnboardingForm::new();
        form.name = " Alex Doe ".to_string();
        form.set_age(30);
        form.set_height(165.0);
        form.set_weight(60.0);
        form.goal = Goal::WeightLoss;
        form.allergies = "peanuts".to_string();
        form.preferences = "vegetarian".to_string();

        let profile = form.complete().unwrap();
        assert_eq!(profile.name, "Alex Doe");
        assert_eq!(profile.age, 30);
        assert_eq!(profile.gender, Gender::Female);
        assert_eq!(profile.allergies, vec!["peanuts"]);
        assert_eq!(profile.preferences, "vegetarian");
    }

    #[test]
    fn complete_without_name_fails() {
        assert_eq!(
            OnboardingForm::new().complete(),
            Err(OnboardingError::NameRequired)
        );
    }
}
