pub mod allergens;
pub mod controller;
pub mod generate;
pub mod onboarding;
pub mod progress;
pub mod provider;
pub mod views;
