//! Application controller: owns the profile, plan, guidelines and progress
//! log, and decides when generation runs.
//!
//! State is derived from what is held in memory:
//!
//! ```text
//! no profile                          -> Onboarding
//! profile, plan and guidelines        -> Ready
//! last generation failed              -> Failed   (retry -> generate)
//! profile, plan or guidelines missing -> Loading  (start -> generate)
//! ```
//!
//! A failed regeneration of an existing plan stays `Ready`; the error is
//! still reported through [`AppController::last_error`].
//!
//! Plan and guidelines are always generated together. If either is missing
//! at startup both are regenerated, which repairs a half-written pair.

use std::fmt;

use thiserror::Error;
use tokio_util::sync::CancellationToken;

use nutriguide_store::StoreError;
use nutriguide_store::models::{DailyPlan, NutritionGuidelines, UserProfile};
use nutriguide_store::slots::Slots;

use crate::allergens::{self, AllergenConflict};
use crate::generate::Generator;
use crate::progress::ProgressLogger;
use crate::provider::GenerationError;

/// Coarse application state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppState {
    Onboarding,
    Loading,
    Ready,
    Failed { reason: String },
}

impl fmt::Display for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Onboarding => f.write_str("onboarding"),
            Self::Loading => f.write_str("loading"),
            Self::Ready => f.write_str("ready"),
            Self::Failed { .. } => f.write_str("failed"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("cannot {action} while {state}")]
    InvalidState { action: &'static str, state: String },
}

pub struct AppController {
    slots: Slots,
    generator: Generator,
    profile: Option<UserProfile>,
    meal_plan: Option<Vec<DailyPlan>>,
    guidelines: Option<NutritionGuidelines>,
    progress: ProgressLogger,
    last_error: Option<GenerationError>,
}

impl AppController {
    /// Read all four slots and build the controller. Issues no requests.
    pub fn load(slots: Slots, generator: Generator) -> Result<Self, ControllerError> {
        let state = slots.load_all()?;
        tracing::debug!(
            profile = state.profile.is_some(),
            meal_plan = state.meal_plan.is_some(),
            guidelines = state.guidelines.is_some(),
            history = state.history.len(),
            "loaded persisted state"
        );
        Ok(Self {
            progress: ProgressLogger::new(slots.clone(), state.history),
            slots,
            generator,
            profile: state.profile,
            meal_plan: state.meal_plan,
            guidelines: state.guidelines,
            last_error: None,
        })
    }

    pub fn state(&self) -> AppState {
        if self.profile.is_none() {
            return AppState::Onboarding;
        }
        if self.meal_plan.is_some() && self.guidelines.is_some() {
            return AppState::Ready;
        }
        match &self.last_error {
            Some(err) => AppState::Failed {
                reason: err.to_string(),
            },
            None => AppState::Loading,
        }
    }

    /// Profile present but the plan or the guidelines missing.
    pub fn needs_generation(&self) -> bool {
        self.profile.is_some() && (self.meal_plan.is_none() || self.guidelines.is_none())
    }

    /// Startup hook: generate only when something is missing.
    pub async fn start(&mut self, cancel: &CancellationToken) -> Result<(), ControllerError> {
        if !self.needs_generation() {
            return Ok(());
        }
        tracing::info!(
            meal_plan = self.meal_plan.is_some(),
            guidelines = self.guidelines.is_some(),
            "plan incomplete, regenerating both"
        );
        self.generate(cancel).await
    }

    /// Save a new profile and generate its plan and guidelines.
    pub async fn complete_onboarding(
        &mut self,
        profile: UserProfile,
        cancel: &CancellationToken,
    ) -> Result<(), ControllerError> {
        if self.profile.is_some() {
            return Err(ControllerError::InvalidState {
                action: "complete onboarding",
                state: "a profile exists".to_string(),
            });
        }

        self.slots.save_profile(&profile)?;
        tracing::info!(goal = %profile.goal, "profile saved");
        self.profile = Some(profile);
        self.meal_plan = None;
        self.guidelines = None;
        self.generate(cancel).await
    }

    /// Generate plan and guidelines concurrently and persist both.
    ///
    /// A generation failure is not returned as an error: it is logged and
    /// kept as [`Self::last_error`]. Stored plan and guidelines are left as
    /// they were, so the state becomes [`AppState::Failed`] only when there
    /// is no earlier plan to fall back on. Only storage errors are returned.
    pub async fn generate(&mut self, cancel: &CancellationToken) -> Result<(), ControllerError> {
        let Some(profile) = self.profile.clone() else {
            return Err(ControllerError::InvalidState {
                action: "generate",
                state: AppState::Onboarding.to_string(),
            });
        };
        self.last_error = None;

        let result = futures::future::try_join(
            self.generator.meal_plan(&profile, cancel),
            self.generator.guidelines(&profile, cancel),
        )
        .await;

        match result {
            Ok((plan, guidelines)) => {
                self.slots.save_meal_plan(&plan)?;
                self.slots.save_guidelines(&guidelines)?;

                let conflicts = allergens::find_conflicts(&plan, &profile.allergies);
                for c in &conflicts {
                    tracing::warn!(day = %c.day, meal = %c.meal, allergen = %c.allergen, "meal may contain an allergen");
                }
                tracing::info!(
                    days = plan.len(),
                    daily_calories = guidelines.daily_calories,
                    "plan and guidelines ready"
                );

                self.meal_plan = Some(plan);
                self.guidelines = Some(guidelines);
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to generate plan and guidelines");
                self.last_error = Some(e);
            }
        }
        Ok(())
    }

    /// Run generation again after a failure.
    pub async fn retry(&mut self, cancel: &CancellationToken) -> Result<(), ControllerError> {
        let state = self.state();
        if !matches!(state, AppState::Failed { .. }) {
            return Err(ControllerError::InvalidState {
                action: "retry",
                state: state.to_string(),
            });
        }
        self.generate(cancel).await
    }

    /// Clear every slot and return to onboarding.
    pub fn logout(&mut self) -> Result<(), ControllerError> {
        self.slots.clear_all()?;
        self.profile = None;
        self.meal_plan = None;
        self.guidelines = None;
        self.last_error = None;
        self.progress = ProgressLogger::new(self.slots.clone(), Vec::new());
        tracing::info!("logged out, all data cleared");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    pub fn meal_plan(&self) -> Option<&[DailyPlan]> {
        self.meal_plan.as_deref()
    }

    pub fn guidelines(&self) -> Option<&NutritionGuidelines> {
        self.guidelines.as_ref()
    }

    pub fn progress(&self) -> &ProgressLogger {
        &self.progress
    }

    pub fn progress_mut(&mut self) -> &mut ProgressLogger {
        &mut self.progress
    }

    pub fn generator(&self) -> &Generator {
        &self.generator
    }

    /// The error from the most recent generation run, if it failed.
    pub fn last_error(&self) -> Option<&GenerationError> {
        self.last_error.as_ref()
    }

    /// Meals in the current plan that mention one of the profile's
    /// allergies.
    pub fn allergen_conflicts(&self) -> Vec<AllergenConflict> {
        match (&self.profile, &self.meal_plan) {
            (Some(profile), Some(plan)) => allergens::find_conflicts(plan, &profile.allergies),
            _ => Vec::new(),
        }
    }
}

impl fmt::Debug for AppController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppController")
            .field("state", &self.state())
            .field("generator", &self.generator)
            .finish_non_exhaustive()
    }
}
