//! The generator: prompt + schema in, validated model out.

use std::sync::Arc;
use std::time::Instant;

use tokio_util::sync::CancellationToken;

use nutriguide_store::models::{DailyPlan, EducationalTip, NutritionGuidelines, UserProfile};

use super::{parse, prompt, schema};
use crate::provider::{GenerationError, GenerationRequest, GenerationService, RequestKind};

/// Builds requests, sends them through a [`GenerationService`], and parses
/// the answers.
///
/// Cheap to clone: the service is shared behind an `Arc`, so a clone can be
/// moved into a spawned task.
#[derive(Clone)]
pub struct Generator {
    service: Arc<dyn GenerationService>,
}

impl Generator {
    pub fn new(service: Arc<dyn GenerationService>) -> Self {
        Self { service }
    }

    pub fn service_name(&self) -> &str {
        self.service.name()
    }

    /// Request a [`prompt::PLAN_DAYS`]-day meal plan for `profile`.
    pub async fn meal_plan(
        &self,
        profile: &UserProfile,
        cancel: &CancellationToken,
    ) -> Result<Vec<DailyPlan>, GenerationError> {
        let request = GenerationRequest {
            kind: RequestKind::MealPlan,
            prompt: prompt::meal_plan_prompt(profile),
            schema: schema::meal_plan_schema(),
        };
        let raw = self.send(&request, cancel).await?;
        parse::parse_meal_plan(&raw)
    }

    /// Request calorie and macro guidelines for `profile`.
    pub async fn guidelines(
        &self,
        profile: &UserProfile,
        cancel: &CancellationToken,
    ) -> Result<NutritionGuidelines, GenerationError> {
        let request = GenerationRequest {
            kind: RequestKind::Guidelines,
            prompt: prompt::guidelines_prompt(profile),
            schema: schema::guidelines_schema(),
        };
        let raw = self.send(&request, cancel).await?;
        parse::parse_guidelines(&raw)
    }

    /// Request a fresh batch of tips. Never cached.
    pub async fn daily_tips(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<EducationalTip>, GenerationError> {
        let request = GenerationRequest {
            kind: RequestKind::Tips,
            prompt: prompt::tips_prompt(),
            schema: schema::tips_schema(),
        };
        let raw = self.send(&request, cancel).await?;
        parse::parse_tips(&raw)
    }

    /// Send one request, racing it against `cancel`.
    async fn send(
        &self,
        request: &GenerationRequest,
        cancel: &CancellationToken,
    ) -> Result<String, GenerationError> {
        if cancel.is_cancelled() {
            return Err(GenerationError::Cancelled);
        }

        let started = Instant::now();
        tracing::info!(
            kind = %request.kind,
            service = self.service.name(),
            "requesting generation"
        );

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(GenerationError::Cancelled),
            result = self.service.generate(request) => result,
        };

        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(raw) => tracing::info!(
                kind = %request.kind,
                elapsed_ms,
                bytes = raw.len(),
                "generation finished"
            ),
            Err(GenerationError::Cancelled) => {
                tracing::info!(kind = %request.kind, elapsed_ms, "generation cancelled")
            }
            Err(e) => tracing::warn!(kind = %request.kind, elapsed_ms, error = %e, "generation failed"),
        }
        result
    }
}

impl std::fmt::Debug for Generator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Generator")
            .field("service", &self.service.name())
            .finish()
    }
}
