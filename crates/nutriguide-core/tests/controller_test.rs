//! Integration tests for the application controller against a scripted
//! generation service and an in-memory store.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use nutriguide_core::controller::{AppController, AppState};
use nutriguide_core::generate::Generator;
use nutriguide_core::provider::{GenerationError, RequestKind};
use nutriguide_store::slots::{ALL_KEYS, GUIDELINES_KEY, MEAL_PLAN_KEY, PROFILE_KEY};
use nutriguide_store::{KeyValueStore, MemoryStore, Slots};
use nutriguide_test_utils::{MockGenerationService, MockReply, fixtures, memory_slots};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn controller_with(
    mock: MockGenerationService,
    slots: Slots,
) -> (Arc<MockGenerationService>, AppController) {
    let mock = Arc::new(mock);
    let controller = AppController::load(slots, Generator::new(mock.clone())).unwrap();
    (mock, controller)
}

fn seeded_slots(with_guidelines: bool) -> (Arc<MemoryStore>, Slots) {
    let (store, slots) = memory_slots();
    slots.save_profile(&fixtures::sample_profile()).unwrap();
    slots.save_meal_plan(&fixtures::sample_meal_plan()).unwrap();
    if with_guidelines {
        slots.save_guidelines(&fixtures::sample_guidelines()).unwrap();
    }
    (store, slots)
}

// ---------------------------------------------------------------------------
// Onboarding
// ---------------------------------------------------------------------------

#[tokio::test]
async fn onboarding_saves_one_profile_and_issues_two_requests() {
    let (store, slots) = memory_slots();
    let (mock, mut controller) = controller_with(MockGenerationService::healthy(), slots);
    assert_eq!(controller.state(), AppState::Onboarding);

    controller
        .complete_onboarding(fixtures::sample_profile(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(mock.call_count(), 2);
    assert_eq!(mock.count_for(RequestKind::MealPlan), 1);
    assert_eq!(mock.count_for(RequestKind::Guidelines), 1);
    assert_eq!(controller.state(), AppState::Ready);

    let saved = store.get(PROFILE_KEY).unwrap().expect("profile slot written");
    let profile: serde_json::Value = serde_json::from_str(&saved).unwrap();
    assert_eq!(profile["name"], "Alex Doe");
    assert_eq!(
        store.keys(),
        vec![
            GUIDELINES_KEY.to_string(),
            MEAL_PLAN_KEY.to_string(),
            PROFILE_KEY.to_string()
        ]
    );
}

#[tokio::test]
async fn prompts_embed_every_profile_value() {
    let (_, slots) = memory_slots();
    let (mock, mut controller) = controller_with(MockGenerationService::healthy(), slots);
    controller
        .complete_onboarding(fixtures::sample_profile(), &CancellationToken::new())
        .await
        .unwrap();

    for kind in [RequestKind::MealPlan, RequestKind::Guidelines] {
        let prompt = mock.last_prompt(kind).unwrap();
        for value in [
            "30",
            "female",
            "165cm",
            "60kg",
            "moderate",
            "weight_loss",
            "peanuts",
            "vegetarian",
        ] {
            assert!(prompt.contains(value), "{kind} prompt is missing {value:?}:\n{prompt}");
        }
    }
}

// ---------------------------------------------------------------------------
// Startup
// ---------------------------------------------------------------------------

#[tokio::test]
async fn complete_state_issues_no_requests() {
    let (_, slots) = seeded_slots(true);
    let (mock, mut controller) = controller_with(MockGenerationService::healthy(), slots);

    assert!(!controller.needs_generation());
    controller.start(&CancellationToken::new()).await.unwrap();
    controller.start(&CancellationToken::new()).await.unwrap();

    assert_eq!(mock.call_count(), 0);
    assert_eq!(controller.state(), AppState::Ready);
    assert_eq!(controller.meal_plan().unwrap().len(), 3);
}

#[tokio::test]
async fn missing_guidelines_regenerates_both() {
    let (store, slots) = seeded_slots(false);
    let (mock, mut controller) = controller_with(MockGenerationService::healthy(), slots);

    assert_eq!(controller.state(), AppState::Loading);
    assert!(controller.needs_generation());
    controller.start(&CancellationToken::new()).await.unwrap();

    assert_eq!(mock.count_for(RequestKind::MealPlan), 1);
    assert_eq!(mock.count_for(RequestKind::Guidelines), 1);
    assert_eq!(controller.state(), AppState::Ready);
    assert!(store.get(GUIDELINES_KEY).unwrap().is_some());
}

#[tokio::test]
async fn corrupt_slot_fails_load() {
    let (store, slots) = memory_slots();
    store.set(MEAL_PLAN_KEY, "[{").unwrap();
    let result = AppController::load(slots, Generator::new(Arc::new(MockGenerationService::healthy())));
    let err = result.unwrap_err();
    assert!(err.to_string().contains(MEAL_PLAN_KEY), "got: {err}");
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

#[tokio::test]
async fn malformed_response_fails_without_saving() {
    let (store, slots) = memory_slots();
    let mock = MockGenerationService::healthy()
        .with_reply(RequestKind::MealPlan, MockReply::Text("I cannot help with that".into()));
    let (_, mut controller) = controller_with(mock, slots);

    controller
        .complete_onboarding(fixtures::sample_profile(), &CancellationToken::new())
        .await
        .unwrap();

    assert!(matches!(controller.state(), AppState::Failed { .. }));
    assert!(matches!(
        controller.last_error(),
        Some(GenerationError::Parse { kind: RequestKind::MealPlan, .. })
    ));
    assert!(store.get(MEAL_PLAN_KEY).unwrap().is_none());
    assert!(store.get(GUIDELINES_KEY).unwrap().is_none());
}

#[tokio::test]
async fn missing_fields_fail_as_invalid_response() {
    let (_, slots) = memory_slots();
    let mock = MockGenerationService::healthy().with_reply(
        RequestKind::Guidelines,
        MockReply::Text(r#"{"dailyCalories": 1800}"#.into()),
    );
    let (_, mut controller) = controller_with(mock, slots);

    controller
        .complete_onboarding(fixtures::sample_profile(), &CancellationToken::new())
        .await
        .unwrap();

    assert!(matches!(
        controller.last_error(),
        Some(GenerationError::InvalidResponse { kind: RequestKind::Guidelines, .. })
    ));
}

#[tokio::test]
async fn retry_recovers_after_failure() {
    let (_, slots) = memory_slots();
    let mock = MockGenerationService::healthy().with_reply(
        RequestKind::Guidelines,
        MockReply::Api {
            status: 503,
            message: "overloaded".into(),
        },
    );
    let (mock, mut controller) = controller_with(mock, slots);
    let cancel = CancellationToken::new();

    controller
        .complete_onboarding(fixtures::sample_profile(), &cancel)
        .await
        .unwrap();
    match controller.state() {
        AppState::Failed { reason } => assert!(reason.contains("503"), "reason: {reason}"),
        other => panic!("expected Failed, got {other:?}"),
    }

    mock.set_reply(
        RequestKind::Guidelines,
        MockReply::Text(fixtures::guidelines_json()),
    );
    controller.retry(&cancel).await.unwrap();

    assert_eq!(controller.state(), AppState::Ready);
    assert_eq!(mock.count_for(RequestKind::Guidelines), 2);
}

#[tokio::test]
async fn cancelled_generation_reports_cancelled() {
    let (_, slots) = memory_slots();
    let mock = MockGenerationService::healthy()
        .with_reply(RequestKind::MealPlan, MockReply::Hang)
        .with_reply(RequestKind::Guidelines, MockReply::Hang);
    let (_, mut controller) = controller_with(mock, slots);

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        trigger.cancel();
    });

    controller
        .complete_onboarding(fixtures::sample_profile(), &cancel)
        .await
        .unwrap();

    assert!(matches!(controller.last_error(), Some(GenerationError::Cancelled)));
}

#[tokio::test]
async fn failed_regeneration_keeps_the_stored_plan_ready() {
    let (store, slots) = seeded_slots(true);
    let before = store.get(MEAL_PLAN_KEY).unwrap();
    let mock = MockGenerationService::healthy()
        .with_reply(RequestKind::Guidelines, MockReply::Transport("offline".into()));
    let (_, mut controller) = controller_with(mock, slots);
    assert_eq!(controller.state(), AppState::Ready);

    controller.generate(&CancellationToken::new()).await.unwrap();

    assert_eq!(controller.state(), AppState::Ready);
    assert!(matches!(controller.last_error(), Some(GenerationError::Transport(_))));
    assert_eq!(controller.meal_plan().map(<[_]>::len), Some(3));
    assert_eq!(store.get(MEAL_PLAN_KEY).unwrap(), before);

    let err = controller.retry(&CancellationToken::new()).await.unwrap_err();
    assert!(err.to_string().contains("ready"), "got: {err}");
}

// ---------------------------------------------------------------------------
// Logout
// ---------------------------------------------------------------------------

#[tokio::test]
async fn logout_clears_all_slots() {
    let (store, slots) = seeded_slots(true);
    slots
        .save_history(&[nutriguide_store::models::ProgressEntry {
            date: "01/01/2025".into(),
            weight: 60.0,
            mood: 3,
            adherence: 80,
        }])
        .unwrap();
    let (_, mut controller) = controller_with(MockGenerationService::healthy(), slots);
    assert_eq!(store.len(), ALL_KEYS.len());
    assert_eq!(controller.progress().history().len(), 1);

    controller.logout().unwrap();

    assert!(store.is_empty());
    assert_eq!(controller.state(), AppState::Onboarding);
    assert!(controller.profile().is_none());
    assert!(controller.progress().history().is_empty());
}

#[tokio::test]
async fn allergen_conflicts_are_reported_not_rejected() {
    let (_, slots) = memory_slots();
    let plan = fixtures::meal_plan_json().replace("Greek Yogurt", "Peanut Bar");
    let mock = MockGenerationService::healthy().with_reply(RequestKind::MealPlan, MockReply::Text(plan));
    let (_, mut controller) = controller_with(mock, slots);

    controller
        .complete_onboarding(fixtures::sample_profile(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(controller.state(), AppState::Ready);
    let conflicts = controller.allergen_conflicts();
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].meal, "Peanut Bar");
}
