use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use nutriguide_core::provider::{
    GenerationError, GenerationRequest, GenerationService, RequestKind,
};

use crate::fixtures;

/// How the mock answers one request kind.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Return this text as the model output.
    Text(String),
    /// Fail with [`GenerationError::Transport`].
    Transport(String),
    /// Fail with [`GenerationError::Api`].
    Api { status: u16, message: String },
    /// Never answer. Pair with a cancellation token.
    Hang,
}

/// Scripted generation service.
///
/// Answers from a per-kind reply table and records every request it sees,
/// including ones that hang or fail.
pub struct MockGenerationService {
    replies: Mutex<HashMap<RequestKind, MockReply>>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl MockGenerationService {
    /// No replies configured: every kind fails with a transport error.
    pub fn empty() -> Self {
        Self {
            replies: Mutex::new(HashMap::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Valid fixture payloads for every kind.
    pub fn healthy() -> Self {
        Self::empty()
            .with_reply(RequestKind::MealPlan, MockReply::Text(fixtures::meal_plan_json()))
            .with_reply(RequestKind::Guidelines, MockReply::Text(fixtures::guidelines_json()))
            .with_reply(RequestKind::Tips, MockReply::Text(fixtures::tips_json()))
    }

    pub fn with_reply(self, kind: RequestKind, reply: MockReply) -> Self {
        self.set_reply(kind, reply);
        self
    }

    /// Change the reply for `kind` after construction.
    pub fn set_reply(&self, kind: RequestKind, reply: MockReply) {
        self.replies
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(kind, reply);
    }

    /// Every request received so far, in arrival order.
    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn count_for(&self, kind: RequestKind) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|r| r.kind == kind)
            .count()
    }

    /// The most recent prompt sent for `kind`.
    pub fn last_prompt(&self, kind: RequestKind) -> Option<String> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .rev()
            .find(|r| r.kind == kind)
            .map(|r| r.prompt.clone())
    }
}

#[async_trait]
impl GenerationService for MockGenerationService {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request.clone());

        let reply = self
            .replies
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&request.kind)
            .cloned();

        match reply {
            Some(MockReply::Text(text)) => Ok(text),
            Some(MockReply::Transport(message)) => Err(GenerationError::Transport(message)),
            Some(MockReply::Api { status, message }) => {
                Err(GenerationError::Api { status, message })
            }
            Some(MockReply::Hang) => std::future::pending().await,
            None => Err(GenerationError::Transport(format!(
                "no mock reply for {}",
                request.kind
            ))),
        }
    }
}
