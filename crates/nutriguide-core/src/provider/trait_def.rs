//! The `GenerationService` trait -- the adapter interface for structured
//! content providers.
//!
//! The trait is object-safe so a single client can be built at startup and
//! shared as `Arc<dyn GenerationService>`.

use async_trait::async_trait;

use super::types::{GenerationError, GenerationRequest};

/// Adapter interface for a hosted structured-output model.
///
/// Implementors send `request.prompt` together with `request.schema` and
/// return the raw JSON text of the answer. Parsing and validation happen in
/// [`crate::generate`], so every provider gets the same checks.
#[async_trait]
pub trait GenerationService: Send + Sync {
    /// Human-readable name for this provider (e.g. "gemini").
    fn name(&self) -> &str;

    /// Submit one request and return the raw response text.
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError>;
}

// Compile-time assertion: GenerationService must be object-safe.
const _: () = {
    fn _assert_object_safe(_: &dyn GenerationService) {}
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::types::RequestKind;

    /// Echoes the prompt back, used only to prove the trait can be
    /// implemented and used as `dyn GenerationService`.
    struct EchoService;

    #[async_trait]
    impl GenerationService for EchoService {
        fn name(&self) -> &str {
            "echo"
        }

        async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
            Ok(request.prompt.clone())
        }
    }

    #[tokio::test]
    async fn service_is_object_safe() {
        let service: Box<dyn GenerationService> = Box::new(EchoService);
        assert_eq!(service.name(), "echo");

        let request = GenerationRequest {
            kind: RequestKind::Tips,
            prompt: "hello".to_string(),
            schema: serde_json::json!({}),
        };
        assert_eq!(service.generate(&request).await.unwrap(), "hello");
    }
}
