//! Generation service adapters.
//!
//! This module defines the [`GenerationService`] trait every structured
//! content provider implements, the request/error types it speaks, and the
//! [`GeminiClient`] used in production.
//!
//! # Architecture
//!
//! ```text
//! Generator (prompt + schema + validation)
//!     |
//!     v
//! Arc<dyn GenerationService> --generate(request)--> raw JSON text
//!     |
//!     +-- GeminiClient (reqwest, generateContent)
//!     +-- test doubles (nutriguide-test-utils)
//! ```

pub mod gemini;
pub mod trait_def;
pub mod types;

pub use gemini::GeminiClient;
pub use trait_def::GenerationService;
pub use types::{GenerationError, GenerationRequest, RequestKind};
