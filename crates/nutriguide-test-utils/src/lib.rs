//! Shared test utilities for nutriguide integration tests.
//!
//! - [`MockGenerationService`]: a scripted [`GenerationService`] that records
//!   every request and answers per request kind.
//! - [`fixtures`]: the sample profile plus canned plan, guidelines and tips
//!   payloads in the wire format.
//!
//! [`GenerationService`]: nutriguide_core::provider::GenerationService

pub mod fixtures;
mod mock;

use std::sync::Arc;

use nutriguide_store::{MemoryStore, Slots};

pub use mock::{MockGenerationService, MockReply};

/// A fresh in-memory store and the slots over it. The store handle is kept
/// so tests can inspect raw keys.
pub fn memory_slots() -> (Arc<MemoryStore>, Slots) {
    let store = Arc::new(MemoryStore::new());
    let slots = Slots::new(store.clone());
    (store, slots)
}
