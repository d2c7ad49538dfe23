//! Data model and local persistence for nutriguide.

pub mod config;
pub mod kv;
pub mod models;
pub mod slots;

pub use kv::{FileStore, KeyValueStore, MemoryStore, StoreError};
pub use slots::{PersistedState, Slots};
