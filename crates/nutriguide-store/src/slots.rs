//! Typed access to the four persisted slots.
//!
//! Each slot is read once at startup and written after the mutation it
//! records. There is no transaction across slots; a reader must tolerate any
//! combination of present and missing values.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::kv::{KeyValueStore, StoreError};
use crate::models::{DailyPlan, NutritionGuidelines, ProgressEntry, UserProfile};

pub const PROFILE_KEY: &str = "nutriguide_user";
pub const MEAL_PLAN_KEY: &str = "nutriguide_meals";
pub const GUIDELINES_KEY: &str = "nutriguide_guidelines";
pub const HISTORY_KEY: &str = "nutriguide_history";

/// Every slot key, in startup read order.
pub const ALL_KEYS: [&str; 4] = [PROFILE_KEY, MEAL_PLAN_KEY, GUIDELINES_KEY, HISTORY_KEY];

/// Everything read from storage at startup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersistedState {
    pub profile: Option<UserProfile>,
    pub meal_plan: Option<Vec<DailyPlan>>,
    pub guidelines: Option<NutritionGuidelines>,
    pub history: Vec<ProgressEntry>,
}

/// Typed wrapper over a shared [`KeyValueStore`].
#[derive(Clone)]
pub struct Slots {
    store: Arc<dyn KeyValueStore>,
}

impl Slots {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    /// Read all four slots.
    pub fn load_all(&self) -> Result<PersistedState, StoreError> {
        Ok(PersistedState {
            profile: self.load_profile()?,
            meal_plan: self.load_meal_plan()?,
            guidelines: self.load_guidelines()?,
            history: self.load_history()?,
        })
    }

    pub fn load_profile(&self) -> Result<Option<UserProfile>, StoreError> {
        self.read(PROFILE_KEY)
    }

    pub fn save_profile(&self, profile: &UserProfile) -> Result<(), StoreError> {
        self.write(PROFILE_KEY, profile)
    }

    pub fn load_meal_plan(&self) -> Result<Option<Vec<DailyPlan>>, StoreError> {
        self.read(MEAL_PLAN_KEY)
    }

    pub fn save_meal_plan(&self, plan: &[DailyPlan]) -> Result<(), StoreError> {
        self.write(MEAL_PLAN_KEY, plan)
    }

    pub fn load_guidelines(&self) -> Result<Option<NutritionGuidelines>, StoreError> {
        self.read(GUIDELINES_KEY)
    }

    pub fn save_guidelines(&self, guidelines: &NutritionGuidelines) -> Result<(), StoreError> {
        self.write(GUIDELINES_KEY, guidelines)
    }

    /// Progress history, newest first. A missing slot reads as empty.
    pub fn load_history(&self) -> Result<Vec<ProgressEntry>, StoreError> {
        Ok(self.read(HISTORY_KEY)?.unwrap_or_default())
    }

    pub fn save_history(&self, history: &[ProgressEntry]) -> Result<(), StoreError> {
        self.write(HISTORY_KEY, history)
    }

    /// Drop every slot in one store-level clear.
    pub fn clear_all(&self) -> Result<(), StoreError> {
        self.store.clear()
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let Some(raw) = self.store.get(key)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StoreError::Corrupt {
                key: key.to_owned(),
                source,
            })
    }

    fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let raw = serde_json::to_string(value).map_err(|source| StoreError::Encode {
            key: key.to_owned(),
            source,
        })?;
        self.store.set(key, &raw)
    }
}

impl std::fmt::Debug for Slots {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Slots").field("keys", &ALL_KEYS).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryStore;
    use crate::models::{ActivityLevel, Gender, Goal, Macros};

    fn profile() -> UserProfile {
        UserProfile {
            name: "Sam".to_string(),
            age: 41,
            gender: Gender::Male,
            height: 180.0,
            weight: 82.5,
            activity_level: ActivityLevel::Light,
            goal: Goal::Maintenance,
            allergies: vec![],
            preferences: String::new(),
        }
    }

    #[test]
    fn empty_store_loads_defaults() {
        let slots = Slots::new(Arc::new(MemoryStore::new()));
        let state = slots.load_all().unwrap();
        assert_eq!(state, PersistedState::default());
    }

    #[test]
    fn profile_roundtrip_uses_profile_key() {
        let store = Arc::new(MemoryStore::new());
        let slots = Slots::new(store.clone());
        slots.save_profile(&profile()).unwrap();

        assert_eq!(store.keys(), vec![PROFILE_KEY.to_string()]);
        assert_eq!(slots.load_profile().unwrap(), Some(profile()));
    }

    #[test]
    fn corrupted_slot_names_its_key() {
        let store = Arc::new(MemoryStore::new());
        store.set(GUIDELINES_KEY, "{not json").unwrap();
        let slots = Slots::new(store);

        let err = slots.load_all().unwrap_err();
        match err {
            StoreError::Corrupt { key, .. } => assert_eq!(key, GUIDELINES_KEY),
            other => panic!("expected Corrupt, got {other:?}"),
        }
    }

    #[test]
    fn clear_all_removes_every_slot() {
        let store = Arc::new(MemoryStore::new());
        let slots = Slots::new(store.clone());
        slots.save_profile(&profile()).unwrap();
        slots.save_meal_plan(&[]).unwrap();
        slots
            .save_guidelines(&NutritionGuidelines {
                daily_calories: 2000.0,
                macros: Macros {
                    protein: 120.0,
                    carbs: 220.0,
                    fat: 70.0,
                },
                key_tips: vec![],
                recommended_foods: vec![],
                avoid_foods: vec![],
            })
            .unwrap();
        slots.save_history(&[]).unwrap();
        assert_eq!(store.len(), ALL_KEYS.len());

        slots.clear_all().unwrap();
        assert!(store.is_empty());
    }
}
