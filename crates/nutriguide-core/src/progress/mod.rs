//! Progress check-ins: the entry form and the bounded history.
//!
//! History is kept newest first and capped at [`HISTORY_LIMIT`] entries.
//! Every accepted submission rewrites the whole history slot.

use chrono::Local;

use nutriguide_store::StoreError;
use nutriguide_store::models::ProgressEntry;
use nutriguide_store::slots::Slots;

/// Maximum number of entries kept in the history slot.
pub const HISTORY_LIMIT: usize = 10;

pub const DEFAULT_MOOD: u8 = 3;
pub const DEFAULT_ADHERENCE: u8 = 80;

pub const MOOD_MIN: u8 = 1;
pub const MOOD_MAX: u8 = 5;
pub const ADHERENCE_MAX: u8 = 100;

/// Date format stored in [`ProgressEntry::date`].
pub const DATE_FORMAT: &str = "%m/%d/%Y";

/// Today's local date in [`DATE_FORMAT`].
pub fn today() -> String {
    Local::now().format(DATE_FORMAT).to_string()
}

/// Prepend `entry` and drop anything past [`HISTORY_LIMIT`].
pub fn record(history: &mut Vec<ProgressEntry>, entry: ProgressEntry) {
    history.insert(0, entry);
    history.truncate(HISTORY_LIMIT);
}

// ---------------------------------------------------------------------------
// Form
// ---------------------------------------------------------------------------

/// Editable check-in fields. Mood and adherence are clamped on every write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressForm {
    weight: String,
    mood: u8,
    adherence: u8,
}

impl Default for ProgressForm {
    fn default() -> Self {
        Self {
            weight: String::new(),
            mood: DEFAULT_MOOD,
            adherence: DEFAULT_ADHERENCE,
        }
    }
}

impl ProgressForm {
    pub fn weight_text(&self) -> &str {
        &self.weight
    }

    pub fn mood(&self) -> u8 {
        self.mood
    }

    pub fn adherence(&self) -> u8 {
        self.adherence
    }

    pub fn set_weight(&mut self, text: impl Into<String>) {
        self.weight = text.into();
    }

    /// Append a typed character. Only digits and a single `.` are accepted.
    pub fn push_weight_char(&mut self, c: char) {
        let accepted = c.is_ascii_digit() || (c == '.' && !self.weight.contains('.'));
        if accepted {
            self.weight.push(c);
        }
    }

    pub fn pop_weight_char(&mut self) {
        self.weight.pop();
    }

    pub fn set_mood(&mut self, mood: u8) {
        self.mood = mood.clamp(MOOD_MIN, MOOD_MAX);
    }

    pub fn adjust_mood(&mut self, delta: i16) {
        let next = (i16::from(self.mood) + delta).clamp(MOOD_MIN.into(), MOOD_MAX.into());
        self.mood = next as u8;
    }

    pub fn set_adherence(&mut self, adherence: u8) {
        self.adherence = adherence.min(ADHERENCE_MAX);
    }

    pub fn adjust_adherence(&mut self, delta: i16) {
        let next = (i16::from(self.adherence) + delta).clamp(0, ADHERENCE_MAX.into());
        self.adherence = next as u8;
    }

    /// The weight as a number, or `None` when blank, unparseable, non-finite
    /// or not positive.
    pub fn parsed_weight(&self) -> Option<f64> {
        let text = self.weight.trim();
        if text.is_empty() {
            return None;
        }
        text.parse::<f64>()
            .ok()
            .filter(|w| w.is_finite() && *w > 0.0)
    }
}

// ---------------------------------------------------------------------------
// Logger
// ---------------------------------------------------------------------------

/// Owns the in-memory history and writes it back on every accepted entry.
#[derive(Debug, Clone)]
pub struct ProgressLogger {
    slots: Slots,
    history: Vec<ProgressEntry>,
    form: ProgressForm,
}

impl ProgressLogger {
    /// Wrap an already-loaded history.
    pub fn new(slots: Slots, mut history: Vec<ProgressEntry>) -> Self {
        history.truncate(HISTORY_LIMIT);
        Self {
            slots,
            history,
            form: ProgressForm::default(),
        }
    }

    /// Read the history slot and wrap it.
    pub fn load(slots: Slots) -> Result<Self, StoreError> {
        let history = slots.load_history()?;
        Ok(Self::new(slots, history))
    }

    /// Entries, newest first.
    pub fn history(&self) -> &[ProgressEntry] {
        &self.history
    }

    pub fn form(&self) -> &ProgressForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut ProgressForm {
        &mut self.form
    }

    /// Submit the form dated today.
    pub fn submit(&mut self) -> Result<Option<ProgressEntry>, StoreError> {
        self.submit_on(today())
    }

    /// Submit the form with an explicit date.
    ///
    /// A missing or malformed weight is ignored: nothing is recorded and
    /// `Ok(None)` is returned. On success the weight text is cleared while
    /// mood and adherence keep their values.
    pub fn submit_on(
        &mut self,
        date: impl Into<String>,
    ) -> Result<Option<ProgressEntry>, StoreError> {
        let Some(weight) = self.form.parsed_weight() else {
            tracing::debug!(weight = %self.form.weight, "ignoring check-in without a valid weight");
            return Ok(None);
        };

        let entry = ProgressEntry {
            date: date.into(),
            weight,
            mood: self.form.mood,
            adherence: self.form.adherence,
        };

        let mut next = self.history.clone();
        record(&mut next, entry.clone());
        self.slots.save_history(&next)?;
        self.history = next;
        self.form.weight.clear();

        tracing::info!(
            date = %entry.date,
            weight = entry.weight,
            entries = self.history.len(),
            "progress entry recorded"
        );
        Ok(Some(entry))
    }
}
