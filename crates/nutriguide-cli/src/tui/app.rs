//! TUI application state and key handling.

use std::time::Duration;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use nutriguide_core::controller::{AppController, AppState, ControllerError};
use nutriguide_core::onboarding::OnboardingForm;
use nutriguide_core::provider::GenerationError;
use nutriguide_core::views::{DaySelector, format_amount};
use nutriguide_store::models::{ActivityLevel, EducationalTip, Gender, Goal, UserProfile};

/// Top-level tabs shown once a plan exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Dashboard,
    Meals,
    Progress,
    Tips,
    Profile,
}

impl Tab {
    pub const ALL: [Tab; 5] = [
        Tab::Dashboard,
        Tab::Meals,
        Tab::Progress,
        Tab::Tips,
        Tab::Profile,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Meals => "Meals",
            Self::Progress => "Progress",
            Self::Tips => "Tips",
            Self::Profile => "Profile",
        }
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }

    fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Onboarding inputs, grouped by form step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnboardField {
    Name,
    Age,
    Gender,
    Height,
    Weight,
    Goal,
    Activity,
    Preferences,
    Allergies,
}

impl OnboardField {
    pub fn for_step(step: u8) -> &'static [OnboardField] {
        match step {
            1 => &[Self::Name, Self::Age, Self::Gender],
            2 => &[Self::Height, Self::Weight],
            3 => &[Self::Goal, Self::Activity],
            _ => &[Self::Preferences, Self::Allergies],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Age => "Age",
            Self::Gender => "Gender",
            Self::Height => "Height (cm)",
            Self::Weight => "Weight (kg)",
            Self::Goal => "Goal",
            Self::Activity => "Activity",
            Self::Preferences => "Preferences",
            Self::Allergies => "Allergies",
        }
    }

    fn is_text(self) -> bool {
        matches!(self, Self::Name | Self::Preferences | Self::Allergies)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressField {
    Weight,
    Mood,
    Adherence,
}

impl ProgressField {
    pub const ALL: [ProgressField; 3] = [Self::Weight, Self::Mood, Self::Adherence];
}

/// Tips tab contents. A fetch runs as a spawned task so the UI keeps
/// drawing; its token is cancelled when the tab is left.
pub enum TipsFeed {
    Idle,
    Loading {
        handle: JoinHandle<Result<Vec<EducationalTip>, GenerationError>>,
        cancel: CancellationToken,
    },
    Loaded(Vec<EducationalTip>),
    Failed(String),
}

/// Work a key press asks for that has to be awaited by the event loop.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    None,
    CompleteOnboarding(UserProfile),
    Generate,
    Retry,
}

impl Action {
    /// Text for the loading screen while the action runs.
    pub fn busy_label(&self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::CompleteOnboarding(_) => Some("Creating your personalized plan..."),
            Self::Generate => Some("Generating a new plan..."),
            Self::Retry => Some("Retrying..."),
        }
    }
}

/// Application state for the TUI.
pub struct App {
    pub controller: AppController,
    pub tab: Tab,
    pub onboarding: OnboardingForm,
    pub onboard_focus: usize,
    pub days: DaySelector,
    pub progress_field: ProgressField,
    pub tips: TipsFeed,
    pub confirm_logout: bool,
    pub busy: Option<&'static str>,
    pub tick_rate: Duration,
    pub should_quit: bool,
    pub status_message: Option<String>,
}

impl App {
    pub fn new(controller: AppController) -> Self {
        let days = DaySelector::new(controller.meal_plan().map_or(0, <[_]>::len));
        Self {
            controller,
            tab: Tab::Dashboard,
            onboarding: OnboardingForm::new(),
            onboard_focus: 0,
            days,
            progress_field: ProgressField::Weight,
            tips: TipsFeed::Idle,
            confirm_logout: false,
            busy: None,
            tick_rate: Duration::from_millis(250),
            should_quit: false,
            status_message: None,
        }
    }

    pub fn onboard_fields(&self) -> &'static [OnboardField] {
        OnboardField::for_step(self.onboarding.step())
    }

    pub fn focused_onboard_field(&self) -> OnboardField {
        let fields = self.onboard_fields();
        fields[self.onboard_focus.min(fields.len() - 1)]
    }

    // -- Keys --

    /// One pass of the event loop: apply a finished tips fetch, then the
    /// event read this pass, if any.
    pub async fn handle_event(&mut self, event: Option<Event>) -> Action {
        self.poll_tips().await;
        match event {
            Some(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                // Clear status message on any keypress.
                if !self.confirm_logout {
                    self.status_message = None;
                }
                self.handle_key(key)
            }
            _ => Action::None,
        }
    }

    /// Apply a key press. Anything that needs the generation service is
    /// returned as an [`Action`] for the event loop to await.
    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit();
            return Action::None;
        }

        if self.confirm_logout {
            self.confirm_logout = false;
            if key.code == KeyCode::Char('y') {
                self.logout();
            } else {
                self.status_message = Some("Logout cancelled".to_string());
            }
            return Action::None;
        }

        match self.controller.state() {
            AppState::Onboarding => self.onboarding_key(key),
            AppState::Loading => match key.code {
                KeyCode::Char('q') => {
                    self.quit();
                    Action::None
                }
                KeyCode::Char('g') | KeyCode::Char('r') => Action::Generate,
                _ => Action::None,
            },
            AppState::Failed { .. } => match key.code {
                KeyCode::Char('r') => Action::Retry,
                KeyCode::Char('L') => {
                    self.ask_logout();
                    Action::None
                }
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.quit();
                    Action::None
                }
                _ => Action::None,
            },
            AppState::Ready => self.ready_key(key),
        }
    }

    fn onboarding_key(&mut self, key: KeyEvent) -> Action {
        let field = self.focused_onboard_field();
        let count = self.onboard_fields().len();
        match key.code {
            KeyCode::Up => self.onboard_focus = self.onboard_focus.saturating_sub(1),
            KeyCode::Down | KeyCode::Tab => {
                self.onboard_focus = (self.onboard_focus + 1).min(count - 1);
            }
            KeyCode::Left => self.adjust_onboard_field(field, false),
            KeyCode::Right => self.adjust_onboard_field(field, true),
            KeyCode::Backspace if field.is_text() => {
                self.onboard_text_mut(field).pop();
            }
            KeyCode::Char(c) if field.is_text() => self.onboard_text_mut(field).push(c),
            KeyCode::Enter => return self.onboarding_enter(),
            KeyCode::Esc => {
                if self.onboarding.step() == 1 {
                    self.quit();
                } else {
                    self.onboarding.prev_step();
                    self.onboard_focus = 0;
                }
            }
            _ => {}
        }
        Action::None
    }

    fn onboarding_enter(&mut self) -> Action {
        if self.onboarding.is_last_step() {
            return match self.onboarding.finish() {
                Ok(profile) => Action::CompleteOnboarding(profile),
                Err(e) => {
                    self.status_message = Some(e.to_string());
                    Action::None
                }
            };
        }
        match self.onboarding.next_step() {
            Ok(()) => self.onboard_focus = 0,
            Err(e) => self.status_message = Some(e.to_string()),
        }
        Action::None
    }

    fn onboard_text_mut(&mut self, field: OnboardField) -> &mut String {
        match field {
            OnboardField::Preferences => &mut self.onboarding.preferences,
            OnboardField::Allergies => &mut self.onboarding.allergies,
            _ => &mut self.onboarding.name,
        }
    }

    fn adjust_onboard_field(&mut self, field: OnboardField, up: bool) {
        let form = &mut self.onboarding;
        let step = if up { 1.0 } else { -1.0 };
        match field {
            OnboardField::Age => {
                let age = if up {
                    form.age().saturating_add(1)
                } else {
                    form.age().saturating_sub(1)
                };
                form.set_age(age);
            }
            OnboardField::Height => form.set_height(form.height() + step),
            OnboardField::Weight => form.set_weight(form.weight() + step),
            OnboardField::Gender => form.gender = cycle(&Gender::ALL, form.gender, up),
            OnboardField::Goal => form.goal = cycle(&Goal::ALL, form.goal, up),
            OnboardField::Activity => {
                form.activity_level = cycle(&ActivityLevel::ALL, form.activity_level, up);
            }
            OnboardField::Name | OnboardField::Preferences | OnboardField::Allergies => {}
        }
    }

    fn ready_key(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Tab => {
                self.select_tab(self.tab.next());
                return Action::None;
            }
            KeyCode::BackTab => {
                self.select_tab(self.tab.prev());
                return Action::None;
            }
            KeyCode::Char('q') | KeyCode::Esc => {
                self.quit();
                return Action::None;
            }
            _ => {}
        }

        match self.tab {
            Tab::Dashboard => {
                if key.code == KeyCode::Char('g') {
                    return Action::Generate;
                }
            }
            Tab::Meals => match key.code {
                KeyCode::Char('j') | KeyCode::Down | KeyCode::Right => self.days.next(),
                KeyCode::Char('k') | KeyCode::Up | KeyCode::Left => self.days.prev(),
                _ => {}
            },
            Tab::Progress => self.progress_key(key),
            Tab::Tips => {
                if key.code == KeyCode::Char('r') {
                    self.start_tips();
                }
            }
            Tab::Profile => {
                if key.code == KeyCode::Char('L') {
                    self.ask_logout();
                }
            }
        }
        Action::None
    }

    fn progress_key(&mut self, key: KeyEvent) {
        let idx = ProgressField::ALL
            .iter()
            .position(|f| *f == self.progress_field)
            .unwrap_or(0);
        let form = self.controller.progress_mut().form_mut();
        match (key.code, self.progress_field) {
            (KeyCode::Up, _) => self.progress_field = ProgressField::ALL[idx.saturating_sub(1)],
            (KeyCode::Down, _) => {
                self.progress_field = ProgressField::ALL[(idx + 1).min(ProgressField::ALL.len() - 1)];
            }
            (KeyCode::Char(c), ProgressField::Weight) => form.push_weight_char(c),
            (KeyCode::Backspace, ProgressField::Weight) => form.pop_weight_char(),
            (KeyCode::Left, ProgressField::Mood) => form.adjust_mood(-1),
            (KeyCode::Right, ProgressField::Mood) => form.adjust_mood(1),
            (KeyCode::Left, ProgressField::Adherence) => form.adjust_adherence(-5),
            (KeyCode::Right, ProgressField::Adherence) => form.adjust_adherence(5),
            (KeyCode::Enter, _) => self.submit_progress(),
            _ => {}
        }
    }

    fn submit_progress(&mut self) {
        match self.controller.progress_mut().submit() {
            Ok(Some(entry)) => {
                self.status_message = Some(format!(
                    "Logged {} kg for {}",
                    format_amount(entry.weight),
                    entry.date
                ));
            }
            Ok(None) => {}
            Err(e) => self.status_message = Some(format!("Failed to save check-in: {e}")),
        }
    }

    // -- Navigation --

    pub fn select_tab(&mut self, tab: Tab) {
        if tab == self.tab {
            return;
        }
        if self.tab == Tab::Tips {
            self.stop_tips();
        }
        self.tab = tab;
        if tab == Tab::Tips {
            self.start_tips();
        }
    }

    fn quit(&mut self) {
        self.stop_tips();
        self.should_quit = true;
    }

    fn ask_logout(&mut self) {
        self.confirm_logout = true;
        self.status_message = Some("Delete all data and start over? Press y to confirm".to_string());
    }

    fn logout(&mut self) {
        self.stop_tips();
        match self.controller.logout() {
            Ok(()) => {
                self.onboarding = OnboardingForm::new();
                self.onboard_focus = 0;
                self.tab = Tab::Dashboard;
                self.days = DaySelector::new(0);
                self.status_message = Some("All data cleared".to_string());
            }
            Err(e) => self.status_message = Some(format!("Logout failed: {e}")),
        }
    }

    // -- Tips --

    /// Spawn a tips fetch, cancelling any one already running.
    pub fn start_tips(&mut self) {
        self.stop_tips();
        let generator = self.controller.generator().clone();
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let handle = tokio::spawn(async move { generator.daily_tips(&token).await });
        self.tips = TipsFeed::Loading { handle, cancel };
    }

    /// Cancel an in-flight fetch and forget any loaded tips.
    pub fn stop_tips(&mut self) {
        if let TipsFeed::Loading { cancel, .. } = &self.tips {
            cancel.cancel();
        }
        self.tips = TipsFeed::Idle;
    }

    /// Apply a finished tips fetch. Called on every pass of the event loop.
    pub async fn poll_tips(&mut self) {
        let finished = matches!(&self.tips, TipsFeed::Loading { handle, .. } if handle.is_finished());
        if !finished {
            return;
        }
        let TipsFeed::Loading { handle, .. } = std::mem::replace(&mut self.tips, TipsFeed::Idle)
        else {
            return;
        };
        self.tips = match handle.await {
            Ok(Ok(tips)) => {
                tracing::debug!(count = tips.len(), "tips loaded");
                TipsFeed::Loaded(tips)
            }
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "tips fetch failed");
                TipsFeed::Failed(e.to_string())
            }
            Err(e) => TipsFeed::Failed(format!("tips task failed: {e}")),
        };
    }

    // -- Actions --

    /// Run an awaited action against the controller.
    pub async fn perform(
        &mut self,
        action: Action,
        cancel: &CancellationToken,
    ) -> Result<(), ControllerError> {
        match action {
            Action::None => return Ok(()),
            Action::CompleteOnboarding(profile) => {
                self.controller.complete_onboarding(profile, cancel).await?;
            }
            Action::Generate => self.controller.generate(cancel).await?,
            Action::Retry => self.controller.retry(cancel).await?,
        }

        self.days.resize(self.controller.meal_plan().map_or(0, <[_]>::len));
        if self.controller.state() == AppState::Ready {
            self.tab = Tab::Dashboard;
            self.status_message = Some(match self.controller.last_error() {
                Some(e) => format!("Regeneration failed, keeping your current plan: {e}"),
                None => "Plan ready".to_string(),
            });
        }
        Ok(())
    }
}

/// Step through `all` from `current`, wrapping at either end.
fn cycle<T: Copy + PartialEq>(all: &[T], current: T, forward: bool) -> T {
    let idx = all.iter().position(|v| *v == current).unwrap_or(0);
    let next = if forward {
        (idx + 1) % all.len()
    } else {
        (idx + all.len() - 1) % all.len()
    };
    all[next]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
