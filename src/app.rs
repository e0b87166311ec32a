//! Application state and key handling

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use formgate::backend::SimulatedBackend;
use formgate::config::FormConfig;
use formgate::form::{FormController, FormState, SubmitOutcome};
use formgate::presets::{SchemaVariant, DEFAULT_EMAIL};
use formgate::schema::{FieldKind, FieldSpec, FieldValue, SchemaValidator, ValueSnapshot};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Status shown when a submit is refused for invalid input
const FIX_FIELDS_MESSAGE: &str = "Please fix the highlighted fields";

/// Something that can hold keyboard focus
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Focus {
    Field(String),
    Submit,
}

/// Main application struct
pub struct App {
    /// Form being edited
    pub controller: Arc<FormController>,
    /// Title shown on the form border
    pub title: &'static str,
    /// Index into the current focus targets
    pub focus_index: usize,
    /// Fields whose errors are shown
    pub touched: HashSet<String>,
    /// Whether a submit was attempted; shows every error
    pub submit_attempted: bool,
    /// One-line feedback under the form
    pub status_message: Option<String>,
    /// Submission running in the background
    pending: Option<JoinHandle<SubmitOutcome>>,
    /// Whether the app should quit
    quit: bool,
}

impl App {
    /// Build the form described by `config`
    pub fn new(config: &FormConfig) -> Result<Self> {
        let variant = config.schema_variant();
        let validator = SchemaValidator::compile(variant.schema())?;
        let backend = SimulatedBackend::new(config.submit_delay(), config.taken_emails());

        let default_email = config.default_email.as_deref().unwrap_or(DEFAULT_EMAIL);
        let defaults = match variant {
            SchemaVariant::Minimal => ValueSnapshot::new().with("email", default_email),
            SchemaVariant::Signup => ValueSnapshot::new(),
        };

        let mut controller =
            FormController::new(validator, Arc::new(backend)).with_values(&defaults);
        if let Some(message) = &config.root_error_message {
            controller = controller.with_default_root_error(message.clone());
        }

        tracing::info!(schema = ?variant, "Form ready");
        Ok(Self::with_controller(Arc::new(controller), variant.title()))
    }

    pub fn with_controller(controller: Arc<FormController>, title: &'static str) -> Self {
        Self {
            controller,
            title,
            focus_index: 0,
            touched: HashSet::new(),
            submit_attempted: false,
            status_message: None,
            pending: None,
            quit: false,
        }
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn state(&self) -> FormState {
        self.controller.get_state()
    }

    /// Visible fields followed by the submit button
    pub fn focus_targets(&self, state: &FormState) -> Vec<Focus> {
        self.controller
            .schema()
            .visible_fields(&state.values)
            .map(|f| Focus::Field(f.name.clone()))
            .chain(std::iter::once(Focus::Submit))
            .collect()
    }

    /// Currently focused target, clamped to what is visible
    pub fn focus(&self, state: &FormState) -> Focus {
        let targets = self.focus_targets(state);
        let index = self.focus_index.min(targets.len() - 1);
        targets[index].clone()
    }

    /// Error to render under `field`, once the user has interacted with it
    pub fn visible_error<'a>(&self, state: &'a FormState, field: &str) -> Option<&'a str> {
        if self.submit_attempted || self.touched.contains(field) {
            state.error(field)
        } else {
            None
        }
    }

    fn focused_spec(&self, state: &FormState) -> Option<&FieldSpec> {
        match self.focus(state) {
            Focus::Field(name) => self.controller.schema().get(&name),
            Focus::Submit => None,
        }
    }

    fn move_focus(&mut self, forward: bool) {
        let count = self.focus_targets(&self.state()).len();
        let current = self.focus_index.min(count - 1);
        self.focus_index = if forward {
            (current + 1) % count
        } else if current == 0 {
            count - 1
        } else {
            current - 1
        };
    }

    /// Handle a key press
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        let state = self.state();
        let spec = self.focused_spec(&state).cloned();

        match key.code {
            KeyCode::Esc => self.quit = true,
            KeyCode::Tab | KeyCode::Down => self.move_focus(true),
            KeyCode::BackTab | KeyCode::Up => self.move_focus(false),
            KeyCode::Enter => self.start_submit(),
            KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                if self.controller.reset() {
                    self.touched.clear();
                    self.submit_attempted = false;
                    self.focus_index = 0;
                    self.status_message = None;
                }
            }
            KeyCode::Char(c) => match spec {
                Some(spec) if spec.kind == FieldKind::Boolean && c == ' ' => {
                    let checked = state.values.flag(&spec.name);
                    self.edit(&spec.name, (!checked).into())?;
                }
                Some(spec) if spec.kind == FieldKind::Text => {
                    let mut text = state.values.text(&spec.name).to_string();
                    text.push(c);
                    self.edit(&spec.name, text.into())?;
                }
                _ => {}
            },
            KeyCode::Backspace => {
                if let Some(spec) = spec.filter(|s| s.kind == FieldKind::Text) {
                    let mut text = state.values.text(&spec.name).to_string();
                    text.pop();
                    self.edit(&spec.name, text.into())?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn edit(&mut self, name: &str, value: FieldValue) -> Result<()> {
        self.controller.set_field(name, value)?;
        self.touched.insert(name.to_string());
        Ok(())
    }

    /// Kick off a submission in the background unless one is running.
    ///
    /// A disabled submit button only reveals the outstanding errors.
    pub fn start_submit(&mut self) {
        if self.pending.is_some() {
            tracing::debug!("Submit pressed while a submission is pending");
            return;
        }
        self.submit_attempted = true;
        if !self.state().derived_enabled {
            self.status_message = Some(FIX_FIELDS_MESSAGE.to_string());
            return;
        }
        self.status_message = None;
        let controller = self.controller.clone();
        self.pending = Some(tokio::spawn(async move { controller.submit().await }));
    }

    /// Collect a finished background submission, if any
    pub async fn poll_submission(&mut self) -> Result<()> {
        let finished = self.pending.as_ref().is_some_and(|h| h.is_finished());
        if !finished {
            return Ok(());
        }
        if let Some(handle) = self.pending.take() {
            let outcome = handle.await?;
            self.status_message = match outcome {
                SubmitOutcome::Succeeded => Some("Submitted!".to_string()),
                SubmitOutcome::Invalid => Some(FIX_FIELDS_MESSAGE.to_string()),
                SubmitOutcome::AlreadySubmitting | SubmitOutcome::Failed(_) => None,
            };
        }
        Ok(())
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use formgate::form::{SubmissionState, SubmitError, Submitter};
    use formgate::presets;
    use std::time::Duration;

    struct Refusing;

    #[async_trait]
    impl Submitter for Refusing {
        async fn submit(&self, _values: &ValueSnapshot) -> Result<(), SubmitError> {
            Err(SubmitError::Failed("down".to_string()))
        }
    }

    fn signup_app() -> App {
        let validator = SchemaValidator::compile(presets::signup()).unwrap();
        App::with_controller(
            Arc::new(FormController::new(validator, Arc::new(Refusing))),
            "Create Account",
        )
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c))).unwrap();
        }
    }

    async fn wait_for_submission(app: &mut App) {
        while app.is_pending() {
            tokio::time::sleep(Duration::from_millis(1)).await;
            app.poll_submission().await.unwrap();
        }
    }

    #[test]
    fn test_typing_updates_focused_field() {
        let mut app = signup_app();
        type_text(&mut app, "Ada");
        app.handle_key(key(KeyCode::Backspace)).unwrap();
        assert_eq!(app.state().values.text("name"), "Ad");
        assert!(app.touched.contains("name"));
    }

    #[test]
    fn test_errors_hidden_until_touched() {
        let mut app = signup_app();
        let state = app.state();
        assert_eq!(app.visible_error(&state, "name"), None);

        type_text(&mut app, " ");
        let state = app.state();
        assert_eq!(app.visible_error(&state, "name"), Some("Name is required"));
    }

    #[test]
    fn test_toggle_reveals_dependent_field() {
        let mut app = signup_app();
        let before = app.focus_targets(&app.state()).len();

        let toggle_index = app
            .focus_targets(&app.state())
            .iter()
            .position(|f| *f == Focus::Field("has_github".to_string()))
            .unwrap();
        app.focus_index = toggle_index;
        app.handle_key(key(KeyCode::Char(' '))).unwrap();

        let state = app.state();
        assert!(state.values.flag("has_github"));
        assert_eq!(app.focus_targets(&state).len(), before + 1);
        app.handle_key(key(KeyCode::Tab)).unwrap();
        assert_eq!(app.focus(&app.state()), Focus::Field("github".to_string()));
    }

    #[test]
    fn test_focus_wraps_around() {
        let mut app = signup_app();
        app.handle_key(key(KeyCode::BackTab)).unwrap();
        assert_eq!(app.focus(&app.state()), Focus::Submit);
        app.handle_key(key(KeyCode::Tab)).unwrap();
        assert_eq!(app.focus(&app.state()), Focus::Field("name".to_string()));
    }

    #[test]
    fn test_escape_quits() {
        let mut app = signup_app();
        app.handle_key(key(KeyCode::Esc)).unwrap();
        assert!(app.should_quit());
    }

    #[test]
    fn test_disabled_submit_does_not_start() {
        let mut app = signup_app();
        assert!(!app.state().derived_enabled);

        app.handle_key(key(KeyCode::BackTab)).unwrap();
        assert_eq!(app.focus(&app.state()), Focus::Submit);
        app.handle_key(key(KeyCode::Enter)).unwrap();

        assert!(!app.is_pending());
        assert!(app.submit_attempted);
        assert_eq!(app.state().submission, SubmissionState::Idle);
        assert_eq!(app.status_message.as_deref(), Some(FIX_FIELDS_MESSAGE));
    }

    #[tokio::test]
    async fn test_invalid_submit_reports_status() {
        let mut app = signup_app();
        app.handle_key(key(KeyCode::Enter)).unwrap();
        wait_for_submission(&mut app).await;

        assert!(app.submit_attempted);
        assert_eq!(
            app.status_message.as_deref(),
            Some("Please fix the highlighted fields")
        );
        let state = app.state();
        assert_eq!(app.visible_error(&state, "name"), Some("Name is required"));
    }

    #[tokio::test]
    async fn test_failed_submit_shows_root_error() {
        let mut app = signup_app();
        let controller = app.controller.clone();
        controller.set_field("name", "Ada").unwrap();
        controller.set_field("email", "ada@example.com").unwrap();
        controller.set_field("password", "analytical").unwrap();
        controller.set_field("confirm_password", "analytical").unwrap();
        controller.set_field("phone", "555-0100").unwrap();

        app.handle_key(key(KeyCode::Enter)).unwrap();
        wait_for_submission(&mut app).await;

        let state = app.state();
        assert!(matches!(state.submission, SubmissionState::Failed(_)));
        assert_eq!(state.root_error(), Some("This email is already taken"));
        assert_eq!(app.status_message, None);
    }
}
