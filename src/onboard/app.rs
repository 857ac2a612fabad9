use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{debug, info};

use super::commit::{CommitOutcome, CommitRunner, Committer};
use super::config::WizardConfig;
use super::steps::{default_steps, Step, StepContext, StepId, SubmitOutcome};
use super::widgets::StatusBarState;
use crate::event::{Event, EventSender};
use crate::store::{Action, FormAnswers, Store};
use crate::ui::Theme;
use crate::vim::{parse_command, Command, InputBuffer, ModeAction, VimMode};
use crate::wizard::{StepDescriptor, WizardController};

/// Message displayed to the user
pub struct Message {
    pub text: String,
    pub is_error: bool,
}

/// Main wizard application state
pub struct WizardApp {
    pub config: WizardConfig,
    pub theme: Theme,

    // Vim mode state
    pub vim_mode: VimMode,
    pub command_buffer: InputBuffer,

    pub wizard: WizardController<Box<dyn Step>>,
    pub store: Store,
    commits: CommitRunner,

    // UI state
    pub message: Option<Message>,
    pub show_help: bool,
    pub confirm_quit: bool,
    pub should_exit: bool,
    pub status_bar: StatusBarState,
    pub spinner_tick: usize,
}

impl WizardApp {
    pub fn new(
        config: WizardConfig,
        store: Store,
        committer: Arc<dyn Committer>,
        events: EventSender,
    ) -> Self {
        let mut wizard =
            WizardController::with_initial(default_steps(), config.wizard.initial_step);
        wizard.active_mut().activate(store.state());
        info!(
            "Wizard starting at step {} ({})",
            wizard.active_step_index(),
            wizard.active().label()
        );

        let mut app = Self {
            config,
            theme: Theme::default(),
            vim_mode: VimMode::Normal,
            command_buffer: InputBuffer::new(),
            wizard,
            store,
            commits: CommitRunner::new(committer, events),
            message: None,
            show_help: false,
            confirm_quit: false,
            should_exit: false,
            status_bar: StatusBarState::default(),
            spinner_tick: 0,
        };
        app.update_status_bar();
        app
    }

    pub fn active_step(&self) -> &dyn Step {
        self.wizard.active().as_ref()
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Tick => self.tick(),
            Event::Resize => {}
            Event::Commit(outcome) => self.handle_commit(outcome),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        // Any key dismisses the message
        self.message = None;

        if self.confirm_quit {
            self.handle_confirm_key(key);
            self.update_status_bar();
            return;
        }

        if self.show_help {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?')) {
                self.show_help = false;
            }
            self.update_status_bar();
            return;
        }

        // Only quitting is allowed while a commit is in flight
        if self.active_step().is_loading() {
            if key.code == KeyCode::Char('q') {
                self.confirm_quit = true;
            }
            return;
        }

        match self.vim_mode {
            VimMode::Normal => self.handle_normal_mode(key),
            VimMode::Insert => self.handle_insert_mode(key),
            VimMode::Command => self.handle_command_mode(key),
        }

        self.update_status_bar();
    }

    fn handle_normal_mode(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(':') => {
                self.vim_mode = self.vim_mode.transition(ModeAction::EnterCommand);
                self.command_buffer.clear();
            }

            // Field focus
            KeyCode::Char('j') | KeyCode::Down | KeyCode::Tab => {
                if let Some(form) = self.wizard.active_mut().form_mut() {
                    form.focus_next();
                }
            }
            KeyCode::Char('k') | KeyCode::Up | KeyCode::BackTab => {
                if let Some(form) = self.wizard.active_mut().form_mut() {
                    form.focus_prev();
                }
            }

            KeyCode::Char('i') | KeyCode::Char('a') => {
                if self.active_step().form().is_some_and(|f| f.is_text_focused()) {
                    self.vim_mode = self.vim_mode.transition(ModeAction::EnterInsert);
                }
            }

            KeyCode::Char('h') | KeyCode::Char('l') | KeyCode::Left | KeyCode::Right
            | KeyCode::Char(' ') => {
                if let Some(form) = self.wizard.active_mut().form_mut() {
                    form.toggle_focused_choice();
                }
            }

            KeyCode::Enter | KeyCode::Char('n') => self.submit(),
            KeyCode::Char('b') | KeyCode::Char('p') => self.previous(),

            KeyCode::Char('?') | KeyCode::F(1) => {
                self.show_help = true;
            }
            KeyCode::Char('q') => {
                self.confirm_quit = true;
            }
            _ => {}
        }
    }

    fn handle_insert_mode(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.vim_mode = self.vim_mode.transition(ModeAction::Escape);
            }
            KeyCode::Enter => {
                let on_last = self
                    .active_step()
                    .form()
                    .is_some_and(|f| f.is_on_last_text_input());
                if on_last {
                    self.vim_mode = self.vim_mode.transition(ModeAction::Submit);
                    self.submit();
                } else {
                    self.focus_next_in_insert();
                }
            }
            KeyCode::Tab => self.focus_next_in_insert(),
            KeyCode::BackTab => {
                if let Some(form) = self.wizard.active_mut().form_mut() {
                    form.focus_prev();
                }
                self.leave_insert_off_text();
            }
            KeyCode::Char(c) if key.modifiers.contains(KeyModifiers::CONTROL) => match c {
                'u' => self.edit_focused(InputBuffer::clear),
                'a' => self.edit_focused(InputBuffer::move_start),
                'e' => self.edit_focused(InputBuffer::move_end),
                _ => {}
            },
            KeyCode::Char(c) => self.edit_focused(|b| {
                b.insert(c);
            }),
            KeyCode::Backspace => self.edit_focused(|b| {
                b.delete_back();
            }),
            KeyCode::Delete => self.edit_focused(|b| {
                b.delete_forward();
            }),
            KeyCode::Left => self.edit_focused(InputBuffer::move_left),
            KeyCode::Right => self.edit_focused(InputBuffer::move_right),
            KeyCode::Home => self.edit_focused(InputBuffer::move_start),
            KeyCode::End => self.edit_focused(InputBuffer::move_end),
            _ => {}
        }
    }

    fn handle_command_mode(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.vim_mode = self.vim_mode.transition(ModeAction::Escape);
                self.command_buffer.clear();
            }
            KeyCode::Enter => {
                let cmd = self.command_buffer.content().to_string();
                self.vim_mode = self.vim_mode.transition(ModeAction::Execute);
                self.command_buffer.clear();
                self.execute_command(&cmd);
            }
            KeyCode::Backspace => {
                if self.command_buffer.is_empty() {
                    self.vim_mode = self.vim_mode.transition(ModeAction::Escape);
                } else {
                    self.command_buffer.delete_back();
                }
            }
            KeyCode::Char(c) => {
                self.command_buffer.insert(c);
            }
            _ => {}
        }
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                self.confirm_quit = false;
                self.should_exit = true;
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.confirm_quit = false;
            }
            _ => {}
        }
    }

    fn execute_command(&mut self, cmd: &str) {
        match parse_command(cmd) {
            Ok(Command::Submit) => self.submit(),
            Ok(Command::Previous) => self.previous(),
            Ok(Command::Clear) => self.clear_all(),
            Ok(Command::Help) => self.show_help = true,
            Ok(Command::Quit) => self.confirm_quit = true,
            Err(e) => self.set_error(e.to_string()),
        }
    }

    fn edit_focused<F>(&mut self, edit: F)
    where
        F: FnOnce(&mut InputBuffer),
    {
        if let Some(form) = self.wizard.active_mut().form_mut() {
            if let Some(buffer) = form.focused_buffer_mut() {
                edit(buffer);
            }
            form.revalidate();
        }
    }

    fn focus_next_in_insert(&mut self) {
        if let Some(form) = self.wizard.active_mut().form_mut() {
            form.focus_next();
        }
        self.leave_insert_off_text();
    }

    /// Choices are not editable; landing on one drops back to normal mode.
    fn leave_insert_off_text(&mut self) {
        if !self.active_step().form().is_some_and(|f| f.is_text_focused()) {
            self.vim_mode = self.vim_mode.transition(ModeAction::Escape);
        }
    }

    /// Run `f` against the active step, then apply any navigation it requested.
    fn with_active<R, F>(&mut self, f: F) -> R
    where
        F: FnOnce(&mut dyn Step, &mut StepContext<'_>) -> R,
    {
        let before = self.wizard.active_step_index();
        let (step, nav) = self.wizard.active_with_navigator();
        let mut ctx = StepContext {
            store: &mut self.store,
            nav,
            commits: &self.commits,
        };
        let result = f(step.as_mut(), &mut ctx);
        self.after_navigation(before);
        result
    }

    fn after_navigation(&mut self, before: usize) {
        let after = self.wizard.active_step_index();
        if after == before {
            return;
        }
        if let Some(step) = self.wizard.steps_mut().get_mut(before) {
            step.deactivate();
        }
        self.wizard.active_mut().activate(self.store.state());
        self.vim_mode = VimMode::Normal;
        info!("Step {before} -> {after} ({})", self.wizard.active().label());
    }

    pub fn submit(&mut self) {
        match self.with_active(|step, ctx| step.submit(ctx)) {
            SubmitOutcome::Started | SubmitOutcome::Busy => {}
            SubmitOutcome::Invalid => {
                self.set_error("Please fill in the required fields.".to_string());
            }
        }
        self.update_status_bar();
    }

    pub fn previous(&mut self) {
        self.with_active(|step, ctx| step.previous(ctx));
        self.update_status_bar();
    }

    /// Route a commit result to the step that started it.
    pub fn handle_commit(&mut self, outcome: CommitOutcome) {
        if self.commits.is_shut_down() {
            debug!("Dropping commit #{} after shutdown", outcome.ticket);
            return;
        }
        let step_id = outcome.step;
        if step_id != self.active_step().id() {
            debug!(
                "Dropping commit #{} for inactive step {}",
                outcome.ticket,
                step_id.label()
            );
            return;
        }

        let failed = outcome.result.is_err();
        let accepted = self.with_active(|step, ctx| {
            let was_loading = step.is_loading();
            step.on_commit(outcome, ctx);
            was_loading && !step.is_loading()
        });

        // Failures only clear loading; the runner already logged them.
        if accepted && !failed {
            if step_id == StepId::Confirm {
                self.set_info("Profile submitted.".to_string());
            } else {
                self.set_info(format!("{} saved", step_id.label()));
            }
        }
        self.update_status_bar();
    }

    /// Wipe every answer and return to the first step without a commit.
    pub fn clear_all(&mut self) {
        self.wizard.active_mut().deactivate();
        self.store.dispatch(Action::Clear);
        self.wizard.set_active_step(0);
        self.wizard.active_mut().activate(self.store.state());
        self.vim_mode = VimMode::Normal;
        info!("Answers cleared");
        self.set_info("Answers cleared.".to_string());
    }

    /// The store published a new document.
    pub fn on_answers_changed(&mut self, answers: &FormAnswers) {
        for step in self.wizard.steps_mut() {
            step.answers_changed(answers);
        }
    }

    pub fn tick(&mut self) {
        self.spinner_tick = self.spinner_tick.wrapping_add(1);
        self.update_status_bar();
    }

    /// Cancel every commit in flight. No outcome is applied afterwards.
    pub fn shutdown(&mut self) {
        self.commits.shutdown();
        self.wizard.active_mut().deactivate();
        info!("Wizard shut down");
    }

    pub fn set_error(&mut self, text: String) {
        self.message = Some(Message {
            text,
            is_error: true,
        });
    }

    pub fn set_info(&mut self, text: String) {
        self.message = Some(Message {
            text,
            is_error: false,
        });
    }

    /// Update status bar based on current application state
    pub fn update_status_bar(&mut self) {
        let step = self.active_step();
        self.status_bar = StatusBarState::for_step(
            self.vim_mode,
            step.form().is_some(),
            step.has_previous(),
            step.is_loading(),
        );
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use futures::future::BoxFuture;
    use futures::FutureExt;
    use tokio::sync::mpsc;

    use super::*;
    use crate::onboard::commit::{CommitError, CommitPayload, SimulatedCommitter};
    use crate::onboard::ui::{self, testing::render};
    use crate::store::{BasicsData, Gender, HealthData, MemoryStorage, DEFAULT_STORAGE_KEY};

    struct FailingCommitter;

    impl Committer for FailingCommitter {
        fn commit(
            &self,
            _payload: CommitPayload,
        ) -> BoxFuture<'static, Result<CommitPayload, CommitError>> {
            async { Err(CommitError::Rejected("server unavailable".to_string())) }.boxed()
        }
    }

    struct Fixture {
        app: WizardApp,
        rx: mpsc::UnboundedReceiver<Event>,
    }

    impl Fixture {
        fn new(committer: Arc<dyn Committer>, store: Store, initial_step: usize) -> Self {
            let (tx, rx) = mpsc::unbounded_channel();
            let mut config = WizardConfig::default();
            config.wizard.initial_step = initial_step;
            Self {
                app: WizardApp::new(config, store, committer, tx),
                rx,
            }
        }

        fn simulated(delay: Duration) -> Self {
            Self::new(Arc::new(SimulatedCommitter::new(delay)), empty_store(), 0)
        }

        fn press(&mut self, code: KeyCode) {
            self.app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
        }

        fn type_text(&mut self, text: &str) {
            for c in text.chars() {
                self.press(KeyCode::Char(c));
            }
        }

        /// Feed the next commit outcome back into the app.
        async fn settle(&mut self) {
            loop {
                match tokio::time::timeout(Duration::from_secs(2), self.rx.recv()).await {
                    Ok(Some(event @ Event::Commit(_))) => {
                        self.app.handle_event(event);
                        return;
                    }
                    Ok(Some(_)) => continue,
                    other => panic!("no commit outcome: {other:?}"),
                }
            }
        }

        async fn quiet_for(&mut self, limit: Duration) -> bool {
            tokio::time::timeout(limit, self.rx.recv()).await.is_err()
        }

        fn position(&self) -> usize {
            self.app.wizard.active_step_index()
        }
    }

    fn empty_store() -> Store {
        Store::open(Arc::new(MemoryStorage::new()), DEFAULT_STORAGE_KEY)
    }

    fn store_with_basics() -> Store {
        let mut store = empty_store();
        store.dispatch(Action::AddBasics(BasicsData {
            first_name: "Jo".to_string(),
            last_name: "Ng".to_string(),
            gender: Some(Gender::Female),
            date: "01".to_string(),
            month: "02".to_string(),
            year: "1990".to_string(),
        }));
        store
    }

    fn store_with_everything() -> Store {
        let mut store = store_with_basics();
        store.dispatch(Action::AddHealth(HealthData {
            height_feet: "5".to_string(),
            height_inches: "6".to_string(),
            weight: "60".to_string(),
            tobacco: false,
        }));
        store
    }

    #[tokio::test]
    async fn full_walkthrough_returns_to_start_with_store_cleared() {
        let mut fx = Fixture::simulated(Duration::ZERO);

        fx.press(KeyCode::Char('i'));
        assert_eq!(fx.app.vim_mode, VimMode::Insert);
        fx.type_text("Jo");
        fx.press(KeyCode::Tab);
        fx.type_text("Ng");
        fx.press(KeyCode::Tab);
        fx.type_text("01");
        fx.press(KeyCode::Tab);
        fx.type_text("02");
        fx.press(KeyCode::Tab);
        fx.type_text("1990");
        fx.press(KeyCode::Enter);
        assert!(fx.app.active_step().is_loading());
        fx.settle().await;

        assert_eq!(fx.position(), 1);
        let state = fx.app.store.state();
        assert_eq!(state.first_name, "Jo");
        assert_eq!(state.last_name, "Ng");
        assert_eq!(state.gender, Some(Gender::Male));
        assert_eq!(state.dob.year, "1990");

        fx.press(KeyCode::Char('i'));
        fx.type_text("5");
        fx.press(KeyCode::Tab);
        fx.type_text("10");
        fx.press(KeyCode::Tab);
        fx.type_text("70");
        fx.press(KeyCode::Enter);
        fx.settle().await;

        assert_eq!(fx.position(), 2);
        assert_eq!(fx.app.store.state().height.inches, "10");
        assert_eq!(fx.app.store.state().first_name, "Jo");

        fx.press(KeyCode::Enter);
        fx.settle().await;

        assert_eq!(fx.position(), 0);
        assert_eq!(fx.app.store.state(), &FormAnswers::default());
        assert_eq!(
            fx.app.message.as_ref().map(|m| m.text.as_str()),
            Some("Profile submitted.")
        );
    }

    #[tokio::test]
    async fn blank_first_name_blocks_submission() {
        let mut fx = Fixture::simulated(Duration::ZERO);
        fx.press(KeyCode::Enter);

        assert_eq!(fx.position(), 0);
        assert!(!fx.app.active_step().is_loading());
        assert!(fx.app.store.state().is_empty());
        assert!(fx.app.message.as_ref().is_some_and(|m| m.is_error));
        assert!(fx.quiet_for(Duration::from_millis(50)).await);

        let out = render(80, 30, |f| ui::draw(f, &fx.app));
        assert!(out.contains(crate::onboard::REQUIRED_MESSAGE));
    }

    #[tokio::test]
    async fn failed_commit_keeps_position_and_store() {
        let mut fx = Fixture::new(Arc::new(FailingCommitter), store_with_basics(), 0);
        let before = fx.app.store.state().clone();

        fx.press(KeyCode::Enter);
        assert!(fx.app.active_step().is_loading());
        fx.settle().await;

        assert_eq!(fx.position(), 0);
        assert!(!fx.app.active_step().is_loading());
        assert_eq!(fx.app.store.state(), &before);
        assert!(fx.app.message.is_none());
    }

    #[tokio::test]
    async fn failed_commit_looks_like_nothing_happened() {
        let mut fx = Fixture::new(Arc::new(FailingCommitter), store_with_everything(), 1);
        let idle = render(80, 30, |f| ui::draw(f, &fx.app));

        fx.press(KeyCode::Enter);
        fx.settle().await;

        assert_eq!(fx.position(), 1);
        assert!(fx.app.message.is_none());
        assert_eq!(render(80, 30, |f| ui::draw(f, &fx.app)), idle);
    }

    #[tokio::test]
    async fn previous_is_ignored_while_loading() {
        let mut fx = Fixture::new(
            Arc::new(SimulatedCommitter::new(Duration::from_millis(30))),
            store_with_everything(),
            1,
        );

        fx.press(KeyCode::Enter);
        fx.press(KeyCode::Char('b'));
        fx.press(KeyCode::Enter);
        assert_eq!(fx.position(), 1);

        fx.settle().await;
        assert_eq!(fx.position(), 2);
        assert!(fx.quiet_for(Duration::from_millis(80)).await);
    }

    #[tokio::test]
    async fn previous_reloads_answers_from_store() {
        let mut fx = Fixture::new(
            Arc::new(SimulatedCommitter::new(Duration::ZERO)),
            store_with_everything(),
            1,
        );
        fx.press(KeyCode::Char('b'));
        assert_eq!(fx.position(), 0);

        let out = render(80, 30, |f| ui::draw(f, &fx.app));
        assert!(out.contains("Jo"));
        assert!(out.contains("(•) Female"));

        // No previous on the first step
        fx.press(KeyCode::Char('b'));
        assert_eq!(fx.position(), 0);
    }

    #[tokio::test]
    async fn shutdown_cancels_commit_in_flight() {
        let mut fx = Fixture::new(
            Arc::new(SimulatedCommitter::new(Duration::from_millis(30))),
            store_with_basics(),
            0,
        );
        let before = fx.app.store.state().clone();
        fx.press(KeyCode::Enter);
        fx.app.shutdown();

        assert!(fx.quiet_for(Duration::from_millis(100)).await);
        assert_eq!(fx.position(), 0);
        assert_eq!(fx.app.store.state(), &before);
    }

    #[tokio::test]
    async fn outcome_for_inactive_step_is_dropped() {
        let mut fx = Fixture::simulated(Duration::ZERO);
        fx.app.handle_event(Event::Commit(CommitOutcome {
            step: StepId::Health,
            ticket: 1,
            result: Ok(CommitPayload::Health(HealthData {
                weight: "90".to_string(),
                ..HealthData::default()
            })),
        }));

        assert_eq!(fx.position(), 0);
        assert!(fx.app.store.state().is_empty());
        assert!(fx.app.message.is_none());
    }

    #[tokio::test]
    async fn clear_command_wipes_answers_and_restarts() {
        let mut fx = Fixture::new(
            Arc::new(SimulatedCommitter::new(Duration::ZERO)),
            store_with_everything(),
            2,
        );
        fx.press(KeyCode::Char(':'));
        assert_eq!(fx.app.vim_mode, VimMode::Command);
        fx.type_text("clear");
        fx.press(KeyCode::Enter);

        assert_eq!(fx.position(), 0);
        assert_eq!(fx.app.store.state(), &FormAnswers::default());
        assert_eq!(fx.app.vim_mode, VimMode::Normal);
        assert!(fx.quiet_for(Duration::from_millis(30)).await);
    }

    #[tokio::test]
    async fn unknown_command_shows_error() {
        let mut fx = Fixture::simulated(Duration::ZERO);
        fx.press(KeyCode::Char(':'));
        fx.type_text("frobnicate");
        fx.press(KeyCode::Enter);

        let message = fx.app.message.as_ref().map(|m| (m.text.as_str(), m.is_error));
        assert_eq!(message, Some(("Unknown command: frobnicate", true)));
    }

    #[tokio::test]
    async fn quit_asks_for_confirmation() {
        let mut fx = Fixture::simulated(Duration::ZERO);
        fx.press(KeyCode::Char('q'));
        assert!(fx.app.confirm_quit);
        fx.press(KeyCode::Char('n'));
        assert!(!fx.app.should_exit);

        fx.press(KeyCode::Char('q'));
        fx.press(KeyCode::Char('y'));
        assert!(fx.app.should_exit);
    }

    #[tokio::test]
    async fn choices_toggle_from_normal_mode() {
        let mut fx = Fixture::simulated(Duration::ZERO);
        for _ in 0..5 {
            fx.press(KeyCode::Char('j'));
        }
        fx.press(KeyCode::Char('i'));
        assert_eq!(fx.app.vim_mode, VimMode::Normal);
        fx.press(KeyCode::Char(' '));

        let out = render(80, 30, |f| ui::draw(f, &fx.app));
        assert!(out.contains("(•) Female"));
    }

    #[tokio::test]
    async fn confirm_summary_follows_store_changes() {
        let mut fx = Fixture::new(
            Arc::new(SimulatedCommitter::new(Duration::ZERO)),
            empty_store(),
            2,
        );
        let mut changes = fx.app.store.subscribe();
        fx.app.store.dispatch(Action::AddBasics(BasicsData {
            first_name: "Ada".to_string(),
            last_name: "Ng".to_string(),
            ..BasicsData::default()
        }));
        changes.changed().await.expect("store alive");
        let doc = changes.borrow_and_update().clone();
        fx.app.on_answers_changed(&doc);

        let out = render(80, 30, |f| ui::draw(f, &fx.app));
        assert!(out.contains("Ada Ng"));
        assert!(out.contains("Not specified"));
    }
}
