use ratatui::{layout::Rect, Frame};
use tracing::{debug, warn};

use super::{Step, StepContext, StepId, SubmitOutcome};
use crate::onboard::commit::{CommitOutcome, CommitPayload, CommitState};
use crate::onboard::form::{FieldBox, Form, TextInput};
use crate::onboard::ui::{self, RenderContext};
use crate::store::{selectors, Action, FormAnswers, HealthData};
use crate::vim::InputBuffer;
use crate::wizard::StepDescriptor;

const TOBACCO: &str = "tobacco";
const YES: usize = 0;
const NO: usize = 1;

pub struct HealthStep {
    form: Form,
    commit: CommitState,
}

impl HealthStep {
    pub fn new() -> Self {
        let form = Form::new(vec![
            FieldBox::text(
                "Height (ft./in.)",
                vec![
                    TextInput::new("heightFeet", "ft", InputBuffer::numeric(Some(1))),
                    TextInput::new("heightInches", "in", InputBuffer::numeric(Some(2))),
                ],
            ),
            FieldBox::text(
                "Weight (Kgs)",
                vec![TextInput::new("weight", "Kgs", InputBuffer::numeric(Some(3)))],
            ),
            FieldBox::choice(
                "Have you used any tobacco products in last 5 years?",
                TOBACCO,
                ["Yes", "No"],
            ),
        ]);

        Self {
            form,
            commit: CommitState::default(),
        }
    }

    pub fn data(&self) -> HealthData {
        HealthData {
            height_feet: self.form.text("heightFeet").to_string(),
            height_inches: self.form.text("heightInches").to_string(),
            weight: self.form.text("weight").to_string(),
            tobacco: self.form.choice(TOBACCO) == YES,
        }
    }
}

impl Default for HealthStep {
    fn default() -> Self {
        Self::new()
    }
}

impl StepDescriptor for HealthStep {
    fn label(&self) -> &str {
        StepId::Health.label()
    }
}

impl Step for HealthStep {
    fn id(&self) -> StepId {
        StepId::Health
    }

    fn activate(&mut self, answers: &FormAnswers) {
        let view = selectors::health_view(answers);
        self.form.set_text("heightFeet", &view.height_feet);
        self.form.set_text("heightInches", &view.height_inches);
        self.form.set_text("weight", &view.weight);
        self.form
            .set_choice(TOBACCO, if view.tobacco { YES } else { NO });
        self.form.reset_errors();
        self.form.focus_first();
    }

    fn deactivate(&mut self) {
        self.commit.cancel();
        self.form.reset_errors();
    }

    fn is_loading(&self) -> bool {
        self.commit.is_loading()
    }

    fn form(&self) -> Option<&Form> {
        Some(&self.form)
    }

    fn form_mut(&mut self) -> Option<&mut Form> {
        Some(&mut self.form)
    }

    fn submit(&mut self, ctx: &mut StepContext<'_>) -> SubmitOutcome {
        if self.is_loading() {
            return SubmitOutcome::Busy;
        }
        if !self.form.validate() {
            debug!("Health form has blank fields");
            return SubmitOutcome::Invalid;
        }
        ctx.commits
            .start(StepId::Health, CommitPayload::Health(self.data()), &mut self.commit);
        SubmitOutcome::Started
    }

    fn on_commit(&mut self, outcome: CommitOutcome, ctx: &mut StepContext<'_>) {
        if !self.commit.finish(outcome.ticket) {
            debug!("Ignoring stale commit #{}", outcome.ticket);
            return;
        }
        match outcome.result {
            Ok(CommitPayload::Health(data)) => {
                ctx.store.dispatch(Action::AddHealth(data));
                ctx.nav.next();
            }
            Ok(other) => warn!("Health commit resolved with unexpected payload {other:?}"),
            Err(_) => {}
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect, ctx: &RenderContext<'_>) {
        ui::form::draw_form_step(frame, area, ctx, "Now, a closer look", self);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::onboard::steps::test_support::Harness;

    #[test]
    fn tobacco_defaults_to_no() {
        let mut step = HealthStep::new();
        step.activate(&FormAnswers::default());
        assert!(!step.data().tobacco);
        assert!(step.has_previous());
    }

    #[test]
    fn weight_accepts_digits_only() {
        let mut step = HealthStep::new();
        step.activate(&FormAnswers::default());
        let form = step.form_mut().expect("health has a form");
        form.focus_next();
        form.focus_next();
        if let Some(buf) = form.focused_buffer_mut() {
            for c in "7a0.5".chars() {
                buf.insert(c);
            }
        }
        assert_eq!(step.data().weight, "705");
    }

    #[tokio::test]
    async fn commit_stores_health_and_advances() {
        let mut harness = Harness::new();
        harness.wizard.set_active_step(1);
        let mut step = HealthStep::new();
        let mut answers = FormAnswers::default();
        answers.height.feet = "5".to_string();
        answers.height.inches = "10".to_string();
        answers.weight = "70".to_string();
        answers.tobacco = true;
        step.activate(&answers);

        assert_eq!(step.submit(&mut harness.context()), SubmitOutcome::Started);
        let outcome = harness.next_outcome().await;
        step.on_commit(outcome, &mut harness.context());

        let state = harness.store.state();
        assert_eq!(state.height.feet, "5");
        assert_eq!(state.height.inches, "10");
        assert_eq!(state.weight, "70");
        assert!(state.tobacco);
        assert_eq!(harness.position(), 2);
    }

    #[tokio::test]
    async fn previous_is_ignored_while_loading() {
        let mut harness = Harness::with_delay(Duration::from_millis(50));
        harness.wizard.set_active_step(1);
        let mut step = HealthStep::new();
        let mut answers = FormAnswers::default();
        answers.height.feet = "6".to_string();
        answers.height.inches = "0".to_string();
        answers.weight = "80".to_string();
        step.activate(&answers);

        step.submit(&mut harness.context());
        assert!(!step.previous(&mut harness.context()));
        assert_eq!(harness.position(), 1);

        let outcome = harness.next_outcome().await;
        step.on_commit(outcome, &mut harness.context());
        assert_eq!(harness.position(), 2);
    }

    #[tokio::test]
    async fn previous_goes_back_when_idle() {
        let mut harness = Harness::new();
        harness.wizard.set_active_step(1);
        let mut step = HealthStep::new();
        assert!(step.previous(&mut harness.context()));
        assert_eq!(harness.position(), 0);
    }
}
