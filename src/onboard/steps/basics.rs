use ratatui::{layout::Rect, Frame};
use tracing::{debug, warn};

use super::{Step, StepContext, StepId, SubmitOutcome};
use crate::onboard::commit::{CommitOutcome, CommitPayload, CommitState};
use crate::onboard::form::{FieldBox, Form, TextInput};
use crate::onboard::ui::{self, RenderContext};
use crate::store::{selectors, Action, BasicsData, FormAnswers, Gender};
use crate::vim::InputBuffer;
use crate::wizard::StepDescriptor;

const GENDER: &str = "gender";
const GENDER_OPTIONS: [Gender; 2] = [Gender::Male, Gender::Female];

pub struct BasicsStep {
    form: Form,
    commit: CommitState,
}

impl BasicsStep {
    pub fn new() -> Self {
        let form = Form::new(vec![
            FieldBox::text(
                "First Name",
                vec![TextInput::new(
                    "firstName",
                    "First Name",
                    InputBuffer::new().with_max_len(64),
                )],
            ),
            FieldBox::text(
                "Last Name",
                vec![TextInput::new(
                    "lastName",
                    "Last Name",
                    InputBuffer::new().with_max_len(64),
                )],
            ),
            FieldBox::text(
                "Date of birth",
                vec![
                    TextInput::new("date", "dd", InputBuffer::numeric(Some(2))),
                    TextInput::new("month", "mm", InputBuffer::numeric(Some(2))),
                    TextInput::new("year", "yyyy", InputBuffer::numeric(Some(4))),
                ],
            ),
            FieldBox::choice("Gender", GENDER, ["Male", "Female"]),
        ]);

        Self {
            form,
            commit: CommitState::default(),
        }
    }

    /// Local edits merged into the shape `ADD_BASICS` expects.
    pub fn data(&self) -> BasicsData {
        BasicsData {
            first_name: self.form.text("firstName").to_string(),
            last_name: self.form.text("lastName").to_string(),
            gender: Some(GENDER_OPTIONS[self.form.choice(GENDER)]),
            date: self.form.text("date").to_string(),
            month: self.form.text("month").to_string(),
            year: self.form.text("year").to_string(),
        }
    }
}

impl Default for BasicsStep {
    fn default() -> Self {
        Self::new()
    }
}

impl StepDescriptor for BasicsStep {
    fn label(&self) -> &str {
        StepId::Basics.label()
    }
}

impl Step for BasicsStep {
    fn id(&self) -> StepId {
        StepId::Basics
    }

    fn activate(&mut self, answers: &FormAnswers) {
        let view = selectors::basics_view(answers);
        self.form.set_text("firstName", &view.first_name);
        self.form.set_text("lastName", &view.last_name);
        self.form.set_text("date", &view.date);
        self.form.set_text("month", &view.month);
        self.form.set_text("year", &view.year);
        // Unset gender shows as Male, matching the form's initial selection.
        let gender = view.gender.unwrap_or(Gender::Male);
        let index = GENDER_OPTIONS.iter().position(|g| *g == gender).unwrap_or(0);
        self.form.set_choice(GENDER, index);
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

    fn has_previous(&self) -> bool {
        false
    }

    fn submit(&mut self, ctx: &mut StepContext<'_>) -> SubmitOutcome {
        if self.is_loading() {
            return SubmitOutcome::Busy;
        }
        if !self.form.validate() {
            debug!("Basics form has blank fields");
            return SubmitOutcome::Invalid;
        }
        ctx.commits
            .start(StepId::Basics, CommitPayload::Basics(self.data()), &mut self.commit);
        SubmitOutcome::Started
    }

    fn on_commit(&mut self, outcome: CommitOutcome, ctx: &mut StepContext<'_>) {
        if !self.commit.finish(outcome.ticket) {
            debug!("Ignoring stale commit #{}", outcome.ticket);
            return;
        }
        match outcome.result {
            Ok(CommitPayload::Basics(data)) => {
                ctx.store.dispatch(Action::AddBasics(data));
                let next = ctx.nav.active_step_index() as isize + 1;
                ctx.nav.set_active_step(next);
            }
            Ok(other) => warn!("Basics commit resolved with unexpected payload {other:?}"),
            Err(_) => {}
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect, ctx: &RenderContext<'_>) {
        ui::form::draw_form_step(frame, area, ctx, "Let's start with the basics", self);
    }
}
