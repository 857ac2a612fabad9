mod basics;
mod confirm;
mod health;

pub use basics::BasicsStep;
pub use confirm::ConfirmStep;
pub use health::HealthStep;

use ratatui::{layout::Rect, Frame};

use super::commit::{CommitOutcome, CommitRunner};
use super::form::Form;
use super::ui::RenderContext;
use crate::store::{FormAnswers, Store};
use crate::wizard::{Navigator, StepDescriptor};

/// Unique identifier for each wizard step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepId {
    Basics,
    Health,
    Confirm,
}

impl StepId {
    pub fn label(&self) -> &'static str {
        match self {
            StepId::Basics => "Basics",
            StepId::Health => "Health",
            StepId::Confirm => "Confirm",
        }
    }
}

/// What happened when the user asked to submit a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The commit operation is running.
    Started,
    /// Required fields are blank; nothing was sent.
    Invalid,
    /// A commit is already in flight.
    Busy,
}

/// Everything the active step may touch while handling input or a commit result.
pub struct StepContext<'a> {
    pub store: &'a mut Store,
    pub nav: Navigator<'a>,
    pub commits: &'a CommitRunner,
}

/// One page of the wizard.
///
/// Only the active step receives input and commit results. A step becomes
/// active through [`Step::activate`], which reloads its fields from the store,
/// and inactive through [`Step::deactivate`], which drops local edits and
/// cancels its commit in flight.
pub trait Step: StepDescriptor {
    fn id(&self) -> StepId;

    fn activate(&mut self, answers: &FormAnswers);

    fn deactivate(&mut self);

    fn is_loading(&self) -> bool;

    fn form(&self) -> Option<&Form> {
        None
    }

    fn form_mut(&mut self) -> Option<&mut Form> {
        None
    }

    /// Whether a previous-step action is offered.
    fn has_previous(&self) -> bool {
        true
    }

    fn submit_label(&self) -> &'static str {
        "Next"
    }

    fn submit(&mut self, ctx: &mut StepContext<'_>) -> SubmitOutcome;

    /// Go back one step. Ignored while a commit is in flight.
    fn previous(&mut self, ctx: &mut StepContext<'_>) -> bool {
        if !self.has_previous() || self.is_loading() {
            return false;
        }
        ctx.nav.previous();
        true
    }

    fn on_commit(&mut self, outcome: CommitOutcome, ctx: &mut StepContext<'_>);

    /// The answers document changed.
    fn answers_changed(&mut self, _answers: &FormAnswers) {}

    fn render(&self, frame: &mut Frame, area: Rect, ctx: &RenderContext<'_>);
}

/// The three steps in wizard order.
pub fn default_steps() -> Vec<Box<dyn Step>> {
    vec![
        Box::new(BasicsStep::new()),
        Box::new(HealthStep::new()),
        Box::new(ConfirmStep::new()),
    ]
}
