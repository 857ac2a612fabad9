use ratatui::{layout::Rect, Frame};
use tracing::{debug, info, warn};

use super::{Step, StepContext, StepId, SubmitOutcome};
use crate::onboard::commit::{CommitOutcome, CommitPayload, CommitState};
use crate::onboard::ui::{self, RenderContext};
use crate::store::{selectors, Action, FormAnswers};
use crate::wizard::StepDescriptor;

/// Read-only summary of everything collected, with a final Submit.
pub struct ConfirmStep {
    summary: FormAnswers,
    commit: CommitState,
}

impl ConfirmStep {
    pub fn new() -> Self {
        Self {
            summary: FormAnswers::default(),
            commit: CommitState::default(),
        }
    }

    /// Label/value rows in display order.
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        let s = &self.summary;
        vec![
            ("Full Name", format!("{} {}", s.first_name, s.last_name).trim().to_string()),
            (
                "Gender",
                s.gender
                    .map(|g| g.display_name())
                    .unwrap_or("Not specified")
                    .to_string(),
            ),
            (
                "Date of Birth",
                format!("{} / {} / {}", s.dob.date, s.dob.month, s.dob.year),
            ),
            (
                "Height",
                format!("{} ft. {} in.", s.height.feet, s.height.inches),
            ),
            ("Weight", format!("{} Kgs", s.weight)),
            (
                "Tobacco Consumption",
                if s.tobacco { "Yes" } else { "No" }.to_string(),
            ),
        ]
    }
}

impl Default for ConfirmStep {
    fn default() -> Self {
        Self::new()
    }
}

impl StepDescriptor for ConfirmStep {
    fn label(&self) -> &str {
        StepId::Confirm.label()
    }
}

impl Step for ConfirmStep {
    fn id(&self) -> StepId {
        StepId::Confirm
    }

    fn activate(&mut self, answers: &FormAnswers) {
        self.summary = selectors::full_view(answers);
    }

    fn deactivate(&mut self) {
        self.commit.cancel();
    }

    fn is_loading(&self) -> bool {
        self.commit.is_loading()
    }

    fn submit_label(&self) -> &'static str {
        "Submit"
    }

    fn submit(&mut self, ctx: &mut StepContext<'_>) -> SubmitOutcome {
        if self.is_loading() {
            return SubmitOutcome::Busy;
        }
        ctx.commits
            .start(StepId::Confirm, CommitPayload::Confirmation, &mut self.commit);
        SubmitOutcome::Started
    }

    fn on_commit(&mut self, outcome: CommitOutcome, ctx: &mut StepContext<'_>) {
        if !self.commit.finish(outcome.ticket) {
            debug!("Ignoring stale commit #{}", outcome.ticket);
            return;
        }
        match outcome.result {
            Ok(CommitPayload::Confirmation) => {
                info!("Profile submitted, starting over");
                ctx.store.dispatch(Action::Clear);
                ctx.nav.set_active_step(0);
            }
            Ok(other) => warn!("Confirm commit resolved with unexpected payload {other:?}"),
            Err(_) => {}
        }
    }

    fn answers_changed(&mut self, answers: &FormAnswers) {
        self.summary = selectors::full_view(answers);
    }

    fn render(&self, frame: &mut Frame, area: Rect, ctx: &RenderContext<'_>) {
        ui::confirm::draw_confirm(frame, area, ctx, self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::onboard::steps::test_support::Harness;
    use crate::store::{BasicsData, Gender, HealthData};

    fn filled() -> FormAnswers {
        let mut answers = FormAnswers::default();
        answers.first_name = "Jo".to_string();
        answers.last_name = "Ng".to_string();
        answers.gender = Some(Gender::Female);
        answers.dob.date = "1".to_string();
        answers.dob.month = "2".to_string();
        answers.dob.year = "1990".to_string();
        answers.height.feet = "5".to_string();
        answers.height.inches = "6".to_string();
        answers.weight = "60".to_string();
        answers
    }

    #[test]
    fn rows_format_the_summary() {
        let mut step = ConfirmStep::new();
        step.activate(&filled());
        let rows = step.rows();
        assert_eq!(rows[0], ("Full Name", "Jo Ng".to_string()));
        assert_eq!(rows[1], ("Gender", "Female".to_string()));
        assert_eq!(rows[2], ("Date of Birth", "1 / 2 / 1990".to_string()));
        assert_eq!(rows[3], ("Height", "5 ft. 6 in.".to_string()));
        assert_eq!(rows[4], ("Weight", "60 Kgs".to_string()));
        assert_eq!(rows[5], ("Tobacco Consumption", "No".to_string()));
    }

    #[test]
    fn unset_gender_reads_not_specified() {
        let mut step = ConfirmStep::new();
        step.activate(&FormAnswers::default());
        assert_eq!(step.rows()[1].1, "Not specified");
    }

    #[test]
    fn summary_follows_store_changes() {
        let mut step = ConfirmStep::new();
        step.activate(&FormAnswers::default());
        step.answers_changed(&filled());
        assert_eq!(step.rows()[0].1, "Jo Ng");
    }

    #[tokio::test]
    async fn submit_clears_store_and_restarts() {
        let mut harness = Harness::new();
        harness.store.dispatch(Action::AddBasics(BasicsData {
            first_name: "Jo".to_string(),
            ..BasicsData::default()
        }));
        harness.store.dispatch(Action::AddHealth(HealthData {
            weight: "60".to_string(),
            ..HealthData::default()
        }));
        harness.wizard.set_active_step(2);

        let mut step = ConfirmStep::new();
        step.activate(harness.store.state());
        assert_eq!(step.submit(&mut harness.context()), SubmitOutcome::Started);
        let outcome = harness.next_outcome().await;
        step.on_commit(outcome, &mut harness.context());

        assert_eq!(harness.position(), 0);
        assert_eq!(harness.store.state(), &FormAnswers::default());
    }
}
