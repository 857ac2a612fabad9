use tracing::debug;

/// Anything the controller can hold as a step: it only needs a label.
pub trait StepDescriptor {
    fn label(&self) -> &str;
}

impl StepDescriptor for &str {
    fn label(&self) -> &str {
        self
    }
}

impl StepDescriptor for String {
    fn label(&self) -> &str {
        self.as_str()
    }
}

impl<S: StepDescriptor + ?Sized> StepDescriptor for Box<S> {
    fn label(&self) -> &str {
        (**self).label()
    }
}

/// Visual state of one marker in the step indicator strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerState {
    Completed,
    Active,
    Pending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepMarker {
    pub index: usize,
    pub label: String,
    pub state: MarkerState,
    pub left_divider: bool,
    pub right_divider: bool,
}

/// Navigation handle given to the active step.
///
/// Carries the current position and step count, and applies
/// [`Navigator::set_active_step`] to the controller's position.
pub struct Navigator<'a> {
    position: &'a mut usize,
    step_count: usize,
}

impl Navigator<'_> {
    pub fn active_step_index(&self) -> usize {
        *self.position
    }

    pub fn step_count(&self) -> usize {
        self.step_count
    }

    pub fn set_active_step(&mut self, target: isize) {
        if let Some(next) = resolve_target(target, self.step_count) {
            *self.position = next;
        }
    }

    pub fn next(&mut self) {
        let target = *self.position as isize + 1;
        self.set_active_step(target);
    }

    pub fn previous(&mut self) {
        let target = *self.position as isize - 1;
        self.set_active_step(target);
    }
}

/// Tracks which of an ordered list of steps is active.
///
/// The position is always inside `[0, step_count - 1]`. The controller knows
/// nothing about what a step collects.
pub struct WizardController<S> {
    steps: Vec<S>,
    position: usize,
}

impl<S: StepDescriptor> WizardController<S> {
    pub fn new(steps: Vec<S>) -> Self {
        Self::with_initial(steps, 0)
    }

    /// Start at `initial`, clamped into range.
    pub fn with_initial(steps: Vec<S>, initial: usize) -> Self {
        assert!(!steps.is_empty(), "a wizard needs at least one step");
        let position = initial.min(steps.len() - 1);
        Self { steps, position }
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn active_step_index(&self) -> usize {
        self.position
    }

    pub fn set_active_step(&mut self, target: isize) {
        self.navigator().set_active_step(target);
    }

    /// Re-seat the position from an externally supplied starting index.
    pub fn set_initial(&mut self, initial: usize) {
        self.position = initial.min(self.steps.len() - 1);
    }

    /// Replace the step list. The count is recomputed and the position re-clamped.
    pub fn set_steps(&mut self, steps: Vec<S>) {
        assert!(!steps.is_empty(), "a wizard needs at least one step");
        self.steps = steps;
        self.position = self.position.min(self.steps.len() - 1);
    }

    pub fn navigator(&mut self) -> Navigator<'_> {
        Navigator {
            position: &mut self.position,
            step_count: self.steps.len(),
        }
    }

    pub fn active(&self) -> &S {
        &self.steps[self.position]
    }

    pub fn active_mut(&mut self) -> &mut S {
        &mut self.steps[self.position]
    }

    /// The active step together with a navigator for it.
    pub fn active_with_navigator(&mut self) -> (&mut S, Navigator<'_>) {
        let step_count = self.steps.len();
        let step = &mut self.steps[self.position];
        (
            step,
            Navigator {
                position: &mut self.position,
                step_count,
            },
        )
    }

    pub fn steps(&self) -> &[S] {
        &self.steps
    }

    pub fn steps_mut(&mut self) -> &mut [S] {
        &mut self.steps
    }

    pub fn markers(&self) -> Vec<StepMarker> {
        step_markers(
            self.steps.iter().map(|s| s.label().to_string()),
            self.position,
        )
    }
}

/// Where a `set_active_step(target)` request lands, or `None` if it is ignored.
///
/// Targets at or past the last step clamp to the last step. Negative targets
/// are ignored rather than clamped to the first step.
pub fn resolve_target(target: isize, step_count: usize) -> Option<usize> {
    if step_count == 0 {
        return None;
    }
    let last = step_count - 1;
    if target < 0 {
        debug!("Ignoring navigation to step {target}");
        None
    } else if target as usize >= last {
        Some(last)
    } else {
        Some(target as usize)
    }
}

pub fn step_markers<I>(labels: I, active: usize) -> Vec<StepMarker>
where
    I: IntoIterator<Item = String>,
{
    let labels: Vec<String> = labels.into_iter().collect();
    let count = labels.len();

    labels
        .into_iter()
        .enumerate()
        .map(|(index, label)| StepMarker {
            index,
            label,
            state: match index.cmp(&active) {
                std::cmp::Ordering::Less => MarkerState::Completed,
                std::cmp::Ordering::Equal => MarkerState::Active,
                std::cmp::Ordering::Greater => MarkerState::Pending,
            },
            left_divider: index != 0,
            right_divider: index + 1 != count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wizard(n: usize) -> WizardController<String> {
        WizardController::new((0..n).map(|i| format!("Step {i}")).collect())
    }

    #[test]
    fn starts_at_zero_by_default() {
        let w = wizard(3);
        assert_eq!(w.active_step_index(), 0);
        assert_eq!(w.step_count(), 3);
    }

    #[test]
    fn initial_index_is_clamped() {
        let w = WizardController::with_initial(vec!["a", "b", "c"], 7);
        assert_eq!(w.active_step_index(), 2);
    }

    #[test]
    fn set_active_step_clamps_upper_and_ignores_negative() {
        for n in 1..=6usize {
            for start in 0..n {
                for target in -4isize..(n as isize + 4) {
                    let mut w = wizard(n);
                    w.set_initial(start);
                    w.set_active_step(target);

                    let expected = if target <= -1 {
                        start
                    } else {
                        (target as usize).min(n - 1)
                    };
                    assert_eq!(
                        w.active_step_index(),
                        expected,
                        "n={n} start={start} target={target}"
                    );
                }
            }
        }
    }

    #[test]
    fn navigator_moves_active_position() {
        let mut w = wizard(3);
        {
            let mut nav = w.navigator();
            assert_eq!(nav.step_count(), 3);
            nav.next();
            assert_eq!(nav.active_step_index(), 1);
            nav.next();
            nav.next();
            assert_eq!(nav.active_step_index(), 2);
        }
        assert_eq!(w.active_step_index(), 2);

        let (step, mut nav) = w.active_with_navigator();
        assert_eq!(step.as_str(), "Step 2");
        nav.set_active_step(0);
        assert_eq!(w.active_step_index(), 0);
    }

    #[test]
    fn previous_on_first_step_is_ignored() {
        let mut w = wizard(3);
        w.navigator().previous();
        assert_eq!(w.active_step_index(), 0);
    }

    #[test]
    fn markers_classify_every_step() {
        for n in 1..=6usize {
            for active in 0..n {
                let mut w = wizard(n);
                w.set_initial(active);
                let markers = w.markers();

                assert_eq!(markers.len(), n);
                assert_eq!(
                    markers.iter().filter(|m| m.state == MarkerState::Active).count(),
                    1
                );
                for m in &markers {
                    let expected = if m.index < active {
                        MarkerState::Completed
                    } else if m.index == active {
                        MarkerState::Active
                    } else {
                        MarkerState::Pending
                    };
                    assert_eq!(m.state, expected);
                }
                assert!(!markers[0].left_divider);
                assert!(!markers[n - 1].right_divider);
            }
        }
    }

    #[test]
    fn inner_markers_have_both_dividers() {
        let markers = wizard(3).markers();
        assert!(markers[1].left_divider && markers[1].right_divider);
        assert!(markers[0].right_divider);
        assert!(markers[2].left_divider);
        assert_eq!(markers[1].label, "Step 1");
    }

    #[test]
    fn replacing_steps_reclamps_position() {
        let mut w = wizard(5);
        w.set_active_step(4);
        w.set_steps(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(w.step_count(), 2);
        assert_eq!(w.active_step_index(), 1);
    }

    #[test]
    fn single_step_wizard_stays_put() {
        let mut w = wizard(1);
        w.set_active_step(3);
        assert_eq!(w.active_step_index(), 0);
        let markers = w.markers();
        assert!(!markers[0].left_divider && !markers[0].right_divider);
    }
}
