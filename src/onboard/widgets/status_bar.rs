use crate::vim::VimMode;

/// Hints shown beside the mode indicator in the status bar.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusBarState {
    /// Left side hint text (e.g., "i: edit  j/k: fields")
    pub left_hint: String,
    /// Right side hint text (e.g., "Enter: next  b: back")
    pub right_hint: String,
}

impl StatusBarState {
    /// Pick hints for the current mode and step.
    pub fn for_step(mode: VimMode, has_form: bool, has_previous: bool, loading: bool) -> Self {
        if loading {
            return Self::loading();
        }
        match mode {
            VimMode::Command => Self::command_mode(),
            VimMode::Insert => Self::form_insert(),
            VimMode::Normal if has_form => Self::form_normal(has_previous),
            VimMode::Normal => Self::confirm_step(),
        }
    }

    pub fn form_normal(has_previous: bool) -> Self {
        let right_hint = if has_previous {
            "Enter: next  b: back  ?: help"
        } else {
            "Enter: next  ?: help"
        };
        Self {
            left_hint: "j/k: fields  i: edit  Space: toggle".to_string(),
            right_hint: right_hint.to_string(),
        }
    }

    pub fn form_insert() -> Self {
        Self {
            left_hint: "Type to enter text".to_string(),
            right_hint: "Esc: normal  Tab: next field".to_string(),
        }
    }

    pub fn command_mode() -> Self {
        Self {
            left_hint: String::new(),
            right_hint: "Enter: run  Esc: cancel".to_string(),
        }
    }

    /// Hints for the summary step
    pub fn confirm_step() -> Self {
        Self {
            left_hint: "Review your details".to_string(),
            right_hint: "Enter: submit  b: back".to_string(),
        }
    }

    pub fn loading() -> Self {
        Self {
            left_hint: "Please wait...".to_string(),
            right_hint: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loading_wins_over_mode() {
        assert_eq!(
            StatusBarState::for_step(VimMode::Insert, true, true, true),
            StatusBarState::loading()
        );
    }

    #[test]
    fn first_step_hides_back_hint() {
        let hints = StatusBarState::for_step(VimMode::Normal, true, false, false);
        assert!(!hints.right_hint.contains("back"));
        let hints = StatusBarState::for_step(VimMode::Normal, false, true, false);
        assert_eq!(hints, StatusBarState::confirm_step());
    }
}
