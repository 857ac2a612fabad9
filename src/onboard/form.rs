//! Field boxes shared by the form steps.
//!
//! A box has a title and either one or more text inputs laid out side by side
//! (e.g. date of birth) or a two-way choice. Text boxes are required: a blank
//! input flags the whole box once the form has been submitted.

use crate::vim::InputBuffer;

pub const REQUIRED_MESSAGE: &str = "This is required.";

pub struct TextInput {
    pub name: &'static str,
    pub placeholder: &'static str,
    pub buffer: InputBuffer,
}

impl TextInput {
    pub fn new(name: &'static str, placeholder: &'static str, buffer: InputBuffer) -> Self {
        Self {
            name,
            placeholder,
            buffer,
        }
    }
}

pub enum FieldKind {
    Text(Vec<TextInput>),
    Choice {
        name: &'static str,
        options: [&'static str; 2],
        selected: usize,
    },
}

pub struct FieldBox {
    pub title: &'static str,
    pub kind: FieldKind,
    pub error: bool,
}

impl FieldBox {
    pub fn text(title: &'static str, inputs: Vec<TextInput>) -> Self {
        Self {
            title,
            kind: FieldKind::Text(inputs),
            error: false,
        }
    }

    pub fn choice(title: &'static str, name: &'static str, options: [&'static str; 2]) -> Self {
        Self {
            title,
            kind: FieldKind::Choice {
                name,
                options,
                selected: 0,
            },
            error: false,
        }
    }

    fn has_empty_input(&self) -> bool {
        match &self.kind {
            FieldKind::Text(inputs) => inputs.iter().any(|i| i.buffer.is_empty()),
            FieldKind::Choice { .. } => false,
        }
    }

    fn slot_count(&self) -> usize {
        match &self.kind {
            FieldKind::Text(inputs) => inputs.len(),
            FieldKind::Choice { .. } => 1,
        }
    }
}

/// Focus position: box index and input index within the box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FieldFocus {
    pub field: usize,
    pub input: usize,
}

pub struct Form {
    boxes: Vec<FieldBox>,
    focus: FieldFocus,
    submitted: bool,
}

impl Form {
    pub fn new(boxes: Vec<FieldBox>) -> Self {
        Self {
            boxes,
            focus: FieldFocus::default(),
            submitted: false,
        }
    }

    pub fn boxes(&self) -> &[FieldBox] {
        &self.boxes
    }

    pub fn focus(&self) -> FieldFocus {
        self.focus
    }

    pub fn focus_first(&mut self) {
        self.focus = FieldFocus::default();
    }

    pub fn focus_next(&mut self) {
        let Some(current) = self.boxes.get(self.focus.field) else {
            return;
        };
        if self.focus.input + 1 < current.slot_count() {
            self.focus.input += 1;
        } else if self.focus.field + 1 < self.boxes.len() {
            self.focus = FieldFocus {
                field: self.focus.field + 1,
                input: 0,
            };
        }
    }

    pub fn focus_prev(&mut self) {
        if self.focus.input > 0 {
            self.focus.input -= 1;
        } else if self.focus.field > 0 {
            let field = self.focus.field - 1;
            let input = self.boxes[field].slot_count().saturating_sub(1);
            self.focus = FieldFocus { field, input };
        }
    }

    /// Whether focus sits on the last text input of the form.
    pub fn is_on_last_text_input(&self) -> bool {
        let last = self.boxes.iter().enumerate().rev().find_map(|(i, b)| match &b.kind {
            FieldKind::Text(inputs) if !inputs.is_empty() => Some(FieldFocus {
                field: i,
                input: inputs.len() - 1,
            }),
            _ => None,
        });
        last == Some(self.focus)
    }

    pub fn is_text_focused(&self) -> bool {
        matches!(
            self.boxes.get(self.focus.field).map(|b| &b.kind),
            Some(FieldKind::Text(_))
        )
    }

    pub fn focused_buffer_mut(&mut self) -> Option<&mut InputBuffer> {
        let focus = self.focus;
        match &mut self.boxes.get_mut(focus.field)?.kind {
            FieldKind::Text(inputs) => inputs.get_mut(focus.input).map(|i| &mut i.buffer),
            FieldKind::Choice { .. } => None,
        }
    }

    /// Flip the focused choice. Returns false if focus is not on a choice.
    pub fn toggle_focused_choice(&mut self) -> bool {
        let focus = self.focus;
        match self.boxes.get_mut(focus.field).map(|b| &mut b.kind) {
            Some(FieldKind::Choice { selected, .. }) => {
                *selected = 1 - *selected;
                true
            }
            _ => false,
        }
    }

    pub fn text(&self, name: &str) -> &str {
        self.find_input(name).map(|i| i.buffer.content()).unwrap_or("")
    }

    pub fn set_text(&mut self, name: &str, value: &str) {
        if let Some(input) = self.find_input_mut(name) {
            input.buffer.set(value);
        }
    }

    pub fn choice(&self, name: &str) -> usize {
        self.boxes
            .iter()
            .find_map(|b| match &b.kind {
                FieldKind::Choice {
                    name: n, selected, ..
                } if *n == name => Some(*selected),
                _ => None,
            })
            .unwrap_or(0)
    }

    pub fn set_choice(&mut self, name: &str, index: usize) {
        for b in &mut self.boxes {
            if let FieldKind::Choice {
                name: n, selected, ..
            } = &mut b.kind
            {
                if *n == name {
                    *selected = index.min(1);
                }
            }
        }
    }

    /// Flag every text box with a blank input. Returns true if none are blank.
    pub fn validate(&mut self) -> bool {
        self.submitted = true;
        self.refresh_errors();
        self.boxes.iter().all(|b| !b.error)
    }

    /// After a failed submit, clear errors as the user fills boxes in.
    pub fn revalidate(&mut self) {
        if self.submitted {
            self.refresh_errors();
        }
    }

    pub fn reset_errors(&mut self) {
        self.submitted = false;
        for b in &mut self.boxes {
            b.error = false;
        }
    }

    pub fn has_errors(&self) -> bool {
        self.boxes.iter().any(|b| b.error)
    }

    fn refresh_errors(&mut self) {
        for b in &mut self.boxes {
            b.error = b.has_empty_input();
        }
    }

    fn find_input(&self, name: &str) -> Option<&TextInput> {
        self.boxes.iter().find_map(|b| match &b.kind {
            FieldKind::Text(inputs) => inputs.iter().find(|i| i.name == name),
            FieldKind::Choice { .. } => None,
        })
    }

    fn find_input_mut(&mut self, name: &str) -> Option<&mut TextInput> {
        self.boxes.iter_mut().find_map(|b| match &mut b.kind {
            FieldKind::Text(inputs) => inputs.iter_mut().find(|i| i.name == name),
            FieldKind::Choice { .. } => None,
        })
    }
}
