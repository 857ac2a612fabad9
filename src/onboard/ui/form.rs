use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph},
};

use super::RenderContext;
use crate::onboard::form::{FieldBox, FieldKind, TextInput, REQUIRED_MESSAGE};
use crate::onboard::steps::Step;
use crate::vim::VimMode;

const BOX_HEIGHT: u16 = 3;

/// Draw a step made of field boxes with its buttons underneath.
pub fn draw_form_step(
    frame: &mut Frame,
    area: Rect,
    ctx: &RenderContext<'_>,
    title: &str,
    step: &dyn Step,
) {
    let theme = ctx.theme;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style())
        .title(format!(" {title} "))
        .title_style(theme.primary_style().add_modifier(Modifier::BOLD));

    let inner = block.inner(area);
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    let Some(form) = step.form() else {
        return;
    };
    if inner.height < 2 || inner.width < 20 {
        return;
    }

    let focus = form.focus();
    let bottom = inner.y + inner.height - 1; // Reserved for the buttons
    let mut y = inner.y;

    for (idx, field) in form.boxes().iter().enumerate() {
        if y + BOX_HEIGHT > bottom {
            break;
        }
        let focused_input = (focus.field == idx).then_some(focus.input);
        draw_box(
            frame,
            Rect::new(inner.x + 1, y, inner.width.saturating_sub(2), BOX_HEIGHT),
            ctx,
            field,
            focused_input,
        );
        y += BOX_HEIGHT;
    }

    super::draw_buttons(frame, inner, ctx, step);
}

fn draw_box(
    frame: &mut Frame,
    area: Rect,
    ctx: &RenderContext<'_>,
    field: &FieldBox,
    focused_input: Option<usize>,
) {
    let theme = ctx.theme;
    let border_style = if field.error {
        theme.error_style()
    } else if focused_input.is_some() {
        theme.primary_style()
    } else {
        theme.border_style()
    };

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(format!(" {} ", field.title));
    if field.error {
        block = block.title_bottom(Line::styled(
            format!(" {REQUIRED_MESSAGE} "),
            theme.error_style(),
        ));
    }

    let inner = block.inner(area);
    frame.render_widget(block, area);

    match &field.kind {
        FieldKind::Text(inputs) => {
            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints(vec![Constraint::Ratio(1, inputs.len() as u32); inputs.len()])
                .split(inner);
            for (i, (input, column)) in inputs.iter().zip(columns.iter()).enumerate() {
                let line = input_line(ctx, input, focused_input == Some(i));
                frame.render_widget(Paragraph::new(line), *column);
            }
        }
        FieldKind::Choice {
            options, selected, ..
        } => {
            let focused = focused_input.is_some();
            let mut spans = Vec::new();
            for (i, option) in options.iter().enumerate() {
                let style = if i == *selected && focused {
                    theme.primary_style().add_modifier(Modifier::BOLD | Modifier::REVERSED)
                } else if i == *selected {
                    theme.secondary_style().add_modifier(Modifier::REVERSED)
                } else {
                    theme.muted_style()
                };
                let mark = if i == *selected { "(•)" } else { "( )" };
                spans.push(Span::styled(format!(" {mark} {option} "), style));
                spans.push(Span::raw("  "));
            }
            frame.render_widget(Paragraph::new(Line::from(spans)), inner);
        }
    }
}

/// One text input, with a bar cursor in insert mode and a block cursor in normal mode.
fn input_line<'a>(ctx: &RenderContext<'_>, input: &'a TextInput, focused: bool) -> Line<'a> {
    let theme = ctx.theme;
    let content = input.buffer.content();
    let cursor = input.buffer.cursor();

    if focused && ctx.mode == VimMode::Insert {
        let before: String = content.chars().take(cursor).collect();
        let after: String = content.chars().skip(cursor).collect();
        Line::from(vec![
            Span::styled(before, theme.style()),
            Span::styled("|", theme.primary_style().add_modifier(Modifier::BOLD)),
            Span::styled(after, theme.style()),
        ])
    } else if focused {
        let mut spans: Vec<Span> = content
            .chars()
            .enumerate()
            .map(|(i, ch)| {
                let style = if i == cursor {
                    theme.style().add_modifier(Modifier::REVERSED)
                } else {
                    theme.style()
                };
                Span::styled(ch.to_string(), style)
            })
            .collect();
        if cursor >= content.chars().count() {
            spans.push(Span::styled(" ", theme.style().add_modifier(Modifier::REVERSED)));
        }
        Line::from(spans)
    } else if content.is_empty() {
        Line::styled(input.placeholder, theme.muted_style())
    } else {
        Line::styled(content, theme.style())
    }
}
