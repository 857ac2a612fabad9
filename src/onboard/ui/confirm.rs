use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph},
};

use super::RenderContext;
use crate::onboard::steps::ConfirmStep;

const LABEL_WIDTH: u16 = 22;

pub fn draw_confirm(frame: &mut Frame, area: Rect, ctx: &RenderContext<'_>, step: &ConfirmStep) {
    let theme = ctx.theme;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style())
        .title(" Confirm your details ")
        .title_style(theme.primary_style().add_modifier(Modifier::BOLD));

    let inner = block.inner(area);
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);
    if inner.height < 2 || inner.width < LABEL_WIDTH + 4 {
        return;
    }

    let bottom = inner.y + inner.height - 1;
    let mut y = inner.y + 1;
    for (label, value) in step.rows() {
        if y >= bottom {
            break;
        }
        let line = Line::from(vec![
            Span::styled(
                format!("{label:<width$}", width = LABEL_WIDTH as usize),
                theme.muted_style(),
            ),
            Span::styled(value, theme.style().add_modifier(Modifier::BOLD)),
        ]);
        frame.render_widget(
            Paragraph::new(line),
            Rect::new(inner.x + 2, y, inner.width - 4, 1),
        );
        y += 2;
    }

    super::draw_buttons(frame, inner, ctx, step);
}
