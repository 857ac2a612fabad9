use ratatui::{prelude::*, widgets::Paragraph};

use crate::ui::Theme;
use crate::wizard::{MarkerState, StepMarker};

/// Step indicator strip: a row of markers joined by dividers, labels beneath.
pub fn draw_progress(frame: &mut Frame, area: Rect, theme: &Theme, markers: &[StepMarker]) {
    if markers.is_empty() || area.height < 2 {
        return;
    }

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Ratio(1, markers.len() as u32); markers.len()])
        .split(area);

    for (marker, column) in markers.iter().zip(columns.iter()) {
        draw_marker(frame, *column, theme, marker);
    }
}

fn draw_marker(frame: &mut Frame, area: Rect, theme: &Theme, marker: &StepMarker) {
    let width = area.width as usize;
    if width == 0 {
        return;
    }
    let mid = width / 2;
    let (glyph, glyph_style) = theme.marker(marker.state);

    let left = if marker.left_divider { "─" } else { " " };
    let right = if marker.right_divider { "─" } else { " " };

    let line = Line::from(vec![
        Span::styled(
            left.repeat(mid.saturating_sub(1)) + " ",
            theme.divider_style(marker.state != MarkerState::Pending),
        ),
        Span::styled(glyph, glyph_style),
        Span::styled(
            " ".to_string() + &right.repeat(width.saturating_sub(mid + 2)),
            theme.divider_style(marker.state == MarkerState::Completed),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), Rect::new(area.x, area.y, area.width, 1));

    frame.render_widget(
        Paragraph::new(marker.label.as_str())
            .style(theme.marker_label_style(marker.state))
            .alignment(Alignment::Center),
        Rect::new(area.x, area.y + 1, area.width, 1),
    );
}
