pub mod confirm;
pub mod form;
mod progress;

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use super::steps::Step;
use super::WizardApp;
use crate::ui::{Layout as ScreenLayout, Theme};
use crate::vim::VimMode;

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// What a step needs from the shell to draw itself.
pub struct RenderContext<'a> {
    pub theme: &'a Theme,
    pub mode: VimMode,
    pub spinner: &'static str,
}

pub fn spinner_frame(tick: usize) -> &'static str {
    SPINNER_FRAMES[tick % SPINNER_FRAMES.len()]
}

/// Main draw function for the wizard
pub fn draw(frame: &mut Frame, app: &WizardApp) {
    let layout = ScreenLayout::new(frame.area());
    frame.render_widget(Clear, layout.full);

    draw_header(frame, layout.header, app);
    progress::draw_progress(frame, layout.progress, &app.theme, &app.wizard.markers());

    let ctx = RenderContext {
        theme: &app.theme,
        mode: app.vim_mode,
        spinner: spinner_frame(app.spinner_tick),
    };
    app.wizard.active().render(frame, layout.content, &ctx);

    draw_message(frame, layout.message, app);
    draw_status_bar(frame, layout.status, app);

    // Overlays
    if app.confirm_quit {
        draw_quit_dialog(frame, app);
    }

    if app.show_help {
        draw_help(frame, app);
    }
}

/// Header bar (1 line, no borders)
fn draw_header(frame: &mut Frame, area: Rect, app: &WizardApp) {
    let title = format!(" {} (v{}) ", app.config.general.title, env!("CARGO_PKG_VERSION"));
    frame.render_widget(
        Paragraph::new(title).style(app.theme.primary_style().add_modifier(Modifier::BOLD)),
        area,
    );

    let saved = match app.store.last_saved() {
        Some(at) => format!("Saved {} ", at.format("%H:%M:%S")),
        None => format!("{} ", app.config.general.subtitle),
    };
    frame.render_widget(
        Paragraph::new(saved)
            .style(app.theme.muted_style())
            .alignment(Alignment::Right),
        area,
    );
}

fn draw_message(frame: &mut Frame, area: Rect, app: &WizardApp) {
    // Only draw when there's a message; the space stays reserved
    let Some(msg) = &app.message else {
        return;
    };

    let (title, border_style, text_style) = if msg.is_error {
        (" Error ", app.theme.error_style(), app.theme.error_style())
    } else {
        (" Info ", app.theme.secondary_style(), app.theme.style())
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(title)
        .title_style(border_style.add_modifier(Modifier::BOLD));

    let paragraph = Paragraph::new(Line::from(Span::styled(msg.text.as_str(), text_style)))
        .block(block)
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}

fn draw_status_bar(frame: &mut Frame, area: Rect, app: &WizardApp) {
    let mode_name = app.vim_mode.display_name();
    let mode_span = Span::styled(format!(" {mode_name} "), app.theme.mode_style(app.vim_mode));

    // Command buffer in command mode, otherwise the left hint
    let after_mode = if app.vim_mode == VimMode::Command {
        Span::styled(format!(":{}", app.command_buffer.content()), app.theme.style())
    } else {
        Span::styled(app.status_bar.left_hint.clone(), app.theme.muted_style())
    };

    let left_line = Line::from(vec![mode_span, Span::raw(" "), after_mode]);
    frame.render_widget(
        Paragraph::new(left_line),
        Rect::new(area.x, area.y, area.width * 2 / 3, 1),
    );

    let position = format!(
        "{}/{}",
        app.wizard.active_step_index() + 1,
        app.wizard.step_count()
    );
    let right_text = if app.status_bar.right_hint.is_empty() {
        position
    } else {
        format!("{}  {position} ", app.status_bar.right_hint)
    };

    frame.render_widget(
        Paragraph::new(right_text)
            .style(app.theme.muted_style())
            .alignment(Alignment::Right),
        Rect::new(area.x + area.width / 3, area.y, area.width - area.width / 3, 1),
    );
}

fn draw_quit_dialog(frame: &mut Frame, app: &WizardApp) {
    let area = ScreenLayout::centered_box(frame.area(), 44, 7);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.primary_style())
        .title(" Quit ");

    let inner = block.inner(area);
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);
    if inner.height < 4 {
        return;
    }

    frame.render_widget(
        Paragraph::new("Quit? Saved answers are kept.")
            .style(app.theme.style().add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center),
        Rect::new(inner.x, inner.y + 1, inner.width, 1),
    );

    let hints = Line::from(vec![
        Span::styled("[", app.theme.style()),
        Span::styled("Y", app.theme.primary_style().add_modifier(Modifier::BOLD)),
        Span::styled("]es / [", app.theme.style()),
        Span::styled("N", app.theme.primary_style().add_modifier(Modifier::BOLD)),
        Span::styled("]o", app.theme.style()),
    ]);

    frame.render_widget(
        Paragraph::new(hints).alignment(Alignment::Center),
        Rect::new(inner.x, inner.y + 3, inner.width, 1),
    );
}

fn draw_help(frame: &mut Frame, app: &WizardApp) {
    let area = ScreenLayout::centered_box(frame.area(), 60, 22);

    let help_text = [
        "",
        "Normal mode:",
        "",
        "  j/k, Tab       Move between fields",
        "  i/a            Edit the focused field",
        "  h/l, Space     Toggle a choice",
        "  Enter/n        Next / Submit",
        "  b/p            Previous step",
        "  q              Quit",
        "",
        "Insert mode:",
        "",
        "  Tab/Enter      Next field",
        "  Ctrl+u         Clear field",
        "  Esc            Return to normal",
        "",
        "Commands: :next :prev :clear :help :quit",
        "",
        "Press q or Esc to close",
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.border_style())
        .title(" Help ");

    let inner = block.inner(area);
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    for (i, line) in help_text.iter().enumerate() {
        if i as u16 >= inner.height {
            break;
        }
        frame.render_widget(
            Paragraph::new(*line).style(app.theme.style()),
            Rect::new(inner.x, inner.y + i as u16, inner.width, 1),
        );
    }
}

/// Submit and previous buttons on the last row of `area`.
pub(crate) fn draw_buttons(
    frame: &mut Frame,
    area: Rect,
    ctx: &RenderContext<'_>,
    step: &dyn Step,
) {
    let y = area.y + area.height.saturating_sub(1);
    let theme = ctx.theme;

    let submit = if step.is_loading() {
        Span::styled(format!(" {} Saving... ", ctx.spinner), theme.secondary_style())
    } else {
        Span::styled(
            format!(" [Enter] {} ", step.submit_label()),
            theme.primary_style().add_modifier(Modifier::BOLD | Modifier::REVERSED),
        )
    };

    let mut spans = Vec::new();
    if step.has_previous() {
        let style = if step.is_loading() {
            theme.muted_style()
        } else {
            theme.style().add_modifier(Modifier::REVERSED)
        };
        spans.push(Span::styled(" [b] Previous ", style));
        spans.push(Span::raw("  "));
    }
    spans.push(submit);

    frame.render_widget(
        Paragraph::new(Line::from(spans)).alignment(Alignment::Right),
        Rect::new(area.x + 1, y, area.width.saturating_sub(2), 1),
    );
}
