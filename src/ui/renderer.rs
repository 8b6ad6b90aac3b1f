use chrono::Local;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::core::app::App;
use crate::core::constants::{ASSISTANT_NAME, DISCLAIMER};
use crate::core::message::Message;
use crate::ui::text_wrapping::wrap_words;
use crate::ui::theme::Theme;

const INPUT_PLACEHOLDER: &str = "Share your thoughts...";

/// Screen regions, top to bottom.
struct ScreenAreas {
    title: Rect,
    transcript: Rect,
    input: Rect,
    disclaimer: Rect,
}

fn screen_areas(area: Rect) -> ScreenAreas {
    let disclaimer_rows = u16::try_from(wrap_words(DISCLAIMER, usize::from(area.width)).len())
        .unwrap_or(u16::MAX);
    let [title, transcript, input, disclaimer] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(3),
            Constraint::Length(disclaimer_rows),
        ])
        .areas(area);
    ScreenAreas {
        title,
        transcript,
        input,
        disclaimer,
    }
}

pub fn ui(f: &mut Frame, app: &App, theme: &Theme) {
    let areas = screen_areas(f.area());

    f.render_widget(
        Paragraph::new(title_text(app)).style(theme.title_style),
        areas.title,
    );

    render_transcript(f, app, theme, areas.transcript);
    render_input(f, app, theme, areas.input);

    let disclaimer: Vec<Line> = wrap_words(DISCLAIMER, usize::from(areas.disclaimer.width))
        .into_iter()
        .map(Line::from)
        .collect();
    f.render_widget(
        Paragraph::new(disclaimer).style(theme.disclaimer_style),
        areas.disclaimer,
    );

    if app.controller.selector_open() {
        render_model_picker(f, app, theme);
    }
}

fn title_text(app: &App) -> String {
    if app.controller.model_switch().in_progress() {
        format!(" {ASSISTANT_NAME} • Switching...")
    } else {
        format!(
            " {ASSISTANT_NAME} • {}  (Tab: models)",
            app.controller.current_model()
        )
    }
}

fn format_time(message: &Message) -> String {
    message
        .timestamp()
        .with_timezone(&Local)
        .format("%H:%M")
        .to_string()
}

fn push_wrapped(lines: &mut Vec<Line<'static>>, text: &str, width: u16, style: Style) {
    for row in wrap_words(text, usize::from(width)) {
        lines.push(Line::from(Span::styled(row, style)));
    }
}

/// Transcript rows wrapped to `width`, plus the thinking row while a reply is
/// pending. Each returned line occupies exactly one screen row.
pub fn build_display_lines(app: &App, theme: &Theme, width: u16) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    for message in app.transcript.messages() {
        if message.is_user() {
            lines.push(Line::from(vec![
                Span::styled("You", theme.user_prefix_style),
                Span::styled(format!(" · {}", format_time(message)), theme.meta_style),
            ]));
            push_wrapped(&mut lines, message.content(), width, theme.user_text_style);
        } else {
            let mut header = vec![Span::styled(ASSISTANT_NAME, theme.assistant_name_style)];
            if let Some(model) = message.model() {
                header.push(Span::styled(format!(" · {model}"), theme.meta_style));
            }
            header.push(Span::styled(
                format!(" · {}", format_time(message)),
                theme.meta_style,
            ));
            lines.push(Line::from(header));
            push_wrapped(
                &mut lines,
                message.content(),
                width,
                theme.assistant_text_style,
            );
        }
        lines.push(Line::from(""));
    }

    if app.transcript.is_pending() {
        push_wrapped(
            &mut lines,
            &format!("{ASSISTANT_NAME} is thinking..."),
            width,
            theme.thinking_style,
        );
    }

    lines
}

fn max_scroll_for(line_count: usize, area: Rect) -> u16 {
    u16::try_from(line_count)
        .unwrap_or(u16::MAX)
        .saturating_sub(area.height)
}

/// Largest useful scroll offset for a frame of size `area`.
pub fn transcript_max_scroll(app: &App, theme: &Theme, area: Rect) -> u16 {
    let transcript = screen_areas(area).transcript;
    max_scroll_for(
        build_display_lines(app, theme, transcript.width).len(),
        transcript,
    )
}

fn render_transcript(f: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let lines = build_display_lines(app, theme, area.width);
    let max_top = max_scroll_for(lines.len(), area);
    let top = max_top.saturating_sub(app.scroll_offset.min(max_top));

    f.render_widget(Paragraph::new(lines).scroll((top, 0)), area);
}

fn render_input(f: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let title = match (&app.status, app.input_locked()) {
        (Some(status), _) => format!("{INPUT_PLACEHOLDER} ({status})"),
        (None, true) => format!("{INPUT_PLACEHOLDER} (waiting...)"),
        (None, false) => format!("{INPUT_PLACEHOLDER} (Enter to send, Ctrl+C to quit)"),
    };

    let input = Paragraph::new(app.input.as_str())
        .style(theme.input_text_style)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.input_border_style)
                .title(title),
        );
    f.render_widget(input, area);

    if !app.controller.selector_open() {
        let inner_width = area.width.saturating_sub(2);
        let cursor = u16::try_from(app.input.width())
            .unwrap_or(u16::MAX)
            .min(inner_width.saturating_sub(1));
        f.set_cursor_position((area.x + 1 + cursor, area.y + 1));
    }
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn render_model_picker(f: &mut Frame, app: &App, theme: &Theme) {
    let Some(picker) = app.picker.as_ref() else {
        return;
    };
    let error = app.controller.model_switch().last_error();

    let rows = picker.items.len().max(1) + usize::from(error.is_some());
    let height = u16::try_from(rows + 2).unwrap_or(u16::MAX);
    let area = centered_rect(48, height, f.area());
    f.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(picker.title.clone());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let (list_area, error_area) = if error.is_some() {
        let split = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(inner);
        (split[0], Some(split[1]))
    } else {
        (inner, None)
    };

    if picker.items.is_empty() {
        f.render_widget(
            Paragraph::new("No models available").style(theme.meta_style),
            list_area,
        );
    } else {
        let current = app.controller.current_model();
        let items: Vec<ListItem> = picker
            .items
            .iter()
            .map(|item| {
                let mut spans = vec![Span::raw(item.label.clone())];
                if item.id == current {
                    spans.push(Span::styled("  Current", theme.picker_badge_style));
                }
                ListItem::new(Line::from(spans))
            })
            .collect();
        let mut state = ListState::default().with_selected(Some(picker.selected));
        f.render_stateful_widget(
            List::new(items).highlight_style(theme.picker_selected_style),
            list_area,
            &mut state,
        );
    }

    if let (Some(message), Some(area)) = (error, error_area) {
        f.render_widget(Paragraph::new(message).style(theme.error_style), area);
    }
}
