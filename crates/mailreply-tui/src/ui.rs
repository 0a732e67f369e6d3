use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
};
use mailreply_core::{RequestStatus, Tone};
use crate::app::{cursor_line_col, App, FocusPane, InputMode};

/// Colours for every widget. Passed down by reference; rendering never
/// mutates it.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub accent: Color,
    pub secondary: Color,
    pub muted: Color,
    pub error: Color,
    pub success: Color,
    pub key: Style,
    pub label: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            accent: Color::Rgb(0, 188, 212),
            secondary: Color::Rgb(103, 58, 183),
            muted: Color::DarkGray,
            error: Color::LightRed,
            success: Color::Green,
            // Key style: dark background with bright text for visibility on both light/dark terminals
            key: Style::default().bg(Color::DarkGray).fg(Color::White),
            label: Style::default().bg(Color::Black).fg(Color::White),
        }
    }
}

/// Wrap text to fit within a given width, returning multiple lines
/// Uses word boundaries for wrapping (doesn't break mid-word)
fn wrap_text_to_width(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut current_line = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();

        if current_len == 0 {
            current_line = word.to_string();
            current_len = word_len;
        } else if current_len + 1 + word_len <= width {
            current_line.push(' ');
            current_line.push_str(word);
            current_len += 1 + word_len;
        } else {
            lines.push(std::mem::take(&mut current_line));
            current_line = word.to_string();
            current_len = word_len;
        }
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}

/// Word-wrap every paragraph of a multi-line reply, keeping blank lines.
fn wrap_reply(text: &str, width: usize) -> Vec<String> {
    text.lines()
        .flat_map(|line| wrap_text_to_width(line, width))
        .collect()
}

/// Hard-wrap the email at exactly `width` chars so the cursor can be mapped
/// onto the screen. Returns the rows and the cursor's (row, col).
fn wrap_editor(text: &str, cursor: usize, width: usize) -> (Vec<String>, (usize, usize)) {
    let width = width.max(1);
    let (cursor_line, cursor_col) = cursor_line_col(text, cursor);

    let mut rows = Vec::new();
    let mut cursor_pos = (0, 0);

    for (i, line) in text.split('\n').enumerate() {
        let chars: Vec<char> = line.chars().collect();
        if i == cursor_line {
            cursor_pos = (rows.len() + cursor_col / width, cursor_col % width);
        }
        if chars.is_empty() {
            rows.push(String::new());
        } else {
            rows.extend(chars.chunks(width).map(|chunk| chunk.iter().collect::<String>()));
        }
    }

    (rows, cursor_pos)
}

pub fn render(app: &mut App, theme: &Theme, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, body, footer
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    let [email_area, controls_area, reply_area] = Layout::vertical([
        Constraint::Percentage(45),
        Constraint::Length(3),
        Constraint::Min(5),
    ])
    .areas(body_area);

    render_header(app, theme, frame, header_area);
    render_email(app, theme, frame, email_area);
    render_controls(app, theme, frame, controls_area);
    render_reply(app, theme, frame, reply_area);
    render_footer(app, theme, frame, footer_area);

    if app.controller.copy_acknowledged() {
        render_copy_toast(theme, frame, area);
    }
}

fn render_header(app: &App, theme: &Theme, frame: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled(" AI Email Reply Generator ", Style::default().fg(theme.accent).bold()),
        Span::styled(format!("v{}", env!("CARGO_PKG_VERSION")), Style::default().fg(theme.muted)),
        Span::raw("  "),
        Span::styled(app.api_url.clone(), Style::default().fg(theme.muted)),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::Black));
    frame.render_widget(header, area);
}

fn focus_border(app: &App, theme: &Theme, pane: FocusPane) -> Style {
    if app.focus == pane {
        Style::default().fg(theme.accent)
    } else {
        Style::default().fg(theme.muted)
    }
}

fn render_email(app: &mut App, theme: &Theme, frame: &mut Frame, area: Rect) {
    app.email_area = Some(area);

    let editing = app.input_mode == InputMode::Editing;
    let title = if editing {
        " Original Email Content (editing) "
    } else {
        " Original Email Content "
    };
    let border_style = if editing {
        Style::default().fg(Color::Yellow)
    } else {
        focus_border(app, theme, FocusPane::Email)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(title);

    let inner_width = area.width.saturating_sub(2) as usize;
    let inner_height = area.height.saturating_sub(2);

    if app.email().is_empty() && !editing {
        let placeholder = Paragraph::new(Span::styled(
            "Press i to paste or type the email you received...",
            Style::default().fg(theme.muted),
        ))
        .block(block);
        frame.render_widget(placeholder, area);
        return;
    }

    let (rows, (cursor_row, cursor_col)) = wrap_editor(app.email(), app.email_cursor, inner_width);

    // Keep the cursor row on screen while typing
    if editing && inner_height > 0 {
        let cursor_row = cursor_row as u16;
        if cursor_row < app.email_scroll {
            app.email_scroll = cursor_row;
        } else if cursor_row >= app.email_scroll + inner_height {
            app.email_scroll = cursor_row + 1 - inner_height;
        }
    }
    let max_scroll = (rows.len() as u16).saturating_sub(inner_height);
    app.email_scroll = app.email_scroll.min(max_scroll.max(cursor_row as u16));

    let lines: Vec<Line> = rows.into_iter().map(Line::from).collect();
    let editor = Paragraph::new(Text::from(lines))
        .block(block)
        .scroll((app.email_scroll, 0));
    frame.render_widget(editor, area);

    if editing {
        let x = area.x + 1 + cursor_col as u16;
        let y = area.y + 1 + (cursor_row as u16).saturating_sub(app.email_scroll);
        frame.set_cursor_position((x, y));
    }
}

fn render_controls(app: &App, theme: &Theme, frame: &mut Frame, area: Rect) {
    let [tone_area, button_area] = Layout::horizontal([
        Constraint::Min(0),
        Constraint::Length(24),
    ])
    .areas(area);

    let mut spans = vec![Span::raw(" ")];
    for tone in Tone::all() {
        let style = if tone == app.tone() {
            Style::default()
                .bg(theme.secondary)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.muted)
        };
        spans.push(Span::styled(format!(" {} ", tone.display_name()), style));
        spans.push(Span::raw(" "));
    }

    let tone_block = Block::default()
        .borders(Borders::ALL)
        .border_style(focus_border(app, theme, FocusPane::Tone))
        .title(" Tone (Optional) ");
    frame.render_widget(Paragraph::new(Line::from(spans)).block(tone_block), tone_area);

    let (label, style) = if app.controller.is_pending() {
        (
            format!("Generating{}", ".".repeat(app.animation_frame as usize + 1)),
            Style::default().fg(theme.muted),
        )
    } else if app.controller.can_submit() {
        (
            "Generate Reply".to_string(),
            Style::default().fg(Color::Black).bg(theme.accent).bold(),
        )
    } else {
        ("Generate Reply".to_string(), Style::default().fg(theme.muted))
    };

    let button = Paragraph::new(Line::from(Span::styled(format!(" {} ", label), style)).centered())
        .block(Block::default().borders(Borders::ALL).border_style(style.bg(Color::Reset)));
    frame.render_widget(button, button_area);
}

fn render_reply(app: &mut App, theme: &Theme, frame: &mut Frame, area: Rect) {
    app.reply_area = Some(area);
    app.reply_height = area.height.saturating_sub(2);
    let inner_width = area.width.saturating_sub(2) as usize;

    let title_style = match app.controller.status() {
        RequestStatus::Succeeded => Style::default().fg(theme.success),
        RequestStatus::Failed => Style::default().fg(theme.error),
        _ => Style::default(),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(focus_border(app, theme, FocusPane::Reply))
        .title(Span::styled(format!(" Generated Reply: {} ", app.status_label()), title_style));

    let text = match app.controller.status() {
        RequestStatus::Idle => Text::from(Span::styled(
            "Your reply will appear here.",
            Style::default().fg(theme.muted),
        )),
        RequestStatus::Pending => {
            let dots = ".".repeat(app.animation_frame as usize + 1);
            Text::from(Span::styled(
                format!("Writing your reply{}", dots),
                Style::default().fg(theme.accent).add_modifier(Modifier::ITALIC),
            ))
        }
        RequestStatus::Succeeded => {
            let reply = app.controller.reply().unwrap_or_default();
            let lines: Vec<Line> = wrap_reply(reply, inner_width)
                .into_iter()
                .map(Line::from)
                .collect();
            Text::from(lines)
        }
        RequestStatus::Failed => Text::from(Span::styled(
            app.controller.error_message().unwrap_or_default().to_string(),
            Style::default().fg(theme.error),
        )),
    };

    app.reply_lines = text.lines.len() as u16;
    app.reply_scroll = app
        .reply_scroll
        .min(app.reply_lines.saturating_sub(app.reply_height));

    let paragraph = Paragraph::new(text)
        .block(block)
        .scroll((app.reply_scroll, 0));
    frame.render_widget(paragraph, area);

    if app.reply_lines > app.reply_height {
        let mut scrollbar_state = ScrollbarState::new(
            app.reply_lines.saturating_sub(app.reply_height) as usize,
        )
        .position(app.reply_scroll as usize);
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight),
            area,
            &mut scrollbar_state,
        );
    }
}

fn render_footer(app: &App, theme: &Theme, frame: &mut Frame, area: Rect) {
    let mode_span = match app.input_mode {
        InputMode::Normal => Span::styled(" NORMAL ", Style::default().bg(Color::Blue).fg(Color::White)),
        InputMode::Editing => Span::styled(" EDIT ", Style::default().bg(Color::Yellow).fg(Color::Black)),
    };

    let hints: &[(&str, &str)] = match app.input_mode {
        InputMode::Editing => &[
            ("Esc", "done"),
            ("Ctrl+S", "generate"),
            ("Tab", "next"),
        ],
        InputMode::Normal if app.controller.reply().is_some() => &[
            ("c", "copy"),
            ("j/k", "scroll"),
            ("s", "regenerate"),
            ("t", "tone"),
            ("i", "edit"),
            ("q", "quit"),
        ],
        InputMode::Normal => &[
            ("i", "edit"),
            ("t", "tone"),
            ("s", "generate"),
            ("Tab", "focus"),
            ("q", "quit"),
        ],
    };

    let mut spans = vec![mode_span, Span::raw(" ")];
    for (key, label) in hints {
        spans.push(Span::styled(format!(" {} ", key), theme.key));
        spans.push(Span::styled(format!(" {} ", label), theme.label));
    }

    if let Some(notice) = &app.notice {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(notice.clone(), Style::default().fg(theme.error)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_copy_toast(theme: &Theme, frame: &mut Frame, area: Rect) {
    let message = " Copied to clipboard! ";
    let width = (message.len() as u16 + 2).min(area.width);
    let height = 3.min(area.height);

    // Bottom-centre, above the footer
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + area.height.saturating_sub(height + 1);
    let toast_area = Rect::new(x, y, width, height);

    frame.render_widget(Clear, toast_area);
    let toast = Paragraph::new(Line::from(Span::styled(
        message,
        Style::default().fg(theme.success).add_modifier(Modifier::BOLD),
    )))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.success)),
    );
    frame.render_widget(toast, toast_area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_reply_keeps_blank_lines() {
        let lines = wrap_reply("Hi Sam,\n\nThanks for the note about Friday.", 12);
        assert_eq!(
            lines,
            vec!["Hi Sam,", "", "Thanks for", "the note", "about", "Friday."]
        );
    }

    #[test]
    fn test_wrap_editor_tracks_cursor() {
        let text = "abcdefgh\nxy";
        // Cursor after "abcdef" on a 4-wide editor: second row, col 2
        let (rows, cursor) = wrap_editor(text, 6, 4);
        assert_eq!(rows, vec!["abcd", "efgh", "xy"]);
        assert_eq!(cursor, (1, 2));

        // Cursor at end of the second line
        let (_, cursor) = wrap_editor(text, text.chars().count(), 4);
        assert_eq!(cursor, (2, 2));
    }

    #[test]
    fn test_wrap_editor_empty_lines() {
        let (rows, cursor) = wrap_editor("a\n\n", 3, 10);
        assert_eq!(rows, vec!["a", "", ""]);
        assert_eq!(cursor, (2, 0));
    }
}
