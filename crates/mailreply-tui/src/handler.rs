use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use crate::app::{App, FocusPane, InputMode};
use crate::tui::AppEvent;

pub async fn handle_event(app: &mut App, event: AppEvent) -> Result<()> {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Resize(_, _) => {}
        AppEvent::Tick => app.on_tick().await,
    }
    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys that work in any mode
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('c') => {
                app.should_quit = true;
                return;
            }
            KeyCode::Char('s') => {
                app.submit();
                return;
            }
            _ => {}
        }
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, key),
        InputMode::Editing => handle_editing_mode(app, key),
    }
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,

        KeyCode::Tab => app.focus = app.focus.next(),

        KeyCode::Char('i') => {
            app.focus = FocusPane::Email;
            app.input_mode = InputMode::Editing;
        }
        KeyCode::Enter if app.focus == FocusPane::Email => {
            app.input_mode = InputMode::Editing;
        }
        KeyCode::Enter if app.focus == FocusPane::Tone => {
            app.submit();
        }

        // Tone
        KeyCode::Char('t') => app.next_tone(),
        KeyCode::Char('T') => app.previous_tone(),
        KeyCode::Right | KeyCode::Char('l') if app.focus == FocusPane::Tone => app.next_tone(),
        KeyCode::Left | KeyCode::Char('h') if app.focus == FocusPane::Tone => app.previous_tone(),

        KeyCode::Char('s') => {
            app.submit();
        }
        KeyCode::Char('c') => app.copy_reply(),

        // Reply scrolling
        KeyCode::Char('j') | KeyCode::Down => app.scroll_reply_down(1),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_reply_up(1),
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.scroll_reply_down(app.reply_height / 2);
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.scroll_reply_up(app.reply_height / 2);
        }
        KeyCode::Char('g') => app.reply_scroll = 0,
        KeyCode::Char('G') => app.scroll_reply_down(u16::MAX),

        // Start over with an empty draft
        KeyCode::Char('D') => app.clear_email(),

        _ => {}
    }
}

fn handle_editing_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.input_mode = InputMode::Normal,
        KeyCode::Tab => {
            app.input_mode = InputMode::Normal;
            app.focus = app.focus.next();
        }
        KeyCode::Enter => app.insert_char('\n'),
        KeyCode::Backspace => app.delete_before_cursor(),
        KeyCode::Delete => app.delete_at_cursor(),
        KeyCode::Left => app.cursor_left(),
        KeyCode::Right => app.cursor_right(),
        KeyCode::Up => app.cursor_up(),
        KeyCode::Down => app.cursor_down(),
        KeyCode::Home => app.cursor_line_start(),
        KeyCode::End => app.cursor_line_end(),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => app.insert_char(c),
        _ => {}
    }
}

/// Check if a point is within a rectangle
fn point_in_rect(x: u16, y: u16, rect: Rect) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    let in_reply = app
        .reply_area
        .map(|r| point_in_rect(mouse.column, mouse.row, r))
        .unwrap_or(false);
    let in_email = app
        .email_area
        .map(|r| point_in_rect(mouse.column, mouse.row, r))
        .unwrap_or(false);

    match mouse.kind {
        MouseEventKind::ScrollDown if in_reply => app.scroll_reply_down(3),
        MouseEventKind::ScrollUp if in_reply => app.scroll_reply_up(3),
        MouseEventKind::ScrollDown if in_email => {
            app.email_scroll = app.email_scroll.saturating_add(1);
        }
        MouseEventKind::ScrollUp if in_email => {
            app.email_scroll = app.email_scroll.saturating_sub(1);
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::test_app;
    use crossterm::event::{KeyEventKind, KeyEventState};
    use mailreply_core::RequestStatus;

    fn key(code: KeyCode) -> AppEvent {
        AppEvent::Key(KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    fn ctrl(c: char) -> AppEvent {
        AppEvent::Key(KeyEvent {
            code: KeyCode::Char(c),
            modifiers: KeyModifiers::CONTROL,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    async fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            let code = if c == '\n' { KeyCode::Enter } else { KeyCode::Char(c) };
            handle_event(app, key(code)).await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_typing_builds_multiline_draft() {
        let (mut app, _) = test_app();
        assert_eq!(app.input_mode, InputMode::Editing);

        type_text(&mut app, "Hi,\nsee you").await;
        handle_event(&mut app, key(KeyCode::Backspace)).await.unwrap();
        assert_eq!(app.email(), "Hi,\nsee yo");

        // Control chords never insert text
        handle_event(&mut app, ctrl('x')).await.unwrap();
        assert_eq!(app.email(), "Hi,\nsee yo");
    }

    #[tokio::test]
    async fn test_submit_key_ignored_for_blank_draft() {
        let (mut app, _) = test_app();
        type_text(&mut app, "   ").await;

        handle_event(&mut app, ctrl('s')).await.unwrap();
        assert_eq!(app.controller.status(), RequestStatus::Idle);

        handle_event(&mut app, key(KeyCode::Esc)).await.unwrap();
        handle_event(&mut app, key(KeyCode::Char('s'))).await.unwrap();
        assert_eq!(app.controller.status(), RequestStatus::Idle);
    }

    #[tokio::test]
    async fn test_submit_then_copy_reply() {
        let (mut app, clipboard) = test_app();
        type_text(&mut app, "Can we move our call?").await;

        // Copy before there is a reply does nothing
        handle_event(&mut app, key(KeyCode::Esc)).await.unwrap();
        handle_event(&mut app, key(KeyCode::Char('c'))).await.unwrap();
        assert!(clipboard.writes.lock().unwrap().is_empty());

        handle_event(&mut app, ctrl('s')).await.unwrap();
        assert_eq!(app.controller.status(), RequestStatus::Pending);
        assert_eq!(app.input_mode, InputMode::Normal);

        // A second submit while pending is swallowed
        handle_event(&mut app, key(KeyCode::Char('s'))).await.unwrap();

        while app.controller.is_pending() {
            handle_event(&mut app, AppEvent::Tick).await.unwrap();
            tokio::task::yield_now().await;
        }
        assert_eq!(app.controller.reply(), Some("Re: Can we move our call?"));

        handle_event(&mut app, key(KeyCode::Char('c'))).await.unwrap();
        assert_eq!(
            *clipboard.writes.lock().unwrap(),
            vec!["Re: Can we move our call?".to_string()]
        );
        assert!(app.controller.copy_acknowledged());
    }

    #[tokio::test]
    async fn test_tone_keys_cycle_tone() {
        let (mut app, _) = test_app();
        handle_event(&mut app, key(KeyCode::Esc)).await.unwrap();

        handle_event(&mut app, key(KeyCode::Char('t'))).await.unwrap();
        assert_eq!(app.tone().as_str(), "Professional");

        handle_event(&mut app, key(KeyCode::Tab)).await.unwrap();
        assert_eq!(app.focus, FocusPane::Tone);
        handle_event(&mut app, key(KeyCode::Right)).await.unwrap();
        assert_eq!(app.tone().as_str(), "Casual");
        handle_event(&mut app, key(KeyCode::Left)).await.unwrap();
        handle_event(&mut app, key(KeyCode::Char('T'))).await.unwrap();
        assert_eq!(app.tone().as_str(), "");
    }

    #[tokio::test]
    async fn test_quit_keys() {
        let (mut app, _) = test_app();
        // 'q' while editing is just text
        handle_event(&mut app, key(KeyCode::Char('q'))).await.unwrap();
        assert!(!app.should_quit);
        assert_eq!(app.email(), "q");

        handle_event(&mut app, ctrl('c')).await.unwrap();
        assert!(app.should_quit);
    }
}
