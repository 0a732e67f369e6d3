use ratatui::layout::Rect;
use mailreply_core::{Clipboard, Config, ReplyRequestController, RequestStatus, Tone};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusPane {
    Email,
    Tone,
    Reply,
}

impl FocusPane {
    pub fn next(self) -> Self {
        match self {
            FocusPane::Email => FocusPane::Tone,
            FocusPane::Tone => FocusPane::Reply,
            FocusPane::Reply => FocusPane::Email,
        }
    }
}

/// Convert a character index to a byte index for UTF-8 safe string operations
pub fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// Line and column (both in chars) of a cursor inside multi-line text.
pub fn cursor_line_col(text: &str, cursor: usize) -> (usize, usize) {
    let mut line = 0;
    let mut col = 0;
    for c in text.chars().take(cursor) {
        if c == '\n' {
            line += 1;
            col = 0;
        } else {
            col += 1;
        }
    }
    (line, col)
}

/// Char index of `(line, col)`, clamping the column to the line's length.
fn line_col_to_cursor(text: &str, line: usize, col: usize) -> usize {
    let mut idx = 0;
    for (i, l) in text.split('\n').enumerate() {
        let len = l.chars().count();
        if i == line {
            return idx + col.min(len);
        }
        idx += len + 1;
    }
    text.chars().count()
}

pub struct App {
    pub should_quit: bool,
    pub input_mode: InputMode,
    pub focus: FocusPane,

    // Email editor
    pub email_cursor: usize, // char index into the draft
    pub email_scroll: u16,

    // Reply panel
    pub reply_scroll: u16,
    pub reply_height: u16,
    pub reply_lines: u16,

    // Loading ellipsis, 0-2
    pub animation_frame: u8,
    // One-line message in the footer, e.g. clipboard failures
    pub notice: Option<String>,

    // Panel areas for mouse hit-testing (updated during render)
    pub email_area: Option<Rect>,
    pub reply_area: Option<Rect>,

    pub api_url: String,
    pub persist_tone: bool,
    pub controller: ReplyRequestController,
    pub clipboard: Box<dyn Clipboard>,
}

impl App {
    pub fn new(
        controller: ReplyRequestController,
        clipboard: Box<dyn Clipboard>,
        api_url: String,
    ) -> Self {
        Self {
            should_quit: false,
            input_mode: InputMode::Editing,
            focus: FocusPane::Email,

            email_cursor: controller.draft().email_content.chars().count(),
            email_scroll: 0,

            reply_scroll: 0,
            reply_height: 0,
            reply_lines: 0,

            animation_frame: 0,
            notice: None,

            email_area: None,
            reply_area: None,

            api_url,
            persist_tone: false,
            controller,
            clipboard,
        }
    }

    pub fn email(&self) -> &str {
        &self.controller.draft().email_content
    }

    pub fn tone(&self) -> Tone {
        self.controller.draft().tone
    }

    // Email editing
    pub fn insert_char(&mut self, c: char) {
        let mut text = self.email().to_string();
        let byte_pos = char_to_byte_index(&text, self.email_cursor);
        text.insert(byte_pos, c);
        self.controller.update_email_content(text);
        self.email_cursor += 1;
    }

    pub fn insert_str(&mut self, s: &str) {
        let mut text = self.email().to_string();
        let byte_pos = char_to_byte_index(&text, self.email_cursor);
        // Normalize pasted CRLF so the cursor math stays line-based
        let s = s.replace("\r\n", "\n").replace('\r', "\n");
        text.insert_str(byte_pos, &s);
        self.controller.update_email_content(text);
        self.email_cursor += s.chars().count();
    }

    pub fn delete_before_cursor(&mut self) {
        if self.email_cursor == 0 {
            return;
        }
        let mut text = self.email().to_string();
        self.email_cursor -= 1;
        let byte_pos = char_to_byte_index(&text, self.email_cursor);
        text.remove(byte_pos);
        self.controller.update_email_content(text);
    }

    pub fn delete_at_cursor(&mut self) {
        let mut text = self.email().to_string();
        if self.email_cursor < text.chars().count() {
            let byte_pos = char_to_byte_index(&text, self.email_cursor);
            text.remove(byte_pos);
            self.controller.update_email_content(text);
        }
    }

    pub fn clear_email(&mut self) {
        self.controller.update_email_content(String::new());
        self.email_cursor = 0;
        self.email_scroll = 0;
    }

    pub fn cursor_left(&mut self) {
        self.email_cursor = self.email_cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        let char_count = self.email().chars().count();
        self.email_cursor = (self.email_cursor + 1).min(char_count);
    }

    pub fn cursor_line_start(&mut self) {
        let (line, _) = cursor_line_col(self.email(), self.email_cursor);
        self.email_cursor = line_col_to_cursor(self.email(), line, 0);
    }

    pub fn cursor_line_end(&mut self) {
        let (line, _) = cursor_line_col(self.email(), self.email_cursor);
        self.email_cursor = line_col_to_cursor(self.email(), line, usize::MAX);
    }

    pub fn cursor_up(&mut self) {
        let (line, col) = cursor_line_col(self.email(), self.email_cursor);
        if line > 0 {
            self.email_cursor = line_col_to_cursor(self.email(), line - 1, col);
        }
    }

    pub fn cursor_down(&mut self) {
        let (line, col) = cursor_line_col(self.email(), self.email_cursor);
        let line_count = self.email().split('\n').count();
        if line + 1 < line_count {
            self.email_cursor = line_col_to_cursor(self.email(), line + 1, col);
        }
    }

    // Tone selection
    pub fn next_tone(&mut self) {
        self.set_tone(self.tone().next());
    }

    pub fn previous_tone(&mut self) {
        self.set_tone(self.tone().previous());
    }

    fn set_tone(&mut self, tone: Tone) {
        self.controller.update_tone(tone);
        if self.persist_tone {
            if let Err(err) = Config::save_default_tone(tone) {
                tracing::warn!(error = %err, "failed to save default tone");
            }
        }
    }

    // Request lifecycle
    pub fn submit(&mut self) -> bool {
        if !self.controller.submit() {
            return false;
        }
        self.notice = None;
        self.reply_scroll = 0;
        self.input_mode = InputMode::Normal;
        self.focus = FocusPane::Reply;
        true
    }

    pub fn copy_reply(&mut self) {
        match self.controller.copy_result(self.clipboard.as_mut()) {
            Ok(_) => self.notice = None,
            Err(_) => self.notice = Some("Could not access the clipboard".to_string()),
        }
    }

    /// Called on every Tick event
    pub async fn on_tick(&mut self) {
        if self.controller.is_pending() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
        if self.controller.poll_response().await {
            self.reply_scroll = 0;
        }
        self.controller.tick();
    }

    pub fn status_label(&self) -> &'static str {
        match self.controller.status() {
            RequestStatus::Idle => "Ready",
            RequestStatus::Pending => "Generating",
            RequestStatus::Succeeded => "Reply ready",
            RequestStatus::Failed => "Failed",
        }
    }

    // Reply scrolling
    pub fn scroll_reply_down(&mut self, lines: u16) {
        let max_scroll = self.reply_lines.saturating_sub(self.reply_height);
        self.reply_scroll = self.reply_scroll.saturating_add(lines).min(max_scroll);
    }

    pub fn scroll_reply_up(&mut self, lines: u16) {
        self.reply_scroll = self.reply_scroll.saturating_sub(lines);
    }
}
