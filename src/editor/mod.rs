//! Editor surfaces for the console: one editable input buffer, one
//! read-only output buffer. Visibility and content are independent, and a
//! hidden surface keeps whatever it holds.

/// Fallback highlight mode for languages without one.
pub const PLAIN_TEXT_MODE: &str = "text/plain";

#[derive(Debug, Clone)]
pub struct EditorSurface {
    lines: Vec<String>,
    cursor_row: usize,
    /// Char index within the cursor line.
    cursor_col: usize,
    mode: String,
    visible: bool,
    read_only: bool,
}

impl EditorSurface {
    /// The editable source buffer. Visible from the start.
    pub fn input(mode: Option<&str>) -> Self {
        Self::new(mode, true, false)
    }

    /// The result buffer. Read-only, hidden until the first transcript.
    pub fn output() -> Self {
        Self::new(None, false, true)
    }

    fn new(mode: Option<&str>, visible: bool, read_only: bool) -> Self {
        Self {
            lines: vec![String::new()],
            cursor_row: 0,
            cursor_col: 0,
            mode: mode.unwrap_or(PLAIN_TEXT_MODE).to_string(),
            visible,
            read_only,
        }
    }

    pub fn content(&self) -> String {
        self.lines.join("\n")
    }

    /// Programmatic write path; the only one available on a read-only surface.
    pub fn set_content(&mut self, text: &str) {
        self.lines = text.split('\n').map(str::to_string).collect();
        if self.lines.is_empty() {
            self.lines.push(String::new());
        }
        self.cursor_row = 0;
        self.cursor_col = 0;
    }

    pub fn clear(&mut self) {
        self.set_content("");
    }

    pub fn is_empty(&self) -> bool {
        self.lines.len() == 1 && self.lines[0].is_empty()
    }

    pub fn set_mode(&mut self, mode: Option<&str>) {
        self.mode = mode.unwrap_or(PLAIN_TEXT_MODE).to_string();
    }

    pub fn mode(&self) -> &str {
        &self.mode
    }

    pub fn show(&mut self) {
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// (row, char column) of the cursor.
    pub fn cursor(&self) -> (usize, usize) {
        (self.cursor_row, self.cursor_col)
    }

    // ----- User edit operations. All rejected on a read-only surface. -----

    pub fn insert_char(&mut self, c: char) -> bool {
        if self.read_only {
            return false;
        }
        let line = &mut self.lines[self.cursor_row];
        let at = char_to_byte_index(line, self.cursor_col);
        line.insert(at, c);
        self.cursor_col += 1;
        true
    }

    pub fn insert_newline(&mut self) -> bool {
        if self.read_only {
            return false;
        }
        let line = &mut self.lines[self.cursor_row];
        let at = char_to_byte_index(line, self.cursor_col);
        let rest = line.split_off(at);
        self.lines.insert(self.cursor_row + 1, rest);
        self.cursor_row += 1;
        self.cursor_col = 0;
        true
    }

    pub fn backspace(&mut self) -> bool {
        if self.read_only {
            return false;
        }
        if self.cursor_col > 0 {
            let line = &mut self.lines[self.cursor_row];
            let at = char_to_byte_index(line, self.cursor_col - 1);
            line.remove(at);
            self.cursor_col -= 1;
            true
        } else if self.cursor_row > 0 {
            // Merge with the previous line
            let current = self.lines.remove(self.cursor_row);
            self.cursor_row -= 1;
            let prev = &mut self.lines[self.cursor_row];
            self.cursor_col = prev.chars().count();
            prev.push_str(&current);
            true
        } else {
            false
        }
    }

    pub fn delete(&mut self) -> bool {
        if self.read_only {
            return false;
        }
        let line_chars = self.lines[self.cursor_row].chars().count();
        if self.cursor_col < line_chars {
            let line = &mut self.lines[self.cursor_row];
            let at = char_to_byte_index(line, self.cursor_col);
            line.remove(at);
            true
        } else if self.cursor_row + 1 < self.lines.len() {
            let next = self.lines.remove(self.cursor_row + 1);
            self.lines[self.cursor_row].push_str(&next);
            true
        } else {
            false
        }
    }

    // ----- Cursor movement -----

    pub fn move_left(&mut self) {
        if self.cursor_col > 0 {
            self.cursor_col -= 1;
        } else if self.cursor_row > 0 {
            self.cursor_row -= 1;
            self.cursor_col = self.lines[self.cursor_row].chars().count();
        }
    }

    pub fn move_right(&mut self) {
        let line_chars = self.lines[self.cursor_row].chars().count();
        if self.cursor_col < line_chars {
            self.cursor_col += 1;
        } else if self.cursor_row + 1 < self.lines.len() {
            self.cursor_row += 1;
            self.cursor_col = 0;
        }
    }

    pub fn move_up(&mut self) {
        if self.cursor_row > 0 {
            self.cursor_row -= 1;
            self.clamp_col();
        }
    }

    pub fn move_down(&mut self) {
        if self.cursor_row + 1 < self.lines.len() {
            self.cursor_row += 1;
            self.clamp_col();
        }
    }

    pub fn move_home(&mut self) {
        self.cursor_col = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor_col = self.lines[self.cursor_row].chars().count();
    }

    fn clamp_col(&mut self) {
        let line_chars = self.lines[self.cursor_row].chars().count();
        if self.cursor_col > line_chars {
            self.cursor_col = line_chars;
        }
    }
}

/// Convert a character index (0-based) to a byte index in the given string.
/// If `n` exceeds the number of characters, returns `s.len()`.
fn char_to_byte_index(s: &str, n: usize) -> usize {
    match s.char_indices().nth(n) {
        Some((i, _)) => i,
        None => s.len(),
    }
}
