use ropey::Rope;

/// Cursor position in the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    /// Zero-based line index.
    pub line: usize,
    /// Zero-based column (byte offset within the line).
    pub col: usize,
    /// Remembered column for vertical movement (sticky column).
    col_memory: usize,
}

impl Cursor {
    pub const fn new() -> Self {
        Self {
            line: 0,
            col: 0,
            col_memory: 0,
        }
    }

    /// Cursor at a specific position.
    pub const fn at(line: usize, col: usize) -> Self {
        Self {
            line,
            col,
            col_memory: col,
        }
    }

    const fn set_col(&mut self, col: usize) {
        self.col = col;
        self.col_memory = col;
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::new()
    }
}

/// Direction for cursor movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// An active selection span.
///
/// `from` is the anchor, `to` the head; the cursor sits at `to`. A span
/// never collapses to a point — setting an empty span clears the selection
/// instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub from: Cursor,
    pub to: Cursor,
}

/// A text buffer backed by a rope, with a cursor and an optional selection.
///
/// This is the editing surface the commands operate on: line access and
/// replacement, character edits, cursor motion, and selection state. Any
/// edit or plain cursor motion drops the selection; only the selection
/// operations themselves keep it.
pub struct EditorBuffer {
    rope: Rope,
    cursor: Cursor,
    selection: Option<Selection>,
    dirty: bool,
}

impl EditorBuffer {
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            cursor: Cursor::new(),
            selection: None,
            dirty: false,
        }
    }

    pub fn empty() -> Self {
        Self::from_text("")
    }

    pub const fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Whether the buffer has been modified since creation or last save.
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Mark the buffer as clean (e.g., after saving).
    pub const fn mark_clean(&mut self) {
        self.dirty = false;
    }

    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Content of a line, without the trailing newline.
    pub fn line_at(&self, line_idx: usize) -> Option<String> {
        if line_idx >= self.rope.len_lines() {
            return None;
        }
        let s = self.rope.line(line_idx).to_string();
        Some(s.trim_end_matches('\n').trim_end_matches('\r').to_string())
    }

    /// Length of a line in bytes, without the trailing newline.
    pub fn line_len(&self, line_idx: usize) -> usize {
        self.line_at(line_idx).map_or(0, |s| s.len())
    }

    /// Full text content.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    // --- Selection ---

    pub const fn selection(&self) -> Option<Selection> {
        self.selection
    }

    /// Whether a selection is currently active.
    pub const fn has_selection(&self) -> bool {
        self.selection.is_some()
    }

    /// Select from `from` to `to`, clamped to the buffer, and move the
    /// cursor to `to`. An empty span clears the selection instead but still
    /// moves the cursor.
    pub fn set_selection(&mut self, from: Cursor, to: Cursor) {
        let from = self.clamp_position(from);
        let to = self.clamp_position(to);
        self.cursor = Cursor::at(to.line, to.col);
        self.selection = if from == to {
            None
        } else {
            Some(Selection { from, to })
        };
    }

    pub const fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Collapse an active selection to its end point, leaving the cursor
    /// there. Returns true when there was a selection to collapse.
    pub fn collapse_selection_to_end(&mut self) -> bool {
        let Some(selection) = self.selection.take() else {
            return false;
        };
        self.cursor = Cursor::at(selection.to.line, selection.to.col);
        true
    }

    fn clamp_position(&self, pos: Cursor) -> Cursor {
        let line = pos.line.min(self.line_count().saturating_sub(1));
        let text = self.line_at(line).unwrap_or_default();
        Cursor::at(line, clamp_to_boundary(&text, pos.col))
    }

    // --- Line replacement ---

    /// Replace the content of a line (the trailing newline is kept).
    ///
    /// `text` must be a single line. The cursor column is clamped when the
    /// cursor sits on the replaced line; the selection is dropped. Returns
    /// false when the line index is out of bounds.
    pub fn set_line(&mut self, line_idx: usize, text: &str) -> bool {
        debug_assert!(!text.contains('\n'), "set_line takes a single line");
        let Some(old) = self.line_at(line_idx) else {
            return false;
        };
        let start = self.rope.line_to_char(line_idx);
        self.rope.remove(start..start + old.chars().count());
        self.rope.insert(start, text);
        self.selection = None;
        if self.cursor.line == line_idx {
            self.cursor.set_col(clamp_to_boundary(text, self.cursor.col));
        }
        self.dirty = true;
        true
    }

    // --- Edits ---

    /// Insert a character at the cursor position.
    pub fn insert_char(&mut self, ch: char) {
        self.selection = None;
        let char_idx = self.cursor_char_idx();
        self.rope.insert_char(char_idx, ch);
        self.cursor.set_col(self.cursor.col + ch.len_utf8());
        self.dirty = true;
    }

    /// Split the current line at the cursor (Enter key).
    pub fn split_line(&mut self) {
        self.selection = None;
        let char_idx = self.cursor_char_idx();
        self.rope.insert_char(char_idx, '\n');
        self.cursor.line += 1;
        self.cursor.set_col(0);
        self.dirty = true;
    }

    /// Delete the character before the cursor (Backspace).
    ///
    /// Returns `true` if a character was deleted.
    pub fn delete_back(&mut self) -> bool {
        self.selection = None;
        if self.cursor.col == 0 && self.cursor.line == 0 {
            return false;
        }

        let char_idx = self.cursor_char_idx();
        if self.cursor.col == 0 {
            // Join with the previous line.
            let prev_len = self.line_len(self.cursor.line - 1);
            self.rope.remove(char_idx - 1..char_idx);
            self.cursor.line -= 1;
            self.cursor.set_col(prev_len);
        } else {
            let line = self.line_at(self.cursor.line).unwrap_or_default();
            let removed = line[..self.cursor.col]
                .chars()
                .next_back()
                .map_or(1, char::len_utf8);
            self.rope.remove(char_idx - 1..char_idx);
            self.cursor.set_col(self.cursor.col - removed);
        }
        self.dirty = true;
        true
    }

    /// Delete the character at the cursor (Delete key).
    ///
    /// Returns `true` if a character was deleted.
    pub fn delete_forward(&mut self) -> bool {
        self.selection = None;
        let line_len = self.line_len(self.cursor.line);
        if self.cursor.col >= line_len && self.cursor.line + 1 >= self.line_count() {
            return false;
        }
        let char_idx = self.cursor_char_idx();
        self.rope.remove(char_idx..=char_idx);
        self.dirty = true;
        true
    }

    // --- Cursor motion ---

    pub fn move_cursor(&mut self, direction: Direction) {
        self.selection = None;
        match direction {
            Direction::Left => self.move_left(),
            Direction::Right => self.move_right(),
            Direction::Up => self.move_up(),
            Direction::Down => self.move_down(),
        }
    }

    /// Move cursor to the beginning of the line (Home).
    pub const fn move_home(&mut self) {
        self.selection = None;
        self.cursor.set_col(0);
    }

    /// Move cursor to the end of the line (End).
    pub fn move_end(&mut self) {
        self.selection = None;
        let len = self.line_len(self.cursor.line);
        self.cursor.set_col(len);
    }

    /// Move cursor one word to the left (Ctrl+Left).
    pub fn move_word_left(&mut self) {
        self.selection = None;
        if self.cursor.col == 0 {
            if self.cursor.line > 0 {
                self.cursor.line -= 1;
                self.cursor.set_col(self.line_len(self.cursor.line));
            }
            return;
        }
        let line = self.line_at(self.cursor.line).unwrap_or_default();
        let before = line[..self.cursor.col].trim_end();
        if before.is_empty() {
            self.cursor.set_col(0);
            return;
        }
        let start = before
            .rfind(|c: char| !c.is_alphanumeric() && c != '_')
            .map_or(0, |i| i + 1);
        self.cursor.set_col(start);
    }

    /// Move cursor one word to the right (Ctrl+Right).
    pub fn move_word_right(&mut self) {
        self.selection = None;
        let line_len = self.line_len(self.cursor.line);
        if self.cursor.col >= line_len {
            if self.cursor.line + 1 < self.line_count() {
                self.cursor.line += 1;
                self.cursor.set_col(0);
            }
            return;
        }
        let line = self.line_at(self.cursor.line).unwrap_or_default();
        let after = &line[self.cursor.col..];
        let word_end = after
            .find(|c: char| !c.is_alphanumeric() && c != '_')
            .unwrap_or(after.len());
        let gap = after[word_end..]
            .find(|c: char| c.is_alphanumeric() || c == '_')
            .unwrap_or(after.len() - word_end);
        self.cursor.set_col(self.cursor.col + word_end + gap);
    }

    /// Move cursor to a specific line and column, clamped to the buffer.
    pub fn move_to(&mut self, line: usize, col: usize) {
        self.selection = None;
        self.cursor = self.clamp_position(Cursor::at(line, col));
    }

    /// Move cursor to the start of the buffer (Ctrl+Home).
    pub const fn move_to_start(&mut self) {
        self.selection = None;
        self.cursor.line = 0;
        self.cursor.set_col(0);
    }

    /// Move cursor to the end of the buffer (Ctrl+End).
    pub fn move_to_end(&mut self) {
        self.selection = None;
        let last = self.line_count().saturating_sub(1);
        self.cursor.line = last;
        self.cursor.set_col(self.line_len(last));
    }

    // --- Private helpers ---

    /// Convert the cursor position to a ropey char index.
    fn cursor_char_idx(&self) -> usize {
        let line_start = self.rope.line_to_char(self.cursor.line);
        let line: String = self.rope.line(self.cursor.line).chars().collect();
        let byte_col = self.cursor.col.min(line.len());
        line_start + line[..byte_col].chars().count()
    }

    fn move_left(&mut self) {
        if self.cursor.col > 0 {
            let line = self.line_at(self.cursor.line).unwrap_or_default();
            let prev = line[..self.cursor.col]
                .chars()
                .next_back()
                .map_or(1, char::len_utf8);
            self.cursor.set_col(self.cursor.col - prev);
        } else if self.cursor.line > 0 {
            self.cursor.line -= 1;
            self.cursor.set_col(self.line_len(self.cursor.line));
        }
    }

    fn move_right(&mut self) {
        let line_len = self.line_len(self.cursor.line);
        if self.cursor.col < line_len {
            let line = self.line_at(self.cursor.line).unwrap_or_default();
            let next = line[self.cursor.col..]
                .chars()
                .next()
                .map_or(1, char::len_utf8);
            self.cursor.set_col(self.cursor.col + next);
        } else if self.cursor.line + 1 < self.line_count() {
            self.cursor.line += 1;
            self.cursor.set_col(0);
        }
    }

    fn move_up(&mut self) {
        if self.cursor.line > 0 {
            self.cursor.line -= 1;
            let max_col = self.line_len(self.cursor.line);
            self.cursor.col = self.cursor.col_memory.min(max_col);
        }
    }

    fn move_down(&mut self) {
        if self.cursor.line + 1 < self.line_count() {
            self.cursor.line += 1;
            let max_col = self.line_len(self.cursor.line);
            self.cursor.col = self.cursor.col_memory.min(max_col);
        }
    }
}

/// Clamp a byte column to a char boundary of `text`, rounding down.
fn clamp_to_boundary(text: &str, col: usize) -> usize {
    let mut col = col.min(text.len());
    while col > 0 && !text.is_char_boundary(col) {
        col -= 1;
    }
    col
}

impl std::fmt::Debug for EditorBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorBuffer")
            .field(
                "rope",
                &format_args!("Rope({} lines)", self.rope.len_lines()),
            )
            .field("cursor", &self.cursor)
            .field("selection", &self.selection)
            .field("dirty", &self.dirty)
            .finish()
    }
}
