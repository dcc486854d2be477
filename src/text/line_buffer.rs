use std::borrow::Cow;

/// Fixed-size ring of fixed-width, NUL-padded text rows.
///
/// `cursor` is the next row to overwrite, so reading from it yields rows oldest first.
#[derive(Clone, Debug)]
pub struct LogLineBuffer {
    rows: Vec<Vec<u8>>,
    cols: usize,
    cursor: usize,
}

impl LogLineBuffer {
    /// Allocate `rows` rows of `cols` columns. Zero in either dimension leaves the buffer
    /// unallocated and every operation a no-op.
    pub fn new(cols: usize, rows: usize) -> Self {
        if cols == 0 || rows == 0 {
            return Self {
                rows: Vec::new(),
                cols: 0,
                cursor: 0,
            };
        }
        Self {
            rows: vec![vec![0; cols]; rows],
            cols,
            cursor: 0,
        }
    }

    /// Whether storage was allocated.
    pub fn is_allocated(&self) -> bool {
        !self.rows.is_empty()
    }

    /// Columns per row.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Next row `append` will write.
    pub fn write_cursor(&self) -> usize {
        self.cursor
    }

    /// Blank every row and rewind the cursor.
    pub fn clear(&mut self) {
        for row in &mut self.rows {
            row.fill(0);
        }
        self.cursor = 0;
    }

    /// Write `text` starting a fresh row, wrapping onto further rows every `cols` bytes.
    ///
    /// The last row written is NUL-padded and the cursor moves past it.
    pub fn append(&mut self, text: &str) {
        if !self.is_allocated() {
            return;
        }
        let mut col = 0;
        for b in sanitize(text) {
            if col == self.cols {
                self.advance();
                col = 0;
            }
            self.rows[self.cursor][col] = b;
            col += 1;
        }
        self.rows[self.cursor][col..].fill(0);
        self.advance();
    }

    /// Overwrite the most recently completed row in place, stopping at a NUL or at `cols`.
    pub fn replace_last(&mut self, text: &str) {
        if !self.is_allocated() {
            return;
        }
        let last = (self.cursor + self.rows.len() - 1) % self.rows.len();
        let row = &mut self.rows[last];
        let mut col = 0;
        for b in sanitize(text).take(self.cols) {
            row[col] = b;
            col += 1;
        }
        row[col..].fill(0);
    }

    /// Every row in chronological order, oldest first. Always `row_count()` rows of `cols` bytes.
    pub fn lines_for_display(&self) -> impl Iterator<Item = &[u8]> + '_ {
        let n = self.rows.len();
        (0..n).map(move |i| self.rows[(self.cursor + i) % n].as_slice())
    }

    /// Text of a row up to its first NUL.
    pub fn row_text(row: &[u8]) -> Cow<'_, str> {
        let end = row.iter().position(|&b| b == 0).unwrap_or(row.len());
        String::from_utf8_lossy(&row[..end])
    }

    /// Convenience: visible rows as strings, oldest first.
    pub fn display_text(&self) -> Vec<String> {
        self.lines_for_display()
            .map(|r| Self::row_text(r).into_owned())
            .collect()
    }

    fn advance(&mut self) {
        self.cursor = (self.cursor + 1) % self.rows.len();
    }
}

// Text ends at the first NUL; other control bytes would render as garbage.
fn sanitize(text: &str) -> impl Iterator<Item = u8> + '_ {
    text.bytes()
        .take_while(|&b| b != 0)
        .map(|b| if b.is_ascii_control() { b' ' } else { b })
}

#[cfg(test)]
#[path = "../../tests/unit/text/line_buffer.rs"]
mod tests;
