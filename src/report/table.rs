//! Minimal boxed text table.
//!
//! ```text
//! +------------+-------+
//! | META FIELD | COUNT |
//! +------------+-------+
//! | plugins    |     5 |
//! +------------+-------+
//! ```
//!
//! Headers are upper-cased and centred; each column is left- or
//! right-aligned. Widths use terminal display width, not byte length.

use unicode_width::UnicodeWidthStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

pub struct Table {
    headers: Vec<String>,
    aligns:  Vec<Align>,
    rows:    Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_uppercase()).collect(),
            aligns:  vec![Align::Left; headers.len()],
            rows:    Vec::new(),
        }
    }

    pub fn align(mut self, column: usize, align: Align) -> Self {
        if let Some(slot) = self.aligns.get_mut(column) {
            *slot = align;
        }
        self
    }

    /// Short rows are padded with empty cells; extra cells are dropped.
    pub fn push_row(&mut self, mut row: Vec<String>) {
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
    }

    pub fn render(&self) -> String {
        let widths = self.widths();
        let border = border_line(&widths);

        let mut out = String::new();
        out.push_str(&border);

        out.push('|');
        for (header, width) in self.headers.iter().zip(&widths) {
            out.push(' ');
            out.push_str(&centre(header, *width));
            out.push_str(" |");
        }
        out.push('\n');
        out.push_str(&border);

        if self.rows.is_empty() {
            return out;
        }
        for row in &self.rows {
            out.push('|');
            for ((cell, width), align) in row.iter().zip(&widths).zip(&self.aligns) {
                out.push(' ');
                out.push_str(&pad(cell, *width, *align));
                out.push_str(" |");
            }
            out.push('\n');
        }
        out.push_str(&border);
        out
    }

    fn widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.width()).collect();
        for row in &self.rows {
            for (w, cell) in widths.iter_mut().zip(row) {
                *w = (*w).max(cell.width());
            }
        }
        widths
    }
}

fn border_line(widths: &[usize]) -> String {
    let mut line = String::from("+");
    for w in widths {
        line.push_str(&"-".repeat(w + 2));
        line.push('+');
    }
    line.push('\n');
    line
}

fn pad(text: &str, width: usize, align: Align) -> String {
    let fill = " ".repeat(width.saturating_sub(text.width()));
    match align {
        Align::Left  => format!("{text}{fill}"),
        Align::Right => format!("{fill}{text}"),
    }
}

fn centre(text: &str, width: usize) -> String {
    let gap = width.saturating_sub(text.width());
    let left = gap / 2;
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(gap - left))
}
