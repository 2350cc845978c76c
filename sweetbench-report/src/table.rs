//! Table Rendering
//!
//! Prints row records as a fixed-width text table:
//!
//! ```text
//! method | nil                            | str          
//! -------|--------------------------------|--------------
//! split  | 51825798.8 i/s                 | 1407946.4 i/s
//! to_s   | 5685237.1 i/s - 9.12x (± 0.12) |              
//! ```
//!
//! Every cell is left aligned and padded to its column's width.
//!
//! Cells keep their content apart from their style. Column widths are
//! measured on visible characters: ANSI escapes, whether applied by the
//! renderer or already embedded in the content, never count.

use crate::key::Key;
use regex::Regex;
use std::borrow::Cow;
use std::io::{self, Write};
use std::sync::OnceLock;

/// Terminal color of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    /// Default terminal color
    Neutral,
    /// Best or indistinguishable from best
    Green,
    /// Worst of its partition
    Red,
}

impl Color {
    /// SGR parameter for this color
    pub fn ansi_code(self) -> &'static str {
        match self {
            Color::Neutral => ";0",
            Color::Green => "32",
            Color::Red => "31",
        }
    }
}

/// One table cell
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cell {
    content: String,
    color: Option<Color>,
}

impl Cell {
    /// Unstyled cell
    pub fn plain(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            color: None,
        }
    }

    /// Cell printed in `color`
    pub fn styled(content: impl Into<String>, color: Color) -> Self {
        Self {
            content: content.into(),
            color: Some(color),
        }
    }

    /// Placeholder for a missing row/column combination
    pub fn empty() -> Self {
        Self::default()
    }

    /// Text of the cell
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Style of the cell
    pub fn color(&self) -> Option<Color> {
        self.color
    }

    /// Whether the cell has no visible content
    pub fn is_empty(&self) -> bool {
        visible_width(&self.content) == 0
    }

    /// Width of the content once escapes are removed
    pub fn width(&self) -> usize {
        visible_width(&self.content)
    }

    fn paint(&self, width: usize, color: bool) -> String {
        let pad = " ".repeat(width.saturating_sub(self.width()));
        match self.color {
            Some(c) if color => format!("\x1b[{}m{}\x1b[0m{}", c.ansi_code(), self.content, pad),
            _ => format!("{}{}", self.content, pad),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::plain(s)
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::plain(s)
    }
}

/// One row record: column key to cell, in column order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableRow {
    cells: Vec<(String, Cell)>,
}

impl TableRow {
    /// Empty row
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a cell, keeping the column position when it already exists
    pub fn set(&mut self, column: impl Into<String>, cell: impl Into<Cell>) {
        let column = column.into();
        let cell = cell.into();
        match self.cells.iter_mut().find(|(k, _)| *k == column) {
            Some((_, slot)) => *slot = cell,
            None => self.cells.push((column, cell)),
        }
    }

    /// Builder-style [`TableRow::set`]
    pub fn with(mut self, column: impl Into<String>, cell: impl Into<Cell>) -> Self {
        self.set(column, cell);
        self
    }

    /// Cell of a column
    pub fn get(&self, column: &str) -> Option<&Cell> {
        self.cells.iter().find(|(k, _)| k == column).map(|(_, c)| c)
    }

    /// Column keys in order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(k, _)| k.as_str())
    }

    /// Cells in column order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Cell)> {
        self.cells.iter().map(|(k, c)| (k.as_str(), c))
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the row has no columns
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

fn ansi_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\x1b\[[0-9;]*[A-Za-z]").expect("Invalid ANSI escape pattern")
    })
}

/// Remove ANSI escape sequences
pub fn strip_ansi(s: &str) -> Cow<'_, str> {
    ansi_pattern().replace_all(s, "")
}

/// Number of characters shown on a terminal
pub fn visible_width(s: &str) -> usize {
    strip_ansi(s).chars().count()
}

/// Fixed-width table printer
#[derive(Debug, Clone, Copy)]
pub struct TableRenderer {
    color: bool,
}

impl Default for TableRenderer {
    fn default() -> Self {
        Self { color: true }
    }
}

impl TableRenderer {
    /// Renderer that styles cells when `color` is set
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// Whether styled cells are printed with escapes
    pub fn color(&self) -> bool {
        self.color
    }

    /// Write `rows` as a table. The first row's columns define the layout;
    /// empty input writes nothing.
    pub fn render<W: Write + ?Sized>(&self, rows: &[TableRow], out: &mut W) -> io::Result<()> {
        let Some(first) = rows.first() else {
            return Ok(());
        };
        let columns: Vec<&str> = first.keys().collect();
        let empty = Cell::empty();

        let widths: Vec<usize> = columns
            .iter()
            .map(|column| {
                rows.iter()
                    .map(|row| row.get(column).map_or(0, Cell::width))
                    .fold(visible_width(column), usize::max)
            })
            .collect();

        let header: Vec<String> = columns
            .iter()
            .zip(&widths)
            .map(|(column, &width)| Cell::plain(*column).paint(width, false))
            .collect();
        writeln!(out, "{}", header.join(" | "))?;

        let separator: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
        writeln!(out, "{}", separator.join("-|-"))?;

        for row in rows {
            let line: Vec<String> = columns
                .iter()
                .zip(&widths)
                .map(|(column, &width)| {
                    row.get(column)
                        .unwrap_or(&empty)
                        .paint(width, self.color)
                })
                .collect();
            writeln!(out, "{}", line.join(" | "))?;
        }

        Ok(())
    }

    /// [`TableRenderer::render`] into a string
    pub fn format(&self, rows: &[TableRow]) -> String {
        let mut buf = Vec::new();
        // writing to a Vec cannot fail
        let _ = self.render(rows, &mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Write a group heading followed by its table.
    ///
    /// The heading (`"{header_name} {header_value}"` between blank lines) is
    /// only written when the group has a value. Label values print in short form.
    pub fn print_table<W: Write + ?Sized>(
        &self,
        header_name: &str,
        header_value: Option<&Key>,
        rows: &[TableRow],
        out: &mut W,
    ) -> io::Result<()> {
        if let Some(value) = header_value {
            writeln!(out)?;
            writeln!(out, "{header_name} {}", value.short())?;
            writeln!(out)?;
        }
        self.render(rows, out)
    }
}

/// Render `rows` with colors enabled
pub fn format_table(rows: &[TableRow]) -> String {
    TableRenderer::default().format(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(rows: &[TableRow]) -> Vec<String> {
        format_table(rows).lines().map(str::to_string).collect()
    }

    fn pipe_positions(lines: &[String]) -> Vec<Option<usize>> {
        lines
            .iter()
            .map(|l| strip_ansi(l).find('|'))
            .collect()
    }

    #[test]
    fn test_simple_table() {
        let rows = vec![
            TableRow::new().with("name", "fast").with("value", "100"),
            TableRow::new().with("name", "slow").with("value", "50"),
        ];
        let lines = lines(&rows);
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "name | value");
        assert_eq!(lines[1], "-----|------");
        assert_eq!(lines[2], "fast | 100  ");
        assert_eq!(lines[3], "slow | 50   ");
    }

    #[test]
    fn test_module_example() {
        let rows = vec![
            TableRow::new()
                .with("method", "split")
                .with("nil", "51825798.8 i/s")
                .with("str", "1407946.4 i/s"),
            TableRow::new()
                .with("method", "to_s")
                .with("nil", "5685237.1 i/s - 9.12x (± 0.12)")
                .with("str", Cell::empty()),
        ];
        let lines: Vec<String> = TableRenderer::new(false)
            .format(&rows)
            .lines()
            .map(str::to_string)
            .collect();
        assert_eq!(
            lines,
            vec![
                "method | nil                            | str          ",
                "-------|--------------------------------|--------------",
                "split  | 51825798.8 i/s                 | 1407946.4 i/s",
                "to_s   | 5685237.1 i/s - 9.12x (± 0.12) |              ",
            ]
        );
    }

    #[test]
    fn test_varying_widths_align() {
        let rows = vec![
            TableRow::new()
                .with("method", "x&.empty?")
                .with("result", "100.0 i/s"),
            TableRow::new()
                .with("method", "x.try(:empty)")
                .with("result", "50.0 i/s - 2.00x"),
        ];
        let lines = lines(&rows);
        let positions = pipe_positions(&lines);
        assert!(positions.iter().all(|p| *p == positions[0]));
    }

    #[test]
    fn test_embedded_ansi_does_not_count() {
        let rows = vec![
            TableRow::new()
                .with("method", "fast")
                .with("metric", "\x1b[32m100.0 i/s\x1b[0m"),
            TableRow::new()
                .with("method", "slow")
                .with("metric", "\x1b[31m50.0 i/s - 2.00x\x1b[0m"),
        ];
        let lines = lines(&rows);
        let stripped: Vec<String> = lines.iter().map(|l| strip_ansi(l).into_owned()).collect();
        assert_eq!(stripped[0], "method | metric          ");
        assert_eq!(stripped[2], "fast   | 100.0 i/s       ");
        assert_eq!(stripped[3], "slow   | 50.0 i/s - 2.00x");
        // escapes survive into the output
        assert!(lines[2].contains("\x1b[32m"));
    }

    #[test]
    fn test_styled_cells_measure_content() {
        let plain = vec![TableRow::new().with("m", "100.0 i/s")];
        let styled = vec![TableRow::new().with("m", Cell::styled("100.0 i/s", Color::Green))];

        let plain_out = format_table(&plain);
        let styled_out = format_table(&styled);
        assert_ne!(plain_out, styled_out);
        assert_eq!(strip_ansi(&styled_out), plain_out);
        assert!(styled_out.contains("\x1b[32m100.0 i/s\x1b[0m"));
    }

    #[test]
    fn test_color_disabled() {
        let rows = vec![TableRow::new().with("m", Cell::styled("1.0 i/s", Color::Red))];
        let out = TableRenderer::new(false).format(&rows);
        assert!(!out.contains('\x1b'));
    }

    #[test]
    fn test_header_wider_than_values() {
        let rows = vec![
            TableRow::new()
                .with("wide_header_name", "x")
                .with("another_wide_one", "y"),
        ];
        let lines = lines(&rows);
        assert!(lines[0].contains("wide_header_name"));
        assert!(lines[0].contains("another_wide_one"));
        assert_eq!(lines[2], "x                | y               ");
    }

    #[test]
    fn test_value_wider_than_header() {
        let rows = vec![TableRow::new().with("h", "a very long value here")];
        let lines = lines(&rows);
        assert_eq!(lines[1].len(), "a very long value here".len());
    }

    #[test]
    fn test_first_row_defines_columns() {
        let rows = vec![
            TableRow::new().with("method", "a").with("nil", "1"),
            TableRow::new().with("nil", "2").with("method", "b"),
        ];
        let lines = lines(&rows);
        assert_eq!(lines[3], "b      | 2  ");
    }

    #[test]
    fn test_empty_input_renders_nothing() {
        assert_eq!(format_table(&[]), "");
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let rows = vec![
            TableRow::new().with("method", "a").with("ips", Cell::styled("1", Color::Green)),
            TableRow::new().with("method", "b").with("ips", Cell::empty()),
        ];
        assert_eq!(format_table(&rows), format_table(&rows));
    }

    #[test]
    fn test_print_table_heading() {
        let rows = vec![TableRow::new().with("method", "a")];
        let mut out = Vec::new();
        TableRenderer::new(false)
            .print_table("metric", Some(&Key::text("ips")), &rows, &mut out)
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "\nmetric ips\n\nmethod\n------\na     \n");
    }
}
