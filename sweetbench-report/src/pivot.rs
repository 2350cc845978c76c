//! Pivot Table Builder
//!
//! Turns a flat list of comparisons into row/column tables:
//!
//! ```text
//! comparisons ──► group by `grouping` (sorted)      one table per group
//!                      │
//!                      └─► group by `row`           one row per key
//!                               │
//!                               └─► column(c) → value(c)
//! ```
//!
//! With the defaults every metric gets its own table, labels form the rows
//! and the single column holds `comp_short`.

use crate::comparison::Comparison;
use crate::key::Key;
use crate::partition::{KeySpec, Record, group};
use crate::table::{Cell, TableRenderer, TableRow};
use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;

/// Cell extraction closure
pub type CellFn = Arc<dyn Fn(&Comparison) -> Cell + Send + Sync>;

/// What goes into each pivot cell
#[derive(Clone)]
pub enum ValueSpec {
    /// A comparison field, unstyled
    Field(String),
    /// A comparison field colored by rank
    Colored(String),
    /// Arbitrary cell builder
    Function(CellFn),
}

impl ValueSpec {
    /// Plain field value
    pub fn field(name: impl Into<String>) -> Self {
        ValueSpec::Field(name.into())
    }

    /// Field value colored by rank (see [`Comparison::colored`])
    pub fn colored(name: impl Into<String>) -> Self {
        ValueSpec::Colored(name.into())
    }

    /// Custom cell builder
    pub fn function<F>(f: F) -> Self
    where
        F: Fn(&Comparison) -> Cell + Send + Sync + 'static,
    {
        ValueSpec::Function(Arc::new(f))
    }

    /// Parse `"field"` or `"colored:field"`
    pub fn parse(s: &str) -> Self {
        match s.strip_prefix("colored:") {
            Some(name) => ValueSpec::colored(name),
            None => ValueSpec::field(s),
        }
    }

    /// Cell for one comparison
    pub fn cell(&self, comparison: &Comparison) -> Cell {
        match self {
            ValueSpec::Field(name) => Cell::plain(
                comparison
                    .field(name)
                    .map(|k| k.short())
                    .unwrap_or_default(),
            ),
            ValueSpec::Colored(name) => comparison.colored(name),
            ValueSpec::Function(f) => f(comparison),
        }
    }
}

impl Default for ValueSpec {
    fn default() -> Self {
        ValueSpec::field("comp_short")
    }
}

impl fmt::Debug for ValueSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueSpec::Field(name) => f.debug_tuple("Field").field(name).finish(),
            ValueSpec::Colored(name) => f.debug_tuple("Colored").field(name).finish(),
            ValueSpec::Function(_) => f.write_str("Function(..)"),
        }
    }
}

/// Pivot layout
#[derive(Debug, Clone)]
pub struct PivotOptions {
    /// Splits comparisons into separate tables; `None` renders one table
    pub grouping: Option<KeySpec<Comparison>>,
    /// Key naming each row
    pub row: KeySpec<Comparison>,
    /// Key naming each column
    pub column: KeySpec<Comparison>,
    /// Cell contents
    pub value: ValueSpec,
    /// Sort rows by key instead of first appearance
    pub sort: bool,
    explicit_grouping: bool,
}

impl Default for PivotOptions {
    fn default() -> Self {
        Self {
            grouping: Some(KeySpec::field("metric")),
            row: KeySpec::field("label"),
            column: KeySpec::field("metric"),
            value: ValueSpec::default(),
            sort: false,
            explicit_grouping: false,
        }
    }
}

impl PivotOptions {
    /// Replace the table grouping. `None` renders a single table.
    pub fn grouping(mut self, grouping: Option<KeySpec<Comparison>>) -> Self {
        self.grouping = grouping;
        self.explicit_grouping = true;
        self
    }

    /// Whether the grouping was chosen through [`PivotOptions::grouping`]
    pub fn has_explicit_grouping(&self) -> bool {
        self.explicit_grouping
    }

    /// Use `grouping` unless one was chosen explicitly
    pub fn or_grouping(mut self, grouping: KeySpec<Comparison>) -> Self {
        if !self.explicit_grouping {
            self.grouping = Some(grouping);
        }
        self
    }

    /// Replace the row key
    pub fn row(mut self, row: KeySpec<Comparison>) -> Self {
        self.row = row;
        self
    }

    /// Replace the column key
    pub fn column(mut self, column: KeySpec<Comparison>) -> Self {
        self.column = column;
        self
    }

    /// Replace the cell contents
    pub fn value(mut self, value: ValueSpec) -> Self {
        self.value = value;
        self
    }

    /// Sort rows by key
    pub fn sort(mut self, sort: bool) -> Self {
        self.sort = sort;
        self
    }

    /// Column holding the row keys
    pub fn row_header(&self) -> &str {
        self.row.field_name().unwrap_or("label")
    }

    /// Name printed before each group value
    pub fn header_name(&self) -> String {
        self.grouping
            .as_ref()
            .map(KeySpec::header_name)
            .unwrap_or_default()
    }
}

/// One table of a pivot
#[derive(Debug, Clone)]
pub struct PivotTable {
    /// Name of the grouping
    pub header_name: String,
    /// Group value shared by every comparison in the table
    pub group: Option<Key>,
    /// Row records, each carrying every column
    pub rows: Vec<TableRow>,
}

impl PivotTable {
    /// Write the heading and table
    pub fn render<W: Write + ?Sized>(&self, renderer: &TableRenderer, out: &mut W) -> io::Result<()> {
        renderer.print_table(&self.header_name, self.group.as_ref(), &self.rows, out)
    }
}

/// Fold one group's comparisons into row records
fn table_rows(comparisons: &[&Comparison], options: &PivotOptions) -> Vec<TableRow> {
    let row_header = options.row_header();
    let column_of = options.column.extractor();

    let mut columns: Vec<String> = Vec::new();
    for &comparison in comparisons {
        if let Some(column) = column_of(comparison) {
            let column = column.short();
            if !columns.contains(&column) {
                columns.push(column);
            }
        }
    }

    group(comparisons.iter().copied(), Some(&options.row), options.sort)
        .into_iter()
        .filter_map(|partition| {
            let key = partition.key?;
            let mut row = TableRow::new().with(row_header, key.short());
            for column in &columns {
                row.set(column.as_str(), Cell::empty());
            }
            for comparison in partition.items {
                if let Some(column) = column_of(comparison) {
                    row.set(column.short(), options.value.cell(comparison));
                }
            }
            Some(row)
        })
        .collect()
}

/// Pivot `comparisons`, handing each table to `handler` as it is built
pub fn pivot_each<F>(comparisons: &[Comparison], options: &PivotOptions, mut handler: F)
where
    F: FnMut(Option<&Key>, &[TableRow]),
{
    for partition in group(comparisons, options.grouping.as_ref(), true) {
        let rows = table_rows(&partition.items, options);
        handler(partition.key.as_ref(), &rows);
    }
}

/// Pivot `comparisons` into tables, one per grouping value in key order
pub fn build_pivot_tables(comparisons: &[Comparison], options: &PivotOptions) -> Vec<PivotTable> {
    let header_name = options.header_name();
    let mut tables = Vec::new();
    pivot_each(comparisons, options, |group, rows| {
        tables.push(PivotTable {
            header_name: header_name.clone(),
            group: group.cloned(),
            rows: rows.to_vec(),
        });
    });
    tables
}

/// Pivot and print every table
pub fn print_pivot_tables<W: Write + ?Sized>(
    comparisons: &[Comparison],
    options: &PivotOptions,
    renderer: &TableRenderer,
    out: &mut W,
) -> io::Result<()> {
    for table in build_pivot_tables(comparisons, options) {
        table.render(renderer, out)?;
    }
    Ok(())
}
