//! Result Formatting
//!
//! Converts query result rows into the forms the command loop needs:
//! an aligned terminal table, the labelled block used for review listings,
//! and the header-to-value mappings consumed by the XML exporter.

use comfy_table::{Cell, Table};
use serde_json::{Map, Value};

use crate::db::Row;

/// Zip a heading list with each row into an ordered mapping.
///
/// The pairing is positional: heading `i` labels column `i`. Rows shorter
/// than the heading list simply produce shorter mappings.
pub fn to_mappings(headings: &[&str], rows: &[Row]) -> Vec<Map<String, Value>> {
    rows.iter()
        .map(|row| {
            headings
                .iter()
                .zip(row.iter())
                .map(|(heading, value)| ((*heading).to_string(), value.clone()))
                .collect()
        })
        .collect()
}

/// Render rows as an aligned table with a leading row-index column.
///
/// An empty result set renders the header row only.
pub fn render_table(headings: &[&str], rows: &[Row]) -> String {
    let mut table = Table::new();

    let mut header = vec![Cell::new("#")];
    header.extend(headings.iter().map(Cell::new));
    table.set_header(header);

    for (idx, row) in rows.iter().enumerate() {
        let mut cells = vec![Cell::new(idx)];
        cells.extend(row.iter().map(|value| Cell::new(format_cell(value))));
        table.add_row(cells);
    }

    table.to_string()
}

/// Render one review row as a labelled block.
///
/// Columns are completeness, efficiency, style, documentation, review text,
/// in that order.
pub fn review_block(row: &Row) -> String {
    let cell = |idx: usize| row.get(idx).map(format_cell).unwrap_or_default();

    format!(
        "Completeness : {}\n\
         Efficiency   : {}\n\
         Style        : {}\n\
         Documentation: {}\n\
         Review       : {}",
        cell(0),
        cell(1),
        cell(2),
        cell(3),
        cell(4),
    )
}

/// Display form of a single cell value
pub fn format_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}
