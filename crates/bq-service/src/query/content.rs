use bq_resources::table::TableSchema;
use bq_resources::table_data::TableRow;

/// Written in place of null, missing or empty cell values.
pub const NULL_SENTINEL: &str = "-1";

/// Appends one comma joined, newline terminated line per row.
///
/// Only the first `schema.len()` cells of a row are written (all of them
/// without a schema). Rows without any cells to write, including every row
/// under a schema with no fields, produce no output.
pub(super) fn write_rows(out: &mut String, schema: Option<&TableSchema>, rows: &[TableRow]) {
    let width = schema.map_or(usize::MAX, TableSchema::len);

    for row in rows {
        if row.is_empty() || width == 0 {
            continue;
        }

        let cells = row.f.iter().take(width);

        for (idx, cell) in cells.enumerate() {
            if idx > 0 {
                out.push(',');
            }

            match cell.v.as_deref() {
                Some(value) if !value.is_empty() => out.push_str(value),
                _ => out.push_str(NULL_SENTINEL),
            }
        }

        out.push('\n');
    }
}
