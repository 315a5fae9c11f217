//! CSV export of grid rows.

use std::io::Write;

use crate::columns::{ColumnConfigModel, display_value};
use crate::error::GridResult;
use crate::types::{Row, display_string};

/// Write `rows` as CSV: one column per visible column in display order, headed by its
/// effective label, with cells rendered as plain text.
pub fn write_csv<W: Write>(writer: W, columns: &ColumnConfigModel, rows: &[Row]) -> GridResult<()> {
    let visible = columns.visible_columns();
    let mut out = csv::Writer::from_writer(writer);

    out.write_record(
        visible
            .iter()
            .map(|c| columns.effective_label(&c.key).unwrap_or(c.key.as_str())),
    )?;

    for row in rows {
        out.write_record(visible.iter().map(|c| {
            let value = row.get(&c.key);
            match columns.definition(&c.key) {
                Some(def) => display_value(def, value),
                None => display_string(value),
            }
        }))?;
    }
    out.flush()?;
    Ok(())
}
