//! Index column selection for tabular objects.

use tracing::debug;

use super::model::Table;
use crate::definitions::{standard_index_columns, STANDARD_TABLE_INDEX_COLUMNS};
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::enums::Content;
use crate::errors::{invalid, Result};

const REALIZATION_COLUMN: &str = "REAL";

/// Derives `data.table_index` for `table`.
///
/// An explicit index is checked against the table columns. Otherwise the
/// well-known columns for `content` are used, falling back to every known
/// standard column when the content kind has none present. `REAL` is
/// appended when the table has it. Index columns holding only empty values
/// are dropped with a warning.
pub fn derive_table_index(
    explicit: Option<&[String]>,
    content: Option<Content>,
    table: &Table,
    sink: &dyn DiagnosticSink,
) -> Result<Vec<String>> {
    let mut index = match explicit {
        Some(cols) => {
            if let Some(missing) = cols.iter().find(|c| table.column(c).is_none()) {
                return Err(invalid("table_index", format!("{missing} is not in table")));
            }
            cols.to_vec()
        }
        None => infer_index(content, table),
    };

    if table.column(REALIZATION_COLUMN).is_some() && !index.iter().any(|c| c == REALIZATION_COLUMN) {
        index.push(REALIZATION_COLUMN.to_string());
    }

    let (kept, empty): (Vec<String>, Vec<String>) = index
        .into_iter()
        .partition(|c| table.column(c).is_some_and(|col| !col.is_all_empty()));
    if !empty.is_empty() {
        sink.emit(Diagnostic::warning(format!(
            "Index columns {empty:?} contain only empty values and are removed from the table index."
        )));
    }
    debug!(index = ?kept, "Derived table index");
    Ok(kept)
}

fn infer_index(content: Option<Content>, table: &Table) -> Vec<String> {
    let present = |cols: &[&str]| -> Vec<String> {
        cols.iter()
            .filter(|c| table.column(c).is_some())
            .map(|c| (*c).to_string())
            .collect()
    };

    if let Some(cols) = content.and_then(standard_index_columns) {
        let found = present(cols);
        if !found.is_empty() {
            return found;
        }
    }

    let mut found = Vec::new();
    for (kind, cols) in STANDARD_TABLE_INDEX_COLUMNS {
        let hits = present(cols);
        if !hits.is_empty() {
            debug!(content = %kind, "Index columns matched a standard content kind");
        }
        found.extend(hits);
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::CollectingDiagnosticSink;
    use crate::objects::model::{CellValue, Column, TableLayout};

    fn text(v: &[&str]) -> Vec<CellValue> {
        v.iter().map(|s| CellValue::Text((*s).to_string())).collect()
    }

    fn volumes() -> Table {
        Table {
            name: String::new(),
            layout: TableLayout::RowOriented,
            columns: vec![
                Column::new("ZONE", text(&["Valysar", "Therys"])),
                Column::new("REGION", text(&["WestLowland", "CentralSouth"])),
                Column::new("LICENCE", vec![CellValue::Null, CellValue::Null]),
                Column::new("STOIIP_OIL", vec![CellValue::Float(1.2), CellValue::Float(3.4)]),
                Column::new("REAL", vec![CellValue::Int(0), CellValue::Int(0)]),
            ],
        }
    }

    #[test]
    fn test_inferred_from_content() {
        let sink = CollectingDiagnosticSink::new();
        let idx = derive_table_index(None, Some(Content::Volumes), &volumes(), &sink).unwrap();
        assert_eq!(idx, vec!["ZONE", "REGION", "REAL"]);
        assert!(sink.contains("LICENCE"));
    }

    #[test]
    fn test_legacy_scan_without_content_match() {
        let sink = CollectingDiagnosticSink::new();
        let idx = derive_table_index(None, Some(Content::Property), &volumes(), &sink).unwrap();
        assert_eq!(idx, vec!["ZONE", "REGION", "REAL"]);
    }

    #[test]
    fn test_explicit_index_checked() {
        let sink = CollectingDiagnosticSink::new();
        let explicit = vec!["ZONE".to_string(), "WELL".to_string()];
        let err = derive_table_index(Some(&explicit), None, &volumes(), &sink).unwrap_err();
        assert!(err.to_string().contains("WELL is not in table"));

        let explicit = vec!["STOIIP_OIL".to_string()];
        let idx = derive_table_index(Some(&explicit), None, &volumes(), &sink).unwrap();
        assert_eq!(idx, vec!["STOIIP_OIL", "REAL"]);
    }

    #[test]
    fn test_no_index_columns() {
        let sink = CollectingDiagnosticSink::new();
        let table = Table {
            name: String::new(),
            layout: TableLayout::Columnar,
            columns: vec![Column::new("A", vec![CellValue::Int(1)])],
        };
        assert!(derive_table_index(None, None, &table, &sink).unwrap().is_empty());
        assert!(sink.is_empty());
    }
}
