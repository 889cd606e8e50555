//! Records → template-ordered wide tables.
//!
//! Each category's records are pivoted so that metrics become rows and
//! institutes become columns:
//!
//! ```text
//!                          ABC Univ   XYZ Inst
//! rank                     1          2
//! Name of the Institute    ABC Univ   XYZ Inst
//! Approved Intake (UG)     1200
//! …
//! ```
//!
//! Row order always follows the category's template; a metric no record
//! carries becomes a blank row, and a field the template does not know is
//! dropped.

use crate::category::Category;
use crate::record::{records_for, CategoryDocument, Record};
use crate::templates::{display_label, row_template, INSTITUTE_NAME_KEY, INSTITUTE_NAME_LABEL};
use indexmap::{IndexMap, IndexSet};
use serde_json::Value;
use tracing::{debug, info, warn};

/// One category's pivoted data.
#[derive(Debug, Clone, PartialEq)]
pub struct WideTable {
    pub category: Category,
    /// Institute names, in order of first appearance.
    pub columns: Vec<String>,
    /// Row label and one cell per column. `Null` is a blank cell.
    pub rows: Vec<(String, Vec<Value>)>,
}

impl WideTable {
    /// Restrict and reorder rows to exactly `template`.
    ///
    /// Labels missing from the table become blank rows; rows whose label is
    /// not in the template are dropped. Applying the same template twice is
    /// a no-op.
    pub fn reindex(&mut self, template: &[&str]) {
        let width = self.columns.len();
        let mut by_label: IndexMap<String, Vec<Value>> = self.rows.drain(..).collect();

        self.rows = template
            .iter()
            .map(|label| {
                let cells = by_label
                    .swap_remove(*label)
                    .unwrap_or_else(|| vec![Value::Null; width]);
                (label.to_string(), cells)
            })
            .collect();
    }

    /// Row labels in order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|(label, _)| label.as_str())
    }

    /// Cell at (`label`, `institute`), `None` if either is unknown.
    pub fn cell(&self, label: &str, institute: &str) -> Option<&Value> {
        let col = self.columns.iter().position(|c| c == institute)?;
        self.rows
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, cells)| &cells[col])
    }

    /// The sheet grid: a header row (blank corner, then institute names)
    /// followed by one row per label. Blank cells become empty strings and
    /// nested objects or arrays become their JSON text.
    pub fn to_grid(&self) -> Vec<Vec<Value>> {
        let header = std::iter::once(Value::String(String::new()))
            .chain(self.columns.iter().cloned().map(Value::String))
            .collect();

        std::iter::once(header)
            .chain(self.rows.iter().map(|(label, cells)| {
                std::iter::once(Value::String(label.clone()))
                    .chain(cells.iter().map(scalar_cell))
                    .collect()
            }))
            .collect()
    }

    /// Grid height and width, header row and label column included.
    pub fn grid_size(&self) -> (usize, usize) {
        (self.rows.len() + 1, self.columns.len() + 1)
    }
}

/// Sheets only accepts scalar cells.
fn scalar_cell(value: &Value) -> Value {
    match value {
        Value::Null => Value::String(String::new()),
        Value::Object(_) | Value::Array(_) => Value::String(value.to_string()),
        other => other.clone(),
    }
}

/// Combine the two intermediate documents.
///
/// Starts from the PDF document; a `Research` entry in the research
/// document replaces any `Research` entry already present.
pub fn merge(pdf_doc: &CategoryDocument, research_doc: &CategoryDocument) -> CategoryDocument {
    let mut merged = pdf_doc.clone();
    let research = Category::Research.as_str();
    if let Some(records) = research_doc.get(research) {
        merged.insert(research.to_string(), records.clone());
    }
    merged
}

/// Pivot one category's records into a template-ordered wide table.
///
/// Returns `None` when no record carries an institute name.
pub fn build_wide_table(category: Category, records: &[Record]) -> Option<WideTable> {
    // institute → (display label → value); re-inserting a name keeps its slot.
    let mut by_institute: IndexMap<String, IndexMap<String, Value>> = IndexMap::new();
    let mut labels: IndexSet<String> = IndexSet::new();

    for (i, record) in records.iter().enumerate() {
        let Some(name) = institute_name(record) else {
            warn!("{category}: record {i} has no institute name, skipping");
            continue;
        };

        let mut renamed: IndexMap<String, Value> = record
            .iter()
            .map(|(key, value)| {
                let label = display_label(key).unwrap_or(key.as_str());
                (label.to_string(), value.clone())
            })
            .collect();
        renamed.insert(INSTITUTE_NAME_LABEL.to_string(), Value::String(name.clone()));

        labels.extend(renamed.keys().cloned());
        if by_institute.insert(name.clone(), renamed).is_some() {
            debug!("{category}: duplicate institute '{name}', later record wins");
        }
    }

    if by_institute.is_empty() {
        warn!("{category}: no record has an institute name, skipping category");
        return None;
    }

    let rows = labels
        .into_iter()
        .map(|label| {
            let cells = by_institute
                .values()
                .map(|fields| fields.get(&label).cloned().unwrap_or(Value::Null))
                .collect();
            (label, cells)
        })
        .collect();

    let mut table = WideTable {
        category,
        columns: by_institute.into_keys().collect(),
        rows,
    };
    table.reindex(row_template(category));
    Some(table)
}

/// Merge both documents and build a wide table for every category that has
/// records, in publish order.
pub fn reshape(pdf_doc: &CategoryDocument, research_doc: &CategoryDocument) -> Vec<WideTable> {
    let merged = merge(pdf_doc, research_doc);

    Category::PUBLISH_ORDER
        .iter()
        .filter_map(|&category| {
            let records = records_for(&merged, category);
            if records.is_empty() {
                debug!("{category}: no records, skipping");
                return None;
            }
            let table = build_wide_table(category, records)?;
            info!(
                "{category}: {} institutes × {} rows",
                table.columns.len(),
                table.rows.len()
            );
            Some(table)
        })
        .collect()
}

/// Non-blank institute name of a record, trimmed.
fn institute_name(record: &Record) -> Option<String> {
    let name = match record.get(INSTITUTE_NAME_KEY)? {
        Value::String(s) => s.trim().to_string(),
        Value::Null => return None,
        other => other.to_string(),
    };
    (!name.is_empty()).then_some(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => panic!("test record must be an object"),
        }
    }

    fn doc(entries: &[(&str, Vec<Record>)]) -> CategoryDocument {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn rows_follow_template_regardless_of_field_order() {
        let records = vec![
            record(json!({"total_faculty": 300, "institute_name": "ABC Univ", "rank": "1"})),
            record(json!({"rank": "2", "total_faculty": 150, "institute_name": "XYZ Inst"})),
        ];
        let table = build_wide_table(Category::Overall, &records).unwrap();

        let labels: Vec<_> = table.labels().collect();
        assert_eq!(labels, row_template(Category::Overall));
        assert_eq!(table.columns, vec!["ABC Univ", "XYZ Inst"]);
        assert_eq!(table.cell("Number of faculty members", "XYZ Inst"), Some(&json!(150)));
        assert_eq!(table.cell("rank", "ABC Univ"), Some(&json!("1")));
    }

    #[test]
    fn absent_metric_is_blank_row() {
        let records = vec![record(json!({"institute_name": "ABC Univ"}))];
        let table = build_wide_table(Category::Engineering, &records).unwrap();
        assert_eq!(
            table.cell("Valid NAAC Accrediatation", "ABC Univ"),
            Some(&Value::Null)
        );
    }

    #[test]
    fn unknown_fields_are_dropped() {
        let records = vec![record(json!({
            "institute_name": "ABC Univ",
            "favourite_colour": "blue",
            "Online education": "Yes"
        }))];
        let table = build_wide_table(Category::Law, &records).unwrap();
        assert!(table.labels().all(|l| l != "favourite_colour"));
        assert_eq!(table.cell("Online education", "ABC Univ"), Some(&json!("Yes")));
    }

    #[test]
    fn reindex_is_idempotent() {
        let records = vec![record(json!({"institute_name": "A", "rank": "3"}))];
        let mut table = build_wide_table(Category::Overall, &records).unwrap();
        let once = table.clone();
        table.reindex(row_template(Category::Overall));
        assert_eq!(table, once);
    }

    #[test]
    fn duplicate_names_overwrite_in_place() {
        let records = vec![
            record(json!({"institute_name": "A", "rank": "1"})),
            record(json!({"institute_name": "B", "rank": "2"})),
            record(json!({"institute_name": "A", "rank": "9"})),
        ];
        let table = build_wide_table(Category::University, &records).unwrap();
        assert_eq!(table.columns, vec!["A", "B"]);
        assert_eq!(table.cell("rank", "A"), Some(&json!("9")));
    }

    #[test]
    fn name_row_is_filled() {
        let records = vec![record(json!({"institute_name": "  Spaced  ", "rank": "4"}))];
        let table = build_wide_table(Category::Overall, &records).unwrap();
        assert_eq!(
            table.cell(INSTITUTE_NAME_LABEL, "Spaced"),
            Some(&json!("Spaced"))
        );
    }

    #[test]
    fn nameless_records_are_skipped() {
        let records = vec![
            record(json!({"rank": "1"})),
            record(json!({"institute_name": "", "rank": "2"})),
            record(json!({"institute_name": "Named", "rank": "3"})),
        ];
        let table = build_wide_table(Category::Overall, &records).unwrap();
        assert_eq!(table.columns, vec!["Named"]);

        assert!(build_wide_table(Category::Overall, &records[..2]).is_none());
    }

    #[test]
    fn research_uses_short_template() {
        let records = vec![record(json!({
            "rank": "7", "institute_name": "ABC Univ", "nirf_id": "IR-1-123",
            "category": "Research", "qnr_100": "10", "qlr_100": "20",
            "sfc_100": "30", "oi_100": "40", "perception_100": "5"
        }))];
        let table = build_wide_table(Category::Research, &records).unwrap();
        assert_eq!(table.rows.len(), 9);
        assert_eq!(table.cell("PERCEPTION(100)", "ABC Univ"), Some(&json!("5")));
        assert_eq!(
            table.cell("Institute / University ID (as per NIRF)", "ABC Univ"),
            Some(&json!("IR-1-123"))
        );
    }

    #[test]
    fn grid_has_header_and_blank_cells() {
        let records = vec![
            record(json!({"institute_name": "A", "rank": "1"})),
            record(json!({"institute_name": "B"})),
        ];
        let table = build_wide_table(Category::Research, &records).unwrap();
        let grid = table.to_grid();

        assert_eq!(grid.len(), 10);
        assert_eq!(grid[0], vec![json!(""), json!("A"), json!("B")]);
        assert_eq!(grid[1], vec![json!("rank"), json!("1"), json!("")]);
        assert_eq!(table.grid_size(), (10, 3));
    }

    #[test]
    fn nested_values_are_written_as_json_text() {
        let records = vec![record(json!({
            "institute_name": "A",
            "total_faculty": {"regular": 300, "visiting": 12},
            "rank": ["1", "2"]
        }))];
        let table = build_wide_table(Category::Overall, &records).unwrap();
        let grid = table.to_grid();

        assert!(grid
            .iter()
            .flatten()
            .all(|cell| !cell.is_object() && !cell.is_array()));
        let faculty = grid
            .iter()
            .find(|row| row[0] == "Number of faculty members")
            .unwrap();
        assert_eq!(faculty[1], json!(r#"{"regular":300,"visiting":12}"#));
        let rank = grid.iter().find(|row| row[0] == "rank").unwrap();
        assert_eq!(rank[1], json!(r#"["1","2"]"#));
    }

    #[test]
    fn merge_research_document_wins() {
        let pdf = doc(&[
            ("Overall", vec![record(json!({"institute_name": "A"}))]),
            ("Research", vec![record(json!({"institute_name": "Stale"}))]),
        ]);
        let research = doc(&[("Research", vec![record(json!({"institute_name": "Fresh"}))])]);
        let merged = merge(&pdf, &research);
        assert_eq!(merged["Research"][0]["institute_name"], "Fresh");
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn reshape_uses_publish_order_and_skips_empty() {
        let pdf = doc(&[
            ("Engineering", vec![record(json!({"institute_name": "E"}))]),
            ("Overall", vec![record(json!({"institute_name": "O"}))]),
            ("University", vec![]),
        ]);
        let research = doc(&[("Research", vec![record(json!({"institute_name": "R"}))])]);

        let order: Vec<_> = reshape(&pdf, &research).iter().map(|t| t.category).collect();
        assert_eq!(
            order,
            vec![Category::Overall, Category::Research, Category::Engineering]
        );
    }

    #[test]
    fn reshape_of_nothing_is_empty() {
        assert!(reshape(&CategoryDocument::new(), &CategoryDocument::new()).is_empty());
    }
}
