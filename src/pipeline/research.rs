//! Research ranking table scraper.
//!
//! The Research page publishes its results as `table#tbl_overall`. Each data
//! row has at least six direct `<td>` cells (ID, name, …, rank) and hides a
//! second table inside the name cell (`div.tbl_hidden > table`) whose body
//! carries the five sub-scores.
//!
//! ```text
//! <tr>
//!   <td>IR-1-123</td>
//!   <td>ABC Univ <div class="tbl_hidden"><table>…<tbody><td>10</td>…</tbody></table></div></td>
//!   …
//!   <td>7</td>
//! </tr>
//! ```
//!
//! All markup knowledge lives in [`extract_research_row`]; when the site
//! changes, that is the function to fix.

use crate::category::Category;
use crate::record::Record;
use crate::templates::{research_score_keys, INSTITUTE_NAME_KEY};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use serde_json::Value;
use tracing::{debug, warn};

/// Id of the results table on the Research page.
pub const RESULTS_TABLE_ID: &str = "tbl_overall";

const MIN_MAIN_COLUMNS: usize = 6;
const NESTED_SCORE_COLUMNS: usize = 5;
const NIRF_ID_COLUMN: usize = 0;
const NAME_COLUMN: usize = 1;
const RANK_COLUMN: usize = 5;

static RESULTS_TABLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(&format!("table#{RESULTS_TABLE_ID}")).unwrap());
static HIDDEN_DIV: Lazy<Selector> = Lazy::new(|| Selector::parse("div.tbl_hidden").unwrap());
static TABLE: Lazy<Selector> = Lazy::new(|| Selector::parse("table").unwrap());

/// Scrape every usable row of the Research results table in `html`.
///
/// A page without the results table yields no records and a warning; rows
/// that do not match the expected shape are skipped silently.
pub fn scrape_research_table(html: &str) -> Vec<Record> {
    let document = Html::parse_document(html);

    let Some(table) = document.select(&RESULTS_TABLE).next() else {
        warn!("No table with id='{RESULTS_TABLE_ID}' on the Research page");
        return Vec::new();
    };

    let rows: Vec<ElementRef> = child_elements(table, "tbody")
        .flat_map(|tbody| child_elements(tbody, "tr"))
        .collect();

    let records: Vec<Record> = rows.iter().filter_map(|row| extract_research_row(*row)).collect();
    debug!("Research table: {} rows, {} records", rows.len(), records.len());
    records
}

/// Turn one results-table row into a record.
///
/// Returns `None` when the row has fewer than six direct cells, no direct
/// institute-name text, no hidden score table, or fewer than five scores.
pub fn extract_research_row(row: ElementRef<'_>) -> Option<Record> {
    let cols: Vec<ElementRef> = child_elements(row, "td").collect();
    if cols.len() < MIN_MAIN_COLUMNS {
        return None;
    }

    let name_cell = cols[NAME_COLUMN];
    let institute_name = direct_text(name_cell)?;

    let nested = name_cell
        .select(&HIDDEN_DIV)
        .next()?
        .select(&TABLE)
        .next()?;
    let scores: Vec<String> = child_elements(nested, "tbody")
        .flat_map(|tbody| child_elements(tbody, "tr"))
        .flat_map(|tr| child_elements(tr, "td"))
        .map(cell_text)
        .collect();
    if scores.len() < NESTED_SCORE_COLUMNS {
        return None;
    }

    let mut record = Record::new();
    record.insert("rank".into(), Value::String(cell_text(cols[RANK_COLUMN])));
    record.insert(INSTITUTE_NAME_KEY.into(), Value::String(institute_name));
    record.insert("nirf_id".into(), Value::String(cell_text(cols[NIRF_ID_COLUMN])));
    record.insert(
        "category".into(),
        Value::String(Category::Research.as_str().to_string()),
    );
    for (key, score) in research_score_keys().zip(scores) {
        record.insert(key.into(), Value::String(score));
    }
    Some(record)
}

/// Direct element children of `parent` with tag `name`.
fn child_elements<'a>(
    parent: ElementRef<'a>,
    name: &'static str,
) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    parent
        .children()
        .filter_map(ElementRef::wrap)
        .filter(move |e| e.value().name() == name)
}

/// All descendant text of `cell`, trimmed.
fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text().collect::<String>().trim().to_string()
}

/// First non-blank text node that is a direct child of `cell`.
///
/// The name cell also contains the hidden score table, so its full text
/// would drag the scores along.
fn direct_text(cell: ElementRef<'_>) -> Option<String> {
    cell.children()
        .filter_map(|node| node.value().as_text())
        .map(|text| text.trim())
        .find(|text| !text.is_empty())
        .map(str::to_string)
}
