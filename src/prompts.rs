//! Prompt text for LLM-based field extraction.
//!
//! The prompt is fully deterministic: the same category and document text
//! always produce byte-identical prompts, so replies can be compared across
//! models and runs.

use crate::templates::prompt_fields;

/// Extraction rules embedded in every prompt.
///
/// They are instructions to the model only; nothing in the pipeline checks
/// that a reply followed them.
pub const EXTRACTION_RULES: &str = r#"CRITICAL INSTRUCTIONS:
1. Extract values ONLY for the fields listed below.
2. For any metric reported for several years (e.g. expenditures), use the MOST RECENT year available.
3. Reply with a single raw JSON object. No explanations, no markdown, no ```json fences.
4. Use the JSON keys exactly as listed below.
5. When two UG or PG rows differ only in programme length (e.g. 3-year and 4-year UG), add them together. Integrated programmes are never merged."#;

/// Build the `- key: for the metric 'description'` block.
pub fn field_list() -> String {
    prompt_fields()
        .map(|(key, desc)| format!("- {key}: for the metric '{desc}'"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build the full extraction prompt for one document.
pub fn extraction_prompt(category: &str, text: &str) -> String {
    format!(
        "From the text of the NIRF report for the '{category}' category, extract the data for the institution.\n\
         {EXTRACTION_RULES}\n\n\
         FIELDS TO EXTRACT:\n\
         {fields}\n\n\
         TEXT TO ANALYZE:\n\
         {text}\n",
        fields = field_list(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_is_deterministic() {
        let a = extraction_prompt("Overall", "some text");
        let b = extraction_prompt("Overall", "some text");
        assert_eq!(a, b);
    }

    #[test]
    fn prompt_names_category_and_keys() {
        let p = extraction_prompt("Engineering", "REPORT BODY");
        assert!(p.contains("'Engineering' category"));
        assert!(p.contains("- capital_expenditure_23_24: for the metric 'Annual capital expenditure (2023-24)'"));
        assert!(p.contains("- naac_accreditation: for the metric 'Valid NAAC Accreditation'"));
        assert!(p.trim_end().ends_with("REPORT BODY"));
    }

    #[test]
    fn rules_precede_fields() {
        let p = extraction_prompt("Overall", "x");
        let rules = p.find("MOST RECENT").unwrap();
        let fields = p.find("FIELDS TO EXTRACT").unwrap();
        assert!(rules < fields);
    }

    #[test]
    fn field_list_has_one_line_per_key() {
        assert_eq!(field_list().lines().count(), 48);
    }
}
