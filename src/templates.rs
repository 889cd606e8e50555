//! Static tables: row templates, raw-key → display-label map, and the field
//! descriptions sent to the model.
//!
//! All three are built once on first access and never mutated.

use crate::category::Category;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Raw key, display label, prompt description, for every PDF-extracted metric
/// in template order. Display labels keep the spelling of the published sheets.
const REPORT_FIELDS: &[(&str, &str, &str)] = &[
    ("rank", "rank", "Rank"),
    ("institute_name", "Name of the Institute", "Name of the Institute"),
    ("nirf_id", "Institute / University ID (as per NIRF)", "Institute / University ID"),
    ("category", "Category: Overall/Engineering/Law/Management, etc.,", "Category"),
    ("approved_intake_ug", "Approved Intake (UG)", "Approved Intake (UG)"),
    ("approved_intake_pg", "Approved Intake (PG)", "Approved Intake (PG)"),
    ("approved_intake_pg_integrated", "Approved Intake (PG-Integrated)", "Approved Intake (PG-Integrated)"),
    ("total_approved_intake", "Total Approved Intake", "Total Approved Intake"),
    ("students_ug_strength", "No.of. Students UG Strength", "No.of. Students UG Strength"),
    ("students_pg_strength", "No.of. Students PG Strength", "No.of. Students PG Strength"),
    ("students_pg_integrated", "No.of.students PG Integrated", "No.of.students PG Integrated"),
    ("total_students_strength_excluding_phd", "Total Students Strength (Excluding Ph.D)", "Total Students Strength (Excluding Ph.D)"),
    ("phd_full_time", "Ph.D Full-time", "Ph.D Full-time"),
    ("phd_part_time", "Ph.D Part-time", "Ph.D Part-time"),
    ("total_students_including_phd", "Number of students (including Ph.D. students) = SS=", "Number of students (including Ph.D. students)"),
    ("total_faculty", "Number of faculty members", "Number of faculty members"),
    ("capital_expenditure_23_24", "Annual capital expenditure (2023-24)", "Annual capital expenditure (2023-24)"),
    ("capital_expenditure_22_23", "Annual capital expenditure (2022-23)", "Annual capital expenditure (2022-23)"),
    ("capital_expenditure_21_22", "Annual capital expenditure (2021-22)", "Annual capital expenditure (2021-22)"),
    ("operating_expenditure_23_24", "Annual operating expenditure (2023-24)", "Annual operating expenditure (2023-24)"),
    ("operating_expenditure_22_23", "Annual operating expenditure (2022-23)", "Annual operating expenditure (2022-23)"),
    ("operating_expenditure_21_22", "Annual operating expenditure (2021-22)", "Annual operating expenditure (2021-22)"),
    ("online_education_offered", "Online education", "Online education"),
    ("online_students_offered_courses", "Number of students offered online courses", "Number of students offered online courses"),
    ("online_credits_transferred", "Number of credits transferred", "Number of credits transferred"),
    ("online_courses_count", "Number of courses", "Number of courses"),
    ("students_economically_backward", "Number of students who are economically backward", "Number of students who are economically backward"),
    ("students_socially_challenged", "Number of students who are socially challenged", "Number of students who are socially challenged"),
    ("students_not_receiving_reimbursement", "Number of students who are not receiving full tuition fee reimbursement", "Number of students who are not receiving full tuition fee reimbursement"),
    ("phd_awarded_full_time_last_3_years", "Number of full-time Ph.D. awarded in the last 3 years", "Number of full-time Ph.D. awarded in the last 3 years"),
    ("phd_awarded_part_time_last_3_years", "Number of part-time Ph.D. awarded in the last 3 years", "Number of part-time Ph.D. awarded in the last 3 years"),
    ("publications_2023", "Publications (2023)", "Publications (2023)"),
    ("publications_2022", "Publications (2022)", "Publications (2022)"),
    ("publications_2021", "Publications (2021)", "Publications (2021)"),
    ("citations_21_22", "Citations (2021-22)", "Citations (2021-22)"),
    ("citations_20_21", "Citations (2020-21)", "Citations (2020-21)"),
    ("citations_19_20", "Citations (2019-20)", "Citations (2019-20)"),
    ("sponsored_projects_23_24", "Sponsored projects - Total amount received (2023-24)", "Sponsored projects - Total amount received (2023-24)"),
    ("sponsored_projects_22_23", "Sponsored projects - Total amount received (2022-23)", "Sponsored projects - Total amount received (2022-23)"),
    ("sponsored_projects_21_22", "Sponsored projects - Total amount received (2021-22)", "Sponsored projects - Total amount received (2021-22)"),
    ("consultancy_projects_23_24", "Consultancy projects - Total amount received (2023-24)", "Consultancy projects - Total amount received (2023-24)"),
    ("consultancy_projects_22_23", "Consultancy projects - Total amount received (2022-23)", "Consultancy projects - Total amount received (2022-23)"),
    ("consultancy_projects_21_22", "Consultancy projects - Total amount received (2021-22)", "Consultancy projects - Total amount received (2021-22)"),
    ("edp_earnings_23_24", "Earnings from Executive Development Programme (2023-24)", "Earnings from Executive Development Programme (2023-24)"),
    ("edp_earnings_22_23", "Earnings from Executive Development Programme (2022-23)", "Earnings from Executive Development Programme (2022-23)"),
    ("edp_earnings_21_22", "Earnings from Executive Development Programme (2021-22)", "Earnings from Executive Development Programme (2021-22)"),
    ("nba_accreditation", "Valid NBA Accrediatation", "Valid NBA Accreditation"),
    ("naac_accreditation", "Valid NAAC Accrediatation", "Valid NAAC Accreditation"),
];

/// Sub-scores scraped from the nested Research table.
const RESEARCH_SCORES: &[(&str, &str)] = &[
    ("qnr_100", "QNR(100)"),
    ("qlr_100", "QLR(100)"),
    ("sfc_100", "SFC(100)"),
    ("oi_100", "OI(100)"),
    ("perception_100", "PERCEPTION(100)"),
];

/// Number of identity fields (rank, name, id, category) that lead every template.
const IDENTITY_FIELDS: usize = 4;

/// Display label of the institute-name row; also the pivot's column key.
pub const INSTITUTE_NAME_LABEL: &str = "Name of the Institute";

/// Raw key holding the institute name.
pub const INSTITUTE_NAME_KEY: &str = "institute_name";

static REPORT_TEMPLATE: Lazy<Vec<&'static str>> =
    Lazy::new(|| REPORT_FIELDS.iter().map(|(_, label, _)| *label).collect());

static RESEARCH_TEMPLATE: Lazy<Vec<&'static str>> = Lazy::new(|| {
    REPORT_FIELDS[..IDENTITY_FIELDS]
        .iter()
        .map(|(_, label, _)| *label)
        .chain(RESEARCH_SCORES.iter().map(|(_, label)| *label))
        .collect()
});

static DISPLAY_LABELS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    REPORT_FIELDS
        .iter()
        .map(|(key, label, _)| (*key, *label))
        .chain(RESEARCH_SCORES.iter().copied())
        .collect()
});

/// Ordered row template for `category`.
///
/// Overall, University, Engineering and Law share the full report template.
pub fn row_template(category: Category) -> &'static [&'static str] {
    match category {
        Category::Research => RESEARCH_TEMPLATE.as_slice(),
        Category::Overall | Category::University | Category::Engineering | Category::Law => {
            REPORT_TEMPLATE.as_slice()
        }
    }
}

/// Display label for a raw key, if one is mapped.
pub fn display_label(raw_key: &str) -> Option<&'static str> {
    DISPLAY_LABELS.get(raw_key).copied()
}

/// Raw keys and their descriptions, in the order the prompt lists them.
pub fn prompt_fields() -> impl Iterator<Item = (&'static str, &'static str)> {
    REPORT_FIELDS.iter().map(|(key, _, desc)| (*key, *desc))
}

/// Raw keys of the five nested Research sub-scores, in column order.
pub fn research_score_keys() -> impl Iterator<Item = &'static str> {
    RESEARCH_SCORES.iter().map(|(key, _)| *key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn report_template_has_48_unique_rows() {
        let t = row_template(Category::Overall);
        assert_eq!(t.len(), 48);
        let unique: HashSet<_> = t.iter().collect();
        assert_eq!(unique.len(), t.len());
    }

    #[test]
    fn research_template_order() {
        assert_eq!(
            row_template(Category::Research),
            &[
                "rank",
                "Name of the Institute",
                "Institute / University ID (as per NIRF)",
                "Category: Overall/Engineering/Law/Management, etc.,",
                "QNR(100)",
                "QLR(100)",
                "SFC(100)",
                "OI(100)",
                "PERCEPTION(100)",
            ]
        );
    }

    #[test]
    fn pdf_categories_share_one_template() {
        let overall = row_template(Category::Overall);
        for c in [Category::University, Category::Engineering, Category::Law] {
            assert_eq!(row_template(c), overall);
        }
    }

    #[test]
    fn every_template_row_has_a_mapped_key() {
        let labels: HashSet<_> = DISPLAY_LABELS.values().copied().collect();
        for c in Category::PUBLISH_ORDER {
            for row in row_template(c) {
                assert!(labels.contains(row), "{c}: unmapped row {row}");
            }
        }
    }

    #[test]
    fn display_label_lookup() {
        assert_eq!(
            display_label("capital_expenditure_23_24"),
            Some("Annual capital expenditure (2023-24)")
        );
        assert_eq!(display_label("oi_100"), Some("OI(100)"));
        assert_eq!(display_label("institute_name"), Some(INSTITUTE_NAME_LABEL));
        assert_eq!(display_label("favourite_colour"), None);
    }

    #[test]
    fn prompt_fields_cover_report_keys() {
        let keys: Vec<_> = prompt_fields().map(|(k, _)| k).collect();
        assert_eq!(keys.len(), 48);
        assert_eq!(keys[0], "rank");
        assert_eq!(keys[47], "naac_accreditation");
    }
}
