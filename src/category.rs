//! Ranking categories and where their pages live.

use std::fmt;
use std::str::FromStr;

/// An NIRF ranking segment.
///
/// The string form (`as_str`) is the key used in every intermediate JSON
/// document and the title of the category's sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Overall,
    Engineering,
    University,
    Law,
    Research,
}

impl Category {
    /// Order in which ranking pages are visited by the collector.
    pub const COLLECT_ORDER: [Category; 5] = [
        Category::Overall,
        Category::Engineering,
        Category::University,
        Category::Law,
        Category::Research,
    ];

    /// Order in which wide tables are built and published.
    pub const PUBLISH_ORDER: [Category; 5] = [
        Category::Overall,
        Category::Research,
        Category::University,
        Category::Engineering,
        Category::Law,
    ];

    /// Categories whose PDFs the extractor processes by default.
    pub const EXTRACT_DEFAULT: [Category; 3] =
        [Category::Overall, Category::University, Category::Engineering];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Overall => "Overall",
            Category::Engineering => "Engineering",
            Category::University => "University",
            Category::Law => "Law",
            Category::Research => "Research",
        }
    }

    /// Site-relative path of the category's ranking page for `year`.
    pub fn ranking_path(self, year: u16) -> String {
        format!("/Rankings/{}/{}Ranking.html", year, self.as_str())
    }

    /// Research is the only category published as an HTML table; every
    /// other category links one PDF report per institute.
    pub fn has_html_table(self) -> bool {
        matches!(self, Category::Research)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "overall" => Ok(Category::Overall),
            "engineering" => Ok(Category::Engineering),
            "university" => Ok(Category::University),
            "law" => Ok(Category::Law),
            "research" => Ok(Category::Research),
            other => Err(format!(
                "unknown category '{other}' (expected overall, engineering, university, law or research)"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranking_path_uses_year_and_name() {
        assert_eq!(
            Category::Engineering.ranking_path(2025),
            "/Rankings/2025/EngineeringRanking.html"
        );
        assert_eq!(
            Category::Research.ranking_path(2024),
            "/Rankings/2024/ResearchRanking.html"
        );
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("LAW".parse::<Category>(), Ok(Category::Law));
        assert_eq!(" research ".parse::<Category>(), Ok(Category::Research));
        assert!("medical".parse::<Category>().is_err());
    }

    #[test]
    fn only_research_has_html_table() {
        let tables: Vec<_> = Category::COLLECT_ORDER
            .iter()
            .filter(|c| c.has_html_table())
            .collect();
        assert_eq!(tables, vec![&Category::Research]);
    }
}
