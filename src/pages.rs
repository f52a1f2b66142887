use crate::parser::labels::LabelRule;
use crate::parser::{MissingCategory, ScanConfig};

const LEARN_BASE: &str = "https://learn.microsoft.com";

pub const PRIMARY_LOCALE: &str = "en-us";
pub const COUNTERPART_LOCALE: &str = "ja-jp";

/// An Azure Advisor recommendation reference page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Pillar {
    Cost,
    OperationalExcellence,
    Performance,
    Reliability,
}

impl Pillar {
    fn slug(self) -> &'static str {
        match self {
            Pillar::Cost => "cost",
            Pillar::OperationalExcellence => "operational-excellence",
            Pillar::Performance => "performance",
            Pillar::Reliability => "reliability",
        }
    }

    pub fn url(self, locale: &str) -> String {
        format!(
            "{}/{}/azure/advisor/advisor-reference-{}-recommendations",
            LEARN_BASE,
            locale,
            self.slug()
        )
    }

    /// `azure_advisor_reliability_recommendations.json` and friends.
    pub fn flat_file_name(self) -> String {
        format!(
            "azure_advisor_{}_recommendations.json",
            self.slug().replace('-', "_")
        )
    }

    /// `OperationalExcellence.json` and friends.
    pub fn bilingual_file_name(self) -> String {
        let name: String = self
            .slug()
            .split('-')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(c) => c.to_ascii_uppercase().to_string() + chars.as_str(),
                    None => String::new(),
                }
            })
            .collect();
        format!("{}.json", name)
    }
}

/// `h2` categories, `h4` recommendations, labelled `<p>` lines.
pub fn flat_scan(base_url: &str, on_missing_category: MissingCategory) -> ScanConfig {
    ScanConfig {
        section_tag: "h2".into(),
        record_tag: "h4".into(),
        description_tags: vec!["p".into()],
        labels: vec![
            LabelRule::new("Impact", "Impact:"),
            LabelRule::new("ResourceType", "ResourceType:"),
            LabelRule::new("RecommendationID", "Recommendation ID:"),
        ],
        exclude_titles: vec!["share via".into()],
        base_url: Some(base_url.to_string()),
        on_missing_category,
        root_tags: vec!["article".into(), "main".into()],
    }
}

/// `h2` services, `h3` recommendations, whole document, no labels.
pub fn bilingual_scan(base_url: &str) -> ScanConfig {
    ScanConfig {
        section_tag: "h2".into(),
        record_tag: "h3".into(),
        description_tags: Vec::new(),
        labels: Vec::new(),
        exclude_titles: Vec::new(),
        base_url: Some(base_url.to_string()),
        on_missing_category: MissingCategory::Skip,
        root_tags: Vec::new(),
    }
}
