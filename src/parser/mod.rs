pub mod extract;
pub mod labels;
pub mod node;

use serde::Deserialize;
use tracing::{debug, warn};

use extract::{Counterpart, Record, Section};
use labels::LabelRule;
use node::Page;

/// What to do with a record seen before any section heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum MissingCategory {
    /// Drop it.
    Skip,
    /// Keep it with an empty category.
    #[default]
    EmitEmpty,
}

/// Declarative description of how one page is laid out.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Tag that updates the current category.
    pub section_tag: String,
    /// Tag that opens a record.
    pub record_tag: String,
    /// Tags after a record heading whose lines are matched against `labels`.
    pub description_tags: Vec<String>,
    pub labels: Vec<LabelRule>,
    /// Record titles dropped on a case-insensitive exact match.
    pub exclude_titles: Vec<String>,
    pub base_url: Option<String>,
    pub on_missing_category: MissingCategory,
    /// Content-root candidates, tried in order. Empty scans the whole document.
    pub root_tags: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        ScanConfig {
            section_tag: "h2".into(),
            record_tag: "h3".into(),
            description_tags: vec!["p".into()],
            labels: Vec::new(),
            exclude_titles: Vec::new(),
            base_url: None,
            on_missing_category: MissingCategory::default(),
            root_tags: Vec::new(),
        }
    }
}

/// Markup → flat records, in document order.
pub fn parse_records(markup: &str, cfg: &ScanConfig) -> Vec<Record> {
    let page = Page::parse(markup);
    let root = page.content_root(&cfg.root_tags);
    extract::extract_records(&root, cfg)
}

/// Markup → sections, each heading localized against `counterpart_markup`
/// by anchor id.
pub fn parse_bilingual(
    markup: &str,
    counterpart_markup: &str,
    counterpart_base_url: Option<&str>,
    cfg: &ScanConfig,
) -> Vec<Section> {
    let foreign = Page::parse(counterpart_markup);
    let counterpart = Counterpart::index(
        &foreign.document(),
        &[cfg.section_tag.as_str(), cfg.record_tag.as_str()],
        counterpart_base_url,
    );
    if counterpart.is_empty() {
        warn!("Counterpart page has no anchored headings, keeping original text");
    } else {
        debug!(headings = counterpart.len(), "indexed counterpart headings");
    }

    let page = Page::parse(markup);
    let root = page.content_root(&cfg.root_tags);
    extract::extract_sections(&root, cfg, Some(&counterpart))
}
