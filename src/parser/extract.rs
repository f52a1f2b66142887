use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use super::labels::{apply_lines, empty_fields};
use super::node::DocNode;
use super::{MissingCategory, ScanConfig};

/// Counterpart-language text and deep link for a heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Localized {
    pub text: String,
    pub permalink: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    pub text: String,
    pub anchor: Option<String>,
    pub permalink: Option<String>,
    pub localized: Option<Localized>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub category: String,
    pub heading: Heading,
    pub fields: BTreeMap<String, String>,
}

impl Record {
    pub fn title(&self) -> &str {
        &self.heading.text
    }

    /// Value of a labelled field; `""` when the field was never declared.
    pub fn field(&self, name: &str) -> &str {
        self.fields.get(name).map(String::as_str).unwrap_or("")
    }
}

/// Records grouped under the section heading that precedes them. The
/// preamble (records before any section heading) has no heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub heading: Option<Heading>,
    pub records: Vec<Record>,
}

/// Second-language document indexed by (tag, anchor id).
pub struct Counterpart {
    texts: HashMap<(String, String), String>,
    base_url: Option<String>,
}

impl Counterpart {
    pub fn index<N: DocNode>(root: &N, tags: &[&str], base_url: Option<&str>) -> Self {
        let mut texts = HashMap::new();
        for node in root.element_descendants() {
            if !tags.contains(&node.tag_name()) {
                continue;
            }
            if let Some(id) = anchor_of(&node) {
                // First occurrence in document order wins.
                texts
                    .entry((node.tag_name().to_string(), id))
                    .or_insert_with(|| node.trimmed_text());
            }
        }
        Counterpart {
            texts,
            base_url: base_url.map(str::to_string),
        }
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    /// Falls back to `fallback` when there is no anchor or no match.
    pub fn localize(&self, tag: &str, anchor: Option<&str>, fallback: &str) -> Localized {
        let text = anchor
            .and_then(|id| self.texts.get(&(tag.to_string(), id.to_string())))
            .cloned();
        if text.is_none() {
            debug!(tag, anchor, "no counterpart heading, keeping original text");
        }
        Localized {
            text: text.unwrap_or_else(|| fallback.to_string()),
            permalink: permalink(self.base_url.as_deref(), anchor),
        }
    }
}

/// Flat records in document order.
pub fn extract_records<N: DocNode>(root: &N, cfg: &ScanConfig) -> Vec<Record> {
    extract_sections(root, cfg, None)
        .into_iter()
        .flat_map(|s| s.records)
        .collect()
}

/// One pass over the section/record headings under `root`.
pub fn extract_sections<N: DocNode>(
    root: &N,
    cfg: &ScanConfig,
    counterpart: Option<&Counterpart>,
) -> Vec<Section> {
    if cfg.record_tag.is_empty() {
        return Vec::new();
    }

    root.element_descendants()
        .into_iter()
        .filter(|n| is_boundary(n, cfg))
        .fold(ScanState::default(), |state, node| {
            state.step(&node, cfg, counterpart)
        })
        .sections
}

#[derive(Default)]
struct ScanState {
    sections: Vec<Section>,
}

impl ScanState {
    fn step<N: DocNode>(
        mut self,
        node: &N,
        cfg: &ScanConfig,
        counterpart: Option<&Counterpart>,
    ) -> Self {
        if is_section(node, cfg) {
            self.sections.push(Section {
                heading: Some(heading(node, cfg, counterpart)),
                records: Vec::new(),
            });
            return self;
        }

        let title = node.trimmed_text();
        if is_excluded(&title, cfg) {
            debug!(%title, "excluded record title");
            return self;
        }

        if self.sections.is_empty() {
            match cfg.on_missing_category {
                MissingCategory::Skip => {
                    debug!(%title, "record before any section, skipping");
                    return self;
                }
                MissingCategory::EmitEmpty => self.sections.push(Section {
                    heading: None,
                    records: Vec::new(),
                }),
            }
        }

        let record = Record {
            category: self.category().to_string(),
            heading: heading(node, cfg, counterpart),
            fields: collect_fields(node, cfg),
        };
        if let Some(section) = self.sections.last_mut() {
            section.records.push(record);
        }
        self
    }

    fn category(&self) -> &str {
        self.sections
            .last()
            .and_then(|s| s.heading.as_ref())
            .map(|h| h.text.as_str())
            .unwrap_or("")
    }
}

/// Label values from the descriptive siblings between a record heading and
/// the next boundary.
fn collect_fields<N: DocNode>(node: &N, cfg: &ScanConfig) -> BTreeMap<String, String> {
    let mut fields = empty_fields(&cfg.labels);
    if cfg.labels.is_empty() {
        return fields;
    }

    let mut sibling = node.next_element_sibling();
    while let Some(el) = sibling {
        if is_boundary(&el, cfg) {
            break;
        }
        if cfg.description_tags.iter().any(|t| t == el.tag_name()) {
            apply_lines(&cfg.labels, &el.text_lines(), &mut fields);
        }
        sibling = el.next_element_sibling();
    }
    fields
}

fn heading<N: DocNode>(node: &N, cfg: &ScanConfig, counterpart: Option<&Counterpart>) -> Heading {
    let text = node.trimmed_text();
    let anchor = anchor_of(node);
    let localized = counterpart.map(|c| c.localize(node.tag_name(), anchor.as_deref(), &text));
    Heading {
        permalink: permalink(cfg.base_url.as_deref(), anchor.as_deref()),
        text,
        anchor,
        localized,
    }
}

fn anchor_of<N: DocNode>(node: &N) -> Option<String> {
    node.attribute("id")
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}

fn permalink(base_url: Option<&str>, anchor: Option<&str>) -> Option<String> {
    Some(format!("{}#{}", base_url?, anchor?))
}

fn is_section<N: DocNode>(node: &N, cfg: &ScanConfig) -> bool {
    !cfg.section_tag.is_empty() && node.tag_name() == cfg.section_tag
}

fn is_boundary<N: DocNode>(node: &N, cfg: &ScanConfig) -> bool {
    is_section(node, cfg) || node.tag_name() == cfg.record_tag
}

fn is_excluded(title: &str, cfg: &ScanConfig) -> bool {
    let title = title.to_lowercase();
    cfg.exclude_titles
        .iter()
        .any(|x| x.trim().to_lowercase() == title)
}

// ── Tests ──
