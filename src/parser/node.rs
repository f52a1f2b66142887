use scraper::{ElementRef, Html, Node, Selector};

/// What the extractor needs from a parsed document element.
///
/// Navigation only ever yields elements: text and comment nodes between
/// siblings are skipped, the same way a tag-level sibling walk behaves.
pub trait DocNode: Sized {
    fn tag_name(&self) -> &str;

    /// Whitespace-collapsed, trimmed text content.
    fn trimmed_text(&self) -> String;

    /// Text content split into lines at `<br>` elements and at newlines
    /// inside text, each line collapsed and trimmed, empty lines dropped.
    fn text_lines(&self) -> Vec<String>;

    fn attribute(&self, name: &str) -> Option<&str>;

    fn next_element_sibling(&self) -> Option<Self>;

    /// Every element below this one, in document order.
    fn element_descendants(&self) -> Vec<Self>;
}

impl<'a> DocNode for ElementRef<'a> {
    fn tag_name(&self) -> &str {
        self.value().name()
    }

    fn trimmed_text(&self) -> String {
        collapse_ws(&ElementRef::text(self).collect::<String>())
    }

    fn text_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        let mut current = String::new();
        for node in self.descendants() {
            match node.value() {
                Node::Text(t) => {
                    let mut pieces = t.split('\n');
                    if let Some(head) = pieces.next() {
                        current.push_str(head);
                    }
                    for piece in pieces {
                        lines.push(std::mem::replace(&mut current, piece.to_string()));
                    }
                }
                Node::Element(e) if e.name() == "br" => {
                    lines.push(std::mem::take(&mut current));
                }
                _ => {}
            }
        }
        lines.push(current);

        lines
            .iter()
            .map(|l| collapse_ws(l))
            .filter(|l| !l.is_empty())
            .collect()
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.value().attr(name)
    }

    fn next_element_sibling(&self) -> Option<Self> {
        self.next_siblings().find_map(ElementRef::wrap)
    }

    fn element_descendants(&self) -> Vec<Self> {
        // `descendants()` starts with the node itself.
        self.descendants().skip(1).filter_map(ElementRef::wrap).collect()
    }
}

/// An owned, parsed HTML document.
pub struct Page {
    html: Html,
}

impl Page {
    pub fn parse(markup: &str) -> Self {
        Page {
            html: Html::parse_document(markup),
        }
    }

    pub fn document(&self) -> ElementRef<'_> {
        self.html.root_element()
    }

    /// First element matching one of `root_tags`, tried in order; the whole
    /// document when none matches or the list is empty.
    pub fn content_root(&self, root_tags: &[String]) -> ElementRef<'_> {
        root_tags
            .iter()
            .filter_map(|tag| Selector::parse(tag).ok())
            .find_map(|sel| self.html.select(&sel).next())
            .unwrap_or_else(|| self.document())
    }
}

pub fn collapse_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ── Tests ──
