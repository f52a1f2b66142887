use std::io::{self, Write};

use serde::Serialize;
use serde_json::ser::{Formatter, PrettyFormatter};

use crate::parser::extract::{Record, Section};

/// One recommendation in the flat (label) layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlatRow {
    #[serde(rename = "Recommendation")]
    pub recommendation: String,
    #[serde(rename = "Impact")]
    pub impact: String,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "ResourceType")]
    pub resource_type: String,
    #[serde(rename = "RecommendationID")]
    pub recommendation_id: String,
    /// `""` when the heading has no anchor.
    #[serde(rename = "Url")]
    pub url: String,
}

impl From<&Record> for FlatRow {
    fn from(r: &Record) -> Self {
        FlatRow {
            recommendation: r.title().to_string(),
            impact: r.field("Impact").to_string(),
            category: r.category.clone(),
            resource_type: r.field("ResourceType").to_string(),
            recommendation_id: r.field("RecommendationID").to_string(),
            url: r.heading.permalink.clone().unwrap_or_default(),
        }
    }
}

/// One service and its recommendations in the bilingual layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceRow {
    pub service_en: String,
    pub service_ja: String,
    pub recommendations: Vec<RecommendationRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecommendationRow {
    pub recommendation_en: String,
    pub recommendation_permalink_en: Option<String>,
    pub recommendation_ja: String,
    pub recommendation_permalink_ja: Option<String>,
}

impl From<&Record> for RecommendationRow {
    fn from(r: &Record) -> Self {
        let (ja, ja_link) = match &r.heading.localized {
            Some(l) => (l.text.clone(), l.permalink.clone()),
            None => (r.title().to_string(), None),
        };
        RecommendationRow {
            recommendation_en: r.title().to_string(),
            recommendation_permalink_en: r.heading.permalink.clone(),
            recommendation_ja: ja,
            recommendation_permalink_ja: ja_link,
        }
    }
}

impl From<&Section> for ServiceRow {
    fn from(s: &Section) -> Self {
        let (en, ja) = match &s.heading {
            Some(h) => (
                h.text.clone(),
                h.localized
                    .as_ref()
                    .map(|l| l.text.clone())
                    .unwrap_or_else(|| h.text.clone()),
            ),
            None => (String::new(), String::new()),
        };
        ServiceRow {
            service_en: en,
            service_ja: ja,
            recommendations: s.records.iter().map(RecommendationRow::from).collect(),
        }
    }
}

/// Layout knobs matching Python's `json.dump(indent=.., ensure_ascii=..)`.
#[derive(Debug, Clone, Copy)]
pub struct JsonStyle {
    pub indent: &'static [u8],
    pub ascii_only: bool,
}

pub const FLAT_STYLE: JsonStyle = JsonStyle {
    indent: b"    ",
    ascii_only: true,
};

pub const BILINGUAL_STYLE: JsonStyle = JsonStyle {
    indent: b"  ",
    ascii_only: false,
};

/// Serialize with `style`. No trailing newline.
pub fn to_json_bytes<T: Serialize + ?Sized>(value: &T, style: JsonStyle) -> serde_json::Result<Vec<u8>> {
    let mut out = Vec::new();
    let formatter = PyFormatter {
        pretty: PrettyFormatter::with_indent(style.indent),
        ascii_only: style.ascii_only,
    };
    let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
    value.serialize(&mut ser)?;
    Ok(out)
}

/// Pretty printer that can also escape everything outside printable ASCII
/// as `\uXXXX` (UTF-16 units, lowercase hex).
struct PyFormatter<'a> {
    pretty: PrettyFormatter<'a>,
    ascii_only: bool,
}

impl Formatter for PyFormatter<'_> {
    fn begin_array<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.begin_array(writer)
    }

    fn end_array<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        self.pretty.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.begin_object(writer)
    }

    fn end_object<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        self.pretty.begin_object_key(writer, first)
    }

    fn begin_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.begin_object_value(writer)
    }

    fn end_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.end_object_value(writer)
    }

    fn write_string_fragment<W: ?Sized + Write>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()> {
        if !self.ascii_only {
            return writer.write_all(fragment.as_bytes());
        }

        let mut start = 0;
        for (i, ch) in fragment.char_indices() {
            if ch <= '~' {
                continue;
            }
            writer.write_all(fragment[start..i].as_bytes())?;
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                write!(writer, "\\u{:04x}", unit)?;
            }
            start = i + ch.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }
}

// ── Tests ──
