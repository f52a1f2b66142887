use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use crate::fetch::{Fetch, FetchError};
use crate::output::{self, FlatRow, JsonStyle, ServiceRow};
use crate::pages::{self, Pillar, COUNTERPART_LOCALE, PRIMARY_LOCALE};
use crate::parser::{self, MissingCategory};

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    /// A valid page with nothing to extract usually means the markup changed.
    #[error("no recommendations found at {url}")]
    Empty { url: String },
    #[error("failed to encode JSON: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Flat label-mode job over one English page.
pub struct FlatJob {
    pub pillar: Pillar,
    pub on_missing_category: MissingCategory,
    pub output: PathBuf,
}

/// Nested job pairing the English page with its Japanese counterpart.
pub struct BilingualJob {
    pub pillar: Pillar,
    pub output: PathBuf,
}

/// What a finished run wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub path: PathBuf,
    /// Top-level entries in the written array.
    pub rows: usize,
    /// Recommendations written. The flat layout has one row per
    /// recommendation, so there it always equals `rows`.
    pub records: usize,
}

impl FlatJob {
    pub fn run(&self, fetcher: &dyn Fetch) -> Result<RunSummary, ScrapeError> {
        let url = self.pillar.url(PRIMARY_LOCALE);
        let html = fetcher.fetch(&url)?;

        let cfg = pages::flat_scan(&url, self.on_missing_category);
        let rows: Vec<FlatRow> = parser::parse_records(&html, &cfg)
            .iter()
            .map(FlatRow::from)
            .collect();
        if rows.is_empty() {
            warn!("No recommendations parsed from {}", url);
            return Err(ScrapeError::Empty { url });
        }

        write_rows(&self.output, &rows, output::FLAT_STYLE)?;
        Ok(RunSummary {
            path: self.output.clone(),
            rows: rows.len(),
            records: rows.len(),
        })
    }
}

impl BilingualJob {
    pub fn run(&self, fetcher: &dyn Fetch) -> Result<RunSummary, ScrapeError> {
        let url_en = self.pillar.url(PRIMARY_LOCALE);
        let url_ja = self.pillar.url(COUNTERPART_LOCALE);
        let html_en = fetcher.fetch(&url_en)?;
        let html_ja = fetcher.fetch(&url_ja)?;

        let cfg = pages::bilingual_scan(&url_en);
        let sections = parser::parse_bilingual(&html_en, &html_ja, Some(&url_ja), &cfg);
        let records: usize = sections.iter().map(|s| s.records.len()).sum();
        if records == 0 {
            warn!("No recommendations parsed from {}", url_en);
            return Err(ScrapeError::Empty { url: url_en });
        }

        let rows: Vec<ServiceRow> = sections.iter().map(ServiceRow::from).collect();
        write_rows(&self.output, &rows, output::BILINGUAL_STYLE)?;
        Ok(RunSummary {
            path: self.output.clone(),
            rows: rows.len(),
            records,
        })
    }
}

fn write_rows<T: serde::Serialize>(path: &Path, rows: &[T], style: JsonStyle) -> Result<(), ScrapeError> {
    let bytes = output::to_json_bytes(rows, style)?;
    std::fs::write(path, bytes).map_err(|source| ScrapeError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Saved {} rows to {}", rows.len(), path.display());
    Ok(())
}

/// `--output` wins; otherwise `default_name` inside `output_dir`.
pub fn resolve_output(explicit: Option<PathBuf>, output_dir: &Path, default_name: &str) -> PathBuf {
    explicit.unwrap_or_else(|| output_dir.join(default_name))
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// Serves fixture pages by URL and records every request.
    struct FixtureFetcher {
        pages: HashMap<String, String>,
        requested: RefCell<Vec<String>>,
    }

    impl FixtureFetcher {
        fn new(pages: &[(String, &str)]) -> Self {
            FixtureFetcher {
                pages: pages
                    .iter()
                    .map(|(url, fixture)| {
                        let body = std::fs::read_to_string(format!("tests/fixtures/{}", fixture)).unwrap();
                        (url.clone(), body)
                    })
                    .collect(),
                requested: RefCell::new(Vec::new()),
            }
        }
    }

    impl Fetch for FixtureFetcher {
        fn fetch(&self, url: &str) -> Result<String, FetchError> {
            self.requested.borrow_mut().push(url.to_string());
            self.pages.get(url).cloned().ok_or_else(|| FetchError::Status {
                url: url.to_string(),
                status: reqwest::StatusCode::NOT_FOUND,
            })
        }
    }

    fn temp_path(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("advisor_scrape_{}_{}", std::process::id(), name));
        std::fs::create_dir_all(&dir).unwrap();
        dir.join("out.json")
    }

    #[test]
    fn flat_job_writes_python_compatible_json() {
        let url = Pillar::Reliability.url(PRIMARY_LOCALE);
        let fetcher = FixtureFetcher::new(&[(url.clone(), "reliability.html")]);
        let path = temp_path("flat");
        let job = FlatJob {
            pillar: Pillar::Reliability,
            on_missing_category: MissingCategory::EmitEmpty,
            output: path.clone(),
        };

        let summary = job.run(&fetcher).unwrap();
        assert_eq!(summary.rows, 5);
        assert_eq!(summary.records, summary.rows);

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("[\n    {\n        \"Recommendation\": \"Enable zone redundancy"));
        assert!(written.contains(&format!("\"Url\": \"{}#enable-zone-redundancy-for-azure-ai-search\"", url)));
        assert!(written.contains("Configure Cosmos DB r\\u00e9plication"));
        assert!(written.contains("\"Url\": \"\""));
        assert!(!written.ends_with('\n'));

        let rows: Vec<serde_json::Value> = serde_json::from_str(&written).unwrap();
        assert_eq!(rows[2]["Category"], "Compute");
        assert_eq!(rows[2]["Impact"], "");
    }

    #[test]
    fn bilingual_job_fetches_both_pages_in_order() {
        let en = Pillar::OperationalExcellence.url(PRIMARY_LOCALE);
        let ja = Pillar::OperationalExcellence.url(COUNTERPART_LOCALE);
        let fetcher = FixtureFetcher::new(&[
            (en.clone(), "operational_excellence_en.html"),
            (ja.clone(), "operational_excellence_ja.html"),
        ]);
        let path = temp_path("bilingual");
        let job = BilingualJob {
            pillar: Pillar::OperationalExcellence,
            output: path.clone(),
        };

        let summary = job.run(&fetcher).unwrap();
        assert_eq!(*fetcher.requested.borrow(), vec![en.clone(), ja.clone()]);
        assert_eq!(summary.rows, 3);
        assert_eq!(summary.records, 5);

        let rows: Vec<serde_json::Value> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();

        let monitor = &rows[0];
        assert_eq!(monitor["service_en"], "Azure Monitor");
        assert_eq!(monitor["service_ja"], "Azure Monitor");
        let recs = monitor["recommendations"].as_array().unwrap();
        assert_eq!(recs.len(), 3);
        assert_eq!(recs[0]["recommendation_ja"], "ログ アラート ルールを修復する");
        assert_eq!(
            recs[0]["recommendation_permalink_ja"],
            format!("{}#repair-your-log-alert-rule", ja)
        );
        assert_eq!(recs[2]["recommendation_ja"], "Untagged recommendation");
        assert!(recs[2]["recommendation_permalink_en"].is_null());

        let storage = &rows[1];
        assert_eq!(storage["service_ja"], "ストレージ");
        let fallback = &storage["recommendations"][1];
        assert_eq!(fallback["recommendation_ja"], "English only recommendation");
        assert_eq!(
            fallback["recommendation_permalink_ja"],
            format!("{}#english-only-recommendation", ja)
        );

        assert_eq!(rows[2]["service_en"], "Next steps");
        assert_eq!(rows[2]["service_ja"], "Next steps");
        assert_eq!(rows[2]["recommendations"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn fetch_failure_writes_nothing() {
        let fetcher = FixtureFetcher::new(&[]);
        let path = temp_path("fetch_failure");
        let _ = std::fs::remove_file(&path);
        let job = FlatJob {
            pillar: Pillar::Cost,
            on_missing_category: MissingCategory::EmitEmpty,
            output: path.clone(),
        };

        let err = job.run(&fetcher).unwrap_err();
        assert!(matches!(err, ScrapeError::Fetch(FetchError::Status { .. })));
        assert!(!path.exists());
    }

    #[test]
    fn empty_extraction_is_an_error() {
        let url = Pillar::Performance.url(PRIMARY_LOCALE);
        // Only sections, no recommendations.
        let fetcher = FixtureFetcher::new(&[(url.clone(), "operational_excellence_ja.html")]);
        let path = temp_path("empty");
        let _ = std::fs::remove_file(&path);
        let job = FlatJob {
            pillar: Pillar::Performance,
            on_missing_category: MissingCategory::EmitEmpty,
            output: path.clone(),
        };

        match job.run(&fetcher) {
            Err(ScrapeError::Empty { url: reported }) => assert_eq!(reported, url),
            other => panic!("expected Empty, got {:?}", other),
        }
        assert!(!path.exists());
    }

    #[test]
    fn unwritable_output_is_reported() {
        let url = Pillar::Reliability.url(PRIMARY_LOCALE);
        let fetcher = FixtureFetcher::new(&[(url, "reliability.html")]);
        let blocker = temp_path("unwritable");
        std::fs::write(&blocker, b"").unwrap();
        let job = FlatJob {
            pillar: Pillar::Reliability,
            on_missing_category: MissingCategory::EmitEmpty,
            // A path below a regular file.
            output: blocker.join("nested").join("out.json"),
        };

        let err = job.run(&fetcher).unwrap_err();
        assert!(matches!(err, ScrapeError::Write { .. }));
    }

    #[test]
    fn explicit_output_wins() {
        let dir = Path::new("/data");
        assert_eq!(
            resolve_output(None, dir, "a.json"),
            PathBuf::from("/data/a.json")
        );
        assert_eq!(
            resolve_output(Some(PathBuf::from("b.json")), dir, "a.json"),
            PathBuf::from("b.json")
        );
    }
}
