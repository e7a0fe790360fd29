//! Batch extraction over many documents.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{KsefError, Result};
use crate::models::config::{ExtractionConfig, InputConfig};
use crate::models::record::Dataset;
use crate::section::SectionKind;
use crate::xml::{self, InvoiceDocument};

/// An in-memory document, e.g. a browser upload.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

/// A document that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentFailure {
    pub source: String,
    pub message: String,
}

/// Outcome of a batch run.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    /// One dataset per requested section, in the requested order.
    pub datasets: Vec<Dataset>,
    /// Documents skipped because they were malformed.
    pub failures: Vec<DocumentFailure>,
    /// Documents looked at, including failed ones.
    pub documents: usize,
}

impl BatchReport {
    fn new(sections: &[SectionKind]) -> Self {
        Self {
            datasets: sections.iter().map(|&kind| Dataset::new(kind)).collect(),
            failures: Vec::new(),
            documents: 0,
        }
    }

    /// Dataset for a section, if it was requested.
    pub fn dataset(&self, section: SectionKind) -> Option<&Dataset> {
        self.datasets.iter().find(|d| d.section() == section)
    }

    /// Whether no section got any record.
    pub fn is_empty(&self) -> bool {
        self.datasets.iter().all(Dataset::is_empty)
    }
}

/// Applies a set of sections to documents, one document at a time.
#[derive(Debug, Clone)]
pub struct BatchRunner {
    config: ExtractionConfig,
    sections: Vec<SectionKind>,
}

impl BatchRunner {
    /// Create a runner for all four sections.
    pub fn new(config: ExtractionConfig) -> Self {
        Self {
            config,
            sections: SectionKind::ALL.to_vec(),
        }
    }

    /// Restrict the runner to the given sections (duplicates are dropped).
    pub fn with_sections(mut self, sections: &[SectionKind]) -> Self {
        let mut selected: Vec<SectionKind> = Vec::with_capacity(sections.len());
        for &kind in sections {
            if !selected.contains(&kind) {
                selected.push(kind);
            }
        }
        if !selected.is_empty() {
            self.sections = selected;
        }
        self
    }

    pub fn sections(&self) -> &[SectionKind] {
        &self.sections
    }

    /// Extract every selected section from an already parsed document.
    pub fn extract_document(&self, doc: &InvoiceDocument<'_>, report: &mut BatchReport) {
        for dataset in &mut report.datasets {
            let records = dataset.definition().extract(doc, &self.config);
            debug!("{}: {} {} record(s)", doc.source(), records.len(), dataset.section());
            dataset.extend(records);
        }
    }

    /// Parse and extract one document's text, recording a parse failure
    /// instead of returning it.
    fn process_text(&self, source: &str, text: &str, report: &mut BatchReport) {
        report.documents += 1;
        match InvoiceDocument::parse(source, text) {
            Ok(doc) => self.extract_document(&doc, report),
            Err(e) => record_failure(report, source, e),
        }
    }

    /// An empty report with one dataset per selected section.
    pub fn empty_report(&self) -> BatchReport {
        BatchReport::new(&self.sections)
    }

    /// Add one in-memory document to an existing report.
    ///
    /// Returns `false` if the document was malformed and recorded as a failure.
    pub fn add_source(&self, source: &SourceFile, report: &mut BatchReport) -> bool {
        let failed = report.failures.len();
        match xml::decode(&source.name, &source.bytes) {
            Ok(text) => self.process_text(&source.name, text, report),
            Err(e) => {
                report.documents += 1;
                record_failure(report, &source.name, e);
            }
        }
        report.failures.len() == failed
    }

    /// Run over in-memory documents in iteration order.
    pub fn run_sources<I>(&self, sources: I) -> BatchReport
    where
        I: IntoIterator<Item = SourceFile>,
    {
        let mut report = self.empty_report();
        for source in sources {
            self.add_source(&source, &mut report);
        }
        report
    }

    /// Run over files in the given order.
    ///
    /// Parse failures are collected in the report. Read failures abort the
    /// run.
    pub fn run_files(&self, files: &[PathBuf]) -> Result<BatchReport> {
        self.run_files_with(files, |_| {})
    }

    /// Like [`BatchRunner::run_files`], calling `on_file` after each file.
    pub fn run_files_with<F>(&self, files: &[PathBuf], mut on_file: F) -> Result<BatchReport>
    where
        F: FnMut(&Path),
    {
        let mut report = self.empty_report();
        for path in files {
            let name = source_name(path);
            match xml::load_file(path) {
                Ok(text) => self.process_text(&name, &text, &mut report),
                Err(e) if e.is_recoverable() => {
                    report.documents += 1;
                    record_failure(&mut report, &name, e);
                }
                Err(e) => return Err(e),
            }
            on_file(path);
        }

        info!(
            "Processed {} document(s), {} failed",
            report.documents,
            report.failures.len()
        );
        Ok(report)
    }

    /// Discover documents in `dir` and run over them.
    pub fn run_dir(&self, dir: &Path, input: &InputConfig) -> Result<BatchReport> {
        let files = discover(dir, input)?;
        self.run_files(&files)
    }
}

fn record_failure(report: &mut BatchReport, source: &str, error: KsefError) {
    let message = match error {
        KsefError::MalformedDocument { message, .. } => message,
        other => other.to_string(),
    };
    warn!("Skipping {}: {}", source, message);
    report.failures.push(DocumentFailure {
        source: source.to_string(),
        message,
    });
}

/// Name a file is reported under: its file name, or the full path if it has none.
pub fn source_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// List invoice files in `dir`, sorted by path.
///
/// Only regular files with the configured extension (case-insensitive) are
/// returned. An unreadable directory is an error.
pub fn discover(dir: &Path, input: &InputConfig) -> Result<Vec<PathBuf>> {
    let extension = input.extension.trim_start_matches('.').to_lowercase();
    let mut files = Vec::new();
    collect(dir, &extension, input.recursive, &mut files)?;
    files.sort();
    debug!("Found {} .{} file(s) in {}", files.len(), extension, dir.display());
    Ok(files)
}

fn collect(dir: &Path, extension: &str, recursive: bool, files: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            if recursive {
                collect(&path, extension, recursive, files)?;
            }
            continue;
        }
        if has_extension(&path, extension) {
            files.push(path);
        }
    }
    Ok(())
}

/// Case-insensitive extension check.
pub fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(extension))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::config::FA2_NAMESPACE;
    use pretty_assertions::assert_eq;

    fn invoice(nip: &str, p2: &str) -> Vec<u8> {
        format!(
            r#"<Faktura xmlns="{FA2_NAMESPACE}">
                <Podmiot1><DaneIdentyfikacyjne><NIP>{nip}</NIP></DaneIdentyfikacyjne></Podmiot1>
                <Fa><P_2>{p2}</P_2><FaWiersz><NrWierszaFa>1</NrWierszaFa></FaWiersz></Fa>
            </Faktura>"#
        )
        .into_bytes()
    }

    #[test]
    fn test_run_sources_collects_in_order() {
        let runner = BatchRunner::new(ExtractionConfig::default());
        let report = runner.run_sources([
            SourceFile::new("a.xml", invoice("111", "FV/A")),
            SourceFile::new("b.xml", invoice("222", "FV/B")),
        ]);

        let sellers = report.dataset(SectionKind::Seller).unwrap();
        assert_eq!(sellers.column("NIP").collect::<Vec<_>>(), vec![Some("111"), Some("222")]);
        assert_eq!(report.documents, 2);
        assert!(report.failures.is_empty());
        // No Podmiot2 in either document.
        assert!(report.dataset(SectionKind::Buyer).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_source_is_recorded_and_skipped() {
        let runner = BatchRunner::new(ExtractionConfig::default());
        let report = runner.run_sources([
            SourceFile::new("bad.xml", b"<Faktura><Fa>".to_vec()),
            SourceFile::new("good.xml", invoice("1234567890", "FV/1/2024")),
        ]);

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].source, "bad.xml");
        assert_eq!(report.dataset(SectionKind::Seller).unwrap().len(), 1);
    }

    #[test]
    fn test_add_source_grows_report() {
        let runner = BatchRunner::new(ExtractionConfig::default()).with_sections(&[SectionKind::Header]);
        let mut report = runner.empty_report();

        assert!(runner.add_source(&SourceFile::new("a.xml", invoice("1", "FV/A")), &mut report));
        assert!(!runner.add_source(&SourceFile::new("b.xml", vec![0xff, 0xfe]), &mut report));
        assert!(runner.add_source(&SourceFile::new("c.xml", invoice("2", "FV/C")), &mut report));

        let header = report.dataset(SectionKind::Header).unwrap();
        assert_eq!(header.column("P_2").collect::<Vec<_>>(), vec![Some("FV/A"), Some("FV/C")]);
        assert_eq!(report.documents, 3);
        assert_eq!(report.failures[0].source, "b.xml");
    }

    #[test]
    fn test_with_sections_limits_and_dedupes() {
        let runner = BatchRunner::new(ExtractionConfig::default())
            .with_sections(&[SectionKind::LineItems, SectionKind::LineItems, SectionKind::Seller]);
        assert_eq!(runner.sections(), &[SectionKind::LineItems, SectionKind::Seller]);

        let report = runner.run_sources([SourceFile::new("a.xml", invoice("1", "FV"))]);
        assert_eq!(report.datasets.len(), 2);
        assert!(report.dataset(SectionKind::Header).is_none());
    }

    #[test]
    fn test_discover_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.xml", "a.XML", "notes.txt", "c.xml.bak"] {
            fs::write(dir.path().join(name), "<x/>").unwrap();
        }
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested/d.xml"), "<x/>").unwrap();

        let flat = discover(dir.path(), &InputConfig::default()).unwrap();
        let names: Vec<_> = flat.iter().map(|p| source_name(p)).collect();
        assert_eq!(names, vec!["a.XML", "b.xml"]);

        let input = InputConfig {
            recursive: true,
            ..InputConfig::default()
        };
        assert_eq!(discover(dir.path(), &input).unwrap().len(), 3);
    }

    #[test]
    fn test_discover_missing_dir_is_fatal() {
        let err = discover(Path::new("/nonexistent/ksef"), &InputConfig::default()).unwrap_err();
        assert!(matches!(err, KsefError::Io(_)));
    }
}
