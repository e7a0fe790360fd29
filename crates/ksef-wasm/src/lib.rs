//! WASM bindings for KSeF e-invoice field extraction.
//!
//! This crate backs the browser upload page: files are added one at a time,
//! every section table stays available for display, and each table can be
//! downloaded as CSV.

use std::fmt::Display;

use serde::Serialize;
use wasm_bindgen::prelude::*;

use ksef_core::{
    BatchReport, BatchRunner, Dataset, ExtractionConfig, OutputConfig, SectionKind, SourceFile, to_csv_string,
};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn js_error(e: impl Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn parse_section(name: &str) -> Result<SectionKind, JsValue> {
    name.parse::<SectionKind>().map_err(js_error)
}

/// Extract one section of a single invoice as CSV text.
///
/// A malformed document is an error. A document without the section yields
/// the header line only.
#[wasm_bindgen]
pub fn extract_csv(name: &str, bytes: &[u8], section: &str) -> Result<String, JsValue> {
    let kind = parse_section(section)?;
    let runner = BatchRunner::new(ExtractionConfig::default()).with_sections(&[kind]);

    let mut report = runner.empty_report();
    if !runner.add_source(&SourceFile::new(name, bytes), &mut report) {
        let message = report
            .failures
            .last()
            .map(|f| format!("{}: {}", f.source, f.message))
            .unwrap_or_else(|| format!("{}: malformed document", name));
        return Err(JsValue::from_str(&message));
    }

    let dataset = report
        .dataset(kind)
        .ok_or_else(|| js_error(format!("section {} was not extracted", kind)))?;
    to_csv_string(dataset, &OutputConfig::default()).map_err(js_error)
}

/// Accumulates uploaded invoices into the four section tables.
#[wasm_bindgen]
pub struct Extractor {
    runner: BatchRunner,
    report: BatchReport,
    output: OutputConfig,
}

#[wasm_bindgen]
impl Extractor {
    /// Create an extractor with no documents.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        let runner = BatchRunner::new(ExtractionConfig::default());
        let report = runner.empty_report();
        Self {
            runner,
            report,
            output: OutputConfig::default(),
        }
    }

    /// Prepend a `source` column naming the upload to tables and CSV.
    #[wasm_bindgen]
    pub fn set_include_source(&mut self, include: bool) {
        self.output.include_source = include;
    }

    /// Add an uploaded file. Returns `false` if it was not a well-formed
    /// UTF-8 XML document; the failure is logged and kept.
    #[wasm_bindgen]
    pub fn add_file(&mut self, name: &str, bytes: &[u8]) -> bool {
        let ok = self.runner.add_source(&SourceFile::new(name, bytes), &mut self.report);
        if !ok {
            if let Some(failure) = self.report.failures.last() {
                web_sys::console::warn_1(&JsValue::from_str(&format!(
                    "Skipping {}: {}",
                    failure.source, failure.message
                )));
            }
        }
        ok
    }

    /// Number of files added so far, including failed ones.
    #[wasm_bindgen]
    pub fn documents(&self) -> usize {
        self.report.documents
    }

    /// Section names, in output order.
    #[wasm_bindgen]
    pub fn sections(&self) -> js_sys::Array {
        self.runner
            .sections()
            .iter()
            .map(|kind| JsValue::from_str(kind.name()))
            .collect()
    }

    /// Output file name for a section, e.g. `Podmiot1.csv`.
    #[wasm_bindgen]
    pub fn file_name(&self, section: &str) -> Result<String, JsValue> {
        Ok(parse_section(section)?.file_name().to_string())
    }

    /// A section as `{ section, columns, rows }` for display.
    #[wasm_bindgen]
    pub fn table(&self, section: &str) -> Result<JsValue, JsValue> {
        let table = self.dataset(section)?.to_table(self.output.include_source);
        serde_wasm_bindgen::to_value(&table).map_err(js_error)
    }

    /// A section rendered as CSV, for download.
    #[wasm_bindgen]
    pub fn to_csv(&self, section: &str) -> Result<String, JsValue> {
        to_csv_string(self.dataset(section)?, &self.output).map_err(js_error)
    }

    /// Files that could not be parsed, as `[{ source, message }]`.
    #[wasm_bindgen]
    pub fn failures(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.report.failures).map_err(js_error)
    }

    /// Record counts, as `{ documents, failed, sections: [[name, rows], ...] }`.
    #[wasm_bindgen]
    pub fn summary(&self) -> Result<JsValue, JsValue> {
        #[derive(Serialize)]
        struct Summary {
            documents: usize,
            failed: usize,
            sections: Vec<(&'static str, usize)>,
        }

        let summary = Summary {
            documents: self.report.documents,
            failed: self.report.failures.len(),
            sections: self
                .report
                .datasets
                .iter()
                .map(|d| (d.section().name(), d.len()))
                .collect(),
        };

        serde_wasm_bindgen::to_value(&summary).map_err(js_error)
    }

    /// Drop all documents and failures.
    #[wasm_bindgen]
    pub fn clear(&mut self) {
        self.report = self.runner.empty_report();
    }
}

impl Extractor {
    fn dataset(&self, section: &str) -> Result<&Dataset, JsValue> {
        let kind = parse_section(section)?;
        self.report
            .dataset(kind)
            .ok_or_else(|| js_error(format!("section {} was not extracted", kind)))
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}
