//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{KsefError, Result};

/// XML namespace of the KSeF FA(2) invoice schema.
pub const FA2_NAMESPACE: &str = "http://crd.gov.pl/wzor/2023/06/29/12648/";

/// Main configuration for the ksef pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KsefConfig {
    /// Input discovery configuration.
    pub input: InputConfig,

    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// CSV output configuration.
    pub output: OutputConfig,
}

/// Which files count as invoice documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// File extension to pick up (compared case-insensitively, without the dot).
    pub extension: String,

    /// Descend into subdirectories.
    pub recursive: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            extension: "xml".to_string(),
            recursive: false,
        }
    }
}

/// What to do with a document whose section anchor is absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingAnchor {
    /// The document contributes no record to that section.
    #[default]
    Skip,
    /// The document contributes one record with every anchor-scoped column empty.
    EmptyRecord,
}

/// Field extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Namespace URI every path segment is qualified with.
    pub namespace: String,

    /// Policy for documents lacking a section anchor.
    pub missing_anchor: MissingAnchor,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            namespace: FA2_NAMESPACE.to_string(),
            missing_anchor: MissingAnchor::Skip,
        }
    }
}

/// What to do when no document yielded a record for a section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyDataset {
    /// Report "no data" and write nothing.
    #[default]
    Skip,
    /// Write a header-only CSV.
    WriteHeader,
}

/// CSV output configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Field delimiter (single ASCII character).
    pub delimiter: char,

    /// Policy for sections that produced no records.
    pub empty_dataset: EmptyDataset,

    /// Prepend a `source` column with the document name.
    pub include_source: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            empty_dataset: EmptyDataset::Skip,
            include_source: false,
        }
    }
}

impl OutputConfig {
    /// Delimiter as the byte the CSV writer expects.
    pub fn delimiter_byte(&self) -> Result<u8> {
        if self.delimiter.is_ascii() {
            Ok(self.delimiter as u8)
        } else {
            Err(KsefError::Config(format!(
                "delimiter must be an ASCII character, got {:?}",
                self.delimiter
            )))
        }
    }
}

impl KsefConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check values serde cannot check on its own.
    pub fn validate(&self) -> Result<()> {
        self.output.delimiter_byte()?;
        if self.extraction.namespace.trim().is_empty() {
            return Err(KsefError::Config("extraction.namespace must not be empty".into()));
        }
        if self.input.extension.trim_start_matches('.').is_empty() {
            return Err(KsefError::Config("input.extension must not be empty".into()));
        }
        Ok(())
    }
}
