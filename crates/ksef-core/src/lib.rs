//! Core library for KSeF e-invoice field extraction.
//!
//! This crate provides:
//! - XML loading and namespaced path lookups for FA(2) invoices
//! - Static field tables for the seller, buyer, header and line-item sections
//! - A batch runner that turns many documents into one dataset per section
//! - CSV output with explicit empty-data policies

pub mod batch;
pub mod error;
pub mod models;
pub mod output;
pub mod section;
pub mod xml;

pub use batch::{BatchReport, BatchRunner, DocumentFailure, SourceFile, discover};
pub use error::{KsefError, Result};
pub use models::config::{
    EmptyDataset, ExtractionConfig, FA2_NAMESPACE, InputConfig, KsefConfig, MissingAnchor, OutputConfig,
};
pub use models::record::{Dataset, Record, Table};
pub use output::{WriteOutcome, to_csv_string, write_csv, write_dataset, write_report};
pub use section::{Column, Section, SectionKind};
pub use xml::{FieldPath, InvoiceDocument};
