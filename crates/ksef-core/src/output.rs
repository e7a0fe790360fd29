//! CSV serialization of datasets.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use csv::{Terminator, WriterBuilder};
use tracing::{debug, info, warn};

use crate::batch::BatchReport;
use crate::error::Result;
use crate::models::config::{EmptyDataset, OutputConfig};
use crate::models::record::Dataset;
use crate::section::SectionKind;

/// What happened to one section's output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The file was written.
    Written {
        section: SectionKind,
        path: PathBuf,
        rows: usize,
    },
    /// No document produced a record, and the policy is to write nothing.
    Skipped { section: SectionKind },
}

impl WriteOutcome {
    pub fn section(&self) -> SectionKind {
        match self {
            Self::Written { section, .. } | Self::Skipped { section } => *section,
        }
    }
}

/// Write a dataset as CSV.
///
/// The header is the section's column list. Every value is written as text,
/// and empty values become empty fields.
pub fn write_csv<W: io::Write>(dataset: &Dataset, writer: W, config: &OutputConfig) -> Result<()> {
    let mut wtr = WriterBuilder::new()
        .delimiter(config.delimiter_byte()?)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(writer);

    wtr.write_record(dataset.header(config.include_source))?;
    for record in dataset.records() {
        wtr.write_record(record.cells(config.include_source))?;
    }

    wtr.flush()?;
    Ok(())
}

/// Render a dataset as a CSV string.
pub fn to_csv_string(dataset: &Dataset, config: &OutputConfig) -> Result<String> {
    let mut buf = Vec::new();
    write_csv(dataset, &mut buf, config)?;
    // Every cell came from a `&str`, so the buffer is valid UTF-8.
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Write a dataset to `<dir>/<section file name>`, honouring the
/// empty-dataset policy.
pub fn write_dataset(dataset: &Dataset, dir: &Path, config: &OutputConfig) -> Result<WriteOutcome> {
    let section = dataset.section();

    if dataset.is_empty() && config.empty_dataset == EmptyDataset::Skip {
        warn!("No data for {}, not writing {}", section, section.file_name());
        return Ok(WriteOutcome::Skipped { section });
    }

    let path = dir.join(section.file_name());
    let file = fs::File::create(&path)?;
    write_csv(dataset, io::BufWriter::new(file), config)?;

    info!("Data saved to {} ({} rows)", path.display(), dataset.len());
    Ok(WriteOutcome::Written {
        section,
        path,
        rows: dataset.len(),
    })
}

/// Write every dataset of a report into `dir`, creating it if needed.
pub fn write_report(report: &BatchReport, dir: &Path, config: &OutputConfig) -> Result<Vec<WriteOutcome>> {
    fs::create_dir_all(dir)?;
    debug!("Writing {} dataset(s) to {}", report.datasets.len(), dir.display());

    report
        .datasets
        .iter()
        .map(|dataset| write_dataset(dataset, dir, config))
        .collect()
}
