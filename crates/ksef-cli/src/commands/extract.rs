//! Extract command - batch-convert a directory of invoices to CSV.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use ksef_core::batch::{discover, has_extension};
use ksef_core::{
    BatchRunner, EmptyDataset, InputConfig, KsefConfig, MissingAnchor, SectionKind, WriteOutcome, write_report,
};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input directory, a single invoice file, or a glob pattern such as "invoices/2024-*.xml"
    #[arg(required = true)]
    input: String,

    /// Output directory for the CSV files
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Section to extract (seller, buyer, header, lines); repeatable, default all
    #[arg(short, long = "section")]
    sections: Vec<SectionKind>,

    /// Write header-only CSV files for sections without data
    #[arg(long)]
    write_empty: bool,

    /// Prepend a "source" column with the invoice file name
    #[arg(long)]
    source_column: bool,

    /// Emit an empty row for documents that lack a section
    #[arg(long)]
    keep_missing: bool,

    /// Search subdirectories of the input directory
    #[arg(short, long)]
    recursive: bool,
}

impl ExtractArgs {
    fn apply(&self, config: &mut KsefConfig) {
        if self.write_empty {
            config.output.empty_dataset = EmptyDataset::WriteHeader;
        }
        if self.source_column {
            config.output.include_source = true;
        }
        if self.keep_missing {
            config.extraction.missing_anchor = MissingAnchor::EmptyRecord;
        }
        if self.recursive {
            config.input.recursive = true;
        }
    }
}

pub fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = super::load_config(config_path)?;
    args.apply(&mut config);
    config.validate()?;

    let files = resolve_inputs(&args.input, &config.input)?;
    println!(
        "{} Found {} invoice file(s) to process",
        style("ℹ").blue(),
        files.len()
    );

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let runner = BatchRunner::new(config.extraction.clone()).with_sections(&args.sections);
    let report = runner.run_files_with(&files, |path| {
        debug!("Processed {}", path.display());
        pb.inc(1);
    })?;
    pb.finish_and_clear();

    let outcomes = write_report(&report, &args.output_dir, &config.output)?;
    for outcome in &outcomes {
        match outcome {
            WriteOutcome::Written { path, rows, .. } => println!(
                "{} Data saved to {} ({} rows)",
                style("✓").green(),
                path.display(),
                rows
            ),
            WriteOutcome::Skipped { section } => println!(
                "{} No data for {}, {} not written",
                style("⚠").yellow(),
                section,
                section.file_name()
            ),
        }
    }

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        report.documents,
        start.elapsed()
    );
    println!(
        "   {} parsed, {} failed",
        style(report.documents - report.failures.len()).green(),
        style(report.failures.len()).red()
    );

    if !report.failures.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for failure in &report.failures {
            println!("  - {}: {}", failure.source, failure.message);
        }
    }

    Ok(())
}

/// Turn the INPUT argument into an ordered file list.
///
/// An existing directory is scanned with [`discover`] and an existing file
/// is taken as is, even when its name has glob metacharacters. Anything else
/// is a glob pattern.
fn resolve_inputs(input: &str, config: &InputConfig) -> anyhow::Result<Vec<PathBuf>> {
    let path = Path::new(input);
    if path.is_dir() {
        return Ok(discover(path, config)?);
    }
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let extension = config.extension.trim_start_matches('.');
    let mut files: Vec<PathBuf> = glob(input)?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file() && has_extension(p, extension))
        .collect();
    files.sort();

    if files.is_empty() && !input.contains(['*', '?', '[']) {
        anyhow::bail!("Input not found: {}", input);
    }

    Ok(files)
}
