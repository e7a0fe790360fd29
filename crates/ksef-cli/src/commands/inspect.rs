//! Inspect command - show what a single invoice yields.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use serde::Serialize;
use tracing::info;

use ksef_core::xml::load_file;
use ksef_core::{Dataset, InvoiceDocument, KsefConfig, SectionKind, to_csv_string};

/// Arguments for the inspect command.
#[derive(Args)]
pub struct InspectArgs {
    /// Invoice XML file
    #[arg(required = true)]
    input: PathBuf,

    /// Section to show (seller, buyer, header, lines); repeatable, default all
    #[arg(short, long = "section")]
    sections: Vec<SectionKind>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Serialize)]
struct InspectOutput<'a> {
    source: &'a str,
    datasets: &'a [Dataset],
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output, one table per section
    Csv,
    /// Plain text listing of non-empty fields
    Text,
}

pub fn run(args: InspectArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Inspecting file: {}", args.input.display());

    let text = load_file(&args.input)?;
    let name = ksef_core::batch::source_name(&args.input);
    let doc = InvoiceDocument::parse(name, &text)?;

    let sections = if args.sections.is_empty() {
        SectionKind::ALL.to_vec()
    } else {
        args.sections.clone()
    };

    let datasets: Vec<Dataset> = sections
        .iter()
        .map(|&kind| {
            let mut dataset = Dataset::new(kind);
            dataset.extend(kind.section().extract(&doc, &config.extraction));
            dataset
        })
        .collect();

    let output = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&InspectOutput {
            source: doc.source(),
            datasets: &datasets,
        })?,
        OutputFormat::Csv => format_csv(&datasets, &config)?,
        OutputFormat::Text => format_text(&datasets),
    };

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        print!("{}", output);
    }

    Ok(())
}

fn format_csv(datasets: &[Dataset], config: &KsefConfig) -> anyhow::Result<String> {
    let mut output = String::new();

    for (i, dataset) in datasets.iter().enumerate() {
        if datasets.len() > 1 {
            if i > 0 {
                output.push('\n');
            }
            output.push_str(&format!("# {}\n", dataset.section().file_name()));
        }
        output.push_str(&to_csv_string(dataset, &config.output)?);
    }

    Ok(output)
}

fn format_text(datasets: &[Dataset]) -> String {
    let mut output = String::new();

    for dataset in datasets {
        let section = dataset.definition();
        output.push_str(&format!(
            "{} ({}): {} record(s)\n",
            dataset.section(),
            section.anchor.path().trim_start_matches(".//"),
            dataset.len()
        ));

        for (i, record) in dataset.records().iter().enumerate() {
            if dataset.len() > 1 {
                output.push_str(&format!("  [{}]\n", i + 1));
            }
            for (name, value) in section.column_names().zip(record.values()) {
                if let Some(value) = value {
                    output.push_str(&format!("    {}: {}\n", name, value));
                }
            }
        }
        output.push('\n');
    }

    output
}
