//! Sections command - print the field tables.

use clap::Args;
use console::style;

use ksef_core::section::{Anchor, Scope};
use ksef_core::SectionKind;

/// Arguments for the sections command.
#[derive(Args)]
pub struct SectionsArgs {
    /// Only show this section; repeatable
    #[arg(short, long = "section")]
    sections: Vec<SectionKind>,

    /// Print column names only, one per line
    #[arg(long)]
    names_only: bool,
}

pub fn run(args: SectionsArgs) -> anyhow::Result<()> {
    let kinds = if args.sections.is_empty() {
        SectionKind::ALL.to_vec()
    } else {
        args.sections
    };

    for kind in kinds {
        let section = kind.section();

        if args.names_only {
            for name in section.column_names() {
                println!("{}", name);
            }
            continue;
        }

        let anchor = match section.anchor {
            Anchor::Single(path) => path.to_string(),
            Anchor::Every(path) => format!("{} (every match)", path),
        };
        println!(
            "{} {} -> {}",
            style("■").cyan(),
            style(kind).bold(),
            kind.file_name()
        );
        println!("  anchor:   {}", anchor);
        if !section.requires.is_empty() {
            println!("  requires: {}", section.requires.join(", "));
        }

        let width = section.columns.iter().map(|c| c.name.len()).max().unwrap_or(0);
        for column in section.columns {
            let scope = match column.scope {
                Scope::Anchor => "",
                Scope::Root => " (document)",
            };
            let guard = column
                .guard
                .map(|g| format!(" if {} exists", g))
                .unwrap_or_default();
            println!("    {:width$}  {}{}{}", column.name, column.path, scope, guard, width = width);
        }
        println!();
    }

    Ok(())
}
