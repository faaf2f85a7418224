use crate::prelude::{println, *};
use crate::source::{MetadataSource, SourceConfig, SourceOptions};
use colored::Colorize;
use fagen_core::reconcile::{Group, ReconciledTable};
use fagen_core::typst::bindings;
use prettytable::row;

#[derive(Debug, Clone, clap::Args)]
pub struct InspectOptions {
    /// Font Awesome versions, comma separated (e.g. 6.7.2,7.0.0)
    #[arg(short = 'v', long = "version", value_delimiter = ',', required = true)]
    pub versions: Vec<String>,

    /// Output the reconciled table as JSON
    #[arg(long)]
    pub json: bool,

    /// Also list every conflicting name with its code point
    #[arg(long)]
    pub conflicts: bool,

    #[clap(flatten)]
    pub source: SourceOptions,
}

pub async fn run(options: InspectOptions, global: crate::Global) -> Result<()> {
    let versions = crate::generate::normalize_versions(&options.versions)?;

    if global.verbose {
        println!("Inspecting versions: {}", versions.join(", "));
    }

    let source = MetadataSource::new(SourceConfig::from(options.source.clone()))?;
    let table = crate::generate::reconcile_versions(&source, &versions, None).await?;

    if options.json {
        output_json(&table)?;
    } else {
        output_formatted(&table, &versions, options.conflicts);
    }

    Ok(())
}

fn output_json(table: &ReconciledTable) -> Result<()> {
    let json = serde_json::to_string_pretty(table)
        .map_err(|e| eyre!("JSON serialization failed: {}", e))?;
    println!("{}", json);
    Ok(())
}

fn output_formatted(table: &ReconciledTable, versions: &[String], conflicts: bool) {
    println!(
        "\n{}\n",
        format!("FONT AWESOME {}", versions.join(", "))
            .bright_cyan()
            .bold()
    );

    let mut summary = new_table();
    summary.set_titles(row!["GROUP", "NAMES", "SOLID ONLY"]);
    for (group, entries) in table.groups() {
        let solid_only = entries.iter().filter(|e| e.solid_only).count();
        summary.add_row(row![group.to_string(), entries.len(), solid_only]);
    }
    summary.printstd();

    println!(
        "\n{}: {}",
        "Bindings".green(),
        bindings(table).len().to_string().bright_white()
    );

    if !conflicts {
        return;
    }

    for (version, entries) in table.conflicts() {
        println!(
            "\n{}",
            format!("== {} ==", Group::Version(version)).bold().yellow()
        );

        let mut list = new_table();
        list.set_titles(row!["NAME", "CODE POINT", "SOLID ONLY"]);
        for entry in entries {
            list.add_row(row![entry.identifier, entry.code_point, entry.solid_only]);
        }
        list.printstd();
    }
}
