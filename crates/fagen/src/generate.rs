use crate::prelude::{println, *};
use crate::source::{MetadataSource, SourceConfig, SourceOptions};
use colored::Colorize;
use fagen_core::icons::{major_version, normalize_version};
use fagen_core::reconcile::{reconcile, ReconciledTable, VersionedIconSet};
use fagen_core::typst::{emit_combined_library, emit_gallery, emit_library};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};

/// Generated artifact kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Artifact {
    /// Icon maps and bindings
    Lib,
    /// Gallery document
    Doc,
}

/// File layout of the generated library
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Layout {
    /// `lib-gen-map.typ` and `lib-gen-func.typ`
    #[default]
    Split,
    /// A single `lib-gen.typ`
    Combined,
}

#[derive(Debug, Clone, clap::Args)]
pub struct GenerateOptions {
    /// Font Awesome versions, comma separated (e.g. 6.7.2,7.0.0)
    #[arg(short = 'v', long = "version", value_delimiter = ',', required = true)]
    pub versions: Vec<String>,

    /// Output directory
    #[arg(short, long, env = "FAGEN_OUTPUT", default_value = ".")]
    pub output: PathBuf,

    /// Artifacts to generate
    #[arg(
        short,
        long,
        value_enum,
        value_delimiter = ',',
        default_values_t = [Artifact::Lib, Artifact::Doc]
    )]
    pub generate: Vec<Artifact>,

    /// Library file layout
    #[arg(long, value_enum, default_value_t = Layout::Split)]
    pub layout: Layout,

    #[clap(flatten)]
    pub source: SourceOptions,
}

/// A rendered output file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub name: &'static str,
    pub contents: String,
}

pub async fn run(options: GenerateOptions, global: crate::Global) -> Result<()> {
    let versions = normalize_versions(&options.versions)?;

    if global.verbose {
        println!(
            "Generating typst-fontawesome for versions: {}",
            versions.join(", ")
        );
    }

    let source = MetadataSource::new(SourceConfig::from(options.source.clone()))?;

    let spinner = new_spinner()?;
    let table = reconcile_versions(&source, &versions, Some(&spinner)).await;
    spinner.finish_and_clear();
    let table = table?;

    let files = render_files(&table, &versions, &options.generate, options.layout);
    write_files(&options.output, &files)?;

    for file in &files {
        println!(
            "{} {}",
            "Wrote".green().bold(),
            options.output.join(file.name).display()
        );
    }

    if global.verbose {
        println!(
            "{} names, {} in common, {} conflict groups",
            table.len(),
            table.common().len(),
            table.conflicts().count()
        );
    }

    Ok(())
}

fn new_spinner() -> Result<ProgressBar> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .map_err(|e| eyre!("Invalid spinner template: {}", e))?,
    );
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));
    Ok(spinner)
}

/// Helper to set spinner message if spinner is present
fn set_spinner_msg(spinner: Option<&ProgressBar>, msg: impl Into<String>) {
    if let Some(s) = spinner {
        s.set_message(msg.into());
    }
}

/// Canonical version strings (`v6.7.2` becomes `6.7.2`)
pub fn normalize_versions(versions: &[String]) -> Result<Vec<String>> {
    let mut normalized = Vec::with_capacity(versions.len());
    for version in versions {
        normalized.push(normalize_version(version).map_err(Error::from)?.to_string());
    }
    Ok(normalized)
}

/// Fetch every version one after another and reconcile them
pub async fn reconcile_versions(
    source: &MetadataSource,
    versions: &[String],
    spinner: Option<&ProgressBar>,
) -> Result<ReconciledTable> {
    let mut sets: VersionedIconSet = Vec::with_capacity(versions.len());

    for version in versions {
        let major = major_version(version).map_err(Error::from)?;

        if sets.iter().any(|(seen, _)| *seen == major) {
            log::warn!(
                "Version {} shares major version {} with an earlier one, its code points take precedence",
                version,
                major
            );
        }

        set_spinner_msg(spinner, format!("Fetching Font Awesome {}...", version));
        let icons = source
            .fetch_version(version)
            .await
            .with_context(|| format!("Failed to load icons of Font Awesome {}", version))?;

        log::info!("Loaded {} icons of Font Awesome {}", icons.len(), version);
        sets.push((major, icons));
    }

    set_spinner_msg(spinner, "Reconciling versions...");
    Ok(reconcile(&sets))
}

/// Render every requested artifact
///
/// Nothing is written here so a failure can't leave a partial set of files.
pub fn render_files(
    table: &ReconciledTable,
    versions: &[String],
    artifacts: &[Artifact],
    layout: Layout,
) -> Vec<GeneratedFile> {
    let mut files = Vec::new();

    if artifacts.contains(&Artifact::Lib) {
        match layout {
            Layout::Split => {
                let library = emit_library(table, versions);
                files.push(GeneratedFile {
                    name: "lib-gen-map.typ",
                    contents: library.map,
                });
                files.push(GeneratedFile {
                    name: "lib-gen-func.typ",
                    contents: library.func,
                });
            }
            Layout::Combined => files.push(GeneratedFile {
                name: "lib-gen.typ",
                contents: emit_combined_library(table, versions),
            }),
        }
    }

    if artifacts.contains(&Artifact::Doc) {
        files.push(GeneratedFile {
            name: "gallery.typ",
            contents: emit_gallery(table),
        });
    }

    files
}

/// Write rendered files into `output`, creating it when missing
pub fn write_files(output: &Path, files: &[GeneratedFile]) -> Result<()> {
    fs::create_dir_all(output)
        .with_context(|| format!("Failed to create output directory {}", output.display()))?;

    for file in files {
        let path = output.join(file.name);
        fs::write(&path, &file.contents)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        log::debug!("Wrote {} bytes to {}", file.contents.len(), path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fagen_core::icons::{IconRecord, Style};
    use tempfile::TempDir;

    fn sample_table() -> ReconciledTable {
        let icon = |identifier: &str, code_point: &str| IconRecord {
            identifier: identifier.to_string(),
            code_point: code_point.to_string(),
            aliases: vec![],
            styles: [Style::Solid, Style::Regular].into_iter().collect(),
        };
        reconcile(&[
            (6, vec![icon("face-smile", "f118")]),
            (7, vec![icon("face-smile", "f200")]),
        ])
    }

    fn versions() -> Vec<String> {
        vec!["6.7.2".to_string(), "7.0.0".to_string()]
    }

    fn file_names(files: &[GeneratedFile]) -> Vec<&str> {
        files.iter().map(|f| f.name).collect()
    }

    #[test]
    fn test_render_files_split_layout() {
        let files = render_files(
            &sample_table(),
            &versions(),
            &[Artifact::Lib, Artifact::Doc],
            Layout::Split,
        );
        assert_eq!(
            file_names(&files),
            vec!["lib-gen-map.typ", "lib-gen-func.typ", "gallery.typ"]
        );
        assert!(files[1]
            .contents
            .contains("#let fa-face-smile = fa-icon.with(\"\\u{f200}\")"));
    }

    #[test]
    fn test_render_files_combined_layout() {
        let files = render_files(&sample_table(), &versions(), &[Artifact::Lib], Layout::Combined);
        assert_eq!(file_names(&files), vec!["lib-gen.typ"]);
        assert!(files[0].contents.contains("#let fa-icon-map-7 = ("));
    }

    #[test]
    fn test_render_files_doc_only() {
        let files = render_files(&sample_table(), &versions(), &[Artifact::Doc], Layout::Split);
        assert_eq!(file_names(&files), vec!["gallery.typ"]);
    }

    #[test]
    fn test_normalize_versions() {
        let raw = vec!["v6.7.2".to_string(), " 7.0.0 ".to_string()];
        assert_eq!(normalize_versions(&raw).unwrap(), versions());
        assert!(normalize_versions(&["6.x".to_string()]).is_err());
    }

    #[test]
    fn test_banner_same_for_prefixed_versions() {
        let render = |raw: &[&str]| {
            let raw: Vec<String> = raw.iter().map(|v| v.to_string()).collect();
            render_files(
                &sample_table(),
                &normalize_versions(&raw).unwrap(),
                &[Artifact::Lib],
                Layout::Split,
            )
        };

        let prefixed = render(&["v6.7.2", "v7.0.0"]);
        assert_eq!(prefixed, render(&["6.7.2", "7.0.0"]));
        assert!(prefixed[0]
            .contents
            .starts_with("// Generated icon maps of Font Awesome 6.7.2, 7.0.0\n"));
    }

    #[test]
    fn test_write_files_creates_output_dir() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("nested").join("out");
        let files = render_files(
            &sample_table(),
            &versions(),
            &[Artifact::Lib, Artifact::Doc],
            Layout::Split,
        );

        write_files(&output, &files).unwrap();

        for file in &files {
            let written = fs::read_to_string(output.join(file.name)).unwrap();
            assert_eq!(written, file.contents);
        }
    }
}
