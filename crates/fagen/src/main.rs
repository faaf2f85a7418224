#![allow(unused)]

use crate::prelude::*;
use clap::Parser;

mod error;
mod generate;
mod inspect;
mod prelude;
mod source;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Generate Typst icon maps, bindings and a gallery for Font Awesome"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Whether to display additional information.
    #[clap(long, env = "FAGEN_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Generate the Typst library and gallery files
    Generate(crate::generate::GenerateOptions),

    /// Show how icons reconcile across versions without writing files
    Inspect(crate::inspect::InspectOptions),
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::Generate(options) => crate::generate::run(options, app.global).await,
        SubCommands::Inspect(options) => crate::inspect::run(options, app.global).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::{Artifact, Layout};
    use crate::source::{SourceMode, DEFAULT_API_URL};

    #[test]
    fn test_generate_defaults() {
        let app = App::try_parse_from(["fagen", "generate", "-v", "6.7.2,7.0.0"]).unwrap();

        let SubCommands::Generate(options) = app.command else {
            panic!("expected generate subcommand");
        };
        assert_eq!(options.versions, vec!["6.7.2", "7.0.0"]);
        assert_eq!(options.generate, vec![Artifact::Lib, Artifact::Doc]);
        assert_eq!(options.layout, Layout::Split);
        assert_eq!(options.source.source, SourceMode::Api);
        assert_eq!(options.source.api_url, DEFAULT_API_URL);
        assert!(!app.global.verbose);
    }

    #[test]
    fn test_generate_archive_flags() {
        let app = App::try_parse_from([
            "fagen",
            "generate",
            "--version",
            "6.7.2",
            "-g",
            "lib",
            "--layout",
            "combined",
            "--source",
            "archive",
            "--download",
            "--extract",
            "--archive-dir",
            "/tmp/fa",
            "--verbose",
        ])
        .unwrap();

        let SubCommands::Generate(options) = app.command else {
            panic!("expected generate subcommand");
        };
        assert_eq!(options.generate, vec![Artifact::Lib]);
        assert_eq!(options.layout, Layout::Combined);
        assert_eq!(options.source.source, SourceMode::Archive);
        assert!(options.source.download);
        assert!(options.source.extract);
        assert_eq!(options.source.archive_dir, std::path::PathBuf::from("/tmp/fa"));
        assert!(app.global.verbose);
    }

    #[test]
    fn test_generate_requires_version() {
        assert!(App::try_parse_from(["fagen", "generate"]).is_err());
    }

    #[test]
    fn test_inspect_json() {
        let app = App::try_parse_from(["fagen", "inspect", "-v", "7.0.0", "--json"]).unwrap();

        let SubCommands::Inspect(options) = app.command else {
            panic!("expected inspect subcommand");
        };
        assert!(options.json);
        assert!(!options.conflicts);
    }
}
