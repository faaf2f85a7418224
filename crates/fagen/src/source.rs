//! Metadata source adapter
//!
//! Loads the icons of one release either from the Font Awesome GraphQL API or
//! from a release archive on disk. Both modes go through [`MetadataSource`],
//! which is built from an explicit [`SourceConfig`].

use std::fs;
use std::path::{Path, PathBuf};

use fagen_core::icons::{
    build_release_query, normalize_version, parse_extracted, transform_release, IconRecord,
    ReleaseResponse,
};

use crate::error::Error;

pub const DEFAULT_API_URL: &str = "https://api.fontawesome.com";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";
pub const DEFAULT_ARCHIVE_URL: &str =
    "https://use.fontawesome.com/releases/v{version}/fontawesome-free-{version}-web.zip";

/// Where icon metadata comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SourceMode {
    /// Font Awesome GraphQL API
    #[default]
    Api,
    /// `metadata/icons.json` of a release archive
    Archive,
}

/// Command line options selecting and configuring the metadata source
#[derive(Debug, Clone, clap::Args)]
pub struct SourceOptions {
    /// Where to read icon metadata from
    #[arg(long, env = "FAGEN_SOURCE", value_enum, default_value_t = SourceMode::Api)]
    pub source: SourceMode,

    /// Font Awesome GraphQL endpoint
    #[arg(long, env = "FAGEN_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// User-Agent header sent with every request
    #[arg(long, env = "FAGEN_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Directory holding downloaded archives and their extracted contents
    #[arg(long, env = "FAGEN_ARCHIVE_DIR", default_value = "fontawesome")]
    pub archive_dir: PathBuf,

    /// Archive URL template, `{version}` is replaced by the release version
    #[arg(long, env = "FAGEN_ARCHIVE_URL", default_value = DEFAULT_ARCHIVE_URL)]
    pub archive_url: String,

    /// Download the release archive before reading it (archive source only)
    #[arg(long)]
    pub download: bool,

    /// Extract the release archive before reading it (archive source only)
    #[arg(long)]
    pub extract: bool,
}

/// Metadata source configuration
#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub mode: SourceMode,
    pub api_url: String,
    pub user_agent: String,
    pub archive_dir: PathBuf,
    pub archive_url: String,
    pub download: bool,
    pub extract: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            mode: SourceMode::Api,
            api_url: DEFAULT_API_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            archive_dir: PathBuf::from("fontawesome"),
            archive_url: DEFAULT_ARCHIVE_URL.to_string(),
            download: false,
            extract: false,
        }
    }
}

impl From<SourceOptions> for SourceConfig {
    fn from(options: SourceOptions) -> Self {
        Self {
            mode: options.source,
            api_url: options.api_url,
            user_agent: options.user_agent,
            archive_dir: options.archive_dir,
            archive_url: options.archive_url,
            download: options.download,
            extract: options.extract,
        }
    }
}

impl SourceConfig {
    /// Archive URL for a release
    pub fn archive_url_for(&self, version: &str) -> String {
        self.archive_url.replace("{version}", version)
    }

    /// Local path of the downloaded archive of a release
    pub fn archive_path(&self, version: &str) -> PathBuf {
        self.archive_dir
            .join(format!("fontawesome-free-{version}.zip"))
    }

    /// Directory a release archive is extracted into
    pub fn extract_dir(&self, version: &str) -> PathBuf {
        self.archive_dir.join(version)
    }
}

/// Loads the icons of a release
#[derive(Debug, Clone)]
pub struct MetadataSource {
    config: SourceConfig,
    client: reqwest::Client,
}

impl MetadataSource {
    pub fn new(config: SourceConfig) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| Error::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &SourceConfig {
        &self.config
    }

    /// Fetch every icon of a release, aliases included on each record
    pub async fn fetch_version(&self, version: &str) -> Result<Vec<IconRecord>, Error> {
        let version = normalize_version(version)?;

        match self.config.mode {
            SourceMode::Api => self.fetch_api(version).await,
            SourceMode::Archive => self.fetch_archive(version).await,
        }
    }

    async fn fetch_api(&self, version: &str) -> Result<Vec<IconRecord>, Error> {
        log::debug!("POST {} (release {})", self.config.api_url, version);

        let response = self
            .client
            .post(&self.config.api_url)
            .json(&build_release_query(version))
            .send()
            .await
            .map_err(|e| {
                Error::Transport(format!(
                    "Failed to send request to {}: {}",
                    self.config.api_url, e
                ))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Transport(format!(
                "Font Awesome API returned [{}]: {}",
                status, body
            )));
        }

        let body: ReleaseResponse = response
            .json()
            .await
            .map_err(|e| Error::Transport(format!("Failed to parse API response: {}", e)))?;

        Ok(transform_release(body, version)?)
    }

    async fn fetch_archive(&self, version: &str) -> Result<Vec<IconRecord>, Error> {
        let archive_path = self.config.archive_path(version);
        let extract_dir = self.config.extract_dir(version);

        if self.config.download {
            let url = self.config.archive_url_for(version);
            self.download_archive(&url, &archive_path).await?;
        }

        if self.config.extract {
            let (archive, dest) = (archive_path.clone(), extract_dir.clone());
            let extracted = tokio::task::spawn_blocking(move || extract_archive(&archive, &dest))
                .await
                .map_err(|e| Error::Generic(format!("Extraction task failed: {}", e)))??;
            log::info!(
                "Extracted {} files from {} to {}",
                extracted,
                archive_path.display(),
                extract_dir.display()
            );
        }

        let icons = parse_extracted(&extract_dir)?;
        Ok(icons.into_values().collect())
    }

    /// Download a release archive to `path`
    async fn download_archive(&self, url: &str, path: &Path) -> Result<(), Error> {
        log::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Transport(format!("Failed to download {}: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(Error::Transport(format!(
                "Download of {} failed with status: {}",
                url,
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::Transport(format!("Failed to read downloaded archive: {}", e)))?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, &bytes)?;

        log::info!("Downloaded {} bytes to {}", bytes.len(), path.display());
        Ok(())
    }
}

/// Extract a zip archive into `dest`, returning the number of files written
///
/// Entries whose path would escape `dest` are skipped.
pub fn extract_archive(archive: &Path, dest: &Path) -> Result<usize, Error> {
    let file = fs::File::open(archive).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => {
            Error::NotFound(format!("archive {} (use --download)", archive.display()))
        }
        _ => Error::from(e),
    })?;
    let mut zip = zip::ZipArchive::new(file)?;

    fs::create_dir_all(dest)?;

    let mut extracted = 0;
    for i in 0..zip.len() {
        let mut entry = zip.by_index(i)?;

        let Some(relative) = entry.enclosed_name() else {
            log::warn!("Skipping unsafe archive entry {}", entry.name());
            continue;
        };
        let outpath = dest.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&outpath)?;
            continue;
        }

        if let Some(parent) = outpath.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut outfile = fs::File::create(&outpath)?;
        std::io::copy(&mut entry, &mut outfile)?;
        extracted += 1;
    }

    Ok(extracted)
}
