//! Icon metadata model and transformations
//!
//! Pure functions that turn the two Font Awesome metadata formats into
//! [`IconRecord`]s:
//!
//! - the GraphQL `release { icons { ... } }` response of the public API
//! - the `metadata/icons.json` file shipped inside release archives
//!
//! The only filesystem access lives in [`find_metadata_file`] and
//! [`parse_extracted`], which walk an already extracted archive.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::error::MetadataError;

/// GraphQL query sent to the Font Awesome API, `{version}` is interpolated.
const RELEASE_QUERY_TEMPLATE: &str = r#"
query {
    release (version: "{version}") {
        icons {
            id,
            unicode,
            familyStylesByLicense {
                free { style },
                pro { style }
            },
            aliases { names }
        }
    }
}
"#;

static VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(\.\d+)*$").expect("version pattern is valid"));

/// Rendering style of an icon
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Style {
    Solid,
    Regular,
    Brands,
    Other(String),
}

impl From<String> for Style {
    fn from(value: String) -> Self {
        match value.as_str() {
            "solid" => Style::Solid,
            "regular" => Style::Regular,
            "brands" => Style::Brands,
            _ => Style::Other(value),
        }
    }
}

impl From<&str> for Style {
    fn from(value: &str) -> Self {
        Style::from(value.to_string())
    }
}

impl From<Style> for String {
    fn from(style: Style) -> Self {
        match style {
            Style::Solid => "solid".to_string(),
            Style::Regular => "regular".to_string(),
            Style::Brands => "brands".to_string(),
            Style::Other(other) => other,
        }
    }
}

/// One icon of a single release
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IconRecord {
    pub identifier: String,
    /// Lowercase hex digits, no `0x` prefix.
    pub code_point: String,
    pub aliases: Vec<String>,
    /// Styles available in the free font.
    pub styles: BTreeSet<Style>,
}

impl IconRecord {
    /// True when the free font only ships the solid variant of this icon.
    pub fn is_solid_only(&self) -> bool {
        self.styles.contains(&Style::Solid) && !self.styles.contains(&Style::Regular)
    }

    /// The primary identifier followed by every alias.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.identifier.as_str()).chain(self.aliases.iter().map(String::as_str))
    }
}

// ============================================================================
// GraphQL API format
// ============================================================================

/// Request body of the GraphQL POST
#[derive(Debug, Serialize, Clone)]
pub struct GraphQlRequest {
    pub query: String,
}

/// Top level GraphQL response
#[derive(Debug, Deserialize, Clone)]
pub struct ReleaseResponse {
    pub data: Option<ReleaseData>,
    #[serde(default)]
    pub errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GraphQlError {
    pub message: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReleaseData {
    pub release: Option<Release>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Release {
    pub icons: Vec<ApiIcon>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ApiIcon {
    pub id: String,
    pub unicode: String,
    #[serde(default)]
    pub aliases: Option<ApiAliases>,
    #[serde(default)]
    pub family_styles_by_license: Option<FamilyStylesByLicense>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiAliases {
    #[serde(default)]
    pub names: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FamilyStylesByLicense {
    #[serde(default)]
    pub free: Option<Vec<FamilyStyle>>,
    #[serde(default)]
    pub pro: Option<Vec<FamilyStyle>>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FamilyStyle {
    pub style: String,
}

/// Build the GraphQL request body for a release.
pub fn build_release_query(version: &str) -> GraphQlRequest {
    GraphQlRequest {
        query: RELEASE_QUERY_TEMPLATE.replace("{version}", version),
    }
}

/// Transform a GraphQL release response into icon records
///
/// GraphQL reports failures in-band, so `errors` and a `null` release are
/// both treated as malformed metadata.
pub fn transform_release(
    response: ReleaseResponse,
    version: &str,
) -> Result<Vec<IconRecord>, MetadataError> {
    if let Some(errors) = response.errors.filter(|errors| !errors.is_empty()) {
        let messages: Vec<String> = errors.into_iter().map(|e| e.message).collect();
        return Err(MetadataError::Malformed(messages.join("; ")));
    }

    let release = response
        .data
        .and_then(|data| data.release)
        .ok_or_else(|| MetadataError::Malformed(format!("release {version} not found")))?;

    release
        .icons
        .into_iter()
        .map(|icon| -> Result<IconRecord, MetadataError> {
            let styles = icon
                .family_styles_by_license
                .and_then(|license| license.free)
                .unwrap_or_default()
                .into_iter()
                .map(|family_style| Style::from(family_style.style))
                .collect();

            Ok(IconRecord {
                code_point: normalize_code_point(&icon.id, &icon.unicode)?,
                identifier: icon.id,
                aliases: icon.aliases.and_then(|a| a.names).unwrap_or_default(),
                styles,
            })
        })
        .collect()
}

// ============================================================================
// Archive `metadata/icons.json` format
// ============================================================================

/// One entry of `metadata/icons.json`
#[derive(Debug, Deserialize, Clone)]
pub struct MetadataIcon {
    pub unicode: String,
    #[serde(default)]
    pub styles: Vec<String>,
    /// Styles available in the free font, absent in older releases.
    #[serde(default)]
    pub free: Option<Vec<String>>,
    #[serde(default)]
    pub aliases: Option<MetadataAliases>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MetadataAliases {
    #[serde(default)]
    pub names: Vec<String>,
}

/// Parse the contents of `metadata/icons.json`
pub fn parse_metadata(json: &str) -> Result<BTreeMap<String, IconRecord>, MetadataError> {
    let icons: BTreeMap<String, MetadataIcon> = serde_json::from_str(json)?;

    icons
        .into_iter()
        .map(|(identifier, icon)| -> Result<(String, IconRecord), MetadataError> {
            let styles = icon
                .free
                .unwrap_or(icon.styles)
                .into_iter()
                .map(Style::from)
                .collect();

            let record = IconRecord {
                code_point: normalize_code_point(&identifier, &icon.unicode)?,
                identifier: identifier.clone(),
                aliases: icon.aliases.map(|a| a.names).unwrap_or_default(),
                styles,
            };

            Ok((identifier, record))
        })
        .collect()
}

/// Locate `**/metadata/icons.json` below `root`
///
/// Entries are visited in file name order so the first match is stable.
pub fn find_metadata_file(root: &Path) -> Result<PathBuf, MetadataError> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.into_path())
        .find(|path| is_metadata_file(path))
        .ok_or_else(|| MetadataError::NotFound(root.to_path_buf()))
}

fn is_metadata_file(path: &Path) -> bool {
    path.is_file()
        && path.file_name().and_then(|n| n.to_str()) == Some("icons.json")
        && path
            .parent()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
            == Some("metadata")
}

/// Find and parse the metadata file of an extracted archive
pub fn parse_extracted(root: &Path) -> Result<BTreeMap<String, IconRecord>, MetadataError> {
    let path = find_metadata_file(root)?;
    let json = fs::read_to_string(&path)?;
    parse_metadata(&json)
}

// ============================================================================
// Versions and code points
// ============================================================================

/// Validate a version string, removing an optional `v` prefix
///
/// Converts "v6.7.2" to "6.7.2", rejects anything that is not dotted numeric.
pub fn normalize_version(version: &str) -> Result<&str, MetadataError> {
    let trimmed = version.trim().trim_start_matches('v');

    if VERSION_RE.is_match(trimmed) {
        Ok(trimmed)
    } else {
        Err(MetadataError::InvalidVersion(version.to_string()))
    }
}

/// Major component of a dotted version ("6.7.2" -> 6)
pub fn major_version(version: &str) -> Result<u32, MetadataError> {
    let normalized = normalize_version(version)?;

    normalized
        .split('.')
        .next()
        .and_then(|major| major.parse::<u32>().ok())
        .ok_or_else(|| MetadataError::InvalidVersion(version.to_string()))
}

fn normalize_code_point(identifier: &str, unicode: &str) -> Result<String, MetadataError> {
    let trimmed = unicode.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(MetadataError::Malformed(format!(
            "icon {identifier:?} has invalid unicode {unicode:?}"
        )));
    }

    Ok(digits.to_ascii_lowercase())
}
