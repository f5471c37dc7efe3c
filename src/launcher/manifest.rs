/// Version manifest model and disk loading
use crate::error::{LaunchError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// A version descriptor as found in `versions/<id>/<id>.json`. Third-party
/// tools disagree on key casing, so `load_manifest` matches property names
/// case-insensitively; the lowercase aliases below are the match targets
/// after key folding.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionManifest {
    /// Version ID (e.g. "1.20.1" or "1.20.1-forge-47.2.0")
    pub id: String,

    /// Parent version to inherit from
    #[serde(skip_serializing_if = "Option::is_none", alias = "inheritsfrom")]
    pub inherits_from: Option<String>,

    /// Main class to execute
    #[serde(skip_serializing_if = "Option::is_none", alias = "mainclass")]
    pub main_class: Option<String>,

    /// Game and JVM argument token lists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Arguments>,

    /// Libraries required by this version
    #[serde(default)]
    pub libraries: Vec<Library>,

    /// Asset index reference
    #[serde(skip_serializing_if = "Option::is_none", alias = "assetindex")]
    pub asset_index: Option<AssetIndexRef>,

    /// Version type (release, snapshot, ...)
    #[serde(skip_serializing_if = "Option::is_none", rename = "type")]
    pub version_type: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Arguments {
    #[serde(default)]
    pub game: Vec<Argument>,

    #[serde(default)]
    pub jvm: Vec<Argument>,
}

/// One argument token. Manifests mix plain strings with rule objects that
/// gate an argument on OS or launcher features. Conditional tokens are
/// parsed so round-tripping preserves them, but the command builder never
/// evaluates their rules: it emits plain tokens only. This is a deliberate
/// simplification over the full rule engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Argument {
    Plain(String),

    Conditional {
        rules: Vec<serde_json::Value>,
        value: ArgumentValue,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArgumentValue {
    Single(String),
    Multiple(Vec<String>),
}

/// Library reference by Maven coordinate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Library {
    /// Coordinate `group:artifact:version[:classifier]`
    pub name: String,

    /// OS identifier -> native classifier (e.g. "windows" -> "natives-windows")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub natives: Option<HashMap<String, String>>,
}

impl Library {
    /// Native classifier for the current platform, if this library carries
    /// one. Libraries with a classifier here are excluded from the
    /// classpath and contribute to native extraction instead.
    pub fn native_classifier(&self, os_key: &str) -> Option<&str> {
        self.natives
            .as_ref()
            .and_then(|map| map.get(os_key))
            .map(String::as_str)
            .filter(|c| !c.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetIndexRef {
    pub id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Locate the manifest file for `version_id` under `versions_dir`. The
/// canonical name is `<id>/<id>.json`; some third-party installers drop a
/// differently named file, so any `*.json` in the version directory is
/// accepted as a fallback.
pub fn manifest_path(versions_dir: &Path, version_id: &str) -> Option<PathBuf> {
    let version_dir = versions_dir.join(version_id);
    let canonical = version_dir.join(format!("{}.json", version_id));
    if canonical.is_file() {
        return Some(canonical);
    }

    let entries = std::fs::read_dir(&version_dir).ok()?;
    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "json") {
            log::debug!(
                "No {}.json for {}, falling back to {:?}",
                version_id,
                version_id,
                path.file_name()
            );
            return Some(path);
        }
    }
    None
}

/// Load and parse the manifest for `version_id`. Property names are
/// matched case-insensitively.
pub async fn load_manifest(versions_dir: &Path, version_id: &str) -> Result<VersionManifest> {
    let path = manifest_path(versions_dir, version_id).ok_or_else(|| {
        LaunchError::ManifestNotFound {
            version: version_id.to_string(),
        }
    })?;

    let content = tokio::fs::read_to_string(&path).await?;
    let parse_error = |source| LaunchError::ManifestParseError {
        version: version_id.to_string(),
        source,
    };
    let value: serde_json::Value = serde_json::from_str(&content).map_err(parse_error)?;
    serde_json::from_value(fold_keys(value)).map_err(parse_error)
}

/// Lowercase every object key, recursively. Manifest values are left
/// untouched; OS keys in `natives` maps are lowercase to begin with.
fn fold_keys(value: serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Object(map) => serde_json::Value::Object(
            map.into_iter()
                .map(|(k, v)| (k.to_lowercase(), fold_keys(v)))
                .collect(),
        ),
        serde_json::Value::Array(items) => {
            serde_json::Value::Array(items.into_iter().map(fold_keys).collect())
        }
        other => other,
    }
}

/// Scan the versions directory and return the ids of every version whose
/// manifest parses. Directories without a readable manifest are skipped.
pub async fn list_installed_versions(versions_dir: &Path) -> Result<Vec<String>> {
    let mut versions = Vec::new();

    let mut entries = match tokio::fs::read_dir(versions_dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(versions),
        Err(e) => return Err(e.into()),
    };

    while let Some(entry) = entries.next_entry().await? {
        if !entry.file_type().await?.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        match load_manifest(versions_dir, &name).await {
            Ok(manifest) => versions.push(manifest.id),
            Err(e) => {
                log::debug!("Skipping version directory {}: {}", name, e);
            }
        }
    }

    versions.sort();
    Ok(versions)
}
