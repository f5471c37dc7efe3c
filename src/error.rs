/// Error taxonomy for the launch pipeline
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, LaunchError>;

/// Fatal failures of a launch attempt, surfaced with the offending version id
/// where one exists. Missing individual library or native artifacts are not
/// represented here: they are logged and skipped during classpath assembly
/// and native extraction.
#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    #[error("version manifest not found for {version}")]
    ManifestNotFound { version: String },

    #[error("failed to parse version manifest for {version}: {source}")]
    ManifestParseError {
        version: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("cyclic inheritance detected while resolving {version} (chain: {chain})")]
    CyclicInheritance { version: String, chain: String },

    #[error("failed to read native archive {path:?}: {reason}")]
    ArchiveReadError { path: PathBuf, reason: String },

    #[error("no usable Java runtime found (probed PATH, common install locations and JAVA_HOME)")]
    RuntimeNotFound,

    #[error("game process exited immediately with status {exit_code:?}")]
    LaunchCrashed { exit_code: Option<i32> },

    #[error("version jar not found for {version}")]
    VersionJarMissing { version: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
