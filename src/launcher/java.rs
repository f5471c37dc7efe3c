/// Java runtime discovery
use crate::error::{LaunchError, Result};
use std::path::{Path, PathBuf};

#[cfg(windows)]
const JAVA_BINARY: &str = "java.exe";
#[cfg(not(windows))]
const JAVA_BINARY: &str = "java";

/// Locate a usable Java executable: first the PATH, then a short list of
/// common install locations, then `JAVA_HOME/bin`. A candidate counts as
/// usable when `java -version` exits successfully.
pub fn find_java() -> Result<PathBuf> {
    if let Ok(path) = which::which(JAVA_BINARY) {
        if verify_java(&path).is_ok() {
            log::debug!("Using Java from PATH: {:?}", path);
            return Ok(path);
        }
    }

    for candidate in install_candidates() {
        if candidate.is_file() && verify_java(&candidate).is_ok() {
            log::debug!("Using Java install: {:?}", candidate);
            return Ok(candidate);
        }
    }

    if let Some(java_home) = std::env::var_os("JAVA_HOME") {
        let candidate = PathBuf::from(java_home).join("bin").join(JAVA_BINARY);
        if candidate.is_file() && verify_java(&candidate).is_ok() {
            log::debug!("Using Java from JAVA_HOME: {:?}", candidate);
            return Ok(candidate);
        }
    }

    Err(LaunchError::RuntimeNotFound)
}

/// Common per-platform JRE/JDK install roots, probed newest-first.
fn install_candidates() -> Vec<PathBuf> {
    #[cfg(windows)]
    {
        let mut candidates = Vec::new();
        for root in ["C:\\Program Files\\Java", "C:\\Program Files (x86)\\Java"] {
            let Ok(entries) = std::fs::read_dir(root) else {
                continue;
            };
            let mut installs: Vec<PathBuf> = entries
                .flatten()
                .map(|e| e.path().join("bin").join(JAVA_BINARY))
                .collect();
            installs.sort();
            installs.reverse();
            candidates.extend(installs);
        }
        candidates
    }

    #[cfg(not(windows))]
    {
        vec![
            PathBuf::from("/usr/bin/java"),
            PathBuf::from("/usr/local/bin/java"),
            PathBuf::from("/opt/java/bin/java"),
        ]
    }
}

/// Run `java -version` and require a zero exit status.
pub fn verify_java(java_path: &Path) -> Result<()> {
    let output = std::process::Command::new(java_path)
        .arg("-version")
        .output()?;

    if !output.status.success() {
        log::debug!(
            "Java candidate {:?} failed version check: {}",
            java_path,
            String::from_utf8_lossy(&output.stderr)
        );
        return Err(LaunchError::RuntimeNotFound);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_rejects_non_java_binaries() {
        // `false` exists on unix and always exits non-zero.
        #[cfg(unix)]
        {
            let err = verify_java(Path::new("/bin/false")).unwrap_err();
            assert!(matches!(err, LaunchError::RuntimeNotFound));
        }
    }

    #[test]
    fn verify_errors_on_missing_path() {
        let result = verify_java(Path::new("/nonexistent/java"));
        assert!(result.is_err());
    }

    #[test]
    fn find_java_succeeds_when_java_is_on_path() {
        // Only meaningful on hosts that actually have a JRE.
        if which::which(JAVA_BINARY).is_ok() {
            assert!(find_java().is_ok());
        }
    }
}
