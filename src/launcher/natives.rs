/// Native library extraction
use crate::config::{current_os_key, native_library_extension};
use crate::error::{LaunchError, Result};
use crate::launcher::classpath::library_path;
use crate::launcher::resolve::MergedManifest;
use std::path::Path;

/// Extract every native jar the manifest declares for the current OS into
/// `natives_dir`. The directory is wiped and recreated first, so a stale
/// tree from an aborted launch never leaks into this one.
///
/// A declared native jar that is missing on disk is logged and skipped; a
/// jar that exists but cannot be read as an archive aborts the launch.
pub async fn extract_natives(
    manifest: &MergedManifest,
    libraries_dir: &Path,
    natives_dir: &Path,
) -> Result<()> {
    if natives_dir.exists() {
        tokio::fs::remove_dir_all(natives_dir).await?;
    }
    tokio::fs::create_dir_all(natives_dir).await?;

    let os_key = current_os_key();

    for library in &manifest.libraries {
        let Some(classifier) = library.native_classifier(os_key) else {
            continue;
        };

        let coords = format!("{}:{}", library.name, classifier);
        let Some(jar_path) = library_path(libraries_dir, &coords) else {
            log::warn!("Skipping malformed native coordinate: {}", coords);
            continue;
        };

        if !jar_path.is_file() {
            log::warn!(
                "Native artifact missing for {}, skipping: {:?}",
                library.name,
                jar_path
            );
            continue;
        }

        extract_shared_libraries(&jar_path, natives_dir)?;
    }

    Ok(())
}

/// Copy the shared-library entries of one native jar into `natives_dir`,
/// flattened and overwriting on name conflicts. Non-library entries
/// (manifests, licenses, class files) are ignored.
fn extract_shared_libraries(jar_path: &Path, natives_dir: &Path) -> Result<()> {
    log::debug!("Extracting natives from {:?}", jar_path);

    let file = std::fs::File::open(jar_path)?;
    let mut archive = zip::ZipArchive::new(file).map_err(|e| LaunchError::ArchiveReadError {
        path: jar_path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let extension = native_library_extension();

    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| LaunchError::ArchiveReadError {
                path: jar_path.to_path_buf(),
                reason: e.to_string(),
            })?;

        if entry.is_dir() {
            continue;
        }

        let entry_name = entry.name().to_string();
        if !entry_name.to_lowercase().ends_with(extension) {
            continue;
        }

        // Flatten: drop any directory prefix inside the jar.
        let file_name = entry_name.rsplit('/').next().unwrap_or(&entry_name);
        let dest = natives_dir.join(file_name);

        let mut out = std::fs::File::create(&dest)?;
        std::io::copy(&mut entry, &mut out)?;
    }

    Ok(())
}
