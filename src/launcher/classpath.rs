/// Classpath construction
use crate::config::{classpath_separator, current_os_key};
use crate::launcher::resolve::MergedManifest;
use std::path::{Path, PathBuf};

/// Convert Maven coordinates to a relative path under the libraries root.
/// Format: `group:artifact:version[:classifier]`.
/// Example: "com.google.guava:guava:21.0" -> "com/google/guava/guava/21.0/guava-21.0.jar"
pub fn maven_to_path(coords: &str) -> Option<PathBuf> {
    let parts: Vec<&str> = coords.split(':').collect();
    if parts.len() < 3 {
        return None;
    }

    let group = parts[0].replace('.', "/");
    let artifact = parts[1];
    let version = parts[2];

    let filename = if parts.len() > 3 {
        format!("{}-{}-{}.jar", artifact, version, parts[3])
    } else {
        format!("{}-{}.jar", artifact, version)
    };

    let mut path = PathBuf::new();
    for segment in group.split('/') {
        path.push(segment);
    }
    path.push(artifact);
    path.push(version);
    path.push(filename);
    Some(path)
}

/// Absolute path of a library jar under `libraries_dir`, or `None` for a
/// malformed coordinate.
pub fn library_path(libraries_dir: &Path, coords: &str) -> Option<PathBuf> {
    maven_to_path(coords).map(|rel| libraries_dir.join(rel))
}

/// Build the classpath string for a launch: the version jar first, then
/// every non-native library that exists on disk. Libraries carrying a
/// native classifier for the current OS feed the natives extractor instead
/// and never appear here. Missing jars are skipped, not fatal.
pub fn build_classpath(
    manifest: &MergedManifest,
    version_jar: &Path,
    libraries_dir: &Path,
) -> String {
    let os_key = current_os_key();
    let mut entries = vec![version_jar.to_string_lossy().to_string()];

    for library in &manifest.libraries {
        if library.native_classifier(os_key).is_some() {
            continue;
        }

        let Some(path) = library_path(libraries_dir, &library.name) else {
            log::warn!("Skipping malformed library coordinate: {}", library.name);
            continue;
        };

        if path.is_file() {
            entries.push(path.to_string_lossy().to_string());
        } else {
            log::debug!("Library jar not on disk, skipping: {:?}", path);
        }
    }

    entries.join(classpath_separator())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::launcher::manifest::Library;
    use std::collections::HashMap;

    fn merged_with(libraries: Vec<Library>) -> MergedManifest {
        MergedManifest {
            id: "test".to_string(),
            inherited_from: None,
            main_class: "Main".to_string(),
            asset_index_id: "test".to_string(),
            version_type: None,
            jvm_args: vec![],
            game_args: vec![],
            libraries,
        }
    }

    #[test]
    fn maven_to_path_simple() {
        let path = maven_to_path("com.google.guava:guava:21.0").unwrap();
        assert_eq!(
            path,
            Path::new("com/google/guava/guava/21.0/guava-21.0.jar")
        );
    }

    #[test]
    fn maven_to_path_with_classifier() {
        let path = maven_to_path("org.lwjgl:lwjgl:3.3.1:natives-windows").unwrap();
        assert_eq!(
            path,
            Path::new("org/lwjgl/lwjgl/3.3.1/lwjgl-3.3.1-natives-windows.jar")
        );
    }

    #[test]
    fn maven_to_path_rejects_short_coordinates() {
        assert!(maven_to_path("broken:coordinate").is_none());
    }

    #[test]
    fn classpath_skips_missing_and_native_libraries() {
        let tmp = tempfile::tempdir().unwrap();
        let libraries_dir = tmp.path();

        // Only lwjgl exists on disk.
        let lwjgl = library_path(libraries_dir, "org.lwjgl:lwjgl:3.3.1").unwrap();
        std::fs::create_dir_all(lwjgl.parent().unwrap()).unwrap();
        std::fs::write(&lwjgl, b"jar").unwrap();

        let mut natives = HashMap::new();
        natives.insert(
            crate::config::current_os_key().to_string(),
            "natives-test".to_string(),
        );

        let manifest = merged_with(vec![
            Library {
                name: "org.lwjgl:lwjgl:3.3.1".to_string(),
                natives: None,
            },
            Library {
                name: "com.example:absent:1.0".to_string(),
                natives: None,
            },
            Library {
                name: "org.lwjgl:lwjgl-glfw:3.3.1".to_string(),
                natives: Some(natives),
            },
        ]);

        let version_jar = tmp.path().join("1.20.1.jar");
        let classpath = build_classpath(&manifest, &version_jar, libraries_dir);

        let entries: Vec<&str> = classpath.split(classpath_separator()).collect();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], version_jar.to_string_lossy());
        assert!(entries[1].contains("lwjgl-3.3.1.jar"));
        assert!(!classpath.contains("absent"));
        assert!(!classpath.contains("glfw"));
    }
}
