/// Inheritance chain resolution for version manifests
use crate::error::{LaunchError, Result};
use crate::launcher::manifest::{load_manifest, Argument, Library, VersionManifest};
use std::path::Path;

/// Fully resolved snapshot of a version's inheritance chain. Built once per
/// launch request and never mutated afterwards; every later pipeline stage
/// reads from it.
#[derive(Debug, Clone)]
pub struct MergedManifest {
    /// Id of the requested (leaf) version
    pub id: String,

    /// Immediate parent of the requested version, when it declared one.
    /// Kept because inherited versions often reuse the parent's client jar.
    pub inherited_from: Option<String>,

    /// Resolved main class; empty when no manifest on the chain supplied one
    pub main_class: String,

    /// Asset index id after the fallback chain
    /// (child's, else parent's, else `inheritsFrom`, else the version id)
    pub asset_index_id: String,

    /// Version type, child taking precedence ("release" when absent)
    pub version_type: Option<String>,

    /// Parent JVM tokens first, child tokens appended
    pub jvm_args: Vec<Argument>,

    /// Parent game tokens first, child tokens appended
    pub game_args: Vec<Argument>,

    /// Child libraries first so they shadow parent classes on the classpath
    pub libraries: Vec<Library>,
}

/// Resolve `version_id` under `versions_dir`, following `inheritsFrom`
/// recursively and merging each parent underneath its child.
pub async fn resolve(versions_dir: &Path, version_id: &str) -> Result<MergedManifest> {
    let mut chain = Vec::new();
    let manifest = resolve_chain(versions_dir, version_id, &mut chain).await?;
    Ok(finish(manifest, version_id))
}

/// Walk the chain depth-first, merging on the way back up. `chain` holds the
/// ids on the current resolution path so a revisited id is rejected instead
/// of recursing forever.
async fn resolve_chain(
    versions_dir: &Path,
    version_id: &str,
    chain: &mut Vec<String>,
) -> Result<VersionManifest> {
    if chain.iter().any(|id| id == version_id) {
        chain.push(version_id.to_string());
        return Err(LaunchError::CyclicInheritance {
            version: version_id.to_string(),
            chain: chain.join(" -> "),
        });
    }
    chain.push(version_id.to_string());

    let child = load_manifest(versions_dir, version_id).await?;

    let merged = match child.inherits_from.clone() {
        Some(parent_id) => {
            log::debug!("Version {} inherits from {}", version_id, parent_id);
            let parent = Box::pin(resolve_chain(versions_dir, &parent_id, chain)).await?;
            merge_manifests(&parent, &child)
        }
        None => child,
    };

    chain.pop();
    Ok(merged)
}

/// Merge a child manifest over its resolved parent, returning a new record.
/// Neither input is modified.
pub fn merge_manifests(parent: &VersionManifest, child: &VersionManifest) -> VersionManifest {
    let main_class = match child.main_class.as_deref() {
        Some(mc) if !mc.is_empty() => child.main_class.clone(),
        _ => parent.main_class.clone(),
    };

    // Parent argument lists come first, child lists appended.
    let arguments = match (parent.arguments.as_ref(), child.arguments.as_ref()) {
        (None, None) => None,
        (parent_args, child_args) => {
            let mut merged = parent_args.cloned().unwrap_or_default();
            if let Some(child_args) = child_args {
                merged.game.extend(child_args.game.iter().cloned());
                merged.jvm.extend(child_args.jvm.iter().cloned());
            }
            Some(merged)
        }
    };

    // Child libraries first: they take load precedence and must shadow
    // parent classes.
    let mut libraries = child.libraries.clone();
    libraries.extend(parent.libraries.iter().cloned());

    VersionManifest {
        id: child.id.clone(),
        inherits_from: child.inherits_from.clone(),
        main_class,
        arguments,
        libraries,
        asset_index: child.asset_index.clone().or_else(|| parent.asset_index.clone()),
        version_type: child.version_type.clone().or_else(|| parent.version_type.clone()),
    }
}

/// Flatten the resolved chain into the read-only launch snapshot.
fn finish(manifest: VersionManifest, requested_id: &str) -> MergedManifest {
    let asset_index_id = manifest
        .asset_index
        .as_ref()
        .map(|index| index.id.clone())
        .or_else(|| manifest.inherits_from.clone())
        .unwrap_or_else(|| requested_id.to_string());

    let (game_args, jvm_args) = manifest
        .arguments
        .map(|args| (args.game, args.jvm))
        .unwrap_or_default();

    MergedManifest {
        id: manifest.id,
        inherited_from: manifest.inherits_from,
        main_class: manifest.main_class.unwrap_or_default(),
        asset_index_id,
        version_type: manifest.version_type,
        jvm_args,
        game_args,
        libraries: manifest.libraries,
    }
}
