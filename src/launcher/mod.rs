/// Launch pipeline: manifest resolution, natives, classpath, command
/// assembly, runtime discovery, and process start
pub mod arguments;
pub mod classpath;
pub mod java;
pub mod manifest;
pub mod natives;
pub mod process;
pub mod resolve;

pub use arguments::{build_command, substitute_placeholders, LaunchCommand};
pub use classpath::{build_classpath, library_path, maven_to_path};
pub use java::find_java;
pub use manifest::{list_installed_versions, load_manifest, Argument, Library, VersionManifest};
pub use natives::extract_natives;
pub use process::{launch, spawn_game, LaunchedGame};
pub use resolve::{merge_manifests, resolve, MergedManifest};
