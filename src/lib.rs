pub mod api;
pub mod config;
pub mod error;
pub mod launcher;

// Re-export commonly used types
pub use api::{ModrinthClient, SearchQuery};
pub use config::LauncherConfig;
pub use error::{LaunchError, Result};
pub use launcher::{launch, list_installed_versions, resolve, LaunchedGame, MergedManifest};
