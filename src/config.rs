/// Launcher configuration and well-known game directory layout
use std::path::{Path, PathBuf};

/// Immutable configuration for a launch attempt. Constructed once by the
/// caller and passed by reference into each pipeline step; nothing in the
/// pipeline mutates it.
#[derive(Debug, Clone)]
pub struct LauncherConfig {
    /// Game root directory (the `.minecraft` folder)
    pub game_dir: PathBuf,

    /// Player username used for `${auth_player_name}`
    pub player_name: String,

    /// Account UUID used for `${auth_uuid}`
    pub uuid: String,

    /// Access token used for `${auth_access_token}`
    pub access_token: String,

    /// User type ("msa" or "legacy")
    pub user_type: String,

    /// Maximum heap size flag (e.g. "-Xmx4G"); `None` uses the default
    pub max_heap: Option<String>,
}

/// Launcher identity reported through `${launcher_name}` / `${launcher_version}`
pub const LAUNCHER_NAME: &str = "AnvilLauncher";
pub const LAUNCHER_VERSION: &str = env!("CARGO_PKG_VERSION");

impl LauncherConfig {
    /// Config for an offline session rooted at `game_dir`.
    pub fn offline(game_dir: PathBuf) -> Self {
        Self {
            game_dir,
            player_name: "Player".to_string(),
            uuid: "00000000-0000-0000-0000-000000000000".to_string(),
            access_token: "0".to_string(),
            user_type: "legacy".to_string(),
            max_heap: None,
        }
    }

    /// Default game root: `.minecraft` under the platform config directory
    /// (`%APPDATA%` on Windows), or under the current directory when no
    /// config directory is known.
    pub fn default_game_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".minecraft")
    }

    /// Whether the game root exists on disk.
    pub fn game_dir_exists(&self) -> bool {
        self.game_dir.is_dir()
    }

    pub fn versions_dir(&self) -> PathBuf {
        self.game_dir.join("versions")
    }

    pub fn libraries_dir(&self) -> PathBuf {
        self.game_dir.join("libraries")
    }

    pub fn assets_dir(&self) -> PathBuf {
        self.game_dir.join("assets")
    }

    pub fn mods_dir(&self) -> PathBuf {
        self.game_dir.join("mods")
    }

    pub fn resourcepacks_dir(&self) -> PathBuf {
        self.game_dir.join("resourcepacks")
    }

    pub fn shaderpacks_dir(&self) -> PathBuf {
        self.game_dir.join("shaderpacks")
    }

    /// Directory holding a version's manifest and jar.
    pub fn version_dir(&self, version_id: &str) -> PathBuf {
        self.versions_dir().join(version_id)
    }

    /// Path of the version's client jar (may not exist; inherited versions
    /// often ship only a manifest and reuse the parent's jar).
    pub fn version_jar(&self, version_id: &str) -> PathBuf {
        self.version_dir(version_id)
            .join(format!("{}.jar", version_id))
    }

    /// A unique natives directory for one launch of `version_id`. Each
    /// launch gets its own directory so two concurrent launches of the same
    /// version never race on extraction.
    pub fn natives_dir(&self, version_id: &str) -> PathBuf {
        self.version_dir(version_id).join(format!(
            "{}-natives-{}",
            version_id,
            uuid::Uuid::new_v4().simple()
        ))
    }
}

/// Join classpath entries with the platform path-list separator.
pub fn classpath_separator() -> &'static str {
    if cfg!(windows) {
        ";"
    } else {
        ":"
    }
}

/// OS key used by manifest `natives` maps and library rules.
pub fn current_os_key() -> &'static str {
    if cfg!(target_os = "windows") {
        "windows"
    } else if cfg!(target_os = "macos") {
        "osx"
    } else {
        "linux"
    }
}

/// File extension of platform shared libraries inside native jars.
pub fn native_library_extension() -> &'static str {
    if cfg!(target_os = "windows") {
        ".dll"
    } else if cfg!(target_os = "macos") {
        ".dylib"
    } else {
        ".so"
    }
}

/// Canonicalize a directory for use in substituted argument values, falling
/// back to the plain path when the directory does not exist yet.
pub fn canonical_display(path: &Path) -> String {
    dunce::canonicalize(path)
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|_| path.to_string_lossy().to_string())
}
