/// Launch orchestration and process spawning
use crate::config::LauncherConfig;
use crate::error::{LaunchError, Result};
use crate::launcher::arguments::{build_command, LaunchCommand};
use crate::launcher::classpath::build_classpath;
use crate::launcher::java::find_java;
use crate::launcher::natives::extract_natives;
use crate::launcher::resolve::resolve;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// How long to watch a freshly spawned game before declaring it launched.
/// A child that exits inside this window almost certainly crashed during
/// JVM startup, and the exit status is the only diagnostic available.
const CRASH_GRACE_WINDOW: Duration = Duration::from_millis(1500);

/// A successfully started game process.
#[derive(Debug)]
pub struct LaunchedGame {
    pub version_id: String,
    pub pid: u32,

    /// The per-launch natives directory backing this process
    pub natives_dir: PathBuf,

    /// Rendered command line, for logs and diagnostics
    pub command_line: String,
}

/// Launch an installed version: resolve its manifest chain, extract
/// natives, build classpath and command, discover a Java runtime, and
/// spawn the game with the game root as working directory.
///
/// Every fatal error surfaces before the process starts; once spawned, the
/// child is only sampled briefly for an immediate crash and then left to
/// run detached.
pub async fn launch(config: &LauncherConfig, version_id: &str) -> Result<LaunchedGame> {
    log::info!("Launching version {}", version_id);

    let manifest = resolve(&config.versions_dir(), version_id).await?;

    let version_jar = locate_version_jar(config, version_id, manifest.inherited_from.as_deref())?;

    let java_path = find_java()?;

    let natives_dir = config.natives_dir(version_id);
    extract_natives(&manifest, &config.libraries_dir(), &natives_dir).await?;

    let classpath = build_classpath(&manifest, &version_jar, &config.libraries_dir());

    let command = build_command(config, &manifest, version_id, &classpath, &natives_dir);

    spawn_game(&java_path, &command, &config.game_dir, version_id, &natives_dir).await
}

/// The version's own client jar, falling back to the parent's jar for
/// inherited versions that ship only a manifest.
fn locate_version_jar(
    config: &LauncherConfig,
    version_id: &str,
    inherited_from: Option<&str>,
) -> Result<PathBuf> {
    let own = config.version_jar(version_id);
    if own.is_file() {
        return Ok(own);
    }

    if let Some(parent_id) = inherited_from {
        let parent_jar = config.version_jar(parent_id);
        if parent_jar.is_file() {
            log::debug!(
                "No jar for {}, reusing parent jar {:?}",
                version_id,
                parent_jar
            );
            return Ok(parent_jar);
        }
    }

    Err(LaunchError::VersionJarMissing {
        version: version_id.to_string(),
    })
}

/// Spawn the runtime with the assembled argument tokens. Output is not
/// captured and the child is detached from this process; liveness is
/// sampled once after a short grace window to catch immediate crashes.
pub async fn spawn_game(
    java_path: &Path,
    command: &LaunchCommand,
    working_dir: &Path,
    version_id: &str,
    natives_dir: &Path,
) -> Result<LaunchedGame> {
    if !working_dir.is_dir() {
        std::fs::create_dir_all(working_dir)?;
    }

    let command_line = command.to_command_line();
    log::info!("Exec: {:?} {}", java_path, command_line);

    let mut cmd = tokio::process::Command::new(java_path);
    cmd.args(&command.tokens);
    cmd.current_dir(working_dir);

    // Detach so the game survives the launcher exiting.
    #[cfg(windows)]
    {
        const CREATE_NEW_PROCESS_GROUP: u32 = 0x0000_0200;
        cmd.creation_flags(CREATE_NEW_PROCESS_GROUP);
    }

    #[cfg(unix)]
    {
        unsafe {
            cmd.pre_exec(|| {
                libc::setsid();
                Ok(())
            });
        }
    }

    let mut child = cmd.spawn()?;
    let pid = child.id().unwrap_or_default();
    log::info!("Game process started with PID {}", pid);

    tokio::time::sleep(CRASH_GRACE_WINDOW).await;
    if let Some(status) = child.try_wait()? {
        log::error!(
            "Game process for {} exited within the grace window: {}",
            version_id,
            status
        );
        return Err(LaunchError::LaunchCrashed {
            exit_code: status.code(),
        });
    }

    Ok(LaunchedGame {
        version_id: version_id.to_string(),
        pid,
        natives_dir: natives_dir.to_path_buf(),
        command_line,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn immediate_exit_is_reported_as_crash() {
        // A trivially failing "runtime": `false` exits 1 instantly.
        #[cfg(unix)]
        {
            let tmp = tempfile::tempdir().unwrap();
            let command = LaunchCommand { tokens: vec![] };
            let natives = tmp.path().join("natives");
            let err = spawn_game(Path::new("/bin/false"), &command, tmp.path(), "test", &natives)
                .await
                .unwrap_err();
            assert!(matches!(
                err,
                LaunchError::LaunchCrashed { exit_code: Some(1) }
            ));
        }
    }

    #[tokio::test]
    async fn long_lived_child_counts_as_launched() {
        #[cfg(unix)]
        {
            let tmp = tempfile::tempdir().unwrap();
            let command = LaunchCommand {
                tokens: vec!["5".to_string()],
            };
            let natives = tmp.path().join("natives");
            let launched = spawn_game(Path::new("/bin/sleep"), &command, tmp.path(), "test", &natives)
                .await
                .unwrap();
            assert!(launched.pid > 0);
            assert_eq!(launched.command_line, "5");
            assert_eq!(launched.natives_dir, natives);
        }
    }

    #[test]
    fn missing_jar_without_parent_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let config = LauncherConfig::offline(tmp.path().to_path_buf());
        let err = locate_version_jar(&config, "1.20.1", None).unwrap_err();
        assert!(matches!(err, LaunchError::VersionJarMissing { .. }));
    }

    #[test]
    fn inherited_version_reuses_parent_jar() {
        let tmp = tempfile::tempdir().unwrap();
        let config = LauncherConfig::offline(tmp.path().to_path_buf());

        let parent_jar = config.version_jar("1.0");
        std::fs::create_dir_all(parent_jar.parent().unwrap()).unwrap();
        std::fs::write(&parent_jar, b"jar").unwrap();

        let jar = locate_version_jar(&config, "1.0-modded", Some("1.0")).unwrap();
        assert_eq!(jar, parent_jar);
    }
}
