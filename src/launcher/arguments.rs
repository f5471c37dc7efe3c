/// Launch command assembly and placeholder substitution
use crate::config::{canonical_display, LauncherConfig, LAUNCHER_NAME, LAUNCHER_VERSION};
use crate::launcher::manifest::Argument;
use crate::launcher::resolve::MergedManifest;
use std::collections::HashMap;
use std::path::Path;

/// Assembled launch command. `tokens` is the argv the process launcher
/// feeds to the runtime; `to_command_line` renders the quoted single-string
/// form used for logging and for raw argument-line invocation.
#[derive(Debug, Clone)]
pub struct LaunchCommand {
    pub tokens: Vec<String>,
}

impl LaunchCommand {
    /// Join all tokens with single spaces, double-quoting any token that
    /// contains a space and is not already quoted. The token after a `-cp`
    /// flag is quoted instead of the flag itself, so a classpath with
    /// spaces stays one argument.
    pub fn to_command_line(&self) -> String {
        let mut quoted = self.tokens.clone();
        let mut i = 0;
        while i < quoted.len() {
            if quoted[i] == "-cp" && i + 1 < quoted.len() {
                quoted[i + 1] = quote(&quoted[i + 1]);
                i += 2;
                continue;
            }
            if quoted[i].contains(' ') {
                quoted[i] = quote(&quoted[i]);
            }
            i += 1;
        }
        quoted.join(" ")
    }
}

fn quote(token: &str) -> String {
    if token.starts_with('"') {
        token.to_string()
    } else {
        format!("\"{}\"", token)
    }
}

/// Build the full launch command for a resolved version. Assembly never
/// fails: conditional manifest tokens are skipped rather than evaluated,
/// and unknown placeholders are passed through untouched.
///
/// Token order is fixed: baseline JVM policy flags, the natives library
/// path, the manifest's plain JVM tokens, `-cp` (unless the manifest
/// already supplied a classpath flag), the main class, then the manifest's
/// plain game tokens.
pub fn build_command(
    config: &LauncherConfig,
    manifest: &MergedManifest,
    version_id: &str,
    classpath: &str,
    natives_dir: &Path,
) -> LaunchCommand {
    let vars = placeholder_table(config, manifest, version_id, classpath, natives_dir);
    let mut tokens = baseline_jvm_args(config);

    let jvm_tokens: Vec<String> = plain_tokens(&manifest.jvm_args)
        .map(|t| substitute_placeholders(t, &vars))
        .filter(|t| !t.trim().is_empty())
        .collect();

    // Forge and Fabric manifests usually carry their own library path and
    // classpath flags; only fill the gaps.
    let has_natives_path = jvm_tokens
        .iter()
        .any(|t| t.starts_with("-Djava.library.path="));
    let has_classpath = jvm_tokens
        .iter()
        .any(|t| t == "-cp" || t == "-classpath" || t.starts_with("-cp="));

    if !has_natives_path {
        tokens.push(format!(
            "-Djava.library.path={}",
            canonical_display(natives_dir)
        ));
    }

    tokens.extend(jvm_tokens);

    if !has_classpath {
        tokens.push("-cp".to_string());
        tokens.push(classpath.to_string());
    }

    tokens.push(manifest.main_class.clone());

    tokens.extend(
        plain_tokens(&manifest.game_args)
            .map(|t| substitute_placeholders(t, &vars))
            .filter(|t| !t.trim().is_empty()),
    );

    LaunchCommand { tokens }
}

/// Baseline JVM policy flags. Heap and GC tuning are launcher constants,
/// not manifest-derived; the maximum heap may be overridden per config.
fn baseline_jvm_args(config: &LauncherConfig) -> Vec<String> {
    let max_heap = config.max_heap.clone().unwrap_or_else(|| "-Xmx4G".to_string());
    vec![
        "-Xms2G".to_string(),
        max_heap,
        "-XX:+UseG1GC".to_string(),
        "-XX:+UnlockExperimentalVMOptions".to_string(),
        "-XX:G1NewSizePercent=20".to_string(),
        "-XX:G1ReservePercent=20".to_string(),
        "-XX:MaxGCPauseMillis=50".to_string(),
        "-XX:G1HeapRegionSize=32M".to_string(),
    ]
}

/// Plain string tokens of an argument list; conditional tokens are skipped,
/// not evaluated.
fn plain_tokens(args: &[Argument]) -> impl Iterator<Item = &str> {
    args.iter().filter_map(|arg| match arg {
        Argument::Plain(s) => Some(s.as_str()),
        Argument::Conditional { .. } => None,
    })
}

/// Replace every known `${name}` placeholder in `token` with its runtime
/// value. Literal find-replace per key; placeholders outside the table are
/// left intact.
pub fn substitute_placeholders(token: &str, vars: &HashMap<&'static str, String>) -> String {
    let mut result = token.to_string();
    for (key, value) in vars {
        let placeholder = format!("${{{}}}", key);
        result = result.replace(&placeholder, value);
    }
    result
}

fn placeholder_table(
    config: &LauncherConfig,
    manifest: &MergedManifest,
    version_id: &str,
    classpath: &str,
    natives_dir: &Path,
) -> HashMap<&'static str, String> {
    let mut vars = HashMap::new();

    vars.insert("auth_player_name", config.player_name.clone());
    vars.insert("auth_uuid", config.uuid.clone());
    vars.insert("auth_access_token", config.access_token.clone());
    vars.insert("user_type", config.user_type.clone());

    vars.insert("version_name", version_id.to_string());
    vars.insert(
        "version_type",
        manifest
            .version_type
            .clone()
            .unwrap_or_else(|| "release".to_string()),
    );
    vars.insert("assets_index_name", manifest.asset_index_id.clone());

    vars.insert("game_directory", canonical_display(&config.game_dir));
    vars.insert("assets_root", canonical_display(&config.assets_dir()));
    vars.insert("natives_directory", canonical_display(natives_dir));

    vars.insert("launcher_name", LAUNCHER_NAME.to_string());
    vars.insert("launcher_version", LAUNCHER_VERSION.to_string());
    vars.insert("classpath", classpath.to_string());

    vars
}
