/// End-to-end pipeline over a fabricated game directory: resolve, extract
/// natives, build the classpath, assemble the command
use anvil_core::config::{classpath_separator, native_library_extension, LauncherConfig};
use anvil_core::launcher::arguments::build_command;
use anvil_core::launcher::classpath::build_classpath;
use anvil_core::launcher::natives::extract_natives;
use anvil_core::launcher::resolve::resolve;
use std::io::Write;
use std::path::Path;
use tempfile::TempDir;
use zip::write::FileOptions;
use zip::ZipWriter;

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn current_natives_key() -> &'static str {
    if cfg!(target_os = "windows") {
        "natives-windows"
    } else if cfg!(target_os = "macos") {
        "natives-macos"
    } else {
        "natives-linux"
    }
}

/// A native jar holding one shared library plus archive noise that must
/// not be extracted.
fn write_native_jar(path: &Path) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    let file = std::fs::File::create(path).unwrap();
    let mut archive = ZipWriter::new(file);

    let lib_entry = format!("linux/x64/org/lwjgl/liblwjgl{}", native_library_extension());
    archive
        .start_file::<&str, ()>(&lib_entry, FileOptions::default())
        .unwrap();
    archive.write_all(b"\x7fELF-not-really").unwrap();

    archive
        .start_file::<&str, ()>("META-INF/MANIFEST.MF", FileOptions::default())
        .unwrap();
    archive.write_all(b"Manifest-Version: 1.0\n").unwrap();

    archive.finish().unwrap();
}

fn write_plain_jar(path: &Path) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, b"PK\x03\x04").unwrap();
}

async fn fabricate_game_dir(tmp: &TempDir) -> LauncherConfig {
    init_logs();
    let config = LauncherConfig::offline(tmp.path().to_path_buf());

    let version_dir = config.version_dir("test-1.0");
    tokio::fs::create_dir_all(&version_dir).await.unwrap();
    tokio::fs::write(
        version_dir.join("test-1.0.json"),
        r#"{
            "id": "test-1.0",
            "mainClass": "net.minecraft.client.main.Main",
            "type": "release",
            "assetIndex": { "id": "5" },
            "arguments": {
                "jvm": ["-Dlog4j2.formatMsgNoLookups=true"],
                "game": ["--username", "${auth_player_name}", "--gameDir", "${game_directory}"]
            },
            "libraries": [
                { "name": "com.mojang:brigadier:1.1.8" },
                { "name": "com.example:absent:9.9" },
                {
                    "name": "org.lwjgl:lwjgl:3.3.2",
                    "natives": { "linux": "natives-linux", "osx": "natives-macos", "windows": "natives-windows" }
                }
            ]
        }"#,
    )
    .await
    .unwrap();
    tokio::fs::write(version_dir.join("test-1.0.jar"), b"PK\x03\x04")
        .await
        .unwrap();

    let libraries = config.libraries_dir();
    write_plain_jar(&libraries.join("com/mojang/brigadier/1.1.8/brigadier-1.1.8.jar"));
    write_native_jar(&libraries.join(format!(
        "org/lwjgl/lwjgl/3.3.2/lwjgl-3.3.2-{}.jar",
        current_natives_key()
    )));

    config
}

#[tokio::test]
async fn natives_are_extracted_flattened_and_filtered() {
    let tmp = TempDir::new().unwrap();
    let config = fabricate_game_dir(&tmp).await;

    let manifest = resolve(&config.versions_dir(), "test-1.0").await.unwrap();
    let natives_dir = config.natives_dir("test-1.0");
    extract_natives(&manifest, &config.libraries_dir(), &natives_dir)
        .await
        .unwrap();

    let lib_name = format!("liblwjgl{}", native_library_extension());
    assert!(natives_dir.join(&lib_name).is_file(), "missing {}", lib_name);
    assert!(!natives_dir.join("MANIFEST.MF").exists());
    assert!(!natives_dir.join("META-INF").exists());

    // Every launch gets a fresh directory name.
    assert_ne!(config.natives_dir("test-1.0"), config.natives_dir("test-1.0"));
}

#[tokio::test]
async fn classpath_has_version_jar_first_and_skips_native_and_missing() {
    let tmp = TempDir::new().unwrap();
    let config = fabricate_game_dir(&tmp).await;

    let manifest = resolve(&config.versions_dir(), "test-1.0").await.unwrap();
    let classpath = build_classpath(
        &manifest,
        &config.version_jar("test-1.0"),
        &config.libraries_dir(),
    );

    let entries: Vec<&str> = classpath.split(classpath_separator()).collect();
    assert_eq!(entries.len(), 2);
    assert!(entries[0].ends_with("test-1.0.jar"));
    assert!(entries[1].ends_with("brigadier-1.1.8.jar"));
    assert!(!classpath.contains("lwjgl"));
    assert!(!classpath.contains("absent"));
}

#[tokio::test]
async fn command_is_fully_assembled_and_substituted() {
    let tmp = TempDir::new().unwrap();
    let mut config = fabricate_game_dir(&tmp).await;
    config.player_name = "Steve".to_string();

    let manifest = resolve(&config.versions_dir(), "test-1.0").await.unwrap();
    let natives_dir = config.natives_dir("test-1.0");
    extract_natives(&manifest, &config.libraries_dir(), &natives_dir)
        .await
        .unwrap();
    let classpath = build_classpath(
        &manifest,
        &config.version_jar("test-1.0"),
        &config.libraries_dir(),
    );

    let command = build_command(&config, &manifest, "test-1.0", &classpath, &natives_dir);
    let tokens = &command.tokens;

    // Heap policy opens the command.
    assert_eq!(tokens[0], "-Xms2G");
    assert_eq!(tokens[1], "-Xmx4G");

    assert!(tokens
        .iter()
        .any(|t| t.starts_with("-Djava.library.path=")));
    assert!(tokens.contains(&"-Dlog4j2.formatMsgNoLookups=true".to_string()));

    let cp_flag = tokens.iter().position(|t| t == "-cp").unwrap();
    assert_eq!(tokens[cp_flag + 1], classpath);

    let main = tokens
        .iter()
        .position(|t| t == "net.minecraft.client.main.Main")
        .unwrap();
    assert!(main > cp_flag + 1);

    // Game arguments follow the main class, with placeholders resolved.
    let username_flag = tokens.iter().position(|t| t == "--username").unwrap();
    assert!(username_flag > main);
    assert_eq!(tokens[username_flag + 1], "Steve");
    assert!(!command.to_command_line().contains("${"));
}

#[tokio::test]
async fn classpath_with_spaces_is_quoted_after_cp_flag() {
    let tmp = TempDir::new().unwrap();
    let game_dir = tmp.path().join("My Games").join(".minecraft");
    let config = LauncherConfig::offline(game_dir);

    let version_dir = config.version_dir("v");
    tokio::fs::create_dir_all(&version_dir).await.unwrap();
    tokio::fs::write(
        version_dir.join("v.json"),
        r#"{ "id": "v", "mainClass": "Main" }"#,
    )
    .await
    .unwrap();

    let manifest = resolve(&config.versions_dir(), "v").await.unwrap();
    let classpath = build_classpath(&manifest, &config.version_jar("v"), &config.libraries_dir());
    assert!(classpath.contains(' '));

    let command = build_command(
        &config,
        &manifest,
        "v",
        &classpath,
        &config.natives_dir("v"),
    );
    let line = command.to_command_line();
    assert!(line.contains(&format!("-cp \"{}\"", classpath)));
}
