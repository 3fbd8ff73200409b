use std::{
    fs,
    path::{Path, PathBuf},
};

use electron_launcher::{
    config::LauncherConfig,
    data::{Classification, LauncherKind, LauncherSpec},
    detector::{Detector, classify, scan},
    error::{LauncherError, LauncherResult},
    generator::Generator,
};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

/// Prints each argument on its own line, then exits with a recognisable code
const MOCK_EXECUTABLE: &str = "#!/bin/sh\nprintf '%s\\n' \"$@\"\nexit 3\n";

fn create_bundle(dir: &Path, name: &str, marker: Option<&str>) -> LauncherResult<PathBuf> {
    let path_bundle = dir.join(format!("{name}.app"));
    let contents = path_bundle.join("Contents");
    fs::create_dir_all(contents.join("MacOS"))?;
    fs::create_dir_all(contents.join("Resources"))?;

    fs::write(
        contents.join("Info.plist"),
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<plist version="1.0">
<dict>
	<key>CFBundleExecutable</key>
	<string>{name}</string>
</dict>
</plist>
"#
        ),
    )?;

    let path_executable = contents.join("MacOS").join(name);
    fs::write(&path_executable, MOCK_EXECUTABLE)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&path_executable, fs::Permissions::from_mode(0o755))?;
    }

    if let Some(marker) = marker {
        let path_marker = contents.join(marker);
        if let Some(parent) = path_marker.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path_marker, "")?;
    }

    Ok(path_bundle)
}

#[test]
fn test_scan_and_generate() -> LauncherResult<()> {
    let applications = TempDir::new()?;
    let output = TempDir::new()?;
    create_bundle(applications.path(), "Slack", Some("Resources/app.asar"))?;
    create_bundle(applications.path(), "Notes", None)?;
    fs::write(applications.path().join("README.txt"), "not a bundle")?;

    let config = LauncherConfig::default().with_output_directory(output.path());
    let detector = Detector::new(config.clone());
    let generator = Generator::new(config.clone());

    let bundles = detector
        .scan(Some(applications.path()))?
        .collect::<LauncherResult<Vec<_>>>()?;
    assert_eq!(bundles.len(), 1);
    assert_eq!(bundles[0].name(), "Slack");

    let launcher = generator.generate(&LauncherSpec::for_bundle(&bundles[0], &config))?;

    assert_eq!(launcher.path, output.path().join("Slack with OpenGL.app"));
    assert_eq!(launcher.kind, LauncherKind::AppBundle);
    assert!(launcher.identifier.is_some());
    assert!(launcher.path.join("Contents/Info.plist").is_file());
    assert!(launcher.path.join("Contents/MacOS/Slack with OpenGL").is_file());

    // Original bundle is untouched
    assert_eq!(
        fs::read_to_string(applications.path().join("Slack.app/Contents/MacOS/Slack"))?,
        MOCK_EXECUTABLE
    );

    Ok(())
}

#[cfg(unix)]
#[test]
fn test_generated_launcher_forwards_arguments() -> LauncherResult<()> {
    use std::process::Command;

    let applications = TempDir::new()?;
    let output = TempDir::new()?;
    let path_bundle = create_bundle(
        applications.path(),
        "Visual Studio Code",
        Some("Frameworks/Electron Framework.framework/Versions/A/Electron Framework"),
    )?;

    let config = LauncherConfig::default().with_output_directory(output.path());
    let bundle = Detector::new(config.clone()).resolve_target(&path_bundle)?;
    let launcher = Generator::new(config.clone())
        .generate(&LauncherSpec::for_bundle(&bundle, &config).with_display_name("Code GL"))?;

    let result = Command::new("sh")
        .arg(launcher.path.join("Contents/MacOS/Code GL"))
        .args(["--new-window", "two words"])
        .output()?;

    assert_eq!(result.status.code(), Some(3));
    assert_eq!(
        String::from_utf8_lossy(&result.stdout),
        "--use-angle=gl\n--new-window\ntwo words\n"
    );

    Ok(())
}

#[test]
fn test_command_script_launcher() -> LauncherResult<()> {
    let applications = TempDir::new()?;
    let output = TempDir::new()?;
    let path_bundle = create_bundle(applications.path(), "Discord", Some("Resources/electron.asar"))?;

    let config = LauncherConfig::default()
        .with_output_directory(output.path())
        .with_launcher_kind(LauncherKind::CommandScript);
    let bundle = Detector::new(config.clone()).resolve_target(&path_bundle)?;
    let launcher = Generator::new(config.clone()).generate(&LauncherSpec::for_bundle(&bundle, &config))?;

    assert_eq!(launcher.path, output.path().join("Discord with OpenGL.command"));
    assert_eq!(launcher.identifier, None);
    assert!(fs::read_to_string(&launcher.path)?.contains("'--use-angle=gl' \"$@\""));

    Ok(())
}

#[test]
fn test_existing_launcher() -> LauncherResult<()> {
    let applications = TempDir::new()?;
    let output = TempDir::new()?;
    let path_bundle = create_bundle(applications.path(), "Slack", Some("Resources/app.asar"))?;

    let config = LauncherConfig::default().with_output_directory(output.path());
    let bundle = Detector::new(config.clone()).resolve_target(&path_bundle)?;
    let generator = Generator::new(config.clone());
    let spec = LauncherSpec::for_bundle(&bundle, &config);

    let first = generator.generate(&spec)?;

    let result = generator.generate(&spec);
    assert!(matches!(result, Err(LauncherError::DestinationExists(ref path)) if *path == first.path));
    assert_eq!(result.err().map(|e| e.exit_code()), Some(5));

    let second = generator.generate(&spec.with_overwrite(true))?;
    assert_eq!(second.path, first.path);
    assert_eq!(second.identifier, first.identifier);
    assert_eq!(fs::read_dir(output.path())?.count(), 1);

    Ok(())
}

#[test]
fn test_not_electron() -> LauncherResult<()> {
    let applications = TempDir::new()?;
    let path_bundle = create_bundle(applications.path(), "Notes", None)?;

    assert!(matches!(classify(&path_bundle)?, Classification::NotApplicable));

    let result = Detector::new(LauncherConfig::default()).resolve_target(&path_bundle);
    assert!(matches!(result, Err(LauncherError::NotFrameworkBundle(_))));

    Ok(())
}

#[test]
fn test_scan_empty_and_missing_directories() -> LauncherResult<()> {
    let applications = TempDir::new()?;

    assert_eq!(scan(applications.path())?.count(), 0);

    let missing = applications.path().join("missing");
    assert!(matches!(scan(&missing), Err(LauncherError::DirectoryNotFound(_))));

    Ok(())
}
