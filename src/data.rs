use std::{
    fmt::{self, Display, Formatter},
    path::{Path, PathBuf},
    time::SystemTime,
};

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::config::{BUNDLE_EXTENSION, COMMAND_EXTENSION, LauncherConfig};

/// Data structure which defines all relevant data about a detected application bundle
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ApplicationBundle {
    path: PathBuf,
    name: String,
    executable_path: PathBuf,
    icon_path: Option<PathBuf>,
    is_framework_based: bool,
}

impl ApplicationBundle {
    pub(crate) fn new(
        path: PathBuf,
        name: String,
        executable_path: PathBuf,
        icon_path: Option<PathBuf>,
    ) -> Self {
        Self {
            path,
            name,
            executable_path,
            icon_path,
            is_framework_based: true,
        }
    }

    /// Location of the `.app` directory
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Bundle directory name without the `.app` extension
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The binary declared by the bundle's `CFBundleExecutable`
    pub fn executable_path(&self) -> &Path {
        &self.executable_path
    }

    /// The icon declared by the bundle's `CFBundleIconFile`, if it exists
    pub fn icon_path(&self) -> Option<&Path> {
        self.icon_path.as_deref()
    }

    pub fn is_framework_based(&self) -> bool {
        self.is_framework_based
    }
}

impl Display for ApplicationBundle {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.path.display())
    }
}

/// Result of classifying a single path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// The path is an Electron bundle with a resolvable executable
    Framework(ApplicationBundle),
    /// The path is not an Electron bundle. This is not an error.
    NotApplicable,
}

impl Classification {
    pub fn into_bundle(self) -> Option<ApplicationBundle> {
        match self {
            Classification::Framework(bundle) => Some(bundle),
            Classification::NotApplicable => None,
        }
    }

    pub fn is_framework(&self) -> bool {
        matches!(self, Classification::Framework(_))
    }
}

/// The kind of launcher to generate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum LauncherKind {
    /// A `.app` bundle with an `Info.plist`, launch script and optional icon
    #[default]
    AppBundle,
    /// A single double-clickable `.command` shell script
    CommandScript,
}

impl LauncherKind {
    pub fn extension(self) -> &'static str {
        match self {
            LauncherKind::AppBundle => BUNDLE_EXTENSION,
            LauncherKind::CommandScript => COMMAND_EXTENSION,
        }
    }
}

/// Everything needed to produce a single launcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LauncherSpec {
    pub target_executable_path: PathBuf,
    pub launcher_display_name: String,
    pub output_directory: PathBuf,
    pub extra_argument: String,
    /// Replace an existing launcher at the destination instead of failing
    pub overwrite: bool,
    /// Icon copied into the generated bundle, if it exists
    pub icon_source: Option<PathBuf>,
    pub kind: LauncherKind,
}

impl LauncherSpec {
    pub fn new(
        target_executable_path: impl Into<PathBuf>,
        launcher_display_name: impl Into<String>,
        config: &LauncherConfig,
    ) -> Self {
        Self {
            target_executable_path: target_executable_path.into(),
            launcher_display_name: launcher_display_name.into(),
            output_directory: config.output_directory.clone(),
            extra_argument: config.extra_argument.clone(),
            overwrite: false,
            icon_source: None,
            kind: config.launcher_kind,
        }
    }

    /// Spec for a detected bundle, named and placed according to the given config
    pub fn for_bundle(bundle: &ApplicationBundle, config: &LauncherConfig) -> Self {
        let mut spec = Self::new(
            bundle.executable_path(),
            config.default_display_name(bundle.name()),
            config,
        );
        spec.icon_source = bundle.icon_path().map(Path::to_path_buf);
        spec
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.launcher_display_name = name.into();
        self
    }

    pub fn with_output_directory(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_directory = path.into();
        self
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn with_icon_source(mut self, icon: Option<PathBuf>) -> Self {
        self.icon_source = icon;
        self
    }

    pub fn with_kind(mut self, kind: LauncherKind) -> Self {
        self.kind = kind;
        self
    }
}

/// A launcher written to disk
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct GeneratedLauncher {
    pub path: PathBuf,
    pub created_at: SystemTime,
    /// `CFBundleIdentifier` of the generated bundle. `None` for `.command` scripts.
    pub identifier: Option<String>,
    pub kind: LauncherKind,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn bundle() -> ApplicationBundle {
        ApplicationBundle::new(
            PathBuf::from("/Applications/Slack.app"),
            String::from("Slack"),
            PathBuf::from("/Applications/Slack.app/Contents/MacOS/Slack"),
            Some(PathBuf::from("/Applications/Slack.app/Contents/Resources/slack.icns")),
        )
    }

    #[test]
    fn test_spec_for_bundle() {
        let config = LauncherConfig::default().with_output_directory("/tmp/out");
        let spec = LauncherSpec::for_bundle(&bundle(), &config);

        assert_eq!(
            spec,
            LauncherSpec {
                target_executable_path: PathBuf::from(
                    "/Applications/Slack.app/Contents/MacOS/Slack"
                ),
                launcher_display_name: String::from("Slack with OpenGL"),
                output_directory: PathBuf::from("/tmp/out"),
                extra_argument: String::from("--use-angle=gl"),
                overwrite: false,
                icon_source: Some(PathBuf::from(
                    "/Applications/Slack.app/Contents/Resources/slack.icns"
                )),
                kind: LauncherKind::AppBundle,
            }
        );
    }

    #[test]
    fn test_classification() {
        assert!(Classification::Framework(bundle()).is_framework());
        assert!(Classification::NotApplicable.into_bundle().is_none());
        assert_eq!(
            format!("{}", bundle()),
            "Slack (/Applications/Slack.app)"
        );
    }

    #[test]
    fn test_kind_extension() {
        assert_eq!(LauncherKind::AppBundle.extension(), "app");
        assert_eq!(LauncherKind::CommandScript.extension(), "command");
    }
}
