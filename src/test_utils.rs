//! Builders for mock application bundles on disk.

use std::{
    fs::{create_dir_all, write},
    path::{Path, PathBuf},
};

use crate::utils::{get_contents_dir, get_executables_dir, get_resources_dir, set_executable};

/// Path to the absolute `path` relative to the working directory, e.g. `../../tmp/x`
#[cfg(unix)]
pub fn relative_to_cwd(path: &Path) -> PathBuf {
    let cwd = std::env::current_dir().expect("working directory");
    let mut relative: PathBuf = cwd.components().skip(1).map(|_| "..").collect();
    relative.push(path.strip_prefix("/").expect("absolute path"));
    relative
}

pub const MARKER_FRAMEWORK: &str = "Frameworks/Electron Framework.framework";
pub const MARKER_APP_ASAR: &str = "Resources/app.asar";
pub const MARKER_ELECTRON_ASAR: &str = "Resources/electron.asar";

/// Description of a mock `.app` bundle, written to disk with [`MockBundle::create_in`]
#[derive(Debug, Clone)]
pub struct MockBundle {
    name: String,
    declared_executable: Option<String>,
    create_executable: bool,
    icon: Option<String>,
    markers: Vec<&'static str>,
    raw_info_plist: Option<Vec<u8>>,
}

impl MockBundle {
    /// A bundle with an Electron framework, an executable and an icon
    pub fn electron(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            declared_executable: Some(name.to_owned()),
            create_executable: true,
            icon: Some(String::from("electron.icns")),
            markers: vec![MARKER_FRAMEWORK],
            raw_info_plist: None,
        }
    }

    /// A bundle without any Electron markers
    pub fn native(name: &str) -> Self {
        Self {
            markers: Vec::new(),
            ..Self::electron(name)
        }
    }

    pub fn with_markers(mut self, markers: &[&'static str]) -> Self {
        self.markers = markers.to_vec();
        self
    }

    pub fn with_declared_executable(mut self, executable: Option<&str>) -> Self {
        self.declared_executable = executable.map(ToOwned::to_owned);
        self
    }

    pub fn without_executable_file(mut self) -> Self {
        self.create_executable = false;
        self
    }

    pub fn with_icon(mut self, icon: Option<&str>) -> Self {
        self.icon = icon.map(ToOwned::to_owned);
        self
    }

    pub fn with_raw_info_plist(mut self, content: &[u8]) -> Self {
        self.raw_info_plist = Some(content.to_vec());
        self
    }

    fn info_plist(&self) -> Vec<u8> {
        if let Some(raw) = &self.raw_info_plist {
            return raw.clone();
        }

        let mut entries = String::new();
        if let Some(executable) = &self.declared_executable {
            entries.push_str(&format!(
                "\t<key>CFBundleExecutable</key>\n\t<string>{executable}</string>\n"
            ));
        }
        if let Some(icon) = &self.icon {
            // Declared without extension, as many real bundles do
            let icon = icon.trim_end_matches(".icns");
            entries.push_str(&format!(
                "\t<key>CFBundleIconFile</key>\n\t<string>{icon}</string>\n"
            ));
        }

        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<plist version=\"1.0\">\n<dict>\n\t<key>CFBundleName</key>\n\t<string>{}</string>\n{entries}</dict>\n</plist>\n",
            self.name
        )
        .into_bytes()
    }

    /// Writes the bundle to `dir/<name>.app` and returns its path
    pub fn create_in(&self, dir: &Path) -> PathBuf {
        let path_bundle = dir.join(format!("{}.app", self.name));
        let path_contents = get_contents_dir(&path_bundle);

        create_dir_all(get_executables_dir(&path_bundle)).expect("create MacOS dir");
        create_dir_all(get_resources_dir(&path_bundle)).expect("create Resources dir");
        write(path_contents.join("Info.plist"), self.info_plist()).expect("write Info.plist");

        if self.create_executable {
            if let Some(executable) = &self.declared_executable {
                let path_executable = get_executables_dir(&path_bundle).join(executable);
                write(&path_executable, "#!/bin/sh\nexit 0\n").expect("write executable");
                set_executable(&path_executable).expect("chmod executable");
            }
        }

        if let Some(icon) = &self.icon {
            write(get_resources_dir(&path_bundle).join(icon), b"icns").expect("write icon");
        }

        for marker in &self.markers {
            let path_marker = path_contents.join(marker);
            if marker.ends_with(".framework") {
                create_dir_all(path_marker.join("Versions/A")).expect("create framework");
            } else {
                if let Some(parent) = path_marker.parent() {
                    create_dir_all(parent).expect("create marker parent dir");
                }
                write(path_marker, b"asar").expect("write asar");
            }
        }

        path_bundle
    }
}
