use std::path::Path;

use crate::{error::LauncherResult, parsers::escape_xml, utils::get_identifier_slug};

/// Number of hex characters of the BLAKE3 hash kept in generated identifiers
const IDENTIFIER_HASH_LENGTH: usize = 12;

/// Metadata describing a generated launcher bundle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleMetadata {
    pub display_name: String,
    /// File name of the launch script within `Contents/MacOS`
    pub executable_name: String,
    pub identifier: String,
    pub version: String,
    /// File name of the icon within `Contents/Resources`
    pub icon_file: Option<String>,
}

impl BundleMetadata {
    /// Key-value pairs in the order they are written, using the macOS bundle key names
    pub fn entries(&self) -> Vec<(&'static str, &str)> {
        let mut entries = vec![("CFBundleExecutable", self.executable_name.as_str())];

        if let Some(icon_file) = &self.icon_file {
            entries.push(("CFBundleIconFile", icon_file.as_str()));
        }

        entries.extend([
            ("CFBundleIdentifier", self.identifier.as_str()),
            ("CFBundleName", self.display_name.as_str()),
            ("CFBundleDisplayName", self.display_name.as_str()),
            ("CFBundlePackageType", "APPL"),
            ("CFBundleVersion", self.version.as_str()),
            ("CFBundleShortVersionString", self.version.as_str()),
        ]);

        entries
    }
}

/// Turns [`BundleMetadata`] into the contents of a metadata file
pub trait MetadataSerializer {
    /// Name of the file written to the bundle's `Contents` directory
    fn file_name(&self) -> &str;

    fn serialize(&self, metadata: &BundleMetadata) -> LauncherResult<Vec<u8>>;
}

/// Writes metadata as an XML `Info.plist`
#[derive(Debug, Default, Clone, Copy)]
pub struct PlistSerializer;

const PLIST_HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
"#;

const PLIST_FOOTER: &str = "</dict>\n</plist>\n";

impl MetadataSerializer for PlistSerializer {
    fn file_name(&self) -> &str {
        "Info.plist"
    }

    fn serialize(&self, metadata: &BundleMetadata) -> LauncherResult<Vec<u8>> {
        let mut content = String::from(PLIST_HEADER);

        for (key, value) in metadata.entries() {
            content.push_str(&format!(
                "\t<key>{key}</key>\n\t<string>{}</string>\n",
                escape_xml(value)
            ));
        }

        content.push_str(PLIST_FOOTER);

        Ok(content.into_bytes())
    }
}

/// Generates a bundle identifier which is stable for a given launcher name and target.
///
/// e.g. `com.user.slackwithopengl.3c1f0e9a2b7d`
pub fn generate_identifier(prefix: &str, sanitized_name: &str, target: &Path) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(sanitized_name.as_bytes());
    hasher.update(&[0]);
    hasher.update(target.as_os_str().as_encoded_bytes());

    let hash = hasher.finalize().to_hex();

    format!(
        "{prefix}.{}.{}",
        get_identifier_slug(sanitized_name),
        &hash.as_str()[..IDENTIFIER_HASH_LENGTH]
    )
}
