/// Characters replaced with `-` when turning a display name into a file name
const SUBSTITUTED_CHARS: [char; 3] = ['/', ':', '\\'];

/// Turns a display name into a name usable for a file or directory.
///
/// Path separators and `:` become `-`, control characters are removed, surrounding whitespace
/// and leading dots are trimmed. Returns `None` if nothing but separators, dots and whitespace
/// would remain.
pub fn sanitize_launcher_name(name: impl AsRef<str>) -> Option<String> {
    let substituted: String = name
        .as_ref()
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| if SUBSTITUTED_CHARS.contains(&c) { '-' } else { c })
        .collect();

    let sanitized = substituted
        .trim_start_matches(|c: char| c == '.' || c.is_whitespace())
        .trim_end();

    if sanitized
        .chars()
        .all(|c| c == '-' || c == '.' || c.is_whitespace())
    {
        return None;
    }

    Some(sanitized.to_owned())
}

/// Lowercase ASCII alphanumerics of a name, for use as a bundle identifier component
pub fn get_identifier_slug(name: impl AsRef<str>) -> String {
    let slug: String = name
        .as_ref()
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect();

    if slug.is_empty() {
        String::from("launcher")
    } else {
        slug
    }
}
