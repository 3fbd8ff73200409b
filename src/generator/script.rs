use std::{ffi::OsStr, path::Path};

/// Quotes a value for POSIX `sh` using single quotes.
///
/// Works on raw bytes so paths which are not valid UTF-8 reach the shell unchanged.
pub fn quote_shell(value: impl AsRef<OsStr>) -> Vec<u8> {
    let mut quoted = vec![b'\''];

    for &byte in value.as_ref().as_encoded_bytes() {
        if byte == b'\'' {
            quoted.extend_from_slice(br"'\''");
        } else {
            quoted.push(byte);
        }
    }

    quoted.push(b'\'');
    quoted
}

/// Renders a script which replaces itself with `target`, passing `extra_argument` followed by
/// every argument the script was given. The target's exit code becomes the script's.
pub fn render_launch_script(target: &Path, extra_argument: &str) -> Vec<u8> {
    let mut script = b"#!/bin/sh\nexec ".to_vec();
    script.extend(quote_shell(target));
    script.push(b' ');
    script.extend(quote_shell(extra_argument));
    script.extend_from_slice(b" \"$@\"\n");
    script
}
