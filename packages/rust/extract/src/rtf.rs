//! Minimal RTF to plain text conversion.
//!
//! Walks the token stream directly: control words map to newlines or get
//! dropped, destination groups (`{\*...}`, font tables, stylesheets) are
//! skipped wholesale, and `\'hh` escapes decode as Latin-1 bytes.

/// Destinations whose entire group carries no document text.
const SKIP_DESTINATIONS: &[&str] = &[
    "fonttbl",
    "colortbl",
    "stylesheet",
    "info",
    "pict",
    "header",
    "footer",
    "generator",
];

/// Strip RTF control structure from `input`, returning the plain text.
pub fn strip_rtf(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = String::with_capacity(input.len() / 2);
    let mut i = 0;
    // Group-nesting depth below which we are inside a skipped destination.
    let mut skip_until_depth: Option<usize> = None;
    let mut depth: usize = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'{' => {
                depth += 1;
                i += 1;
                // `{\*` starts an optional destination we don't understand.
                if skip_until_depth.is_none() && bytes.get(i) == Some(&b'\\') && bytes.get(i + 1) == Some(&b'*') {
                    skip_until_depth = Some(depth);
                    i += 2;
                }
            }
            b'}' => {
                if skip_until_depth == Some(depth) {
                    skip_until_depth = None;
                }
                depth = depth.saturating_sub(1);
                i += 1;
            }
            b'\\' => {
                i += 1;
                match bytes.get(i) {
                    Some(b'\'') => {
                        // Hex escape: two hex digits, Latin-1.
                        let hex = input.get(i + 1..i + 3).unwrap_or("");
                        if let Ok(byte) = u8::from_str_radix(hex, 16) {
                            if skip_until_depth.is_none() {
                                out.push(byte as char);
                            }
                            i += 3;
                        } else {
                            i += 1;
                        }
                    }
                    Some(&(c @ (b'\\' | b'{' | b'}'))) => {
                        if skip_until_depth.is_none() {
                            out.push(c as char);
                        }
                        i += 1;
                    }
                    Some(b'~') => {
                        if skip_until_depth.is_none() {
                            out.push(' ');
                        }
                        i += 1;
                    }
                    Some(c) if c.is_ascii_alphabetic() => {
                        let start = i;
                        while i < bytes.len() && bytes[i].is_ascii_alphabetic() {
                            i += 1;
                        }
                        let word = &input[start..i];
                        // Optional signed numeric parameter.
                        if bytes.get(i) == Some(&b'-') {
                            i += 1;
                        }
                        while i < bytes.len() && bytes[i].is_ascii_digit() {
                            i += 1;
                        }
                        // A single space after a control word is a delimiter.
                        if bytes.get(i) == Some(&b' ') {
                            i += 1;
                        }
                        if skip_until_depth.is_none() {
                            if SKIP_DESTINATIONS.contains(&word) {
                                skip_until_depth = Some(depth);
                            } else {
                                match word {
                                    "par" | "line" | "sect" | "page" => out.push('\n'),
                                    "tab" | "cell" => out.push(' '),
                                    _ => {}
                                }
                            }
                        }
                        continue;
                    }
                    _ => {
                        // Lone backslash or unrecognized escape.
                        i += 1;
                    }
                }
            }
            b'\r' | b'\n' => {
                // Raw line breaks in RTF source are not document text.
                i += 1;
            }
            c => {
                if skip_until_depth.is_none() {
                    out.push(c as char);
                }
                i += 1;
            }
        }
    }

    out
}
