use regex::Regex;
use std::sync::LazyLock;

static UNSAFE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_.\-]").expect("static regex"));

/// Reduce a client-supplied filename to something safe to put on disk.
///
/// Non-ASCII characters are dropped, path separators become spaces, runs of
/// whitespace collapse to `_`, anything outside `[A-Za-z0-9_.-]` is removed
/// and leading/trailing `.` and `_` are trimmed. The result may be empty.
pub fn secure_filename(name: &str) -> String {
    let ascii: String = name
        .chars()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();
    let joined = ascii.split_whitespace().collect::<Vec<_>>().join("_");
    UNSAFE_CHARS
        .replace_all(&joined, "")
        .trim_matches(|c| c == '.' || c == '_')
        .to_string()
}

/// Lowercased text after the last `.`, if there is a dot.
pub fn extension_of(name: &str) -> Option<String> {
    name.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase())
}

/// True when `name` has an extension on the allow-list.
pub fn is_allowed(name: &str, allowed: &[String]) -> bool {
    extension_of(name).is_some_and(|ext| !ext.is_empty() && allowed.iter().any(|a| *a == ext))
}

/// Sanitized name that still ends in `.ext`; names that sanitize away to
/// nothing become `upload.<ext>`.
pub fn stored_filename(original: &str, ext: &str) -> String {
    let cleaned = secure_filename(original);
    if cleaned.is_empty() {
        return format!("upload.{ext}");
    }
    match extension_of(&cleaned) {
        Some(found) if found == ext => cleaned,
        _ => format!("{cleaned}.{ext}"),
    }
}
