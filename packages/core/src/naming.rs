//! Names under which plan artifacts are stored in the repository.

use std::sync::LazyLock;

use regex::Regex;

/// Version-stamped, URL-safe file name for an artifact.
///
/// The stem keeps only `[A-Za-z0-9_+ ]`, then spaces and commas become `_`,
/// and `_V{version}` is inserted before the last extension:
///
/// ```
/// use fedora_deposit::clean_file_name;
///
/// assert_eq!(clean_file_name("My, File #1.pdf", 3).as_deref(), Some("My_File_1_V3.pdf"));
/// ```
///
/// Returns `None` for a blank name; such artifacts are not uploaded.
pub fn clean_file_name(name: &str, version: u32) -> Option<String> {
    if name.trim().is_empty() {
        return None;
    }

    let (stem, extension) = match name.rfind('.') {
        Some(i) if i > 0 => (&name[..i], Some(&name[i + 1..])),
        _ => (name, None),
    };

    let stem = DISALLOWED_RE
        .replace_all(stem, "")
        .replace([' ', ','], "_");

    Some(match extension {
        Some(ext) => format!("{stem}_V{version}.{ext}"),
        None => format!("{stem}_V{version}"),
    })
}

/// Everything outside `[a-zA-Z0-9_+ ]`.
static DISALLOWED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9_+ ]").expect("invalid file name regex"));

// --- tests -------------------------------------------------------------------
