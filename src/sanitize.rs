//! Filename sanitizing and client-facing name composition

use crate::types::FormatKind;
use regex::Regex;
use std::sync::LazyLock;

/// Bracketed or parenthesized groups, shortest match
#[allow(clippy::unwrap_used)]
static BRACKETED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\(\[].*?[\)\]]").unwrap());

/// Characters rejected by common filesystems
#[allow(clippy::unwrap_used)]
static FORBIDDEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"[\\/*?:"<>|]"#).unwrap());

/// Name used when title and artist both sanitize to nothing
const FALLBACK_NAME: &str = "download";

/// Make a free-text label safe to use as a filename
///
/// Removes `(...)` and `[...]` groups, then the characters `\ / * ? : " < > |`,
/// then trims surrounding whitespace.
///
/// # Examples
///
/// ```
/// use media_jobs::sanitize::sanitize;
///
/// assert_eq!(sanitize("Song (Official Video) [HD]"), "Song");
/// assert_eq!(sanitize("AC/DC: Live?"), "ACDC Live");
/// ```
pub fn sanitize(label: &str) -> String {
    let without_groups = BRACKETED.replace_all(label, "");
    let cleaned = FORBIDDEN.replace_all(&without_groups, "");
    cleaned.trim().to_string()
}

/// Compose the client-facing base name from caller-supplied title and artist
///
/// Produces `"{artist} - {title}"` unless the sanitized title already starts
/// with the sanitized artist (ignoring case), in which case the title alone is
/// used.
pub fn presented_name(title: &str, artist: &str) -> String {
    let title = sanitize(title);
    let artist = sanitize(artist);

    if title.to_lowercase().starts_with(&artist.to_lowercase()) {
        title
    } else if title.is_empty() {
        artist
    } else {
        format!("{artist} - {title}")
    }
}

/// Client-facing filename including the extension for `format`
pub fn presented_filename(title: &str, artist: &str, format: FormatKind) -> String {
    let name = presented_name(title, artist);
    let name = if name.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        name
    };
    format!("{name}.{}", format.extension())
}
