//! Local filename derivation for downloaded visuals.

/// Extension given to every downloaded visual package.
pub const VISUAL_EXTENSION: &str = "pbiviz";

/// Strips every non-word character from `title`.
///
/// Word characters are Unicode letters and digits plus `_`; everything else
/// (spaces, punctuation, symbols) is dropped without a replacement.
pub fn sanitize_title(title: &str) -> String {
    title
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .collect()
}

/// File name a visual titled `title` is saved under.
///
/// Distinct titles may map to the same name; the later download then
/// overwrites the earlier file.
pub fn destination_file_name(title: &str) -> String {
    format!("{}.{}", sanitize_title(title), VISUAL_EXTENSION)
}
