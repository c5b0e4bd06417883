//! Local file naming for stored artifacts

/// File name of an edition's metadata document
pub fn metadata_file_name(edition: u64) -> String {
    format!("{}.json", edition)
}

/// Extension of the file an image locator points at, if it has one
///
/// Only the final path segment is considered, so the dot in a scheme or
/// host never produces an extension.
pub fn image_extension(image_locator: &str) -> Option<&str> {
    let last_segment = image_locator.rsplit('/').next().unwrap_or(image_locator);
    let idx = last_segment.rfind('.')?;
    let ext = &last_segment[idx + 1..];
    (!ext.is_empty()).then_some(ext)
}

/// File name of an image, keyed by the metadata's declared name
///
/// Path separators in the name are replaced so the file always lands in the
/// images directory.
pub fn image_file_name(name: &str, image_locator: &str) -> String {
    let base: String = name
        .chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect();

    match image_extension(image_locator) {
        Some(ext) => format!("{}.{}", base, ext),
        None => base,
    }
}
