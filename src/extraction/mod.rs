//! Financial document text extraction
//!
//! Opens a PDF, pulls each page's plain text in page order, and normalizes
//! the result into a single string with every run of consecutive newlines
//! collapsed. The public entry point is deliberately fail-soft: any failure
//! (missing file, corrupt document, extraction error) comes back as a
//! human-readable string embedding the path and the cause, never as an error.
//! Downstream stages treat an error-shaped string as "no usable financial
//! data" instead of crashing.

use std::path::Path;

use crate::error::{Error, Result};

/// Read a financial document and return its normalized text
///
/// Opens its own handle per call and retains nothing, so concurrent calls
/// from independent pipeline runs are safe.
pub fn read_document(path: impl AsRef<Path>) -> String {
    let path = path.as_ref();
    match extract_pages(path) {
        Ok(pages) => normalize_pages(pages),
        Err(e) => {
            let cause = match &e {
                Error::Extraction { message, .. } => message.clone(),
                other => other.to_string(),
            };
            tracing::warn!(path = %path.display(), %cause, "document extraction failed");
            format!("Error reading PDF {}: {}", path.display(), cause)
        }
    }
}

/// Extract per-page text from a PDF on disk, in page order
fn extract_pages(path: &Path) -> Result<Vec<String>> {
    let data = std::fs::read(path)?;

    let doc = match lopdf::Document::load_mem(&data) {
        Ok(doc) => doc,
        Err(e) => {
            // Not a PDF lopdf can open; try the whole-document extractor
            // before giving up, treating its output as a single page.
            tracing::debug!(path = %path.display(), error = %e, "lopdf load failed, trying pdf-extract");
            return extract_whole(path, &data, &e.to_string());
        }
    };

    // get_pages is keyed by 1-indexed page number, already in page order
    let page_map = doc.get_pages();
    let mut pages = Vec::with_capacity(page_map.len());
    for (&page_number, _) in page_map.iter() {
        let text = doc
            .extract_text(&[page_number])
            .map_err(|e| Error::extraction(path.display().to_string(), e.to_string()))?;
        pages.push(text);
    }

    if pages.iter().all(|p| p.trim().is_empty()) && !pages.is_empty() {
        // Pages exist but none yielded text (image-based or unusual fonts);
        // the whole-document extractor sometimes does better.
        if let Ok(fallback) = extract_whole(path, &data, "no per-page text") {
            if fallback.iter().any(|p| !p.trim().is_empty()) {
                return Ok(fallback);
            }
        }
    }

    Ok(pages)
}

/// Whole-document fallback via pdf-extract; yields a single pseudo-page
fn extract_whole(path: &Path, data: &[u8], primary_error: &str) -> Result<Vec<String>> {
    match pdf_extract::extract_text_from_mem(data) {
        Ok(text) => Ok(vec![text]),
        Err(e) => Err(Error::extraction(
            path.display().to_string(),
            format!("{} ({})", primary_error, e),
        )),
    }
}

/// Join per-page text into the normalized document string
///
/// Each page's text has runs of consecutive newlines collapsed to one, then
/// gets exactly one trailing newline. A zero-page document yields the empty
/// string. The output never contains two consecutive newline characters.
pub fn normalize_pages<I, S>(pages: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut report = String::new();
    for page in pages {
        let cleaned = collapse_newlines(page.as_ref());
        report.push_str(cleaned.trim_end_matches('\n'));
        report.push('\n');
    }
    // A page whose cleaned text starts with a newline (or is entirely empty)
    // would otherwise collide with the previous page's separator.
    collapse_newlines(&report)
}

/// Collapse every run of two-or-more consecutive newlines to a single newline
///
/// Idempotent: running it on already-collapsed text changes nothing.
fn collapse_newlines(text: &str) -> String {
    let mut content = text.to_string();
    while content.contains("\n\n") {
        content = content.replace("\n\n", "\n");
    }
    content
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn collapse_removes_all_double_newlines() {
        let collapsed = collapse_newlines("a\n\n\n\nb\n\nc");
        assert_eq!(collapsed, "a\nb\nc");
        assert!(!collapsed.contains("\n\n"));
    }

    #[test]
    fn collapse_is_idempotent() {
        let once = collapse_newlines("x\n\n\ny\n\nz\n");
        let twice = collapse_newlines(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn normalize_two_page_scenario() {
        let pages = ["Revenue\n\n\nUp 10%", "Risks\n\nNone major"];
        assert_eq!(normalize_pages(pages), "Revenue\nUp 10%\nRisks\nNone major\n");
    }

    #[test]
    fn normalize_zero_pages_is_empty() {
        let pages: Vec<String> = Vec::new();
        assert_eq!(normalize_pages(pages), "");
    }

    #[test]
    fn normalize_never_emits_double_newlines() {
        let pages = ["first\n\n", "\n\nsecond\n\n\nthird\n", "fourth"];
        let report = normalize_pages(pages);
        assert!(!report.contains("\n\n"), "got: {report:?}");
        assert!(report.ends_with('\n'));
        assert_eq!(report, "first\nsecond\nthird\nfourth\n");
    }

    #[test]
    fn leading_newline_pages_do_not_stack_separators() {
        // A page opening with newlines must not collide with the previous
        // page's separator.
        let report = normalize_pages(["alpha", "\nbeta"]);
        assert_eq!(report, "alpha\nbeta\n");
    }

    #[test]
    fn empty_pages_do_not_stack_separators() {
        let report = normalize_pages(["alpha", "", "\n\n", "beta"]);
        assert!(!report.contains("\n\n"), "got: {report:?}");
        assert_eq!(report, "alpha\nbeta\n");
    }

    #[test]
    fn normalize_keeps_clean_pages_newline_terminated() {
        let pages = ["alpha", "beta"];
        assert_eq!(normalize_pages(pages), "alpha\nbeta\n");
    }

    #[test]
    fn missing_path_yields_error_string_with_path() {
        let report = read_document("missing.pdf");
        assert!(report.starts_with("Error reading PDF missing.pdf: "));
        let cause = report.trim_start_matches("Error reading PDF missing.pdf: ");
        assert!(!cause.is_empty());
    }

    #[test]
    fn corrupt_file_yields_error_string_with_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"this is definitely not a pdf").unwrap();

        let path = file.path().to_path_buf();
        let report = read_document(&path);
        assert!(report.starts_with(&format!("Error reading PDF {}: ", path.display())));
    }
}
