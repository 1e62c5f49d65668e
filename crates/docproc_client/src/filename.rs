use crate::types::ArtifactKind;

/// Windows-safe filename for a downloaded artifact.
///
/// Taken from the `Content-Disposition` header when the backend supplies
/// one, else a generated default of the form
/// `processed_document_{plain|summary}.docx`.
pub fn artifact_filename(content_disposition: Option<&str>, kind: ArtifactKind) -> String {
    content_disposition
        .and_then(parse_disposition_filename)
        .map(|name| sanitize_filename(&name))
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| format!("processed_document_{}.docx", kind.path_segment()))
}

/// Extract the `filename=` parameter from a Content-Disposition value.
/// Handles both the quoted and the bare-token form.
fn parse_disposition_filename(value: &str) -> Option<String> {
    for param in value.split(';') {
        let param = param.trim();
        let Some(rest) = param.strip_prefix("filename=") else {
            continue;
        };
        let name = rest.trim().trim_matches('"').trim();
        if !name.is_empty() {
            return Some(name.to_string());
        }
    }
    None
}

fn sanitize_filename(input: &str) -> String {
    let mut cleaned: String = input
        .chars()
        .map(|c| if is_forbidden(c) { '_' } else { c })
        .collect();
    cleaned = cleaned.trim_matches(&['_', ' ', '.'][..]).to_string();
    // Collapse multiple underscores
    let mut compacted = String::with_capacity(cleaned.len());
    let mut prev_underscore = false;
    for c in cleaned.chars() {
        if c == '_' {
            if !prev_underscore {
                compacted.push(c);
            }
            prev_underscore = true;
        } else {
            compacted.push(c);
            prev_underscore = false;
        }
    }
    let mut final_name = compacted;
    if final_name.len() > 120 {
        final_name.truncate(120);
    }
    if is_reserved_windows_name(&final_name) {
        final_name.push('_');
    }
    final_name
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}

fn is_reserved_windows_name(name: &str) -> bool {
    const RESERVED: &[&str] = &[
        "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
        "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
    ];
    let stem = name.split('.').next().unwrap_or(name);
    RESERVED.iter().any(|r| r.eq_ignore_ascii_case(stem))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoted_disposition_filename_wins() {
        let name = artifact_filename(
            Some("attachment; filename=\"lease plain.docx\""),
            ArtifactKind::Plain,
        );
        assert_eq!(name, "lease plain.docx");
    }

    #[test]
    fn bare_token_disposition_is_accepted() {
        let name = artifact_filename(
            Some("attachment; filename=summary.docx"),
            ArtifactKind::Summary,
        );
        assert_eq!(name, "summary.docx");
    }

    #[test]
    fn missing_header_falls_back_to_generated_default() {
        assert_eq!(
            artifact_filename(None, ArtifactKind::Plain),
            "processed_document_plain.docx"
        );
        assert_eq!(
            artifact_filename(None, ArtifactKind::Summary),
            "processed_document_summary.docx"
        );
    }

    #[test]
    fn header_without_filename_param_falls_back() {
        assert_eq!(
            artifact_filename(Some("attachment"), ArtifactKind::Plain),
            "processed_document_plain.docx"
        );
    }

    #[test]
    fn forbidden_characters_are_replaced() {
        let name = artifact_filename(
            Some("attachment; filename=\"a/b:c*d.docx\""),
            ArtifactKind::Plain,
        );
        assert_eq!(name, "a_b_c_d.docx");
    }

    #[test]
    fn reserved_windows_stem_gets_suffixed() {
        let name = artifact_filename(
            Some("attachment; filename=\"CON.docx\""),
            ArtifactKind::Plain,
        );
        assert_eq!(name, "CON.docx_");
    }
}
