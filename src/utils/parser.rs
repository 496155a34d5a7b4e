//! Text extraction primitives for manifest and command output parsing.
//!
//! Version fields are matched with regex patterns carrying exactly one
//! capture group; replacement preserves everything around the captured
//! value so manifest formatting survives a round trip.

use regex::Regex;

/// Extract first match from content using regex pattern with capture group.
/// Content is trimmed before matching to handle trailing newlines.
pub fn extract_first(content: &str, pattern: &str) -> Option<String> {
    let re = Regex::new(pattern).ok()?;
    re.captures(content.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Replace all matches of the capture group with a new value.
/// Returns (new_content, replacement_count); None on an invalid pattern.
///
/// Splicing goes by the capture group's byte offsets, not by searching for
/// the captured text: captured values are free text and may be empty or
/// repeat elsewhere inside the match.
pub fn replace_all(content: &str, pattern: &str, replacement: &str) -> Option<(String, usize)> {
    let re = Regex::new(pattern).ok()?;
    let mut count = 0usize;

    let replaced = re
        .replace_all(content, |caps: &regex::Captures| {
            match (caps.get(0), caps.get(1)) {
                (Some(full), Some(group)) => {
                    count += 1;
                    let start = group.start() - full.start();
                    let end = group.end() - full.start();
                    let text = full.as_str();
                    format!("{}{}{}", &text[..start], replacement, &text[end..])
                }
                (Some(full), None) => full.as_str().to_string(),
                _ => String::new(),
            }
        })
        .to_string();

    Some((replaced, count))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = "<idea-plugin>\n  <version>1.2.3</version>\n</idea-plugin>\n";
    const PATTERN: &str = "<version>([^<]*)</version>";

    #[test]
    fn extract_first_finds_version_element() {
        assert_eq!(extract_first(MANIFEST, PATTERN), Some("1.2.3".to_string()));
    }

    #[test]
    fn extract_first_returns_none_without_match() {
        assert_eq!(extract_first("<idea-plugin/>", PATTERN), None);
    }

    #[test]
    fn extract_first_returns_none_for_invalid_pattern() {
        assert_eq!(extract_first(MANIFEST, "<version>(["), None);
    }

    #[test]
    fn replace_all_keeps_surrounding_markup() {
        let (out, count) = replace_all(MANIFEST, PATTERN, "1.2.3.abcdef").unwrap();
        assert_eq!(count, 1);
        assert!(out.contains("<version>1.2.3.abcdef</version>"));
        assert!(out.contains("<idea-plugin>"));
    }

    #[test]
    fn replace_all_handles_values_repeating_markup_text() {
        // "r" also occurs inside "<version>"; the splice must not land there.
        let (out, count) = replace_all("<version>r</version>", PATTERN, "2.0").unwrap();
        assert_eq!(count, 1);
        assert_eq!(out, "<version>2.0</version>");
    }

    #[test]
    fn replace_all_fills_an_empty_capture_in_place() {
        let (out, count) = replace_all("<version></version>", PATTERN, "1.0.abcdef").unwrap();
        assert_eq!(count, 1);
        assert_eq!(out, "<version>1.0.abcdef</version>");
    }

    #[test]
    fn replace_all_counts_every_occurrence() {
        let content = "<version>1.0</version><version>1.0</version>";
        let (out, count) = replace_all(content, PATTERN, "2.0").unwrap();
        assert_eq!(count, 2);
        assert_eq!(out, "<version>2.0</version><version>2.0</version>");
    }
}
