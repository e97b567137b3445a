//! Recognition of leading line markers.
//!
//! A marker is the structural prefix of a markdown line: a heading prefix
//! (`## `), a bullet (`- ` or `* `), or an ordered-list number (`3. `),
//! optionally indented. The line commands use markers to decide how much of
//! a line counts as markup rather than content.

/// Find the marker prefix of `line`, if any.
///
/// Returns the matched prefix as a slice of `line`, **including** any
/// leading indentation, or `None` when the line does not start with a
/// marker. The slice always ends at the single space that terminates the
/// marker, so `line[marker.len()..]` is the line's content.
///
/// Recognized after optional spaces/tabs:
/// - one or more `#` followed by a space (heading)
/// - `-` or `*` followed by a space (bullet)
/// - one or more ASCII digits, then `.`, then a space (ordered list)
///
/// ```
/// use centerline::marker::line_marker;
///
/// assert_eq!(line_marker("## Title"), Some("## "));
/// assert_eq!(line_marker("  - item"), Some("  - "));
/// assert_eq!(line_marker("3. item"), Some("3. "));
/// assert_eq!(line_marker("plain text"), None);
/// ```
pub fn line_marker(line: &str) -> Option<&str> {
    let bytes = line.as_bytes();
    let mut indent = 0;
    while indent < bytes.len() && (bytes[indent] == b' ' || bytes[indent] == b'\t') {
        indent += 1;
    }
    let rest = &bytes[indent..];

    let marker_len = match rest.first()? {
        b'#' => {
            let mut i = 1;
            while i < rest.len() && rest[i] == b'#' {
                i += 1;
            }
            if rest.get(i) == Some(&b' ') {
                i + 1
            } else {
                return None;
            }
        }
        b'-' | b'*' => {
            if rest.get(1) == Some(&b' ') {
                2
            } else {
                return None;
            }
        }
        b'0'..=b'9' => {
            let mut i = 1;
            while i < rest.len() && rest[i].is_ascii_digit() {
                i += 1;
            }
            if rest.get(i) == Some(&b'.') && rest.get(i + 1) == Some(&b' ') {
                i + 2
            } else {
                return None;
            }
        }
        _ => return None,
    };

    // All matched bytes are ASCII, so the slice boundary is valid UTF-8.
    Some(&line[..indent + marker_len])
}

/// Whether `line` consists of a marker and nothing else.
///
/// Such lines (an empty list item, a bare `# `) are left alone by the
/// marker-preserving empty command.
pub fn is_marker_only(line: &str) -> bool {
    line_marker(line) == Some(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_marker() {
        assert_eq!(line_marker("# Title"), Some("# "));
        assert_eq!(line_marker("### Deep title"), Some("### "));
    }

    #[test]
    fn test_bullet_markers() {
        assert_eq!(line_marker("- item"), Some("- "));
        assert_eq!(line_marker("* item"), Some("* "));
    }

    #[test]
    fn test_ordered_marker() {
        assert_eq!(line_marker("3. item"), Some("3. "));
        assert_eq!(line_marker("42. item"), Some("42. "));
    }

    #[test]
    fn test_marker_includes_indentation() {
        assert_eq!(line_marker("  - nested"), Some("  - "));
        assert_eq!(line_marker("\t* nested"), Some("\t* "));
        assert_eq!(line_marker("    12. nested"), Some("    12. "));
    }

    #[test]
    fn test_plain_text_has_no_marker() {
        assert_eq!(line_marker("plain text"), None);
        assert_eq!(line_marker(""), None);
    }

    #[test]
    fn test_whitespace_only_has_no_marker() {
        assert_eq!(line_marker("   "), None);
        assert_eq!(line_marker("\t"), None);
    }

    #[test]
    fn test_missing_space_is_not_a_marker() {
        assert_eq!(line_marker("#Title"), None);
        assert_eq!(line_marker("-item"), None);
        assert_eq!(line_marker("*emphasis*"), None);
        assert_eq!(line_marker("3.item"), None);
    }

    #[test]
    fn test_bare_prefix_char_is_not_a_marker() {
        assert_eq!(line_marker("#"), None);
        assert_eq!(line_marker("-"), None);
        assert_eq!(line_marker("7"), None);
        assert_eq!(line_marker("7."), None);
    }

    #[test]
    fn test_number_without_dot_is_not_a_marker() {
        assert_eq!(line_marker("3 item"), None);
    }

    #[test]
    fn test_marker_only_lines() {
        assert!(is_marker_only("# "));
        assert!(is_marker_only("- "));
        assert!(is_marker_only("  - "));
        assert!(is_marker_only("10. "));
        assert!(!is_marker_only("- item"));
        assert!(!is_marker_only("plain"));
        assert!(!is_marker_only(""));
    }

    #[test]
    fn test_content_follows_marker() {
        let line = "  - hello world";
        let marker = line_marker(line).unwrap();
        assert_eq!(&line[marker.len()..], "hello world");
    }

    #[test]
    fn test_multibyte_content_after_marker() {
        assert_eq!(line_marker("- café"), Some("- "));
        assert_eq!(line_marker("# héllo"), Some("# "));
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn marker_is_always_a_prefix(line in "\\PC*") {
                if let Some(marker) = line_marker(&line) {
                    prop_assert!(line.starts_with(marker));
                }
            }

            #[test]
            fn marker_ends_with_a_space(line in "\\PC*") {
                if let Some(marker) = line_marker(&line) {
                    prop_assert!(marker.ends_with(' '));
                }
            }

            #[test]
            fn marker_of_marker_is_the_whole_marker(line in "\\PC*") {
                if let Some(marker) = line_marker(&line) {
                    prop_assert_eq!(line_marker(marker), Some(marker));
                    prop_assert!(is_marker_only(marker));
                }
            }

            #[test]
            fn bullet_lines_always_match(
                indent in "[ \t]{0,4}",
                content in "[a-z ]{0,20}",
            ) {
                let line = format!("{indent}- {content}");
                prop_assert_eq!(line_marker(&line), Some(&line[..indent.len() + 2]));
            }
        }
    }
}
