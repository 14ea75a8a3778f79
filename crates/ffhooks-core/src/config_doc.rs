//! Line-oriented access to the `plugin_version` field of the config document.
//!
//! The document is never parsed as YAML. Only the first line starting with
//! `plugin_version:` is interpreted; every other line is opaque and is
//! preserved byte-for-byte, in order, including its line terminator.

use std::sync::LazyLock;

use regex::Regex;

/// Key of the stamped field.
pub const FIELD_KEY: &str = "plugin_version";

static FIELD_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^plugin_version:\s*(.+)$").expect("static regex"));

/// Read the stored `plugin_version` value from the first field line.
///
/// Surrounding whitespace and one leading and one trailing quote (`'` or `"`)
/// are removed. Returns `None` when no line carries the field, or when the
/// first one holds a blank value.
pub fn read_field(document: &str) -> Option<String> {
    let caps = document
        .split('\n')
        .find_map(|line| FIELD_LINE.captures(line))?;
    let value = unquote(caps[1].trim()).trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn unquote(value: &str) -> &str {
    let is_quote = |c: char| c == '\'' || c == '"';
    let value = value.strip_prefix(is_quote).unwrap_or(value);
    value.strip_suffix(is_quote).unwrap_or(value)
}

/// Whether `version` can be written as the value of a single field line and
/// read back unchanged: non-empty, no surrounding whitespace, no control
/// characters.
pub fn is_stampable(version: &str) -> bool {
    !version.is_empty() && version.trim() == version && !version.chars().any(char::is_control)
}

/// Record `new_version` in the document.
///
/// Returns the input unchanged when the field already reads `new_version`, or
/// when `new_version` is not [stampable](is_stampable).
/// Otherwise the first `plugin_version:` line is replaced by an unquoted
/// `plugin_version: <new_version>`, or, if there is none, that line is
/// prepended. Applying it twice with the same version changes nothing more.
pub fn stamp_field(document: &str, new_version: &str) -> String {
    if !is_stampable(new_version) || read_field(document).as_deref() == Some(new_version) {
        return document.to_string();
    }

    let stamped_line = format!("{FIELD_KEY}: {new_version}");
    let mut out = String::with_capacity(document.len() + stamped_line.len() + 1);
    let mut replaced = false;

    for segment in document.split_inclusive('\n') {
        if replaced {
            out.push_str(segment);
            continue;
        }
        let body = segment.trim_end_matches('\n').trim_end_matches('\r');
        if body.starts_with("plugin_version:") {
            out.push_str(&stamped_line);
            out.push_str(&segment[body.len()..]);
            replaced = true;
        } else {
            out.push_str(segment);
        }
    }

    if replaced {
        out
    } else {
        format!("{stamped_line}\n{document}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_unquoted_value() {
        assert_eq!(
            read_field("plugin_version: 1.2.3\nother: val"),
            Some("1.2.3".to_string())
        );
    }

    #[test]
    fn reads_quoted_values() {
        assert_eq!(
            read_field("plugin_version: '1.2.3'\n"),
            Some("1.2.3".to_string())
        );
        assert_eq!(
            read_field("plugin_version: \"1.2.3\"\n"),
            Some("1.2.3".to_string())
        );
        assert_eq!(
            read_field("plugin_version: ' 1.2.3 '\n"),
            Some("1.2.3".to_string())
        );
    }

    #[test]
    fn reads_field_not_on_first_line() {
        let doc = "project: demo\nstack:\n  - rust\nplugin_version: 0.4.1\n";
        assert_eq!(read_field(doc), Some("0.4.1".to_string()));
    }

    #[test]
    fn first_field_line_wins() {
        let doc = "plugin_version: 1.0.0\nplugin_version: 2.0.0\n";
        assert_eq!(read_field(doc), Some("1.0.0".to_string()));
    }

    #[test]
    fn blank_first_field_line_wins() {
        assert_eq!(read_field("plugin_version:   \nplugin_version: 1.0.0\n"), None);
    }

    #[test]
    fn strips_unbalanced_quotes() {
        assert_eq!(read_field("plugin_version: '1.2.3"), Some("1.2.3".to_string()));
        assert_eq!(read_field("plugin_version: 1.2.3\""), Some("1.2.3".to_string()));
        assert_eq!(read_field("plugin_version: \"1.2.3'"), Some("1.2.3".to_string()));
        assert_eq!(read_field("plugin_version: '"), None);
    }

    #[test]
    fn absent_field() {
        assert_eq!(read_field("some_key: value\nother: x"), None);
        assert_eq!(read_field(""), None);
        // key is case-sensitive and must start the line
        assert_eq!(read_field("Plugin_Version: 1.0.0"), None);
        assert_eq!(read_field("  plugin_version: 1.0.0"), None);
        assert_eq!(read_field("plugin_version:   \n"), None);
    }

    #[test]
    fn tolerates_crlf() {
        assert_eq!(
            read_field("plugin_version: 1.2.3\r\nother: val\r\n"),
            Some("1.2.3".to_string())
        );
    }

    #[test]
    fn stamp_replaces_existing_line() {
        let doc = "plugin_version: 1.0.0\nother: val\n";
        assert_eq!(
            stamp_field(doc, "1.2.3"),
            "plugin_version: 1.2.3\nother: val\n"
        );
    }

    #[test]
    fn stamp_replaces_quoted_line_unquoted() {
        let doc = "name: x\nplugin_version: '1.0.0'\nother: val";
        assert_eq!(
            stamp_field(doc, "1.2.3"),
            "name: x\nplugin_version: 1.2.3\nother: val"
        );
    }

    #[test]
    fn stamp_prepends_when_absent() {
        assert_eq!(
            stamp_field("some_key: value\n", "1.2.3"),
            "plugin_version: 1.2.3\nsome_key: value\n"
        );
        assert_eq!(stamp_field("", "1.2.3"), "plugin_version: 1.2.3\n");
    }

    #[test]
    fn stamp_is_noop_when_version_matches() {
        let doc = "plugin_version: 1.2.3\nother: val\n";
        assert_eq!(stamp_field(doc, "1.2.3"), doc);

        let quoted = "plugin_version: \"1.2.3\"\nother: val\n";
        assert_eq!(stamp_field(quoted, "1.2.3"), quoted);
    }

    #[test]
    fn stamp_is_idempotent() {
        let docs = [
            "",
            "some_key: value\n",
            "plugin_version: 1.0.0\nother: val\n",
            "plugin_version: '0.9.0'\r\nother: val\r\n",
            "plugin_version:\nother: val\n",
            "a: 1\nplugin_version: 1.0.0\nplugin_version: 3.0.0",
        ];
        for doc in docs {
            for v in ["2.1.0", "1.2.3\r", "1.2.3\nx: y"] {
                let once = stamp_field(doc, v);
                let twice = stamp_field(&once, v);
                assert_eq!(once, twice, "not idempotent for {doc:?} with {v:?}");
            }
            assert_eq!(read_field(&stamp_field(doc, "2.1.0")), Some("2.1.0".to_string()));
        }
    }

    #[test]
    fn unstampable_versions_leave_document_alone() {
        let docs = ["", "plugin_version: 1.0.0\nother: val\n", "other: val\n"];
        for v in ["1.2.3\r", "1.2.3\nx: y", " 1.2.3", "1.2.3\t", ""] {
            assert!(!is_stampable(v), "{v:?}");
            for doc in docs {
                let once = stamp_field(doc, v);
                assert_eq!(once, doc, "stamped {v:?} into {doc:?}");
                assert_eq!(stamp_field(&once, v), once);
            }
        }
        assert!(is_stampable("1.2.3-rc.1+build.5"));
    }

    #[test]
    fn stamp_preserves_crlf_and_other_lines() {
        let doc = "# comment\r\nplugin_version: 1.0.0\r\nstack: [rust]\r\n";
        assert_eq!(
            stamp_field(doc, "1.1.0"),
            "# comment\r\nplugin_version: 1.1.0\r\nstack: [rust]\r\n"
        );
    }

    #[test]
    fn stamp_only_touches_first_field_line() {
        let doc = "plugin_version: 1.0.0\nplugin_version: 3.0.0\n";
        assert_eq!(
            stamp_field(doc, "2.0.0"),
            "plugin_version: 2.0.0\nplugin_version: 3.0.0\n"
        );
    }
}
