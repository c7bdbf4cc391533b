use crate::io;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

// ---------------------------------------------------------------------------
// FrontmatterValue
// ---------------------------------------------------------------------------

/// A frontmatter value: a plain string or a flat `[a, b]` list.
///
/// No numeric or boolean typing happens here; dates and enums are
/// interpreted by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FrontmatterValue {
    Scalar(String),
    List(Vec<String>),
}

impl FrontmatterValue {
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            FrontmatterValue::Scalar(s) => Some(s),
            FrontmatterValue::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FrontmatterValue::Scalar(_) => None,
            FrontmatterValue::List(items) => Some(items),
        }
    }
}

impl From<&str> for FrontmatterValue {
    fn from(s: &str) -> Self {
        FrontmatterValue::Scalar(s.to_string())
    }
}

impl From<Vec<String>> for FrontmatterValue {
    fn from(items: Vec<String>) -> Self {
        FrontmatterValue::List(items)
    }
}

pub type Frontmatter = BTreeMap<String, FrontmatterValue>;

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse the `---` delimited header of a markdown document.
///
/// The block runs from the first `---` line to the next one. Without a
/// closing delimiter nothing is parsed. Inside the block each `key: value`
/// line is split on its first colon; lines without a colon or with an empty
/// key are skipped and later keys overwrite earlier ones.
pub fn parse_str(content: &str) -> Frontmatter {
    let mut fm = Frontmatter::new();
    let Some(block) = extract_block(content) else {
        return fm;
    };

    for line in block {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        let value = strip_quotes(value.trim());
        fm.insert(key.to_string(), parse_value(value));
    }
    fm
}

/// Parse the frontmatter of the file at `path`.
///
/// A missing file or one that is not valid UTF-8 yields an empty mapping.
pub fn parse_file(path: &Path) -> Frontmatter {
    match io::read_utf8(path) {
        Some(content) => parse_str(&content),
        None => {
            tracing::debug!(path = %path.display(), "no readable frontmatter source");
            Frontmatter::new()
        }
    }
}

fn is_delimiter(line: &str) -> bool {
    line.trim() == "---"
}

fn extract_block(content: &str) -> Option<Vec<&str>> {
    let mut lines = content.lines();
    lines.by_ref().find(|l| is_delimiter(l))?;

    let mut block = Vec::new();
    for line in lines {
        if is_delimiter(line) {
            return Some(block);
        }
        block.push(line);
    }
    None
}

/// A lone `"` or `'` counts as quoted: it opens and closes on the same char.
fn is_quoted(value: &str) -> bool {
    (value.starts_with('"') && value.ends_with('"'))
        || (value.starts_with('\'') && value.ends_with('\''))
}

/// Strip exactly one layer of matching quotes.
fn strip_quotes(value: &str) -> &str {
    if !is_quoted(value) {
        value
    } else if value.len() < 2 {
        ""
    } else {
        &value[1..value.len() - 1]
    }
}

fn parse_value(value: &str) -> FrontmatterValue {
    if value.starts_with('[') && value.ends_with(']') {
        let inner = value[1..value.len() - 1].trim();
        if inner.is_empty() {
            return FrontmatterValue::List(Vec::new());
        }
        let items = inner
            .split(',')
            .map(|item| strip_quotes(item.trim()).to_string())
            .collect();
        return FrontmatterValue::List(items);
    }
    FrontmatterValue::Scalar(value.to_string())
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Serialize a mapping as a `---` delimited block that parses back to itself.
pub fn render(fm: &Frontmatter) -> String {
    let mut out = String::from("---\n");
    for (key, value) in fm {
        match value {
            FrontmatterValue::Scalar(s) => {
                out.push_str(&format!("{key}: {}\n", quote_if_needed(s)));
            }
            FrontmatterValue::List(items) => {
                let items: Vec<String> = items.iter().map(|i| quote_if_needed(i)).collect();
                out.push_str(&format!("{key}: [{}]\n", items.join(", ")));
            }
        }
    }
    out.push_str("---\n");
    out
}

fn quote_if_needed(value: &str) -> String {
    if value != value.trim() || is_quoted(value) {
        format!("\"{value}\"")
    } else {
        value.to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn scalar(fm: &Frontmatter, key: &str) -> String {
        fm.get(key)
            .and_then(|v| v.as_scalar())
            .unwrap_or_else(|| panic!("expected scalar for {key}"))
            .to_string()
    }

    #[test]
    fn basic_frontmatter() {
        let fm = parse_str("---\nname: Test Feature\npriority: P1\neffort: Medium\n---\n\n# Content here\n");
        assert_eq!(scalar(&fm, "name"), "Test Feature");
        assert_eq!(scalar(&fm, "priority"), "P1");
        assert_eq!(scalar(&fm, "effort"), "Medium");
        assert_eq!(fm.len(), 3);
    }

    #[test]
    fn empty_and_plain_content() {
        assert!(parse_str("").is_empty());
        assert!(parse_str("# no frontmatter\n").is_empty());
    }

    #[test]
    fn missing_closing_delimiter_parses_nothing() {
        assert!(parse_str("---\nname: Test\n").is_empty());
    }

    #[test]
    fn quoted_values() {
        let fm = parse_str("---\nname: \"Quoted Value\"\nother: 'Single Quoted'\n---\n");
        assert_eq!(scalar(&fm, "name"), "Quoted Value");
        assert_eq!(scalar(&fm, "other"), "Single Quoted");
    }

    #[test]
    fn only_one_quote_layer_is_stripped() {
        let fm = parse_str("---\nname: \"'inner'\"\n---\n");
        assert_eq!(scalar(&fm, "name"), "'inner'");
    }

    #[test]
    fn lone_quote_is_empty_string() {
        let fm = parse_str("---\nname: \"\nother: '\ndeps: [\", a]\n---\n");
        assert_eq!(scalar(&fm, "name"), "");
        assert_eq!(scalar(&fm, "other"), "");
        assert_eq!(
            fm.get("deps"),
            Some(&FrontmatterValue::List(vec![String::new(), "a".to_string()]))
        );
    }

    #[test]
    fn lone_quote_value_survives_render() {
        let mut fm = Frontmatter::new();
        fm.insert("name".to_string(), FrontmatterValue::from("\""));
        let parsed = parse_str(&render(&fm));
        assert_eq!(scalar(&parsed, "name"), "\"");
    }

    #[test]
    fn array_values() {
        let fm = parse_str("---\ndependsOn: [feature-a, feature-b]\nblockedBy: []\n---\n");
        assert_eq!(
            fm.get("dependsOn"),
            Some(&FrontmatterValue::List(vec![
                "feature-a".to_string(),
                "feature-b".to_string()
            ]))
        );
        assert_eq!(fm.get("blockedBy"), Some(&FrontmatterValue::List(vec![])));
    }

    #[test]
    fn array_elements_are_trimmed_and_unquoted() {
        let fm = parse_str("---\ntags: [ \"a\" ,'b',  c ]\n---\n");
        assert_eq!(
            fm.get("tags").and_then(|v| v.as_list()),
            Some(&["a".to_string(), "b".to_string(), "c".to_string()][..])
        );
    }

    #[test]
    fn date_values_stay_strings() {
        let fm = parse_str("---\ncreated: 2024-01-15\nstarted: 2024-01-20\n---\n");
        assert_eq!(scalar(&fm, "created"), "2024-01-15");
        assert_eq!(scalar(&fm, "started"), "2024-01-20");
    }

    #[test]
    fn colon_in_value_is_preserved() {
        let fm = parse_str("---\ntime: 12:30:00\nurl: https://example.com\n---\n");
        assert_eq!(scalar(&fm, "time"), "12:30:00");
        assert_eq!(scalar(&fm, "url"), "https://example.com");
    }

    #[test]
    fn empty_value_is_empty_string() {
        let fm = parse_str("---\nname: Test\nempty:\nanother: value\n---\n");
        assert_eq!(scalar(&fm, "empty"), "");
        assert_eq!(scalar(&fm, "another"), "value");
    }

    #[test]
    fn skips_colonless_lines_and_empty_keys() {
        let fm = parse_str("---\njust text\n: orphan\nname: ok\n---\n");
        assert_eq!(fm.len(), 1);
        assert_eq!(scalar(&fm, "name"), "ok");
    }

    #[test]
    fn last_duplicate_wins() {
        let fm = parse_str("---\npriority: P2\npriority: P0\n---\n");
        assert_eq!(scalar(&fm, "priority"), "P0");
    }

    #[test]
    fn leading_text_and_crlf_are_tolerated() {
        let fm = parse_str("preamble\r\n---\r\nname: Windows\r\n---\r\nbody\r\n");
        assert_eq!(scalar(&fm, "name"), "Windows");
    }

    #[test]
    fn body_after_block_is_ignored() {
        let fm = parse_str("---\nname: A\n---\nname: B\n---\n");
        assert_eq!(scalar(&fm, "name"), "A");
    }

    #[test]
    fn render_then_parse_is_stable() {
        let source = "---\nname: \" padded \"\nother: '\"quoted\"'\nurl: https://example.com\nempty:\ndeps: [a, b]\n---\n";
        let first = parse_str(source);
        let second = parse_str(&render(&first));
        assert_eq!(first, second);
        assert_eq!(scalar(&second, "name"), " padded ");
        assert_eq!(scalar(&second, "other"), "\"quoted\"");
    }

    #[test]
    fn parse_file_missing_is_empty() {
        let dir = TempDir::new().unwrap();
        assert!(parse_file(&dir.path().join("nonexistent.md")).is_empty());
    }

    #[test]
    fn parse_file_reads_frontmatter() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test.md");
        std::fs::write(&path, "---\nname: Test\npriority: P0\n---\n\n# Content\n").unwrap();
        let fm = parse_file(&path);
        assert_eq!(scalar(&fm, "name"), "Test");
        assert_eq!(scalar(&fm, "priority"), "P0");
    }

    #[test]
    fn parse_file_without_frontmatter_or_utf8_is_empty() {
        let dir = TempDir::new().unwrap();
        let plain = dir.path().join("plain.md");
        std::fs::write(&plain, "# Just content\n\nNo frontmatter here.").unwrap();
        assert!(parse_file(&plain).is_empty());

        let binary = dir.path().join("binary.md");
        std::fs::write(&binary, [b'-', b'-', b'-', b'\n', 0xff, b'\n', b'-', b'-', b'-']).unwrap();
        assert!(parse_file(&binary).is_empty());
    }
}
