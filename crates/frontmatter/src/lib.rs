//! YAML front matter handling for rulesync Markdown documents.
//!
//! A document is an optional YAML block fenced by `---` lines followed by a
//! free-text body:
//!
//! ```text
//! ---
//! name: planner
//! description: Plans implementation tasks
//! ---
//! You are the planner.
//! ```
//!
//! The block is exposed as an ordered [`Mapping`], so key order and the
//! difference between an absent key and a key set to some default value both
//! survive a parse/render cycle.
//!
//! ```
//! use rulesync_frontmatter::{parse_document, render_document};
//!
//! let parsed = parse_document("---\nname: planner\n---\nBody\n").unwrap();
//! assert_eq!(parsed.body, "Body\n");
//! let text = render_document(&parsed.front_matter, &parsed.body).unwrap();
//! assert_eq!(text, "---\nname: planner\n---\nBody\n");
//! ```

#![deny(unsafe_code)]

pub use serde_yaml::{Mapping, Value};

const FENCE: &str = "---";

/// Errors raised while splitting, parsing, or rendering front matter.
#[derive(Debug, thiserror::Error)]
pub enum FrontmatterError {
    #[error("front matter opened with `---` but never closed")]
    Unterminated,
    #[error("invalid YAML front matter: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("front matter must be a mapping, found {found}")]
    NotAMapping { found: &'static str },
}

/// A document split into its front matter and body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedDocument {
    /// Front matter fields in authored order. Empty when the document has none.
    pub front_matter: Mapping,
    /// Everything after the closing fence.
    pub body: String,
    /// Whether a fenced block was present at all.
    pub has_front_matter: bool,
}

/// Returns true if the content opens with a front matter fence.
pub fn has_frontmatter(content: &str) -> bool {
    opening_fence_len(strip_bom(content)).is_some()
}

/// Split content into the raw YAML block and the body.
///
/// The closing fence must be a line consisting of `---` alone. A single line
/// break after the closing fence belongs to the fence, not to the body.
pub fn split_frontmatter(content: &str) -> Result<(Option<&str>, &str), FrontmatterError> {
    let content = strip_bom(content);
    let Some(open_len) = opening_fence_len(content) else {
        return Ok((None, content));
    };

    let after_open = &content[open_len..];
    let mut offset = 0;
    for line in after_open.split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == FENCE {
            let yaml = &after_open[..offset];
            let body = &after_open[offset + line.len()..];
            return Ok((Some(yaml), body));
        }
        offset += line.len();
    }

    Err(FrontmatterError::Unterminated)
}

/// Parse a document into an ordered front matter mapping and its body.
pub fn parse_document(content: &str) -> Result<ParsedDocument, FrontmatterError> {
    let (raw, body) = split_frontmatter(content)?;

    let front_matter = match raw {
        Some(yaml) if !yaml.trim().is_empty() => match serde_yaml::from_str::<Value>(yaml)? {
            Value::Mapping(mapping) => mapping,
            Value::Null => Mapping::new(),
            other => {
                return Err(FrontmatterError::NotAMapping {
                    found: value_kind(&other),
                })
            }
        },
        _ => Mapping::new(),
    };

    Ok(ParsedDocument {
        front_matter,
        body: body.to_string(),
        has_front_matter: raw.is_some(),
    })
}

/// Render front matter and body back into document text.
///
/// An empty mapping produces the body alone, without an empty fenced block.
pub fn render_document(front_matter: &Mapping, body: &str) -> Result<String, FrontmatterError> {
    if front_matter.is_empty() {
        return Ok(body.to_string());
    }

    let yaml = serde_yaml::to_string(front_matter)?;
    let mut out = String::with_capacity(yaml.len() + body.len() + 8);
    out.push_str(FENCE);
    out.push('\n');
    out.push_str(&yaml);
    if !yaml.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(FENCE);
    out.push('\n');
    out.push_str(body);
    Ok(out)
}

/// Short name of a YAML value's variant, for error messages.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}

fn strip_bom(content: &str) -> &str {
    content.strip_prefix('\u{feff}').unwrap_or(content)
}

fn opening_fence_len(content: &str) -> Option<usize> {
    if content.starts_with("---\n") {
        Some(4)
    } else if content.starts_with("---\r\n") {
        Some(5)
    } else {
        None
    }
}
