//! Inline markup tag recognition

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

/// `<name attr="v" ...>`, `<name/>` or `</name>`
static TAG_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"<(/?)(\w+)((?:\s+[\w:-]+(?:\s*=\s*(?:"[^"]*"|'[^']*'|[^'">\s]+?))?)*)\s*(/?)>"#,
    )
    .expect("tag pattern is a valid regex")
});

/// Kind of markup tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    Open,
    Close,
    SelfClosing,
}

/// A tag found in the input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag<'a> {
    pub name: &'a str,
    pub kind: TagKind,
    /// Byte range of the whole tag in the input
    pub range: Range<usize>,
}

/// Whether the text contains anything that looks like a markup tag
pub fn looks_like_markup(text: &str) -> bool {
    !text.is_empty() && TAG_PATTERN.is_match(text)
}

/// Iterate over the tags in `text`, left to right
pub fn find_tags(text: &str) -> impl Iterator<Item = Tag<'_>> + '_ {
    TAG_PATTERN.captures_iter(text).filter_map(|caps| {
        let whole = caps.get(0)?;
        let name = caps.get(2)?.as_str();
        let closing = caps.get(1).is_some_and(|m| !m.as_str().is_empty());
        let self_closing = caps.get(4).is_some_and(|m| !m.as_str().is_empty());

        let kind = if closing {
            TagKind::Close
        } else if self_closing {
            TagKind::SelfClosing
        } else {
            TagKind::Open
        };

        Some(Tag {
            name,
            kind,
            range: whole.range(),
        })
    })
}
