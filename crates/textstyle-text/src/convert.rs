//! Tag to Run Converter
//!
//! Walks tagged text, keeps a stack of open tags measured in output
//! coordinates, and emits a [`Run`] every time a recognized tag closes.
//! Markup never reaches the output text.
//!
//! Input is expected to be well nested. A closing tag that doesn't match the
//! innermost open tag is ignored, and tags still open at the end of the input
//! produce no run. The implicit body tag is only closed by the end of input.

use std::collections::HashMap;
use std::ops::Range;
use std::sync::Arc;

use textstyle_css::{
    PropertyId, PropertyValue, Result, StyleError, StyleRecord, StyleTable, TextTransform,
    merge_single_rule,
};

use crate::tags::{TagKind, find_tags, looks_like_markup};
use crate::transform::transform_with_offsets;

/// Where a tag override takes its style from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverrideSource {
    /// An existing selector in the style table
    Named(String),
    /// A single inline rule, e.g. `"spot{color:#fff}"`
    Css(String),
}

/// Call-scoped style for a tag name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagOverride {
    pub tag: String,
    pub source: OverrideSource,
}

impl TagOverride {
    /// Style `tag` like the existing selector `style`
    pub fn named(tag: impl Into<String>, style: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            source: OverrideSource::Named(style.into()),
        }
    }

    /// Style `tag` with one inline CSS rule
    pub fn css(tag: impl Into<String>, css: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            source: OverrideSource::Css(css.into()),
        }
    }
}

/// Conversion options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Layer override styles over the stylesheet entry for their tag, or over
    /// the default style when there is none
    pub merge_existing: bool,
    /// Keep recognizing stylesheet selectors as tags when overrides are given
    pub include_existing: bool,
    /// Name of the implicit outermost tag
    pub body_tag: String,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            merge_existing: true,
            include_existing: true,
            body_tag: "body".to_string(),
        }
    }
}

/// A styled span of the output text
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    /// Byte offset into the output text
    pub start: usize,
    /// Length in bytes
    pub length: usize,
    pub style: Arc<StyleRecord>,
}

impl Run {
    pub fn end(&self) -> usize {
        self.start + self.length
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end()
    }

    /// Whether `other` lies entirely inside this run
    pub fn contains(&self, other: &Run) -> bool {
        self.start <= other.start && other.end() <= self.end()
    }
}

/// Conversion result: text without markup and its runs in closing order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Converted {
    pub text: String,
    pub runs: Vec<Run>,
}

impl Converted {
    /// Text covered by a run
    pub fn run_text(&self, run: &Run) -> &str {
        self.text.get(run.range()).unwrap_or("")
    }
}

#[derive(Debug)]
struct OpenTag {
    name: String,
    start: usize,
    /// Number of runs emitted before this tag opened
    first_run: usize,
    synthetic: bool,
}

/// Converter bound to one style table, default style and override set
#[derive(Debug)]
pub struct Converter<'a> {
    table: &'a StyleTable,
    default_style: &'a StyleRecord,
    overrides: HashMap<String, Arc<StyleRecord>>,
    include_table: bool,
    wrapper: Option<String>,
}

impl<'a> Converter<'a> {
    /// Resolve the default style and every override up front.
    ///
    /// Fails when the default selector or a named override style is missing,
    /// or when inline override CSS is invalid.
    pub fn new(
        table: &'a StyleTable,
        default_selector: &str,
        overrides: Option<&[TagOverride]>,
        options: &ConvertOptions,
    ) -> Result<Self> {
        let default_style = table
            .get(default_selector)
            .ok_or_else(|| StyleError::UnresolvedSelector(default_selector.to_string()))?;

        let mut resolved = HashMap::new();
        let mut wrapper = None;

        if let Some(overrides) = overrides {
            for tag_override in overrides {
                let style = resolve_override(table, default_style, tag_override, options)?;
                resolved.insert(tag_override.tag.clone(), Arc::new(style));
            }

            if !resolved.contains_key(&options.body_tag) {
                let body = TagOverride::named(options.body_tag.as_str(), default_selector);
                let style = resolve_override(table, default_style, &body, options)?;
                resolved.insert(body.tag, Arc::new(style));
            }
            wrapper = Some(options.body_tag.clone());
        }

        Ok(Self {
            table,
            default_style,
            include_table: overrides.is_none() || options.include_existing,
            overrides: resolved,
            wrapper,
        })
    }

    pub fn default_style(&self) -> &StyleRecord {
        self.default_style
    }

    /// Whether `tag` produces runs in this conversion
    pub fn recognizes(&self, tag: &str) -> bool {
        self.overrides.contains_key(tag) || (self.include_table && self.table.contains(tag))
    }

    /// Resolved style for a tag: its override, else its stylesheet entry
    /// layered over the default style, else the default style.
    pub fn style_for(&self, tag: &str) -> Arc<StyleRecord> {
        if let Some(style) = self.overrides.get(tag) {
            return Arc::clone(style);
        }

        match self.table.get(tag) {
            Some(style) => Arc::new(style.cascade_over(self.default_style)),
            None => Arc::new(self.default_style.clone()),
        }
    }

    /// Convert tagged text into plain text and runs
    pub fn convert(&self, text: &str) -> Converted {
        if self.wrapper.is_none() && !looks_like_markup(text) {
            return Converted {
                text: text.to_string(),
                runs: Vec::new(),
            };
        }

        let mut out = String::with_capacity(text.len());
        let mut stack: Vec<OpenTag> = Vec::new();
        let mut runs = Vec::new();
        let mut cursor = 0;

        if let Some(body) = &self.wrapper {
            stack.push(OpenTag {
                name: body.clone(),
                start: 0,
                first_run: 0,
                synthetic: true,
            });
        }

        for tag in find_tags(text) {
            out.push_str(&text[cursor..tag.range.start]);
            cursor = tag.range.end;

            if !self.recognizes(tag.name) {
                tracing::trace!("Stripping unrecognized tag <{}>", tag.name);
                continue;
            }

            match tag.kind {
                TagKind::Open => stack.push(OpenTag {
                    name: tag.name.to_string(),
                    start: out.len(),
                    first_run: runs.len(),
                    synthetic: false,
                }),
                TagKind::Close => self.close(tag.name, &mut stack, &mut out, &mut runs),
                TagKind::SelfClosing => {}
            }
        }
        out.push_str(&text[cursor..]);

        let unclosed = stack.iter().filter(|open| !open.synthetic).count();
        if unclosed > 0 {
            tracing::debug!("{} tags left open at end of input", unclosed);
        }
        if let Some(body) = stack.into_iter().find(|open| open.synthetic) {
            self.emit(body, &mut out, &mut runs);
        }

        Converted { text: out, runs }
    }

    fn close(&self, name: &str, stack: &mut Vec<OpenTag>, out: &mut String, runs: &mut Vec<Run>) {
        match stack.last() {
            Some(open) if open.name == name && !open.synthetic => {}
            Some(open) if open.name == name => {
                tracing::warn!("Ignoring </{}>, the implicit <{}> ends with the input", name, open.name);
                return;
            }
            Some(open) => {
                tracing::warn!("Ignoring </{}> while <{}> is open", name, open.name);
                return;
            }
            None => {
                tracing::warn!("Ignoring </{}> with no open tag", name);
                return;
            }
        }
        if let Some(open) = stack.pop() {
            self.emit(open, out, runs);
        }
    }

    /// Apply the tag's transform to its content and record its run.
    ///
    /// Runs of nested tags are moved to their place in the transformed text.
    fn emit(&self, open: OpenTag, out: &mut String, runs: &mut Vec<Run>) {
        let style = self.style_for(&open.name);

        if style.text_transform() != TextTransform::None {
            let (transformed, offsets) =
                transform_with_offsets(style.text_transform(), &out[open.start..]);

            if transformed.len() != out.len() - open.start {
                let rebase = |offset: usize| {
                    let idx = offsets
                        .partition_point(|&(old, _)| old < offset - open.start)
                        .min(offsets.len() - 1);
                    open.start + offsets[idx].1
                };
                for run in &mut runs[open.first_run..] {
                    let start = rebase(run.start);
                    run.length = rebase(run.end()) - start;
                    run.start = start;
                }
            }

            out.truncate(open.start);
            out.push_str(&transformed);
        }

        let length = out.len() - open.start;
        if length > 0 {
            runs.push(Run {
                start: open.start,
                length,
                style,
            });
        }
    }
}

fn resolve_override(
    table: &StyleTable,
    default_style: &StyleRecord,
    tag_override: &TagOverride,
    options: &ConvertOptions,
) -> Result<StyleRecord> {
    let tag = tag_override.tag.as_str();
    let mut style = match &tag_override.source {
        OverrideSource::Named(name) => table
            .get(name)
            .map(|style| style.renamed(tag))
            .ok_or_else(|| StyleError::UnresolvedSelector(name.clone()))?,
        OverrideSource::Css(css) => merge_single_rule(&mut StyleRecord::new(tag), css, true)?,
    };

    if options.merge_existing {
        match table.get(tag) {
            Some(existing) => style.merge(existing, false),
            None => style.merge(default_style, false),
        }
    }

    if style.font_family().is_none() {
        if let Some(font) = default_style.font_family() {
            style.set(PropertyId::FontFamily, PropertyValue::Text(font.to_string()))?;
        }
    }

    Ok(style)
}

/// Convert tagged text against a style table in one call
pub fn convert(
    table: &StyleTable,
    text: &str,
    default_selector: &str,
    overrides: Option<&[TagOverride]>,
    options: &ConvertOptions,
) -> Result<Converted> {
    let converter = Converter::new(table, default_selector, overrides, options)?;
    Ok(converter.convert(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use textstyle_css::{FontStyle, parse_styles};

    fn styles() -> StyleTable {
        parse_styles(
            "body { font-family: Georgia; color: #333; }
             i { font-style: italic; }
             p { color: #000; }
             em { text-transform: uppercase; }",
        )
        .unwrap()
    }

    #[test]
    fn test_single_tag() {
        let styles = styles();
        let result = convert(
            &styles,
            "Plain text with <i>emphasis</i> inside.",
            "body",
            None,
            &ConvertOptions::default(),
        )
        .unwrap();

        assert_eq!(result.text, "Plain text with emphasis inside.");
        assert_eq!(result.runs.len(), 1);
        let run = &result.runs[0];
        assert_eq!(result.run_text(run), "emphasis");
        assert_eq!(run.style.name(), "i");
        assert_eq!(run.style.font_style(), FontStyle::Italic);
        assert_eq!(run.style.color(), Some("#333"));
    }

    #[test]
    fn test_plain_text_fast_path() {
        let styles = styles();
        let result = convert(&styles, "no markup", "body", None, &ConvertOptions::default()).unwrap();
        assert_eq!(result.text, "no markup");
        assert!(result.runs.is_empty());
    }

    #[test]
    fn test_unknown_default_selector() {
        let styles = styles();
        let err = convert(&styles, "x", "missing", None, &ConvertOptions::default()).unwrap_err();
        assert_eq!(err, StyleError::UnresolvedSelector("missing".into()));
    }

    #[test]
    fn test_unknown_tags_stripped() {
        let styles = styles();
        let result = convert(&styles, "a<b>b</b>c<br/>d", "body", None, &ConvertOptions::default()).unwrap();
        assert_eq!(result.text, "abcd");
        assert!(result.runs.is_empty());
    }

    #[test]
    fn test_transform_applied_at_close() {
        let styles = styles();
        let result = convert(&styles, "say <em>hello there</em>!", "body", None, &ConvertOptions::default()).unwrap();
        assert_eq!(result.text, "say HELLO THERE!");
        assert_eq!(result.run_text(&result.runs[0]), "HELLO THERE");
    }

    #[test]
    fn test_unclosed_tag_has_no_run() {
        let styles = styles();
        let result = convert(&styles, "a <i>b <p>c</p>", "body", None, &ConvertOptions::default()).unwrap();
        assert_eq!(result.text, "a b c");
        assert_eq!(result.runs.len(), 1);
        assert_eq!(result.runs[0].style.name(), "p");
    }

    #[test]
    fn test_mismatched_close_ignored() {
        let styles = styles();
        let result = convert(&styles, "<i>a<p>b</i>c</p>", "body", None, &ConvertOptions::default()).unwrap();
        assert_eq!(result.text, "abc");
        assert_eq!(result.runs.len(), 1);
        assert_eq!(result.runs[0].style.name(), "p");
        assert_eq!(result.run_text(&result.runs[0]), "bc");
    }

    #[test]
    fn test_empty_tag_has_no_run() {
        let styles = styles();
        let result = convert(&styles, "a<i></i>b", "body", None, &ConvertOptions::default()).unwrap();
        assert_eq!(result.text, "ab");
        assert!(result.runs.is_empty());
    }

    #[test]
    fn test_overrides_wrap_body() {
        let styles = styles();
        let overrides = [TagOverride::css("spot", "spot { color: #f00; }")];
        let result = convert(&styles, "x <spot>y</spot>", "body", Some(&overrides), &ConvertOptions::default()).unwrap();

        assert_eq!(result.runs.len(), 2);
        let spot = &result.runs[0];
        let body = &result.runs[1];
        assert_eq!(spot.style.color(), Some("#f00"));
        assert_eq!(spot.style.font_family(), Some("Georgia"));
        assert_eq!(body.style.name(), "body");
        assert_eq!(body.range(), 0..result.text.len());
        assert!(body.contains(spot));
    }

    #[test]
    fn test_named_override() {
        let styles = styles();
        let overrides = [TagOverride::named("note", "i")];
        let converter = Converter::new(&styles, "body", Some(&overrides), &ConvertOptions::default()).unwrap();
        let note = converter.style_for("note");
        assert_eq!(note.name(), "note");
        assert_eq!(note.font_style(), FontStyle::Italic);
        assert_eq!(note.color(), Some("#333"));

        let missing = [TagOverride::named("note", "nope")];
        let err = Converter::new(&styles, "body", Some(&missing), &ConvertOptions::default()).unwrap_err();
        assert_eq!(err, StyleError::UnresolvedSelector("nope".into()));
    }

    #[test]
    fn test_exclude_existing_styles() {
        let styles = styles();
        let options = ConvertOptions {
            include_existing: false,
            ..ConvertOptions::default()
        };
        let overrides = [TagOverride::css("spot", "spot { color: #f00; }")];
        let converter = Converter::new(&styles, "body", Some(&overrides), &options).unwrap();
        assert!(converter.recognizes("spot"));
        assert!(converter.recognizes("body"));
        assert!(!converter.recognizes("i"));
    }

    #[test]
    fn test_no_merge_keeps_override_bare() {
        let styles = styles();
        let options = ConvertOptions {
            merge_existing: false,
            ..ConvertOptions::default()
        };
        let overrides = [TagOverride::css("spot", "spot { lines: 1; }")];
        let converter = Converter::new(&styles, "body", Some(&overrides), &options).unwrap();
        let spot = converter.style_for("spot");
        assert_eq!(spot.color(), None);
        assert_eq!(spot.font_family(), Some("Georgia"));
    }
}
