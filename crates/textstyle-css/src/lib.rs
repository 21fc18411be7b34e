//! textstyle CSS Parser & Style System
//!
//! Turns a small CSS dialect into named, typed text style records:
//! - [`CssParser`] splits source text into rules of raw declarations
//! - [`StyleRecord`] holds the typed properties of one selector
//! - [`StyleTable`] maps selector names to records
//! - [`to_css_string`] writes a record back out as a single rule

mod parser;
mod builder;
mod serialize;
pub mod properties;
pub mod style;

pub use parser::CssParser;
pub use builder::{StyleTable, apply_declaration, build, merge_single_rule};
pub use serialize::to_css_string;
pub use properties::{
    FontStyle, FontWeight, Keyword, PropertyDef, PropertyId, PropertyValue, TextAlign,
    TextDecoration, TextOverflow, TextTransform, ValueKind, PROPERTIES,
};
pub use style::StyleRecord;

/// Parse a CSS stylesheet
pub fn parse_stylesheet(css: &str) -> Result<Stylesheet> {
    CssParser::new().parse(css)
}

/// Parse a stylesheet and build its style table in one step
pub fn parse_styles(css: &str) -> Result<StyleTable> {
    let stylesheet = parse_stylesheet(css)?;
    build(&stylesheet.rules)
}

/// Parsed stylesheet
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Stylesheet {
    pub rules: Vec<Rule>,
}

impl Stylesheet {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Number of rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// CSS rule (selector list + declarations)
///
/// Every selector in the list shares the same declarations.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub selectors: Vec<String>,
    pub declarations: Vec<Declaration>,
}

/// CSS declaration (property: value), kept as raw text
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub property: String,
    pub value: String,
}

impl Declaration {
    pub fn new(property: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            value: value.into(),
        }
    }
}

/// Errors raised while parsing, building or applying styles
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StyleError {
    #[error("Parse error at line {line}: {message}")]
    Parse { line: u32, message: String },

    #[error("Invalid value '{value}' for property '{property}'")]
    Coercion { property: String, value: String },

    #[error("Expected exactly one rule, found {count}")]
    MultipleRules { count: usize },

    #[error("Style not found: {0}")]
    UnresolvedSelector(String),

    #[error("Invalid range {start}..{end} for text of length {len}")]
    InvalidRange { start: usize, end: usize, len: usize },
}

pub type Result<T> = std::result::Result<T, StyleError>;
