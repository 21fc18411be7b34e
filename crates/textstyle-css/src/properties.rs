//! Text Style Property Definitions
//!
//! The supported CSS properties, their value kinds and keyword tables.
//! Raw declaration text is coerced here into typed [`PropertyValue`]s.

use crate::{Result, StyleError};

/// Property identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PropertyId {
    // Font
    FontFamily,
    FontSize,
    FontStyle,
    FontWeight,

    // Colors
    Color,
    BackgroundColor,
    TextDecorationColor,

    // Spacing
    LetterSpacing,
    LineHeight,
    TextIndent,

    // Box
    Padding,
    PaddingTop,
    PaddingRight,
    PaddingBottom,
    PaddingLeft,

    // Text
    TextAlign,
    TextDecoration,
    TextTransform,
    TextOverflow,

    // Custom
    Lines,
}

/// How a raw declaration value is coerced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Stored verbatim after trimming and quote removal
    String,
    /// Number with an optional `px` suffix; anything else is an error
    Float,
    /// Whitespace/comma separated numbers; bad tokens become zero
    FloatList,
    /// Integer; bad input leaves the property unset
    Integer,
    /// Keyword from the property's enum table; unknown keywords are an error
    Keyword,
}

/// One entry of the property registry
#[derive(Debug, Clone, Copy)]
pub struct PropertyDef {
    pub name: &'static str,
    pub id: PropertyId,
    pub kind: ValueKind,
}

const fn def(name: &'static str, id: PropertyId, kind: ValueKind) -> PropertyDef {
    PropertyDef { name, id, kind }
}

/// Every property a [`StyleRecord`](crate::StyleRecord) understands, in
/// serialization order.
pub static PROPERTIES: &[PropertyDef] = &[
    def("font-family", PropertyId::FontFamily, ValueKind::String),
    def("font-size", PropertyId::FontSize, ValueKind::Float),
    def("font-style", PropertyId::FontStyle, ValueKind::Keyword),
    def("font-weight", PropertyId::FontWeight, ValueKind::Keyword),
    def("color", PropertyId::Color, ValueKind::String),
    def("letter-spacing", PropertyId::LetterSpacing, ValueKind::Float),
    def("line-height", PropertyId::LineHeight, ValueKind::Float),
    def("text-align", PropertyId::TextAlign, ValueKind::Keyword),
    def("text-decoration", PropertyId::TextDecoration, ValueKind::Keyword),
    def("text-indent", PropertyId::TextIndent, ValueKind::Float),
    def("text-overflow", PropertyId::TextOverflow, ValueKind::Keyword),
    def("text-transform", PropertyId::TextTransform, ValueKind::Keyword),
    def("background-color", PropertyId::BackgroundColor, ValueKind::String),
    def("padding", PropertyId::Padding, ValueKind::FloatList),
    def("padding-bottom", PropertyId::PaddingBottom, ValueKind::Float),
    def("padding-left", PropertyId::PaddingLeft, ValueKind::Float),
    def("padding-right", PropertyId::PaddingRight, ValueKind::Float),
    def("padding-top", PropertyId::PaddingTop, ValueKind::Float),
    def("lines", PropertyId::Lines, ValueKind::Integer),
    def("text-decoration-color", PropertyId::TextDecorationColor, ValueKind::String),
];

impl PropertyId {
    /// Parse a property name into a PropertyId
    pub fn from_name(name: &str) -> Option<Self> {
        PROPERTIES.iter().find(|def| def.name == name).map(|def| def.id)
    }

    fn definition(self) -> &'static PropertyDef {
        // Every id has exactly one registry entry.
        PROPERTIES
            .iter()
            .find(|def| def.id == self)
            .unwrap_or(&PROPERTIES[0])
    }

    /// CSS-facing name
    pub fn name(self) -> &'static str {
        self.definition().name
    }

    pub fn kind(self) -> ValueKind {
        self.definition().kind
    }

    /// Properties whose unset state is a real variant (`left`/`none`).
    ///
    /// For these a non-default source value always wins a merge.
    pub fn is_neutral_default(self) -> bool {
        matches!(
            self,
            Self::TextAlign | Self::TextDecoration | Self::TextOverflow | Self::TextTransform
        )
    }

    /// Coerce a raw declaration value into a typed value.
    ///
    /// `Ok(None)` means the value was soft-rejected and the property should be
    /// left alone.
    pub fn coerce(self, raw: &str) -> Result<Option<PropertyValue>> {
        let cleaned = clean_value(raw);
        let value = match self.kind() {
            ValueKind::String => PropertyValue::Text(cleaned),
            ValueKind::Float => PropertyValue::Number(parse_float(&cleaned).ok_or_else(|| {
                StyleError::Coercion {
                    property: self.name().to_string(),
                    value: raw.trim().to_string(),
                }
            })?),
            ValueKind::FloatList => PropertyValue::Numbers(parse_float_list(&cleaned)),
            ValueKind::Integer => match cleaned.parse::<i32>() {
                Ok(n) => PropertyValue::Integer(n),
                Err(_) => {
                    tracing::debug!("Ignoring non-integer value '{}' for {}", cleaned, self.name());
                    return Ok(None);
                }
            },
            ValueKind::Keyword => self.coerce_keyword(&cleaned).ok_or_else(|| {
                StyleError::Coercion {
                    property: self.name().to_string(),
                    value: cleaned.clone(),
                }
            })?,
        };
        Ok(Some(value))
    }

    fn coerce_keyword(self, keyword: &str) -> Option<PropertyValue> {
        Some(match self {
            Self::FontStyle => PropertyValue::FontStyle(FontStyle::from_keyword(keyword)?),
            Self::FontWeight => PropertyValue::FontWeight(FontWeight::from_keyword(keyword)?),
            Self::TextAlign => PropertyValue::TextAlign(TextAlign::from_keyword(keyword)?),
            Self::TextDecoration => {
                PropertyValue::TextDecoration(TextDecoration::from_keyword(keyword)?)
            }
            Self::TextTransform => {
                PropertyValue::TextTransform(TextTransform::from_keyword(keyword)?)
            }
            Self::TextOverflow => PropertyValue::TextOverflow(TextOverflow::from_keyword(keyword)?),
            _ => return None,
        })
    }
}

/// Strip double quotes anywhere and single quotes around the value.
fn clean_value(raw: &str) -> String {
    raw.replace('"', "").trim().trim_matches('\'').trim().to_string()
}

fn parse_float(value: &str) -> Option<f32> {
    value
        .replace("px", "")
        .trim()
        .parse::<f32>()
        .ok()
        .filter(|n| n.is_finite())
}

fn parse_float_list(value: &str) -> Vec<f32> {
    value
        .split([' ', ',', '\t', '\n'])
        .filter(|part| !part.is_empty())
        .map(|part| parse_float(part).unwrap_or(0.0))
        .collect()
}

/// Typed property value
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Text(String),
    Number(f32),
    Numbers(Vec<f32>),
    Integer(i32),
    FontStyle(FontStyle),
    FontWeight(FontWeight),
    TextAlign(TextAlign),
    TextDecoration(TextDecoration),
    TextTransform(TextTransform),
    TextOverflow(TextOverflow),
}

impl PropertyValue {
    /// CSS text for this value as written by the serializer
    pub fn to_css(&self, property: PropertyId) -> String {
        match self {
            Self::Text(text) if text.starts_with('#') => text.clone(),
            Self::Text(text) => format!("'{}'", text),
            Self::Number(n) if property == PropertyId::FontSize => format!("{}px", n),
            Self::Number(n) => n.to_string(),
            Self::Numbers(list) => list
                .iter()
                .map(|n| n.to_string())
                .collect::<Vec<_>>()
                .join(" "),
            Self::Integer(n) => n.to_string(),
            Self::FontStyle(v) => v.keyword().to_string(),
            Self::FontWeight(v) => v.keyword().to_string(),
            Self::TextAlign(v) => v.keyword().to_string(),
            Self::TextDecoration(v) => v.keyword().to_string(),
            Self::TextTransform(v) => v.keyword().to_string(),
            Self::TextOverflow(v) => v.keyword().to_string(),
        }
    }
}

/// Enum with a fixed CSS keyword table.
///
/// The first entry for a variant is its canonical spelling.
pub trait Keyword: Sized + Copy + PartialEq + Default + 'static {
    const KEYWORDS: &'static [(&'static str, Self)];

    fn from_keyword(keyword: &str) -> Option<Self> {
        let keyword = keyword.trim();
        Self::KEYWORDS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(keyword))
            .map(|(_, value)| *value)
    }

    fn keyword(self) -> &'static str {
        Self::KEYWORDS
            .iter()
            .find(|(_, value)| *value == self)
            .map(|(name, _)| *name)
            .unwrap_or("")
    }

    fn is_default(self) -> bool {
        self == Self::default()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

impl Keyword for FontStyle {
    const KEYWORDS: &'static [(&'static str, Self)] =
        &[("normal", Self::Normal), ("italic", Self::Italic)];
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

impl Keyword for FontWeight {
    const KEYWORDS: &'static [(&'static str, Self)] =
        &[("normal", Self::Normal), ("bold", Self::Bold)];
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TextAlign {
    #[default]
    Left,
    Right,
    Center,
    Justified,
}

impl Keyword for TextAlign {
    const KEYWORDS: &'static [(&'static str, Self)] = &[
        ("left", Self::Left),
        ("right", Self::Right),
        ("center", Self::Center),
        ("justified", Self::Justified),
        ("justify", Self::Justified),
    ];
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TextDecoration {
    #[default]
    None,
    Underline,
    LineThrough,
}

impl Keyword for TextDecoration {
    const KEYWORDS: &'static [(&'static str, Self)] = &[
        ("none", Self::None),
        ("underline", Self::Underline),
        ("line-through", Self::LineThrough),
    ];
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TextTransform {
    #[default]
    None,
    Capitalize,
    UpperCase,
    LowerCase,
}

impl Keyword for TextTransform {
    const KEYWORDS: &'static [(&'static str, Self)] = &[
        ("none", Self::None),
        ("capitalize", Self::Capitalize),
        ("uppercase", Self::UpperCase),
        ("lowercase", Self::LowerCase),
    ];
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TextOverflow {
    #[default]
    None,
    Clip,
    Ellipsis,
}

impl Keyword for TextOverflow {
    const KEYWORDS: &'static [(&'static str, Self)] = &[
        ("none", Self::None),
        ("clip", Self::Clip),
        ("ellipsis", Self::Ellipsis),
    ];
}
