//! Style Record & Merge
//!
//! A [`StyleRecord`] is the resolved set of text properties for one selector.
//! Every property is optional; the merge rules below decide how two records
//! combine when a tag style is layered over a default style.

use crate::properties::{
    FontStyle, FontWeight, Keyword, PropertyId, PropertyValue, TextAlign, TextDecoration,
    TextOverflow, TextTransform, PROPERTIES,
};
use crate::{Result, StyleError};

/// Typed, named bag of text styling properties
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleRecord {
    name: String,

    font_family: Option<String>,
    font_size: Option<f32>,
    font_style: FontStyle,
    font_weight: FontWeight,

    color: Option<String>,
    background_color: Option<String>,
    text_decoration_color: Option<String>,

    letter_spacing: Option<f32>,
    line_height: Option<f32>,
    text_indent: Option<f32>,

    padding: Option<Vec<f32>>,
    padding_top: Option<f32>,
    padding_right: Option<f32>,
    padding_bottom: Option<f32>,
    padding_left: Option<f32>,

    text_align: TextAlign,
    text_decoration: TextDecoration,
    text_transform: TextTransform,
    text_overflow: TextOverflow,

    lines: Option<i32>,
    raw_css: String,
}

impl StyleRecord {
    /// Create an empty record for a selector
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Selector name this record belongs to
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Copy of this record under another selector name
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }

    pub fn font_family(&self) -> Option<&str> {
        self.font_family.as_deref()
    }

    pub fn font_size(&self) -> Option<f32> {
        self.font_size
    }

    pub fn font_style(&self) -> FontStyle {
        self.font_style
    }

    pub fn font_weight(&self) -> FontWeight {
        self.font_weight
    }

    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    pub fn background_color(&self) -> Option<&str> {
        self.background_color.as_deref()
    }

    pub fn text_decoration_color(&self) -> Option<&str> {
        self.text_decoration_color.as_deref()
    }

    pub fn letter_spacing(&self) -> Option<f32> {
        self.letter_spacing
    }

    pub fn line_height(&self) -> Option<f32> {
        self.line_height
    }

    pub fn text_indent(&self) -> Option<f32> {
        self.text_indent
    }

    /// Padding shorthand, as written
    pub fn padding(&self) -> Option<&[f32]> {
        self.padding.as_deref()
    }

    pub fn padding_top(&self) -> Option<f32> {
        self.padding_top
    }

    pub fn padding_right(&self) -> Option<f32> {
        self.padding_right
    }

    pub fn padding_bottom(&self) -> Option<f32> {
        self.padding_bottom
    }

    pub fn padding_left(&self) -> Option<f32> {
        self.padding_left
    }

    pub fn text_align(&self) -> TextAlign {
        self.text_align
    }

    pub fn text_decoration(&self) -> TextDecoration {
        self.text_decoration
    }

    pub fn text_transform(&self) -> TextTransform {
        self.text_transform
    }

    pub fn text_overflow(&self) -> TextOverflow {
        self.text_overflow
    }

    /// Maximum number of lines
    pub fn lines(&self) -> Option<i32> {
        self.lines
    }

    /// Declarations applied to this record, for diagnostics
    pub fn raw_css(&self) -> &str {
        &self.raw_css
    }

    /// Font size minus line height; used by renderers to offset frames
    pub fn line_height_offset(&self) -> f32 {
        self.font_size.unwrap_or(0.0) - self.line_height.unwrap_or(0.0)
    }

    /// Whether a plain text surface can't express this style without spans
    pub fn requires_markup(&self) -> bool {
        self.text_decoration != TextDecoration::None
            || self.letter_spacing.is_some_and(|s| s.abs() > 0.0)
            || self.font_style == FontStyle::Italic
            || self.font_weight == FontWeight::Bold
    }

    /// True when no property is set
    pub fn is_empty(&self) -> bool {
        PROPERTIES.iter().all(|def| self.get(def.id).is_none())
    }

    /// Current value of a property, `None` when unset.
    ///
    /// Keyword properties report their default variant as unset.
    pub fn get(&self, id: PropertyId) -> Option<PropertyValue> {
        match id {
            PropertyId::FontFamily => self.font_family.clone().map(PropertyValue::Text),
            PropertyId::FontSize => self.font_size.map(PropertyValue::Number),
            PropertyId::FontStyle => keyword_value(self.font_style, PropertyValue::FontStyle),
            PropertyId::FontWeight => keyword_value(self.font_weight, PropertyValue::FontWeight),
            PropertyId::Color => self.color.clone().map(PropertyValue::Text),
            PropertyId::BackgroundColor => self.background_color.clone().map(PropertyValue::Text),
            PropertyId::TextDecorationColor => {
                self.text_decoration_color.clone().map(PropertyValue::Text)
            }
            PropertyId::LetterSpacing => self.letter_spacing.map(PropertyValue::Number),
            PropertyId::LineHeight => self.line_height.map(PropertyValue::Number),
            PropertyId::TextIndent => self.text_indent.map(PropertyValue::Number),
            PropertyId::Padding => self.padding.clone().map(PropertyValue::Numbers),
            PropertyId::PaddingTop => self.padding_top.map(PropertyValue::Number),
            PropertyId::PaddingRight => self.padding_right.map(PropertyValue::Number),
            PropertyId::PaddingBottom => self.padding_bottom.map(PropertyValue::Number),
            PropertyId::PaddingLeft => self.padding_left.map(PropertyValue::Number),
            PropertyId::TextAlign => keyword_value(self.text_align, PropertyValue::TextAlign),
            PropertyId::TextDecoration => {
                keyword_value(self.text_decoration, PropertyValue::TextDecoration)
            }
            PropertyId::TextTransform => {
                keyword_value(self.text_transform, PropertyValue::TextTransform)
            }
            PropertyId::TextOverflow => {
                keyword_value(self.text_overflow, PropertyValue::TextOverflow)
            }
            PropertyId::Lines => self.lines.map(PropertyValue::Integer),
        }
    }

    /// Set a property from a typed value.
    ///
    /// Fails when the value's type doesn't belong to the property.
    pub fn set(&mut self, id: PropertyId, value: PropertyValue) -> Result<()> {
        match (id, value) {
            (PropertyId::FontFamily, PropertyValue::Text(v)) => self.font_family = Some(v),
            (PropertyId::FontSize, PropertyValue::Number(v)) => self.font_size = Some(v),
            (PropertyId::FontStyle, PropertyValue::FontStyle(v)) => self.font_style = v,
            (PropertyId::FontWeight, PropertyValue::FontWeight(v)) => self.font_weight = v,
            (PropertyId::Color, PropertyValue::Text(v)) => self.color = Some(v),
            (PropertyId::BackgroundColor, PropertyValue::Text(v)) => {
                self.background_color = Some(v)
            }
            (PropertyId::TextDecorationColor, PropertyValue::Text(v)) => {
                self.text_decoration_color = Some(v)
            }
            (PropertyId::LetterSpacing, PropertyValue::Number(v)) => self.letter_spacing = Some(v),
            (PropertyId::LineHeight, PropertyValue::Number(v)) => self.line_height = Some(v),
            (PropertyId::TextIndent, PropertyValue::Number(v)) => self.text_indent = Some(v),
            (PropertyId::Padding, PropertyValue::Numbers(v)) => self.padding = Some(v),
            (PropertyId::PaddingTop, PropertyValue::Number(v)) => self.padding_top = Some(v),
            (PropertyId::PaddingRight, PropertyValue::Number(v)) => self.padding_right = Some(v),
            (PropertyId::PaddingBottom, PropertyValue::Number(v)) => self.padding_bottom = Some(v),
            (PropertyId::PaddingLeft, PropertyValue::Number(v)) => self.padding_left = Some(v),
            (PropertyId::TextAlign, PropertyValue::TextAlign(v)) => self.text_align = v,
            (PropertyId::TextDecoration, PropertyValue::TextDecoration(v)) => {
                self.text_decoration = v
            }
            (PropertyId::TextTransform, PropertyValue::TextTransform(v)) => {
                self.text_transform = v
            }
            (PropertyId::TextOverflow, PropertyValue::TextOverflow(v)) => self.text_overflow = v,
            (PropertyId::Lines, PropertyValue::Integer(v)) => self.lines = Some(v),
            (id, value) => {
                return Err(StyleError::Coercion {
                    property: id.name().to_string(),
                    value: value.to_css(id),
                });
            }
        }
        Ok(())
    }

    /// Reset a property to its unset state
    pub fn clear(&mut self, id: PropertyId) {
        match id {
            PropertyId::FontFamily => self.font_family = None,
            PropertyId::FontSize => self.font_size = None,
            PropertyId::FontStyle => self.font_style = FontStyle::default(),
            PropertyId::FontWeight => self.font_weight = FontWeight::default(),
            PropertyId::Color => self.color = None,
            PropertyId::BackgroundColor => self.background_color = None,
            PropertyId::TextDecorationColor => self.text_decoration_color = None,
            PropertyId::LetterSpacing => self.letter_spacing = None,
            PropertyId::LineHeight => self.line_height = None,
            PropertyId::TextIndent => self.text_indent = None,
            PropertyId::Padding => self.padding = None,
            PropertyId::PaddingTop => self.padding_top = None,
            PropertyId::PaddingRight => self.padding_right = None,
            PropertyId::PaddingBottom => self.padding_bottom = None,
            PropertyId::PaddingLeft => self.padding_left = None,
            PropertyId::TextAlign => self.text_align = TextAlign::default(),
            PropertyId::TextDecoration => self.text_decoration = TextDecoration::default(),
            PropertyId::TextTransform => self.text_transform = TextTransform::default(),
            PropertyId::TextOverflow => self.text_overflow = TextOverflow::default(),
            PropertyId::Lines => self.lines = None,
        }
    }

    pub(crate) fn append_raw_css(&mut self, property: &str, value: &str) {
        self.raw_css.push_str(property);
        self.raw_css.push(':');
        self.raw_css.push_str(value.trim());
        self.raw_css.push(';');
    }

    /// Merge another record's set properties into this one.
    ///
    /// Unset source properties never change anything. Without
    /// `overwrite_existing`, properties already set here are kept, except for
    /// text-align, text-decoration, text-overflow and text-transform: a source
    /// value other than their default always replaces the current one.
    pub fn merge(&mut self, source: &StyleRecord, overwrite_existing: bool) {
        for def in PROPERTIES {
            let Some(value) = source.get(def.id) else {
                continue;
            };

            if !overwrite_existing && !def.id.is_neutral_default() && self.get(def.id).is_some() {
                continue;
            }

            // Both sides come from the same registry entry, so the kinds agree.
            if let Err(err) = self.set(def.id, value) {
                tracing::warn!("Skipping merge of {}: {}", def.name, err);
            }
        }
    }

    /// Merged copy of `self` layered over `base`
    pub fn cascade_over(&self, base: &StyleRecord) -> StyleRecord {
        let mut merged = self.clone();
        merged.merge(base, false);
        merged
    }
}

fn keyword_value<K: Keyword>(value: K, wrap: fn(K) -> PropertyValue) -> Option<PropertyValue> {
    if value.is_default() {
        None
    } else {
        Some(wrap(value))
    }
}
