//! Engine Configuration

use serde::{Deserialize, Serialize};
use textstyle_text::ConvertOptions;

use crate::{EngineError, Result};

/// Engine configuration options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Font size given to styles without a usable one
    pub default_text_size: f32,

    /// Apply `default_text_size` when installing a style table
    pub normalize_font_size: bool,

    /// Implicit outermost tag when conversions pass overrides
    pub body_tag: String,

    /// Layer override styles over existing stylesheet entries
    pub merge_existing_styles: bool,

    /// Keep stylesheet selectors recognized alongside overrides
    pub include_existing_styles: bool,
}

impl Config {
    /// Check the configuration for values the engine can't use
    pub fn validate(&self) -> Result<()> {
        if !self.default_text_size.is_finite() || self.default_text_size <= 0.0 {
            return Err(EngineError::Config(format!(
                "default_text_size must be positive, got {}",
                self.default_text_size
            )));
        }

        if self.body_tag.is_empty()
            || !self.body_tag.chars().all(|c| c.is_alphanumeric() || c == '_')
        {
            return Err(EngineError::Config(format!(
                "body_tag must be a tag name, got '{}'",
                self.body_tag
            )));
        }

        Ok(())
    }

    /// Per-call conversion options
    pub fn convert_options(&self) -> ConvertOptions {
        ConvertOptions {
            merge_existing: self.merge_existing_styles,
            include_existing: self.include_existing_styles,
            body_tag: self.body_tag.clone(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_text_size: 18.0,
            normalize_font_size: false,
            body_tag: "body".to_string(),
            merge_existing_styles: true,
            include_existing_styles: true,
        }
    }
}
