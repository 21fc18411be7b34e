//! TextStyle - Main entry point
//!
//! Owns the active style table. Replacing the table bumps a generation
//! counter and notifies subscribed observers with the new table.

use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use textstyle_css::{PropertyId, PropertyValue, StyleError, StyleRecord, StyleTable};
use textstyle_text::{Converted, Run, TagOverride, looks_like_markup, transform_for_style};

use crate::{Config, Result};

type Observer = Box<dyn FnMut(&StyleTable) + Send>;

/// Handle returned by [`TextStyle::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

/// Styling context: the active stylesheet and its observers
pub struct TextStyle {
    config: Config,
    styles: Arc<StyleTable>,
    generation: u64,
    observers: Vec<(ObserverId, Observer)>,
    next_observer: u64,
}

impl TextStyle {
    /// Create a context with the default configuration and no styles
    pub fn new() -> Self {
        Self::build(Config::default())
    }

    /// Create a context with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: Config) -> Self {
        tracing::debug!("textstyle {} context created", crate::VERSION);
        Self {
            config,
            styles: Arc::new(StyleTable::new()),
            generation: 0,
            observers: Vec::new(),
            next_observer: 0,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Parse `css` and make it the active stylesheet.
    ///
    /// On error the previous table stays active and observers aren't called.
    pub fn set_stylesheet(&mut self, css: &str) -> Result<()> {
        let stylesheet = textstyle_css::parse_stylesheet(css)?;
        let table = textstyle_css::build(&stylesheet.rules)?;

        tracing::info!(
            "Loaded stylesheet: {} rules, {} selectors",
            stylesheet.len(),
            table.len()
        );
        self.set_styles(table)
    }

    /// Install a prebuilt style table
    pub fn set_styles(&mut self, mut table: StyleTable) -> Result<()> {
        if self.config.normalize_font_size {
            normalize_font_sizes(&mut table, self.config.default_text_size)?;
        }

        self.styles = Arc::new(table);
        self.changed();
        Ok(())
    }

    /// Snapshot of the active table
    pub fn styles(&self) -> Arc<StyleTable> {
        Arc::clone(&self.styles)
    }

    pub fn get_style(&self, selector: &str) -> Option<&StyleRecord> {
        self.styles.get(selector)
    }

    /// Number of times the table has been replaced or modified
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Convert tagged text into plain text and styled runs
    pub fn convert(
        &self,
        text: &str,
        default_selector: &str,
        overrides: Option<&[TagOverride]>,
    ) -> Result<Converted> {
        let options = self.config.convert_options();
        let converted =
            textstyle_text::convert(&self.styles, text, default_selector, overrides, &options)?;
        Ok(converted)
    }

    /// Style `text` with a single selector.
    ///
    /// The selector's text transform is applied first. Text that contains
    /// markup is converted with the selector as default; otherwise one run
    /// covers `range`, or the whole text when no range is given.
    pub fn styled_string(
        &self,
        selector: &str,
        text: &str,
        range: Option<Range<usize>>,
    ) -> Result<Converted> {
        let style = self
            .get_style(selector)
            .ok_or_else(|| StyleError::UnresolvedSelector(selector.to_string()))?;
        let text = transform_for_style(style, text);

        if looks_like_markup(&text) {
            return self.convert(&text, selector, None);
        }

        let range = range.unwrap_or(0..text.len());
        if range.start >= range.end
            || range.end > text.len()
            || !text.is_char_boundary(range.start)
            || !text.is_char_boundary(range.end)
        {
            return Err(StyleError::InvalidRange {
                start: range.start,
                end: range.end,
                len: text.len(),
            }
            .into());
        }

        let run = Run {
            start: range.start,
            length: range.len(),
            style: Arc::new(style.clone()),
        };
        Ok(Converted {
            text,
            runs: vec![run],
        })
    }

    /// Merge one inline CSS rule into the style for `selector`.
    ///
    /// With `clone` the table is left alone and the merged copy returned.
    /// Otherwise the table entry is updated and observers are notified.
    pub fn merge_single_rule(&mut self, selector: &str, css: &str, clone: bool) -> Result<StyleRecord> {
        if clone {
            let mut target = self
                .get_style(selector)
                .cloned()
                .ok_or_else(|| StyleError::UnresolvedSelector(selector.to_string()))?;
            return Ok(textstyle_css::merge_single_rule(&mut target, css, true)?);
        }

        let table = Arc::make_mut(&mut self.styles);
        let target = table
            .get_mut(selector)
            .ok_or_else(|| StyleError::UnresolvedSelector(selector.to_string()))?;
        let merged = textstyle_css::merge_single_rule(target, css, false)?;

        self.changed();
        Ok(merged)
    }

    /// The style for `selector` written out as a single CSS rule
    pub fn to_css_string(&self, selector: &str) -> Result<String> {
        let style = self
            .get_style(selector)
            .ok_or_else(|| StyleError::UnresolvedSelector(selector.to_string()))?;
        Ok(textstyle_css::to_css_string(selector, style))
    }

    /// Call `observer` with the new table every time it changes
    pub fn subscribe<F>(&mut self, observer: F) -> ObserverId
    where
        F: FnMut(&StyleTable) + Send + 'static,
    {
        let id = ObserverId(self.next_observer);
        self.next_observer += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Remove an observer. Returns false if it was already gone.
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(observer_id, _)| *observer_id != id);
        self.observers.len() != before
    }

    fn changed(&mut self) {
        self.generation += 1;
        tracing::debug!(
            "Styles changed (generation {}), notifying {} observers",
            self.generation,
            self.observers.len()
        );

        let styles = Arc::clone(&self.styles);
        for (_, observer) in &mut self.observers {
            observer(styles.as_ref());
        }
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TextStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextStyle")
            .field("config", &self.config)
            .field("styles", &self.styles.len())
            .field("generation", &self.generation)
            .field("observers", &self.observers.len())
            .finish()
    }
}

fn normalize_font_sizes(table: &mut StyleTable, size: f32) -> Result<()> {
    for record in table.iter_mut() {
        if record.font_size().is_none_or(|s| s <= 0.0) {
            record.set(PropertyId::FontSize, PropertyValue::Number(size))?;
        }
    }
    Ok(())
}
