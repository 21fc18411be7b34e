//! Style Table Builder
//!
//! Applies parsed rules onto [`StyleRecord`]s keyed by selector name.

use std::collections::BTreeMap;

use crate::properties::PropertyId;
use crate::style::StyleRecord;
use crate::{CssParser, Result, Rule, StyleError};

/// Selector name to style record mapping.
///
/// Selector names are case-sensitive: `H1` and `h1` are distinct entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleTable {
    styles: BTreeMap<String, StyleRecord>,
}

impl StyleTable {
    pub fn new() -> Self {
        Self {
            styles: BTreeMap::new(),
        }
    }

    pub fn get(&self, selector: &str) -> Option<&StyleRecord> {
        self.styles.get(selector)
    }

    pub fn get_mut(&mut self, selector: &str) -> Option<&mut StyleRecord> {
        self.styles.get_mut(selector)
    }

    pub fn contains(&self, selector: &str) -> bool {
        self.styles.contains_key(selector)
    }

    /// Insert a record under its own name, replacing any previous entry
    pub fn insert(&mut self, record: StyleRecord) -> Option<StyleRecord> {
        self.styles.insert(record.name().to_string(), record)
    }

    /// Get the record for a selector, creating an empty one if missing
    pub fn entry(&mut self, selector: &str) -> &mut StyleRecord {
        self.styles
            .entry(selector.to_string())
            .or_insert_with(|| StyleRecord::new(selector))
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// Selector names, sorted
    pub fn selectors(&self) -> impl Iterator<Item = &str> + '_ {
        self.styles.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StyleRecord> + '_ {
        self.styles.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut StyleRecord> + '_ {
        self.styles.values_mut()
    }

    /// The whole table written back out as CSS, one rule per line
    pub fn to_css_string(&self) -> String {
        self.styles
            .iter()
            .map(|(name, record)| crate::to_css_string(name, record))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Build a style table from parsed rules.
///
/// Later rules for the same selector add to (and override) earlier ones.
pub fn build(rules: &[Rule]) -> Result<StyleTable> {
    let mut table = StyleTable::new();

    for rule in rules {
        for selector in &rule.selectors {
            let record = table.entry(selector);
            apply_rule(record, rule)?;
        }
    }

    tracing::debug!("Built style table with {} selectors", table.len());
    Ok(table)
}

fn apply_rule(record: &mut StyleRecord, rule: &Rule) -> Result<()> {
    for decl in &rule.declarations {
        apply_declaration(record, &decl.property, &decl.value)?;
    }
    Ok(())
}

/// Apply one raw declaration to a record.
///
/// Unknown properties are ignored. Returns whether the record changed.
pub fn apply_declaration(record: &mut StyleRecord, property: &str, raw_value: &str) -> Result<bool> {
    let Some(id) = PropertyId::from_name(property) else {
        tracing::trace!("Ignoring unknown property '{}' on {}", property, record.name());
        return Ok(false);
    };

    match id.coerce(raw_value)? {
        Some(value) => {
            record.set(id, value)?;
            record.append_raw_css(property, raw_value);
            Ok(true)
        }
        None => Ok(false),
    }
}

/// Merge a single CSS rule into `target`.
///
/// The rule's selector is ignored; only its declarations are applied. With
/// `clone` the target is left untouched and the merged copy returned,
/// otherwise the target is updated as well. Nothing is modified on error.
pub fn merge_single_rule(target: &mut StyleRecord, css: &str, clone: bool) -> Result<StyleRecord> {
    let stylesheet = CssParser::new().parse(css)?;
    let [rule] = stylesheet.rules.as_slice() else {
        return Err(StyleError::MultipleRules {
            count: stylesheet.len(),
        });
    };

    let mut merged = target.clone();
    apply_rule(&mut merged, rule)?;

    if !clone {
        *target = merged.clone();
    }
    Ok(merged)
}
