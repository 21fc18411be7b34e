//! Style record to CSS text

use crate::properties::PROPERTIES;
use crate::style::StyleRecord;

/// Write the set properties of a record as a single CSS rule.
///
/// Keyword properties holding their default (`normal`, `none`, `left`) are
/// left out, as they can't be told apart from unset ones.
pub fn to_css_string(tag_name: &str, style: &StyleRecord) -> String {
    let mut css = String::with_capacity(64);
    css.push_str(tag_name);
    css.push('{');

    for def in PROPERTIES {
        if let Some(value) = style.get(def.id) {
            css.push_str(def.name);
            css.push(':');
            css.push_str(&value.to_css(def.id));
            css.push(';');
        }
    }

    css.push('}');
    css
}
