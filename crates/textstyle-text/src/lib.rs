//! textstyle Text - Styled Runs from Tagged Text
//!
//! This crate turns text with inline markup into plain text plus styled runs:
//! - Tag recognition (`<i>`, `</p>`, `<spot attr="x"/>`)
//! - Text transforms (uppercase, lowercase, capitalize)
//! - Stack-based tag to run conversion against a [`StyleTable`]

pub mod tags;
pub mod transform;
pub mod convert;

pub use tags::{Tag, TagKind, find_tags, looks_like_markup};
pub use transform::{apply_text_transform, transform_for_style, transform_with_offsets};
pub use convert::{ConvertOptions, Converted, Converter, OverrideSource, Run, TagOverride, convert};

pub use textstyle_css::{Result, StyleError, StyleRecord, StyleTable};
