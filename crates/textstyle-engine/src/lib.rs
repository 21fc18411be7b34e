//! textstyle
//!
//! Styles inline-tagged text with a small CSS dialect.
//!
//! # Example
//! ```rust
//! use textstyle_engine::TextStyle;
//!
//! let mut styles = TextStyle::new();
//! styles.set_stylesheet("body { color: #333; } i { font-style: italic; }")?;
//!
//! let result = styles.convert("Plain text with <i>emphasis</i> inside.", "body", None)?;
//! assert_eq!(result.text, "Plain text with emphasis inside.");
//! assert_eq!(result.runs.len(), 1);
//! # Ok::<(), textstyle_engine::EngineError>(())
//! ```

mod config;
mod context;

pub use config::Config;
pub use context::{ObserverId, TextStyle};

pub use textstyle_css::{StyleError, StyleRecord, StyleTable};
pub use textstyle_text::{ConvertOptions, Converted, Run, TagOverride};

// Re-export sub-crates for advanced usage
pub use textstyle_css as css;
pub use textstyle_text as text;

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine error
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Style error: {0}")]
    Style(#[from] StyleError),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
