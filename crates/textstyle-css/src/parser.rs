//! CSS Parser
//!
//! Splits stylesheet text into rules of raw `property: value` pairs. The
//! parser knows nothing about the style schema; values are typed later by
//! the builder.

use crate::{Declaration, Result, Rule, StyleError, Stylesheet};

/// CSS Parser
pub struct CssParser;

impl CssParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a CSS stylesheet.
    ///
    /// Broken brace structure fails the whole parse. A declaration without a
    /// colon is skipped with a warning.
    pub fn parse(&self, css: &str) -> Result<Stylesheet> {
        let source = strip_comments(css);
        let bytes = source.as_bytes();
        let mut result = Stylesheet::new();
        let mut cursor = 0;

        loop {
            cursor = skip_separators(bytes, cursor);
            if cursor >= bytes.len() {
                break;
            }

            let open = match find_unquoted(bytes, cursor, |b| b == b'{' || b == b'}') {
                Some(idx) if bytes[idx] == b'{' => idx,
                Some(idx) => return Err(error_at(&source, idx, "unexpected '}'")),
                None => return Err(error_at(&source, cursor, "expected '{' after selector")),
            };

            let close = match find_unquoted(bytes, open + 1, |b| b == b'{' || b == b'}') {
                Some(idx) if bytes[idx] == b'}' => idx,
                Some(idx) => return Err(error_at(&source, idx, "nested '{' inside a rule")),
                None => return Err(error_at(&source, open, "unclosed '{'")),
            };

            let selectors = parse_selectors(&source[cursor..open]);
            if selectors.is_empty() {
                return Err(error_at(&source, open, "rule has no selector"));
            }

            let declarations = parse_declarations(&source, open + 1, close);
            result.rules.push(Rule {
                selectors,
                declarations,
            });
            cursor = close + 1;
        }

        tracing::trace!("Parsed {} CSS rules", result.len());
        Ok(result)
    }
}

impl Default for CssParser {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_selectors(text: &str) -> Vec<String> {
    text.split(',')
        .map(|sel| sel.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|sel| !sel.is_empty())
        .collect()
}

fn parse_declarations(source: &str, start: usize, end: usize) -> Vec<Declaration> {
    let bytes = source.as_bytes();
    let mut declarations = Vec::new();
    let mut cursor = start;

    while cursor < end {
        let stop = find_unquoted(&bytes[..end], cursor, |b| b == b';').unwrap_or(end);
        let text = source[cursor..stop].trim();

        if !text.is_empty() {
            match split_declaration(text) {
                Some(decl) => declarations.push(decl),
                None => {
                    tracing::warn!(
                        "Skipping malformed declaration '{}' at line {}",
                        text,
                        line_of(source, cursor)
                    );
                }
            }
        }
        cursor = stop + 1;
    }

    declarations
}

fn split_declaration(text: &str) -> Option<Declaration> {
    let colon = find_unquoted(text.as_bytes(), 0, |b| b == b':')?;
    let property = text[..colon].trim().to_ascii_lowercase();
    let value = text[colon + 1..].trim();
    if property.is_empty() || property.contains(char::is_whitespace) || value.is_empty() {
        return None;
    }
    Some(Declaration::new(property, value))
}

fn skip_separators(bytes: &[u8], mut idx: usize) -> usize {
    while idx < bytes.len() && (bytes[idx].is_ascii_whitespace() || bytes[idx] == b';') {
        idx += 1;
    }
    idx
}

/// First byte at or after `from` matching `pred`, ignoring quoted strings.
fn find_unquoted(bytes: &[u8], from: usize, pred: impl Fn(u8) -> bool) -> Option<usize> {
    let mut quote: Option<u8> = None;
    let mut escape = false;

    for (idx, &byte) in bytes.iter().enumerate().skip(from) {
        if let Some(q) = quote {
            if escape {
                escape = false;
            } else if byte == b'\\' {
                escape = true;
            } else if byte == q {
                quote = None;
            }
            continue;
        }

        match byte {
            b'"' | b'\'' => quote = Some(byte),
            _ if pred(byte) => return Some(idx),
            _ => {}
        }
    }

    None
}

/// Remove `/* ... */` comments, keeping strings and line breaks intact.
fn strip_comments(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut quote: Option<char> = None;
    let mut escape = false;

    while let Some(ch) = chars.next() {
        if let Some(q) = quote {
            out.push(ch);
            if escape {
                escape = false;
            } else if ch == '\\' {
                escape = true;
            } else if ch == q {
                quote = None;
            }
            continue;
        }

        if ch == '/' && chars.peek() == Some(&'*') {
            chars.next();
            let mut prev = '\0';
            for inner in chars.by_ref() {
                if inner == '\n' {
                    out.push('\n');
                }
                if prev == '*' && inner == '/' {
                    break;
                }
                prev = inner;
            }
            out.push(' ');
            continue;
        }

        if ch == '"' || ch == '\'' {
            quote = Some(ch);
        }
        out.push(ch);
    }

    out
}

fn line_of(source: &str, idx: usize) -> u32 {
    let end = idx.min(source.len());
    source.as_bytes()[..end].iter().filter(|&&b| b == b'\n').count() as u32 + 1
}

fn error_at(source: &str, idx: usize, message: &str) -> StyleError {
    StyleError::Parse {
        line: line_of(source, idx),
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let css = r#"
            h1 { color: #fff; font-size: 24px; }
            body { font-family: Helvetica; }
        "#;

        let result = CssParser::new().parse(css);
        assert!(result.is_ok(), "Parse error: {:?}", result.err());

        let stylesheet = result.unwrap();
        assert_eq!(stylesheet.len(), 2);
        assert_eq!(stylesheet.rules[0].selectors, vec!["h1"]);
        assert_eq!(
            stylesheet.rules[0].declarations,
            vec![
                Declaration::new("color", "#fff"),
                Declaration::new("font-size", "24px"),
            ]
        );
    }

    #[test]
    fn test_selector_list() {
        let stylesheet = CssParser::new().parse("h1, h2 ,h3{ color: red }").unwrap();
        assert_eq!(stylesheet.len(), 1);
        assert_eq!(stylesheet.rules[0].selectors, vec!["h1", "h2", "h3"]);
    }

    #[test]
    fn test_comments_ignored() {
        let css = "/* head */ p { /* a; b */ color: red; } /* tail */";
        let stylesheet = CssParser::new().parse(css).unwrap();
        assert_eq!(stylesheet.len(), 1);
        assert_eq!(stylesheet.rules[0].declarations, vec![Declaration::new("color", "red")]);
    }

    #[test]
    fn test_quoted_values_keep_delimiters() {
        let css = r#"p { font-family: "A;B{C}"; color: red; }"#;
        let stylesheet = CssParser::new().parse(css).unwrap();
        assert_eq!(
            stylesheet.rules[0].declarations,
            vec![
                Declaration::new("font-family", "\"A;B{C}\""),
                Declaration::new("color", "red"),
            ]
        );
    }

    #[test]
    fn test_missing_colon_is_skipped() {
        let stylesheet = CssParser::new().parse("p { color red; font-size: 12px; }").unwrap();
        assert_eq!(
            stylesheet.rules[0].declarations,
            vec![Declaration::new("font-size", "12px")]
        );
    }

    #[test]
    fn test_unclosed_brace() {
        let err = CssParser::new().parse("h1 { color: #fff").unwrap_err();
        assert!(matches!(err, StyleError::Parse { line: 1, .. }));
    }

    #[test]
    fn test_stray_close_brace() {
        let err = CssParser::new().parse("p { color: red; }\n}").unwrap_err();
        assert!(matches!(err, StyleError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_nested_brace() {
        let err = CssParser::new().parse("p { a { color: red; } }").unwrap_err();
        assert!(matches!(err, StyleError::Parse { .. }));
    }

    #[test]
    fn test_missing_selector() {
        let err = CssParser::new().parse("{ color: red; }").unwrap_err();
        assert!(matches!(err, StyleError::Parse { .. }));
    }

    #[test]
    fn test_empty_input() {
        assert!(CssParser::new().parse("  \n /* nothing */ ").unwrap().is_empty());
    }

    #[test]
    fn test_property_names_lowercased() {
        let stylesheet = CssParser::new().parse("H1 { COLOR: Red }").unwrap();
        assert_eq!(stylesheet.rules[0].selectors, vec!["H1"]);
        assert_eq!(stylesheet.rules[0].declarations, vec![Declaration::new("color", "Red")]);
    }
}
