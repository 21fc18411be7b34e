//! Text content transforms

use textstyle_css::{StyleRecord, TextTransform};

/// Apply a text-transform to literal text
pub fn apply_text_transform(transform: TextTransform, text: &str) -> String {
    match transform {
        TextTransform::None => text.to_string(),
        _ => transform_with_offsets(transform, text).0,
    }
}

/// Apply the record's text-transform to literal text
pub fn transform_for_style(style: &StyleRecord, text: &str) -> String {
    apply_text_transform(style.text_transform(), text)
}

/// Transform text, also returning `(input offset, output offset)` for every
/// char boundary of the input, the end included.
///
/// Case mapping isn't length preserving (`ß` → `SS`, `İ` → `i̇`), so offsets
/// into the input need this table to find their place in the output.
pub fn transform_with_offsets(transform: TextTransform, text: &str) -> (String, Vec<(usize, usize)>) {
    let mut out = String::with_capacity(text.len());
    let mut offsets = Vec::with_capacity(text.len() + 1);
    let mut chars = text.char_indices().peekable();
    let mut prev = None;
    let mut word_start = true;

    while let Some((idx, ch)) = chars.next() {
        offsets.push((idx, out.len()));
        let next = chars.peek().map(|&(_, c)| c);

        match transform {
            TextTransform::None => out.push(ch),
            TextTransform::UpperCase => out.extend(ch.to_uppercase()),
            TextTransform::LowerCase => push_lowercase(&mut out, ch, prev, next),
            TextTransform::Capitalize => {
                // Title-case every word, lowercasing the rest of it.
                if ch.is_alphanumeric() {
                    if word_start {
                        out.extend(ch.to_uppercase());
                    } else {
                        push_lowercase(&mut out, ch, prev, next);
                    }
                    word_start = false;
                } else {
                    // Apostrophes inside a word don't start a new one ("don't").
                    word_start = !(ch == '\'' && !word_start);
                    out.push(ch);
                }
            }
        }
        prev = Some(ch);
    }
    offsets.push((text.len(), out.len()));

    (out, offsets)
}

/// Lowercase one char, using final sigma at the end of a word
fn push_lowercase(out: &mut String, ch: char, prev: Option<char>, next: Option<char>) {
    let word_end = !next.is_some_and(char::is_alphabetic);
    if ch == 'Σ' && prev.is_some_and(char::is_alphabetic) && word_end {
        out.push('ς');
    } else {
        out.extend(ch.to_lowercase());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upper_lower() {
        assert_eq!(apply_text_transform(TextTransform::UpperCase, "abc Déf"), "ABC DÉF");
        assert_eq!(apply_text_transform(TextTransform::LowerCase, "ABC Déf"), "abc déf");
        assert_eq!(apply_text_transform(TextTransform::None, "aBc"), "aBc");
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(
            apply_text_transform(TextTransform::Capitalize, "hELLO wide-world, don't stop"),
            "Hello Wide-World, Don't Stop"
        );
        assert_eq!(apply_text_transform(TextTransform::Capitalize, "  x1y z"), "  X1y Z");
    }

    #[test]
    fn test_final_sigma() {
        assert_eq!(apply_text_transform(TextTransform::LowerCase, "ΟΔΟΣ ΣΑ"), "οδος σα");
    }

    #[test]
    fn test_empty() {
        assert_eq!(apply_text_transform(TextTransform::Capitalize, ""), "");
        assert_eq!(transform_with_offsets(TextTransform::UpperCase, "").1, vec![(0, 0)]);
    }

    #[test]
    fn test_offsets_follow_growth() {
        let (out, offsets) = transform_with_offsets(TextTransform::UpperCase, "\u{FB01}x");
        assert_eq!(out, "FIX");
        assert_eq!(offsets, vec![(0, 0), (3, 2), (4, 3)]);

        let (out, offsets) = transform_with_offsets(TextTransform::UpperCase, "aßb");
        assert_eq!(out, "ASSB");
        assert_eq!(offsets, vec![(0, 0), (1, 1), (3, 3), (4, 4)]);
    }
}
