//! Comprehensive tests for textstyle-text
//!
//! Conversion of tagged text against a parsed stylesheet.

use textstyle_css::{FontStyle, FontWeight, TextAlign, TextTransform, parse_styles};
use textstyle_text::{
    ConvertOptions, Converter, StyleError, StyleTable, TagOverride, convert, looks_like_markup,
};

fn styles() -> StyleTable {
    parse_styles(
        r#"
        body { font-family: "Helvetica Neue"; font-size: 16px; color: #333333; }
        i    { font-style: italic; }
        b    { font-weight: bold; }
        p    { color: #000000; text-align: center; }
        h1   { font-size: 28px; text-transform: uppercase; }
        cap  { text-transform: capitalize; }
        "#,
    )
    .unwrap()
}

// ============================================================================
// SINGLE TAGS
// ============================================================================

#[test]
fn test_emphasis_run() {
    let styles = styles();
    let result = convert(
        &styles,
        "Plain text with <i>emphasis</i> inside.",
        "body",
        None,
        &ConvertOptions::default(),
    )
    .unwrap();

    assert_eq!(result.text, "Plain text with emphasis inside.");
    assert_eq!(result.runs.len(), 1);

    let run = &result.runs[0];
    assert_eq!(run.start, 16);
    assert_eq!(run.length, 8);
    assert_eq!(result.run_text(run), "emphasis");

    // `i` layered over `body`
    assert_eq!(run.style.font_style(), FontStyle::Italic);
    assert_eq!(run.style.font_family(), Some("Helvetica Neue"));
    assert_eq!(run.style.font_size(), Some(16.0));
}

#[test]
fn test_adjacent_tags() {
    let styles = styles();
    let result = convert(&styles, "<i>one</i><b>two</b>", "body", None, &ConvertOptions::default()).unwrap();

    assert_eq!(result.text, "onetwo");
    assert_eq!(result.runs.len(), 2);
    assert_eq!(result.runs[0].range(), 0..3);
    assert_eq!(result.runs[1].range(), 3..6);
    assert_eq!(result.runs[1].style.font_weight(), FontWeight::Bold);
}

#[test]
fn test_tag_with_attributes() {
    let styles = styles();
    let result = convert(
        &styles,
        r#"see <i class="x" data-n=2>this</i>"#,
        "body",
        None,
        &ConvertOptions::default(),
    )
    .unwrap();

    assert_eq!(result.text, "see this");
    assert_eq!(result.run_text(&result.runs[0]), "this");
}

// ============================================================================
// NESTING
// ============================================================================

#[test]
fn test_nested_runs_with_body_wrapper() {
    let styles = styles();
    let overrides = [TagOverride::css("spot", "spot { color: #ff0000; font-weight: bold; }")];
    let result = convert(
        &styles,
        "A <p>B <spot>C</spot> D</p> E",
        "body",
        Some(&overrides),
        &ConvertOptions::default(),
    )
    .unwrap();

    assert_eq!(result.text, "A B C D E");
    assert_eq!(result.runs.len(), 3);

    let spot = &result.runs[0];
    let p = &result.runs[1];
    let body = &result.runs[2];

    assert_eq!(spot.style.name(), "spot");
    assert_eq!(p.style.name(), "p");
    assert_eq!(body.style.name(), "body");

    assert_eq!(result.run_text(spot), "C");
    assert_eq!(result.run_text(p), "B C D");
    assert_eq!(body.range(), 0..result.text.len());

    assert!(p.contains(spot));
    assert!(body.contains(p));
}

#[test]
fn test_nested_without_overrides() {
    let styles = styles();
    let result = convert(&styles, "<p>x <i>y</i> z</p>", "body", None, &ConvertOptions::default()).unwrap();

    assert_eq!(result.text, "x y z");
    assert_eq!(result.runs.len(), 2);
    assert_eq!(result.runs[0].style.name(), "i");
    assert_eq!(result.runs[1].style.name(), "p");
    assert!(result.runs[1].contains(&result.runs[0]));
}

// ============================================================================
// STYLE RESOLUTION
// ============================================================================

#[test]
fn test_override_merges_existing_entry() {
    let styles = styles();
    let overrides = [TagOverride::css("p", "p { font-size: 12px; }")];
    let converter = Converter::new(&styles, "body", Some(&overrides), &ConvertOptions::default()).unwrap();
    let p = converter.style_for("p");

    assert_eq!(p.font_size(), Some(12.0));
    // Taken from the stylesheet `p`, not from `body`
    assert_eq!(p.color(), Some("#000000"));
    assert_eq!(p.text_align(), TextAlign::Center);
    assert_eq!(p.font_family(), Some("Helvetica Neue"));
}

#[test]
fn test_override_without_entry_merges_default() {
    let styles = styles();
    let overrides = [TagOverride::css("note", "note { font-style: italic; }")];
    let converter = Converter::new(&styles, "body", Some(&overrides), &ConvertOptions::default()).unwrap();
    let note = converter.style_for("note");

    assert_eq!(note.font_style(), FontStyle::Italic);
    assert_eq!(note.color(), Some("#333333"));
    assert_eq!(note.font_size(), Some(16.0));
}

#[test]
fn test_explicit_body_override_disables_synthetic_body() {
    let styles = styles();
    let overrides = [TagOverride::named("body", "p")];
    let result = convert(&styles, "plain", "body", Some(&overrides), &ConvertOptions::default()).unwrap();

    assert_eq!(result.runs.len(), 1);
    let body = &result.runs[0];
    assert_eq!(body.style.name(), "body");
    assert_eq!(body.style.text_align(), TextAlign::Center);
}

#[test]
fn test_custom_body_tag() {
    let styles = styles();
    let options = ConvertOptions {
        body_tag: "root".to_string(),
        ..ConvertOptions::default()
    };
    let overrides = [TagOverride::css("spot", "spot { lines: 2; }")];
    let result = convert(&styles, "a <spot>b</spot>", "body", Some(&overrides), &options).unwrap();

    assert_eq!(result.runs.len(), 2);
    assert_eq!(result.runs[1].style.name(), "root");
    assert_eq!(result.runs[1].style.font_family(), Some("Helvetica Neue"));
}

#[test]
fn test_invalid_override_css() {
    let styles = styles();
    let overrides = [TagOverride::css("spot", "spot { color: red; } x { color: blue; }")];
    let err = convert(&styles, "a", "body", Some(&overrides), &ConvertOptions::default()).unwrap_err();
    assert_eq!(err, StyleError::MultipleRules { count: 2 });
}

// ============================================================================
// TRANSFORMS
// ============================================================================

#[test]
fn test_uppercase_heading() {
    let styles = styles();
    let result = convert(&styles, "<h1>Title here</h1> body", "body", None, &ConvertOptions::default()).unwrap();

    assert_eq!(result.text, "TITLE HERE body");
    assert_eq!(result.runs[0].style.text_transform(), TextTransform::UpperCase);
    assert_eq!(result.run_text(&result.runs[0]), "TITLE HERE");
}

#[test]
fn test_capitalize_covers_nested_text() {
    let styles = styles();
    let result = convert(&styles, "<cap>the <i>quick</i> fox</cap>", "body", None, &ConvertOptions::default()).unwrap();

    assert_eq!(result.text, "The Quick Fox");
    assert_eq!(result.run_text(&result.runs[0]), "Quick");
    assert_eq!(result.runs[1].range(), 0..13);
}

#[test]
fn test_markup_detection() {
    assert!(looks_like_markup("A <p>B</p>"));
    assert!(!looks_like_markup("1 < 2 and 3 > 2"));
}
