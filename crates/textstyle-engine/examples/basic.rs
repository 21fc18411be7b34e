//! Example: Basic usage of textstyle

use textstyle_engine::{TagOverride, TextStyle};

fn main() -> Result<(), textstyle_engine::EngineError> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let mut styles = TextStyle::new();
    styles.set_stylesheet(
        "body { font-family: Georgia; font-size: 16px; color: #333; }
         i { font-style: italic; }
         h1 { font-size: 28px; text-transform: uppercase; }",
    )?;

    let overrides = [TagOverride::css("spot", "spot { color: #ff0000; }")];
    let result = styles.convert(
        "<h1>Notes</h1> Plain text with <i>emphasis</i> and a <spot>highlight</spot>.",
        "body",
        Some(&overrides),
    )?;

    println!("textstyle v{}", textstyle_engine::VERSION);
    println!("{}", result.text);
    for run in &result.runs {
        println!(
            "  {:>3}..{:<3} {:<6} {:?}",
            run.start,
            run.end(),
            run.style.name(),
            result.run_text(run)
        );
    }

    Ok(())
}
