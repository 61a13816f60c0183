//! Ignore rules produce warnings, never errors.

use anyhow::Result;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use url_copy::processor::AssetPipeline;
use url_copy::stylesheet::{ProcessResult, Stylesheet};
use url_copy::test_utils::AssetFixture;

#[tokio::test]
async fn test_ignored_svg_keeps_original_token() -> Result<()> {
    let fixture = AssetFixture::new()?;
    fixture.add_file("icon.svg", b"<svg/>")?;
    fixture.add_file("logo.png", b"png")?;
    let pipeline = AssetPipeline::new(fixture.options().template("[name].[ext]").ignore(["*.svg"]));

    let mut sheet = Stylesheet::new(vec![fixture.declaration(
        "main.css",
        "background",
        "url(icon.svg), url(logo.png)",
    )]);
    let mut result = ProcessResult::new();
    pipeline.run(&mut sheet, &mut result).await?;

    assert_eq!(sheet.declarations[0].value, "url(icon.svg), url(logo.png)");
    assert_eq!(result.warnings.len(), 1);
    assert_eq!(result.warnings[0].message, "icon.svg ignored.");
    assert_eq!(fixture.dest_files()?, vec![std::path::PathBuf::from("logo.png")]);
    Ok(())
}

#[tokio::test]
async fn test_suffix_takes_part_in_matching() -> Result<()> {
    let fixture = AssetFixture::new()?;
    fixture.add_file("font.woff", b"woff")?;
    let pipeline = AssetPipeline::new(fixture.options().ignore("*.woff?inline"));

    let mut sheet = Stylesheet::new(vec![
        fixture.declaration("main.css", "src", "url(font.woff?inline)"),
        fixture.declaration("main.css", "src", "url(font.woff?v=1)"),
    ]);
    let mut result = ProcessResult::new();
    pipeline.run(&mut sheet, &mut result).await?;

    assert_eq!(sheet.declarations[0].value, "url(font.woff?inline)");
    assert_ne!(sheet.declarations[1].value, "url(font.woff?v=1)");
    assert!(sheet.declarations[1].value.ends_with("?v=1)"));
    assert_eq!(result.warnings.len(), 1);
    assert_eq!(result.warnings[0].message, "font.woff ignored.");
    Ok(())
}

#[tokio::test]
async fn test_predicate_sees_filename_and_suffix() -> Result<()> {
    let fixture = AssetFixture::new()?;
    fixture.add_file("img/a.png", b"a")?;
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);
    let pipeline = AssetPipeline::new(fixture.options().ignore_fn(move |filename, suffix| {
        seen.fetch_add(1, Ordering::SeqCst);
        filename == "img/a.png" && suffix == "#skip"
    }));

    let mut sheet = Stylesheet::new(vec![
        fixture.declaration("main.css", "background", "url(img/a.png#skip)"),
        fixture.declaration("main.css", "background-image", "url(img/a.png)"),
        // Special references never reach the predicate
        fixture.declaration("main.css", "mask", "url(#mask)"),
    ]);
    let mut result = ProcessResult::new();
    pipeline.run(&mut sheet, &mut result).await?;

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(sheet.declarations[0].value, "url(img/a.png#skip)");
    assert_ne!(sheet.declarations[1].value, "url(img/a.png)");
    assert_eq!(result.warnings.len(), 1);
    Ok(())
}
