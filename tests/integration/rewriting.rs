//! Rewritten values: suffixes, ordering and relative bases.

use anyhow::Result;
use std::path::{Path, PathBuf};
use url_copy::asset::default_hash;
use url_copy::processor::AssetPipeline;
use url_copy::stylesheet::{Declaration, ProcessResult, Stylesheet};
use url_copy::test_utils::AssetFixture;

#[tokio::test]
async fn test_query_and_fragment_are_preserved() -> Result<()> {
    let fixture = AssetFixture::new()?;
    fixture.add_file("logo.png", b"logo")?;

    for template in ["[name].[ext]", "assets/[hash].[ext]", "x/[path]/[name]-[hash].[ext]"] {
        let pipeline = AssetPipeline::new(fixture.options().template(template));
        let mut sheet = Stylesheet::new(vec![fixture.declaration(
            "main.css",
            "background",
            "url(logo.png?v=2#frag)",
        )]);
        let mut result = ProcessResult::new();
        pipeline.run(&mut sheet, &mut result).await?;

        let value = &sheet.declarations[0].value;
        assert!(value.ends_with("?v=2#frag)"), "{template}: {value}");
        assert!(!result.has_warnings(), "{template}");
    }
    Ok(())
}

#[tokio::test]
async fn test_multiple_tokens_keep_their_positions() -> Result<()> {
    let fixture = AssetFixture::new()?;
    fixture.add_file("img/one.png", b"1")?;
    fixture.add_file("img/two.png", b"2")?;
    fixture.add_file("img/three.png", b"3")?;
    let pipeline = AssetPipeline::new(fixture.options().template("out/[name].[ext]"));

    let mut sheet = Stylesheet::new(vec![fixture.declaration(
        "css/theme.css",
        "background-image",
        r#"image-set(url("../img/one.png") 1x, url(../img/two.png) 2x), url( '../img/three.png' )"#,
    )]);
    let mut result = ProcessResult::new();
    pipeline.run(&mut sheet, &mut result).await?;

    assert_eq!(
        sheet.declarations[0].value,
        r#"image-set(url("../out/one.png") 1x, url(../out/two.png) 2x), url( '../out/three.png' )"#
    );
    let sources: Vec<_> = result
        .assets
        .iter()
        .map(|record| record.source.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(sources, vec!["one.png", "two.png", "three.png"]);
    Ok(())
}

#[tokio::test]
async fn test_failed_token_does_not_affect_siblings() -> Result<()> {
    let fixture = AssetFixture::new()?;
    fixture.add_file("img/ok.png", b"ok")?;
    let pipeline = AssetPipeline::new(fixture.options().template("[name].[ext]"));

    let mut sheet = Stylesheet::new(vec![
        fixture.declaration("main.css", "background", "url(img/missing.png), url(img/ok.png)"),
        fixture.declaration("main.css", "border-image", "url(img/ok.png)"),
    ]);
    let mut result = ProcessResult::new();
    pipeline.run(&mut sheet, &mut result).await?;

    assert_eq!(sheet.declarations[0].value, "url(img/missing.png), url(ok.png)");
    assert_eq!(sheet.declarations[1].value, "url(ok.png)");
    assert_eq!(result.warnings.len(), 1);
    assert_eq!(result.warnings[0].prop, "background");
    assert_eq!(
        result.warnings[0].message,
        format!("Can't read the file in {}", fixture.src().join("img/missing.png").display())
    );
    assert_eq!(
        result.warnings[0].source.as_ref().and_then(|s| s.input_file.clone()),
        Some(fixture.src().join("main.css"))
    );
    Ok(())
}

#[tokio::test]
async fn test_reference_outside_source_roots() -> Result<()> {
    let fixture = AssetFixture::new()?;
    std::fs::write(fixture.root().join("outside.png"), b"x")?;
    let pipeline = AssetPipeline::new(fixture.options());

    let mut sheet = Stylesheet::new(vec![fixture.declaration(
        "main.css",
        "background",
        "url(../outside.png)",
    )]);
    let mut result = ProcessResult::new();
    pipeline.run(&mut sheet, &mut result).await?;

    assert_eq!(sheet.declarations[0].value, "url(../outside.png)");
    assert_eq!(
        result.warnings[0].message,
        format!("\"src\" not found in {}", fixture.root().join("outside.png").display())
    );
    assert!(fixture.dest_files()?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_multiple_source_roots() -> Result<()> {
    let fixture = AssetFixture::new()?;
    let vendor = fixture.root().join("vendor");
    std::fs::create_dir_all(vendor.join("css"))?;
    std::fs::write(vendor.join("icon.gif"), b"gif")?;
    fixture.add_file("logo.png", b"png")?;

    let pipeline = AssetPipeline::new(
        fixture.options().sources([fixture.src(), vendor.clone()]).template("[path]/[name].[ext]"),
    );
    let mut sheet = Stylesheet::new(vec![
        fixture.declaration("main.css", "background", "url(logo.png)"),
        Declaration::new("background", "url(../icon.gif)").with_source(
            url_copy::stylesheet::SourceLocation::new(vendor.join("css/vendor.css"), 2, 4),
        ),
    ]);
    let mut result = ProcessResult::new();
    pipeline.run(&mut sheet, &mut result).await?;

    assert!(!result.has_warnings());
    assert_eq!(sheet.declarations[0].value, "url(logo.png)");
    assert_eq!(sheet.declarations[1].value, "url(../icon.gif)");
    assert_eq!(fixture.dest_files()?, vec![PathBuf::from("icon.gif"), PathBuf::from("logo.png")]);
    Ok(())
}

#[tokio::test]
async fn test_relative_path_override_uses_output_file() -> Result<()> {
    let fixture = AssetFixture::new()?;
    fixture.add_file("img/a.png", b"a")?;
    let pipeline = AssetPipeline::new(fixture.options().relative_path(
        |_dir, _metadata, result, options| {
            result
                .output_file
                .as_deref()
                .and_then(Path::parent)
                .map_or_else(|| options.dest.clone(), Path::to_path_buf)
        },
    ));

    let mut sheet = Stylesheet::new(vec![fixture.declaration(
        "css/main.css",
        "background",
        "url(../img/a.png)",
    )]);
    let mut result = ProcessResult::with_output_file(fixture.dest().join("bundle/app.css"));
    pipeline.run(&mut sheet, &mut result).await?;

    assert_eq!(
        sheet.declarations[0].value,
        format!("url(../assets/{}.png)", default_hash(b"a"))
    );
    Ok(())
}

#[tokio::test]
async fn test_custom_input_path() -> Result<()> {
    let fixture = AssetFixture::new()?;
    fixture.add_file("img/a.png", b"a")?;
    let base = fixture.src().join("img");
    let pipeline = AssetPipeline::new(
        fixture.options().template("[name].[ext]").input_path(move |_| Some(base.clone())),
    );

    let mut sheet = Stylesheet::new(vec![Declaration::new("background", "url(a.png)")]);
    let mut result = ProcessResult::new();
    pipeline.run(&mut sheet, &mut result).await?;

    assert!(!result.has_warnings());
    assert_eq!(sheet.declarations[0].value, "url(../a.png)");
    Ok(())
}
