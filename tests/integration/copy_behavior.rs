//! Copy semantics: round trip, content addressing and idempotence.

use anyhow::Result;
use std::path::PathBuf;
use url_copy::asset::{CollisionPolicy, default_hash};
use url_copy::processor::AssetPipeline;
use url_copy::stylesheet::{ProcessResult, Stylesheet};
use url_copy::test_utils::{AssetFixture, init_test_logging};

#[tokio::test]
async fn test_round_trip_name_template() -> Result<()> {
    init_test_logging(None);

    let fixture = AssetFixture::new()?;
    let bytes = [0_u8, 1, 2, 254, 255, b'\n', b'\r'];
    fixture.add_file("img/logo.png", &bytes)?;
    let pipeline = AssetPipeline::new(fixture.options().template("[name].[ext]"));

    // Stylesheet directly in the source root
    let mut sheet = Stylesheet::new(vec![fixture.declaration(
        "main.css",
        "background",
        "url(./img/logo.png)",
    )]);
    let mut result = ProcessResult::new();
    pipeline.run(&mut sheet, &mut result).await?;

    assert_eq!(sheet.declarations[0].value, "url(logo.png)");
    assert_eq!(fixture.read_dest("logo.png")?, bytes);
    assert_eq!(fixture.dest_files()?, vec![PathBuf::from("logo.png")]);
    assert_eq!(result.assets[0].destination, fixture.dest().join("logo.png"));
    assert!(result.assets[0].written);
    Ok(())
}

#[tokio::test]
async fn test_default_template_is_content_addressed() -> Result<()> {
    let fixture = AssetFixture::new()?;
    fixture.add_file("img/a.png", b"same bytes")?;
    fixture.add_file("other/b.png", b"same bytes")?;
    fixture.add_file("img/c.PNG", b"different")?;
    let pipeline = AssetPipeline::new(fixture.options());

    let mut sheet = Stylesheet::new(vec![
        fixture.declaration("css/main.css", "background", "url(../img/a.png)"),
        fixture.declaration("css/main.css", "border-image", "url(../other/b.png)"),
        fixture.declaration("css/main.css", "list-style", "url(../img/c.PNG)"),
    ]);
    let mut result = ProcessResult::new();
    pipeline.run(&mut sheet, &mut result).await?;

    let same = default_hash(b"same bytes");
    let different = default_hash(b"different");
    assert_eq!(sheet.declarations[0].value, format!("url(../assets/{same}.png)"));
    assert_eq!(sheet.declarations[1].value, format!("url(../assets/{same}.png)"));
    assert_eq!(sheet.declarations[2].value, format!("url(../assets/{different}.png)"));

    assert_eq!(
        fixture.dest_files()?,
        {
            let mut expected = vec![
                PathBuf::from(format!("assets/{same}.png")),
                PathBuf::from(format!("assets/{different}.png")),
            ];
            expected.sort();
            expected
        }
    );
    assert!(!result.has_warnings());
    Ok(())
}

#[tokio::test]
async fn test_second_run_performs_no_writes() -> Result<()> {
    let fixture = AssetFixture::new()?;
    fixture.add_file("img/a.png", b"a")?;
    fixture.add_file("fonts/f.woff2", b"font")?;
    let pipeline = AssetPipeline::new(fixture.options());

    let value = "url(../img/a.png), url(../fonts/f.woff2?v=1)";

    let mut first = Stylesheet::new(vec![fixture.declaration("css/main.css", "src", value)]);
    let mut first_result = ProcessResult::new();
    pipeline.run(&mut first, &mut first_result).await?;
    assert_eq!(first_result.written_count(), 2);

    let files_after_first = fixture.dest_files()?;
    let contents_after_first: Vec<Vec<u8>> =
        files_after_first.iter().map(|f| fixture.read_dest(f)).collect::<Result<_>>()?;

    let mut second = Stylesheet::new(vec![fixture.declaration("css/main.css", "src", value)]);
    let mut second_result = ProcessResult::new();
    pipeline.run(&mut second, &mut second_result).await?;

    assert_eq!(second.declarations[0].value, first.declarations[0].value);
    assert_eq!(second_result.assets.len(), 2);
    assert_eq!(second_result.written_count(), 0);
    assert_eq!(fixture.dest_files()?, files_after_first);
    let contents_after_second: Vec<Vec<u8>> =
        files_after_first.iter().map(|f| fixture.read_dest(f)).collect::<Result<_>>()?;
    assert_eq!(contents_after_second, contents_after_first);
    Ok(())
}

#[tokio::test]
async fn test_existing_destination_wins_by_default() -> Result<()> {
    let fixture = AssetFixture::new()?;
    fixture.add_file("a/logo.png", b"first")?;
    fixture.add_file("b/logo.png", b"second")?;
    let pipeline = AssetPipeline::new(fixture.options().template("[name].[ext]"));

    let mut sheet = Stylesheet::new(vec![fixture.declaration(
        "main.css",
        "background",
        "url(a/logo.png)",
    )]);
    pipeline.run(&mut sheet, &mut ProcessResult::new()).await?;

    let mut sheet = Stylesheet::new(vec![fixture.declaration(
        "main.css",
        "background",
        "url(b/logo.png)",
    )]);
    let mut result = ProcessResult::new();
    pipeline.run(&mut sheet, &mut result).await?;

    assert_eq!(sheet.declarations[0].value, "url(logo.png)");
    assert_eq!(fixture.read_dest("logo.png")?, b"first");
    assert!(!result.has_warnings());
    Ok(())
}

#[tokio::test]
async fn test_verify_policy_reports_conflicts() -> Result<()> {
    let fixture = AssetFixture::new()?;
    fixture.add_file("a/logo.png", b"first")?;
    fixture.add_file("b/logo.png", b"second")?;
    fixture.add_file("c/logo.png", b"first")?;
    let pipeline = AssetPipeline::new(
        fixture.options().template("[name].[ext]").collision(CollisionPolicy::Verify),
    );

    let mut sheet = Stylesheet::new(vec![fixture.declaration(
        "main.css",
        "background",
        "url(a/logo.png)",
    )]);
    pipeline.run(&mut sheet, &mut ProcessResult::new()).await?;

    let mut sheet = Stylesheet::new(vec![
        fixture.declaration("main.css", "background", "url(b/logo.png)"),
        fixture.declaration("main.css", "background-image", "url(c/logo.png)"),
    ]);
    let mut result = ProcessResult::new();
    pipeline.run(&mut sheet, &mut result).await?;

    // Conflicting content: reference untouched, warning emitted
    assert_eq!(sheet.declarations[0].value, "url(b/logo.png)");
    assert_eq!(result.warnings.len(), 1);
    assert!(result.warnings[0].message.contains("already exists with different content"));
    // Identical content: reused
    assert_eq!(sheet.declarations[1].value, "url(logo.png)");
    assert_eq!(fixture.read_dest("logo.png")?, b"first");
    Ok(())
}

#[tokio::test]
async fn test_path_template_mirrors_source_tree() -> Result<()> {
    let fixture = AssetFixture::new()?;
    fixture.add_file("img/icons/star.svg", b"<svg/>")?;
    fixture.add_file("top.gif", b"gif")?;
    let pipeline = AssetPipeline::new(
        fixture.options().template("[path]/[name].[ext]").placeholder_default("path", "root"),
    );

    let mut sheet = Stylesheet::new(vec![fixture.declaration(
        "css/main.css",
        "background",
        "url(../img/icons/star.svg), url(../top.gif)",
    )]);
    let mut result = ProcessResult::new();
    pipeline.run(&mut sheet, &mut result).await?;

    assert_eq!(sheet.declarations[0].value, "url(../img/icons/star.svg), url(../root/top.gif)");
    assert_eq!(
        fixture.dest_files()?,
        vec![PathBuf::from("img/icons/star.svg"), PathBuf::from("root/top.gif")]
    );
    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn test_write_failure_only_affects_its_own_asset() -> Result<()> {
    let fixture = AssetFixture::new()?;
    fixture.add_file("blocked/a.png", b"a")?;
    fixture.add_file("ok/b.png", b"b")?;
    // A regular file where the copy of a.png needs a directory
    std::fs::create_dir_all(fixture.dest().join("assets"))?;
    std::fs::write(fixture.dest().join("assets/blocked"), b"")?;
    let pipeline = AssetPipeline::new(fixture.options().template("assets/[path]/[name].[ext]"));

    let mut sheet = Stylesheet::new(vec![
        fixture.declaration("main.css", "background", "url(blocked/a.png), url(ok/b.png)"),
        fixture.declaration("main.css", "border-image", "url(ok/b.png)"),
    ]);
    let mut result = ProcessResult::new();
    pipeline.run(&mut sheet, &mut result).await?;

    assert_eq!(sheet.declarations[0].value, "url(blocked/a.png), url(assets/ok/b.png)");
    assert_eq!(sheet.declarations[1].value, "url(assets/ok/b.png)");
    assert_eq!(result.warnings.len(), 1);
    assert_eq!(result.warnings[0].prop, "background");
    assert_eq!(
        result.warnings[0].message,
        format!("Can't write in {}", fixture.dest().join("assets/blocked/a.png").display())
    );
    assert_eq!(fixture.read_dest("assets/ok/b.png")?, b"b");
    // No partial or temporary files next to the copies
    assert_eq!(
        fixture.dest_files()?,
        vec![PathBuf::from("assets/blocked"), PathBuf::from("assets/ok/b.png")]
    );
    Ok(())
}
