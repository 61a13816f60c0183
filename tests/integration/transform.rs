//! Content transforms applied before writing.

use anyhow::{Result, bail};
use url_copy::processor::AssetPipeline;
use url_copy::stylesheet::{ProcessResult, Stylesheet};
use url_copy::test_utils::AssetFixture;

#[tokio::test]
async fn test_transform_rewrites_contents() -> Result<()> {
    let fixture = AssetFixture::new()?;
    fixture.add_file("img/note.txt", b"hello")?;
    let pipeline = AssetPipeline::new(fixture.options().template("[name].[ext]").transform(
        |mut metadata| async move {
            tokio::task::yield_now().await;
            metadata.raw_contents = metadata.raw_contents.to_ascii_uppercase();
            Ok::<_, anyhow::Error>(metadata)
        },
    ));

    let mut sheet = Stylesheet::new(vec![fixture.declaration(
        "main.css",
        "background",
        "url(img/note.txt)",
    )]);
    let mut result = ProcessResult::new();
    pipeline.run(&mut sheet, &mut result).await?;

    assert_eq!(sheet.declarations[0].value, "url(note.txt)");
    assert_eq!(fixture.read_dest("note.txt")?, b"HELLO");
    Ok(())
}

#[tokio::test]
async fn test_hash_is_computed_from_original_contents() -> Result<()> {
    let fixture = AssetFixture::new()?;
    fixture.add_file("a.txt", b"original")?;
    let pipeline = AssetPipeline::new(fixture.options().template("[hash].[ext]").transform(
        |mut metadata| async move {
            metadata.raw_contents = b"changed".to_vec();
            Ok::<_, anyhow::Error>(metadata)
        },
    ));

    let mut sheet =
        Stylesheet::new(vec![fixture.declaration("main.css", "background", "url(a.txt)")]);
    pipeline.run(&mut sheet, &mut ProcessResult::new()).await?;

    let expected = format!("{}.txt", url_copy::asset::default_hash(b"original"));
    assert_eq!(sheet.declarations[0].value, format!("url({expected})"));
    assert_eq!(fixture.read_dest(&expected)?, b"changed");
    Ok(())
}

#[tokio::test]
async fn test_failing_transform_is_a_warning() -> Result<()> {
    let fixture = AssetFixture::new()?;
    fixture.add_file("bad.png", b"x")?;
    fixture.add_file("good.png", b"y")?;
    let pipeline = AssetPipeline::new(fixture.options().template("[name].[ext]").transform(
        |metadata| async move {
            if metadata.base_name == "bad" {
                bail!("corrupt image");
            }
            Ok(metadata)
        },
    ));

    let mut sheet = Stylesheet::new(vec![fixture.declaration(
        "main.css",
        "background",
        "url(bad.png), url(good.png)",
    )]);
    let mut result = ProcessResult::new();
    pipeline.run(&mut sheet, &mut result).await?;

    assert_eq!(sheet.declarations[0].value, "url(bad.png), url(good.png)");
    assert_eq!(result.warnings.len(), 1);
    assert!(result.warnings[0].message.contains("corrupt image"));
    assert_eq!(fixture.dest_files()?, vec![std::path::PathBuf::from("good.png")]);
    Ok(())
}
