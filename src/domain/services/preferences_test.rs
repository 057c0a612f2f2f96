use anyhow::Result;
use tokio::fs;

use super::Preferences;

fn temp_preferences() -> Result<(tempfile::TempDir, Preferences)> {
    let dir = tempfile::tempdir()?;
    let prefs = Preferences::new(dir.path().join("nested/preferences.toml"));
    return Ok((dir, prefs));
}

#[tokio::test]
async fn it_reads_nothing_without_a_file() -> Result<()> {
    let (_dir, prefs) = temp_preferences()?;
    assert_eq!(prefs.get("theme").await?, None);
    return Ok(());
}

#[tokio::test]
async fn it_writes_and_reads_values() -> Result<()> {
    let (_dir, prefs) = temp_preferences()?;
    prefs.set("theme", "light").await?;
    prefs.set("session", "sid=abc").await?;
    prefs.set("theme", "dark").await?;

    assert_eq!(prefs.get("theme").await?, Some("dark".to_string()));
    assert_eq!(prefs.get("session").await?, Some("sid=abc".to_string()));

    let payload = fs::read_to_string(&prefs.file_path).await?;
    assert_eq!(payload, "theme = \"dark\"\nsession = \"sid=abc\"\n");
    return Ok(());
}

#[tokio::test]
async fn it_removes_values() -> Result<()> {
    let (_dir, prefs) = temp_preferences()?;
    prefs.remove("session").await?;

    prefs.set("session", "sid=abc").await?;
    prefs.remove("session").await?;
    assert_eq!(prefs.get("session").await?, None);
    return Ok(());
}

#[tokio::test]
async fn it_ignores_non_string_values() -> Result<()> {
    let (_dir, prefs) = temp_preferences()?;
    fs::create_dir_all(prefs.file_path.parent().unwrap()).await?;
    fs::write(&prefs.file_path, "theme = 1\n").await?;

    assert_eq!(prefs.get("theme").await?, None);
    return Ok(());
}

#[tokio::test]
async fn it_fails_on_broken_files() -> Result<()> {
    let (_dir, prefs) = temp_preferences()?;
    fs::create_dir_all(prefs.file_path.parent().unwrap()).await?;
    fs::write(&prefs.file_path, "theme = \n").await?;

    assert!(prefs.get("theme").await.is_err());
    return Ok(());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn it_keeps_every_key_under_concurrent_writes() -> Result<()> {
    let (_dir, prefs) = temp_preferences()?;

    let mut writers = tokio::task::JoinSet::new();
    for idx in 0..16 {
        let prefs = prefs.clone();
        writers.spawn(async move {
            return prefs.set(&format!("key-{idx}"), &idx.to_string()).await;
        });
    }
    while let Some(res) = writers.join_next().await {
        res??;
    }

    for idx in 0..16 {
        assert_eq!(prefs.get(&format!("key-{idx}")).await?, Some(idx.to_string()));
    }
    let staged = prefs.file_path.with_file_name("preferences.toml.tmp");
    assert!(!staged.exists());
    return Ok(());
}
