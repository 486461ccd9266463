// tests/manifest_index.rs
//
// Покрываем ManifestIndex:
// - порядок "свежие первыми" (запись a,b,c → [c,b,a]);
// - кэш: повторный entries(false) не перечитывает файл;
// - force_reload видит новый тег первым;
// - отсутствующий index.data = пустой манифест, битый = Decode;
// - writer под exclusive lock: читатель ждёт и видит полный файл.
//
// Запуск:
//   cargo test --test manifest_index -- --nocapture

use std::fs;
use std::io::{Seek, SeekFrom, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::Result;

use debugdata::lock::acquire_exclusive_lock;
use debugdata::{encode_manifest, index_path, DebugError, ManifestEntry, ManifestIndex};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

fn unique_root(prefix: &str) -> PathBuf {
    let pid = std::process::id();
    let t = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    let base = std::env::temp_dir();
    base.join(format!("dbgtest-manifest-{prefix}-{pid}-{t}-{id}"))
}

fn entry(tag: &str, url: &str) -> ManifestEntry {
    ManifestEntry {
        url: url.to_string(),
        method: "GET".into(),
        ip: "127.0.0.1".into(),
        time: 1_700_000_000.5,
        status_code: Some(200),
        ..ManifestEntry::new(tag)
    }
}

fn write_index(dir: &PathBuf, tags: &[&str]) -> Result<()> {
    let entries: Vec<ManifestEntry> = tags.iter().map(|t| entry(t, &format!("/{t}"))).collect();
    fs::write(index_path(dir), encode_manifest(&entries)?)?;
    Ok(())
}

#[test]
fn most_recent_first() -> Result<()> {
    let root = unique_root("order");
    fs::create_dir_all(&root)?;
    write_index(&root, &["a", "b", "c"])?;

    let mut idx = ManifestIndex::new(&root);
    let m = idx.entries(false)?;
    let tags: Vec<&str> = m.tags().collect();
    assert_eq!(tags, vec!["c", "b", "a"]);
    assert_eq!(m.latest().map(|(t, _)| t), Some("c"));
    assert_eq!(m.get("b").map(|e| e.url.as_str()), Some("/b"));
    Ok(())
}

#[test]
fn cached_until_forced() -> Result<()> {
    let root = unique_root("cache");
    fs::create_dir_all(&root)?;
    write_index(&root, &["a", "b", "c"])?;

    let mut idx = ManifestIndex::new(&root);
    let first: Vec<String> = idx.entries(false)?.tags().map(str::to_string).collect();
    assert!(idx.is_cached());

    // Писатель дописал d, но кэш его не видит
    write_index(&root, &["a", "b", "c", "d"])?;
    let second: Vec<String> = idx.entries(false)?.tags().map(str::to_string).collect();
    assert_eq!(first, second, "unforced read must return the cached manifest");
    assert!(!idx.entries(false)?.contains("d"));

    // force_reload перечитывает файл
    let m = idx.entries(true)?;
    assert_eq!(m.len(), 4);
    assert_eq!(m.latest().map(|(t, _)| t), Some("d"));

    // invalidate тоже сбрасывает кэш
    idx.invalidate();
    assert!(!idx.is_cached());
    assert_eq!(idx.entries(false)?.len(), 4);
    Ok(())
}

#[test]
fn absent_blank_and_corrupt_index() -> Result<()> {
    let root = unique_root("absent");
    fs::create_dir_all(&root)?;

    let mut idx = ManifestIndex::new(&root);
    assert!(idx.entries(false)?.is_empty(), "no index.data means no snapshots yet");

    fs::write(index_path(&root), b"  \n")?;
    assert!(idx.entries(true)?.is_empty(), "blank index.data is an empty manifest");

    fs::write(index_path(&root), b"{\"a\": {\"tag\": \"a\"")?;
    match idx.entries(true) {
        Err(DebugError::Decode { path, .. }) => assert_eq!(path, index_path(&root)),
        other => panic!("expected Decode, got {:?}", other.map(|m| m.len())),
    }
    Ok(())
}

#[test]
fn tag_taken_from_key_when_entry_omits_it() -> Result<()> {
    let root = unique_root("keytag");
    fs::create_dir_all(&root)?;
    fs::write(
        index_path(&root),
        br#"{"5f1a":{"url":"/x","ajax":1,"method":"POST","statusCode":500,"custom":"kept"}}"#,
    )?;

    let mut idx = ManifestIndex::new(&root);
    let m = idx.entries(false)?;
    let e = m.get("5f1a").expect("entry by key");
    assert_eq!(e.tag, "5f1a");
    assert!(e.ajax);
    assert_eq!(e.status_code, Some(500));
    assert_eq!(e.extra.get("custom").and_then(|v| v.as_str()), Some("kept"));
    Ok(())
}

#[test]
fn reader_waits_for_writer_lock() -> Result<()> {
    let root = unique_root("lock");
    fs::create_dir_all(&root)?;
    write_index(&root, &["a"])?;

    let full = encode_manifest(&[entry("a", "/a"), entry("b", "/b")])?;
    let mut guard = acquire_exclusive_lock(&index_path(&root))?.expect("index exists");

    let dir = root.clone();
    let reader = thread::spawn(move || -> Result<(Vec<String>, Duration)> {
        let t0 = Instant::now();
        let mut idx = ManifestIndex::new(&dir);
        let tags = idx.entries(false)?.tags().map(str::to_string).collect();
        Ok((tags, t0.elapsed()))
    });

    // Переписываем файл под exclusive lock, читатель стоит на shared
    thread::sleep(Duration::from_millis(150));
    {
        let f = guard.file_mut();
        f.set_len(0)?;
        f.seek(SeekFrom::Start(0))?;
        f.write_all(&full)?;
        f.flush()?;
    }
    drop(guard);

    let (tags, waited) = reader.join().expect("reader thread panicked")?;
    assert_eq!(tags, vec!["b".to_string(), "a".to_string()]);
    assert!(
        waited >= Duration::from_millis(100),
        "reader must block while the writer holds the lock (waited {:?})",
        waited
    );
    Ok(())
}
