//! End-to-end behavior of file-backed preference stores.
//!
//! Each test uses its own temporary config directory and opens fresh store
//! instances to observe what actually reached the file.

use vise_prefs::{
    Backend, DynamicPrefs, MemoryBackend, PrefsError, SqliteBackend, Value, GUI_DYNAMIC,
};
use vise_prefs_testkit::{FailingBackend, TempStore};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .try_init();
}

// ─────────────────────────────────────────────────────────────────────────────
// Zoom scenario
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_zoom_without_default() {
    init_tracing();
    let fixture = TempStore::new();
    let mut prefs = fixture.open(GUI_DYNAMIC);

    assert_eq!(prefs.get("zoom").unwrap(), None);

    prefs.set("zoom", 150).unwrap();
    assert_eq!(prefs.get("zoom").unwrap(), Some(Value::Int(150)));
    assert_eq!(
        fixture.rows(GUI_DYNAMIC),
        vec![("zoom".to_string(), "150".to_string())]
    );

    // Setting the same value again changes nothing observable.
    prefs.set("zoom", 150).unwrap();
    assert_eq!(
        fixture.rows(GUI_DYNAMIC),
        vec![("zoom".to_string(), "150".to_string())]
    );
}

#[test]
fn test_zoom_with_default() {
    init_tracing();
    let fixture = TempStore::new();
    let mut prefs = fixture.open(GUI_DYNAMIC);
    prefs.set_default("zoom", 100);
    assert_eq!(prefs.get("zoom").unwrap(), Some(Value::Int(100)));

    prefs.set("zoom", 150).unwrap();
    assert_eq!(fixture.rows(GUI_DYNAMIC).len(), 1);

    prefs.set("zoom", 100).unwrap();
    assert!(fixture.rows(GUI_DYNAMIC).is_empty());
    assert_eq!(prefs.get("zoom").unwrap(), Some(Value::Int(100)));
}

// ─────────────────────────────────────────────────────────────────────────────
// Persistence
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_default_suppression_survives_reopen() {
    init_tracing();
    let fixture = TempStore::new();
    {
        let mut prefs = fixture.open(GUI_DYNAMIC);
        prefs.set_default("zoom", 100);
        prefs.set("zoom", 130).unwrap();
        prefs.set("zoom", 100).unwrap();
    }

    let mut reopened = fixture.open(GUI_DYNAMIC);
    reopened.set_default("zoom", 100);
    assert_eq!(reopened.get("zoom").unwrap(), Some(Value::Int(100)));
    assert!(fixture.rows(GUI_DYNAMIC).is_empty());
}

#[test]
fn test_blob_survives_reopen() {
    init_tracing();
    let fixture = TempStore::new();
    let bytes = b"\x00\x01\xffdata".to_vec();
    {
        let mut prefs = fixture.open(GUI_DYNAMIC);
        prefs.set("blob", bytes.clone()).unwrap();
    }

    let mut reopened = fixture.open(GUI_DYNAMIC);
    let value = reopened.get("blob").unwrap().unwrap();
    assert_eq!(value.as_bytes(), Some(bytes.as_slice()));
}

#[test]
fn test_nested_value_survives_reopen() {
    init_tracing();
    let fixture = TempStore::new();
    let geometry = Value::List(vec![
        Value::from("main-window"),
        Value::from(vec![0u8, 0, 5, 0, 3, 32]),
        Value::Float(1.25),
    ]);
    fixture.open(GUI_DYNAMIC).set("geometry", geometry.clone()).unwrap();

    assert_eq!(fixture.open(GUI_DYNAMIC).get("geometry").unwrap(), Some(geometry));
}

#[test]
fn test_stores_are_separate_files() {
    let fixture = TempStore::new();
    fixture.open("gui-dynamic").set("zoom", 150).unwrap();
    fixture.open("downloads").set("last-dir", "/tmp").unwrap();

    assert_eq!(fixture.rows("gui-dynamic").len(), 1);
    assert_eq!(
        fixture.rows("downloads"),
        vec![("last-dir".to_string(), "\"/tmp\"".to_string())]
    );
}

#[test]
fn test_instances_do_not_share_cache() {
    let fixture = TempStore::new();
    let mut first = fixture.open(GUI_DYNAMIC);
    let mut second = fixture.open(GUI_DYNAMIC);

    assert_eq!(second.get("zoom").unwrap(), None);
    first.set("zoom", 150).unwrap();
    assert_eq!(second.get("zoom").unwrap(), None);

    second.invalidate_cache();
    assert_eq!(second.get("zoom").unwrap(), Some(Value::Int(150)));
}

// ─────────────────────────────────────────────────────────────────────────────
// Cache
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_reads_after_write_come_from_cache() {
    let (backend, switch) = FailingBackend::new(MemoryBackend::new());
    let mut prefs = DynamicPrefs::with_backend("test", backend);

    prefs.set("zoom", 150).unwrap();
    switch.fail_reads(true);
    switch.fail_writes(true);

    assert_eq!(prefs.get("zoom").unwrap(), Some(Value::Int(150)));
    assert_eq!(switch.loads(), 0);
}

#[test]
fn test_misses_are_cached() {
    let (backend, switch) = FailingBackend::new(MemoryBackend::new());
    let mut prefs = DynamicPrefs::with_backend("test", backend);

    assert_eq!(prefs.get("zoom").unwrap(), None);
    assert_eq!(prefs.get("zoom").unwrap(), None);
    assert_eq!(switch.loads(), 1);
}

#[test]
fn test_failed_write_keeps_previous_value() {
    let (backend, switch) = FailingBackend::new(MemoryBackend::new());
    let mut prefs = DynamicPrefs::with_backend("test", backend);
    prefs.set("zoom", 150).unwrap();

    switch.fail_writes(true);
    assert!(matches!(prefs.set("zoom", 175), Err(PrefsError::Store(_))));

    switch.heal();
    assert_eq!(prefs.get("zoom").unwrap(), Some(Value::Int(150)));
    prefs.invalidate_cache();
    assert_eq!(prefs.get("zoom").unwrap(), Some(Value::Int(150)));
}

#[test]
fn test_corrupt_row_propagates() {
    let fixture = TempStore::new();
    fixture.open(GUI_DYNAMIC).set("ok", 1).unwrap();
    fixture.execute_batch(
        GUI_DYNAMIC,
        "INSERT INTO prefs (name, value) VALUES ('bad', '{\"__class__\": \"set\"}')",
    );

    let mut prefs = fixture.open(GUI_DYNAMIC);
    prefs.set_default("bad", 0);
    assert!(matches!(
        prefs.get("bad"),
        Err(PrefsError::CorruptValue { ref key, .. }) if key == "bad"
    ));
    assert_eq!(prefs.get("ok").unwrap(), Some(Value::Int(1)));
}

// ─────────────────────────────────────────────────────────────────────────────
// Buffering
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_buffered_writes_isolated_until_end() {
    init_tracing();
    let fixture = TempStore::new();
    let mut prefs = fixture.open(GUI_DYNAMIC);
    prefs.set("zoom", 110).unwrap();

    prefs.begin_buffering().unwrap();
    prefs.set("zoom", 150).unwrap();
    assert_eq!(prefs.get("zoom").unwrap(), Some(Value::Int(110)));
    assert_eq!(fixture.rows(GUI_DYNAMIC)[0].1, "110");

    prefs.end_buffering().unwrap();
    assert_eq!(prefs.get("zoom").unwrap(), Some(Value::Int(150)));
    assert_eq!(fixture.open(GUI_DYNAMIC).get("zoom").unwrap(), Some(Value::Int(150)));
}

#[test]
fn test_guard_flushes_on_early_return() {
    fn save_geometry(prefs: &mut DynamicPrefs<SqliteBackend>) -> vise_prefs::Result<()> {
        let mut session = prefs.buffer()?;
        session.set("width", 1280)?;
        session.set("height", 800)?;
        session.set("ratio", f64::INFINITY)?;
        session.commit()
    }

    let fixture = TempStore::new();
    let mut prefs = fixture.open(GUI_DYNAMIC);

    let err = save_geometry(&mut prefs).unwrap_err();
    assert!(matches!(err, PrefsError::UnencodableValue { .. }));
    assert!(!prefs.is_buffering());
    assert_eq!(
        fixture.rows(GUI_DYNAMIC),
        vec![
            ("width".to_string(), "1280".to_string()),
            ("height".to_string(), "800".to_string())
        ]
    );
}

#[test]
fn test_flush_is_atomic_in_sqlite() {
    init_tracing();
    let fixture = TempStore::new();
    let mut prefs = fixture.open(GUI_DYNAMIC);
    prefs.set("keep", "old").unwrap();
    fixture.execute_batch(
        GUI_DYNAMIC,
        "CREATE TRIGGER reject_boom BEFORE INSERT ON prefs
         WHEN NEW.name = 'boom'
         BEGIN SELECT RAISE(ABORT, 'rejected'); END;",
    );

    prefs.begin_buffering().unwrap();
    prefs.set("a", 1).unwrap();
    prefs.set("keep", "new").unwrap();
    prefs.set("boom", 2).unwrap();
    prefs.set("c", 3).unwrap();
    assert!(matches!(prefs.end_buffering(), Err(PrefsError::Store(_))));

    assert_eq!(
        fixture.rows(GUI_DYNAMIC),
        vec![("keep".to_string(), "\"old\"".to_string())]
    );
    assert_eq!(prefs.get("keep").unwrap(), Some(Value::from("old")));
    assert_eq!(prefs.get("a").unwrap(), None);
    assert_eq!(prefs.pending_len(), 4);
    assert!(!prefs.is_buffering());
}

#[test]
fn test_failed_flush_can_be_retried() {
    let (backend, switch) = FailingBackend::new(MemoryBackend::new());
    let mut prefs = DynamicPrefs::with_backend("test", backend);

    switch.fail_apply_at(2);
    prefs.begin_buffering().unwrap();
    for (i, name) in ["a", "b", "c", "d"].into_iter().enumerate() {
        prefs.set(name, i as i64).unwrap();
    }
    assert!(prefs.end_buffering().is_err());
    assert!(prefs.backend().unwrap().inner().is_empty());

    switch.heal();
    prefs.end_buffering().unwrap();
    assert_eq!(prefs.pending_len(), 0);
    assert_eq!(prefs.keys().unwrap(), vec!["a", "b", "c", "d"]);
    assert_eq!(prefs.get("d").unwrap(), Some(Value::Int(3)));
}

#[test]
fn test_direct_write_supersedes_unflushed_write() {
    let (backend, switch) = FailingBackend::new(MemoryBackend::new());
    let mut prefs = DynamicPrefs::with_backend("test", backend);

    prefs.begin_buffering().unwrap();
    prefs.set("zoom", 150).unwrap();
    switch.fail_writes(true);
    assert!(prefs.end_buffering().is_err());
    assert_eq!(prefs.pending_len(), 1);

    switch.heal();
    prefs.set("zoom", 200).unwrap();
    assert_eq!(prefs.pending_len(), 0);

    prefs.begin_buffering().unwrap();
    prefs.set("other", 1).unwrap();
    prefs.end_buffering().unwrap();

    assert_eq!(prefs.get("zoom").unwrap(), Some(Value::Int(200)));
    prefs.invalidate_cache();
    assert_eq!(prefs.get("zoom").unwrap(), Some(Value::Int(200)));
    assert_eq!(prefs.keys().unwrap(), vec!["zoom", "other"]);
}

#[test]
fn test_guard_drop_logs_failed_flush() {
    init_tracing();
    let (backend, switch) = FailingBackend::new(MemoryBackend::new());
    let mut prefs = DynamicPrefs::with_backend("test", backend);

    switch.fail_writes(true);
    {
        let mut session = prefs.buffer().unwrap();
        session.set("zoom", 150).unwrap();
    }
    assert!(!prefs.is_buffering());
    assert_eq!(prefs.pending_len(), 1);
}

// ─────────────────────────────────────────────────────────────────────────────
// Opening
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_unopenable_file_is_storage_unavailable() {
    let fixture = TempStore::new();
    std::fs::create_dir_all(fixture.path(GUI_DYNAMIC)).unwrap();

    let mut prefs = fixture.open(GUI_DYNAMIC);
    assert!(matches!(
        prefs.get("zoom"),
        Err(PrefsError::StorageUnavailable(_))
    ));
}

#[test]
fn test_reopen_keeps_schema() {
    let fixture = TempStore::new();
    fixture.open(GUI_DYNAMIC).set("zoom", 150).unwrap();

    let backend = SqliteBackend::open(fixture.path(GUI_DYNAMIC)).unwrap();
    assert_eq!(
        vise_prefs::store::migration::schema_version(backend.connection()).unwrap(),
        vise_prefs::store::migration::CURRENT_VERSION
    );
    assert_eq!(backend.entries().unwrap().len(), 1);
}
