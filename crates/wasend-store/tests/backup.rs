use std::path::PathBuf;
use tempfile::TempDir;
use wasend_core::domain::Contact;
use wasend_store::error::StoreError;
use wasend_store::Store;

#[test]
fn backup_creates_readable_snapshot() {
    let temp = TempDir::new().expect("temp dir");
    let db_path = temp.path().join("wasend.sqlite3");
    let backup_path = temp.path().join("snapshots").join("backup.sqlite3");

    let store = Store::open(&db_path).expect("open store");
    store.migrate().expect("migrate");
    store
        .contacts()
        .upsert(1, Contact::new("Ada Lovelace", "+44 1").expect("contact"))
        .expect("upsert");

    store.backup_to(&backup_path).expect("backup");
    assert!(backup_path.exists());

    let backup = Store::open(&backup_path).expect("open backup");
    let contacts = backup.contacts().list().expect("list contacts");
    assert_eq!(contacts.len(), 1);
    assert_eq!(contacts[0].name, "Ada Lovelace");
}

#[test]
fn backup_rejects_database_and_sidecar_paths() {
    let temp = TempDir::new().expect("temp dir");
    let db_path = temp.path().join("wasend.sqlite3");
    let store = Store::open(&db_path).expect("open store");
    store.migrate().expect("migrate");

    let err = store.backup_to(&db_path).expect_err("backup should fail");
    assert!(matches!(err, StoreError::InvalidBackupPath(_)));

    for suffix in ["-wal", "-shm"] {
        let sidecar = PathBuf::from(format!("{}{}", db_path.display(), suffix));
        let err = store.backup_to(&sidecar).expect_err("backup should fail");
        assert!(matches!(err, StoreError::InvalidBackupPath(_)));
    }
}

#[cfg(unix)]
#[test]
fn backup_rejects_hardlink_paths() {
    let temp = TempDir::new().expect("temp dir");
    let db_path = temp.path().join("wasend.sqlite3");
    let link_path = temp.path().join("wasend-link.sqlite3");
    let store = Store::open(&db_path).expect("open store");
    store.migrate().expect("migrate");

    std::fs::hard_link(&db_path, &link_path).expect("hard link");
    let err = store.backup_to(&link_path).expect_err("backup should fail");
    assert!(matches!(err, StoreError::InvalidBackupPath(_)));
}
