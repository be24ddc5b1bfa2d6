use kordict_core::db::migrations::latest_version;
use kordict_core::db::{open_db, open_db_in_memory, DbError};
use rusqlite::Connection;

const DICTIONARY_TABLES: [&str; 6] = [
    "hanja",
    "korean_word_categories",
    "korean_words",
    "korean_word_senses",
    "korean_word_sense_categories",
    "hanja_usages",
];

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    for table in DICTIONARY_TABLES {
        assert_table_exists(&conn, table);
    }
}

#[test]
fn connections_enforce_foreign_keys() {
    let conn = open_db_in_memory().unwrap();
    let enabled: i64 = conn
        .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(enabled, 1);

    let orphan = conn.execute(
        "INSERT INTO korean_word_senses (id, word_id, pos, definition, definition_original)
         VALUES (1, 404, -1, 'x', '');",
        [],
    );
    assert!(orphan.is_err());
}

#[test]
fn enum_columns_reject_out_of_range_codes() {
    let conn = open_db_in_memory().unwrap();
    let bad_unit = conn.execute(
        "INSERT INTO korean_words (id, word, unit, word_type, hanja)
         VALUES (1, '가', 4, -1, '');",
        [],
    );
    assert!(bad_unit.is_err());

    let bad_type = conn.execute(
        "INSERT INTO korean_words (id, word, unit, word_type, hanja)
         VALUES (2, '가', 2, -2, '');",
        [],
    );
    assert!(bad_type.is_err());
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("kordict.sqlite3");

    let conn_first = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_first), latest_version());
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    assert_table_exists(&conn_second, "korean_words");
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
