use rusqlite::functions::FunctionFlags;
use rusqlite::{Connection, Error};
use sqlauth::db::{
    Command, ConnectionState, DataTable, ExecContext, Parameter, SqlHelper, Value,
};
use std::time::Duration;
use tempfile::TempDir;

fn setup() -> (TempDir, SqlHelper) {
    let dir = tempfile::tempdir().unwrap();
    let helper = SqlHelper::new(dir.path().join("exec.db").to_string_lossy());
    helper
        .execute_non_query(
            ExecContext::Owned,
            &Command::text(
                "CREATE TABLE items (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT NOT NULL, note TEXT)",
            ),
        )
        .unwrap();
    (dir, helper)
}

fn insert(helper: &SqlHelper, name: &str) -> i64 {
    helper
        .execute_insert(
            ExecContext::Owned,
            &Command::text("INSERT INTO items (name) VALUES (:name)").param("name", name.to_owned()),
        )
        .unwrap()
}

fn count(helper: &SqlHelper) -> i64 {
    match helper
        .execute_scalar(ExecContext::Owned, &Command::text("SELECT COUNT(*) FROM items"))
        .unwrap()
    {
        Value::Integer(n) => n,
        other => panic!("unexpected count {other:?}"),
    }
}

/// A second connection that fails immediately instead of waiting on locks.
fn impatient_connection(helper: &SqlHelper) -> Connection {
    let conn = Connection::open(helper.connection_string()).unwrap();
    conn.busy_timeout(Duration::ZERO).unwrap();
    conn
}

#[test]
fn insert_returns_generated_keys() {
    let (_dir, helper) = setup();
    assert_eq!(insert(&helper, "first"), 1);
    assert_eq!(insert(&helper, "second"), 2);
    assert_eq!(count(&helper), 2);
}

#[test]
fn non_query_reports_affected_rows() {
    let (_dir, helper) = setup();
    for name in ["a", "b", "c"] {
        insert(&helper, name);
    }
    let changed = helper
        .execute_non_query(
            ExecContext::Owned,
            &Command::text("UPDATE items SET note = @note WHERE name <> @name")
                .param("@note", "touched".to_string())
                .param("@name", "b".to_string()),
        )
        .unwrap();
    assert_eq!(changed, 2);
}

#[test]
fn non_query_rejects_statements_that_return_rows() {
    let (_dir, helper) = setup();
    insert(&helper, "a");
    let err = helper
        .execute_non_query(ExecContext::Owned, &Command::text("SELECT * FROM items"))
        .unwrap_err();
    assert!(matches!(err, Error::ExecuteReturnedResults));
}

#[test]
fn scalar_of_empty_result_is_null() {
    let (_dir, helper) = setup();
    let cmd = Command::text("SELECT name FROM items WHERE id = ?").arg(99);
    assert_eq!(
        helper.execute_scalar(ExecContext::Owned, &cmd).unwrap(),
        Value::Null
    );
    assert_eq!(
        helper.execute_scalar_value(ExecContext::Owned, &cmd).unwrap(),
        ""
    );
}

#[test]
fn scalar_value_of_sql_null_is_empty_string() {
    let (_dir, helper) = setup();
    let id = insert(&helper, "a");
    let value = helper
        .execute_scalar_value(
            ExecContext::Owned,
            &Command::text("SELECT note FROM items WHERE id = ?").arg(id),
        )
        .unwrap();
    assert_eq!(value, "");

    let value = helper
        .execute_scalar_value(ExecContext::Owned, &Command::text("SELECT 40 + 2"))
        .unwrap();
    assert_eq!(value, "42");
}

#[test]
fn unknown_parameter_names_are_errors() {
    let (_dir, helper) = setup();
    let err = helper
        .execute_scalar(
            ExecContext::Owned,
            &Command::text("SELECT name FROM items WHERE id = :id").param("ident", 1),
        )
        .unwrap_err();
    assert!(matches!(err, Error::InvalidParameterName(name) if name == ":ident"));
}

#[test]
fn reader_streams_rows_in_order() {
    let (_dir, helper) = setup();
    for name in ["a", "b", "c"] {
        insert(&helper, name);
    }
    let names = helper
        .execute_reader(
            ExecContext::Owned,
            &Command::text("SELECT id, name FROM items ORDER BY id"),
            |reader| {
                assert_eq!(reader.columns(), ["id", "name"]);
                reader
                    .map(|row| row.map(|row| row.by_name("name").cloned()))
                    .collect::<rusqlite::Result<Vec<_>>>()
            },
        )
        .unwrap();
    assert_eq!(
        names,
        vec![
            Some(Value::Text("a".into())),
            Some(Value::Text("b".into())),
            Some(Value::Text("c".into())),
        ]
    );
}

#[test]
fn reader_holds_its_connection_only_while_open() {
    let (_dir, helper) = setup();
    for name in ["a", "b", "c"] {
        insert(&helper, name);
    }
    let other = impatient_connection(&helper);

    helper
        .execute_reader(
            ExecContext::Owned,
            &Command::text("SELECT name FROM items"),
            |mut reader| {
                assert!(reader.read()?.is_some());
                // Mid-stream the reader still has the database open for reading.
                assert!(other
                    .execute("INSERT INTO items (name) VALUES ('blocked')", [])
                    .is_err());
                reader.close();
                Ok(())
            },
        )
        .unwrap();

    // Closed reader, closed connection: writers are no longer blocked.
    other
        .execute("INSERT INTO items (name) VALUES ('after')", [])
        .unwrap();
    assert_eq!(count(&helper), 4);
}

#[test]
fn exhausted_reader_reports_closed() {
    let (_dir, helper) = setup();
    insert(&helper, "only");
    let mut conn = helper.connection();
    let closed = helper
        .execute_reader(
            ExecContext::Connection(&mut conn),
            &Command::text("SELECT name FROM items"),
            |mut reader| {
                while reader.read()?.is_some() {}
                Ok(reader.is_closed())
            },
        )
        .unwrap();
    assert!(closed);
    // A caller-supplied connection is left for the caller to close.
    assert_eq!(conn.state(), ConnectionState::Open);
    conn.close().unwrap();
    assert_eq!(conn.state(), ConnectionState::Closed);
}

#[test]
fn reader_errors_propagate() {
    let (_dir, helper) = setup();
    let err = helper
        .execute_reader(
            ExecContext::Owned,
            &Command::text("SELECT * FROM no_such_table"),
            |reader| Ok(reader.count()),
        )
        .unwrap_err();
    assert!(matches!(err, Error::SqliteFailure(..)));
}

#[test]
fn failed_reader_releases_its_connection() {
    let (_dir, helper) = setup();
    for name in ["a", "b"] {
        insert(&helper, name);
    }
    let other = impatient_connection(&helper);

    let err = helper
        .execute_reader(
            ExecContext::Owned,
            &Command::text("SELECT name FROM items"),
            |mut reader| {
                assert!(reader.read()?.is_some());
                Err::<(), _>(Error::QueryReturnedNoRows)
            },
        )
        .unwrap_err();
    assert!(matches!(err, Error::QueryReturnedNoRows));

    other
        .execute("INSERT INTO items (name) VALUES ('after')", [])
        .unwrap();
    assert_eq!(count(&helper), 3);
}

#[test]
fn failed_data_set_releases_its_connection() {
    let (_dir, helper) = setup();
    insert(&helper, "a");
    let other = impatient_connection(&helper);

    let err = helper
        .get_data_set(
            ExecContext::Owned,
            &Command::text("SELECT name FROM items; SELECT * FROM no_such_table"),
        )
        .unwrap_err();
    assert!(matches!(err, Error::SqliteFailure(..)));

    other
        .execute("INSERT INTO items (name) VALUES ('after')", [])
        .unwrap();
    assert_eq!(count(&helper), 2);
}

#[test]
fn positional_and_named_parameters_mix() {
    let (_dir, helper) = setup();
    let table = helper
        .get_data_table(
            ExecContext::Owned,
            &Command::text("SELECT ? AS a, :b AS b").param("b", 2).arg(1),
        )
        .unwrap();
    assert_eq!(table.value(0, "a"), Some(&Value::Integer(1)));
    assert_eq!(table.value(0, "b"), Some(&Value::Integer(2)));

    let set = helper
        .get_data_set(
            ExecContext::Owned,
            &Command::text("SELECT :id AS a; SELECT ? AS b")
                .param("id", 2)
                .arg(5),
        )
        .unwrap();
    assert_eq!(set.table(0).unwrap().value(0, "a"), Some(&Value::Integer(2)));
    assert_eq!(set.table(1).unwrap().value(0, "b"), Some(&Value::Integer(5)));
}

#[test]
fn data_table_materializes_all_rows() {
    let (_dir, helper) = setup();
    for name in ["a", "b"] {
        insert(&helper, name);
    }
    let table: DataTable = helper
        .get_data_table(
            ExecContext::Owned,
            &Command::text("SELECT id, name, note FROM items ORDER BY id"),
        )
        .unwrap();
    assert_eq!(table.columns(), ["id", "name", "note"]);
    assert_eq!(table.len(), 2);
    assert_eq!(table.value(1, "name"), Some(&Value::Text("b".into())));
    assert_eq!(table.value(0, "note"), Some(&Value::Null));
}

#[test]
fn data_set_collects_each_result_set() {
    let (_dir, helper) = setup();
    for name in ["a", "b", "c"] {
        insert(&helper, name);
    }
    let set = helper
        .get_data_set(
            ExecContext::Owned,
            &Command::text(
                "SELECT name FROM items WHERE id = :id;
                 UPDATE items SET note = :note WHERE id = :id;
                 SELECT id, note FROM items WHERE note IS NOT NULL",
            )
            .param("id", 2)
            .param("note", "picked".to_string()),
        )
        .unwrap();

    assert_eq!(set.len(), 2);
    let first = set.table(0).unwrap();
    assert_eq!(first.value(0, "name"), Some(&Value::Text("b".into())));
    let second = set.table(1).unwrap();
    assert_eq!(second.len(), 1);
    assert_eq!(second.value(0, "id"), Some(&Value::Integer(2)));
    assert_eq!(second.value(0, "note"), Some(&Value::Text("picked".into())));
}

#[test]
fn transaction_context_respects_rollback_and_commit() {
    let (_dir, helper) = setup();
    let mut conn = helper.connection();
    let add = Command::text("INSERT INTO items (name) VALUES (?)").arg("tx".to_string());

    {
        let tx = conn.transaction().unwrap();
        let id = helper
            .execute_insert(ExecContext::Transaction(&tx), &add)
            .unwrap();
        assert_eq!(id, 1);
        tx.rollback().unwrap();
    }
    assert_eq!(count(&helper), 0);

    {
        let tx = conn.transaction().unwrap();
        helper
            .execute_non_query(ExecContext::Transaction(&tx), &add)
            .unwrap();
        tx.commit().unwrap();
    }
    assert_eq!(count(&helper), 1);
}

#[test]
fn borrowed_connection_is_opened_on_demand() {
    let (_dir, helper) = setup();
    let mut conn = helper.connection();
    assert_eq!(conn.state(), ConnectionState::Closed);

    let value = helper
        .execute_scalar(
            ExecContext::Connection(&mut conn),
            &Command::text("SELECT COUNT(*) FROM items"),
        )
        .unwrap();
    assert_eq!(value, Value::Integer(0));
    assert_eq!(conn.state(), ConnectionState::Open);
}

#[test]
fn stored_procedures_call_sql_functions() {
    let (_dir, helper) = setup();
    let value = helper
        .execute_scalar_value(
            ExecContext::Owned,
            &Command::procedure("upper").arg("abc".to_string()),
        )
        .unwrap();
    assert_eq!(value, "ABC");

    let mut conn = helper.connection();
    conn.open()
        .unwrap()
        .create_scalar_function(
            "add_one",
            1,
            FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
            |ctx| Ok(ctx.get::<i64>(0)? + 1),
        )
        .unwrap();
    let value = helper
        .execute_scalar(
            ExecContext::Connection(&mut conn),
            &Command::procedure("add_one").with_parameters([Parameter::new("n", 41)]),
        )
        .unwrap();
    assert_eq!(value, Value::Integer(42));
}

#[test]
fn empty_connection_string_fails_every_call() {
    let helper = SqlHelper::new("");
    let err = helper
        .execute_non_query(ExecContext::Owned, &Command::text("SELECT 1"))
        .unwrap_err();
    assert!(matches!(err, Error::InvalidPath(_)));
}
