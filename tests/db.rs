use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::sql_types::Integer;

mod common;

#[derive(QueryableByName)]
struct Flag {
    #[diesel(sql_type = Integer)]
    foreign_keys: i32,
}

#[test]
fn test_pool_hands_out_connections() {
    let test_db = common::TestDb::new("test_pool_hands_out_connections.db");
    let conn = test_db.pool().get();
    assert!(conn.is_ok());
}

#[test]
fn test_foreign_keys_are_enforced() {
    let test_db = common::TestDb::new("test_foreign_keys_are_enforced.db");
    let mut conn = test_db.pool().get().unwrap();

    let flag = diesel::sql_query("PRAGMA foreign_keys")
        .get_result::<Flag>(&mut conn)
        .unwrap();
    assert_eq!(flag.foreign_keys, 1);

    let orphan = conn.batch_execute(
        "INSERT INTO solicitudes (servicio_id, cliente_nombre, cliente_email, mensaje, estatus, fecha_creacion) \
         VALUES (999, 'Ana', 'ana@example.com', 'Hola', 'nuevo', '2025-01-01 00:00:00')",
    );
    assert!(orphan.is_err());
}

#[test]
fn test_migrations_are_idempotent() {
    let test_db = common::TestDb::new("test_migrations_are_idempotent.db");
    assert!(catalogo_servicios::db::run_migrations(&test_db.pool()).is_ok());
}
