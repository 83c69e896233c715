mod common;

use chaindb::{DbConfig, DbError, Session, row};
use common::{MemoryConnection, conn, session};

#[tokio::test]
async fn connection_opens_on_first_statement() {
    let db: Session<MemoryConnection> = Session::new(DbConfig::new().prefix("tb_"));
    assert!(!db.is_connected());

    // Building SQL never touches the connection.
    let sql = db.name("box").field("id").build_sql().unwrap();
    assert_eq!(sql, "SELECT id FROM tb_box");
    assert!(!db.is_connected());

    db.name("box").select().await.unwrap();
    assert!(db.is_connected());
}

#[tokio::test]
async fn chains_share_one_connection() {
    let db = session();
    db.name("a").select().await.unwrap();
    db.table("b").select().await.unwrap();

    assert_eq!(
        conn(&db).await.statements(),
        vec!["SELECT * FROM tb_a", "SELECT * FROM b"]
    );
}

#[tokio::test]
async fn raw_query_passes_sql_through() {
    let db = session();
    conn(&db).await.push_result(vec![row! { "n" => 2 }]);

    let rows = db
        .query("select count(*) n from tb_box where level > 8")
        .await
        .unwrap();

    assert_eq!(rows, vec![row! { "n" => 2 }]);
    assert_eq!(
        conn(&db).await.last_statement().unwrap(),
        "select count(*) n from tb_box where level > 8"
    );
}

#[tokio::test]
async fn explicit_transaction_calls_reach_connection() {
    let db = session();
    db.start_trans().await.unwrap();
    db.name("test").insert(row! { "id" => 1 }).await.unwrap();
    db.rollback().await.unwrap();
    db.start_trans().await.unwrap();
    db.commit().await.unwrap();

    assert_eq!(
        conn(&db).await.statements(),
        vec![
            "START TRANSACTION",
            "INSERT INTO tb_test (`id`) VALUES (1)",
            "ROLLBACK",
            "START TRANSACTION",
            "COMMIT",
        ]
    );
}

#[test]
fn missing_config_file_is_scaffolded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("database.toml");

    let err = Session::<MemoryConnection>::from_config_file(&path)
        .err()
        .unwrap();
    assert!(matches!(err, DbError::NotConfigured(_)));
    assert!(path.exists());

    let db = Session::<MemoryConnection>::from_config_file(&path).unwrap();
    assert_eq!(db.config(), &DbConfig::default());
}

#[test]
fn config_prefix_applies_to_name_only() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("database.toml");
    std::fs::write(&path, "database = \"shop\"\nprefix = \"fy_\"\n").unwrap();

    let db = Session::<MemoryConnection>::from_config_file(&path).unwrap();
    assert_eq!(db.name("user").build_sql().unwrap(), "SELECT * FROM fy_user");
    assert_eq!(db.table("user").build_sql().unwrap(), "SELECT * FROM user");
}
