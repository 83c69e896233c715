use super::*;
use crate::condition::{Cond, Where};
use crate::value::Value;

fn box_builder() -> Builder {
    Builder::with_prefix("tb_").name("box")
}

#[test]
fn test_select_basic() {
    let b = Builder::new().table("users");
    assert_eq!(b.build_sql().unwrap(), "SELECT * FROM users");
}

#[test]
fn test_name_applies_prefix() {
    assert_eq!(box_builder().table_name(), "tb_box");
    assert_eq!(Builder::with_prefix("tb_").table("box").table_name(), "box");
}

#[test]
fn test_no_table_is_usage_error() {
    let err = Builder::new().field("id").build_sql().unwrap_err();
    assert!(err.is_usage());
    assert_eq!(err.to_string(), "Usage error: No tables used");
}

#[test]
fn test_empty_table_name_is_reported() {
    let err = Builder::new().table("").build_sql().unwrap_err();
    assert!(err.is_usage());
    assert!(Builder::with_prefix("tb_").name("").build_sql().is_err());
}

#[test]
fn test_full_round_trip() {
    let sql = box_builder()
        .field("id,box_name name")
        .field("create_time")
        .and_where(Where::map([
            ("level", Cond::op(">", 8)),
            ("mobile", Cond::null()),
            ("gender", Cond::eq("m")),
            ("wechat", Cond::op("is", Value::Null)),
        ]))
        .where_op("level", ">", 8)
        .where_eq("delete_time", Value::Null)
        .where_eq("gender", "m")
        .where_op("wechat", "is", Value::Null)
        .where_op("wechat", "IS", Value::Null)
        .order("id desc")
        .order("create_time desc")
        .build_sql()
        .unwrap();

    assert_eq!(
        sql,
        "SELECT id,box_name name,create_time FROM tb_box \
         WHERE  `level` > 8 AND `mobile` IS null AND `gender` = 'm' AND `wechat` is null \
         AND `delete_time` IS null AND `wechat` IS null \
         ORDER BY id desc,create_time desc"
    );
}

#[test]
fn test_repeated_fragments_render_once() {
    let sql = Builder::new()
        .table("t")
        .field("a,b")
        .field("b,a,c")
        .where_eq("x", 1)
        .where_eq("x", 1)
        .and_where(Where::map([("x", Cond::eq(1)), ("y", Cond::eq(2))]))
        .order("a")
        .order("a")
        .build_sql()
        .unwrap();
    assert_eq!(sql, "SELECT a,b,c FROM t WHERE  `x` = 1 AND `y` = 2 ORDER BY a");
}

#[test]
fn test_build_sql_is_pure() {
    let b = Builder::new().table("t").where_eq("a", 1).limit(5);
    assert_eq!(b.build_sql().unwrap(), b.build_sql().unwrap());
}

#[test]
fn test_limit_forms() {
    let b = Builder::new().table("t").limit(10);
    assert_eq!(b.build_sql().unwrap(), "SELECT * FROM t LIMIT 10");

    let b = Builder::new().table("t").limit_range(20, 10);
    assert_eq!(b.build_sql().unwrap(), "SELECT * FROM t LIMIT 20, 10");

    let b = Builder::new().table("t").limit(10).limit_range(0, 3);
    assert_eq!(b.current_limit(), Some(Limit::Range(0, 3)));
}

#[test]
fn test_render_select_overrides_limit() {
    let b = Builder::new().table("t").limit(10);
    assert_eq!(
        b.render_select(Some(Limit::Count(1))).unwrap(),
        "SELECT * FROM t LIMIT 1"
    );
}

#[test]
fn test_order_by_direction() {
    let b = Builder::new().table("t").order_by("id", "DESC").order("name");
    assert_eq!(b.build_sql().unwrap(), "SELECT * FROM t ORDER BY id DESC,name");
}

#[test]
fn test_insert_sql() {
    let b = Builder::with_prefix("tb_").name("test");
    let row = crate::row! { "name" => "zs", "age" => 20, "mobile" => Value::Null };
    assert_eq!(
        b.render_insert(&row).unwrap(),
        "INSERT INTO tb_test (`name`, `age`, `mobile`) VALUES ('zs', 20, null)"
    );
}

#[test]
fn test_insert_empty_row_rejected() {
    let b = Builder::new().table("t");
    assert!(b.render_insert(&Row::new()).unwrap_err().is_usage());
}

#[test]
fn test_update_sql() {
    let b = Builder::new().table("t").where_op("id", "<>", 1);
    let data = crate::row! { "name" => "ls", "age" => 21 };
    assert_eq!(
        b.render_update(&data).unwrap(),
        "UPDATE t SET `name` = 'ls', `age` = 21 WHERE `id` <> 1"
    );
}

#[test]
fn test_update_requires_where() {
    let b = Builder::new().table("t");
    let data = crate::row! { "name" => "ls" };
    let err = b.render_update(&data).unwrap_err();
    assert!(err.is_usage());
}

#[test]
fn test_update_requires_data() {
    let b = Builder::new().table("t").where_eq("id", 1);
    assert!(b.render_update(&Row::new()).unwrap_err().is_usage());
}

#[test]
fn test_delete_sql() {
    let b = Builder::new().table("t").where_eq("id", 4);
    assert_eq!(b.render_delete().unwrap(), "DELETE FROM t WHERE `id` = 4");
}

#[test]
fn test_delete_requires_where() {
    let err = Builder::new().table("t").render_delete().unwrap_err();
    assert!(err.is_usage());
}

#[test]
fn test_where_json_error_is_deferred() {
    let b = Builder::new()
        .table("t")
        .where_json(&serde_json::json!({ "level": [">"] }));
    let err = b.build_sql().unwrap_err();
    assert!(err.to_string().contains("where format invalid"));
}

#[test]
fn test_where_json_mapping() {
    let b = Builder::new()
        .table("t")
        .where_json(&serde_json::json!({ "level": [">", 8] }));
    assert_eq!(b.build_sql().unwrap(), "SELECT * FROM t WHERE  `level` > 8");
}

#[test]
fn test_select_where_has_two_spaces() {
    let b = Builder::with_prefix("tb_").name("box").where_op("level", ">", 8);
    assert_eq!(b.build_sql().unwrap(), "SELECT * FROM tb_box WHERE  `level` > 8");

    // UPDATE and DELETE keep a single space.
    assert_eq!(b.render_delete().unwrap(), "DELETE FROM tb_box WHERE `level` > 8");
}
