#![allow(dead_code)]

use db::{ConnectionProvider, Database, DbConfig, DbError, SharedConnection, SurrealConnector};
use serde_json::json;

/// Open a fresh in-memory store and return a provider sharing its handle.
pub async fn setup_db() -> Result<(Database, SharedConnection), DbError> {
    let db = SurrealConnector::new(DbConfig::memory()).acquire().await?;
    let provider = SharedConnection::new(db.clone());
    Ok((db, provider))
}

async fn create(db: &Database, table: &'static str, id: i64, content: serde_json::Value) -> Result<(), DbError> {
    db.query("CREATE type::thing($table, $id) CONTENT $content")
        .bind(("table", table))
        .bind(("id", id))
        .bind(("content", content))
        .await?
        .check()?;
    Ok(())
}

pub async fn insert_log(db: &Database, id: i64, level: &str, timestamp: &str) -> Result<(), DbError> {
    create(
        db,
        "logs",
        id,
        json!({
            "process_name": format!("Process {id}"),
            "event_id": 1000 + id,
            "level": level,
            "message": format!("Event {id}"),
            "additional_data": null,
            "process_id": format!("PROC-{id}"),
            "timestamp": timestamp,
        }),
    )
    .await
}

pub async fn insert_queue(db: &Database, id: i64, name: &str, itemtype: &str) -> Result<(), DbError> {
    create(db, "queues", id, json!({ "name": name, "itemtype": itemtype })).await
}

pub async fn insert_item(
    db: &Database,
    id: i64,
    queue_id: i64,
    status: i64,
    priority: i64,
) -> Result<(), DbError> {
    create(
        db,
        "queue_items",
        id,
        json!({
            "queue_id": queue_id,
            "status": status,
            "priority": priority,
            "value": { "item": id },
        }),
    )
    .await
}
