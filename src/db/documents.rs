// src/db/documents.rs
use chrono::Utc;
use rand::distributions::Alphanumeric;
use rand::Rng;
use rusqlite::{params, OptionalExtension};
use serde_json::Value;

use crate::db::connection::Database;
use crate::errors::ServerError;
use crate::storage::{Document, DocumentStore, StoreError};

const DOCUMENT_ID_LEN: usize = 20;

/// JSON documents in SQLite, grouped by collection.
#[derive(Debug, Clone)]
pub struct SqliteDocumentStore {
    db: Database,
}

impl SqliteDocumentStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

fn generate_document_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(DOCUMENT_ID_LEN)
        .map(char::from)
        .collect()
}

fn json_path(field: &str) -> Result<String, StoreError> {
    let valid = !field.is_empty() && field.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid {
        return Err(StoreError(format!("unsupported order field: {field}")));
    }
    Ok(format!("$.{field}"))
}

fn decode_row(id: String, raw: String) -> Result<Document, ServerError> {
    let data = serde_json::from_str(&raw)
        .map_err(|e| ServerError::DbError(format!("document {id} is not valid json: {e}")))?;
    Ok(Document { id, data })
}

impl DocumentStore for SqliteDocumentStore {
    fn insert(&self, collection: &str, data: &Value) -> Result<String, StoreError> {
        let raw = serde_json::to_string(data).map_err(|e| StoreError(e.to_string()))?;
        let id = generate_document_id();
        let now = Utc::now().timestamp_millis();

        self.db
            .with_conn(|conn| {
                conn.execute(
                    "insert into documents (collection, id, data, created_at) values (?, ?, ?, ?)",
                    params![collection, id, raw, now],
                )
                .map_err(|e| ServerError::DbError(format!("insert document failed: {e}")))?;
                Ok(())
            })
            .map_err(|e| StoreError(e.to_string()))?;

        Ok(id)
    }

    fn query_ordered(
        &self,
        collection: &str,
        order_by: &str,
        descending: bool,
    ) -> Result<Vec<Document>, StoreError> {
        let path = json_path(order_by)?;
        let sql = if descending {
            "select id, data from documents where collection = ?
             order by json_extract(data, ?) desc, rowid desc"
        } else {
            "select id, data from documents where collection = ?
             order by json_extract(data, ?) asc, rowid asc"
        };

        self.db
            .with_conn(|conn| {
                let mut stmt = conn
                    .prepare(sql)
                    .map_err(|e| ServerError::DbError(e.to_string()))?;

                let rows = stmt
                    .query_map(params![collection, path], |row| {
                        Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
                    })
                    .map_err(|e| ServerError::DbError(e.to_string()))?;

                let mut out = Vec::new();
                for r in rows {
                    let (id, raw) = r.map_err(|e| ServerError::DbError(e.to_string()))?;
                    match decode_row(id, raw) {
                        Ok(doc) => out.push(doc),
                        Err(e) => tracing::warn!(error = %e, "skipping unreadable document"),
                    }
                }
                Ok(out)
            })
            .map_err(|e| StoreError(e.to_string()))
    }

    fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        self.db
            .with_conn(|conn| {
                let row: Option<String> = conn
                    .query_row(
                        "select data from documents where collection = ? and id = ?",
                        params![collection, id],
                        |r| r.get(0),
                    )
                    .optional()
                    .map_err(|e| ServerError::DbError(format!("select document failed: {e}")))?;

                row.map(|raw| decode_row(id.to_string(), raw)).transpose()
            })
            .map_err(|e| StoreError(e.to_string()))
    }
}
