//! Database operations for the documents table.

use listy_engine::{Document, Fields, QuerySnapshot};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

/// A stored document row from the database.
#[derive(Debug)]
pub struct StoredDocument {
    pub collection: String,
    pub doc_id: String,
    pub fields: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl<'r> sqlx::FromRow<'r, SqliteRow> for StoredDocument {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(StoredDocument {
            collection: row.try_get("collection")?,
            doc_id: row.try_get("doc_id")?,
            fields: row.try_get("fields")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl StoredDocument {
    /// Convert database row to a listy-engine Document.
    pub fn to_document(&self) -> Result<Document, serde_json::Error> {
        let fields: Fields = serde_json::from_str(&self.fields)?;
        Ok(Document::new(self.doc_id.clone(), fields))
    }
}

/// Insert a document or replace all of its fields.
pub async fn upsert_document(
    pool: &SqlitePool,
    collection: &str,
    doc_id: &str,
    fields: &Fields,
) -> Result<(), sqlx::Error> {
    let encoded = serde_json::to_string(fields).map_err(|e| sqlx::Error::Encode(Box::new(e)))?;
    let now = chrono::Utc::now().timestamp_millis();

    sqlx::query(
        r#"
        INSERT INTO documents (collection, doc_id, fields, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?4)
        ON CONFLICT (collection, doc_id) DO UPDATE SET
            fields = excluded.fields,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(collection)
    .bind(doc_id)
    .bind(encoded)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(())
}

/// Delete a document.
///
/// Returns whether a document was actually removed.
pub async fn delete_document(
    pool: &SqlitePool,
    collection: &str,
    doc_id: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(r#"DELETE FROM documents WHERE collection = ?1 AND doc_id = ?2"#)
        .bind(collection)
        .bind(doc_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Get a document by collection and ID.
pub async fn get_document(
    pool: &SqlitePool,
    collection: &str,
    doc_id: &str,
) -> Result<Option<StoredDocument>, sqlx::Error> {
    sqlx::query_as::<_, StoredDocument>(
        r#"
        SELECT collection, doc_id, fields, created_at, updated_at
        FROM documents
        WHERE collection = ?1 AND doc_id = ?2
        "#,
    )
    .bind(collection)
    .bind(doc_id)
    .fetch_optional(pool)
    .await
}

/// Get all documents in a collection, ordered by document id.
pub async fn get_documents_in_collection(
    pool: &SqlitePool,
    collection: &str,
) -> Result<Vec<StoredDocument>, sqlx::Error> {
    sqlx::query_as::<_, StoredDocument>(
        r#"
        SELECT collection, doc_id, fields, created_at, updated_at
        FROM documents
        WHERE collection = ?1
        ORDER BY doc_id ASC
        "#,
    )
    .bind(collection)
    .fetch_all(pool)
    .await
}

/// Load the full snapshot of a collection.
pub async fn load_snapshot(
    pool: &SqlitePool,
    collection: &str,
) -> Result<QuerySnapshot, crate::error::AppError> {
    let rows = get_documents_in_collection(pool, collection).await?;
    let documents = rows
        .iter()
        .map(StoredDocument::to_document)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(QuerySnapshot {
        collection: collection.to_string(),
        documents,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_pool, run_migrations};
    use listy_engine::City;

    async fn test_pool() -> SqlitePool {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn upsert_and_get() {
        let pool = test_pool().await;
        let city = City::new("Calgary", "AB");

        upsert_document(&pool, "Cities", "Calgary", &city.to_fields())
            .await
            .unwrap();

        let stored = get_document(&pool, "Cities", "Calgary")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.collection, "Cities");
        let doc = stored.to_document().unwrap();
        assert_eq!(City::from_document(&doc).unwrap(), city);
    }

    #[tokio::test]
    async fn upsert_overwrites_fields() {
        let pool = test_pool().await;

        upsert_document(&pool, "Cities", "Calgary", &City::new("Calgary", "AB").to_fields())
            .await
            .unwrap();
        upsert_document(&pool, "Cities", "Calgary", &City::new("Calgary", "BC").to_fields())
            .await
            .unwrap();

        let snapshot = load_snapshot(&pool, "Cities").await.unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.documents[0].get_string("province"), Some("BC"));
    }

    #[tokio::test]
    async fn delete_reports_whether_removed() {
        let pool = test_pool().await;
        upsert_document(&pool, "Cities", "Calgary", &City::new("Calgary", "AB").to_fields())
            .await
            .unwrap();

        assert!(delete_document(&pool, "Cities", "Calgary").await.unwrap());
        assert!(!delete_document(&pool, "Cities", "Calgary").await.unwrap());
        assert!(get_document(&pool, "Cities", "Calgary")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn snapshot_is_scoped_and_ordered() {
        let pool = test_pool().await;
        for name in ["Regina", "Calgary", "Halifax"] {
            upsert_document(&pool, "Cities", name, &City::new(name, "XX").to_fields())
                .await
                .unwrap();
        }
        upsert_document(&pool, "Towns", "Banff", &City::new("Banff", "AB").to_fields())
            .await
            .unwrap();

        let snapshot = load_snapshot(&pool, "Cities").await.unwrap();
        let ids: Vec<_> = snapshot.iter().map(|doc| doc.id.as_str()).collect();
        assert_eq!(ids, vec!["Calgary", "Halifax", "Regina"]);
    }
}
