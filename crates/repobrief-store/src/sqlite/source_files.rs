use super::SqliteStore;
use crate::error::StoreError;
use crate::types::SourceFileRecord;
use crate::vector::{format_vector, parse_vector};

type SourceFileRow = (i64, String, String, String, String, Option<String>, String);

impl SqliteStore {
    /// Insert the textual part of a summarized file and return its row id.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails (for example an unknown project id).
    pub async fn create_source_file_record(
        &self,
        project_id: &str,
        file_name: &str,
        source_code: &str,
        summary: &str,
    ) -> Result<i64, StoreError> {
        let row: (i64,) = sqlx::query_as(
            "INSERT INTO source_code_embeddings (project_id, file_name, source_code, summary) \
             VALUES (?, ?, ?, ?) RETURNING id",
        )
        .bind(project_id)
        .bind(file_name)
        .bind(source_code)
        .bind(summary)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.0)
    }

    /// Store the embedding of an existing record as a `[a,b,...]` literal.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails or no record has this id.
    pub async fn attach_embedding(&self, record_id: i64, embedding: &[f32]) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE source_code_embeddings SET summary_embedding = ? WHERE id = ?")
            .bind(format_vector(embedding))
            .bind(record_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::Sqlite(sqlx::Error::RowNotFound));
        }
        Ok(())
    }

    /// Indexed files of a project in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a stored embedding cannot be parsed.
    pub async fn list_source_files(
        &self,
        project_id: &str,
    ) -> Result<Vec<SourceFileRecord>, StoreError> {
        let rows: Vec<SourceFileRow> = sqlx::query_as(
            "SELECT id, project_id, file_name, source_code, summary, summary_embedding, created_at \
             FROM source_code_embeddings WHERE project_id = ? ORDER BY id ASC",
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(
                |(id, project_id, file_name, source_code, summary, embedding, created_at)|
                 -> Result<SourceFileRecord, StoreError> {
                    Ok(SourceFileRecord {
                        id,
                        project_id,
                        file_name,
                        source_code,
                        summary,
                        embedding: embedding.as_deref().map(parse_vector).transpose()?,
                        created_at,
                    })
                },
            )
            .collect()
    }

    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn count_source_files(&self, project_id: &str) -> Result<usize, StoreError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM source_code_embeddings WHERE project_id = ?")
                .bind(project_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(usize::try_from(count)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store_with_project() -> (SqliteStore, String) {
        let store = SqliteStore::new(":memory:").await.unwrap();
        let project = store
            .create_project("widgets", "https://github.com/acme/widgets", None)
            .await
            .unwrap();
        (store, project.id)
    }

    #[tokio::test]
    async fn record_then_embedding() {
        let (store, pid) = store_with_project().await;
        let id = store
            .create_source_file_record(&pid, "src/a.ts", "export {}", "Defines widget factory.")
            .await
            .unwrap();

        let before = store.list_source_files(&pid).await.unwrap();
        assert_eq!(before.len(), 1);
        assert!(before[0].embedding.is_none());

        store.attach_embedding(id, &[0.6, 0.8]).await.unwrap();

        let raw: Option<String> =
            sqlx::query_scalar("SELECT summary_embedding FROM source_code_embeddings WHERE id = ?")
                .bind(id)
                .fetch_one(store.pool())
                .await
                .unwrap();
        assert_eq!(raw.as_deref(), Some("[0.6,0.8]"));

        let after = store.list_source_files(&pid).await.unwrap();
        assert_eq!(after[0].embedding.as_deref(), Some(&[0.6f32, 0.8][..]));
        assert_eq!(after[0].file_name, "src/a.ts");
        assert_eq!(after[0].summary, "Defines widget factory.");
    }

    #[tokio::test]
    async fn record_for_unknown_project_fails() {
        let store = SqliteStore::new(":memory:").await.unwrap();
        let result = store
            .create_source_file_record("missing", "a.ts", "", "s")
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn attach_to_missing_record_fails() {
        let (store, _) = store_with_project().await;
        assert!(store.attach_embedding(999, &[1.0]).await.is_err());
    }

    #[tokio::test]
    async fn repeated_records_append() {
        let (store, pid) = store_with_project().await;
        for _ in 0..2 {
            store
                .create_source_file_record(&pid, "a.ts", "x", "s")
                .await
                .unwrap();
        }
        assert_eq!(store.count_source_files(&pid).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn delete_project_cascades_to_files() {
        let (store, pid) = store_with_project().await;
        store
            .create_source_file_record(&pid, "a.ts", "x", "s")
            .await
            .unwrap();
        store.delete_project(&pid).await.unwrap();
        assert_eq!(store.count_source_files(&pid).await.unwrap(), 0);
    }
}
