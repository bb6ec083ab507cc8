use futures::future::join_all;
use repobrief_store::SqliteStore;

use crate::error::Result;
use crate::indexer::IndexedFile;

/// Persists indexed files: text record first, then the embedding.
#[derive(Debug, Clone)]
pub struct EmbeddingWriter {
    store: SqliteStore,
}

impl EmbeddingWriter {
    #[must_use]
    pub fn new(store: SqliteStore) -> Self {
        Self { store }
    }

    #[must_use]
    pub fn store(&self) -> &SqliteStore {
        &self.store
    }

    /// Write one file and return its record id.
    ///
    /// If attaching the embedding fails the text record stays without a vector.
    ///
    /// # Errors
    ///
    /// Returns an error if either of the two writes fails.
    pub async fn write(&self, project_id: &str, file: &IndexedFile) -> Result<i64> {
        let id = self
            .store
            .create_source_file_record(project_id, &file.file_name, &file.source_code, &file.summary)
            .await?;
        tracing::debug!(file = %file.file_name, id, "source file record created");

        self.store.attach_embedding(id, &file.embedding).await?;
        tracing::debug!(file = %file.file_name, id, "embedding attached");
        Ok(id)
    }

    /// Write every file concurrently; one failure never cancels the others.
    ///
    /// Outcomes are returned in input order.
    pub async fn write_all<'a, I>(&self, project_id: &str, files: I) -> Vec<(&'a str, Result<i64>)>
    where
        I: IntoIterator<Item = &'a IndexedFile>,
    {
        join_all(files.into_iter().map(|file| async move {
            let outcome = self.write(project_id, file).await;
            if let Err(e) = &outcome {
                tracing::error!(file = %file.file_name, "failed to store file: {e}");
            }
            (file.file_name.as_str(), outcome)
        }))
        .await
    }
}
