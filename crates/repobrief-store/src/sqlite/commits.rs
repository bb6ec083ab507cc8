use super::SqliteStore;
use crate::error::StoreError;
use crate::types::{CommitRecord, NewCommit};

type CommitRow = (
    i64,
    String,
    String,
    String,
    String,
    String,
    String,
    String,
    String,
);

impl SqliteStore {
    /// Insert commits in the given order inside one transaction.
    ///
    /// Rows whose `(project_id, commit_hash)` already exists are skipped.
    /// Returns the number of rows actually inserted.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction fails; nothing is written in that case.
    pub async fn create_commit_records(
        &self,
        project_id: &str,
        commits: &[NewCommit],
    ) -> Result<usize, StoreError> {
        if commits.is_empty() {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await?;
        let mut inserted = 0u64;
        for commit in commits {
            let result = sqlx::query(
                "INSERT OR IGNORE INTO commits \
                 (project_id, commit_hash, commit_message, commit_author_name, \
                  commit_author_avatar, commit_date, summary) \
                 VALUES (?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(project_id)
            .bind(&commit.hash)
            .bind(&commit.message)
            .bind(&commit.author_name)
            .bind(&commit.author_avatar)
            .bind(&commit.date)
            .bind(&commit.summary)
            .execute(&mut *tx)
            .await?;
            inserted += result.rows_affected();
        }
        tx.commit().await?;

        let inserted = usize::try_from(inserted)?;
        if inserted < commits.len() {
            tracing::debug!(
                project_id,
                skipped = commits.len() - inserted,
                "commits already stored"
            );
        }
        Ok(inserted)
    }

    /// Every stored commit hash of a project.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_commit_hashes(&self, project_id: &str) -> Result<Vec<String>, StoreError> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT commit_hash FROM commits WHERE project_id = ? ORDER BY id ASC")
                .bind(project_id)
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(|(h,)| h).collect())
    }

    /// Stored commits of a project in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_commits(&self, project_id: &str) -> Result<Vec<CommitRecord>, StoreError> {
        let rows: Vec<CommitRow> = sqlx::query_as(
            "SELECT id, project_id, commit_hash, commit_message, commit_author_name, \
             commit_author_avatar, commit_date, summary, created_at \
             FROM commits WHERE project_id = ? ORDER BY id ASC",
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(
                |(
                    id,
                    project_id,
                    commit_hash,
                    commit_message,
                    commit_author_name,
                    commit_author_avatar,
                    commit_date,
                    summary,
                    created_at,
                )| CommitRecord {
                    id,
                    project_id,
                    commit_hash,
                    commit_message,
                    commit_author_name,
                    commit_author_avatar,
                    commit_date,
                    summary,
                    created_at,
                },
            )
            .collect())
    }
}
