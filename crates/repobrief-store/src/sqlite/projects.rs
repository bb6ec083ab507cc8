use super::SqliteStore;
use crate::error::StoreError;
use crate::types::{Project, ProjectRepository};

type ProjectRow = (String, String, String, Option<String>, String);

fn project_from_row((id, name, github_url, github_token, created_at): ProjectRow) -> Project {
    Project {
        id,
        name,
        github_url,
        github_token,
        created_at,
    }
}

impl SqliteStore {
    /// Insert a project under a fresh UUID v4 id.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn create_project(
        &self,
        name: &str,
        github_url: &str,
        github_token: Option<&str>,
    ) -> Result<Project, StoreError> {
        let id = uuid::Uuid::new_v4().to_string();
        let row: ProjectRow = sqlx::query_as(
            "INSERT INTO projects (id, name, github_url, github_token) VALUES (?, ?, ?, ?) \
             RETURNING id, name, github_url, github_token, created_at",
        )
        .bind(&id)
        .bind(name)
        .bind(github_url)
        .bind(github_token)
        .fetch_one(&self.pool)
        .await?;
        Ok(project_from_row(row))
    }

    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn get_project(&self, id: &str) -> Result<Option<Project>, StoreError> {
        let row: Option<ProjectRow> = sqlx::query_as(
            "SELECT id, name, github_url, github_token, created_at FROM projects WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(project_from_row))
    }

    /// All projects, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_projects(&self) -> Result<Vec<Project>, StoreError> {
        let rows: Vec<ProjectRow> = sqlx::query_as(
            "SELECT id, name, github_url, github_token, created_at FROM projects \
             ORDER BY created_at ASC, rowid ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(project_from_row).collect())
    }

    /// Repository URL and token of a project.
    ///
    /// Returns `None` when the project does not exist or has an empty URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn get_project_repository(
        &self,
        project_id: &str,
    ) -> Result<Option<ProjectRepository>, StoreError> {
        let row: Option<(String, Option<String>)> =
            sqlx::query_as("SELECT github_url, github_token FROM projects WHERE id = ?")
                .bind(project_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row
            .filter(|(url, _)| !url.trim().is_empty())
            .map(|(github_url, github_token)| ProjectRepository {
                github_url,
                github_token: github_token.filter(|t| !t.is_empty()),
            }))
    }

    /// Delete a project together with its file and commit records.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ProjectNotFound`] if no row was deleted.
    pub async fn delete_project(&self, project_id: &str) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(project_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::ProjectNotFound(project_id.to_owned()));
        }
        Ok(())
    }
}
