use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub github_url: String,
    #[serde(skip_serializing)]
    pub github_token: Option<String>,
    pub created_at: String,
}

/// What the pipelines need to reach a project's repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRepository {
    pub github_url: String,
    pub github_token: Option<String>,
}

/// A summarized source file. `embedding` is `None` until the vector is attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceFileRecord {
    pub id: i64,
    pub project_id: String,
    pub file_name: String,
    pub source_code: String,
    pub summary: String,
    pub embedding: Option<Vec<f32>>,
    pub created_at: String,
}

/// Commit row to insert; the summary may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewCommit {
    pub hash: String,
    pub message: String,
    pub author_name: String,
    pub author_avatar: String,
    pub date: String,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitRecord {
    pub id: i64,
    pub project_id: String,
    pub commit_hash: String,
    pub commit_message: String,
    pub commit_author_name: String,
    pub commit_author_avatar: String,
    pub commit_date: String,
    pub summary: String,
    pub created_at: String,
}
