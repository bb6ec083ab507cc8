use std::collections::HashSet;

use repobrief_github::RemoteCommit;
use repobrief_store::SqliteStore;

use crate::error::Result;

/// Drop candidates whose hash is already stored for the project.
///
/// Candidate order is preserved.
///
/// # Errors
///
/// Returns an error if the stored hashes cannot be read.
pub async fn unprocessed_commits(
    store: &SqliteStore,
    project_id: &str,
    candidates: Vec<RemoteCommit>,
) -> Result<Vec<RemoteCommit>> {
    let known = store.list_commit_hashes(project_id).await?;
    Ok(filter_known(&known, candidates))
}

fn filter_known(known: &[String], candidates: Vec<RemoteCommit>) -> Vec<RemoteCommit> {
    let known: HashSet<&str> = known.iter().map(String::as_str).collect();
    candidates
        .into_iter()
        .filter(|c| !known.contains(c.hash.as_str()))
        .collect()
}
