//! Question answering over indexed files: rank by summary embedding, then ask
//! the model with the best matches as context.

use std::collections::HashSet;
use std::fmt::Write;
use std::time::Duration;

use repobrief_llm::provider::{LlmProvider, generate_with_timeout};
use repobrief_store::{SourceFileRecord, SqliteStore};
use serde::Serialize;

use crate::embedding::embed_summary;
use crate::error::Result;
use crate::summarizer::{MAX_SOURCE_CHARS, truncate_chars};

/// Number of files handed to the model when the caller does not choose.
pub const DEFAULT_TOP_K: usize = 10;

/// An indexed file with its similarity to the question.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredFile {
    pub file_name: String,
    pub source_code: String,
    pub summary: String,
    pub score: f32,
}

/// The model's answer and the files it was given.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Answer {
    pub output: String,
    pub files_references: Vec<ScoredFile>,
}

/// Cosine similarity of two unit vectors.
#[must_use]
pub fn similarity(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Best `k` records for `query`, highest score first.
///
/// Records without an embedding are skipped. A file indexed more than once
/// appears a single time, with its best score.
#[must_use]
pub fn rank_files(query: &[f32], records: Vec<SourceFileRecord>, k: usize) -> Vec<ScoredFile> {
    let mut scored: Vec<ScoredFile> = records
        .into_iter()
        .filter_map(|r| {
            let score = similarity(query, r.embedding.as_deref()?);
            Some(ScoredFile {
                file_name: r.file_name,
                source_code: r.source_code,
                summary: r.summary,
                score,
            })
        })
        .collect();
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));

    let mut seen = HashSet::new();
    scored.retain(|f| seen.insert(f.file_name.clone()));
    scored.truncate(k);
    scored
}

/// Render ranked files as the context block of the answer prompt.
#[must_use]
pub fn format_as_context(files: &[ScoredFile]) -> String {
    let mut out = String::new();
    for f in files {
        let _ = writeln!(out, "source: {}", f.file_name);
        let _ = writeln!(out, "code content: {}", truncate_chars(&f.source_code, MAX_SOURCE_CHARS));
        let _ = writeln!(out, "summary of file: {}\n", f.summary);
    }
    out
}

#[must_use]
pub fn answer_prompt(question: &str, context: &str) -> Vec<String> {
    vec![
        "You are an AI code assistant who answers questions about a codebase for a \
         technical intern who is new to it. Answer only from the context below, step by \
         step, in markdown with code snippets where they help. If the context does not \
         contain the answer, say you don't know rather than inventing one."
            .to_owned(),
        format!("START CONTEXT BLOCK\n{context}END OF CONTEXT BLOCK"),
        format!("START QUESTION\n{question}\nEND OF QUESTION"),
    ]
}

/// Answers questions about a project from its indexed files.
#[derive(Debug, Clone)]
pub struct CodeRetriever<P> {
    store: SqliteStore,
    provider: P,
    timeout: Duration,
}

impl<P: LlmProvider> CodeRetriever<P> {
    #[must_use]
    pub fn new(provider: P, store: SqliteStore, timeout: Duration) -> Self {
        Self {
            store,
            provider,
            timeout,
        }
    }

    /// # Errors
    ///
    /// Returns an error if the indexed files cannot be read.
    pub async fn retrieve(&self, project_id: &str, question: &str, k: usize) -> Result<Vec<ScoredFile>> {
        let records = self.store.list_source_files(project_id).await?;
        Ok(rank_files(&embed_summary(question), records, k))
    }

    /// Answer `question` from the `k` closest files of `project_id`.
    ///
    /// A project with nothing indexed gets an empty answer without a model call.
    ///
    /// # Errors
    ///
    /// Returns an error if the files cannot be read or the model call fails.
    pub async fn ask(&self, project_id: &str, question: &str, k: usize) -> Result<Answer> {
        let files = self.retrieve(project_id, question, k).await?;
        if files.is_empty() {
            tracing::warn!(project_id, "no indexed files to answer from");
            return Ok(Answer::default());
        }

        let prompt = answer_prompt(question, &format_as_context(&files));
        let output = generate_with_timeout(&self.provider, &prompt, self.timeout).await?;
        tracing::info!(project_id, files = files.len(), answer_len = output.len(), "question answered");

        Ok(Answer {
            output: output.trim().to_owned(),
            files_references: files,
        })
    }
}

#[cfg(test)]
mod tests {
    use repobrief_llm::mock::{MockProvider, MockReply};

    use super::*;

    fn record(file_name: &str, summary: &str, embedding: Option<Vec<f32>>) -> SourceFileRecord {
        SourceFileRecord {
            id: 0,
            project_id: "p".into(),
            file_name: file_name.into(),
            source_code: format!("// {file_name}"),
            summary: summary.into(),
            embedding,
            created_at: String::new(),
        }
    }

    async fn indexed_store(files: &[(&str, &str)]) -> (SqliteStore, String) {
        let store = SqliteStore::new(":memory:").await.unwrap();
        let project = store
            .create_project("widgets", "https://github.com/acme/widgets", None)
            .await
            .unwrap();
        for (name, summary) in files {
            let id = store
                .create_source_file_record(&project.id, name, &format!("// {name}"), summary)
                .await
                .unwrap();
            store.attach_embedding(id, &embed_summary(summary)).await.unwrap();
        }
        (store, project.id)
    }

    #[test]
    fn identical_unit_vectors_score_one() {
        let v = embed_summary("Defines widget factory.");
        assert!((similarity(&v, &v) - 1.0).abs() < 1e-5);
        assert!(similarity(&v, &embed_summary("")).abs() < f32::EPSILON);
    }

    #[test]
    fn rank_orders_skips_and_truncates() {
        let records = vec![
            record("far.ts", "Zzz", Some(vec![0.0, 1.0])),
            record("raw.ts", "no vector", None),
            record("near.ts", "Close", Some(vec![1.0, 0.0])),
            record("mid.ts", "Half", Some(vec![0.6, 0.8])),
        ];
        let ranked = rank_files(&[1.0, 0.0], records, 2);
        let names: Vec<_> = ranked.iter().map(|f| f.file_name.as_str()).collect();
        assert_eq!(names, ["near.ts", "mid.ts"]);
        assert!(ranked[0].score > ranked[1].score);
    }

    #[test]
    fn rank_keeps_best_copy_of_reindexed_file() {
        let records = vec![
            record("a.ts", "old", Some(vec![0.6, 0.8])),
            record("a.ts", "new", Some(vec![1.0, 0.0])),
            record("b.ts", "other", Some(vec![0.0, 1.0])),
        ];
        let ranked = rank_files(&[1.0, 0.0], records, 10);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].file_name, "a.ts");
        assert_eq!(ranked[0].summary, "new");
    }

    #[test]
    fn context_lists_every_file() {
        let files = vec![ScoredFile {
            file_name: "a.ts".into(),
            source_code: "export const a = 1;".into(),
            summary: "Defines a.".into(),
            score: 0.9,
        }];
        let ctx = format_as_context(&files);
        assert!(ctx.contains("source: a.ts"));
        assert!(ctx.contains("code content: export const a = 1;"));
        assert!(ctx.contains("summary of file: Defines a."));

        let prompt = answer_prompt("Where is a defined?", &ctx);
        assert_eq!(prompt.len(), 3);
        assert!(prompt[1].contains("source: a.ts"));
        assert!(prompt[2].contains("Where is a defined?"));
    }

    #[tokio::test]
    async fn answers_from_closest_files() {
        let (store, pid) = indexed_store(&[
            ("a.ts", "Defines widget factory."),
            ("b.ts", "Utility helpers."),
        ])
        .await;
        let mock = MockProvider::default()
            .when_prompt_contains("Defines widget factory.", vec![MockReply::Text("  Look in a.ts.\n".into())]);
        let retriever = CodeRetriever::new(mock.clone(), store, Duration::from_secs(60));

        let answer = retriever
            .ask(&pid, "Defines widget factory.", 1)
            .await
            .unwrap();

        assert_eq!(answer.output, "Look in a.ts.");
        assert_eq!(answer.files_references.len(), 1);
        assert_eq!(answer.files_references[0].file_name, "a.ts");
        assert!((answer.files_references[0].score - 1.0).abs() < 1e-5);
        assert_eq!(mock.call_count(), 1);
        assert!(!mock.prompts()[0][1].contains("b.ts"));
    }

    #[tokio::test]
    async fn project_without_files_skips_the_model() {
        let (store, pid) = indexed_store(&[]).await;
        let mock = MockProvider::default();
        let retriever = CodeRetriever::new(mock.clone(), store, Duration::from_secs(60));

        let answer = retriever.ask(&pid, "What does this do?", DEFAULT_TOP_K).await.unwrap();

        assert!(answer.output.is_empty());
        assert!(answer.files_references.is_empty());
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn model_failure_is_an_error() {
        let (store, pid) = indexed_store(&[("a.ts", "Defines a.")]).await;
        let retriever = CodeRetriever::new(MockProvider::failing(), store, Duration::from_secs(60));

        let result = retriever.ask(&pid, "What is a?", DEFAULT_TOP_K).await;
        assert!(matches!(result, Err(crate::IndexError::Llm(_))));
    }
}
