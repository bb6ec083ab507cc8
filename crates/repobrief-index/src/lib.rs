//! Repository file indexing: load → summarize → embed → store, and question
//! answering over the stored records.
//!
//! [`CodeIndexer`] drives the run. Only URL validation, repository listing and
//! the store pre-flight are fatal; any per-file failure leaves a `None` slot in
//! the [`IndexReport`] and the run continues.

pub mod embedding;
pub mod error;
pub mod indexer;
pub mod loader;
pub mod retriever;
pub mod summarizer;
pub mod writer;

pub use embedding::{EMBEDDING_DIM, embed_summary};
pub use error::{IndexError, Result};
pub use indexer::{CodeIndexer, IndexReport, IndexedFile, IndexerConfig};
pub use loader::ContentLoader;
pub use retriever::{Answer, CodeRetriever, DEFAULT_TOP_K, ScoredFile};
pub use summarizer::CodeSummarizer;
pub use writer::EmbeddingWriter;
