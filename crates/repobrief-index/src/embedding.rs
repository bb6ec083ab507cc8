//! Deterministic pseudo-embedding of a summary.
//!
//! This is a hash projection, not a semantic model: every UTF-16 code unit
//! bumps one bucket chosen by its value and position, and the bucket counts are
//! L2-normalized.

/// Length of every embedding vector.
pub const EMBEDDING_DIM: usize = 768;

/// Project `text` onto a unit vector of [`EMBEDDING_DIM`] components.
///
/// Returns the zero vector for empty input.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn embed_summary(text: &str) -> Vec<f32> {
    let mut buckets = vec![0f64; EMBEDDING_DIM];
    for (i, code) in text.encode_utf16().enumerate() {
        buckets[(usize::from(code) * (i + 1)) % EMBEDDING_DIM] += 1.0;
    }

    let magnitude = buckets.iter().map(|v| v * v).sum::<f64>().sqrt();
    if magnitude == 0.0 {
        return vec![0.0; EMBEDDING_DIM];
    }

    buckets.iter().map(|v| (v / magnitude) as f32).collect()
}
