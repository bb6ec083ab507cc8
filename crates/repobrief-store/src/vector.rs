//! Text encoding of embedding vectors: `[0.1,0.2,...]`.

use crate::error::StoreError;

/// Render a vector as a bracketed, comma-separated literal.
#[must_use]
pub fn format_vector(values: &[f32]) -> String {
    let mut out = String::with_capacity(values.len() * 12 + 2);
    out.push('[');
    for (i, v) in values.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&v.to_string());
    }
    out.push(']');
    out
}

/// Parse a literal produced by [`format_vector`].
///
/// # Errors
///
/// Returns [`StoreError::MalformedEmbedding`] if the brackets are missing or a
/// component is not a number.
pub fn parse_vector(literal: &str) -> Result<Vec<f32>, StoreError> {
    let inner = literal
        .trim()
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .ok_or_else(|| StoreError::MalformedEmbedding(literal.chars().take(32).collect()))?;
    if inner.trim().is_empty() {
        return Ok(Vec::new());
    }
    inner
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<f32>()
                .map_err(|_| StoreError::MalformedEmbedding(part.trim().to_owned()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn formats_bracketed_literal() {
        assert_eq!(format_vector(&[0.5, -1.0, 0.0]), "[0.5,-1,0]");
        assert_eq!(format_vector(&[]), "[]");
    }

    #[test]
    fn parses_with_whitespace() {
        assert_eq!(parse_vector(" [0.25, 1 ,-2] ").unwrap(), vec![0.25, 1.0, -2.0]);
        assert!(parse_vector("[]").unwrap().is_empty());
    }

    #[test]
    fn rejects_malformed() {
        assert!(matches!(
            parse_vector("0.1,0.2"),
            Err(StoreError::MalformedEmbedding(_))
        ));
        assert!(matches!(
            parse_vector("[0.1,abc]"),
            Err(StoreError::MalformedEmbedding(s)) if s == "abc"
        ));
    }

    proptest! {
        #[test]
        fn literal_preserves_finite_values(values in prop::collection::vec(-1.0f32..1.0, 0..64)) {
            prop_assert_eq!(parse_vector(&format_vector(&values)).unwrap(), values);
        }
    }
}
