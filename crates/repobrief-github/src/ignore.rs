use crate::error::{GithubError, Result};

/// Lockfiles skipped by default when loading repository content.
pub const DEFAULT_IGNORE_FILES: [&str; 4] =
    ["package-lock.json", "yarn.lock", "pnpm-lock.yaml", "bun.lockb"];

/// Glob patterns for repository paths that must not be loaded.
///
/// A path is ignored when a pattern matches the full repository-relative path or
/// its final file-name component.
#[derive(Debug, Clone, Default)]
pub struct IgnoreList {
    patterns: Vec<glob::Pattern>,
}

impl IgnoreList {
    /// # Errors
    ///
    /// Returns [`GithubError::InvalidPattern`] if a pattern does not compile.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|p| {
                glob::Pattern::new(p.as_ref()).map_err(|source| GithubError::InvalidPattern {
                    pattern: p.as_ref().to_owned(),
                    source,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    #[must_use]
    pub fn defaults() -> Self {
        Self::new(&DEFAULT_IGNORE_FILES).unwrap_or_default()
    }

    #[must_use]
    pub fn is_ignored(&self, path: &str) -> bool {
        let file_name = path.rsplit('/').next().unwrap_or(path);
        self.patterns
            .iter()
            .any(|p| p.matches(path) || p.matches(file_name))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
