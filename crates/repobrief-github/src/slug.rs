use std::fmt;

use crate::error::{GithubError, Result};

/// Owner and repository name extracted from a repository URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoSlug {
    pub owner: String,
    pub repo: String,
}

impl RepoSlug {
    /// Take the last two path segments of `url` as owner and repository.
    ///
    /// A trailing `/` and a trailing `.git` are stripped first. No host check is
    /// made: `https://github.com/acme/widgets.git` and `acme/widgets` both parse.
    ///
    /// # Errors
    ///
    /// Returns [`GithubError::InvalidRepositoryUrl`] when fewer than two non-empty
    /// segments are available.
    pub fn parse(url: &str) -> Result<Self> {
        let trimmed = url.trim().trim_end_matches('/');
        let clean = trimmed.strip_suffix(".git").unwrap_or(trimmed);

        let mut segments = clean.rsplit('/');
        let repo = segments.next().unwrap_or_default();
        let owner = segments.next().unwrap_or_default();

        if owner.is_empty() || repo.is_empty() {
            return Err(GithubError::InvalidRepositoryUrl(url.to_owned()));
        }

        Ok(Self {
            owner: owner.to_owned(),
            repo: repo.to_owned(),
        })
    }
}

impl fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_https_url() {
        let slug = RepoSlug::parse("https://github.com/acme/widgets").unwrap();
        assert_eq!(slug.owner, "acme");
        assert_eq!(slug.repo, "widgets");
        assert_eq!(slug.to_string(), "acme/widgets");
    }

    #[test]
    fn strips_git_suffix_and_trailing_slash() {
        assert_eq!(
            RepoSlug::parse("https://github.com/acme/widgets.git").unwrap().repo,
            "widgets"
        );
        assert_eq!(
            RepoSlug::parse("https://github.com/acme/widgets/").unwrap().repo,
            "widgets"
        );
    }

    #[test]
    fn bare_owner_repo_is_accepted() {
        let slug = RepoSlug::parse("acme/widgets").unwrap();
        assert_eq!(slug.owner, "acme");
    }

    #[test]
    fn single_segment_is_rejected() {
        assert!(matches!(
            RepoSlug::parse("widgets"),
            Err(GithubError::InvalidRepositoryUrl(_))
        ));
        assert!(RepoSlug::parse("").is_err());
        assert!(RepoSlug::parse("/widgets").is_err());
    }

    use proptest::prelude::*;

    proptest! {
        #[test]
        fn roundtrips_simple_names(owner in "[a-z][a-z0-9-]{0,15}", repo in "[a-z][a-z0-9_]{0,15}") {
            let url = format!("https://github.com/{owner}/{repo}.git");
            let slug = RepoSlug::parse(&url).unwrap();
            prop_assert_eq!(slug.owner, owner);
            prop_assert_eq!(slug.repo, repo);
        }
    }
}
