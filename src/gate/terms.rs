// Restricted term list: loaded once from a human-editable file.
//
// File format: one term per line. Leading/trailing whitespace is ignored,
// blank lines and lines starting with '#' are skipped. A line may hold a
// multi-word phrase ("stock market"), which is matched as that exact phrase.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::ConfigError;

/// The fixed set of restricted terms.
///
/// Order and duplicates don't affect gate decisions; the list is kept as
/// written so `status` can show it back to the operator.
#[derive(Debug, Clone)]
pub struct RestrictedTermSet {
    terms: Vec<String>,
}

impl RestrictedTermSet {
    /// Build a term set from an in-memory list. Blank entries are dropped.
    pub fn from_terms<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let terms = terms
            .into_iter()
            .map(|t| t.as_ref().trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        Self { terms }
    }

    /// Parse the term file format described above.
    pub fn parse(text: &str) -> Self {
        Self::from_terms(
            text.lines()
                .map(str::trim)
                .filter(|line| !line.starts_with('#')),
        )
    }

    /// Load the term file. An unreadable file or one with zero terms is a
    /// configuration error. We never serve with an empty filter.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;

        let set = Self::parse(&text);
        if set.is_empty() {
            return Err(ConfigError::EmptyTermSet(PathBuf::from(path)));
        }

        info!(terms = set.len(), path = %path.display(), "Loaded restricted term list");
        Ok(set)
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_skips_comments_and_blank_lines() {
        let set = RestrictedTermSet::parse("# header\n\njoke\n  cake  \n# trailing\nstock market\n");
        assert_eq!(set.terms(), &["joke", "cake", "stock market"]);
    }

    #[test]
    fn test_from_terms_drops_blank_entries() {
        let set = RestrictedTermSet::from_terms(["a", " ", "", "b"]);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_load_missing_file_is_config_error() {
        let err = RestrictedTermSet::load(Path::new("/nonexistent/medchat/terms.txt")).unwrap_err();
        assert!(matches!(err, ConfigError::Unreadable { .. }));
    }

    #[test]
    fn test_load_comment_only_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("terms.txt");
        std::fs::write(&path, "# nothing here\n\n").unwrap();

        let err = RestrictedTermSet::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyTermSet(_)));
    }
}
