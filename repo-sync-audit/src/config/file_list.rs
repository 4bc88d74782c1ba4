//! File list document: tracked paths per repository category.

use super::ConfigError;
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

/// Category whose paths every derivative tracks.
pub const COMMON_CATEGORY: &str = "common";

/// Validated mapping from category name to its ordered file paths.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(transparent)]
pub struct FileList {
    categories: BTreeMap<String, Vec<String>>,
}

impl FileList {
    /// Loads and validates a file list document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file is missing, unparsable, or lists
    /// an empty or absolute path.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let list: FileList = super::parse_document(path)?;
        list.validate(path)?;
        Ok(list)
    }

    /// Builds a file list from in-memory categories.
    pub fn from_categories<I, K, P>(categories: I) -> Self
    where
        I: IntoIterator<Item = (K, Vec<P>)>,
        K: Into<String>,
        P: Into<String>,
    {
        Self {
            categories: categories
                .into_iter()
                .map(|(name, paths)| (name.into(), paths.into_iter().map(Into::into).collect()))
                .collect(),
        }
    }

    /// Returns the paths listed under `category`, if present.
    #[must_use]
    pub fn category(&self, category: &str) -> Option<&[String]> {
        self.categories.get(category).map(Vec::as_slice)
    }

    /// Returns the file set tracked by a repository of `category`.
    ///
    /// The set is the common paths followed by the category's extra paths,
    /// with repeated paths kept at their first position. A missing `common`
    /// category contributes nothing.
    ///
    /// # Errors
    ///
    /// Returns the category name if it is not defined.
    pub fn file_set(&self, category: Option<&str>) -> Result<Vec<String>, String> {
        let extra: &[String] = match category {
            Some(name) => self.category(name).ok_or_else(|| name.to_string())?,
            None => &[],
        };
        let common = self.category(COMMON_CATEGORY).unwrap_or(&[]);

        let mut seen = HashSet::new();
        Ok(common
            .iter()
            .chain(extra)
            .filter(|path| seen.insert(path.as_str()))
            .cloned()
            .collect())
    }

    fn validate(&self, path: &Path) -> Result<(), ConfigError> {
        for (category, paths) in &self.categories {
            for file in paths {
                let message = if file.trim().is_empty() {
                    Some("contains an empty path")
                } else if file.starts_with('/') || file.starts_with('\\') {
                    Some("contains an absolute path")
                } else {
                    None
                };

                if let Some(message) = message {
                    return Err(ConfigError::ValidationError {
                        path: path.display().to_string(),
                        message: format!("category '{category}' {message}: '{file}'"),
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn sample() -> FileList {
        FileList::from_categories([
            ("common", vec![".github/workflows/ci.yml", ".pre-commit-config.yaml"]),
            ("addon-irsa", vec!["iam.tf", ".pre-commit-config.yaml"]),
        ])
    }

    #[test]
    fn file_set_is_common_then_category() {
        let set = sample().file_set(Some("addon-irsa")).unwrap();
        assert_eq!(
            set,
            vec![
                ".github/workflows/ci.yml",
                ".pre-commit-config.yaml",
                "iam.tf"
            ]
        );
    }

    #[test]
    fn file_set_without_category_is_common() {
        let set = sample().file_set(None).unwrap();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn file_set_rejects_unknown_category() {
        assert_eq!(sample().file_set(Some("addon-oidc")), Err("addon-oidc".to_string()));
    }

    #[test]
    fn loads_yaml_file_list() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("files.yaml");
        fs::write(
            &path,
            r#"
common:
  - .github/workflows/ci.yml
  - LICENSE
addon-irsa:
  - iam.tf
"#,
        )
        .unwrap();

        let list = FileList::load(&path).unwrap();
        assert_eq!(list.category("common").unwrap().len(), 2);
        assert_eq!(list.category("addon-irsa").unwrap(), ["iam.tf"]);
    }

    #[test]
    fn rejects_absolute_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("files.yaml");
        fs::write(&path, "common:\n  - /etc/passwd\n").unwrap();

        let result = FileList::load(&path);
        assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
    }

    #[test]
    fn rejects_empty_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("files.yaml");
        fs::write(&path, "common:\n  - \"\"\n").unwrap();

        let result = FileList::load(&path);
        assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
    }
}
