use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// One tracked investor.
///
/// `source_code` is the identifier the remote source uses in its URLs;
/// `folder` is the output namespace and defaults to the slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvestorConfig {
    pub slug: String,
    pub name: String,
    pub source_code: String,
    #[serde(default)]
    pub folder: Option<String>,
}

impl InvestorConfig {
    /// Output namespace for this investor's snapshots.
    #[must_use]
    pub fn output_folder(&self) -> &str {
        self.folder.as_deref().unwrap_or(&self.slug)
    }
}

#[derive(Debug, Deserialize)]
pub struct InvestorsFile {
    pub investors: Vec<InvestorConfig>,
}

impl InvestorsFile {
    /// Looks up an investor by slug.
    #[must_use]
    pub fn find(&self, slug: &str) -> Option<&InvestorConfig> {
        self.investors.iter().find(|i| i.slug == slug)
    }
}

/// Load and validate the investor registry from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_investors(path: &Path) -> Result<InvestorsFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::InvestorsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_investors(&content)
}

/// Parse and validate registry YAML already in memory.
///
/// # Errors
///
/// Returns `ConfigError` if the YAML does not parse or fails validation.
pub fn parse_investors(content: &str) -> Result<InvestorsFile, ConfigError> {
    let investors_file: InvestorsFile =
        serde_yaml::from_str(content).map_err(ConfigError::InvestorsFileParse)?;

    validate_investors(&investors_file)?;

    Ok(investors_file)
}

fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

fn validate_investors(investors_file: &InvestorsFile) -> Result<(), ConfigError> {
    let mut seen_slugs = HashSet::new();
    let mut seen_folders = HashSet::new();

    for investor in &investors_file.investors {
        if !is_valid_slug(&investor.slug) {
            return Err(ConfigError::Validation(format!(
                "investor slug '{}' must be non-empty and contain only a-z, 0-9 and '-'",
                investor.slug
            )));
        }

        if investor.name.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "investor '{}' has an empty name",
                investor.slug
            )));
        }

        if investor.source_code.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "investor '{}' has an empty source_code",
                investor.slug
            )));
        }

        if !seen_slugs.insert(investor.slug.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate investor slug: '{}'",
                investor.slug
            )));
        }

        let folder = investor.output_folder();
        if folder.trim().is_empty() || folder.contains(['/', '\\']) || folder.starts_with('.') {
            return Err(ConfigError::Validation(format!(
                "investor '{}' has invalid folder '{folder}'",
                investor.slug
            )));
        }
        if !seen_folders.insert(folder) {
            return Err(ConfigError::Validation(format!(
                "duplicate output folder: '{folder}' (from investor '{}')",
                investor.slug
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "investors_test.rs"]
mod tests;
