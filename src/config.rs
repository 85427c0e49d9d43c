use crate::error::{Result, SeatscanError};
use std::fs;
use std::path::Path;

pub const TOKEN_ENV: &str = "GITHUB_PERSONAL_ACCESS_TOKEN";
pub const API_URL_ENV: &str = "GITHUB_API_URL";

/// Reads the personal access token from the environment. An unset or empty
/// variable is treated the same way: no credential.
pub fn token_from_env() -> Result<String> {
    match std::env::var(TOKEN_ENV) {
        Ok(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
        _ => Err(SeatscanError::MissingCredential),
    }
}

/// Optional API base URL override (set by GitHub Actions, useful for GitHub
/// Enterprise Server). Defaults to the public API when unset.
pub fn api_url_from_env() -> Option<String> {
    std::env::var(API_URL_ENV)
        .ok()
        .filter(|url| !url.trim().is_empty())
}

/// Reads the organization list: one name per line, blank lines skipped with a
/// warning.
pub fn read_org_list(path: &Path) -> Result<Vec<String>> {
    let contents = fs::read_to_string(path)?;
    let mut orgs = Vec::new();
    for line in contents.lines() {
        let name = line.trim();
        if name.is_empty() {
            log::warn!("Empty organization name found in {}. Skipping...", path.display());
            continue;
        }
        orgs.push(name.to_string());
    }
    Ok(orgs)
}
